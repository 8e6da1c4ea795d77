//! Espresso - keep your screen on and your system active
//!
//! This is the main entry point for the espresso application.

use std::sync::Arc;
use anyhow::anyhow;
use tokio::{net::TcpListener, sync::mpsc};
use tracing::{error, info};

use espresso::{
    config::{AppPaths, Config},
    settings::load_settings,
    state::{AppState, SessionController, MODES},
    api::create_router,
    services::{
        acquire_single_instance, select_notifier, PowerCall, SystemPowerGate,
        resources::{about_message, ensure_resource_files, icon_paths},
    },
    tasks::{run_event_loop, AboutInfo, CommandSerializer, TrayEvent},
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("espresso={},tower_http=info", config.log_level()))
        .init();

    info!("Starting espresso v{}", env!("CARGO_PKG_VERSION"));

    let paths = AppPaths::resolve(config.config_dir.clone());
    let Some(_instance) = acquire_single_instance(&paths.lock_file()).map_err(|e| anyhow!(e))? else {
        info!("Espresso is already running, exiting");
        return Ok(());
    };

    ensure_resource_files(&paths);
    let settings = load_settings(&paths.settings_file());
    info!("Configuration: dir={}, language={}", paths.dir().display(), settings.language);

    // The power gate lives on its own thread for the life of the process
    let serializer = CommandSerializer::spawn(SystemPowerGate::new).map_err(|e| anyhow!(e))?;
    serializer
        .request(PowerCall::AllowSleep)
        .await
        .map_err(|e| anyhow!(e))?;

    let notifier = select_notifier(icon_paths(&paths)).await;
    let controller = SessionController::new(&MODES, serializer, notifier);

    let about = about_message(&paths);
    let (events_tx, events_rx) = mpsc::channel::<TrayEvent>(64);
    let state = Arc::new(AppState::new(
        events_tx.clone(),
        controller.subscribe(),
        &MODES,
        about.clone(),
        config.port,
        config.host.clone(),
    ));

    let mut event_loop = tokio::spawn(run_event_loop(
        controller,
        events_rx,
        AboutInfo { message: about },
    ));

    // Translate SIGINT/SIGTERM into a quit click
    let loop_tx = events_tx.clone();
    let quit_tx = events_tx;
    tokio::spawn(async move {
        shutdown_signal().await;
        info!("Shutdown signal received");
        let _ = quit_tx.send(TrayEvent::Quit).await;
    });

    // Create HTTP router with all endpoints
    let app = create_router(state);

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Control surface running on http://{}", addr);
    info!("Endpoints:");
    info!("  GET  /modes          - List presets");
    info!("  POST /modes/:index   - Start a preset");
    info!("  POST /custom/:min    - Start a custom session");
    info!("  POST /stop           - Back to decaf");
    info!("  POST /about          - About Espresso");
    info!("  POST /quit           - Quit");
    info!("  GET  /status         - Current tray view");
    info!("  GET  /health         - Health check");

    let server = axum::serve(listener, app);

    let joined = tokio::select! {
        result = server => {
            if let Err(e) = result {
                error!("Server error: {}", e);
            }
            // The loop still owns the session; ask it to finish
            let _ = loop_tx.send(TrayEvent::Quit).await;
            event_loop.await
        }
        joined = &mut event_loop => joined,
    };

    match joined {
        Ok(controller) => controller.shutdown().await,
        Err(e) => error!("Event loop failed: {}", e),
    }

    info!("Espresso shutdown complete");
    Ok(())
}
