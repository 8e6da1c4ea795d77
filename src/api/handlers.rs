//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use tracing::{error, warn};

use crate::{
    state::{view::menu_entries, AppState, SessionLength},
    tasks::TrayEvent,
};
use super::responses::{AboutResponse, ApiResponse, HealthResponse, MenuResponse, StatusResponse};

/// Longest custom session accepted, one week
pub const MAX_CUSTOM_MINUTES: u64 = 7 * 24 * 60;

/// Hand a session-changing click to the event loop and answer with the view it produced
async fn forward_and_wait(
    state: &AppState,
    action: &str,
    event: TrayEvent,
    message: String,
) -> Result<Json<ApiResponse>, StatusCode> {
    match state.click_and_wait(action, event).await {
        Ok(view) => Ok(Json(ApiResponse::accepted(message, view))),
        Err(e) => {
            error!("Failed to forward {} click: {}", action, e);
            Err(StatusCode::SERVICE_UNAVAILABLE)
        }
    }
}

/// Hand a click to the event loop without waiting for it
async fn forward(
    state: &AppState,
    action: &str,
    event: TrayEvent,
    message: String,
) -> Result<Json<ApiResponse>, StatusCode> {
    match state.click(action, event).await {
        Ok(()) => Ok(Json(ApiResponse::accepted(message, state.current_view()))),
        Err(e) => {
            error!("Failed to forward {} click: {}", action, e);
            Err(StatusCode::SERVICE_UNAVAILABLE)
        }
    }
}

/// Handle GET /modes - The menu
pub async fn modes_handler(State(state): State<Arc<AppState>>) -> Json<MenuResponse> {
    Json(MenuResponse {
        presets: menu_entries(state.modes),
        stop_label: "Decaf (Stop)".to_string(),
        about_label: "About Espresso".to_string(),
        quit_label: "Quit".to_string(),
    })
}

/// Handle POST /modes/:index - Start a preset
pub async fn preset_handler(
    State(state): State<Arc<AppState>>,
    Path(index): Path<usize>,
) -> Result<Json<ApiResponse>, StatusCode> {
    let Some(mode) = state.modes.get(index) else {
        warn!("Preset {} does not exist", index);
        return Err(StatusCode::NOT_FOUND);
    };

    forward_and_wait(
        &state,
        mode.name,
        TrayEvent::Preset(index),
        format!("{} mode requested", mode.name),
    )
    .await
}

/// Handle POST /custom/:minutes - Start a session of any length
pub async fn custom_handler(
    State(state): State<Arc<AppState>>,
    Path(minutes): Path<u64>,
) -> Result<Json<ApiResponse>, StatusCode> {
    if minutes == 0 || minutes > MAX_CUSTOM_MINUTES {
        warn!("Rejecting custom session of {} minutes", minutes);
        return Err(StatusCode::BAD_REQUEST);
    }

    forward_and_wait(
        &state,
        "custom",
        TrayEvent::Custom(SessionLength::minutes(minutes)),
        format!("{} minute session requested", minutes),
    )
    .await
}

/// Handle POST /stop - Back to decaf
pub async fn stop_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    forward_and_wait(&state, "stop", TrayEvent::Stop, "Stop requested".to_string()).await
}

/// Handle POST /about - Show the about notification and return its text
pub async fn about_handler(State(state): State<Arc<AppState>>) -> Result<Json<AboutResponse>, StatusCode> {
    if let Err(e) = state.click("about", TrayEvent::About).await {
        error!("Failed to forward about click: {}", e);
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    }

    Ok(Json(AboutResponse {
        title: "About Espresso".to_string(),
        message: state.about.clone(),
    }))
}

/// Handle POST /quit - Leave the event loop and shut down
pub async fn quit_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    forward(&state, "quit", TrayEvent::Quit, "Quit requested".to_string()).await
}

/// Handle GET /status - Return current tray status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let view = state.current_view();
    let (last_action, last_action_time) = state.get_last_action();

    Json(StatusResponse {
        active: view.is_awake(),
        view,
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    })
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
