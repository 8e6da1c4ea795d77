//! Event loop: the single owner of the session controller

use std::{sync::Arc, time::Duration};
use tokio::{
    sync::mpsc,
    time::{interval, Instant},
};
use tracing::{debug, info, warn};

use crate::{
    services::{notify_detached, Notifier},
    state::{
        controller::{SessionController, SessionEvent},
        modes::SessionLength,
        view::{IconVariant, Notification},
    },
};

/// Period of the countdown ticker
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// A click coming from the tray surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrayEvent {
    /// A preset menu entry, by index
    Preset(usize),
    /// A session of arbitrary length
    Custom(SessionLength),
    Stop,
    About,
    Quit,
}

/// Text shown for the about request
#[derive(Debug, Clone)]
pub struct AboutInfo {
    pub message: String,
}

impl AboutInfo {
    fn notification(&self) -> Notification {
        Notification::new("About Espresso", self.message.clone(), IconVariant::Awake)
    }
}

/// Merge tray clicks with the one-second ticker and dispatch each to the
/// controller, one at a time, until quit. Hands the controller back so the
/// caller can shut it down.
pub async fn run_event_loop(
    mut controller: SessionController,
    mut events: mpsc::Receiver<TrayEvent>,
    about: AboutInfo,
) -> SessionController {
    info!("Starting event loop");

    let notifier: Arc<dyn Notifier> = Arc::clone(controller.notifier());
    let mut ticker = interval(TICK_PERIOD);

    loop {
        tokio::select! {
            event = events.recv() => {
                let Some(event) = event else {
                    info!("Tray event channel closed, leaving event loop");
                    break;
                };
                debug!("Tray event: {:?}", event);

                let session_event = match event {
                    TrayEvent::Preset(index) => match controller.modes().get(index) {
                        Some(mode) => SessionEvent::Start(mode.length),
                        None => {
                            warn!("Ignoring unknown preset index {}", index);
                            continue;
                        }
                    },
                    TrayEvent::Custom(length) => SessionEvent::Start(length),
                    TrayEvent::Stop => SessionEvent::Stop,
                    TrayEvent::About => {
                        notify_detached(&notifier, about.notification());
                        continue;
                    }
                    TrayEvent::Quit => {
                        info!("Quit requested");
                        break;
                    }
                };

                controller.handle(session_event, Instant::now().into_std()).await;
            }

            _ = ticker.tick() => {
                controller.handle(SessionEvent::Tick, Instant::now().into_std()).await;
            }
        }
    }

    info!("Event loop stopped");
    controller
}
