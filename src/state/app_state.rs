//! State shared with the HTTP control surface

use std::{
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};
use chrono::{DateTime, Utc};
use tokio::sync::{mpsc, watch};
use tracing::{info, warn};

use super::{modes::Mode, view::TrayView};
use crate::tasks::event_loop::TrayEvent;

/// How long a click waits for the event loop to publish its new view
pub const VIEW_SETTLE_TIMEOUT: Duration = Duration::from_millis(500);

/// Handles the control surface needs: a way to click, and a way to look.
///
/// Session state itself lives in the event loop; this only forwards clicks
/// and mirrors the published tray view.
#[derive(Debug)]
pub struct AppState {
    /// Click events into the event loop
    pub events_tx: mpsc::Sender<TrayEvent>,
    /// Latest tray view published by the controller
    pub view_rx: watch::Receiver<TrayView>,
    /// Presets offered in the menu
    pub modes: &'static [Mode],
    /// Text returned for the about request
    pub about: String,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Arc<Mutex<Option<String>>>,
    pub last_action_time: Arc<Mutex<Option<DateTime<Utc>>>>,
}

impl AppState {
    pub fn new(
        events_tx: mpsc::Sender<TrayEvent>,
        view_rx: watch::Receiver<TrayView>,
        modes: &'static [Mode],
        about: String,
        port: u16,
        host: String,
    ) -> Self {
        Self {
            events_tx,
            view_rx,
            modes,
            about,
            start_time: Instant::now(),
            port,
            host,
            last_action: Arc::new(Mutex::new(None)),
            last_action_time: Arc::new(Mutex::new(None)),
        }
    }

    /// Forward a click to the event loop and record it as the last action
    pub async fn click(&self, action: &str, event: TrayEvent) -> Result<(), String> {
        self.events_tx
            .send(event)
            .await
            .map_err(|_| "Event loop is not running".to_string())?;

        info!("Forwarded {} click", action);
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        } else {
            warn!("Failed to record last action");
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
        Ok(())
    }

    /// Forward a session-changing click and return the view it produced.
    ///
    /// Falls back to the latest view if nothing is published in time.
    pub async fn click_and_wait(&self, action: &str, event: TrayEvent) -> Result<TrayView, String> {
        let mut view_rx = self.view_rx.clone();
        view_rx.mark_unchanged();

        self.click(action, event).await?;

        match tokio::time::timeout(VIEW_SETTLE_TIMEOUT, view_rx.changed()).await {
            Ok(Ok(())) => {}
            Ok(Err(_)) => warn!("Tray view publisher is gone"),
            Err(_) => warn!("No tray view published within {:?} of {} click", VIEW_SETTLE_TIMEOUT, action),
        }
        let view = view_rx.borrow_and_update().clone();
        Ok(view)
    }

    /// Current tray view
    pub fn current_view(&self) -> TrayView {
        self.view_rx.borrow().clone()
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}
