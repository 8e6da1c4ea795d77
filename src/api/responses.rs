//! API response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::{MenuEntry, TrayView};

/// API response structure for click endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    /// Tray view at the time the click was forwarded
    pub view: TrayView,
}

impl ApiResponse {
    /// Create a new API response
    pub fn new(status: String, message: String, view: TrayView) -> Self {
        Self {
            status,
            message,
            timestamp: Utc::now(),
            view,
        }
    }

    /// The click was handed to the event loop
    pub fn accepted(message: String, view: TrayView) -> Self {
        Self::new("accepted".to_string(), message, view)
    }
}

/// The tray menu as the control surface renders it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuResponse {
    pub presets: Vec<MenuEntry>,
    pub stop_label: String,
    pub about_label: String,
    pub quit_label: String,
}

/// Status response with the current tray view
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub active: bool,
    pub view: TrayView,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AboutResponse {
    pub title: String,
    pub message: String,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
