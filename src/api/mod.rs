//! HTTP API module
//!
//! The control surface standing in for the tray menu: every endpoint is a
//! click forwarded into the event loop, or a read of the published view.

pub mod handlers;
pub mod responses;

use std::sync::Arc;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/modes", get(modes_handler))
        .route("/modes/:index", post(preset_handler))
        .route("/custom/:minutes", post(custom_handler))
        .route("/stop", post(stop_handler))
        .route("/about", post(about_handler))
        .route("/quit", post(quit_handler))
        .route("/status", get(status_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
