//! Espresso - keep your screen on and your system active
//! 
//! This library provides the session state machine that holds an OS-level
//! "stay awake" lock for a chosen brew time, the command serializer that
//! keeps every power request on one thread, and the control surface that
//! stands in for the tray menu.

pub mod config;
pub mod settings;
pub mod state;
pub mod api;
pub mod services;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::{AppPaths, Config};
pub use state::{AppState, SessionController};
pub use api::create_router;
pub use tasks::{run_event_loop, CommandSerializer, TrayEvent};
pub use utils::signals::shutdown_signal;
