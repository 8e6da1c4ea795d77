//! State management module
//! 
//! This module contains the session model, the presets, the presentation
//! types and the controller that moves between sessions.

pub mod app_state;
pub mod controller;
pub mod modes;
pub mod session;
pub mod view;

// Re-export main types
pub use app_state::AppState;
pub use controller::{SessionController, SessionEvent};
pub use modes::{Mode, SessionLength, MODES};
pub use session::Session;
pub use view::{IconVariant, MenuEntry, Notification, TrayView};
