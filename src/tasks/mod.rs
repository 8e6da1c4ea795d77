//! Background tasks module
//! 
//! This module contains the event loop that owns the session and the
//! command serializer that owns the power gate thread.

pub mod event_loop;
pub mod serializer;

// Re-export main items
pub use event_loop::{run_event_loop, AboutInfo, TrayEvent};
pub use serializer::CommandSerializer;
