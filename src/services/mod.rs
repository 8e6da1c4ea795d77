//! External collaborators module
//! 
//! This module contains the OS-facing pieces the session logic drives:
//! the power gate, desktop notifications, bundled resources and the
//! single-instance lock.

pub mod instance;
pub mod notifier;
pub mod power;
pub mod resources;

#[cfg(test)]
pub(crate) mod doubles;

// Re-export main types
pub use instance::{acquire_single_instance, InstanceGuard};
pub use notifier::{notify_detached, select_notifier, IconPaths, LogNotifier, Notifier};
pub use power::{PowerCall, PowerGate, SystemPowerGate};
