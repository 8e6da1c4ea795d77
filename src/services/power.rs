//! Power gate: the only place that asks the OS to allow or prevent sleep

use std::thread::{self, ThreadId};
use tracing::{debug, error, info, warn};

/// Requests sleep-allowed / sleep-prevented state from the operating system.
///
/// Implementations are created on, and only ever called from, the command
/// serializer's worker thread, so they do not need to be `Send`.
pub trait PowerGate {
    fn allow_sleep(&mut self);
    fn prevent_sleep(&mut self);
}

/// A request issued against the power gate, used for logging and test doubles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerCall {
    AllowSleep,
    PreventSleep,
}

/// `keepawake`-backed gate holding the OS assertion while sleep is prevented
pub struct SystemPowerGate {
    owner: ThreadId,
    guard: Option<keepawake::KeepAwake>,
}

impl SystemPowerGate {
    /// Bind the gate to the calling thread
    pub fn new() -> Self {
        let owner = thread::current().id();
        debug!("Power gate bound to thread {:?}", owner);
        Self { owner, guard: None }
    }

    fn on_owner_thread(&self, call: PowerCall) -> bool {
        let current = thread::current().id();
        if current != self.owner {
            error!(
                "Power gate {:?} issued from thread {:?}, owner is {:?}; ignoring",
                call, current, self.owner
            );
            return false;
        }
        true
    }
}

impl Default for SystemPowerGate {
    fn default() -> Self {
        Self::new()
    }
}

impl PowerGate for SystemPowerGate {
    fn allow_sleep(&mut self) {
        if !self.on_owner_thread(PowerCall::AllowSleep) {
            return;
        }
        if self.guard.take().is_some() {
            info!("Released keep-awake lock, sleep allowed");
        } else {
            debug!("Sleep already allowed");
        }
    }

    fn prevent_sleep(&mut self) {
        if !self.on_owner_thread(PowerCall::PreventSleep) {
            return;
        }
        if self.guard.is_some() {
            debug!("Keep-awake lock already held");
            return;
        }

        // Best effort: a missing power manager only means the system may still sleep
        match keepawake::Builder::default()
            .display(true)
            .idle(true)
            .sleep(true)
            .reason("Espresso session active")
            .app_name("Espresso")
            .app_reverse_domain("io.github.espresso")
            .create()
        {
            Ok(guard) => {
                self.guard = Some(guard);
                info!("Acquired keep-awake lock, sleep prevented");
            }
            Err(e) => warn!("Failed to prevent sleep: {}", e),
        }
    }
}
