//! Recording stand-ins for the power gate and notifier

use std::sync::{Arc, Mutex};

use futures::future::BoxFuture;

use super::{Notifier, PowerCall, PowerGate};
use crate::state::view::Notification;

/// Shared, inspectable log of what a double received
#[derive(Debug, Clone)]
pub struct Recorded<T>(Arc<Mutex<Vec<T>>>);

impl<T: Clone> Recorded<T> {
    fn new() -> Self {
        Self(Arc::new(Mutex::new(Vec::new())))
    }

    fn push(&self, item: T) {
        self.0.lock().unwrap().push(item);
    }

    pub fn snapshot(&self) -> Vec<T> {
        self.0.lock().unwrap().clone()
    }
}

pub struct RecordingGate {
    calls: Recorded<PowerCall>,
}

impl RecordingGate {
    pub fn new() -> (Self, Recorded<PowerCall>) {
        let calls = Recorded::new();
        (Self { calls: calls.clone() }, calls)
    }
}

impl PowerGate for RecordingGate {
    fn allow_sleep(&mut self) {
        self.calls.push(PowerCall::AllowSleep);
    }

    fn prevent_sleep(&mut self) {
        self.calls.push(PowerCall::PreventSleep);
    }
}

pub struct RecordingNotifier {
    sent: Recorded<Notification>,
    fail: bool,
}

impl RecordingNotifier {
    pub fn new() -> (Self, Recorded<Notification>) {
        let sent = Recorded::new();
        (Self { sent: sent.clone(), fail: false }, sent)
    }

    pub fn failing() -> (Self, Recorded<Notification>) {
        let (mut notifier, sent) = Self::new();
        notifier.fail = true;
        (notifier, sent)
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) -> BoxFuture<'static, Result<(), String>> {
        self.sent.push(notification);
        let fail = self.fail;
        Box::pin(async move {
            if fail {
                Err("notification daemon unavailable".to_string())
            } else {
                Ok(())
            }
        })
    }
}
