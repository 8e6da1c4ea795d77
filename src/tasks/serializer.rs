//! Command serializer: runs power gate actions one at a time on a dedicated thread

use std::{sync::Arc, thread};
use tokio::sync::{mpsc, oneshot, Mutex};
use tracing::{debug, error, info};

use crate::services::{PowerCall, PowerGate};

/// Name of the thread that owns the power gate
pub const POWER_THREAD_NAME: &str = "power-gate";

const CLOSED: &str = "command serializer is closed";

type Action = Box<dyn FnOnce(&mut dyn PowerGate) + Send>;

enum Message {
    Run {
        action: Action,
        done: oneshot::Sender<()>,
    },
    Close,
}

/// FIFO, single-consumer queue in front of the power gate.
///
/// Cloning yields another submitter for the same worker thread. Every action
/// runs to completion on that thread before the next one starts.
#[derive(Debug, Clone)]
pub struct CommandSerializer {
    tx: mpsc::UnboundedSender<Message>,
    worker: Arc<Mutex<Option<thread::JoinHandle<()>>>>,
}

impl CommandSerializer {
    /// Spawn the worker thread and build the gate on it with `factory`
    pub fn spawn<G, F>(factory: F) -> Result<Self, String>
    where
        F: FnOnce() -> G + Send + 'static,
        G: PowerGate + 'static,
    {
        let (tx, mut rx) = mpsc::unbounded_channel::<Message>();

        let handle = thread::Builder::new()
            .name(POWER_THREAD_NAME.to_string())
            .spawn(move || {
                let mut owned = factory();
                let gate: &mut dyn PowerGate = &mut owned;
                info!("Power gate thread started");

                while let Some(message) = rx.blocking_recv() {
                    match message {
                        Message::Run { action, done } => {
                            action(&mut *gate);
                            // The submitter may have given up waiting
                            let _ = done.send(());
                        }
                        Message::Close => break,
                    }
                }

                info!("Power gate thread stopped");
            })
            .map_err(|e| format!("Failed to spawn power gate thread: {}", e))?;

        Ok(Self {
            tx,
            worker: Arc::new(Mutex::new(Some(handle))),
        })
    }

    fn enqueue(&self, action: Action) -> Result<oneshot::Receiver<()>, String> {
        let (done, done_rx) = oneshot::channel();
        self.tx
            .send(Message::Run { action, done })
            .map_err(|_| CLOSED.to_string())?;
        Ok(done_rx)
    }

    /// Queue `action` and wait until it has run on the power gate thread
    pub async fn submit<F>(&self, action: F) -> Result<(), String>
    where
        F: FnOnce(&mut dyn PowerGate) + Send + 'static,
    {
        let done = self.enqueue(Box::new(action))?;
        done.await.map_err(|_| CLOSED.to_string())
    }

    /// Same as [`submit`](Self::submit) for callers outside the async runtime.
    ///
    /// Panics if called from within an async context.
    pub fn blocking_submit<F>(&self, action: F) -> Result<(), String>
    where
        F: FnOnce(&mut dyn PowerGate) + Send + 'static,
    {
        let done = self.enqueue(Box::new(action))?;
        done.blocking_recv().map_err(|_| CLOSED.to_string())
    }

    /// Issue one power request and wait for it
    pub async fn request(&self, call: PowerCall) -> Result<(), String> {
        debug!("Submitting {:?}", call);
        self.submit(move |gate| match call {
            PowerCall::AllowSleep => gate.allow_sleep(),
            PowerCall::PreventSleep => gate.prevent_sleep(),
        })
        .await
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    /// Stop accepting work, let already queued actions finish and join the thread.
    ///
    /// Concurrent callers all return only after the thread has been joined.
    pub async fn close(&self) {
        if self.tx.send(Message::Close).is_err() {
            debug!("Command serializer already closed");
        }

        // Held across the join so a second caller waits for the first
        let mut worker = self.worker.lock().await;
        let Some(handle) = worker.take() else {
            return;
        };

        match tokio::task::spawn_blocking(move || handle.join()).await {
            Ok(Ok(())) => info!("Command serializer closed"),
            Ok(Err(_)) => error!("Power gate thread panicked"),
            Err(e) => error!("Failed to join power gate thread: {}", e),
        }
    }
}

impl std::fmt::Debug for Message {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Message::Run { .. } => f.write_str("Run"),
            Message::Close => f.write_str("Close"),
        }
    }
}
