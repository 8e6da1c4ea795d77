//! Desktop notifications, fired and forgotten

use std::{path::PathBuf, sync::Arc};

use futures::future::BoxFuture;
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::state::view::{IconVariant, Notification};

/// Shows a notification to the user. Failures are reported, never retried.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification) -> BoxFuture<'static, Result<(), String>>;
}

/// On-disk locations of the two icon variants
#[derive(Debug, Clone)]
pub struct IconPaths {
    pub awake: PathBuf,
    pub decaf: PathBuf,
}

impl IconPaths {
    pub fn resolve(&self, icon: IconVariant) -> &PathBuf {
        match icon {
            IconVariant::Awake => &self.awake,
            IconVariant::Decaf => &self.decaf,
        }
    }
}

/// Shows notifications through `notify-send`
#[derive(Debug, Clone)]
pub struct CommandNotifier {
    icons: IconPaths,
}

impl CommandNotifier {
    pub fn new(icons: IconPaths) -> Self {
        Self { icons }
    }
}

impl Notifier for CommandNotifier {
    fn notify(&self, notification: Notification) -> BoxFuture<'static, Result<(), String>> {
        let icon = self.icons.resolve(notification.icon).clone();
        Box::pin(async move {
            debug!("Showing notification: {}", notification.title);

            let output = Command::new("notify-send")
                .arg("--app-name=Espresso")
                .arg(format!("--icon={}", icon.display()))
                .arg(&notification.title)
                .arg(&notification.body)
                .output()
                .await
                .map_err(|e| format!("Failed to execute notify-send: {}", e))?;

            if !output.status.success() {
                let stderr = String::from_utf8_lossy(&output.stderr);
                return Err(format!("notify-send failed: {}", stderr));
            }
            Ok(())
        })
    }
}

/// Fallback when no notification daemon is reachable: the log is the notification
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: Notification) -> BoxFuture<'static, Result<(), String>> {
        info!("{}: {}", notification.title, notification.body.replace('\n', " / "));
        Box::pin(async { Ok(()) })
    }
}

/// Check if notify-send is available on the system
pub async fn check_notify_send_available() -> Result<(), String> {
    Command::new("notify-send")
        .arg("--version")
        .output()
        .await
        .map_err(|_| "notify-send is not available, notifications go to the log".to_string())?;

    info!("notify-send is available");
    Ok(())
}

/// Pick the best notifier this system supports
pub async fn select_notifier(icons: IconPaths) -> Arc<dyn Notifier> {
    match check_notify_send_available().await {
        Ok(()) => Arc::new(CommandNotifier::new(icons)),
        Err(e) => {
            warn!("{}", e);
            Arc::new(LogNotifier)
        }
    }
}

/// Show `notification` on a detached task; a failure is only logged.
///
/// Must be called from within the tokio runtime.
pub fn notify_detached(notifier: &Arc<dyn Notifier>, notification: Notification) {
    let title = notification.title.clone();
    let pending = notifier.notify(notification);
    tokio::spawn(async move {
        if let Err(e) = pending.await {
            warn!("Failed to show notification '{}': {}", title, e);
        }
    });
}
