//! Single-instance enforcement through an exclusive lock file

use std::{
    fs::{File, OpenOptions},
    path::Path,
};

use fs2::FileExt;
use tracing::{debug, info};

/// Held for the life of the process; dropping it releases the lock
#[derive(Debug)]
pub struct InstanceGuard {
    _file: File,
}

/// Try to become the only running instance.
///
/// Returns `Ok(None)` when another process already holds the lock.
pub fn acquire_single_instance(lock_path: &Path) -> Result<Option<InstanceGuard>, String> {
    let file = OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(lock_path)
        .map_err(|e| format!("Failed to open lock file {}: {}", lock_path.display(), e))?;

    match file.try_lock_exclusive() {
        Ok(()) => {
            debug!("Acquired instance lock {}", lock_path.display());
            Ok(Some(InstanceGuard { _file: file }))
        }
        Err(e) => {
            info!("Another instance holds {}: {}", lock_path.display(), e);
            Ok(None)
        }
    }
}
