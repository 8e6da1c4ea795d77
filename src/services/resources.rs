//! Bundled files materialized next to the settings

use std::{fs, path::Path};
use tracing::{debug, warn};

use crate::config::AppPaths;
use crate::services::IconPaths;

const LICENSE: &[u8] = include_bytes!("../../LICENSE");
const AWAKE_ICON: &[u8] = include_bytes!("../../assets/espresso.svg");
const DECAF_ICON: &[u8] = include_bytes!("../../assets/espressoff.svg");

/// Write `contents` to `path` unless the file already holds exactly those bytes
pub fn ensure_file(path: &Path, contents: &[u8]) -> Result<bool, String> {
    if let Ok(existing) = fs::read(path) {
        if existing == contents {
            return Ok(false);
        }
    }

    fs::write(path, contents)
        .map_err(|e| format!("Failed to write {}: {}", path.display(), e))?;
    Ok(true)
}

/// Make sure the license and both icons exist on disk. Failures are only logged.
pub fn ensure_resource_files(paths: &AppPaths) {
    let files = [
        (paths.license_file(), LICENSE),
        (paths.awake_icon(), AWAKE_ICON),
        (paths.decaf_icon(), DECAF_ICON),
    ];

    for (path, contents) in files {
        match ensure_file(&path, contents) {
            Ok(true) => debug!("Wrote {}", path.display()),
            Ok(false) => {}
            Err(e) => warn!("{}", e),
        }
    }
}

/// Icon variants resolved to their materialized files
pub fn icon_paths(paths: &AppPaths) -> IconPaths {
    IconPaths {
        awake: paths.awake_icon(),
        decaf: paths.decaf_icon(),
    }
}

/// Text for the "About Espresso" request
pub fn about_message(paths: &AppPaths) -> String {
    format!(
        "Espresso - A lightweight utility to keep your screen on and your system active.\n\n\
         This program is free software, distributed under the MIT license WITHOUT ANY WARRANTY.\n\n\
         You can find the full license text in:\n{}\n\n\
         Licenses of the Rust crates it is built from are not bundled; \
         see each crate's page on crates.io.",
        paths.license_file().display()
    )
}
