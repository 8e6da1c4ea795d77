//! User settings persisted as JSON

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub const DEFAULT_LANGUAGE: &str = "en-US";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub language: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            language: DEFAULT_LANGUAGE.to_string(),
        }
    }
}

/// Load settings, falling back to (and writing back) defaults.
///
/// A missing or unreadable file yields the defaults; an empty language is
/// replaced with the default. Write failures are logged and ignored.
pub fn load_settings(path: &Path) -> Settings {
    let parsed = fs::read_to_string(path)
        .map_err(|e| e.to_string())
        .and_then(|data| serde_json::from_str::<Settings>(&data).map_err(|e| e.to_string()));

    let (settings, needs_save) = match parsed {
        Ok(mut settings) => {
            let fixed = settings.language.is_empty();
            if fixed {
                settings.language = DEFAULT_LANGUAGE.to_string();
            }
            (settings, fixed)
        }
        Err(e) => {
            debug!("Using default settings ({})", e);
            (Settings::default(), true)
        }
    };

    if needs_save {
        if let Err(e) = save_settings(path, &settings) {
            warn!("{}", e);
        }
    }
    settings
}

/// Write settings as pretty-printed JSON
pub fn save_settings(path: &Path, settings: &Settings) -> Result<(), String> {
    let data = serde_json::to_string_pretty(settings)
        .map_err(|e| format!("Failed to serialize settings: {}", e))?;
    fs::write(path, data).map_err(|e| format!("Failed to write {}: {}", path.display(), e))
}
