//! Presentation types handed to the tray surface and the notifier

use serde::{Deserialize, Serialize};

use super::modes::{format_friendly_duration, Mode};

/// Which of the two bundled icons to show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IconVariant {
    #[serde(rename = "icon-awake")]
    Awake,
    #[serde(rename = "icon-decaf")]
    Decaf,
}

/// Everything the tray needs to render the current session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrayView {
    pub icon: IconVariant,
    pub tooltip: String,
    pub mode_label: String,
    /// `None` hides the countdown line
    pub countdown: Option<String>,
}

impl TrayView {
    pub fn decaf() -> Self {
        Self {
            icon: IconVariant::Decaf,
            tooltip: "Espresso: Decaf (Sleep allowed)".to_string(),
            mode_label: "Mode: Decaf".to_string(),
            countdown: None,
        }
    }

    pub fn infinite(mode: &str) -> Self {
        Self {
            icon: IconVariant::Awake,
            tooltip: "Espresso: Caffeine High (No Sleep)".to_string(),
            mode_label: format!("Mode: {} (Infinite)", mode),
            countdown: None,
        }
    }

    pub fn timed(mode: &str, friendly: &str, countdown: &str) -> Self {
        let mut view = Self {
            icon: IconVariant::Awake,
            tooltip: String::new(),
            mode_label: format!("Mode: {} ({})", mode, friendly),
            countdown: None,
        };
        view.set_countdown(mode, countdown);
        view
    }

    /// Refresh the countdown line and tooltip, leaving the mode label alone
    pub fn set_countdown(&mut self, mode: &str, countdown: &str) {
        self.tooltip = format!("{} mode: {} remaining", mode, countdown);
        self.countdown = Some(format!("Time left: {}", countdown));
    }

    pub fn is_awake(&self) -> bool {
        self.icon == IconVariant::Awake
    }
}

impl Default for TrayView {
    fn default() -> Self {
        Self::decaf()
    }
}

/// A fire-and-forget desktop notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub body: String,
    pub icon: IconVariant,
}

impl Notification {
    pub fn new(title: impl Into<String>, body: impl Into<String>, icon: IconVariant) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            icon,
        }
    }

    pub fn stopped() -> Self {
        Self::new("Espresso Stopped", "System is now allowed to sleep", IconVariant::Decaf)
    }

    pub fn finished() -> Self {
        Self::new("Espresso Finished", "System is now allowed to sleep", IconVariant::Decaf)
    }
}

/// One clickable preset line in the menu
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuEntry {
    pub index: usize,
    pub label: String,
    pub description: String,
}

/// Menu lines for the presets, in menu order
pub fn menu_entries(modes: &[Mode]) -> Vec<MenuEntry> {
    modes
        .iter()
        .enumerate()
        .map(|(index, mode)| MenuEntry {
            index,
            label: format!("{} ({})", mode.name, format_friendly_duration(mode.length)),
            description: mode.description.to_string(),
        })
        .collect()
}
