//! Brew presets and the duration formatting used by the tray

use std::time::Duration;

const HOUR: Duration = Duration::from_secs(3600);

/// Label used when a started length matches no preset
pub const CUSTOM_LABEL: &str = "Custom";

/// How long a session keeps the machine awake
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionLength {
    Timed(Duration),
    Infinite,
}

impl SessionLength {
    pub const fn minutes(minutes: u64) -> Self {
        SessionLength::Timed(Duration::from_secs(minutes * 60))
    }

    pub const fn hours(hours: u64) -> Self {
        SessionLength::Timed(Duration::from_secs(hours * 3600))
    }
}

/// A named, fixed session length offered in the menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mode {
    pub name: &'static str,
    pub length: SessionLength,
    pub description: &'static str,
}

/// Shortest to longest, infinite last
pub static MODES: [Mode; 9] = [
    Mode { name: "Milk", length: SessionLength::minutes(3), description: "No caffeine, just for testing purposes." },
    Mode { name: "Drop", length: SessionLength::minutes(10), description: "Just a drop, almost no caffeine." },
    Mode { name: "Latte", length: SessionLength::minutes(30), description: "Gentle boost to get you started." },
    Mode { name: "Cappuccino", length: SessionLength::hours(1), description: "Noticeable caffeine, perfectly balanced." },
    Mode { name: "Americano", length: SessionLength::hours(3), description: "Stronger, long-lasting alertness." },
    Mode { name: "Espresso", length: SessionLength::hours(6), description: "Concentrated, powerful kick." },
    Mode { name: "Lungo", length: SessionLength::hours(8), description: "Super concentrated, extended energy." },
    Mode { name: "Doppio", length: SessionLength::hours(12), description: "Double espresso, full-on focus all day." },
    Mode { name: "Pure Caffeine", length: SessionLength::Infinite, description: "Maximum alertness, use with caution." },
];

/// First preset whose length matches
pub fn find_mode(modes: &[Mode], length: SessionLength) -> Option<&Mode> {
    modes.iter().find(|mode| mode.length == length)
}

/// Display name for a length: the matching preset, or "Custom"
pub fn mode_name_for(modes: &[Mode], length: SessionLength) -> &'static str {
    find_mode(modes, length).map_or(CUSTOM_LABEL, |mode| mode.name)
}

/// "6h" for whole hours, "90m" otherwise, "Infinity" for the infinite length
pub fn format_friendly_duration(length: SessionLength) -> String {
    match length {
        SessionLength::Infinite => "Infinity".to_string(),
        SessionLength::Timed(d) => {
            let secs = d.as_secs();
            if d >= HOUR && d.as_nanos() % HOUR.as_nanos() == 0 {
                format!("{}h", secs / 3600)
            } else {
                format!("{}m", secs / 60)
            }
        }
    }
}

/// Countdown text, rounded to the nearest second: "1h 1m 1s"
pub fn format_countdown(remaining: Duration) -> String {
    let total = (remaining.as_millis() + 500) / 1000;
    let hours = total / 3600;
    let minutes = (total / 60) % 60;
    let seconds = total % 60;
    format!("{}h {}m {}s", hours, minutes, seconds)
}
