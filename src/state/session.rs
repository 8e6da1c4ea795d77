//! Session model: what the keep-awake lock is doing right now

use std::time::Instant;

/// Mode label shown while no session is active
pub const DECAF_LABEL: &str = "Decaf";

/// The one live session. Replaced wholesale on every transition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Session {
    /// No lock held, sleep allowed
    #[default]
    Decaf,
    /// Lock held until `ends_at`
    Timed { mode: String, ends_at: Instant },
    /// Lock held until stopped
    Infinite { mode: String },
}

impl Session {
    pub fn is_active(&self) -> bool {
        !matches!(self, Session::Decaf)
    }

    pub fn is_infinite(&self) -> bool {
        matches!(self, Session::Infinite { .. })
    }

    /// End time, only meaningful for timed sessions
    pub fn end_time(&self) -> Option<Instant> {
        match self {
            Session::Timed { ends_at, .. } => Some(*ends_at),
            _ => None,
        }
    }

    /// Display label for the active preset, or the decaf label
    pub fn mode_name(&self) -> &str {
        match self {
            Session::Decaf => DECAF_LABEL,
            Session::Timed { mode, .. } | Session::Infinite { mode } => mode,
        }
    }
}
