//! Enumeration types shared between the clock core and the host.

use core::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Lighting phases
// ---------------------------------------------------------------------------

/// The lighting phase an outdoor map is in at a given minute of day.
///
/// Phases are derived from the dawn and dusk windows of the lighting
/// configuration, not from the daytime switch boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum DayPhase {
    /// Before dawn starts or after dusk ends.
    Night,
    /// Stepping through the dawn phase sequence.
    Dawn,
    /// Between the end of dawn and the start of dusk.
    Day,
    /// Stepping through the dusk phase sequence.
    Dusk,
}

impl DayPhase {
    /// Lowercase name used in logs and host bindings.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Night => "night",
            Self::Dawn => "dawn",
            Self::Day => "day",
            Self::Dusk => "dusk",
        }
    }
}

impl fmt::Display for DayPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
