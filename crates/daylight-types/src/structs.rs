//! Snapshot structs handed to host observers.

use core::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::time::{DayBounds, GameTime};

/// A point-in-time view of the clock, in the shape the host's switch and
/// variable cells receive it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ClockSnapshot {
    /// Canonical minute count since world start.
    pub total_minutes: i64,
    /// Whole days elapsed.
    pub days: i64,
    /// Hour of the day, 0-23.
    pub hour: i64,
    /// Minute of the hour, 0-59.
    pub minute: i64,
    /// Whether the instant falls inside the daytime window.
    pub daytime: bool,
}

impl ClockSnapshot {
    /// Capture the derived fields of `now` against the given bounds.
    pub const fn capture(now: GameTime, bounds: &DayBounds) -> Self {
        Self {
            total_minutes: now.total_minutes(),
            days: now.days(),
            hour: now.hour(),
            minute: now.minute(),
            daytime: now.is_daytime(bounds),
        }
    }

    /// The night flag, always the complement of `daytime`.
    pub const fn night(&self) -> bool {
        !self.daytime
    }
}

impl fmt::Display for ClockSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "day {} {:02}:{:02} ({})",
            self.days,
            self.hour,
            self.minute,
            if self.daytime { "day" } else { "night" }
        )
    }
}
