//! In-universe time as a signed count of minutes.
//!
//! A single minute count is the source of truth for every calendar field.
//! Days, hours, and minutes are derived from it with fixed moduli and are
//! never stored independently:
//!
//! | Field            | Derivation                         | Range     |
//! |------------------|------------------------------------|-----------|
//! | `minute`         | `total mod 60`                     | 0-59      |
//! | `hour`           | `minute_of_day div 60`             | 0-23      |
//! | `minute_of_day`  | `total mod 1440`                   | 0-1439    |
//! | `days`           | `total div 1440`                   | unbounded |
//!
//! Division is Euclidean, so negative counts still produce in-range
//! time-of-day fields. Arithmetic saturates at the `i64` limits.

use core::fmt;
use core::ops::{Add, AddAssign, Sub};

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Minutes in one hour.
pub const MINUTES_PER_HOUR: i64 = 60;

/// Hours in one day.
pub const HOURS_PER_DAY: i64 = 24;

/// Minutes in one day.
pub const MINUTES_PER_DAY: i64 = MINUTES_PER_HOUR.saturating_mul(HOURS_PER_DAY);

/// An in-universe instant or duration, counted in whole minutes.
///
/// The same type serves both roles: an instant is minutes since world
/// start, a duration is minutes to add to an instant. A value parsed from
/// a clock-time string has a day component of zero and is a time-of-day.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[serde(transparent)]
#[ts(export, export_to = "bindings/")]
pub struct GameTime(i64);

/// A [`GameTime`] used as an offset rather than an absolute instant.
pub type GameDuration = GameTime;

impl GameTime {
    /// The world-creation instant (and the empty duration).
    pub const ZERO: Self = Self(0);

    /// Wrap a raw minute count.
    pub const fn from_minutes(minutes: i64) -> Self {
        Self(minutes)
    }

    /// Build a value from day, hour, and minute components.
    ///
    /// Components are not range-checked: `from_parts(0, 25, 0)` is the same
    /// value as `from_parts(1, 1, 0)`.
    pub const fn from_parts(days: i64, hours: i64, minutes: i64) -> Self {
        Self(
            days.saturating_mul(MINUTES_PER_DAY)
                .saturating_add(hours.saturating_mul(MINUTES_PER_HOUR))
                .saturating_add(minutes),
        )
    }

    /// Build a time-of-day value (day component zero).
    pub const fn at(hours: i64, minutes: i64) -> Self {
        Self::from_parts(0, hours, minutes)
    }

    /// Total minute count.
    pub const fn total_minutes(self) -> i64 {
        self.0
    }

    /// Total whole hours (floor).
    pub const fn total_hours(self) -> i64 {
        self.0.div_euclid(MINUTES_PER_HOUR)
    }

    /// Minute of the hour, 0-59.
    pub const fn minute(self) -> i64 {
        self.0.rem_euclid(MINUTES_PER_HOUR)
    }

    /// Hour of the day, 0-23.
    pub const fn hour(self) -> i64 {
        self.minute_of_day().div_euclid(MINUTES_PER_HOUR)
    }

    /// Minute of the day, 0-1439.
    pub const fn minute_of_day(self) -> i64 {
        self.0.rem_euclid(MINUTES_PER_DAY)
    }

    /// Whole days elapsed (floor).
    pub const fn days(self) -> i64 {
        self.0.div_euclid(MINUTES_PER_DAY)
    }

    /// The time-of-day component alone, with the day count dropped.
    pub const fn time_of_day(self) -> Self {
        Self(self.minute_of_day())
    }

    /// Return `self + other` as a new value.
    pub const fn plus(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    /// Return `self - other` as a new value.
    pub const fn minus(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }

    /// The next instant at or after `self` whose time of day equals
    /// `target`'s.
    ///
    /// Only `target`'s minute-of-day is used. When that minute has already
    /// passed today the result rolls into the next day; when it equals the
    /// current minute-of-day the result is `self`. Time never moves
    /// backward through this operation.
    pub const fn forward_to(self, target: Self) -> Self {
        let mut delta = target.minute_of_day().saturating_sub(self.minute_of_day());
        if delta < 0 {
            delta = delta.saturating_add(MINUTES_PER_DAY);
        }
        Self(self.0.saturating_add(delta))
    }

    /// In-place form of [`forward_to`](Self::forward_to).
    pub const fn set_forward_to(&mut self, target: Self) {
        *self = self.forward_to(target);
    }

    /// Whether this instant falls inside the daytime window of `bounds`.
    pub const fn is_daytime(self, bounds: &DayBounds) -> bool {
        bounds.contains(self)
    }
}

impl From<i64> for GameTime {
    fn from(minutes: i64) -> Self {
        Self(minutes)
    }
}

impl From<GameTime> for i64 {
    fn from(time: GameTime) -> Self {
        time.0
    }
}

impl Add for GameTime {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        self.plus(rhs)
    }
}

impl AddAssign for GameTime {
    fn add_assign(&mut self, rhs: Self) {
        *self = self.plus(rhs);
    }
}

impl Sub for GameTime {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        self.minus(rhs)
    }
}

/// Formats the time-of-day component as `HH:MM`.
impl fmt::Display for GameTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

/// The daytime window: `[day_start, night_start)` by minute of day.
///
/// Both boundaries are stored as time-of-day values. When `day_start` is
/// later than `night_start` the window wraps across midnight. Equal
/// boundaries describe an empty window (it is always night).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayBounds {
    day_start: GameTime,
    night_start: GameTime,
}

impl DayBounds {
    /// Create bounds from the first minute of day and the first minute of
    /// night. Day components of the arguments are ignored.
    pub const fn new(day_start: GameTime, night_start: GameTime) -> Self {
        Self {
            day_start: day_start.time_of_day(),
            night_start: night_start.time_of_day(),
        }
    }

    /// First minute of daytime.
    pub const fn day_start(&self) -> GameTime {
        self.day_start
    }

    /// First minute of night.
    pub const fn night_start(&self) -> GameTime {
        self.night_start
    }

    /// Whether `time`'s minute of day lies inside the daytime window.
    pub const fn contains(&self, time: GameTime) -> bool {
        let t = time.minute_of_day();
        let start = self.day_start.total_minutes();
        let end = self.night_start.total_minutes();
        if start <= end {
            start <= t && t < end
        } else {
            t >= start || t < end
        }
    }
}

impl Default for DayBounds {
    fn default() -> Self {
        Self::new(GameTime::at(6, 0), GameTime::at(20, 0))
    }
}
