//! Text commands that drive the clock.
//!
//! Event scripts on the host side change time through short commands:
//!
//! | Command                  | Effect                                      |
//! |--------------------------|---------------------------------------------|
//! | `advance 2h 30m`         | add a duration                              |
//! | `forward 8:00 PM`        | move to the next 8 PM (never backward)      |
//! | `set 3 6:00 AM`          | jump to day 3 at 6 AM                       |
//! | `set 6:00 AM`            | jump to 6 AM on the current day             |
//! | `reset`                  | back to the new-game start time on day 0    |
//!
//! Verbs are case-insensitive. An `advance` whose text holds no usable
//! `d`/`h`/`m` token is rejected rather than treated as a no-op.

use core::fmt;
use core::str::FromStr;

use daylight_types::{GameDuration, GameTime};
use tracing::info;

use crate::clock::GameClock;
use crate::host::HostState;
use crate::parse::{ParseError, parse_duration, parse_time_of_day};

/// A parsed clock command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockCommand {
    /// Add a duration to the current instant.
    Advance(GameDuration),
    /// Move forward to the next occurrence of a time of day.
    Forward(GameTime),
    /// Jump to a time of day on a given day (`None` = the current day).
    Set {
        /// Target day, or the current day when absent.
        day: Option<i64>,
        /// Target time of day.
        time: GameTime,
    },
    /// Zero the clock and fast-forward to the start time.
    Reset,
}

impl ClockCommand {
    /// Apply this command to `clock`.
    pub fn apply<H: HostState>(self, clock: &mut GameClock<H>) {
        info!(command = %self, from = %clock.now(), "Applying clock command");
        match self {
            Self::Advance(duration) => clock.advance(duration),
            Self::Forward(time) => clock.forward_to(time),
            Self::Set { day, time } => {
                let day = day.unwrap_or_else(|| clock.now().days());
                clock.set_to(GameTime::from_parts(day, 0, time.minute_of_day()));
            }
            Self::Reset => clock.reset(),
        }
    }
}

impl FromStr for ClockCommand {
    type Err = ParseError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| ParseError::Command {
            input: text.to_owned(),
            reason: reason.to_owned(),
        };

        let trimmed = text.trim();
        let (verb, args) = trimmed
            .split_once(char::is_whitespace)
            .map_or((trimmed, ""), |(verb, args)| (verb, args.trim()));

        match verb.to_ascii_lowercase().as_str() {
            "advance" => {
                if args.is_empty() {
                    return Err(invalid("advance needs a duration such as 2h 30m"));
                }
                let duration = parse_duration(args)?;
                if duration == GameDuration::ZERO {
                    return Err(invalid("advance needs a non-zero duration such as 2h 30m"));
                }
                Ok(Self::Advance(duration))
            }
            "forward" => Ok(Self::Forward(parse_time_of_day(args)?)),
            "set" => {
                let (first, rest) = args
                    .split_once(char::is_whitespace)
                    .map_or((args, ""), |(first, rest)| (first, rest.trim()));
                match first.parse::<i64>() {
                    Ok(day) if day >= 0 => Ok(Self::Set {
                        day: Some(day),
                        time: parse_time_of_day(rest)?,
                    }),
                    Ok(_) => Err(invalid("day must not be negative")),
                    Err(_) => Ok(Self::Set {
                        day: None,
                        time: parse_time_of_day(args)?,
                    }),
                }
            }
            "reset" if args.is_empty() => Ok(Self::Reset),
            "reset" => Err(invalid("reset takes no arguments")),
            "" => Err(invalid("empty command")),
            _ => Err(invalid("unknown verb; expected advance, forward, set, or reset")),
        }
    }
}

impl fmt::Display for ClockCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Advance(duration) => write!(f, "advance {}m", duration.total_minutes()),
            Self::Forward(time) => write!(f, "forward {time}"),
            Self::Set { day: Some(day), time } => write!(f, "set {day} {time}"),
            Self::Set { day: None, time } => write!(f, "set {time}"),
            Self::Reset => f.write_str("reset"),
        }
    }
}
