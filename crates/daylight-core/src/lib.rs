//! Game clock, day/night sync, and time-of-day tone resolution.
//!
//! The clock is the single owner of the persisted minute count. Every
//! time it moves, it mirrors the new instant into the host's day/night
//! switches and day/hour/minute variables, then notifies its listener so
//! the screen can re-tint.
//!
//! # Modules
//!
//! - [`clock`] -- [`GameClock`] and the [`TimeListener`] hook.
//! - [`command`] -- `advance`/`forward`/`set`/`reset` text commands.
//! - [`config`] -- Configuration loading from `daylight-config.yaml`.
//! - [`guard`] -- Protection for the reserved day/night switches.
//! - [`host`] -- The [`HostState`] seam and an in-memory host.
//! - [`lighting`] -- Keyword and dawn/dusk tone resolution.
//! - [`note`] -- `<lighting: ...>` and `<tone: ...>` map tags.
//! - [`parse`] -- Parsers for clock times, durations, and tones.
//!
//! [`GameClock`]: clock::GameClock
//! [`TimeListener`]: clock::TimeListener
//! [`HostState`]: host::HostState

pub mod clock;
pub mod command;
pub mod config;
pub mod guard;
pub mod host;
pub mod lighting;
pub mod note;
pub mod parse;
