//! Shared value types for the Daylight time-of-day engine.
//!
//! This crate is the single source of truth for the values that cross
//! the boundary between the clock core and the host game. Types defined
//! here flow downstream to `TypeScript` via `ts-rs` for host bindings.
//!
//! # Modules
//!
//! - [`time`] -- [`GameTime`], the integer-minute instant/duration, and
//!   the [`DayBounds`] used for the daytime test
//! - [`tone`] -- [`Tone`], the four-channel screen tint
//! - [`enums`] -- [`DayPhase`] lighting phases
//! - [`structs`] -- [`ClockSnapshot`] handed to host observers

pub mod enums;
pub mod structs;
pub mod time;
pub mod tone;

// Re-export all public types at crate root for convenience.
pub use enums::DayPhase;
pub use structs::ClockSnapshot;
pub use time::{
    DayBounds, GameDuration, GameTime, HOURS_PER_DAY, MINUTES_PER_DAY, MINUTES_PER_HOUR,
};
pub use tone::Tone;

#[cfg(test)]
mod tests {
    //! Binding generation for host-facing types.

    #[test]
    fn export_bindings() {
        // ts-rs writes TypeScript bindings for types with #[ts(export)]
        // into `bindings/` relative to the crate root.
        use ts_rs::TS;

        let _ = crate::time::GameTime::export_all();
        let _ = crate::tone::Tone::export_all();
        let _ = crate::enums::DayPhase::export_all();
        let _ = crate::structs::ClockSnapshot::export_all();
    }
}
