//! Host-owned state cells the clock reads and writes.
//!
//! The host game owns persistence. The clock only sees a handful of
//! cells through [`HostState`]:
//!
//! - one integer slot holding the canonical minute count (saved and
//!   loaded with the rest of the host's game state);
//! - two boolean switches, daytime and night, always complementary;
//! - three integer variables mirroring days, hour, and minute.
//!
//! [`SyncTargets`] names which switch and variable cells receive the
//! derived values. Unset targets are simply not written.

use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;

/// Identifier of a host boolean switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(transparent)]
pub struct SwitchId(pub u32);

impl fmt::Display for SwitchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:04}", self.0)
    }
}

/// Identifier of a host integer variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(transparent)]
pub struct VariableId(pub u32);

impl fmt::Display for VariableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:04}", self.0)
    }
}

/// The host cells the clock depends on.
///
/// Implemented by the host game (or [`MemoryHost`] in tests and the demo
/// engine). None of these calls may fail: a host that cannot store a value
/// has bigger problems than the clock.
pub trait HostState {
    /// Read the persisted minute count.
    fn stored_minutes(&self) -> i64;

    /// Overwrite the persisted minute count.
    fn store_minutes(&mut self, minutes: i64);

    /// Read a boolean switch. Unknown switches read as `false`.
    fn switch(&self, id: SwitchId) -> bool;

    /// Write a boolean switch.
    fn write_switch(&mut self, id: SwitchId, value: bool);

    /// Read an integer variable. Unknown variables read as `0`.
    fn variable(&self, id: VariableId) -> i64;

    /// Write an integer variable.
    fn write_variable(&mut self, id: VariableId, value: i64);
}

/// Which host cells receive the values derived on every clock change.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct SyncTargets {
    /// Switch set while it is daytime.
    #[serde(default)]
    pub daytime_switch: Option<SwitchId>,

    /// Switch set while it is night.
    #[serde(default)]
    pub night_switch: Option<SwitchId>,

    /// Variable receiving the day count.
    #[serde(default)]
    pub days_variable: Option<VariableId>,

    /// Variable receiving the hour of day.
    #[serde(default)]
    pub hour_variable: Option<VariableId>,

    /// Variable receiving the minute of hour.
    #[serde(default)]
    pub minute_variable: Option<VariableId>,
}

impl SyncTargets {
    /// The switches only the clock may write.
    pub fn reserved_switches(&self) -> impl Iterator<Item = SwitchId> {
        self.daytime_switch.into_iter().chain(self.night_switch)
    }

    /// Whether `id` is one of the reserved switches.
    pub fn is_reserved(&self, id: SwitchId) -> bool {
        self.daytime_switch == Some(id) || self.night_switch == Some(id)
    }
}

/// In-memory [`HostState`] for tests and the demo engine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryHost {
    minutes: i64,
    switches: BTreeMap<SwitchId, bool>,
    variables: BTreeMap<VariableId, i64>,
}

impl MemoryHost {
    /// An empty host at minute zero.
    pub const fn new() -> Self {
        Self {
            minutes: 0,
            switches: BTreeMap::new(),
            variables: BTreeMap::new(),
        }
    }

    /// A host whose persisted slot already holds `minutes`, as after
    /// loading a save.
    pub const fn with_minutes(minutes: i64) -> Self {
        Self {
            minutes,
            switches: BTreeMap::new(),
            variables: BTreeMap::new(),
        }
    }
}

impl HostState for MemoryHost {
    fn stored_minutes(&self) -> i64 {
        self.minutes
    }

    fn store_minutes(&mut self, minutes: i64) {
        self.minutes = minutes;
    }

    fn switch(&self, id: SwitchId) -> bool {
        self.switches.get(&id).copied().unwrap_or(false)
    }

    fn write_switch(&mut self, id: SwitchId, value: bool) {
        self.switches.insert(id, value);
    }

    fn variable(&self, id: VariableId) -> i64 {
        self.variables.get(&id).copied().unwrap_or(0)
    }

    fn write_variable(&mut self, id: VariableId, value: i64) {
        self.variables.insert(id, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_host_defaults() {
        let host = MemoryHost::new();
        assert_eq!(host.stored_minutes(), 0);
        assert!(!host.switch(SwitchId(1)));
        assert_eq!(host.variable(VariableId(1)), 0);
    }

    #[test]
    fn memory_host_round_trips_cells() {
        let mut host = MemoryHost::with_minutes(90);
        assert_eq!(host.stored_minutes(), 90);
        host.write_switch(SwitchId(3), true);
        host.write_variable(VariableId(4), -7);
        assert!(host.switch(SwitchId(3)));
        assert_eq!(host.variable(VariableId(4)), -7);
    }

    #[test]
    fn reserved_switches_skip_unset_targets() {
        let targets = SyncTargets {
            night_switch: Some(SwitchId(2)),
            ..SyncTargets::default()
        };
        assert_eq!(targets.reserved_switches().collect::<Vec<_>>(), vec![SwitchId(2)]);
        assert!(targets.is_reserved(SwitchId(2)));
        assert!(!targets.is_reserved(SwitchId(1)));
    }

    #[test]
    fn ids_display_zero_padded() {
        assert_eq!(SwitchId(7).to_string(), "#0007");
        assert_eq!(VariableId(12).to_string(), "#0012");
    }
}
