//! The game clock controller.
//!
//! The clock is the single writer of in-universe time. The canonical
//! minute count lives in the host's persisted slot (so it survives save
//! and load), but only [`GameClock`] writes it.
//!
//! # Change protocol
//!
//! Every change ([`set_to`], [`advance`], [`reset`]) runs the same steps,
//! in order, before returning:
//!
//! 1. Write the new minute count to the persisted slot.
//! 2. Sync: inside a guarded section, write the daytime/night switches and
//!    the days/hour/minute variables.
//! 3. Close the guarded section.
//! 4. Notify the [`TimeListener`].
//!
//! The listener therefore runs with the guard closed and is itself subject
//! to reserved-switch protection.
//!
//! [`set_to`]: GameClock::set_to
//! [`advance`]: GameClock::advance
//! [`reset`]: GameClock::reset

use daylight_types::{ClockSnapshot, DayBounds, GameDuration, GameTime};
use tracing::{debug, info};

use crate::guard::ReservedAccess;
use crate::host::HostState;

/// Receives a notification after every clock change.
///
/// The map/rendering collaborator implements this to re-resolve and
/// re-apply the screen tint.
pub trait TimeListener {
    /// Called once per change, after the sync step, with the new instant.
    fn on_time_changed(&mut self, now: GameTime);
}

/// A listener that ignores every change.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpListener;

impl TimeListener for NoOpListener {
    fn on_time_changed(&mut self, _now: GameTime) {}
}

/// Clock parameters fixed at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockSettings {
    /// Daytime window used for the day/night switches.
    pub bounds: DayBounds,
    /// Time of day a new game (or a reset) starts at.
    pub start_time: GameTime,
}

impl Default for ClockSettings {
    fn default() -> Self {
        Self {
            bounds: DayBounds::default(),
            start_time: GameTime::at(8, 0),
        }
    }
}

/// The clock controller.
pub struct GameClock<H: HostState> {
    settings: ClockSettings,
    access: ReservedAccess<H>,
    listener: Box<dyn TimeListener>,
}

impl<H: HostState> GameClock<H> {
    /// Create a clock over the host slot held by `access`.
    ///
    /// The current instant is whatever the persisted slot already holds:
    /// zero for a fresh world, the saved value after a load. No sync runs
    /// until the first change or [`refresh`](Self::refresh).
    pub fn new(
        settings: ClockSettings,
        access: ReservedAccess<H>,
        listener: Box<dyn TimeListener>,
    ) -> Self {
        Self {
            settings,
            access,
            listener,
        }
    }

    /// The canonical current instant.
    pub fn now(&self) -> GameTime {
        GameTime::from_minutes(self.access.load_minutes())
    }

    /// The settings this clock was built with.
    pub const fn settings(&self) -> &ClockSettings {
        &self.settings
    }

    /// Whether the current instant is inside the daytime window.
    pub fn is_daytime(&self) -> bool {
        self.now().is_daytime(&self.settings.bounds)
    }

    /// The derived fields of the current instant.
    pub fn snapshot(&self) -> ClockSnapshot {
        ClockSnapshot::capture(self.now(), &self.settings.bounds)
    }

    /// Replace the current instant with `instant`.
    ///
    /// Any value is accepted, including one earlier than the current
    /// instant. Callers wanting "the next occurrence of a time of day"
    /// should use [`forward_to`](Self::forward_to).
    pub fn set_to(&mut self, instant: GameTime) {
        self.commit(instant);
    }

    /// Add `duration` to the current instant.
    pub fn advance(&mut self, duration: GameDuration) {
        let next = self.now().plus(duration);
        self.commit(next);
    }

    /// Add a raw minute count to the current instant.
    pub fn advance_minutes(&mut self, minutes: i64) {
        self.advance(GameTime::from_minutes(minutes));
    }

    /// Move forward to the next occurrence of `time_of_day`'s minute of
    /// day. Never moves backward.
    pub fn forward_to(&mut self, time_of_day: GameTime) {
        let next = self.now().forward_to(time_of_day);
        self.commit(next);
    }

    /// Start over: zero the clock and fast-forward to the configured
    /// start time on day 0.
    pub fn reset(&mut self) {
        let start = GameTime::ZERO.forward_to(self.settings.start_time);
        info!(start = %start, "Clock reset");
        self.commit(start);
    }

    /// Re-run sync and notification for the current instant without
    /// changing it. Used after the host loads a save into the slot.
    pub fn refresh(&mut self) {
        let now = self.now();
        self.commit(now);
    }

    fn commit(&mut self, instant: GameTime) {
        self.access.store_minutes(instant.total_minutes());
        let snapshot = self.sync(instant);
        debug!(
            total_minutes = snapshot.total_minutes,
            day = snapshot.days,
            time = %instant,
            daytime = snapshot.daytime,
            "Clock synced"
        );
        self.listener.on_time_changed(instant);
    }

    /// Write the derived switches and variables inside a guarded section.
    /// The section is closed when this returns.
    fn sync(&mut self, instant: GameTime) -> ClockSnapshot {
        let snapshot = ClockSnapshot::capture(instant, &self.settings.bounds);
        let targets = *self.access.targets();
        let section = self.access.open();

        if let Some(id) = targets.daytime_switch {
            section.write_switch(id, snapshot.daytime);
        }
        if let Some(id) = targets.night_switch {
            section.write_switch(id, snapshot.night());
        }
        if let Some(id) = targets.days_variable {
            section.write_variable(id, snapshot.days);
        }
        if let Some(id) = targets.hour_variable {
            section.write_variable(id, snapshot.hour);
        }
        if let Some(id) = targets.minute_variable {
            section.write_variable(id, snapshot.minute);
        }

        snapshot
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::guard::{ProtectedSwitches, protect};
    use crate::host::{MemoryHost, SwitchId, SyncTargets, VariableId};

    const DAY_SWITCH: SwitchId = SwitchId(1);
    const NIGHT_SWITCH: SwitchId = SwitchId(2);
    const DAYS_VAR: VariableId = VariableId(1);
    const HOUR_VAR: VariableId = VariableId(2);
    const MINUTE_VAR: VariableId = VariableId(3);

    fn targets() -> SyncTargets {
        SyncTargets {
            daytime_switch: Some(DAY_SWITCH),
            night_switch: Some(NIGHT_SWITCH),
            days_variable: Some(DAYS_VAR),
            hour_variable: Some(HOUR_VAR),
            minute_variable: Some(MINUTE_VAR),
        }
    }

    /// Records each notification and whether the guard was open.
    struct Recorder {
        shared: ProtectedSwitches<MemoryHost>,
        seen: Rc<RefCell<Vec<(GameTime, bool)>>>,
    }

    impl TimeListener for Recorder {
        fn on_time_changed(&mut self, now: GameTime) {
            self.seen.borrow_mut().push((now, self.shared.is_guard_open()));
        }
    }

    struct Fixture {
        host: Rc<RefCell<MemoryHost>>,
        shared: ProtectedSwitches<MemoryHost>,
        seen: Rc<RefCell<Vec<(GameTime, bool)>>>,
        clock: GameClock<MemoryHost>,
    }

    fn fixture_with(host: MemoryHost) -> Fixture {
        let host = Rc::new(RefCell::new(host));
        let (shared, access) = protect(Rc::clone(&host), targets());
        let seen = Rc::new(RefCell::new(Vec::new()));
        let recorder = Recorder {
            shared: shared.clone(),
            seen: Rc::clone(&seen),
        };
        let clock = GameClock::new(ClockSettings::default(), access, Box::new(recorder));
        Fixture {
            host,
            shared,
            seen,
            clock,
        }
    }

    fn fixture() -> Fixture {
        fixture_with(MemoryHost::new())
    }

    #[test]
    fn fresh_clock_starts_at_zero() {
        let f = fixture();
        assert_eq!(f.clock.now(), GameTime::ZERO);
        assert!(f.seen.borrow().is_empty());
    }

    #[test]
    fn clock_reads_loaded_slot() {
        let f = fixture_with(MemoryHost::with_minutes(1500));
        assert_eq!(f.clock.now().days(), 1);
        assert_eq!(f.clock.now().hour(), 1);
    }

    #[test]
    fn set_to_writes_slot_and_syncs() {
        let mut f = fixture();
        f.clock.set_to(GameTime::from_parts(2, 21, 15));

        let host = f.host.borrow();
        assert_eq!(host.stored_minutes(), GameTime::from_parts(2, 21, 15).total_minutes());
        assert!(!host.switch(DAY_SWITCH));
        assert!(host.switch(NIGHT_SWITCH));
        assert_eq!(host.variable(DAYS_VAR), 2);
        assert_eq!(host.variable(HOUR_VAR), 21);
        assert_eq!(host.variable(MINUTE_VAR), 15);
    }

    #[test]
    fn switches_stay_complementary() {
        let mut f = fixture();
        for minutes in (0..1440).step_by(37) {
            f.clock.set_to(GameTime::from_minutes(minutes));
            let host = f.host.borrow();
            assert_ne!(host.switch(DAY_SWITCH), host.switch(NIGHT_SWITCH));
            assert_eq!(host.switch(DAY_SWITCH), f.clock.is_daytime());
        }
    }

    #[test]
    fn set_to_may_move_backward() {
        let mut f = fixture();
        f.clock.set_to(GameTime::at(22, 0));
        f.clock.set_to(GameTime::at(8, 0));
        assert_eq!(f.clock.now(), GameTime::at(8, 0));
    }

    #[test]
    fn advance_accumulates() {
        let mut f = fixture();
        f.clock.advance(GameTime::from_minutes(90));
        f.clock.advance_minutes(30);
        assert_eq!(f.clock.now(), GameTime::at(2, 0));
    }

    #[test]
    fn non_negative_advances_are_monotonic() {
        let mut f = fixture();
        let mut last = f.clock.now().total_minutes();
        for step in [0, 1, 59, 0, 1440, 7, 600] {
            f.clock.advance_minutes(step);
            let now = f.clock.now().total_minutes();
            assert!(now >= last);
            last = now;
        }
    }

    #[test]
    fn forward_to_rolls_into_next_day() {
        let mut f = fixture();
        f.clock.set_to(GameTime::at(22, 0));
        f.clock.forward_to(GameTime::at(8, 0));
        assert_eq!(f.clock.now(), GameTime::from_parts(1, 8, 0));
        assert_eq!(f.host.borrow().variable(DAYS_VAR), 1);
    }

    #[test]
    fn reset_lands_on_start_time() {
        let mut f = fixture();
        f.clock.set_to(GameTime::from_parts(5, 13, 0));
        f.clock.reset();
        assert_eq!(f.clock.now().total_minutes(), 480);
        assert_eq!(f.clock.now().days(), 0);
        assert!(f.host.borrow().switch(DAY_SWITCH));
    }

    #[test]
    fn each_change_notifies_once_with_guard_closed() {
        let mut f = fixture();
        f.clock.set_to(GameTime::at(6, 0));
        f.clock.advance_minutes(10);
        f.clock.reset();

        let seen = f.seen.borrow();
        assert_eq!(
            *seen,
            vec![
                (GameTime::at(6, 0), false),
                (GameTime::at(6, 10), false),
                (GameTime::at(8, 0), false),
            ]
        );
    }

    #[test]
    fn external_writers_still_rejected_after_sync() {
        let mut f = fixture();
        f.clock.set_to(GameTime::at(12, 0));
        assert!(f.shared.write_switch(DAY_SWITCH, false).is_err());
        assert!(f.host.borrow().switch(DAY_SWITCH));
    }

    #[test]
    fn refresh_resyncs_loaded_value() {
        let mut f = fixture_with(MemoryHost::with_minutes(GameTime::at(23, 0).total_minutes()));
        assert!(!f.host.borrow().switch(NIGHT_SWITCH));
        f.clock.refresh();
        assert!(f.host.borrow().switch(NIGHT_SWITCH));
        assert_eq!(f.seen.borrow().len(), 1);
    }

    #[test]
    fn snapshot_matches_now() {
        let mut f = fixture();
        f.clock.set_to(GameTime::from_parts(1, 7, 30));
        let snap = f.clock.snapshot();
        assert_eq!(snap.days, 1);
        assert_eq!(snap.hour, 7);
        assert_eq!(snap.minute, 30);
        assert!(snap.daytime);
    }

    #[test]
    fn unset_targets_are_not_written() {
        let host = Rc::new(RefCell::new(MemoryHost::new()));
        let (_shared, access) = protect(Rc::clone(&host), SyncTargets::default());
        let mut clock = GameClock::new(ClockSettings::default(), access, Box::new(NoOpListener));
        clock.set_to(GameTime::at(12, 0));
        assert_eq!(*host.borrow(), MemoryHost::with_minutes(720));
    }
}
