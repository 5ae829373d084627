//! Protection for the reserved day/night switches.
//!
//! The daytime and night switches are derived from the clock and must
//! never be written by anyone else. [`protect`] splits access to the host
//! into two handles:
//!
//! - [`ProtectedSwitches`]: the shared, cloneable handle every other
//!   collaborator writes through. Writes to a reserved switch always fail
//!   with [`PolicyViolation`], whether or not the clock is mid-sync.
//! - [`ReservedAccess`]: the single capability that can open a
//!   [`GuardedSection`]. It is not `Clone`; the clock controller takes it
//!   by value at construction and is therefore its only holder.
//!
//! The guard is a plain flag shared between both handles so observers can
//! tell whether a sync is in progress. Opening a section sets it; dropping
//! the section clears it.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use tracing::error;

use crate::host::{HostState, SwitchId, SyncTargets, VariableId};

/// A write to a reserved switch outside the clock's guarded sync step.
///
/// This always indicates a bug in the collaborator that attempted the
/// write. It is not retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("switch {switch} is reserved for the clock and may only change during time sync")]
pub struct PolicyViolation {
    /// The switch that was written.
    pub switch: SwitchId,
}

/// Split `host` into the shared protected handle and the reserved
/// capability.
pub fn protect<H: HostState>(
    host: Rc<RefCell<H>>,
    targets: SyncTargets,
) -> (ProtectedSwitches<H>, ReservedAccess<H>) {
    let guard = Rc::new(Cell::new(false));
    let shared = ProtectedSwitches {
        host: Rc::clone(&host),
        targets,
        guard: Rc::clone(&guard),
    };
    let reserved = ReservedAccess {
        host,
        targets,
        guard,
    };
    (shared, reserved)
}

/// Shared write handle for collaborators other than the clock.
pub struct ProtectedSwitches<H> {
    host: Rc<RefCell<H>>,
    targets: SyncTargets,
    guard: Rc<Cell<bool>>,
}

impl<H> Clone for ProtectedSwitches<H> {
    fn clone(&self) -> Self {
        Self {
            host: Rc::clone(&self.host),
            targets: self.targets,
            guard: Rc::clone(&self.guard),
        }
    }
}

impl<H: HostState> ProtectedSwitches<H> {
    /// Write a switch.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyViolation`] if `id` is a reserved switch.
    pub fn write_switch(&self, id: SwitchId, value: bool) -> Result<(), PolicyViolation> {
        if self.targets.is_reserved(id) {
            error!(
                switch = %id,
                value,
                mid_sync = self.guard.get(),
                "Rejected write to reserved switch"
            );
            return Err(PolicyViolation { switch: id });
        }
        self.host.borrow_mut().write_switch(id, value);
        Ok(())
    }

    /// Read a switch.
    pub fn switch(&self, id: SwitchId) -> bool {
        self.host.borrow().switch(id)
    }

    /// Write a variable. Variables are not protected.
    pub fn write_variable(&self, id: VariableId, value: i64) {
        self.host.borrow_mut().write_variable(id, value);
    }

    /// Read a variable.
    pub fn variable(&self, id: VariableId) -> i64 {
        self.host.borrow().variable(id)
    }

    /// Whether `id` is reserved for the clock.
    pub fn is_reserved(&self, id: SwitchId) -> bool {
        self.targets.is_reserved(id)
    }

    /// Whether the clock currently holds a guarded section open.
    pub fn is_guard_open(&self) -> bool {
        self.guard.get()
    }
}

/// The clock's exclusive capability over the persisted slot and the
/// reserved cells.
pub struct ReservedAccess<H> {
    host: Rc<RefCell<H>>,
    targets: SyncTargets,
    guard: Rc<Cell<bool>>,
}

impl<H: HostState> ReservedAccess<H> {
    /// The cells this capability writes during sync.
    pub const fn targets(&self) -> &SyncTargets {
        &self.targets
    }

    /// Read the persisted minute count.
    pub fn load_minutes(&self) -> i64 {
        self.host.borrow().stored_minutes()
    }

    /// Overwrite the persisted minute count.
    pub fn store_minutes(&self, minutes: i64) {
        self.host.borrow_mut().store_minutes(minutes);
    }

    /// Open a guarded section. The guard stays set until the returned
    /// section is dropped.
    pub fn open(&mut self) -> GuardedSection<'_, H> {
        self.guard.set(true);
        GuardedSection { access: self }
    }
}

/// An open guarded section. Reserved writes made through it are accepted;
/// writes through [`ProtectedSwitches`] stay rejected while it lives.
pub struct GuardedSection<'a, H: HostState> {
    access: &'a ReservedAccess<H>,
}

impl<H: HostState> GuardedSection<'_, H> {
    /// Write a switch.
    pub fn write_switch(&self, id: SwitchId, value: bool) {
        self.access.host.borrow_mut().write_switch(id, value);
    }

    /// Write a variable.
    pub fn write_variable(&self, id: VariableId, value: i64) {
        self.access.host.borrow_mut().write_variable(id, value);
    }
}

impl<H: HostState> Drop for GuardedSection<'_, H> {
    fn drop(&mut self) {
        self.access.guard.set(false);
    }
}
