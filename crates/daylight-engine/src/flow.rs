//! Frame-to-minute pacing for the host loop.

/// Counts host frames and reports when an in-universe minute has passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeFlow {
    frames_per_minute: u32,
    frame_in_minute: u32,
    paused: bool,
}

impl TimeFlow {
    /// Create a flow that advances one minute every `frames_per_minute`
    /// frames. A value of zero is treated as one.
    pub fn new(frames_per_minute: u32, paused: bool) -> Self {
        Self {
            frames_per_minute: frames_per_minute.max(1),
            frame_in_minute: 0,
            paused,
        }
    }

    /// Count one frame. Returns `true` when a minute has elapsed.
    pub const fn tick(&mut self) -> bool {
        if self.paused {
            return false;
        }
        self.frame_in_minute = self.frame_in_minute.saturating_add(1);
        if self.frame_in_minute >= self.frames_per_minute {
            self.frame_in_minute = 0;
            return true;
        }
        false
    }

    /// Whether time is stopped.
    pub const fn is_paused(&self) -> bool {
        self.paused
    }
}
