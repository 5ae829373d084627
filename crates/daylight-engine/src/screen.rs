//! Screen tinting for the current map.
//!
//! [`Screen`] knows which map the player is on and which tone is showing.
//! On every clock change it re-resolves the map's tone and, if it moved,
//! starts a fade toward the new value. [`ScreenListener`] plugs it into
//! the clock.

use std::cell::RefCell;
use std::rc::Rc;

use daylight_core::clock::{GameClock, TimeListener};
use daylight_core::host::HostState;
use daylight_core::lighting::Lighting;
use daylight_core::note::MapLighting;
use daylight_core::parse::ParseError;
use daylight_types::{GameTime, Tone};
use tracing::{debug, info, warn};

/// A tint change handed to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TintRequest {
    /// Target tone.
    pub tone: Tone,
    /// Frames over which to fade (0 = immediate).
    pub fade_frames: u32,
}

/// The screen tint state for the current map.
pub struct Screen {
    lighting: Lighting,
    map: MapLighting,
    fade_frames: u32,
    shown: Tone,
    target: Tone,
    remaining: u32,
}

impl Screen {
    /// A screen with no lighting tag that shows the default tone.
    pub const fn new(lighting: Lighting, fade_frames: u32) -> Self {
        let shown = lighting.default_tone();
        Self {
            lighting,
            map: MapLighting::Inherit,
            fade_frames,
            shown,
            target: shown,
            remaining: 0,
        }
    }

    /// Transfer to a map described by `note`. The new tone applies
    /// immediately.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] if the note carries a malformed tone tag.
    pub fn enter_map(&mut self, note: &str, now: GameTime) -> Result<TintRequest, ParseError> {
        let map = MapLighting::from_note(note)?;
        if let MapLighting::Keyword(keyword) = &map {
            if !self.lighting.knows(keyword) {
                warn!(keyword = %keyword, "Map uses an unknown lighting keyword");
            }
        }
        info!(map = ?map, "Entered map");
        self.map = map;

        let tone = self.map.resolve(&self.lighting, now);
        self.shown = tone;
        self.target = tone;
        self.remaining = 0;
        Ok(TintRequest {
            tone,
            fade_frames: 0,
        })
    }

    /// Re-resolve the map tone for `now`. Returns a request only when the
    /// target tone changed. Maps whose tone ignores the clock are skipped.
    pub fn refresh(&mut self, now: GameTime) -> Option<TintRequest> {
        if !self.map.follows_clock(&self.lighting) {
            return None;
        }
        let tone = self.map.resolve(&self.lighting, now);
        if tone == self.target {
            return None;
        }
        debug!(from = %self.target, to = %tone, time = %now, "Tint target changed");
        self.target = tone;
        self.remaining = self.fade_frames;
        if self.remaining == 0 {
            self.shown = tone;
        }
        Some(TintRequest {
            tone,
            fade_frames: self.fade_frames,
        })
    }

    /// Advance the fade by one frame. Returns the new tone to draw, or
    /// `None` when no fade is in progress.
    pub fn step(&mut self) -> Option<Tone> {
        if self.remaining == 0 {
            return None;
        }
        let left = i32::try_from(self.remaining).unwrap_or(i32::MAX);
        let channel = |shown: i32, target: i32| {
            let delta = target.saturating_sub(shown);
            shown.saturating_add(delta.checked_div(left).unwrap_or(delta))
        };
        self.shown = Tone::new(
            channel(self.shown.red, self.target.red),
            channel(self.shown.green, self.target.green),
            channel(self.shown.blue, self.target.blue),
            channel(self.shown.gray, self.target.gray),
        );
        self.remaining = self.remaining.saturating_sub(1);
        Some(self.shown)
    }

    /// The tone currently drawn.
    pub const fn shown(&self) -> Tone {
        self.shown
    }

    /// The tone being faded toward.
    pub const fn target(&self) -> Tone {
        self.target
    }

    /// Whether a fade is in progress.
    pub const fn is_fading(&self) -> bool {
        self.remaining > 0
    }
}

/// Bring the clock to its start-up instant, then enter the starting map.
///
/// A fresh slot starts a new game with [`GameClock::reset`]; a loaded save
/// is re-synced with [`GameClock::refresh`]. The map is entered afterwards
/// so its tone is shown at once instead of fading in from midnight.
///
/// # Errors
///
/// Returns [`ParseError`] if `note` carries a malformed tone tag.
pub fn start<H: HostState>(
    clock: &mut GameClock<H>,
    screen: &RefCell<Screen>,
    note: &str,
) -> Result<TintRequest, ParseError> {
    if clock.now() == GameTime::ZERO {
        clock.reset();
    } else {
        clock.refresh();
    }
    screen.borrow_mut().enter_map(note, clock.now())
}

/// Clock listener that re-tints a shared [`Screen`].
pub struct ScreenListener {
    screen: Rc<RefCell<Screen>>,
}

impl ScreenListener {
    /// Create a listener over the given screen.
    pub const fn new(screen: Rc<RefCell<Screen>>) -> Self {
        Self { screen }
    }
}

impl TimeListener for ScreenListener {
    fn on_time_changed(&mut self, now: GameTime) {
        if let Some(request) = self.screen.borrow_mut().refresh(now) {
            info!(
                tone = %request.tone,
                fade_frames = request.fade_frames,
                time = %now,
                "Screen tint requested"
            );
        }
    }
}
