//! Tone tables and time-of-day tone resolution.
//!
//! A [`Lighting`] value is built once from configuration and never mutated
//! afterwards. It answers one question: given a lighting keyword and the
//! current instant, which [`Tone`] should the screen show?
//!
//! # Outside resolution
//!
//! The reserved outside keyword (default `outside`) resolves by minute of
//! day `t`:
//!
//! ```text
//! 0          dawn_start     dawn_end      dusk_start     dusk_end       1440
//! |--night----|--dawn phases--|----day------|--dusk phases--|---night-----|
//! ```
//!
//! Each phase covers `minutes_per_phase` minutes, so
//! `dawn_end = dawn_start + dawn_phases * minutes_per_phase` (and likewise
//! for dusk). A phase sequence with no tones, or a zero phase width,
//! collapses its window: that branch is never entered.
//!
//! Any other keyword is looked up in the preset table. Empty keywords and
//! unknown keywords both resolve to the default tone.

use std::collections::BTreeMap;

use daylight_types::{DayPhase, GameTime, Tone};
use tracing::debug;

/// Keyword reserved for time-of-day resolution unless configured otherwise.
pub const DEFAULT_OUTSIDE_KEYWORD: &str = "outside";

/// Normalize a lighting keyword for lookup: trimmed and lowercased.
pub fn normalize_keyword(keyword: &str) -> String {
    keyword.trim().to_lowercase()
}

// ---------------------------------------------------------------------------
// Phase sequences
// ---------------------------------------------------------------------------

/// An ordered run of tones stepped through during dawn or dusk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseSequence {
    /// First minute of the window (minute of day).
    start: i64,
    /// Width of each phase in minutes.
    minutes_per_phase: i64,
    /// One tone per phase, in order.
    tones: Vec<Tone>,
}

impl PhaseSequence {
    /// Create a sequence starting at `start`'s time of day.
    ///
    /// A negative phase width is treated as zero.
    pub fn new(start: GameTime, minutes_per_phase: i64, tones: Vec<Tone>) -> Self {
        Self {
            start: start.minute_of_day(),
            minutes_per_phase: minutes_per_phase.max(0),
            tones,
        }
    }

    /// An empty sequence whose window is never entered.
    pub const fn empty(start: GameTime) -> Self {
        Self {
            start: start.minute_of_day(),
            minutes_per_phase: 0,
            tones: Vec::new(),
        }
    }

    /// First minute of the window.
    pub const fn start(&self) -> GameTime {
        GameTime::from_minutes(self.start)
    }

    /// First minute after the window.
    ///
    /// This is a raw minute-of-day count and may exceed 1439 when the
    /// window runs past midnight.
    pub fn end(&self) -> GameTime {
        GameTime::from_minutes(self.end_minute())
    }

    /// Width of one phase in minutes.
    pub const fn minutes_per_phase(&self) -> i64 {
        self.minutes_per_phase
    }

    /// The tones, in phase order.
    pub fn tones(&self) -> &[Tone] {
        &self.tones
    }

    fn end_minute(&self) -> i64 {
        let count = i64::try_from(self.tones.len()).unwrap_or(i64::MAX);
        self.start
            .saturating_add(count.saturating_mul(self.minutes_per_phase))
    }

    fn contains(&self, minute_of_day: i64) -> bool {
        self.start <= minute_of_day && minute_of_day < self.end_minute()
    }

    /// The tone for `minute_of_day` if it falls inside the window.
    fn tone_at(&self, minute_of_day: i64) -> Option<Tone> {
        if !self.contains(minute_of_day) {
            return None;
        }
        let offset = minute_of_day.saturating_sub(self.start);
        let index = offset.checked_div(self.minutes_per_phase)?;
        let index = usize::try_from(index).ok()?;
        self.tones.get(index).copied()
    }
}

// ---------------------------------------------------------------------------
// Preset table
// ---------------------------------------------------------------------------

/// Keyword-indexed fixed tones (caves, interiors, and so on).
///
/// Keywords are matched case-insensitively with surrounding whitespace
/// ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToneTable {
    entries: BTreeMap<String, Tone>,
}

impl ToneTable {
    /// Create an empty table.
    pub const fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Insert a preset, returning the tone it replaced if the keyword was
    /// already present.
    pub fn insert(&mut self, keyword: &str, tone: Tone) -> Option<Tone> {
        self.entries.insert(normalize_keyword(keyword), tone)
    }

    /// Look up a preset.
    pub fn get(&self, keyword: &str) -> Option<Tone> {
        self.entries.get(&normalize_keyword(keyword)).copied()
    }

    /// Number of presets.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no presets.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate presets in keyword order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Tone)> {
        self.entries.iter().map(|(keyword, tone)| (keyword.as_str(), *tone))
    }
}

impl<'a> FromIterator<(&'a str, Tone)> for ToneTable {
    fn from_iter<I: IntoIterator<Item = (&'a str, Tone)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (keyword, tone) in iter {
            table.insert(keyword, tone);
        }
        table
    }
}

// ---------------------------------------------------------------------------
// Lighting
// ---------------------------------------------------------------------------

/// Immutable lighting configuration and the tone resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lighting {
    outside_keyword: String,
    default_tone: Tone,
    day_tone: Tone,
    night_tone: Tone,
    dawn: PhaseSequence,
    dusk: PhaseSequence,
    presets: ToneTable,
}

impl Lighting {
    /// Create lighting from dawn and dusk sequences.
    ///
    /// All other tones start neutral, the preset table starts empty, and
    /// the outside keyword is [`DEFAULT_OUTSIDE_KEYWORD`].
    pub fn new(dawn: PhaseSequence, dusk: PhaseSequence) -> Self {
        Self {
            outside_keyword: DEFAULT_OUTSIDE_KEYWORD.to_owned(),
            default_tone: Tone::NEUTRAL,
            day_tone: Tone::NEUTRAL,
            night_tone: Tone::NEUTRAL,
            dawn,
            dusk,
            presets: ToneTable::new(),
        }
    }

    /// Set the tone used for empty or unknown keywords.
    #[must_use]
    pub const fn with_default_tone(mut self, tone: Tone) -> Self {
        self.default_tone = tone;
        self
    }

    /// Set the outside tone between dawn and dusk.
    #[must_use]
    pub const fn with_day_tone(mut self, tone: Tone) -> Self {
        self.day_tone = tone;
        self
    }

    /// Set the outside tone before dawn and after dusk.
    #[must_use]
    pub const fn with_night_tone(mut self, tone: Tone) -> Self {
        self.night_tone = tone;
        self
    }

    /// Replace the preset table.
    #[must_use]
    pub fn with_presets(mut self, presets: ToneTable) -> Self {
        self.presets = presets;
        self
    }

    /// Change the keyword that selects time-of-day resolution.
    #[must_use]
    pub fn with_outside_keyword(mut self, keyword: &str) -> Self {
        self.outside_keyword = normalize_keyword(keyword);
        self
    }

    /// The keyword that selects time-of-day resolution (normalized).
    pub fn outside_keyword(&self) -> &str {
        &self.outside_keyword
    }

    /// Tone for empty or unknown keywords.
    pub const fn default_tone(&self) -> Tone {
        self.default_tone
    }

    /// Outside tone between dawn and dusk.
    pub const fn day_tone(&self) -> Tone {
        self.day_tone
    }

    /// Outside tone before dawn and after dusk.
    pub const fn night_tone(&self) -> Tone {
        self.night_tone
    }

    /// The dawn sequence.
    pub const fn dawn(&self) -> &PhaseSequence {
        &self.dawn
    }

    /// The dusk sequence.
    pub const fn dusk(&self) -> &PhaseSequence {
        &self.dusk
    }

    /// The preset table.
    pub const fn presets(&self) -> &ToneTable {
        &self.presets
    }

    /// Whether `keyword` selects time-of-day resolution.
    pub fn is_outside(&self, keyword: &str) -> bool {
        normalize_keyword(keyword) == self.outside_keyword
    }

    /// Whether `keyword` resolves to something other than the default
    /// fallback: empty, the outside keyword, or a known preset.
    pub fn knows(&self, keyword: &str) -> bool {
        let keyword = normalize_keyword(keyword);
        keyword.is_empty()
            || keyword == self.outside_keyword
            || self.presets.entries.contains_key(&keyword)
    }

    /// Resolve the tone to display for `keyword` at `now`.
    ///
    /// Pure: the same keyword and instant always give the same tone.
    pub fn resolve_tone(&self, keyword: &str, now: GameTime) -> Tone {
        let keyword = normalize_keyword(keyword);
        if keyword.is_empty() {
            return self.default_tone;
        }
        if keyword == self.outside_keyword {
            return self.outside(now).1;
        }
        self.presets.entries.get(&keyword).copied().unwrap_or_else(|| {
            debug!(keyword = %keyword, "Unknown lighting keyword, using default tone");
            self.default_tone
        })
    }

    /// The outside tone at `now`.
    pub fn outside_tone(&self, now: GameTime) -> Tone {
        self.outside(now).1
    }

    /// The outside lighting phase at `now`.
    pub fn phase_at(&self, now: GameTime) -> DayPhase {
        self.outside(now).0
    }

    fn outside(&self, now: GameTime) -> (DayPhase, Tone) {
        let t = now.minute_of_day();
        if t < self.dawn.start {
            return (DayPhase::Night, self.night_tone);
        }
        if let Some(tone) = self.dawn.tone_at(t) {
            return (DayPhase::Dawn, tone);
        }
        if t < self.dusk.start {
            return (DayPhase::Day, self.day_tone);
        }
        if let Some(tone) = self.dusk.tone_at(t) {
            return (DayPhase::Dusk, tone);
        }
        (DayPhase::Night, self.night_tone)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const NIGHT: Tone = Tone::new(-68, -68, -14, 41);
    const DAY: Tone = Tone::new(0, 0, 0, 0);
    const DEFAULT: Tone = Tone::new(1, 1, 1, 1);
    const CAVE: Tone = Tone::new(-34, -34, -34, 0);

    fn dawn_tones() -> Vec<Tone> {
        vec![Tone::new(-51, -51, -10, 31), Tone::new(-34, -34, -7, 20), Tone::new(-17, -17, -3, 10)]
    }

    fn dusk_tones() -> Vec<Tone> {
        vec![Tone::new(-17, -34, -51, 10), Tone::new(-34, -51, -51, 20)]
    }

    fn lighting() -> Lighting {
        Lighting::new(
            PhaseSequence::new(GameTime::at(5, 0), 30, dawn_tones()),
            PhaseSequence::new(GameTime::at(18, 0), 30, dusk_tones()),
        )
        .with_default_tone(DEFAULT)
        .with_day_tone(DAY)
        .with_night_tone(NIGHT)
        .with_presets([("Cave", CAVE)].into_iter().collect())
    }

    #[test]
    fn sequence_end_is_derived() {
        let seq = PhaseSequence::new(GameTime::at(5, 0), 30, dawn_tones());
        assert_eq!(seq.end(), GameTime::at(6, 30));
        assert_eq!(PhaseSequence::empty(GameTime::at(5, 0)).end(), GameTime::at(5, 0));
    }

    #[test]
    fn outside_walks_through_the_day() {
        let l = lighting();
        let at = |h, m| l.resolve_tone("outside", GameTime::at(h, m));
        assert_eq!(at(0, 0), NIGHT);
        assert_eq!(at(4, 59), NIGHT);
        assert_eq!(at(5, 0), dawn_tones()[0]);
        assert_eq!(at(5, 29), dawn_tones()[0]);
        assert_eq!(at(5, 30), dawn_tones()[1]);
        assert_eq!(at(6, 29), dawn_tones()[2]);
        assert_eq!(at(6, 30), DAY);
        assert_eq!(at(17, 59), DAY);
        assert_eq!(at(18, 0), dusk_tones()[0]);
        assert_eq!(at(18, 59), dusk_tones()[1]);
        assert_eq!(at(19, 0), NIGHT);
        assert_eq!(at(23, 59), NIGHT);
    }

    #[test]
    fn outside_ignores_day_component() {
        let l = lighting();
        assert_eq!(
            l.outside_tone(GameTime::from_parts(7, 5, 45)),
            l.outside_tone(GameTime::at(5, 45))
        );
    }

    #[test]
    fn phases_follow_windows() {
        let l = lighting();
        assert_eq!(l.phase_at(GameTime::at(3, 0)), DayPhase::Night);
        assert_eq!(l.phase_at(GameTime::at(5, 10)), DayPhase::Dawn);
        assert_eq!(l.phase_at(GameTime::at(12, 0)), DayPhase::Day);
        assert_eq!(l.phase_at(GameTime::at(18, 10)), DayPhase::Dusk);
        assert_eq!(l.phase_at(GameTime::at(22, 0)), DayPhase::Night);
    }

    #[test]
    fn keyword_matching_is_case_insensitive() {
        let l = lighting();
        let noon = GameTime::at(12, 0);
        assert_eq!(l.resolve_tone("  OUTSIDE ", noon), DAY);
        assert_eq!(l.resolve_tone("cave", noon), CAVE);
        assert_eq!(l.resolve_tone("CAVE", noon), CAVE);
    }

    #[test]
    fn empty_and_unknown_keywords_use_default() {
        let l = lighting();
        let noon = GameTime::at(12, 0);
        assert_eq!(l.resolve_tone("", noon), DEFAULT);
        assert_eq!(l.resolve_tone("   ", noon), DEFAULT);
        assert_eq!(l.resolve_tone("volcano", noon), DEFAULT);
        assert!(!l.knows("volcano"));
        assert!(l.knows("Cave"));
        assert!(l.knows("outside"));
        assert!(l.knows(""));
    }

    #[test]
    fn resolution_is_idempotent() {
        let l = lighting();
        let before = l.clone();
        let now = GameTime::from_parts(2, 5, 40);
        let first = l.resolve_tone("outside", now);
        let second = l.resolve_tone("outside", now);
        assert_eq!(first, second);
        assert_eq!(l, before);
    }

    #[test]
    fn empty_dawn_window_is_never_entered() {
        let l = Lighting::new(
            PhaseSequence::empty(GameTime::at(5, 0)),
            PhaseSequence::new(GameTime::at(18, 0), 30, dusk_tones()),
        )
        .with_day_tone(DAY)
        .with_night_tone(NIGHT);
        assert_eq!(l.resolve_tone("outside", GameTime::at(4, 59)), NIGHT);
        assert_eq!(l.resolve_tone("outside", GameTime::at(5, 0)), DAY);
        assert_eq!(l.phase_at(GameTime::at(5, 0)), DayPhase::Day);
    }

    #[test]
    fn zero_phase_width_collapses_window() {
        let l = Lighting::new(
            PhaseSequence::new(GameTime::at(5, 0), 0, dawn_tones()),
            PhaseSequence::new(GameTime::at(18, 0), 0, dusk_tones()),
        )
        .with_day_tone(DAY)
        .with_night_tone(NIGHT);
        assert_eq!(l.resolve_tone("outside", GameTime::at(5, 0)), DAY);
        assert_eq!(l.resolve_tone("outside", GameTime::at(18, 0)), NIGHT);
    }

    #[test]
    fn custom_outside_keyword_replaces_default() {
        let l = lighting().with_outside_keyword("Sky");
        let night = GameTime::at(1, 0);
        assert_eq!(l.resolve_tone("sky", night), NIGHT);
        assert_eq!(l.resolve_tone("outside", night), DEFAULT);
    }

    #[test]
    fn tone_table_replaces_duplicates() {
        let mut table = ToneTable::new();
        assert_eq!(table.insert("Cave", CAVE), None);
        assert_eq!(table.insert("cave ", DAY), Some(CAVE));
        assert_eq!(table.len(), 1);
        assert_eq!(table.iter().next().unwrap(), ("cave", DAY));
    }
}
