//! Configuration loading and typed config structures.
//!
//! The canonical configuration lives in `daylight-config.yaml`. This
//! module defines structs that mirror the YAML, with clock times and
//! tones kept as the text an operator writes (`"8:00 AM"`,
//! `"(-68, -68, -14, 41)"`). [`DaylightConfig::build`] runs the parsers
//! once and produces the immutable values the clock and the tone resolver
//! use at runtime.
//!
//! ```yaml
//! clock:
//!   start_time: "8:00 AM"
//!   day_start: "6:00 AM"
//!   night_start: "8:00 PM"
//! sync:
//!   daytime_switch: 1
//!   night_switch: 2
//!   days_variable: 1
//!   hour_variable: 2
//!   minute_variable: 3
//! lighting:
//!   night_tone: "(-68, -68, -14, 41)"
//!   dawn_start: "5:00 AM"
//!   dusk_start: "6:00 PM"
//!   minutes_per_phase: 30
//!   presets:
//!     - keyword: cave
//!       tone: "(-34, -34, -34, 0)"
//! ```

use std::path::Path;

use daylight_types::{DayBounds, GameTime};
use serde::Deserialize;
use tracing::warn;

use crate::clock::ClockSettings;
use crate::host::SyncTargets;
use crate::lighting::{
    DEFAULT_OUTSIDE_KEYWORD, Lighting, PhaseSequence, ToneTable, normalize_keyword,
};
use crate::parse::{ParseError, parse_time_of_day, parse_tone, parse_tone_list};

/// Environment variable overriding `clock.start_time`.
pub const START_TIME_ENV: &str = "DAYLIGHT_START_TIME";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A text value inside the configuration is malformed.
    #[error("invalid value for {field}: {source}")]
    Parse {
        /// Dotted path of the offending field.
        field: String,
        /// The underlying parse error.
        source: ParseError,
    },

    /// A value parsed but is not usable.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Attach a field path to a parse failure.
fn field<T>(name: &str, result: Result<T, ParseError>) -> Result<T, ConfigError> {
    result.map_err(|source| ConfigError::Parse {
        field: name.to_owned(),
        source,
    })
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DaylightConfig {
    /// Clock boundaries and start time.
    #[serde(default)]
    pub clock: ClockConfig,

    /// Host cells receiving derived day/night state.
    #[serde(default)]
    pub sync: SyncTargets,

    /// Tones, phase sequences, and presets.
    #[serde(default)]
    pub lighting: LightingConfig,

    /// How fast time passes in the host loop.
    #[serde(default)]
    pub flow: FlowConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// The typed values built from a [`DaylightConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaylightSettings {
    /// Clock boundaries and start time.
    pub clock: ClockSettings,
    /// Host cells receiving derived day/night state.
    pub sync: SyncTargets,
    /// The tone resolver.
    pub lighting: Lighting,
    /// Frames over which the host fades to a new tone.
    pub fade_frames: u32,
}

impl DaylightConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// `DAYLIGHT_START_TIME` overrides `clock.start_time` when set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config: Self = serde_yml::from_str(&contents)?;
        config.clock.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_yml::from_str(yaml)?;
        config.clock.apply_env_overrides();
        Ok(config)
    }

    /// Parse every text value and validate the result.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] naming the first malformed field, or
    /// [`ConfigError::Invalid`] for values that parse but cannot be used.
    pub fn build(&self) -> Result<DaylightSettings, ConfigError> {
        self.flow.validate()?;
        Ok(DaylightSettings {
            clock: self.clock.build()?,
            sync: self.sync,
            lighting: self.lighting.build()?,
            fade_frames: self.lighting.fade_frames,
        })
    }
}

// ---------------------------------------------------------------------------
// Clock
// ---------------------------------------------------------------------------

/// Clock boundaries and start time, as clock-time text.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClockConfig {
    /// Time of day a new game starts at.
    #[serde(default = "default_start_time")]
    pub start_time: String,

    /// First minute of daytime.
    #[serde(default = "default_day_start")]
    pub day_start: String,

    /// First minute of night.
    #[serde(default = "default_night_start")]
    pub night_start: String,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            start_time: default_start_time(),
            day_start: default_day_start(),
            night_start: default_night_start(),
        }
    }
}

impl ClockConfig {
    /// Apply environment variable overrides.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var(START_TIME_ENV) {
            self.start_time = val;
        }
    }

    fn build(&self) -> Result<ClockSettings, ConfigError> {
        let start_time = field("clock.start_time", parse_time_of_day(&self.start_time))?;
        let day_start = field("clock.day_start", parse_time_of_day(&self.day_start))?;
        let night_start = field("clock.night_start", parse_time_of_day(&self.night_start))?;
        Ok(ClockSettings {
            bounds: DayBounds::new(day_start, night_start),
            start_time,
        })
    }
}

// ---------------------------------------------------------------------------
// Lighting
// ---------------------------------------------------------------------------

/// Tones and phase windows, as text.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LightingConfig {
    /// Keyword selecting time-of-day resolution.
    #[serde(default = "default_outside_keyword")]
    pub outside_keyword: String,

    /// Tone for maps with no or an unknown lighting keyword.
    #[serde(default = "default_neutral_tone")]
    pub default_tone: String,

    /// Outside tone between dawn and dusk.
    #[serde(default = "default_neutral_tone")]
    pub day_tone: String,

    /// Outside tone before dawn and after dusk.
    #[serde(default = "default_night_tone")]
    pub night_tone: String,

    /// Start of the dawn window.
    #[serde(default = "default_dawn_start")]
    pub dawn_start: String,

    /// Start of the dusk window.
    #[serde(default = "default_dusk_start")]
    pub dusk_start: String,

    /// Width of each dawn/dusk phase in minutes.
    #[serde(default = "default_minutes_per_phase")]
    pub minutes_per_phase: u32,

    /// Dawn tones, in order, as a list of bracketed groups.
    #[serde(default = "default_dawn_phases")]
    pub dawn_phases: String,

    /// Dusk tones, in order, as a list of bracketed groups.
    #[serde(default = "default_dusk_phases")]
    pub dusk_phases: String,

    /// Frames the host fades over when the tone changes.
    #[serde(default = "default_fade_frames")]
    pub fade_frames: u32,

    /// Named fixed tones.
    #[serde(default)]
    pub presets: Vec<PresetConfig>,
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            outside_keyword: default_outside_keyword(),
            default_tone: default_neutral_tone(),
            day_tone: default_neutral_tone(),
            night_tone: default_night_tone(),
            dawn_start: default_dawn_start(),
            dusk_start: default_dusk_start(),
            minutes_per_phase: default_minutes_per_phase(),
            dawn_phases: default_dawn_phases(),
            dusk_phases: default_dusk_phases(),
            fade_frames: default_fade_frames(),
            presets: Vec::new(),
        }
    }
}

/// One named preset slot.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PresetConfig {
    /// Lighting keyword. Blank slots are skipped.
    #[serde(default)]
    pub keyword: String,

    /// Tone text.
    #[serde(default = "default_neutral_tone")]
    pub tone: String,
}

impl LightingConfig {
    fn build(&self) -> Result<Lighting, ConfigError> {
        let outside = self.outside_keyword.trim();
        if outside.is_empty() {
            return Err(ConfigError::Invalid {
                reason: "lighting.outside_keyword must not be blank".to_owned(),
            });
        }

        let width = i64::from(self.minutes_per_phase);
        let dawn = PhaseSequence::new(
            field("lighting.dawn_start", parse_time_of_day(&self.dawn_start))?,
            width,
            field("lighting.dawn_phases", parse_tone_list(&self.dawn_phases))?,
        );
        let dusk = PhaseSequence::new(
            field("lighting.dusk_start", parse_time_of_day(&self.dusk_start))?,
            width,
            field("lighting.dusk_phases", parse_tone_list(&self.dusk_phases))?,
        );
        if dawn.end() > dusk.start() {
            warn!(
                dawn_end = %dawn.end(),
                dusk_start = %dusk.start(),
                "Dawn window overlaps dusk; dawn takes precedence"
            );
        }

        Ok(Lighting::new(dawn, dusk)
            .with_outside_keyword(outside)
            .with_default_tone(field("lighting.default_tone", parse_tone(&self.default_tone))?)
            .with_day_tone(field("lighting.day_tone", parse_tone(&self.day_tone))?)
            .with_night_tone(field("lighting.night_tone", parse_tone(&self.night_tone))?)
            .with_presets(self.build_presets(outside)?))
    }

    fn build_presets(&self, outside: &str) -> Result<ToneTable, ConfigError> {
        let mut table = ToneTable::new();
        for (index, preset) in self.presets.iter().enumerate() {
            let keyword = preset.keyword.trim();
            if keyword.is_empty() {
                warn!(index, "Skipping preset with blank keyword");
                continue;
            }
            if normalize_keyword(keyword) == normalize_keyword(outside) {
                return Err(ConfigError::Invalid {
                    reason: format!("preset keyword {keyword:?} is reserved for outside lighting"),
                });
            }
            let tone = field(
                &format!("lighting.presets[{index}].tone"),
                parse_tone(&preset.tone),
            )?;
            if table.insert(keyword, tone).is_some() {
                warn!(keyword, "Duplicate preset keyword; later entry wins");
            }
        }
        Ok(table)
    }
}

// ---------------------------------------------------------------------------
// Flow
// ---------------------------------------------------------------------------

/// How fast in-universe time passes in the host loop.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FlowConfig {
    /// Host frames per in-universe minute.
    #[serde(default = "default_frames_per_minute")]
    pub frames_per_minute: u32,

    /// Real-time milliseconds per host frame.
    #[serde(default = "default_frame_interval_ms")]
    pub frame_interval_ms: u64,

    /// Stop after this many frames (0 = run until interrupted).
    #[serde(default)]
    pub max_frames: u64,

    /// Start with time stopped.
    #[serde(default)]
    pub paused: bool,

    /// Minute count already in the persisted slot at start-up, as after
    /// loading a save (0 = new game).
    #[serde(default)]
    pub saved_minutes: i64,

    /// Note text of the map the demo host starts on.
    #[serde(default = "default_map_note")]
    pub map_note: String,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            frames_per_minute: default_frames_per_minute(),
            frame_interval_ms: default_frame_interval_ms(),
            max_frames: 0,
            paused: false,
            saved_minutes: 0,
            map_note: default_map_note(),
        }
    }
}

impl FlowConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.frames_per_minute == 0 {
            return Err(ConfigError::Invalid {
                reason: "flow.frames_per_minute must be at least 1".to_owned(),
            });
        }
        if self.frame_interval_ms == 0 {
            return Err(ConfigError::Invalid {
                reason: "flow.frame_interval_ms must be at least 1".to_owned(),
            });
        }
        if self.saved_minutes < 0 {
            return Err(ConfigError::Invalid {
                reason: "flow.saved_minutes must not be negative".to_owned(),
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

/// Output format for log lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Line format.
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

fn default_start_time() -> String {
    "8:00 AM".to_owned()
}

fn default_day_start() -> String {
    "6:00 AM".to_owned()
}

fn default_night_start() -> String {
    "8:00 PM".to_owned()
}

fn default_outside_keyword() -> String {
    DEFAULT_OUTSIDE_KEYWORD.to_owned()
}

fn default_neutral_tone() -> String {
    "(0, 0, 0, 0)".to_owned()
}

fn default_night_tone() -> String {
    "(-68, -68, -14, 41)".to_owned()
}

fn default_dawn_start() -> String {
    "5:00 AM".to_owned()
}

fn default_dusk_start() -> String {
    "6:00 PM".to_owned()
}

const fn default_minutes_per_phase() -> u32 {
    30
}

fn default_dawn_phases() -> String {
    "(-51, -51, -10, 31) (-34, -34, -7, 20) (-17, -17, -3, 10)".to_owned()
}

fn default_dusk_phases() -> String {
    "(17, -17, -34, 0) (-17, -34, -34, 20) (-51, -51, -10, 31)".to_owned()
}

const fn default_fade_frames() -> u32 {
    60
}

const fn default_frames_per_minute() -> u32 {
    60
}

const fn default_frame_interval_ms() -> u64 {
    16
}

fn default_map_note() -> String {
    "<lighting: outside>".to_owned()
}

fn default_log_level() -> String {
    "info".to_owned()
}
