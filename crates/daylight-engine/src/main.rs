//! Demo host for the Daylight time-of-day engine.
//!
//! Stands in for a game runtime: an in-memory switch/variable store, one
//! map whose note selects its lighting, and a fixed-rate frame loop that
//! lets in-universe time pass.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `daylight-config.yaml` (or `DAYLIGHT_CONFIG`)
//! 2. Initialize structured logging (tracing)
//! 3. Build the clock settings and the tone resolver
//! 4. Protect the reserved switches and hand the capability to the clock
//! 5. Start a new game or resync a save, then enter the starting map
//! 6. Apply clock commands given on the command line
//! 7. Run the frame loop until `max_frames` or Ctrl-C
//! 8. Log the final clock snapshot

mod error;
mod flow;
mod screen;

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

use daylight_core::clock::GameClock;
use daylight_core::command::ClockCommand;
use daylight_core::config::{DaylightConfig, LogFormat, LoggingConfig};
use daylight_core::guard::protect;
use daylight_core::host::{HostState, MemoryHost};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;
use crate::flow::TimeFlow;
use crate::screen::{Screen, ScreenListener};

/// Environment variable naming the configuration file.
const CONFIG_ENV: &str = "DAYLIGHT_CONFIG";

/// Configuration file used when `DAYLIGHT_CONFIG` is unset.
const DEFAULT_CONFIG_PATH: &str = "daylight-config.yaml";

/// Application entry point for the demo host.
///
/// # Errors
///
/// Returns an error if configuration is invalid or a command-line clock
/// command cannot be parsed.
#[tokio::main(flavor = "current_thread")]
#[allow(clippy::too_many_lines)]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration.
    let (config, source) = load_config()?;

    // 2. Initialize structured logging.
    init_logging(&config.logging);
    info!(config = %source, "daylight-engine starting");

    // 3. Build runtime values.
    let settings = config.build()?;
    info!(
        start_time = %settings.clock.start_time,
        day_start = %settings.clock.bounds.day_start(),
        night_start = %settings.clock.bounds.night_start(),
        presets = settings.lighting.presets().len(),
        "Configuration loaded"
    );

    // 4. Wire the host, the guard, and the clock.
    let host = Rc::new(RefCell::new(MemoryHost::with_minutes(config.flow.saved_minutes)));
    let (switches, access) = protect(Rc::clone(&host), settings.sync);
    let reserved: Vec<String> = settings
        .sync
        .reserved_switches()
        .map(|id| id.to_string())
        .collect();
    info!(reserved = ?reserved, "Reserved switches protected");

    let screen = Rc::new(RefCell::new(Screen::new(
        settings.lighting.clone(),
        settings.fade_frames,
    )));
    let listener = ScreenListener::new(Rc::clone(&screen));
    let mut clock = GameClock::new(settings.clock, access, Box::new(listener));

    // 5. Start or resume, then enter the starting map.
    let resumed = host.borrow().stored_minutes() != 0;
    let entered = screen::start(&mut clock, &screen, &config.flow.map_note)?;
    info!(resumed, tone = %entered.tone, "Starting map tinted");

    // 6. Command-line clock commands.
    for arg in std::env::args().skip(1) {
        let command: ClockCommand = arg.parse().map_err(EngineError::from)?;
        command.apply(&mut clock);
    }
    info!(
        snapshot = %clock.snapshot(),
        start_time = %clock.settings().start_time,
        phase = %settings.lighting.phase_at(clock.now()),
        guard_open = switches.is_guard_open(),
        "Clock ready"
    );

    // 7. Frame loop.
    let mut flow = TimeFlow::new(config.flow.frames_per_minute, config.flow.paused);
    let mut interval = tokio::time::interval(Duration::from_millis(config.flow.frame_interval_ms));
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);
    let max_frames = config.flow.max_frames;
    let mut frames: u64 = 0;

    info!(
        frames_per_minute = config.flow.frames_per_minute,
        frame_interval_ms = config.flow.frame_interval_ms,
        max_frames,
        paused = flow.is_paused(),
        "Entering frame loop"
    );

    while max_frames == 0 || frames < max_frames {
        tokio::select! {
            _ = interval.tick() => {}
            _ = &mut shutdown => {
                info!(frames, "Interrupted");
                break;
            }
        }
        frames = frames.saturating_add(1);

        if flow.tick() {
            clock.advance_minutes(1);
        }
        let stepped = screen.borrow_mut().step();
        if let Some(tone) = stepped {
            debug!(tone = %tone, target = %screen.borrow().target(), "Fade step");
        }
    }

    // 8. Log results.
    let snapshot = clock.snapshot();
    let json = serde_json::to_string(&snapshot).map_err(EngineError::from)?;
    info!(
        frames,
        snapshot = %json,
        tone = %screen.borrow().shown(),
        fading = screen.borrow().is_fading(),
        "daylight-engine shutdown complete"
    );

    Ok(())
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over the configured level when set.
fn init_logging(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    match logging.format {
        LogFormat::Pretty => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .init(),
    }
}

/// Load configuration from `DAYLIGHT_CONFIG` or `daylight-config.yaml`.
///
/// A missing file means defaults (with environment overrides applied).
/// Returns the config and a description of where it came from.
fn load_config() -> Result<(DaylightConfig, String), EngineError> {
    let path = std::env::var_os(CONFIG_ENV)
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);
    if path.exists() {
        let config = DaylightConfig::from_file(&path)?;
        Ok((config, path.display().to_string()))
    } else {
        let mut config = DaylightConfig::default();
        config.clock.apply_env_overrides();
        Ok((config, "defaults".to_owned()))
    }
}
