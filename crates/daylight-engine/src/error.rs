//! Error types for the demo host binary.

/// Top-level error for the demo host.
///
/// Each variant wraps a subsystem error so `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading or validation failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: daylight_core::config::ConfigError,
    },

    /// A command-line clock command or the starting map note is malformed.
    #[error("parse error: {source}")]
    Parse {
        /// The underlying parse error.
        #[from]
        source: daylight_core::parse::ParseError,
    },

    /// The final snapshot could not be serialized.
    #[error("snapshot serialization failed: {source}")]
    Snapshot {
        /// The underlying JSON error.
        #[from]
        source: serde_json::Error,
    },
}
