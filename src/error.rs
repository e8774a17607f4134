use std::path::PathBuf;

use thiserror::Error;

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors raised while loading or validating a [`crate::config::GlobeConfig`].
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// Latitude bounds in degrees, min must not exceed max
    #[error("invalid latitude bounds: min {min}° > max {max}°")]
    InvalidLatitudeBounds { min: f64, max: f64 },

    #[error("grid precision must be at least 1, got {0}")]
    InvalidPrecision(usize),

    #[error("zoom must be a positive finite number, got {0}")]
    InvalidZoom(f64),

    #[error("unknown projection '{0}' (expected spherical, equirect, mercator or conic)")]
    UnknownProjection(String),
}
