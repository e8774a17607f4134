//! JSON configuration for the viewer.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};
use crate::map::projection::{Projection, ProjectionKind};
use crate::map::viewport::ViewportParams;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobeConfig {
    #[serde(default)]
    pub projection: ProjectionKind,

    /// Initial view center in degrees
    #[serde(default)]
    pub center_lon_deg: f64,
    #[serde(default = "default_center_lat")]
    pub center_lat_deg: f64,

    /// 1.0 puts the globe radius at 35% of the viewport width
    #[serde(default = "default_zoom")]
    pub zoom: f64,

    /// Graticule nodes per quarter circle
    #[serde(default = "default_grid_precision")]
    pub grid_precision: usize,
    #[serde(default = "default_true")]
    pub show_grid: bool,
    #[serde(default = "default_true")]
    pub show_shape: bool,
    #[serde(default)]
    pub show_tropics: bool,
    /// Tile flat maps horizontally
    #[serde(default)]
    pub repeat_x: bool,

    /// User latitude bounds in degrees, clamped to what each projection supports
    #[serde(default)]
    pub min_lat_deg: Option<f64>,
    #[serde(default)]
    pub max_lat_deg: Option<f64>,

    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Log destination; logging is off without one
    #[serde(default)]
    pub log_file: Option<PathBuf>,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_center_lat() -> f64 {
    20.0
}

fn default_zoom() -> f64 {
    1.0
}

fn default_grid_precision() -> usize {
    20
}

fn default_true() -> bool {
    true
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for GlobeConfig {
    fn default() -> Self {
        Self {
            projection: ProjectionKind::default(),
            center_lon_deg: 0.0,
            center_lat_deg: default_center_lat(),
            zoom: default_zoom(),
            grid_precision: default_grid_precision(),
            show_grid: true,
            show_shape: true,
            show_tropics: false,
            repeat_x: false,
            min_lat_deg: None,
            max_lat_deg: None,
            data_dir: default_data_dir(),
            log_file: None,
            log_level: default_log_level(),
        }
    }
}

impl GlobeConfig {
    /// Read and validate a config file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Like [`GlobeConfig::load`], but a missing file yields the defaults.
    pub fn load_or_default(path: &Path) -> ConfigResult<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if !(self.zoom.is_finite() && self.zoom > 0.0) {
            return Err(ConfigError::InvalidZoom(self.zoom));
        }
        if self.grid_precision == 0 {
            return Err(ConfigError::InvalidPrecision(self.grid_precision));
        }
        if let (Some(min), Some(max)) = (self.min_lat_deg, self.max_lat_deg) {
            if min > max {
                return Err(ConfigError::InvalidLatitudeBounds { min, max });
            }
        }
        Ok(())
    }

    /// Construct a projection of `kind` with this config's latitude bounds
    /// and repeat setting applied.
    pub fn build_projection(&self, kind: ProjectionKind) -> Box<dyn Projection> {
        let mut projection = kind.build();
        if let Some(max) = self.max_lat_deg {
            projection.set_max_lat(max.to_radians());
        }
        if let Some(min) = self.min_lat_deg {
            projection.set_min_lat(min.to_radians());
        }
        projection.set_repeat_x(self.repeat_x);
        projection
    }

    /// Initial viewport for a `width` x `height` pixel area.
    pub fn viewport(&self, width: usize, height: usize) -> ViewportParams {
        ViewportParams::centered_on(
            self.center_lon_deg.to_radians(),
            self.center_lat_deg.to_radians(),
            0.35 * width as f64 * self.zoom,
            width,
            height,
        )
    }
}
