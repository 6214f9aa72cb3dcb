// ABOUTME: Controller configuration - defaults every request falls back to, loaded from TOML
// Missing config files fall back to built-in defaults; malformed ones are reported

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use crate::animation::SpringConfig;
use crate::channel::ControllerId;
use crate::models::{Color, Position, TextStyle};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    pub id: ControllerId,
    pub position: Position,
    pub margin_from_top: f64,
    pub background_color: Color,
    pub text_color: Color,
    pub button_color: Color,
    pub text_style: TextStyle,
    pub animation_time_ms: u64,
    /// Height used when a request does not carry its own.
    pub max_height: f64,
    pub duration_ms: u64,
    /// Width the gesture threshold is derived from when no screen capability is supplied.
    pub screen_width: f64,
    pub frame_interval_ms: u64,
    pub spring: SpringConfig,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            id: ControllerId::default(),
            position: Position::Bottom,
            margin_from_top: 0.0,
            background_color: Color::rgb(0x32, 0x32, 0x32),
            text_color: Color::rgb(0xff, 0xff, 0xff),
            button_color: Color::rgb(0x03, 0xa9, 0xf4),
            text_style: TextStyle::default(),
            animation_time_ms: 250,
            max_height: 48.0,
            duration_ms: 4000,
            screen_width: 360.0,
            frame_interval_ms: 16,
            spring: SpringConfig::default(),
        }
    }
}

impl ControllerConfig {
    pub const fn animation_time(&self) -> Duration {
        Duration::from_millis(self.animation_time_ms)
    }

    pub const fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms.max(1))
    }

    /// Default location: `<platform config dir>/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "snackbar-box")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Load from the default location, falling back to defaults when there is
    /// no file or it cannot be used.
    pub fn load() -> Self {
        let Some(path) = Self::default_path() else {
            debug!("No config directory available, using defaults");
            return Self::default();
        };

        if !path.exists() {
            debug!("No config file at {:?}, using defaults", path);
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(config) => config,
            Err(e) => {
                warn!("{}; using defaults", e);
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.id.as_str().is_empty() {
            return Err(ConfigError::Invalid("controller id must not be empty".into()));
        }
        if !(self.max_height.is_finite() && self.max_height > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "max_height must be positive, got {}",
                self.max_height
            )));
        }
        if !(self.screen_width.is_finite() && self.screen_width > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "screen_width must be positive, got {}",
                self.screen_width
            )));
        }
        self.spring.validate().map_err(ConfigError::Invalid)
    }
}
