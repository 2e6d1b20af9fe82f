//! Viewer configuration
//!
//! Window size, camera defaults, and the session-store path, loadable from an
//! optional TOML file next to the binary. Missing file means defaults; a file
//! that exists but fails to parse is reported instead of silently ignored.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("parse error: {0}")]
    Parse(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub window_width: u32,
    pub window_height: u32,
    /// Field-of-view in degrees used by perspective projection.
    pub default_zoom: f32,
    pub movement_speed: f32,
    pub camera_position: [f32; 3],
    pub camera_front: [f32; 3],
    pub camera_up: [f32; 3],
    pub database_path: String,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            window_width: 1000,
            window_height: 800,
            default_zoom: 80.0,
            movement_speed: 20.0,
            camera_position: [0.0, 5.0, 12.0],
            camera_front: [0.0, -0.5, -2.0],
            camera_up: [0.0, 1.0, 0.0],
            database_path: "deskview.db".to_string(),
        }
    }
}

impl ViewerConfig {
    /// Loads configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        toml::from_str(&contents).map_err(|err| ConfigError::Parse(err.to_string()))
    }

    /// Loads `path` when it exists, falling back to defaults otherwise.
    ///
    /// A present-but-broken file still falls back, loudly.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            log::debug!("no config at {path:?}; using defaults");
            return Self::default();
        }
        match Self::load(path) {
            Ok(config) => config,
            Err(err) => {
                log::error!("config {path:?} ignored: {err}");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_shipped_scene() {
        let config = ViewerConfig::default();
        assert_eq!(config.window_width, 1000);
        assert_eq!(config.window_height, 800);
        assert_eq!(config.default_zoom, 80.0);
        assert_eq!(config.camera_position, [0.0, 5.0, 12.0]);
    }

    #[test]
    fn toml_round_trips() {
        let config = ViewerConfig {
            window_width: 1280,
            movement_speed: 8.5,
            ..Default::default()
        };
        let serialized = toml::to_string(&config).unwrap();
        let parsed: ViewerConfig = toml::from_str(&serialized).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn partial_files_fill_in_defaults() {
        let parsed: ViewerConfig = toml::from_str("window_width = 640\n").unwrap();
        assert_eq!(parsed.window_width, 640);
        assert_eq!(parsed.window_height, 800);
        assert_eq!(parsed.database_path, "deskview.db");
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = ViewerConfig::load_or_default("does-not-exist.toml");
        assert_eq!(config, ViewerConfig::default());
    }
}
