//! Bridge configuration.
//!
//! Loaded from `~/.beacon-bridge/config.toml` unless `--config` names another
//! file. Every key is optional; a missing default file means all defaults.
//!
//! ```toml
//! stop-tolerance-cm = 200
//! max-service-speed = 110
//! tasc-thresholds = [900.0, 700.0, 500.0, 300.0, 10.0]
//! log-filter = "info"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::engine::EngineSettings;

/// Bridge configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    /// TASC stopping tolerance sent at the start of each run, in centimeters.
    pub stop_tolerance_cm: i32,

    /// Maximum service speed sent at the start of each run, in km/h.
    pub max_service_speed: i32,

    /// Distances before a stop at which TASC proximity beacons are emulated.
    pub tasc_thresholds: Vec<f32>,

    /// Log filter directive, used when `RUST_LOG` is not set.
    pub log_filter: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        let settings = EngineSettings::default();
        Self {
            stop_tolerance_cm: settings.stop_tolerance_cm,
            max_service_speed: settings.max_service_speed,
            tasc_thresholds: settings.tasc_thresholds,
            log_filter: None,
        }
    }
}

impl Config {
    /// Load config from `explicit`, or from the default path if it exists.
    ///
    /// An explicit path must exist. Invalid files are errors either way.
    pub fn load(explicit: Option<&Path>) -> Result<Self, String> {
        let path = match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(format!("no config file found at {}", path.display()));
                }
                path.to_path_buf()
            }
            None => match Self::path() {
                Some(path) if path.exists() => path,
                _ => return Ok(Self::default()),
            },
        };

        let contents = fs::read_to_string(&path)
            .map_err(|e| format!("failed to read {}: {e}", path.display()))?;

        Self::parse(&contents).map_err(|e| format!("invalid config at {}: {e}", path.display()))
    }

    /// The default config file path: `~/.beacon-bridge/config.toml`.
    pub fn path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".beacon-bridge").join("config.toml"))
    }

    /// Engine settings derived from this config.
    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            stop_tolerance_cm: self.stop_tolerance_cm,
            max_service_speed: self.max_service_speed,
            tasc_thresholds: self.tasc_thresholds.clone(),
        }
    }

    fn parse(contents: &str) -> Result<Self, String> {
        let config: Self = toml::from_str(contents).map_err(|e| e.to_string())?;

        if config.max_service_speed <= 0 {
            return Err("max-service-speed must be positive".to_string());
        }
        if config.stop_tolerance_cm < 0 {
            return Err("stop-tolerance-cm must not be negative".to_string());
        }
        if config.tasc_thresholds.iter().any(|&t| t <= 0.0) {
            return Err("tasc-thresholds must be positive".to_string());
        }
        if config.tasc_thresholds.windows(2).any(|w| w[0] <= w[1]) {
            return Err("tasc-thresholds must be strictly descending".to_string());
        }

        Ok(config)
    }
}
