//! Configuration management for the wave editor.
//!
//! Loads configuration from TOML files: snapping, hit-test tolerances,
//! wave colors, rule thresholds and undo depth.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub snap: SnapSettings,
    pub hit_test: HitTestConfig,
    pub colors: ColorConfig,
    pub rules: RulesConfig,
    pub history: HistoryConfig,
}

impl Config {
    /// Load configuration from a file path.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration from default locations.
    ///
    /// Searches in order:
    /// 1. `./wavecharter.toml`
    /// 2. `~/.config/wavecharter/config.toml`
    ///
    /// Returns default config if no file found.
    pub fn load_default() -> Self {
        if let Ok(config) = Self::load(Self::default_path()) {
            return config;
        }

        if let Some(config_dir) = dirs::config_dir() {
            let config_path = config_dir.join("wavecharter").join("config.toml");
            if let Ok(config) = Self::load(&config_path) {
                return config;
            }
        }

        Self::default()
    }

    /// Save configuration to a file path.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Get the default config file path.
    pub fn default_path() -> PathBuf {
        PathBuf::from("wavecharter.toml")
    }
}

/// Snapping applied to every point placed or dragged on the chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapSettings {
    /// Master toggle.
    pub enabled: bool,
    /// Time grid in seconds (0 disables time snapping).
    pub time_grid_sec: f64,
    /// Price grid step (0 disables price snapping).
    pub price_grid: f64,
    /// Pull points onto the nearest candle's high/low/close.
    pub magnet_hl: bool,
    /// Maximum pixel distance for the magnet to engage.
    pub magnet_px: f64,
}

impl Default for SnapSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            time_grid_sec: 0.0,
            price_grid: 0.0,
            magnet_hl: true,
            magnet_px: 8.0,
        }
    }
}

/// Pixel tolerances used when resolving what the pointer targets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HitTestConfig {
    /// Drawn radius of a point handle.
    pub handle_radius_px: f64,
    /// Extra slack around a handle.
    pub handle_tolerance_px: f64,
    /// Maximum distance from a segment.
    pub segment_tolerance_px: f64,
}

impl Default for HitTestConfig {
    fn default() -> Self {
        Self {
            handle_radius_px: 6.0,
            handle_tolerance_px: 4.0,
            segment_tolerance_px: 6.0,
        }
    }
}

/// Colors assigned to new waves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorConfig {
    pub impulse: String,
    pub correction: String,
    /// Palette cycled through when duplicating waves.
    pub duplicate_palette: Vec<String>,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            impulse: "#22c55e".to_string(),
            correction: "#60a5fa".to_string(),
            duplicate_palette: ["#5B8FF9", "#5AD8A6", "#5D7092", "#F6BD16", "#E8684A", "#6DC8EC"]
                .iter()
                .map(|c| c.to_string())
                .collect(),
        }
    }
}

/// Thresholds for the rule validator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Tolerance for price comparisons.
    pub epsilon: f64,
    /// Minimum relative amplitude difference between waves 2 and 4.
    pub alternation_threshold: f64,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            epsilon: 1e-9,
            alternation_threshold: 0.10,
        }
    }
}

/// Undo history limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Maximum undo entries kept (0 = unbounded).
    pub max_depth: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self { max_depth: 200 }
    }
}
