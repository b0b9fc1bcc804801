//! Configuration for the overlay: window geometry, animation timing, hover
//! debounce and sampling cadence.
//!
//! Loaded from `edge-monitor/config.toml` under the platform config
//! directory; every field has a default so a missing or partial file works.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{EmonError, Result};

/// Window geometry in screen pixels.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Vertical offset of the docked window from the top of the screen
    pub y: f64,
    /// Strip left visible when fully retracted
    pub hide_gap: f64,
    pub compact_width: f64,
    pub compact_height: f64,
    pub expanded_width: f64,
    pub expanded_height: f64,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            y: 60.0,
            hide_gap: 8.0,
            compact_width: 405.0,
            compact_height: 260.0,
            expanded_width: 820.0,
            expanded_height: 520.0,
        }
    }
}

/// Slide animation tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Pixels moved per frame
    pub step: f64,
    /// Delay between frames in milliseconds
    pub frame_delay_ms: u64,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            step: 18.0,
            frame_delay_ms: 10,
        }
    }
}

/// Hover enter/leave handling.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HoverConfig {
    /// Quiet period after a leave before the close check fires
    pub debounce_ms: u64,
}

impl Default for HoverConfig {
    fn default() -> Self {
        Self { debounce_ms: 700 }
    }
}

/// Metrics sampling cadence and disk path policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingConfig {
    /// Tick period in milliseconds
    pub interval_ms: u64,
    /// Disk usage path tried first (Windows-style root by default)
    pub primary_disk_path: String,
    /// Fallback when the primary path is unavailable (POSIX root)
    pub fallback_disk_path: String,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            interval_ms: 1000,
            primary_disk_path: "C:\\".to_string(),
            fallback_disk_path: "/".to_string(),
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub window: WindowConfig,
    pub animation: AnimationConfig,
    pub hover: HoverConfig,
    pub sampling: SamplingConfig,
}

impl Config {
    /// Default config file location (`$XDG_CONFIG_HOME` or `~/.config` on
    /// unix, `%APPDATA%` on Windows).
    pub fn default_path() -> Option<PathBuf> {
        let base = if cfg!(windows) {
            std::env::var_os("APPDATA").map(PathBuf::from)
        } else {
            std::env::var_os("XDG_CONFIG_HOME")
                .map(PathBuf::from)
                .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))
        };
        base.map(|b| b.join("edge-monitor").join("config.toml"))
    }

    /// Load from the default location; a missing file yields defaults.
    pub fn load() -> Result<Self> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        toml::from_str(&text).map_err(|e| EmonError::Configuration(e.to_string()))
    }

    /// Write to the default location, creating parent directories.
    pub fn save(&self) -> Result<()> {
        let path = Self::default_path()
            .ok_or_else(|| EmonError::Configuration("no config directory".to_string()))?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let text =
            toml::to_string_pretty(self).map_err(|e| EmonError::Configuration(e.to_string()))?;
        std::fs::write(path, text)?;
        Ok(())
    }
}
