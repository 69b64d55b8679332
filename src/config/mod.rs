// SPDX-License-Identifier: MPL-2.0
//! This module handles the engine's configuration, including loading and saving
//! tunables to a `playback.toml` file.
//!
//! Configuration is a plain value handed to the controller when it starts;
//! nothing here is global state.
//!
//! # Examples
//!
//! ```no_run
//! use ethowild::config::{self, EngineConfig};
//!
//! // Load existing configuration
//! let mut config = config::load().unwrap_or_default();
//!
//! // Modify a setting
//! config.buffer_capacity = 24;
//!
//! // Save the modified configuration
//! config::save(&config).expect("Failed to save config");
//! ```

pub mod defaults;

pub use defaults::*;

use crate::domain::video::BufferCapacity;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_FILE: &str = "playback.toml";
const APP_NAME: &str = "EthoWild";

/// Tunables of the playback engine.
///
/// Every field is optional in the file; missing fields take their default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Number of decoded frames held ahead of emission.
    pub buffer_capacity: usize,
    /// Frame rate used when the source reports none.
    pub default_fps: f64,
    /// Sleep while paused, in milliseconds.
    pub pause_poll_ms: u64,
    /// Sleep while waiting for the decoder, in milliseconds.
    pub starved_poll_ms: u64,
    /// Restart from the beginning at end of stream.
    pub loop_playback: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
            default_fps: DEFAULT_FPS,
            pause_poll_ms: DEFAULT_PAUSE_POLL_MS,
            starved_poll_ms: DEFAULT_STARVED_POLL_MS,
            loop_playback: DEFAULT_LOOP_PLAYBACK,
        }
    }
}

impl EngineConfig {
    /// Buffer capacity, clamped to its valid range.
    #[must_use]
    pub fn capacity(&self) -> BufferCapacity {
        BufferCapacity::new(self.buffer_capacity)
    }

    /// Fallback frame rate, guaranteed positive.
    #[must_use]
    pub fn fallback_fps(&self) -> f64 {
        if self.default_fps.is_finite() && self.default_fps > 0.0 {
            self.default_fps
        } else {
            DEFAULT_FPS
        }
    }

    /// Sleep applied per iteration while paused.
    #[must_use]
    pub fn pause_poll_interval(&self) -> Duration {
        Duration::from_millis(self.pause_poll_ms.clamp(MIN_POLL_MS, MAX_POLL_MS))
    }

    /// Sleep applied per iteration while the buffer is empty.
    #[must_use]
    pub fn starved_poll_interval(&self) -> Duration {
        Duration::from_millis(self.starved_poll_ms.clamp(MIN_POLL_MS, MAX_POLL_MS))
    }
}

fn get_default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|mut path| {
        path.push(APP_NAME);
        path.push(CONFIG_FILE);
        path
    })
}

/// Loads the configuration from the per-user config directory, or the
/// defaults when no file exists there.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read.
pub fn load() -> Result<EngineConfig> {
    if let Some(path) = get_default_config_path() {
        if path.exists() {
            return load_from_path(&path);
        }
    }
    Ok(EngineConfig::default())
}

/// Saves the configuration to the per-user config directory.
///
/// # Errors
///
/// Returns an error if the file cannot be serialized or written.
pub fn save(config: &EngineConfig) -> Result<()> {
    if let Some(path) = get_default_config_path() {
        return save_to_path(config, &path);
    }
    Ok(())
}

/// Loads the configuration from `path`. Unparsable content yields the
/// defaults.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn load_from_path(path: &Path) -> Result<EngineConfig> {
    let content = fs::read_to_string(path)?;
    match toml::from_str(&content) {
        Ok(config) => Ok(config),
        Err(e) => {
            log::warn!(
                "Ignoring invalid config {}: {e}; using defaults",
                path.display()
            );
            Ok(EngineConfig::default())
        }
    }
}

/// Saves the configuration to `path`, creating parent directories.
///
/// # Errors
///
/// Returns an error if the file cannot be serialized or written.
pub fn save_to_path(config: &EngineConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config)?;
    fs::write(path, content)?;
    Ok(())
}
