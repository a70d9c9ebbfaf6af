use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::view_mode::ViewMode;

pub const MIN_UPDATE_INTERVAL_SECS: f64 = 1.0;
pub const MAX_UPDATE_INTERVAL_SECS: f64 = 10.0;
const UPDATE_INTERVAL_STEP_SECS: f64 = 0.5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Sampler cadence in seconds
    pub update_interval_secs: f64,
    pub process_cache_ttl_ms: u64,
    /// Wait between SIGTERM and SIGKILL
    pub terminate_grace_ms: u64,
    pub queue_capacity: usize,
    /// How often the front end drains the handoff queue
    pub poll_interval_ms: u64,
    pub history_capacity: usize,
    pub tick_timeout_ms: u64,
    /// Longest a read waits for a source held by a sampler tick
    pub source_wait_ms: u64,
    pub view_mode: ViewMode,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            update_interval_secs: 2.0,
            process_cache_ttl_ms: 2000,
            terminate_grace_ms: 500,
            queue_capacity: 8,
            poll_interval_ms: 1000,
            history_capacity: 60,
            tick_timeout_ms: 5000,
            source_wait_ms: 500,
            view_mode: ViewMode::Minimal,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::get_config_path()?)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::get_config_path()?)
    }

    /// Read `path`; a missing, empty or unreadable-as-JSON file yields defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let data = fs::read(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        if data.is_empty() {
            return Ok(Config::default());
        }

        let config = serde_json::from_slice::<Config>(&data).unwrap_or_else(|e| {
            log::warn!("Ignoring unreadable config {:?}: {}", path, e);
            Config::default()
        });

        Ok(config.normalized())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let data = serde_json::to_vec_pretty(self).with_context(|| "Failed to serialize config")?;

        fs::write(path, data)
            .with_context(|| format!("Failed to write config file: {:?}", path))?;

        Ok(())
    }

    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir =
            dirs::config_dir().with_context(|| "Could not determine config directory")?;

        Ok(config_dir.join("bytedog").join("config.json"))
    }

    /// Set the sampler cadence, clamped to 1-10 s in half-second steps.
    /// Returns the value actually stored.
    pub fn set_update_interval(&mut self, secs: f64) -> f64 {
        self.update_interval_secs = clamp_interval(secs);
        self.update_interval_secs
    }

    pub fn update_interval(&self) -> Duration {
        Duration::from_secs_f64(clamp_interval(self.update_interval_secs))
    }

    pub fn process_cache_ttl(&self) -> Duration {
        Duration::from_millis(self.process_cache_ttl_ms)
    }

    pub fn terminate_grace(&self) -> Duration {
        Duration::from_millis(self.terminate_grace_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn tick_timeout(&self) -> Duration {
        Duration::from_millis(self.tick_timeout_ms)
    }

    pub fn source_wait(&self) -> Duration {
        Duration::from_millis(self.source_wait_ms)
    }

    pub fn reset_to_defaults(&mut self) {
        *self = Config::default();
    }

    fn normalized(mut self) -> Self {
        self.update_interval_secs = clamp_interval(self.update_interval_secs);
        self
    }
}

fn clamp_interval(secs: f64) -> f64 {
    if !secs.is_finite() {
        return Config::default().update_interval_secs;
    }
    let stepped = (secs / UPDATE_INTERVAL_STEP_SECS).round() * UPDATE_INTERVAL_STEP_SECS;
    stepped.clamp(MIN_UPDATE_INTERVAL_SECS, MAX_UPDATE_INTERVAL_SECS)
}
