//! # Configuration Module
//!
//! Handles loading and validating configuration from TOML files.

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::{GroundError, Result};

/// Baud rates the transport layer accepts, matching the rates offered by the
/// ground-station port chooser.
pub const SUPPORTED_BAUD_RATES: &[u32] = &[9600, 19200, 57600, 115200, 230400, 460800];

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub serial: SerialConfig,

    #[serde(default)]
    pub refresh: RefreshConfig,

    #[serde(default)]
    pub history: HistoryConfig,

    #[serde(default)]
    pub recorder: RecorderConfig,
}

/// Serial port configuration
#[derive(Debug, Deserialize, Clone)]
pub struct SerialConfig {
    #[serde(default = "default_serial_port")]
    pub port: String,

    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,
}

/// Refresh scheduler configuration
#[derive(Debug, Deserialize, Clone)]
pub struct RefreshConfig {
    /// Enables timer-driven history capture and render payload rebuilds
    #[serde(default = "default_auto_refresh")]
    pub auto_refresh: bool,

    /// Timer rate in Hz; the effective period is floored at 10 ms
    #[serde(default = "default_refresh_hz")]
    pub refresh_hz: u32,
}

/// Rolling history configuration
#[derive(Debug, Deserialize, Clone)]
pub struct HistoryConfig {
    #[serde(default = "default_history_capacity")]
    pub capacity: usize,
}

/// Launch recorder configuration
#[derive(Debug, Deserialize, Clone)]
pub struct RecorderConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_log_dir")]
    pub log_dir: String,

    #[serde(default = "default_launch_number")]
    pub launch_number: u32,
}

// Default value functions
fn default_serial_port() -> String { "/dev/ttyUSB0".to_string() }
fn default_baud_rate() -> u32 { 115200 }

fn default_auto_refresh() -> bool { true }
fn default_refresh_hz() -> u32 { 10 }

fn default_history_capacity() -> usize { 200 }

fn default_log_dir() -> String { "./launch_data".to_string() }
fn default_launch_number() -> u32 { 1 }

impl Default for Config {
    fn default() -> Self {
        Self {
            serial: SerialConfig::default(),
            refresh: RefreshConfig::default(),
            history: HistoryConfig::default(),
            recorder: RecorderConfig::default(),
        }
    }
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            port: default_serial_port(),
            baud_rate: default_baud_rate(),
        }
    }
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            auto_refresh: default_auto_refresh(),
            refresh_hz: default_refresh_hz(),
        }
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            capacity: default_history_capacity(),
        }
    }
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            log_dir: default_log_dir(),
            launch_number: default_launch_number(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration file
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read, TOML parsing fails, or
    /// validation fails.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns error if any value is out of range.
    pub fn validate(&self) -> Result<()> {
        if self.refresh.refresh_hz < 1 {
            return Err(GroundError::Config(
                "refresh.refresh_hz must be at least 1".to_string(),
            ));
        }

        if self.history.capacity < 1 {
            return Err(GroundError::Config(
                "history.capacity must be at least 1".to_string(),
            ));
        }

        if !SUPPORTED_BAUD_RATES.contains(&self.serial.baud_rate) {
            return Err(GroundError::UnsupportedBaudRate(self.serial.baud_rate));
        }

        Ok(())
    }
}
