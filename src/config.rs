//! # Configuration Module
//!
//! Handles loading and validating configuration from TOML files.

use serde::de::Error;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::crsf::decoder::DecoderConfig;
use crate::crsf::protocol::CRSF_NUM_CHANNELS;
use crate::error::{CrsfRxError, Result};
use crate::telemetry::OutputFormat;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub serial: SerialConfig,

    #[serde(default)]
    pub crsf: CrsfConfig,

    #[serde(default)]
    pub monitor: MonitorConfig,
}

/// Serial port configuration
#[derive(Debug, Deserialize, Clone)]
pub struct SerialConfig {
    /// Empty means auto-detect
    #[serde(default)]
    pub port: String,

    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,

    #[serde(default = "default_reconnect_interval_ms")]
    pub reconnect_interval_ms: u64,

    #[serde(default = "default_read_buffer_size")]
    pub read_buffer_size: usize,
}

/// CRSF decoder configuration
#[derive(Debug, Deserialize, Clone)]
pub struct CrsfConfig {
    #[serde(default = "default_frame_timeout_us")]
    pub frame_timeout_us: u32,

    #[serde(default = "default_link_timeout_ms")]
    pub link_timeout_ms: u32,

    #[serde(default = "default_decoded_channels")]
    pub decoded_channels: usize,
}

/// Channel monitor output configuration
#[derive(Debug, Deserialize, Clone)]
pub struct MonitorConfig {
    #[serde(default = "default_print_interval_ms")]
    pub print_interval_ms: u64,

    #[serde(default)]
    pub format: OutputFormat,

    #[serde(default = "default_channels_shown")]
    pub channels_shown: usize,
}

// Default value functions
fn default_baud_rate() -> u32 { 420000 }
fn default_reconnect_interval_ms() -> u64 { 1000 }
fn default_read_buffer_size() -> usize { 64 }

fn default_frame_timeout_us() -> u32 { 1750 }
fn default_link_timeout_ms() -> u32 { 500 }
fn default_decoded_channels() -> usize { 8 }

fn default_print_interval_ms() -> u64 { 20 }
fn default_channels_shown() -> usize { 8 }

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            port: String::new(),
            baud_rate: default_baud_rate(),
            reconnect_interval_ms: default_reconnect_interval_ms(),
            read_buffer_size: default_read_buffer_size(),
        }
    }
}

impl Default for CrsfConfig {
    fn default() -> Self {
        Self {
            frame_timeout_us: default_frame_timeout_us(),
            link_timeout_ms: default_link_timeout_ms(),
            decoded_channels: default_decoded_channels(),
        }
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            print_interval_ms: default_print_interval_ms(),
            format: OutputFormat::default(),
            channels_shown: default_channels_shown(),
        }
    }
}

impl CrsfConfig {
    /// Decoder settings derived from this section
    pub fn decoder_config(&self) -> DecoderConfig {
        DecoderConfig {
            frame_timeout_us: self.frame_timeout_us,
            link_timeout_us: self.link_timeout_us(),
            decoded_channels: self.decoded_channels,
        }
    }

    pub fn link_timeout_us(&self) -> u32 {
        self.link_timeout_ms.saturating_mul(1000)
    }
}

fn invalid(message: impl std::fmt::Display) -> CrsfRxError {
    CrsfRxError::Config(toml::de::Error::custom(message))
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
    /// Returns error if:
    /// - File cannot be read
    /// - TOML parsing fails
    /// - Validation fails
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use crsf_rx::config::Config;
    ///
    /// let config = Config::load("config/default.toml")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse and validate configuration from a TOML string
    pub fn parse(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns error if any configuration value is out of valid range
    pub fn validate(&self) -> Result<()> {
        // Validate baud rate
        if ![115200, 400000, 420000, 921600, 1870000, 3750000].contains(&self.serial.baud_rate) {
            return Err(invalid(
                "baud_rate must be one of: 115200, 400000, 420000, 921600, 1870000, 3750000",
            ));
        }

        if self.serial.reconnect_interval_ms == 0 || self.serial.reconnect_interval_ms > 60000 {
            return Err(invalid("reconnect_interval_ms must be between 1 and 60000"));
        }

        if self.serial.read_buffer_size == 0 || self.serial.read_buffer_size > 4096 {
            return Err(invalid("read_buffer_size must be between 1 and 4096"));
        }

        // Validate decoder timing
        if self.crsf.frame_timeout_us == 0 || self.crsf.frame_timeout_us > 100_000 {
            return Err(invalid("frame_timeout_us must be between 1 and 100000"));
        }

        if self.crsf.link_timeout_ms == 0 || self.crsf.link_timeout_ms > 60000 {
            return Err(invalid("link_timeout_ms must be between 1 and 60000"));
        }

        if self.crsf.decoded_channels == 0 || self.crsf.decoded_channels > CRSF_NUM_CHANNELS {
            return Err(invalid(format!(
                "decoded_channels must be between 1 and {}",
                CRSF_NUM_CHANNELS
            )));
        }

        // Validate monitor output
        if self.monitor.print_interval_ms == 0 || self.monitor.print_interval_ms > 60000 {
            return Err(invalid("print_interval_ms must be between 1 and 60000"));
        }

        if self.monitor.channels_shown == 0 || self.monitor.channels_shown > CRSF_NUM_CHANNELS {
            return Err(invalid(format!(
                "channels_shown must be between 1 and {}",
                CRSF_NUM_CHANNELS
            )));
        }

        Ok(())
    }
}
