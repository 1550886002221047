//! Configuration management for vendorhal
//!
//! Pin numbers, bus paths and lab loop timings, loaded from TOML. Every
//! field has a default matching the reference board wiring (LED on GPIO 17,
//! ADS1115 at 0x48 on `/dev/i2c-1`, steering sensor on AIN1).

mod sections;

pub use sections::{GpioConfig, I2cConfig, LabConfig, PropertyConfig};

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

/// Standard configuration paths
pub const CONFIG_DIR: &str = "/vendor/etc/vendorhal";
pub const USER_CONFIG_DIR: &str = "/data/vendor/vendorhal";

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorHalConfig {
    #[serde(default)]
    pub gpio: GpioConfig,

    #[serde(default)]
    pub i2c: I2cConfig,

    #[serde(default)]
    pub lab: LabConfig,

    #[serde(default)]
    pub properties: PropertyConfig,
}

impl VendorHalConfig {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        config.validate()?;
        tracing::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Load configuration from default locations
    pub fn load_default() -> Result<Self, ConfigError> {
        Self::load_layered(
            &Path::new(CONFIG_DIR).join("config.toml"),
            &Path::new(USER_CONFIG_DIR).join("config.toml"),
        )
    }

    /// Load the system file with the user file overlaid on top; either may be absent
    pub fn load_layered(system: &Path, user: &Path) -> Result<Self, ConfigError> {
        let mut merged: Option<toml::Value> = None;

        for path in [system, user] {
            if !path.exists() {
                continue;
            }
            let layer: toml::Value = toml::from_str(&std::fs::read_to_string(path)?)?;
            tracing::debug!("Applying configuration layer {}", path.display());
            match merged.as_mut() {
                Some(base) => merge_toml(base, layer),
                None => merged = Some(layer),
            }
        }

        let Some(merged) = merged else {
            tracing::warn!("No configuration file found, using defaults");
            return Ok(Self::default());
        };

        let config: Self = merged.try_into()?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, contents)?;
        tracing::info!("Configuration saved to {}", path.display());
        Ok(())
    }

    /// Reject values the hardware cannot accept
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.i2c.channel > 3 {
            return Err(ConfigError::Invalid(format!(
                "i2c.channel must be 0-3, got {}",
                self.i2c.channel
            )));
        }
        if self.i2c.address > 0x7F {
            return Err(ConfigError::Invalid(format!(
                "i2c.address must be a 7-bit address, got 0x{:x}",
                self.i2c.address
            )));
        }
        if self.lab.interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "lab.interval_ms must be greater than zero".to_string(),
            ));
        }
        if self.properties.reverse_gear.is_empty() {
            return Err(ConfigError::Invalid(
                "properties.reverse_gear must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Helper function to merge TOML values
pub fn merge_toml(base: &mut toml::Value, overlay: toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base_table), toml::Value::Table(overlay_table)) => {
            for (key, value) in overlay_table {
                if let Some(base_value) = base_table.get_mut(&key) {
                    merge_toml(base_value, value);
                } else {
                    base_table.insert(key, value);
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}
