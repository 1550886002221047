//! Per-subsystem configuration sections

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// GPIO settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GpioConfig {
    /// Sysfs GPIO class directory
    #[serde(default = "default_sysfs_root")]
    pub sysfs_root: PathBuf,

    /// Pin the LED is wired to
    #[serde(default = "default_led_pin")]
    pub led_pin: u32,
}

fn default_sysfs_root() -> PathBuf {
    PathBuf::from("/sys/class/gpio")
}

fn default_led_pin() -> u32 {
    17
}

impl Default for GpioConfig {
    fn default() -> Self {
        Self {
            sysfs_root: default_sysfs_root(),
            led_pin: default_led_pin(),
        }
    }
}

/// I2C / ADS1115 settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct I2cConfig {
    /// i2c-dev bus device
    #[serde(default = "default_bus")]
    pub bus: PathBuf,

    /// ADS1115 slave address
    #[serde(default = "default_address")]
    pub address: u16,

    /// Input the steering sensor is wired to (0-3)
    #[serde(default = "default_channel")]
    pub channel: u8,

    /// Delay between starting a conversion and reading it, in milliseconds
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,
}

fn default_bus() -> PathBuf {
    PathBuf::from("/dev/i2c-1")
}

fn default_address() -> u16 {
    0x48
}

fn default_channel() -> u8 {
    1
}

fn default_settle_ms() -> u64 {
    10
}

impl Default for I2cConfig {
    fn default() -> Self {
        Self {
            bus: default_bus(),
            address: default_address(),
            channel: default_channel(),
            settle_ms: default_settle_ms(),
        }
    }
}

/// Lab loop settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabConfig {
    /// Number of LED toggles
    #[serde(default = "default_toggle_iterations")]
    pub toggle_iterations: u32,

    /// Loop period in milliseconds
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
}

fn default_toggle_iterations() -> u32 {
    10
}

fn default_interval_ms() -> u64 {
    1000
}

impl Default for LabConfig {
    fn default() -> Self {
        Self {
            toggle_iterations: default_toggle_iterations(),
            interval_ms: default_interval_ms(),
        }
    }
}

/// System property settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyConfig {
    /// Directory holding one file per property
    #[serde(default = "default_property_dir")]
    pub dir: PathBuf,

    /// Property that reports reverse gear engaged
    #[serde(default = "default_reverse_gear")]
    pub reverse_gear: String,
}

fn default_property_dir() -> PathBuf {
    PathBuf::from("/data/vendor/vendorhal/properties")
}

fn default_reverse_gear() -> String {
    "reversegear".to_string()
}

impl Default for PropertyConfig {
    fn default() -> Self {
        Self {
            dir: default_property_dir(),
            reverse_gear: default_reverse_gear(),
        }
    }
}
