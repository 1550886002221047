//! GPIO management
//!
//! Handles digital pins through the legacy sysfs interface
//! (`/sys/class/gpio`): export, direction, and value attributes.

use crate::{HalError, Result};
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Default sysfs GPIO class directory
pub const SYSFS_GPIO_ROOT: &str = "/sys/class/gpio";

/// Pin direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    In,
    Out,
}

impl Direction {
    /// Get sysfs name
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::In => "in",
            Direction::Out => "out",
        }
    }

    /// Parse from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "in" => Some(Direction::In),
            "out" => Some(Direction::Out),
            _ => None,
        }
    }
}

/// Digital pin level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PinValue {
    Low,
    High,
}

impl PinValue {
    /// Get sysfs representation
    pub fn as_str(&self) -> &'static str {
        match self {
            PinValue::Low => "0",
            PinValue::High => "1",
        }
    }

    /// Any non-zero level reads as high
    pub fn from_level(level: i64) -> Self {
        if level != 0 {
            PinValue::High
        } else {
            PinValue::Low
        }
    }
}

impl From<bool> for PinValue {
    fn from(value: bool) -> Self {
        if value { PinValue::High } else { PinValue::Low }
    }
}

impl From<PinValue> for bool {
    fn from(value: PinValue) -> Self {
        matches!(value, PinValue::High)
    }
}

/// Pin lifecycle operations shared by the sysfs backend and the mock
pub trait GpioPort {
    /// Check whether the pin has been exported to userspace
    fn is_exported(&self, pin: u32) -> bool;

    /// Export a pin. Exporting an already exported pin succeeds.
    fn export(&mut self, pin: u32) -> Result<()>;

    /// Release a pin. Unexporting a pin that is not exported succeeds.
    fn unexport(&mut self, pin: u32) -> Result<()>;

    fn set_direction(&mut self, pin: u32, direction: Direction) -> Result<()>;

    fn direction(&self, pin: u32) -> Result<Direction>;

    fn set_value(&mut self, pin: u32, value: PinValue) -> Result<()>;

    fn value(&self, pin: u32) -> Result<PinValue>;
}

/// Sysfs GPIO backend
#[derive(Debug, Clone)]
pub struct SysfsGpio {
    root: PathBuf,
}

impl SysfsGpio {
    /// Create a backend on the standard sysfs root
    pub fn new() -> Self {
        Self::with_root(SYSFS_GPIO_ROOT)
    }

    /// Create a backend on a custom root (used for testing)
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Get the sysfs root
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn pin_dir(&self, pin: u32) -> PathBuf {
        self.root.join(format!("gpio{}", pin))
    }

    /// Write to a per-pin attribute; a missing attribute means the pin is not exported
    fn write_attr(&self, pin: u32, attr: &str, contents: &str) -> Result<()> {
        let path = self.pin_dir(pin).join(attr);
        let mut file = OpenOptions::new()
            .write(true)
            .truncate(true)
            .open(&path)
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => HalError::PinNotExported(pin),
                _ => HalError::Io(e),
            })?;
        file.write_all(contents.as_bytes())?;
        Ok(())
    }

    fn read_attr(&self, pin: u32, attr: &str) -> Result<(PathBuf, String)> {
        let path = self.pin_dir(pin).join(attr);
        let contents = fs::read_to_string(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => HalError::PinNotExported(pin),
            _ => HalError::Io(e),
        })?;
        Ok((path, contents))
    }

    /// Write a pin number to one of the class-level control files
    fn write_control(&self, file: &str, pin: u32) -> Result<()> {
        let mut control = OpenOptions::new()
            .write(true)
            .truncate(true)
            .open(self.root.join(file))?;
        control.write_all(pin.to_string().as_bytes())?;
        Ok(())
    }
}

impl Default for SysfsGpio {
    fn default() -> Self {
        Self::new()
    }
}

impl GpioPort for SysfsGpio {
    fn is_exported(&self, pin: u32) -> bool {
        self.pin_dir(pin).is_dir()
    }

    fn export(&mut self, pin: u32) -> Result<()> {
        if self.is_exported(pin) {
            tracing::info!("GPIO pin {} already exported", pin);
            return Ok(());
        }

        self.write_control("export", pin)?;
        tracing::debug!("Exported GPIO {}", pin);
        Ok(())
    }

    fn unexport(&mut self, pin: u32) -> Result<()> {
        if !self.is_exported(pin) {
            return Ok(());
        }

        self.write_control("unexport", pin)?;
        tracing::debug!("Unexported GPIO {}", pin);
        Ok(())
    }

    fn set_direction(&mut self, pin: u32, direction: Direction) -> Result<()> {
        self.write_attr(pin, "direction", direction.as_str())?;
        tracing::debug!("GPIO {} direction set to {}", pin, direction.as_str());
        Ok(())
    }

    fn direction(&self, pin: u32) -> Result<Direction> {
        let (path, contents) = self.read_attr(pin, "direction")?;
        Direction::parse(&contents).ok_or(HalError::InvalidData { path, contents })
    }

    fn set_value(&mut self, pin: u32, value: PinValue) -> Result<()> {
        self.write_attr(pin, "value", value.as_str())
    }

    fn value(&self, pin: u32) -> Result<PinValue> {
        let (path, contents) = self.read_attr(pin, "value")?;
        contents
            .trim()
            .parse::<i64>()
            .map(PinValue::from_level)
            .map_err(|_| HalError::InvalidData { path, contents })
    }
}
