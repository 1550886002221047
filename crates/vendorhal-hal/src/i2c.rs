//! I2C bus access
//!
//! Talks to a single slave on a Linux i2c-dev character device through the
//! `i2cdev` crate. The slave address is bound once when the device is opened;
//! afterwards plain reads and writes become bus transactions addressed to
//! that slave.

use crate::{HalError, Result};
use i2cdev::core::I2CDevice;
use i2cdev::linux::{LinuxI2CDevice, LinuxI2CError};
use std::io;
use std::path::{Path, PathBuf};

/// Default I2C bus device
pub const DEFAULT_BUS: &str = "/dev/i2c-1";

/// A bus handle bound to one slave address
pub trait I2cBus {
    /// Slave address this handle talks to
    fn address(&self) -> u16;

    /// Write all of `data` in one transaction
    fn write(&mut self, data: &[u8]) -> Result<()>;

    /// Fill `buf` in one transaction
    fn read(&mut self, buf: &mut [u8]) -> Result<()>;
}

/// i2c-dev backed bus
pub struct LinuxI2cBus {
    device: LinuxI2CDevice,
    path: PathBuf,
    address: u16,
}

impl std::fmt::Debug for LinuxI2cBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinuxI2cBus")
            .field("path", &self.path)
            .field("address", &self.address)
            .finish()
    }
}

impl LinuxI2cBus {
    /// Open the bus device and bind the slave address
    pub fn open(path: impl AsRef<Path>, address: u16) -> Result<Self> {
        let path = path.as_ref();

        // Opening is an Io failure, binding the address an errno from I2C_SLAVE
        let device = LinuxI2CDevice::new(path, address).map_err(|e| match e {
            LinuxI2CError::Io(source) => HalError::BusOpen {
                path: path.to_path_buf(),
                source,
            },
            LinuxI2CError::Errno(errno) => HalError::SlaveAddress {
                address,
                source: io::Error::from_raw_os_error(errno),
            },
        })?;

        tracing::debug!("Opened {} for slave 0x{:02x}", path.display(), address);

        Ok(Self {
            device,
            path: path.to_path_buf(),
            address,
        })
    }

    /// Get the bus device path
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl I2cBus for LinuxI2cBus {
    fn address(&self) -> u16 {
        self.address
    }

    fn write(&mut self, data: &[u8]) -> Result<()> {
        I2CDevice::write(&mut self.device, data).map_err(transfer_error)
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<()> {
        I2CDevice::read(&mut self.device, buf).map_err(transfer_error)
    }
}

fn transfer_error(err: LinuxI2CError) -> HalError {
    match err {
        LinuxI2CError::Io(e) => HalError::Io(e),
        LinuxI2CError::Errno(errno) => HalError::Io(io::Error::from_raw_os_error(errno)),
    }
}

/// Transfers are all-or-nothing from the caller's point of view
pub(crate) fn check_transfer(expected: usize, actual: usize) -> Result<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(HalError::ShortTransfer { expected, actual })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_missing_bus() {
        let err = LinuxI2cBus::open("/nonexistent/i2c-42", 0x48).unwrap_err();
        match err {
            HalError::BusOpen { path, .. } => assert_eq!(path, Path::new("/nonexistent/i2c-42")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_open_non_i2c_device_fails_ioctl() {
        // A regular file rejects I2C_SLAVE with ENOTTY
        let file = tempfile::NamedTempFile::new().unwrap();
        let err = LinuxI2cBus::open(file.path(), 0x48).unwrap_err();
        assert!(matches!(err, HalError::SlaveAddress { address: 0x48, .. }));
    }

    #[test]
    fn test_transfer_error_keeps_errno() {
        // EREMOTEIO: the slave did not acknowledge
        let err = transfer_error(LinuxI2CError::Errno(121));
        match err {
            HalError::Io(e) => assert_eq!(e.raw_os_error(), Some(121)),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_check_transfer() {
        assert!(check_transfer(3, 3).is_ok());
        assert!(matches!(
            check_transfer(2, 1),
            Err(HalError::ShortTransfer {
                expected: 2,
                actual: 1
            })
        ));
    }
}
