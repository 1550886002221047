use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HalError {
    #[error("GPIO {0} is not exported")]
    PinNotExported(u32),

    #[error("Failed to open I2C bus {path}: {source}")]
    BusOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to acquire bus access to slave 0x{address:02x}: {source}")]
    SlaveAddress {
        address: u16,
        #[source]
        source: std::io::Error,
    },

    #[error("Short I2C transfer: expected {expected} bytes, got {actual}")]
    ShortTransfer { expected: usize, actual: usize },

    #[error("Invalid ADC channel {0} (expected 0-3)")]
    InvalidChannel(u8),

    #[error("Invalid data in {path}: {contents:?}")]
    InvalidData { path: PathBuf, contents: String },

    #[error("Invalid property name: {0:?}")]
    InvalidPropertyName(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hal_error_display() {
        let err = HalError::PinNotExported(17);
        assert_eq!(err.to_string(), "GPIO 17 is not exported");

        let err = HalError::ShortTransfer {
            expected: 3,
            actual: 1,
        };
        assert!(err.to_string().contains("expected 3 bytes, got 1"));

        let err = HalError::SlaveAddress {
            address: 0x48,
            source: std::io::Error::from_raw_os_error(16),
        };
        assert!(err.to_string().contains("0x48"));

        let err = HalError::InvalidChannel(7);
        assert!(err.to_string().contains("7"));
    }
}
