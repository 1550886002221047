//! Vendor services for vendorhal
//!
//! Transport-independent versions of the vendor services that sit on top of
//! the HAL: a GPIO service for the LED, an I2C service for the steering
//! angle sensor, a clock service, and the LED control vehicle property.
//! Each service keeps the instance name its clients look it up by.

mod clock;
mod gpio_service;
mod i2c_service;
mod led_property;

pub use clock::ClockService;
pub use gpio_service::GpioService;
pub use i2c_service::{BusProvider, I2cService, LinuxBusProvider, wheel_position_percent};
pub use led_property::{LED_CONTROL_AREA_ID, LED_CONTROL_PROPERTY_ID, LedControlProperty};

use thiserror::Error;
use vendorhal_hal::HalError;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Hardware error: {0}")]
    Hal(#[from] HalError),

    #[error("Failed to drive GPIO {0}")]
    GpioWrite(u32),

    #[error("Unsupported value for {property:#x}: {value}")]
    UnsupportedValue { property: i32, value: i32 },
}

/// A service registered under `<descriptor>/default`
pub trait VendorService {
    /// Interface descriptor clients look the service up by
    const DESCRIPTOR: &'static str;

    fn instance_name() -> String {
        format!("{}/default", Self::DESCRIPTOR)
    }
}
