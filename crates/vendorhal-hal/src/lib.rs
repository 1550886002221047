//! Hardware Abstraction Layer (HAL)
//!
//! Thin access layer for the two pieces of hardware the vendor services talk
//! to: GPIO pins exposed through the legacy sysfs interface and an ADS1115
//! analog-to-digital converter on an i2c-dev bus.
//!
//! # Example
//!
//! ```no_run
//! use vendorhal_hal::{Ads1115, AdcChannel, Direction, GpioPort, LinuxI2cBus, SysfsGpio};
//!
//! fn main() -> vendorhal_hal::Result<()> {
//!     let mut gpio = SysfsGpio::new();
//!     gpio.export(17)?;
//!     gpio.set_direction(17, Direction::Out)?;
//!     gpio.set_value(17, true.into())?;
//!
//!     let bus = LinuxI2cBus::open("/dev/i2c-1", vendorhal_hal::ads1115::DEFAULT_ADDRESS)?;
//!     let mut adc = Ads1115::new(bus);
//!     let reading = adc.read_channel(AdcChannel::Ain1)?;
//!     println!("AIN1 = {} ({:.1} mV)", reading.raw, reading.millivolts());
//!     Ok(())
//! }
//! ```

pub mod ads1115;
pub mod error;
pub mod gpio;
pub mod i2c;
pub mod mock;
pub mod properties;

pub use ads1115::{Ads1115, AdcChannel, AdcReading};
pub use error::HalError;
pub use gpio::{Direction, GpioPort, PinValue, SysfsGpio};
pub use i2c::{I2cBus, LinuxI2cBus};
pub use properties::{FilePropertyStore, PropertySource, is_property_true};

/// HAL Result type
pub type Result<T> = std::result::Result<T, HalError>;
