//! GPIO service
//!
//! Drives and samples single pins. Every call is self-contained: setting a
//! pin exports it and switches it to output first, so clients never manage
//! the pin lifecycle themselves.

use crate::VendorService;
use vendorhal_config::GpioConfig;
use vendorhal_hal::{Direction, GpioPort, PinValue, SysfsGpio};

pub struct GpioService<G> {
    gpio: G,
}

impl GpioService<SysfsGpio> {
    /// Create a service on the configured sysfs root
    pub fn from_config(config: &GpioConfig) -> Self {
        Self::new(SysfsGpio::with_root(&config.sysfs_root))
    }
}

impl<G: GpioPort> GpioService<G> {
    pub fn new(gpio: G) -> Self {
        Self { gpio }
    }

    /// Drive `pin` to `value`. Returns whether the value write succeeded.
    pub fn set_gpio_state(&mut self, pin: u32, value: bool) -> bool {
        if let Err(e) = self.gpio.export(pin) {
            tracing::warn!("Failed to export GPIO {}: {}", pin, e);
        }
        if let Err(e) = self.gpio.set_direction(pin, Direction::Out) {
            tracing::warn!("Failed to set GPIO {} as output: {}", pin, e);
        }

        match self.gpio.set_value(pin, PinValue::from(value)) {
            Ok(()) => {
                tracing::debug!("GPIO {} set to {}", pin, u8::from(value));
                true
            }
            Err(e) => {
                tracing::error!("Failed to write GPIO {}: {}", pin, e);
                false
            }
        }
    }

    /// Sample `pin`; a failed read reports low
    pub fn get_gpio_state(&self, pin: u32) -> bool {
        match self.gpio.value(pin) {
            Ok(value) => value.into(),
            Err(e) => {
                tracing::warn!("Failed to read GPIO {}: {}", pin, e);
                false
            }
        }
    }

    /// Get a reference to the GPIO backend
    pub fn gpio(&self) -> &G {
        &self.gpio
    }
}

impl<G> VendorService for GpioService<G> {
    const DESCRIPTOR: &'static str = "android.vendor.gpio.IGpioService";
}

#[cfg(test)]
mod tests {
    use super::*;
    use vendorhal_hal::mock::MockGpio;

    #[test]
    fn test_set_exports_and_drives_output() {
        let gpio = MockGpio::new();
        let mut service = GpioService::new(gpio.clone());

        assert!(service.set_gpio_state(17, true));
        assert!(gpio.is_exported(17));
        assert_eq!(gpio.direction(17).unwrap(), Direction::Out);
        assert_eq!(gpio.level(17), Some(PinValue::High));
        assert!(service.get_gpio_state(17));

        assert!(service.set_gpio_state(17, false));
        assert!(!service.get_gpio_state(17));
        assert_eq!(gpio.export_count(), 1);
    }

    #[test]
    fn test_set_reports_write_failure() {
        let gpio = MockGpio::new();
        gpio.fail_writes(true);
        let mut service = GpioService::new(gpio);

        assert!(!service.set_gpio_state(17, true));
    }

    #[test]
    fn test_get_unexported_pin_is_low() {
        let service = GpioService::new(MockGpio::new());
        assert!(!service.get_gpio_state(4));
    }

    #[test]
    fn test_get_reads_external_level() {
        let gpio = MockGpio::new();
        gpio.drive(23, PinValue::High);
        let service = GpioService::new(gpio);
        assert!(service.get_gpio_state(23));
    }
}
