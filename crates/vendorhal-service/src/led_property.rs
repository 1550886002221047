//! LED control vehicle property
//!
//! Vendor extension property that lets the car property layer switch the LED.
//! Writes of 0 and 1 are accepted; reads report the pin as 0 or 1.

use crate::{GpioService, ServiceError};
use vendorhal_hal::GpioPort;

/// VENDOR_EXTENSION_LED_CONTROL_PROPERTY (vendor group, global area, INT32)
pub const LED_CONTROL_PROPERTY_ID: i32 = 0x21400104;

/// Global area
pub const LED_CONTROL_AREA_ID: i32 = 0;

pub struct LedControlProperty<G> {
    service: GpioService<G>,
    pin: u32,
}

impl<G: GpioPort> LedControlProperty<G> {
    pub fn new(service: GpioService<G>, pin: u32) -> Self {
        Self { service, pin }
    }

    /// Apply a property write
    pub fn set(&mut self, value: i32) -> Result<(), ServiceError> {
        let on = match value {
            0 => false,
            1 => true,
            other => {
                return Err(ServiceError::UnsupportedValue {
                    property: LED_CONTROL_PROPERTY_ID,
                    value: other,
                });
            }
        };

        if self.service.set_gpio_state(self.pin, on) {
            tracing::info!("LED state changed to: {}", value);
            Ok(())
        } else {
            Err(ServiceError::GpioWrite(self.pin))
        }
    }

    /// Current LED state as the property value
    pub fn get(&self) -> i32 {
        i32::from(self.service.get_gpio_state(self.pin))
    }

    pub fn pin(&self) -> u32 {
        self.pin
    }
}
