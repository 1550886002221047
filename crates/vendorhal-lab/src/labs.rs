//! Lab loops
//!
//! The sequential programs behind the `toggle` and `reverse-gear`
//! subcommands, written against the HAL traits so they run on mocks too.

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;
use tracing::{info, warn};
use vendorhal_hal::{Direction, GpioPort, PinValue, PropertySource, is_property_true};

/// Blink the LED `iterations` times, starting high, `interval` apart.
/// Returns the levels written, in order.
pub fn toggle_led<G: GpioPort>(
    gpio: &mut G,
    pin: u32,
    iterations: u32,
    interval: Duration,
) -> vendorhal_hal::Result<Vec<PinValue>> {
    gpio.export(pin)?;
    gpio.set_direction(pin, Direction::Out)?;

    let mut written = Vec::new();
    let mut level = true;

    for i in 0..iterations {
        let value = PinValue::from(level);
        gpio.set_value(pin, value)?;
        written.push(value);
        level = !level;

        info!("Toggled GPIO {} (iteration {})", pin, i + 1);
        if i + 1 < iterations {
            thread::sleep(interval);
        }
    }

    Ok(written)
}

/// Mirrors a reverse-gear property onto the LED
pub struct ReverseGearLight<'a, G, P: ?Sized> {
    gpio: &'a mut G,
    properties: &'a P,
    pin: u32,
    property: String,
}

impl<'a, G: GpioPort, P: PropertySource + ?Sized> ReverseGearLight<'a, G, P> {
    /// Export the pin and switch it to output
    pub fn new(
        gpio: &'a mut G,
        properties: &'a P,
        pin: u32,
        property: impl Into<String>,
    ) -> vendorhal_hal::Result<Self> {
        gpio.export(pin)?;
        gpio.set_direction(pin, Direction::Out)?;
        Ok(Self {
            gpio,
            properties,
            pin,
            property: property.into(),
        })
    }

    /// One poll: LED on iff the property reads `"1"`. Returns the LED state.
    pub fn step(&mut self) -> vendorhal_hal::Result<bool> {
        let engaged = match is_property_true(self.properties, &self.property) {
            Ok(engaged) => engaged,
            Err(e) => {
                warn!("Failed to read property {}: {}", self.property, e);
                false
            }
        };

        self.gpio.set_value(self.pin, PinValue::from(engaged))?;
        if engaged {
            info!("led on GPIO {}", self.pin);
        } else {
            info!("led off GPIO {}", self.pin);
        }
        Ok(engaged)
    }

    /// Poll every `interval` until `stop` is raised. Returns the number of polls.
    pub fn run(&mut self, interval: Duration, stop: &AtomicBool) -> vendorhal_hal::Result<u64> {
        let mut polls = 0;
        while !stop.load(Ordering::Relaxed) {
            self.step()?;
            polls += 1;
            thread::sleep(interval);
        }
        Ok(polls)
    }
}
