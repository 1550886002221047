//! Mock implementations for testing without real hardware
//!
//! Mock backends for the GPIO, I2C and property traits so services and lab
//! loops can run on a desktop machine. All mocks are cheap to clone and
//! clones share state, so a test can hand one copy to the code under test
//! and inspect the other.
//!
//! # Usage
//!
//! ```
//! use vendorhal_hal::mock::MockI2cBus;
//! use vendorhal_hal::{Ads1115, AdcChannel};
//!
//! let bus = MockI2cBus::new(0x48);
//! bus.queue_read(&[0x01, 0x00]);
//! let mut adc = Ads1115::new(bus.clone());
//! assert_eq!(adc.read_channel(AdcChannel::Ain0).unwrap().raw, 256);
//! assert_eq!(bus.writes().len(), 2);
//! ```

use crate::gpio::{Direction, GpioPort, PinValue};
use crate::i2c::{I2cBus, check_transfer};
use crate::properties::PropertySource;
use crate::{HalError, Result};
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, RwLock};

fn poisoned() -> HalError {
    HalError::Io(std::io::Error::other("mock state lock poisoned"))
}

fn transfer_failure() -> HalError {
    HalError::Io(std::io::Error::other("mock transfer failure"))
}

#[derive(Debug, Default)]
struct I2cState {
    writes: Vec<Vec<u8>>,
    reads: VecDeque<Vec<u8>>,
    short_write: Option<usize>,
    fail_transfers: bool,
}

/// Recording I2C bus
#[derive(Debug, Clone)]
pub struct MockI2cBus {
    address: u16,
    state: Arc<RwLock<I2cState>>,
}

impl MockI2cBus {
    pub fn new(address: u16) -> Self {
        Self {
            address,
            state: Arc::new(RwLock::new(I2cState::default())),
        }
    }

    /// Queue bytes returned by the next read
    pub fn queue_read(&self, data: &[u8]) {
        if let Ok(mut state) = self.state.write() {
            state.reads.push_back(data.to_vec());
        }
    }

    /// Make the next write transfer only `bytes` bytes
    pub fn short_write_next(&self, bytes: usize) {
        if let Ok(mut state) = self.state.write() {
            state.short_write = Some(bytes);
        }
    }

    /// Make every transfer fail outright, as a bus with no slave would
    pub fn fail_transfers(&self, fail: bool) {
        if let Ok(mut state) = self.state.write() {
            state.fail_transfers = fail;
        }
    }

    /// All completed writes, in order
    pub fn writes(&self) -> Vec<Vec<u8>> {
        self.state
            .read()
            .map(|s| s.writes.clone())
            .unwrap_or_default()
    }
}

impl I2cBus for MockI2cBus {
    fn address(&self) -> u16 {
        self.address
    }

    fn write(&mut self, data: &[u8]) -> Result<()> {
        let mut state = self.state.write().map_err(|_| poisoned())?;
        if state.fail_transfers {
            return Err(transfer_failure());
        }
        let written = match state.short_write.take() {
            Some(n) => n.min(data.len()),
            None => data.len(),
        };
        state.writes.push(data[..written].to_vec());
        check_transfer(data.len(), written)
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<()> {
        let mut state = self.state.write().map_err(|_| poisoned())?;
        if state.fail_transfers {
            return Err(transfer_failure());
        }
        let data = state.reads.pop_front().unwrap_or_default();
        let n = data.len().min(buf.len());
        buf[..n].copy_from_slice(&data[..n]);
        check_transfer(buf.len(), n)
    }
}

#[derive(Debug, Default)]
struct GpioState {
    exported: HashSet<u32>,
    directions: HashMap<u32, Direction>,
    values: HashMap<u32, PinValue>,
    export_count: usize,
    fail_writes: bool,
}

/// In-memory GPIO controller
#[derive(Debug, Clone, Default)]
pub struct MockGpio {
    state: Arc<RwLock<GpioState>>,
}

impl MockGpio {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate an externally driven level on an exported pin
    pub fn drive(&self, pin: u32, value: PinValue) {
        if let Ok(mut state) = self.state.write() {
            state.exported.insert(pin);
            state.values.insert(pin, value);
        }
    }

    /// Make every value write fail with an IO error
    pub fn fail_writes(&self, fail: bool) {
        if let Ok(mut state) = self.state.write() {
            state.fail_writes = fail;
        }
    }

    /// Number of exports that actually hit the controller
    pub fn export_count(&self) -> usize {
        self.state.read().map(|s| s.export_count).unwrap_or(0)
    }

    /// Current level without going through the trait
    pub fn level(&self, pin: u32) -> Option<PinValue> {
        self.state.read().ok()?.values.get(&pin).copied()
    }
}

impl GpioPort for MockGpio {
    fn is_exported(&self, pin: u32) -> bool {
        self.state
            .read()
            .map(|s| s.exported.contains(&pin))
            .unwrap_or(false)
    }

    fn export(&mut self, pin: u32) -> Result<()> {
        let mut state = self.state.write().map_err(|_| poisoned())?;
        if state.exported.insert(pin) {
            state.export_count += 1;
            state.directions.insert(pin, Direction::In);
            state.values.insert(pin, PinValue::Low);
        }
        Ok(())
    }

    fn unexport(&mut self, pin: u32) -> Result<()> {
        let mut state = self.state.write().map_err(|_| poisoned())?;
        state.exported.remove(&pin);
        state.directions.remove(&pin);
        state.values.remove(&pin);
        Ok(())
    }

    fn set_direction(&mut self, pin: u32, direction: Direction) -> Result<()> {
        let mut state = self.state.write().map_err(|_| poisoned())?;
        if !state.exported.contains(&pin) {
            return Err(HalError::PinNotExported(pin));
        }
        state.directions.insert(pin, direction);
        Ok(())
    }

    fn direction(&self, pin: u32) -> Result<Direction> {
        let state = self.state.read().map_err(|_| poisoned())?;
        state
            .directions
            .get(&pin)
            .copied()
            .ok_or(HalError::PinNotExported(pin))
    }

    fn set_value(&mut self, pin: u32, value: PinValue) -> Result<()> {
        let mut state = self.state.write().map_err(|_| poisoned())?;
        if !state.exported.contains(&pin) {
            return Err(HalError::PinNotExported(pin));
        }
        if state.fail_writes {
            return Err(HalError::Io(std::io::Error::other("mock write failure")));
        }
        state.values.insert(pin, value);
        Ok(())
    }

    fn value(&self, pin: u32) -> Result<PinValue> {
        let state = self.state.read().map_err(|_| poisoned())?;
        state
            .values
            .get(&pin)
            .copied()
            .ok_or(HalError::PinNotExported(pin))
    }
}

/// In-memory property source
#[derive(Debug, Clone, Default)]
pub struct MockProperties {
    values: Arc<RwLock<HashMap<String, String>>>,
}

impl MockProperties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, name: &str, value: &str) {
        if let Ok(mut values) = self.values.write() {
            values.insert(name.to_string(), value.to_string());
        }
    }

    pub fn clear(&self, name: &str) {
        if let Ok(mut values) = self.values.write() {
            values.remove(name);
        }
    }
}

impl PropertySource for MockProperties {
    fn get(&self, name: &str) -> Result<Option<String>> {
        Ok(self
            .values
            .read()
            .ok()
            .and_then(|values| values.get(name).cloned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::is_property_true;

    #[test]
    fn test_mock_i2c_records_writes() {
        let mut bus = MockI2cBus::new(0x48);
        let observer = bus.clone();

        bus.write(&[0x01, 0xC3, 0x83]).unwrap();
        bus.write(&[0x00]).unwrap();

        assert_eq!(bus.address(), 0x48);
        assert_eq!(observer.writes(), vec![vec![0x01, 0xC3, 0x83], vec![0x00]]);
    }

    #[test]
    fn test_mock_i2c_short_read() {
        let mut bus = MockI2cBus::new(0x48);
        bus.queue_read(&[0xAB]);
        let mut buf = [0u8; 2];
        assert!(matches!(
            bus.read(&mut buf),
            Err(HalError::ShortTransfer {
                expected: 2,
                actual: 1
            })
        ));
    }

    #[test]
    fn test_mock_i2c_fail_transfers() {
        let mut bus = MockI2cBus::new(0x48);
        bus.queue_read(&[0x12, 0x34]);
        bus.fail_transfers(true);

        let mut buf = [0u8; 2];
        assert!(matches!(bus.write(&[0x00]), Err(HalError::Io(_))));
        assert!(matches!(bus.read(&mut buf), Err(HalError::Io(_))));
        assert!(bus.writes().is_empty());

        // Queued data survives the failed read
        bus.fail_transfers(false);
        bus.read(&mut buf).unwrap();
        assert_eq!(buf, [0x12, 0x34]);
    }

    #[test]
    fn test_mock_gpio_lifecycle() {
        let mut gpio = MockGpio::new();
        assert!(!gpio.is_exported(17));
        assert!(matches!(
            gpio.set_value(17, PinValue::High),
            Err(HalError::PinNotExported(17))
        ));

        gpio.export(17).unwrap();
        gpio.export(17).unwrap();
        assert_eq!(gpio.export_count(), 1);
        assert_eq!(gpio.direction(17).unwrap(), Direction::In);

        gpio.set_direction(17, Direction::Out).unwrap();
        gpio.set_value(17, PinValue::High).unwrap();
        assert_eq!(gpio.value(17).unwrap(), PinValue::High);

        gpio.unexport(17).unwrap();
        assert!(!gpio.is_exported(17));
    }

    #[test]
    fn test_mock_gpio_fail_writes() {
        let mut gpio = MockGpio::new();
        gpio.export(3).unwrap();
        gpio.fail_writes(true);
        assert!(gpio.set_value(3, PinValue::High).is_err());
        assert_eq!(gpio.level(3), Some(PinValue::Low));
    }

    #[test]
    fn test_mock_properties() {
        let props = MockProperties::new();
        assert!(!is_property_true(&props, "reversegear").unwrap());
        props.set("reversegear", "1");
        assert!(is_property_true(&props, "reversegear").unwrap());
        props.clear("reversegear");
        assert_eq!(props.get("reversegear").unwrap(), None);
    }
}
