//! Integration tests for the vendor services over a fake sysfs tree

use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;
use vendorhal_config::{GpioConfig, VendorHalConfig};
use vendorhal_hal::mock::MockI2cBus;
use vendorhal_hal::{AdcChannel, Direction, GpioPort, SysfsGpio};
use vendorhal_service::{GpioService, I2cService, LedControlProperty, wheel_position_percent};

/// Fake `/sys/class/gpio` for service tests
struct SysfsTestEnv {
    temp_dir: TempDir,
    root: PathBuf,
}

impl SysfsTestEnv {
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path().join("gpio");

        fs::create_dir_all(&root).unwrap();
        fs::write(root.join("export"), "").unwrap();
        fs::write(root.join("unexport"), "").unwrap();

        Self { temp_dir, root }
    }

    /// What the kernel does when a pin number is written to `export`
    fn materialize_pin(&self, pin: u32) {
        let dir = self.root.join(format!("gpio{}", pin));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("direction"), "in").unwrap();
        fs::write(dir.join("value"), "0").unwrap();
    }

    fn read_attr(&self, pin: u32, attr: &str) -> String {
        fs::read_to_string(self.root.join(format!("gpio{}/{}", pin, attr))).unwrap()
    }

    fn gpio_config(&self) -> GpioConfig {
        GpioConfig {
            sysfs_root: self.root.clone(),
            led_pin: 17,
        }
    }
}

#[test]
fn test_gpio_service_over_sysfs() {
    let env = SysfsTestEnv::new();
    env.materialize_pin(17);
    let mut service = GpioService::from_config(&env.gpio_config());

    assert!(service.set_gpio_state(17, true));
    assert_eq!(env.read_attr(17, "direction"), "out");
    assert_eq!(env.read_attr(17, "value"), "1");
    assert!(service.get_gpio_state(17));

    assert!(service.set_gpio_state(17, false));
    assert_eq!(env.read_attr(17, "value"), "0");
    assert!(!service.get_gpio_state(17));

    // Pin already existed, so nothing was written to export
    assert!(fs::read_to_string(env.root.join("export")).unwrap().is_empty());
}

#[test]
fn test_gpio_service_unexported_pin() {
    let env = SysfsTestEnv::new();
    let mut service = GpioService::from_config(&env.gpio_config());

    // Export is requested, but no kernel creates the pin directory
    assert!(!service.set_gpio_state(27, true));
    assert_eq!(fs::read_to_string(env.root.join("export")).unwrap(), "27");
    assert!(!service.get_gpio_state(27));
}

#[test]
fn test_gpio_service_reads_externally_driven_pin() {
    let env = SysfsTestEnv::new();
    env.materialize_pin(5);
    fs::write(env.root.join("gpio5/value"), "1\n").unwrap();

    let service = GpioService::new(SysfsGpio::with_root(&env.root));
    assert!(service.get_gpio_state(5));
    assert_eq!(service.gpio().direction(5).unwrap(), Direction::In);
}

#[test]
fn test_led_property_over_sysfs() {
    let env = SysfsTestEnv::new();
    env.materialize_pin(17);
    let config = env.gpio_config();
    let mut led = LedControlProperty::new(GpioService::from_config(&config), config.led_pin);

    led.set(1).unwrap();
    assert_eq!(env.read_attr(17, "value"), "1");
    assert_eq!(led.get(), 1);

    assert!(led.set(7).is_err());
    assert_eq!(env.read_attr(17, "value"), "1");
}

#[test]
fn test_i2c_service_sequence_and_mapping() {
    let bus = MockI2cBus::new(0x48);
    bus.queue_read(&[0x00, 0x21]);
    bus.queue_read(&[0x00, 0x42]);
    let service = I2cService::new(bus.clone(), AdcChannel::Ain1).with_settle(Duration::ZERO);

    let first = service.read().unwrap();
    let second = service.get_wheel_angle().unwrap();
    assert_eq!((first.raw, second), (33, 66));
    assert_eq!(wheel_position_percent(first.raw), 50);

    // Two full configure/point/read cycles
    assert_eq!(
        bus.writes(),
        vec![
            vec![0x01, 0xD3, 0x83],
            vec![0x00],
            vec![0x01, 0xD3, 0x83],
            vec![0x00],
        ]
    );
}

#[test]
fn test_services_from_saved_config() {
    let env = SysfsTestEnv::new();
    env.materialize_pin(22);

    let mut config = VendorHalConfig::default();
    config.gpio = env.gpio_config();
    config.gpio.led_pin = 22;
    config.i2c.channel = 3;
    let path = env.temp_dir.path().join("config.toml");
    config.save(&path).unwrap();

    let loaded = VendorHalConfig::load(&path).unwrap();
    let mut gpio = GpioService::from_config(&loaded.gpio);
    assert!(gpio.set_gpio_state(loaded.gpio.led_pin, true));
    assert_eq!(env.read_attr(22, "value"), "1");

    let i2c = I2cService::from_config(&loaded.i2c).unwrap();
    assert_eq!(i2c.channel(), AdcChannel::Ain3);
}
