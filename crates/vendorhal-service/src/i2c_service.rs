//! I2C service
//!
//! Reads the steering angle sensor wired to the ADS1115. The bus is opened
//! for each request and closed when the request completes.

use crate::{ServiceError, VendorService};
use std::path::PathBuf;
use std::time::Duration;
use vendorhal_config::I2cConfig;
use vendorhal_hal::mock::MockI2cBus;
use vendorhal_hal::{AdcChannel, AdcReading, Ads1115, I2cBus, LinuxI2cBus};

/// Opens a fresh bus handle per request
pub trait BusProvider {
    type Bus: I2cBus;

    fn open(&self) -> vendorhal_hal::Result<Self::Bus>;
}

/// i2c-dev bus at a fixed path and slave address
#[derive(Debug, Clone)]
pub struct LinuxBusProvider {
    pub path: PathBuf,
    pub address: u16,
}

impl BusProvider for LinuxBusProvider {
    type Bus = LinuxI2cBus;

    fn open(&self) -> vendorhal_hal::Result<LinuxI2cBus> {
        LinuxI2cBus::open(&self.path, self.address)
    }
}

impl BusProvider for MockI2cBus {
    type Bus = MockI2cBus;

    fn open(&self) -> vendorhal_hal::Result<MockI2cBus> {
        Ok(self.clone())
    }
}

/// Scale a raw steering sample to the 0-100 slider range
pub fn wheel_position_percent(raw: i16) -> i32 {
    i32::from(raw) * 100 / 66
}

pub struct I2cService<P> {
    provider: P,
    channel: AdcChannel,
    settle: Duration,
}

impl I2cService<LinuxBusProvider> {
    /// Create a service from the `[i2c]` configuration section
    pub fn from_config(config: &I2cConfig) -> Result<Self, ServiceError> {
        let channel = AdcChannel::try_from(config.channel)?;
        let provider = LinuxBusProvider {
            path: config.bus.clone(),
            address: config.address,
        };
        Ok(Self::new(provider, channel).with_settle(Duration::from_millis(config.settle_ms)))
    }
}

impl<P: BusProvider> I2cService<P> {
    pub fn new(provider: P, channel: AdcChannel) -> Self {
        Self {
            provider,
            channel,
            settle: vendorhal_hal::ads1115::DEFAULT_SETTLE,
        }
    }

    pub fn with_settle(mut self, settle: Duration) -> Self {
        self.settle = settle;
        self
    }

    /// Sample the configured channel
    pub fn read(&self) -> Result<AdcReading, ServiceError> {
        let bus = self.provider.open()?;
        let mut adc = Ads1115::new(bus).with_settle(self.settle);
        let reading = adc.read_channel(self.channel)?;
        tracing::info!(
            "ADC Value for channel {}: {}",
            reading.channel.index(),
            reading.raw
        );
        Ok(reading)
    }

    /// Raw steering sample, widened for the service interface
    pub fn get_wheel_angle(&self) -> Result<i32, ServiceError> {
        Ok(i32::from(self.read()?.raw))
    }

    pub fn channel(&self) -> AdcChannel {
        self.channel
    }
}

impl<P> VendorService for I2cService<P> {
    const DESCRIPTOR: &'static str = "android.vendor.i2c.II2cService";
}
