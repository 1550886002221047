//! ADS1115 16-bit analog-to-digital converter driver.
//!
//! The ADS1115 is a four channel delta-sigma ADC with a programmable gain
//! amplifier. This driver uses single-shot conversions against ground on one
//! of the four inputs at a fixed ±4.096 V range and 128 samples per second.
//!
//! Datasheet: <https://www.ti.com/product/ADS1115>

use crate::{HalError, Result, i2c::I2cBus};
use serde::Serialize;
use std::thread;
use std::time::Duration;

/// Default I2C address for ADS1115 (ADDR pin tied to ground)
pub const DEFAULT_ADDRESS: u16 = 0x48;

/// Time to wait between starting a conversion and reading it back
pub const DEFAULT_SETTLE: Duration = Duration::from_millis(10);

/// Full-scale range in millivolts for the configured gain
pub const FULL_SCALE_MV: f32 = 4096.0;

/// ADS1115 register addresses
pub mod regs {
    /// Conversion result register
    pub const CONVERSION: u8 = 0x00;
    /// Configuration register
    pub const CONFIG: u8 = 0x01;
}

/// Base configuration word.
///
/// OS=1 (start single conversion), MUX=100 (AIN0 vs GND), PGA=001
/// (±4.096 V), MODE=1 (single-shot), DR=100 (128 SPS), comparator disabled.
pub const BASE_CONFIG: u16 = 0xC383;

/// Single-ended input channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AdcChannel {
    Ain0,
    Ain1,
    Ain2,
    Ain3,
}

impl AdcChannel {
    /// Multiplexer bits selecting this input against ground
    pub const fn mux_bits(self) -> u16 {
        match self {
            AdcChannel::Ain0 => 0x4000,
            AdcChannel::Ain1 => 0x5000,
            AdcChannel::Ain2 => 0x6000,
            AdcChannel::Ain3 => 0x7000,
        }
    }

    pub const fn index(self) -> u8 {
        match self {
            AdcChannel::Ain0 => 0,
            AdcChannel::Ain1 => 1,
            AdcChannel::Ain2 => 2,
            AdcChannel::Ain3 => 3,
        }
    }
}

impl TryFrom<u8> for AdcChannel {
    type Error = HalError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(AdcChannel::Ain0),
            1 => Ok(AdcChannel::Ain1),
            2 => Ok(AdcChannel::Ain2),
            3 => Ok(AdcChannel::Ain3),
            other => Err(HalError::InvalidChannel(other)),
        }
    }
}

/// Configuration word that starts a single-shot conversion on `channel`
pub const fn config_word(channel: AdcChannel) -> u16 {
    BASE_CONFIG | channel.mux_bits()
}

/// One conversion result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AdcReading {
    pub channel: AdcChannel,
    pub raw: i16,
}

impl AdcReading {
    /// Input voltage at the configured gain
    pub fn millivolts(&self) -> f32 {
        f32::from(self.raw) * FULL_SCALE_MV / 32768.0
    }
}

/// ADS1115 driver over any I2C bus handle
pub struct Ads1115<B> {
    bus: B,
    settle: Duration,
}

impl<B: I2cBus> Ads1115<B> {
    pub fn new(bus: B) -> Self {
        Self {
            bus,
            settle: DEFAULT_SETTLE,
        }
    }

    /// Override the conversion settle delay
    pub fn with_settle(mut self, settle: Duration) -> Self {
        self.settle = settle;
        self
    }

    /// Write the config register to start a conversion on `channel`
    pub fn configure(&mut self, channel: AdcChannel) -> Result<()> {
        let [hi, lo] = config_word(channel).to_be_bytes();
        self.bus.write(&[regs::CONFIG, hi, lo])?;
        tracing::debug!(
            "ADS1115 configured for {:?} (config=0x{:04x})",
            channel,
            config_word(channel)
        );
        Ok(())
    }

    /// Point at the conversion register and read the 16-bit result
    pub fn read_conversion(&mut self) -> Result<i16> {
        self.bus.write(&[regs::CONVERSION])?;
        let mut buf = [0u8; 2];
        self.bus.read(&mut buf)?;
        Ok(i16::from_be_bytes(buf))
    }

    /// Configure, wait for the conversion, and read it back
    pub fn read_channel(&mut self, channel: AdcChannel) -> Result<AdcReading> {
        self.configure(channel)?;
        if !self.settle.is_zero() {
            thread::sleep(self.settle);
        }
        let raw = self.read_conversion()?;
        Ok(AdcReading { channel, raw })
    }

    /// Get a reference to the underlying bus
    pub fn bus(&self) -> &B {
        &self.bus
    }

    /// Release the underlying bus
    pub fn into_inner(self) -> B {
        self.bus
    }
}
