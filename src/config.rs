//! Configuration primitives for the AD4130 driver.

use crate::params::VerifyPolicy;
use crate::registers::MAX_CHANNELS;

/// Highest serial clock frequency supported by the device.
pub const MAX_SCLK_HZ: u32 = 5_000_000;
/// Default chip-select assertion delay, in microseconds.
pub const DEFAULT_CS_DELAY_US: u16 = 2;

/// Bus parameters the platform applies when building the `SpiDevice`.
///
/// Word size, bit order and SPI mode are fixed by the device; see
/// [`interface::spi`](crate::interface::spi).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BusSettings {
    /// Serial clock frequency in hertz.
    pub frequency_hz: u32,
    /// Delay between chip-select assertion and the first clock edge, in microseconds.
    pub cs_delay_us: u16,
}

impl Default for BusSettings {
    fn default() -> Self {
        Self {
            frequency_hz: 1_000_000,
            cs_delay_us: DEFAULT_CS_DELAY_US,
        }
    }
}

/// User-facing configuration for the AD4130 driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// Number of channel registers available on this device variant.
    pub channel_count: u8,
    /// Serial bus parameters.
    pub bus: BusSettings,
    /// Handling of channel read-back mismatches.
    pub verify: VerifyPolicy,
}

impl Config {
    /// Begins building a [`Config`] using the builder pattern.
    pub fn new() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    /// Checks whether this configuration is valid for the device.
    pub fn validate(&self) -> core::result::Result<(), ConfigError> {
        if self.channel_count == 0 || self.channel_count > MAX_CHANNELS {
            return Err(ConfigError::ChannelCount);
        }

        if self.bus.frequency_hz == 0 || self.bus.frequency_hz > MAX_SCLK_HZ {
            return Err(ConfigError::ClockFrequency);
        }

        Ok(())
    }
}

/// Builder for [`Config`] allowing piecemeal construction.
#[derive(Debug, Clone, Copy)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Creates a new builder seeded with [`Config::default()`].
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// Overrides the number of channels.
    pub fn channel_count(mut self, channel_count: u8) -> Self {
        self.config.channel_count = channel_count;
        self
    }

    /// Overrides the serial clock frequency.
    pub fn frequency_hz(mut self, frequency_hz: u32) -> Self {
        self.config.bus.frequency_hz = frequency_hz;
        self
    }

    /// Overrides the chip-select assertion delay.
    pub fn cs_delay_us(mut self, cs_delay_us: u16) -> Self {
        self.config.bus.cs_delay_us = cs_delay_us;
        self
    }

    /// Sets the read-back verification policy.
    pub fn verify(mut self, verify: VerifyPolicy) -> Self {
        self.config.verify = verify;
        self
    }

    /// Finalizes the builder and returns the [`Config`].
    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            channel_count: MAX_CHANNELS,
            bus: BusSettings::default(),
            verify: VerifyPolicy::Observe,
        }
    }
}

/// Validation errors generated while verifying a [`Config`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Channel count is zero or exceeds the number of channel registers.
    ChannelCount,
    /// Serial clock frequency is zero or above the device limit.
    ClockFrequency,
}
