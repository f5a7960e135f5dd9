//! Strongly typed parameter enumerations for the AD4130 driver.
//!
//! These enums map directly to datasheet field encodings and are used by the
//! register bitfields in [`registers`](crate::registers) and by
//! [`ChannelConfig`](crate::channel::ChannelConfig). Prefer them over raw integers
//! so that analog routing cannot be set to an undefined code.
//!
//! # Examples
//!
//! ```rust
//! use ad4130::params::{AdcMode, InputSource};
//!
//! let positive = InputSource::Ain2;
//! let negative = InputSource::Avss;
//! let mode = AdcMode::Continuous;
//! let _ = (positive, negative, mode);
//! ```

use modular_bitfield::prelude::Specifier;

/// Analog input multiplexer selections for `CHANNEL_m.AINP` / `CHANNEL_m.AINM`.
///
/// Codes `0b11100` to `0b11111` are reserved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[bits = 5]
pub enum InputSource {
    /// Analog input pin AIN0.
    Ain0 = 0x00,
    /// Analog input pin AIN1.
    Ain1 = 0x01,
    /// Analog input pin AIN2.
    Ain2 = 0x02,
    /// Analog input pin AIN3.
    Ain3 = 0x03,
    /// Analog input pin AIN4.
    Ain4 = 0x04,
    /// Analog input pin AIN5.
    Ain5 = 0x05,
    /// Analog input pin AIN6.
    Ain6 = 0x06,
    /// Analog input pin AIN7.
    Ain7 = 0x07,
    /// Analog input pin AIN8.
    Ain8 = 0x08,
    /// Analog input pin AIN9.
    Ain9 = 0x09,
    /// Analog input pin AIN10.
    Ain10 = 0x0A,
    /// Analog input pin AIN11.
    Ain11 = 0x0B,
    /// Analog input pin AIN12.
    Ain12 = 0x0C,
    /// Analog input pin AIN13.
    Ain13 = 0x0D,
    /// Analog input pin AIN14.
    Ain14 = 0x0E,
    /// Analog input pin AIN15.
    Ain15 = 0x0F,
    /// On-chip temperature sensor.
    TemperatureSensor = 0x10,
    /// Analog ground.
    Avss = 0x11,
    /// Internal reference.
    InternalReference = 0x12,
    /// Digital ground.
    Dgnd = 0x13,
    /// (AVDD - AVSS)/6 positive.
    AvddAvssDiv6Plus = 0x14,
    /// (AVDD - AVSS)/6 negative.
    AvddAvssDiv6Minus = 0x15,
    /// (IOVDD - DGND)/6 positive.
    IovddDgndDiv6Plus = 0x16,
    /// (IOVDD - DGND)/6 negative.
    IovddDgndDiv6Minus = 0x17,
    /// (ALDO - AVSS)/6 positive.
    AldoAvssDiv6Plus = 0x18,
    /// (ALDO - AVSS)/6 negative.
    AldoAvssDiv6Minus = 0x19,
    /// (DLDO - DGND)/6 positive.
    DldoDgndDiv6Plus = 0x1A,
    /// (DLDO - DGND)/6 negative.
    DldoDgndDiv6Minus = 0x1B,
}

impl InputSource {
    /// Returns the raw 5-bit multiplexer code.
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Returns `true` when the source is one of the physical AIN pins.
    pub const fn is_pin(self) -> bool {
        (self as u8) < 0x10
    }
}

/// Operating modes encoded in `ADC_CONTROL.MODE` (bits 5:2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[bits = 4]
pub enum AdcMode {
    /// Continuous conversion.
    Continuous = 0b0000,
    /// Single conversion, then standby.
    Single = 0b0001,
    /// Standby.
    Standby = 0b0010,
    /// Power-down.
    PowerDown = 0b0011,
    /// Idle: modulator held, registers retained.
    Idle = 0b0100,
    /// Internal zero-scale (offset) calibration.
    InternalOffsetCalibration = 0b0101,
    /// Internal full-scale (gain) calibration.
    InternalGainCalibration = 0b0110,
    /// System zero-scale (offset) calibration.
    SystemOffsetCalibration = 0b0111,
    /// System full-scale (gain) calibration.
    SystemGainCalibration = 0b1000,
}

/// Master clock selections encoded in `ADC_CONTROL.MCLK_SEL` (bits 1:0).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[bits = 2]
pub enum ClockSelect {
    /// Internal 76.8 kHz oscillator.
    Internal = 0b00,
    /// Internal 76.8 kHz oscillator, driven out on the CLK pin.
    InternalWithOutput = 0b01,
    /// External 76.8 kHz clock.
    External = 0b10,
    /// External 153.6 kHz clock, divided by two internally.
    ExternalDiv2 = 0b11,
}

/// Bit order used on the serial link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BitOrder {
    /// Most significant bit first.
    MsbFirst,
    /// Least significant bit first.
    LsbFirst,
}

/// What the channel configurator does when the read-back differs from the write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum VerifyPolicy {
    /// Report both words to the caller and succeed.
    #[default]
    Observe,
    /// Fail with [`Error::VerifyMismatch`](crate::Error::VerifyMismatch).
    Enforce,
}
