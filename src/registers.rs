//! Register map definitions for the AD4130-8 ADC.
#![allow(unused_parens)]

use modular_bitfield::prelude::*;

use crate::params::{AdcMode, ClockSelect, InputSource};

/// Register address of `STATUS` (read view of the communications register).
pub const REG_STATUS: u8 = 0x00;
/// Register address of `ADC_CONTROL`.
pub const REG_ADC_CONTROL: u8 = 0x01;
/// Register address of `DATA`.
pub const REG_DATA: u8 = 0x02;
/// Register address of `IO_CONTROL`.
pub const REG_IO_CONTROL: u8 = 0x03;
/// Register address of `VBIAS_CONTROL`.
pub const REG_VBIAS_CONTROL: u8 = 0x04;
/// Register address of `ID`.
pub const REG_ID: u8 = 0x05;
/// Register address of `ERROR`.
pub const REG_ERROR: u8 = 0x06;
/// Register address of `ERROR_EN`.
pub const REG_ERROR_EN: u8 = 0x07;
/// Register address of `MCLK_COUNT`.
pub const REG_MCLK_COUNT: u8 = 0x08;
/// Base address of the `CHANNEL_m` family.
pub const REG_CHANNEL_BASE: u8 = 0x09;
/// Base address of the `CONFIG_n` family.
pub const REG_CONFIG_BASE: u8 = 0x19;
/// Base address of the `FILTER_n` family.
pub const REG_FILTER_BASE: u8 = 0x21;
/// Base address of the `OFFSET_n` family.
pub const REG_OFFSET_BASE: u8 = 0x29;
/// Base address of the `GAIN_n` family.
pub const REG_GAIN_BASE: u8 = 0x31;
/// Register address of `MISC`.
pub const REG_MISC: u8 = 0x39;
/// Register address of `FIFO_CONTROL`.
pub const REG_FIFO_CONTROL: u8 = 0x3A;
/// Register address of `FIFO_STATUS`.
pub const REG_FIFO_STATUS: u8 = 0x3B;
/// Register address of `FIFO_THRESHOLD`.
pub const REG_FIFO_THRESHOLD: u8 = 0x3C;
/// Register address of `FIFO_DATA`.
pub const REG_FIFO_DATA: u8 = 0x3D;

/// Register select mask of the communications byte.
pub const COMMS_ADDRESS_MASK: u8 = 0x3F;
/// Read direction bit of the communications byte.
pub const COMMS_READ: u8 = 1 << 6;

/// Number of `CHANNEL_m` registers.
pub const MAX_CHANNELS: u8 = 16;
/// Number of setup banks (`CONFIG_n`, `FILTER_n`, `OFFSET_n`, `GAIN_n`).
pub const SETUP_BANKS: u8 = 8;
/// Widest register on the device, in bytes.
pub const MAX_REGISTER_BYTES: usize = 4;
/// Width of every `CHANNEL_m` register, in bytes.
pub const CHANNEL_REGISTER_BYTES: usize = 3;

/// Number of consecutive `0xFF` bytes forming the software reset sequence (64 ones).
pub const RESET_SEQUENCE_BYTES: usize = 8;

/// Access permissions encoded for each register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterAccess {
    /// Read-only register.
    ReadOnly,
    /// Read/write register.
    ReadWrite,
}

/// Returns the width in bytes of the register at `address`.
pub const fn register_size(address: u8) -> Option<usize> {
    match address {
        REG_STATUS | REG_ID | REG_MCLK_COUNT | REG_FIFO_STATUS => Some(1),
        REG_ADC_CONTROL | REG_IO_CONTROL | REG_VBIAS_CONTROL | REG_ERROR | REG_ERROR_EN
        | REG_MISC => Some(2),
        0x19..=0x20 => Some(2),
        REG_DATA | REG_FIFO_CONTROL | REG_FIFO_THRESHOLD | REG_FIFO_DATA => Some(3),
        0x09..=0x18 | 0x21..=0x38 => Some(3),
        _ => None,
    }
}

/// Returns the access classification of the register at `address`.
pub const fn register_access(address: u8) -> Option<RegisterAccess> {
    match address {
        REG_STATUS | REG_DATA | REG_ID | REG_MCLK_COUNT | REG_FIFO_STATUS | REG_FIFO_DATA => {
            Some(RegisterAccess::ReadOnly)
        }
        _ if register_size(address).is_some() => Some(RegisterAccess::ReadWrite),
        _ => None,
    }
}

/// Builds the command byte that opens every transaction.
pub const fn command_byte(address: u8, is_read: bool) -> u8 {
    let command = address & COMMS_ADDRESS_MASK;
    if is_read { command | COMMS_READ } else { command }
}

/// Places the low `size` bytes of `word` most-significant byte first.
///
/// Returns `None` when `size` is not a valid register width or `word` does not fit.
pub fn to_wire(word: u32, size: usize) -> Option<[u8; MAX_REGISTER_BYTES]> {
    if size == 0 || size > MAX_REGISTER_BYTES {
        return None;
    }
    if size < MAX_REGISTER_BYTES && word >> (8 * size) != 0 {
        return None;
    }

    let be = word.to_be_bytes();
    let mut out = [0u8; MAX_REGISTER_BYTES];
    out[..size].copy_from_slice(&be[MAX_REGISTER_BYTES - size..]);
    Some(out)
}

/// Reassembles a register word received most-significant byte first.
pub fn from_wire(bytes: &[u8]) -> u32 {
    bytes
        .iter()
        .fold(0u32, |word, &byte| (word << 8) | u32::from(byte))
}

/// Index of one of the eight setup banks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SetupBank(u8);

impl SetupBank {
    /// Returns the bank for `index`, or `None` when `index >= 8`.
    pub const fn new(index: u8) -> Option<Self> {
        if index < SETUP_BANKS { Some(Self(index)) } else { None }
    }

    /// Returns the raw bank number.
    pub const fn index(self) -> u8 {
        self.0
    }

    /// Address of `CONFIG_n`.
    pub const fn config_register(self) -> u8 {
        REG_CONFIG_BASE + self.0
    }

    /// Address of `FILTER_n`.
    pub const fn filter_register(self) -> u8 {
        REG_FILTER_BASE + self.0
    }

    /// Address of `OFFSET_n`.
    pub const fn offset_register(self) -> u8 {
        REG_OFFSET_BASE + self.0
    }

    /// Address of `GAIN_n`.
    pub const fn gain_register(self) -> u8 {
        REG_GAIN_BASE + self.0
    }
}

/// Index of one of the sixteen channel registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChannelIndex(u8);

impl ChannelIndex {
    /// Returns the channel for `index`, or `None` when `index >= 16`.
    pub const fn new(index: u8) -> Option<Self> {
        if index < MAX_CHANNELS { Some(Self(index)) } else { None }
    }

    /// Returns the raw channel number.
    pub const fn index(self) -> u8 {
        self.0
    }

    /// Address of `CHANNEL_m`.
    pub const fn register(self) -> u8 {
        REG_CHANNEL_BASE + self.0
    }
}

/// Minimal metadata exposed by every fixed-address register value type.
pub trait Register: Copy {
    /// Register address as documented in the datasheet.
    const ADDRESS: u8;
    /// Width on the wire, in bytes.
    const SIZE: usize;
    /// Access permission classification.
    const ACCESS: RegisterAccess;

    /// Decodes the register from its numeric word.
    fn from_word(word: u32) -> Self;

    /// Encodes the register into its numeric word.
    fn to_word(self) -> u32;
}

/// Bitfield representation of the `STATUS` register (address `0x00`).
#[allow(unused_parens)]
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Status {
    // Channel currently being converted (bits 3:0).
    pub channel_active: B4,
    // Power-on reset flag (bit 4).
    pub por_flag: bool,
    #[skip]
    __: B1,
    // Error flag mirrored from the `ERROR` register (bit 6).
    pub master_error: bool,
    // Ready bit, low when a conversion result is available (bit 7).
    pub ready_b: bool,
}

impl Status {
    /// Returns `true` when a new conversion result can be read.
    pub fn data_ready(self) -> bool {
        !self.ready_b()
    }
}

impl From<u8> for Status {
    fn from(value: u8) -> Self {
        Self::from_bytes([value])
    }
}

impl From<Status> for u8 {
    fn from(value: Status) -> Self {
        value.into_bytes()[0]
    }
}

/// Bitfield representation of the `ADC_CONTROL` register (address `0x01`).
#[allow(unused_parens)]
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdcControl {
    // Master clock source (bits 1:0).
    pub clock: ClockSelect,
    // Operating mode (bits 5:2).
    pub mode: AdcMode,
    #[skip]
    __: B2,
    // Internal reference enable (bit 8).
    pub int_ref_enable: bool,
    // CS-gated conversions (bit 9).
    pub csb_enable: bool,
    // Append STATUS to data reads (bit 10).
    pub data_status: bool,
    // Continuous read of DATA without command bytes (bit 11).
    pub continuous_read: bool,
    #[skip]
    __: B1,
    // Internal reference 2.5 V instead of 1.25 V (bit 13).
    pub int_ref_2v5: bool,
    // Bipolar output coding (bit 14).
    pub bipolar: bool,
    #[skip]
    __: B1,
}

/// Bitfield representation of the `ERROR` register (address `0x06`).
#[allow(unused_parens)]
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorFlags {
    #[skip]
    __: B9,
    // Reference over/undervoltage (bit 9).
    pub ref_ov_uv: bool,
    // AINM over/undervoltage (bit 10).
    pub ainm_ov_uv: bool,
    // AINP over/undervoltage (bit 11).
    pub ainp_ov_uv: bool,
    #[skip]
    __: B4,
}

impl ErrorFlags {
    /// Returns `true` when any decoded analog fault is flagged.
    pub fn any(self) -> bool {
        self.ref_ov_uv() || self.ainm_ov_uv() || self.ainp_ov_uv()
    }
}

/// Bitfield representation of a `CHANNEL_m` register (addresses `0x09`..`0x18`).
#[allow(unused_parens)]
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelRegister {
    // Excitation current IOUT0 output pin (bits 3:0).
    pub iout0: B4,
    // Excitation current IOUT1 output pin (bits 7:4).
    pub iout1: B4,
    // Negative input (bits 12:8).
    pub ainm: InputSource,
    // Positive input (bits 17:13).
    pub ainp: InputSource,
    // Threshold monitor enable (bit 18).
    pub threshold_enable: bool,
    // Power switch enable (bit 19).
    pub power_switch_enable: bool,
    // Setup bank (bits 22:20).
    pub setup: B3,
    // Channel enable (bit 23).
    pub enable: bool,
}

impl ChannelRegister {
    /// Decodes the channel register from its 24-bit word. Bits above 23 are ignored.
    pub fn from_word(word: u32) -> Self {
        let [b0, b1, b2, _] = word.to_le_bytes();
        Self::from_bytes([b0, b1, b2])
    }

    /// Encodes the channel register into its 24-bit word.
    pub fn to_word(self) -> u32 {
        let [b0, b1, b2] = self.into_bytes();
        u32::from_le_bytes([b0, b1, b2, 0])
    }
}

impl Register for Status {
    const ADDRESS: u8 = REG_STATUS;
    const SIZE: usize = 1;
    const ACCESS: RegisterAccess = RegisterAccess::ReadOnly;

    fn from_word(word: u32) -> Self {
        Self::from(word as u8)
    }

    fn to_word(self) -> u32 {
        u8::from(self).into()
    }
}

impl Register for AdcControl {
    const ADDRESS: u8 = REG_ADC_CONTROL;
    const SIZE: usize = 2;
    const ACCESS: RegisterAccess = RegisterAccess::ReadWrite;

    fn from_word(word: u32) -> Self {
        Self::from_bytes((word as u16).to_le_bytes())
    }

    fn to_word(self) -> u32 {
        u16::from_le_bytes(self.into_bytes()).into()
    }
}

// Flags are cleared by writing ones.
impl Register for ErrorFlags {
    const ADDRESS: u8 = REG_ERROR;
    const SIZE: usize = 2;
    const ACCESS: RegisterAccess = RegisterAccess::ReadWrite;

    fn from_word(word: u32) -> Self {
        Self::from_bytes((word as u16).to_le_bytes())
    }

    fn to_word(self) -> u32 {
        u16::from_le_bytes(self.into_bytes()).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Validates that Status bitfields match the datasheet layout.
    #[test]
    fn status_layout_matches_datasheet() {
        let status = Status::from(0b0101_0011);
        assert_eq!(status.channel_active(), 3);
        assert!(status.por_flag());
        assert!(status.master_error());
        assert!(!status.ready_b());
        assert!(status.data_ready());
    }

    #[test]
    fn channel_fields_land_on_datasheet_bits() {
        let reg = ChannelRegister::new()
            .with_enable(true)
            .with_setup(3)
            .with_ainp(InputSource::Ain2)
            .with_ainm(InputSource::Ain3);
        let word = reg.to_word();

        assert_eq!(word & (1 << 23), 1 << 23);
        assert_eq!((word >> 20) & 0b111, 0b011);
        assert_eq!((word >> 13) & 0x1F, 0x02);
        assert_eq!((word >> 8) & 0x1F, 0x03);
        assert_eq!(word, 0x00B0_4300);
    }

    #[test]
    fn channel_flags_and_current_outputs() {
        let reg = ChannelRegister::new()
            .with_threshold_enable(true)
            .with_power_switch_enable(true)
            .with_iout0(0x5)
            .with_iout1(0xA);

        assert_eq!(reg.to_word(), (1 << 19) | (1 << 18) | 0xA5);
        assert_eq!(ChannelRegister::from_word(reg.to_word()), reg);
    }

    #[test]
    fn channel_rejects_out_of_range_setup() {
        assert!(ChannelRegister::new().with_setup_checked(8).is_err());
        assert!(ChannelRegister::new().with_iout0_checked(16).is_err());
    }

    #[test]
    fn reserved_input_code_is_reported() {
        let reg = ChannelRegister::from_word(0x1F << 13);
        assert!(reg.ainp_or_err().is_err());
        assert_eq!(reg.ainm_or_err().ok(), Some(InputSource::Ain0));
    }

    #[test]
    fn adc_control_places_mode_and_reference_bits() {
        let control = AdcControl::new()
            .with_mode(AdcMode::Single)
            .with_clock(ClockSelect::External)
            .with_int_ref_enable(true)
            .with_bipolar(true);

        assert_eq!(control.to_word(), (1 << 14) | (1 << 8) | (0b0001 << 2) | 0b10);
        assert_eq!(AdcControl::from_word(control.to_word()), control);
    }

    #[test]
    fn error_flags_decode_analog_faults() {
        let flags = ErrorFlags::from_word((1 << 11) | (1 << 9));
        assert!(flags.ainp_ov_uv());
        assert!(!flags.ainm_ov_uv());
        assert!(flags.ref_ov_uv());
        assert!(flags.any());
        assert!(!ErrorFlags::from_word(0x0001).any());
    }

    #[test]
    fn indexed_families_offset_from_base() {
        let bank = SetupBank::new(7).unwrap();
        assert_eq!(bank.config_register(), 0x20);
        assert_eq!(bank.filter_register(), 0x28);
        assert_eq!(bank.offset_register(), 0x30);
        assert_eq!(bank.gain_register(), 0x38);
        assert!(SetupBank::new(8).is_none());

        assert_eq!(ChannelIndex::new(0).unwrap().register(), 0x09);
        assert_eq!(ChannelIndex::new(15).unwrap().register(), 0x18);
        assert!(ChannelIndex::new(16).is_none());
    }

    #[test]
    fn register_widths_and_access() {
        assert_eq!(register_size(REG_ID), Some(1));
        assert_eq!(register_size(REG_ADC_CONTROL), Some(2));
        assert_eq!(register_size(REG_CHANNEL_BASE), Some(CHANNEL_REGISTER_BYTES));
        assert_eq!(register_size(REG_CONFIG_BASE), Some(2));
        assert_eq!(register_size(REG_GAIN_BASE + 7), Some(3));
        assert_eq!(register_size(0x3E), None);

        assert_eq!(register_access(REG_DATA), Some(RegisterAccess::ReadOnly));
        assert_eq!(register_access(REG_CHANNEL_BASE), Some(RegisterAccess::ReadWrite));
        assert_eq!(register_access(0x3F), None);
    }

    #[test]
    fn typed_registers_agree_with_tables() {
        fn check<R: Register>() {
            assert_eq!(register_size(R::ADDRESS), Some(R::SIZE));
            assert_eq!(register_access(R::ADDRESS), Some(R::ACCESS));
        }

        check::<Status>();
        check::<AdcControl>();
        check::<ErrorFlags>();
    }

    #[test]
    fn command_byte_framing() {
        assert_eq!(command_byte(0x09, false), 0x09);
        assert_eq!(command_byte(0x05, true), 0x45);
        assert_eq!(command_byte(0xFF, false), 0x3F);
    }

    #[test]
    fn wire_order_is_msb_first() {
        let wire = to_wire(0x00B0_4300, 3).unwrap();
        assert_eq!(&wire[..3], &[0xB0, 0x43, 0x00]);
        assert_eq!(from_wire(&wire[..3]), 0x00B0_4300);
        assert!(to_wire(0x0100, 1).is_none());
        assert!(to_wire(0, 5).is_none());
    }
}
