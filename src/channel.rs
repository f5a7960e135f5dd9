//! Channel configuration model and the configure/read-back sequence.

use crate::device::Ad4130;
use crate::error::{Error, Result};
use crate::interface::Ad4130Interface;
use crate::params::{InputSource, VerifyPolicy};
use crate::registers::{ChannelIndex, ChannelRegister};

/// Description of one input channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChannelConfig {
    /// Positive input.
    pub ainp: InputSource,
    /// Negative input.
    pub ainm: InputSource,
    /// Setup bank (0..=7) holding the filter, gain and offset settings.
    pub setup: u8,
    /// Include the channel in the conversion sequence.
    pub enable: bool,
    /// Threshold monitor enable.
    pub threshold_enable: bool,
    /// Power switch enable.
    pub power_switch_enable: bool,
    /// AIN pin (0..=15) driven by excitation current IOUT0.
    pub iout0: u8,
    /// AIN pin (0..=15) driven by excitation current IOUT1.
    pub iout1: u8,
}

impl ChannelConfig {
    /// Begins building a [`ChannelConfig`] for the given input pair.
    pub fn builder(ainp: InputSource, ainm: InputSource) -> ChannelConfigBuilder {
        ChannelConfigBuilder::new(ainp, ainm)
    }

    /// Encodes the configuration into the channel register bitfield.
    pub fn encode(&self) -> core::result::Result<ChannelRegister, FieldError> {
        ChannelRegister::new()
            .with_enable(self.enable)
            .with_ainp(self.ainp)
            .with_ainm(self.ainm)
            .with_threshold_enable(self.threshold_enable)
            .with_power_switch_enable(self.power_switch_enable)
            .with_setup_checked(self.setup)
            .map_err(|_| FieldError::Setup)?
            .with_iout0_checked(self.iout0)
            .map_err(|_| FieldError::Iout0)?
            .with_iout1_checked(self.iout1)
            .map_err(|_| FieldError::Iout1)
    }

    /// Decodes a channel register back into a configuration.
    pub fn decode(register: ChannelRegister) -> core::result::Result<Self, FieldError> {
        Ok(Self {
            ainp: register.ainp_or_err().map_err(|_| FieldError::ReservedInput)?,
            ainm: register.ainm_or_err().map_err(|_| FieldError::ReservedInput)?,
            setup: register.setup(),
            enable: register.enable(),
            threshold_enable: register.threshold_enable(),
            power_switch_enable: register.power_switch_enable(),
            iout0: register.iout0(),
            iout1: register.iout1(),
        })
    }
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            ainp: InputSource::Ain0,
            ainm: InputSource::Avss,
            setup: 0,
            enable: false,
            threshold_enable: false,
            power_switch_enable: false,
            iout0: 0,
            iout1: 0,
        }
    }
}

/// Builder for [`ChannelConfig`].
#[derive(Debug, Clone, Copy)]
pub struct ChannelConfigBuilder {
    config: ChannelConfig,
}

impl ChannelConfigBuilder {
    /// Creates a builder for a disabled channel on the given input pair.
    pub fn new(ainp: InputSource, ainm: InputSource) -> Self {
        Self {
            config: ChannelConfig {
                ainp,
                ainm,
                ..ChannelConfig::default()
            },
        }
    }

    /// Sets the setup bank.
    pub fn setup(mut self, setup: u8) -> Self {
        self.config.setup = setup;
        self
    }

    /// Sets the enable flag.
    pub fn enable(mut self, enable: bool) -> Self {
        self.config.enable = enable;
        self
    }

    /// Sets the threshold monitor flag.
    pub fn threshold_enable(mut self, enable: bool) -> Self {
        self.config.threshold_enable = enable;
        self
    }

    /// Sets the power switch flag.
    pub fn power_switch_enable(mut self, enable: bool) -> Self {
        self.config.power_switch_enable = enable;
        self
    }

    /// Routes the two excitation currents.
    pub fn excitation(mut self, iout0: u8, iout1: u8) -> Self {
        self.config.iout0 = iout0;
        self.config.iout1 = iout1;
        self
    }

    /// Finalizes the builder.
    pub fn build(self) -> ChannelConfig {
        self.config
    }
}

/// Field that could not be encoded or decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FieldError {
    /// Setup bank above 7.
    Setup,
    /// IOUT0 pin above 15.
    Iout0,
    /// IOUT1 pin above 15.
    Iout1,
    /// Input multiplexer code in the reserved range.
    ReservedInput,
}

/// Words exchanged while configuring a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChannelReadback {
    /// Word written to the channel register.
    pub written: u32,
    /// Word read back from the channel register.
    pub read_back: u32,
}

impl ChannelReadback {
    /// Returns `true` when the device holds the written value.
    pub fn matches(&self) -> bool {
        self.written == self.read_back
    }

    /// Decodes the word the device reported.
    pub fn decode(&self) -> core::result::Result<ChannelConfig, FieldError> {
        ChannelConfig::decode(ChannelRegister::from_word(self.read_back))
    }
}

/// Validates, encodes, writes and reads back one channel register.
pub fn configure_channel<IFACE, CommE>(
    device: &mut Ad4130<IFACE>,
    channel: u8,
    config: &ChannelConfig,
) -> Result<ChannelReadback, CommE>
where
    IFACE: Ad4130Interface<Error = CommE>,
{
    let index = channel_index(device, channel)?;

    let written = config.encode().map_err(|_| Error::InvalidField)?.to_word();
    debug!("ad4130 channel {=u8} <- {=u32:#x}", channel, written);

    device.write_register(index.register(), written)?;
    let read_back = device.read_register(index.register())?;

    let readback = ChannelReadback { written, read_back };
    if !readback.matches() {
        warn!(
            "ad4130 channel {=u8} read back {=u32:#x}, wrote {=u32:#x}",
            channel,
            read_back,
            written
        );
        if device.config().verify == VerifyPolicy::Enforce {
            return Err(Error::VerifyMismatch { written, read_back });
        }
    }

    Ok(readback)
}

/// Reads and decodes one channel register.
pub fn read_channel<IFACE, CommE>(
    device: &mut Ad4130<IFACE>,
    channel: u8,
) -> Result<ChannelConfig, CommE>
where
    IFACE: Ad4130Interface<Error = CommE>,
{
    let index = channel_index(device, channel)?;
    let word = device.read_register(index.register())?;
    ChannelConfig::decode(ChannelRegister::from_word(word)).map_err(|_| Error::InvalidField)
}

fn channel_index<IFACE, CommE>(device: &Ad4130<IFACE>, channel: u8) -> Result<ChannelIndex, CommE> {
    if !device.is_initialized() {
        return Err(Error::NotInitialized);
    }

    if channel >= device.config().channel_count {
        return Err(Error::InvalidChannel(channel));
    }

    ChannelIndex::new(channel).ok_or(Error::InvalidChannel(channel))
}
