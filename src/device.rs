//! High-level AD4130 device driver implementation.

use crate::channel::{self, ChannelConfig, ChannelReadback};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::interface::spi::SpiInterface;
use crate::interface::Ad4130Interface;
use crate::params::{AdcMode, InputSource};
use crate::registers::{
    from_wire,
    register_access,
    register_size,
    to_wire,
    AdcControl,
    ErrorFlags,
    Register,
    RegisterAccess,
    Status,
    MAX_REGISTER_BYTES,
    REG_DATA,
    REG_ID,
    RESET_SEQUENCE_BYTES,
};
use embedded_hal::delay::DelayNs;
use embedded_hal::spi::SpiDevice;

// Settling time after a software reset: 160 MCLK cycles at 76.8 kHz, rounded up.
const RESET_SETTLE_US: u32 = 2_084;

/// High-level synchronous driver for the AD4130 ADC.
///
/// Owns the bus interface and the active [`Config`]. Every register operation
/// requires a prior successful [`init`](Self::init).
pub struct Ad4130<IFACE> {
    interface: IFACE,
    config: Config,
    initialized: bool,
}

impl<IFACE> Ad4130<IFACE> {
    // ==================================================================
    // == Driver Construction & Ownership ===============================
    // ==================================================================
    /// Creates a new, uninitialized driver instance from the provided bus interface.
    pub fn new(interface: IFACE, config: Config) -> Self {
        Self {
            interface,
            config,
            initialized: false,
        }
    }

    /// Consumes the driver and returns the owned interface and configuration.
    pub fn release(self) -> (IFACE, Config) {
        (self.interface, self.config)
    }

    /// Provides mutable access to the underlying interface.
    pub fn interface_mut(&mut self) -> &mut IFACE {
        &mut self.interface
    }

    /// Returns a shared reference to the active configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns `true` once [`init`](Self::init) has succeeded.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }
}

impl<SPI> Ad4130<SpiInterface<SPI>>
where
    SPI: SpiDevice,
{
    // ==================================================================
    // == SPI Convenience Constructors ==================================
    // ==================================================================
    /// Convenience constructor for SPI transports.
    pub fn new_spi(spi: SPI, config: Config) -> Self {
        Self::new(SpiInterface::new(spi), config)
    }

    /// Releases the driver, returning the SPI device and configuration.
    pub fn release_spi(self) -> (SPI, Config) {
        let (iface, config) = self.release();
        (iface.release(), config)
    }
}

impl<IFACE, CommE> Ad4130<IFACE>
where
    IFACE: Ad4130Interface<Error = CommE>,
{
    // ==================================================================
    // == Initialization ================================================
    // ==================================================================
    /// Validates the configuration and probes the device.
    ///
    /// Reads the `ID` register once; a bus stuck at `0x00` or `0xFF` means no
    /// device answered and yields [`Error::BusNotReady`]. Returns the ID on success.
    pub fn init(&mut self) -> Result<u8, CommE> {
        self.config.validate().map_err(|_| Error::InvalidConfig)?;

        let mut id = [0u8; 1];
        self.interface.read_many(REG_ID, &mut id)?;
        if id[0] == 0x00 || id[0] == 0xFF {
            warn!("ad4130 not responding (id={=u8:#x})", id[0]);
            return Err(Error::BusNotReady);
        }

        debug!("ad4130 ready (id={=u8:#x})", id[0]);
        self.initialized = true;
        Ok(id[0])
    }

    /// Issues the software reset sequence (64 consecutive ones) and waits for it to settle.
    pub fn reset(&mut self, delay: &mut impl DelayNs) -> Result<(), CommE> {
        self.ensure_initialized()?;

        self.interface.write_raw(&[0xFF; RESET_SEQUENCE_BYTES])?;
        delay.delay_us(RESET_SETTLE_US);
        Ok(())
    }

    // ==================================================================
    // == Identification & Status =======================================
    // ==================================================================
    /// Reads the 1-byte identification register.
    pub fn get_id(&mut self) -> Result<u8, CommE> {
        Ok(self.read_register(REG_ID)? as u8)
    }

    /// Reads the `STATUS` register.
    pub fn read_status(&mut self) -> Result<Status, CommE> {
        self.read::<Status>()
    }

    /// Reads the `ERROR` register.
    pub fn read_errors(&mut self) -> Result<ErrorFlags, CommE> {
        self.read::<ErrorFlags>()
    }

    // ==================================================================
    // == ADC Control & Conversion Data =================================
    // ==================================================================
    /// Reads the `ADC_CONTROL` register.
    ///
    /// Fails with [`Error::InvalidField`] when the device reports a reserved mode code.
    pub fn adc_control(&mut self) -> Result<AdcControl, CommE> {
        let control = self.read::<AdcControl>()?;
        control.mode_or_err().map_err(|_| Error::InvalidField)?;
        Ok(control)
    }

    /// Reads the current operating mode.
    pub fn mode(&mut self) -> Result<AdcMode, CommE> {
        self.read::<AdcControl>()?
            .mode_or_err()
            .map_err(|_| Error::InvalidField)
    }

    /// Writes the `ADC_CONTROL` register.
    pub fn set_adc_control(&mut self, control: AdcControl) -> Result<(), CommE> {
        self.write(control)
    }

    /// Changes the operating mode, leaving the other `ADC_CONTROL` fields untouched.
    ///
    /// A reserved mode code on the device is overwritten.
    pub fn set_mode(&mut self, mode: AdcMode) -> Result<(), CommE> {
        let current = self.read::<AdcControl>()?;
        let updated = current.with_mode(mode);
        if updated != current {
            self.set_adc_control(updated)?;
        }
        Ok(())
    }

    /// Reads the latest 24-bit conversion result.
    pub fn read_conversion(&mut self) -> Result<u32, CommE> {
        self.read_register(REG_DATA)
    }

    // ==================================================================
    // == Channel Configuration =========================================
    // ==================================================================
    /// Writes a channel configuration and reads it back.
    ///
    /// Channels at or above [`Config::channel_count`] are rejected before any bus
    /// access. A read-back mismatch fails only under
    /// [`VerifyPolicy::Enforce`](crate::params::VerifyPolicy::Enforce).
    pub fn configure_channel(
        &mut self,
        channel: u8,
        config: &ChannelConfig,
    ) -> Result<ChannelReadback, CommE> {
        channel::configure_channel(self, channel, config)
    }

    /// Enables a channel on the given input pair with every other field defaulted.
    pub fn enable_channel(
        &mut self,
        channel: u8,
        ainp: InputSource,
        ainm: InputSource,
    ) -> Result<ChannelReadback, CommE> {
        let config = ChannelConfig::builder(ainp, ainm).enable(true).build();
        self.configure_channel(channel, &config)
    }

    /// Reads and decodes a channel register.
    pub fn read_channel(&mut self, channel: u8) -> Result<ChannelConfig, CommE> {
        channel::read_channel(self, channel)
    }

    // ==================================================================
    // == Register Access ===============================================
    // ==================================================================
    /// Reads a typed register.
    pub fn read<R: Register>(&mut self) -> Result<R, CommE> {
        Ok(R::from_word(self.read_register(R::ADDRESS)?))
    }

    /// Writes a typed register.
    pub fn write<R: Register>(&mut self, value: R) -> Result<(), CommE> {
        if R::ACCESS != RegisterAccess::ReadWrite {
            return Err(Error::InvalidRegister);
        }
        self.write_register(R::ADDRESS, value.to_word())
    }

    /// Reads the register at `address`, sized from the register map.
    pub fn read_register(&mut self, address: u8) -> Result<u32, CommE> {
        self.ensure_initialized()?;

        let size = register_size(address).ok_or(Error::InvalidRegister)?;
        let mut raw = [0u8; MAX_REGISTER_BYTES];
        self.interface.read_many(address, &mut raw[..size])?;
        Ok(from_wire(&raw[..size]))
    }

    /// Writes `value` to the register at `address`, sized from the register map.
    pub fn write_register(&mut self, address: u8, value: u32) -> Result<(), CommE> {
        self.ensure_initialized()?;

        if register_access(address) != Some(RegisterAccess::ReadWrite) {
            return Err(Error::InvalidRegister);
        }
        let size = register_size(address).ok_or(Error::InvalidRegister)?;
        let wire = to_wire(value, size).ok_or(Error::InvalidField)?;
        self.interface.write_many(address, &wire[..size])?;
        Ok(())
    }

    fn ensure_initialized(&self) -> Result<(), CommE> {
        if self.initialized {
            Ok(())
        } else {
            Err(Error::NotInitialized)
        }
    }
}
