//! Error handling primitives for the AD4130 driver.

/// Crate-wide result type alias.
pub type Result<T, E> = core::result::Result<T, Error<E>>;

/// Error variants produced by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// Any error reported by the underlying bus interface.
    Interface(E),
    /// A register operation was attempted before [`init`](crate::Ad4130::init).
    NotInitialized,
    /// The device did not answer the identification probe.
    BusNotReady,
    /// The provided configuration parameters are invalid.
    InvalidConfig,
    /// The channel index is not below the configured channel count.
    InvalidChannel(u8),
    /// A field value lies outside its bitfield domain.
    InvalidField,
    /// Unknown register address, wrong access direction or oversized value.
    InvalidRegister,
    /// The channel register read back differs from the value written.
    VerifyMismatch {
        /// Word sent to the device.
        written: u32,
        /// Word returned by the device.
        read_back: u32,
    },
}

impl<E> From<E> for Error<E> {
    fn from(err: E) -> Self {
        Self::Interface(err)
    }
}
