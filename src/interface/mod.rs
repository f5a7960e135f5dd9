//! Bus interface abstraction for the AD4130 driver.

pub mod spi;

/// Abstraction over the low-level bus access required by the driver.
///
/// Every method performs exactly one bus transaction and never retries.
pub trait Ad4130Interface {
    /// Error type produced by the concrete bus implementation.
    type Error;

    /// Reads `buf.len()` bytes from the register at `register`, most significant byte first.
    fn read_many(&mut self, register: u8, buf: &mut [u8]) -> core::result::Result<(), Self::Error>;

    /// Writes `data` to the register at `register`, most significant byte first.
    fn write_many(&mut self, register: u8, data: &[u8]) -> core::result::Result<(), Self::Error>;

    /// Clocks out `data` without a command byte.
    fn write_raw(&mut self, data: &[u8]) -> core::result::Result<(), Self::Error>;
}
