//! SPI interface implementation built on top of `embedded-hal` `SpiDevice`.

use embedded_hal::spi::{Mode, Operation, SpiDevice, MODE_3};

use super::Ad4130Interface;
use crate::params::BitOrder;
use crate::registers::{command_byte, MAX_REGISTER_BYTES};

/// SPI mode expected by the AD4130 (CPOL = 1, CPHA = 1).
pub const SPI_MODE: Mode = MODE_3;
/// Bit order expected by the AD4130.
pub const BIT_ORDER: BitOrder = BitOrder::MsbFirst;
/// Word size on the wire, in bits.
pub const WORD_SIZE: u8 = 8;

/// SPI-based interface implementation for the AD4130 driver.
///
/// Chip-select handling is delegated to the wrapped [`SpiDevice`], which must be
/// configured with [`SPI_MODE`], [`BIT_ORDER`] and the frequency from
/// [`BusSettings`](crate::config::BusSettings).
pub struct SpiInterface<SPI> {
    spi: SPI,
}

impl<SPI> SpiInterface<SPI> {
    /// Creates a new interface from the provided SPI device abstraction.
    pub const fn new(spi: SPI) -> Self {
        Self { spi }
    }

    /// Provides mutable access to the wrapped SPI device.
    pub fn spi_mut(&mut self) -> &mut SPI {
        &mut self.spi
    }

    /// Consumes the interface and returns the owned SPI device.
    pub fn release(self) -> SPI {
        self.spi
    }
}

impl<SPI> Ad4130Interface for SpiInterface<SPI>
where
    SPI: SpiDevice,
{
    type Error = SPI::Error;

    fn read_many(&mut self, register: u8, buf: &mut [u8]) -> core::result::Result<(), Self::Error> {
        if buf.is_empty() {
            return Ok(());
        }

        // The byte clocked in while the command goes out is dropped by the write
        // operation; only the following `buf.len()` bytes are captured.
        let command = [command_byte(register, true)];
        trace!("ad4130 read cmd={=u8:#x} len={=usize}", command[0], buf.len());
        let mut operations = [Operation::Write(&command), Operation::Read(buf)];
        self.spi.transaction(&mut operations)
    }

    fn write_many(&mut self, register: u8, data: &[u8]) -> core::result::Result<(), Self::Error> {
        if data.is_empty() {
            return Ok(());
        }

        let command = command_byte(register, false);
        trace!("ad4130 write cmd={=u8:#x} len={=usize}", command, data.len());

        if data.len() > MAX_REGISTER_BYTES {
            let command = [command];
            let mut operations = [Operation::Write(&command), Operation::Write(data)];
            return self.spi.transaction(&mut operations);
        }

        let mut frame = [0u8; 1 + MAX_REGISTER_BYTES];
        frame[0] = command;
        frame[1..=data.len()].copy_from_slice(data);
        let mut operations = [Operation::Write(&frame[..=data.len()])];
        self.spi.transaction(&mut operations)
    }

    fn write_raw(&mut self, data: &[u8]) -> core::result::Result<(), Self::Error> {
        if data.is_empty() {
            return Ok(());
        }

        let mut operations = [Operation::Write(data)];
        self.spi.transaction(&mut operations)
    }
}

#[cfg(test)]
mod tests {
    use super::SpiInterface;
    use crate::interface::Ad4130Interface;
    use core::convert::Infallible;
    use embedded_hal::spi::{ErrorType, Operation, SpiDevice};
    use embedded_hal_mock::eh1::spi::{Mock as SpiMock, Transaction as SpiTransaction};

    struct MockDevice<'a> {
        expectations: &'a [TransactionExpectation<'a>],
        index: usize,
    }

    impl<'a> MockDevice<'a> {
        fn new(expectations: &'a [TransactionExpectation<'a>]) -> Self {
            Self { expectations, index: 0 }
        }
    }

    impl<'a> Drop for MockDevice<'a> {
        fn drop(&mut self) {
            assert_eq!(
                self.index,
                self.expectations.len(),
                "not all SPI expectations consumed"
            );
        }
    }

    impl<'a> ErrorType for MockDevice<'a> {
        type Error = Infallible;
    }

    impl<'a> SpiDevice for MockDevice<'a> {
        fn transaction<'b>(
            &mut self,
            operations: &mut [Operation<'b, u8>],
        ) -> Result<(), Self::Error> {
            let expected = self
                .expectations
                .get(self.index)
                .expect("unexpected SPI transaction");
            self.index += 1;

            match *expected {
                TransactionExpectation::Read { command, response } => {
                    assert_eq!(operations.len(), 2, "expected write+read operations");
                    let (first, rest) = operations.split_first_mut().expect("missing first op");
                    match first {
                        Operation::Write(data) => {
                            assert_eq!(data.len(), 1, "command length mismatch");
                            assert_eq!(data[0], command, "command byte mismatch");
                        }
                        _ => panic!("first operation must be write"),
                    }

                    let second = rest.first_mut().expect("missing second op");
                    match second {
                        Operation::Read(buf) => {
                            assert_eq!(buf.len(), response.len(), "response length mismatch");
                            buf.copy_from_slice(response);
                        }
                        _ => panic!("second operation must be read"),
                    }
                }
                TransactionExpectation::Frame { bytes } => {
                    assert_eq!(operations.len(), 1, "expected a single write operation");
                    match &operations[0] {
                        Operation::Write(data) => assert_eq!(*data, bytes, "frame mismatch"),
                        _ => panic!("operation must be write"),
                    }
                }
            }

            Ok(())
        }
    }

    #[derive(Clone, Copy)]
    enum TransactionExpectation<'a> {
        Read { command: u8, response: &'a [u8] },
        Frame { bytes: &'a [u8] },
    }

    #[test]
    fn read_many_transfers_command_and_fills_buffer() {
        let expectations = [TransactionExpectation::Read {
            command: 0x49,
            response: &[0xB0, 0x43, 0x00],
        }];
        let mock = MockDevice::new(&expectations);
        let mut interface = SpiInterface::new(mock);

        let mut buffer = [0u8; 3];
        interface.read_many(0x09, &mut buffer).unwrap();
        assert_eq!(buffer, [0xB0, 0x43, 0x00]);
    }

    #[test]
    fn write_many_sends_command_and_payload_as_one_frame() {
        let expectations = [TransactionExpectation::Frame {
            bytes: &[0x01, 0x01, 0x04],
        }];
        let mock = MockDevice::new(&expectations);
        let mut interface = SpiInterface::new(mock);

        interface.write_many(0x01, &[0x01, 0x04]).unwrap();
    }

    #[test]
    fn write_many_masks_address_to_six_bits() {
        let expectations = [TransactionExpectation::Frame {
            bytes: &[0x09, 0x7E],
        }];
        let mock = MockDevice::new(&expectations);
        let mut interface = SpiInterface::new(mock);

        interface.write_many(0xC9, &[0x7E]).unwrap();
    }

    #[test]
    fn write_raw_sends_bytes_without_command() {
        let expectations = [TransactionExpectation::Frame {
            bytes: &[0xFF; 8],
        }];
        let mock = MockDevice::new(&expectations);
        let mut interface = SpiInterface::new(mock);

        interface.write_raw(&[0xFF; 8]).unwrap();
    }

    #[test]
    fn read_many_ignores_empty_buffer() {
        let expectations: [TransactionExpectation; 0] = [];
        let mock = MockDevice::new(&expectations);
        let mut interface = SpiInterface::new(mock);

        interface.read_many(0x08, &mut []).unwrap();
    }

    #[test]
    fn write_many_ignores_empty_payload() {
        let expectations: [TransactionExpectation; 0] = [];
        let mock = MockDevice::new(&expectations);
        let mut interface = SpiInterface::new(mock);

        interface.write_many(0x08, &[]).unwrap();
    }

    #[test]
    fn write_frame_on_the_wire() {
        let expectations = [
            SpiTransaction::transaction_start(),
            SpiTransaction::write_vec(vec![0x09, 0xAB, 0xCD]),
            SpiTransaction::transaction_end(),
        ];
        let mut spi = SpiMock::new(&expectations);
        let mut interface = SpiInterface::new(spi.clone());

        interface.write_many(0x09, &[0xAB, 0xCD]).unwrap();
        spi.done();
    }

    #[test]
    fn read_frame_on_the_wire() {
        let expectations = [
            SpiTransaction::transaction_start(),
            SpiTransaction::write_vec(vec![0x45]),
            SpiTransaction::read_vec(vec![0x11, 0x22, 0x33, 0x44]),
            SpiTransaction::transaction_end(),
        ];
        let mut spi = SpiMock::new(&expectations);
        let mut interface = SpiInterface::new(spi.clone());

        let mut buffer = [0u8; 4];
        interface.read_many(0x05, &mut buffer).unwrap();
        assert_eq!(buffer, [0x11, 0x22, 0x33, 0x44]);
        spi.done();
    }
}
