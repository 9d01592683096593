//! Transport layer between the controller core and the bus.
//!
//! The core only ever needs two things from a bus: send one command byte,
//! send one block of display data. [`TransportAdapter`] captures exactly
//! that, plus an acquire/release pair. Every driver operation runs inside a
//! [`BusGuard`], which acquires on construction and releases on drop, so the
//! bus is released on every exit path, errors included.
//!
//! Provided transports:
//!
//! - [`I2cInterface`]: any `embedded-hal` [`I2c`] bus.
//! - [`SpiInterface`]: any `embedded-hal` [`SpiDevice`] plus the D/C pin.
//! - [`DisplayInterfaceAdapter`]: any `display-interface`
//!   [`WriteOnlyDataCommand`] implementation.
//!
//! # Sharing a bus
//!
//! The provided transports keep the default no-op acquire/release. Each
//! command byte and each data block is one bus transaction, and exclusion
//! between devices on the same bus comes from the `embedded-hal` device
//! handed in: a shared-bus `SpiDevice` (e.g.
//! `embassy_embedded_hal::shared_bus::blocking::spi::SpiDevice`) owns CS and
//! locks the bus per transaction, and shared `I2c` handles do the same.
//! Transports that wrap a try-lock override [`TransportAdapter::acquire`]
//! and return [`Sh1106Error::BusUnavailable`] when the lock is taken.

use display_interface::{DataFormat, WriteOnlyDataCommand};
use embedded_hal::digital::OutputPin;
use embedded_hal::i2c::{I2c, Operation};
use embedded_hal::spi::SpiDevice;

use crate::command::Command;
use crate::error::{Sh1106Error, TransportFault};

// ---------------------------------------------------------------------------
// Protocol constants
// ---------------------------------------------------------------------------

/// Default 7-bit I2C address of SH1106 modules (SA0 low).
pub const DEFAULT_ADDRESS: u8 = 0x3C;

/// I2C control byte: Co = 0, D/C = 0, the next byte is a command.
pub const CONTROL_COMMAND: u8 = 0x00;

/// I2C control byte: Co = 0, D/C = 1, the following bytes are display data.
pub const CONTROL_DATA: u8 = 0x40;

// ---------------------------------------------------------------------------
// TransportAdapter
// ---------------------------------------------------------------------------

/// A bus the controller core can talk through.
///
/// Implementations override the methods they support. The write methods
/// default to [`Sh1106Error::UnsupportedOperation`]; acquire/release default
/// to no-ops for buses whose device handle already serialises access.
pub trait TransportAdapter {
    /// Take exclusive use of the bus for one operation.
    fn acquire(&mut self) -> Result<(), Sh1106Error> {
        Ok(())
    }

    /// Give the bus back. Called exactly once per successful [`acquire`](Self::acquire).
    fn release(&mut self) {}

    /// Send a single command byte.
    fn write_command(&mut self, _command: u8) -> Result<(), Sh1106Error> {
        Err(Sh1106Error::UnsupportedOperation)
    }

    /// Send one block of display data.
    fn write_data(&mut self, _data: &[u8]) -> Result<(), Sh1106Error> {
        Err(Sh1106Error::UnsupportedOperation)
    }
}

// Lets callers lend a transport to the driver instead of moving it in.
impl<T: TransportAdapter + ?Sized> TransportAdapter for &mut T {
    fn acquire(&mut self) -> Result<(), Sh1106Error> {
        (**self).acquire()
    }

    fn release(&mut self) {
        (**self).release()
    }

    fn write_command(&mut self, command: u8) -> Result<(), Sh1106Error> {
        (**self).write_command(command)
    }

    fn write_data(&mut self, data: &[u8]) -> Result<(), Sh1106Error> {
        (**self).write_data(data)
    }
}

// ---------------------------------------------------------------------------
// Scoped acquisition
// ---------------------------------------------------------------------------

/// Hold on a transport for the duration of one operation.
///
/// Releases the transport when dropped. The guard borrows the transport
/// mutably, so operations on one transport can never nest.
pub struct BusGuard<'a, T: TransportAdapter + ?Sized> {
    transport: &'a mut T,
}

impl<'a, T: TransportAdapter + ?Sized> BusGuard<'a, T> {
    /// Acquire `transport`. Nothing is released if acquisition fails.
    pub fn acquire(transport: &'a mut T) -> Result<Self, Sh1106Error> {
        if let Err(e) = transport.acquire() {
            #[cfg(feature = "defmt")]
            defmt::warn!("SH1106 bus acquisition refused: {}", e);
            return Err(e);
        }
        Ok(Self { transport })
    }

    /// Send one raw command byte.
    pub fn command(&mut self, byte: u8) -> Result<(), Sh1106Error> {
        self.transport.write_command(byte)
    }

    /// Send every byte of `command`, each as its own command write.
    pub fn send(&mut self, command: Command) -> Result<(), Sh1106Error> {
        for &byte in command.bytes().iter() {
            self.command(byte)?;
        }
        Ok(())
    }

    /// Send one block of display data.
    pub fn data(&mut self, data: &[u8]) -> Result<(), Sh1106Error> {
        self.transport.write_data(data)
    }
}

impl<T: TransportAdapter + ?Sized> Drop for BusGuard<'_, T> {
    fn drop(&mut self) {
        self.transport.release();
    }
}

// ---------------------------------------------------------------------------
// I2C
// ---------------------------------------------------------------------------

/// SH1106 over I2C.
///
/// Commands go out as `[0x00, opcode]`. Display data goes out as one
/// transaction of two write operations, `[0x40]` then the data bytes.
///
/// `embedded-hal` requires adjacent write operations of one transaction to
/// be sent without a repeated start, so the panel sees a single `1 + len`
/// byte write. HALs that split a transaction into separate messages (for
/// example a Linux `I2C_RDWR` backend that does not merge writes) break
/// this framing; wrap such a bus in a [`DisplayInterfaceAdapter`] over a
/// `display-interface-i2c` interface instead.
#[derive(Debug)]
pub struct I2cInterface<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C> I2cInterface<I2C>
where
    I2C: I2c,
{
    /// Wrap an I2C bus.
    ///
    /// # Arguments
    /// * `i2c`: I2C peripheral or shared-bus device
    /// * `address`: 7-bit device address (typically [`DEFAULT_ADDRESS`])
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    /// Device address.
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Give back the bus.
    pub fn into_inner(self) -> I2C {
        self.i2c
    }
}

impl<I2C> TransportAdapter for I2cInterface<I2C>
where
    I2C: I2c,
{
    fn write_command(&mut self, command: u8) -> Result<(), Sh1106Error> {
        self.i2c
            .write(self.address, &[CONTROL_COMMAND, command])
            .map_err(Sh1106Error::i2c)
    }

    fn write_data(&mut self, data: &[u8]) -> Result<(), Sh1106Error> {
        self.i2c
            .transaction(
                self.address,
                &mut [Operation::Write(&[CONTROL_DATA]), Operation::Write(data)],
            )
            .map_err(Sh1106Error::i2c)
    }
}

// ---------------------------------------------------------------------------
// SPI
// ---------------------------------------------------------------------------

/// SH1106 over 4-wire SPI.
///
/// The [`SpiDevice`] owns chip select: it asserts CS around every write and
/// locks the bus if it is shared. D/C is driven low before each command byte
/// and high before each data block, and only changes between transactions.
///
/// Clock rate and mode are properties of the device; program it with the
/// values in [`SpiConfig::default()`](crate::SpiConfig) when it is created.
#[derive(Debug)]
pub struct SpiInterface<SPI, DC> {
    spi: SPI,
    dc: DC,
}

impl<SPI, DC> SpiInterface<SPI, DC>
where
    SPI: SpiDevice,
    DC: OutputPin,
{
    /// Wrap an SPI device and its D/C line.
    pub fn new(spi: SPI, dc: DC) -> Self {
        Self { spi, dc }
    }

    /// Give back the device and pin.
    pub fn into_inner(self) -> (SPI, DC) {
        (self.spi, self.dc)
    }

    fn write_with_dc(&mut self, data_mode: bool, bytes: &[u8]) -> Result<(), Sh1106Error> {
        if data_mode {
            self.dc.set_high().map_err(Sh1106Error::pin)?;
        } else {
            self.dc.set_low().map_err(Sh1106Error::pin)?;
        }
        self.spi.write(bytes).map_err(Sh1106Error::spi)
    }
}

impl<SPI, DC> TransportAdapter for SpiInterface<SPI, DC>
where
    SPI: SpiDevice,
    DC: OutputPin,
{
    fn write_command(&mut self, command: u8) -> Result<(), Sh1106Error> {
        self.write_with_dc(false, &[command])
    }

    fn write_data(&mut self, data: &[u8]) -> Result<(), Sh1106Error> {
        self.write_with_dc(true, data)
    }
}

// ---------------------------------------------------------------------------
// display-interface
// ---------------------------------------------------------------------------

/// Adapter for any `display-interface` implementation.
///
/// Lets the controller core run over `display-interface-i2c`,
/// `display-interface-spi` or a parallel interface. Framing is whatever the
/// wrapped interface does; each command byte is passed as its own
/// `send_commands` call.
#[derive(Debug)]
pub struct DisplayInterfaceAdapter<DI> {
    iface: DI,
}

impl<DI> DisplayInterfaceAdapter<DI>
where
    DI: WriteOnlyDataCommand,
{
    /// Wrap a display interface.
    pub fn new(iface: DI) -> Self {
        Self { iface }
    }

    /// Give back the display interface.
    pub fn into_inner(self) -> DI {
        self.iface
    }
}

impl<DI> TransportAdapter for DisplayInterfaceAdapter<DI>
where
    DI: WriteOnlyDataCommand,
{
    fn write_command(&mut self, command: u8) -> Result<(), Sh1106Error> {
        self.iface
            .send_commands(DataFormat::U8(&[command]))
            .map_err(|_| Sh1106Error::TransportWrite(TransportFault::Interface))
    }

    fn write_data(&mut self, data: &[u8]) -> Result<(), Sh1106Error> {
        self.iface
            .send_data(DataFormat::U8(data))
            .map_err(|_| Sh1106Error::TransportWrite(TransportFault::Interface))
    }
}
