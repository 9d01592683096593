//! Error types for the SH1106 driver.

use core::fmt;

use embedded_hal::{i2c, spi};

/// Errors that can occur during SH1106 display operations.
///
/// Bus errors from the different transports are reduced to their
/// `embedded-hal` [`ErrorKind`](i2c::ErrorKind) so this enum stays
/// non-generic and `Copy`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sh1106Error {
    /// The transport is already held by another operation.
    BusUnavailable,
    /// The underlying send reported an error.
    TransportWrite(TransportFault),
    /// The transport does not implement the requested capability.
    UnsupportedOperation,
    /// The hardware reset line could not be driven.
    Reset,
    /// A frame buffer is shorter than the page geometry it is flushed with.
    BufferSize,
    /// The geometry exceeds the controller RAM (8 pages of 132 columns).
    InvalidGeometry,
}

/// What failed underneath a [`Sh1106Error::TransportWrite`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportFault {
    /// I2C bus error.
    I2c(i2c::ErrorKind),
    /// SPI bus error.
    Spi(spi::ErrorKind),
    /// Data/command or chip-select GPIO error.
    Pin,
    /// Error reported by a `display-interface` implementation.
    Interface,
}

impl Sh1106Error {
    pub(crate) fn i2c<E: i2c::Error>(error: E) -> Self {
        Sh1106Error::TransportWrite(TransportFault::I2c(error.kind()))
    }

    pub(crate) fn spi<E: spi::Error>(error: E) -> Self {
        Sh1106Error::TransportWrite(TransportFault::Spi(error.kind()))
    }

    pub(crate) fn pin<E>(_error: E) -> Self {
        Sh1106Error::TransportWrite(TransportFault::Pin)
    }
}

impl fmt::Display for Sh1106Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Sh1106Error::BusUnavailable => write!(f, "bus unavailable"),
            Sh1106Error::TransportWrite(fault) => write!(f, "transport write failed: {:?}", fault),
            Sh1106Error::UnsupportedOperation => write!(f, "operation not supported by transport"),
            Sh1106Error::Reset => write!(f, "reset line error"),
            Sh1106Error::BufferSize => write!(f, "frame buffer smaller than display geometry"),
            Sh1106Error::InvalidGeometry => write!(f, "geometry exceeds controller RAM"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Sh1106Error {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Sh1106Error::BusUnavailable => defmt::write!(f, "Bus unavailable"),
            Sh1106Error::TransportWrite(fault) => defmt::write!(f, "Transport write failed: {}", fault),
            Sh1106Error::UnsupportedOperation => defmt::write!(f, "Unsupported operation"),
            Sh1106Error::Reset => defmt::write!(f, "Reset line error"),
            Sh1106Error::BufferSize => defmt::write!(f, "Buffer size mismatch"),
            Sh1106Error::InvalidGeometry => defmt::write!(f, "Invalid geometry"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for TransportFault {
    fn format(&self, f: defmt::Formatter) {
        match self {
            TransportFault::I2c(kind) => defmt::write!(f, "I2C {}", kind),
            TransportFault::Spi(kind) => defmt::write!(f, "SPI {}", kind),
            TransportFault::Pin => defmt::write!(f, "GPIO"),
            TransportFault::Interface => defmt::write!(f, "display interface"),
        }
    }
}

/// A failed construction.
///
/// Construction never yields a partially initialised driver. The transport
/// and reset line are handed back so the caller can retry.
#[derive(Debug)]
pub struct InitError<T, R> {
    /// Why initialisation failed.
    pub error: Sh1106Error,
    /// The transport the driver was built with.
    pub transport: T,
    /// The reset line the driver was built with.
    pub reset: R,
}

impl<T, R> InitError<T, R> {
    /// Recover the transport and reset line.
    pub fn into_parts(self) -> (T, R) {
        (self.transport, self.reset)
    }
}

impl<T, R> fmt::Display for InitError<T, R> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "initialisation failed: {}", self.error)
    }
}
