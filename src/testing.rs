//! Test doubles shared by the unit tests.

extern crate std;

use core::cell::RefCell;
use std::rc::Rc;
use std::vec::Vec;

use embedded_hal::delay::DelayNs;
use embedded_hal::{digital, i2c, spi};

use crate::error::Sh1106Error;
use crate::interface::TransportAdapter;

// ── Recording transport ──────────────────────────────────────────────────

/// One call seen by [`Recorder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BusEvent {
    Acquire,
    Release,
    Command(u8),
    Data(Vec<u8>),
}

/// Transport that records every call and can fail on demand.
#[derive(Debug, Default)]
pub struct Recorder {
    pub events: Vec<BusEvent>,
    writes: usize,
    fail_on_write: Option<usize>,
    refuse_after: Option<usize>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the `n`th write (0-based, commands and data counted together).
    pub fn fail_on_write(mut self, n: usize) -> Self {
        self.fail_on_write = Some(n);
        self
    }

    /// Grant `n` acquisitions, then refuse every further one.
    pub fn refuse_acquire_after(mut self, n: usize) -> Self {
        self.refuse_after = Some(n);
        self
    }

    pub fn acquires(&self) -> usize {
        self.count(|e| *e == BusEvent::Acquire)
    }

    pub fn releases(&self) -> usize {
        self.count(|e| *e == BusEvent::Release)
    }

    /// Command bytes in order, ignoring data and locking.
    pub fn commands(&self) -> Vec<u8> {
        self.events
            .iter()
            .filter_map(|e| match e {
                BusEvent::Command(c) => Some(*c),
                _ => None,
            })
            .collect()
    }

    /// Everything except acquire/release.
    pub fn wire(&self) -> Vec<BusEvent> {
        self.events
            .iter()
            .filter(|e| matches!(e, BusEvent::Command(_) | BusEvent::Data(_)))
            .cloned()
            .collect()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    fn count(&self, pred: impl Fn(&BusEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }

    fn write(&mut self, event: BusEvent) -> Result<(), Sh1106Error> {
        let n = self.writes;
        self.writes += 1;
        if self.fail_on_write == Some(n) {
            return Err(Sh1106Error::TransportWrite(
                crate::error::TransportFault::I2c(i2c::ErrorKind::NoAcknowledge(
                    i2c::NoAcknowledgeSource::Data,
                )),
            ));
        }
        self.events.push(event);
        Ok(())
    }
}

impl TransportAdapter for Recorder {
    fn acquire(&mut self) -> Result<(), Sh1106Error> {
        if self.refuse_after.is_some_and(|n| self.acquires() >= n) {
            return Err(Sh1106Error::BusUnavailable);
        }
        self.events.push(BusEvent::Acquire);
        Ok(())
    }

    fn release(&mut self) {
        self.events.push(BusEvent::Release);
    }

    fn write_command(&mut self, command: u8) -> Result<(), Sh1106Error> {
        self.write(BusEvent::Command(command))
    }

    fn write_data(&mut self, data: &[u8]) -> Result<(), Sh1106Error> {
        self.write(BusEvent::Data(data.to_vec()))
    }
}

// ── Hardware doubles ─────────────────────────────────────────────────────

/// One hardware-level action, in the order it happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Pin(&'static str, bool),
    SpiWrite(Vec<u8>),
    DelayMs(u32),
}

/// Ordered log shared between pins, bus and delay.
#[derive(Debug, Clone, Default)]
pub struct SharedLog(Rc<RefCell<Vec<Event>>>);

impl SharedLog {
    pub fn push(&self, event: Event) {
        self.0.borrow_mut().push(event);
    }

    pub fn take(&self) -> Vec<Event> {
        core::mem::take(&mut *self.0.borrow_mut())
    }
}

/// Error returned by the failing doubles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockError(pub i2c::ErrorKind);

impl i2c::Error for MockError {
    fn kind(&self) -> i2c::ErrorKind {
        self.0
    }
}

impl spi::Error for MockError {
    fn kind(&self) -> spi::ErrorKind {
        spi::ErrorKind::Other
    }
}

impl digital::Error for MockError {
    fn kind(&self) -> digital::ErrorKind {
        digital::ErrorKind::Other
    }
}

/// I2C bus recording one frame per transaction.
#[derive(Debug, Default)]
pub struct MockI2c {
    /// `(address, bytes)`; adjacent writes of a transaction are joined.
    pub frames: Vec<(u8, Vec<u8>)>,
    fail: Option<i2c::ErrorKind>,
}

impl MockI2c {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(mut self, kind: i2c::ErrorKind) -> Self {
        self.fail = Some(kind);
        self
    }
}

impl i2c::ErrorType for MockI2c {
    type Error = MockError;
}

impl i2c::I2c for MockI2c {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [i2c::Operation<'_>],
    ) -> Result<(), Self::Error> {
        if let Some(kind) = self.fail {
            return Err(MockError(kind));
        }
        let mut frame = Vec::new();
        for op in operations.iter() {
            if let i2c::Operation::Write(bytes) = op {
                frame.extend_from_slice(bytes);
            }
        }
        self.frames.push((address, frame));
        Ok(())
    }
}

/// SPI device logging its chip select around every transaction.
#[derive(Debug)]
pub struct MockSpi {
    cs: &'static str,
    log: SharedLog,
    fail: bool,
}

impl MockSpi {
    pub fn new(cs: &'static str, log: SharedLog) -> Self {
        Self {
            cs,
            log,
            fail: false,
        }
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }
}

impl spi::ErrorType for MockSpi {
    type Error = MockError;
}

impl spi::SpiDevice for MockSpi {
    fn transaction(&mut self, operations: &mut [spi::Operation<'_, u8>]) -> Result<(), Self::Error> {
        if self.fail {
            return Err(MockError(i2c::ErrorKind::Other));
        }
        self.log.push(Event::Pin(self.cs, false));
        for op in operations.iter_mut() {
            match op {
                spi::Operation::Write(bytes) => self.log.push(Event::SpiWrite(bytes.to_vec())),
                spi::Operation::Transfer(read, write) => {
                    read.fill(0);
                    self.log.push(Event::SpiWrite(write.to_vec()));
                }
                spi::Operation::TransferInPlace(words) => {
                    self.log.push(Event::SpiWrite(words.to_vec()))
                }
                spi::Operation::Read(words) => words.fill(0),
                spi::Operation::DelayNs(_) => {}
            }
        }
        self.log.push(Event::Pin(self.cs, true));
        Ok(())
    }
}

/// Output pin logging its level changes.
#[derive(Debug)]
pub struct MockPin {
    name: &'static str,
    log: SharedLog,
    fail: bool,
}

impl MockPin {
    pub fn new(name: &'static str, log: SharedLog) -> Self {
        Self {
            name,
            log,
            fail: false,
        }
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    fn set(&mut self, level: bool) -> Result<(), MockError> {
        if self.fail {
            return Err(MockError(i2c::ErrorKind::Other));
        }
        self.log.push(Event::Pin(self.name, level));
        Ok(())
    }
}

impl digital::ErrorType for MockPin {
    type Error = MockError;
}

impl digital::OutputPin for MockPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.set(false)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.set(true)
    }
}

/// Delay that returns immediately and logs the requested time.
#[derive(Debug)]
pub struct MockDelay {
    log: SharedLog,
}

impl MockDelay {
    pub fn new(log: SharedLog) -> Self {
        Self { log }
    }
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.log.push(Event::DelayMs(ns / 1_000_000));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.log.push(Event::DelayMs(ms));
    }
}
