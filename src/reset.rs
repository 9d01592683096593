//! Optional hardware reset line.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::error::Sh1106Error;

/// High time before the reset pulse, in ms.
pub const RESET_SETUP_MS: u32 = 1;
/// Low (active) time of the reset pulse, in ms.
pub const RESET_PULSE_MS: u32 = 10;
/// Settle time after releasing reset, in ms.
pub const RESET_RECOVERY_MS: u32 = 10;

/// Something that can hardware-reset the controller.
pub trait ResetLine {
    /// Whether a physical reset line is wired.
    fn is_present(&self) -> bool;

    /// Pulse the reset line, blocking for the whole sequence.
    fn pulse(&mut self) -> Result<(), Sh1106Error>;
}

/// No reset line wired; [`pulse`](ResetLine::pulse) does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoReset;

impl ResetLine for NoReset {
    fn is_present(&self) -> bool {
        false
    }

    fn pulse(&mut self) -> Result<(), Sh1106Error> {
        Ok(())
    }
}

/// Active-low reset pin plus the delay source that times the pulse.
#[derive(Debug)]
pub struct ResetPin<RST, D> {
    pin: RST,
    delay: D,
}

impl<RST, D> ResetPin<RST, D>
where
    RST: OutputPin,
    D: DelayNs,
{
    /// Wrap a reset pin and a delay provider.
    pub fn new(pin: RST, delay: D) -> Self {
        Self { pin, delay }
    }

    /// Give back the pin and delay.
    pub fn into_inner(self) -> (RST, D) {
        (self.pin, self.delay)
    }
}

impl<RST, D> ResetLine for ResetPin<RST, D>
where
    RST: OutputPin,
    D: DelayNs,
{
    fn is_present(&self) -> bool {
        true
    }

    /// High 1 ms, low 10 ms, high 10 ms.
    fn pulse(&mut self) -> Result<(), Sh1106Error> {
        self.pin.set_high().map_err(|_| Sh1106Error::Reset)?;
        self.delay.delay_ms(RESET_SETUP_MS);
        self.pin.set_low().map_err(|_| Sh1106Error::Reset)?;
        self.delay.delay_ms(RESET_PULSE_MS);
        self.pin.set_high().map_err(|_| Sh1106Error::Reset)?;
        self.delay.delay_ms(RESET_RECOVERY_MS);
        Ok(())
    }
}
