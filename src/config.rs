//! Driver and bus configuration.

use embedded_hal::spi::{Mode, MODE_0};

/// Driver configuration.
///
/// [`Sh1106Config::default()`] assumes the panel's internal charge pump
/// generates VCC, which is how nearly all breakout modules are wired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Sh1106Config {
    /// `true` when VCC is supplied externally. Selects the charge pump,
    /// contrast and pre-charge values of the init sequence.
    pub external_vcc: bool,
}

impl Sh1106Config {
    /// Select an external or internal VCC source.
    pub fn with_external_vcc(mut self, external_vcc: bool) -> Self {
        self.external_vcc = external_vcc;
        self
    }
}

/// SPI settings the SH1106 expects.
///
/// Clock rate and mode belong to the `SpiDevice`, which the HAL or a
/// shared-bus wrapper configures. Translate these values into that
/// device's config type when creating the device that is handed to
/// [`SpiInterface`](crate::SpiInterface).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpiConfig {
    /// Clock frequency in Hz. Default: 8 MHz.
    pub frequency: u32,
    /// Clock polarity and phase. Default: mode 0.
    pub mode: Mode,
}

impl Default for SpiConfig {
    fn default() -> Self {
        Self {
            frequency: 8_000_000,
            mode: MODE_0,
        }
    }
}
