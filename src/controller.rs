//! Controller core: initialisation sequence and device state.
//!
//! [`ControllerCore`] decides *which* bytes go to the controller for every
//! state transition. It never touches a bus directly; each operation takes
//! a [`BusGuard`] that the caller has already acquired.
//!
//! # Power states
//!
//! ```text
//!   Off ──initialize──▶ Initializing ──(sequence sent)──▶ On
//!    ▲                                                    │
//!    └────────────────────── poweroff ────────────────────┘
//!    └────────────────────── poweron ─────────────────────▶
//! ```

use heapless::Vec;

use crate::command::{
    Command, ADDRESSING_HORIZONTAL, CLOCK_DIVIDER, COM_PINS_ALTERNATIVE, COM_PINS_SEQUENTIAL,
    CONTRAST_EXTERNAL, CONTRAST_INTERNAL, CONTRAST_RESET, PRECHARGE_EXTERNAL, PRECHARGE_INTERNAL,
    VCOM_DESELECT_LEVEL,
};
use crate::error::Sh1106Error;
use crate::interface::{BusGuard, TransportAdapter};
use crate::reset::ResetLine;

/// Upper bound on the init sequence length in bytes.
pub const INIT_SEQUENCE_LEN: usize = 32;

// ── State ────────────────────────────────────────────────────────────────

/// Power state of the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PowerState {
    /// Display off (sleep) or not yet initialised.
    Off,
    /// Init sequence in flight.
    Initializing,
    /// Display on.
    On,
}

/// Last values written to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceState {
    /// Panel is lit.
    pub display_on: bool,
    /// Current contrast.
    pub contrast: u8,
    /// Pixels are inverted.
    pub inverted: bool,
    /// VCC comes from an external supply rather than the charge pump.
    pub external_vcc: bool,
}

impl DeviceState {
    fn power_up_defaults(external_vcc: bool) -> Self {
        Self {
            display_on: false,
            contrast: if external_vcc { CONTRAST_EXTERNAL } else { CONTRAST_INTERNAL },
            inverted: false,
            external_vcc,
        }
    }

    /// Register values after a hardware reset pulse.
    fn chip_reset(external_vcc: bool) -> Self {
        Self {
            display_on: false,
            contrast: CONTRAST_RESET,
            inverted: false,
            external_vcc,
        }
    }
}

// ── Init sequence ────────────────────────────────────────────────────────

/// The power-on command sequence, in send order.
///
/// The order and values are fixed by the panel hardware; only the
/// multiplex ratio, COM pin configuration and the three VCC-dependent
/// arguments vary. The width does not enter the sequence, since the column
/// start is fixed.
pub fn init_sequence(_width: u8, height: u8, external_vcc: bool) -> Vec<u8, INIT_SEQUENCE_LEN> {
    let commands = [
        Command::DisplayOn(false),
        Command::ClockDivider(CLOCK_DIVIDER),
        Command::Multiplex(height.saturating_sub(1)),
        Command::DisplayOffset(0),
        Command::StartLine(0),
        Command::ChargePump { external_vcc },
        Command::AddressingMode(ADDRESSING_HORIZONTAL),
        Command::PageAddress(0),
        Command::ComScanDecrement(true),
        Command::LowColumn,
        Command::HighColumn,
        Command::ComPinConfig(if height == 32 { COM_PINS_SEQUENTIAL } else { COM_PINS_ALTERNATIVE }),
        Command::Contrast(if external_vcc { CONTRAST_EXTERNAL } else { CONTRAST_INTERNAL }),
        Command::SegmentRemap,
        Command::Precharge(if external_vcc { PRECHARGE_EXTERNAL } else { PRECHARGE_INTERNAL }),
        Command::VcomDeselect(VCOM_DESELECT_LEVEL),
        Command::AllOn(false),
        Command::Invert(false),
        Command::DisplayOn(true),
    ];

    let mut seq = Vec::new();
    for command in commands {
        // 28 bytes total, always fits.
        let _ = seq.extend_from_slice(&command.bytes());
    }
    seq
}

// ── ControllerCore ───────────────────────────────────────────────────────

/// Command logic and state for one SH1106.
#[derive(Debug, Clone)]
pub struct ControllerCore {
    power: PowerState,
    state: DeviceState,
}

impl ControllerCore {
    /// A controller that has not been initialised yet.
    pub fn new(external_vcc: bool) -> Self {
        Self {
            power: PowerState::Off,
            state: DeviceState::power_up_defaults(external_vcc),
        }
    }

    /// Current power state.
    pub fn power_state(&self) -> PowerState {
        self.power
    }

    /// Last values written to the controller.
    pub fn state(&self) -> &DeviceState {
        &self.state
    }

    /// Send the full init sequence for a `width` x `height` panel.
    ///
    /// On failure the state is left at [`PowerState::Initializing`]; the
    /// controller is in an unknown configuration and must be initialised
    /// again.
    pub fn initialize<T>(
        &mut self,
        bus: &mut BusGuard<'_, T>,
        width: u8,
        height: u8,
    ) -> Result<(), Sh1106Error>
    where
        T: TransportAdapter + ?Sized,
    {
        self.power = PowerState::Initializing;
        for &byte in init_sequence(width, height, self.state.external_vcc).iter() {
            bus.command(byte)?;
        }
        self.state = DeviceState {
            display_on: true,
            ..DeviceState::power_up_defaults(self.state.external_vcc)
        };
        self.power = PowerState::On;
        Ok(())
    }

    /// Pulse the reset line if one is wired, then turn the display on.
    ///
    /// A pulse returns the controller registers to their chip defaults and
    /// only `AF` follows it, so afterwards [`state()`](Self::state) reports
    /// the reset contrast (`0x80`) and a non-inverted display.
    pub fn poweron<T, R>(&mut self, bus: &mut BusGuard<'_, T>, reset: &mut R) -> Result<(), Sh1106Error>
    where
        T: TransportAdapter + ?Sized,
        R: ResetLine + ?Sized,
    {
        if reset.is_present() {
            reset.pulse()?;
            self.state = DeviceState::chip_reset(self.state.external_vcc);
            self.power = PowerState::Off;
        }
        bus.send(Command::DisplayOn(true))?;
        self.state.display_on = true;
        self.power = PowerState::On;

        #[cfg(feature = "defmt")]
        defmt::debug!("SH1106 power on");
        Ok(())
    }

    /// Turn the display off (sleep). RAM contents are kept.
    pub fn poweroff<T>(&mut self, bus: &mut BusGuard<'_, T>) -> Result<(), Sh1106Error>
    where
        T: TransportAdapter + ?Sized,
    {
        bus.send(Command::DisplayOn(false))?;
        self.state.display_on = false;
        self.power = PowerState::Off;

        #[cfg(feature = "defmt")]
        defmt::debug!("SH1106 power off");
        Ok(())
    }

    /// Set the contrast (0-255).
    pub fn set_contrast<T>(&mut self, bus: &mut BusGuard<'_, T>, value: u8) -> Result<(), Sh1106Error>
    where
        T: TransportAdapter + ?Sized,
    {
        bus.send(Command::Contrast(value))?;
        self.state.contrast = value;

        #[cfg(feature = "defmt")]
        defmt::debug!("SH1106 contrast {=u8:#x}", value);
        Ok(())
    }

    /// Invert (or restore) every pixel.
    pub fn set_inverted<T>(&mut self, bus: &mut BusGuard<'_, T>, inverted: bool) -> Result<(), Sh1106Error>
    where
        T: TransportAdapter + ?Sized,
    {
        bus.send(Command::Invert(inverted))?;
        self.state.inverted = inverted;

        #[cfg(feature = "defmt")]
        defmt::debug!("SH1106 inverted {}", inverted);
        Ok(())
    }

    /// Light every pixel regardless of RAM (`true`), or show RAM (`false`).
    pub fn set_entire_on<T>(&mut self, bus: &mut BusGuard<'_, T>, on: bool) -> Result<(), Sh1106Error>
    where
        T: TransportAdapter + ?Sized,
    {
        bus.send(Command::AllOn(on))
    }

    /// Set the RAM row shown on the top line (hardware vertical scroll).
    pub fn set_start_line<T>(&mut self, bus: &mut BusGuard<'_, T>, line: u8) -> Result<(), Sh1106Error>
    where
        T: TransportAdapter + ?Sized,
    {
        bus.send(Command::StartLine(line))
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use std::vec;

    use super::*;
    use crate::testing::{Event, MockDelay, MockPin, Recorder, SharedLog};
    use crate::reset::{NoReset, ResetPin};

    const INTERNAL_128X64: [u8; 28] = [
        0xAE, 0xD5, 0xF0, 0xA8, 0x3F, 0xD3, 0x00, 0x40, 0x8D, 0x14, 0x20, 0x00, 0xB0, 0xC8, 0x02,
        0x00, 0xDA, 0x12, 0x81, 0xCF, 0xA1, 0xD9, 0xF1, 0xDB, 0x20, 0xA4, 0xA6, 0xAF,
    ];

    // ── Init sequence ────────────────────────────────────────────────

    #[test]
    fn init_sequence_internal_vcc() {
        let seq = init_sequence(128, 64, false);
        assert_eq!(seq.as_slice(), &INTERNAL_128X64);
    }

    #[test]
    fn init_sequence_external_vcc() {
        let seq = init_sequence(128, 64, true);
        assert_eq!(
            seq.as_slice(),
            &[
                0xAE, 0xD5, 0xF0, 0xA8, 0x3F, 0xD3, 0x00, 0x40, 0x8D, 0x10, 0x20, 0x00, 0xB0,
                0xC8, 0x02, 0x00, 0xDA, 0x12, 0x81, 0x9F, 0xA1, 0xD9, 0x22, 0xDB, 0x20, 0xA4,
                0xA6, 0xAF,
            ]
        );
    }

    #[test]
    fn init_sequence_tracks_height() {
        let seq = init_sequence(128, 32, false);
        // Multiplex ratio is height - 1.
        assert_eq!(&seq[3..5], &[0xA8, 0x1F]);
        // 32-row panels use sequential COM pins.
        assert_eq!(&seq[16..18], &[0xDA, 0x02]);
    }

    // ── Initialize ───────────────────────────────────────────────────

    #[test]
    fn initialize_sends_sequence_and_turns_on() {
        let mut rec = Recorder::new();
        let mut core = ControllerCore::new(false);
        assert_eq!(core.power_state(), PowerState::Off);

        core.initialize(&mut BusGuard::acquire(&mut rec).unwrap(), 128, 64)
            .unwrap();

        assert_eq!(rec.commands(), init_sequence(128, 64, false).to_vec());
        assert_eq!(core.power_state(), PowerState::On);
        assert_eq!(
            *core.state(),
            DeviceState {
                display_on: true,
                contrast: 0xCF,
                inverted: false,
                external_vcc: false,
            }
        );
    }

    #[test]
    fn initialize_failure_stays_initializing() {
        let mut rec = Recorder::new().fail_on_write(5);
        let mut core = ControllerCore::new(true);

        let result = core.initialize(&mut BusGuard::acquire(&mut rec).unwrap(), 128, 64);

        assert!(result.is_err());
        assert_eq!(core.power_state(), PowerState::Initializing);
        assert_eq!(rec.commands().len(), 5);
        assert_eq!(rec.acquires(), rec.releases());
    }

    // ── State operations ─────────────────────────────────────────────

    #[test]
    fn contrast_emits_opcode_and_value() {
        let mut rec = Recorder::new();
        let mut core = ControllerCore::new(false);

        core.set_contrast(&mut BusGuard::acquire(&mut rec).unwrap(), 0x50)
            .unwrap();

        assert_eq!(rec.commands(), vec![0x81, 0x50]);
        assert_eq!(core.state().contrast, 0x50);
    }

    #[test]
    fn invert_toggles_state() {
        let mut rec = Recorder::new();
        let mut core = ControllerCore::new(false);

        core.set_inverted(&mut BusGuard::acquire(&mut rec).unwrap(), true)
            .unwrap();
        assert!(core.state().inverted);
        core.set_inverted(&mut BusGuard::acquire(&mut rec).unwrap(), false)
            .unwrap();
        assert!(!core.state().inverted);

        assert_eq!(rec.commands(), vec![0xA7, 0xA6]);
    }

    #[test]
    fn failed_contrast_keeps_old_value() {
        let mut rec = Recorder::new().fail_on_write(1);
        let mut core = ControllerCore::new(false);

        let result = core.set_contrast(&mut BusGuard::acquire(&mut rec).unwrap(), 0x10);

        assert!(result.is_err());
        assert_eq!(core.state().contrast, 0xCF);
    }

    #[test]
    fn poweroff_then_poweron_without_reset() {
        let mut rec = Recorder::new();
        let mut core = ControllerCore::new(false);
        core.initialize(&mut BusGuard::acquire(&mut rec).unwrap(), 128, 64)
            .unwrap();
        rec.clear();

        core.poweroff(&mut BusGuard::acquire(&mut rec).unwrap()).unwrap();
        assert_eq!(core.power_state(), PowerState::Off);
        assert!(!core.state().display_on);

        core.poweron(&mut BusGuard::acquire(&mut rec).unwrap(), &mut NoReset)
            .unwrap();
        assert_eq!(core.power_state(), PowerState::On);
        assert!(core.state().display_on);

        assert_eq!(rec.commands(), vec![0xAE, 0xAF]);
    }

    #[test]
    fn poweron_pulses_reset_before_display_on() {
        let log = SharedLog::default();
        let mut reset = ResetPin::new(MockPin::new("rst", log.clone()), MockDelay::new(log.clone()));
        let mut rec = Recorder::new();
        let mut core = ControllerCore::new(false);

        core.poweron(&mut BusGuard::acquire(&mut rec).unwrap(), &mut reset)
            .unwrap();

        assert_eq!(
            log.take(),
            vec![
                Event::Pin("rst", true),
                Event::DelayMs(1),
                Event::Pin("rst", false),
                Event::DelayMs(10),
                Event::Pin("rst", true),
                Event::DelayMs(10),
            ]
        );
        assert_eq!(rec.commands(), vec![0xAF]);
    }

    #[test]
    fn poweron_with_reset_reports_chip_defaults() {
        let log = SharedLog::default();
        let mut reset = ResetPin::new(MockPin::new("rst", log.clone()), MockDelay::new(log.clone()));
        let mut rec = Recorder::new();
        let mut core = ControllerCore::new(true);
        {
            let mut bus = BusGuard::acquire(&mut rec).unwrap();
            core.initialize(&mut bus, 128, 64).unwrap();
            core.set_contrast(&mut bus, 0x50).unwrap();
            core.set_inverted(&mut bus, true).unwrap();
        }

        core.poweron(&mut BusGuard::acquire(&mut rec).unwrap(), &mut reset)
            .unwrap();

        assert_eq!(
            *core.state(),
            DeviceState {
                display_on: true,
                contrast: 0x80,
                inverted: false,
                external_vcc: true,
            }
        );
        assert_eq!(core.power_state(), PowerState::On);
    }

    #[test]
    fn poweron_without_reset_keeps_settings() {
        let mut rec = Recorder::new();
        let mut core = ControllerCore::new(false);
        {
            let mut bus = BusGuard::acquire(&mut rec).unwrap();
            core.initialize(&mut bus, 128, 64).unwrap();
            core.set_contrast(&mut bus, 0x50).unwrap();
            core.poweroff(&mut bus).unwrap();
            core.poweron(&mut bus, &mut NoReset).unwrap();
        }
        assert_eq!(core.state().contrast, 0x50);
    }

    #[test]
    fn entire_on_and_start_line() {
        let mut rec = Recorder::new();
        let mut core = ControllerCore::new(false);
        {
            let mut bus = BusGuard::acquire(&mut rec).unwrap();
            core.set_entire_on(&mut bus, true).unwrap();
            core.set_entire_on(&mut bus, false).unwrap();
            core.set_start_line(&mut bus, 8).unwrap();
        }
        assert_eq!(rec.commands(), vec![0xA5, 0xA4, 0x48]);
    }
}
