//! SH1106 command vocabulary.
//!
//! Every byte the controller understands on the command channel is listed
//! in [`Opcode`]. Commands that carry an argument are described by
//! [`Command`], which expands into the exact byte sequence sent on the wire.
//!
//! On I2C each command byte travels in its own `[0x00, byte]` write; on SPI
//! each byte is clocked with the D/C line low.

use heapless::Vec;

// ---------------------------------------------------------------------------
// Opcodes
// ---------------------------------------------------------------------------

/// Register opcodes. The discriminants are the wire values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Opcode {
    /// Contrast select; followed by the contrast byte.
    SetContrast = 0x81,
    /// Resume output from display RAM.
    SetEntireOn = 0xA4,
    /// Force every pixel on, ignoring RAM.
    SetDispAllOn = 0xA5,
    /// Normal (non-inverted) display.
    SetNorm = 0xA6,
    /// Inverted display.
    SetNormInv = 0xA7,
    /// Display off (sleep).
    SetDispOff = 0xAE,
    /// Display on.
    SetDispOn = 0xAF,
    /// Memory addressing mode; followed by the mode byte.
    SetMemAddr = 0x20,
    /// Column range (SSD1306 compatibility, unused by the page flush).
    SetColAddr = 0x21,
    /// Page range (SSD1306 compatibility, unused by the page flush).
    SetPageAddr = 0x22,
    /// Page address base; OR the page index in.
    SetPageAddress = 0xB0,
    /// Display start line base; OR the line (0-63) in.
    SetDispStartLine = 0x40,
    /// Segment remap (column 131 mapped to SEG0).
    SetSegRemap = 0xA1,
    /// Multiplex ratio; followed by `height - 1`.
    SetMuxRatio = 0xA8,
    /// COM output scan, decrementing.
    SetComScanDec = 0xC8,
    /// COM output scan, incrementing.
    SetComScanInc = 0xC0,
    /// Display offset; followed by the offset byte.
    SetDispOffset = 0xD3,
    /// COM pin hardware configuration; followed by the config byte.
    SetComPinCfg = 0xDA,
    /// Clock divide ratio / oscillator frequency; followed by the ratio byte.
    SetDispClkDiv = 0xD5,
    /// Pre-charge period; followed by the period byte.
    SetPrecharge = 0xD9,
    /// VCOM deselect level; followed by the level byte.
    SetVcomDesel = 0xDB,
    /// Charge pump setting; followed by `0x10` or `0x14`.
    SetChargePump = 0x8D,
    /// Low column address used at start-up and by every page flush.
    SetLowColumn = 0x02,
    /// High column address used at start-up and by every page flush.
    SetHighColumn = 0x00,
}

impl From<Opcode> for u8 {
    fn from(op: Opcode) -> u8 {
        op as u8
    }
}

// ---------------------------------------------------------------------------
// Argument values
// ---------------------------------------------------------------------------

/// Clock divider / oscillator byte sent during initialisation.
pub const CLOCK_DIVIDER: u8 = 0xF0;

/// Horizontal memory addressing mode.
pub const ADDRESSING_HORIZONTAL: u8 = 0x00;

/// VCOM deselect level (~0.77 x VCC).
pub const VCOM_DESELECT_LEVEL: u8 = 0x20;

/// Charge pump argument when VCC is supplied externally.
pub const CHARGE_PUMP_EXTERNAL: u8 = 0x10;
/// Charge pump argument when the internal pump generates VCC.
pub const CHARGE_PUMP_INTERNAL: u8 = 0x14;

/// Contrast the controller comes out of a hardware reset with.
pub const CONTRAST_RESET: u8 = 0x80;

/// Power-on contrast with external VCC.
pub const CONTRAST_EXTERNAL: u8 = 0x9F;
/// Power-on contrast with the internal charge pump.
pub const CONTRAST_INTERNAL: u8 = 0xCF;

/// Pre-charge period with external VCC.
pub const PRECHARGE_EXTERNAL: u8 = 0x22;
/// Pre-charge period with the internal charge pump.
pub const PRECHARGE_INTERNAL: u8 = 0xF1;

/// COM pin configuration for 32-row panels.
pub const COM_PINS_SEQUENTIAL: u8 = 0x02;
/// COM pin configuration for every other height.
pub const COM_PINS_ALTERNATIVE: u8 = 0x12;

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

/// A single controller command with its arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// `true` turns the panel on, `false` puts it to sleep.
    DisplayOn(bool),
    /// Contrast, 0-255.
    Contrast(u8),
    /// `true` inverts every pixel.
    Invert(bool),
    /// `true` lights every pixel regardless of RAM.
    AllOn(bool),
    /// Oscillator / clock divider byte.
    ClockDivider(u8),
    /// Multiplex ratio: number of active rows.
    Multiplex(u8),
    /// Vertical display offset.
    DisplayOffset(u8),
    /// Display start line, masked to 0-63.
    StartLine(u8),
    /// `true` when VCC is supplied externally (internal pump disabled).
    ChargePump { external_vcc: bool },
    /// Memory addressing mode byte.
    AddressingMode(u8),
    /// Page address (0-7) for subsequent data writes.
    PageAddress(u8),
    /// COM scan direction; `true` scans from COM[N-1] to COM0.
    ComScanDecrement(bool),
    /// Low column address command.
    LowColumn,
    /// High column address command.
    HighColumn,
    /// COM pin configuration byte.
    ComPinConfig(u8),
    /// Segment remap.
    SegmentRemap,
    /// Pre-charge period byte.
    Precharge(u8),
    /// VCOM deselect level byte.
    VcomDeselect(u8),
}

impl Command {
    /// Expand the command into the bytes sent on the command channel.
    pub fn bytes(self) -> Vec<u8, 2> {
        match self {
            Command::DisplayOn(true) => one(Opcode::SetDispOn as u8),
            Command::DisplayOn(false) => one(Opcode::SetDispOff as u8),
            Command::Contrast(value) => two(Opcode::SetContrast, value),
            Command::Invert(true) => one(Opcode::SetNormInv as u8),
            Command::Invert(false) => one(Opcode::SetNorm as u8),
            Command::AllOn(true) => one(Opcode::SetDispAllOn as u8),
            Command::AllOn(false) => one(Opcode::SetEntireOn as u8),
            Command::ClockDivider(ratio) => two(Opcode::SetDispClkDiv, ratio),
            Command::Multiplex(ratio) => two(Opcode::SetMuxRatio, ratio),
            Command::DisplayOffset(offset) => two(Opcode::SetDispOffset, offset),
            Command::StartLine(line) => one(Opcode::SetDispStartLine as u8 | (line & 0x3F)),
            Command::ChargePump { external_vcc: true } => {
                two(Opcode::SetChargePump, CHARGE_PUMP_EXTERNAL)
            }
            Command::ChargePump { external_vcc: false } => {
                two(Opcode::SetChargePump, CHARGE_PUMP_INTERNAL)
            }
            Command::AddressingMode(mode) => two(Opcode::SetMemAddr, mode),
            Command::PageAddress(page) => one((Opcode::SetPageAddress as u8).wrapping_add(page)),
            Command::ComScanDecrement(true) => one(Opcode::SetComScanDec as u8),
            Command::ComScanDecrement(false) => one(Opcode::SetComScanInc as u8),
            Command::LowColumn => one(Opcode::SetLowColumn as u8),
            Command::HighColumn => one(Opcode::SetHighColumn as u8),
            Command::ComPinConfig(cfg) => two(Opcode::SetComPinCfg, cfg),
            Command::SegmentRemap => one(Opcode::SetSegRemap as u8),
            Command::Precharge(period) => two(Opcode::SetPrecharge, period),
            Command::VcomDeselect(level) => two(Opcode::SetVcomDesel, level),
        }
    }
}

// Capacity is 2, so neither push can fail.
fn one(byte: u8) -> Vec<u8, 2> {
    let mut out = Vec::new();
    let _ = out.push(byte);
    out
}

fn two(op: Opcode, arg: u8) -> Vec<u8, 2> {
    let mut out = one(op as u8);
    let _ = out.push(arg);
    out
}
