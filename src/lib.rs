//! Blocking OLED display driver for the SH1106 (128×64 and 128×32).
//!
//! This crate provides [`Sh1106`], a driver that keeps a 1-bit frame buffer
//! in RAM, exposes it as an `embedded-graphics` [`DrawTarget`], and writes
//! it to the panel page by page on [`Sh1106::show()`]. The panel can be
//! attached over I2C ([`I2cInterface`]), 4-wire SPI ([`SpiInterface`]) or
//! any `display-interface` implementation ([`DisplayInterfaceAdapter`]).
//!
//! # Quick Start
//!
//! ```ignore
//! use sh1106_oled_display_rs::{DisplaySize128x64, I2cInterface, Sh1106, Sh1106Config, DEFAULT_ADDRESS};
//!
//! let iface = I2cInterface::new(i2c, DEFAULT_ADDRESS);
//! let mut oled: Sh1106<_, DisplaySize128x64> =
//!     Sh1106::new(iface, Sh1106Config::default()).map_err(|e| e.error)?;
//!
//! Text::new("Hello", Point::new(0, 10), style).draw(&mut oled)?;
//! oled.show()?;
//! ```
//!
//! With a reset line:
//!
//! ```ignore
//! let reset = ResetPin::new(rst_pin, delay);
//! let oled: Sh1106<_, DisplaySize128x64, _> =
//!     Sh1106::with_reset(iface, reset, Sh1106Config::default()).map_err(|e| e.error)?;
//! ```
//!
//! # Crate Features
//!
//! - **`defmt`**: structured logging via [`defmt`](https://docs.rs/defmt).
//!
//! [`DrawTarget`]: embedded_graphics::draw_target::DrawTarget

#![no_std]

pub mod buffer;
pub mod command;
pub mod config;
pub mod controller;
pub mod driver;
pub mod error;
pub mod flush;
pub mod interface;
pub mod reset;
pub mod size;

#[cfg(test)]
mod testing;

// ── Re-exports for convenience ───────────────────────────────────────────

pub use buffer::PixelBuffer;
pub use config::{Sh1106Config, SpiConfig};
pub use controller::{DeviceState, PowerState};
pub use driver::Sh1106;
pub use error::{InitError, Sh1106Error, TransportFault};
pub use interface::{
    BusGuard, DisplayInterfaceAdapter, I2cInterface, SpiInterface, TransportAdapter,
    DEFAULT_ADDRESS,
};
pub use reset::{NoReset, ResetLine, ResetPin};
pub use size::{DisplaySize, DisplaySize128x32, DisplaySize128x64};
