//! The SH1106 display driver.
//!
//! [`Sh1106`] owns the frame buffer and the controller state, borrows or
//! owns a transport, and exposes the panel operations. Every operation that
//! talks to the panel holds the bus for exactly its own duration.

use core::convert::Infallible;

use embedded_graphics::{pixelcolor::BinaryColor, prelude::*};

use crate::buffer::PixelBuffer;
use crate::config::Sh1106Config;
use crate::controller::{ControllerCore, DeviceState, PowerState};
use crate::error::{InitError, Sh1106Error};
use crate::flush;
use crate::interface::{BusGuard, TransportAdapter};
use crate::reset::{NoReset, ResetLine};
use crate::size::DisplaySize;

/// Blocking driver for an SH1106 panel of geometry `SIZE`.
///
/// # Lifecycle
///
/// 1. [`Sh1106::new()`] / [`Sh1106::with_reset()`]: reset (if wired),
///    send the init sequence, clear the panel. Returns a ready driver or
///    hands the transport back.
/// 2. Draw into the frame buffer through `embedded-graphics` or the pixel
///    helpers. No bus traffic.
/// 3. [`Sh1106::show()`]: transfer the frame buffer to the panel.
///
/// # Example
///
/// ```no_run
/// use embedded_graphics::{pixelcolor::BinaryColor, prelude::*, primitives::*};
/// use sh1106_oled_display_rs::{DisplaySize128x64, I2cInterface, Sh1106, Sh1106Config};
///
/// # fn example(i2c: impl embedded_hal::i2c::I2c) {
/// let iface = I2cInterface::new(i2c, 0x3C);
/// let mut oled: Sh1106<_, DisplaySize128x64> =
///     Sh1106::new(iface, Sh1106Config::default()).map_err(|e| e.error).unwrap();
///
/// Circle::new(Point::new(48, 16), 32)
///     .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
///     .draw(&mut oled)
///     .unwrap();
/// oled.show().unwrap();
/// # }
/// ```
pub struct Sh1106<T, SIZE, R = NoReset>
where
    SIZE: DisplaySize,
{
    transport: T,
    reset: R,
    core: ControllerCore,
    buffer: PixelBuffer<SIZE>,
}

impl<T, SIZE> Sh1106<T, SIZE, NoReset>
where
    T: TransportAdapter,
    SIZE: DisplaySize,
{
    /// Build and initialise a driver without a reset line.
    ///
    /// # Errors
    ///
    /// Any bus failure during initialisation; the transport is returned
    /// inside the [`InitError`].
    pub fn new(transport: T, config: Sh1106Config) -> Result<Self, InitError<T, NoReset>> {
        Self::with_reset(transport, NoReset, config)
    }
}

impl<T, SIZE, R> Sh1106<T, SIZE, R>
where
    T: TransportAdapter,
    SIZE: DisplaySize,
    R: ResetLine,
{
    /// Build and initialise a driver with a hardware reset line.
    ///
    /// Pulses reset, sends the init sequence, zeroes the frame buffer and
    /// shows it, so the panel starts blank.
    ///
    /// # Errors
    ///
    /// Any reset or bus failure; the transport and reset line are returned
    /// inside the [`InitError`].
    pub fn with_reset(transport: T, reset: R, config: Sh1106Config) -> Result<Self, InitError<T, R>> {
        let mut display = Self {
            transport,
            reset,
            core: ControllerCore::new(config.external_vcc),
            buffer: PixelBuffer::new(),
        };

        match display.init() {
            Ok(()) => {
                #[cfg(feature = "defmt")]
                defmt::info!(
                    "SH1106 {=u8}x{=u8} initialised (external VCC: {})",
                    SIZE::WIDTH,
                    SIZE::HEIGHT,
                    config.external_vcc
                );
                Ok(display)
            }
            Err(error) => {
                #[cfg(feature = "defmt")]
                defmt::error!("SH1106 init failed: {}", error);
                let (transport, reset) = display.release();
                Err(InitError {
                    error,
                    transport,
                    reset,
                })
            }
        }
    }

    fn init(&mut self) -> Result<(), Sh1106Error> {
        if self.reset.is_present() {
            self.reset.pulse()?;
        }
        {
            let mut bus = BusGuard::acquire(&mut self.transport)?;
            self.core.initialize(&mut bus, SIZE::WIDTH, SIZE::HEIGHT)?;
        }
        self.buffer.clear();
        self.show()
    }

    // ── Panel operations ─────────────────────────────────────────────────

    /// Transfer the whole frame buffer to the panel.
    pub fn show(&mut self) -> Result<(), Sh1106Error> {
        let mut bus = BusGuard::acquire(&mut self.transport)?;
        flush::flush(
            &mut bus,
            self.buffer.as_bytes(),
            SIZE::WIDTH as usize,
            SIZE::PAGES,
        )
    }

    /// Reset the controller (if a reset line is wired) and turn the display on.
    ///
    /// After a reset pulse the controller runs on its chip defaults and
    /// [`state()`](Self::state) reports them.
    pub fn poweron(&mut self) -> Result<(), Sh1106Error> {
        let mut bus = BusGuard::acquire(&mut self.transport)?;
        self.core.poweron(&mut bus, &mut self.reset)
    }

    /// Turn the display off. The frame buffer and panel RAM are kept.
    pub fn poweroff(&mut self) -> Result<(), Sh1106Error> {
        let mut bus = BusGuard::acquire(&mut self.transport)?;
        self.core.poweroff(&mut bus)
    }

    /// Set the contrast (0-255).
    pub fn contrast(&mut self, value: u8) -> Result<(), Sh1106Error> {
        let mut bus = BusGuard::acquire(&mut self.transport)?;
        self.core.set_contrast(&mut bus, value)
    }

    /// Invert every pixel (`true`) or restore normal display (`false`).
    pub fn invert(&mut self, inverted: bool) -> Result<(), Sh1106Error> {
        let mut bus = BusGuard::acquire(&mut self.transport)?;
        self.core.set_inverted(&mut bus, inverted)
    }

    /// Light every pixel regardless of the frame (`true`), or show the frame.
    pub fn entire_on(&mut self, on: bool) -> Result<(), Sh1106Error> {
        let mut bus = BusGuard::acquire(&mut self.transport)?;
        self.core.set_entire_on(&mut bus, on)
    }

    /// Hardware vertical scroll: the RAM row shown on the top line.
    pub fn set_start_line(&mut self, line: u8) -> Result<(), Sh1106Error> {
        let mut bus = BusGuard::acquire(&mut self.transport)?;
        self.core.set_start_line(&mut bus, line)
    }

    // ── Frame buffer ─────────────────────────────────────────────────────

    /// The frame buffer.
    pub fn buffer(&self) -> &PixelBuffer<SIZE> {
        &self.buffer
    }

    /// The frame buffer, writable. Changes reach the panel on [`show()`](Self::show).
    pub fn buffer_mut(&mut self) -> &mut PixelBuffer<SIZE> {
        &mut self.buffer
    }

    /// Set every pixel on or off.
    pub fn fill(&mut self, on: bool) {
        self.buffer.fill(on);
    }

    /// Turn every pixel off.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// Set one pixel. Off-panel coordinates are ignored.
    pub fn set_pixel(&mut self, x: u32, y: u32, on: bool) {
        self.buffer.set_pixel(x, y, on);
    }

    /// Read one pixel, `None` off-panel.
    pub fn pixel(&self, x: u32, y: u32) -> Option<bool> {
        self.buffer.pixel(x, y)
    }

    // ── State ────────────────────────────────────────────────────────────

    /// Last values written to the controller.
    pub fn state(&self) -> &DeviceState {
        self.core.state()
    }

    /// Current power state.
    pub fn power_state(&self) -> PowerState {
        self.core.power_state()
    }

    /// Panel width and height in pixels.
    pub fn dimensions(&self) -> (u32, u32) {
        (SIZE::WIDTH as u32, SIZE::HEIGHT as u32)
    }

    /// The transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Tear the driver down and hand back the transport and reset line.
    ///
    /// The panel is left as it is.
    pub fn release(self) -> (T, R) {
        (self.transport, self.reset)
    }
}

impl<T, SIZE, R> OriginDimensions for Sh1106<T, SIZE, R>
where
    SIZE: DisplaySize,
{
    fn size(&self) -> Size {
        Size::new(SIZE::WIDTH as u32, SIZE::HEIGHT as u32)
    }
}

/// Drawing only touches the frame buffer; call [`Sh1106::show()`] to
/// update the panel.
impl<T, SIZE, R> DrawTarget for Sh1106<T, SIZE, R>
where
    SIZE: DisplaySize,
{
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        self.buffer.draw_iter(pixels)
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.buffer.fill(color.is_on());
        Ok(())
    }
}
