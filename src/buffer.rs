//! Packed 1-bit-per-pixel frame buffer.
//!
//! Layout matches the controller RAM: `PAGES` rows of `WIDTH` bytes, each
//! byte holding 8 vertically stacked pixels of one column with the least
//! significant bit on top. Pixel `(x, y)` lives at byte
//! `(y / 8) * WIDTH + x`, bit `y % 8`.
//!
//! [`PixelBuffer`] implements the `embedded-graphics` [`DrawTarget`], which
//! supplies lines, shapes, text and image blits.

use core::convert::Infallible;
use core::marker::PhantomData;

use embedded_graphics::{pixelcolor::BinaryColor, prelude::*};

use crate::size::{fits_controller, DisplaySize};

/// Frame buffer for a panel of geometry `SIZE`.
pub struct PixelBuffer<SIZE: DisplaySize> {
    bytes: SIZE::Buffer,
    _size: PhantomData<SIZE>,
}

impl<SIZE: DisplaySize> PixelBuffer<SIZE> {
    const FITS_CONTROLLER: () = assert!(
        fits_controller(SIZE::WIDTH as usize, SIZE::PAGES),
        "display geometry exceeds SH1106 RAM (132 columns, 8 pages)"
    );

    /// A blank (all pixels off) buffer.
    pub fn new() -> Self {
        let () = Self::FITS_CONTROLLER;
        Self {
            bytes: SIZE::new_buffer(),
            _size: PhantomData,
        }
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        SIZE::WIDTH as u32
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        SIZE::HEIGHT as u32
    }

    /// Number of 8-row pages.
    pub fn pages(&self) -> usize {
        SIZE::PAGES
    }

    /// Length in bytes, always `pages * width`.
    pub fn len(&self) -> usize {
        self.bytes.as_ref().len()
    }

    /// Always `false` for a real geometry.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Raw packed bytes.
    pub fn as_bytes(&self) -> &[u8] {
        self.bytes.as_ref()
    }

    /// Raw packed bytes, writable.
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        self.bytes.as_mut()
    }

    /// Set every pixel on or off.
    pub fn fill(&mut self, on: bool) {
        let value = if on { 0xFF } else { 0x00 };
        self.bytes.as_mut().fill(value);
    }

    /// Turn every pixel off.
    pub fn clear(&mut self) {
        self.fill(false);
    }

    /// Set one pixel. Coordinates outside the panel are ignored.
    pub fn set_pixel(&mut self, x: u32, y: u32, on: bool) {
        if let Some((index, mask)) = self.locate(x, y) {
            let byte = &mut self.bytes.as_mut()[index];
            if on {
                *byte |= mask;
            } else {
                *byte &= !mask;
            }
        }
    }

    /// Read one pixel, `None` outside the panel.
    pub fn pixel(&self, x: u32, y: u32) -> Option<bool> {
        self.locate(x, y)
            .map(|(index, mask)| self.bytes.as_ref()[index] & mask != 0)
    }

    fn locate(&self, x: u32, y: u32) -> Option<(usize, u8)> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        let index = (y as usize / 8) * SIZE::WIDTH as usize + x as usize;
        Some((index, 1 << (y % 8)))
    }
}

impl<SIZE: DisplaySize> Default for PixelBuffer<SIZE> {
    fn default() -> Self {
        Self::new()
    }
}

impl<SIZE: DisplaySize> OriginDimensions for PixelBuffer<SIZE> {
    fn size(&self) -> Size {
        Size::new(self.width(), self.height())
    }
}

impl<SIZE: DisplaySize> DrawTarget for PixelBuffer<SIZE> {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            // Negative coordinates are off-panel.
            if let (Ok(x), Ok(y)) = (u32::try_from(point.x), u32::try_from(point.y)) {
                self.set_pixel(x, y, color.is_on());
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.fill(color.is_on());
        Ok(())
    }
}
