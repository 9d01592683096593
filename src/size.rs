//! Panel geometry.
//!
//! The geometry is a type parameter of the driver, so it is fixed for the
//! driver's lifetime and the frame buffer can live inline without an
//! allocator.

/// Pages of display RAM on the controller.
pub const MAX_PAGES: usize = 8;
/// Columns of display RAM on the controller.
pub const MAX_COLUMNS: usize = 132;

/// Whether a `width` x `pages` geometry fits the controller RAM.
pub const fn fits_controller(width: usize, pages: usize) -> bool {
    width <= MAX_COLUMNS && pages <= MAX_PAGES
}

/// A panel geometry and the inline buffer that backs it.
///
/// Implement this for panels not covered by the provided sizes. `Buffer`
/// must be exactly [`PAGES`](Self::PAGES) `* WIDTH` bytes long, and the
/// geometry must fit the controller: at most [`MAX_COLUMNS`] wide and
/// [`MAX_PAGES`] pages (64 rows) tall. A driver or
/// [`PixelBuffer`](crate::PixelBuffer) for a larger geometry fails to
/// compile.
pub trait DisplaySize {
    /// Width in pixels (columns).
    const WIDTH: u8;
    /// Height in pixels (rows).
    const HEIGHT: u8;
    /// Number of 8-row pages, `ceil(HEIGHT / 8)`.
    const PAGES: usize = (Self::HEIGHT as usize + 7) / 8;

    /// Inline storage for one frame.
    type Buffer: AsRef<[u8]> + AsMut<[u8]>;

    /// A zeroed frame.
    fn new_buffer() -> Self::Buffer;
}

/// 128x64 panel, the common 1.3" module.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisplaySize128x64;

impl DisplaySize for DisplaySize128x64 {
    const WIDTH: u8 = 128;
    const HEIGHT: u8 = 64;
    type Buffer = [u8; 128 * 64 / 8];

    fn new_buffer() -> Self::Buffer {
        [0; 128 * 64 / 8]
    }
}

/// 128x32 panel.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisplaySize128x32;

impl DisplaySize for DisplaySize128x32 {
    const WIDTH: u8 = 128;
    const HEIGHT: u8 = 32;
    type Buffer = [u8; 128 * 32 / 8];

    fn new_buffer() -> Self::Buffer {
        [0; 128 * 32 / 8]
    }
}
