//! Paged frame buffer flush.
//!
//! The SH1106 auto-increments its column pointer only within the currently
//! addressed page, so a full frame is written page by page: address the
//! page and the start column, then stream exactly one page of bytes.
//!
//! ```text
//! page 0: B0 02 00 [width bytes of page 0]
//! page 1: B1 02 00 [width bytes of page 1]
//! ...
//! ```
//!
//! The three addressing commands of a page always directly precede that
//! page's data.

use core::ops::Range;

use crate::command::Command;
use crate::error::Sh1106Error;
use crate::interface::{BusGuard, TransportAdapter};
use crate::size::fits_controller;

/// Start column written before every page.
///
/// Panels are 128 columns wide inside 132 columns of RAM, centred at 2.
pub const COLUMN_OFFSET: u8 = 0x02;

/// Where one page lives in the frame buffer and on the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PageDescriptor {
    /// Page index, `0..pages`.
    pub page: u8,
    /// Start column on the controller.
    pub column_offset: u8,
    /// Bytes of the page in the frame buffer.
    pub byte_range: Range<usize>,
}

/// Page descriptors in ascending page order.
pub fn pages(width: usize, page_count: usize) -> impl Iterator<Item = PageDescriptor> {
    (0..page_count).map(move |page| PageDescriptor {
        page: page as u8,
        column_offset: COLUMN_OFFSET,
        byte_range: page * width..page * width + width,
    })
}

/// Write `buffer` to the controller, page by page.
///
/// `buffer` must hold at least `page_count * width` bytes, and the geometry
/// must fit the controller RAM; otherwise nothing is sent. The buffer is
/// only read.
pub fn flush<T>(
    bus: &mut BusGuard<'_, T>,
    buffer: &[u8],
    width: usize,
    page_count: usize,
) -> Result<(), Sh1106Error>
where
    T: TransportAdapter + ?Sized,
{
    if !fits_controller(width, page_count) {
        return Err(Sh1106Error::InvalidGeometry);
    }
    if buffer.len() < width * page_count {
        return Err(Sh1106Error::BufferSize);
    }

    for desc in pages(width, page_count) {
        bus.send(Command::PageAddress(desc.page))?;
        bus.send(Command::LowColumn)?;
        bus.send(Command::HighColumn)?;
        bus.data(&buffer[desc.byte_range])?;
    }

    #[cfg(feature = "defmt")]
    defmt::trace!("SH1106 flushed {=usize} pages", page_count);
    Ok(())
}
