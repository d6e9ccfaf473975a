//! Strip wire format
//!
//! One row on the wire is a 4-byte zero start frame, one 4-byte group per
//! pixel (`0xFF` global-brightness marker followed by three color bytes in
//! device order) and `ceil(pixel_count / 16)` trailing `0xFF` bytes that
//! clock the data through to the end of the strip.
//!
//! The row length is constant for a given pixel count. It is the unit of
//! both storage I/O and strip transport, so every row buffer in the crate is
//! a fixed `[u8; MAX_ROW_LEN]` sliced down to [`RowLayout::row_len`].

use core::ops::Range;

use crate::error::CapacityError;

/// Longest strip a row buffer can describe
pub const MAX_PIXELS: usize = 256;

/// Start frame length
pub const HEADER_LEN: usize = 4;

/// Bytes per pixel group
pub const PIXEL_LEN: usize = 4;

/// First byte of every pixel group
pub const PIXEL_MARKER: u8 = 0xFF;

/// Value of every trailer byte
pub const TAIL_BYTE: u8 = 0xFF;

/// Start frame
pub const START_FRAME: [u8; HEADER_LEN] = [0; HEADER_LEN];

/// A single pixel group with all colors off
pub const OFF_PIXEL: [u8; PIXEL_LEN] = [PIXEL_MARKER, 0, 0, 0];

/// Byte count of the trailer for `pixel_count` pixels
pub const fn tail_len(pixel_count: usize) -> usize {
    pixel_count.div_ceil(16)
}

/// Byte count of a full row for `pixel_count` pixels
pub const fn row_len(pixel_count: usize) -> usize {
    HEADER_LEN + PIXEL_LEN * pixel_count + tail_len(pixel_count)
}

/// Size of the largest row any buffer has to hold
pub const MAX_ROW_LEN: usize = row_len(MAX_PIXELS);

/// Row geometry for one strip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowLayout {
    pixel_count: usize,
}

impl RowLayout {
    pub const fn new(pixel_count: usize) -> Result<Self, CapacityError> {
        if pixel_count > MAX_PIXELS {
            return Err(CapacityError::Memory {
                required: row_len(pixel_count),
                available: MAX_ROW_LEN,
            });
        }
        Ok(Self { pixel_count })
    }

    pub const fn pixel_count(self) -> usize {
        self.pixel_count
    }

    pub const fn row_len(self) -> usize {
        row_len(self.pixel_count)
    }

    /// Byte range of the three color bytes of pixel `index`
    pub const fn color_range(self, index: usize) -> Range<usize> {
        let start = HEADER_LEN + index * PIXEL_LEN + 1;
        start..start + 3
    }

    /// Write a complete row into `row`, asking `color` for each pixel's wire bytes
    ///
    /// `row` must be exactly [`RowLayout::row_len`] bytes long.
    pub fn fill(self, row: &mut [u8], mut color: impl FnMut(usize) -> [u8; 3]) {
        debug_assert_eq!(row.len(), self.row_len());
        let (header, rest) = row.split_at_mut(HEADER_LEN);
        let (pixels, tail) = rest.split_at_mut(PIXEL_LEN * self.pixel_count);

        header.fill(0);
        for (index, group) in pixels.chunks_exact_mut(PIXEL_LEN).enumerate() {
            group[0] = PIXEL_MARKER;
            group[1..].copy_from_slice(&color(index));
        }
        tail.fill(TAIL_BYTE);
    }

    /// Write an all-off row into `row`
    pub fn fill_off(self, row: &mut [u8]) {
        self.fill(row, |_| [0; 3]);
    }

    /// Wire bytes of pixel `index` in an encoded row
    pub fn pixel(self, row: &[u8], index: usize) -> [u8; 3] {
        let range = self.color_range(index);
        [row[range.start], row[range.start + 1], row[range.start + 2]]
    }
}
