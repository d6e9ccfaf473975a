//! 24-bit uncompressed BMP decoder
//!
//! Only the variant the painter can play is accepted: `BM` signature, one
//! plane, 24 bits per pixel, no compression. The 54-byte header and the
//! file length are validated before the first pixel is touched, so a
//! decoder that opened successfully can read every row it reports.
//!
//! Rows are exposed in logical top-to-bottom order regardless of how the
//! file stores them. Pixel rows on disk are padded to 4-byte boundaries.

use crate::color::Rgb;
use crate::error::{Error, FormatError};
use crate::storage::{StorageErrorKind, StorageFile};

/// `BITMAPFILEHEADER`
pub const FILE_HEADER_LEN: usize = 14;

/// `BITMAPINFOHEADER`
pub const INFO_HEADER_LEN: usize = 40;

pub const HEADER_LEN: usize = FILE_HEADER_LEN + INFO_HEADER_LEN;

const SIGNATURE: [u8; 2] = *b"BM";
const BYTES_PER_PIXEL: usize = 3;
const BYTES_PER_PIXEL_U64: u64 = BYTES_PER_PIXEL as u64;

/// Pixels converted per storage read
const CHUNK_PIXELS: usize = 32;

fn read_u16(bytes: &[u8; HEADER_LEN], offset: usize) -> u16 {
    u16::from_le_bytes([bytes[offset], bytes[offset + 1]])
}

fn read_u32(bytes: &[u8; HEADER_LEN], offset: usize) -> u32 {
    u32::from_le_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}

fn read_i32(bytes: &[u8; HEADER_LEN], offset: usize) -> i32 {
    i32::from_le_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}

/// Validated bitmap header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitmapHeader {
    pub file_size: u32,
    pub pixel_offset: u32,
    pub header_size: u32,
    pub width: u32,
    pub height: u32,
    pub planes: u16,
    pub bit_depth: u16,
    pub compression: u32,
    /// Rows stored top-to-bottom (negative height on disk)
    pub top_down: bool,
}

impl BitmapHeader {
    /// Parse and validate the raw header bytes
    pub fn parse(bytes: &[u8; HEADER_LEN]) -> Result<Self, FormatError> {
        if bytes[..2] != SIGNATURE {
            return Err(FormatError::Signature);
        }
        // 6..10 holds creator bytes, ignored
        let file_size = read_u32(bytes, 2);
        let pixel_offset = read_u32(bytes, 10);
        let header_size = read_u32(bytes, 14);
        let raw_width = read_i32(bytes, 18);
        let raw_height = read_i32(bytes, 22);
        let planes = read_u16(bytes, 26);
        let bit_depth = read_u16(bytes, 28);
        let compression = read_u32(bytes, 30);

        if planes != 1 {
            return Err(FormatError::Planes(planes));
        }
        if bit_depth != 24 {
            return Err(FormatError::BitDepth(bit_depth));
        }
        if compression != 0 {
            return Err(FormatError::Compression(compression));
        }
        if raw_width <= 0 || raw_height == 0 || raw_height == i32::MIN {
            return Err(FormatError::Dimensions {
                width: raw_width,
                height: raw_height,
            });
        }

        Ok(Self {
            file_size,
            pixel_offset,
            header_size,
            width: raw_width.unsigned_abs(),
            height: raw_height.unsigned_abs(),
            planes,
            bit_depth,
            compression,
            top_down: raw_height < 0,
        })
    }

    /// Bytes per stored row, padded to a 32-bit boundary
    pub const fn row_stride(&self) -> u64 {
        (self.width as u64 * BYTES_PER_PIXEL_U64 + 3) & !3
    }

    /// File offset one past the last pixel row, `None` if it does not fit `u64`
    pub fn pixel_data_end(&self) -> Option<u64> {
        self.row_stride()
            .checked_mul(u64::from(self.height))?
            .checked_add(u64::from(self.pixel_offset))
    }

    /// File offset of logical row `row` (0 is the top of the image)
    pub fn row_offset(&self, row: u32) -> u64 {
        let stored = if self.top_down {
            row
        } else {
            self.height - 1 - row
        };
        u64::from(self.pixel_offset) + u64::from(stored) * self.row_stride()
    }
}

/// Streaming decoder over an open bitmap file
pub struct BmpDecoder<F: StorageFile> {
    file: F,
    header: BitmapHeader,
}

impl<F: StorageFile> BmpDecoder<F> {
    /// Read and validate the header, and check the file holds every row
    pub fn new(mut file: F) -> Result<Self, Error> {
        let mut raw = [0; HEADER_LEN];
        file.seek(0)?;
        match file.read_exact(&mut raw) {
            Ok(()) => {}
            Err(error) if error.kind == StorageErrorKind::UnexpectedEof => {
                return Err(FormatError::TruncatedHeader.into());
            }
            Err(error) => return Err(error.into()),
        }
        let header = BitmapHeader::parse(&raw)?;

        let actual = file.size()?;
        let required = header.pixel_data_end().unwrap_or(u64::MAX);
        if required > actual {
            return Err(FormatError::TruncatedPixels { required, actual }.into());
        }

        log::debug!(
            "bitmap {}x{}, offset {}, header size {}",
            header.width,
            header.height,
            header.pixel_offset,
            header.header_size
        );
        Ok(Self { file, header })
    }

    pub const fn header(&self) -> &BitmapHeader {
        &self.header
    }

    /// Read pixels of logical row `row`, starting at `first_column`
    ///
    /// Fills at most `out.len()` pixels and returns how many were read; the
    /// count is smaller when the row ends first.
    pub fn read_pixels(
        &mut self,
        row: u32,
        first_column: usize,
        out: &mut [Rgb],
    ) -> Result<usize, Error> {
        let width = self.header.width as usize;
        if row >= self.header.height || first_column >= width {
            return Ok(0);
        }
        let count = out.len().min(width - first_column);
        let offset = self.header.row_offset(row) + first_column as u64 * BYTES_PER_PIXEL_U64;
        self.file.seek(offset)?;

        let mut chunk = [0; CHUNK_PIXELS * BYTES_PER_PIXEL];
        for block in out[..count].chunks_mut(CHUNK_PIXELS) {
            let bytes = &mut chunk[..block.len() * BYTES_PER_PIXEL];
            self.file.read_exact(bytes)?;
            for (pixel, bgr) in block.iter_mut().zip(bytes.chunks_exact(BYTES_PER_PIXEL)) {
                *pixel = Rgb {
                    r: bgr[2],
                    g: bgr[1],
                    b: bgr[0],
                };
            }
        }
        Ok(count)
    }
}
