//! Classic paint mode
//!
//! The whole image is held in memory as ready-to-send strip frames, one
//! frame per image column. Strip pixel 0 shows the bottom of the image.
//! Used when persisted-stream playback is disabled.

use embassy_time::{Duration, block_for};

use crate::StripTransport;
use crate::bmp::BmpDecoder;
use crate::color::Rgb;
use crate::encoder::FrameEncoder;
use crate::error::{CapacityError, Error};
use crate::storage::{Storage, log_failure};
use crate::wire::{OFF_PIXEL, PIXEL_LEN, PIXEL_MARKER, START_FRAME};

/// Off pixels sent after a stroke, per image row
const CLEAR_PIXELS_PER_ROW: usize = 5;

/// Final write that shifts the last bytes out of the strip
const FLUSH: [u8; 4] = [0xFF; 4];

/// Pixels decoded per read while loading
const LOAD_CHUNK: usize = 32;

/// Column-major image frames in a caller-provided buffer
pub struct ClassicImage<'a> {
    buffer: &'a mut [u8],
    width: usize,
    height: usize,
}

impl<'a> ClassicImage<'a> {
    pub const fn new(buffer: &'a mut [u8]) -> Self {
        Self {
            buffer,
            width: 0,
            height: 0,
        }
    }

    pub const fn width(&self) -> usize {
        self.width
    }

    pub const fn height(&self) -> usize {
        self.height
    }

    pub const fn is_empty(&self) -> bool {
        self.width == 0
    }

    /// Frame sent for image column `column`, `None` past the last column
    pub fn column(&self, column: usize) -> Option<&[u8]> {
        if column >= self.width {
            return None;
        }
        let frame_len = self.height * PIXEL_LEN;
        self.buffer.get(column * frame_len..(column + 1) * frame_len)
    }

    /// Decode `path` into the buffer
    ///
    /// Header and size are checked first; a rejected image keeps the old
    /// contents. A failure while reading pixels leaves the image empty.
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    pub fn load<S: Storage>(
        &mut self,
        storage: &mut S,
        path: &str,
        encoder: &FrameEncoder,
        on_progress: &mut dyn FnMut(f32),
    ) -> Result<(), Error> {
        let file = storage.open(path).inspect_err(|error| {
            log_failure("opening image", path, error);
        })?;
        let mut decoder = BmpDecoder::new(file).inspect_err(|error| {
            log::warn!("rejecting {path}: {error}");
        })?;
        let width = decoder.header().width as usize;
        let height = decoder.header().height as usize;

        let required = width
            .checked_mul(height)
            .and_then(|pixels| pixels.checked_mul(PIXEL_LEN))
            .unwrap_or(usize::MAX);
        if required > self.buffer.len() {
            log::warn!("{path} needs {required} bytes, buffer holds {}", self.buffer.len());
            return Err(CapacityError::Memory {
                required,
                available: self.buffer.len(),
            }
            .into());
        }

        self.width = 0;
        self.height = 0;
        let mut pixels = [Rgb::default(); LOAD_CHUNK];
        for row in 0..height {
            let mut column = 0;
            while column < width {
                let count = decoder.read_pixels(row as u32, column, &mut pixels)?;
                for (offset, &color) in pixels[..count].iter().enumerate() {
                    let index = ((column + offset) * height + (height - 1 - row)) * PIXEL_LEN;
                    self.buffer[index] = PIXEL_MARKER;
                    self.buffer[index + 1..index + PIXEL_LEN]
                        .copy_from_slice(&encoder.encode_pixel(color));
                }
                column += count;
            }
            on_progress((row + 1) as f32 / height as f32);
        }
        self.width = width;
        self.height = height;
        log::info!("loaded {path} into memory, {width}x{height}");
        Ok(())
    }

    /// Send every column with `column_delay` between them, then clear the strip
    pub fn draw<T: StripTransport>(&self, strip: &mut T, column_delay: Duration) {
        for frame in (0..self.width).filter_map(|column| self.column(column)) {
            strip.write(&START_FRAME);
            strip.write(frame);
            strip.write(&START_FRAME);
            block_for(column_delay);
        }

        strip.write(&START_FRAME);
        for _ in 0..self.height * CLEAR_PIXELS_PER_ROW {
            strip.write(&OFF_PIXEL);
        }
        strip.write(&FLUSH);
    }
}
