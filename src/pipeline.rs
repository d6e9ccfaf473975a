//! Image pipeline
//!
//! Decodes a bitmap row by row, encodes each row for the strip and persists
//! the result as a flat stream of fixed-size rows. This runs once per image
//! switch, never during a stroke.
//!
//! Everything that can reject the image (header validation, capacity) is
//! checked before the target file is created, so a rejected image leaves the
//! previously persisted stream untouched.

use crate::bmp::BmpDecoder;
use crate::budget::PlaybackBudget;
use crate::color::Rgb;
use crate::encoder::FrameEncoder;
use crate::error::{CapacityError, Error};
use crate::storage::{Storage, StorageFile, log_failure};
use crate::wire::{MAX_PIXELS, MAX_ROW_LEN};

/// Parameters for one image load
#[derive(Debug, Clone, Copy)]
pub struct LoadRequest<'a> {
    pub image_path: &'a str,
    pub target_path: &'a str,
    pub budget: PlaybackBudget,
    /// Output brightness, already remapped into the configured range
    pub brightness: f32,
    /// Wrap back to the first image row when the budget is longer than the image
    pub looping: bool,
}

pub struct ImagePipeline {
    encoder: FrameEncoder,
}

impl ImagePipeline {
    pub const fn new(encoder: FrameEncoder) -> Self {
        Self { encoder }
    }

    pub const fn encoder(&self) -> &FrameEncoder {
        &self.encoder
    }

    pub fn encoder_mut(&mut self) -> &mut FrameEncoder {
        &mut self.encoder
    }

    /// Encode `request.image_path` into `request.target_path`
    ///
    /// Returns the number of rows persisted. `on_progress` is called after
    /// every row with the completed fraction.
    #[allow(clippy::cast_precision_loss)]
    pub fn load<S: Storage>(
        &mut self,
        storage: &mut S,
        request: &LoadRequest<'_>,
        on_progress: &mut dyn FnMut(f32),
    ) -> Result<u32, Error> {
        let image = storage.open(request.image_path).inspect_err(|error| {
            log_failure("opening image", request.image_path, error);
        })?;
        let mut decoder = BmpDecoder::new(image).inspect_err(|error| {
            log::warn!("rejecting {}: {error}", request.image_path);
        })?;
        let image_rows = decoder.header().height;

        let num_rows = if request.looping {
            request.budget.num_rows
        } else {
            request.budget.num_rows.min(image_rows)
        };
        let layout = self.encoder.layout();
        let row_len = layout.row_len();

        let required = u64::from(num_rows) * row_len as u64;
        let available = Self::available_space(storage, request.target_path)?;
        if required > available {
            log::warn!(
                "{} needs {required} bytes, only {available} available",
                request.image_path
            );
            return Err(CapacityError::Storage {
                required,
                available,
            }
            .into());
        }

        self.encoder.set_brightness(request.brightness);
        let mut target = storage.create(request.target_path).inspect_err(|error| {
            log_failure("creating stream", request.target_path, error);
        })?;

        let mut pixels = [Rgb::default(); MAX_PIXELS];
        let pixels = &mut pixels[..layout.pixel_count()];
        let mut buffer = [0; MAX_ROW_LEN];
        let row = &mut buffer[..row_len];

        for index in 0..num_rows {
            let source_row = index % image_rows;
            let count = decoder.read_pixels(source_row, 0, pixels)?;
            self.encoder.encode(&pixels[..count], row);
            target.write_all(row).inspect_err(|error| {
                log_failure("writing stream", request.target_path, error);
            })?;
            on_progress((index + 1) as f32 / num_rows as f32);
        }

        log::info!(
            "encoded {} into {num_rows} rows of {row_len} bytes",
            request.image_path
        );
        Ok(num_rows)
    }

    /// Free space plus whatever the old stream at `target_path` occupies
    fn available_space<S: Storage>(storage: &mut S, target_path: &str) -> Result<u64, Error> {
        let free = storage.free_space().inspect_err(|error| {
            log_failure("querying free space for", target_path, error);
        })?;
        let reclaimable = storage
            .open(target_path)
            .and_then(|mut file| file.size())
            .unwrap_or(0);
        Ok(free.saturating_add(reclaimable))
    }
}
