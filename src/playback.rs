//! Playback engine
//!
//! Streams a persisted row stream to the strip. The engine owns its single
//! row buffer for its whole lifetime; the stroke loop only seeks, reads into
//! that buffer and writes it out, so nothing is allocated while painting.

use crate::StripTransport;
use crate::error::Error;
use crate::storage::{Storage, StorageError, StorageFile, log_failure};
use crate::wire::{MAX_ROW_LEN, RowLayout};

pub struct PlaybackEngine {
    buffer: [u8; MAX_ROW_LEN],
    exclusive: bool,
}

impl PlaybackEngine {
    /// Create an engine
    ///
    /// With `exclusive` set every stroke runs inside a critical section, so
    /// no interrupt-driven work can stretch the timing of a stroke.
    pub const fn new(exclusive: bool) -> Self {
        Self {
            buffer: [0; MAX_ROW_LEN],
            exclusive,
        }
    }

    /// Paint `num_rows` rows of `stream_path`, then turn the strip off
    ///
    /// A stream shorter than `num_rows` rows fails with a storage error
    /// rather than painting short. The strip is cleared either way.
    pub fn play<S: Storage, T: StripTransport>(
        &mut self,
        storage: &mut S,
        strip: &mut T,
        stream_path: &str,
        layout: RowLayout,
        num_rows: u32,
    ) -> Result<(), Error> {
        let mut file = storage.open(stream_path).inspect_err(|error| {
            log_failure("opening stream", stream_path, error);
        })?;
        let row = &mut self.buffer[..layout.row_len()];

        let result = if self.exclusive {
            critical_section::with(|_| stroke(&mut file, strip, row, num_rows))
        } else {
            stroke(&mut file, strip, row, num_rows)
        };

        layout.fill_off(row);
        strip.write(row);

        result.map_err(|error| {
            log_failure("reading stream", stream_path, &error);
            Error::Storage(error)
        })
    }
}

fn stroke<F: StorageFile, T: StripTransport>(
    file: &mut F,
    strip: &mut T,
    row: &mut [u8],
    num_rows: u32,
) -> Result<(), StorageError> {
    let row_size = row.len() as u64;
    for index in 0..u64::from(num_rows) {
        file.seek(index * row_size)?;
        file.read_exact(row)?;
        strip.write(row);
    }
    Ok(())
}
