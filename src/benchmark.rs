//! Storage-to-strip throughput benchmark
//!
//! Writes one all-off row to a scratch file, then for a fixed window keeps
//! reading that row back and sending it to the strip, the same seek/read/write
//! cycle a stroke performs. The row count gives the achievable rows per
//! second, and the strip ends up cleared as a side effect.

use embassy_time::{Duration, Instant};

use crate::StripTransport;
use crate::error::Error;
use crate::storage::{Storage, StorageError, StorageErrorKind, StorageFile, log_failure};
use crate::wire::{MAX_ROW_LEN, RowLayout};

/// Default measurement window
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(1);

/// Measured storage-to-strip speed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Throughput {
    pub rows_per_second: u32,
    /// Bytes per row, including start frame and trailer
    pub row_size: usize,
}

#[derive(Debug, Clone, Copy)]
pub struct Benchmark {
    window: Duration,
}

impl Default for Benchmark {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW)
    }
}

impl Benchmark {
    pub const fn new(window: Duration) -> Self {
        Self { window }
    }

    /// Run the benchmark
    ///
    /// A read-only medium is tolerated: the scratch write is skipped, and if
    /// no scratch file is left from an earlier boot the row is streamed from
    /// memory instead. Any other storage failure is returned.
    pub fn measure<S: Storage, T: StripTransport>(
        &self,
        storage: &mut S,
        strip: &mut T,
        scratch_path: &str,
        layout: RowLayout,
    ) -> Result<Throughput, Error> {
        let mut buffer = [0; MAX_ROW_LEN];
        let row = &mut buffer[..layout.row_len()];
        layout.fill_off(row);

        let written = match storage.create(scratch_path).and_then(|mut file| file.write_all(row)) {
            Ok(()) => true,
            Err(error) if error.is_read_only() => {
                log_failure("skipping benchmark scratch write to", scratch_path, &error);
                false
            }
            Err(error) => {
                log_failure("writing benchmark scratch", scratch_path, &error);
                return Err(error.into());
            }
        };

        let rows = match storage.open(scratch_path) {
            Ok(mut file) => self.stream_from_file(&mut file, strip, row).inspect_err(|error| {
                log_failure("reading benchmark scratch", scratch_path, error);
            })?,
            Err(error) if !written && error.kind == StorageErrorKind::NotFound => {
                log::warn!("no benchmark scratch at {scratch_path}, measuring strip only");
                self.stream_from_memory(strip, row)
            }
            Err(error) => {
                log_failure("opening benchmark scratch", scratch_path, &error);
                return Err(error.into());
            }
        };

        let window_us = self.window.as_micros().max(1);
        let rows_per_second = u32::try_from(rows * 1_000_000 / window_us).unwrap_or(u32::MAX);
        log::info!(
            "benchmark: {rows} rows in {window_us} us, {rows_per_second} rows/s, row size {}",
            row.len()
        );
        Ok(Throughput {
            rows_per_second,
            row_size: row.len(),
        })
    }

    fn stream_from_file<F: StorageFile, T: StripTransport>(
        &self,
        file: &mut F,
        strip: &mut T,
        row: &mut [u8],
    ) -> Result<u64, StorageError> {
        let mut rows = 0;
        let start = Instant::now();
        while start.elapsed() < self.window {
            file.seek(0)?;
            file.read_exact(row)?;
            strip.write(row);
            rows += 1;
        }
        Ok(rows)
    }

    fn stream_from_memory<T: StripTransport>(&self, strip: &mut T, row: &[u8]) -> u64 {
        let mut rows = 0;
        let start = Instant::now();
        while start.elapsed() < self.window {
            strip.write(row);
            rows += 1;
        }
        rows
    }
}
