use embassy_time::Duration;

/// Empirical share of benchmark speed reached during playback
///
/// Playback runs slightly slower than the benchmarked loop because of the
/// work done around each stroke.
pub const OVERHEAD_FACTOR: f32 = 0.9;

/// Row count for one stroke of a given physical duration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackBudget {
    pub draw_duration: Duration,
    pub rows_per_second: u32,
    pub num_rows: u32,
}

impl PlaybackBudget {
    /// `num_rows = round(draw_duration * rows_per_second * 0.9)`
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn new(draw_duration: Duration, rows_per_second: u32) -> Self {
        let seconds = draw_duration.as_micros() as f32 / 1_000_000.0;
        let rows = libm::roundf(seconds * rows_per_second as f32 * OVERHEAD_FACTOR);
        Self {
            draw_duration,
            rows_per_second,
            num_rows: rows.max(0.0) as u32,
        }
    }
}
