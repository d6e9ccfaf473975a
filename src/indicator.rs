//! Status display on the strip itself
//!
//! The wand has no screen, so loading progress and failures are shown with
//! the first few LEDs.

use embassy_time::{Duration, block_for};

use crate::StripTransport;
use crate::color::{ChannelOrder, Rgb};
use crate::wire::{MAX_ROW_LEN, RowLayout};

/// Loading progress bar
pub const PROGRESS_COLOR: Rgb = Rgb { r: 0, g: 1, b: 0 };

/// Image did not fit storage or memory
pub const CAPACITY_BLINK_COLOR: Rgb = Rgb { r: 1, g: 0, b: 0 };

/// Storage is read-only, only the persisted stream can play
pub const READ_ONLY_BLINK_COLOR: Rgb = Rgb { r: 1, g: 0, b: 1 };

/// Number of LEDs lit by [`Indicator::blink`]
const BLINK_PIXELS: usize = 2;

pub struct Indicator {
    layout: RowLayout,
    order: ChannelOrder,
    row: [u8; MAX_ROW_LEN],
}

impl Indicator {
    pub const fn new(layout: RowLayout, order: ChannelOrder) -> Self {
        Self {
            layout,
            order,
            row: [0; MAX_ROW_LEN],
        }
    }

    /// Turn every LED off
    pub fn clear<T: StripTransport>(&mut self, strip: &mut T) {
        let row = &mut self.row[..self.layout.row_len()];
        self.layout.fill_off(row);
        strip.write(row);
    }

    /// Light pixels `begin..end` in `color`, everything else off
    pub fn fill_range<T: StripTransport>(
        &mut self,
        strip: &mut T,
        begin: usize,
        end: usize,
        color: Rgb,
    ) {
        let count = self.layout.pixel_count();
        let begin = begin.min(count);
        let end = end.clamp(begin, count);
        let lit = self.order.arrange(color);
        let row = &mut self.row[..self.layout.row_len()];
        self.layout.fill(row, |index| {
            if (begin..end).contains(&index) {
                lit
            } else {
                [0; 3]
            }
        });
        strip.write(row);
    }

    /// Show a progress bar for `fraction` in `0.0..=1.0`
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn progress<T: StripTransport>(&mut self, strip: &mut T, fraction: f32) {
        let lit = libm::roundf(fraction.clamp(0.0, 1.0) * self.layout.pixel_count() as f32);
        self.fill_range(strip, 0, lit as usize, PROGRESS_COLOR);
    }

    /// Blink the first LEDs `count` times over `duration`
    pub fn blink<T: StripTransport>(
        &mut self,
        strip: &mut T,
        count: u32,
        duration: Duration,
        color: Rgb,
    ) {
        if count == 0 {
            return;
        }
        let half_period = duration / (count * 2);
        for _ in 0..count {
            self.fill_range(strip, 0, BLINK_PIXELS, color);
            block_for(half_period);
            self.clear(strip);
            block_for(half_period);
        }
    }
}
