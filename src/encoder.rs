//! Frame encoder
//!
//! Turns decoded pixel rows into strip rows. Brightness and gamma are baked
//! into a [`GammaTable`] once per image load by [`FrameEncoder::set_brightness`];
//! encoding a row is then table lookups plus the channel reorder.
//! Output is fully deterministic for a given configuration.

use crate::color::{ChannelOrder, GammaTable, Rgb};
use crate::wire::RowLayout;

#[derive(Debug, Clone)]
pub struct FrameEncoder {
    layout: RowLayout,
    order: ChannelOrder,
    gamma: f32,
    brightness: f32,
    table: GammaTable,
}

impl FrameEncoder {
    /// Create an encoder at full brightness
    pub fn new(layout: RowLayout, order: ChannelOrder, gamma: f32) -> Self {
        Self {
            layout,
            order,
            gamma,
            brightness: 1.0,
            table: GammaTable::new(1.0, gamma),
        }
    }

    pub const fn layout(&self) -> RowLayout {
        self.layout
    }

    pub const fn brightness(&self) -> f32 {
        self.brightness
    }

    /// Set the output brightness (`0.0..=1.0`), already remapped into the
    /// configured brightness range
    #[allow(clippy::float_cmp)]
    pub fn set_brightness(&mut self, brightness: f32) {
        let brightness = brightness.clamp(0.0, 1.0);
        if brightness == self.brightness {
            return;
        }
        self.brightness = brightness;
        self.table = GammaTable::new(brightness, self.gamma);
    }

    /// Correct one pixel and arrange it in wire order
    #[inline]
    pub fn encode_pixel(&self, color: Rgb) -> [u8; 3] {
        self.order.arrange(Rgb {
            r: self.table.apply(color.r),
            g: self.table.apply(color.g),
            b: self.table.apply(color.b),
        })
    }

    /// Encode one pixel row into `out`
    ///
    /// `out` must be exactly one row long. Pixels past the end of the strip
    /// are cropped; strip pixels past the end of `pixels` are left off.
    pub fn encode(&self, pixels: &[Rgb], out: &mut [u8]) {
        self.layout.fill(out, |index| match pixels.get(index) {
            Some(&color) => self.encode_pixel(color),
            None => [0; 3],
        });
    }
}
