//! Gamma and brightness correction
//!
//! Image brightness and the perceptual gamma curve are folded into a single
//! 256-entry lookup table. The table is built once per image load, so the
//! per-pixel work while encoding is one indexed read per channel.

use libm::{powf, roundf};

/// Correct a single channel value
///
/// `round((value * brightness / 255) ^ gamma * 255)`, clamped to `0..=255`.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_lossless
)]
pub fn gamma_correct(value: u8, brightness: f32, gamma: f32) -> u8 {
    let linear = value as f32 * brightness.clamp(0.0, 1.0) / 255.0;
    let corrected = roundf(powf(linear, gamma) * 255.0);
    corrected.clamp(0.0, 255.0) as u8
}

/// Precomputed [`gamma_correct`] for every input value
#[derive(Debug, Clone)]
pub struct GammaTable {
    lut: [u8; 256],
}

impl GammaTable {
    /// Build the table for one brightness/gamma pair
    #[allow(clippy::cast_possible_truncation)]
    pub fn new(brightness: f32, gamma: f32) -> Self {
        let mut lut = [0; 256];
        for (value, entry) in lut.iter_mut().enumerate() {
            *entry = gamma_correct(value as u8, brightness, gamma);
        }
        Self { lut }
    }

    #[inline]
    pub const fn apply(&self, value: u8) -> u8 {
        self.lut[value as usize]
    }
}
