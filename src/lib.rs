#![no_std]

pub mod benchmark;
pub mod bmp;
pub mod budget;
pub mod catalog;
pub mod classic;
pub mod color;
pub mod config;
pub mod controller;
pub mod encoder;
pub mod error;
pub mod indicator;
pub mod input;
#[cfg(feature = "esp32-log")]
pub mod logging;
pub mod motion;
pub mod pipeline;
pub mod playback;
pub mod storage;
pub mod wire;

pub use benchmark::{Benchmark, Throughput};
pub use bmp::{BitmapHeader, BmpDecoder};
pub use budget::PlaybackBudget;
pub use catalog::ImageCatalog;
pub use classic::ClassicImage;
pub use config::{
    BrightnessRange, DataConfig, HardwareConfig, MotionConfig, PainterConfig, PinConfig,
    PlaybackConfig, TouchConfig,
};
pub use controller::Painter;
pub use encoder::FrameEncoder;
pub use error::{CapacityError, Error, FormatError};
pub use indicator::Indicator;
pub use input::{ButtonInput, ChannelState, Edge, InputEvent, InputSubsystem, TouchSensor};
pub use motion::{Accelerometer, Axis, MotionAction, MotionState, MotionTrigger};
pub use pipeline::{ImagePipeline, LoadRequest};
pub use playback::PlaybackEngine;
pub use storage::{Storage, StorageError, StorageErrorKind, StorageFile};
pub use wire::RowLayout;

pub use color::{ChannelOrder, Rgb};
pub use embassy_time::{Duration, Instant};

/// Abstract LED strip bus
///
/// Implement this trait on top of the board's SPI peripheral. Writes are
/// blocking and unacknowledged; the bus is assumed synchronous.
pub trait StripTransport {
    /// Clock `bytes` out to the strip
    fn write(&mut self, bytes: &[u8]);
}
