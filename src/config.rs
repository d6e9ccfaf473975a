//! Painter configuration
//!
//! Built-in defaults live in the `Default` impls. Loading a configuration
//! file and merging it over these defaults is left to the firmware.

use embassy_time::Duration;

use crate::color::ChannelOrder;
use crate::motion::Axis;
use crate::storage::PathBuf;

const DEFAULT_PIXEL_COUNT: usize = 36;
const DEFAULT_IMAGE_FOLDER: &str = "/images";
const DEFAULT_STREAM_PATH: &str = "/led.dat";
const DEFAULT_BENCHMARK_PATH: &str = "/led_benchmark.dat";
const DEFAULT_GAMMA: f32 = 2.4;
const DEFAULT_DRAW_DURATION: Duration = Duration::from_millis(700);
const DEFAULT_TOUCH_MARGIN: u16 = 4000;

/// Output brightness window that the UI brightness level is mapped into
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrightnessRange {
    min: f32,
    max: f32,
}

impl BrightnessRange {
    /// Create a range; bounds are clamped to `0.0..=1.0` and sorted
    pub fn new(min: f32, max: f32) -> Self {
        let min = min.clamp(0.0, 1.0);
        let max = max.clamp(0.0, 1.0);
        Self {
            min: min.min(max),
            max: max.max(min),
        }
    }

    pub const fn min(self) -> f32 {
        self.min
    }

    pub const fn max(self) -> f32 {
        self.max
    }

    /// Map a UI level in `0.0..=1.0` linearly into the range
    pub fn remap(self, level: f32) -> f32 {
        self.min + level.clamp(0.0, 1.0) * (self.max - self.min)
    }
}

impl Default for BrightnessRange {
    fn default() -> Self {
        Self::new(0.15, 0.75)
    }
}

/// Board pin names, consumed by bus bring-up
#[derive(Debug, Clone)]
pub struct PinConfig {
    pub pixel_clock: &'static str,
    pub pixel_data: &'static str,
    pub accel_clock: &'static str,
    pub accel_data: &'static str,
    pub touch: [&'static str; 3],
}

impl Default for PinConfig {
    fn default() -> Self {
        Self {
            pixel_clock: "SCK",
            pixel_data: "MOSI",
            accel_clock: "SCL1",
            accel_data: "SDA1",
            touch: ["D5", "D6", "D7"],
        }
    }
}

#[derive(Debug, Clone)]
pub struct HardwareConfig {
    pub pixel_count: usize,
    pub channel_order: ChannelOrder,
    pub pins: PinConfig,
}

impl Default for HardwareConfig {
    fn default() -> Self {
        Self {
            pixel_count: DEFAULT_PIXEL_COUNT,
            channel_order: ChannelOrder::Bgr,
            pins: PinConfig::default(),
        }
    }
}

/// Image data and encoding settings
#[derive(Debug, Clone)]
pub struct DataConfig {
    /// Play from an in-memory column buffer instead of the persisted stream
    pub paint_mode_classic: bool,
    pub image_folder: PathBuf,
    /// Persisted, pre-encoded row stream
    pub stream_path: PathBuf,
    /// Scratch file used by the throughput benchmark
    pub benchmark_path: PathBuf,
    /// Exponent for perceptually linear brightness
    pub gamma: f32,
    pub brightness_range: BrightnessRange,
    /// Physical duration of one stroke
    pub draw_duration: Duration,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            paint_mode_classic: false,
            image_folder: PathBuf::try_from(DEFAULT_IMAGE_FOLDER).unwrap_or_default(),
            stream_path: PathBuf::try_from(DEFAULT_STREAM_PATH).unwrap_or_default(),
            benchmark_path: PathBuf::try_from(DEFAULT_BENCHMARK_PATH).unwrap_or_default(),
            gamma: DEFAULT_GAMMA,
            brightness_range: BrightnessRange::default(),
            draw_duration: DEFAULT_DRAW_DURATION,
        }
    }
}

/// Capacitive touch settings
#[derive(Debug, Clone, Copy)]
pub struct TouchConfig {
    /// Added to the idle reading to get each channel's threshold
    pub margin: u16,
    /// How long a reading must hold before the debounced value follows
    pub debounce_interval: Duration,
    /// Release point below the threshold for an active channel
    pub hysteresis: u16,
}

impl Default for TouchConfig {
    fn default() -> Self {
        Self {
            margin: DEFAULT_TOUCH_MARGIN,
            debounce_interval: Duration::from_millis(10),
            hysteresis: 0,
        }
    }
}

/// Swing detection settings, in m/s²
#[derive(Debug, Clone, Copy)]
pub struct MotionConfig {
    pub axis: Axis,
    /// A reading below this fires a stroke
    pub fire_threshold: f32,
    /// A reading above this is the reserved reverse gesture
    pub reverse_threshold: f32,
    /// Wait between detecting the swing and starting the stroke
    pub arm_delay: Duration,
    /// Wait after a stroke before sampling again
    pub settle_delay: Duration,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            axis: Axis::Y,
            fire_threshold: -20.0,
            reverse_threshold: 10.0,
            arm_delay: Duration::from_millis(90),
            settle_delay: Duration::from_millis(50),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PlaybackConfig {
    /// Run each stroke inside a critical section
    pub exclusive_stroke: bool,
    /// Delay between columns in classic mode
    pub column_delay: Duration,
    /// Measurement window of the startup benchmark
    pub benchmark_window: Duration,
    /// UI brightness level at boot, `0.0..=1.0`
    pub initial_brightness: f32,
    /// Wrap short images to fill the whole stroke
    pub looping: bool,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            exclusive_stroke: true,
            column_delay: Duration::from_millis(3),
            benchmark_window: Duration::from_secs(1),
            initial_brightness: 0.2,
            looping: false,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PainterConfig {
    pub hardware: HardwareConfig,
    pub data: DataConfig,
    pub touch: TouchConfig,
    pub motion: MotionConfig,
    pub playback: PlaybackConfig,
}
