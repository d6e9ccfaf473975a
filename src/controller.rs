//! Mode controller
//!
//! Owns every component and runs the control loop: sample input between
//! strokes, react to events (next image, brightness), watch for a swing and
//! paint. All mutable painter state lives here and is handed to the
//! components by reference.

use embassy_time::{Duration, Instant};

use crate::StripTransport;
use crate::benchmark::{Benchmark, Throughput};
use crate::budget::PlaybackBudget;
use crate::catalog::ImageCatalog;
use crate::classic::ClassicImage;
use crate::color::Rgb;
use crate::config::PainterConfig;
use crate::encoder::FrameEncoder;
use crate::error::Error;
use crate::indicator::{CAPACITY_BLINK_COLOR, Indicator, READ_ONLY_BLINK_COLOR};
use crate::input::{ButtonInput, Edge, InputEvent, InputSubsystem, TouchSensor};
use crate::motion::{Accelerometer, MotionTrigger};
use crate::pipeline::{ImagePipeline, LoadRequest};
use crate::playback::PlaybackEngine;
use crate::storage::{PathBuf, Storage, StorageFile, join_path, log_failure};
use crate::wire::RowLayout;

/// UI brightness levels the button steps through
pub const BRIGHTNESS_LADDER: [f32; 5] = [0.2, 0.4, 0.6, 0.8, 1.0];

const BLINK_COUNT: u32 = 5;
const BLINK_DURATION: Duration = Duration::from_secs(1);

/// Everything a stroke touches
struct Canvas<'a, S, T> {
    storage: S,
    strip: T,
    layout: RowLayout,
    indicator: Indicator,
    engine: PlaybackEngine,
    classic: ClassicImage<'a>,
    classic_mode: bool,
    column_delay: Duration,
    stream_path: PathBuf,
    num_rows: u32,
}

impl<S: Storage, T: StripTransport> Canvas<'_, S, T> {
    /// Paint one stroke, `false` when there is nothing loaded to paint
    fn paint(&mut self) -> Result<bool, Error> {
        if self.classic_mode {
            if self.classic.is_empty() {
                return Ok(false);
            }
            self.classic.draw(&mut self.strip, self.column_delay);
            return Ok(true);
        }
        if self.num_rows == 0 {
            return Ok(false);
        }
        self.engine.play(
            &mut self.storage,
            &mut self.strip,
            &self.stream_path,
            self.layout,
            self.num_rows,
        )?;
        Ok(true)
    }

    /// Whole rows actually present in the persisted stream, at most `limit`
    fn persisted_rows(&mut self, limit: u32) -> u32 {
        let row_len = self.layout.row_len() as u64;
        match self
            .storage
            .open(&self.stream_path)
            .and_then(|mut file| file.size())
        {
            Ok(size) => u32::try_from(size / row_len)
                .unwrap_or(u32::MAX)
                .min(limit),
            Err(error) => {
                log_failure("opening persisted stream", &self.stream_path, &error);
                0
            }
        }
    }

    fn signal_failure(&mut self, color: Rgb) {
        self.indicator
            .blink(&mut self.strip, BLINK_COUNT, BLINK_DURATION, color);
    }
}

pub struct Painter<'a, S, T, A, P, B> {
    config: PainterConfig,
    input: InputSubsystem<P, B>,
    accelerometer: A,
    motion: MotionTrigger,
    catalog: ImageCatalog,
    pipeline: ImagePipeline,
    canvas: Canvas<'a, S, T>,
    writable: bool,
    throughput: Throughput,
    brightness: f32,
}

impl<'a, S, T, A, P, B> Painter<'a, S, T, A, P, B>
where
    S: Storage,
    T: StripTransport,
    A: Accelerometer,
    P: TouchSensor,
    B: ButtonInput,
{
    /// Bring the painter up
    ///
    /// Calibrates the touch pads, probes storage, scans the image folder,
    /// benchmarks throughput (clearing the strip) and loads the first image.
    /// `classic_buffer` holds the image in classic paint mode.
    pub fn new(
        config: PainterConfig,
        mut storage: S,
        mut strip: T,
        accelerometer: A,
        mut input: InputSubsystem<P, B>,
        classic_buffer: &'a mut [u8],
    ) -> Result<Self, Error> {
        log::info!("pov painter starting");
        let layout = RowLayout::new(config.hardware.pixel_count)?;
        let order = config.hardware.channel_order;

        input.calibrate();

        let writable = storage.probe_writable()?;
        log::info!("storage writable: {writable}");

        let catalog = ImageCatalog::scan(&mut storage, &config.data.image_folder)?;
        if catalog.is_empty() {
            log::warn!("no images found in {}", config.data.image_folder);
        }

        let mut indicator = Indicator::new(layout, order);
        let throughput = Benchmark::new(config.playback.benchmark_window).measure(
            &mut storage,
            &mut strip,
            &config.data.benchmark_path,
            layout,
        )?;
        indicator.clear(&mut strip);

        let canvas = Canvas {
            storage,
            strip,
            layout,
            indicator,
            engine: PlaybackEngine::new(config.playback.exclusive_stroke),
            classic: ClassicImage::new(classic_buffer),
            classic_mode: config.data.paint_mode_classic,
            column_delay: config.playback.column_delay,
            stream_path: config.data.stream_path.clone(),
            num_rows: 0,
        };
        let mut painter = Self {
            pipeline: ImagePipeline::new(FrameEncoder::new(layout, order, config.data.gamma)),
            motion: MotionTrigger::new(config.motion),
            brightness: config.playback.initial_brightness,
            input,
            accelerometer,
            catalog,
            canvas,
            writable,
            throughput,
            config,
        };
        painter.load_current()?;
        Ok(painter)
    }

    pub const fn catalog(&self) -> &ImageCatalog {
        &self.catalog
    }

    /// Rows painted per stroke from the persisted stream
    pub const fn num_rows(&self) -> u32 {
        self.canvas.num_rows
    }

    /// UI brightness level, `0.0..=1.0`
    pub const fn brightness(&self) -> f32 {
        self.brightness
    }

    pub const fn throughput(&self) -> Throughput {
        self.throughput
    }

    pub const fn is_writable(&self) -> bool {
        self.writable
    }

    pub fn budget(&self) -> PlaybackBudget {
        PlaybackBudget::new(
            self.config.data.draw_duration,
            self.throughput.rows_per_second,
        )
    }

    /// One pass of the control loop
    ///
    /// Returns whether a stroke was painted. A swing with no image loaded
    /// paints nothing and reports `false`.
    pub fn update(&mut self, now: Instant) -> Result<bool, Error> {
        for event in self.input.update(now) {
            self.handle_event(event)?;
        }

        let canvas = &mut self.canvas;
        self.motion
            .poll(&mut self.accelerometer, || canvas.paint())
            .unwrap_or(Ok(false))
    }

    /// Run the control loop forever
    pub fn run(&mut self) -> ! {
        log::info!("running");
        loop {
            if let Err(error) = self.update(Instant::now()) {
                log::error!("{error}");
            }
        }
    }

    pub fn handle_event(&mut self, event: InputEvent) -> Result<(), Error> {
        match event {
            InputEvent::ButtonPressed => self.cycle_brightness(),
            InputEvent::TouchEdge {
                channel: 0,
                edge: Edge::Falling,
                ..
            } => self.switch_image(),
            InputEvent::TouchEdge { .. } => Ok(()),
        }
    }

    /// Select the next image and load it
    pub fn switch_image(&mut self) -> Result<(), Error> {
        let Some(name) = self.catalog.advance() else {
            return Ok(());
        };
        log::info!("switching to {name}");
        self.load_current()
    }

    /// Step to the next brightness level and reload the image with it
    pub fn cycle_brightness(&mut self) -> Result<(), Error> {
        self.brightness = BRIGHTNESS_LADDER
            .iter()
            .copied()
            .find(|&level| level > self.brightness)
            .unwrap_or(BRIGHTNESS_LADDER[0]);
        log::info!("brightness {}", self.brightness);
        self.load_current()
    }

    /// Load the selected image, skipping images that are not valid bitmaps
    pub fn load_current(&mut self) -> Result<(), Error> {
        for _ in 0..self.catalog.len() {
            let Some(name) = self.catalog.current() else {
                break;
            };
            let path = join_path(&self.config.data.image_folder, name)?;
            match self.load_image(&path) {
                Err(Error::Format(error)) => {
                    log::warn!("skipping {path}: {error}");
                    self.catalog.advance();
                }
                result => return result,
            }
        }
        log::warn!("no loadable image in {}", self.config.data.image_folder);
        Ok(())
    }

    fn load_image(&mut self, path: &str) -> Result<(), Error> {
        log::info!("loading {path}");
        let brightness = self.config.data.brightness_range.remap(self.brightness);
        self.pipeline.encoder_mut().set_brightness(brightness);

        let result = if self.config.data.paint_mode_classic {
            self.load_classic(path)
        } else {
            self.load_stream(path, brightness)
        };
        self.canvas.indicator.clear(&mut self.canvas.strip);

        match result {
            Ok(()) => Ok(()),
            Err(Error::Capacity(error)) => {
                log::warn!("{path} is too big: {error}");
                self.canvas.signal_failure(CAPACITY_BLINK_COLOR);
                self.revalidate_stream();
                Ok(())
            }
            Err(Error::ReadOnlyStorage) => {
                self.writable = false;
                self.canvas.signal_failure(READ_ONLY_BLINK_COLOR);
                self.revalidate_stream();
                Ok(())
            }
            Err(error) => {
                self.revalidate_stream();
                Err(error)
            }
        }
    }

    fn load_stream(&mut self, path: &str, brightness: f32) -> Result<(), Error> {
        if !self.writable {
            log::warn!(
                "storage is read-only, replaying {}",
                self.config.data.stream_path
            );
            return Err(Error::ReadOnlyStorage);
        }

        let request = LoadRequest {
            image_path: path,
            target_path: &self.config.data.stream_path,
            budget: self.budget(),
            brightness,
            looping: self.config.playback.looping,
        };
        let Canvas {
            storage,
            strip,
            indicator,
            ..
        } = &mut self.canvas;
        let num_rows = self.pipeline.load(storage, &request, &mut |fraction| {
            indicator.progress(strip, fraction);
        })?;
        self.canvas.num_rows = num_rows;
        Ok(())
    }

    fn load_classic(&mut self, path: &str) -> Result<(), Error> {
        let Canvas {
            storage,
            strip,
            indicator,
            classic,
            ..
        } = &mut self.canvas;
        classic.load(storage, path, self.pipeline.encoder(), &mut |fraction| {
            indicator.progress(strip, fraction);
        })
    }

    /// Fall back to whatever stream is persisted, within the budget
    fn revalidate_stream(&mut self) {
        if !self.config.data.paint_mode_classic {
            let limit = self.budget().num_rows;
            self.canvas.num_rows = self.canvas.persisted_rows(limit);
            log::info!("playing {} persisted rows", self.canvas.num_rows);
        }
    }
}
