//! User input
//!
//! Capacitive touch pads and a single push button, each debounced. Every
//! update produces a short list of [`InputEvent`]s; the controller matches
//! on those instead of registering callbacks.
//!
//! Touch thresholds are calibrated once at startup from the idle reading of
//! each pad, so nothing may touch the pads while the painter boots.

mod debounce;

pub use debounce::Debouncer;
use embassy_time::Instant;
use heapless::Vec;

use crate::config::TouchConfig;

/// Touch pads handled by one subsystem
pub const MAX_TOUCH_CHANNELS: usize = 4;

/// Events a single update can produce
pub const MAX_EVENTS: usize = MAX_TOUCH_CHANNELS + 1;

/// Threshold of a pad that can never trigger
pub const DISABLED_THRESHOLD: u16 = u16::MAX;

/// Raw capacitive sensor
pub trait TouchSensor {
    /// Current 16-bit reading; larger means more capacitance
    fn raw_value(&mut self) -> u16;
}

/// Raw push button level
pub trait ButtonInput {
    fn is_pressed(&mut self) -> bool;
}

/// Threshold for a pad reading `raw_at_idle` when untouched
///
/// Falls back to [`DISABLED_THRESHOLD`] when the sum does not fit the
/// hardware range.
pub const fn calibrate_threshold(raw_at_idle: u16, margin: u16) -> u16 {
    match raw_at_idle.checked_add(margin) {
        Some(threshold) => threshold,
        None => DISABLED_THRESHOLD,
    }
}

/// What happened to a touch channel during an update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Rising,
    Falling,
    /// Still active, no change
    Held,
}

/// Read-only snapshot of one touch channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelState {
    pub raw: u16,
    pub threshold: u16,
    pub value: bool,
    pub rose: bool,
    pub fell: bool,
    pub last_change: Instant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// Button 0 was pressed
    ButtonPressed,
    /// A touch channel changed state or is held
    TouchEdge {
        channel: u8,
        edge: Edge,
        state: ChannelState,
    },
}

pub type InputEvents = Vec<InputEvent, MAX_EVENTS>;

struct TouchChannel<P> {
    sensor: P,
    raw: u16,
    threshold: u16,
    debouncer: Debouncer,
}

impl<P: TouchSensor> TouchChannel<P> {
    fn snapshot(&self) -> ChannelState {
        ChannelState {
            raw: self.raw,
            threshold: self.threshold,
            value: self.debouncer.value(),
            rose: self.debouncer.rose(),
            fell: self.debouncer.fell(),
            last_change: self.debouncer.last_change(),
        }
    }
}

pub struct InputSubsystem<P, B> {
    touch: Vec<TouchChannel<P>, MAX_TOUCH_CHANNELS>,
    button: B,
    button_debouncer: Debouncer,
    margin: u16,
    hysteresis: u16,
}

impl<P: TouchSensor, B: ButtonInput> InputSubsystem<P, B> {
    /// Create the subsystem; pads start disabled until [`Self::calibrate`]
    pub fn new(sensors: impl IntoIterator<Item = P>, button: B, config: &TouchConfig) -> Self {
        let mut touch = Vec::new();
        for sensor in sensors {
            let channel = TouchChannel {
                sensor,
                raw: 0,
                threshold: DISABLED_THRESHOLD,
                debouncer: Debouncer::new(config.debounce_interval),
            };
            if touch.push(channel).is_err() {
                log::warn!("more than {MAX_TOUCH_CHANNELS} touch pads, ignoring the rest");
                break;
            }
        }
        Self {
            touch,
            button,
            button_debouncer: Debouncer::new(config.debounce_interval),
            margin: config.margin,
            hysteresis: config.hysteresis,
        }
    }

    /// Set every pad's threshold from its current (idle) reading
    pub fn calibrate(&mut self) {
        for (index, channel) in self.touch.iter_mut().enumerate() {
            channel.raw = channel.sensor.raw_value();
            channel.threshold = calibrate_threshold(channel.raw, self.margin);
            if channel.threshold == DISABLED_THRESHOLD {
                log::warn!(
                    "touch {index}: idle reading {} + margin {} overflows, pad disabled",
                    channel.raw,
                    self.margin
                );
            } else {
                log::info!(
                    "touch {index}: idle reading {} + margin {} = threshold {}",
                    channel.raw,
                    self.margin,
                    channel.threshold
                );
            }
        }
    }

    pub fn channel_count(&self) -> usize {
        self.touch.len()
    }

    pub fn channel(&self, index: usize) -> Option<ChannelState> {
        self.touch.get(index).map(TouchChannel::snapshot)
    }

    /// Sample every input once
    ///
    /// Emits [`InputEvent::ButtonPressed`] on a button press and a
    /// [`InputEvent::TouchEdge`] for every pad that rose, fell or is held.
    pub fn update(&mut self, now: Instant) -> InputEvents {
        let mut events = InputEvents::new();

        self.button_debouncer.update(self.button.is_pressed(), now);
        if self.button_debouncer.rose() {
            let _ = events.push(InputEvent::ButtonPressed);
        }

        for (index, channel) in self.touch.iter_mut().enumerate() {
            channel.raw = channel.sensor.raw_value();
            let release_at = if channel.debouncer.value() {
                channel.threshold.saturating_sub(self.hysteresis)
            } else {
                channel.threshold
            };
            channel.debouncer.update(channel.raw > release_at, now);

            let edge = if channel.debouncer.rose() {
                Edge::Rising
            } else if channel.debouncer.fell() {
                Edge::Falling
            } else if channel.debouncer.value() {
                Edge::Held
            } else {
                continue;
            };
            log::trace!("touch {index}: {edge:?} raw {}", channel.raw);
            #[allow(clippy::cast_possible_truncation)]
            let event = InputEvent::TouchEdge {
                channel: index as u8,
                edge,
                state: channel.snapshot(),
            };
            // capacity covers one event per pad plus the button
            let _ = events.push(event);
        }

        events
    }
}
