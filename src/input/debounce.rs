//! Time-based debouncing
//!
//! A raw sample has to hold its new level for the whole debounce interval
//! before the debounced value follows. Rising and falling edges are
//! reported for exactly the one update in which the value changed.

use embassy_time::{Duration, Instant};

#[derive(Debug, Clone, Copy)]
pub struct Debouncer {
    interval: Duration,
    value: bool,
    unstable: bool,
    changed: bool,
    last_bounce: Instant,
    last_change: Instant,
}

impl Debouncer {
    pub const fn new(interval: Duration) -> Self {
        Self {
            interval,
            value: false,
            unstable: false,
            changed: false,
            last_bounce: Instant::from_ticks(0),
            last_change: Instant::from_ticks(0),
        }
    }

    /// Feed one raw sample taken at `now`
    pub fn update(&mut self, sample: bool, now: Instant) {
        self.changed = false;
        if sample != self.unstable {
            self.unstable = sample;
            self.last_bounce = now;
        }
        let held = now
            .checked_duration_since(self.last_bounce)
            .unwrap_or(Duration::from_ticks(0));
        if self.unstable != self.value && held >= self.interval {
            self.value = self.unstable;
            self.changed = true;
            self.last_change = now;
        }
    }

    /// Debounced level
    pub const fn value(&self) -> bool {
        self.value
    }

    /// Went from released to active in the last update
    pub const fn rose(&self) -> bool {
        self.changed && self.value
    }

    /// Went from active to released in the last update
    pub const fn fell(&self) -> bool {
        self.changed && !self.value
    }

    /// When the debounced value last changed
    pub const fn last_change(&self) -> Instant {
        self.last_change
    }
}
