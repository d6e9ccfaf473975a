//! Swing detection
//!
//! A small state machine over one acceleration axis. A reading below the
//! fire threshold arms the trigger and fires exactly one stroke; the stroke
//! call blocks, so further crossings during it are never seen. A reading
//! above the reverse threshold is recognised but not bound to anything yet.

use embassy_time::block_for;

use crate::config::MotionConfig;

/// Calibrated 3-axis accelerometer
pub trait Accelerometer {
    /// Acceleration in m/s² as `[x, y, z]`
    fn acceleration(&mut self) -> [f32; 3];
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Axis {
    X,
    #[default]
    Y,
    Z,
}

impl Axis {
    pub const fn pick(self, sample: [f32; 3]) -> f32 {
        match self {
            Self::X => sample[0],
            Self::Y => sample[1],
            Self::Z => sample[2],
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MotionState {
    #[default]
    Idle,
    /// Forward swing detected, stroke pending or running
    Armed,
    /// Reverse swing detected
    Reverse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionAction {
    None,
    Fire,
    Reverse,
}

pub struct MotionTrigger {
    config: MotionConfig,
    state: MotionState,
}

impl MotionTrigger {
    pub const fn new(config: MotionConfig) -> Self {
        Self {
            config,
            state: MotionState::Idle,
        }
    }

    pub const fn state(&self) -> MotionState {
        self.state
    }

    /// Advance the state machine with one reading of the configured axis
    pub fn classify(&mut self, acceleration: f32) -> MotionAction {
        if acceleration < self.config.fire_threshold {
            self.state = MotionState::Armed;
            MotionAction::Fire
        } else if acceleration > self.config.reverse_threshold {
            self.state = MotionState::Reverse;
            MotionAction::Reverse
        } else {
            self.state = MotionState::Idle;
            MotionAction::None
        }
    }

    /// Sample the accelerometer and run `stroke` if a forward swing started
    ///
    /// Returns the stroke's result, or `None` when nothing fired.
    pub fn poll<A: Accelerometer, R>(
        &mut self,
        accelerometer: &mut A,
        stroke: impl FnOnce() -> R,
    ) -> Option<R> {
        let acceleration = self.config.axis.pick(accelerometer.acceleration());
        match self.classify(acceleration) {
            MotionAction::Fire => {
                log::debug!("swing detected at {acceleration} m/s2");
                block_for(self.config.arm_delay);
                let result = stroke();
                block_for(self.config.settle_delay);
                self.state = MotionState::Idle;
                Some(result)
            }
            // TODO: bind the reverse gesture to a backwards stroke
            MotionAction::Reverse | MotionAction::None => None,
        }
    }
}
