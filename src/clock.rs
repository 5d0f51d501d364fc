//! Fixed-timestep accumulator
//!
//! Each frame the host hands in a wall-clock timestamp. The elapsed time since
//! the previous frame is clamped to `MAX_FRAME_TIME`, added to the accumulator
//! and drained in whole `SIM_DT` steps. The remainder carries over to the next
//! frame. The clamp keeps a stalled tab from queueing a burst of catch-up steps.

use crate::consts::{MAX_FRAME_TIME, SIM_DT, SIM_RATE};

#[derive(Debug, Clone)]
pub struct FixedStepClock {
    step: f64,
    max_frame: f64,
    accumulator: f64,
    last_time: Option<f64>,
    /// Total fixed steps handed out
    pub step_count: u64,
}

impl Default for FixedStepClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FixedStepClock {
    pub fn new() -> Self {
        Self {
            step: 1.0 / SIM_RATE,
            max_frame: MAX_FRAME_TIME,
            accumulator: 0.0,
            last_time: None,
            step_count: 0,
        }
    }

    /// Fixed step length in seconds
    pub fn step(&self) -> f64 {
        self.step
    }

    /// Step length handed to the simulation
    pub fn dt(&self) -> f32 {
        SIM_DT
    }

    /// Unconsumed real time (always below one step after `advance`)
    pub fn accumulator(&self) -> f64 {
        self.accumulator
    }

    /// Feed a timestamp (seconds) and return how many fixed steps to run.
    ///
    /// The first call only records the timestamp.
    pub fn advance(&mut self, now: f64) -> u32 {
        let elapsed = match self.last_time {
            Some(last) => now - last,
            None => 0.0,
        };
        self.last_time = Some(now);
        self.advance_by(elapsed)
    }

    /// Feed an elapsed duration (seconds) directly
    pub fn advance_by(&mut self, elapsed: f64) -> u32 {
        // Negative deltas (clock went backwards) count as no time
        let elapsed = elapsed.clamp(0.0, self.max_frame);
        self.accumulator += elapsed;

        let mut steps = 0;
        while self.accumulator >= self.step {
            self.accumulator -= self.step;
            steps += 1;
        }
        self.step_count += steps as u64;
        steps
    }

    /// Forget the previous timestamp (e.g. after the host loop was stopped)
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
        self.last_time = None;
    }
}
