//! Platform abstraction layer
//!
//! The simulation core talks to the outside world through three seams:
//! - `Renderer`: draws one snapshot per frame
//! - `SoundSink`: plays a cue for each game event
//! - `Clock`: monotonic wall-clock timestamps for the accumulator

use crate::sim::GameEvent;
use crate::simulation::Snapshot;

/// Draws the simulation state. Called once per frame after that frame's ticks.
pub trait Renderer {
    fn draw(&mut self, snapshot: &Snapshot<'_>);
}

/// Fire-and-forget sound cues. Implementations must never fail loudly.
pub trait SoundSink {
    fn on_event(&mut self, event: GameEvent);
}

/// Monotonic time source, in seconds
pub trait Clock {
    fn now(&self) -> f64;
}

/// Sound sink used when audio is unavailable or not yet unlocked
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSound;

impl SoundSink for NullSound {
    fn on_event(&mut self, _event: GameEvent) {}
}

/// Sound sink that only logs (headless runs)
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSound;

impl SoundSink for LogSound {
    fn on_event(&mut self, event: GameEvent) {
        match event {
            // Pops fire hundreds of times per second late in a round
            GameEvent::Pop => log::trace!("sound: {}", event.tag()),
            _ => log::info!("sound: {}", event.tag()),
        }
    }
}

/// Wall clock backed by `std::time::Instant`
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: std::time::Instant,
}

#[cfg(not(target_arch = "wasm32"))]
impl Default for SystemClock {
    fn default() -> Self {
        Self {
            origin: std::time::Instant::now(),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl Clock for SystemClock {
    fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}

/// `performance.now()` clock for the browser
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default, Clone, Copy)]
pub struct PerformanceClock;

#[cfg(target_arch = "wasm32")]
impl Clock for PerformanceClock {
    fn now(&self) -> f64 {
        web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| p.now() / 1000.0)
            .unwrap_or(0.0)
    }
}

/// Records every call, for tests and headless inspection
#[derive(Debug, Default, Clone)]
pub struct RecordingSound {
    pub events: Vec<GameEvent>,
}

impl SoundSink for RecordingSound {
    fn on_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }
}
