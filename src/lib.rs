//! Ring Bloom - colored balls multiply inside a rotating ring
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, ring collisions, round/match state)
//! - `clock`: Fixed-timestep accumulator
//! - `simulation`: Facade the host drives once per frame
//! - `platform`: Renderer/sound/clock collaborator traits
//! - `settings`: Audio preferences

pub mod clock;
pub mod platform;
pub mod settings;
pub mod sim;
pub mod simulation;

#[cfg(target_arch = "wasm32")]
pub mod audio;
#[cfg(target_arch = "wasm32")]
pub mod renderer;

pub use clock::FixedStepClock;
pub use settings::Settings;
pub use simulation::{Simulation, Snapshot};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation rate (Hz)
    pub const SIM_RATE: f64 = 60.0;
    /// Fixed simulation timestep
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Longest stretch of real time a single frame may feed the accumulator
    pub const MAX_FRAME_TIME: f64 = 0.1;

    /// Ring geometry (centered on the origin)
    pub const RING_RADIUS: f32 = 200.0;
    pub const SEGMENT_COUNT: usize = 12;
    /// Segments `0..COLORED_SEGMENTS` alternate red/blue, the rest are neutral
    pub const COLORED_SEGMENTS: usize = 6;
    pub const SEGMENT_ANGLE: f32 = std::f32::consts::TAU / SEGMENT_COUNT as f32;
    /// Ring angular velocity (radians/sec)
    pub const ROTATION_SPEED: f32 = 0.6;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 6.0;
    /// Downward acceleration (+y is down, pixels/s²)
    pub const GRAVITY: f32 = 1200.0;

    /// Spawn launch cone: straight up ± 90°
    pub const SPAWN_ANGLE_MIN: f32 = -std::f32::consts::PI;
    pub const SPAWN_ANGLE_MAX: f32 = 0.0;
    pub const SPAWN_SPEED_MIN: f32 = 180.0;
    pub const SPAWN_SPEED_MAX: f32 = 300.0;

    /// Balls one team needs to win a round
    pub const ROUND_BALL_LIMIT: usize = 1000;
    /// Rounds one team needs to win the match
    pub const MATCH_WIN_ROUNDS: u32 = 5;
    /// Pause between rounds (seconds)
    pub const ROUND_RESTART_DELAY: f32 = 1.5;
}

/// Wrap an angle into [0, 2π)
#[inline]
pub fn wrap_angle(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(std::f32::consts::TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= std::f32::consts::TAU {
        0.0
    } else {
        wrapped
    }
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Convert cartesian (x, y) to polar (r, theta)
#[inline]
pub fn cartesian_to_polar(pos: Vec2) -> (f32, f32) {
    (pos.length(), pos.y.atan2(pos.x))
}
