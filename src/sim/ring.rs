//! Rotating segmented ring
//!
//! The ring is a circle of radius `RING_RADIUS` split into `SEGMENT_COUNT`
//! equal arcs. In ring-local angles (before rotation), segments
//! `0..COLORED_SEGMENTS` alternate red/blue and the rest are neutral. The whole
//! ring spins at `ROTATION_SPEED`; only the colors move, the wall itself is a
//! perfect circle.

use serde::{Deserialize, Serialize};

use super::state::TeamColor;
use crate::consts::*;
use crate::wrap_angle;

/// Color of the ring under a given world angle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SegmentColor {
    Team(TeamColor),
    Neutral,
}

/// Color of a segment by its ring-local index
pub fn segment_color(index: usize) -> SegmentColor {
    if index >= COLORED_SEGMENTS {
        SegmentColor::Neutral
    } else if index % 2 == 0 {
        SegmentColor::Team(TeamColor::Red)
    } else {
        SegmentColor::Team(TeamColor::Blue)
    }
}

/// Classify a world angle against the ring at `rotation`
pub fn segment_color_at(world_angle: f32, rotation: f32) -> SegmentColor {
    segment_color(segment_index_at(world_angle, rotation))
}

/// Ring-local segment index under a world angle
pub fn segment_index_at(world_angle: f32, rotation: f32) -> usize {
    let local = wrap_angle(world_angle - rotation);
    // local < TAU, but float division can still land on SEGMENT_COUNT
    ((local / SEGMENT_ANGLE) as usize).min(SEGMENT_COUNT - 1)
}

/// The ring boundary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ring {
    pub radius: f32,
    /// Accumulated rotation (radians, never wrapped)
    pub rotation: f32,
}

impl Default for Ring {
    fn default() -> Self {
        Self {
            radius: RING_RADIUS,
            rotation: 0.0,
        }
    }
}

impl Ring {
    /// Spin the ring forward by one step
    pub fn advance(&mut self, dt: f32) {
        self.rotation += ROTATION_SPEED * dt;
    }

    /// Color under a world angle at the current rotation
    pub fn color_at(&self, world_angle: f32) -> SegmentColor {
        segment_color_at(world_angle, self.rotation)
    }

    /// Radius a ball center is clamped to on contact
    #[inline]
    pub fn contact_radius(&self, ball_radius: f32) -> f32 {
        self.radius - ball_radius
    }

    /// World-space angular extent (start, end) of a segment, for drawing
    pub fn segment_span(&self, index: usize) -> (f32, f32) {
        let start = self.rotation + index as f32 * SEGMENT_ANGLE;
        (start, start + SEGMENT_ANGLE)
    }
}
