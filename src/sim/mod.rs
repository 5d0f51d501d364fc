//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (pool order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod ring;
pub mod state;
pub mod tick;

pub use collision::{CollisionResult, ball_ring_collision, reflect_velocity};
pub use ring::{Ring, SegmentColor, segment_color_at};
pub use state::{Ball, GameEvent, GameState, MatchPhase, TeamColor};
pub use tick::tick;
