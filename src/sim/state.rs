//! Game state and core simulation types
//!
//! One owned aggregate holds the ball pool, the ring, the round timer and the
//! match score. The host keeps it inside a `Simulation` and nothing else
//! aliases it.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::ring::Ring;
use crate::consts::*;
use crate::polar_to_cartesian;

/// The two competing ball colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TeamColor {
    Red,
    Blue,
}

impl TeamColor {
    pub const ALL: [TeamColor; 2] = [TeamColor::Red, TeamColor::Blue];

    pub fn as_str(&self) -> &'static str {
        match self {
            TeamColor::Red => "RED",
            TeamColor::Blue => "BLUE",
        }
    }
}

/// Current phase of the match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchPhase {
    /// Balls are moving
    Playing,
    /// A team hit the ball limit; frozen until the restart timer runs out
    RoundOver,
    /// A team won the match. Terminal.
    MatchOver,
}

/// Discrete things that happened during a tick (consumed by the sound sink)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A ball was cloned
    Pop,
    /// At least one team hit the round ball limit this tick
    RoundWin,
    /// A team reached the match win threshold
    MatchWin,
}

impl GameEvent {
    pub fn tag(&self) -> &'static str {
        match self {
            GameEvent::Pop => "POP",
            GameEvent::RoundWin => "ROUND_WIN",
            GameEvent::MatchWin => "MATCH_WIN",
        }
    }
}

/// A ball entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub color: TeamColor,
}

impl Ball {
    pub fn new(color: TeamColor, pos: Vec2, vel: Vec2) -> Self {
        Self {
            pos,
            vel,
            radius: BALL_RADIUS,
            color,
        }
    }
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed the RNG was created from
    pub seed: u64,
    rng: Pcg32,
    /// Ring boundary and its rotation
    pub ring: Ring,
    /// Ball pool, in spawn order
    pub balls: Vec<Ball>,
    pub phase: MatchPhase,
    /// Seconds left before the next round starts (only meaningful in `RoundOver`)
    pub restart_timer: f32,
    pub red_score: u32,
    pub blue_score: u32,
    pub final_winner: Option<TeamColor>,
    /// Rounds started so far (1-based once the first round begins)
    pub round: u32,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Events recorded since the last drain
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new match with the given seed and start round one
    pub fn new(seed: u64) -> Self {
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            ring: Ring::default(),
            balls: Vec::new(),
            phase: MatchPhase::Playing,
            restart_timer: 0.0,
            red_score: 0,
            blue_score: 0,
            final_winner: None,
            round: 0,
            time_ticks: 0,
            events: Vec::new(),
        };
        state.reset_round();
        state
    }

    /// Start a fresh round: rotation 0, exactly one ball per team at the center
    pub fn reset_round(&mut self) {
        self.ring.rotation = 0.0;
        self.balls.clear();
        self.restart_timer = 0.0;
        self.phase = MatchPhase::Playing;
        self.round += 1;
        for color in TeamColor::ALL {
            self.spawn(color);
        }
        log::info!(
            "Round {} started (score {}-{})",
            self.round,
            self.red_score,
            self.blue_score
        );
    }

    /// Add one ball of `color` at the ring center, launched into the upward cone
    pub fn spawn(&mut self, color: TeamColor) {
        let angle = self.rng.random_range(SPAWN_ANGLE_MIN..=SPAWN_ANGLE_MAX);
        let speed = self.rng.random_range(SPAWN_SPEED_MIN..=SPAWN_SPEED_MAX);
        self.balls
            .push(Ball::new(color, Vec2::ZERO, polar_to_cartesian(speed, angle)));
        self.events.push(GameEvent::Pop);
    }

    /// Number of balls of one color in the pool
    pub fn count(&self, color: TeamColor) -> usize {
        self.balls.iter().filter(|b| b.color == color).count()
    }

    /// Round is over and waiting on the restart timer. False once the match is won.
    pub fn game_over(&self) -> bool {
        self.phase == MatchPhase::RoundOver
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_seeds_one_ball_per_team() {
        let state = GameState::new(12345);
        assert_eq!(state.balls.len(), 2);
        assert_eq!(state.count(TeamColor::Red), 1);
        assert_eq!(state.count(TeamColor::Blue), 1);
        assert_eq!(state.phase, MatchPhase::Playing);
        assert_eq!(state.round, 1);
        assert_eq!(state.ring.rotation, 0.0);
        assert!(state.balls.iter().all(|b| b.pos == Vec2::ZERO));
    }

    #[test]
    fn test_spawn_velocity_in_cone() {
        let mut state = GameState::new(7);
        for _ in 0..500 {
            state.spawn(TeamColor::Blue);
        }
        for ball in &state.balls {
            let speed = ball.vel.length();
            assert!(speed >= SPAWN_SPEED_MIN - 1e-3 && speed <= SPAWN_SPEED_MAX + 1e-3);
            // Never launched downward (+y is down)
            assert!(ball.vel.y <= 1e-3);
        }
    }

    #[test]
    fn test_spawn_is_additive() {
        let mut state = GameState::new(1);
        let before: Vec<Vec2> = state.balls.iter().map(|b| b.pos).collect();
        state.events.clear();
        state.spawn(TeamColor::Red);
        assert_eq!(state.balls.len(), 3);
        assert_eq!(state.balls[2].color, TeamColor::Red);
        assert_eq!(state.events, vec![GameEvent::Pop]);
        for (ball, pos) in state.balls.iter().zip(before) {
            assert_eq!(ball.pos, pos);
        }
    }

    #[test]
    fn test_reset_round_keeps_score() {
        let mut state = GameState::new(3);
        state.red_score = 2;
        state.ring.rotation = 4.0;
        for _ in 0..10 {
            state.spawn(TeamColor::Red);
        }
        state.phase = MatchPhase::RoundOver;
        state.reset_round();
        assert_eq!(state.balls.len(), 2);
        assert_eq!(state.red_score, 2);
        assert_eq!(state.ring.rotation, 0.0);
        assert_eq!(state.phase, MatchPhase::Playing);
        assert_eq!(state.round, 2);
    }

    #[test]
    fn test_same_seed_same_spawns() {
        let a = GameState::new(99);
        let b = GameState::new(99);
        for (x, y) in a.balls.iter().zip(&b.balls) {
            assert_eq!(x.vel, y.vel);
        }
    }

    #[test]
    fn test_event_tags() {
        assert_eq!(GameEvent::Pop.tag(), "POP");
        assert_eq!(GameEvent::RoundWin.tag(), "ROUND_WIN");
        assert_eq!(GameEvent::MatchWin.tag(), "MATCH_WIN");
    }
}
