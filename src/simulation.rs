//! Simulation facade
//!
//! Owns the game state and the fixed-step clock. The host calls `frame` once
//! per display frame: zero or more fixed ticks run, queued events go to the
//! sound sink, then the renderer gets exactly one snapshot.

use serde::Serialize;

use crate::clock::FixedStepClock;
use crate::platform::{Renderer, SoundSink};
use crate::sim::{Ball, GameState, MatchPhase, TeamColor, tick};

/// Read-only view of the state handed to the renderer
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot<'a> {
    pub rotation: f32,
    pub balls: &'a [Ball],
    pub red_score: u32,
    pub blue_score: u32,
    pub red_count: usize,
    pub blue_count: usize,
    pub game_over: bool,
    pub final_winner: Option<TeamColor>,
    pub phase: MatchPhase,
    pub round: u32,
}

/// The one owner of all mutable simulation state
#[derive(Debug, Clone)]
pub struct Simulation {
    state: GameState,
    clock: FixedStepClock,
}

impl Simulation {
    pub fn new(seed: u64) -> Self {
        log::info!("Simulation initialized with seed: {}", seed);
        Self {
            state: GameState::new(seed),
            clock: FixedStepClock::new(),
        }
    }

    /// Advance exactly one fixed tick
    pub fn tick(&mut self, dt: f32) {
        tick(&mut self.state, dt);
    }

    /// Run the ticks owed for wall-clock time `now` (seconds) and return how many ran.
    /// Events stay queued in the state until `drain_events`; hosts go through `frame`.
    pub(crate) fn advance(&mut self, now: f64) -> u32 {
        let steps = self.clock.advance(now);
        let dt = self.clock.dt();
        for _ in 0..steps {
            self.tick(dt);
        }
        steps
    }

    /// One host frame: tick, flush sounds, draw
    pub fn frame(
        &mut self,
        now: f64,
        renderer: &mut dyn Renderer,
        sound: &mut dyn SoundSink,
    ) -> u32 {
        let steps = self.advance(now);
        self.drain_events(sound);
        renderer.draw(&self.snapshot());
        steps
    }

    /// Hand queued events to the sound sink
    pub fn drain_events(&mut self, sound: &mut dyn SoundSink) {
        for event in self.state.events.drain(..) {
            sound.on_event(event);
        }
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        let state = &self.state;
        Snapshot {
            rotation: state.ring.rotation,
            balls: &state.balls,
            red_score: state.red_score,
            blue_score: state.blue_score,
            red_count: state.count(TeamColor::Red),
            blue_count: state.count(TeamColor::Blue),
            game_over: state.game_over(),
            final_winner: state.final_winner,
            phase: state.phase,
            round: state.round,
        }
    }

    /// Start a new match with a fresh seed
    pub fn restart(&mut self, seed: u64) {
        self.state = GameState::new(seed);
        self.clock.reset();
        log::info!("Match restarted with seed: {}", seed);
    }

    /// Drop the clock's previous timestamp so a resumed loop doesn't see a gap
    pub fn pause_clock(&mut self) {
        self.clock.reset();
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn is_match_over(&self) -> bool {
        self.state.phase == MatchPhase::MatchOver
    }
}
