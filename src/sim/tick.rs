//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically.

use super::collision::{ball_ring_collision, reflect_velocity};
use super::ring::SegmentColor;
use super::state::{GameEvent, GameState, MatchPhase, TeamColor};
use crate::consts::*;

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, dt: f32) {
    tick_with_gravity(state, dt, GRAVITY);
}

/// `tick` with an explicit gravity, so tests can check the wall response in isolation
pub(crate) fn tick_with_gravity(state: &mut GameState, dt: f32, gravity: f32) {
    match state.phase {
        MatchPhase::MatchOver => return,
        MatchPhase::RoundOver => {
            // Balls stay frozen while the timer drains
            state.restart_timer -= dt;
            if state.restart_timer <= 0.0 {
                state.reset_round();
            }
            return;
        }
        MatchPhase::Playing => {}
    }

    state.time_ticks += 1;
    state.ring.advance(dt);
    step_balls(state, dt, gravity);
    resolve_round(state);
}

/// Integrate every ball and bounce it off the ring, cloning on same-color hits
fn step_balls(state: &mut GameState, dt: f32, gravity: f32) {
    // Collect spawns (deferred to avoid borrow issues); clones start moving next tick
    let mut spawns: Vec<TeamColor> = Vec::new();

    for ball in &mut state.balls {
        ball.vel.y += gravity * dt;
        ball.pos += ball.vel * dt;

        let hit = ball_ring_collision(ball.pos, ball.radius, &state.ring);
        if !hit.hit {
            continue;
        }

        ball.pos = hit.point;
        ball.vel = reflect_velocity(ball.vel, hit.normal);

        if hit.segment == SegmentColor::Team(ball.color) {
            spawns.push(ball.color);
        }
    }

    for color in spawns {
        state.spawn(color);
    }
}

/// Score the round once a team reaches the ball limit
///
/// Both teams are checked independently, so a simultaneous crossing scores for
/// both. The match check runs red first: if both reach the win threshold on the
/// same tick, red takes the match.
fn resolve_round(state: &mut GameState) {
    let red_count = state.count(TeamColor::Red);
    let blue_count = state.count(TeamColor::Blue);
    let red_crossed = red_count >= ROUND_BALL_LIMIT;
    let blue_crossed = blue_count >= ROUND_BALL_LIMIT;

    if !red_crossed && !blue_crossed {
        return;
    }

    if red_crossed {
        state.red_score += 1;
    }
    if blue_crossed {
        state.blue_score += 1;
    }
    state.events.push(GameEvent::RoundWin);
    log::debug!(
        "Round {} ended at {} red / {} blue balls",
        state.round,
        red_count,
        blue_count
    );

    let winner = if state.red_score >= MATCH_WIN_ROUNDS {
        Some(TeamColor::Red)
    } else if state.blue_score >= MATCH_WIN_ROUNDS {
        Some(TeamColor::Blue)
    } else {
        None
    };

    match winner {
        Some(team) => {
            state.final_winner = Some(team);
            state.phase = MatchPhase::MatchOver;
            state.events.push(GameEvent::MatchWin);
            log::info!(
                "{} wins the match {}-{}",
                team.as_str(),
                state.red_score,
                state.blue_score
            );
        }
        None => {
            state.phase = MatchPhase::RoundOver;
            state.restart_timer = ROUND_RESTART_DELAY;
            log::info!(
                "Round {} over, score {}-{}",
                state.round,
                state.red_score,
                state.blue_score
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::polar_to_cartesian;
    use crate::sim::state::Ball;
    use glam::Vec2;
    use proptest::prelude::*;

    /// Replace the pool with a single ball launched from the center
    fn single_ball(color: TeamColor, speed: f32, angle: f32) -> GameState {
        let mut state = GameState::new(42);
        state.balls = vec![Ball::new(color, Vec2::ZERO, polar_to_cartesian(speed, angle))];
        state.events.clear();
        state
    }

    /// Add `n` motionless balls at the center
    fn fill(state: &mut GameState, color: TeamColor, n: usize) {
        for _ in 0..n {
            state.balls.push(Ball::new(color, Vec2::ZERO, Vec2::ZERO));
        }
    }

    /// Tick with no gravity until the pool changes size or the wall is hit
    fn run_until_contact(state: &mut GameState) -> u32 {
        let limit = RING_RADIUS - BALL_RADIUS;
        for n in 1..=120 {
            tick_with_gravity(state, SIM_DT, 0.0);
            if state.balls[0].pos.length() >= limit - 1e-3 {
                return n;
            }
        }
        panic!("ball never reached the wall");
    }

    #[test]
    fn test_same_color_hit_spawns_clone() {
        // 300 u/s covers 5 u per tick: 190 after 38 ticks, 195 after 39.
        // Rotation is then 0.39, so world angle 0.55 is local 0.16: red segment 0.
        let mut state = single_ball(TeamColor::Red, 300.0, 0.55);
        let ticks = run_until_contact(&mut state);

        assert_eq!(ticks, 39);
        assert_eq!(state.balls.len(), 2);
        assert_eq!(state.balls[1].color, TeamColor::Red);
        assert_eq!(state.balls[1].pos, Vec2::ZERO);
        assert!((state.balls[0].pos.length() - (RING_RADIUS - BALL_RADIUS)).abs() < 1e-3);
        // Reflected back toward the center
        assert!(state.balls[0].vel.dot(state.balls[0].pos) < 0.0);
        assert_eq!(state.events, vec![GameEvent::Pop]);
    }

    #[test]
    fn test_opposite_color_hit_only_bounces() {
        // Local angle 1.17 - 0.39 = 0.78 lands on blue segment 1
        let mut state = single_ball(TeamColor::Red, 300.0, 1.17);
        run_until_contact(&mut state);
        assert_eq!(state.balls.len(), 1);
        assert!(state.balls[0].vel.dot(state.balls[0].pos) < 0.0);
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_neutral_hit_only_bounces() {
        // Local angle -0.3 - 0.39 wraps to ~5.59: neutral segment 10
        let mut state = single_ball(TeamColor::Blue, 300.0, -0.3);
        run_until_contact(&mut state);
        assert_eq!(state.balls.len(), 1);
        assert!(state.balls[0].vel.dot(state.balls[0].pos) < 0.0);
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_bounce_preserves_speed_without_gravity() {
        let mut state = single_ball(TeamColor::Blue, 250.0, -0.3);
        run_until_contact(&mut state);
        assert!((state.balls[0].vel.length() - 250.0).abs() < 1e-2);
    }

    #[test]
    fn test_balls_never_escape() {
        let mut state = GameState::new(2024);
        for _ in 0..600 {
            tick(&mut state, SIM_DT);
            for ball in &state.balls {
                assert!(ball.pos.length() <= RING_RADIUS);
            }
        }
    }

    #[test]
    fn test_round_over_freezes_balls() {
        let mut state = GameState::new(5);
        fill(&mut state, TeamColor::Red, ROUND_BALL_LIMIT);
        tick(&mut state, SIM_DT);

        assert_eq!(state.phase, MatchPhase::RoundOver);
        assert!(state.game_over());
        assert_eq!(state.red_score, 1);
        assert_eq!(state.blue_score, 0);
        assert!(state.events.contains(&GameEvent::RoundWin));

        let frozen: Vec<Vec2> = state.balls.iter().map(|b| b.pos).collect();
        let rotation = state.ring.rotation;
        for _ in 0..60 {
            tick(&mut state, SIM_DT);
        }
        assert_eq!(state.phase, MatchPhase::RoundOver);
        assert_eq!(state.ring.rotation, rotation);
        let now: Vec<Vec2> = state.balls.iter().map(|b| b.pos).collect();
        assert_eq!(frozen, now);
    }

    #[test]
    fn test_round_restarts_after_delay() {
        let mut state = GameState::new(5);
        fill(&mut state, TeamColor::Blue, ROUND_BALL_LIMIT);
        tick(&mut state, SIM_DT);
        assert_eq!(state.phase, MatchPhase::RoundOver);

        // 1.5 s is 90 ticks; allow a tick either way for float drift
        let mut ticks = 0;
        while state.phase == MatchPhase::RoundOver {
            tick(&mut state, SIM_DT);
            ticks += 1;
            assert!(ticks <= 91);
        }
        assert!(ticks >= 89);
        assert_eq!(state.phase, MatchPhase::Playing);
        assert_eq!(state.balls.len(), 2);
        assert_eq!(state.ring.rotation, 0.0);
        assert_eq!(state.blue_score, 1);
        assert_eq!(state.round, 2);
    }

    #[test]
    fn test_simultaneous_crossing_scores_both() {
        let mut state = GameState::new(8);
        state.events.clear();
        fill(&mut state, TeamColor::Red, ROUND_BALL_LIMIT);
        fill(&mut state, TeamColor::Blue, ROUND_BALL_LIMIT);
        tick(&mut state, SIM_DT);

        assert_eq!(state.red_score, 1);
        assert_eq!(state.blue_score, 1);
        assert_eq!(state.phase, MatchPhase::RoundOver);
        let round_wins = state
            .events
            .iter()
            .filter(|e| **e == GameEvent::RoundWin)
            .count();
        assert_eq!(round_wins, 1);
    }

    #[test]
    fn test_five_round_wins_take_the_match() {
        let mut state = GameState::new(11);
        for round in 1..=MATCH_WIN_ROUNDS {
            fill(&mut state, TeamColor::Red, ROUND_BALL_LIMIT);
            tick(&mut state, SIM_DT);
            assert_eq!(state.red_score, round);
            while state.phase == MatchPhase::RoundOver {
                tick(&mut state, SIM_DT);
            }
        }
        assert_eq!(state.phase, MatchPhase::MatchOver);
        assert_eq!(state.final_winner, Some(TeamColor::Red));
        assert!(state.events.contains(&GameEvent::MatchWin));
    }

    #[test]
    fn test_final_double_crossing_goes_to_red() {
        let mut state = GameState::new(13);
        state.red_score = MATCH_WIN_ROUNDS - 1;
        state.blue_score = MATCH_WIN_ROUNDS - 1;
        fill(&mut state, TeamColor::Red, ROUND_BALL_LIMIT);
        fill(&mut state, TeamColor::Blue, ROUND_BALL_LIMIT);
        tick(&mut state, SIM_DT);

        assert_eq!(state.red_score, MATCH_WIN_ROUNDS);
        assert_eq!(state.blue_score, MATCH_WIN_ROUNDS);
        assert_eq!(state.final_winner, Some(TeamColor::Red));
    }

    #[test]
    fn test_blue_match_win() {
        let mut state = GameState::new(17);
        state.blue_score = MATCH_WIN_ROUNDS - 1;
        fill(&mut state, TeamColor::Blue, ROUND_BALL_LIMIT);
        tick(&mut state, SIM_DT);
        assert_eq!(state.final_winner, Some(TeamColor::Blue));
        assert_eq!(state.phase, MatchPhase::MatchOver);
    }

    #[test]
    fn test_match_over_is_frozen() {
        let mut state = GameState::new(19);
        state.red_score = MATCH_WIN_ROUNDS - 1;
        fill(&mut state, TeamColor::Red, ROUND_BALL_LIMIT);
        tick(&mut state, SIM_DT);
        assert_eq!(state.final_winner, Some(TeamColor::Red));
        // A match win replaces the round-over pause
        assert!(!state.game_over());
        assert_eq!(state.restart_timer, 0.0);

        let balls: Vec<(Vec2, Vec2)> = state.balls.iter().map(|b| (b.pos, b.vel)).collect();
        let rotation = state.ring.rotation;
        let ticks = state.time_ticks;
        state.events.clear();
        for _ in 0..300 {
            tick(&mut state, SIM_DT);
        }
        let after: Vec<(Vec2, Vec2)> = state.balls.iter().map(|b| (b.pos, b.vel)).collect();
        assert_eq!(balls, after);
        assert_eq!(state.ring.rotation, rotation);
        assert_eq!(state.red_score, MATCH_WIN_ROUNDS);
        assert_eq!(state.blue_score, 0);
        assert_eq!(state.time_ticks, ticks);
        assert!(state.events.is_empty());
        assert!(!state.game_over());
    }

    #[test]
    fn test_determinism() {
        // Two states with same seed should produce identical results
        let mut state1 = GameState::new(99999);
        let mut state2 = GameState::new(99999);

        for _ in 0..400 {
            tick(&mut state1, SIM_DT);
            tick(&mut state2, SIM_DT);
        }

        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.balls.len(), state2.balls.len());
        for (a, b) in state1.balls.iter().zip(&state2.balls) {
            assert_eq!(a.pos, b.pos);
            assert_eq!(a.color, b.color);
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        #[test]
        fn prop_pool_only_grows_within_round(seed in any::<u64>()) {
            let mut state = GameState::new(seed);
            let mut last = state.balls.len();
            for _ in 0..240 {
                tick(&mut state, SIM_DT);
                if state.phase != MatchPhase::Playing {
                    break;
                }
                prop_assert!(state.balls.len() >= last);
                last = state.balls.len();
                for ball in &state.balls {
                    prop_assert!(ball.pos.length() <= RING_RADIUS);
                }
            }
        }
    }
}
