//! Canvas 2D renderer
//!
//! Sim space is centered on the origin with +y down, which matches canvas
//! space after translating to the canvas center.

use std::f64::consts::TAU;

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::consts::*;
use crate::platform::Renderer;
use crate::sim::{MatchPhase, SegmentColor, TeamColor};
use crate::sim::Ring;
use crate::sim::ring::segment_color;
use crate::simulation::Snapshot;

const BACKGROUND: &str = "#111";
const RED: &str = "#ff4d4d";
const BLUE: &str = "#4d7cff";
const NEUTRAL: &str = "#555";
const RING_WIDTH: f64 = 6.0;

fn team_css(color: TeamColor) -> &'static str {
    match color {
        TeamColor::Red => RED,
        TeamColor::Blue => BLUE,
    }
}

fn segment_css(color: SegmentColor) -> &'static str {
    match color {
        SegmentColor::Team(team) => team_css(team),
        SegmentColor::Neutral => NEUTRAL,
    }
}

pub struct CanvasRenderer {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasRenderer {
    /// Grab the 2D context of `canvas`. None if the browser refuses one.
    pub fn new(canvas: HtmlCanvasElement) -> Option<Self> {
        let ctx = canvas
            .get_context("2d")
            .ok()??
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        Some(Self { canvas, ctx })
    }

    fn draw_ring(&self, rotation: f32) {
        let ctx = &self.ctx;
        let ring = Ring {
            radius: RING_RADIUS,
            rotation,
        };
        ctx.set_line_width(RING_WIDTH);
        for index in 0..SEGMENT_COUNT {
            let (start, end) = ring.segment_span(index);
            ctx.begin_path();
            ctx.set_stroke_style_str(segment_css(segment_color(index)));
            let _ = ctx.arc(
                0.0,
                0.0,
                ring.radius as f64 + RING_WIDTH / 2.0,
                start as f64,
                end as f64,
            );
            ctx.stroke();
        }
    }

    fn draw_balls(&self, snapshot: &Snapshot<'_>) {
        let ctx = &self.ctx;
        // One path per color keeps the draw call count flat as the pool grows
        for team in TeamColor::ALL {
            ctx.begin_path();
            ctx.set_fill_style_str(team_css(team));
            for ball in snapshot.balls.iter().filter(|b| b.color == team) {
                let (x, y) = (ball.pos.x as f64, ball.pos.y as f64);
                ctx.move_to(x + ball.radius as f64, y);
                let _ = ctx.arc(x, y, ball.radius as f64, 0.0, TAU);
            }
            ctx.fill();
        }
    }

    fn draw_hud(&self, snapshot: &Snapshot<'_>) {
        let ctx = &self.ctx;
        let top = -(RING_RADIUS as f64) - 30.0;
        ctx.set_font("20px monospace");
        ctx.set_text_align("center");

        ctx.set_fill_style_str(RED);
        let _ = ctx.fill_text(
            &format!("{} ({})", snapshot.red_score, snapshot.red_count),
            -80.0,
            top,
        );
        ctx.set_fill_style_str(BLUE);
        let _ = ctx.fill_text(
            &format!("{} ({})", snapshot.blue_score, snapshot.blue_count),
            80.0,
            top,
        );

        let banner = match (snapshot.phase, snapshot.final_winner) {
            (MatchPhase::MatchOver, Some(team)) => {
                Some((format!("{} WINS", team.as_str()), team_css(team)))
            }
            (MatchPhase::RoundOver, _) => Some((format!("ROUND {}", snapshot.round), "#eee")),
            _ => None,
        };
        if let Some((text, color)) = banner {
            ctx.set_font("36px monospace");
            ctx.set_fill_style_str(color);
            let _ = ctx.fill_text(&text, 0.0, 12.0);
        }
    }
}

impl Renderer for CanvasRenderer {
    fn draw(&mut self, snapshot: &Snapshot<'_>) {
        let width = self.canvas.width() as f64;
        let height = self.canvas.height() as f64;
        let ctx = &self.ctx;

        ctx.set_fill_style_str(BACKGROUND);
        ctx.fill_rect(0.0, 0.0, width, height);

        ctx.save();
        let _ = ctx.translate(width / 2.0, height / 2.0);
        // Fit the ring plus HUD into the shorter side
        let scale = (width.min(height) / (2.0 * (RING_RADIUS as f64 + 60.0))).max(0.1);
        let _ = ctx.scale(scale, scale);

        self.draw_ring(snapshot.rotation);
        self.draw_balls(snapshot);
        self.draw_hud(snapshot);

        ctx.restore();
    }
}
