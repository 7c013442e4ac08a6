//! Debug drawing
//!
//! The simulation never draws on its own. Callers that want a picture of a
//! rollout pass a [`DebugCollector`] in, and whatever frontend is attached
//! serializes the collected figures out. Headless rollouts simply never
//! construct one.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use super::state::{MatchState, Team};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Color {
    pub const fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }
}

const OWN_COLOR: Color = Color::new(0.0, 0.6, 1.0, 1.0);
const OPPOSING_COLOR: Color = Color::new(1.0, 0.2, 0.2, 1.0);
const BALL_COLOR: Color = Color::new(1.0, 1.0, 1.0, 1.0);
const PACK_COLOR: Color = Color::new(0.2, 1.0, 0.2, 0.8);

/// One drawable primitive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Figure {
    Sphere {
        center: DVec3,
        radius: f64,
        color: Color,
    },
    Line {
        from: DVec3,
        to: DVec3,
        width: f64,
        color: Color,
    },
    Text { text: String, color: Color },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct TimedFigure {
    figure: Figure,
    /// Ticks the figure stays alive
    ttl: u32,
}

/// Buffer of figures accumulated over one or more rollout ticks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DebugCollector {
    figures: Vec<TimedFigure>,
}

impl DebugCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, figure: Figure, ttl: u32) {
        self.figures.push(TimedFigure { figure, ttl });
    }

    /// Age every figure by one tick and drop the expired ones.
    pub fn decay(&mut self) {
        for timed in &mut self.figures {
            timed.ttl = timed.ttl.saturating_sub(1);
        }
        self.figures.retain(|timed| timed.ttl > 0);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Figure> {
        self.figures.iter().map(|timed| &timed.figure)
    }

    pub fn drain(&mut self) -> Vec<Figure> {
        self.figures.drain(..).map(|timed| timed.figure).collect()
    }

    pub fn len(&self) -> usize {
        self.figures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.figures.is_empty()
    }
}

impl MatchState {
    /// Emit one frame's worth of figures for the current state: every robot
    /// with its velocity, the ball, and the available nitro packs.
    pub fn draw_into(&self, out: &mut DebugCollector) {
        for robot in self.robots() {
            let color = match robot.team {
                Team::Own => OWN_COLOR,
                Team::Opposing => OPPOSING_COLOR,
            };
            out.push(
                Figure::Sphere {
                    center: robot.body.position,
                    radius: robot.body.radius,
                    color,
                },
                1,
            );
            out.push(
                Figure::Line {
                    from: robot.body.position,
                    to: robot.body.position + robot.body.velocity,
                    width: 1.0,
                    color,
                },
                1,
            );
        }
        out.push(
            Figure::Sphere {
                center: self.ball.body.position,
                radius: self.ball.body.radius,
                color: BALL_COLOR,
            },
            1,
        );
        for pack in &self.nitro_packs {
            if pack.available() {
                out.push(
                    Figure::Sphere {
                        center: pack.position,
                        radius: pack.radius,
                        color: PACK_COLOR,
                    },
                    1,
                );
            }
        }
    }
}
