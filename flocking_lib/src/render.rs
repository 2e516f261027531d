//! Drawing of a [`ParticleSystem`] onto any render surface.
//!
//! The simulation does not know about windows or colours. Everything is
//! emitted in canvas coordinates (`[0, width] x [0, height]`, y pointing
//! down) as a handful of primitives tagged with a [`Paint`] role, the host
//! decides what the roles look like.

use glam::Vec2;

use crate::{
    agent::Agent,
    boid::neighbours,
    flock::ParticleSystem,
    math_helpers::VecExt,
};

/// Radius of a bouncer's dot.
pub const BOUNCER_RADIUS: f32 = 4.;
/// The debug velocity vector is drawn this many seconds ahead.
pub const VELOCITY_LOOKAHEAD: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Paint {
    Boid,
    Bouncer,
    /// the agent inspected by the debug overlay
    Highlight,
    /// a flock mate of the inspected agent
    Neighbour,
    /// a neighbour of the inspected agent within its protected distance
    TooClose,
    ViewRange,
    ProtectedRange,
    Velocity,
}

/// A render surface.
pub trait Canvas {
    fn triangle(&mut self, points: [Vec2; 3], paint: Paint);
    fn circle(&mut self, centre: Vec2, radius: f32, filled: bool, paint: Paint);
    fn line(&mut self, start: Vec2, end: Vec2, paint: Paint);
}

pub trait Drawable {
    fn draw<C: Canvas>(&self, canvas: &mut C, size: f32, paint: Paint);
}

impl Drawable for Agent {
    fn draw<C: Canvas>(&self, canvas: &mut C, size: f32, paint: Paint) {
        match self {
            Agent::Boid(b) => {
                // a triangle pointing along the velocity
                let theta = b.velocity.heading();
                let nose = b.position + Vec2::from_polar(theta, size);
                let left = b.position + Vec2::from_polar(theta + 2.5, 0.8 * size);
                let right = b.position + Vec2::from_polar(theta - 2.5, 0.8 * size);

                canvas.triangle([nose, left, right], paint);
            }
            Agent::Bouncer(b) => canvas.circle(b.position, BOUNCER_RADIUS, true, paint),
        }
    }
}

impl ParticleSystem {
    /// Draws every agent, plus the debug overlay of the first agent when
    /// debugging is on. Does not touch the simulation state.
    pub fn render_all<C: Canvas>(&self, canvas: &mut C) {
        let size = self.params().boid_size;

        for agent in self.view() {
            let paint = match agent {
                Agent::Boid(_) => Paint::Boid,
                Agent::Bouncer(_) => Paint::Bouncer,
            };
            agent.draw(canvas, size, paint);
        }

        if self.debug() {
            self.render_debug(canvas);
        }
    }

    fn render_debug<C: Canvas>(&self, canvas: &mut C) {
        let agents = self.view();
        let params = self.params();

        let first = match agents.first() {
            Some(agent) if agent.as_boid().is_some() => agent,
            _ => return,
        };
        let min_distance_sq = params.min_distance_sq();

        for (other, dist_sq) in neighbours(0, agents, params) {
            let paint = if dist_sq < min_distance_sq {
                Paint::TooClose
            } else {
                Paint::Neighbour
            };
            Agent::Boid(*other).draw(canvas, params.boid_size, paint);
        }

        first.draw(canvas, params.boid_size, Paint::Highlight);

        let position = first.position();
        canvas.circle(position, params.view_range, false, Paint::ViewRange);
        canvas.circle(position, params.min_distance, false, Paint::ProtectedRange);
        canvas.line(
            position,
            position + first.velocity() * VELOCITY_LOOKAHEAD,
            Paint::Velocity,
        );
    }
}
