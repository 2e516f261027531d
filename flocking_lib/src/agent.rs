use glam::Vec2;

use crate::{
    boid::{Boid, Neighbourhood},
    bouncer::Bouncer,
    options::{CanvasSize, SimParams},
};

/// Everything an agent needs from its owning system for a single update,
/// handed over explicitly instead of a back reference.
#[derive(Debug, Clone, Copy)]
pub struct FrameContext<'a> {
    pub params: &'a SimParams,
    pub canvas: CanvasSize,
    /// scaled frame delta in simulated seconds, always > 0
    pub dt: f32,
    /// system wide scatter flag for the current interval
    pub scattering: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentKind {
    Boid,
    Bouncer,
}

/// The closed set of agent variants a particle system can own.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Agent {
    Boid(Boid),
    Bouncer(Bouncer),
}

impl Agent {
    pub fn kind(&self) -> AgentKind {
        match self {
            Agent::Boid(_) => AgentKind::Boid,
            Agent::Bouncer(_) => AgentKind::Bouncer,
        }
    }

    pub fn position(&self) -> Vec2 {
        match self {
            Agent::Boid(b) => b.position,
            Agent::Bouncer(b) => b.position,
        }
    }

    pub fn velocity(&self) -> Vec2 {
        match self {
            Agent::Boid(b) => b.velocity,
            Agent::Bouncer(b) => b.velocity,
        }
    }

    pub fn as_boid(&self) -> Option<&Boid> {
        match self {
            Agent::Boid(b) => Some(b),
            Agent::Bouncer(_) => None,
        }
    }

    /// Flags the agent, it is dropped at the end of the next update pass.
    pub fn mark_for_removal(&mut self) {
        match self {
            Agent::Boid(b) => b.marked_for_removal = true,
            Agent::Bouncer(b) => b.marked_for_removal = true,
        }
    }

    pub fn is_marked_for_removal(&self) -> bool {
        match self {
            Agent::Boid(b) => b.marked_for_removal,
            Agent::Bouncer(b) => b.marked_for_removal,
        }
    }

    /// Moves the agent by one frame. Boids need the neighbourhood surveyed
    /// for them, bouncers ignore it.
    pub fn advance(&mut self, neighbourhood: Option<&Neighbourhood>, ctx: &FrameContext) {
        match self {
            Agent::Boid(b) => {
                let empty = Neighbourhood::default();
                b.flock(neighbourhood.unwrap_or(&empty), ctx)
            }
            Agent::Bouncer(b) => b.travel(ctx),
        }
    }
}

impl From<Boid> for Agent {
    fn from(boid: Boid) -> Self {
        Agent::Boid(boid)
    }
}

impl From<Bouncer> for Agent {
    fn from(bouncer: Bouncer) -> Self {
        Agent::Bouncer(bouncer)
    }
}

/// Clamps the position into the canvas and flips the velocity component
/// of every crossed edge, unless it already points back inside.
pub(crate) fn reflect(position: &mut Vec2, velocity: &mut Vec2, canvas: &CanvasSize) {
    if position.x < 0. {
        position.x = 0.;
        if velocity.x < 0. {
            velocity.x = -velocity.x;
        }
    } else if position.x > canvas.width {
        position.x = canvas.width;
        if velocity.x > 0. {
            velocity.x = -velocity.x;
        }
    }

    if position.y < 0. {
        position.y = 0.;
        if velocity.y < 0. {
            velocity.y = -velocity.y;
        }
    } else if position.y > canvas.height {
        position.y = canvas.height;
        if velocity.y > 0. {
            velocity.y = -velocity.y;
        }
    }
}
