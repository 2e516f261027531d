use glam::Vec2;

use crate::{
    agent::{reflect, FrameContext},
    math_helpers::VecExt,
    options::BOUNCER_SPEED,
};

/// A dot moving in a straight line, bouncing off the canvas edges.
/// It has no notion of other agents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bouncer {
    pub position: Vec2,
    pub velocity: Vec2,
    pub(crate) marked_for_removal: bool,
}

impl Bouncer {
    pub fn new(position: Vec2, velocity: Vec2) -> Self {
        Bouncer {
            position,
            velocity,
            marked_for_removal: false,
        }
    }

    /// Spawns a bouncer at a point, heading along `angle` (radians) at [`BOUNCER_SPEED`].
    pub fn launch(position: Vec2, angle: f32) -> Self {
        Bouncer::new(position, Vec2::from_polar(angle, BOUNCER_SPEED))
    }

    pub fn travel(&mut self, ctx: &FrameContext) {
        self.position += self.velocity * ctx.dt;
        reflect(&mut self.position, &mut self.velocity, &ctx.canvas);
    }
}
