use error::SimError;
use flock::ParticleSystem;
use options::{CanvasSize, SimParams};

pub mod agent;
pub mod boid;
pub mod bouncer;
pub mod flock;

pub mod error;
pub mod math_helpers;
pub mod options;
pub mod render;

/// Runs a freshly populated system for `no_iter` frames of `elapsed`
/// seconds each, without rendering.
pub fn run_headless(
    no_boids: usize,
    no_iter: u64,
    elapsed: f32,
    params: SimParams,
    canvas: CanvasSize,
    seed: u64,
) -> Result<ParticleSystem, SimError> {
    let mut system = ParticleSystem::with_seed(params, canvas, seed)?;
    system.populate(no_boids);

    (0..no_iter).for_each(|_| system.move_all(elapsed));

    Ok(system)
}
