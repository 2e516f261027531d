use std::f32::consts::TAU;

use glam::Vec2;
use log::{debug, trace, warn};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::{
    agent::{Agent, FrameContext},
    boid::{Boid, Neighbourhood},
    bouncer::Bouncer,
    error::SimError,
    options::{
        check_non_negative, check_scatter_chance, check_velocity_range, CanvasSize, SimParams,
        DT_DAMPING, SLOW_MOTION_SCALE,
    },
};

pub mod scatter;

use scatter::ScatterTimer;

/// Owns a flat collection of agents together with the parameters they are
/// simulated with.
///
/// Neighbours are found with a brute force O(n²) scan. Agents are updated in
/// place one after another, so an agent sees the already updated state of
/// every agent before it in the collection.
pub struct ParticleSystem {
    agents: Vec<Agent>,
    params: SimParams,
    canvas: CanvasSize,
    scatter: ScatterTimer,
    debug: bool,
    rng: Xoshiro256PlusPlus,
}

impl ParticleSystem {
    pub fn new(params: SimParams, canvas: CanvasSize) -> Result<Self, SimError> {
        Self::with_rng(params, canvas, Xoshiro256PlusPlus::from_entropy())
    }

    /// Same as [`ParticleSystem::new`] with a reproducible random stream.
    pub fn with_seed(params: SimParams, canvas: CanvasSize, seed: u64) -> Result<Self, SimError> {
        Self::with_rng(params, canvas, Xoshiro256PlusPlus::seed_from_u64(seed))
    }

    fn with_rng(
        params: SimParams,
        canvas: CanvasSize,
        rng: Xoshiro256PlusPlus,
    ) -> Result<Self, SimError> {
        params.validate()?;
        let canvas = CanvasSize::new(canvas.width, canvas.height)?;

        Ok(ParticleSystem {
            agents: Vec::new(),
            params,
            canvas,
            scatter: Default::default(),
            debug: false,
            rng,
        })
    }

    /// Adds `n` boids at random positions, random headings and random speeds.
    pub fn populate(&mut self, n: usize) {
        self.agents.reserve(n);
        for _ in 0..n {
            let boid = self.random_boid();
            self.agents.push(boid.into());
        }
        debug!("populated {} boids, {} agents total", n, self.agents.len());
    }

    /// Adds a single boid using the same random spawn as [`ParticleSystem::populate`].
    pub fn add_particle(&mut self) {
        let boid = self.random_boid();
        self.agents.push(boid.into());
    }

    /// Adds a boid at `(x, y)` heading along `angle` (radians) at `speed`.
    pub fn add_particle_at(&mut self, x: f32, y: f32, angle: f32, speed: f32) {
        self.agents.push(Boid::from_heading(x, y, angle, speed).into());
    }

    /// Adds a bouncing dot at `(x, y)` with a random heading.
    pub fn add_bouncer(&mut self, x: f32, y: f32) {
        let angle = self.rng.gen::<f32>() * TAU;
        self.agents.push(Bouncer::launch(Vec2::new(x, y), angle).into());
    }

    /// Removes an agent picked uniformly at random, `None` if there is none.
    pub fn remove_particle(&mut self) -> Option<Agent> {
        if self.agents.is_empty() {
            return None;
        }

        let index = self.rng.gen_range(0..self.agents.len());
        Some(self.agents.remove(index))
    }

    pub fn remove_all(&mut self) {
        debug!("removing all {} agents", self.agents.len());
        self.agents.clear();
    }

    /// Snapshot of the agents, later updates are not reflected in it.
    pub fn get_all(&self) -> Vec<Agent> {
        self.agents.clone()
    }

    /// Borrowed view of the agents in update order.
    pub fn view(&self) -> &[Agent] {
        &self.agents
    }

    pub fn num_particles(&self) -> usize {
        self.agents.len()
    }

    /// Snapshot of the agents matching `predicate`.
    pub fn filter<P>(&self, mut predicate: P) -> Vec<Agent>
    where
        P: FnMut(&Agent) -> bool,
    {
        self.agents.iter().filter(|a| predicate(*a)).copied().collect()
    }

    /// Flags every agent matching `predicate`, they are dropped at the end of
    /// the next [`ParticleSystem::move_all`]. Returns how many were flagged.
    pub fn mark_where<P>(&mut self, mut predicate: P) -> usize
    where
        P: FnMut(&Agent) -> bool,
    {
        let mut marked = 0;
        for agent in self.agents.iter_mut() {
            if predicate(&*agent) {
                agent.mark_for_removal();
                marked += 1;
            }
        }
        marked
    }

    /// Advances the simulation by a frame that took `elapsed` real seconds.
    ///
    /// The frame delta is scaled by `time_scale` and [`DT_DAMPING`]; a delta
    /// that ends up non-positive or non-finite leaves the system untouched.
    pub fn move_all(&mut self, elapsed: f32) {
        let dt = elapsed * self.params.time_scale * DT_DAMPING;
        if !dt.is_finite() || dt <= 0. {
            return;
        }

        if self
            .scatter
            .tick(dt, self.params.scatter_chance, &mut self.rng)
        {
            trace!("scatter interval rolled over, scattering: {}", self.scatter.scattering());
        }

        let ctx = FrameContext {
            params: &self.params,
            canvas: self.canvas,
            dt,
            scattering: self.scatter.scattering(),
        };

        for i in 0..self.agents.len() {
            let neighbourhood = match self.agents[i] {
                Agent::Boid(_) => Some(Neighbourhood::survey(i, &self.agents, &self.params)),
                Agent::Bouncer(_) => None,
            };
            self.agents[i].advance(neighbourhood.as_ref(), &ctx);
        }

        let before = self.agents.len();
        self.agents.retain(|a| !a.is_marked_for_removal());
        if self.agents.len() != before {
            debug!("dropped {} marked agents", before - self.agents.len());
        }
    }

    pub fn is_scattering(&self) -> bool {
        self.scatter.scattering()
    }

    pub fn params(&self) -> &SimParams {
        &self.params
    }

    /// Replaces every parameter at once, keeps the current ones if the new
    /// set is invalid.
    pub fn set_params(&mut self, params: SimParams) -> Result<(), SimError> {
        if let Err(e) = params.validate() {
            warn!("rejected parameters: {}", e);
            return Err(e);
        }
        self.params = params;
        Ok(())
    }

    pub fn set_view_range(&mut self, view_range: f32) -> Result<(), SimError> {
        check_non_negative("view_range", view_range)?;
        self.params.view_range = view_range;
        Ok(())
    }

    pub fn set_min_distance(&mut self, min_distance: f32) -> Result<(), SimError> {
        check_non_negative("min_distance", min_distance)?;
        self.params.min_distance = min_distance;
        Ok(())
    }

    pub fn set_separation_factor(&mut self, factor: f32) -> Result<(), SimError> {
        check_non_negative("separation_factor", factor)?;
        self.params.separation_factor = factor;
        Ok(())
    }

    pub fn set_cohesion_factor(&mut self, factor: f32) -> Result<(), SimError> {
        check_non_negative("cohesion_factor", factor)?;
        self.params.cohesion_factor = factor;
        Ok(())
    }

    pub fn set_alignment_factor(&mut self, factor: f32) -> Result<(), SimError> {
        check_non_negative("alignment_factor", factor)?;
        self.params.alignment_factor = factor;
        Ok(())
    }

    pub fn set_wall_avoid_factor(&mut self, factor: f32) -> Result<(), SimError> {
        check_non_negative("wall_avoid_factor", factor)?;
        self.params.wall_avoid_factor = factor;
        Ok(())
    }

    pub fn set_scatter_chance(&mut self, chance: f32) -> Result<(), SimError> {
        check_scatter_chance(chance)?;
        self.params.scatter_chance = chance;
        Ok(())
    }

    pub fn set_time_scale(&mut self, time_scale: f32) -> Result<(), SimError> {
        check_non_negative("time_scale", time_scale)?;
        self.params.time_scale = time_scale;
        Ok(())
    }

    pub fn set_velocity_range(&mut self, min: f32, max: f32) -> Result<(), SimError> {
        if let Err(e) = check_velocity_range(min, max) {
            warn!("rejected velocity range: {}", e);
            return Err(e);
        }
        self.params.min_velocity = min;
        self.params.max_velocity = max;
        Ok(())
    }

    /// Switches in between real time and slow motion, returns the new time scale.
    pub fn toggle_slow_motion(&mut self) -> f32 {
        self.params.time_scale = if self.params.time_scale == SLOW_MOTION_SCALE {
            1.
        } else {
            SLOW_MOTION_SCALE
        };
        self.params.time_scale
    }

    pub fn canvas(&self) -> CanvasSize {
        self.canvas
    }

    /// Follows the render surface size. Agents outside of the new bounds are
    /// pulled back in by the next update.
    pub fn resize(&mut self, width: f32, height: f32) -> Result<(), SimError> {
        self.canvas = CanvasSize::new(width, height)?;
        Ok(())
    }

    pub fn debug(&self) -> bool {
        self.debug
    }

    pub fn set_debug(&mut self, debug: bool) {
        self.debug = debug;
    }

    fn random_boid(&mut self) -> Boid {
        // x in [0, width), y in [0, height)
        let x = self.rng.gen::<f32>() * self.canvas.width;
        let y = self.rng.gen::<f32>() * self.canvas.height;
        let angle = self.rng.gen::<f32>() * TAU;
        let speed = self
            .rng
            .gen_range(self.params.min_velocity..=self.params.max_velocity);

        Boid::from_heading(x, y, angle, speed)
    }
}
