use serde::{Deserialize, Serialize};

use crate::error::SimError;

/// Simulated seconds in between two scatter draws.
pub const SCATTER_INTERVAL: f32 = 1.5;
/// Maps the wall avoidance slider range onto an acceleration in px/s².
/// Calibrated by eye, not derived from anything.
pub const WALL_FORCE_SCALE: f32 = 1000.;
/// Applied to every frame delta on top of `time_scale`, tuned together with
/// the default force factors.
pub const DT_DAMPING: f32 = 0.75;
/// `time_scale` used while slow motion is on.
pub const SLOW_MOTION_SCALE: f32 = 0.25;
/// Speed of a bouncer, px/s.
pub const BOUNCER_SPEED: f32 = 150.;

/// Tunable simulation parameters. Distances are in px, velocities in px/s.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimParams {
    /// radius in which other boids are considered neighbours
    pub view_range: f32,
    /// protected distance, neighbours closer than this are pushed away from
    pub min_distance: f32,

    pub separation_factor: f32,
    pub cohesion_factor: f32,
    pub alignment_factor: f32,
    pub wall_avoid_factor: f32,
    /// inset from each canvas edge where wall avoidance kicks in
    pub wall_margin: f32,

    /// probability in [0, 1] that a scatter interval inverts cohesion
    pub scatter_chance: f32,
    pub time_scale: f32,

    pub min_velocity: f32,
    pub max_velocity: f32,

    /// render size of a boid
    pub boid_size: f32,
}

impl Default for SimParams {
    fn default() -> Self {
        SimParams {
            view_range: 60.,
            min_distance: 18.,
            separation_factor: 2.,
            cohesion_factor: 0.8,
            alignment_factor: 1.,
            wall_avoid_factor: 0.5,
            wall_margin: 50.,
            scatter_chance: 0.1,
            time_scale: 1.,
            min_velocity: 60.,
            max_velocity: 180.,
            boid_size: 8.,
        }
    }
}

impl SimParams {
    pub fn validate(&self) -> Result<(), SimError> {
        check_non_negative("view_range", self.view_range)?;
        check_non_negative("min_distance", self.min_distance)?;
        check_non_negative("separation_factor", self.separation_factor)?;
        check_non_negative("cohesion_factor", self.cohesion_factor)?;
        check_non_negative("alignment_factor", self.alignment_factor)?;
        check_non_negative("wall_avoid_factor", self.wall_avoid_factor)?;
        check_non_negative("wall_margin", self.wall_margin)?;
        check_non_negative("time_scale", self.time_scale)?;
        check_non_negative("boid_size", self.boid_size)?;
        check_scatter_chance(self.scatter_chance)?;
        check_velocity_range(self.min_velocity, self.max_velocity)
    }

    #[inline]
    pub fn view_range_sq(&self) -> f32 {
        self.view_range * self.view_range
    }

    #[inline]
    pub fn min_distance_sq(&self) -> f32 {
        self.min_distance * self.min_distance
    }
}

pub(crate) fn check_non_negative(name: &'static str, value: f32) -> Result<(), SimError> {
    if value.is_finite() && value >= 0. {
        Ok(())
    } else {
        Err(SimError::InvalidParameter { name, value })
    }
}

pub(crate) fn check_scatter_chance(chance: f32) -> Result<(), SimError> {
    if (0.0..=1.0).contains(&chance) {
        Ok(())
    } else {
        Err(SimError::InvalidScatterChance(chance))
    }
}

pub(crate) fn check_velocity_range(min: f32, max: f32) -> Result<(), SimError> {
    if min.is_finite() && max.is_finite() && min > 0. && min <= max {
        Ok(())
    } else {
        Err(SimError::InvalidVelocityRange { min, max })
    }
}

/// Dimensions of the render surface, the simulation lives in
/// `[0, width] x [0, height]`.
#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: f32,
    pub height: f32,
}

impl CanvasSize {
    pub fn new(width: f32, height: f32) -> Result<CanvasSize, SimError> {
        if width.is_finite() && height.is_finite() && width > 0. && height > 0. {
            Ok(CanvasSize { width, height })
        } else {
            Err(SimError::InvalidCanvas { width, height })
        }
    }
}

impl Default for CanvasSize {
    fn default() -> Self {
        CanvasSize {
            width: 1350.,
            height: 900.,
        }
    }
}
