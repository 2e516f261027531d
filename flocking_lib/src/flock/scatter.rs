use rand::Rng;

use crate::options::SCATTER_INTERVAL;

/// Interval driven, system wide scatter flag. Every [`SCATTER_INTERVAL`]
/// simulated seconds a new flag is drawn, true with the scatter chance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScatterTimer {
    interval_timer: f32,
    scattering: bool,
}

impl Default for ScatterTimer {
    fn default() -> Self {
        ScatterTimer {
            interval_timer: SCATTER_INTERVAL,
            scattering: false,
        }
    }
}

impl ScatterTimer {
    /// Advances the timer, returns `true` when the interval rolled over and
    /// the flag was redrawn.
    pub fn tick<R: Rng + ?Sized>(&mut self, dt: f32, chance: f32, rng: &mut R) -> bool {
        self.interval_timer -= dt;

        if self.interval_timer > 0. {
            return false;
        }

        self.interval_timer = SCATTER_INTERVAL;
        // gen is in [0, 1), so chance 0 never and chance 1 always scatters
        self.scattering = rng.gen::<f32>() < chance;

        true
    }

    pub fn scattering(&self) -> bool {
        self.scattering
    }

    pub fn remaining(&self) -> f32 {
        self.interval_timer
    }
}
