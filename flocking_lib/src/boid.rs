use glam::f32::Vec2;

use crate::{
    agent::{reflect, Agent, FrameContext},
    math_helpers::VecExt,
    options::{SimParams, WALL_FORCE_SCALE},
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Boid {
    pub position: Vec2,
    pub velocity: Vec2,
    pub(crate) marked_for_removal: bool,
}

/// What a boid sees of its flock mates in a single frame.
///
/// A neighbour is classified either as too close (separation) or as a flock
/// mate (cohesion and alignment), never both.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Neighbourhood {
    /// sum of offsets pointing from too-close neighbours to the boid
    pub separation: Vec2,
    /// sum of offsets pointing from the boid to its flock mates
    pub cohesion_delta: Vec2,
    /// sum of the flock mates' velocities
    pub alignment: Vec2,
    /// number of flock mates
    pub flock_mates: usize,
    pub too_close: usize,
}

impl Neighbourhood {
    /// Scans every other boid in `agents`, `index` is the surveyed boid's own slot.
    pub fn survey(index: usize, agents: &[Agent], params: &SimParams) -> Self {
        let mut res = Neighbourhood::default();

        let boid = match agents.get(index).and_then(Agent::as_boid) {
            Some(b) => b,
            None => return res,
        };
        let min_distance_sq = params.min_distance_sq();

        for (other, dist_sq) in neighbours(index, agents, params) {
            if dist_sq < min_distance_sq {
                res.separation += boid.position - other.position;
                res.too_close += 1;
            } else {
                res.cohesion_delta += other.position - boid.position;
                res.alignment += other.velocity;
                res.flock_mates += 1;
            }
        }

        res
    }
}

/// Other boids within view range of the boid at `index`, paired with their
/// squared distance. Empty if the slot does not hold a boid.
pub fn neighbours<'a>(
    index: usize,
    agents: &'a [Agent],
    params: &SimParams,
) -> impl Iterator<Item = (&'a Boid, f32)> + 'a {
    let origin = agents
        .get(index)
        .and_then(Agent::as_boid)
        .map(|b| b.position);
    let view_range_sq = params.view_range_sq();

    agents
        .iter()
        .enumerate()
        .filter_map(move |(i, agent)| {
            let position = origin?;
            if i == index {
                return None;
            }

            let other = agent.as_boid()?;
            let dist_sq = position.dist_sq(other.position);

            if dist_sq < view_range_sq {
                Some((other, dist_sq))
            } else {
                None
            }
        })
}

impl Boid {
    /// Creates a new [`Boid`].
    pub fn new(x: f32, y: f32, velocity: Vec2) -> Self {
        Boid {
            position: Vec2::new(x, y),
            velocity,
            marked_for_removal: false,
        }
    }

    /// Spawns a boid heading along `angle` (radians) with the given speed.
    pub fn from_heading(x: f32, y: f32, angle: f32, speed: f32) -> Self {
        Boid::new(x, y, Vec2::from_polar(angle, speed))
    }

    /// Applies the flocking rules for one frame and moves the boid.
    pub fn flock(&mut self, neighbourhood: &Neighbourhood, ctx: &FrameContext) {
        let params = ctx.params;
        let dt = ctx.dt;

        self.velocity += neighbourhood.separation * params.separation_factor * dt;

        if neighbourhood.flock_mates > 0 {
            let k = neighbourhood.flock_mates as f32;

            self.velocity += neighbourhood.alignment.div_or_zero(k) * params.alignment_factor * dt;

            // scattering turns the pull towards the flock centre into a push
            let cohesion_sign = if ctx.scattering { -1. } else { 1. };
            self.velocity += neighbourhood.cohesion_delta.div_or_zero(k)
                * params.cohesion_factor
                * cohesion_sign
                * dt;
        }

        self.avoid_walls(ctx);

        self.velocity = self.velocity.limit(params.min_velocity, params.max_velocity);
        self.position += self.velocity * dt;

        reflect(&mut self.position, &mut self.velocity, &ctx.canvas);
    }

    /// Steers away from the canvas edges once within the wall margin. At most
    /// one horizontal and one vertical push per frame.
    fn avoid_walls(&mut self, ctx: &FrameContext) {
        let margin = ctx.params.wall_margin;
        let push = ctx.params.wall_avoid_factor * WALL_FORCE_SCALE * ctx.dt;

        if self.position.x < margin {
            self.velocity.x += push;
        } else if self.position.x > ctx.canvas.width - margin {
            self.velocity.x -= push;
        }

        if self.position.y < margin {
            self.velocity.y += push;
        } else if self.position.y > ctx.canvas.height - margin {
            self.velocity.y -= push;
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use glam::Vec2;
    use rstest::rstest;

    use super::{neighbours, Boid, Neighbourhood};
    use crate::{
        agent::{Agent, FrameContext},
        bouncer::Bouncer,
        options::{CanvasSize, SimParams, WALL_FORCE_SCALE},
    };

    macro_rules! assert_eqf32 {
        ($x:expr, $y:expr) => {
            assert_relative_eq!($x, $y, epsilon = 1e-3_f32)
        };
    }

    fn params() -> SimParams {
        SimParams {
            view_range: 50.,
            min_distance: 10.,
            separation_factor: 1.,
            cohesion_factor: 1.,
            alignment_factor: 1.,
            wall_avoid_factor: 0.1,
            wall_margin: 20.,
            min_velocity: 1.,
            max_velocity: 100.,
            ..Default::default()
        }
    }

    fn canvas() -> CanvasSize {
        CanvasSize {
            width: 400.,
            height: 400.,
        }
    }

    fn boid_at(x: f32, y: f32) -> Agent {
        Boid::new(x, y, Vec2::new(10., 0.)).into()
    }

    #[test]
    fn survey_excludes_self_and_far_boids() {
        let agents = vec![boid_at(200., 200.), boid_at(200., 200.), boid_at(300., 300.)];

        let hood = Neighbourhood::survey(0, &agents, &params());

        // the co-located boid is a neighbour, the boid itself is not
        assert_eq!(hood.too_close, 1);
        assert_eq!(hood.flock_mates, 0);
        assert_eq!(hood.separation, Vec2::ZERO);
    }

    #[test]
    fn survey_classifies_neighbours_exclusively() {
        let agents = vec![boid_at(200., 200.), boid_at(205., 200.), boid_at(230., 200.)];

        let hood = Neighbourhood::survey(0, &agents, &params());

        assert_eq!(hood.too_close, 1);
        assert_eq!(hood.flock_mates, 1);
        assert_eq!(hood.separation, Vec2::new(-5., 0.));
        assert_eq!(hood.cohesion_delta, Vec2::new(30., 0.));
        assert_eq!(hood.alignment, Vec2::new(10., 0.));
    }

    #[rstest]
    #[case(9.99, 1, 0)]
    #[case(10., 0, 1)]
    #[case(49.99, 0, 1)]
    #[case(50., 0, 0)]
    fn survey_thresholds_are_exclusive(
        #[case] offset: f32,
        #[case] too_close: usize,
        #[case] flock_mates: usize,
    ) {
        let agents = vec![boid_at(200., 200.), boid_at(200. + offset, 200.)];

        let hood = Neighbourhood::survey(0, &agents, &params());

        assert_eq!(hood.too_close, too_close);
        assert_eq!(hood.flock_mates, flock_mates);
    }

    #[test]
    fn survey_ignores_bouncers() {
        let agents = vec![
            boid_at(200., 200.),
            Bouncer::new(Vec2::new(205., 200.), Vec2::X).into(),
        ];

        assert_eq!(Neighbourhood::survey(0, &agents, &params()), Neighbourhood::default());
        assert_eq!(Neighbourhood::survey(1, &agents, &params()), Neighbourhood::default());
    }

    #[test]
    fn neighbours_reports_squared_distance() {
        let agents = vec![boid_at(200., 200.), boid_at(203., 204.)];
        let p = params();

        let found: Vec<f32> = neighbours(0, &agents, &p).map(|(_, d)| d).collect();

        assert_eq!(found, vec![25.]);
    }

    #[test]
    fn separation_pushes_away_from_close_neighbour() {
        let agents = vec![boid_at(200., 200.), boid_at(195., 200.)];
        let p = params();
        let hood = Neighbourhood::survey(0, &agents, &p);
        let ctx = FrameContext {
            params: &p,
            canvas: canvas(),
            dt: 0.1,
            scattering: false,
        };

        let mut boid = *agents[0].as_boid().unwrap();
        boid.flock(&hood, &ctx);

        // 10 + 5 * 1 * 0.1
        assert_eqf32!(boid.velocity.x, 10.5);
        assert_eqf32!(boid.velocity.y, 0.);
    }

    #[rstest]
    #[case(false, 1.)]
    #[case(true, -1.)]
    fn scattering_inverts_cohesion(#[case] scattering: bool, #[case] sign: f32) {
        let p = SimParams {
            alignment_factor: 0.,
            ..params()
        };
        let hood = Neighbourhood {
            cohesion_delta: Vec2::new(0., 40.),
            alignment: Vec2::new(10., 0.),
            flock_mates: 2,
            ..Default::default()
        };
        let ctx = FrameContext {
            params: &p,
            canvas: canvas(),
            dt: 0.5,
            scattering,
        };

        let mut boid = Boid::new(200., 200., Vec2::new(10., 0.));
        boid.flock(&hood, &ctx);

        // 40 / 2 * 1 * 0.5
        assert_eqf32!(boid.velocity.y, 10. * sign);
    }

    #[test]
    fn alignment_adds_average_velocity() {
        let p = SimParams {
            cohesion_factor: 0.,
            ..params()
        };
        let hood = Neighbourhood {
            alignment: Vec2::new(0., 60.),
            flock_mates: 3,
            ..Default::default()
        };
        let ctx = FrameContext {
            params: &p,
            canvas: canvas(),
            dt: 0.1,
            scattering: false,
        };

        let mut boid = Boid::new(200., 200., Vec2::new(10., 0.));
        boid.flock(&hood, &ctx);

        assert_eqf32!(boid.velocity.y, 2.);
    }

    #[test]
    fn isolated_boid_moves_straight() {
        let p = params();
        let ctx = FrameContext {
            params: &p,
            canvas: canvas(),
            dt: 0.5,
            scattering: true,
        };

        let mut boid = Boid::new(100., 150., Vec2::new(10., 20.));
        boid.flock(&Neighbourhood::default(), &ctx);

        assert_eq!(boid.velocity, Vec2::new(10., 20.));
        assert_eqf32!(boid.position.x, 105.);
        assert_eqf32!(boid.position.y, 160.);
    }

    #[rstest]
    #[case(Vec2::new(10., 200.), Vec2::new(1., 0.))]
    #[case(Vec2::new(390., 200.), Vec2::new(-1., 0.))]
    #[case(Vec2::new(200., 10.), Vec2::new(0., 1.))]
    #[case(Vec2::new(200., 390.), Vec2::new(0., -1.))]
    #[case(Vec2::new(10., 10.), Vec2::new(1., 1.))]
    fn walls_push_inwards(#[case] position: Vec2, #[case] direction: Vec2) {
        let p = params();
        let dt = 0.01;
        let ctx = FrameContext {
            params: &p,
            canvas: canvas(),
            dt,
            scattering: false,
        };
        let start = Vec2::new(5., 5.);

        let mut boid = Boid::new(position.x, position.y, start);
        boid.flock(&Neighbourhood::default(), &ctx);

        let push = p.wall_avoid_factor * WALL_FORCE_SCALE * dt;
        let expected = start + direction * push;
        assert_eqf32!(boid.velocity.x, expected.x);
        assert_eqf32!(boid.velocity.y, expected.y);
    }

    #[test]
    fn speed_is_clamped() {
        let p = params();
        let ctx = FrameContext {
            params: &p,
            canvas: canvas(),
            dt: 0.01,
            scattering: false,
        };

        let mut fast = Boid::new(200., 200., Vec2::new(300., 400.));
        fast.flock(&Neighbourhood::default(), &ctx);
        assert_eqf32!(fast.velocity.length(), 100.);

        let mut still = Boid::new(200., 200., Vec2::ZERO);
        still.flock(&Neighbourhood::default(), &ctx);
        assert_eqf32!(still.velocity.length(), 1.);
    }

    #[test]
    fn bounces_off_the_edge() {
        let p = SimParams {
            wall_avoid_factor: 0.,
            ..params()
        };
        let ctx = FrameContext {
            params: &p,
            canvas: canvas(),
            dt: 1.,
            scattering: false,
        };

        let mut boid = Boid::new(395., 200., Vec2::new(50., 0.));
        boid.flock(&Neighbourhood::default(), &ctx);

        assert_eq!(boid.position.x, 400.);
        assert_eq!(boid.velocity.x, -50.);
    }

    #[test]
    fn from_heading_sets_speed() {
        let boid = Boid::from_heading(0., 0., 1.2, 42.);

        assert_eqf32!(boid.velocity.length(), 42.);
    }
}
