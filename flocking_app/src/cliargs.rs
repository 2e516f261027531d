use clap_serde_derive::{
    clap::{self, Parser},
    serde::Serialize,
    ClapSerde,
};
use flocking_lib::options::{CanvasSize, SimParams};

#[derive(Parser)]
#[command(version, about, long_about = None)]
/// Interactive flocking (boids) with periodic scatter bursts.
pub struct Args {
    /// Config file
    #[arg(short, long = "config", default_value = "config.yaml")]
    pub config_path: std::path::PathBuf,

    /// Rest of arguments
    #[command(flatten)]
    pub config: <Config as ClapSerde>::Opt,
}

#[derive(ClapSerde, Serialize)]
/// Programatic configuration
///
/// Uses defaults, which can be overwritten by specifying a filepath for the `-c` or `--config` arg option
pub struct Config {
    #[default(120)]
    #[arg(short = 'n', long)]
    /// number of boids
    pub no_boids: usize,

    #[default(1350)]
    #[arg(short = 'x', long)]
    pub init_width: u32,

    #[default(900)]
    #[arg(short = 'y', long)]
    pub init_height: u32,

    #[default(60.)]
    #[arg(long = "view_range")]
    pub view_range: f32,
    #[default(18.)]
    #[arg(long = "min_dist")]
    /// protected distance
    pub min_distance: f32,

    #[default(2.)]
    #[arg(long = "sep_coef")]
    pub separation_factor: f32,
    #[default(0.8)]
    #[arg(long = "coh_coef")]
    pub cohesion_factor: f32,
    #[default(1.)]
    #[arg(long = "ali_coef")]
    pub alignment_factor: f32,
    #[default(0.5)]
    #[arg(long = "wall_coef")]
    pub wall_avoid_factor: f32,
    #[default(50.)]
    #[arg(long = "wall_margin")]
    pub wall_margin: f32,

    #[default(0.1)]
    #[arg(long = "scatter")]
    /// chance in [0, 1] that cohesion inverts for a scatter interval
    pub scatter_chance: f32,

    #[default(60.)]
    #[arg(long = "min_speed")]
    pub min_velocity: f32,
    #[default(180.)]
    #[arg(long = "max_speed")]
    pub max_velocity: f32,

    #[default(8.)]
    #[arg(long = "size")]
    /// boid render size
    pub size: f32,
}

impl Config {
    pub fn params(&self) -> SimParams {
        SimParams {
            view_range: self.view_range,
            min_distance: self.min_distance,
            separation_factor: self.separation_factor,
            cohesion_factor: self.cohesion_factor,
            alignment_factor: self.alignment_factor,
            wall_avoid_factor: self.wall_avoid_factor,
            wall_margin: self.wall_margin,
            scatter_chance: self.scatter_chance,
            min_velocity: self.min_velocity,
            max_velocity: self.max_velocity,
            boid_size: self.size,
            ..Default::default()
        }
    }

    pub fn canvas(&self) -> CanvasSize {
        CanvasSize {
            width: self.init_width as f32,
            height: self.init_height as f32,
        }
    }
}
