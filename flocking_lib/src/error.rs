use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimError {
    #[error("invalid velocity range [{min}, {max}], expected 0 < min <= max")]
    InvalidVelocityRange { min: f32, max: f32 },
    #[error("{name} must be a finite non-negative number, got {value}")]
    InvalidParameter { name: &'static str, value: f32 },
    #[error("scatter chance is a probability in [0, 1], got {0}")]
    InvalidScatterChance(f32),
    #[error("canvas must have a positive size, got {width}x{height}")]
    InvalidCanvas { width: f32, height: f32 },
}
