use glam::Vec2;

// because of nannou I have to keep glam version at .17
// as glam is not stable yet, there are breaking changes
// in between decimal versions, `Vec2::from_angle` and friends are not there yet
pub trait VecExt {
    /// Builds a vector from an angle in radians and a length.
    fn from_polar(angle: f32, magnitude: f32) -> Self;
    /// Angle of the vector in radians, in (-π, π].
    fn heading(&self) -> f32;
    fn dist_sq(&self, other: Self) -> f32;
    /// Clamps the magnitude into `[min, max]`, keeping the direction.
    ///
    /// A zero length vector has no direction, it is pointed along the +x axis
    /// at `min` so the lower bound still holds.
    fn limit(&self, min: f32, max: f32) -> Self;
    /// Division that returns the zero vector instead of inf/NaN components.
    fn div_or_zero(&self, scalar: f32) -> Self;
}

impl VecExt for Vec2 {
    #[inline]
    fn from_polar(angle: f32, magnitude: f32) -> Self {
        Vec2::new(angle.cos() * magnitude, angle.sin() * magnitude)
    }

    #[inline]
    fn heading(&self) -> f32 {
        self.y.atan2(self.x)
    }

    #[inline]
    fn dist_sq(&self, other: Self) -> f32 {
        (self.x - other.x).powi(2) + (self.y - other.y).powi(2)
    }

    fn limit(&self, min: f32, max: f32) -> Self {
        let length_sq = self.length_squared();

        if length_sq == 0. || !length_sq.is_finite() {
            return Vec2::new(min, 0.);
        }

        if length_sq < min * min {
            *self * (min / length_sq.sqrt())
        } else if length_sq > max * max {
            *self * (max / length_sq.sqrt())
        } else {
            *self
        }
    }

    #[inline]
    fn div_or_zero(&self, scalar: f32) -> Self {
        if scalar == 0. || !scalar.is_finite() {
            Vec2::ZERO
        } else {
            *self / scalar
        }
    }
}
