//! The particle primitive.

use glam::Vec2;

/// One animated point of the background field.
///
/// Particles are addressed by their index in the field; that index stays
/// stable for as long as the animation is mounted.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    /// Surface pixel position.
    pub position: Vec2,
    /// Displacement per frame.
    pub velocity: Vec2,
    /// Drawn radius in pixels.
    pub size: f32,
}

impl Particle {
    pub fn new(position: Vec2, velocity: Vec2, size: f32) -> Self {
        Self { position, velocity, size }
    }

    /// A motionless particle, handy for hand-built layouts.
    pub fn at(x: f32, y: f32) -> Self {
        Self::new(Vec2::new(x, y), Vec2::ZERO, 1.0)
    }

    #[inline]
    pub fn distance(&self, other: &Particle) -> f32 {
        self.position.distance(other.position)
    }
}
