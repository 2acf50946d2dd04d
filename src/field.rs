//! The particle field: a fixed set of drifting points.
//!
//! Each frame every particle moves by its velocity and bounces off the
//! surface edges. The bounce only flips the velocity component; the position
//! is left where it landed, so a particle can sit just outside the surface for
//! the single frame on which it reflects.
//!
//! A pointer inside the interaction radius then nudges the particle toward it
//! ([`PointerMode::Attract`]) or away from it ([`PointerMode::Repel`]), with a
//! strength falling off linearly to zero at the radius.

use glam::Vec2;
use rand::Rng;

use crate::canvas::Canvas;
use crate::config::{NetworkColors, NetworkConfig, PointerMode, Span};
use crate::particle::Particle;

/// The particle collection and the extent it bounces within.
#[derive(Clone, Debug)]
pub struct ParticleField {
    particles: Vec<Particle>,
    size: Vec2,
}

impl ParticleField {
    /// Scatter `config.particle_count` particles uniformly over `size`.
    pub fn initialize<R: Rng + ?Sized>(config: &NetworkConfig, size: Vec2, rng: &mut R) -> Self {
        let velocity = Span::new(-config.max_velocity, config.max_velocity);
        let particles = (0..config.particle_count)
            .map(|_| Particle {
                position: Vec2::new(rng.gen::<f32>() * size.x, rng.gen::<f32>() * size.y),
                velocity: Vec2::new(velocity.sample(rng), velocity.sample(rng)),
                size: config.particle_size.sample(rng),
            })
            .collect();

        Self { particles, size }
    }

    /// Build a field from an explicit layout.
    pub fn from_particles(particles: Vec<Particle>, size: Vec2) -> Self {
        Self { particles, size }
    }

    #[inline]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    #[inline]
    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Surface extent particles bounce within.
    #[inline]
    pub fn size(&self) -> Vec2 {
        self.size
    }

    /// Adopt a new surface extent. Particles keep their positions; those left
    /// outside are turned back toward the surface by [`ParticleField::advance`].
    pub fn resize(&mut self, size: Vec2) {
        self.size = size;
    }

    /// Move every particle one frame forward.
    pub fn advance(&mut self, pointer: Option<Vec2>, config: &NetworkConfig) {
        let size = self.size;
        for p in &mut self.particles {
            p.position += p.velocity;

            // Outside the surface, velocity always points back inside.
            if p.position.x < 0.0 {
                p.velocity.x = p.velocity.x.abs();
            } else if p.position.x > size.x {
                p.velocity.x = -p.velocity.x.abs();
            }
            if p.position.y < 0.0 {
                p.velocity.y = p.velocity.y.abs();
            } else if p.position.y > size.y {
                p.velocity.y = -p.velocity.y.abs();
            }

            if let Some(pointer) = pointer {
                p.position += pointer_push(p.position, pointer, config);
            }
        }
    }

    /// Draw each particle as a translucent dot with a per-frame flicker.
    ///
    /// `flicker_rng` only feeds the cosmetic alpha and never touches particle
    /// state.
    pub fn render<C, R>(&self, canvas: &mut C, flicker_rng: &mut R, config: &NetworkConfig)
    where
        C: Canvas + ?Sized,
        R: Rng + ?Sized,
    {
        for p in &self.particles {
            let alpha = (config.particle_alpha + flicker_rng.gen::<f32>() * config.flicker).min(1.0);
            canvas.fill_circle(p.position, p.size, NetworkColors::rgba(config.colors.particle, alpha));
        }
    }
}

/// Displacement applied to a particle at `position` by the pointer.
pub fn pointer_push(position: Vec2, pointer: Vec2, config: &NetworkConfig) -> Vec2 {
    let toward = pointer - position;
    let distance = toward.length();
    if distance >= config.interaction_radius {
        return Vec2::ZERO;
    }

    let force = (config.interaction_radius - distance) / config.interaction_radius * config.pointer_strength;
    match config.pointer_mode {
        PointerMode::None => Vec2::ZERO,
        PointerMode::Attract => toward * force,
        PointerMode::Repel => -toward * force,
    }
}
