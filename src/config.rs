//! Network configuration and named presets.
//!
//! Everything that shapes the animation (particle count, thresholds, speeds,
//! pointer behavior, colors) lives in [`NetworkConfig`]. Two presets cover the
//! observed variants of the background:
//!
//! | Preset | Particles | Velocity | Link distance | Pointer |
//! |--------|-----------|----------|---------------|---------|
//! | [`NetworkConfig::attract`] | 80 | ±0.5 | 150 | attract, radius 150 |
//! | [`NetworkConfig::repel`]   | 60 | ±0.3 | 180 | repel, radius 200 |
//!
//! # Example
//!
//! ```ignore
//! let config = NetworkConfig::repel()
//!     .with_particle_count(70)
//!     .with_spawn_probability(0.08);
//! config.validate()?;
//! ```
//!
//! Configurations serialize to JSON, so a tuned network can be saved and
//! loaded back by the `neuralbg` binary.

use std::fs;
use std::path::Path;

use glam::Vec4;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// How particles react to a nearby pointer.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum PointerMode {
    /// Pointer is ignored.
    None,
    /// Pull particles toward the pointer.
    #[default]
    Attract,
    /// Push particles away from the pointer.
    Repel,
}

/// A closed-open interval `[min, max)` sampled uniformly.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct Span {
    pub min: f32,
    pub max: f32,
}

impl Span {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Uniform sample in `[min, max)`; a degenerate span always yields `min`.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        if self.max > self.min {
            rng.gen_range(self.min..self.max)
        } else {
            self.min
        }
    }

    /// Returns true if [`Span::sample`] can yield `value`: `[min, max)`, or
    /// exactly `min` for a degenerate span.
    pub fn contains(&self, value: f32) -> bool {
        if self.max > self.min {
            value >= self.min && value < self.max
        } else {
            value == self.min
        }
    }
}

/// Complete animation configuration.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct NetworkConfig {
    /// Number of particles created at mount.
    pub particle_count: usize,
    /// Each velocity component is drawn from `[-max_velocity, max_velocity)`.
    pub max_velocity: f32,
    /// Particle radius range.
    pub particle_size: Span,
    /// Pairs closer than this are linked; packets only travel shorter links.
    pub connection_distance: f32,
    /// Maximum pointer distance that perturbs a particle.
    pub interaction_radius: f32,
    pub pointer_mode: PointerMode,
    /// Fraction of the pointer vector applied per frame at zero distance.
    pub pointer_strength: f32,
    /// Chance per frame that a packet spawn is attempted.
    pub spawn_probability: f64,
    /// Progress added to a packet every frame.
    pub packet_speed: Span,
    /// Live packet cap; `None` is unbounded.
    #[serde(default)]
    pub max_packets: Option<usize>,
    /// Opacity of a link between two coincident particles.
    pub link_opacity: f32,
    pub link_width: f32,
    /// Base particle opacity before flicker.
    pub particle_alpha: f32,
    /// Upper bound of the random opacity added each frame.
    pub flicker: f32,
    pub packet_radius: f32,
    pub packet_glow: f32,
    #[serde(default)]
    pub colors: NetworkColors,
}

/// RGB colors of the animation layers.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct NetworkColors {
    pub background: [f32; 3],
    pub particle: [f32; 3],
    pub link: [f32; 3],
    pub packet: [f32; 3],
}

impl Default for NetworkColors {
    fn default() -> Self {
        Self {
            background: [0.02, 0.03, 0.08], // Deep navy
            particle: [0.39, 0.82, 1.0],    // Cyan
            link: [0.39, 0.55, 1.0],        // Indigo-blue
            packet: [0.75, 0.95, 1.0],      // Near-white cyan
        }
    }
}

impl NetworkColors {
    /// Layer color with the given alpha.
    pub fn rgba(rgb: [f32; 3], alpha: f32) -> Vec4 {
        Vec4::new(rgb[0], rgb[1], rgb[2], alpha)
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self::attract()
    }
}

impl NetworkConfig {
    // =========================================================================
    // PRESETS
    // =========================================================================

    /// Dense, lively field drawn toward the pointer.
    pub fn attract() -> Self {
        Self {
            particle_count: 80,
            max_velocity: 0.5,
            particle_size: Span::new(1.0, 3.0),
            connection_distance: 150.0,
            interaction_radius: 150.0,
            pointer_mode: PointerMode::Attract,
            pointer_strength: 0.02,
            spawn_probability: 0.05,
            packet_speed: Span::new(0.02, 0.05),
            max_packets: None,
            link_opacity: 0.4,
            link_width: 1.0,
            particle_alpha: 0.5,
            flicker: 0.3,
            packet_radius: 2.0,
            packet_glow: 8.0,
            colors: NetworkColors::default(),
        }
    }

    /// Sparse, slow field that parts around the pointer.
    pub fn repel() -> Self {
        Self {
            particle_count: 60,
            max_velocity: 0.3,
            connection_distance: 180.0,
            interaction_radius: 200.0,
            pointer_mode: PointerMode::Repel,
            pointer_strength: 0.03,
            link_opacity: 0.5,
            ..Self::attract()
        }
    }

    /// Look up a preset by name (case-insensitive).
    pub fn preset(name: &str) -> Result<Self, ConfigError> {
        match name.to_lowercase().as_str() {
            "attract" => Ok(Self::attract()),
            "repel" => Ok(Self::repel()),
            _ => Err(ConfigError::UnknownPreset(name.to_string())),
        }
    }

    /// Names accepted by [`NetworkConfig::preset`].
    pub fn preset_names() -> &'static [&'static str] {
        &["attract", "repel"]
    }

    // =========================================================================
    // BUILDER
    // =========================================================================

    pub fn with_particle_count(mut self, count: usize) -> Self {
        self.particle_count = count;
        self
    }

    pub fn with_connection_distance(mut self, distance: f32) -> Self {
        self.connection_distance = distance;
        self
    }

    pub fn with_pointer(mut self, mode: PointerMode, radius: f32, strength: f32) -> Self {
        self.pointer_mode = mode;
        self.interaction_radius = radius;
        self.pointer_strength = strength;
        self
    }

    pub fn with_spawn_probability(mut self, probability: f64) -> Self {
        self.spawn_probability = probability;
        self
    }

    pub fn with_packet_speed(mut self, min: f32, max: f32) -> Self {
        self.packet_speed = Span::new(min, max);
        self
    }

    pub fn with_max_packets(mut self, max: Option<usize>) -> Self {
        self.max_packets = max;
        self
    }

    pub fn with_colors(mut self, colors: NetworkColors) -> Self {
        self.colors = colors;
        self
    }

    // =========================================================================
    // VALIDATION & PERSISTENCE
    // =========================================================================

    /// Reject values that would divide by zero or sample from an empty range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.particle_count == 0 {
            return Err(invalid("particle_count must be at least 1"));
        }
        if !(self.connection_distance > 0.0) {
            return Err(invalid("connection_distance must be positive"));
        }
        if !(self.interaction_radius > 0.0) {
            return Err(invalid("interaction_radius must be positive"));
        }
        if !(0.0..=1.0).contains(&self.spawn_probability) {
            return Err(invalid("spawn_probability must be within [0, 1]"));
        }
        if self.max_velocity < 0.0 {
            return Err(invalid("max_velocity must not be negative"));
        }
        if self.particle_size.min <= 0.0 || self.particle_size.max < self.particle_size.min {
            return Err(invalid("particle_size must be a positive, non-empty range"));
        }
        if self.packet_speed.min <= 0.0 || self.packet_speed.max < self.packet_speed.min {
            return Err(invalid("packet_speed must be a positive, non-empty range"));
        }
        if !(0.0..=1.0).contains(&self.link_opacity) {
            return Err(invalid("link_opacity must be within [0, 1]"));
        }
        Ok(())
    }

    /// Save the configuration to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Load and validate a configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }
}

fn invalid(msg: &str) -> ConfigError {
    ConfigError::Invalid(msg.to_string())
}
