//! One mounted animation: field, links, packets and the input they read.
//!
//! A tick is a single synchronous pass:
//!
//! 1. clear to the background color
//! 2. roll for a new packet
//! 3. advance particles (reflection, pointer push)
//! 4. draw particles
//! 5. draw the links of the fresh proximity graph
//! 6. advance, prune and draw packets
//!
//! Packets spawned in step 2 are advanced in step 6 of the same tick, so they
//! first appear at `progress == speed`.

use glam::Vec2;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::canvas::Canvas;
use crate::config::{NetworkColors, NetworkConfig};
use crate::field::ParticleField;
use crate::graph::ProximityGraph;
use crate::input::Pointer;
use crate::packet::PacketSimulator;

/// Counters describing the last tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickStats {
    pub spawned: bool,
    pub links: usize,
    pub packets: usize,
    pub packets_removed: usize,
}

/// The full state of one mounted animation.
///
/// `R` drives every simulation decision (initial layout, spawn rolls, packet
/// speeds). Flicker uses a second generator seeded from `R`, so seeding `R`
/// makes the whole scene reproducible.
#[derive(Debug)]
pub struct Scene<R: Rng = SmallRng> {
    config: NetworkConfig,
    field: ParticleField,
    packets: PacketSimulator,
    pointer: Pointer,
    rng: R,
    flicker_rng: SmallRng,
    frame: u64,
}

impl<R: Rng> Scene<R> {
    /// Scatter a new field over a surface of `size`.
    pub fn new(config: NetworkConfig, size: Vec2, mut rng: R) -> Self {
        let field = ParticleField::initialize(&config, size, &mut rng);
        log::debug!(
            "scene initialized: {} particles on {}x{}",
            field.len(),
            size.x,
            size.y
        );
        Self::with_field(config, field, rng)
    }

    /// Use an explicit particle layout instead of a random one.
    pub fn with_field(config: NetworkConfig, field: ParticleField, mut rng: R) -> Self {
        let flicker_rng = SmallRng::seed_from_u64(rng.gen());
        Self {
            config,
            field,
            packets: PacketSimulator::new(),
            pointer: Pointer::FAR_AWAY,
            rng,
            flicker_rng,
            frame: 0,
        }
    }

    /// Run one frame and draw it.
    pub fn tick<C: Canvas + ?Sized>(&mut self, canvas: &mut C) -> TickStats {
        let config = &self.config;
        canvas.clear(NetworkColors::rgba(config.colors.background, 1.0));

        let spawned = self.packets.maybe_spawn(self.field.particles(), config, &mut self.rng);
        self.field.advance(self.pointer.position(), config);
        self.field.render(canvas, &mut self.flicker_rng, config);

        let links = ProximityGraph::new(self.field.particles(), config.connection_distance)
            .render(canvas, config);
        let packets_removed = self
            .packets
            .advance_and_render(self.field.particles(), config, canvas);

        self.frame += 1;
        TickStats {
            spawned,
            links,
            packets: self.packets.len(),
            packets_removed,
        }
    }

    /// Run one frame without drawing.
    pub fn step(&mut self) -> TickStats {
        let config = &self.config;
        let spawned = self.packets.maybe_spawn(self.field.particles(), config, &mut self.rng);
        self.field.advance(self.pointer.position(), config);
        let packets_removed = self.packets.advance(self.field.particles(), config.connection_distance);

        self.frame += 1;
        TickStats {
            spawned,
            links: 0,
            packets: self.packets.len(),
            packets_removed,
        }
    }

    /// Pointer moved to `position` (surface-local).
    pub fn set_pointer(&mut self, position: Vec2) {
        self.pointer.move_to(position);
    }

    pub fn clear_pointer(&mut self) {
        self.pointer.reset();
    }

    /// Surface changed size.
    pub fn resize(&mut self, size: Vec2) {
        log::debug!("scene resized to {}x{}", size.x, size.y);
        self.field.resize(size);
    }

    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    pub fn field(&self) -> &ParticleField {
        &self.field
    }

    pub fn packets(&self) -> &PacketSimulator {
        &self.packets
    }

    pub fn packets_mut(&mut self) -> &mut PacketSimulator {
        &mut self.packets
    }

    pub fn pointer(&self) -> Pointer {
        self.pointer
    }

    pub fn size(&self) -> Vec2 {
        self.field.size()
    }

    /// Ticks run so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{DrawCommand, DrawList};
    use crate::config::PointerMode;
    use crate::particle::Particle;
    use glam::{Vec3, Vec4};
    use rand::rngs::StdRng;

    fn seeded(config: NetworkConfig, seed: u64) -> Scene<StdRng> {
        Scene::new(config, Vec2::new(800.0, 600.0), StdRng::seed_from_u64(seed))
    }

    #[test]
    fn test_tick_draw_order() {
        let config = NetworkConfig::attract().with_spawn_probability(0.0);
        let mut scene = seeded(config.clone(), 5);
        let mut list = DrawList::new();
        scene.tick(&mut list);

        assert!(matches!(list.commands()[0], DrawCommand::Clear(_)));
        let circles = &list.commands()[1..=config.particle_count];
        assert!(circles.iter().all(|c| matches!(c, DrawCommand::Circle { .. })));
        assert!(list.commands()[config.particle_count + 1..]
            .iter()
            .all(|c| matches!(c, DrawCommand::Line { .. })));
        assert_eq!(scene.frame(), 1);
    }

    #[test]
    fn test_same_seed_same_scene() {
        let mut a = seeded(NetworkConfig::repel(), 99);
        let mut b = seeded(NetworkConfig::repel(), 99);
        let mut list_a = DrawList::new();
        let mut list_b = DrawList::new();
        for _ in 0..200 {
            list_a.reset();
            list_b.reset();
            a.tick(&mut list_a);
            b.tick(&mut list_b);
        }
        assert_eq!(a.field().particles(), b.field().particles());
        assert_eq!(a.packets().packets(), b.packets().packets());
        assert_eq!(list_a.commands(), list_b.commands());
    }

    #[test]
    fn test_step_matches_tick_physics() {
        let mut drawn = seeded(NetworkConfig::attract(), 21);
        let mut headless = seeded(NetworkConfig::attract(), 21);
        let mut list = DrawList::new();
        for _ in 0..100 {
            list.reset();
            drawn.tick(&mut list);
            headless.step();
        }
        assert_eq!(drawn.field().particles(), headless.field().particles());
        assert_eq!(drawn.packets().packets(), headless.packets().packets());
    }

    #[test]
    fn test_fresh_packet_drawn_after_first_advance() {
        let config = NetworkConfig::attract()
            .with_spawn_probability(1.0)
            .with_packet_speed(0.05, 0.05)
            .with_pointer(PointerMode::None, 150.0, 0.02);
        let field = ParticleField::from_particles(
            vec![Particle::at(100.0, 100.0), Particle::at(140.0, 100.0)],
            Vec2::new(400.0, 400.0),
        );
        let mut scene = Scene::with_field(config, field, StdRng::seed_from_u64(8));

        let mut list = DrawList::new();
        let stats = scene.tick(&mut list);
        assert!(stats.spawned);
        assert_eq!(stats.packets, 1);
        assert_eq!(scene.packets().packets()[0].progress, 0.05);
        assert_eq!(list.glow_count(), 1);
    }

    #[test]
    fn test_custom_colors_reach_the_canvas() {
        let colors = NetworkColors {
            background: [1.0, 0.0, 0.0],
            particle: [0.0, 1.0, 0.0],
            link: [0.0, 0.0, 1.0],
            packet: [1.0, 1.0, 0.0],
        };
        let config = NetworkConfig::attract().with_colors(colors).with_spawn_probability(0.0);
        let mut scene = seeded(config, 6);
        let mut list = DrawList::new();
        scene.tick(&mut list);

        assert_eq!(list.clear_color(), Some(Vec4::new(1.0, 0.0, 0.0, 1.0)));
        for cmd in list.commands() {
            match cmd {
                DrawCommand::Circle { color, .. } => assert_eq!(color.truncate(), Vec3::new(0.0, 1.0, 0.0)),
                DrawCommand::Line { color, .. } => assert_eq!(color.truncate(), Vec3::new(0.0, 0.0, 1.0)),
                _ => {}
            }
        }
    }

    #[test]
    fn test_tick_survives_out_of_range_spawn_probability() {
        let config = NetworkConfig::attract().with_spawn_probability(1.5);
        let field = ParticleField::from_particles(
            vec![Particle::at(100.0, 100.0), Particle::at(150.0, 100.0)],
            Vec2::new(400.0, 400.0),
        );
        let mut scene = Scene::with_field(config, field, StdRng::seed_from_u64(10));

        let mut list = DrawList::new();
        assert!(scene.tick(&mut list).spawned);
    }

    #[test]
    fn test_pointer_and_resize_reach_the_field() {
        let mut scene = seeded(NetworkConfig::attract(), 2);
        assert_eq!(scene.pointer(), Pointer::FAR_AWAY);

        scene.set_pointer(Vec2::new(10.0, 10.0));
        assert_eq!(scene.pointer().position(), Some(Vec2::new(10.0, 10.0)));
        scene.clear_pointer();
        assert_eq!(scene.pointer().position(), None);

        scene.resize(Vec2::new(1024.0, 768.0));
        assert_eq!(scene.size(), Vec2::new(1024.0, 768.0));
    }
}
