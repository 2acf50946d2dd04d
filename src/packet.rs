//! Data packets travelling along live links.
//!
//! A packet references its two particles by index and never owns them. It
//! moves from `from` to `to` by `speed` progress per frame and disappears
//! when it arrives (`progress >= 1.0`) or when its two particles drift apart
//! beyond the connection threshold. Neither case is reported anywhere; the
//! pulse simply stops being drawn.

use glam::Vec2;
use rand::Rng;

use crate::canvas::Canvas;
use crate::config::{NetworkColors, NetworkConfig};
use crate::graph::ProximityGraph;
use crate::particle::Particle;

/// One pulse in flight.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Packet {
    pub from: usize,
    pub to: usize,
    /// Fraction of the link already travelled, in `[0, 1)` while alive.
    pub progress: f32,
    pub speed: f32,
}

impl Packet {
    pub fn new(from: usize, to: usize, speed: f32) -> Self {
        Self { from, to, progress: 0.0, speed }
    }
}

/// The live packet collection.
#[derive(Clone, Debug, Default)]
pub struct PacketSimulator {
    packets: Vec<Packet>,
}

impl PacketSimulator {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn packets(&self) -> &[Packet] {
        &self.packets
    }

    pub fn len(&self) -> usize {
        self.packets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packets.is_empty()
    }

    /// Insert a packet directly, bypassing the spawn roll.
    pub fn push(&mut self, packet: Packet) {
        self.packets.push(packet);
    }

    pub fn clear(&mut self) {
        self.packets.clear();
    }

    /// Roll the per-frame spawn chance and, on success, launch a packet from
    /// a random particle toward its nearest linked neighbor.
    ///
    /// Returns `true` if a packet was created. A successful roll on a
    /// particle without neighbors creates nothing.
    pub fn maybe_spawn<R: Rng + ?Sized>(
        &mut self,
        particles: &[Particle],
        config: &NetworkConfig,
        rng: &mut R,
    ) -> bool {
        if particles.is_empty() || !roll(config.spawn_probability, rng) {
            return false;
        }
        if config.max_packets.is_some_and(|max| self.packets.len() >= max) {
            return false;
        }

        let source = rng.gen_range(0..particles.len());
        let graph = ProximityGraph::new(particles, config.connection_distance);
        let Some(target) = graph.nearest_neighbor_within(source) else {
            return false;
        };

        let speed = config.packet_speed.sample(rng);
        self.packets.push(Packet::new(source, target, speed));
        log::trace!("packet spawned {} -> {} (speed {:.3})", source, target, speed);
        true
    }

    /// Advance every packet and drop arrivals and broken links.
    ///
    /// Returns the number of packets removed.
    pub fn advance(&mut self, particles: &[Particle], threshold: f32) -> usize {
        self.sweep(particles, threshold, |_| {})
    }

    /// [`PacketSimulator::advance`], drawing every surviving packet.
    pub fn advance_and_render<C: Canvas + ?Sized>(
        &mut self,
        particles: &[Particle],
        config: &NetworkConfig,
        canvas: &mut C,
    ) -> usize {
        let color = NetworkColors::rgba(config.colors.packet, 1.0);
        self.sweep(particles, config.connection_distance, |position| {
            canvas.glow(position, config.packet_radius, config.packet_glow, color);
        })
    }

    fn sweep<F: FnMut(Vec2)>(&mut self, particles: &[Particle], threshold: f32, mut on_live: F) -> usize {
        let before = self.packets.len();
        self.packets.retain_mut(|packet| {
            packet.progress += packet.speed;
            if packet.progress >= 1.0 {
                return false;
            }

            let (Some(from), Some(to)) = (particles.get(packet.from), particles.get(packet.to)) else {
                return false;
            };
            if from.distance(to) > threshold {
                return false;
            }

            on_live(from.position.lerp(to.position, packet.progress));
            true
        });
        before - self.packets.len()
    }
}

/// Bernoulli trial that treats probabilities outside `[0, 1]` as the
/// nearest bound and NaN as zero.
fn roll<R: Rng + ?Sized>(probability: f64, rng: &mut R) -> bool {
    if probability.is_nan() {
        return false;
    }
    rng.gen_bool(probability.clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::DrawList;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn pair(distance: f32) -> Vec<Particle> {
        vec![Particle::at(100.0, 100.0), Particle::at(100.0 + distance, 100.0)]
    }

    #[test]
    fn test_spawn_always_with_probability_one() {
        let config = NetworkConfig::attract().with_spawn_probability(1.0);
        let mut rng = StdRng::seed_from_u64(11);
        let mut sim = PacketSimulator::new();

        assert!(sim.maybe_spawn(&pair(50.0), &config, &mut rng));
        let packet = sim.packets()[0];
        assert_eq!(packet.progress, 0.0);
        assert_ne!(packet.from, packet.to);
        assert!(config.packet_speed.contains(packet.speed));
    }

    #[test]
    fn test_spawn_never_with_probability_zero() {
        let config = NetworkConfig::attract().with_spawn_probability(0.0);
        let mut rng = StdRng::seed_from_u64(12);
        let mut sim = PacketSimulator::new();
        for _ in 0..1000 {
            assert!(!sim.maybe_spawn(&pair(50.0), &config, &mut rng));
        }
        assert!(sim.is_empty());
    }

    #[test]
    fn test_spawn_probability_out_of_range_is_clamped() {
        let mut rng = StdRng::seed_from_u64(15);
        let mut sim = PacketSimulator::new();

        let always = NetworkConfig::attract().with_spawn_probability(1.5);
        assert!(sim.maybe_spawn(&pair(50.0), &always, &mut rng));

        for probability in [-0.5, f64::NAN] {
            let never = NetworkConfig::attract().with_spawn_probability(probability);
            for _ in 0..100 {
                assert!(!sim.maybe_spawn(&pair(50.0), &never, &mut rng));
            }
        }
        assert_eq!(sim.len(), 1);
    }

    #[test]
    fn test_spawn_skipped_without_neighbor() {
        let config = NetworkConfig::attract().with_spawn_probability(1.0);
        let mut rng = StdRng::seed_from_u64(13);
        let mut sim = PacketSimulator::new();
        assert!(!sim.maybe_spawn(&pair(400.0), &config, &mut rng));
        assert!(!sim.maybe_spawn(&[], &config, &mut rng));
        assert!(sim.is_empty());
    }

    #[test]
    fn test_spawn_respects_cap() {
        let config = NetworkConfig::attract()
            .with_spawn_probability(1.0)
            .with_max_packets(Some(2));
        let mut rng = StdRng::seed_from_u64(14);
        let mut sim = PacketSimulator::new();
        for _ in 0..10 {
            sim.maybe_spawn(&pair(50.0), &config, &mut rng);
        }
        assert_eq!(sim.len(), 2);
    }

    #[test]
    fn test_packet_arrives_after_expected_ticks() {
        let particles = pair(50.0);
        let mut sim = PacketSimulator::new();
        sim.push(Packet::new(0, 1, 0.05));

        for tick in 1..20 {
            sim.advance(&particles, 180.0);
            assert_eq!(sim.len(), 1, "packet vanished early at tick {}", tick);
        }
        assert_eq!(sim.advance(&particles, 180.0), 1);
        assert!(sim.is_empty());
    }

    #[test]
    fn test_broken_link_drops_packet() {
        let mut particles = pair(50.0);
        let mut sim = PacketSimulator::new();
        sim.push(Packet::new(0, 1, 0.02));
        sim.advance(&particles, 180.0);
        assert_eq!(sim.len(), 1);

        particles[1].position.x = 100.0 + 181.0;
        assert_eq!(sim.advance(&particles, 180.0), 1);
        assert!(sim.is_empty());
    }

    #[test]
    fn test_dangling_index_drops_packet() {
        let particles = pair(50.0);
        let mut sim = PacketSimulator::new();
        sim.push(Packet::new(0, 7, 0.02));
        assert_eq!(sim.advance(&particles, 180.0), 1);
    }

    #[test]
    fn test_removal_keeps_survivors_in_order() {
        let particles = vec![Particle::at(0.0, 0.0), Particle::at(10.0, 0.0), Particle::at(20.0, 0.0)];
        let mut sim = PacketSimulator::new();
        sim.push(Packet { from: 0, to: 1, progress: 0.99, speed: 0.05 });
        sim.push(Packet::new(1, 2, 0.02));
        sim.push(Packet { from: 2, to: 1, progress: 0.98, speed: 0.05 });
        sim.push(Packet::new(2, 0, 0.03));

        assert_eq!(sim.advance(&particles, 180.0), 2);
        let survivors: Vec<(usize, usize)> = sim.packets().iter().map(|p| (p.from, p.to)).collect();
        assert_eq!(survivors, vec![(1, 2), (2, 0)]);
    }

    #[test]
    fn test_render_interpolates_position() {
        let particles = pair(100.0);
        let config = NetworkConfig::attract();
        let mut sim = PacketSimulator::new();
        sim.push(Packet { from: 0, to: 1, progress: 0.2, speed: 0.05 });

        let mut list = DrawList::new();
        sim.advance_and_render(&particles, &config, &mut list);

        assert_eq!(list.glow_count(), 1);
        match list.commands()[0] {
            crate::canvas::DrawCommand::Glow { center, .. } => {
                assert!((center.x - 125.0).abs() < 1e-3);
                assert!((center.y - 100.0).abs() < 1e-6);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
