//! Proximity graph between particles.
//!
//! The graph is never stored. A [`ProximityGraph`] is a borrowed view over
//! the current particle positions, built fresh every frame, and every query
//! scans all pairs. For the few dozen particles of a background this is
//! cheaper than maintaining a spatial index, and it keeps the connection and
//! tie-breaking rules exact:
//!
//! - two particles are linked when their distance is strictly below the
//!   threshold
//! - the nearest neighbor scan runs in ascending index order and only
//!   replaces its candidate on a strictly smaller distance, so the lowest
//!   index wins a tie

use crate::canvas::Canvas;
use crate::config::{NetworkColors, NetworkConfig};
use crate::particle::Particle;

/// A link between two particles, `a < b`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Edge {
    pub a: usize,
    pub b: usize,
    pub distance: f32,
    /// Stroke opacity, highest for the closest pairs.
    pub opacity: f32,
}

/// Per-frame view over particle positions.
#[derive(Clone, Copy, Debug)]
pub struct ProximityGraph<'a> {
    particles: &'a [Particle],
    threshold: f32,
}

impl<'a> ProximityGraph<'a> {
    pub fn new(particles: &'a [Particle], threshold: f32) -> Self {
        Self { particles, threshold }
    }

    /// All linked pairs, in `(a, b)` lexicographic order.
    pub fn edges(&self, max_opacity: f32) -> impl Iterator<Item = Edge> + 'a {
        let particles = self.particles;
        let threshold = self.threshold;
        (0..particles.len()).flat_map(move |a| {
            (a + 1..particles.len()).filter_map(move |b| {
                let distance = particles[a].distance(&particles[b]);
                (distance < threshold).then(|| Edge {
                    a,
                    b,
                    distance,
                    opacity: link_opacity(distance, threshold, max_opacity),
                })
            })
        })
    }

    /// Whether `a` and `b` are currently linked.
    pub fn connected(&self, a: usize, b: usize) -> bool {
        match (self.particles.get(a), self.particles.get(b)) {
            (Some(pa), Some(pb)) if a != b => pa.distance(pb) < self.threshold,
            _ => false,
        }
    }

    /// Closest other particle within the threshold, lowest index on ties.
    pub fn nearest_neighbor_within(&self, index: usize) -> Option<usize> {
        let origin = self.particles.get(index)?;
        let mut best: Option<(usize, f32)> = None;

        for (j, other) in self.particles.iter().enumerate() {
            if j == index {
                continue;
            }
            let distance = origin.distance(other);
            let closer = match best {
                Some((_, best_distance)) => distance < best_distance,
                None => distance < self.threshold,
            };
            if closer {
                best = Some((j, distance));
            }
        }

        best.map(|(j, _)| j)
    }

    /// Stroke every link. Returns the number of links drawn.
    pub fn render<C: Canvas + ?Sized>(&self, canvas: &mut C, config: &NetworkConfig) -> usize {
        let mut drawn = 0;
        for edge in self.edges(config.link_opacity) {
            canvas.stroke_line(
                self.particles[edge.a].position,
                self.particles[edge.b].position,
                config.link_width,
                NetworkColors::rgba(config.colors.link, edge.opacity),
            );
            drawn += 1;
        }
        drawn
    }
}

/// Link opacity falling linearly from `max_opacity` at distance zero to
/// nothing at the threshold.
#[inline]
pub fn link_opacity(distance: f32, threshold: f32, max_opacity: f32) -> f32 {
    (max_opacity * (1.0 - distance / threshold)).clamp(0.0, max_opacity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::DrawList;

    #[test]
    fn test_pair_within_threshold_links() {
        let particles = [Particle::at(0.0, 0.0), Particle::at(50.0, 0.0)];
        let graph = ProximityGraph::new(&particles, 180.0);
        let edges: Vec<Edge> = graph.edges(1.0).collect();

        assert_eq!(edges.len(), 1);
        assert_eq!((edges[0].a, edges[0].b), (0, 1));
        assert!((edges[0].distance - 50.0).abs() < 1e-5);
    }

    #[test]
    fn test_pair_at_threshold_does_not_link() {
        let particles = [Particle::at(0.0, 0.0), Particle::at(180.0, 0.0)];
        let graph = ProximityGraph::new(&particles, 180.0);
        assert_eq!(graph.edges(1.0).count(), 0);
        assert!(!graph.connected(0, 1));
    }

    #[test]
    fn test_edges_cover_all_pairs() {
        let particles = [
            Particle::at(0.0, 0.0),
            Particle::at(10.0, 0.0),
            Particle::at(0.0, 10.0),
            Particle::at(500.0, 500.0),
        ];
        let graph = ProximityGraph::new(&particles, 100.0);
        let pairs: Vec<(usize, usize)> = graph.edges(1.0).map(|e| (e.a, e.b)).collect();
        assert_eq!(pairs, vec![(0, 1), (0, 2), (1, 2)]);
    }

    #[test]
    fn test_link_opacity_falloff() {
        assert_eq!(link_opacity(0.0, 100.0, 0.5), 0.5);
        assert!((link_opacity(50.0, 100.0, 0.5) - 0.25).abs() < 1e-6);
        assert_eq!(link_opacity(100.0, 100.0, 0.5), 0.0);
        assert_eq!(link_opacity(150.0, 100.0, 0.5), 0.0);
    }

    #[test]
    fn test_nearest_none_when_all_far() {
        let particles = [Particle::at(0.0, 0.0), Particle::at(300.0, 0.0), Particle::at(0.0, 400.0)];
        let graph = ProximityGraph::new(&particles, 180.0);
        assert_eq!(graph.nearest_neighbor_within(0), None);
    }

    #[test]
    fn test_nearest_picks_unique_minimum() {
        let particles = [
            Particle::at(0.0, 0.0),
            Particle::at(120.0, 0.0),
            Particle::at(0.0, 40.0),
            Particle::at(90.0, 90.0),
        ];
        let graph = ProximityGraph::new(&particles, 180.0);
        assert_eq!(graph.nearest_neighbor_within(0), Some(2));
        assert_eq!(graph.nearest_neighbor_within(2), Some(0));
    }

    #[test]
    fn test_nearest_tie_goes_to_lowest_index() {
        let particles = [
            Particle::at(100.0, 100.0),
            Particle::at(130.0, 100.0),
            Particle::at(70.0, 100.0),
            Particle::at(100.0, 130.0),
        ];
        let graph = ProximityGraph::new(&particles, 180.0);
        assert_eq!(graph.nearest_neighbor_within(0), Some(1));
    }

    #[test]
    fn test_nearest_out_of_range_index() {
        let particles = [Particle::at(0.0, 0.0)];
        let graph = ProximityGraph::new(&particles, 180.0);
        assert_eq!(graph.nearest_neighbor_within(5), None);
        assert_eq!(graph.nearest_neighbor_within(0), None);
    }

    #[test]
    fn test_render_strokes_each_edge() {
        let particles = [Particle::at(0.0, 0.0), Particle::at(30.0, 0.0), Particle::at(60.0, 0.0)];
        let config = NetworkConfig::attract();
        let mut list = DrawList::new();
        let drawn = ProximityGraph::new(&particles, config.connection_distance).render(&mut list, &config);

        assert_eq!(drawn, 3);
        assert_eq!(list.line_count(), 3);
    }
}
