//! # neuralbg - Neural Network Background
//!
//! An animated "neural network" backdrop: drifting particles, links between
//! nearby particles that fade with distance, and glowing packets that travel
//! along those links.
//!
//! The simulation is plain CPU code that draws into any [`Canvas`]. The
//! bundled window host records frames into a [`DrawList`] and renders them
//! with wgpu.
//!
//! ## Quick Start
//!
//! ```ignore
//! use neuralbg::prelude::*;
//!
//! fn main() -> Result<(), RunError> {
//!     neuralbg::run(NetworkConfig::attract().with_particle_count(120), None)
//! }
//! ```
//!
//! ## Headless
//!
//! [`Scene`] runs without a window. Seed the generator for reproducible
//! frames:
//!
//! ```
//! use neuralbg::prelude::*;
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let mut scene = Scene::new(NetworkConfig::repel(), Vec2::new(800.0, 600.0), StdRng::seed_from_u64(7));
//! let mut frame = DrawList::new();
//!
//! for _ in 0..60 {
//!     frame.reset();
//!     scene.tick(&mut frame);
//! }
//! assert_eq!(frame.circle_count(), scene.field().len());
//! ```
//!
//! ## Frame Order
//!
//! Each tick clears the surface, maybe spawns a packet, advances and draws
//! particles, draws the proximity links, then advances and draws packets.
//! Links and packet validity are always computed from the positions of the
//! current tick.
//!
//! ## Lifecycle
//!
//! [`Animator`] mounts a scene on a host that implements [`FrameScheduler`]
//! and owns every registration it makes, so [`Animator::stop`] (or dropping
//! the animator) releases the frame request and both input listeners.

pub mod canvas;
pub mod config;
pub mod error;
pub mod field;
mod gpu;
pub mod graph;
pub mod input;
pub mod lifecycle;
pub mod packet;
pub mod particle;
pub mod scene;
pub mod time;
mod window;

pub use canvas::{Canvas, DrawCommand, DrawList, Vertex};
pub use config::{NetworkColors, NetworkConfig, PointerMode, Span};
pub use error::{ConfigError, GpuError, RunError};
pub use field::ParticleField;
pub use glam::{Vec2, Vec4};
pub use graph::{Edge, ProximityGraph};
pub use input::Pointer;
pub use lifecycle::{Animator, FrameRequest, FrameScheduler, ListenerId, Signal};
pub use packet::{Packet, PacketSimulator};
pub use particle::Particle;
pub use scene::{Scene, TickStats};
pub use time::FrameClock;
pub use window::{run, App, WinitScheduler};

/// Convenient re-exports for common usage.
pub mod prelude {
    pub use crate::canvas::{Canvas, DrawList};
    pub use crate::config::{NetworkColors, NetworkConfig, PointerMode};
    pub use crate::error::RunError;
    pub use crate::lifecycle::{Animator, FrameScheduler, Signal};
    pub use crate::scene::Scene;
    pub use crate::{Vec2, Vec4};
}
