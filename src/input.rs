//! Pointer input.
//!
//! The animation only cares about one input: where the pointer is, in
//! surface-local pixels. Before the first pointer event the pointer is
//! [`Pointer::FAR_AWAY`], which is outside every interaction radius.

use glam::Vec2;
use winit::dpi::{LogicalPosition, PhysicalPosition};

/// Last known pointer position relative to the drawing surface.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Pointer {
    position: Option<Vec2>,
}

impl Pointer {
    /// No pointer seen yet; never interacts with particles.
    pub const FAR_AWAY: Pointer = Pointer { position: None };

    /// Position, or `None` while far away.
    #[inline]
    pub fn position(&self) -> Option<Vec2> {
        self.position
    }

    pub fn move_to(&mut self, position: Vec2) {
        self.position = Some(position);
    }

    /// Forget the pointer, e.g. when it leaves the surface.
    pub fn reset(&mut self) {
        *self = Self::FAR_AWAY;
    }
}

/// Translate a client-space position into surface-local coordinates by
/// subtracting the surface's on-screen origin.
#[inline]
pub fn surface_local(client: Vec2, surface_origin: Vec2) -> Vec2 {
    client - surface_origin
}

/// Convert a winit cursor position (physical pixels, relative to the
/// window's client area) into logical pixels.
pub fn from_cursor(position: PhysicalPosition<f64>, scale_factor: f64) -> Vec2 {
    let logical: LogicalPosition<f64> = position.to_logical(scale_factor);
    Vec2::new(logical.x as f32, logical.y as f32)
}
