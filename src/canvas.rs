//! Drawing surface abstraction.
//!
//! The simulation never talks to the GPU directly. Each layer draws into a
//! [`Canvas`] in surface pixel coordinates (origin top-left, y down). The
//! [`DrawList`] canvas records the commands of one frame and tessellates them
//! into triangles for the wgpu renderer.
//!
//! # Tessellation
//!
//! Every shape becomes one quad (two triangles, six vertices). Each vertex
//! carries a `local` coordinate and a `softness`:
//!
//! - circles and glows use `local` in `[-1, 1]²`; the fragment shader drops
//!   fragments outside the unit circle and fades the outer `softness` band
//! - lines use `local = (0, 0)` everywhere, so they are drawn solid

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec4};

/// Anti-aliasing band for solid circles, in pixels.
const EDGE_FEATHER: f32 = 1.0;

/// A drawing surface in pixel coordinates. Colors are straight RGBA.
pub trait Canvas {
    /// Fill the whole surface.
    fn clear(&mut self, color: Vec4);
    /// Solid circle with an anti-aliased edge.
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Vec4);
    /// Straight line segment.
    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Vec4);
    /// Solid core of `radius` surrounded by a halo fading out over `blur`.
    fn glow(&mut self, center: Vec2, radius: f32, blur: f32, color: Vec4);
}

/// One recorded drawing operation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DrawCommand {
    Clear(Vec4),
    Circle { center: Vec2, radius: f32, color: Vec4 },
    Line { from: Vec2, to: Vec2, width: f32, color: Vec4 },
    Glow { center: Vec2, radius: f32, blur: f32, color: Vec4 },
}

/// Vertex layout consumed by the WGSL shader.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable, PartialEq)]
pub struct Vertex {
    /// Surface pixel position.
    pub position: [f32; 2],
    pub color: [f32; 4],
    /// Shape-local coordinate, unit circle for round shapes.
    pub local: [f32; 2],
    /// Width of the faded outer band, as a fraction of the radius.
    pub softness: f32,
}

/// Canvas that records one frame of commands.
#[derive(Debug, Default, Clone)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop all recorded commands, keeping the allocation.
    pub fn reset(&mut self) {
        self.commands.clear();
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Color of the last `Clear` command, if any.
    pub fn clear_color(&self) -> Option<Vec4> {
        self.commands.iter().rev().find_map(|cmd| match cmd {
            DrawCommand::Clear(color) => Some(*color),
            _ => None,
        })
    }

    /// Number of recorded lines.
    pub fn line_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|cmd| matches!(cmd, DrawCommand::Line { .. }))
            .count()
    }

    /// Number of recorded circles.
    pub fn circle_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|cmd| matches!(cmd, DrawCommand::Circle { .. }))
            .count()
    }

    /// Number of recorded glows.
    pub fn glow_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|cmd| matches!(cmd, DrawCommand::Glow { .. }))
            .count()
    }

    /// Append the triangles of every command to `out`.
    ///
    /// `Clear` produces no geometry; the renderer uses [`DrawList::clear_color`]
    /// as the render pass load color instead.
    pub fn tessellate(&self, out: &mut Vec<Vertex>) {
        for cmd in &self.commands {
            match *cmd {
                DrawCommand::Clear(_) => {}
                DrawCommand::Circle { center, radius, color } => {
                    let extent = radius + EDGE_FEATHER;
                    push_disc(out, center, extent, color, (2.0 * EDGE_FEATHER / extent).min(1.0));
                }
                DrawCommand::Line { from, to, width, color } => {
                    push_line(out, from, to, width, color);
                }
                DrawCommand::Glow { center, radius, blur, color } => {
                    let halo = radius + blur;
                    push_disc(out, center, halo, Vec4::new(color.x, color.y, color.z, color.w * 0.35), 1.0);
                    push_disc(out, center, radius + EDGE_FEATHER, color, (2.0 * EDGE_FEATHER / (radius + EDGE_FEATHER)).min(1.0));
                }
            }
        }
    }
}

impl Canvas for DrawList {
    fn clear(&mut self, color: Vec4) {
        self.commands.push(DrawCommand::Clear(color));
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Vec4) {
        self.commands.push(DrawCommand::Circle { center, radius, color });
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Vec4) {
        self.commands.push(DrawCommand::Line { from, to, width, color });
    }

    fn glow(&mut self, center: Vec2, radius: f32, blur: f32, color: Vec4) {
        self.commands.push(DrawCommand::Glow { center, radius, blur, color });
    }
}

fn push_disc(out: &mut Vec<Vertex>, center: Vec2, extent: f32, color: Vec4, softness: f32) {
    let corners = [
        Vec2::new(-1.0, -1.0),
        Vec2::new(1.0, -1.0),
        Vec2::new(-1.0, 1.0),
        Vec2::new(-1.0, 1.0),
        Vec2::new(1.0, -1.0),
        Vec2::new(1.0, 1.0),
    ];
    out.extend(corners.iter().map(|&local| Vertex {
        position: (center + local * extent).to_array(),
        color: color.to_array(),
        local: local.to_array(),
        softness,
    }));
}

fn push_line(out: &mut Vec<Vertex>, from: Vec2, to: Vec2, width: f32, color: Vec4) {
    let normal = (to - from).normalize_or_zero().perp() * (width * 0.5);
    if normal == Vec2::ZERO {
        return;
    }
    let quad = [from - normal, from + normal, to - normal, to - normal, from + normal, to + normal];
    out.extend(quad.iter().map(|p| Vertex {
        position: p.to_array(),
        color: color.to_array(),
        local: [0.0, 0.0],
        softness: 0.0,
    }));
}
