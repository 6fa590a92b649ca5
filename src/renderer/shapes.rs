//! Shape generation for 2D primitives
//!
//! Every shape is emitted as a triangle list in surface pixel coordinates
//! (y down), so angles grow clockwise on screen.

use glam::Vec2;

use super::vertex::{Vertex, mix};
use crate::consts::SEGMENTS_PER_RADIAN;

/// Number of tessellation steps for an arc of `span` radians
#[inline]
fn arc_steps(span: f32) -> u32 {
    ((span.abs() * SEGMENTS_PER_RADIAN).ceil() as u32).max(2)
}

#[inline]
fn point(center: Vec2, r: f32, theta: f32) -> Vec2 {
    center + crate::polar_to_cartesian(r, theta)
}

/// Push a quad (a, b, c, d in winding order) as two triangles
fn push_quad(vertices: &mut Vec<Vertex>, corners: [(Vec2, [f32; 4]); 4]) {
    let [a, b, c, d] = corners;
    for (p, color) in [a, b, c, c, b, d] {
        vertices.push(Vertex::new(p.x, p.y, color));
    }
}

/// Filled pie slice from the center out to `radius`
pub fn pie_slice(
    center: Vec2,
    radius: f32,
    theta_start: f32,
    span: f32,
    color: [f32; 4],
) -> Vec<Vertex> {
    let steps = arc_steps(span);
    let mut vertices = Vec::with_capacity((steps * 3) as usize);

    for i in 0..steps {
        let theta1 = theta_start + span * (i as f32 / steps as f32);
        let theta2 = theta_start + span * ((i + 1) as f32 / steps as f32);
        let p1 = point(center, radius, theta1);
        let p2 = point(center, radius, theta2);

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(p1.x, p1.y, color));
        vertices.push(Vertex::new(p2.x, p2.y, color));
    }

    vertices
}

/// Annular band between two radii with a radial color ramp.
///
/// `inner_color` applies at `inner_radius` and `outer_color` at
/// `outer_radius`; the rasterizer interpolates between them, which is a radial
/// gradient along the band.
pub fn gradient_band(
    center: Vec2,
    inner_radius: f32,
    outer_radius: f32,
    theta_start: f32,
    span: f32,
    inner_color: [f32; 4],
    outer_color: [f32; 4],
) -> Vec<Vertex> {
    let steps = arc_steps(span);
    let mut vertices = Vec::with_capacity((steps * 6) as usize);

    for i in 0..steps {
        let theta1 = theta_start + span * (i as f32 / steps as f32);
        let theta2 = theta_start + span * ((i + 1) as f32 / steps as f32);

        push_quad(
            &mut vertices,
            [
                (point(center, inner_radius, theta1), inner_color),
                (point(center, outer_radius, theta1), outer_color),
                (point(center, inner_radius, theta2), inner_color),
                (point(center, outer_radius, theta2), outer_color),
            ],
        );
    }

    vertices
}

/// Solid arc band (thick arc stroke)
pub fn arc_band(
    center: Vec2,
    inner_radius: f32,
    outer_radius: f32,
    theta_start: f32,
    span: f32,
    color: [f32; 4],
) -> Vec<Vertex> {
    gradient_band(center, inner_radius, outer_radius, theta_start, span, color, color)
}

/// Full ring (hollow circle)
pub fn ring(center: Vec2, inner_radius: f32, outer_radius: f32, color: [f32; 4]) -> Vec<Vertex> {
    arc_band(center, inner_radius, outer_radius, 0.0, std::f32::consts::TAU, color)
}

/// Straight stroke of `width` pixels from `a` to `b`
pub fn line(a: Vec2, b: Vec2, width: f32, color: [f32; 4]) -> Vec<Vertex> {
    let dir = (b - a).normalize_or_zero();
    if dir == Vec2::ZERO {
        return Vec::new();
    }
    // Perpendicular for width
    let half = Vec2::new(-dir.y, dir.x) * (width / 2.0);

    let mut vertices = Vec::with_capacity(6);
    push_quad(
        &mut vertices,
        [(a + half, color), (a - half, color), (b + half, color), (b - half, color)],
    );
    vertices
}

/// Axis-aligned square in a rotated frame: `origin` plus `local` offsets
/// rotated by `theta`, `size` pixels on a side
pub fn rotated_square(origin: Vec2, local: Vec2, size: f32, theta: f32, color: [f32; 4]) -> Vec<Vertex> {
    let rot = Vec2::from_angle(theta);
    let corner = |x: f32, y: f32| origin + rot.rotate(local + Vec2::new(x, y));

    let mut vertices = Vec::with_capacity(6);
    push_quad(
        &mut vertices,
        [
            (corner(0.0, 0.0), color),
            (corner(size, 0.0), color),
            (corner(0.0, size), color),
            (corner(size, size), color),
        ],
    );
    vertices
}

/// Color of a radial gradient (from `r0` to `r1`) sampled at `r`
#[inline]
pub fn radial_gradient_at(r: f32, r0: f32, r1: f32, c0: [f32; 4], c1: [f32; 4]) -> [f32; 4] {
    if r1 <= r0 {
        return c1;
    }
    mix(c0, c1, (r - r0) / (r1 - r0))
}
