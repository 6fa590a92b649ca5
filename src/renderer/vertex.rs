//! Vertex and color types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position (surface pixels) and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }
}

/// Opaque color from a 0xRRGGBB literal
pub const fn rgb(hex: u32) -> [f32; 4] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
        1.0,
    ]
}

/// Linear blend between two colors
#[inline]
pub fn mix(a: [f32; 4], b: [f32; 4], t: f32) -> [f32; 4] {
    let t = t.clamp(0.0, 1.0);
    [
        a[0] + (b[0] - a[0]) * t,
        a[1] + (b[1] - a[1]) * t,
        a[2] + (b[2] - a[2]) * t,
        a[3] + (b[3] - a[3]) * t,
    ]
}

/// Colors for wheel elements
pub mod colors {
    use super::rgb;

    /// Segment fills: (gradient outer stop, outline)
    pub const PALETTE: [([f32; 4], [f32; 4]); 5] = [
        (rgb(0x0c4a6e), rgb(0x0ea5e9)), // Sky
        (rgb(0x701a75), rgb(0xd946ef)), // Fuchsia
        (rgb(0x312e81), rgb(0x6366f1)), // Indigo
        (rgb(0x064e3b), rgb(0x10b981)), // Emerald
        (rgb(0x7c2d12), rgb(0xf97316)), // Orange
    ];
    /// Gradient inner stop (hub)
    pub const HUB: [f32; 4] = rgb(0x0f172a);
    pub const BORDER: [f32; 4] = rgb(0x22d3ee);
    pub const EMPTY_RING: [f32; 4] = rgb(0x1e293b);
    pub const LABEL: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const LABEL_SHADOW: [f32; 4] = [0.0, 0.0, 0.0, 0.85];
    /// Page background (#020617)
    pub const BACKGROUND: [f32; 4] = rgb(0x020617);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_literal() {
        assert_eq!(rgb(0xff0000), [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(rgb(0x000000), [0.0, 0.0, 0.0, 1.0]);
        assert!((colors::BORDER[1] - 211.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn test_mix_clamps() {
        let a = [0.0, 0.0, 0.0, 1.0];
        let b = [1.0, 0.5, 0.0, 1.0];
        assert_eq!(mix(a, b, 0.5), [0.5, 0.25, 0.0, 1.0]);
        assert_eq!(mix(a, b, 2.0), b);
        assert_eq!(mix(a, b, -1.0), a);
    }
}
