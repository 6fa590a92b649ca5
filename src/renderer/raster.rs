//! Software rasterizer
//!
//! Fills triangle lists into an RGBA8 buffer with per-vertex color
//! interpolation and straight-alpha "source over" blending. Pure f32 math with
//! no threading, so the same draw calls always give the same bytes.

use glam::Vec2;

use super::surface::DrawSurface;
use super::vertex::Vertex;

/// RGBA8 pixel buffer, row-major, straight alpha
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Framebuffer {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

/// Signed doubled area of (a, b, p); positive when p is left of a->b in y-down space
#[inline]
fn edge(a: Vec2, b: Vec2, p: Vec2) -> f32 {
    (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x)
}

#[inline]
fn to_byte(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

impl Framebuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; (width as usize) * (height as usize) * 4],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA8 bytes (for texture upload)
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        ((y as usize) * (self.width as usize) + x as usize) * 4
    }

    /// RGBA at (x, y), or None outside the buffer
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = self.offset(x, y);
        Some([
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ])
    }

    /// Source-over blend of `color` onto (x, y)
    fn blend(&mut self, x: u32, y: u32, color: [f32; 4]) {
        let i = self.offset(x, y);
        let src_a = color[3].clamp(0.0, 1.0);
        if src_a <= 0.0 {
            return;
        }
        let dst = &mut self.pixels[i..i + 4];
        let dst_a = dst[3] as f32 / 255.0;
        let out_a = src_a + dst_a * (1.0 - src_a);

        for c in 0..3 {
            let d = dst[c] as f32 / 255.0;
            let blended = (color[c] * src_a + d * dst_a * (1.0 - src_a)) / out_a;
            dst[c] = to_byte(blended);
        }
        dst[3] = to_byte(out_a);
    }

    /// Rasterize one triangle, sampling at pixel centers
    fn fill_triangle(&mut self, v0: &Vertex, v1: &Vertex, v2: &Vertex) {
        let p0 = Vec2::from(v0.position);
        let p1 = Vec2::from(v1.position);
        let p2 = Vec2::from(v2.position);

        let area = edge(p0, p1, p2);
        if !area.is_finite() || area.abs() < f32::EPSILON {
            return;
        }

        let min = p0.min(p1).min(p2);
        let max = p0.max(p1).max(p2);
        let x0 = (min.x.floor() as i64).max(0);
        let y0 = (min.y.floor() as i64).max(0);
        let x1 = (max.x.ceil() as i64).min(self.width as i64 - 1);
        let y1 = (max.y.ceil() as i64).min(self.height as i64 - 1);
        if x0 > x1 || y0 > y1 {
            return;
        }

        for y in y0..=y1 {
            for x in x0..=x1 {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                // Dividing by the signed area makes the test winding-agnostic
                let w0 = edge(p1, p2, p) / area;
                let w1 = edge(p2, p0, p) / area;
                let w2 = edge(p0, p1, p) / area;
                if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                    continue;
                }

                let mut color = [0.0; 4];
                for (c, slot) in color.iter_mut().enumerate() {
                    *slot = v0.color[c] * w0 + v1.color[c] * w1 + v2.color[c] * w2;
                }
                self.blend(x as u32, y as u32, color);
            }
        }
    }

    /// Copy of this buffer rotated clockwise (on screen) by `degrees` about its
    /// center, nearest-neighbor sampled. Pixels that come from outside stay transparent.
    pub fn rotated(&self, degrees: f32) -> Framebuffer {
        let mut out = Framebuffer::new(self.width, self.height);
        let center = Vec2::new(self.width as f32 / 2.0, self.height as f32 / 2.0);
        let inverse = Vec2::from_angle(-degrees.to_radians());

        for y in 0..self.height {
            for x in 0..self.width {
                let dst = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let src = center + inverse.rotate(dst - center);
                if src.x < 0.0 || src.y < 0.0 {
                    continue;
                }
                if let Some(px) = self.pixel(src.x as u32, src.y as u32) {
                    let i = out.offset(x, y);
                    out.pixels[i..i + 4].copy_from_slice(&px);
                }
            }
        }
        out
    }

    /// Binary PPM (P6) with alpha composited over `background`
    pub fn to_ppm(&self, background: [f32; 4]) -> Vec<u8> {
        let mut out = format!("P6\n{} {}\n255\n", self.width, self.height).into_bytes();
        out.reserve((self.width as usize) * (self.height as usize) * 3);
        for px in self.pixels.chunks_exact(4) {
            let a = px[3] as f32 / 255.0;
            for c in 0..3 {
                let value = px[c] as f32 / 255.0 * a + background[c] * (1.0 - a);
                out.push(to_byte(value));
            }
        }
        out
    }
}

impl DrawSurface for Framebuffer {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn clear(&mut self) {
        self.pixels.fill(0);
    }

    fn fill_triangles(&mut self, vertices: &[Vertex]) {
        for tri in vertices.chunks_exact(3) {
            self.fill_triangle(&tri[0], &tri[1], &tri[2]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: [f32; 4] = [1.0, 0.0, 0.0, 1.0];

    fn square(size: f32, color: [f32; 4]) -> Vec<Vertex> {
        vec![
            Vertex::new(0.0, 0.0, color),
            Vertex::new(size, 0.0, color),
            Vertex::new(0.0, size, color),
            Vertex::new(0.0, size, color),
            Vertex::new(size, 0.0, color),
            Vertex::new(size, size, color),
        ]
    }

    #[test]
    fn test_new_buffer_is_transparent() {
        let fb = Framebuffer::new(4, 3);
        assert_eq!(fb.pixels().len(), 48);
        assert_eq!(fb.pixel(3, 2), Some([0, 0, 0, 0]));
        assert_eq!(fb.pixel(4, 0), None);
    }

    #[test]
    fn test_fill_covers_square() {
        let mut fb = Framebuffer::new(8, 8);
        fb.fill_triangles(&square(4.0, RED));
        assert_eq!(fb.pixel(0, 0), Some([255, 0, 0, 255]));
        assert_eq!(fb.pixel(3, 3), Some([255, 0, 0, 255]));
        assert_eq!(fb.pixel(4, 4), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_winding_does_not_matter() {
        let mut a = Framebuffer::new(8, 8);
        let mut b = Framebuffer::new(8, 8);
        let tri = square(6.0, RED);
        a.fill_triangles(&tri[..3]);
        b.fill_triangles(&[tri[0], tri[2], tri[1]]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_offscreen_triangles_are_clipped() {
        let mut fb = Framebuffer::new(4, 4);
        fb.fill_triangles(&[
            Vertex::new(-10.0, -10.0, RED),
            Vertex::new(-5.0, -10.0, RED),
            Vertex::new(-10.0, -5.0, RED),
        ]);
        assert!(fb.pixels().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_half_alpha_over_opaque() {
        let mut fb = Framebuffer::new(2, 2);
        fb.fill_triangles(&square(2.0, [0.0, 0.0, 1.0, 1.0]));
        fb.fill_triangles(&square(2.0, [1.0, 0.0, 0.0, 0.5]));
        assert_eq!(fb.pixel(1, 1), Some([128, 0, 128, 255]));
    }

    #[test]
    fn test_clear_resets() {
        let mut fb = Framebuffer::new(4, 4);
        fb.fill_triangles(&square(4.0, RED));
        fb.clear();
        assert_eq!(fb, Framebuffer::new(4, 4));
    }

    #[test]
    fn test_rotate_zero_is_identity() {
        let mut fb = Framebuffer::new(16, 16);
        fb.fill_triangles(&square(5.0, RED));
        assert_eq!(fb.rotated(0.0), fb);
    }

    #[test]
    fn test_rotate_half_turn_moves_corner() {
        let mut fb = Framebuffer::new(16, 16);
        fb.fill_triangles(&square(4.0, RED));
        let turned = fb.rotated(180.0);
        assert_eq!(turned.pixel(14, 14), Some([255, 0, 0, 255]));
        assert_eq!(turned.pixel(1, 1), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_ppm_header_and_size() {
        let fb = Framebuffer::new(3, 2);
        let ppm = fb.to_ppm([0.0, 0.0, 0.0, 1.0]);
        assert!(ppm.starts_with(b"P6\n3 2\n255\n"));
        assert_eq!(ppm.len(), "P6\n3 2\n255\n".len() + 18);
    }
}
