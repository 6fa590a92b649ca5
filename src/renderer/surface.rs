//! Drawing surfaces the wheel renderer paints onto

use super::vertex::Vertex;

/// Anything that can receive triangle lists in pixel coordinates (y down)
pub trait DrawSurface {
    /// Surface size in pixels (width, height)
    fn size(&self) -> (u32, u32);

    /// Reset every pixel to transparent
    fn clear(&mut self);

    /// Fill a triangle list (length must be a multiple of 3), blending over
    /// what is already there
    fn fill_triangles(&mut self, vertices: &[Vertex]);
}

/// Records draw calls instead of rasterizing them
#[derive(Debug, Clone, Default)]
pub struct DisplayList {
    pub width: u32,
    pub height: u32,
    pub vertices: Vec<Vertex>,
    /// Number of fill calls since the last clear
    pub batches: usize,
}

impl DisplayList {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }
}

impl DrawSurface for DisplayList {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn clear(&mut self) {
        self.vertices.clear();
        self.batches = 0;
    }

    fn fill_triangles(&mut self, vertices: &[Vertex]) {
        if vertices.is_empty() {
            return;
        }
        self.vertices.extend_from_slice(vertices);
        self.batches += 1;
    }
}
