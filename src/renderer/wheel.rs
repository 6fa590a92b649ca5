//! Wheel painter
//!
//! Builds the static (unrotated) wheel as triangle batches and hands them to a
//! [`DrawSurface`]. Rotation is applied later by whoever presents the surface.

use glam::Vec2;

use super::glyphs::{self, GLYPH_ADVANCE, GLYPH_HEIGHT};
use super::shapes;
use super::surface::DrawSurface;
use super::vertex::{Vertex, colors};
use crate::consts::*;
use crate::entrant::Entrant;
use crate::settings::Settings;
use crate::spin::layout;

/// Screen-space offset of the label drop shadow
const SHADOW_OFFSET: Vec2 = Vec2::new(2.0, 2.0);

/// Paints wheels for a fixed label style
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelRenderer {
    pub label_max_chars: usize,
    pub dot_size: f32,
}

impl Default for WheelRenderer {
    fn default() -> Self {
        Self {
            label_max_chars: LABEL_MAX_CHARS,
            dot_size: LABEL_DOT_SIZE,
        }
    }
}

/// Label as drawn: the first `max_chars` characters, upper-cased
pub fn label_text(name: &str, max_chars: usize) -> String {
    name.chars().take(max_chars).collect::<String>().to_uppercase()
}

impl WheelRenderer {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            label_max_chars: settings.label_max_chars,
            ..Default::default()
        }
    }

    /// Paint the full wheel for `entrants` onto `surface`, replacing its contents
    pub fn paint(&self, entrants: &[Entrant], surface: &mut impl DrawSurface) {
        surface.clear();

        let (w, h) = surface.size();
        let half = w.min(h) as f32 / 2.0;
        let center = Vec2::new(w as f32 / 2.0, h as f32 / 2.0);
        let radius = (half - WHEEL_MARGIN).max(0.0);

        if entrants.is_empty() {
            let ring_radius = half - WHEEL_MARGIN;
            surface.fill_triangles(&shapes::ring(
                center,
                (ring_radius - EMPTY_RING_WIDTH / 2.0).max(0.0),
                (ring_radius + EMPTY_RING_WIDTH / 2.0).max(0.0),
                colors::EMPTY_RING,
            ));
            return;
        }

        let hub_radius = GRADIENT_INNER_RADIUS.min(radius);

        for segment in layout(entrants.len()) {
            let (dark, light) = colors::PALETTE[segment.index % colors::PALETTE.len()];
            let start = segment.start_angle;
            let span = segment.angular_width;

            // Fill: flat hub, then the radial gradient out to the rim
            surface.fill_triangles(&shapes::pie_slice(center, hub_radius, start, span, colors::HUB));
            surface.fill_triangles(&shapes::gradient_band(
                center,
                hub_radius,
                radius,
                start,
                span,
                colors::HUB,
                shapes::radial_gradient_at(radius, GRADIENT_INNER_RADIUS, half, colors::HUB, dark),
            ));

            // Outline: both radial edges and the rim
            let mut outline = Vec::new();
            for theta in [start, segment.end_angle()] {
                let rim = center + crate::polar_to_cartesian(radius, theta);
                outline.extend(shapes::line(center, rim, OUTLINE_WIDTH, light));
            }
            outline.extend(shapes::arc_band(
                center,
                radius - OUTLINE_WIDTH / 2.0,
                radius + OUTLINE_WIDTH / 2.0,
                start,
                span,
                light,
            ));
            surface.fill_triangles(&outline);

            let text = label_text(&entrants[segment.index].name, self.label_max_chars);
            let theta = segment.bisector();
            surface.fill_triangles(&self.label(center + SHADOW_OFFSET, half, theta, &text, colors::LABEL_SHADOW));
            surface.fill_triangles(&self.label(center, half, theta, &text, colors::LABEL));
        }

        surface.fill_triangles(&shapes::ring(center, (half - BORDER_WIDTH).max(0.0), half, colors::BORDER));
    }

    /// Text along the ray at `theta`, right-aligned to `half - LABEL_INSET`
    /// and centered across the ray
    fn label(&self, origin: Vec2, half: f32, theta: f32, text: &str, color: [f32; 4]) -> Vec<Vertex> {
        let dot = self.dot_size;
        let end = half - LABEL_INSET;
        let left = end - glyphs::text_width_dots(text) as f32 * dot;
        let top = -(GLYPH_HEIGHT as f32 * dot) / 2.0;

        let mut vertices = Vec::new();
        for (i, c) in text.chars().enumerate() {
            let pen = left + (i * GLYPH_ADVANCE) as f32 * dot;
            for (col, row) in glyphs::dots(c) {
                let local = Vec2::new(pen + col as f32 * dot, top + row as f32 * dot);
                vertices.extend(shapes::rotated_square(origin, local, dot, theta, color));
            }
        }
        vertices
    }
}
