//! Spin Wheel - a prize wheel with a deterministic spin engine
//!
//! Core modules:
//! - `spin`: Layout, pointer math and the frame-driven spin engine
//! - `renderer`: Wheel tessellation, software raster and WebGPU presentation
//! - `feedback`: Spin events and the sinks that consume them
//! - `entrant`: Entrants and the roster they are drawn from
//! - `persistence`: Roster save/load (LocalStorage + share URL)
//! - `settings`: Player preferences and spin tuning

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod entrant;
pub mod feedback;
pub mod persistence;
pub mod renderer;
pub mod settings;
pub mod spin;

pub use entrant::{Entrant, Roster};
pub use feedback::{FeedbackSink, LogFeedback, SpinEvent};
pub use settings::{Settings, SpinTuning};
pub use spin::{SpinEngine, SpinPhase};

use glam::Vec2;

/// Wheel configuration constants
pub mod consts {
    /// Pointer position in the wheel frame (degrees). Angle 0 is 3 o'clock and
    /// angles grow clockwise, so the top of the wheel is 270.
    pub const POINTER_DEGREES: f64 = 270.0;

    /// Spin defaults
    pub const SPIN_DURATION_MS: f64 = 5000.0;
    pub const MIN_EXTRA_TURNS: f64 = 8.0;
    pub const MAX_EXTRA_TURNS: f64 = 13.0;

    /// Canvas edge length the wheel is painted at (pixels)
    pub const WHEEL_CANVAS_SIZE: u32 = 1000;
    /// Gap between the segment rim and the canvas edge
    pub const WHEEL_MARGIN: f32 = 20.0;
    /// Radius where the segment gradient starts
    pub const GRADIENT_INNER_RADIUS: f32 = 100.0;
    /// Segment outline width
    pub const OUTLINE_WIDTH: f32 = 4.0;
    /// Outer border ring width
    pub const BORDER_WIDTH: f32 = 20.0;
    /// Placeholder ring width when there are no entrants
    pub const EMPTY_RING_WIDTH: f32 = 10.0;

    /// Labels end this far inside the canvas half-size
    pub const LABEL_INSET: f32 = 80.0;
    /// Maximum characters per label (longer names are truncated)
    pub const LABEL_MAX_CHARS: usize = 16;
    /// Bitmap font cell scale (pixels per font dot)
    pub const LABEL_DOT_SIZE: f32 = 4.0;

    /// Arc tessellation density
    pub const SEGMENTS_PER_RADIAN: f32 = 48.0;
}

/// Normalize degrees to [0, 360)
#[inline]
pub fn normalize_degrees(degrees: f64) -> f64 {
    let wrapped = degrees.rem_euclid(360.0);
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}
