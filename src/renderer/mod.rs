//! Wheel rendering
//!
//! The wheel is tessellated into triangles on the CPU, rasterized into a
//! [`Framebuffer`], and presented through WebGPU with the spin rotation as a
//! uniform transform.

pub mod glyphs;
pub mod pipeline;
pub mod raster;
pub mod shapes;
pub mod surface;
pub mod vertex;
pub mod wheel;

pub use pipeline::WheelRenderState;
pub use raster::Framebuffer;
pub use surface::{DisplayList, DrawSurface};
pub use vertex::{Vertex, colors};
pub use wheel::{WheelRenderer, label_text};
