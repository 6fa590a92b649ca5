//! Spin module
//!
//! Everything that decides where the wheel stops lives here. It must stay
//! deterministic given its inputs:
//! - Injected delta source only (no global RNG)
//! - Wall-clock timestamps supplied by the caller
//! - One pointer formula for ticks and for the winner
//! - No rendering or platform dependencies

pub mod delta;
pub mod engine;
pub mod frames;
pub mod layout;
pub mod pointer;

pub use delta::{DeltaSource, FixedDelta, RngDelta};
pub use engine::{SpinEngine, SpinPhase, SpinSession};
pub use frames::{FixedRateClock, FrameSource, run_until_idle};
pub use layout::{Segment, layout, segment_width};
pub use pointer::{ease_out_cubic, pointer_segment};
