//! Frame scheduling
//!
//! The engine never schedules itself. A `FrameSource` hands out display
//! refresh timestamps (ms) and the host loop feeds them to `advance`. In the
//! browser that loop is `requestAnimationFrame`; tests and the native demo use
//! synthetic timestamps.

use super::delta::DeltaSource;
use super::engine::{SpinEngine, SpinPhase};
use crate::feedback::FeedbackSink;

/// Single-threaded tick source
pub trait FrameSource {
    /// Timestamp of the next frame, or None when the source is exhausted
    fn next_frame(&mut self) -> Option<f64>;
}

impl<I: Iterator<Item = f64>> FrameSource for I {
    fn next_frame(&mut self) -> Option<f64> {
        self.next()
    }
}

/// Evenly spaced synthetic frames (e.g. 60 Hz)
#[derive(Debug, Clone)]
pub struct FixedRateClock {
    now_ms: f64,
    interval_ms: f64,
}

impl FixedRateClock {
    pub fn new(start_ms: f64, interval_ms: f64) -> Self {
        Self {
            now_ms: start_ms,
            interval_ms: interval_ms.max(f64::EPSILON),
        }
    }

    /// Clock ticking at `hz` refreshes per second
    pub fn from_hz(start_ms: f64, hz: f64) -> Self {
        Self::new(start_ms, 1000.0 / hz)
    }

    /// Timestamp the next frame will carry
    pub fn peek(&self) -> f64 {
        self.now_ms
    }
}

impl Iterator for FixedRateClock {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        let now = self.now_ms;
        self.now_ms += self.interval_ms;
        Some(now)
    }
}

/// Feed frames to the engine until it goes idle or the source runs dry.
/// Returns the number of frames consumed.
pub fn run_until_idle<D, F, S>(engine: &mut SpinEngine<D>, frames: &mut F, sink: &mut S) -> usize
where
    D: DeltaSource,
    F: FrameSource + ?Sized,
    S: FeedbackSink,
{
    let mut consumed = 0;
    while engine.is_spinning() {
        let Some(now) = frames.next_frame() else {
            break;
        };
        consumed += 1;
        if engine.advance(now, sink) == SpinPhase::Idle {
            break;
        }
    }
    consumed
}
