//! Spin events and feedback sinks
//!
//! The engine reports segment crossings and completion through a
//! `FeedbackSink`. Sinks cannot fail the spin: they return nothing and the
//! engine never looks at what they did.

use crate::entrant::Entrant;

/// Something observable happened during a spin
#[derive(Debug, Clone, PartialEq)]
pub enum SpinEvent {
    /// The pointer moved onto a different segment
    SegmentCrossed { index: usize },
    /// The wheel stopped; `winner` is the entrant under the pointer
    Completed { winner_index: usize, winner: Entrant },
}

/// Consumer of spin events (tick/win cues, logging, recording)
pub trait FeedbackSink {
    fn notify(&mut self, event: &SpinEvent);
}

/// Discards every event
impl FeedbackSink for () {
    fn notify(&mut self, _event: &SpinEvent) {}
}

/// Records every event (replays, tests)
impl FeedbackSink for Vec<SpinEvent> {
    fn notify(&mut self, event: &SpinEvent) {
        self.push(event.clone());
    }
}

impl<S: FeedbackSink + ?Sized> FeedbackSink for &mut S {
    fn notify(&mut self, event: &SpinEvent) {
        (**self).notify(event);
    }
}

/// Writes events to the `log` facade
#[derive(Debug, Default, Clone)]
pub struct LogFeedback {
    ticks: u32,
}

impl LogFeedback {
    pub fn new() -> Self {
        Self::default()
    }

    /// Segment crossings seen since the last completion
    pub fn ticks(&self) -> u32 {
        self.ticks
    }
}

impl FeedbackSink for LogFeedback {
    fn notify(&mut self, event: &SpinEvent) {
        match event {
            SpinEvent::SegmentCrossed { index } => {
                self.ticks += 1;
                log::debug!("tick: segment {} under pointer", index);
            }
            SpinEvent::Completed {
                winner_index,
                winner,
            } => {
                log::info!(
                    "Winner: {} (segment {}, {} ticks)",
                    winner.name,
                    winner_index,
                    self.ticks
                );
                self.ticks = 0;
            }
        }
    }
}

/// Fan one event stream out to two sinks
pub struct Tee<A, B>(pub A, pub B);

impl<A: FeedbackSink, B: FeedbackSink> FeedbackSink for Tee<A, B> {
    fn notify(&mut self, event: &SpinEvent) {
        self.0.notify(event);
        self.1.notify(event);
    }
}
