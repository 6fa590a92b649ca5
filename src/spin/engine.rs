//! Frame-driven spin engine
//!
//! Owns the wheel rotation and at most one active `SpinSession`. The host
//! calls `advance` once per display refresh with a wall-clock timestamp;
//! motion derives from elapsed time, never from frame count.

use futures::channel::oneshot;

use super::delta::{DeltaSource, RngDelta};
use super::pointer::{ease_out_cubic, segment_under_pointer};
use crate::entrant::Entrant;
use crate::feedback::{FeedbackSink, SpinEvent};
use crate::normalize_degrees;
use crate::settings::SpinTuning;

/// Engine state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpinPhase {
    /// Ready to accept a spin
    Idle,
    /// A session is animating
    Spinning,
}

/// The in-flight spin. Created by `spin`, consumed on completion.
#[derive(Debug)]
pub struct SpinSession {
    entrants: Vec<Entrant>,
    start_degrees: f64,
    total_delta_degrees: f64,
    start_ms: f64,
    duration_ms: f64,
    arc_degrees: f64,
    last_crossed: usize,
    completion: Option<oneshot::Sender<Entrant>>,
}

impl SpinSession {
    /// Rotation when the spin started (previous final angle mod 360)
    pub fn start_degrees(&self) -> f64 {
        self.start_degrees
    }

    /// Total rotation this spin adds
    pub fn total_delta_degrees(&self) -> f64 {
        self.total_delta_degrees
    }

    pub fn start_ms(&self) -> f64 {
        self.start_ms
    }

    pub fn duration_ms(&self) -> f64 {
        self.duration_ms
    }

    /// Frozen entrant list for this spin
    pub fn entrants(&self) -> &[Entrant] {
        &self.entrants
    }

    /// Fraction of the animation elapsed at `now_ms`, in [0, 1]
    pub fn progress(&self, now_ms: f64) -> f64 {
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        ((now_ms - self.start_ms) / self.duration_ms).clamp(0.0, 1.0)
    }

    /// Wheel rotation at `now_ms`
    pub fn rotation_at(&self, now_ms: f64) -> f64 {
        self.start_degrees + self.total_delta_degrees * ease_out_cubic(self.progress(now_ms))
    }

    /// Index of the frozen entrant under the pointer at `rotation_degrees`
    pub fn segment_at(&self, rotation_degrees: f64) -> usize {
        segment_under_pointer(rotation_degrees, self.arc_degrees, self.entrants.len())
    }
}

/// Spin state machine: Idle -> Spinning -> Idle
pub struct SpinEngine<D = RngDelta> {
    /// Accumulated rotation (degrees, clockwise on screen)
    rotation_degrees: f64,
    session: Option<SpinSession>,
    delta_source: D,
    tuning: SpinTuning,
}

impl SpinEngine<RngDelta> {
    /// Engine with a seeded PCG delta source and default tuning
    pub fn seeded(seed: u64) -> Self {
        Self::new(RngDelta::seeded(seed), SpinTuning::default())
    }
}

impl<D: DeltaSource> SpinEngine<D> {
    pub fn new(delta_source: D, tuning: SpinTuning) -> Self {
        Self {
            rotation_degrees: 0.0,
            session: None,
            delta_source,
            tuning,
        }
    }

    pub fn phase(&self) -> SpinPhase {
        if self.session.is_some() {
            SpinPhase::Spinning
        } else {
            SpinPhase::Idle
        }
    }

    pub fn is_spinning(&self) -> bool {
        self.session.is_some()
    }

    /// Current wheel rotation, applied by the presentation layer as a transform
    pub fn rotation_degrees(&self) -> f64 {
        self.rotation_degrees
    }

    /// Active session, if any
    pub fn session(&self) -> Option<&SpinSession> {
        self.session.as_ref()
    }

    /// Change tuning for future spins (the active one keeps its parameters)
    pub fn set_tuning(&mut self, tuning: SpinTuning) {
        self.tuning = tuning;
    }

    /// Start a spin over `entrants`, beginning at `now_ms`.
    ///
    /// Returns a receiver that resolves exactly once with the winner. Spinning
    /// while a session is active, or with no entrants, is ignored and returns None.
    pub fn spin(&mut self, entrants: &[Entrant], now_ms: f64) -> Option<oneshot::Receiver<Entrant>> {
        if self.session.is_some() || entrants.is_empty() {
            log::trace!(
                "Ignoring spin request (spinning: {}, entrants: {})",
                self.session.is_some(),
                entrants.len()
            );
            return None;
        }

        let start_degrees = normalize_degrees(self.rotation_degrees);
        let total_delta_degrees = self.delta_source.draw_delta(&self.tuning);
        let arc_degrees = 360.0 / entrants.len() as f64;
        // Seed with the segment already under the pointer so the first real crossing ticks
        let last_crossed = segment_under_pointer(start_degrees, arc_degrees, entrants.len());
        let (sender, receiver) = oneshot::channel();

        log::debug!(
            "Spin started: {} entrants, from {:.1}° by {:.1}° over {} ms",
            entrants.len(),
            start_degrees,
            total_delta_degrees,
            self.tuning.duration_ms
        );

        self.rotation_degrees = start_degrees;
        self.session = Some(SpinSession {
            entrants: entrants.to_vec(),
            start_degrees,
            total_delta_degrees,
            start_ms: now_ms,
            duration_ms: self.tuning.duration_ms,
            arc_degrees,
            last_crossed,
            completion: Some(sender),
        });

        Some(receiver)
    }

    /// Advance the animation to `now_ms`. No-op while idle.
    pub fn advance(&mut self, now_ms: f64, sink: &mut impl FeedbackSink) -> SpinPhase {
        let Some(session) = self.session.as_mut() else {
            return SpinPhase::Idle;
        };

        let progress = session.progress(now_ms);
        self.rotation_degrees = session.rotation_at(now_ms);

        let current = session.segment_at(self.rotation_degrees);
        if current != session.last_crossed {
            session.last_crossed = current;
            sink.notify(&SpinEvent::SegmentCrossed { index: current });
        }

        if progress < 1.0 {
            return SpinPhase::Spinning;
        }

        self.finish(sink);
        SpinPhase::Idle
    }

    /// Resolve the winner and return to Idle
    fn finish(&mut self, sink: &mut impl FeedbackSink) {
        let Some(mut session) = self.session.take() else {
            return;
        };

        let winner_index = session.segment_at(self.rotation_degrees);
        let winner = session.entrants.swap_remove(winner_index);

        sink.notify(&SpinEvent::Completed {
            winner_index,
            winner: winner.clone(),
        });

        if let Some(sender) = session.completion.take() {
            // Receiver may have been dropped; the spin still completes
            let _ = sender.send(winner);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entrant::Roster;
    use crate::spin::delta::FixedDelta;
    use crate::spin::pointer::pointer_segment;
    use proptest::prelude::*;

    fn roster(names: &str) -> Vec<Entrant> {
        let mut roster = Roster::new(11);
        roster.add_lines(names);
        roster.snapshot()
    }

    fn fixed(delta: f64) -> SpinEngine<FixedDelta> {
        SpinEngine::new(FixedDelta(delta), SpinTuning::default())
    }

    /// Drive at ~60 Hz from `start` until idle, returning the recorded events
    fn run(engine: &mut SpinEngine<impl DeltaSource>, start: f64) -> Vec<SpinEvent> {
        let mut events = Vec::new();
        let mut now = start;
        while engine.advance(now, &mut events) == SpinPhase::Spinning {
            now += 16.0;
        }
        events
    }

    #[test]
    fn test_three_entrants_two_full_turns_lands_on_carla() {
        let entrants = roster("Ana\nBruno\nCarla");
        let mut engine = fixed(720.0);

        let mut receiver = engine.spin(&entrants, 0.0).expect("spin should start");
        assert_eq!(engine.session().unwrap().start_degrees(), 0.0);
        assert_eq!(engine.session().unwrap().total_delta_degrees(), 720.0);

        let events = run(&mut engine, 0.0);

        assert_eq!(engine.phase(), SpinPhase::Idle);
        assert_eq!(normalize_degrees(engine.rotation_degrees()), 0.0);
        let winner = receiver.try_recv().unwrap().expect("winner delivered");
        assert_eq!(winner.name, "Carla");
        assert!(matches!(
            events.last(),
            Some(SpinEvent::Completed { winner_index: 2, .. })
        ));
    }

    #[test]
    fn test_spin_with_no_entrants_is_ignored() {
        let mut engine = fixed(720.0);
        assert!(engine.spin(&[], 0.0).is_none());
        assert_eq!(engine.phase(), SpinPhase::Idle);
    }

    #[test]
    fn test_spin_while_spinning_keeps_session() {
        let entrants = roster("Ana\nBruno\nCarla");
        let mut engine = SpinEngine::seeded(5);
        let _receiver = engine.spin(&entrants, 100.0).unwrap();
        engine.advance(1200.0, &mut ());

        let (start, delta, duration, start_ms) = {
            let s = engine.session().unwrap();
            (s.start_degrees(), s.total_delta_degrees(), s.duration_ms(), s.start_ms())
        };

        assert!(engine.spin(&roster("Zed"), 1300.0).is_none());

        let s = engine.session().unwrap();
        assert_eq!(s.start_degrees(), start);
        assert_eq!(s.total_delta_degrees(), delta);
        assert_eq!(s.duration_ms(), duration);
        assert_eq!(s.start_ms(), start_ms);
        assert_eq!(s.entrants().len(), 3);
    }

    #[test]
    fn test_advance_while_idle_is_noop() {
        let mut engine = fixed(720.0);
        let mut events = Vec::new();
        assert_eq!(engine.advance(1000.0, &mut events), SpinPhase::Idle);
        assert!(events.is_empty());
        assert_eq!(engine.rotation_degrees(), 0.0);
    }

    #[test]
    fn test_motion_follows_wall_clock_not_frames() {
        let entrants = roster("Ana\nBruno");
        let mut a = fixed(3000.0);
        let mut b = fixed(3000.0);
        a.spin(&entrants, 0.0);
        b.spin(&entrants, 0.0);

        // One big frame vs. many small ones reaching the same timestamp
        a.advance(2500.0, &mut ());
        let mut now: f64 = 0.0;
        while now < 2500.0 {
            now += 7.0;
            b.advance(now.min(2500.0), &mut ());
        }
        assert!((a.rotation_degrees() - b.rotation_degrees()).abs() < 1e-9);
        // Halfway in time is 87.5% of the way in motion
        assert!((a.rotation_degrees() - 3000.0 * 0.875).abs() < 1e-9);
    }

    #[test]
    fn test_rotation_carries_over_between_spins() {
        let entrants = roster("Ana\nBruno\nCarla\nDiego");
        let mut engine = fixed(3690.0);

        engine.spin(&entrants, 0.0);
        run(&mut engine, 0.0);
        assert_eq!(engine.rotation_degrees(), 3690.0);

        engine.spin(&entrants, 10_000.0);
        assert_eq!(engine.session().unwrap().start_degrees(), 90.0);
        run(&mut engine, 10_000.0);
        assert_eq!(engine.rotation_degrees(), 90.0 + 3690.0);
    }

    #[test]
    fn test_completion_fires_exactly_once() {
        let entrants = roster("Ana\nBruno");
        let mut engine = fixed(1000.0);
        let mut receiver = engine.spin(&entrants, 0.0).unwrap();
        let mut events = Vec::new();

        engine.advance(5000.0, &mut events);
        engine.advance(6000.0, &mut events);
        engine.advance(7000.0, &mut events);

        let completions = events
            .iter()
            .filter(|e| matches!(e, SpinEvent::Completed { .. }))
            .count();
        assert_eq!(completions, 1);
        assert!(receiver.try_recv().unwrap().is_some());
    }

    #[test]
    fn test_dropped_receiver_does_not_block_completion() {
        let entrants = roster("Ana\nBruno");
        let mut engine = fixed(1000.0);
        drop(engine.spin(&entrants, 0.0));
        assert_eq!(engine.advance(5000.0, &mut ()), SpinPhase::Idle);
        assert!(engine.spin(&entrants, 6000.0).is_some());
    }

    #[test]
    fn test_crossings_match_segments_passed() {
        // Four 90° segments, one full turn: every boundary passes the pointer once
        let entrants = roster("A\nB\nC\nD");
        let mut engine = fixed(360.0);
        engine.spin(&entrants, 0.0);

        let mut events = Vec::new();
        let mut now = 0.0;
        while engine.advance(now, &mut events) == SpinPhase::Spinning {
            now += 1.0;
        }
        let ticks: Vec<usize> = events
            .iter()
            .filter_map(|e| match e {
                SpinEvent::SegmentCrossed { index } => Some(*index),
                _ => None,
            })
            .collect();
        // Pointer starts in D (270°) and walks backwards through the wheel
        assert_eq!(ticks, vec![2, 1, 0, 3]);
    }

    #[test]
    fn test_zero_duration_completes_on_first_frame() {
        let entrants = roster("Ana\nBruno\nCarla");
        let tuning = SpinTuning {
            duration_ms: 0.0,
            ..SpinTuning::default()
        };
        let mut engine = SpinEngine::new(FixedDelta(720.0), tuning);
        let mut receiver = engine.spin(&entrants, 50.0).unwrap();
        assert_eq!(engine.advance(50.0, &mut ()), SpinPhase::Idle);
        assert_eq!(receiver.try_recv().unwrap().unwrap().name, "Carla");
    }

    #[test]
    fn test_session_resolves_with_its_own_slice_width() {
        for names in ["Solo", "Ana\nBruno\nCarla", "A\nB\nC\nD\nE\nF\nG"] {
            let entrants = roster(names);
            let mut engine = fixed(720.0);
            engine.spin(&entrants, 0.0);
            let session = engine.session().unwrap();
            for step in -400..400 {
                let rotation = step as f64 * 1.75 + 0.125;
                assert_eq!(
                    Some(session.segment_at(rotation)),
                    pointer_segment(rotation, entrants.len())
                );
            }
        }
    }

    proptest! {
        #[test]
        fn single_entrant_always_wins(seed in any::<u64>(), start in 0.0f64..1.0e4) {
            let entrants = roster("Solo");
            let mut engine = SpinEngine::seeded(seed);
            let mut receiver = engine.spin(&entrants, start).unwrap();
            run(&mut engine, start);
            prop_assert_eq!(receiver.try_recv().unwrap().unwrap().name, "Solo".to_string());
        }

        #[test]
        fn last_frame_segment_matches_winner(seed in any::<u64>(), count in 1usize..40, step in 1.0f64..50.0) {
            let names: Vec<String> = (0..count).map(|i| format!("E{}", i)).collect();
            let entrants = roster(&names.join("\n"));
            let mut engine = SpinEngine::seeded(seed);
            let mut receiver = engine.spin(&entrants, 0.0).unwrap();

            let mut events = Vec::new();
            let mut now = 0.0;
            while engine.advance(now, &mut events) == SpinPhase::Spinning {
                now += step;
            }

            let final_index = pointer_segment(engine.rotation_degrees(), count).unwrap();
            let last_seen = events
                .iter()
                .rev()
                .find_map(|e| match e {
                    SpinEvent::SegmentCrossed { index } => Some(*index),
                    _ => None,
                });
            let winner = receiver.try_recv().unwrap().unwrap();

            prop_assert_eq!(&winner, &entrants[final_index]);
            if let Some(last_seen) = last_seen {
                prop_assert_eq!(last_seen, final_index);
            }
        }

        #[test]
        fn winner_is_in_snapshot(seed in any::<u64>(), count in 1usize..30) {
            let names: Vec<String> = (0..count).map(|i| format!("E{}", i)).collect();
            let entrants = roster(&names.join("\n"));
            let mut engine = SpinEngine::seeded(seed);
            let mut receiver = engine.spin(&entrants, 0.0).unwrap();
            run(&mut engine, 0.0);
            let winner = receiver.try_recv().unwrap().unwrap();
            prop_assert!(entrants.contains(&winner));
        }
    }
}
