//! Segment layout for the wheel
//!
//! Each entrant owns one equal slice of the circle. Slices are laid out
//! consecutively from angle 0 (3 o'clock) and grow clockwise in screen space:
//! - start_angle: radians in [0, 2π)
//! - angular_width: 2π / n

use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

/// One angular slice of the wheel
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Position in the entrant snapshot
    pub index: usize,
    /// Start angle (radians, [0, 2π))
    pub start_angle: f32,
    /// Angular width (radians)
    pub angular_width: f32,
}

impl Segment {
    /// End angle (may reach 2π for the last slice; not normalized)
    #[inline]
    pub fn end_angle(&self) -> f32 {
        self.start_angle + self.angular_width
    }

    /// Angle halfway through the slice, where the label sits
    #[inline]
    pub fn bisector(&self) -> f32 {
        self.start_angle + self.angular_width / 2.0
    }
}

/// Width of a single slice for `count` entrants, or None for an empty wheel
#[inline]
pub fn segment_width(count: usize) -> Option<f32> {
    (count > 0).then(|| TAU / count as f32)
}

/// Lay out `count` equal slices in entrant order
pub fn layout(count: usize) -> Vec<Segment> {
    let Some(width) = segment_width(count) else {
        return Vec::new();
    };

    (0..count)
        .map(|index| Segment {
            index,
            start_angle: index as f32 * width,
            angular_width: width,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::f32::consts::PI;

    #[test]
    fn test_empty_layout() {
        assert!(layout(0).is_empty());
        assert_eq!(segment_width(0), None);
    }

    #[test]
    fn test_single_segment_covers_circle() {
        let segments = layout(1);
        assert_eq!(segments.len(), 1);
        assert!((segments[0].angular_width - TAU).abs() < 1e-6);
        assert_eq!(segments[0].start_angle, 0.0);
        assert!((segments[0].bisector() - PI).abs() < 1e-6);
    }

    #[test]
    fn test_segments_are_consecutive() {
        let segments = layout(5);
        for pair in segments.windows(2) {
            assert!((pair[0].end_angle() - pair[1].start_angle).abs() < 1e-5);
        }
        assert!((segments[4].end_angle() - TAU).abs() < 1e-5);
        let order: Vec<usize> = segments.iter().map(|s| s.index).collect();
        assert_eq!(order, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_quarter_boundaries() {
        let segments = layout(4);
        let starts: Vec<f32> = segments.iter().map(|s| s.start_angle).collect();
        for (start, expected) in starts.iter().zip([0.0, PI / 2.0, PI, 3.0 * PI / 2.0]) {
            assert!((start - expected).abs() < 1e-6);
        }
        assert!((segments[3].end_angle() - TAU).abs() < 1e-6);
    }

    #[test]
    fn test_bisector() {
        let segments = layout(3);
        assert!((segments[0].bisector() - PI / 3.0).abs() < 1e-5);
        assert!((segments[2].bisector() - 5.0 * PI / 3.0).abs() < 1e-5);
    }

    proptest! {
        #[test]
        fn widths_partition_the_circle(count in 1usize..500) {
            let segments = layout(count);
            prop_assert_eq!(segments.len(), count);
            let total: f64 = segments.iter().map(|s| s.angular_width as f64).sum();
            prop_assert!((total - std::f64::consts::TAU).abs() < 1e-3);
        }

        #[test]
        fn bisector_lies_inside_its_segment(count in 1usize..64) {
            for segment in layout(count) {
                let bisector = segment.bisector();
                prop_assert!(bisector > segment.start_angle);
                prop_assert!(bisector < segment.end_angle());
            }
        }
    }
}
