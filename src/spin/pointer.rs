//! Pointer resolution and easing
//!
//! The pointer is fixed at the top of the screen. In the wheel's own frame that
//! is 270°, so the slice under the pointer for a wheel rotated clockwise by `r`
//! degrees is the one containing `270 - r`. The same function serves the
//! per-frame crossing check and the final winner, so the two can never disagree.

use crate::consts::POINTER_DEGREES;
use crate::normalize_degrees;

/// Cubic ease-out: fast start, smooth deceleration into the stop
#[inline]
pub fn ease_out_cubic(progress: f64) -> f64 {
    let t = progress.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

/// Index of the slice under the pointer, or None for an empty wheel
///
/// Works for any finite rotation, including negative values and values past
/// 360. The trailing `% count` folds the float edge where the wheel-frame angle
/// rounds up to a full turn back onto slice 0.
pub fn pointer_segment(rotation_degrees: f64, count: usize) -> Option<usize> {
    if count == 0 {
        return None;
    }
    Some(segment_under_pointer(rotation_degrees, 360.0 / count as f64, count))
}

/// `pointer_segment` with the slice width already known. `count` must be non-zero
/// and `arc_degrees` must be `360 / count`.
pub(crate) fn segment_under_pointer(rotation_degrees: f64, arc_degrees: f64, count: usize) -> usize {
    let under_pointer = normalize_degrees(POINTER_DEGREES - normalize_degrees(rotation_degrees));
    (under_pointer / arc_degrees).floor() as usize % count
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_ease_endpoints() {
        assert_eq!(ease_out_cubic(0.0), 0.0);
        assert_eq!(ease_out_cubic(1.0), 1.0);
        assert_eq!(ease_out_cubic(1.5), 1.0);
        assert_eq!(ease_out_cubic(-0.5), 0.0);
        assert!((ease_out_cubic(0.5) - 0.875).abs() < 1e-12);
    }

    #[test]
    fn test_ease_is_monotonic() {
        let mut last = 0.0;
        for step in 0..=100 {
            let value = ease_out_cubic(step as f64 / 100.0);
            assert!(value >= last);
            last = value;
        }
    }

    #[test]
    fn test_empty_wheel_has_no_pointer_segment() {
        assert_eq!(pointer_segment(123.0, 0), None);
    }

    #[test]
    fn test_unrotated_three_slices() {
        // 270° lies in the third 120° slice
        assert_eq!(pointer_segment(0.0, 3), Some(2));
        assert_eq!(pointer_segment(720.0, 3), Some(2));
    }

    #[test]
    fn test_rotation_moves_earlier_slices_under_pointer() {
        // Rotating clockwise by 180° brings 90° to the top: slice 0 of 3
        assert_eq!(pointer_segment(180.0, 3), Some(0));
        // 200° -> 70° at the top, still slice 0
        assert_eq!(pointer_segment(200.0, 3), Some(0));
        // 100° -> 170° at the top, slice 1
        assert_eq!(pointer_segment(100.0, 3), Some(1));
    }

    #[test]
    fn test_negative_rotation() {
        // -90° is the same wheel as 270°: 0° at the top
        assert_eq!(pointer_segment(-90.0, 4), pointer_segment(270.0, 4));
        assert_eq!(pointer_segment(-90.0, 4), Some(0));
    }

    #[test]
    fn test_single_entrant_always_zero() {
        for rotation in [-725.5, -1.0, 0.0, 89.9, 270.0, 359.999, 4711.0] {
            assert_eq!(pointer_segment(rotation, 1), Some(0));
        }
    }

    #[test]
    fn test_matches_reversed_subtraction_form() {
        // ((360 - r mod 360 + 270) mod 360) is the same angle as (270 - r) mod 360
        for count in 1..12 {
            let arc = 360.0 / count as f64;
            for step in 0..720 {
                let rotation = step as f64 * 0.5 + 0.25;
                let reversed = (360.0 - rotation % 360.0 + 270.0) % 360.0;
                let expected = (reversed / arc).floor() as usize % count;
                assert_eq!(pointer_segment(rotation, count), Some(expected));
            }
        }
    }

    proptest! {
        #[test]
        fn winner_is_always_in_range(count in 1usize..200, rotation in -1.0e6f64..1.0e6) {
            let index = pointer_segment(rotation, count).unwrap();
            prop_assert!(index < count);
        }

        #[test]
        fn full_turns_do_not_change_the_winner(
            count in 1usize..50,
            slot in 0usize..50,
            fraction in 0.0f64..1.0,
            turns in -20i32..20
        ) {
            let index = slot % count;
            let arc = 360.0 / count as f64;
            // Keep the pointer at least 1e-6° inside the slice
            let offset = 1e-6 + fraction * (arc - 2e-6);
            let rotation = POINTER_DEGREES - (index as f64 * arc + offset);

            let base = pointer_segment(rotation, count);
            let spun = pointer_segment(rotation + 360.0 * turns as f64, count);
            prop_assert_eq!(base, Some(index));
            prop_assert_eq!(spun, base);
        }
    }
}
