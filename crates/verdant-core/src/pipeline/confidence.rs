//! Confidence display smoothing.
//!
//! The raw model confidence is perturbed with a small uniform jitter and
//! clamped into `[0.5, 0.99]` before display. This is a presentation policy,
//! not a property of the detection stage: the jittered value is what the
//! surface shows and what the history record stores, sampled once per run.

use rand::Rng;

const JITTER: f64 = 0.1;
const FLOOR: f64 = 0.5;
const CEILING: f64 = 0.99;

/// Applies jitter and clamps the result into the display range.
pub fn smooth_confidence<R: Rng>(raw: f64, rng: &mut R) -> f64 {
    let jittered = raw + rng.gen_range(-JITTER..JITTER);
    jittered.clamp(FLOOR, CEILING)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn smoothed_confidence_stays_in_display_range() {
        let mut rng = StdRng::seed_from_u64(42);
        for raw in [0.0, 0.5, 1.0, -3.0, 7.0] {
            for _ in 0..200 {
                let smoothed = smooth_confidence(raw, &mut rng);
                assert!((FLOOR..=CEILING).contains(&smoothed), "raw {raw} -> {smoothed}");
            }
        }
    }

    #[test]
    fn zero_raw_confidence_is_floored() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            assert_eq!(smooth_confidence(0.0, &mut rng), FLOOR);
        }
    }

    #[test]
    fn full_raw_confidence_is_capped() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let smoothed = smooth_confidence(1.0, &mut rng);
            assert!(smoothed <= CEILING);
        }
    }

    #[test]
    fn midrange_values_stay_near_the_raw_value() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let smoothed = smooth_confidence(0.75, &mut rng);
            assert!((smoothed - 0.75).abs() < JITTER);
        }
    }
}
