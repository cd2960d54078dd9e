//! Numeric helpers and random draws.
//!
//! All draws take the RNG explicitly so callers decide which stream they
//! consume. None of the range helpers panic on empty or inverted ranges.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;

/// Clamps `v` into `[min, max]`. Never panics; `max` wins if the bounds cross.
#[inline]
pub fn clamp(v: f32, min: f32, max: f32) -> f32 {
    v.max(min).min(max)
}

/// Rounds `v`, then clamps it into `[min, max]`.
#[inline]
pub fn clamp_round(v: f32, min: f32, max: f32) -> f32 {
    clamp(v.round(), min, max)
}

/// Rounds `v` to the nearest multiple of `step`.
#[inline]
pub fn round_to_nearest(v: f32, step: f32) -> f32 {
    if step == 0.0 {
        return v;
    }
    (v / step).round() * step
}

/// Uniform float in `[min, max)`. Returns `min` for an empty range.
pub fn random_range<R: Rng + ?Sized>(rng: &mut R, min: f32, max: f32) -> f32 {
    if max <= min {
        return min;
    }
    min + rng.random::<f32>() * (max - min)
}

/// Uniform integer in `[min, max)`. Returns `min` for an empty range.
pub fn random_int<R: Rng + ?Sized>(rng: &mut R, min: i64, max: i64) -> i64 {
    if max <= min {
        return min;
    }
    rng.random_range(min..max)
}

/// Uniform angle in `[0, 2π)`.
pub fn random_angle<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    rng.random::<f32>() * TAU
}

/// Unit vector in a uniformly random direction.
pub fn random_unit_vector<R: Rng + ?Sized>(rng: &mut R) -> Vec2 {
    Vec2::from_angle(random_angle(rng))
}

/// Random dash pattern: two run lengths in `[1, 15)`, then further runs while
/// a coin with a rising threshold allows.
pub fn random_skip_pattern<R: Rng + ?Sized>(rng: &mut R) -> Vec<u32> {
    let mut pattern = vec![rng.random_range(1..15), rng.random_range(1..15)];
    let mut threshold = 0.5;
    while rng.random::<f32>() > threshold {
        pattern.push(rng.random_range(1..15));
        threshold += 0.05;
    }
    pattern
}

/// With probability `chance`, scales `value` by a uniform factor in
/// `[1 - magnitude, 1 + magnitude]` and clamps into `[min, max]`; otherwise
/// returns `value` unchanged.
pub fn nudge<R: Rng + ?Sized>(
    rng: &mut R,
    value: f32,
    chance: f32,
    magnitude: f32,
    min: f32,
    max: f32,
) -> f32 {
    if rng.random::<f32>() >= chance {
        return value;
    }
    let factor = random_range(rng, 1.0 - magnitude, 1.0 + magnitude);
    clamp(value * factor, min, max)
}

/// Integer variant of [`nudge`]; the result is rounded.
pub fn nudge_int<R: Rng + ?Sized>(
    rng: &mut R,
    value: i64,
    chance: f32,
    magnitude: f32,
    min: i64,
    max: i64,
) -> i64 {
    nudge(rng, value as f32, chance, magnitude, min as f32, max as f32).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_clamp_round() {
        assert_eq!(clamp_round(254.6, 0.0, 255.0), 255.0);
        assert_eq!(clamp_round(-3.2, 0.0, 255.0), 0.0);
        assert_eq!(clamp_round(10.4, 0.0, 255.0), 10.0);
    }

    #[test]
    fn test_round_to_nearest() {
        assert_eq!(round_to_nearest(37.0, 15.0), 30.0);
        assert_eq!(round_to_nearest(38.0, 15.0), 45.0);
        assert_eq!(round_to_nearest(5.0, 0.0), 5.0);
    }

    #[test]
    fn test_empty_ranges_do_not_panic() {
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(random_range(&mut rng, 5.0, 5.0), 5.0);
        assert_eq!(random_range(&mut rng, 5.0, 1.0), 5.0);
        assert_eq!(random_int(&mut rng, 7, 7), 7);
        assert_eq!(random_int(&mut rng, 7, 2), 7);
    }

    #[test]
    fn test_random_int_exclusive() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..500 {
            let v = random_int(&mut rng, 1, 3);
            assert!(v == 1 || v == 2);
        }
    }

    #[test]
    fn test_unit_vector() {
        let mut rng = StdRng::seed_from_u64(2);
        for _ in 0..100 {
            assert!((random_unit_vector(&mut rng).length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_skip_pattern_entries() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..100 {
            let pattern = random_skip_pattern(&mut rng);
            assert!(pattern.len() >= 2);
            assert!(pattern.iter().all(|&v| (1..15).contains(&v)));
        }
    }

    #[test]
    fn test_nudge_zero_chance_is_identity() {
        let mut rng = StdRng::seed_from_u64(4);
        for _ in 0..100 {
            assert_eq!(nudge(&mut rng, 12.5, 0.0, 0.5, 0.0, 100.0), 12.5);
        }
    }

    #[test]
    fn test_nudge_bounds() {
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..200 {
            let v = nudge(&mut rng, 10.0, 1.0, 0.2, 0.0, 100.0);
            assert!((8.0..=12.0).contains(&v), "nudged to {}", v);
            let i = nudge_int(&mut rng, 10, 1.0, 0.9, 3, 11);
            assert!((3..=11).contains(&i));
        }
    }
}
