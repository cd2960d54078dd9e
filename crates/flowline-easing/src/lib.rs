//! Easing curves for blending control-function outputs.
//!
//! Thirty-one shaping curves over `[0, 1]`, a [`Lerp`] trait for the values
//! flowline blends (scalars, directions, colors), and [`ease_lerp`], which
//! runs an interpolation fraction through a curve before blending.
//!
//! Every curve satisfies `f(0) = 0` and `f(1) = 1` exactly, and [`Lerp`]
//! returns its endpoints exactly, so a blend at fraction 0 or 1 reproduces its
//! inputs bit for bit.
//!
//! ```
//! use flowline_easing::{Easing, ease_lerp};
//!
//! let mid = ease_lerp(&0.0f32, &100.0, 0.5, Easing::QuadIn);
//! assert!((mid - 25.0).abs() < 0.001);
//! ```

use std::f32::consts::FRAC_PI_2;

use glam::Vec2;

/// Values that blend linearly.
///
/// Implementations must return `self` exactly at `t = 0.0` and `other`
/// exactly at `t = 1.0`.
pub trait Lerp {
    /// Blends from `self` toward `other` by `t`.
    fn lerp_to(&self, other: &Self, t: f32) -> Self;
}

impl Lerp for f32 {
    #[inline]
    fn lerp_to(&self, other: &Self, t: f32) -> Self {
        // Weighted form keeps both endpoints exact.
        self * (1.0 - t) + other * t
    }
}

impl Lerp for Vec2 {
    #[inline]
    fn lerp_to(&self, other: &Self, t: f32) -> Self {
        Vec2::new(self.x.lerp_to(&other.x, t), self.y.lerp_to(&other.y, t))
    }
}

impl<T: Lerp, const N: usize> Lerp for [T; N] {
    fn lerp_to(&self, other: &Self, t: f32) -> Self {
        std::array::from_fn(|i| self[i].lerp_to(&other[i], t))
    }
}

/// Overshoot constant of the back curves.
const BACK: f32 = 1.70158;
/// Overshoot constant of the back in-out curve.
const BACK_IN_OUT: f32 = BACK * 1.525;

/// A shaping curve.
///
/// Declaration order is the curve's stable index, used by run files that
/// store the easing as a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[allow(missing_docs)]
pub enum Easing {
    #[default]
    Linear,
    BackInOut,
    BackIn,
    BackOut,
    BounceInOut,
    BounceIn,
    BounceOut,
    CircInOut,
    CircIn,
    CircOut,
    CubicInOut,
    CubicIn,
    CubicOut,
    ElasticInOut,
    ElasticIn,
    ElasticOut,
    ExpoInOut,
    ExpoIn,
    ExpoOut,
    QuadInOut,
    QuadIn,
    QuadOut,
    QuartInOut,
    QuartIn,
    QuartOut,
    QuintInOut,
    QuintIn,
    QuintOut,
    SineInOut,
    SineIn,
    SineOut,
}

impl Easing {
    /// Every curve, in index order.
    pub const ALL: [Easing; 31] = {
        use Easing::*;
        [
            Linear, BackInOut, BackIn, BackOut, BounceInOut, BounceIn, BounceOut, CircInOut, CircIn, CircOut,
            CubicInOut, CubicIn, CubicOut, ElasticInOut, ElasticIn, ElasticOut, ExpoInOut, ExpoIn, ExpoOut,
            QuadInOut, QuadIn, QuadOut, QuartInOut, QuartIn, QuartOut, QuintInOut, QuintIn, QuintOut, SineInOut,
            SineIn, SineOut,
        ]
    };

    /// The curve at `index`, if any.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// This curve's stable index.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Shapes `t`.
    ///
    /// Inputs at or outside the ends are pinned, so `ease(0.0) == 0.0` and
    /// `ease(1.0) == 1.0` for every curve. Back and elastic curves leave
    /// `[0, 1]` in between.
    pub fn ease(self, t: f32) -> f32 {
        if t <= 0.0 {
            0.0
        } else if t >= 1.0 {
            1.0
        } else {
            self.shape(t)
        }
    }

    /// The raw curve on the open interval.
    fn shape(self, t: f32) -> f32 {
        use Easing::*;
        match self {
            Linear => t,

            QuadIn => t * t,
            QuadOut => -t * (t - 2.0),
            QuadInOut => halves(t, |u| 2.0 * u * u, |u| 1.0 - 2.0 * (1.0 - u) * (1.0 - u)),

            CubicIn => t.powi(3),
            CubicOut => (t - 1.0).powi(3) + 1.0,
            CubicInOut => halves(t, |u| 4.0 * u.powi(3), |u| 0.5 * (2.0 * u - 2.0).powi(3) + 1.0),

            QuartIn => t.powi(4),
            QuartOut => 1.0 - (t - 1.0).powi(4),
            QuartInOut => halves(t, |u| 8.0 * u.powi(4), |u| 1.0 - 8.0 * (u - 1.0).powi(4)),

            QuintIn => t.powi(5),
            QuintOut => (t - 1.0).powi(5) + 1.0,
            QuintInOut => halves(t, |u| 16.0 * u.powi(5), |u| 0.5 * (2.0 * u - 2.0).powi(5) + 1.0),

            SineIn => 1.0 - (t * FRAC_PI_2).cos(),
            SineOut => (t * FRAC_PI_2).sin(),
            SineInOut => -0.5 * ((std::f32::consts::PI * t).cos() - 1.0),

            ExpoIn => 2f32.powf(10.0 * (t - 1.0)),
            ExpoOut => 1.0 - 2f32.powf(-10.0 * t),
            ExpoInOut => halves(
                t,
                |u| 2f32.powf(20.0 * u - 10.0) / 2.0,
                |u| 1.0 - 0.5 * 2f32.powf(10.0 - 20.0 * u),
            ),

            CircIn => 1.0 - (1.0 - t * t).sqrt(),
            CircOut => ((2.0 - t) * t).sqrt(),
            CircInOut => halves(
                t,
                |u| 0.5 * (1.0 - (1.0 - 4.0 * u * u).sqrt()),
                |u| 0.5 * (((3.0 - 2.0 * u) * (2.0 * u - 1.0)).sqrt() + 1.0),
            ),

            BackIn => t * t * ((BACK + 1.0) * t - BACK),
            BackOut => {
                let u = t - 1.0;
                u * u * ((BACK + 1.0) * u + BACK) + 1.0
            }
            BackInOut => {
                let s = BACK_IN_OUT;
                let u = 2.0 * t;
                if u < 1.0 {
                    0.5 * u * u * ((s + 1.0) * u - s)
                } else {
                    let u = u - 2.0;
                    0.5 * (u * u * ((s + 1.0) * u + s) + 2.0)
                }
            }

            ElasticIn => (13.0 * FRAC_PI_2 * t).sin() * 2f32.powf(10.0 * (t - 1.0)),
            ElasticOut => (-13.0 * FRAC_PI_2 * (t + 1.0)).sin() * 2f32.powf(-10.0 * t) + 1.0,
            ElasticInOut => {
                let u = 2.0 * t - 1.0;
                if t < 0.5 {
                    0.5 * (13.0 * FRAC_PI_2 * 2.0 * t).sin() * 2f32.powf(10.0 * u)
                } else {
                    0.5 * (-13.0 * FRAC_PI_2 * (u + 1.0)).sin() * 2f32.powf(-10.0 * u) + 1.0
                }
            }

            BounceOut => bounce_out(t),
            BounceIn => 1.0 - bounce_out(1.0 - t),
            BounceInOut => {
                if t < 0.5 {
                    0.5 * (1.0 - bounce_out(1.0 - 2.0 * t))
                } else {
                    0.5 * bounce_out(2.0 * t - 1.0) + 0.5
                }
            }
        }
    }
}

/// Picks the first-half or second-half expression of an in-out curve.
#[inline]
fn halves(t: f32, first: impl Fn(f32) -> f32, second: impl Fn(f32) -> f32) -> f32 {
    if t < 0.5 { first(t) } else { second(t) }
}

/// Four parabolic arcs meeting at 4/11, 8/11 and 9/10.
fn bounce_out(t: f32) -> f32 {
    let t2 = t * t;
    if t < 4.0 / 11.0 {
        7.5625 * t2
    } else if t < 8.0 / 11.0 {
        9.075 * t2 - 9.9 * t + 3.4
    } else if t < 0.9 {
        4356.0 / 361.0 * t2 - 35442.0 / 1805.0 * t + 16061.0 / 1805.0
    } else {
        10.8 * t2 - 20.52 * t + 10.72
    }
}

/// Blends `start` toward `end` by `t` shaped through `easing`.
///
/// `t` is clamped to `[0, 1]` first.
pub fn ease_lerp<T: Lerp>(start: &T, end: &T, t: f32, easing: Easing) -> T {
    start.lerp_to(end, easing.ease(t.clamp(0.0, 1.0)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_are_exact() {
        for easing in Easing::ALL {
            assert_eq!(easing.ease(0.0), 0.0, "{:?}", easing);
            assert_eq!(easing.ease(1.0), 1.0, "{:?}", easing);
            assert_eq!(easing.ease(-3.0), 0.0, "{:?}", easing);
            assert_eq!(easing.ease(7.0), 1.0, "{:?}", easing);
        }
    }

    #[test]
    fn test_raw_curves_approach_endpoints() {
        for easing in Easing::ALL {
            assert!(easing.shape(1e-6).abs() < 0.01, "{:?} near 0", easing);
            assert!((easing.shape(1.0 - 1e-6) - 1.0).abs() < 0.01, "{:?} near 1", easing);
        }
    }

    #[test]
    fn test_in_out_halves_meet() {
        for easing in Easing::ALL {
            let below = easing.ease(0.5 - 1e-6);
            let above = easing.ease(0.5 + 1e-6);
            assert!((below - above).abs() < 0.02, "{:?} jumps at 0.5", easing);
        }
        for easing in [Easing::QuadInOut, Easing::CubicInOut, Easing::SineInOut, Easing::ExpoInOut, Easing::CircInOut] {
            assert!((easing.ease(0.5) - 0.5).abs() < 1e-3, "{:?}", easing);
        }
    }

    #[test]
    fn test_index_round_trip() {
        for (i, easing) in Easing::ALL.iter().enumerate() {
            assert_eq!(easing.index(), i);
            assert_eq!(Easing::from_index(i), Some(*easing));
        }
        assert_eq!(Easing::from_index(31), None);
        assert_eq!(Easing::ALL[0], Easing::Linear);
        assert_eq!(Easing::ALL[30], Easing::SineOut);
    }

    #[test]
    fn test_overshooting_curves() {
        assert!(Easing::BackIn.ease(0.2) < 0.0);
        assert!(Easing::BackOut.ease(0.8) > 1.0);
        assert!((0..100).any(|i| Easing::ElasticOut.ease(i as f32 / 100.0) > 1.0));
    }

    #[test]
    fn test_bounce_has_several_peaks() {
        let samples: Vec<f32> = (0..200).map(|i| Easing::BounceOut.ease(i as f32 / 200.0)).collect();
        let peaks = samples.windows(3).filter(|w| w[1] > w[0] && w[1] > w[2]).count();
        assert!(peaks >= 3, "{} peaks", peaks);
    }

    #[test]
    fn test_lerp_endpoints_exact() {
        let (a, b) = (0.1f32, 0.7f32);
        assert_eq!(a.lerp_to(&b, 0.0), a);
        assert_eq!(a.lerp_to(&b, 1.0), b);

        let (va, vb) = (Vec2::new(0.3, -0.9), Vec2::new(-0.6, 0.8));
        assert_eq!(va.lerp_to(&vb, 0.0), va);
        assert_eq!(va.lerp_to(&vb, 1.0), vb);
        assert_eq!([1.0f32, 2.0].lerp_to(&[3.0, 6.0], 0.5), [2.0, 4.0]);
    }

    #[test]
    fn test_ease_lerp() {
        let v = ease_lerp(&Vec2::ZERO, &Vec2::ONE, 0.5, Easing::QuadIn);
        assert!((v - Vec2::splat(0.25)).length() < 1e-3);
        assert_eq!(ease_lerp(&2.0f32, &4.0, 1.5, Easing::BackOut), 4.0);
        assert_eq!(ease_lerp(&2.0f32, &4.0, -0.5, Easing::BackIn), 2.0);
    }
}
