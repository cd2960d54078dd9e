//! The per-run noise, easing and randomness engine.

use flowline_color::HexColor;
use flowline_easing::{Easing, Lerp, ease_lerp};
use flowline_noise::{NoiseEngine, NoiseSettings};
use glam::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::math;

/// Salt separating the simulation stream from the permutation shuffle.
const SIMULATION_STREAM: u64 = 0x9E37_79B9_7F4A_7C15;

/// Noise settings plus the easing curve used for every blend in a run.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EngineSettings {
    /// Noise model, seed and scales.
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub noise: NoiseSettings,
    /// Easing curve for muxes and fades.
    #[cfg_attr(feature = "serde", serde(default))]
    pub easing: Easing,
}

impl EngineSettings {
    /// Draws random noise settings and a random easing curve for `seed`.
    pub fn random<R: Rng + ?Sized>(rng: &mut R, seed: u64) -> Self {
        Self {
            noise: NoiseSettings::random(rng, seed),
            easing: Easing::ALL[rng.random_range(0..Easing::ALL.len())],
        }
    }
}

/// Noise, easing and the seeded simulation RNG for one run.
///
/// Every random draw made while stepping particles goes through [`Engine::rng`],
/// so two engines built from the same settings replay identically as long as
/// the noise model is deterministic.
#[derive(Debug, Clone)]
pub struct Engine {
    settings: EngineSettings,
    noise: NoiseEngine,
    rng: StdRng,
}

impl Engine {
    /// Builds an engine from settings.
    pub fn new(settings: EngineSettings) -> Self {
        Self {
            settings,
            noise: NoiseEngine::new(settings.noise),
            rng: StdRng::seed_from_u64(settings.noise.seed ^ SIMULATION_STREAM),
        }
    }

    /// Returns the settings this engine was built from.
    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Returns the easing curve.
    pub fn easing(&self) -> Easing {
        self.settings.easing
    }

    /// One-dimensional noise in `[-1, 1]`.
    pub fn noise1d(&self, a: f32) -> f32 {
        self.noise.noise1d(a)
    }

    /// Two-dimensional noise in `[-1, 1]`.
    pub fn noise2d(&self, a: f32, b: f32) -> f32 {
        self.noise.noise2d(a, b)
    }

    /// Three-dimensional noise in `[-1, 1]`; `c` is time.
    pub fn noise3d(&self, a: f32, b: f32, c: f32) -> f32 {
        self.noise.noise3d(a, b, c)
    }

    /// A color whose channels are three rotated noise samples.
    pub fn noise_color(&self, a: f32, b: f32, c: f32) -> HexColor {
        let channel = |n: f32| math::clamp_round((n + 1.0) * 127.0, 0.0, 255.0);
        HexColor::from_channels(
            channel(self.noise3d(a, b, c)),
            channel(self.noise3d(c, a, b)),
            channel(self.noise3d(b, c, a)),
        )
    }

    /// Applies the easing curve to `t`.
    pub fn ease(&self, t: f32) -> f32 {
        self.settings.easing.ease(t)
    }

    /// Eases from `a` to `b` by `t` using the engine's curve.
    pub fn ease_between<T: Lerp>(&self, a: &T, b: &T, t: f32) -> T {
        ease_lerp(a, b, t, self.settings.easing)
    }

    /// The simulation RNG.
    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    /// Uniform float in `[min, max)`; `min` for an empty range.
    pub fn random_range(&mut self, min: f32, max: f32) -> f32 {
        math::random_range(&mut self.rng, min, max)
    }

    /// Uniform integer in `[min, max)`; `min` for an empty range.
    pub fn random_int(&mut self, min: i64, max: i64) -> i64 {
        math::random_int(&mut self.rng, min, max)
    }

    /// Uniform angle in `[0, 2π)`.
    pub fn random_angle(&mut self) -> f32 {
        math::random_angle(&mut self.rng)
    }

    /// Unit vector in a uniformly random direction.
    pub fn random_unit_vector(&mut self) -> Vec2 {
        math::random_unit_vector(&mut self.rng)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowline_noise::NoiseModel;

    fn engine(seed: u64, easing: Easing) -> Engine {
        Engine::new(EngineSettings {
            noise: NoiseSettings::default().with_seed(seed),
            easing,
        })
    }

    #[test]
    fn test_same_settings_same_draws() {
        let mut a = engine(77, Easing::Linear);
        let mut b = engine(77, Easing::Linear);
        for _ in 0..20 {
            assert_eq!(a.random_range(0.0, 10.0), b.random_range(0.0, 10.0));
        }
        assert_eq!(a.noise3d(1.0, 2.0, 3.0), b.noise3d(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_ease_between_endpoints_exact() {
        for easing in Easing::ALL {
            let e = engine(1, easing);
            let (a, b) = (Vec2::new(0.3, -0.4), Vec2::new(-0.7, 0.1));
            assert_eq!(e.ease_between(&a, &b, 0.0), a);
            assert_eq!(e.ease_between(&a, &b, 1.0), b);
        }
    }

    #[test]
    fn test_noise_color_uniform_model_stays_valid() {
        let e = Engine::new(EngineSettings {
            noise: NoiseSettings::default().with_model(NoiseModel::Uniform),
            easing: Easing::Linear,
        });
        for i in 0..20 {
            let _ = e.noise_color(i as f32, 2.0, 3.0);
        }
    }

    #[test]
    fn test_noise_color_deterministic() {
        let e = engine(5, Easing::Linear);
        assert_eq!(e.noise_color(10.0, 20.0, 30.0), e.noise_color(10.0, 20.0, 30.0));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_settings_json_flattened() {
        let settings = EngineSettings {
            noise: NoiseSettings::default().with_seed(12),
            easing: Easing::SineIn,
        };
        let json = serde_json::to_value(settings).unwrap();
        assert_eq!(json["seed"], 12);
        assert_eq!(json["easing"], "sine_in");
        let back: EngineSettings = serde_json::from_value(json).unwrap();
        assert_eq!(back, settings);
    }
}
