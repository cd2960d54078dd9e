//! Scaled noise sampling with selectable noise models.

use rand::Rng;

use crate::{Fbm, Noise2D, Noise3D, Simplex2D, Simplex3D};

/// Octave count used by [`NoiseModel::Fractal`].
const FRACTAL_OCTAVES: u32 = 16;

/// Which noise source backs a [`NoiseEngine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum NoiseModel {
    /// Seeded simplex noise.
    #[default]
    Gradient,
    /// Sixteen octaves of seeded simplex noise.
    Fractal,
    /// Uncorrelated values from the thread RNG. Not reproducible.
    Uniform,
}

impl NoiseModel {
    /// Every model.
    pub const ALL: [NoiseModel; 3] = [NoiseModel::Gradient, NoiseModel::Fractal, NoiseModel::Uniform];

    /// Returns true when equal inputs and seeds give equal outputs.
    pub fn is_deterministic(self) -> bool {
        !matches!(self, NoiseModel::Uniform)
    }
}

/// Noise model, seed and coordinate scales.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct NoiseSettings {
    /// Noise source.
    pub model: NoiseModel,
    /// Seed for the permutation tables.
    pub seed: u64,
    /// Multiplier applied to the first spatial coordinate.
    pub x_scale: f32,
    /// Multiplier applied to the second spatial coordinate.
    pub y_scale: f32,
    /// Multiplier applied to the time coordinate.
    pub time_scale: f32,
    /// Spatial coordinates are divided by this and floored before scaling.
    pub field_scale: f32,
}

impl Default for NoiseSettings {
    fn default() -> Self {
        Self {
            model: NoiseModel::Gradient,
            seed: 0,
            x_scale: 0.015,
            y_scale: 0.015,
            time_scale: 0.001,
            field_scale: 1.0,
        }
    }
}

impl NoiseSettings {
    /// Draws a random model and scales for the given seed.
    ///
    /// Scales fall in `[0.0001, 0.1)` and the field scale is an integer in
    /// `[1, 50)`.
    pub fn random<R: Rng + ?Sized>(rng: &mut R, seed: u64) -> Self {
        Self {
            model: NoiseModel::ALL[rng.random_range(0..NoiseModel::ALL.len())],
            seed,
            x_scale: rng.random_range(0.0001..0.1),
            y_scale: rng.random_range(0.0001..0.1),
            time_scale: rng.random_range(0.0001..0.1),
            field_scale: rng.random_range(1..50) as f32,
        }
    }

    /// Sets the seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the model.
    pub fn with_model(mut self, model: NoiseModel) -> Self {
        self.model = model;
        self
    }
}

/// Samples noise in flowline's coordinate space.
///
/// Spatial coordinates are quantized to the field scale and multiplied by the
/// axis scales; the time coordinate is only multiplied by the time scale.
/// Every sample is in `[-1, 1]`.
#[derive(Debug, Clone)]
pub struct NoiseEngine {
    settings: NoiseSettings,
    plane: Fbm<Simplex2D>,
    volume: Fbm<Simplex3D>,
}

impl NoiseEngine {
    /// Builds an engine, shuffling permutation tables from the settings' seed.
    pub fn new(settings: NoiseSettings) -> Self {
        Self {
            settings,
            plane: Fbm::new(Simplex2D::with_seed(settings.seed)).octaves(FRACTAL_OCTAVES),
            volume: Fbm::new(Simplex3D::with_seed(settings.seed)).octaves(FRACTAL_OCTAVES),
        }
    }

    /// Returns the active settings.
    pub fn settings(&self) -> &NoiseSettings {
        &self.settings
    }

    #[inline]
    fn quantize(&self, v: f32) -> f32 {
        (v / self.settings.field_scale).floor()
    }

    /// One-dimensional noise, sampled from the 2D field along its diagonal.
    pub fn noise1d(&self, a: f32) -> f32 {
        let a = self.quantize(a);
        self.raw2d(a, a)
    }

    /// Two-dimensional noise.
    pub fn noise2d(&self, a: f32, b: f32) -> f32 {
        self.raw2d(self.quantize(a), self.quantize(b))
    }

    /// Three-dimensional noise; `c` is the time coordinate.
    pub fn noise3d(&self, a: f32, b: f32, c: f32) -> f32 {
        let s = &self.settings;
        let (x, y, t) = (
            self.quantize(a) * s.x_scale,
            self.quantize(b) * s.y_scale,
            c * s.time_scale,
        );
        match s.model {
            NoiseModel::Gradient => self.volume.noise.sample_signed(x, y, t),
            NoiseModel::Fractal => self.volume.sample_signed(x, y, t),
            NoiseModel::Uniform => uniform(),
        }
    }

    fn raw2d(&self, a: f32, b: f32) -> f32 {
        let s = &self.settings;
        let (x, y) = (a * s.x_scale, b * s.y_scale);
        match s.model {
            NoiseModel::Gradient => self.plane.noise.sample_signed(x, y),
            NoiseModel::Fractal => self.plane.sample_signed(x, y),
            NoiseModel::Uniform => uniform(),
        }
    }
}

impl Default for NoiseEngine {
    fn default() -> Self {
        Self::new(NoiseSettings::default())
    }
}

fn uniform() -> f32 {
    rand::rng().random_range(-1.0..1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_outputs_signed_range() {
        for model in NoiseModel::ALL {
            let engine = NoiseEngine::new(NoiseSettings::default().with_seed(11).with_model(model));
            for i in 0..40 {
                let p = i as f32 * 7.3;
                for v in [
                    engine.noise1d(p),
                    engine.noise2d(p, p * 0.5),
                    engine.noise3d(p, p * 0.5, i as f32),
                ] {
                    assert!((-1.0..=1.0).contains(&v), "{:?} produced {}", model, v);
                }
            }
        }
    }

    #[test]
    fn test_same_seed_same_output() {
        for model in [NoiseModel::Gradient, NoiseModel::Fractal] {
            let settings = NoiseSettings::default().with_seed(99).with_model(model);
            let a = NoiseEngine::new(settings);
            let b = NoiseEngine::new(settings);
            for i in 0..25 {
                let p = i as f32 * 13.1;
                assert_eq!(a.noise3d(p, p + 1.0, p * 2.0), b.noise3d(p, p + 1.0, p * 2.0));
                assert_eq!(a.noise1d(p), b.noise1d(p));
            }
        }
    }

    #[test]
    fn test_field_scale_quantizes_space() {
        let settings = NoiseSettings {
            field_scale: 10.0,
            ..NoiseSettings::default().with_seed(4)
        };
        let engine = NoiseEngine::new(settings);
        // 20.0 and 29.9 fall in the same cell.
        assert_eq!(engine.noise2d(20.0, 40.0), engine.noise2d(29.9, 49.5));
        assert_eq!(engine.noise3d(20.0, 40.0, 3.0), engine.noise3d(29.9, 49.5, 3.0));
    }

    #[test]
    fn test_noise1d_samples_diagonal() {
        let engine = NoiseEngine::new(NoiseSettings::default().with_seed(8));
        assert_eq!(engine.noise1d(37.0), engine.noise2d(37.0, 37.0));
    }

    #[test]
    fn test_random_settings_ranges() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..200 {
            let s = NoiseSettings::random(&mut rng, 5);
            assert_eq!(s.seed, 5);
            for scale in [s.x_scale, s.y_scale, s.time_scale] {
                assert!((0.0001..0.1).contains(&scale));
            }
            assert!((1.0..50.0).contains(&s.field_scale));
            assert_eq!(s.field_scale.fract(), 0.0);
        }
    }
}
