//! Per-population particle ranges and styles.

use flowline_core::math::{random_int, random_range, random_skip_pattern};
use flowline_core::{Canvas, ConfigError};
use flowline_vector::{LineCap, LineJoin};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{EdgePolicy, SkipPattern};

/// Ranges and styles shared by every particle in a population.
///
/// Each particle draws its own size and lifespan from these ranges whenever
/// it resets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticleDefaults {
    /// Smallest stroke width.
    pub min_size: f32,
    /// Largest stroke width.
    pub max_size: f32,
    /// Shortest life in ticks.
    pub min_lifespan: f32,
    /// Longest life in ticks.
    pub max_lifespan: f32,
    /// Slowest speed in pixels per tick.
    pub min_speed: f32,
    /// Fastest speed in pixels per tick.
    pub max_speed: f32,
    /// Dash run lengths; empty draws continuously.
    pub skip_pattern: Vec<u32>,
    /// Stroke end style.
    pub line_cap: LineCap,
    /// Stroke corner style.
    pub line_join: LineJoin,
    /// Behavior at the canvas edge.
    pub edge_policy: EdgePolicy,
    /// Multiple of the velocity each drawn segment extends past the particle.
    pub overshoot: f32,
}

impl ParticleDefaults {
    /// Draws defaults scaled to a canvas and run length.
    pub fn random<R: Rng + ?Sized>(canvas: Canvas, total_ticks: u32, rng: &mut R) -> Self {
        Self::random_around(&ParticleDefaultsConfig::default(), canvas, total_ticks, rng)
    }

    /// Keeps the fields `given` sets and draws the rest.
    ///
    /// A missing maximum is drawn upward from the minimum in use, given or
    /// drawn, and a drawn minimum never exceeds a given maximum, so partial
    /// ranges always resolve to valid ones.
    pub fn random_around<R: Rng + ?Sized>(
        given: &ParticleDefaultsConfig,
        canvas: Canvas,
        total_ticks: u32,
        rng: &mut R,
    ) -> Self {
        let dim = canvas.average_dimension() as f64;
        let ticks = total_ticks as f64;
        let ceil = |v: f64| v.ceil() as i64;
        let round = |v: f64| v.round() as i64;

        let (min_size, max_size) = draw_range(
            rng,
            (given.min_size, given.max_size),
            |rng| random_int(rng, ceil(dim / 1000.0), ceil(dim / 250.0)).max(1),
            |rng, min| random_int(rng, min + 1, ceil(dim / 75.0).max(min + 2)),
        );
        let (min_lifespan, max_lifespan) = draw_range(
            rng,
            (given.min_lifespan, given.max_lifespan),
            |rng| random_int(rng, round(ticks / 70.0), round(ticks / 30.0)).max(4),
            |rng, min| random_int(rng, min, round(ticks / 5.0)),
        );
        let (min_speed, max_speed) = draw_range(
            rng,
            (given.min_speed, given.max_speed),
            |rng| random_int(rng, 1, ceil(dim / 500.0).max(1)),
            |rng, min| random_int(rng, min + 1, ceil(dim / 30.0).max(min + 2)),
        );

        let skip_pattern = match &given.skip_pattern {
            Some(pattern) => pattern.clone(),
            None if rng.random::<f32>() > 0.9 => random_skip_pattern(rng),
            None => Vec::new(),
        };
        let line_cap = given.line_cap.unwrap_or_else(|| LineCap::random(rng));
        let line_join = given.line_join.unwrap_or_else(|| LineJoin::random(rng));
        let edge_policy = given.edge_policy.unwrap_or_else(|| EdgePolicy::random(rng));
        let overshoot = match given.overshoot {
            Some(overshoot) => overshoot,
            None if rng.random::<f32>() > 0.9 => random_range(rng, 0.5, 8.0),
            None => 0.0,
        };

        Self {
            min_size,
            max_size,
            min_lifespan,
            max_lifespan,
            min_speed,
            max_speed,
            skip_pattern,
            line_cap,
            line_join,
            edge_policy,
            overshoot,
        }
    }

    /// Checks ranges, lifespans, speeds and the skip pattern.
    pub fn validate(&self) -> Result<(), ConfigError> {
        ConfigError::check_minimum("min_size", self.min_size as f64, 0.0)?;
        ConfigError::check_range("size", self.min_size as f64, self.max_size as f64)?;
        ConfigError::check_minimum("min_lifespan", self.min_lifespan as f64, 1.0)?;
        ConfigError::check_range("lifespan", self.min_lifespan as f64, self.max_lifespan as f64)?;
        if self.min_speed.is_nan() || self.min_speed <= 0.0 {
            return Err(ConfigError::BelowMinimum {
                field: "min_speed",
                minimum: f64::MIN_POSITIVE,
                value: self.min_speed as f64,
            });
        }
        ConfigError::check_range("speed", self.min_speed as f64, self.max_speed as f64)?;
        ConfigError::check_minimum("overshoot", self.overshoot as f64, 0.0)?;
        self.skip()?;
        Ok(())
    }

    /// The parsed skip pattern, if any.
    pub fn skip(&self) -> Result<Option<SkipPattern>, ConfigError> {
        if self.skip_pattern.is_empty() {
            return Ok(None);
        }
        SkipPattern::new(&self.skip_pattern).map(Some)
    }

    /// Rescales sizes, lifespans and speeds by `scale`, keeping every range
    /// valid.
    pub fn scaled(&self, scale: f32) -> Self {
        let min_size = (self.min_size * scale).round().max(1.0);
        let min_lifespan = (self.min_lifespan * scale).round().max(1.0);
        let min_speed = (self.min_speed * scale).max(1.0);
        Self {
            min_size,
            max_size: (self.max_size * scale).round().max(min_size),
            min_lifespan,
            max_lifespan: (self.max_lifespan * scale).round().max(min_lifespan),
            min_speed,
            max_speed: (self.max_speed * scale).round().max(min_speed),
            ..self.clone()
        }
    }
}

/// Partially specified [`ParticleDefaults`]; missing fields are randomized.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
#[allow(missing_docs)]
pub struct ParticleDefaultsConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_size: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_size: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_lifespan: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_lifespan: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_speed: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_speed: Option<f32>,
    /// An empty list disables dashing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_pattern: Option<Vec<u32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_cap: Option<LineCap>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_join: Option<LineJoin>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edge_policy: Option<EdgePolicy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overshoot: Option<f32>,
}

/// Resolves one min/max pair. Given values are kept as they are; an invalid
/// given pair is left for [`ParticleDefaults::validate`] to report.
fn draw_range<R: Rng + ?Sized>(
    rng: &mut R,
    (min, max): (Option<f32>, Option<f32>),
    draw_min: impl FnOnce(&mut R) -> i64,
    draw_max: impl FnOnce(&mut R, i64) -> i64,
) -> (f32, f32) {
    match (min, max) {
        (Some(min), Some(max)) => (min, max),
        (Some(min), None) => (min, draw_max(rng, min.ceil() as i64) as f32),
        (None, Some(max)) => ((draw_min(rng) as f32).min(max), max),
        (None, None) => {
            let min = draw_min(rng);
            (min as f32, draw_max(rng, min) as f32)
        }
    }
}

impl From<ParticleDefaults> for ParticleDefaultsConfig {
    fn from(d: ParticleDefaults) -> Self {
        Self {
            min_size: Some(d.min_size),
            max_size: Some(d.max_size),
            min_lifespan: Some(d.min_lifespan),
            max_lifespan: Some(d.max_lifespan),
            min_speed: Some(d.min_speed),
            max_speed: Some(d.max_speed),
            skip_pattern: Some(d.skip_pattern),
            line_cap: Some(d.line_cap),
            line_join: Some(d.line_join),
            edge_policy: Some(d.edge_policy),
            overshoot: Some(d.overshoot),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_random_defaults_are_valid() {
        let mut rng = StdRng::seed_from_u64(21);
        for (w, h, ticks) in [(1920, 1080, 300), (64, 48, 100), (4000, 3000, 499), (1, 1, 1)] {
            for _ in 0..20 {
                let d = ParticleDefaults::random(Canvas::new(w, h), ticks, &mut rng);
                d.validate().unwrap();
                assert!(d.min_lifespan >= 4.0);
                assert!(d.max_size > d.min_size);
                assert!(d.max_speed > d.min_speed);
            }
        }
    }

    #[test]
    fn test_validate_rejects_bad_ranges() {
        let mut rng = StdRng::seed_from_u64(22);
        let base = ParticleDefaults::random(Canvas::new(800, 600), 200, &mut rng);

        let swapped = ParticleDefaults {
            min_size: 10.0,
            max_size: 2.0,
            ..base.clone()
        };
        assert!(matches!(
            swapped.validate(),
            Err(ConfigError::InvalidRange { field: "size", .. })
        ));

        let short = ParticleDefaults {
            min_lifespan: 0.5,
            ..base.clone()
        };
        assert!(matches!(short.validate(), Err(ConfigError::BelowMinimum { .. })));

        let still = ParticleDefaults {
            min_speed: 0.0,
            ..base.clone()
        };
        assert!(still.validate().is_err());

        let dashed = ParticleDefaults {
            skip_pattern: vec![2, 0],
            ..base
        };
        assert!(dashed.validate().is_err());
    }

    #[test]
    fn test_config_fills_missing_fields() {
        let mut rng = StdRng::seed_from_u64(23);
        let config: ParticleDefaultsConfig =
            serde_json::from_str(r#"{"max_speed": 12.5, "skip_pattern": [], "edge_policy": "bounce"}"#).unwrap();
        let resolved = ParticleDefaults::random_around(&config, Canvas::new(800, 600), 200, &mut rng);
        resolved.validate().unwrap();
        assert_eq!(resolved.max_speed, 12.5);
        assert!(resolved.skip_pattern.is_empty());
        assert_eq!(resolved.edge_policy, EdgePolicy::Bounce);
    }

    #[test]
    fn test_given_minimum_raises_drawn_maximum() {
        let mut rng = StdRng::seed_from_u64(24);
        for min in [20.0, 300.0, 5000.0] {
            let config = ParticleDefaultsConfig {
                min_size: Some(min),
                min_lifespan: Some(min),
                min_speed: Some(min),
                ..Default::default()
            };
            for _ in 0..20 {
                let d = ParticleDefaults::random_around(&config, Canvas::new(640, 480), 200, &mut rng);
                d.validate().unwrap();
                assert_eq!((d.min_size, d.min_lifespan, d.min_speed), (min, min, min));
                assert!(d.max_size > min);
                assert!(d.max_lifespan >= min);
                assert!(d.max_speed > min);
            }
        }
    }

    #[test]
    fn test_given_maximum_caps_drawn_minimum() {
        let mut rng = StdRng::seed_from_u64(25);
        let config = ParticleDefaultsConfig {
            max_size: Some(1.0),
            max_lifespan: Some(2.0),
            max_speed: Some(1.0),
            ..Default::default()
        };
        for _ in 0..20 {
            let d = ParticleDefaults::random_around(&config, Canvas::new(4000, 3000), 400, &mut rng);
            d.validate().unwrap();
            assert_eq!((d.max_size, d.max_lifespan, d.max_speed), (1.0, 2.0, 1.0));
        }
    }

    #[test]
    fn test_scaled_keeps_ranges() {
        let d = ParticleDefaults {
            min_size: 2.0,
            max_size: 3.0,
            min_lifespan: 4.0,
            max_lifespan: 5.0,
            min_speed: 1.0,
            max_speed: 2.0,
            skip_pattern: Vec::new(),
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            edge_policy: EdgePolicy::Kill,
            overshoot: 0.0,
        };
        let small = d.scaled(0.1);
        small.validate().unwrap();
        assert_eq!(small.min_size, 1.0);
        let big = d.scaled(2.0);
        assert_eq!((big.min_size, big.max_size), (4.0, 6.0));
        assert_eq!((big.min_speed, big.max_speed), (2.0, 4.0));
    }
}
