//! Run configuration: partially specified runs, resolution and mutation.
//!
//! A [`RunConfig`] may leave any field out. [`RunConfig::resolve`] fills the
//! gaps from a random stream seeded by the run seed and returns a
//! [`ResolvedConfig`], which is also the run's metadata: loading it back as a
//! `RunConfig` and resolving again yields the same run.

use flowline_color::presets;
use flowline_control::{
    AngleParams, ColorParams, ControllerSnapshot, ControllerSnapshots, Controllers, MagnitudeParams,
    PositionParams, SizeParams,
};
use flowline_core::math::{nudge, nudge_int, random_int, random_skip_pattern};
use flowline_core::{Canvas, ConfigError, Easing, EngineSettings, HexColor, NoiseModel, Palette};
use flowline_vector::{LineCap, LineJoin};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::{EdgePolicy, ParticleDefaults, ParticleDefaultsConfig, Scene};

/// Salt separating the resolution stream from the simulation stream.
const RESOLVE_STREAM: u64 = 0xD1B5_4A32_D192_ED03;

/// Knobs for jittering a run before it is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Mutation {
    /// Chance that each numeric knob is nudged.
    pub nudge_chance: f32,
    /// Largest relative change of a nudge.
    pub nudge_magnitude: f32,
    /// Chance that a fresh palette is generated instead of a built-in one.
    /// Zero keeps to the built-in library.
    pub new_palette_chance: f32,
}

impl Default for Mutation {
    fn default() -> Self {
        Self {
            nudge_chance: 0.0,
            nudge_magnitude: 0.1,
            new_palette_chance: 0.0,
        }
    }
}

/// A run description where every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
#[allow(missing_docs)]
pub struct RunConfig {
    /// Overrides the engine seed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_ticks: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_particles: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub palette: Option<Palette>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<HexColor>,
    /// Keep the background color in the palette. A coin flip when missing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_background_color: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engine: Option<EngineSettings>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub angle_controller: Option<ControllerSnapshot<AngleParams>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub magnitude_controller: Option<ControllerSnapshot<MagnitudeParams>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_controller: Option<ControllerSnapshot<SizeParams>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_controller: Option<ControllerSnapshot<ColorParams>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position_controller: Option<ControllerSnapshot<PositionParams>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub particle_defaults: Option<ParticleDefaultsConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mutation: Option<Mutation>,
    /// Extra runs after the first.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repeat_times: Option<u32>,
}

impl RunConfig {
    /// Parses a run file.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Fills every missing field.
    ///
    /// The seed comes from `seed`, then the engine settings, then OS entropy.
    /// Missing width and height come from `canvas_hint`, else 1920x1080. If
    /// the mutation's nudge chance is positive the present fields are nudged
    /// first.
    pub fn resolve(mut self, canvas_hint: Option<Canvas>) -> Result<ResolvedConfig, ConfigError> {
        let seed = self
            .seed
            .or(self.engine.map(|e| e.noise.seed))
            .unwrap_or_else(|| rand::rng().random());
        let mut rng = StdRng::seed_from_u64(seed ^ RESOLVE_STREAM);
        let mutation = self.mutation.unwrap_or_default();
        if mutation.nudge_chance > 0.0 {
            self.nudge(&mut rng, &mutation);
        }

        let hint = canvas_hint.unwrap_or_default();
        let canvas = Canvas::new(self.width.unwrap_or(hint.width), self.height.unwrap_or(hint.height));
        ConfigError::check_minimum("width", canvas.width as f64, 1.0)?;
        ConfigError::check_minimum("height", canvas.height as f64, 1.0)?;

        let mut engine = self.engine.unwrap_or_else(|| EngineSettings::random(&mut rng, seed));
        engine.noise.seed = seed;
        ConfigError::check_minimum("field_scale", engine.noise.field_scale as f64, 1.0)?;

        let total_ticks = self
            .total_ticks
            .unwrap_or_else(|| random_int(&mut rng, 100, 500) as u32);
        ConfigError::check_minimum("total_ticks", total_ticks as f64, 1.0)?;
        let num_particles = self
            .num_particles
            .unwrap_or_else(|| random_int(&mut rng, 1, 8) as u32);

        let mut palette = match self.palette {
            Some(palette) => palette,
            None => presets::random_or_generated(&mut rng, mutation.new_palette_chance),
        };
        let background_color = match self.background_color {
            Some(color) => color,
            None => palette.pick(&mut rng),
        };
        let allow_background_color = self
            .allow_background_color
            .unwrap_or_else(|| rng.random::<f32>() > 0.5);
        if !allow_background_color {
            match palette.without(background_color) {
                Ok(rest) => palette = rest,
                Err(_) => log::warn!("palette only holds the background color {}; keeping it", background_color),
            }
        }

        let given = self.particle_defaults.unwrap_or_default();
        let particle_defaults = ParticleDefaults::random_around(&given, canvas, total_ticks, &mut rng);
        particle_defaults.validate()?;

        let mut controllers = Controllers::random(canvas, total_ticks, palette.clone(), &mut rng)?.snapshots();
        if let Some(s) = self.angle_controller {
            controllers.angle_controller = s;
        }
        if let Some(s) = self.magnitude_controller {
            controllers.magnitude_controller = s;
        }
        if let Some(s) = self.size_controller {
            controllers.size_controller = s;
        }
        if let Some(s) = self.color_controller {
            controllers.color_controller = s;
        }
        if let Some(s) = self.position_controller {
            controllers.position_controller = s;
        }
        Controllers::from_snapshots(canvas, total_ticks, palette.clone(), &controllers)?;

        let resolved = ResolvedConfig {
            width: canvas.width,
            height: canvas.height,
            total_ticks,
            num_particles,
            palette,
            background_color,
            allow_background_color,
            engine,
            controllers,
            particle_defaults,
            repeat_times: self.repeat_times.unwrap_or(0),
        };
        log::debug!(
            "resolved run: seed {} canvas {}x{} ticks {} particles {}",
            seed,
            resolved.width,
            resolved.height,
            total_ticks,
            num_particles
        );
        Ok(resolved)
    }

    /// Jitters the fields that are present.
    ///
    /// Numeric knobs are scaled by up to `nudge_magnitude`; discrete choices
    /// are redrawn; each with probability `nudge_chance`.
    pub fn nudge<R: Rng + ?Sized>(&mut self, rng: &mut R, mutation: &Mutation) {
        let chance = mutation.nudge_chance;
        let magnitude = mutation.nudge_magnitude;
        let roll = |rng: &mut R| rng.random::<f32>() < chance;

        if let Some(n) = &mut self.num_particles {
            *n = nudge_int(rng, *n as i64, chance, magnitude, 1, u32::MAX as i64) as u32;
        }

        if let Some(engine) = &mut self.engine {
            if roll(rng) {
                engine.noise.model = NoiseModel::ALL[rng.random_range(0..NoiseModel::ALL.len())];
            }
            if roll(rng) {
                engine.easing = Easing::ALL[rng.random_range(0..Easing::ALL.len())];
            }
            let noise = &mut engine.noise;
            noise.x_scale = nudge(rng, noise.x_scale, chance, magnitude, f32::MIN_POSITIVE, f32::MAX);
            noise.y_scale = nudge(rng, noise.y_scale, chance, magnitude, f32::MIN_POSITIVE, f32::MAX);
            noise.time_scale = nudge(rng, noise.time_scale, chance, magnitude, f32::MIN_POSITIVE, f32::MAX);
            noise.field_scale = nudge(rng, noise.field_scale, chance, magnitude, 1.0, f32::MAX).round();
        }

        if let Some(d) = &mut self.particle_defaults {
            let whole = |rng: &mut R, value: &mut Option<f32>, min: f32| {
                if let Some(v) = value {
                    *v = nudge(rng, *v, chance, magnitude, min, f32::MAX).round();
                }
            };
            whole(rng, &mut d.min_size, 1.0);
            whole(rng, &mut d.max_size, d.min_size.unwrap_or(1.0));
            whole(rng, &mut d.min_lifespan, 1.0);
            whole(rng, &mut d.max_lifespan, d.min_lifespan.unwrap_or(1.0));
            whole(rng, &mut d.min_speed, 1.0);
            whole(rng, &mut d.max_speed, d.min_speed.unwrap_or(1.0));
            if roll(rng) {
                if let Some(pattern) = &mut d.skip_pattern {
                    *pattern = if pattern.is_empty() {
                        random_skip_pattern(rng)
                    } else {
                        Vec::new()
                    };
                }
            }
            if roll(rng) {
                d.line_cap = Some(LineCap::random(rng));
            }
            if roll(rng) {
                d.line_join = Some(LineJoin::random(rng));
            }
            if roll(rng) {
                d.edge_policy = Some(EdgePolicy::random(rng));
            }
            if let Some(overshoot) = &mut d.overshoot {
                *overshoot = nudge(rng, *overshoot, chance, magnitude, 0.0, f32::MAX);
            }
        }

        if let Some(palette) = &mut self.palette {
            if roll(rng) {
                *palette = presets::random_or_generated(rng, mutation.new_palette_chance);
            } else {
                for color in palette.colors_mut() {
                    if roll(rng) {
                        *color = HexColor::random(rng);
                    }
                }
            }
            if roll(rng) {
                self.background_color = Some(palette.pick(rng));
            }
        }
    }
}

/// A fully specified run. Serialized as the run's metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedConfig {
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// Ticks in the run.
    pub total_ticks: u32,
    /// Population size.
    pub num_particles: u32,
    /// Colors particles draw from.
    pub palette: Palette,
    /// Canvas background.
    pub background_color: HexColor,
    /// Whether the background stayed in the palette.
    pub allow_background_color: bool,
    /// Noise and easing.
    pub engine: EngineSettings,
    /// Every controller.
    #[serde(flatten)]
    pub controllers: ControllerSnapshots,
    /// Population ranges and styles.
    pub particle_defaults: ParticleDefaults,
    /// Extra runs after the first.
    pub repeat_times: u32,
}

impl ResolvedConfig {
    /// The run seed.
    pub fn seed(&self) -> u64 {
        self.engine.noise.seed
    }

    /// False when the noise model draws from the thread RNG, so replaying
    /// this config gives a different drawing.
    pub fn is_reproducible(&self) -> bool {
        self.engine.noise.model.is_deterministic()
    }

    /// Canvas dimensions.
    pub fn canvas(&self) -> Canvas {
        Canvas::new(self.width, self.height)
    }

    /// Canvas, palette and background.
    pub fn scene(&self) -> Scene {
        Scene {
            canvas: self.canvas(),
            palette: self.palette.clone(),
            background: self.background_color,
        }
    }

    /// Checks every invariant a run relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        ConfigError::check_minimum("width", self.width as f64, 1.0)?;
        ConfigError::check_minimum("height", self.height as f64, 1.0)?;
        ConfigError::check_minimum("total_ticks", self.total_ticks as f64, 1.0)?;
        ConfigError::check_minimum("field_scale", self.engine.noise.field_scale as f64, 1.0)?;
        self.particle_defaults.validate()
    }

    /// Rebuilds the controllers this run describes.
    pub fn controllers(&self) -> Result<Controllers, ConfigError> {
        Controllers::from_snapshots(self.canvas(), self.total_ticks, self.palette.clone(), &self.controllers)
    }

    /// The same run on a `width` x `height` canvas.
    ///
    /// Noise scales, the spiral radius and particle ranges follow the mean
    /// of the two axis ratios.
    pub fn scaled_to(&self, width: u32, height: u32) -> Result<Self, ConfigError> {
        ConfigError::check_minimum("width", width as f64, 1.0)?;
        ConfigError::check_minimum("height", height as f64, 1.0)?;
        let scale = (width as f32 / self.width as f32 + height as f32 / self.height as f32) / 2.0;

        let mut scaled = self.clone();
        scaled.width = width;
        scaled.height = height;
        let noise = &mut scaled.engine.noise;
        noise.x_scale *= scale;
        noise.y_scale *= scale;
        noise.time_scale *= scale;
        noise.field_scale = (noise.field_scale * scale).max(1.0);
        scaled.controllers.position_controller.params.radius_scale *= scale;
        scaled.particle_defaults = self.particle_defaults.scaled(scale);
        log::debug!("scaled run to {}x{} (factor {:.3})", width, height, scale);
        Ok(scaled)
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl From<ResolvedConfig> for RunConfig {
    fn from(r: ResolvedConfig) -> Self {
        Self {
            seed: None,
            width: Some(r.width),
            height: Some(r.height),
            total_ticks: Some(r.total_ticks),
            num_particles: Some(r.num_particles),
            palette: Some(r.palette),
            background_color: Some(r.background_color),
            allow_background_color: Some(r.allow_background_color),
            engine: Some(r.engine),
            angle_controller: Some(r.controllers.angle_controller),
            magnitude_controller: Some(r.controllers.magnitude_controller),
            size_controller: Some(r.controllers.size_controller),
            color_controller: Some(r.controllers.color_controller),
            position_controller: Some(r.controllers.position_controller),
            particle_defaults: Some(r.particle_defaults.into()),
            mutation: None,
            repeat_times: Some(r.repeat_times),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(seed: u64) -> RunConfig {
        RunConfig {
            seed: Some(seed),
            ..Default::default()
        }
    }

    #[test]
    fn test_resolve_fills_everything() {
        let resolved = seeded(1).resolve(Some(Canvas::new(640, 480))).unwrap();
        resolved.validate().unwrap();
        assert_eq!((resolved.width, resolved.height), (640, 480));
        assert!((100..500).contains(&resolved.total_ticks));
        assert!((1..8).contains(&resolved.num_particles));
        assert_eq!(resolved.seed(), 1);
        assert!(
            resolved.allow_background_color
                || !resolved.palette.contains(resolved.background_color)
                || resolved.palette.len() == 1
        );
        resolved.controllers().unwrap();
    }

    #[test]
    fn test_default_canvas() {
        let resolved = seeded(2).resolve(None).unwrap();
        assert_eq!(resolved.canvas(), Canvas::new(1920, 1080));
    }

    #[test]
    fn test_same_seed_same_resolution() {
        let a = seeded(3).resolve(None).unwrap();
        let b = seeded(3).resolve(None).unwrap();
        assert_eq!(a, b);
        let c = seeded(4).resolve(None).unwrap();
        assert_ne!(a.engine, c.engine);
    }

    #[test]
    fn test_resolved_replays_through_json() {
        let resolved = seeded(5).resolve(None).unwrap();
        let json = resolved.to_json().unwrap();
        let reloaded = RunConfig::from_json(&json).unwrap();
        assert_eq!(reloaded.resolve(None).unwrap(), resolved);
    }

    #[test]
    fn test_explicit_fields_win() {
        let config = RunConfig::from_json(
            r##"{
                "seed": 6,
                "width": 300,
                "height": 200,
                "total_ticks": 42,
                "num_particles": 3,
                "palette": ["#ff0000", "#00ff00", "#0000ff"],
                "background_color": "#00ff00",
                "allow_background_color": false,
                "particle_defaults": {"min_size": 2, "max_size": 4},
                "angle_controller": {"function": "TimeMux", "mux_a": "Noise", "mux_b": "Loops",
                    "noise_offset": 2.0, "global_constant": [1.0, 0.0], "round_results": false,
                    "round_to_angle": 45.0, "curl_count": 2, "wave_count": 3, "loop_count": 4}
            }"##,
        )
        .unwrap();
        let resolved = config.resolve(None).unwrap();
        assert_eq!(resolved.total_ticks, 42);
        assert_eq!(resolved.num_particles, 3);
        assert_eq!(resolved.background_color, HexColor::from_u32(0x00ff00));
        assert_eq!(resolved.palette.colors(), &[HexColor::from_u32(0xff0000), HexColor::from_u32(0x0000ff)]);
        assert_eq!(resolved.particle_defaults.min_size, 2.0);
        assert_eq!(resolved.controllers.angle_controller.function, "TimeMux");
        assert_eq!(resolved.controllers.angle_controller.params.loop_count, 4);
    }

    #[test]
    fn test_allow_background_keeps_palette() {
        let config = RunConfig {
            seed: Some(7),
            palette: Some(Palette::new(vec![HexColor::WHITE, HexColor::BLACK]).unwrap()),
            background_color: Some(HexColor::BLACK),
            allow_background_color: Some(true),
            ..Default::default()
        };
        let resolved = config.resolve(None).unwrap();
        assert_eq!(resolved.palette.len(), 2);
    }

    #[test]
    fn test_unknown_function_fails() {
        let mut config = seeded(8);
        let mut snapshot = seeded(8).resolve(None).unwrap().controllers.size_controller;
        snapshot.function = "Huge".into();
        config.size_controller = Some(snapshot);
        assert!(matches!(
            config.resolve(None),
            Err(ConfigError::UnknownFunction { controller: "size", .. })
        ));
    }

    #[test]
    fn test_invalid_range_fails() {
        let config = RunConfig {
            seed: Some(9),
            particle_defaults: Some(ParticleDefaultsConfig {
                min_speed: Some(5.0),
                max_speed: Some(1.0),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert!(matches!(
            config.resolve(None),
            Err(ConfigError::InvalidRange { field: "speed", .. })
        ));
    }

    #[test]
    fn test_zero_ticks_fails() {
        let config = RunConfig {
            seed: Some(10),
            total_ticks: Some(0),
            ..Default::default()
        };
        assert!(matches!(config.resolve(None), Err(ConfigError::BelowMinimum { .. })));
    }

    #[test]
    fn test_minimum_only_defaults_resolve() {
        for seed in 0..20 {
            let config = RunConfig {
                seed: Some(seed),
                particle_defaults: Some(ParticleDefaultsConfig {
                    min_size: Some(20.0),
                    min_lifespan: Some(600.0),
                    min_speed: Some(40.0),
                    ..Default::default()
                }),
                ..Default::default()
            };
            let resolved = config.resolve(Some(Canvas::new(640, 480))).unwrap();
            let d = &resolved.particle_defaults;
            assert_eq!(d.min_size, 20.0);
            assert!(d.max_size > 20.0);
            assert!(d.max_lifespan >= 600.0);
            assert!(d.max_speed > 40.0);
        }
    }

    #[test]
    fn test_uniform_noise_is_not_reproducible() {
        let mut resolved = seeded(14).resolve(None).unwrap();
        for model in NoiseModel::ALL {
            resolved.engine.noise.model = model;
            assert_eq!(resolved.is_reproducible(), model != NoiseModel::Uniform);
        }
    }

    #[test]
    fn test_unset_background_choice_is_a_coin_flip() {
        let choices: Vec<bool> = (0..40)
            .map(|seed| seeded(seed).resolve(None).unwrap().allow_background_color)
            .collect();
        assert!(choices.contains(&true));
        assert!(choices.contains(&false));
        assert_eq!(Mutation::default().new_palette_chance, 0.0);
    }

    #[test]
    fn test_empty_palette_rejected_on_load() {
        assert!(RunConfig::from_json(r#"{"palette": []}"#).is_err());
        assert!(RunConfig::from_json(r#"{"background_color": "123456"}"#).is_err());
    }

    #[test]
    fn test_scaled_to_doubles() {
        let resolved = seeded(11).resolve(Some(Canvas::new(500, 400))).unwrap();
        let scaled = resolved.scaled_to(1000, 800).unwrap();
        scaled.validate().unwrap();
        assert_eq!(scaled.canvas(), Canvas::new(1000, 800));
        assert_eq!(scaled.engine.noise.x_scale, resolved.engine.noise.x_scale * 2.0);
        assert_eq!(
            scaled.controllers.position_controller.params.radius_scale,
            resolved.controllers.position_controller.params.radius_scale * 2.0
        );
        assert!(scaled.particle_defaults.max_speed >= scaled.particle_defaults.min_speed);
        assert!(resolved.scaled_to(0, 10).is_err());
    }

    #[test]
    fn test_nudge_zero_chance_changes_nothing() {
        let original: RunConfig = seeded(12).resolve(None).unwrap().into();
        let mut nudged = original.clone();
        let mutation = Mutation::default();
        nudged.nudge(&mut StdRng::seed_from_u64(1), &mutation);
        assert_eq!(nudged, original);
    }

    #[test]
    fn test_nudged_run_still_resolves() {
        let mut config: RunConfig = seeded(13).resolve(None).unwrap().into();
        config.mutation = Some(Mutation {
            nudge_chance: 1.0,
            nudge_magnitude: 0.5,
            new_palette_chance: 0.5,
        });
        let resolved = config.clone().resolve(None).unwrap();
        resolved.validate().unwrap();
        assert!(resolved.particle_defaults.min_size >= 1.0);
    }
}
