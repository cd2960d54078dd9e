//! Heading of particle acceleration.

use std::f32::consts::{PI, TAU};

use flowline_core::math::{random_int, random_range, round_to_nearest};
use flowline_core::{Canvas, ConfigError, Engine};
use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::function::control_functions;
use crate::{ControlState, Controller, ControllerSnapshot, Memo, ParticleView, evaluate};

/// Noise offset for angle functions.
pub const ANGLE_NOISE_OFFSET: f32 = 2.0;

control_functions! {
    /// Angle functions. Each returns a unit direction.
    pub enum AngleFn for "angle" {
        /// Direction from the noise field at the particle's position and tick.
        Noise,
        /// A random direction per particle life.
        Constant,
        /// One fixed direction for every particle.
        GlobalConstant,
        /// A fresh random direction every tick.
        Random,
        /// Swings around the start angle `curl_count` times per life.
        Curls,
        /// Wobbles near the start angle `wave_count` times per life.
        Waves,
        /// Turns full circles `loop_count` times per life.
        Loops,
        /// Start angle plus the heightmap value times π.
        Heightmap,
    }
}

/// Randomized angle parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AngleParams {
    /// Direction used by `GlobalConstant`, each component in `[-1, 1)`.
    pub global_constant: [f32; 2],
    /// Quantize every output direction.
    pub round_results: bool,
    /// Quantization step in degrees.
    pub round_to_angle: f32,
    /// Curls per life.
    pub curl_count: u32,
    /// Waves per life.
    pub wave_count: u32,
    /// Loops per life.
    pub loop_count: u32,
}

impl AngleParams {
    /// Draws fresh parameters.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            global_constant: [random_range(rng, -1.0, 1.0), random_range(rng, -1.0, 1.0)],
            round_results: rng.random_bool(0.5),
            round_to_angle: random_int(rng, 10, 90) as f32,
            curl_count: random_int(rng, 1, 10) as u32,
            wave_count: random_int(rng, 1, 10) as u32,
            loop_count: random_int(rng, 1, 10) as u32,
        }
    }
}

/// Controls the direction particles accelerate in.
#[derive(Debug, Clone)]
pub struct AngleController {
    state: ControlState<AngleFn>,
    params: AngleParams,
    start_angles: Memo<f32>,
    constant_directions: Memo<Vec2>,
}

impl AngleController {
    /// A controller with random selection and parameters.
    pub fn new<R: Rng + ?Sized>(canvas: Canvas, total_ticks: u32, rng: &mut R) -> Result<Self, ConfigError> {
        Ok(Self::with_parts(
            ControlState::random(canvas, total_ticks, ANGLE_NOISE_OFFSET, rng)?,
            AngleParams::random(rng),
        ))
    }

    /// A controller restored from a snapshot.
    pub fn from_snapshot(
        canvas: Canvas,
        total_ticks: u32,
        snapshot: &ControllerSnapshot<AngleParams>,
    ) -> Result<Self, ConfigError> {
        Ok(Self::with_parts(
            ControlState::from_snapshot(canvas, total_ticks, snapshot)?,
            snapshot.params,
        ))
    }

    fn with_parts(state: ControlState<AngleFn>, params: AngleParams) -> Self {
        Self {
            state,
            params,
            start_angles: Memo::new(),
            constant_directions: Memo::new(),
        }
    }

    /// Direction for a particle this tick.
    ///
    /// Plain functions return unit vectors; a mux returns the eased blend of
    /// two, which may be shorter. With rounding on, mux inputs are quantized
    /// before blending and the blend is quantized again.
    pub fn evaluate(&mut self, particle: &ParticleView, engine: &mut Engine) -> Vec2 {
        let selection = self.state.selection;
        let fractions = self.state.fractions(&particle.heightmap);
        let easing = engine.easing();
        let direction = evaluate(selection, fractions, easing, |f| {
            let direction = self.apply(f, particle, engine);
            self.round(direction)
        });
        self.round(direction)
    }

    fn apply(&mut self, function: AngleFn, p: &ParticleView, engine: &mut Engine) -> Vec2 {
        match function {
            AngleFn::Noise => {
                let origin = self.state.noise_origin();
                let n = engine.noise3d(
                    p.position.x + origin.x,
                    p.position.y + origin.y,
                    self.state.tick as f32,
                );
                Vec2::from_angle(n * TAU)
            }
            AngleFn::Random => engine.random_unit_vector(),
            AngleFn::Constant => self
                .constant_directions
                .get_or_insert_with(p.key, || engine.random_unit_vector()),
            AngleFn::GlobalConstant => Vec2::from(self.params.global_constant).normalize_or(Vec2::X),
            AngleFn::Curls => {
                let start = self.start_angle(p, engine);
                let swing = (self.params.curl_count as f32 * p.life_fraction() * TAU).sin() * PI;
                Vec2::from_angle(start + swing)
            }
            AngleFn::Waves => {
                let start = self.start_angle(p, engine);
                Vec2::from_angle(start + p.cycles(self.params.wave_count))
            }
            AngleFn::Loops => {
                let start = self.start_angle(p, engine);
                Vec2::from_angle(start + self.params.loop_count as f32 * p.life_fraction() * TAU)
            }
            AngleFn::Heightmap => {
                let start = self.start_angle(p, engine);
                let h = p.heightmap.channel(self.state.heightmap_channel);
                Vec2::from_angle(start + h * PI)
            }
        }
    }

    fn start_angle(&mut self, p: &ParticleView, engine: &mut Engine) -> f32 {
        self.start_angles.get_or_insert_with(p.key, || engine.random_angle())
    }

    fn round(&self, direction: Vec2) -> Vec2 {
        if !self.params.round_results {
            return direction;
        }
        let step = self.params.round_to_angle.to_radians();
        Vec2::from_angle(round_to_nearest(direction.to_angle(), step))
    }
}

impl Controller for AngleController {
    type Function = AngleFn;
    type Params = AngleParams;

    fn state(&self) -> &ControlState<AngleFn> {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ControlState<AngleFn> {
        &mut self.state
    }

    fn params(&self) -> AngleParams {
        self.params
    }

    fn set_params(&mut self, params: AngleParams) {
        self.params = params;
    }
}
