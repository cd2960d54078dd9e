//! Strength of particle acceleration.

use flowline_core::math::{random_int, random_range};
use flowline_core::{Canvas, ConfigError, Engine};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::function::control_functions;
use crate::{ControlState, Controller, ControllerSnapshot, Memo, ParticleView, evaluate};

/// Noise offset for magnitude functions.
pub const MAGNITUDE_NOISE_OFFSET: f32 = 4.0;

control_functions! {
    /// Magnitude functions. Each returns a value in `[0, 1]`.
    pub enum MagnitudeFn for "magnitude" {
        /// Noise field at the particle's position and tick.
        Noise,
        /// A fresh random value every tick.
        Random,
        /// A random value per particle life.
        Constant,
        /// One value for every particle.
        GlobalConstant,
        /// Rises over the particle's life.
        Speedup,
        /// Falls over the particle's life.
        Slowdown,
        /// Pulses `boost_count` times per life.
        Boosts,
        /// The heightmap value.
        Heightmap,
    }
}

/// Randomized magnitude parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MagnitudeParams {
    /// Value used by `GlobalConstant`.
    pub global_constant: f32,
    /// Pulses per life.
    pub boost_count: u32,
}

impl MagnitudeParams {
    /// Draws fresh parameters.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            global_constant: random_range(rng, 0.0, 1.0),
            boost_count: random_int(rng, 1, 10) as u32,
        }
    }
}

/// Controls how hard particles accelerate.
#[derive(Debug, Clone)]
pub struct MagnitudeController {
    state: ControlState<MagnitudeFn>,
    params: MagnitudeParams,
    constants: Memo<f32>,
}

impl MagnitudeController {
    /// A controller with random selection and parameters.
    pub fn new<R: Rng + ?Sized>(canvas: Canvas, total_ticks: u32, rng: &mut R) -> Result<Self, ConfigError> {
        Ok(Self {
            state: ControlState::random(canvas, total_ticks, MAGNITUDE_NOISE_OFFSET, rng)?,
            params: MagnitudeParams::random(rng),
            constants: Memo::new(),
        })
    }

    /// A controller restored from a snapshot.
    pub fn from_snapshot(
        canvas: Canvas,
        total_ticks: u32,
        snapshot: &ControllerSnapshot<MagnitudeParams>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            state: ControlState::from_snapshot(canvas, total_ticks, snapshot)?,
            params: snapshot.params,
            constants: Memo::new(),
        })
    }

    /// Magnitude for a particle this tick, clamped to `[0, 1]`.
    pub fn evaluate(&mut self, particle: &ParticleView, engine: &mut Engine) -> f32 {
        let selection = self.state.selection;
        let fractions = self.state.fractions(&particle.heightmap);
        let easing = engine.easing();
        evaluate(selection, fractions, easing, |f| self.apply(f, particle, engine)).clamp(0.0, 1.0)
    }

    fn apply(&mut self, function: MagnitudeFn, p: &ParticleView, engine: &mut Engine) -> f32 {
        match function {
            MagnitudeFn::Noise => {
                let origin = self.state.noise_origin();
                let n = engine.noise3d(
                    p.position.x + origin.x,
                    p.position.y + origin.y,
                    self.state.tick as f32,
                );
                ((n + 1.0) / 2.0).clamp(0.0, 1.0)
            }
            MagnitudeFn::Random => engine.random_range(0.0, 1.0),
            MagnitudeFn::Constant => self
                .constants
                .get_or_insert_with(p.key, || engine.random_range(0.0, 1.0)),
            MagnitudeFn::GlobalConstant => self.params.global_constant,
            MagnitudeFn::Speedup => p.life_fraction(),
            MagnitudeFn::Slowdown => 1.0 - p.life_fraction(),
            MagnitudeFn::Boosts => p.cycles(self.params.boost_count),
            MagnitudeFn::Heightmap => p.heightmap.channel(self.state.heightmap_channel),
        }
    }
}

impl Controller for MagnitudeController {
    type Function = MagnitudeFn;
    type Params = MagnitudeParams;

    fn state(&self) -> &ControlState<MagnitudeFn> {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ControlState<MagnitudeFn> {
        &mut self.state
    }

    fn params(&self) -> MagnitudeParams {
        self.params
    }

    fn set_params(&mut self, params: MagnitudeParams) {
        self.params = params;
    }
}
