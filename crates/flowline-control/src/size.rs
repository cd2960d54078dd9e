//! Stroke width of particles.

use flowline_core::{Canvas, ConfigError, Engine};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::function::control_functions;
use crate::{ControlState, Controller, ControllerSnapshot, ParticleView, evaluate};

/// Noise offset for size functions.
pub const SIZE_NOISE_OFFSET: f32 = 5.0;

control_functions! {
    /// Size functions. Each returns a value in `[0, 1]`.
    pub enum SizeFn for "size" {
        /// Noise field at the particle's position and tick.
        Noise,
        /// A fresh random width every tick.
        Random,
        /// The widest stroke.
        Big,
        /// Halfway between the narrowest and widest stroke.
        Medium,
        /// The narrowest stroke.
        Small,
        /// Narrows from widest to narrowest over the life.
        Shrink,
        /// Widens from narrowest to widest over the life.
        Grow,
        /// The heightmap value.
        Heightmap,
    }
}

/// Size has no randomized parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SizeParams {}

/// Controls particle stroke width.
#[derive(Debug, Clone)]
pub struct SizeController {
    state: ControlState<SizeFn>,
}

impl SizeController {
    /// A controller with a random selection.
    pub fn new<R: Rng + ?Sized>(canvas: Canvas, total_ticks: u32, rng: &mut R) -> Result<Self, ConfigError> {
        Ok(Self {
            state: ControlState::random(canvas, total_ticks, SIZE_NOISE_OFFSET, rng)?,
        })
    }

    /// A controller restored from a snapshot.
    pub fn from_snapshot(
        canvas: Canvas,
        total_ticks: u32,
        snapshot: &ControllerSnapshot<SizeParams>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            state: ControlState::from_snapshot(canvas, total_ticks, snapshot)?,
        })
    }

    /// Size for a particle this tick, clamped to `[0, 1]`.
    pub fn evaluate(&mut self, particle: &ParticleView, engine: &mut Engine) -> f32 {
        let selection = self.state.selection;
        let fractions = self.state.fractions(&particle.heightmap);
        let easing = engine.easing();
        evaluate(selection, fractions, easing, |f| self.apply(f, particle, engine)).clamp(0.0, 1.0)
    }

    fn apply(&self, function: SizeFn, p: &ParticleView, engine: &mut Engine) -> f32 {
        match function {
            SizeFn::Noise => {
                let origin = self.state.noise_origin();
                let n = engine.noise3d(
                    p.position.x + origin.x,
                    p.position.y + origin.y,
                    self.state.tick as f32,
                );
                0.5 + n / 2.0
            }
            SizeFn::Random => engine.random_range(0.0, 1.0),
            SizeFn::Big => 1.0,
            SizeFn::Medium => 0.5,
            SizeFn::Small => 0.0,
            SizeFn::Shrink => 1.0 - p.life_fraction(),
            SizeFn::Grow => p.life_fraction(),
            SizeFn::Heightmap => p.heightmap.channel(self.state.heightmap_channel),
        }
    }
}

impl Controller for SizeController {
    type Function = SizeFn;
    type Params = SizeParams;

    fn state(&self) -> &ControlState<SizeFn> {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ControlState<SizeFn> {
        &mut self.state
    }

    fn params(&self) -> SizeParams {
        SizeParams {}
    }

    fn set_params(&mut self, _params: SizeParams) {}
}
