//! Stroke color of particles.

use flowline_color::{HexColor, Palette};
use flowline_core::math::random_int;
use flowline_core::{Canvas, ConfigError, Engine};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::function::control_functions;
use crate::{ControlState, Controller, ControllerSnapshot, ParticleView, evaluate};

/// Noise offset for color functions.
pub const COLOR_NOISE_OFFSET: f32 = 3.0;

control_functions! {
    /// Color functions.
    pub enum ColorFn for "color" {
        /// Color built from three rotated noise samples.
        Noise,
        /// A uniformly random color every tick.
        Random,
        /// A random palette color every tick.
        RandomPalette,
        /// The particle's base color.
        Constant,
        /// One palette color for every particle.
        GlobalConstant,
        /// The inverted base color.
        Inverse,
        /// Base color fading into the background over the life.
        FadeOut,
        /// Background fading into the base color over the life.
        FadeIn,
        /// Oscillates between background and base `fade_count` times per life.
        FadeInOut,
    }
}

/// Randomized color parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorParams {
    /// Color used by `GlobalConstant`.
    pub global_constant: HexColor,
    /// Fades per life for `FadeInOut`.
    pub fade_count: u32,
}

impl ColorParams {
    /// Draws fresh parameters, picking the global color from `palette`.
    pub fn random<R: Rng + ?Sized>(palette: &Palette, rng: &mut R) -> Self {
        Self {
            global_constant: palette.pick(rng),
            fade_count: random_int(rng, 1, 8) as u32,
        }
    }
}

/// Controls particle stroke color.
#[derive(Debug, Clone)]
pub struct ColorController {
    state: ControlState<ColorFn>,
    params: ColorParams,
    palette: Palette,
}

impl ColorController {
    /// A controller with random selection and parameters.
    pub fn new<R: Rng + ?Sized>(
        canvas: Canvas,
        total_ticks: u32,
        palette: Palette,
        rng: &mut R,
    ) -> Result<Self, ConfigError> {
        let state = ControlState::random(canvas, total_ticks, COLOR_NOISE_OFFSET, rng)?;
        let params = ColorParams::random(&palette, rng);
        Ok(Self { state, params, palette })
    }

    /// A controller restored from a snapshot.
    pub fn from_snapshot(
        canvas: Canvas,
        total_ticks: u32,
        palette: Palette,
        snapshot: &ControllerSnapshot<ColorParams>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            state: ControlState::from_snapshot(canvas, total_ticks, snapshot)?,
            params: snapshot.params,
            palette,
        })
    }

    /// The palette `RandomPalette` draws from.
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Color for a particle this tick.
    pub fn evaluate(&mut self, particle: &ParticleView, engine: &mut Engine) -> HexColor {
        let selection = self.state.selection;
        let fractions = self.state.fractions(&particle.heightmap);
        let easing = engine.easing();
        evaluate(selection, fractions, easing, |f| self.apply(f, particle, engine))
    }

    fn apply(&self, function: ColorFn, p: &ParticleView, engine: &mut Engine) -> HexColor {
        match function {
            ColorFn::Noise => {
                let origin = self.state.noise_origin();
                engine.noise_color(
                    p.position.x + origin.x,
                    p.position.y + origin.y,
                    self.state.tick as f32,
                )
            }
            ColorFn::Random => HexColor::random(engine.rng()),
            ColorFn::RandomPalette => self.palette.pick(engine.rng()),
            ColorFn::Constant => p.base_color,
            ColorFn::GlobalConstant => self.params.global_constant,
            ColorFn::Inverse => p.base_color.invert(),
            ColorFn::FadeOut => p.base_color.lerp(p.background, p.life_fraction()),
            ColorFn::FadeIn => p.background.lerp(p.base_color, p.life_fraction()),
            ColorFn::FadeInOut => p.background.lerp(p.base_color, p.cycles(self.params.fade_count)),
        }
    }
}

impl Controller for ColorController {
    type Function = ColorFn;
    type Params = ColorParams;

    fn state(&self) -> &ControlState<ColorFn> {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ControlState<ColorFn> {
        &mut self.state
    }

    fn params(&self) -> ColorParams {
        self.params
    }

    fn set_params(&mut self, params: ColorParams) {
        self.params = params;
    }
}
