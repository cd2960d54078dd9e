//! Spawn points for particles.

use flowline_core::math::{clamp_round, random_int, random_range};
use flowline_core::{Canvas, ConfigError, Engine};
use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::function::control_functions;
use crate::{ControlState, Controller, ControllerSnapshot, MuxFractions, evaluate};

/// Noise offset for position functions.
pub const POSITION_NOISE_OFFSET: f32 = 1.0;

/// Fraction of a canvas dimension a spiral may stray outside the canvas.
const SPIRAL_MARGIN: f32 = 0.1;

control_functions! {
    /// Position functions. Each returns a canvas point.
    ///
    /// Positions are drawn before a particle exists, so only the time mux
    /// is available.
    pub enum PositionFn for "position" muxes [Time] {
        /// Canvas centre.
        Center,
        /// A fixed point.
        Point,
        /// Two noise samples mapped onto the canvas.
        Noise,
        /// Successive points on an outward spiral.
        Spiral,
    }
}

/// Randomized position parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionParams {
    /// Spiral radius growth; radius is `radius_scale * sqrt(counter)`.
    pub radius_scale: f32,
    /// Degrees the spiral turns per point.
    pub spiral_angle: f32,
    /// Starting spiral angle in degrees.
    pub angle_start: f32,
    /// Point used by `Point`.
    pub fixed_point: [u32; 2],
    /// Spiral points emitted since the last reset.
    #[serde(default)]
    pub spiral_counter: u32,
}

impl PositionParams {
    /// Draws fresh parameters for `canvas`.
    pub fn random<R: Rng + ?Sized>(canvas: Canvas, rng: &mut R) -> Self {
        Self {
            radius_scale: random_range(rng, 5.0, canvas.min_dimension() / 20.0),
            spiral_angle: random_range(rng, 1.0, 180.0),
            angle_start: random_range(rng, 0.0, 360.0),
            fixed_point: [
                random_int(rng, 0, canvas.width as i64) as u32,
                random_int(rng, 0, canvas.height as i64) as u32,
            ],
            spiral_counter: 0,
        }
    }
}

/// Chooses where particles spawn.
#[derive(Debug, Clone)]
pub struct PositionController {
    state: ControlState<PositionFn>,
    params: PositionParams,
}

impl PositionController {
    /// A controller with random selection and parameters.
    pub fn new<R: Rng + ?Sized>(canvas: Canvas, total_ticks: u32, rng: &mut R) -> Result<Self, ConfigError> {
        let state = ControlState::random(canvas, total_ticks, POSITION_NOISE_OFFSET, rng)?;
        let params = PositionParams::random(canvas, rng);
        Ok(Self { state, params })
    }

    /// A controller restored from a snapshot.
    pub fn from_snapshot(
        canvas: Canvas,
        total_ticks: u32,
        snapshot: &ControllerSnapshot<PositionParams>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            state: ControlState::from_snapshot(canvas, total_ticks, snapshot)?,
            params: snapshot.params,
        })
    }

    /// Next spawn point.
    pub fn evaluate(&mut self, engine: &mut Engine) -> Vec2 {
        let selection = self.state.selection;
        let fractions = MuxFractions {
            time: self.state.time_fraction(),
            heightmap: 0.0,
        };
        let easing = engine.easing();
        evaluate(selection, fractions, easing, |f| self.apply(f, engine))
    }

    fn apply(&mut self, function: PositionFn, engine: &mut Engine) -> Vec2 {
        let canvas = self.state.canvas;
        match function {
            PositionFn::Center => canvas.center(),
            PositionFn::Point => Vec2::new(self.params.fixed_point[0] as f32, self.params.fixed_point[1] as f32),
            PositionFn::Noise => {
                let (w, h) = (canvas.width as f32, canvas.height as f32);
                let origin = self.state.noise_origin();
                let t = self.state.tick as f32;
                let x = (engine.noise3d(w * origin.x, 0.0, t) + 1.0) / 2.0 * w;
                let y = (engine.noise3d(0.0, h * origin.y, -t) + 1.0) / 2.0 * h;
                Vec2::new(clamp_round(x, 0.0, w), clamp_round(y, 0.0, h))
            }
            PositionFn::Spiral => self.spiral(),
        }
    }

    fn spiral(&mut self) -> Vec2 {
        let canvas = self.state.canvas;
        let size = canvas.size();
        loop {
            let counter = self.params.spiral_counter;
            let angle = (self.params.angle_start + counter as f32 * self.params.spiral_angle).to_radians();
            let radius = self.params.radius_scale * (counter as f32).sqrt();
            self.params.spiral_counter = counter.wrapping_add(1);
            let point = canvas.center() + Vec2::from_angle(angle) * radius;

            let low = -size * SPIRAL_MARGIN;
            let high = size * (1.0 + SPIRAL_MARGIN);
            if point.cmpge(low).all() && point.cmple(high).all() {
                return point;
            }
            // Counter zero lands on the centre, so this loops at most once more.
            self.params.spiral_counter = 0;
        }
    }
}

impl Controller for PositionController {
    type Function = PositionFn;
    type Params = PositionParams;

    fn state(&self) -> &ControlState<PositionFn> {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ControlState<PositionFn> {
        &mut self.state
    }

    fn params(&self) -> PositionParams {
        self.params
    }

    fn set_params(&mut self, params: PositionParams) {
        self.params = params;
    }
}
