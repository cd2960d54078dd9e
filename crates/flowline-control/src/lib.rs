//! Control functions and the controllers that drive flowline particles.
//!
//! Each controller owns one visual attribute (heading, strength, width, color
//! or spawn point) and evaluates it through a [`Selection`]: either a single
//! named function or a mux easing between two of them.
//!
//! # Example
//!
//! ```
//! use flowline_control::{AngleController, Controller, ParticleView};
//! use flowline_core::{Canvas, Engine, HeightmapSample, HexColor, ParticleKey};
//! use glam::Vec2;
//! use rand::SeedableRng;
//!
//! let mut rng = rand::rngs::StdRng::seed_from_u64(1);
//! let mut angle = AngleController::new(Canvas::new(640, 480), 200, &mut rng).unwrap();
//! let mut engine = Engine::default();
//!
//! let view = ParticleView {
//!     key: ParticleKey::fresh(0),
//!     position: Vec2::new(10.0, 20.0),
//!     heightmap: HeightmapSample::uniform(0.5),
//!     age: 0.0,
//!     lifespan: 50.0,
//!     base_color: HexColor::WHITE,
//!     background: HexColor::BLACK,
//! };
//! angle.set_tick(3);
//! let direction = angle.evaluate(&view, &mut engine);
//! assert!(direction.is_finite());
//! ```

mod function;

mod angle;
mod color;
mod controller;
mod magnitude;
mod memo;
mod position;
mod set;
mod size;
mod snapshot;

pub use angle::{ANGLE_NOISE_OFFSET, AngleController, AngleFn, AngleParams};
pub use color::{COLOR_NOISE_OFFSET, ColorController, ColorFn, ColorParams};
pub use controller::{ControlState, Controller, ParticleView};
pub use function::{ControlFunction, MuxFractions, MuxKind, Selection, evaluate};
pub use magnitude::{MAGNITUDE_NOISE_OFFSET, MagnitudeController, MagnitudeFn, MagnitudeParams};
pub use memo::Memo;
pub use position::{POSITION_NOISE_OFFSET, PositionController, PositionFn, PositionParams};
pub use set::{ControllerSnapshots, Controllers};
pub use size::{SIZE_NOISE_OFFSET, SizeController, SizeFn, SizeParams};
pub use snapshot::ControllerSnapshot;
