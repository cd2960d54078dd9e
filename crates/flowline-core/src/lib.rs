//! Core types shared by the flowline crates.
//!
//! - [`Engine`] - seeded noise, easing and random draws for one run
//! - [`Canvas`] - drawing surface dimensions
//! - [`Heightmap`] - per-position channel samples that drive heightmap functions
//! - [`ParticleKey`] - stable slot plus process-unique identity
//! - [`ConfigError`] - configuration failures raised before a run starts

mod canvas;
mod engine;
mod error;
mod heightmap;
mod id;
pub mod math;

pub use canvas::Canvas;
pub use engine::{Engine, EngineSettings};
pub use error::ConfigError;
pub use heightmap::{FlatHeightmap, Heightmap, HeightmapChannel, HeightmapSample};
pub use id::{ParticleId, ParticleKey};

pub use flowline_color::{HexColor, Palette};
pub use flowline_easing::{Easing, Lerp};
pub use flowline_noise::{NoiseModel, NoiseSettings};
pub use glam;
