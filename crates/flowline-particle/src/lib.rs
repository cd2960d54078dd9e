//! Particles, their population and run configuration.
//!
//! A [`RunConfig`] is a partially specified run. Resolving it fills every
//! missing field from a seeded RNG and yields a [`ResolvedConfig`], which
//! serializes back to JSON and replays exactly. A [`Simulation`] built from a
//! resolved config steps its particles once per tick and pushes the segments
//! they draw into a [`PathSink`](flowline_vector::PathSink).
//!
//! # Example
//!
//! ```
//! use flowline_core::FlatHeightmap;
//! use flowline_particle::{RunConfig, Simulation};
//! use flowline_vector::PathCollector;
//!
//! let config = RunConfig {
//!     seed: Some(7),
//!     width: Some(200),
//!     height: Some(100),
//!     total_ticks: Some(50),
//!     ..Default::default()
//! }
//! .resolve(None)
//! .unwrap();
//!
//! let mut sim = Simulation::new(&config, Box::new(FlatHeightmap(0.5))).unwrap();
//! let mut paths = PathCollector::new();
//! assert_eq!(sim.run(&mut paths), 50);
//! assert!(sim.is_finished());
//! ```

mod config;
mod defaults;
mod edge;
mod manager;
mod particle;
mod simulation;
mod skip;

pub use config::{Mutation, ResolvedConfig, RunConfig};
pub use defaults::{ParticleDefaults, ParticleDefaultsConfig};
pub use edge::{EdgeOutcome, EdgePolicy};
pub use manager::ParticleManager;
pub use particle::{Particle, Scene, StepContext};
pub use simulation::Simulation;
pub use skip::SkipPattern;
