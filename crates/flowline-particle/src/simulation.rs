//! Tick-by-tick driver for one run.

use flowline_control::Controllers;
use flowline_core::{ConfigError, Engine, Heightmap};
use flowline_vector::PathSink;

use crate::{ParticleDefaults, ParticleManager, ResolvedConfig, Scene, StepContext};

/// One run: engine, controllers, population, scene and heightmap.
///
/// [`Simulation::advance`] is the only way time moves forward, so a batch
/// loop and a frame-driven caller produce the same strokes for the same run.
pub struct Simulation {
    engine: Engine,
    controllers: Controllers,
    manager: ParticleManager,
    scene: Scene,
    defaults: ParticleDefaults,
    heightmap: Box<dyn Heightmap>,
    num_particles: usize,
    tick: u32,
    total_ticks: u32,
}

impl Simulation {
    /// Builds a run and spawns its particles.
    ///
    /// Fails before any particle exists if the configuration is invalid.
    pub fn new(config: &ResolvedConfig, heightmap: Box<dyn Heightmap>) -> Result<Self, ConfigError> {
        config.validate()?;
        if !config.is_reproducible() {
            log::warn!("uniform noise model: replaying this run will not reproduce it");
        }
        let mut simulation = Self {
            engine: Engine::new(config.engine),
            controllers: config.controllers()?,
            manager: ParticleManager::new(),
            scene: config.scene(),
            defaults: config.particle_defaults.clone(),
            heightmap,
            num_particles: config.num_particles as usize,
            tick: 0,
            total_ticks: config.total_ticks,
        };
        simulation.spawn()?;
        log::info!(
            "simulation ready: {}x{} canvas, {} particles, {} ticks",
            simulation.scene.canvas.width,
            simulation.scene.canvas.height,
            simulation.num_particles,
            simulation.total_ticks
        );
        Ok(simulation)
    }

    fn spawn(&mut self) -> Result<(), ConfigError> {
        self.controllers.set_tick(self.tick);
        let mut ctx = StepContext {
            engine: &mut self.engine,
            controllers: &mut self.controllers,
            scene: &self.scene,
            heightmap: self.heightmap.as_ref(),
            defaults: &self.defaults,
        };
        self.manager.spawn(self.num_particles, &mut ctx)
    }

    /// Runs one tick. Returns false without doing anything once the run is
    /// finished.
    pub fn advance(&mut self, sink: &mut dyn PathSink) -> bool {
        if self.is_finished() {
            return false;
        }
        self.controllers.set_tick(self.tick);
        let mut ctx = StepContext {
            engine: &mut self.engine,
            controllers: &mut self.controllers,
            scene: &self.scene,
            heightmap: self.heightmap.as_ref(),
            defaults: &self.defaults,
        };
        self.manager.step(&mut ctx, sink);
        self.tick += 1;
        true
    }

    /// Advances until the run is finished. Returns the ticks run.
    pub fn run(&mut self, sink: &mut dyn PathSink) -> u32 {
        let start = self.tick;
        while self.advance(sink) {}
        log::info!("run finished after {} ticks", self.tick - start);
        self.tick - start
    }

    /// Clears the population, rewinds to tick zero and respawns.
    pub fn restart(&mut self) -> Result<(), ConfigError> {
        self.manager.clear();
        self.tick = 0;
        self.spawn()?;
        log::debug!("simulation restarted");
        Ok(())
    }

    /// True once every tick has run.
    pub fn is_finished(&self) -> bool {
        self.tick >= self.total_ticks
    }

    /// Ticks run so far.
    pub fn tick(&self) -> u32 {
        self.tick
    }

    /// Ticks in the run.
    pub fn total_ticks(&self) -> u32 {
        self.total_ticks
    }

    /// The population.
    pub fn manager(&self) -> &ParticleManager {
        &self.manager
    }

    /// The controllers.
    pub fn controllers(&self) -> &Controllers {
        &self.controllers
    }

    /// The engine.
    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Canvas, palette and background.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Population ranges and styles.
    pub fn defaults(&self) -> &ParticleDefaults {
        &self.defaults
    }
}
