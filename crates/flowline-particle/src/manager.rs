use flowline_core::ConfigError;
use flowline_vector::PathSink;

use crate::{Particle, StepContext};

/// A population of particles stepped in slot order.
#[derive(Debug, Clone, Default)]
pub struct ParticleManager {
    particles: Vec<Particle>,
}

impl ParticleManager {
    /// Creates an empty population.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `count` particles, each spawning from the position
    /// controller in `ctx`.
    pub fn spawn(&mut self, count: usize, ctx: &mut StepContext<'_>) -> Result<(), ConfigError> {
        let skip = ctx.defaults.skip()?;
        self.particles.reserve(count);
        for _ in 0..count {
            let slot = self.particles.len();
            let particle = Particle::spawn(slot, skip.clone(), ctx);
            self.particles.push(particle);
        }
        log::debug!("spawned {} particles", count);
        Ok(())
    }

    /// Steps every particle once.
    pub fn step(&mut self, ctx: &mut StepContext<'_>, sink: &mut dyn PathSink) {
        for particle in &mut self.particles {
            particle.step(ctx, sink);
        }
    }

    /// Removes every particle.
    pub fn clear(&mut self) {
        self.particles.clear();
    }

    /// The population in slot order.
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Number of particles.
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// True if there are no particles.
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}
