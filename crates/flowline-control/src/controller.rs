//! State and behavior shared by every controller.

use flowline_core::{Canvas, ConfigError, HeightmapChannel, HeightmapSample, HexColor, ParticleKey};
use glam::Vec2;
use rand::Rng;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::{ControlFunction, ControllerSnapshot, MuxFractions, MuxKind, Selection};

/// What a controller sees of a particle during evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleView {
    /// Slot and identity.
    pub key: ParticleKey,
    /// Current position.
    pub position: Vec2,
    /// Heightmap sample taken at the start of the tick.
    pub heightmap: HeightmapSample,
    /// Ticks lived.
    pub age: f32,
    /// Ticks the particle will live.
    pub lifespan: f32,
    /// Color drawn at the last reset.
    pub base_color: HexColor,
    /// Canvas background color.
    pub background: HexColor,
}

impl ParticleView {
    /// `age / lifespan`.
    pub fn life_fraction(&self) -> f32 {
        self.age / self.lifespan
    }

    /// Oscillation in `[0, 1]` completing `count` cycles over the lifespan.
    pub fn cycles(&self, count: u32) -> f32 {
        ((std::f32::consts::TAU * self.age / (self.lifespan / count as f32)).sin() + 1.0) / 2.0
    }
}

/// Fields every controller carries.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlState<F> {
    /// Active function or mux.
    pub selection: Selection<F>,
    /// Current tick.
    pub tick: u32,
    /// Ticks in the run.
    pub total_ticks: u32,
    /// Canvas the run draws on.
    pub canvas: Canvas,
    /// Multiple of the canvas size added to noise coordinates.
    pub noise_offset: f32,
    /// Channel read by heightmap functions and heightmap muxes.
    pub heightmap_channel: HeightmapChannel,
}

impl<F: ControlFunction> ControlState<F> {
    /// Fresh state with a random selection and heightmap channel.
    pub fn random<R: Rng + ?Sized>(
        canvas: Canvas,
        total_ticks: u32,
        noise_offset: f32,
        rng: &mut R,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            selection: Selection::random(rng)?,
            tick: 0,
            total_ticks,
            canvas,
            noise_offset,
            heightmap_channel: HeightmapChannel::random(rng),
        })
    }

    /// State restored from a snapshot.
    pub fn from_snapshot<P>(
        canvas: Canvas,
        total_ticks: u32,
        snapshot: &ControllerSnapshot<P>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            selection: Selection::from_names(
                &snapshot.function,
                snapshot.mux_a.as_deref(),
                snapshot.mux_b.as_deref(),
            )?,
            tick: 0,
            total_ticks,
            canvas,
            noise_offset: snapshot.noise_offset,
            heightmap_channel: snapshot.heightmap_channel,
        })
    }

    /// Noise-space origin: the offset times the canvas size.
    pub fn noise_origin(&self) -> Vec2 {
        self.canvas.size() * self.noise_offset
    }

    /// `tick / total_ticks`.
    pub fn time_fraction(&self) -> f32 {
        self.tick as f32 / self.total_ticks.max(1) as f32
    }

    /// Mux fractions for a particle's heightmap sample.
    pub fn fractions(&self, heightmap: &HeightmapSample) -> MuxFractions {
        MuxFractions {
            time: self.time_fraction(),
            heightmap: heightmap.channel(self.heightmap_channel),
        }
    }
}

/// A controller: one visual attribute driven by a selected control function.
pub trait Controller {
    /// The controller's function registry.
    type Function: ControlFunction;
    /// Randomized parameters saved in snapshots.
    type Params: Clone + Serialize + DeserializeOwned;

    /// Shared state.
    fn state(&self) -> &ControlState<Self::Function>;

    /// Mutable shared state.
    fn state_mut(&mut self) -> &mut ControlState<Self::Function>;

    /// Current parameters.
    fn params(&self) -> Self::Params;

    /// Replaces the parameters.
    fn set_params(&mut self, params: Self::Params);

    /// Pushes the current tick.
    fn set_tick(&mut self, tick: u32) {
        self.state_mut().tick = tick;
    }

    /// The active selection.
    fn selection(&self) -> Selection<Self::Function> {
        self.state().selection
    }

    /// Captures the controller's configuration.
    fn snapshot(&self) -> ControllerSnapshot<Self::Params> {
        let state = self.state();
        let (mux_a, mux_b) = state.selection.mux_names();
        ControllerSnapshot {
            function: state.selection.name().to_string(),
            mux_a: mux_a.map(str::to_string),
            mux_b: mux_b.map(str::to_string),
            noise_offset: state.noise_offset,
            heightmap_channel: state.heightmap_channel,
            params: self.params(),
        }
    }

    /// Applies a snapshot. Nothing changes if the snapshot is invalid.
    fn restore(&mut self, snapshot: &ControllerSnapshot<Self::Params>) -> Result<(), ConfigError> {
        let selection = Selection::from_names(
            &snapshot.function,
            snapshot.mux_a.as_deref(),
            snapshot.mux_b.as_deref(),
        )?;
        let state = self.state_mut();
        state.selection = selection;
        state.noise_offset = snapshot.noise_offset;
        state.heightmap_channel = snapshot.heightmap_channel;
        self.set_params(snapshot.params.clone());
        Ok(())
    }

    /// Selects a new random function or mux.
    fn randomize_control<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), ConfigError> {
        let selection = Selection::random(rng)?;
        log::debug!(
            "{} control randomized to {}",
            <Self::Function as ControlFunction>::CONTROLLER,
            selection.name()
        );
        self.state_mut().selection = selection;
        Ok(())
    }

    /// Forces a heightmap mux with random inputs and a fresh channel.
    fn randomize_heightmap_control<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), ConfigError> {
        let selection = Selection::random_mux(MuxKind::Heightmap, rng)?;
        let state = self.state_mut();
        state.selection = selection;
        state.heightmap_channel = HeightmapChannel::random(rng);
        Ok(())
    }
}
