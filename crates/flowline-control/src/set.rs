//! The five controllers of a run, bundled.

use flowline_color::Palette;
use flowline_core::{Canvas, ConfigError};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{
    AngleController, AngleParams, ColorController, ColorParams, Controller, ControllerSnapshot,
    MagnitudeController, MagnitudeParams, PositionController, PositionParams, SizeController,
    SizeParams,
};

/// Snapshots of every controller in a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControllerSnapshots {
    /// Angle controller.
    pub angle_controller: ControllerSnapshot<AngleParams>,
    /// Magnitude controller.
    pub magnitude_controller: ControllerSnapshot<MagnitudeParams>,
    /// Size controller.
    pub size_controller: ControllerSnapshot<SizeParams>,
    /// Color controller.
    pub color_controller: ControllerSnapshot<ColorParams>,
    /// Position controller.
    pub position_controller: ControllerSnapshot<PositionParams>,
}

/// Every controller of a run.
#[derive(Debug, Clone)]
pub struct Controllers {
    /// Acceleration heading.
    pub angle: AngleController,
    /// Acceleration strength.
    pub magnitude: MagnitudeController,
    /// Stroke width.
    pub size: SizeController,
    /// Stroke color.
    pub color: ColorController,
    /// Spawn points.
    pub position: PositionController,
}

impl Controllers {
    /// Fresh random controllers, drawn in the order angle, magnitude, size,
    /// color, position.
    pub fn random<R: Rng + ?Sized>(
        canvas: Canvas,
        total_ticks: u32,
        palette: Palette,
        rng: &mut R,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            angle: AngleController::new(canvas, total_ticks, rng)?,
            magnitude: MagnitudeController::new(canvas, total_ticks, rng)?,
            size: SizeController::new(canvas, total_ticks, rng)?,
            color: ColorController::new(canvas, total_ticks, palette, rng)?,
            position: PositionController::new(canvas, total_ticks, rng)?,
        })
    }

    /// Controllers restored from snapshots.
    pub fn from_snapshots(
        canvas: Canvas,
        total_ticks: u32,
        palette: Palette,
        snapshots: &ControllerSnapshots,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            angle: AngleController::from_snapshot(canvas, total_ticks, &snapshots.angle_controller)?,
            magnitude: MagnitudeController::from_snapshot(canvas, total_ticks, &snapshots.magnitude_controller)?,
            size: SizeController::from_snapshot(canvas, total_ticks, &snapshots.size_controller)?,
            color: ColorController::from_snapshot(canvas, total_ticks, palette, &snapshots.color_controller)?,
            position: PositionController::from_snapshot(canvas, total_ticks, &snapshots.position_controller)?,
        })
    }

    /// Captures every controller.
    pub fn snapshots(&self) -> ControllerSnapshots {
        ControllerSnapshots {
            angle_controller: self.angle.snapshot(),
            magnitude_controller: self.magnitude.snapshot(),
            size_controller: self.size.snapshot(),
            color_controller: self.color.snapshot(),
            position_controller: self.position.snapshot(),
        }
    }

    /// Pushes the tick into every controller.
    pub fn set_tick(&mut self, tick: u32) {
        self.angle.set_tick(tick);
        self.magnitude.set_tick(tick);
        self.size.set_tick(tick);
        self.color.set_tick(tick);
        self.position.set_tick(tick);
    }

    /// The tick every controller currently sees.
    pub fn tick(&self) -> u32 {
        self.angle.state().tick
    }
}
