use flowline_core::HeightmapChannel;
use serde::{Deserialize, Serialize};

/// Serializable state of one controller.
///
/// Restoring a snapshot rebuilds the controller exactly, so a run can be
/// replayed from its metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControllerSnapshot<P> {
    /// Selected function or mux key.
    pub function: String,
    /// First mux input key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mux_a: Option<String>,
    /// Second mux input key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mux_b: Option<String>,
    /// Multiple of the canvas size added to noise coordinates.
    pub noise_offset: f32,
    /// Channel read by heightmap functions and heightmap muxes.
    #[serde(default)]
    pub heightmap_channel: HeightmapChannel,
    /// Controller-specific parameters.
    #[serde(flatten)]
    pub params: P,
}
