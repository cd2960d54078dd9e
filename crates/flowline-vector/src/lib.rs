//! Stroke output for flowline.
//!
//! Particles emit [`Segment`]s into a [`PathSink`]. [`PathCollector`] joins
//! continuing segments back into polylines and [`svg::SvgDocument`] writes
//! them out.

mod sink;
mod stroke;
pub mod svg;

pub use sink::{PathCollector, PathSink, Segment, StrokePath};
pub use stroke::{LineCap, LineJoin, StrokeStyle};
