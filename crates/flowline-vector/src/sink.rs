use std::collections::HashMap;

use glam::Vec2;

use crate::StrokeStyle;

/// One drawn step of a particle trail.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    /// Population slot of the particle that drew the segment.
    pub owner: usize,
    /// Start point.
    pub start: Vec2,
    /// End point.
    pub end: Vec2,
    /// Width, color, cap and join.
    pub style: StrokeStyle,
    /// True if this segment extends the owner's previous path.
    pub continues: bool,
}

/// Receives segments as particles emit them.
pub trait PathSink {
    /// Accepts one segment.
    fn segment(&mut self, segment: Segment);
}

impl PathSink for Vec<Segment> {
    fn segment(&mut self, segment: Segment) {
        self.push(segment);
    }
}

impl<S: PathSink + ?Sized> PathSink for &mut S {
    fn segment(&mut self, segment: Segment) {
        (**self).segment(segment);
    }
}

/// A polyline drawn with a single style.
#[derive(Debug, Clone, PartialEq)]
pub struct StrokePath {
    /// Stroke style shared by every point.
    pub style: StrokeStyle,
    /// Points in drawing order.
    pub points: Vec<Vec2>,
}

/// Joins continuing segments into polylines.
///
/// A segment with `continues == false` starts a new path for its owner; a
/// continuing segment appends its end point to the owner's open path.
#[derive(Debug, Clone, Default)]
pub struct PathCollector {
    paths: Vec<StrokePath>,
    open: HashMap<usize, usize>,
}

impl PathCollector {
    /// Creates an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Completed and open paths in the order they were started.
    pub fn paths(&self) -> &[StrokePath] {
        &self.paths
    }

    /// Consumes the collector, returning its paths.
    pub fn into_paths(self) -> Vec<StrokePath> {
        self.paths
    }

    /// Total number of points across all paths.
    pub fn point_count(&self) -> usize {
        self.paths.iter().map(|p| p.points.len()).sum()
    }

    /// Drops all paths.
    pub fn clear(&mut self) {
        self.paths.clear();
        self.open.clear();
    }
}

impl PathSink for PathCollector {
    fn segment(&mut self, segment: Segment) {
        if segment.continues {
            if let Some(path) = self.open.get(&segment.owner).and_then(|&i| self.paths.get_mut(i)) {
                path.points.push(segment.end);
                return;
            }
        }
        self.open.insert(segment.owner, self.paths.len());
        self.paths.push(StrokePath {
            style: segment.style,
            points: vec![segment.start, segment.end],
        });
    }
}
