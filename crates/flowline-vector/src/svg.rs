//! SVG export for collected stroke paths.
//!
//! # Example
//!
//! ```
//! use flowline_color::HexColor;
//! use flowline_vector::svg::SvgDocument;
//! use flowline_vector::{PathCollector, PathSink, Segment, StrokeStyle};
//! use glam::Vec2;
//!
//! let mut paths = PathCollector::new();
//! paths.segment(Segment {
//!     owner: 0,
//!     start: Vec2::ZERO,
//!     end: Vec2::new(10.0, 5.0),
//!     style: StrokeStyle::new(2, HexColor::WHITE),
//!     continues: false,
//! });
//!
//! let mut doc = SvgDocument::new(100, 100).with_background(HexColor::BLACK);
//! doc.add_paths(paths.paths());
//! assert!(doc.to_svg_string().contains("<polyline"));
//! ```

use std::fmt::{self, Write};

use flowline_color::HexColor;

use crate::StrokePath;

/// An SVG document of stroked polylines over an optional background.
#[derive(Debug, Clone)]
pub struct SvgDocument {
    /// Document width.
    pub width: u32,
    /// Document height.
    pub height: u32,
    /// Background fill, drawn as a full-size rectangle.
    pub background: Option<HexColor>,
    paths: Vec<StrokePath>,
}

impl SvgDocument {
    /// Creates an empty document.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            background: None,
            paths: Vec::new(),
        }
    }

    /// Sets the background color.
    pub fn with_background(mut self, color: HexColor) -> Self {
        self.background = Some(color);
        self
    }

    /// Adds one path.
    pub fn add_path(&mut self, path: &StrokePath) {
        self.paths.push(path.clone());
    }

    /// Adds every path in order.
    pub fn add_paths(&mut self, paths: &[StrokePath]) {
        self.paths.extend_from_slice(paths);
    }

    /// Number of paths in the document.
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// True if the document has no paths.
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Converts the document to an SVG string.
    pub fn to_svg_string(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for SvgDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n")?;
        writeln!(
            f,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">",
            w = self.width,
            h = self.height
        )?;

        if let Some(bg) = self.background {
            writeln!(
                f,
                "  <rect x=\"0\" y=\"0\" width=\"{}\" height=\"{}\" fill=\"{}\"/>",
                self.width, self.height, bg
            )?;
        }

        for path in &self.paths {
            write_polyline(f, path)?;
        }

        f.write_str("</svg>\n")
    }
}

fn write_polyline<W: Write>(out: &mut W, path: &StrokePath) -> fmt::Result {
    out.write_str("  <polyline points=\"")?;
    for (i, p) in path.points.iter().enumerate() {
        if i > 0 {
            out.write_char(' ')?;
        }
        write!(out, "{:.2},{:.2}", p.x, p.y)?;
    }
    let style = &path.style;
    writeln!(
        out,
        "\" fill=\"none\" stroke=\"{}\" stroke-width=\"{}\" stroke-linecap=\"{}\" stroke-linejoin=\"{}\"/>",
        style.color,
        style.width,
        style.cap.svg_name(),
        style.join.svg_name()
    )
}
