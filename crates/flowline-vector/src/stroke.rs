use flowline_color::HexColor;
use rand::Rng;

/// Style for line caps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum LineCap {
    /// Flat cap at the endpoint.
    Flat,
    /// Rounded cap.
    #[default]
    Round,
    /// Square cap extending past endpoint.
    Square,
}

impl LineCap {
    /// Every cap style.
    pub const ALL: [LineCap; 3] = [LineCap::Flat, LineCap::Round, LineCap::Square];

    /// Picks a cap style uniformly.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }

    /// The SVG `stroke-linecap` value.
    pub fn svg_name(self) -> &'static str {
        match self {
            LineCap::Flat => "butt",
            LineCap::Round => "round",
            LineCap::Square => "square",
        }
    }
}

/// Style for line joins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum LineJoin {
    /// Rounded corner.
    #[default]
    Round,
    /// Beveled (flat) corner.
    Bevel,
    /// Sharp corner.
    Sharp,
}

impl LineJoin {
    /// Every join style.
    pub const ALL: [LineJoin; 3] = [LineJoin::Round, LineJoin::Bevel, LineJoin::Sharp];

    /// Picks a join style uniformly.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }

    /// The SVG `stroke-linejoin` value.
    pub fn svg_name(self) -> &'static str {
        match self {
            LineJoin::Round => "round",
            LineJoin::Bevel => "bevel",
            LineJoin::Sharp => "miter",
        }
    }
}

/// How a segment is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StrokeStyle {
    /// Stroke width in whole pixels.
    pub width: u32,
    /// Stroke color.
    pub color: HexColor,
    /// Cap style.
    pub cap: LineCap,
    /// Join style.
    pub join: LineJoin,
}

impl StrokeStyle {
    /// Creates a style with the given width and color and default cap/join.
    pub fn new(width: u32, color: HexColor) -> Self {
        Self {
            width,
            color,
            cap: LineCap::default(),
            join: LineJoin::default(),
        }
    }

    /// Sets the cap style.
    pub fn with_cap(mut self, cap: LineCap) -> Self {
        self.cap = cap;
        self
    }

    /// Sets the join style.
    pub fn with_join(mut self, join: LineJoin) -> Self {
        self.join = join;
        self
    }
}
