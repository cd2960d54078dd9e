use glam::Vec2;

/// Dimensions of the drawing surface in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Creates a canvas.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width and height as a vector.
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    /// The canvas centre.
    pub fn center(&self) -> Vec2 {
        self.size() * 0.5
    }

    /// Mean of width and height, rounded.
    pub fn average_dimension(&self) -> f32 {
        ((self.width as f32 + self.height as f32) / 2.0).round()
    }

    /// The smaller of width and height.
    pub fn min_dimension(&self) -> f32 {
        self.width.min(self.height) as f32
    }

    /// True if `p` lies within `[0, width] x [0, height]`.
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= 0.0 && p.y >= 0.0 && p.x <= self.width as f32 && p.y <= self.height as f32
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new(1920, 1080)
    }
}
