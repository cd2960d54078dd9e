use glam::Vec2;
use rand::Rng;

/// One channel of a heightmap sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum HeightmapChannel {
    /// Red channel.
    Red,
    /// Green channel.
    Green,
    /// Blue channel.
    Blue,
    /// Mean of red, green and blue.
    #[default]
    Average,
}

impl HeightmapChannel {
    /// Every channel.
    pub const ALL: [HeightmapChannel; 4] = [
        HeightmapChannel::Red,
        HeightmapChannel::Green,
        HeightmapChannel::Blue,
        HeightmapChannel::Average,
    ];

    /// Picks a channel uniformly.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }
}

/// Channel values at one position, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HeightmapSample {
    /// Red channel.
    pub red: f32,
    /// Green channel.
    pub green: f32,
    /// Blue channel.
    pub blue: f32,
    /// Mean of the other three.
    pub average: f32,
}

impl HeightmapSample {
    /// Builds a sample from color channels, computing the average.
    pub fn from_rgb(red: f32, green: f32, blue: f32) -> Self {
        Self {
            red,
            green,
            blue,
            average: (red + green + blue) / 3.0,
        }
    }

    /// Builds a sample from 8-bit color channels.
    pub fn from_rgb8(rgb: [u8; 3]) -> Self {
        Self::from_rgb(rgb[0] as f32 / 255.0, rgb[1] as f32 / 255.0, rgb[2] as f32 / 255.0)
    }

    /// A sample with every channel equal to `value`.
    pub fn uniform(value: f32) -> Self {
        Self {
            red: value,
            green: value,
            blue: value,
            average: value,
        }
    }

    /// Returns the value of `channel`.
    pub fn channel(&self, channel: HeightmapChannel) -> f32 {
        match channel {
            HeightmapChannel::Red => self.red,
            HeightmapChannel::Green => self.green,
            HeightmapChannel::Blue => self.blue,
            HeightmapChannel::Average => self.average,
        }
    }
}

/// A source of heightmap samples over the canvas.
///
/// Implementations must be pure for the duration of a run: the same position
/// always yields the same sample.
pub trait Heightmap {
    /// Samples the heightmap at a canvas position.
    fn sample(&self, position: Vec2) -> HeightmapSample;
}

impl<F> Heightmap for F
where
    F: Fn(Vec2) -> HeightmapSample,
{
    fn sample(&self, position: Vec2) -> HeightmapSample {
        self(position)
    }
}

/// A heightmap with the same value everywhere.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FlatHeightmap(pub f32);

impl Heightmap for FlatHeightmap {
    fn sample(&self, _position: Vec2) -> HeightmapSample {
        HeightmapSample::uniform(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_average_channel() {
        let s = HeightmapSample::from_rgb8([255, 0, 0]);
        assert_eq!(s.channel(HeightmapChannel::Red), 1.0);
        assert!((s.channel(HeightmapChannel::Average) - 1.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_closure_heightmap() {
        let ramp = |p: Vec2| HeightmapSample::uniform((p.x / 100.0).clamp(0.0, 1.0));
        assert_eq!(ramp.sample(Vec2::new(50.0, 3.0)).green, 0.5);
        assert_eq!(FlatHeightmap(0.25).sample(Vec2::ZERO).blue, 0.25);
    }
}
