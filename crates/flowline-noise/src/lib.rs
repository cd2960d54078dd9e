//! Seeded coherent noise for flowline.
//!
//! [`Simplex2D`] and [`Simplex3D`] are simplex-lattice gradient noise over a
//! permutation shuffled from a seed, [`Fbm`] stacks octaves of either, and
//! [`NoiseEngine`] maps flowline's canvas and tick coordinates onto them.
//!
//! ```
//! use flowline_noise::{Fbm, Noise2D, Simplex2D};
//!
//! let base = Simplex2D::with_seed(42);
//! assert!((0.0..=1.0).contains(&base.sample(1.5, 2.5)));
//!
//! let layered = Fbm::new(Simplex2D::with_seed(7)).octaves(16);
//! assert!((-1.0..=1.0).contains(&layered.sample_signed(1.0, 2.0)));
//! ```

use glam::{Vec2, Vec3};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

mod engine;

pub use engine::{NoiseEngine, NoiseModel, NoiseSettings};

/// A scalar field over the plane with values in `[0, 1]`.
pub trait Noise2D {
    /// Value at `(x, y)`.
    fn sample(&self, x: f32, y: f32) -> f32;

    /// Value at `p`.
    fn sample_vec(&self, p: Vec2) -> f32 {
        self.sample(p.x, p.y)
    }

    /// Value at `(x, y)` remapped to `[-1, 1]`.
    fn sample_signed(&self, x: f32, y: f32) -> f32 {
        self.sample(x, y) * 2.0 - 1.0
    }
}

/// A scalar field over space with values in `[0, 1]`.
pub trait Noise3D {
    /// Value at `(x, y, z)`.
    fn sample(&self, x: f32, y: f32, z: f32) -> f32;

    /// Value at `p`.
    fn sample_vec(&self, p: Vec3) -> f32 {
        self.sample(p.x, p.y, p.z)
    }

    /// Value at `(x, y, z)` remapped to `[-1, 1]`.
    fn sample_signed(&self, x: f32, y: f32, z: f32) -> f32 {
        self.sample(x, y, z) * 2.0 - 1.0
    }
}

const SKEW_2D: f32 = 0.366_025_42; // (sqrt(3) - 1) / 2
const UNSKEW_2D: f32 = 0.211_324_87; // (3 - sqrt(3)) / 6
const SKEW_3D: f32 = 1.0 / 3.0;
const UNSKEW_3D: f32 = 1.0 / 6.0;

/// Squared kernel radius around each simplex corner.
const RADIUS_2D: f32 = 0.5;
const RADIUS_3D: f32 = 0.6;

/// Brings the summed corner contributions to roughly `[-1, 1]`.
const GAIN_2D: f32 = 70.0;
const GAIN_3D: f32 = 32.0;

const GRADIENTS_2D: [Vec2; 8] = [
    Vec2::new(1.0, 1.0),
    Vec2::new(-1.0, 1.0),
    Vec2::new(1.0, -1.0),
    Vec2::new(-1.0, -1.0),
    Vec2::new(1.0, 0.0),
    Vec2::new(-1.0, 0.0),
    Vec2::new(0.0, 1.0),
    Vec2::new(0.0, -1.0),
];

/// Midpoints of the cube's edges.
const GRADIENTS_3D: [Vec3; 12] = [
    Vec3::new(1.0, 1.0, 0.0),
    Vec3::new(-1.0, 1.0, 0.0),
    Vec3::new(1.0, -1.0, 0.0),
    Vec3::new(-1.0, -1.0, 0.0),
    Vec3::new(1.0, 0.0, 1.0),
    Vec3::new(-1.0, 0.0, 1.0),
    Vec3::new(1.0, 0.0, -1.0),
    Vec3::new(-1.0, 0.0, -1.0),
    Vec3::new(0.0, 1.0, 1.0),
    Vec3::new(0.0, -1.0, 1.0),
    Vec3::new(0.0, 1.0, -1.0),
    Vec3::new(0.0, -1.0, -1.0),
];

/// Lattice hash: a seeded shuffle of `0..256`, stored twice so chained
/// lookups never need a second wrap.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Lattice {
    seed: u64,
    perm: Box<[u8; 512]>,
}

impl Lattice {
    fn new(seed: u64) -> Self {
        let mut shuffled: [u8; 256] = std::array::from_fn(|i| i as u8);
        shuffled.shuffle(&mut StdRng::seed_from_u64(seed));
        Self {
            seed,
            perm: Box::new(std::array::from_fn(|i| shuffled[i & 255])),
        }
    }

    #[inline]
    fn hash2(&self, i: i32, j: i32) -> usize {
        let a = self.perm[(i & 255) as usize] as usize;
        self.perm[a + (j & 255) as usize] as usize
    }

    #[inline]
    fn hash3(&self, i: i32, j: i32, k: i32) -> usize {
        let a = self.hash2(i, j);
        self.perm[a + (k & 255) as usize] as usize
    }
}

/// Falloff-weighted gradient dot product of one corner.
#[inline]
fn contribution(radius: f32, offset_sq: f32, dot: f32) -> f32 {
    let falloff = radius - offset_sq;
    if falloff <= 0.0 {
        0.0
    } else {
        let f2 = falloff * falloff;
        f2 * f2 * dot
    }
}

#[inline]
fn to_unit(signed: f32) -> f32 {
    (signed * 0.5 + 0.5).clamp(0.0, 1.0)
}

/// 2D simplex noise.
///
/// Equal seeds give equal fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Simplex2D {
    lattice: Lattice,
}

impl Simplex2D {
    /// Builds the field for `seed`.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            lattice: Lattice::new(seed),
        }
    }

    /// The seed this field was built from.
    pub fn seed(&self) -> u64 {
        self.lattice.seed
    }

    fn signed(&self, p: Vec2) -> f32 {
        let cell = (p + Vec2::splat((p.x + p.y) * SKEW_2D)).floor();
        let origin = cell - Vec2::splat((cell.x + cell.y) * UNSKEW_2D);
        let d0 = p - origin;
        let step = if d0.x > d0.y { Vec2::X } else { Vec2::Y };
        let corners = [
            (Vec2::ZERO, d0),
            (step, d0 - step + Vec2::splat(UNSKEW_2D)),
            (Vec2::ONE, d0 - Vec2::ONE + Vec2::splat(2.0 * UNSKEW_2D)),
        ];

        let (i, j) = (cell.x as i32, cell.y as i32);
        let sum: f32 = corners
            .iter()
            .map(|&(corner, d)| {
                let hash = self.lattice.hash2(i + corner.x as i32, j + corner.y as i32);
                contribution(RADIUS_2D, d.length_squared(), GRADIENTS_2D[hash % 8].dot(d))
            })
            .sum();
        GAIN_2D * sum
    }
}

impl Default for Simplex2D {
    fn default() -> Self {
        Self::with_seed(0)
    }
}

impl Noise2D for Simplex2D {
    fn sample(&self, x: f32, y: f32) -> f32 {
        to_unit(self.signed(Vec2::new(x, y)))
    }
}

/// 3D simplex noise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Simplex3D {
    lattice: Lattice,
}

impl Simplex3D {
    /// Builds the field for `seed`.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            lattice: Lattice::new(seed),
        }
    }

    /// The seed this field was built from.
    pub fn seed(&self) -> u64 {
        self.lattice.seed
    }

    fn signed(&self, p: Vec3) -> f32 {
        let cell = (p + Vec3::splat(p.element_sum() * SKEW_3D)).floor();
        let origin = cell - Vec3::splat(cell.element_sum() * UNSKEW_3D);
        let d0 = p - origin;

        // Walk the simplex by stepping along the axes in decreasing order of
        // their offset.
        let mut axes = [(d0.x, Vec3::X), (d0.y, Vec3::Y), (d0.z, Vec3::Z)];
        axes.sort_by(|a, b| b.0.total_cmp(&a.0));
        let first = axes[0].1;
        let second = first + axes[1].1;

        let corners = [
            (Vec3::ZERO, d0),
            (first, d0 - first + Vec3::splat(UNSKEW_3D)),
            (second, d0 - second + Vec3::splat(2.0 * UNSKEW_3D)),
            (Vec3::ONE, d0 - Vec3::ONE + Vec3::splat(3.0 * UNSKEW_3D)),
        ];

        let (i, j, k) = (cell.x as i32, cell.y as i32, cell.z as i32);
        let sum: f32 = corners
            .iter()
            .map(|&(corner, d)| {
                let hash = self
                    .lattice
                    .hash3(i + corner.x as i32, j + corner.y as i32, k + corner.z as i32);
                contribution(RADIUS_3D, d.length_squared(), GRADIENTS_3D[hash % 12].dot(d))
            })
            .sum();
        GAIN_3D * sum
    }
}

impl Default for Simplex3D {
    fn default() -> Self {
        Self::with_seed(0)
    }
}

impl Noise3D for Simplex3D {
    fn sample(&self, x: f32, y: f32, z: f32) -> f32 {
        to_unit(self.signed(Vec3::new(x, y, z)))
    }
}

/// Octaves of a base field summed at rising frequency and falling amplitude.
///
/// The sum is divided by the total amplitude, so the result stays in the
/// base field's range.
///
/// ```
/// use flowline_noise::{Fbm, Noise3D, Simplex3D};
///
/// let fbm = Fbm::new(Simplex3D::with_seed(1)).octaves(16).lacunarity(2.0).persistence(0.5);
/// assert!((0.0..=1.0).contains(&fbm.sample(1.0, 2.0, 3.0)));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Fbm<N> {
    /// Base field.
    pub noise: N,
    /// Number of layers.
    pub octaves: u32,
    /// Frequency multiplier between layers.
    pub lacunarity: f32,
    /// Amplitude multiplier between layers.
    pub persistence: f32,
}

impl<N> Fbm<N> {
    /// Four octaves, lacunarity 2, persistence 0.5.
    pub fn new(noise: N) -> Self {
        Self {
            noise,
            octaves: 4,
            lacunarity: 2.0,
            persistence: 0.5,
        }
    }

    /// Sets the octave count.
    pub fn octaves(mut self, octaves: u32) -> Self {
        self.octaves = octaves;
        self
    }

    /// Sets the lacunarity.
    pub fn lacunarity(mut self, lacunarity: f32) -> Self {
        self.lacunarity = lacunarity;
        self
    }

    /// Sets the persistence.
    pub fn persistence(mut self, persistence: f32) -> Self {
        self.persistence = persistence;
        self
    }

    /// Amplitude-weighted mean of `layer(frequency)` over the octaves. Zero
    /// octaves give the midpoint.
    fn layered(&self, mut layer: impl FnMut(f32) -> f32) -> f32 {
        let (mut total, mut weight) = (0.0, 0.0);
        let (mut frequency, mut amplitude) = (1.0, 1.0);
        for _ in 0..self.octaves {
            total += amplitude * layer(frequency);
            weight += amplitude;
            frequency *= self.lacunarity;
            amplitude *= self.persistence;
        }
        if weight > 0.0 { total / weight } else { 0.5 }
    }
}

impl<N: Noise2D> Noise2D for Fbm<N> {
    fn sample(&self, x: f32, y: f32) -> f32 {
        self.layered(|f| self.noise.sample(x * f, y * f))
    }
}

impl<N: Noise3D> Noise3D for Fbm<N> {
    fn sample(&self, x: f32, y: f32, z: f32) -> f32 {
        self.layered(|f| self.noise.sample(x * f, y * f, z * f))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(n: usize, step: f32) -> impl Iterator<Item = (f32, f32)> {
        (0..n).flat_map(move |i| (0..n).map(move |j| (i as f32 * step, j as f32 * step)))
    }

    #[test]
    fn test_simplex_stays_in_unit_range() {
        let plane = Simplex2D::with_seed(3);
        let volume = Simplex3D::with_seed(3);
        for (x, y) in grid(60, 0.13) {
            let v = plane.sample(x - 3.0, y + 0.5);
            assert!((0.0..=1.0).contains(&v), "plane({x}, {y}) = {v}");
            let v = volume.sample(x, -y, x * 0.5 + 0.25);
            assert!((0.0..=1.0).contains(&v), "volume({x}, {y}) = {v}");
        }
    }

    #[test]
    fn test_simplex_covers_both_halves() {
        let volume = Simplex3D::with_seed(11);
        let values: Vec<f32> = grid(40, 0.21).map(|(x, y)| volume.sample(x, y, 0.7)).collect();
        assert!(values.iter().any(|&v| v < 0.4));
        assert!(values.iter().any(|&v| v > 0.6));
    }

    #[test]
    fn test_simplex_is_continuous() {
        let plane = Simplex2D::with_seed(8);
        for (x, y) in grid(20, 0.37) {
            let a = plane.sample(x, y);
            let b = plane.sample(x + 1e-3, y);
            assert!((a - b).abs() < 0.05, "jump at ({x}, {y})");
        }
    }

    #[test]
    fn test_fbm_signed_range() {
        let fbm = Fbm::new(Simplex2D::with_seed(9)).octaves(16);
        for (x, y) in grid(50, 0.1) {
            let v = fbm.sample_signed(x, y);
            assert!((-1.0..=1.0).contains(&v), "fbm = {v}");
        }
        assert_eq!(Fbm::new(Simplex2D::with_seed(9)).octaves(0).sample(1.0, 1.0), 0.5);
    }

    #[test]
    fn test_single_octave_matches_base() {
        let base = Simplex3D::with_seed(21);
        let fbm = Fbm::new(base.clone()).octaves(1);
        for (x, y) in grid(10, 0.4) {
            assert_eq!(fbm.sample(x, y, 1.0), base.sample(x, y, 1.0));
        }
    }

    #[test]
    fn test_seeding() {
        let a = Simplex3D::with_seed(1234);
        let b = Simplex3D::with_seed(1234);
        assert_eq!(a, b);
        assert_eq!(a.seed(), 1234);
        for i in 0..20 {
            let p = i as f32 * 0.37;
            assert_eq!(a.sample(p, p * 2.0, p * 3.0), b.sample(p, p * 2.0, p * 3.0));
        }

        let c = Simplex2D::with_seed(1);
        let d = Simplex2D::with_seed(2);
        let differs = (0..50).any(|i| {
            let p = i as f32 * 0.31 + 0.1;
            c.sample(p, p * 1.7) != d.sample(p, p * 1.7)
        });
        assert!(differs);
    }
}
