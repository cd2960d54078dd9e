//! Heightmaps backed by PNG or JPEG images.
//!
//! An [`ImageHeightmap`] stretches its image over the canvas: a canvas
//! position is scaled into image space, rounded to the nearest pixel and
//! clamped to the image bounds, so any position (even far off the canvas)
//! yields a sample.

use std::path::{Path, PathBuf};

use flowline_core::math::clamp_round;
use flowline_core::{Canvas, Heightmap, HeightmapSample};
use glam::Vec2;
use image::{DynamicImage, GenericImageView, ImageError, RgbImage};

/// Errors from loading a heightmap image.
#[derive(Debug, thiserror::Error)]
pub enum HeightmapError {
    /// The file could not be read.
    #[error("failed to read heightmap {path:?}")]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// The file is not a decodable image.
    #[error("failed to decode heightmap {path:?}")]
    Decode {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: ImageError,
    },
    /// The image has no pixels.
    #[error("heightmap {path:?} is empty")]
    Empty {
        /// File that failed.
        path: PathBuf,
    },
}

/// File extensions [`ImageHeightmap::is_supported`] accepts.
pub const SUPPORTED_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// A heightmap sampled from an RGB image stretched over the canvas.
#[derive(Clone)]
pub struct ImageHeightmap {
    pixels: RgbImage,
    scale: Vec2,
}

impl std::fmt::Debug for ImageHeightmap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageHeightmap")
            .field("width", &self.pixels.width())
            .field("height", &self.pixels.height())
            .field("scale", &self.scale)
            .finish()
    }
}

impl ImageHeightmap {
    /// Loads an image file. The canvas defaults to the image's own size; use
    /// [`ImageHeightmap::fit_to`] to stretch it over a different canvas.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, HeightmapError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| HeightmapError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let image = image::load_from_memory(&bytes).map_err(|source| HeightmapError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
        if image.width() == 0 || image.height() == 0 {
            return Err(HeightmapError::Empty {
                path: path.to_path_buf(),
            });
        }
        log::debug!("loaded heightmap {:?} ({}x{})", path, image.width(), image.height());
        Ok(Self::from_image(image))
    }

    /// Wraps a decoded image. Alpha is discarded.
    ///
    /// # Panics
    ///
    /// Panics if the image has no pixels.
    pub fn from_image(image: DynamicImage) -> Self {
        let (width, height) = image.dimensions();
        assert!(width > 0 && height > 0, "heightmap image must have pixels");
        Self {
            pixels: image.to_rgb8(),
            scale: Vec2::ONE,
        }
    }

    /// Stretches the image over `canvas`.
    pub fn fit_to(mut self, canvas: Canvas) -> Self {
        self.scale = Vec2::new(
            self.pixels.width() as f32 / canvas.width.max(1) as f32,
            self.pixels.height() as f32 / canvas.height.max(1) as f32,
        );
        self
    }

    /// The image's own size as a canvas.
    pub fn native_canvas(&self) -> Canvas {
        Canvas::new(self.pixels.width(), self.pixels.height())
    }

    /// Image width and height in pixels.
    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    /// True if `path` has an extension this crate can load.
    pub fn is_supported(path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| SUPPORTED_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
    }

    fn pixel_at(&self, position: Vec2) -> [u8; 3] {
        let x = clamp_round(position.x * self.scale.x, 0.0, (self.pixels.width() - 1) as f32);
        let y = clamp_round(position.y * self.scale.y, 0.0, (self.pixels.height() - 1) as f32);
        self.pixels.get_pixel(x as u32, y as u32).0
    }
}

impl Heightmap for ImageHeightmap {
    fn sample(&self, position: Vec2) -> HeightmapSample {
        HeightmapSample::from_rgb8(self.pixel_at(position))
    }
}
