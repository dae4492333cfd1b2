//! Decoded card images, downscaled so a terminal cell grid can sample them.

use image::{DynamicImage, imageops::FilterType};
use std::path::Path;

/// Longest side kept after decoding. Terminal cards are never wider than this
/// many cells, so anything larger is wasted memory.
pub const MAX_TEXTURE_SIDE: u32 = 96;

/// An RGB pixel grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Texture {
    width: u32,
    height: u32,
    pixels: Vec<[u8; 3]>,
}

impl Texture {
    /// Builds a texture from raw row-major pixels. Returns `None` when the
    /// dimensions don't match the pixel count or are zero.
    pub fn from_rgb(width: u32, height: u32, pixels: Vec<[u8; 3]>) -> Option<Self> {
        if width == 0 || height == 0 || pixels.len() != (width as usize) * (height as usize) {
            return None;
        }
        Some(Self {
            width,
            height,
            pixels,
        })
    }

    /// Decodes an encoded image payload (PNG, JPEG, GIF, WebP).
    pub fn decode(bytes: &[u8]) -> Result<Self, image::ImageError> {
        let image = image::load_from_memory(bytes)?;
        Ok(Self::from_image(image))
    }

    /// Loads and decodes an image file from disk.
    pub fn open(path: &Path) -> Result<Self, image::ImageError> {
        let image = image::open(path)?;
        Ok(Self::from_image(image))
    }

    fn from_image(image: DynamicImage) -> Self {
        let image = if image.width() > MAX_TEXTURE_SIDE || image.height() > MAX_TEXTURE_SIDE {
            image.resize(MAX_TEXTURE_SIDE, MAX_TEXTURE_SIDE, FilterType::Triangle)
        } else {
            image
        };
        let rgb = image.to_rgb8();
        let (width, height) = rgb.dimensions();
        let pixels = rgb.pixels().map(|pixel| pixel.0).collect();
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Nearest-neighbour sample for cell `(col, row)` of a `cols x rows` grid
    /// stretched over the whole texture.
    pub fn sample(&self, col: u32, row: u32, cols: u32, rows: u32) -> [u8; 3] {
        if cols == 0 || rows == 0 || self.pixels.is_empty() {
            return [0, 0, 0];
        }
        let x = (col.saturating_mul(self.width) / cols).min(self.width - 1);
        let y = (row.saturating_mul(self.height) / rows).min(self.height - 1);
        self.pixels[(y * self.width + x) as usize]
    }
}
