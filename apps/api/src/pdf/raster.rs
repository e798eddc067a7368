//! Rasterization seam for the PDF export.
#![allow(dead_code)]
//!
//! The pipeline never reads the markup itself; it hands the rendered HTML
//! to a `Rasterizer` and gets back a bitmap. The shipped admin UI backs
//! this with a headless browser canvas; tests substitute fixed-size stubs.

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RasterError {
    #[error("rasterizer backend failed: {0}")]
    Backend(String),

    #[error("raster dimensions {width_px}x{height_px} do not match a {len}-byte RGB buffer")]
    DimensionMismatch {
        width_px: u32,
        height_px: u32,
        len: usize,
    },

    #[error("rasterized image is empty")]
    EmptyImage,
}

/// A rasterized document: tightly packed 8-bit RGB rows, top to bottom.
#[derive(Debug, Clone)]
pub struct RasterImage {
    pub width_px: u32,
    pub height_px: u32,
    pub pixels: Vec<u8>,
}

impl RasterImage {
    /// Builds an image after validating the buffer against the dimensions.
    pub fn new(width_px: u32, height_px: u32, pixels: Vec<u8>) -> Result<Self, RasterError> {
        if width_px == 0 || height_px == 0 {
            return Err(RasterError::EmptyImage);
        }
        if pixels.len() != (width_px as usize) * (height_px as usize) * 3 {
            return Err(RasterError::DimensionMismatch {
                width_px,
                height_px,
                len: pixels.len(),
            });
        }
        Ok(RasterImage {
            width_px,
            height_px,
            pixels,
        })
    }

    /// Solid-color image of the given size. Test and tooling helper.
    pub fn filled(width_px: u32, height_px: u32, rgb: [u8; 3]) -> Result<Self, RasterError> {
        let mut pixels = Vec::with_capacity((width_px as usize) * (height_px as usize) * 3);
        for _ in 0..(width_px as u64) * (height_px as u64) {
            pixels.extend_from_slice(&rgb);
        }
        RasterImage::new(width_px, height_px, pixels)
    }
}

/// Converts rendered HTML into a bitmap at an integer scale factor.
/// The export path rasterizes at 2x.
#[async_trait]
pub trait Rasterizer: Send + Sync {
    async fn rasterize(&self, html: &str, scale: u32) -> Result<RasterImage, RasterError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_validates_buffer_length() {
        let err = RasterImage::new(10, 10, vec![0u8; 10]).unwrap_err();
        assert!(
            matches!(err, RasterError::DimensionMismatch { len: 10, .. }),
            "Expected DimensionMismatch, got {err:?}"
        );
    }

    #[test]
    fn test_new_rejects_zero_dimensions() {
        let err = RasterImage::new(0, 100, vec![]).unwrap_err();
        assert!(matches!(err, RasterError::EmptyImage));
    }

    #[test]
    fn test_filled_produces_packed_rgb() {
        let image = RasterImage::filled(4, 2, [255, 0, 127]).unwrap();
        assert_eq!(image.pixels.len(), 4 * 2 * 3);
        assert_eq!(&image.pixels[0..3], &[255, 0, 127]);
        assert_eq!(&image.pixels[21..24], &[255, 0, 127]);
    }
}
