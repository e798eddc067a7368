//! Page-slicing arithmetic for the PDF export.
#![allow(dead_code)]
//!
//! The rasterized bitmap is scaled to the full page width and cut into
//! fixed-height bands. Every page draws the same bitmap, shifted up by the
//! height already consumed, so page boundaries fall at exact band
//! multiples. A bitmap whose scaled height is an exact multiple of the
//! band height fills its last page with no trailing blank.

use crate::pdf::raster::RasterImage;

/// Output geometry of the export, in millimetres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width_mm: f64,
    pub height_mm: f64,
}

impl PageGeometry {
    /// A4 width with a 295 mm band height.
    pub const DEFAULT: PageGeometry = PageGeometry {
        width_mm: 210.0,
        height_mm: 295.0,
    };
}

/// One page of the export: the vertical offset already consumed when the
/// page starts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSlice {
    pub index: u32,
    pub offset_mm: f64,
}

/// The full pagination plan for one rasterized document.
#[derive(Debug, Clone, PartialEq)]
pub struct PaginationPlan {
    pub geometry: PageGeometry,
    /// Always the page width; the bitmap is scaled to span it exactly.
    pub image_width_mm: f64,
    /// Bitmap height after scaling to the page width.
    pub image_height_mm: f64,
    pub pages: Vec<PageSlice>,
}

impl PaginationPlan {
    pub fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }
}

/// Scales the bitmap to the page width and cuts it into page bands.
pub fn paginate(image: &RasterImage, geometry: PageGeometry) -> PaginationPlan {
    // `RasterImage::new` rejects zero widths, but the fields are public;
    // a zero-width literal scales to an empty single-page document.
    let image_height_mm = if image.width_px == 0 {
        0.0
    } else {
        image.height_px as f64 * geometry.width_mm / image.width_px as f64
    };
    let count = (image_height_mm / geometry.height_mm).ceil() as u32;
    let count = count.max(1);

    let pages = (0..count)
        .map(|index| PageSlice {
            index,
            offset_mm: index as f64 * geometry.height_mm,
        })
        .collect();

    PaginationPlan {
        geometry,
        image_width_mm: geometry.width_mm,
        image_height_mm,
        pages,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn plan_for(width_px: u32, height_px: u32) -> PaginationPlan {
        let image = RasterImage::filled(width_px, height_px, [255, 255, 255]).unwrap();
        paginate(&image, PageGeometry::DEFAULT)
    }

    // ── scaling ─────────────────────────────────────────────────────────────

    #[test]
    fn test_image_scales_to_page_width() {
        // 420 px wide, 1180 px tall: scaled height = 1180 * 210 / 420 = 590 mm.
        let plan = plan_for(420, 1180);
        assert_eq!(plan.image_width_mm, 210.0);
        assert!((plan.image_height_mm - 590.0).abs() < 1e-9);
    }

    // ── page count ──────────────────────────────────────────────────────────

    #[test]
    fn test_short_document_is_one_page() {
        let plan = plan_for(420, 500);
        assert_eq!(plan.page_count(), 1);
    }

    #[test]
    fn test_exact_multiple_has_no_trailing_blank_page() {
        // Scaled height exactly 2 * 295 mm must give 2 pages, not 3.
        let plan = plan_for(420, 1180);
        assert_eq!(plan.page_count(), 2);
    }

    #[test]
    fn test_one_extra_millimetre_adds_a_page() {
        // 1182 px at 420 px width scales to 591 mm: just over two bands.
        let plan = plan_for(420, 1182);
        assert_eq!(plan.page_count(), 3);
    }

    #[test]
    fn test_count_is_ceiling_of_height_over_band() {
        for height_px in [1, 100, 589, 590, 591, 1180, 2950, 2951] {
            let plan = plan_for(210, height_px);
            // At 210 px width, 1 px maps to exactly 1 mm.
            let expected = (height_px as f64 / 295.0).ceil().max(1.0) as u32;
            assert_eq!(
                plan.page_count(),
                expected,
                "height_px={height_px} gave {} pages",
                plan.page_count()
            );
        }
    }

    // ── offsets ─────────────────────────────────────────────────────────────

    #[test]
    fn test_offsets_advance_by_band_height() {
        let plan = plan_for(420, 1182);
        let offsets: Vec<f64> = plan.pages.iter().map(|p| p.offset_mm).collect();
        assert_eq!(offsets, vec![0.0, 295.0, 590.0]);
    }

    #[test]
    fn test_tiny_image_still_gets_one_page() {
        let plan = plan_for(1000, 1);
        assert_eq!(plan.page_count(), 1);
        assert_eq!(plan.pages[0].offset_mm, 0.0);
    }

    #[test]
    fn test_zero_width_raster_yields_one_empty_page() {
        // Built by literal to bypass the constructor's dimension check.
        let image = RasterImage {
            width_px: 0,
            height_px: 1180,
            pixels: Vec::new(),
        };
        let plan = paginate(&image, PageGeometry::DEFAULT);
        assert_eq!(plan.page_count(), 1);
        assert_eq!(plan.image_height_mm, 0.0);
    }
}
