//! Multi-page PDF assembly.
#![allow(dead_code)]
//!
//! Every page embeds the full document bitmap at a dpi that makes it span
//! the page width exactly, shifted up by the height consumed on earlier
//! pages. The page band crops the rest, so slicing needs no pixel work.

use std::io::BufWriter;

use printpdf::{Image, ImageTransform, Mm, PdfDocument};
use thiserror::Error;

use crate::pdf::paginator::PaginationPlan;
use crate::pdf::raster::RasterImage;

const MM_PER_INCH: f64 = 25.4;

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("raster buffer does not form a valid RGB image")]
    InvalidPixels,

    #[error("PDF serialization failed: {0}")]
    Save(String),
}

/// Assembles the export PDF from a rasterized document and its pagination
/// plan. Returns the finished file as bytes.
pub fn write_pdf(
    image: &RasterImage,
    plan: &PaginationPlan,
    title: &str,
) -> Result<Vec<u8>, PdfError> {
    let geometry = plan.geometry;
    // Spans the bitmap across the full page width.
    let dpi = image.width_px as f64 * MM_PER_INCH / plan.image_width_mm;

    let (doc, first_page, first_layer) = PdfDocument::new(
        title,
        Mm(geometry.width_mm as f32),
        Mm(geometry.height_mm as f32),
        "Layer 1",
    );

    let buffer = printpdf::image_crate::RgbImage::from_raw(
        image.width_px,
        image.height_px,
        image.pixels.clone(),
    )
    .ok_or(PdfError::InvalidPixels)?;
    let bitmap = printpdf::image_crate::DynamicImage::ImageRgb8(buffer);

    for slice in &plan.pages {
        let layer = if slice.index == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (page, layer) = doc.add_page(
                Mm(geometry.width_mm as f32),
                Mm(geometry.height_mm as f32),
                format!("Layer {}", slice.index + 1),
            );
            doc.get_page(page).get_layer(layer)
        };

        // Bottom-left origin: lift the bitmap so the band for this page
        // lands inside the page and everything above the band is cropped.
        let translate_y = geometry.height_mm - plan.image_height_mm + slice.offset_mm;

        let page_image = Image::from_dynamic_image(&bitmap);
        page_image.add_to_layer(
            layer,
            ImageTransform {
                translate_x: Some(Mm(0.0)),
                translate_y: Some(Mm(translate_y as f32)),
                rotate: None,
                scale_x: None,
                scale_y: None,
                dpi: Some(dpi as f32),
            },
        );
    }

    let mut writer = BufWriter::new(Vec::<u8>::new());
    doc.save(&mut writer).map_err(|e| PdfError::Save(e.to_string()))?;
    let bytes = writer
        .into_inner()
        .map_err(|e| PdfError::Save(e.to_string()))?;
    Ok(bytes)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
