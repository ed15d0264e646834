use crate::canvas::Canvas;
use crate::error::RasterError;
use crate::typeface::Typeface;
use certforge_layout::{AssetAvailability, AssetKind, CertificateLayout, DrawOp};
use image::RgbaImage;
use std::sync::Arc;

/// Decoded decorative images. Either may be absent after a failed load.
#[derive(Debug, Clone, Default)]
pub struct CertificateAssets {
    pub brand_mark: Option<Arc<RgbaImage>>,
    pub seal: Option<Arc<RgbaImage>>,
}

impl CertificateAssets {
    pub fn availability(&self) -> AssetAvailability {
        AssetAvailability {
            brand_mark: self.brand_mark.is_some(),
            seal: self.seal.is_some(),
        }
    }

    pub fn get(&self, kind: AssetKind) -> Option<&RgbaImage> {
        match kind {
            AssetKind::BrandMark => self.brand_mark.as_deref(),
            AssetKind::Seal => self.seal.as_deref(),
        }
    }
}

/// Decodes PNG or JPEG bytes into an RGBA buffer.
pub fn decode_asset(bytes: &[u8]) -> Result<RgbaImage, RasterError> {
    let image = image::load_from_memory(bytes)?.to_rgba8();
    if image.width() == 0 || image.height() == 0 {
        return Err(RasterError::EmptyImage);
    }
    Ok(image)
}

/// Applies `ops` in order to a fresh canvas of the layout's size.
pub fn paint(
    layout: &CertificateLayout,
    ops: &[DrawOp],
    typeface: &dyn Typeface,
    assets: &CertificateAssets,
) -> RgbaImage {
    let mut canvas = Canvas::new(layout.width(), layout.height(), layout.background);

    for op in ops {
        match op {
            DrawOp::FillRect { rect, color } => canvas.fill_rect(*rect, *color),
            DrawOp::FillRoundedRect {
                rect,
                radius,
                color,
            } => canvas.fill_rounded_rect(*rect, *radius, *color),
            DrawOp::Line {
                from,
                to,
                thickness,
                color,
            } => canvas.line(*from, *to, *thickness, *color),
            DrawOp::Checkmark {
                rect,
                thickness,
                color,
            } => canvas.checkmark(*rect, *thickness, *color),
            DrawOp::Text(run) => typeface.draw(
                &mut canvas,
                &run.text,
                run.extent.left,
                run.extent.baseline,
                &run.style,
            ),
            DrawOp::Image { asset, rect } => match assets.get(*asset) {
                Some(image) => canvas.blit(image, *rect),
                None => log::warn!("Skipping {:?}: asset not loaded", asset),
            },
        }
    }

    canvas.into_image()
}
