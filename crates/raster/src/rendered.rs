use crate::error::RasterError;
use certforge_layout::{CertificateLayout, LinkTargets, TextExtent};
use image::{ImageFormat, RgbaImage};
use std::io::Cursor;
use std::sync::Arc;

/// A finished certificate raster plus the layout facts the exporter needs.
///
/// `verification_url` and `footer_url` are the extents the painter actually
/// drew those lines at, and `links` holds the targets whose display text was
/// painted there. Link regions are derived from these and nothing else.
#[derive(Debug, Clone)]
pub struct RenderedCertificate {
    pub image: RgbaImage,
    pub layout: Arc<CertificateLayout>,
    pub verification_url: TextExtent,
    pub footer_url: TextExtent,
    pub links: LinkTargets,
    pub display_id: String,
}

impl RenderedCertificate {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Encodes the raster as PNG for previews.
    pub fn to_png(&self) -> Result<Vec<u8>, RasterError> {
        let mut bytes = Vec::new();
        self.image
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
        Ok(bytes)
    }
}
