//! Certificate rendering: lookup result in, opaque raster out.

use crate::assets::AssetLoader;
use crate::config::FontsConfig;
use crate::error::SetupError;
use certforge_layout::{CertificateContent, CertificateLayout, LinkTargets, plan};
use certforge_raster::{
    BitmapTypeface, CertificateAssets, OutlineTypeface, RenderedCertificate, Typeface, paint,
};
use certforge_traits::ResourceProvider;
use certforge_types::CertificateRecord;
use std::sync::Arc;

/// Renders certificates against one shared [`CertificateLayout`].
///
/// Output depends only on the record, the asset bytes and the typeface, so the
/// same inputs always produce the same pixels.
#[derive(Debug, Clone)]
pub struct CertificateRenderer {
    layout: Arc<CertificateLayout>,
    typeface: Arc<dyn Typeface>,
    assets: AssetLoader,
    links: LinkTargets,
}

impl CertificateRenderer {
    pub fn new(
        layout: Arc<CertificateLayout>,
        typeface: Arc<dyn Typeface>,
        assets: AssetLoader,
        links: LinkTargets,
    ) -> Self {
        Self {
            layout,
            typeface,
            assets,
            links,
        }
    }

    pub fn layout(&self) -> &Arc<CertificateLayout> {
        &self.layout
    }

    pub fn links(&self) -> &LinkTargets {
        &self.links
    }

    pub fn typeface_name(&self) -> &'static str {
        self.typeface.name()
    }

    /// Loads the decorative assets and renders `record`.
    ///
    /// The record must already have passed [`CertificateRecord::validate`].
    /// Asset failures are absorbed, so this never fails.
    pub async fn render(&self, record: &CertificateRecord) -> RenderedCertificate {
        let assets = self.load_assets().await;
        self.render_with_assets(record, &assets)
    }

    /// Fetches the decorative images, for callers that paint elsewhere.
    pub async fn load_assets(&self) -> CertificateAssets {
        self.assets.load_all().await
    }

    /// Renders with already-decoded assets.
    pub fn render_with_assets(
        &self,
        record: &CertificateRecord,
        assets: &CertificateAssets,
    ) -> RenderedCertificate {
        let content = CertificateContent::from_record(record, &self.links);
        let plan = plan(
            &self.layout,
            &content,
            assets.availability(),
            self.typeface.as_ref(),
        );
        let image = paint(&self.layout, &plan.ops, self.typeface.as_ref(), assets);

        log::debug!(
            "Rendered {} ({} ops, brand mark: {}, seal: {})",
            record.display_id,
            plan.ops.len(),
            assets.brand_mark.is_some(),
            assets.seal.is_some()
        );

        RenderedCertificate {
            image,
            layout: Arc::clone(&self.layout),
            verification_url: plan.verification_url,
            footer_url: plan.footer_url,
            links: self.links.clone(),
            display_id: record.display_id.clone(),
        }
    }
}

/// The bitmap font unless a TrueType regular face is configured. Font paths
/// are resolved through `provider`.
pub fn load_typeface(
    fonts: &FontsConfig,
    provider: &dyn ResourceProvider,
) -> Result<Arc<dyn Typeface>, SetupError> {
    if !fonts.uses_outline() {
        return Ok(Arc::new(BitmapTypeface::new()));
    }

    let read = |path: &str| -> Result<Vec<u8>, SetupError> {
        Ok(provider.load(path.trim())?.as_ref().clone())
    };

    let mut face = OutlineTypeface::from_bytes(read(&fonts.regular)?)?;
    if !fonts.bold.trim().is_empty() {
        face = face.with_bold(read(&fonts.bold)?)?;
    }
    if !fonts.italic.trim().is_empty() {
        face = face.with_italic(read(&fonts.italic)?)?;
    }
    log::info!("Using TrueType face '{}'", fonts.regular);
    Ok(Arc::new(face))
}
