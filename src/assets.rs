//! Loads the brand mark and seal for a render.
//!
//! Both images are fetched concurrently and each failure is absorbed on its
//! own: a missing decorative image never blocks a certificate.

use crate::config::{AssetSourceKind, AssetsConfig};
use crate::error::SetupError;
use certforge_layout::AssetKind;
use certforge_raster::{CertificateAssets, RgbaImage, decode_asset};
use certforge_resource::{FilesystemResourceProvider, HttpAssetSource, ProviderAssetSource};
use certforge_traits::AssetSource;
use std::sync::Arc;
use std::time::Duration;

/// Where each decorative image lives within an [`AssetSource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetLocations {
    pub brand_mark: String,
    pub seal: String,
}

impl AssetLocations {
    pub fn new(brand_mark: impl Into<String>, seal: impl Into<String>) -> Self {
        Self {
            brand_mark: brand_mark.into(),
            seal: seal.into(),
        }
    }

    pub fn get(&self, kind: AssetKind) -> &str {
        match kind {
            AssetKind::BrandMark => &self.brand_mark,
            AssetKind::Seal => &self.seal,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AssetLoader {
    source: Arc<dyn AssetSource>,
    locations: AssetLocations,
}

impl AssetLoader {
    pub fn new(source: Arc<dyn AssetSource>, locations: AssetLocations) -> Self {
        Self { source, locations }
    }

    pub fn from_config(config: &AssetsConfig) -> Result<Self, SetupError> {
        let source: Arc<dyn AssetSource> = match config.source {
            AssetSourceKind::Filesystem => {
                let provider = Arc::new(FilesystemResourceProvider::new(&config.base));
                Arc::new(ProviderAssetSource::new(provider))
            }
            AssetSourceKind::Http => {
                let http = HttpAssetSource::new(Duration::from_secs(config.timeout_secs))?;
                if config.base.is_empty() {
                    Arc::new(http)
                } else {
                    Arc::new(http.with_base_url(config.base.as_str()))
                }
            }
        };
        log::info!(
            "Certificate assets from {} ({})",
            source.name(),
            config.base
        );
        Ok(Self::new(
            source,
            AssetLocations::new(config.brand_mark.as_str(), config.seal.as_str()),
        ))
    }

    pub fn source_name(&self) -> &'static str {
        self.source.name()
    }

    /// Fetches and decodes both images. Never fails; an image that cannot be
    /// fetched or decoded is `None`.
    pub async fn load_all(&self) -> CertificateAssets {
        let (brand_mark, seal) = tokio::join!(
            self.load(AssetKind::BrandMark),
            self.load(AssetKind::Seal)
        );
        CertificateAssets { brand_mark, seal }
    }

    async fn load(&self, kind: AssetKind) -> Option<Arc<RgbaImage>> {
        let location = self.locations.get(kind);
        let bytes = match self.source.fetch(location).await {
            Ok(bytes) => bytes,
            Err(e) => {
                log::warn!("{:?} unavailable, continuing without it: {}", kind, e);
                return None;
            }
        };

        match tokio::task::spawn_blocking(move || decode_asset(&bytes)).await {
            Ok(Ok(image)) => Some(Arc::new(image)),
            Ok(Err(e)) => {
                log::warn!("{:?} at '{}' could not be decoded: {}", kind, location, e);
                None
            }
            Err(e) => {
                log::warn!("{:?} decode task failed: {}", kind, e);
                None
            }
        }
    }
}
