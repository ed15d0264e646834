use crate::assets::AssetLoader;
use crate::config::{Config, StoreBackend};
use crate::error::SetupError;
use crate::lookup::{InMemoryRecordStore, RecordStore, RestRecordStore};
use crate::renderer::{CertificateRenderer, load_typeface};
use certforge_layout::CertificateLayout;
use certforge_render_lopdf::DocumentExporter;
use certforge_resource::FilesystemResourceProvider;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;

/// Shared application state accessible to all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RecordStore>,

    pub renderer: Arc<CertificateRenderer>,

    pub exporter: DocumentExporter,

    /// Limits renders and exports in flight.
    /// Requests beyond the limit are refused rather than queued.
    pub render_permits: Arc<Semaphore>,

    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn RecordStore>,
        renderer: CertificateRenderer,
        exporter: DocumentExporter,
        config: Config,
    ) -> Self {
        let render_permits = Arc::new(Semaphore::new(config.concurrency.max_concurrent_renders));

        Self {
            store,
            renderer: Arc::new(renderer),
            exporter,
            render_permits,
            config: Arc::new(config),
        }
    }

    /// Builds the record store, typeface, asset loader and exporter named by `config`.
    pub fn from_config(config: Config) -> Result<Self, SetupError> {
        let store = build_store(&config)?;

        let font_provider = FilesystemResourceProvider::new(&config.assets.base);
        let typeface = load_typeface(&config.fonts, &font_provider)?;
        let renderer = CertificateRenderer::new(
            Arc::new(CertificateLayout::standard()),
            typeface,
            AssetLoader::from_config(&config.assets)?,
            config.links.targets(),
        );
        let exporter = DocumentExporter::new(config.export.page_width_pt);

        log::info!(
            "Using {} with {} typeface, {} concurrent renders",
            store.name(),
            renderer.typeface_name(),
            config.concurrency.max_concurrent_renders
        );
        Ok(Self::new(store, renderer, exporter, config))
    }
}

pub fn build_store(config: &Config) -> Result<Arc<dyn RecordStore>, SetupError> {
    let store: Arc<dyn RecordStore> = match config.store.backend {
        StoreBackend::Memory => Arc::new(InMemoryRecordStore::from_json_file(
            &config.store.seed_file,
        )?),
        StoreBackend::Rest => Arc::new(RestRecordStore::new(
            &config.store.url,
            &config.store.table,
            config.store.api_key.as_str(),
            Duration::from_secs(config.store.timeout_secs),
        )?),
    };
    Ok(store)
}
