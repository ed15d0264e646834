//! Certificate verification: look up an issued certificate by its display ID,
//! render it to a fixed-size raster and export that raster as a single-page PDF
//! with clickable links.
//!
//! ```no_run
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! use certforge::{AppState, Config, VerificationSession};
//!
//! let state = AppState::from_config(Config::load()?)?;
//! let mut session = VerificationSession::new();
//! session.verify(state.store.as_ref(), "EZZCODE-2024-WD-001").await?;
//! session.render(&state.renderer).await?;
//! session.export(&state.exporter).await?;
//! # Ok(())
//! # }
//! ```

pub mod assets;
pub mod config;
pub mod error;
pub mod lookup;
pub mod renderer;
pub mod service;
pub mod session;

pub use assets::{AssetLoader, AssetLocations};
pub use config::Config;
pub use error::SetupError;
pub use lookup::{
    InMemoryRecordStore, LookupError, LookupOutcome, RecordStore, RestRecordStore, lookup,
    normalize_identifier,
};
pub use renderer::{CertificateRenderer, load_typeface};
pub use service::{AppState, ServiceError, build_router};
pub use session::{SessionError, SessionState, Ticket, VerificationSession};

pub use certforge_layout::{CertificateLayout, LinkTargets};
pub use certforge_raster::RenderedCertificate;
pub use certforge_render_lopdf::{
    DocumentExporter, ExportFailure, ExportedDocument, LinkKind, LinkRegion,
};
pub use certforge_types::{CertificateRecord, CertificateStatus};
