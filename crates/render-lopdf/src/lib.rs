//! PDF export for rendered certificates using lopdf.
//!
//! The raster is embedded as a single full-page image. Link annotations are
//! placed by scaling the text extents the painter published, so clicking the
//! printed URL in the PDF opens that URL.

mod error;
mod exporter;
mod link;

pub use error::ExportFailure;
pub use exporter::{DocumentExporter, ExportedDocument};
pub use link::{LinkKind, LinkRegion};
