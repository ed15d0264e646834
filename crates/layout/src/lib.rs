//! Layout for the certificate raster.
//!
//! [`CertificateLayout`] is the single source of truth for every coordinate on
//! the canvas. The painter draws from it and the document exporter places link
//! regions from it; neither recomputes positions on its own.
//!
//! [`plan`] turns a record's content into an ordered list of [`DrawOp`]s that a
//! raster backend applies to an image buffer.

mod certificate;
mod links;
mod plan;
mod text;

pub use certificate::{BadgeLayout, CertificateCopy, CertificateLayout, DividerLayout, FrameLayout};
pub use links::LinkTargets;
pub use plan::{
    AssetAvailability, AssetKind, CertificateContent, CertificatePlan, DrawOp, TextRun, plan,
};
pub use text::{FontWeight, TextAlign, TextExtent, TextMeasure, TextSlot, TextStyle, VMetrics};

pub use certforge_types::{Color, Point, Rect, Size};
