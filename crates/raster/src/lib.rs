//! Raster backend for certificate plans.
//!
//! [`paint`] walks a [`CertificatePlan`](certforge_layout::CertificatePlan) in
//! order, drawing shapes on a [`Canvas`] and text through a [`Typeface`].

mod canvas;
mod error;
mod paint;
mod rendered;
mod typeface;

pub use canvas::Canvas;
pub use error::RasterError;
pub use paint::{CertificateAssets, decode_asset, paint};
pub use rendered::RenderedCertificate;
pub use typeface::{BitmapTypeface, OutlineTypeface, Typeface};

pub use image::{Rgba, RgbaImage};
