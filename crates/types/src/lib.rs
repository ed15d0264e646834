pub mod color;
pub mod display_id;
pub mod geometry;
pub mod record;

pub use color::Color;
pub use display_id::{DisplayId, DisplayIdError};
pub use geometry::{Point, Rect, Size};
pub use record::{CertificateRecord, CertificateStatus, RecordError};
