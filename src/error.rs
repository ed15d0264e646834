use crate::lookup::LookupError;
use certforge_raster::RasterError;
use certforge_traits::ResourceError;
use thiserror::Error;

/// Failures while assembling the application from configuration.
#[derive(Error, Debug)]
pub enum SetupError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Resource error: {0}")]
    Resource(#[from] ResourceError),

    #[error("Font error: {0}")]
    Font(#[from] RasterError),

    #[error("Record store error: {0}")]
    Store(#[from] LookupError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
