use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportFailure {
    #[error("Raster image has no pixels")]
    EmptyRaster,

    #[error("PDF encoding error: {0}")]
    Encode(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<lopdf::Error> for ExportFailure {
    fn from(err: lopdf::Error) -> Self {
        ExportFailure::Encode(err.to_string())
    }
}
