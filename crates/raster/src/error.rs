use thiserror::Error;

#[derive(Error, Debug)]
pub enum RasterError {
    #[error("Font data could not be parsed: {0}")]
    InvalidFont(String),

    #[error("Image decode error: {0}")]
    Decode(#[from] image::ImageError),

    #[error("Image has no pixels")]
    EmptyImage,
}
