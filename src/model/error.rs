use thiserror::Error;

pub type ImageResult<T> = std::result::Result<T, ImageError>;

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("unsupported image type: {mime}")]
    UnsupportedType { mime: String },
    #[error("image is too large: {size} bytes, max {max}")]
    TooLarge { size: u64, max: u64 },
    #[error("path has no file name: {path}")]
    MissingFileName { path: String },
}
