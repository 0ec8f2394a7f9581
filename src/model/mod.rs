pub mod entity;

mod error;
pub use error::{ImageError, ImageResult};
