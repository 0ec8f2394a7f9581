use thiserror::Error;
use tracing::error;
use tracing_error::SpanTrace;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("config error: {0}")]
    ConfigError(#[from] crate::config::ConfigError),
    #[error("image error: {0}")]
    ImageError(#[from] crate::model::ImageError),
    #[error("json error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("manifest error: {0}")]
    ManifestError(#[from] toml::de::Error),
    #[error("lesson {index} is missing: {missing}")]
    InvalidLesson { index: usize, missing: String },
    #[error("course is not ready to submit: {reason}")]
    NotSubmittable { reason: String },
}

pub type AppResult<T> = std::result::Result<T, AppError>;

pub async fn run_with_error_handler<F, T>(run: F) -> T
where
    F: AsyncFn() -> AppResult<T>,
    T: Send + Sync,
{
    match run().await {
        Ok(value) => value,
        Err(e) => {
            default_error_handler(e);
            std::process::exit(1);
        }
    }
}

fn default_error_handler(error: AppError) {
    let span = SpanTrace::capture();
    error!("{}\n{}", error, span);
}

pub fn log_error<E: std::error::Error + std::fmt::Display>(error: &E) {
    let span = SpanTrace::capture();
    error!("{}\n{}", error, span);
}
