pub mod config;
pub use config::{Config, ConfigError, ConfigResult};

pub mod error;
pub mod form;
pub mod model;
pub mod utils;

pub use form::CourseForm;
pub use model::entity::{Course, CourseImage, Lesson, LessonDraft, LessonId};

static APPLICATION_NAME: &str = "coursekit";

pub fn setup_trace() {
    use tracing_error::ErrorLayer;
    use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

    // load .env file for RUST_LOG etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .with(ErrorLayer::default())
        .init();

    tracing::debug!("tracing initialized.");
}
