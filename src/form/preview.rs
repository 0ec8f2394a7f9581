use tokio_util::sync::CancellationToken;

use crate::model::entity::CourseImage;
use crate::model::{ImageError, ImageResult};
use crate::utils::data_url;

/// Progress of the cover preview derivation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PreviewState {
    #[default]
    Empty,
    Loading,
    Ready,
    Failed(String),
}

/// A pending preview read for one attached image.
///
/// Returned by [`CourseForm::attach_image`](super::CourseForm::attach_image). Drive it
/// with [`PreviewTicket::load`] and hand the event back through
/// [`CourseForm::apply_preview`](super::CourseForm::apply_preview).
#[derive(Debug)]
pub struct PreviewTicket {
    generation: u64,
    image: CourseImage,
    cancel: CancellationToken,
    max_bytes: u64,
}

#[derive(Debug)]
pub struct PreviewEvent {
    pub(crate) generation: u64,
    pub(crate) outcome: PreviewOutcome,
}

#[derive(Debug)]
pub enum PreviewOutcome {
    Loaded(String),
    Failed(ImageError),
    Cancelled,
}

impl PreviewTicket {
    pub(crate) fn new(
        generation: u64,
        image: CourseImage,
        cancel: CancellationToken,
        max_bytes: u64,
    ) -> Self {
        Self {
            generation,
            image,
            cancel,
            max_bytes,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn image(&self) -> &CourseImage {
        &self.image
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Reads and encodes the image. Resolves early with
    /// [`PreviewOutcome::Cancelled`] once the image is replaced or removed.
    #[tracing::instrument(skip(self), fields(file = %self.image.file_name(), generation = self.generation))]
    pub async fn load(self) -> PreviewEvent {
        let outcome = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => PreviewOutcome::Cancelled,
            result = encode_preview(&self.image, self.max_bytes) => match result {
                Ok(url) => PreviewOutcome::Loaded(url),
                Err(e) => PreviewOutcome::Failed(e),
            },
        };

        tracing::debug!("preview finished: {}", outcome.label());
        PreviewEvent {
            generation: self.generation,
            outcome,
        }
    }
}

impl PreviewEvent {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn outcome(&self) -> &PreviewOutcome {
        &self.outcome
    }
}

impl PreviewOutcome {
    fn label(&self) -> &'static str {
        match self {
            Self::Loaded(_) => "loaded",
            Self::Failed(_) => "failed",
            Self::Cancelled => "cancelled",
        }
    }
}

async fn encode_preview(image: &CourseImage, max_bytes: u64) -> ImageResult<String> {
    if let Some(size) = image.source().len().await? {
        check_size(size, max_bytes)?;
    }

    // sources without a known length are checked after the read
    let bytes = image.source().read().await?;
    check_size(bytes.len() as u64, max_bytes)?;

    Ok(data_url::encode(image.mime(), &bytes))
}

fn check_size(size: u64, max_bytes: u64) -> ImageResult<()> {
    if size > max_bytes {
        return Err(ImageError::TooLarge {
            size,
            max: max_bytes,
        });
    }
    Ok(())
}
