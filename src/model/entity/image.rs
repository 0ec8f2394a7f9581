use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use mime::Mime;
use serde::ser::{Serialize, SerializeStruct, Serializer};

use crate::model::error::{ImageError, ImageResult};

/// Where the bytes of a selected image come from. Contents are treated as opaque and
/// immutable once the image is attached.
#[async_trait]
pub trait ImageSource: Send + Sync {
    /// Size in bytes when it can be known without reading the contents.
    async fn len(&self) -> std::io::Result<Option<u64>>;

    async fn read(&self) -> std::io::Result<Vec<u8>>;
}

/// Image file on the local filesystem.
#[derive(Debug, Clone)]
pub struct LocalImage {
    path: PathBuf,
}

impl LocalImage {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ImageSource for LocalImage {
    async fn len(&self) -> std::io::Result<Option<u64>> {
        let metadata = tokio::fs::metadata(&self.path).await?;
        Ok(Some(metadata.len()))
    }

    async fn read(&self) -> std::io::Result<Vec<u8>> {
        tokio::fs::read(&self.path).await
    }
}

#[derive(Debug, Clone)]
pub struct InMemoryImage {
    bytes: Arc<[u8]>,
}

impl InMemoryImage {
    pub fn new<B: Into<Arc<[u8]>>>(bytes: B) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }
}

#[async_trait]
impl ImageSource for InMemoryImage {
    async fn len(&self) -> std::io::Result<Option<u64>> {
        Ok(Some(self.bytes.len() as u64))
    }

    async fn read(&self) -> std::io::Result<Vec<u8>> {
        Ok(self.bytes.to_vec())
    }
}

/// The cover image selected for a course.
#[derive(Clone)]
pub struct CourseImage {
    file_name: String,
    mime: Mime,
    source: Arc<dyn ImageSource>,
}

impl CourseImage {
    /// Fails with [`ImageError::UnsupportedType`] unless `mime` is an `image/*` type.
    pub fn new<S: Into<String>>(
        file_name: S,
        mime: Mime,
        source: Arc<dyn ImageSource>,
    ) -> ImageResult<Self> {
        if mime.type_() != mime::IMAGE {
            return Err(ImageError::UnsupportedType {
                mime: mime.to_string(),
            });
        }

        Ok(Self {
            file_name: file_name.into(),
            mime,
            source,
        })
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> ImageResult<Self> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| ImageError::MissingFileName {
                path: path.display().to_string(),
            })?
            .to_string();
        let mime = mime_from_file_name(&file_name);
        Self::new(file_name, mime, Arc::new(LocalImage::new(path)))
    }

    pub fn in_memory<S: Into<String>, B: Into<Arc<[u8]>>>(
        file_name: S,
        bytes: B,
    ) -> ImageResult<Self> {
        let file_name = file_name.into();
        let mime = mime_from_file_name(&file_name);
        Self::new(file_name, mime, Arc::new(InMemoryImage::new(bytes)))
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn mime(&self) -> &Mime {
        &self.mime
    }

    pub fn source(&self) -> &dyn ImageSource {
        self.source.as_ref()
    }
}

impl std::fmt::Debug for CourseImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CourseImage")
            .field("file_name", &self.file_name)
            .field("mime", &self.mime)
            .finish_non_exhaustive()
    }
}

// Only metadata leaves the process, the bytes stay with the source.
impl Serialize for CourseImage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("CourseImage", 2)?;
        state.serialize_field("file_name", &self.file_name)?;
        state.serialize_field("mime", self.mime.essence_str())?;
        state.end()
    }
}

fn mime_from_file_name(file_name: &str) -> Mime {
    let ext = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "png" => mime::IMAGE_PNG,
        "jpg" | "jpeg" => mime::IMAGE_JPEG,
        "gif" => mime::IMAGE_GIF,
        "bmp" => mime::IMAGE_BMP,
        "svg" => mime::IMAGE_SVG,
        "webp" | "avif" | "tiff" => format!("image/{ext}")
            .parse()
            .unwrap_or(mime::APPLICATION_OCTET_STREAM),
        "ico" => "image/x-icon"
            .parse()
            .unwrap_or(mime::APPLICATION_OCTET_STREAM),
        _ => mime::APPLICATION_OCTET_STREAM,
    }
}
