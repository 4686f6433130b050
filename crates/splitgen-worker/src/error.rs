//! Worker error types.

use thiserror::Error;

use splitgen_media::MediaError;
use splitgen_models::RequestError;
use splitgen_storage::StorageError;

pub type WorkerResult<T> = Result<T, WorkerError>;

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Encode failed: {0}")]
    Encode(String),

    #[error("Upload failed: {0}")]
    Upload(String),

    #[error("Archive failed: {0}")]
    Archive(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Media error: {0}")]
    Media(#[from] MediaError),

    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<RequestError> for WorkerError {
    fn from(err: RequestError) -> Self {
        WorkerError::Configuration(err.to_string())
    }
}

impl WorkerError {
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    pub fn archive(msg: impl Into<String>) -> Self {
        Self::Archive(msg.into())
    }

    /// Classify a media error raised while reading a source.
    pub fn from_source(err: MediaError) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Media(err)
        }
    }

    /// Whether the error aborts the whole request.
    ///
    /// Encode and upload failures are handled per variant and only reach
    /// the caller through missing archive entries.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, WorkerError::Encode(_) | WorkerError::Upload(_))
    }

    /// Short label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            WorkerError::Decode(_) => "decode",
            WorkerError::Configuration(_) => "configuration",
            WorkerError::Encode(_) => "encode",
            WorkerError::Upload(_) => "upload",
            WorkerError::Archive(_) | WorkerError::Zip(_) => "archive",
            WorkerError::Storage(_) => "storage",
            WorkerError::Media(_) => "media",
            WorkerError::Io(_) => "io",
        }
    }
}
