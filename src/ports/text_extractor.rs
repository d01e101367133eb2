//! Text Extractor Port - turns uploaded files into plain text.

use async_trait::async_trait;

use crate::domain::journey::UploadedFile;

/// Errors for a single file. Never aborts a batch.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractionError {
    #[error("unsupported file type: {file_name}")]
    UnsupportedFormat { file_name: String },

    #[error("{file_name} is not valid UTF-8 text")]
    InvalidEncoding { file_name: String },

    #[error("{file_name} contains no text")]
    Empty { file_name: String },

    #[error("failed to read {file_name}: {reason}")]
    ReadFailed { file_name: String, reason: String },
}

impl ExtractionError {
    /// Name of the file the error belongs to.
    pub fn file_name(&self) -> &str {
        match self {
            ExtractionError::UnsupportedFormat { file_name }
            | ExtractionError::InvalidEncoding { file_name }
            | ExtractionError::Empty { file_name }
            | ExtractionError::ReadFailed { file_name, .. } => file_name,
        }
    }
}

/// Port for extracting text from uploaded files.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract(&self, file: &UploadedFile) -> Result<String, ExtractionError>;
}
