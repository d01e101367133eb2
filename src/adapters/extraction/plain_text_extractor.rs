//! Plain Text Extractor - reads UTF-8 text uploads.
//!
//! Binary document formats (PDF, DOCX, ...) are reported as unsupported;
//! a richer extractor can sit behind the same port.

use async_trait::async_trait;

use crate::domain::journey::UploadedFile;
use crate::ports::{ExtractionError, TextExtractor};

/// Extensions read as UTF-8 text.
const TEXT_EXTENSIONS: &[&str] = &["txt", "md", "markdown", "csv", "tsv", "json", "vtt", "srt"];

#[derive(Debug, Clone, Default)]
pub struct PlainTextExtractor;

impl PlainTextExtractor {
    pub fn new() -> Self {
        Self
    }

    fn is_text(file: &UploadedFile) -> bool {
        if let Some(content_type) = &file.content_type {
            if content_type.starts_with("text/") {
                return true;
            }
        }
        file.extension()
            .map(|ext| TEXT_EXTENSIONS.contains(&ext.as_str()))
            .unwrap_or(false)
    }
}

#[async_trait]
impl TextExtractor for PlainTextExtractor {
    async fn extract(&self, file: &UploadedFile) -> Result<String, ExtractionError> {
        if !Self::is_text(file) {
            return Err(ExtractionError::UnsupportedFormat {
                file_name: file.file_name.clone(),
            });
        }

        let text = String::from_utf8(file.bytes.clone()).map_err(|_| ExtractionError::InvalidEncoding {
            file_name: file.file_name.clone(),
        })?;
        let text = text.trim_start_matches('\u{feff}').trim().to_string();

        if text.is_empty() {
            return Err(ExtractionError::Empty {
                file_name: file.file_name.clone(),
            });
        }
        Ok(text)
    }
}
