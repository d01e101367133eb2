//! YAML Use-Case Library - reads the shared catalog from a YAML file.
//!
//! ```yaml
//! use_cases:
//!   - id: fin-invoice
//!     title: Invoice Processing Automation
//!     domain: Finance
//!     process: Accounts Payable
//!     description: Capture and route supplier invoices
//! ```

use async_trait::async_trait;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::domain::catalog::UseCase;
use crate::ports::{LibraryError, UseCaseLibrary};

#[derive(Debug, Deserialize)]
struct LibraryFile {
    #[serde(default)]
    use_cases: Vec<LibraryEntry>,
}

#[derive(Debug, Deserialize)]
struct LibraryEntry {
    id: String,
    title: String,
    domain: String,
    #[serde(default)]
    process: String,
    #[serde(default)]
    description: String,
}

impl LibraryEntry {
    fn into_use_case(self) -> Result<UseCase, LibraryError> {
        let id = self.id.clone();
        let use_case = UseCase::new(self.id, self.title, self.domain)
            .map_err(|e| LibraryError::Invalid(format!("entry '{}': {}", id, e)))?;
        Ok(use_case
            .with_process(self.process)
            .with_description(self.description))
    }
}

/// Parses library YAML text.
pub fn parse_library(yaml: &str) -> Result<Vec<UseCase>, LibraryError> {
    let file: LibraryFile =
        serde_yaml::from_str(yaml).map_err(|e| LibraryError::Invalid(e.to_string()))?;
    file.use_cases
        .into_iter()
        .map(LibraryEntry::into_use_case)
        .collect()
}

/// Library backed by a YAML file, read on every `list`.
#[derive(Debug, Clone)]
pub struct YamlUseCaseLibrary {
    path: PathBuf,
}

impl YamlUseCaseLibrary {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl UseCaseLibrary for YamlUseCaseLibrary {
    async fn list(&self) -> Result<Vec<UseCase>, LibraryError> {
        let yaml = fs::read_to_string(&self.path)
            .await
            .map_err(|e| LibraryError::Io(format!("{}: {}", self.path.display(), e)))?;
        parse_library(&yaml)
    }
}
