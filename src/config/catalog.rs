//! Use-case library configuration

use serde::Deserialize;
use std::path::PathBuf;

use super::error::ValidationError;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogConfig {
    /// YAML library file; unset uses the built-in catalog
    pub library_path: Option<PathBuf>,
}

impl CatalogConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        match &self.library_path {
            Some(path) if path.as_os_str().is_empty() => {
                Err(ValidationError::BlankPath("library_path"))
            }
            _ => Ok(()),
        }
    }
}
