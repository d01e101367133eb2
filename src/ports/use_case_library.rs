//! Use-Case Library Port - source of the shared candidate catalog.

use async_trait::async_trait;

use crate::domain::catalog::UseCase;

#[derive(Debug, Clone, thiserror::Error)]
pub enum LibraryError {
    #[error("failed to read use-case library: {0}")]
    Io(String),

    #[error("invalid use-case library: {0}")]
    Invalid(String),
}

/// Port for listing library use-cases.
#[async_trait]
pub trait UseCaseLibrary: Send + Sync {
    /// All library entries in catalog order.
    async fn list(&self) -> Result<Vec<UseCase>, LibraryError>;
}
