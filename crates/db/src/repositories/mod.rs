use async_trait::async_trait;
use thiserror::Error;

use caddie_core::catalog::CatalogError;
use caddie_core::domain::club::ClubModel;

pub mod club;
pub mod memory;

pub use club::SqlClubRepository;
pub use memory::InMemoryClubRepository;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),
    #[error("decode error: {0}")]
    Decode(String),
}

/// SQLite reports a schema that lacks the catalog tables or columns this way.
fn is_schema_mismatch(message: &str) -> bool {
    message.contains("no such table") || message.contains("no such column")
}

impl From<sqlx::Error> for RepositoryError {
    fn from(error: sqlx::Error) -> Self {
        match error {
            sqlx::Error::ColumnDecode { .. }
            | sqlx::Error::ColumnNotFound(_)
            | sqlx::Error::Decode(_)
            | sqlx::Error::TypeNotFound { .. } => Self::Decode(error.to_string()),
            sqlx::Error::Database(ref database) if is_schema_mismatch(database.message()) => {
                Self::Decode(error.to_string())
            }
            other => Self::Database(other),
        }
    }
}

impl From<RepositoryError> for CatalogError {
    fn from(value: RepositoryError) -> Self {
        match value {
            RepositoryError::Database(error) => Self::Unavailable(error.to_string()),
            RepositoryError::Decode(message) => Self::Malformed(message),
        }
    }
}

/// Storage for club models and their variants.
#[async_trait]
pub trait ClubRepository: Send + Sync {
    /// Every model with its variants, in id order.
    async fn list_club_models(&self) -> Result<Vec<ClubModel>, RepositoryError>;

    /// Replaces the whole catalog atomically.
    async fn replace_catalog(&self, models: &[ClubModel]) -> Result<(), RepositoryError>;
}
