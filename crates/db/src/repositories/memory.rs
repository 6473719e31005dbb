use tokio::sync::RwLock;

use caddie_core::catalog::{CatalogError, CatalogSource};
use caddie_core::domain::club::{CatalogDocument, ClubModel};

use super::{ClubRepository, RepositoryError};

#[derive(Default)]
pub struct InMemoryClubRepository {
    models: RwLock<Vec<ClubModel>>,
}

impl InMemoryClubRepository {
    pub fn with_models(models: Vec<ClubModel>) -> Self {
        Self { models: RwLock::new(models) }
    }
}

#[async_trait::async_trait]
impl ClubRepository for InMemoryClubRepository {
    async fn list_club_models(&self) -> Result<Vec<ClubModel>, RepositoryError> {
        let models = self.models.read().await;
        Ok(models.clone())
    }

    async fn replace_catalog(&self, models: &[ClubModel]) -> Result<(), RepositoryError> {
        let mut stored = self.models.write().await;
        *stored = models.to_vec();
        Ok(())
    }
}

#[async_trait::async_trait]
impl CatalogSource for InMemoryClubRepository {
    async fn fetch_catalog(&self) -> Result<CatalogDocument, CatalogError> {
        Ok(CatalogDocument { clubs: self.list_club_models().await? })
    }
}
