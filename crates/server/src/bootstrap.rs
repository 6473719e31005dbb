use std::sync::Arc;

use axum::Router;
use caddie_core::config::{AppConfig, ConfigError};
use caddie_db::{connect_with_config, migrations, DbPool, SqlClubRepository};
use thiserror::Error;
use tower_http::services::ServeDir;
use tracing::info;

use crate::catalog_api::{self, CatalogApiState};
use crate::health;

pub struct Application {
    pub config: AppConfig,
    pub db_pool: DbPool,
    pub clubs: Arc<SqlClubRepository>,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("database connection failed: {0}")]
    DatabaseConnect(#[source] sqlx::Error),
    #[error("database migration failed: {0}")]
    Migration(#[source] sqlx::migrate::MigrateError),
}

pub async fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        "starting application bootstrap"
    );

    let db_pool =
        connect_with_config(&config.database).await.map_err(BootstrapError::DatabaseConnect)?;
    info!(
        event_name = "system.bootstrap.database_connected",
        correlation_id = "bootstrap",
        "database connection established"
    );

    migrations::run_pending(&db_pool).await.map_err(BootstrapError::Migration)?;
    info!(
        event_name = "system.bootstrap.migrations_applied",
        correlation_id = "bootstrap",
        "database migrations applied"
    );

    let clubs = Arc::new(SqlClubRepository::new(db_pool.clone()));
    Ok(Application { config, db_pool, clubs })
}

impl Application {
    /// Catalog API, health probe and static club images on one router.
    pub fn router(&self) -> Router {
        let page_size = self.config.catalog.default_page_size;
        catalog_api::router(CatalogApiState::new(self.clubs.clone(), page_size))
            .merge(health::router(self.db_pool.clone()))
            .nest_service("/club_images", ServeDir::new(&self.config.catalog.image_dir))
    }
}
