pub mod connection;
pub mod migrations;
pub mod repositories;
pub mod seed;

pub use connection::{connect, connect_with_config, connect_with_settings, ping, DbPool};
pub use repositories::{ClubRepository, InMemoryClubRepository, RepositoryError, SqlClubRepository};
pub use seed::{CatalogSeed, SeedError, SeedSkip, SeedSummary, SkipReason, BUNDLED_CATALOG};
