pub mod bag;
pub mod browse;
pub mod config;
pub mod lofts;
pub mod migrate;
pub mod seed;

use caddie_core::catalog::{CatalogSession, CatalogSnapshot};
use caddie_core::config::{AppConfig, LoadOptions};
use caddie_db::{connect_with_config, migrations, DbPool, SqlClubRepository};
use serde::Serialize;
use serde_json::Value;
use tokio::runtime::Runtime;

use crate::remote::HttpCatalogSource;

pub const EXIT_CONFIG: u8 = 2;
pub const EXIT_RUNTIME: u8 = 3;
pub const EXIT_CONNECTIVITY: u8 = 4;
pub const EXIT_EXECUTION: u8 = 5;
pub const EXIT_UNAVAILABLE: u8 = 6;

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
struct CommandOutcome {
    command: String,
    status: String,
    error_class: Option<String>,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
}

/// An error class, message and exit code on their way to becoming a failure
/// envelope.
pub type Failure = (&'static str, String, u8);

impl CommandResult {
    pub fn success(command: &str, message: impl Into<String>) -> Self {
        Self::success_with_data(command, message, Value::Null)
    }

    pub fn success_with_data(
        command: &str,
        message: impl Into<String>,
        data: impl Serialize,
    ) -> Self {
        let data = serde_json::to_value(data).ok().filter(|value| !value.is_null());
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "ok".to_string(),
            error_class: None,
            message: message.into(),
            data,
        };
        Self { exit_code: 0, output: serialize_payload(payload) }
    }

    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: Some(error_class.to_string()),
            message: message.into(),
            data: None,
        };
        Self { exit_code, output: serialize_payload(payload) }
    }

    pub fn from_failure(command: &str, (error_class, message, exit_code): Failure) -> Self {
        Self::failure(command, error_class, message, exit_code)
    }
}

fn serialize_payload(payload: CommandOutcome) -> String {
    serde_json::to_string(&payload).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"unknown\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\"}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    })
}

pub(crate) fn load_config() -> Result<AppConfig, Failure> {
    AppConfig::load(LoadOptions::default()).map_err(|error| {
        ("config_validation", format!("configuration issue: {error}"), EXIT_CONFIG)
    })
}

pub(crate) fn runtime() -> Result<Runtime, Failure> {
    tokio::runtime::Builder::new_current_thread().enable_all().build().map_err(|error| {
        ("runtime_init", format!("failed to initialize async runtime: {error}"), EXIT_RUNTIME)
    })
}

/// Connects to the configured store and brings its schema up to date.
pub(crate) async fn open_store(config: &AppConfig) -> Result<DbPool, Failure> {
    let pool = connect_with_config(&config.database)
        .await
        .map_err(|error| ("db_connectivity", error.to_string(), EXIT_CONNECTIVITY))?;
    migrations::run_pending(&pool)
        .await
        .map_err(|error| ("migration", error.to_string(), EXIT_EXECUTION))?;
    Ok(pool)
}

/// Loads the catalog from a running server when `catalog.remote_url` is set,
/// otherwise from the local store.
pub(crate) async fn load_snapshot(config: &AppConfig) -> Result<CatalogSnapshot, Failure> {
    let mut session = CatalogSession::new();

    match config.catalog.remote_url.as_deref() {
        Some(base_url) => {
            let source = HttpCatalogSource::new(base_url)
                .map_err(|error| ("remote_client", error.to_string(), EXIT_RUNTIME))?;
            session.refresh(&source).await;
        }
        None => {
            let pool = open_store(config).await?;
            session.refresh(&SqlClubRepository::new(pool.clone())).await;
            pool.close().await;
        }
    }

    match session.unavailable_reason() {
        Some(reason) => Err((
            "catalog_unavailable",
            format!("club catalog could not be loaded: {reason}"),
            EXIT_UNAVAILABLE,
        )),
        None => Ok(session.snapshot().clone()),
    }
}
