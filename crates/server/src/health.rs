use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use caddie_db::{ping, DbPool};
use chrono::Utc;
use serde::Serialize;
use tracing::warn;

const READY: &str = "ready";
const DEGRADED: &str = "degraded";

#[derive(Clone)]
pub struct HealthState {
    db_pool: DbPool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthCheck {
    pub status: &'static str,
    pub detail: String,
}

impl HealthCheck {
    fn ready(detail: impl Into<String>) -> Self {
        Self { status: READY, detail: detail.into() }
    }

    fn degraded(detail: impl Into<String>) -> Self {
        Self { status: DEGRADED, detail: detail.into() }
    }

    fn is_ready(&self) -> bool {
        self.status == READY
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: HealthCheck,
    pub catalog: HealthCheck,
    pub checked_at: String,
}

pub fn router(db_pool: DbPool) -> Router {
    Router::new().route("/health", get(health)).with_state(HealthState { db_pool })
}

/// Ready only when the store answers and the catalog schema is in place. An
/// empty catalog is still ready; it just serves no clubs.
pub async fn health(State(state): State<HealthState>) -> (StatusCode, Json<HealthResponse>) {
    let database = database_check(&state.db_pool).await;
    let catalog = if database.is_ready() {
        catalog_check(&state.db_pool).await
    } else {
        HealthCheck::degraded("skipped: catalog store unreachable")
    };
    let ready = database.is_ready() && catalog.is_ready();

    let payload = HealthResponse {
        status: if ready { READY } else { DEGRADED },
        database,
        catalog,
        checked_at: Utc::now().to_rfc3339(),
    };

    let status_code = if ready { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };
    (status_code, Json(payload))
}

async fn database_check(pool: &DbPool) -> HealthCheck {
    match ping(pool).await {
        Ok(()) => HealthCheck::ready("catalog store reachable"),
        Err(error) => {
            warn!(
                event_name = "system.health.database_degraded",
                error = %error,
                "catalog store probe failed"
            );
            HealthCheck::degraded(format!("catalog store probe failed: {error}"))
        }
    }
}

async fn catalog_check(pool: &DbPool) -> HealthCheck {
    match sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM clubs").fetch_one(pool).await {
        Ok(count) => HealthCheck::ready(format!("{count} club models stored")),
        Err(error) => HealthCheck::degraded(format!("catalog schema unavailable: {error}")),
    }
}
