//! JSON API over the club catalog.
//!
//! - `GET  /api/clubs`: full catalog document
//! - `GET  /api/catalog`: filtered, sorted, paginated catalog page
//! - `GET  /api/catalog/options`: brand and handicapper-level filter options
//! - `POST /api/bag/report`: gap report and checkout for a list of variants
//! - `POST /api/lofts/recommendations`: loft targets for the gaps between lofts

use std::str::FromStr;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use caddie_core::catalog::page::PAGE_SIZE_OPTIONS;
use caddie_core::preferences::{parse_loft_inputs, recommended_lofts, sanitize_lofts};
use caddie_core::{
    query_catalog, ApplicationError, Bag, CatalogDocument, CatalogPage, CatalogSnapshot,
    CatalogSource, CheckoutSummary, DomainError, FilterCriteria, GapReport, InterfaceError,
    LoftGapTargets, SortKey, VariantId,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

fn correlation_id() -> String {
    format!("req-{}", Uuid::new_v4().simple())
}

#[derive(Clone)]
pub struct CatalogApiState {
    source: Arc<dyn CatalogSource>,
    default_page_size: usize,
}

impl CatalogApiState {
    pub fn new(source: Arc<dyn CatalogSource>, default_page_size: usize) -> Self {
        Self { source, default_page_size }
    }

    async fn snapshot(&self, correlation_id: &str) -> Result<CatalogSnapshot, ApiFailure> {
        match self.source.fetch_catalog().await {
            Ok(document) => Ok(CatalogSnapshot::from_document(document)),
            Err(error) => Err(failure(ApplicationError::from(error), correlation_id)),
        }
    }
}

// ---------------------------------------------------------------------------
// Request / Response types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
    pub correlation_id: String,
}

pub type ApiFailure = (StatusCode, Json<ApiError>);

#[derive(Debug, Default, Deserialize)]
pub struct CatalogQuery {
    pub category: Option<String>,
    pub sub_item: Option<String>,
    pub sub_sub_item: Option<String>,
    pub search: Option<String>,
    pub handedness: Option<String>,
    pub brand: Option<String>,
    pub handicapper_level: Option<String>,
    pub price_min: Option<String>,
    pub price_max: Option<String>,
    /// Comma-separated lofts of the clubs the golfer already carries.
    pub lofts: Option<String>,
    pub sort: Option<String>,
    pub page: Option<usize>,
    pub page_size: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FilterOptions {
    pub brands: Vec<String>,
    pub handicapper_levels: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct BagReportRequest {
    pub variant_ids: Vec<i64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RejectedVariant {
    pub variant_id: i64,
    pub reason: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BagReportResponse {
    pub report: GapReport,
    pub rejected: Vec<RejectedVariant>,
    pub checkout: CheckoutSummary,
}

#[derive(Debug, Deserialize)]
pub struct LoftsRequest {
    pub lofts: Vec<f64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoftsResponse {
    pub lofts: Vec<f64>,
    pub recommended: Vec<f64>,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn router(state: CatalogApiState) -> Router {
    Router::new()
        .route("/api/clubs", get(list_clubs))
        .route("/api/catalog", get(catalog_page))
        .route("/api/catalog/options", get(filter_options))
        .route("/api/bag/report", post(bag_report))
        .route("/api/lofts/recommendations", post(loft_recommendations))
        .with_state(state)
}

fn failure(error: ApplicationError, correlation_id: &str) -> ApiFailure {
    let interface = error.into_interface(correlation_id);
    let status = match interface {
        InterfaceError::BadRequest { .. } => StatusCode::BAD_REQUEST,
        InterfaceError::ServiceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
        InterfaceError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    };
    warn!(
        event_name = "api.request.failed",
        correlation_id = %correlation_id,
        status = status.as_u16(),
        error = %interface,
        "catalog api request failed"
    );
    let error = match &interface {
        InterfaceError::BadRequest { message, .. } => message.clone(),
        _ => interface.user_message().to_string(),
    };
    (status, Json(ApiError { error, correlation_id: interface.correlation_id().to_string() }))
}

fn bad_request(message: String, correlation_id: &str) -> ApiFailure {
    failure(DomainError::InvariantViolation(message).into(), correlation_id)
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

pub async fn list_clubs(
    State(state): State<CatalogApiState>,
) -> Result<Json<CatalogDocument>, ApiFailure> {
    let correlation_id = correlation_id();
    match state.source.fetch_catalog().await {
        Ok(document) => {
            info!(
                event_name = "api.clubs.served",
                correlation_id = %correlation_id,
                clubs = document.clubs.len(),
                "catalog document served"
            );
            Ok(Json(document))
        }
        Err(error) => Err(failure(error.into(), &correlation_id)),
    }
}

fn parse_price(
    raw: Option<&str>,
    field: &str,
    correlation_id: &str,
) -> Result<Option<Decimal>, ApiFailure> {
    match raw.map(str::trim).filter(|value| !value.is_empty()) {
        None => Ok(None),
        Some(value) => Decimal::from_str(value)
            .map(Some)
            .map_err(|_| bad_request(format!("{field} must be a decimal number"), correlation_id)),
    }
}

impl CatalogQuery {
    fn criteria(&self, correlation_id: &str) -> Result<FilterCriteria, ApiFailure> {
        let loft_gap_targets = self.lofts.as_deref().and_then(|raw| {
            let inputs = raw.split(',').collect::<Vec<_>>();
            let targets = LoftGapTargets::from_lofts(&parse_loft_inputs(&inputs));
            (!targets.is_empty()).then_some(targets)
        });

        Ok(FilterCriteria {
            category: self.category.clone(),
            sub_item: self.sub_item.clone(),
            sub_sub_item: self.sub_sub_item.clone(),
            search: self.search.clone(),
            handedness: self.handedness.clone(),
            brand: self.brand.clone(),
            handicapper_level: self.handicapper_level.clone(),
            price_min: parse_price(self.price_min.as_deref(), "price_min", correlation_id)?,
            price_max: parse_price(self.price_max.as_deref(), "price_max", correlation_id)?,
            loft_gap_targets,
        })
    }
}

pub async fn catalog_page(
    State(state): State<CatalogApiState>,
    Query(query): Query<CatalogQuery>,
) -> Result<Json<CatalogPage>, ApiFailure> {
    let correlation_id = correlation_id();
    let criteria = query.criteria(&correlation_id)?;
    let sort = match query.sort.as_deref() {
        Some(raw) => {
            SortKey::from_str(raw).map_err(|error| failure(error.into(), &correlation_id))?
        }
        None => SortKey::Default,
    };
    let page_size = query.page_size.unwrap_or(state.default_page_size);
    if !PAGE_SIZE_OPTIONS.contains(&page_size) {
        return Err(bad_request(
            format!("page_size must be one of {PAGE_SIZE_OPTIONS:?}"),
            &correlation_id,
        ));
    }

    let snapshot = state.snapshot(&correlation_id).await?;
    let page = query_catalog(&snapshot, &criteria, sort, query.page.unwrap_or(1), page_size);
    Ok(Json(page))
}

pub async fn filter_options(
    State(state): State<CatalogApiState>,
) -> Result<Json<FilterOptions>, ApiFailure> {
    let correlation_id = correlation_id();
    let snapshot = state.snapshot(&correlation_id).await?;
    Ok(Json(FilterOptions {
        brands: snapshot.brand_options(),
        handicapper_levels: snapshot.handicapper_level_options(),
    }))
}

/// Adds the requested variants in order under the normal bag rules and
/// reports on the resulting bag. Duplicates are dropped silently.
pub async fn bag_report(
    State(state): State<CatalogApiState>,
    Json(request): Json<BagReportRequest>,
) -> Result<Json<BagReportResponse>, ApiFailure> {
    let correlation_id = correlation_id();
    let snapshot = state.snapshot(&correlation_id).await?;

    let mut bag = Bag::new();
    let mut rejected = Vec::new();
    for variant_id in request.variant_ids {
        match bag.add_from_catalog(&snapshot, VariantId(variant_id)) {
            Err(error) if !error.is_silent() => {
                rejected.push(RejectedVariant { variant_id, reason: error.to_string() })
            }
            _ => {}
        }
    }

    Ok(Json(BagReportResponse {
        report: bag.gap_report(&snapshot),
        rejected,
        checkout: bag.checkout_summary(),
    }))
}

pub async fn loft_recommendations(Json(request): Json<LoftsRequest>) -> Json<LoftsResponse> {
    let lofts = sanitize_lofts(&request.lofts);
    let recommended = recommended_lofts(&lofts);
    Json(LoftsResponse { lofts, recommended })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::{
        body::{to_bytes, Body},
        extract::{Query, State},
        http::{Request, StatusCode},
        Json,
    };
    use caddie_core::catalog::source::StaticCatalogSource;
    use caddie_core::{CatalogDocument, CatalogError, CatalogSource};
    use tower::ServiceExt;

    use super::*;

    struct FailingSource(CatalogError);

    #[async_trait]
    impl CatalogSource for FailingSource {
        async fn fetch_catalog(&self) -> Result<CatalogDocument, CatalogError> {
            Err(self.0.clone())
        }
    }

    #[test]
    fn correlation_ids_are_random_and_distinct() {
        let first = correlation_id();
        let second = correlation_id();

        assert_ne!(first, second);
        for id in [&first, &second] {
            assert!(id.starts_with("req-"));
            assert_eq!(id.len(), 36);
            assert!(id["req-".len()..].chars().all(|c| c.is_ascii_hexdigit()));
        }
    }

    fn document() -> CatalogDocument {
        serde_json::from_value(serde_json::json!({
            "clubs": [
                {
                    "type": "Iron Set", "subtype": "Individual", "specifictype": "7 Iron",
                    "brand": "Ping", "model": "i230", "handicapperlevel": "Advanced",
                    "variants": [{ "id": 1, "loft": "33°", "price": 115.0,
                                   "description": "Handedness: Right-Handed" }]
                },
                {
                    "type": "Wedge", "specifictype": "Pitching Wedge",
                    "brand": "Titleist", "model": "Vokey SM10", "handicapperlevel": "Intermediate",
                    "variants": [{ "id": 2, "loft": "46°", "price": 140.0, "description": "" }]
                },
                {
                    "type": "Wedge", "specifictype": "Sand Wedge",
                    "brand": "Callaway", "model": "Jaws Raw", "handicapperlevel": "Advanced",
                    "variants": [{ "id": 3, "loft": "56°", "price": 130.0, "description": "" }]
                }
            ]
        }))
        .expect("document json")
    }

    fn state() -> CatalogApiState {
        CatalogApiState::new(Arc::new(StaticCatalogSource::new(document())), 50)
    }

    fn failing(error: CatalogError) -> CatalogApiState {
        CatalogApiState::new(Arc::new(FailingSource(error)), 50)
    }

    #[tokio::test]
    async fn list_clubs_returns_the_document() {
        let Json(document) = list_clubs(State(state())).await.expect("clubs");
        assert_eq!(document.clubs.len(), 3);
    }

    #[tokio::test]
    async fn unavailable_store_maps_to_503_and_malformed_to_500() {
        let (status, Json(body)) =
            list_clubs(State(failing(CatalogError::Unavailable("pool closed".to_string()))))
                .await
                .expect_err("unavailable");
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(!body.error.contains("pool closed"));
        assert!(body.correlation_id.starts_with("req-"));

        let (status, _) =
            list_clubs(State(failing(CatalogError::Malformed("bad price".to_string()))))
                .await
                .expect_err("malformed");
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn catalog_page_filters_and_sorts() {
        let query = CatalogQuery {
            category: Some("Wedge".to_string()),
            sort: Some("price-asc".to_string()),
            page_size: Some(25),
            ..CatalogQuery::default()
        };

        let Json(page) = catalog_page(State(state()), Query(query)).await.expect("page");

        assert_eq!(page.total_items, 2);
        assert_eq!(page.page_size, 25);
        let models = page.items.iter().map(|m| m.model.as_str()).collect::<Vec<_>>();
        assert_eq!(models, vec!["Jaws Raw", "Vokey SM10"]);
    }

    #[tokio::test]
    async fn catalog_page_rejects_bad_inputs() {
        for query in [
            CatalogQuery { sort: Some("cheapest".to_string()), ..CatalogQuery::default() },
            CatalogQuery { page_size: Some(30), ..CatalogQuery::default() },
            CatalogQuery { price_min: Some("cheap".to_string()), ..CatalogQuery::default() },
        ] {
            let (status, _) =
                catalog_page(State(state()), Query(query)).await.expect_err("bad request");
            assert_eq!(status, StatusCode::BAD_REQUEST);
        }
    }

    #[tokio::test]
    async fn catalog_page_applies_loft_gap_targets() {
        // 33° and 56° leave a gap centred on 44.5°; only the 46° wedge is within 2°.
        let query =
            CatalogQuery { lofts: Some("33, 56".to_string()), ..CatalogQuery::default() };
        let Json(page) = catalog_page(State(state()), Query(query)).await.expect("page");
        let models = page.items.iter().map(|m| m.model.as_str()).collect::<Vec<_>>();
        assert_eq!(models, vec!["Vokey SM10"]);
    }

    #[tokio::test]
    async fn bag_report_recommends_and_reports_rejections() {
        let request = BagReportRequest { variant_ids: vec![3, 1, 1, 99] };

        let Json(response) = bag_report(State(state()), Json(request)).await.expect("report");

        assert_eq!(response.report.sorted_bag.len(), 2);
        assert_eq!(response.report.gaps.len(), 1);
        let candidate = response.report.recommendations[0].candidate.as_ref().expect("candidate");
        assert_eq!(candidate.id().0, 2);
        assert_eq!(response.rejected.len(), 1);
        assert_eq!(response.rejected[0].variant_id, 99);
        assert_eq!(response.checkout.lines.len(), 2);
        assert_eq!(response.checkout.total, Decimal::from(245));
    }

    #[tokio::test]
    async fn loft_recommendations_sanitize_and_fill_gaps() {
        let Json(response) =
            loft_recommendations(Json(LoftsRequest { lofts: vec![56.0, 46.0, 80.0, -1.0] })).await;
        assert_eq!(response.lofts, vec![56.0, 46.0]);
        assert_eq!(response.recommended, vec![51.0]);
    }

    #[tokio::test]
    async fn router_serves_options_over_http() {
        let response = router(state())
            .oneshot(
                Request::builder()
                    .uri("/api/catalog/options")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.expect("body");
        let options: FilterOptions = serde_json::from_slice(&body).expect("options json");
        assert_eq!(options.brands, vec!["Callaway", "Ping", "Titleist"]);
        assert_eq!(options.handicapper_levels, vec!["Advanced", "Intermediate"]);
    }

    #[tokio::test]
    async fn router_parses_catalog_query_string() {
        let response = router(state())
            .oneshot(
                Request::builder()
                    .uri("/api/catalog?search=vokey&page=1&page_size=25")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.expect("body");
        let page: serde_json::Value = serde_json::from_slice(&body).expect("page json");
        assert_eq!(page["total_items"], 1);
        assert_eq!(page["items"][0]["model"], "Vokey SM10");
    }
}
