//! Reads the catalog from a running `caddie-server` instead of the local store.

use std::time::Duration;

use async_trait::async_trait;
use caddie_core::catalog::{CatalogError, CatalogSource};
use caddie_core::CatalogDocument;
use reqwest::{Client, StatusCode};
use tracing::debug;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone, Debug)]
pub struct HttpCatalogSource {
    client: Client,
    clubs_url: String,
}

impl HttpCatalogSource {
    pub fn new(base_url: &str) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        let clubs_url = format!("{}/api/clubs", base_url.trim_end_matches('/'));
        Ok(Self { client, clubs_url })
    }

    pub fn clubs_url(&self) -> &str {
        &self.clubs_url
    }
}

#[async_trait]
impl CatalogSource for HttpCatalogSource {
    async fn fetch_catalog(&self) -> Result<CatalogDocument, CatalogError> {
        debug!(event_name = "catalog.remote.fetch", url = %self.clubs_url, "fetching catalog");
        let response = self
            .client
            .get(&self.clubs_url)
            .send()
            .await
            .map_err(|error| CatalogError::Unavailable(error.to_string()))?;

        match response.status() {
            status if status.is_success() => {}
            StatusCode::INTERNAL_SERVER_ERROR => {
                return Err(CatalogError::Malformed(format!(
                    "{} reported malformed catalog data",
                    self.clubs_url
                )));
            }
            status => {
                return Err(CatalogError::Unavailable(format!(
                    "{} answered {status}",
                    self.clubs_url
                )));
            }
        }

        response
            .json::<CatalogDocument>()
            .await
            .map_err(|error| CatalogError::Malformed(error.to_string()))
    }
}
