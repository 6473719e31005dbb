//! Catalog fetching and the "last response wins" session guard.

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::catalog::snapshot::CatalogSnapshot;
use crate::domain::club::CatalogDocument;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("catalog unavailable: {0}")]
    Unavailable(String),
    #[error("catalog data malformed: {0}")]
    Malformed(String),
}

/// The single read operation the core needs from a catalog backend.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn fetch_catalog(&self) -> Result<CatalogDocument, CatalogError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FetchTicket(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogState {
    Empty,
    Ready(CatalogSnapshot),
    Unavailable { reason: String },
}

/// Tracks in-flight catalog fetches so that a slow, stale response never
/// overwrites a newer one.
#[derive(Debug)]
pub struct CatalogSession {
    next_ticket: u64,
    applied: Option<FetchTicket>,
    state: CatalogState,
    empty: CatalogSnapshot,
}

impl Default for CatalogSession {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogSession {
    pub fn new() -> Self {
        Self {
            next_ticket: 0,
            applied: None,
            state: CatalogState::Empty,
            empty: CatalogSnapshot::default(),
        }
    }

    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.next_ticket += 1;
        FetchTicket(self.next_ticket)
    }

    /// Applies a completed fetch. Returns `false` when a newer fetch was
    /// already applied and this result was discarded.
    pub fn complete_fetch(
        &mut self,
        ticket: FetchTicket,
        result: Result<CatalogDocument, CatalogError>,
    ) -> bool {
        if self.applied.is_some_and(|applied| ticket <= applied) {
            debug!(
                event_name = "catalog.fetch.stale_discarded",
                ticket = ticket.0,
                "discarding stale catalog response"
            );
            return false;
        }
        self.applied = Some(ticket);

        self.state = match result {
            Ok(document) => {
                let snapshot = CatalogSnapshot::from_document(document);
                info!(
                    event_name = "catalog.fetch.applied",
                    ticket = ticket.0,
                    models = snapshot.models().len(),
                    skipped = snapshot.issues().len(),
                    "catalog snapshot applied"
                );
                CatalogState::Ready(snapshot)
            }
            Err(error) => {
                warn!(
                    event_name = "catalog.fetch.failed",
                    ticket = ticket.0,
                    error = %error,
                    "catalog fetch failed"
                );
                CatalogState::Unavailable { reason: error.to_string() }
            }
        };
        true
    }

    /// Fetches from `source` and applies the result under a fresh ticket.
    pub async fn refresh(&mut self, source: &dyn CatalogSource) -> bool {
        let ticket = self.begin_fetch();
        let result = source.fetch_catalog().await;
        self.complete_fetch(ticket, result)
    }

    pub fn state(&self) -> &CatalogState {
        &self.state
    }

    /// The current catalog, empty unless the last applied fetch succeeded.
    pub fn snapshot(&self) -> &CatalogSnapshot {
        match &self.state {
            CatalogState::Ready(snapshot) => snapshot,
            CatalogState::Empty | CatalogState::Unavailable { .. } => &self.empty,
        }
    }

    pub fn unavailable_reason(&self) -> Option<&str> {
        match &self.state {
            CatalogState::Unavailable { reason } => Some(reason),
            _ => None,
        }
    }
}

/// Fixed catalog document, useful for tests and offline sessions.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalogSource {
    document: CatalogDocument,
}

impl StaticCatalogSource {
    pub fn new(document: CatalogDocument) -> Self {
        Self { document }
    }
}

#[async_trait]
impl CatalogSource for StaticCatalogSource {
    async fn fetch_catalog(&self) -> Result<CatalogDocument, CatalogError> {
        Ok(self.document.clone())
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::{CatalogError, CatalogSession, CatalogSource, CatalogState, StaticCatalogSource};
    use crate::domain::club::CatalogDocument;
    use crate::test_support::{club, variant};

    struct DownSource;

    #[async_trait]
    impl CatalogSource for DownSource {
        async fn fetch_catalog(&self) -> Result<CatalogDocument, CatalogError> {
            Err(CatalogError::Unavailable("connection refused".to_string()))
        }
    }

    fn document(model: &str) -> CatalogDocument {
        let driver = variant(1, Some("9°"), 400);
        CatalogDocument { clubs: vec![club("Driver", None, None, "Ping", model, vec![driver])] }
    }

    #[test]
    fn stale_response_does_not_overwrite_newer_one() {
        let mut session = CatalogSession::new();
        let slow = session.begin_fetch();
        let fast = session.begin_fetch();

        assert!(session.complete_fetch(fast, Ok(document("G430"))));
        assert!(!session.complete_fetch(slow, Ok(document("G425"))));

        assert_eq!(session.snapshot().models()[0].model, "G430");
    }

    #[test]
    fn failure_yields_empty_catalog_and_distinct_state() {
        let mut session = CatalogSession::new();
        let ticket = session.begin_fetch();
        session.complete_fetch(ticket, Err(CatalogError::Malformed("clubs missing".to_string())));

        assert!(session.snapshot().is_empty());
        assert!(matches!(session.state(), CatalogState::Unavailable { .. }));
        assert_eq!(session.unavailable_reason(), Some("catalog data malformed: clubs missing"));
    }

    #[tokio::test]
    async fn refresh_recovers_after_failure() {
        let mut session = CatalogSession::new();
        assert!(session.refresh(&DownSource).await);
        assert!(session.unavailable_reason().is_some());

        let source = StaticCatalogSource::new(document("G430"));
        assert!(session.refresh(&source).await);
        assert!(matches!(session.state(), CatalogState::Ready(_)));
        assert_eq!(session.snapshot().models().len(), 1);
    }
}
