//! # Stock Catalog View
//!
//! The search results panel next to the cart: the last term the operator
//! searched for at this store, and what the backend returned for it.
//!
//! ## Search Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  term ──► validate_search_query                                         │
//! │              │                                                          │
//! │              ├── looks like a barcode (8-13 digits)?                    │
//! │              │      └── lookup_stock_by_code ── hit ──► [entry]         │
//! │              │                               └─ miss ─┐                 │
//! │              ▼                                        ▼                 │
//! │          search_stock(term) ◄─────────────────────────┘                 │
//! │              │                                                          │
//! │              ▼                                                          │
//! │          truncate to search_limit, replace snapshot                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Entries are snapshots. They are not re-checked before checkout.

use std::sync::Arc;

use tracing::{debug, warn};

use till_core::validation::{is_barcode_query, validate_scan_code, validate_search_query};
use till_core::StockEntry;

use crate::backend::CommerceBackend;
use crate::error::LookupError;

pub struct StockCatalog {
    backend: Arc<dyn CommerceBackend>,
    store_id: String,
    search_limit: usize,
    last_term: Option<String>,
    entries: Vec<StockEntry>,
}

impl StockCatalog {
    pub fn new(backend: Arc<dyn CommerceBackend>, store_id: impl Into<String>, search_limit: usize) -> Self {
        StockCatalog {
            backend,
            store_id: store_id.into(),
            search_limit,
            last_term: None,
            entries: Vec::new(),
        }
    }

    /// Searches stock at this store and replaces the snapshot.
    ///
    /// On failure the previous snapshot is kept.
    pub async fn search(&mut self, term: &str) -> Result<&[StockEntry], LookupError> {
        let term = validate_search_query(term)?;
        debug!(store_id = %self.store_id, term = %term, "Catalog search");

        let mut results = match self.search_by_barcode(&term).await? {
            Some(entry) => vec![entry],
            None => {
                let filter = (!term.is_empty()).then_some(term.as_str());
                self.backend
                    .search_stock(&self.store_id, filter)
                    .await
                    .inspect_err(|e| warn!(term = %term, error = %e, "Catalog search failed"))?
            }
        };
        results.truncate(self.search_limit);

        self.last_term = Some(term);
        self.entries = results;
        Ok(&self.entries)
    }

    /// Exact lookup of a scanned code.
    ///
    /// A hit is merged into the snapshot so that later adds see it.
    pub async fn lookup_code(&mut self, code: &str) -> Result<StockEntry, LookupError> {
        let code = validate_scan_code(code)?;

        let entry = self
            .backend
            .lookup_stock_by_code(&self.store_id, &code)
            .await
            .inspect_err(|e| warn!(code = %code, error = %e, "Code lookup failed"))?
            .ok_or_else(|| LookupError::NotFound { code: code.clone() })?;

        debug!(code = %code, stock_id = %entry.stock_id, "Code lookup hit");
        self.merge(entry.clone());
        Ok(entry)
    }

    /// Re-runs the last search (or lists everything if nothing was searched).
    pub async fn refresh(&mut self) -> Result<&[StockEntry], LookupError> {
        let term = self.last_term.clone().unwrap_or_default();
        self.search(&term).await
    }

    pub fn get(&self, stock_id: &str) -> Option<&StockEntry> {
        self.entries.iter().find(|e| e.stock_id == stock_id)
    }

    pub fn entries(&self) -> &[StockEntry] {
        &self.entries
    }

    pub fn last_term(&self) -> Option<&str> {
        self.last_term.as_deref()
    }

    pub fn store_id(&self) -> &str {
        &self.store_id
    }

    async fn search_by_barcode(&self, term: &str) -> Result<Option<StockEntry>, LookupError> {
        if !is_barcode_query(term) {
            return Ok(None);
        }
        Ok(self.backend.lookup_stock_by_code(&self.store_id, term).await?)
    }

    fn merge(&mut self, entry: StockEntry) {
        match self.entries.iter_mut().find(|e| e.stock_id == entry.stock_id) {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BackendError;
    use crate::memory::InMemoryBackend;

    const STORE: &str = "store-1";

    fn catalog(limit: usize) -> (Arc<InMemoryBackend>, StockCatalog) {
        let backend = Arc::new(InMemoryBackend::seeded(STORE));
        let catalog = StockCatalog::new(backend.clone(), STORE, limit);
        (backend, catalog)
    }

    #[tokio::test]
    async fn test_search_replaces_snapshot() {
        let (_, mut catalog) = catalog(50);

        assert_eq!(catalog.search("330").await.unwrap().len(), 2);
        assert_eq!(catalog.last_term(), Some("330"));

        let rice = catalog.search("  rice ").await.unwrap();
        assert_eq!(rice.len(), 1);
        assert_eq!(catalog.last_term(), Some("rice"));
        assert!(catalog.get("stk-001").is_none());
    }

    #[tokio::test]
    async fn test_search_is_capped() {
        let (_, mut catalog) = catalog(3);
        assert_eq!(catalog.search("").await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_barcode_search_prefers_exact_match() {
        let (_, mut catalog) = catalog(50);

        let hits = catalog.search("5449000000996").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].sku, "BEV-COKE-330");

        // Unknown barcode falls back to text search, which finds nothing.
        assert!(catalog.search("12345678").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_lookup_code() {
        let (_, mut catalog) = catalog(50);

        let entry = catalog.lookup_code("bev-water-1l").await.unwrap();
        assert_eq!(entry.stock_id, "stk-003");
        assert!(catalog.get("stk-003").is_some());

        let err = catalog.lookup_code("NOPE").await.unwrap_err();
        assert_eq!(err, LookupError::NotFound { code: "NOPE".into() });

        assert!(matches!(
            catalog.lookup_code("   ").await,
            Err(LookupError::Invalid(_))
        ));
    }

    #[tokio::test]
    async fn test_failed_search_keeps_previous_snapshot() {
        let (backend, mut catalog) = catalog(50);
        catalog.search("coca").await.unwrap();

        backend
            .fail_next_lookup(BackendError::Network("timeout".into()))
            .await;
        let err = catalog.search("sprite").await.unwrap_err();

        assert!(matches!(err, LookupError::Backend(BackendError::Network(_))));
        assert_eq!(catalog.entries().len(), 1);
        assert_eq!(catalog.last_term(), Some("coca"));
    }

    #[tokio::test]
    async fn test_refresh_sees_new_quantities() {
        let (backend, mut catalog) = catalog(50);
        catalog.search("coca").await.unwrap();
        backend.set_available(STORE, "stk-001", 7).await;

        catalog.refresh().await.unwrap();

        assert_eq!(catalog.get("stk-001").map(|e| e.available_quantity), Some(7));
    }
}
