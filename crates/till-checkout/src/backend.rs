//! # Commerce Backend Port
//!
//! The three remote calls the engine makes. Everything else is local.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Call                    When                        Suspends session?  │
//! │  ────                    ────                        ─────────────────  │
//! │  search_stock            operator types in search    yes (catalog only) │
//! │  lookup_stock_by_code    barcode scanned             yes (catalog only) │
//! │  create_sale             operator submits            yes (Submitting)   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each call is fire-and-await. There is no cancellation and no automatic
//! retry; a failed call is reported and the operator decides what to do.

use async_trait::async_trait;
use till_core::{Sale, SaleRequest, StockEntry};

use crate::error::BackendError;

/// Remote system holding stock and persisting sales.
#[async_trait]
pub trait CommerceBackend: Send + Sync {
    /// Lists stock at a store. `None` (or an empty term) lists everything.
    async fn search_stock(
        &self,
        store_id: &str,
        term: Option<&str>,
    ) -> Result<Vec<StockEntry>, BackendError>;

    /// Exact match on barcode or SKU. `Ok(None)` when nothing matches.
    async fn lookup_stock_by_code(
        &self,
        store_id: &str,
        code: &str,
    ) -> Result<Option<StockEntry>, BackendError>;

    /// Persists a sale. The backend re-checks stock and may reject the
    /// request if the snapshot the cart was built from is stale.
    async fn create_sale(&self, request: &SaleRequest) -> Result<Sale, BackendError>;
}
