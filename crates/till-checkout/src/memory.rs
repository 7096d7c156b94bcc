//! # In-Memory Commerce Backend
//!
//! A `CommerceBackend` that keeps stock and sales in process memory. Used by
//! the tests and the `demo-sale` binary.
//!
//! ## Behavior
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  search_stock          substring match on name or SKU (case-insensitive)│
//! │  lookup_stock_by_code  exact barcode, or SKU ignoring case              │
//! │  create_sale           1. injected failure?        → return it          │
//! │                        2. request_id seen before?  → same Sale again    │
//! │                        3. every line still in stock? else Rejected      │
//! │                        4. decrement stock, store Sale                   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Step 3 is the authority on stale snapshots: the cart never re-checks
//! stock between add and submit.

use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use uuid::Uuid;

use till_core::{Sale, SaleRequest, StockEntry};

use crate::backend::CommerceBackend;
use crate::error::BackendError;

/// Demo stock: (SKU, name, barcode, price in cents, on hand).
const SEED_STOCK: &[(&str, &str, Option<&str>, i64, i64)] = &[
    ("BEV-COKE-330", "Coca-Cola 330ml", Some("5449000000996"), 199, 48),
    ("BEV-SPRITE-330", "Sprite 330ml", Some("5449000014535"), 199, 24),
    ("BEV-WATER-1L", "Mineral Water 1L", Some("8901058000017"), 99, 60),
    ("SNK-LAYS-52", "Lays Classic 52g", Some("8901491101837"), 149, 30),
    ("SNK-KITKAT-4F", "Kit Kat 4 Finger", Some("8901058851229"), 125, 36),
    ("DRY-MILK-1L", "Whole Milk 1L", None, 289, 12),
    ("DRY-YOGURT-400", "Greek Yogurt 400g", None, 449, 8),
    ("GRO-RICE-5KG", "Basmati Rice 5kg", Some("8906001200113"), 1_899, 5),
    ("GRO-PASTA-500", "Penne Pasta 500g", None, 239, 20),
    ("HOM-BATT-AA4", "AA Batteries 4-Pack", Some("0041333424019"), 699, 0),
];

#[derive(Default)]
struct Inner {
    /// store_id → stock at that store.
    stock: HashMap<String, Vec<StockEntry>>,
    sales: Vec<Sale>,
    /// request_id → sale it produced.
    processed: HashMap<String, Sale>,
    sale_failures: VecDeque<BackendError>,
    lookup_failures: VecDeque<BackendError>,
    receipt_seq: u32,
}

/// Process-local stand-in for the commerce backend.
#[derive(Default)]
pub struct InMemoryBackend {
    inner: RwLock<Inner>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend holding `entries` at `store_id`.
    pub fn with_stock(store_id: &str, entries: Vec<StockEntry>) -> Self {
        let mut inner = Inner::default();
        inner.stock.insert(store_id.to_string(), entries);
        InMemoryBackend {
            inner: RwLock::new(inner),
        }
    }

    /// Backend holding the demo catalog at `store_id`.
    pub fn seeded(store_id: &str) -> Self {
        Self::with_stock(store_id, seed_entries())
    }

    /// Makes the next `create_sale` call fail with `err`.
    pub async fn fail_next_sale(&self, err: BackendError) {
        self.inner.write().await.sale_failures.push_back(err);
    }

    /// Makes the next search or code lookup fail with `err`.
    pub async fn fail_next_lookup(&self, err: BackendError) {
        self.inner.write().await.lookup_failures.push_back(err);
    }

    /// Overwrites the on-hand quantity, as if another terminal had sold.
    pub async fn set_available(&self, store_id: &str, stock_id: &str, quantity: i64) -> bool {
        let mut inner = self.inner.write().await;
        match find_mut(&mut inner.stock, store_id, stock_id) {
            Some(entry) => {
                entry.available_quantity = quantity;
                true
            }
            None => false,
        }
    }

    pub async fn available(&self, store_id: &str, stock_id: &str) -> Option<i64> {
        let inner = self.inner.read().await;
        inner
            .stock
            .get(store_id)?
            .iter()
            .find(|e| e.stock_id == stock_id)
            .map(|e| e.available_quantity)
    }

    /// Sales persisted so far, oldest first.
    pub async fn sales(&self) -> Vec<Sale> {
        self.inner.read().await.sales.clone()
    }
}

#[async_trait]
impl CommerceBackend for InMemoryBackend {
    async fn search_stock(
        &self,
        store_id: &str,
        term: Option<&str>,
    ) -> Result<Vec<StockEntry>, BackendError> {
        let mut inner = self.inner.write().await;
        if let Some(err) = inner.lookup_failures.pop_front() {
            warn!(store_id, error = %err, "Injected search failure");
            return Err(err);
        }

        let needle = term.map(str::to_lowercase).unwrap_or_default();
        let results: Vec<StockEntry> = inner
            .stock
            .get(store_id)
            .map(|entries| {
                entries
                    .iter()
                    .filter(|e| {
                        needle.is_empty()
                            || e.name.to_lowercase().contains(&needle)
                            || e.sku.to_lowercase().contains(&needle)
                    })
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        debug!(store_id, term = ?term, count = results.len(), "search_stock");
        Ok(results)
    }

    async fn lookup_stock_by_code(
        &self,
        store_id: &str,
        code: &str,
    ) -> Result<Option<StockEntry>, BackendError> {
        let mut inner = self.inner.write().await;
        if let Some(err) = inner.lookup_failures.pop_front() {
            warn!(store_id, code, error = %err, "Injected lookup failure");
            return Err(err);
        }

        let found = inner
            .stock
            .get(store_id)
            .and_then(|entries| entries.iter().find(|e| e.matches_code(code)))
            .cloned();

        debug!(store_id, code, found = found.is_some(), "lookup_stock_by_code");
        Ok(found)
    }

    async fn create_sale(&self, request: &SaleRequest) -> Result<Sale, BackendError> {
        let mut inner = self.inner.write().await;

        if let Some(err) = inner.sale_failures.pop_front() {
            warn!(request_id = %request.request_id, error = %err, "Injected sale failure");
            return Err(err);
        }

        if let Some(sale) = inner.processed.get(&request.request_id) {
            debug!(request_id = %request.request_id, sale_id = %sale.id, "Duplicate request, returning original sale");
            return Ok(sale.clone());
        }

        check_request(request)?;

        // Check every line before touching stock so a rejection changes nothing.
        for line in &request.lines {
            let entry = inner
                .stock
                .get(&request.store_id)
                .and_then(|entries| entries.iter().find(|e| e.stock_id == line.stock_id))
                .ok_or_else(|| BackendError::Rejected {
                    message: format!("Unknown stock {} at store {}", line.stock_id, request.store_id),
                })?;

            if line.quantity > entry.available_quantity {
                return Err(BackendError::Rejected {
                    message: format!(
                        "Insufficient stock for {}: available {}, requested {}",
                        entry.sku, entry.available_quantity, line.quantity
                    ),
                });
            }
        }

        for line in &request.lines {
            if let Some(entry) = find_mut(&mut inner.stock, &request.store_id, &line.stock_id) {
                entry.available_quantity -= line.quantity;
            }
        }

        inner.receipt_seq = (inner.receipt_seq + 1) % 10_000;
        let now = Utc::now();
        let sale = Sale {
            id: Uuid::new_v4().to_string(),
            receipt_number: format!("{}-{:04}", now.format("%y%m%d-%H%M%S"), inner.receipt_seq),
            store_id: request.store_id.clone(),
            operator_id: request.operator_id.clone(),
            subtotal_cents: request.subtotal_cents,
            discount_cents: request.total_discount_cents,
            tax_cents: request.tax_cents,
            total_cents: request.grand_total_cents,
            payment_method: request.payment_method,
            created_at: now,
        };

        inner.processed.insert(request.request_id.clone(), sale.clone());
        inner.sales.push(sale.clone());

        info!(
            sale_id = %sale.id,
            receipt = %sale.receipt_number,
            total = sale.total_cents,
            lines = request.lines.len(),
            "Sale persisted"
        );
        Ok(sale)
    }
}

/// Server-side arithmetic check on the submitted figures.
fn check_request(request: &SaleRequest) -> Result<(), BackendError> {
    if request.lines.is_empty() {
        return Err(BackendError::Rejected {
            message: "Sale has no lines".to_string(),
        });
    }

    let subtotal: i64 = request
        .lines
        .iter()
        .map(|l| l.unit_price_cents * l.quantity)
        .sum();
    let expected_total = request.subtotal_cents - request.total_discount_cents + request.tax_cents;

    if subtotal != request.subtotal_cents || expected_total != request.grand_total_cents {
        return Err(BackendError::Rejected {
            message: "Sale totals do not add up".to_string(),
        });
    }

    if request.payment.amount_paid_cents != request.grand_total_cents {
        return Err(BackendError::Rejected {
            message: "Payment does not cover the sale".to_string(),
        });
    }

    Ok(())
}

fn find_mut<'a>(
    stock: &'a mut HashMap<String, Vec<StockEntry>>,
    store_id: &str,
    stock_id: &str,
) -> Option<&'a mut StockEntry> {
    stock
        .get_mut(store_id)?
        .iter_mut()
        .find(|e| e.stock_id == stock_id)
}

fn seed_entries() -> Vec<StockEntry> {
    SEED_STOCK
        .iter()
        .enumerate()
        .map(|(idx, (sku, name, barcode, price, on_hand))| StockEntry {
            stock_id: format!("stk-{:03}", idx + 1),
            product_id: format!("prd-{:03}", idx + 1),
            name: name.to_string(),
            sku: sku.to_string(),
            barcode: barcode.map(str::to_string),
            unit_price_cents: *price,
            available_quantity: *on_hand,
        })
        .collect()
}
