//! # till-checkout: Checkout Workflow for Till POS
//!
//! Wraps the pure cart logic from `till-core` in a checkout session that
//! talks to the remote commerce backend.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        till-checkout                                    │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐    │
//! │  │                  CheckoutSession (workflow.rs)                  │    │
//! │  │   cart edits ─► begin_checkout ─► select_payment ─► submit      │    │
//! │  └───────────┬───────────────────────────────┬─────────────────────┘    │
//! │              │                               │                          │
//! │  ┌───────────▼───────────┐       ┌───────────▼───────────┐              │
//! │  │  StockCatalog         │       │  till-core            │              │
//! │  │  (catalog.rs)         │       │  Cart, Totals,        │              │
//! │  │  search, scan lookup  │       │  SaleRequest          │              │
//! │  └───────────┬───────────┘       └───────────────────────┘              │
//! │              │                                                          │
//! │  ┌───────────▼─────────────────────────────────────────────────────┐    │
//! │  │          CommerceBackend trait (backend.rs)                     │    │
//! │  │          InMemoryBackend (memory.rs) for tests and demo         │    │
//! │  └─────────────────────────────────────────────────────────────────┘    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//! ```rust,no_run
//! use std::sync::Arc;
//! use till_checkout::{CheckoutConfig, CheckoutSession, InMemoryBackend};
//! use till_core::{AuthenticatedOperator, PaymentMethod, Role, SessionContext};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let operator = AuthenticatedOperator {
//!     operator_id: "op-1".into(),
//!     store_id: "store-1".into(),
//!     role: Role::Staff,
//! };
//! let backend = Arc::new(InMemoryBackend::seeded("store-1"));
//! let config = CheckoutConfig::default();
//! let mut session = CheckoutSession::new(SessionContext::new(operator, "Downtown"), backend, &config);
//!
//! session.scan_and_add("5449000000996", 2).await?;
//! session.begin_checkout()?;
//! session.select_payment(PaymentMethod::Cash, None)?;
//! let receipt = session.submit().await?;
//! println!("{}", receipt.receipt_number);
//! # Ok(())
//! # }
//! ```

pub mod backend;
pub mod catalog;
pub mod config;
pub mod error;
pub mod memory;
pub mod workflow;

pub use backend::CommerceBackend;
pub use catalog::StockCatalog;
pub use config::CheckoutConfig;
pub use error::{BackendError, CheckoutError, CheckoutResult, ConfigError, LookupError};
pub use memory::InMemoryBackend;
pub use workflow::{CheckoutSession, CheckoutState};

use tracing_subscriber::EnvFilter;

/// Initializes the tracing subscriber for binaries.
///
/// ## Log Levels
/// - Default: `info,till=debug`
/// - Override with `RUST_LOG`, e.g. `RUST_LOG=till_checkout=trace`
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,till=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .init();
}
