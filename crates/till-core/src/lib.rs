//! # till-core: Pure Cart & Totals Logic for Till POS
//!
//! Everything the sale screen computes without talking to anyone: the cart,
//! the store-wide discount, the totals and the snapshot that is sent when the
//! operator submits.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Till POS Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Web client (sale screen)                     │   │
//! │  │    Search ──► Cart ──► Tender modal ──► Receipt                 │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    till-checkout (async edge)                   │   │
//! │  │    CheckoutSession, StockCatalog, CommerceBackend port          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ till-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐  ┌──────────┐  ┌──────────┐  ┌──────────┐       │   │
//! │  │   │   cart   │  │ discount │  │  totals  │  │   sale   │       │   │
//! │  │   │   Cart   │  │  Policy  │  │  Totals  │  │ Request  │       │   │
//! │  │   │ CartLine │  │   Kind   │  │ compute  │  │ Receipt  │       │   │
//! │  │   └──────────┘  └──────────┘  └──────────┘  └──────────┘       │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • NO ASYNC                               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Stock entries, operators, payment methods
//! - [`money`] - Money type with integer arithmetic
//! - [`cart`] - Cart and its lines
//! - [`discount`] - Store-wide discount policy
//! - [`totals`] - Totals calculation
//! - [`sale`] - Sale request snapshot, backend sale record, receipt
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//!
//! ## Example Usage
//!
//! ```rust
//! use till_core::{compute_totals, Cart, DiscountPolicy, StockEntry};
//!
//! let rice = StockEntry {
//!     stock_id: "stk-1".into(),
//!     product_id: "prd-1".into(),
//!     name: "Rice 1kg".into(),
//!     sku: "GRO-RICE-1".into(),
//!     barcode: None,
//!     unit_price_cents: 100,
//!     available_quantity: 10,
//! };
//!
//! let mut cart = Cart::new();
//! cart.add_item(&rice, 3).unwrap();
//!
//! let totals = compute_totals(&cart, &DiscountPolicy::percent(10));
//! assert_eq!(totals.subtotal.cents(), 300);
//! assert_eq!(totals.grand_total.cents(), 270);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod discount;
pub mod error;
pub mod money;
pub mod sale;
pub mod totals;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartLimits, CartLine};
pub use discount::{DiscountKind, DiscountPolicy};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use sale::{Payment, PaymentDetails, Receipt, ReceiptLine, Sale, SaleRequest, SaleRequestLine};
pub use totals::{compute_totals, Totals};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum distinct lines in a single cart.
///
/// ## Business Reason
/// Keeps a runaway scan loop from building an unbounded sale.
pub const MAX_CART_LINES: usize = 100;

/// Maximum quantity of a single line.
///
/// ## Business Reason
/// Catches typos such as 1000 instead of 10.
pub const MAX_ITEM_QUANTITY: i64 = 999;
