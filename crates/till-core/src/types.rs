//! # Domain Types
//!
//! Types shared by the cart, the checkout workflow and the backend port.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌──────────────────────┐   ┌─────────────────┐   │
//! │  │   StockEntry    │   │ AuthenticatedOperator│   │ PaymentMethod   │   │
//! │  │  ─────────────  │   │  ──────────────────  │   │  ─────────────  │   │
//! │  │  stock_id       │   │  operator_id         │   │  Cash           │   │
//! │  │  product_id     │   │  store_id            │   │  Upi            │   │
//! │  │  sku / barcode  │   │  role                │   │  CreditCard     │   │
//! │  │  unit_price     │   └──────────┬───────────┘   │  DebitCard      │   │
//! │  │  available_qty  │              │               │  Wallet         │   │
//! │  └─────────────────┘              ▼               └─────────────────┘   │
//! │                           ┌─────────────────┐                           │
//! │                           │ SessionContext  │                           │
//! │                           │  operator       │                           │
//! │                           │  store_name     │                           │
//! │                           └─────────────────┘                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Semantics
//! A `StockEntry` is whatever the backend said at lookup time. Nothing in the
//! engine refreshes it before checkout; the backend is the final authority on
//! whether a line is still sellable.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Stock Entry
// =============================================================================

/// A sellable item at one store, as last reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StockEntry {
    /// Unique per store + product + batch.
    pub stock_id: String,

    pub product_id: String,

    /// Display name shown to the operator and on the receipt.
    pub name: String,

    /// Stock Keeping Unit - business identifier.
    pub sku: String,

    /// Barcode (EAN-13, UPC-A, etc.), if the item has one.
    pub barcode: Option<String>,

    /// Price in cents (smallest currency unit).
    pub unit_price_cents: i64,

    /// Units on hand when the snapshot was taken.
    pub available_quantity: i64,
}

impl StockEntry {
    /// Returns the price as a Money type.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Checks the snapshot has at least `quantity` units.
    #[inline]
    pub fn can_sell(&self, quantity: i64) -> bool {
        quantity <= self.available_quantity
    }

    /// Matches on the scanned code: barcode first, then SKU.
    pub fn matches_code(&self, code: &str) -> bool {
        self.barcode.as_deref() == Some(code) || self.sku.eq_ignore_ascii_case(code)
    }
}

// =============================================================================
// Operator & Session
// =============================================================================

/// Dashboard role of the signed-in operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Manager,
    Staff,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::Manager => write!(f, "manager"),
            Role::Staff => write!(f, "staff"),
        }
    }
}

/// Identity of the operator running the terminal.
///
/// Produced once by the authentication shell from the verified token. The
/// engine never sees or parses the raw credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AuthenticatedOperator {
    pub operator_id: String,
    pub store_id: String,
    pub role: Role,
}

/// Everything a checkout session needs to know about who is selling where.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionContext {
    pub operator: AuthenticatedOperator,

    /// Printed at the top of the receipt view.
    pub store_name: String,
}

impl SessionContext {
    pub fn new(operator: AuthenticatedOperator, store_name: impl Into<String>) -> Self {
        SessionContext {
            operator,
            store_name: store_name.into(),
        }
    }

    #[inline]
    pub fn store_id(&self) -> &str {
        &self.operator.store_id
    }

    #[inline]
    pub fn operator_id(&self) -> &str {
        &self.operator.operator_id
    }
}

// =============================================================================
// Payment Method
// =============================================================================

/// How the customer pays. One method per sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Physical cash payment.
    Cash,
    /// UPI transfer; reference is the transaction id.
    Upi,
    /// Card on an external terminal; reference is the auth code.
    CreditCard,
    DebitCard,
    /// Mobile wallet; reference is the wallet transaction id.
    Wallet,
}

impl PaymentMethod {
    /// All methods in the order the tender screen lists them.
    pub const ALL: [PaymentMethod; 5] = [
        PaymentMethod::Cash,
        PaymentMethod::Upi,
        PaymentMethod::CreditCard,
        PaymentMethod::DebitCard,
        PaymentMethod::Wallet,
    ];

    /// Every method except cash leaves an external trail the operator must
    /// copy into the sale.
    #[inline]
    pub const fn requires_reference(&self) -> bool {
        !matches!(self, PaymentMethod::Cash)
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentMethod::Cash => write!(f, "cash"),
            PaymentMethod::Upi => write!(f, "upi"),
            PaymentMethod::CreditCard => write!(f, "credit_card"),
            PaymentMethod::DebitCard => write!(f, "debit_card"),
            PaymentMethod::Wallet => write!(f, "wallet"),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
