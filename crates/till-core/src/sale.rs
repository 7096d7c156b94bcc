//! # Sale Snapshot & Receipt
//!
//! What leaves the terminal at checkout, and what comes back.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Cart + Totals + PaymentDetails                                         │
//! │         │                                                               │
//! │         ▼  SaleRequest::snapshot()  (synchronous, deep copy)            │
//! │  ┌──────────────┐                                                       │
//! │  │ SaleRequest  │ ──── create_sale ────► commerce backend               │
//! │  └──────────────┘                              │                        │
//! │                                                ▼                        │
//! │                                         ┌────────────┐                  │
//! │                                         │    Sale    │ (persisted)      │
//! │                                         └─────┬──────┘                  │
//! │                                               ▼                         │
//! │                              Receipt::new(request, sale, ctx)           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! The request owns copies of everything it needs. Editing the cart after
//! the snapshot is taken cannot change a request already in flight.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::cart::Cart;
use crate::error::CoreResult;
use crate::money::Money;
use crate::totals::Totals;
use crate::types::{PaymentMethod, SessionContext};
use crate::validation::validate_payment_amount;

// =============================================================================
// Payment
// =============================================================================

/// Payment choice made in the tender modal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentDetails {
    pub method: PaymentMethod,
    pub reference: Option<String>,
}

/// The single payment record attached to a sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Payment {
    pub method: PaymentMethod,
    /// Always the grand total: one payment settles the sale.
    pub amount_paid_cents: i64,
    /// External reference (card auth code, UPI txn id, ...).
    pub reference: Option<String>,
}

impl Payment {
    #[inline]
    pub fn amount_paid(&self) -> Money {
        Money::from_cents(self.amount_paid_cents)
    }
}

// =============================================================================
// Sale Request
// =============================================================================

/// One line of the outbound sale.
/// Uses snapshot pattern to freeze cart data at time of submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SaleRequestLine {
    pub product_id: String,
    pub stock_id: String,
    /// SKU at time of sale (frozen).
    pub sku: String,
    /// Name at time of sale (frozen).
    pub name: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
    pub line_discount_cents: i64,
    /// unit_price × quantity − line_discount.
    pub line_total_cents: i64,
}

/// Everything the backend needs to persist a sale.
///
/// Built once per submission attempt and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SaleRequest {
    /// Fresh UUID v4 per attempt; lets the backend spot duplicate submits.
    pub request_id: String,
    pub store_id: String,
    pub operator_id: String,
    pub lines: Vec<SaleRequestLine>,
    pub subtotal_cents: i64,
    pub total_discount_cents: i64,
    pub tax_cents: i64,
    pub grand_total_cents: i64,
    pub payment_method: PaymentMethod,
    pub payment: Payment,
}

impl SaleRequest {
    /// Takes the immutable snapshot of cart + totals + payment.
    ///
    /// ## Errors
    /// `Validation` when the grand total is negative: a payment cannot record
    /// a negative amount.
    pub fn snapshot(
        ctx: &SessionContext,
        cart: &Cart,
        totals: &Totals,
        payment: &PaymentDetails,
    ) -> CoreResult<Self> {
        validate_payment_amount(totals.grand_total.cents())?;

        let lines = cart
            .lines()
            .iter()
            .map(|l| SaleRequestLine {
                product_id: l.product_id.clone(),
                stock_id: l.stock_id.clone(),
                sku: l.sku.clone(),
                name: l.name.clone(),
                quantity: l.quantity,
                unit_price_cents: l.unit_price.cents(),
                line_discount_cents: l.line_discount.cents(),
                line_total_cents: l.line_total().cents(),
            })
            .collect();

        Ok(SaleRequest {
            request_id: Uuid::new_v4().to_string(),
            store_id: ctx.store_id().to_string(),
            operator_id: ctx.operator_id().to_string(),
            lines,
            subtotal_cents: totals.subtotal.cents(),
            total_discount_cents: totals.total_discount.cents(),
            tax_cents: totals.tax.cents(),
            grand_total_cents: totals.grand_total.cents(),
            payment_method: payment.method,
            payment: Payment {
                method: payment.method,
                amount_paid_cents: totals.grand_total.cents(),
                reference: payment.reference.clone(),
            },
        })
    }

    /// Total units across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }
}

// =============================================================================
// Sale (backend response)
// =============================================================================

/// A sale as persisted by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Sale {
    pub id: String,
    pub receipt_number: String,
    pub store_id: String,
    pub operator_id: String,
    pub subtotal_cents: i64,
    pub discount_cents: i64,
    pub tax_cents: i64,
    pub total_cents: i64,
    pub payment_method: PaymentMethod,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Receipt
// =============================================================================

/// Receipt view populated after a successful sale.
///
/// Plain data; the web client decides how to lay it out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub sale_id: String,
    pub receipt_number: String,
    pub store_name: String,
    pub operator_id: String,
    pub timestamp: DateTime<Utc>,
    pub lines: Vec<ReceiptLine>,
    pub subtotal_cents: i64,
    pub discount_cents: i64,
    pub tax_cents: i64,
    pub total_cents: i64,
    pub payment: Payment,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptLine {
    pub name: String,
    pub sku: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
    pub line_discount_cents: i64,
    pub line_total_cents: i64,
}

impl Receipt {
    /// Totals and identity come from the backend's echo; lines from the
    /// request that was actually sent.
    pub fn new(ctx: &SessionContext, request: &SaleRequest, sale: &Sale) -> Self {
        Receipt {
            sale_id: sale.id.clone(),
            receipt_number: sale.receipt_number.clone(),
            store_name: ctx.store_name.clone(),
            operator_id: sale.operator_id.clone(),
            timestamp: sale.created_at,
            lines: request
                .lines
                .iter()
                .map(|l| ReceiptLine {
                    name: l.name.clone(),
                    sku: l.sku.clone(),
                    quantity: l.quantity,
                    unit_price_cents: l.unit_price_cents,
                    line_discount_cents: l.line_discount_cents,
                    line_total_cents: l.line_total_cents,
                })
                .collect(),
            subtotal_cents: sale.subtotal_cents,
            discount_cents: sale.discount_cents,
            tax_cents: sale.tax_cents,
            total_cents: sale.total_cents,
            payment: Payment {
                method: sale.payment_method,
                ..request.payment.clone()
            },
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
