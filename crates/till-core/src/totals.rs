//! # Totals Calculator
//!
//! Pure function from cart + discount policy to the figures on screen.
//!
//! ```text
//! subtotal             = Σ quantity × unit_price
//! line_discount_total  = Σ line_discount
//! policy_discount      = policy.amount_for(subtotal)
//! total_discount       = line_discount_total + policy_discount
//! tax                  = 0
//! grand_total          = subtotal − total_discount + tax
//! ```
//!
//! Totals are never stored. Callers recompute after every cart or policy
//! change; the function has no side effects, so that is always safe.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::cart::Cart;
use crate::discount::DiscountPolicy;
use crate::money::Money;

/// Figures shown to the operator and sent with the sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Totals {
    pub line_count: usize,
    pub total_quantity: i64,
    pub subtotal: Money,
    pub line_discount_total: Money,
    pub policy_discount_amount: Money,
    pub total_discount: Money,
    /// Always zero: tax is the backend's concern.
    pub tax: Money,
    /// May be negative if discounts exceed the subtotal.
    pub grand_total: Money,
}

/// Computes the totals for a cart under a discount policy.
pub fn compute_totals(cart: &Cart, policy: &DiscountPolicy) -> Totals {
    let subtotal: Money = cart.lines().iter().map(|l| l.gross()).sum();
    let line_discount_total: Money = cart.lines().iter().map(|l| l.line_discount).sum();
    let policy_discount_amount = policy.amount_for(subtotal);
    let total_discount = line_discount_total + policy_discount_amount;
    let tax = Money::zero();

    Totals {
        line_count: cart.line_count(),
        total_quantity: cart.total_quantity(),
        subtotal,
        line_discount_total,
        policy_discount_amount,
        total_discount,
        tax,
        grand_total: subtotal - total_discount + tax,
    }
}
