//! # Discount Policy
//!
//! The single store-wide discount the operator can put on the whole sale,
//! on top of any per-line discounts.
//!
//! ```text
//!   kind = Amount       value = cents          amount_for(s) = value
//!   kind = Percentage   value = basis points   amount_for(s) = s × value / 10000
//! ```
//!
//! Input is clamped on the way in: negative values become 0, percentages
//! above 100% become 100%.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::{Money, BPS_PER_WHOLE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum DiscountKind {
    /// Flat amount off the sale.
    #[default]
    Amount,
    /// Percentage of the subtotal.
    Percentage,
}

/// Store-wide discount. Reset whenever the cart is cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DiscountPolicy {
    kind: DiscountKind,

    /// Cents for `Amount`, basis points for `Percentage`.
    value: i64,
}

impl DiscountPolicy {
    /// No discount.
    pub fn none() -> Self {
        Self::default()
    }

    /// Flat discount.
    pub fn amount(amount: Money) -> Self {
        let mut policy = Self::default();
        policy.set_value(amount.cents());
        policy
    }

    /// Percentage discount in basis points (1000 = 10%).
    pub fn percentage_bps(bps: i64) -> Self {
        let mut policy = DiscountPolicy {
            kind: DiscountKind::Percentage,
            value: 0,
        };
        policy.set_value(bps);
        policy
    }

    /// Percentage discount in whole percent (10 = 10%).
    pub fn percent(whole: i64) -> Self {
        Self::percentage_bps(whole.saturating_mul(100))
    }

    /// Switches the kind, re-clamping the current value for the new kind.
    pub fn set_kind(&mut self, kind: DiscountKind) {
        self.kind = kind;
        self.value = clamp(kind, self.value);
    }

    /// Sets the value in the kind's unit (cents or basis points).
    pub fn set_value(&mut self, value: i64) {
        self.value = clamp(self.kind, value);
    }

    pub fn kind(&self) -> DiscountKind {
        self.kind
    }

    pub fn value(&self) -> i64 {
        self.value
    }

    pub fn is_none(&self) -> bool {
        self.value == 0
    }

    /// Back to no discount.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// The discount this policy takes off a given subtotal.
    ///
    /// A flat amount is returned as-is even when it is larger than the
    /// subtotal; the totals report the resulting negative grand total.
    pub fn amount_for(&self, subtotal: Money) -> Money {
        match self.kind {
            DiscountKind::Amount => Money::from_cents(self.value),
            // clamp() keeps the value inside 0..=10000
            DiscountKind::Percentage => subtotal.percentage_of(self.value as u32),
        }
    }
}

fn clamp(kind: DiscountKind, value: i64) -> i64 {
    match kind {
        DiscountKind::Amount => value.max(0),
        DiscountKind::Percentage => value.clamp(0, BPS_PER_WHOLE as i64),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_no_discount() {
        let policy = DiscountPolicy::default();
        assert_eq!(policy.kind(), DiscountKind::Amount);
        assert!(policy.is_none());
        assert!(policy.amount_for(Money::from_cents(5000)).is_zero());
    }

    #[test]
    fn test_amount_for() {
        let flat = DiscountPolicy::amount(Money::from_cents(250));
        assert_eq!(flat.amount_for(Money::from_cents(10_000)).cents(), 250);

        let ten_percent = DiscountPolicy::percent(10);
        assert_eq!(ten_percent.amount_for(Money::from_cents(30_000)).cents(), 3_000);

        let twelve_and_half = DiscountPolicy::percentage_bps(1_250);
        assert_eq!(twelve_and_half.amount_for(Money::from_cents(800)).cents(), 100);
    }

    #[test]
    fn test_values_are_clamped() {
        let mut policy = DiscountPolicy::percent(150);
        assert_eq!(policy.value(), 10_000);
        assert_eq!(policy.amount_for(Money::from_cents(4_000)).cents(), 4_000);

        policy.set_value(-5);
        assert_eq!(policy.value(), 0);

        let negative_flat = DiscountPolicy::amount(Money::from_cents(-300));
        assert!(negative_flat.is_none());
    }

    #[test]
    fn test_switching_kind_reclamps() {
        let mut policy = DiscountPolicy::amount(Money::from_cents(50_000));
        policy.set_kind(DiscountKind::Percentage);
        assert_eq!(policy.value(), 10_000);

        policy.set_kind(DiscountKind::Amount);
        assert_eq!(policy.value(), 10_000);
    }

    #[test]
    fn test_reset() {
        let mut policy = DiscountPolicy::percent(20);
        policy.reset();
        assert_eq!(policy, DiscountPolicy::none());
    }
}
