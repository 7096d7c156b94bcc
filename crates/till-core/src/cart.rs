//! # Cart
//!
//! The lines an operator has picked for the sale in progress.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  Operator Action          Cart Method            Cart State Change      │
//! │  ───────────────          ───────────            ─────────────────      │
//! │                                                                         │
//! │  Pick / scan item ───────► add_item() ─────────► push or qty += n       │
//! │                                                                         │
//! │  Change quantity ────────► update_quantity() ──► qty = n (0 removes)    │
//! │                                                                         │
//! │  Line discount ──────────► set_line_discount() ► discount = d           │
//! │                                                                         │
//! │  Click remove ───────────► remove_item() ──────► line dropped (no-op    │
//! │                                                   if already gone)      │
//! │                                                                         │
//! │  Sale completed ─────────► clear() ────────────► lines.clear()          │
//! │                                                                         │
//! │  NOTE: every rejected call leaves the cart exactly as it was.           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - At most one line per `stock_id`
//! - Every line has `1 <= quantity <= available_quantity`, where
//!   `available_quantity` is the last stock snapshot handed to the cart
//! - At most `max_lines` lines, each at most `max_item_quantity` units

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::StockEntry;
use crate::validation::{validate_price_cents, validate_quantity};
use crate::{MAX_CART_LINES, MAX_ITEM_QUANTITY};

// =============================================================================
// Cart Line
// =============================================================================

/// One stock entry in the cart.
///
/// ## Price Freezing
/// `unit_price`, `sku` and `name` are copied from the stock snapshot when the
/// line is created and never change afterwards, even if a later lookup shows
/// a different price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CartLine {
    pub stock_id: String,
    pub product_id: String,
    pub sku: String,
    pub name: String,

    /// Price at time of adding (frozen).
    pub unit_price: Money,

    pub quantity: i64,

    /// Stock ceiling as last observed for this line.
    pub available_quantity: i64,

    /// Flat discount on this line, never negative.
    pub line_discount: Money,
}

impl CartLine {
    /// Creates a new line from a stock snapshot.
    pub fn from_entry(entry: &StockEntry, quantity: i64) -> Self {
        CartLine {
            stock_id: entry.stock_id.clone(),
            product_id: entry.product_id.clone(),
            sku: entry.sku.clone(),
            name: entry.name.clone(),
            unit_price: entry.unit_price(),
            quantity,
            available_quantity: entry.available_quantity,
            line_discount: Money::zero(),
        }
    }

    /// Quantity × unit price, before any discount.
    #[inline]
    pub fn gross(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }

    /// Gross minus the line discount.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.gross() - self.line_discount
    }
}

// =============================================================================
// Limits
// =============================================================================

/// Size limits applied on top of the stock ceiling.
///
/// ## Business Reason
/// Stops runaway carts and fat-finger quantities (1000 instead of 10) even
/// when the store has the stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLimits {
    pub max_lines: usize,
    pub max_item_quantity: i64,
}

impl Default for CartLimits {
    fn default() -> Self {
        CartLimits {
            max_lines: MAX_CART_LINES,
            max_item_quantity: MAX_ITEM_QUANTITY,
        }
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The cart for one checkout session.
///
/// Lines keep insertion order for display; totals don't depend on it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Cart {
    lines: Vec<CartLine>,

    #[serde(skip)]
    limits: CartLimits,
}

impl Cart {
    /// Creates a new empty cart with the default limits.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(limits: CartLimits) -> Self {
        Cart {
            lines: Vec::new(),
            limits,
        }
    }

    /// Adds `quantity` units of a stock entry, merging into the existing line.
    ///
    /// ## Behavior
    /// - No line yet: creates one at `quantity`
    /// - Line exists: tries `existing + quantity`, keeps its line discount,
    ///   and records the entry's `available_quantity` as the new ceiling
    /// - Rejected: nothing changes, including the line's recorded ceiling
    ///
    /// ## Errors
    /// - `Validation` when `quantity <= 0` or the snapshot price is negative
    /// - `InsufficientStock` when the resulting quantity is above
    ///   `entry.available_quantity`
    /// - `QuantityTooLarge` / `CartTooLarge` for the size limits
    pub fn add_item(&mut self, entry: &StockEntry, quantity: i64) -> CoreResult<&CartLine> {
        let limits = self.limits;
        check_quantity(quantity, limits.max_item_quantity)?;
        validate_price_cents(entry.unit_price_cents)?;

        if let Some(idx) = self.position(&entry.stock_id) {
            let line = &mut self.lines[idx];
            let requested = line
                .quantity
                .checked_add(quantity)
                .ok_or(CoreError::QuantityTooLarge {
                    requested: i64::MAX,
                    max: limits.max_item_quantity,
                })?;
            check_stock(entry, requested)?;
            check_quantity(requested, limits.max_item_quantity)?;

            line.quantity = requested;
            line.available_quantity = entry.available_quantity;
            return Ok(&self.lines[idx]);
        }

        if self.lines.len() >= limits.max_lines {
            return Err(CoreError::CartTooLarge {
                max: limits.max_lines,
            });
        }
        check_stock(entry, quantity)?;

        self.lines.push(CartLine::from_entry(entry, quantity));
        Ok(&self.lines[self.lines.len() - 1])
    }

    /// Removes the line for `stock_id`. Absent lines are not an error.
    ///
    /// ## Returns
    /// The removed line, if there was one.
    pub fn remove_item(&mut self, stock_id: &str) -> Option<CartLine> {
        self.position(stock_id).map(|idx| self.lines.remove(idx))
    }

    /// Sets the quantity of an existing line.
    ///
    /// ## Behavior
    /// - `new_quantity <= 0`: same as [`Cart::remove_item`]
    /// - Above the line's known `available_quantity`: `InsufficientStock`,
    ///   quantity unchanged
    /// - Line absent (positive quantity): `LineNotFound`
    pub fn update_quantity(&mut self, stock_id: &str, new_quantity: i64) -> CoreResult<()> {
        if new_quantity <= 0 {
            self.remove_item(stock_id);
            return Ok(());
        }

        let limits = self.limits;
        let line = self
            .lines
            .iter_mut()
            .find(|l| l.stock_id == stock_id)
            .ok_or_else(|| CoreError::LineNotFound(stock_id.to_string()))?;

        if new_quantity > line.available_quantity {
            return Err(CoreError::InsufficientStock {
                stock_id: line.stock_id.clone(),
                sku: line.sku.clone(),
                available: line.available_quantity,
                requested: new_quantity,
            });
        }
        check_quantity(new_quantity, limits.max_item_quantity)?;

        line.quantity = new_quantity;
        Ok(())
    }

    /// Sets the flat discount on a line. Negative amounts clamp to zero.
    pub fn set_line_discount(&mut self, stock_id: &str, discount: Money) -> CoreResult<()> {
        let line = self
            .lines
            .iter_mut()
            .find(|l| l.stock_id == stock_id)
            .ok_or_else(|| CoreError::LineNotFound(stock_id.to_string()))?;

        line.line_discount = discount.non_negative();
        Ok(())
    }

    /// Clears all lines. Limits are kept.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn line(&self, stock_id: &str) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.stock_id == stock_id)
    }

    pub fn limits(&self) -> CartLimits {
        self.limits
    }

    /// Number of distinct lines.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Total units across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    fn position(&self, stock_id: &str) -> Option<usize> {
        self.lines.iter().position(|l| l.stock_id == stock_id)
    }
}

fn check_stock(entry: &StockEntry, requested: i64) -> CoreResult<()> {
    if entry.can_sell(requested) {
        return Ok(());
    }
    Err(CoreError::InsufficientStock {
        stock_id: entry.stock_id.clone(),
        sku: entry.sku.clone(),
        available: entry.available_quantity,
        requested,
    })
}

/// Quantity rules from `validate_quantity`, with the upper bound reported as
/// `QuantityTooLarge`.
fn check_quantity(requested: i64, max: i64) -> CoreResult<()> {
    validate_quantity(requested, max).map_err(|e| match e {
        ValidationError::OutOfRange { .. } => CoreError::QuantityTooLarge { requested, max },
        other => other.into(),
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn stock(id: &str, price_cents: i64, available: i64) -> StockEntry {
        StockEntry {
            stock_id: id.to_string(),
            product_id: format!("prd-{}", id),
            name: format!("Product {}", id),
            sku: format!("SKU-{}", id),
            barcode: None,
            unit_price_cents: price_cents,
            available_quantity: available,
        }
    }

    #[test]
    fn test_cart_add_item() {
        let mut cart = Cart::new();
        let entry = stock("1", 999, 10);

        cart.add_item(&entry, 2).unwrap();

        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.total_quantity(), 2);
        assert_eq!(cart.lines()[0].line_total().cents(), 1998);
    }

    #[test]
    fn test_cart_add_same_entry_increases_quantity() {
        let mut cart = Cart::new();
        let entry = stock("1", 999, 10);

        cart.add_item(&entry, 2).unwrap();
        cart.add_item(&entry, 3).unwrap();

        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.total_quantity(), 5);
    }

    #[test]
    fn test_add_above_available_is_rejected() {
        let mut cart = Cart::new();
        let entry = stock("1", 100, 3);

        let err = cart.add_item(&entry, 5).unwrap_err();

        assert!(matches!(
            err,
            CoreError::InsufficientStock { available: 3, requested: 5, .. }
        ));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_second_add_over_ceiling_keeps_first_quantity() {
        let mut cart = Cart::new();
        let entry = stock("1", 100, 3);

        cart.add_item(&entry, 2).unwrap();
        let err = cart.add_item(&entry, 2).unwrap_err();

        assert!(matches!(err, CoreError::InsufficientStock { requested: 4, .. }));
        assert_eq!(cart.line("1").unwrap().quantity, 2);
    }

    #[test]
    fn test_add_refreshes_ceiling_and_keeps_discount() {
        let mut cart = Cart::new();
        cart.add_item(&stock("1", 100, 3), 1).unwrap();
        cart.set_line_discount("1", Money::from_cents(50)).unwrap();

        // A fresher snapshot shows more stock
        cart.add_item(&stock("1", 100, 8), 4).unwrap();

        let line = cart.line("1").unwrap();
        assert_eq!(line.quantity, 5);
        assert_eq!(line.available_quantity, 8);
        assert_eq!(line.line_discount.cents(), 50);
        assert_eq!(line.line_total().cents(), 450);
    }

    #[test]
    fn test_add_non_positive_quantity_is_validation_error() {
        let mut cart = Cart::new();
        let entry = stock("1", 100, 3);

        assert!(matches!(cart.add_item(&entry, 0), Err(CoreError::Validation(_))));
        assert!(matches!(cart.add_item(&entry, -2), Err(CoreError::Validation(_))));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_update_quantity() {
        let mut cart = Cart::new();
        cart.add_item(&stock("1", 100, 5), 1).unwrap();

        cart.update_quantity("1", 4).unwrap();
        assert_eq!(cart.line("1").unwrap().quantity, 4);

        let err = cart.update_quantity("1", 6).unwrap_err();
        assert!(matches!(err, CoreError::InsufficientStock { available: 5, .. }));
        assert_eq!(cart.line("1").unwrap().quantity, 4);
    }

    #[test]
    fn test_update_to_zero_removes_then_remove_is_noop() {
        let mut cart = Cart::new();
        cart.add_item(&stock("1", 100, 5), 2).unwrap();

        cart.update_quantity("1", 0).unwrap();
        assert!(cart.line("1").is_none());

        assert!(cart.remove_item("1").is_none());
        assert!(cart.is_empty());
    }

    #[test]
    fn test_update_missing_line() {
        let mut cart = Cart::new();
        assert_eq!(
            cart.update_quantity("ghost", 2),
            Err(CoreError::LineNotFound("ghost".to_string()))
        );
        // Non-positive on a missing line is just a removal
        assert!(cart.update_quantity("ghost", 0).is_ok());
    }

    #[test]
    fn test_remove_and_readd_is_fresh_line() {
        let mut cart = Cart::new();
        let entry = stock("1", 250, 5);

        cart.add_item(&entry, 3).unwrap();
        cart.set_line_discount("1", Money::from_cents(100)).unwrap();
        cart.remove_item("1");
        cart.add_item(&entry, 1).unwrap();

        assert_eq!(cart.line("1").unwrap(), &CartLine::from_entry(&entry, 1));
        assert!(cart.line("1").unwrap().line_discount.is_zero());
    }

    #[test]
    fn test_line_discount_clamps_negative() {
        let mut cart = Cart::new();
        cart.add_item(&stock("1", 100, 5), 1).unwrap();

        cart.set_line_discount("1", Money::from_cents(-20)).unwrap();
        assert!(cart.line("1").unwrap().line_discount.is_zero());

        assert!(cart.set_line_discount("2", Money::from_cents(5)).is_err());
    }

    #[test]
    fn test_cart_limits() {
        let mut cart = Cart::with_limits(CartLimits {
            max_lines: 2,
            max_item_quantity: 10,
        });
        cart.add_item(&stock("1", 100, 50), 1).unwrap();
        cart.add_item(&stock("2", 100, 50), 1).unwrap();

        assert_eq!(
            cart.add_item(&stock("3", 100, 50), 1).unwrap_err(),
            CoreError::CartTooLarge { max: 2 }
        );
        assert_eq!(
            cart.update_quantity("1", 11).unwrap_err(),
            CoreError::QuantityTooLarge { requested: 11, max: 10 }
        );
        assert_eq!(cart.line_count(), 2);
    }

    #[test]
    fn test_huge_add_on_existing_line_is_rejected() {
        let mut cart = Cart::new();
        let entry = stock("1", 100, 5);
        cart.add_item(&entry, 1).unwrap();

        assert!(matches!(
            cart.add_item(&entry, i64::MAX),
            Err(CoreError::QuantityTooLarge { .. })
        ));
        assert_eq!(cart.line("1").unwrap().quantity, 1);
    }

    #[test]
    fn test_merge_overflow_is_rejected_without_a_quantity_cap() {
        let mut cart = Cart::with_limits(CartLimits {
            max_lines: 10,
            max_item_quantity: i64::MAX,
        });
        let entry = stock("1", 1, i64::MAX);
        cart.add_item(&entry, 2).unwrap();

        let err = cart.add_item(&entry, i64::MAX).unwrap_err();

        assert_eq!(
            err,
            CoreError::QuantityTooLarge { requested: i64::MAX, max: i64::MAX }
        );
        assert_eq!(cart.line("1").unwrap().quantity, 2);
    }

    #[test]
    fn test_negative_price_snapshot_is_rejected() {
        let mut cart = Cart::new();

        let err = cart.add_item(&stock("1", -500, 5), 1).unwrap_err();

        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::OutOfRange { ref field, .. }) if field == "price"
        ));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_add_above_quantity_cap_is_rejected_before_stock() {
        let mut cart = Cart::with_limits(CartLimits {
            max_lines: 10,
            max_item_quantity: 10,
        });

        assert_eq!(
            cart.add_item(&stock("1", 100, 50), 11).unwrap_err(),
            CoreError::QuantityTooLarge { requested: 11, max: 10 }
        );
        assert!(cart.is_empty());
    }

    #[test]
    fn test_rejected_add_keeps_recorded_ceiling() {
        let mut cart = Cart::new();
        cart.add_item(&stock("1", 100, 5), 3).unwrap();

        // A shrunken snapshot that can't cover the merged quantity
        assert!(cart.add_item(&stock("1", 100, 2), 1).is_err());

        let line = cart.line("1").unwrap();
        assert_eq!(line.quantity, 3);
        assert_eq!(line.available_quantity, 5);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Add { id: usize, available: i64, quantity: i64 },
        Update { id: usize, quantity: i64 },
        Remove { id: usize },
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0usize..2, 0i64..12, -2i64..14)
                .prop_map(|(id, available, quantity)| Op::Add { id, available, quantity }),
            (0usize..2, -2i64..14).prop_map(|(id, quantity)| Op::Update { id, quantity }),
            (0usize..2).prop_map(|id| Op::Remove { id }),
        ]
    }

    proptest! {
        /// Every line stays within 1..=the availability of the last snapshot
        /// the cart accepted for it, and within the quantity cap.
        #[test]
        fn test_quantity_stays_within_accepted_ceiling(ops in prop::collection::vec(op(), 1..40)) {
            let limits = CartLimits { max_lines: 10, max_item_quantity: 8 };
            let mut cart = Cart::with_limits(limits);
            // (quantity, ceiling) per id, following the same rules by hand
            let mut model: [Option<(i64, i64)>; 2] = [None, None];

            for op in ops {
                match op {
                    Op::Add { id, available, quantity } => {
                        let accepted = cart.add_item(&stock(&id.to_string(), 100, available), quantity).is_ok();
                        let merged = model[id].map_or(0, |(q, _)| q) + quantity;
                        let expected = quantity > 0 && merged <= available && merged <= limits.max_item_quantity;
                        prop_assert_eq!(accepted, expected);
                        if accepted {
                            model[id] = Some((merged, available));
                        }
                    }
                    Op::Update { id, quantity } => {
                        let result = cart.update_quantity(&id.to_string(), quantity);
                        let current = model[id];
                        match current {
                            _ if quantity <= 0 => {
                                prop_assert!(result.is_ok());
                                model[id] = None;
                            }
                            None => prop_assert!(result.is_err()),
                            Some((_, ceiling)) => {
                                let expected = quantity <= ceiling && quantity <= limits.max_item_quantity;
                                prop_assert_eq!(result.is_ok(), expected);
                                if expected {
                                    model[id] = Some((quantity, ceiling));
                                }
                            }
                        }
                    }
                    Op::Remove { id } => {
                        cart.remove_item(&id.to_string());
                        model[id] = None;
                    }
                }

                for (id, slot) in model.iter().enumerate() {
                    let line = cart.line(&id.to_string());
                    match slot {
                        Some((quantity, ceiling)) => {
                            let line = line.expect("line tracked by the model");
                            prop_assert_eq!(line.quantity, *quantity);
                            prop_assert_eq!(line.available_quantity, *ceiling);
                            prop_assert!(line.quantity >= 1);
                            prop_assert!(line.quantity <= *ceiling);
                            prop_assert!(line.quantity <= limits.max_item_quantity);
                        }
                        None => prop_assert!(line.is_none()),
                    }
                }
            }
        }
    }
}
