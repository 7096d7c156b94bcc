//! # Checkout Workflow
//!
//! One operator, one store, one sale at a time.
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │        ┌──────────┐  begin_checkout()   ┌──────────────────────────┐    │
//! │  ┌────►│   Idle   │────(cart non-empty)─►│ AwaitingPaymentDetails  │◄─┐ │
//! │  │     └──────────┘◄──cancel_checkout()──└────────────┬─────────────┘  │ │
//! │  │                                                    │ begin_submit() │ │
//! │  │                                                    ▼ submit()       │ │
//! │  │                                          ┌──────────────────┐       │ │
//! │  │                                          │    Submitting    │       │ │
//! │  │                                          │  cart locked     │       │ │
//! │  │                                          └───┬──────────┬───┘       │ │
//! │  │                                        Ok(Sale)    Err(BackendError)│ │
//! │  │                                              ▼          ▼           │ │
//! │  │                                      ┌───────────┐ ┌──────────┐     │ │
//! │  └──── cart + discount cleared ─────────│ Succeeded │ │  Failed  │─────┘ │
//! │        receipt built, catalog refreshed └───────────┘ └──────────┘       │
//! │                                                        cart untouched,   │
//! │                                                        last_error set    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `Succeeded` and `Failed` are pass-through states: resolution moves the
//! session straight on to `Idle` or `AwaitingPaymentDetails`.
//!
//! ## Cart Lock
//! While `Submitting`, every cart or discount mutation returns
//! `SubmissionInFlight`. In `Idle` and `AwaitingPaymentDetails` the cart is
//! freely editable, so the operator can fix a cart after a rejected sale.

use std::sync::Arc;

use tracing::{debug, info, warn};

use till_core::validation::validate_payment_reference;
use till_core::{
    compute_totals, Cart, CartLine, DiscountKind, DiscountPolicy, Money, PaymentDetails,
    PaymentMethod, Receipt, Sale, SaleRequest, SessionContext, StockEntry, Totals,
    ValidationError,
};

use crate::backend::CommerceBackend;
use crate::catalog::StockCatalog;
use crate::config::CheckoutConfig;
use crate::error::{BackendError, CheckoutError, CheckoutResult, LookupError};

// =============================================================================
// Checkout State
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CheckoutState {
    /// Building the cart.
    #[default]
    Idle,
    /// Tender modal open.
    AwaitingPaymentDetails,
    /// `create_sale` in flight.
    Submitting,
    Succeeded,
    Failed,
}

impl CheckoutState {
    /// Cart and discount may be changed in this state.
    pub fn allows_cart_edits(&self) -> bool {
        !matches!(self, CheckoutState::Submitting)
    }
}

impl std::fmt::Display for CheckoutState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CheckoutState::Idle => write!(f, "idle"),
            CheckoutState::AwaitingPaymentDetails => write!(f, "awaiting payment details"),
            CheckoutState::Submitting => write!(f, "submitting"),
            CheckoutState::Succeeded => write!(f, "succeeded"),
            CheckoutState::Failed => write!(f, "failed"),
        }
    }
}

// =============================================================================
// Checkout Session
// =============================================================================

/// Cart, discount, catalog view and checkout state for one operator.
pub struct CheckoutSession {
    ctx: SessionContext,
    backend: Arc<dyn CommerceBackend>,
    catalog: StockCatalog,
    cart: Cart,
    policy: DiscountPolicy,
    state: CheckoutState,
    payment: Option<PaymentDetails>,
    in_flight: Option<SaleRequest>,
    last_error: Option<BackendError>,
    last_receipt: Option<Receipt>,
    require_payment_reference: bool,
    refresh_catalog_after_sale: bool,
}

impl CheckoutSession {
    pub fn new(ctx: SessionContext, backend: Arc<dyn CommerceBackend>, config: &CheckoutConfig) -> Self {
        let catalog = StockCatalog::new(
            Arc::clone(&backend),
            ctx.store_id(),
            config.catalog.search_limit,
        );

        info!(
            store_id = %ctx.store_id(),
            operator_id = %ctx.operator_id(),
            role = %ctx.operator.role,
            "Checkout session opened"
        );

        CheckoutSession {
            ctx,
            backend,
            catalog,
            cart: Cart::with_limits(config.cart.limits()),
            policy: DiscountPolicy::none(),
            state: CheckoutState::Idle,
            payment: None,
            in_flight: None,
            last_error: None,
            last_receipt: None,
            require_payment_reference: config.checkout.require_payment_reference,
            refresh_catalog_after_sale: config.checkout.refresh_catalog_after_sale,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn context(&self) -> &SessionContext {
        &self.ctx
    }

    pub fn state(&self) -> CheckoutState {
        self.state
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn discount(&self) -> &DiscountPolicy {
        &self.policy
    }

    /// Recomputed on every call.
    pub fn totals(&self) -> Totals {
        compute_totals(&self.cart, &self.policy)
    }

    pub fn catalog(&self) -> &StockCatalog {
        &self.catalog
    }

    pub fn payment(&self) -> Option<&PaymentDetails> {
        self.payment.as_ref()
    }

    /// The request currently being submitted.
    pub fn in_flight(&self) -> Option<&SaleRequest> {
        self.in_flight.as_ref()
    }

    /// Why the last submission failed. Cleared by the next successful sale.
    pub fn last_error(&self) -> Option<&BackendError> {
        self.last_error.as_ref()
    }

    pub fn last_receipt(&self) -> Option<&Receipt> {
        self.last_receipt.as_ref()
    }

    // =========================================================================
    // Cart Editing
    // =========================================================================

    /// Adds units of a stock snapshot to the cart.
    pub fn add_item(&mut self, entry: &StockEntry, quantity: i64) -> CheckoutResult<CartLine> {
        self.ensure_editable()?;
        debug!(stock_id = %entry.stock_id, quantity, "add_item");

        let line = self
            .cart
            .add_item(entry, quantity)
            .inspect_err(|e| warn!(stock_id = %entry.stock_id, error = %e, "add_item rejected"))?;
        Ok(line.clone())
    }

    /// Adds a catalog entry by id, using the snapshot from the last search.
    pub fn add_from_catalog(&mut self, stock_id: &str, quantity: i64) -> CheckoutResult<CartLine> {
        self.ensure_editable()?;
        let entry = self
            .catalog
            .get(stock_id)
            .cloned()
            .ok_or_else(|| LookupError::NotFound {
                code: stock_id.to_string(),
            })?;
        self.add_item(&entry, quantity)
    }

    /// Looks up a scanned code and adds it. A failed lookup leaves the cart
    /// as it was.
    pub async fn scan_and_add(&mut self, code: &str, quantity: i64) -> CheckoutResult<CartLine> {
        self.ensure_editable()?;
        debug!(code, quantity, "scan_and_add");

        let entry = self.catalog.lookup_code(code).await?;
        self.add_item(&entry, quantity)
    }

    pub fn remove_item(&mut self, stock_id: &str) -> CheckoutResult<Option<CartLine>> {
        self.ensure_editable()?;
        debug!(stock_id, "remove_item");
        Ok(self.cart.remove_item(stock_id))
    }

    /// Sets a line's quantity. Zero or less removes the line.
    pub fn update_quantity(&mut self, stock_id: &str, quantity: i64) -> CheckoutResult<()> {
        self.ensure_editable()?;
        debug!(stock_id, quantity, "update_quantity");

        self.cart
            .update_quantity(stock_id, quantity)
            .inspect_err(|e| warn!(stock_id, error = %e, "update_quantity rejected"))?;
        Ok(())
    }

    pub fn set_line_discount(&mut self, stock_id: &str, discount: Money) -> CheckoutResult<()> {
        self.ensure_editable()?;
        debug!(stock_id, discount = %discount, "set_line_discount");
        self.cart.set_line_discount(stock_id, discount)?;
        Ok(())
    }

    /// Empties the cart and resets the discount.
    pub fn clear_cart(&mut self) -> CheckoutResult<()> {
        self.ensure_editable()?;
        debug!("clear_cart");
        self.cart.clear();
        self.policy.reset();
        Ok(())
    }

    // =========================================================================
    // Discount Policy
    // =========================================================================

    pub fn set_discount_kind(&mut self, kind: DiscountKind) -> CheckoutResult<()> {
        self.ensure_editable()?;
        self.policy.set_kind(kind);
        debug!(kind = ?kind, value = self.policy.value(), "set_discount_kind");
        Ok(())
    }

    /// Cents for `Amount`, basis points for `Percentage`. Clamped.
    pub fn set_discount_value(&mut self, value: i64) -> CheckoutResult<()> {
        self.ensure_editable()?;
        self.policy.set_value(value);
        debug!(requested = value, value = self.policy.value(), "set_discount_value");
        Ok(())
    }

    pub fn reset_discount(&mut self) -> CheckoutResult<()> {
        self.ensure_editable()?;
        self.policy.reset();
        Ok(())
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    pub async fn search_stock(&mut self, term: &str) -> CheckoutResult<&[StockEntry]> {
        Ok(self.catalog.search(term).await?)
    }

    pub async fn refresh_catalog(&mut self) -> CheckoutResult<&[StockEntry]> {
        Ok(self.catalog.refresh().await?)
    }

    // =========================================================================
    // Checkout Transitions
    // =========================================================================

    /// Opens the tender modal.
    pub fn begin_checkout(&mut self) -> CheckoutResult<()> {
        if self.state != CheckoutState::Idle {
            return Err(self.invalid("begin checkout"));
        }
        if self.cart.is_empty() {
            warn!("Checkout refused: cart is empty");
            return Err(CheckoutError::EmptyCart);
        }

        self.payment = None;
        self.transition(CheckoutState::AwaitingPaymentDetails);
        Ok(())
    }

    /// Records the payment choice. The reference is required for non-cash
    /// methods unless the store turned that check off.
    pub fn select_payment(
        &mut self,
        method: PaymentMethod,
        reference: Option<&str>,
    ) -> CheckoutResult<()> {
        if self.state != CheckoutState::AwaitingPaymentDetails {
            return Err(self.invalid("select payment"));
        }

        // A rejected tender clears the previous one
        let reference = match self.check_reference(method, reference) {
            Ok(reference) => reference,
            Err(e) => {
                self.payment = None;
                return Err(e);
            }
        };
        debug!(method = %method, has_reference = reference.is_some(), "select_payment");
        self.payment = Some(PaymentDetails { method, reference });
        Ok(())
    }

    /// Closes the tender modal without touching the cart.
    pub fn cancel_checkout(&mut self) -> CheckoutResult<()> {
        match self.state {
            CheckoutState::AwaitingPaymentDetails => {
                self.payment = None;
                self.transition(CheckoutState::Idle);
                Ok(())
            }
            CheckoutState::Submitting => Err(CheckoutError::SubmissionInFlight),
            _ => Err(self.invalid("cancel checkout")),
        }
    }

    /// Takes the sale snapshot and moves to `Submitting`.
    ///
    /// The returned request is what the host must send; the session keeps a
    /// copy and waits for [`CheckoutSession::resolve_submission`].
    pub fn begin_submit(&mut self) -> CheckoutResult<SaleRequest> {
        match self.state {
            CheckoutState::AwaitingPaymentDetails => {}
            CheckoutState::Submitting => return Err(CheckoutError::SubmissionInFlight),
            _ => return Err(self.invalid("submit")),
        }

        if self.cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        let payment = self.payment.clone().ok_or(CheckoutError::PaymentNotSelected)?;
        self.check_reference(payment.method, payment.reference.as_deref())?;

        let totals = self.totals();
        let request = SaleRequest::snapshot(&self.ctx, &self.cart, &totals, &payment)
            .inspect_err(|e| warn!(error = %e, "Sale snapshot refused"))?;

        info!(
            request_id = %request.request_id,
            lines = request.lines.len(),
            total = request.grand_total_cents,
            method = %request.payment_method,
            "Submitting sale"
        );
        self.in_flight = Some(request.clone());
        self.transition(CheckoutState::Submitting);
        Ok(request)
    }

    /// Applies the backend's answer to the in-flight submission.
    ///
    /// ## Outcomes
    /// - `Ok(sale)`: receipt built, cart and discount cleared, catalog
    ///   refreshed, back to `Idle`
    /// - `Err(e)`: cart untouched, `last_error` set, back to
    ///   `AwaitingPaymentDetails`; returns `CheckoutError::Submission(e)`
    pub async fn resolve_submission(
        &mut self,
        outcome: Result<Sale, BackendError>,
    ) -> CheckoutResult<Receipt> {
        if self.state != CheckoutState::Submitting {
            return Err(self.invalid("resolve submission"));
        }
        let request = match self.in_flight.take() {
            Some(request) => request,
            None => return Err(self.invalid("resolve submission")),
        };

        match outcome {
            Ok(sale) => Ok(self.complete_sale(&request, &sale).await),
            Err(err) => {
                warn!(request_id = %request.request_id, error = %err, "Sale submission failed");
                self.last_error = Some(err.clone());
                self.transition(CheckoutState::Failed);
                self.transition(CheckoutState::AwaitingPaymentDetails);
                Err(CheckoutError::Submission(err))
            }
        }
    }

    /// Submits the sale and waits for the backend.
    ///
    /// Exactly one `create_sale` call is made per invocation.
    pub async fn submit(&mut self) -> CheckoutResult<Receipt> {
        let request = self.begin_submit()?;
        let backend = Arc::clone(&self.backend);
        let outcome = backend.create_sale(&request).await;
        self.resolve_submission(outcome).await
    }

    // =========================================================================
    // Internals
    // =========================================================================

    async fn complete_sale(&mut self, request: &SaleRequest, sale: &Sale) -> Receipt {
        if sale.total_cents != request.grand_total_cents {
            warn!(
                sale_id = %sale.id,
                sent = request.grand_total_cents,
                recorded = sale.total_cents,
                "Backend recorded a different total"
            );
        }

        let receipt = Receipt::new(&self.ctx, request, sale);
        info!(sale_id = %sale.id, receipt = %sale.receipt_number, total = sale.total_cents, "Sale completed");

        self.transition(CheckoutState::Succeeded);
        self.cart.clear();
        self.policy.reset();
        self.payment = None;
        self.last_error = None;
        self.last_receipt = Some(receipt.clone());
        self.transition(CheckoutState::Idle);

        if self.refresh_catalog_after_sale {
            if let Err(e) = self.catalog.refresh().await {
                warn!(error = %e, "Catalog refresh after sale failed");
            }
        }

        receipt
    }

    fn check_reference(
        &self,
        method: PaymentMethod,
        reference: Option<&str>,
    ) -> CheckoutResult<Option<String>> {
        let required = self.require_payment_reference && method.requires_reference();
        // Cash validation never requires a reference; it still trims and
        // length-checks whatever was typed.
        let checked_as = if required { method } else { PaymentMethod::Cash };

        validate_payment_reference(checked_as, reference).map_err(|e| match e {
            ValidationError::Required { .. } => CheckoutError::PaymentReferenceRequired { method },
            other => other.into(),
        })
    }

    fn ensure_editable(&self) -> CheckoutResult<()> {
        if self.state.allows_cart_edits() {
            Ok(())
        } else {
            Err(CheckoutError::SubmissionInFlight)
        }
    }

    fn invalid(&self, action: &'static str) -> CheckoutError {
        warn!(state = %self.state, action, "Invalid checkout transition");
        CheckoutError::InvalidTransition {
            from: self.state,
            action,
        }
    }

    fn transition(&mut self, to: CheckoutState) {
        debug!(from = %self.state, to = %to, "Checkout state change");
        self.state = to;
    }
}
