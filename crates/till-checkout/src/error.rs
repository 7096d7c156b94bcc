//! # Checkout Error Types
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Checkout Error Categories                           │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐  │
//! │  │    Workflow     │  │     Backend     │  │        Lookup           │  │
//! │  │                 │  │                 │  │                         │  │
//! │  │  EmptyCart      │  │  Network        │  │  NotFound               │  │
//! │  │  InvalidTrans.  │  │  Rejected       │  │  Invalid                │  │
//! │  │  SubmissionIn.  │  │  Malformed      │  │  Backend                │  │
//! │  │  PaymentRef.    │  │                 │  │                         │  │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘  │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐                               │
//! │  │      Core       │  │     Config      │                               │
//! │  │ (till-core)     │  │  Load / Save    │                               │
//! │  │ InsufficientSt. │  │  Invalid        │                               │
//! │  └─────────────────┘  └─────────────────┘                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing here is fatal. Every error is reported to the operator and the
//! session stays usable.

use thiserror::Error;
use till_core::{CoreError, PaymentMethod, ValidationError};

use crate::workflow::CheckoutState;

/// Result type alias for checkout operations.
pub type CheckoutResult<T> = Result<T, CheckoutError>;

// =============================================================================
// Backend Error
// =============================================================================

/// What the commerce backend (or the transport to it) reported.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    /// Transport failure; the request may or may not have arrived.
    #[error("Network error: {0}")]
    Network(String),

    /// The backend refused the request (oversold stock, bad payload).
    #[error("Rejected by backend: {message}")]
    Rejected { message: String },

    /// The backend answered with something we could not read.
    #[error("Malformed backend response: {0}")]
    MalformedResponse(String),
}

impl BackendError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, BackendError::Network(_))
    }
}

// =============================================================================
// Lookup Error
// =============================================================================

/// Catalog search or code lookup failed. The cart is never touched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("No stock found for '{code}'")]
    NotFound { code: String },

    #[error("Invalid lookup input: {0}")]
    Invalid(#[from] ValidationError),

    #[error("Lookup failed: {0}")]
    Backend(#[from] BackendError),
}

// =============================================================================
// Checkout Error
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    /// A cart or discount rule rejected the mutation.
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Cart is empty")]
    EmptyCart,

    #[error("Cannot {action} while {from}")]
    InvalidTransition {
        from: CheckoutState,
        action: &'static str,
    },

    #[error("A payment reference is required for {method}")]
    PaymentReferenceRequired { method: PaymentMethod },

    #[error("No payment method selected")]
    PaymentNotSelected,

    /// A sale is being submitted; cart edits and new submissions wait.
    #[error("A sale submission is already in progress")]
    SubmissionInFlight,

    #[error("Sale submission failed: {0}")]
    Submission(BackendError),

    #[error(transparent)]
    Lookup(#[from] LookupError),
}

impl From<ValidationError> for CheckoutError {
    fn from(err: ValidationError) -> Self {
        CheckoutError::Core(err.into())
    }
}

impl CheckoutError {
    /// Returns true if repeating the same operation unchanged may succeed.
    ///
    /// ## Retryable Errors
    /// - Network failures on submission or lookup
    /// - `SubmissionInFlight` (once the submission resolves)
    pub fn is_retryable(&self) -> bool {
        match self {
            CheckoutError::Submission(err) => err.is_retryable(),
            CheckoutError::Lookup(LookupError::Backend(err)) => err.is_retryable(),
            CheckoutError::SubmissionInFlight => true,
            _ => false,
        }
    }

    /// Returns true if the error came from a rule on the cart itself.
    pub fn is_cart_rule(&self) -> bool {
        matches!(self, CheckoutError::Core(_) | CheckoutError::EmptyCart)
    }
}

// =============================================================================
// Config Error
// =============================================================================

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load config: {0}")]
    Load(String),

    #[error("Failed to save config: {0}")]
    Save(String),

    #[error("Invalid checkout configuration: {0}")]
    Invalid(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::Load(err.to_string())
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::Load(err.to_string())
    }
}

impl From<toml::ser::Error> for ConfigError {
    fn from(err: toml::ser::Error) -> Self {
        ConfigError::Save(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_errors() {
        assert!(CheckoutError::Submission(BackendError::Network("reset".into())).is_retryable());
        assert!(CheckoutError::Lookup(LookupError::Backend(BackendError::Network(
            "timeout".into()
        )))
        .is_retryable());
        assert!(CheckoutError::SubmissionInFlight.is_retryable());

        assert!(!CheckoutError::Submission(BackendError::Rejected {
            message: "oversold".into()
        })
        .is_retryable());
        assert!(!CheckoutError::EmptyCart.is_retryable());
        assert!(!CheckoutError::Lookup(LookupError::NotFound { code: "123".into() }).is_retryable());
    }

    #[test]
    fn test_error_display() {
        let err = CheckoutError::InvalidTransition {
            from: CheckoutState::Idle,
            action: "select payment",
        };
        assert_eq!(err.to_string(), "Cannot select payment while idle");

        let err = CheckoutError::PaymentReferenceRequired {
            method: PaymentMethod::CreditCard,
        };
        assert_eq!(err.to_string(), "A payment reference is required for credit_card");

        let err = CheckoutError::Core(CoreError::LineNotFound("stk-1".into()));
        assert_eq!(err.to_string(), "No cart line for stock stk-1");
    }

    #[test]
    fn test_conversions() {
        let err: CheckoutError = ValidationError::Required {
            field: "code".into(),
        }
        .into();
        assert!(err.is_cart_rule());

        let err: CheckoutError = LookupError::from(BackendError::MalformedResponse("eof".into())).into();
        assert!(matches!(err, CheckoutError::Lookup(LookupError::Backend(_))));
    }
}
