//! # Validation Module
//!
//! Input validation for values typed or scanned by the operator.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Web client                                                    │
//! │  ├── Basic format checks (empty, length)                                │
//! │  └── Immediate user feedback                                            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Engine (Rust)                                                 │
//! │  └── THIS MODULE: quantities, search terms, codes, payment references  │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Commerce backend                                              │
//! │  └── Live stock check, sale persistence                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use till_core::validation::{validate_quantity, validate_search_query};
//!
//! assert!(validate_quantity(5, 999).is_ok());
//! assert_eq!(validate_search_query("  coke ").unwrap(), "coke");
//! ```

use crate::error::ValidationError;
use crate::types::PaymentMethod;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest free-text search term accepted.
pub const MAX_SEARCH_QUERY_LEN: usize = 100;

/// Longest scanned code accepted (barcodes, QR payloads of SKUs).
pub const MAX_SCAN_CODE_LEN: usize = 64;

/// Longest payment reference accepted (card auth code, UPI txn id).
pub const MAX_PAYMENT_REFERENCE_LEN: usize = 64;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a search query.
///
/// ## Rules
/// - Can be empty (lists the store's stock)
/// - Maximum 100 characters after trimming
///
/// ## Returns
/// The trimmed query string.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.chars().count() > MAX_SEARCH_QUERY_LEN {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: MAX_SEARCH_QUERY_LEN,
        });
    }

    Ok(query.to_string())
}

/// Validates a code coming from the barcode scanner or manual code entry.
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most 64 characters
/// - No whitespace or control characters inside the code
///
/// ## Example
/// ```rust
/// use till_core::validation::validate_scan_code;
///
/// assert_eq!(validate_scan_code(" 5449000000996\n").unwrap(), "5449000000996");
/// assert!(validate_scan_code("").is_err());
/// assert!(validate_scan_code("54 49").is_err());
/// ```
pub fn validate_scan_code(code: &str) -> ValidationResult<String> {
    let code = code.trim();

    if code.is_empty() {
        return Err(ValidationError::Required {
            field: "code".to_string(),
        });
    }

    if code.chars().count() > MAX_SCAN_CODE_LEN {
        return Err(ValidationError::TooLong {
            field: "code".to_string(),
            max: MAX_SCAN_CODE_LEN,
        });
    }

    if code.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(ValidationError::InvalidFormat {
            field: "code".to_string(),
            reason: "must not contain spaces or control characters".to_string(),
        });
    }

    Ok(code.to_string())
}

/// Checks if a query looks like a barcode (8-13 digits: EAN-8 to EAN-13).
pub fn is_barcode_query(query: &str) -> bool {
    let len = query.len();
    (8..=13).contains(&len) && query.chars().all(|c| c.is_ascii_digit())
}

/// Validates the payment reference for the chosen method.
///
/// ## Rules
/// - Cash: reference is optional, kept if given
/// - Everything else: non-empty reference required
/// - At most 64 characters
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Tender modal                                                           │
/// │                                                                         │
/// │  Method: [UPI ▼]   Reference: [            ]                            │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  validate_payment_reference(Upi, "") ← THIS FUNCTION                    │
/// │       │                                                                 │
/// │       └── Error: "reference is required" → Submit stays disabled        │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
///
/// ## Returns
/// The trimmed reference, `None` when absent (cash only).
pub fn validate_payment_reference(
    method: PaymentMethod,
    reference: Option<&str>,
) -> ValidationResult<Option<String>> {
    let reference = reference.map(str::trim).filter(|r| !r.is_empty());

    match reference {
        None if method.requires_reference() => Err(ValidationError::Required {
            field: "reference".to_string(),
        }),
        None => Ok(None),
        Some(r) if r.chars().count() > MAX_PAYMENT_REFERENCE_LEN => {
            Err(ValidationError::TooLong {
                field: "reference".to_string(),
                max: MAX_PAYMENT_REFERENCE_LEN,
            })
        }
        Some(r) => Ok(Some(r.to_string())),
    }
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a quantity value against the per-line ceiling.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed `max`
///
/// The stock ceiling is a separate check done by the cart itself.
pub fn validate_quantity(qty: i64, max: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > max {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max,
        });
    }

    Ok(())
}

/// Validates a price in cents.
///
/// Zero is allowed (free items); negative prices never come from a valid
/// stock snapshot.
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates the amount recorded on the payment.
///
/// ## Rules
/// - Must be non-negative. A fully discounted sale pays exactly zero.
pub fn validate_payment_amount(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: "payment amount".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_search_query() {
        assert_eq!(validate_search_query("  coke  ").unwrap(), "coke");
        assert_eq!(validate_search_query("").unwrap(), "");
        assert!(validate_search_query(&"a".repeat(101)).is_err());
    }

    #[test]
    fn test_validate_scan_code() {
        assert_eq!(validate_scan_code("BEV-COKE-330").unwrap(), "BEV-COKE-330");
        assert!(validate_scan_code("   ").is_err());
        assert!(validate_scan_code("ab\tcd").is_err());
        assert!(validate_scan_code(&"9".repeat(65)).is_err());
    }

    #[test]
    fn test_is_barcode_query() {
        assert!(is_barcode_query("12345678"));
        assert!(is_barcode_query("5449000000996"));
        assert!(!is_barcode_query("1234567"));
        assert!(!is_barcode_query("12345678901234"));
        assert!(!is_barcode_query("COKE1234"));
    }

    #[test]
    fn test_validate_payment_reference() {
        assert_eq!(validate_payment_reference(PaymentMethod::Cash, None).unwrap(), None);
        assert_eq!(
            validate_payment_reference(PaymentMethod::Cash, Some("till-2")).unwrap(),
            Some("till-2".to_string())
        );
        assert_eq!(
            validate_payment_reference(PaymentMethod::Upi, Some(" 4031XYZ ")).unwrap(),
            Some("4031XYZ".to_string())
        );

        assert!(validate_payment_reference(PaymentMethod::Upi, None).is_err());
        assert!(validate_payment_reference(PaymentMethod::CreditCard, Some("   ")).is_err());
        assert!(validate_payment_reference(PaymentMethod::Wallet, Some(&"x".repeat(65))).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1, 999).is_ok());
        assert!(validate_quantity(999, 999).is_ok());

        assert!(validate_quantity(0, 999).is_err());
        assert!(validate_quantity(-1, 999).is_err());
        assert!(validate_quantity(1000, 999).is_err());
    }

    #[test]
    fn test_validate_amounts() {
        assert!(validate_price_cents(0).is_ok());
        assert!(validate_price_cents(-1).is_err());
        assert!(validate_payment_amount(0).is_ok());
        assert!(validate_payment_amount(-1).is_err());
    }
}
