//! # Validation Module
//!
//! Input validation for everything the operator types in.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: CLI argument parsing (clap)                                  │
//! │  ├── Required flags present                                            │
//! │  └── Integers parse as integers                                        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Command handler                                              │
//! │  ├── Money::parse for amounts ("1 500,50")                             │
//! │  └── THIS MODULE: business rule validation                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Local store                                                  │
//! │  └── Nothing. Collections are JSON arrays and accept anything.         │
//! │                                                                         │
//! │  Every rule therefore lives here, before a collection is touched.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use applemar_core::validation::{validate_product_name, validate_quantity};
//!
//! assert!(validate_product_name("Sumo Compal 1L").is_ok());
//! assert!(validate_quantity(5).is_ok());
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::{MAX_AMOUNT_KZ, MAX_ITEM_QUANTITY};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

const MAX_NAME_LEN: usize = 200;
const MAX_CATEGORY_LEN: usize = 100;
const MAX_DESCRIPTION_LEN: usize = 500;
const MAX_NIF_LEN: usize = 20;
const MAX_SEARCH_LEN: usize = 100;

// =============================================================================
// String Validators
// =============================================================================

fn require_text(field: &str, value: &str, max: usize) -> ValidationResult<String> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(value.to_string())
}

/// Validates a product name.
///
/// ## Rules
/// - Must not be empty
/// - At most 200 characters
///
/// ## Returns
/// The trimmed name.
///
/// ## Example
/// ```rust
/// use applemar_core::validation::validate_product_name;
///
/// assert!(validate_product_name("Água Pura 1.5L").is_ok());
/// assert!(validate_product_name("").is_err());
/// ```
pub fn validate_product_name(name: &str) -> ValidationResult<String> {
    require_text("name", name, MAX_NAME_LEN)
}

/// Validates a product or expense category (at most 100 characters).
pub fn validate_category(category: &str) -> ValidationResult<String> {
    require_text("category", category, MAX_CATEGORY_LEN)
}

/// Validates a customer name.
pub fn validate_customer_name(name: &str) -> ValidationResult<String> {
    require_text("name", name, MAX_NAME_LEN)
}

/// Validates a transaction description (at most 500 characters).
pub fn validate_description(description: &str) -> ValidationResult<String> {
    require_text("description", description, MAX_DESCRIPTION_LEN)
}

/// Validates a NIF (Número de Identificação Fiscal).
///
/// ## Rules
/// - Optional: empty is accepted (walk-in customers)
/// - Letters and digits only, at most 20 characters
///
/// ## Example
/// ```rust
/// use applemar_core::validation::validate_nif;
///
/// assert_eq!(validate_nif(" 5417003459 ").unwrap(), "5417003459");
/// assert!(validate_nif("").is_ok());
/// assert!(validate_nif("541-700").is_err());
/// ```
pub fn validate_nif(nif: &str) -> ValidationResult<String> {
    let nif = nif.trim();

    if nif.chars().count() > MAX_NIF_LEN {
        return Err(ValidationError::TooLong {
            field: "nif".to_string(),
            max: MAX_NIF_LEN,
        });
    }

    if !nif.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ValidationError::InvalidFormat {
            field: "nif".to_string(),
            reason: "must contain only letters and digits".to_string(),
        });
    }

    Ok(nif.to_uppercase())
}

/// Validates an optional email address.
///
/// Only checks for an `@` between a local part and a domain.
pub fn validate_email(email: &str) -> ValidationResult<String> {
    let email = email.trim();

    if email.is_empty() {
        return Ok(String::new());
    }

    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(email.to_string()),
        _ => Err(ValidationError::InvalidFormat {
            field: "email".to_string(),
            reason: "must look like name@domain".to_string(),
        }),
    }
}

/// Validates a search query.
///
/// ## Rules
/// - Can be empty (matches everything)
/// - Maximum 100 characters
///
/// ## Returns
/// The trimmed query string.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.chars().count() > MAX_SEARCH_LEN {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: MAX_SEARCH_LEN,
        });
    }

    Ok(query.to_string())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a quantity value.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY (999)
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  applemar sale checkout --item P-1A2B3C4D5E:5                           │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  validate_quantity(5) ← THIS FUNCTION                                  │
/// │       │                                                                 │
/// │       ├── qty <= 0? → Error: "quantity must be positive"               │
/// │       │                                                                 │
/// │       ├── qty > 999? → Error: "quantity must be between 1 and 999"     │
/// │       │                                                                 │
/// │       └── OK → Cart::add_item                                          │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a sale or cost price.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (free samples)
///
/// ## Example
/// ```rust
/// use applemar_core::money::Money;
/// use applemar_core::validation::validate_price;
///
/// assert!(validate_price("price", Money::from_kwanza(250)).is_ok());
/// assert!(validate_price("price", Money::zero()).is_ok());
/// assert!(validate_price("cost price", Money::from_cents(-1)).is_err());
/// ```
pub fn validate_price(field: &str, price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::MustNotBeNegative {
            field: field.to_string(),
        });
    }

    check_ceiling(field, price)
}

/// Validates an expense amount. Zero or negative expenses are rejected.
pub fn validate_amount(amount: Money) -> ValidationResult<()> {
    if !amount.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "amount".to_string(),
        });
    }

    check_ceiling("amount", amount)
}

/// Validates a monthly sales target.
pub fn validate_sales_target(target: Money) -> ValidationResult<()> {
    if !target.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "sales target".to_string(),
        });
    }

    check_ceiling("sales target", target)
}

fn check_ceiling(field: &str, amount: Money) -> ValidationResult<()> {
    if amount > Money::from_kwanza(MAX_AMOUNT_KZ) {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: MAX_AMOUNT_KZ,
        });
    }

    Ok(())
}

/// Checks a stock figure.
///
/// Any integer is accepted; the returned flag is `true` when the value is
/// negative so the caller can warn the operator.
pub fn check_stock(stock: i64) -> bool {
    stock < 0
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_product_name() {
        assert_eq!(
            validate_product_name("  Sumo Compal 1L ").unwrap(),
            "Sumo Compal 1L"
        );
        assert!(validate_product_name("").is_err());
        assert!(validate_product_name("   ").is_err());
        assert!(validate_product_name(&"A".repeat(300)).is_err());
        // Counted in characters, not bytes.
        assert!(validate_product_name(&"É".repeat(200)).is_ok());
    }

    #[test]
    fn test_validate_category_and_description() {
        assert!(validate_category("Bebidas").is_ok());
        assert!(validate_category(&"x".repeat(101)).is_err());
        assert!(validate_description("Renda do armazém").is_ok());
        assert_eq!(
            validate_description(""),
            Err(ValidationError::Required {
                field: "description".to_string()
            })
        );
    }

    #[test]
    fn test_validate_nif() {
        assert_eq!(validate_nif("5417003459").unwrap(), "5417003459");
        assert_eq!(validate_nif("004567890la042").unwrap(), "004567890LA042");
        assert_eq!(validate_nif("").unwrap(), "");
        assert!(validate_nif("541 700").is_err());
        assert!(validate_nif(&"9".repeat(21)).is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("geral@applemar.ao").is_ok());
        assert_eq!(validate_email("  ").unwrap(), "");
        assert!(validate_email("applemar.ao").is_err());
        assert!(validate_email("@applemar.ao").is_err());
        assert!(validate_email("geral@").is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(999).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(1000).is_err());
    }

    #[test]
    fn test_validate_money_fields() {
        assert!(validate_price("price", Money::zero()).is_ok());
        assert!(validate_price("price", Money::from_cents(-100)).is_err());

        assert!(validate_amount(Money::from_kwanza(15_000)).is_ok());
        assert!(validate_amount(Money::zero()).is_err());
        assert!(validate_amount(Money::from_kwanza(-5)).is_err());

        assert!(validate_sales_target(Money::from_kwanza(1_000_000)).is_ok());
        assert!(validate_sales_target(Money::zero()).is_err());
    }

    #[test]
    fn test_amounts_above_ceiling_are_rejected() {
        let ceiling = Money::from_kwanza(MAX_AMOUNT_KZ);
        let above = ceiling + Money::from_cents(1);

        assert!(validate_price("price", ceiling).is_ok());
        assert_eq!(
            validate_price("price", above),
            Err(ValidationError::OutOfRange {
                field: "price".to_string(),
                min: 0,
                max: MAX_AMOUNT_KZ,
            })
        );
        assert!(validate_amount(above).is_err());
        assert!(validate_sales_target(above).is_err());

        let parsed = Money::parse("92233720368547758").unwrap();
        assert!(validate_price("price", parsed).is_err());
    }

    #[test]
    fn test_check_stock_flags_negative_only() {
        assert!(!check_stock(0));
        assert!(!check_stock(12));
        assert!(check_stock(-3));
    }

    #[test]
    fn test_validate_search_query() {
        assert_eq!(validate_search_query("  bebidas ").unwrap(), "bebidas");
        assert!(validate_search_query(&"q".repeat(101)).is_err());
    }
}
