//! # Validation Module
//!
//! Record checks run on sales and products coming from the collaborator
//! stores before they reach the forecaster or the aggregator.
//!
//! ## Where Validation Sits
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Forms (frontend)                                             │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Snapshot loading (climax-insights)                           │
//! │  ├── JSON shape (serde)                                                │
//! │  └── THIS MODULE: value rules; failing records are skipped             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Core computations                                            │
//! │  └── Total over whatever survives; stale data never panics             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use climax_core::validation::{validate_product_name, validate_quantity};
//!
//! assert!(validate_product_name("Aguardiente Antioqueño").is_ok());
//! assert!(validate_quantity(0).is_err());
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{Product, Sale};
use crate::MAX_LEAD_TIME_DAYS;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a record identifier.
///
/// ## Rules
/// - Must not be empty
/// - At most 128 characters
/// - No whitespace (ids are used as lookup keys)
pub fn validate_id(field: &str, id: &str) -> ValidationResult<()> {
    if id.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if id.len() > 128 {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: 128,
        });
    }

    if id.chars().any(char::is_whitespace) {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must not contain whitespace".to_string(),
        });
    }

    Ok(())
}

/// Validates a product name.
///
/// ## Rules
/// - Must not be blank
/// - At most 200 characters
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > 200 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 200,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a sold quantity. Any positive count is accepted; bulk sales
/// (a crate of beer for an event) are real.
pub fn validate_quantity(qty: u32) -> ValidationResult<()> {
    if qty == 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

/// Validates a price or amount. Zero is allowed (courtesy drinks).
pub fn validate_price(field: &str, amount: Money) -> ValidationResult<()> {
    if amount.is_negative() {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates an optional lead time. Absent is fine (the default applies).
pub fn validate_lead_time(lead_time: Option<u32>) -> ValidationResult<()> {
    match lead_time {
        Some(0) => Err(ValidationError::MustBePositive {
            field: "leadTime".to_string(),
        }),
        Some(days) if days > MAX_LEAD_TIME_DAYS => Err(ValidationError::OutOfRange {
            field: "leadTime".to_string(),
            min: 1,
            max: i64::from(MAX_LEAD_TIME_DAYS),
        }),
        _ => Ok(()),
    }
}

// =============================================================================
// Record Validators
// =============================================================================

/// Validates a sale record.
pub fn validate_sale(sale: &Sale) -> ValidationResult<()> {
    validate_id("id", &sale.id)?;
    validate_id("productId", &sale.product_id)?;
    validate_quantity(sale.quantity)?;
    validate_price("totalPrice", sale.total_price)?;
    Ok(())
}

/// Validates a product record.
pub fn validate_product(product: &Product) -> ValidationResult<()> {
    validate_id("id", &product.id)?;
    validate_product_name(&product.name)?;
    validate_price("price", product.price)?;
    validate_lead_time(product.lead_time)?;

    if let Some(min) = product.min_stock {
        if min < 0 {
            return Err(ValidationError::OutOfRange {
                field: "minStock".to_string(),
                min: 0,
                max: i64::MAX,
            });
        }
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
