//! # Error Types
//!
//! Domain-specific error types for climax-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  climax-core errors (this file)                                        │
//! │  ├── CoreError        - Lifecycle / business rule violations           │
//! │  └── ValidationError  - Record validation failures                     │
//! │                                                                         │
//! │  climax-insights errors (adapter crate)                                │
//! │  └── InsightsError    - Config, snapshot and caller-policy failures    │
//! │                                                                         │
//! │  Flow: ValidationError → snapshot record skipped with a warning        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## What Never Errors
//! The Demand Predictor and the Sales Aggregator are total functions. Empty
//! histories, zero variance and missing optional fields fall back to documented
//! defaults instead of producing an error. The types here cover the record
//! lifecycle helpers and the validation the host runs on incoming snapshots.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business rule errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Insufficient stock to complete a sale or a loan.
    ///
    /// ## User Workflow
    /// ```text
    /// Register sale (qty: 5) of "Aguardiente"
    ///      │
    ///      ▼
    /// Check stock: available=3
    ///      │
    ///      ▼
    /// InsufficientStock { product_id, available: 3, requested: 5 }
    /// ```
    #[error("Insufficient stock for {product_id}: available {available}, requested {requested}")]
    InsufficientStock {
        product_id: String,
        available: i64,
        requested: i64,
    },

    /// Sale is not in a state that allows the requested operation.
    ///
    /// ## When This Occurs
    /// - Confirming payment of a sale that is already paid
    #[error("Sale {sale_id} is {current_status}, cannot perform operation")]
    InvalidSaleStatus {
        sale_id: String,
        current_status: String,
    },
}

// =============================================================================
// Validation Error
// =============================================================================

/// Record validation errors.
///
/// Raised by [`crate::validation`] when a sale or product coming from a
/// collaborator store does not meet the data model.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g. stray whitespace inside an id).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
