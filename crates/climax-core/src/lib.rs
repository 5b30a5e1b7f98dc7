//! # climax-core: Demand & Sales Insights for CLIMAX Bar
//!
//! Pure business logic behind the bar's reporting screens: demand forecasting,
//! sales roll-ups, day closing and stock helpers. No I/O, no global state.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        CLIMAX Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │          Frontend (inventory, sales, reports screens)           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ snapshots of sales / products          │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │     Host adapter (climax-insights: config, files, logging)      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ &[Sale], &[Product], now               │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ climax-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │ forecast  │  │ aggregate │  │  report   │  │ inventory │  │   │
//! │  │   │ WMA, σ,   │  │ totals,   │  │ close day │  │ low stock │  │   │
//! │  │   │ reorder   │  │ rankings  │  │ cash count│  │ loans     │  │   │
//! │  │   └─────┬─────┘  └─────┬─────┘  └───────────┘  └───────────┘  │   │
//! │  │         └──── calendar ┘   (local-day buckets)                  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain records (Product, Sale, DemandPrediction, SalesReport, ...)
//! - [`money`] - Integer money
//! - [`calendar`] - Local-day buckets
//! - [`forecast`] - Demand Predictor
//! - [`aggregate`] - Sales Aggregator
//! - [`report`] - Day closing and cash reconciliation
//! - [`inventory`] - Stock helpers
//! - [`validation`] - Record validation
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same input, same output. The current time is an
//!    argument, never read from the clock.
//! 2. **Total**: the predictor and the aggregator never fail; degenerate input
//!    falls back to documented defaults.
//! 3. **Integer Money**: amounts are exact integer sums.
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use climax_core::{aggregate, forecast, Category, Money, PaymentMethod, Product, Sale, SaleStatus};
//!
//! let now = Utc.with_ymd_and_hms(2024, 5, 10, 23, 0, 0).unwrap();
//! let product = Product {
//!     id: "aguila".into(),
//!     name: "Águila".into(),
//!     category: Category::Beers,
//!     quantity: Some(48),
//!     price: Money::from_units(5_000),
//!     min_stock: Some(24),
//!     supplier: None,
//!     lead_time: Some(3),
//!     image_url: None,
//!     description: None,
//! };
//! let sales = vec![Sale {
//!     id: "s-1".into(),
//!     product_id: "aguila".into(),
//!     quantity: 2,
//!     total_price: Money::from_units(10_000),
//!     payment_method: PaymentMethod::Cash,
//!     date: Utc.with_ymd_and_hms(2024, 5, 10, 21, 0, 0).unwrap(),
//!     status: SaleStatus::Paid,
//!     table_number: None,
//! }];
//!
//! let prediction = forecast::predict_demand(&product, &sales, &now);
//! assert!(prediction.predicted_demand > 0.0);
//!
//! let draft = aggregate::close_day(&sales, &now);
//! assert_eq!(draft.total_amount.units(), 10_000);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod aggregate;
pub mod calendar;
pub mod error;
pub mod forecast;
pub mod inventory;
pub mod money;
pub mod report;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use aggregate::{
    close_day, filter_today, top_products, total_of, totals_by_payment_method, PaymentTotals,
    DEFAULT_TOP_LIMIT,
};
pub use error::{CoreError, CoreResult, ValidationError};
pub use forecast::{predict_demand, ForecastSettings, Forecaster};
pub use money::Money;
pub use report::{reconcile_cash, CashVariance};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Longest lead time accepted on a product, in days.
pub const MAX_LEAD_TIME_DAYS: u32 = 365;
