//! # Domain Types
//!
//! Records exchanged between the bar's stores, this crate and the reporting
//! screens.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────────┐   │
//! │  │    Product      │   │      Sale       │   │  DemandPrediction   │   │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────────  │   │
//! │  │  id             │◄──│  productId      │   │  productId          │   │
//! │  │  category       │   │  quantity       │   │  predictedDemand    │   │
//! │  │  quantity?      │   │  totalPrice     │   │  confidence         │   │
//! │  │  minStock?      │   │  paymentMethod  │   │  suggestedOrder     │   │
//! │  │  leadTime?      │   │  status, date   │   └─────────────────────┘   │
//! │  └─────────────────┘   └─────────────────┘                              │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────────┐   │
//! │  │  SalesReport    │──►│   TopProduct    │   │ CashReconciliation  │   │
//! │  │  (ReportDraft)  │──►│                 │   │                     │   │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────────┘   │
//! │                                                                         │
//! │  ┌─────────────────────────────────────┐                               │
//! │  │  InventoryMovement (loan / receipt) │                               │
//! │  └─────────────────────────────────────┘                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Format
//! Field names are camelCase and enum values keep the Spanish spellings the
//! stores already persist (`efectivo`, `prestamo`, `Cervezas`, ...). Spreadsheet
//! exporters read these positionally, so renames here are breaking changes.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;

// =============================================================================
// Category
// =============================================================================

/// Product category. A closed set: the menu is organised around these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum Category {
    #[serde(rename = "Licores")]
    Liquor,
    #[serde(rename = "Cócteles")]
    Cocktails,
    #[serde(rename = "Granizados")]
    Slushies,
    #[serde(rename = "Shots")]
    Shots,
    #[serde(rename = "Cervezas")]
    Beers,
    /// Hot spiced drinks prepared at the bar.
    #[serde(rename = "Hervidos")]
    Hervidos,
    #[serde(rename = "Bebidas")]
    SoftDrinks,
}

impl Category {
    /// Categories prepared to order. Their products usually carry no stock
    /// count (`quantity: null`).
    pub const fn is_made_to_order(&self) -> bool {
        matches!(
            self,
            Category::Cocktails | Category::Shots | Category::Hervidos
        )
    }

    /// Label as shown on the menu and persisted by the stores.
    pub const fn label(&self) -> &'static str {
        match self {
            Category::Liquor => "Licores",
            Category::Cocktails => "Cócteles",
            Category::Slushies => "Granizados",
            Category::Shots => "Shots",
            Category::Beers => "Cervezas",
            Category::Hervidos => "Hervidos",
            Category::SoftDrinks => "Bebidas",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// Payment Method
// =============================================================================

/// How a sale was paid.
///
/// The wire values are the ones the register has always written. English
/// spellings are accepted when reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum PaymentMethod {
    /// Physical cash in the drawer.
    #[serde(rename = "efectivo", alias = "cash")]
    Cash,
    /// Nequi mobile wallet transfer.
    #[serde(rename = "nequi", alias = "mobile-wallet")]
    MobileWallet,
    /// Card on the external terminal (datáfono).
    #[serde(rename = "datafono", alias = "card")]
    Card,
}

impl PaymentMethod {
    /// The three known methods, in the order reports list them.
    pub const ALL: [PaymentMethod; 3] = [
        PaymentMethod::Cash,
        PaymentMethod::MobileWallet,
        PaymentMethod::Card,
    ];

    /// Wire value of this method.
    pub const fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "efectivo",
            PaymentMethod::MobileWallet => "nequi",
            PaymentMethod::Card => "datafono",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "efectivo" | "cash" => Ok(PaymentMethod::Cash),
            "nequi" | "mobile-wallet" | "mobile_wallet" => Ok(PaymentMethod::MobileWallet),
            "datafono" | "datáfono" | "card" => Ok(PaymentMethod::Card),
            other => Err(ValidationError::InvalidFormat {
                field: "paymentMethod".to_string(),
                reason: format!(
                    "unknown payment method '{}', expected efectivo, nequi or datafono",
                    other
                ),
            }),
        }
    }
}

// =============================================================================
// Sale Status
// =============================================================================

/// Lifecycle of a sale: registered as `Pending`, confirmed to `Paid`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum SaleStatus {
    #[default]
    Pending,
    Paid,
}

impl fmt::Display for SaleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SaleStatus::Pending => write!(f, "pending"),
            SaleStatus::Paid => write!(f, "paid"),
        }
    }
}

// =============================================================================
// Sale
// =============================================================================

/// One line sold at the bar: a single product, a quantity and its price.
///
/// Sales are facts. Only `status` (and operator corrections made by the
/// stores) change after creation; `date` never does.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: String,

    /// Weak reference: the product may have been deleted since.
    pub product_id: String,

    /// Units sold (always positive).
    pub quantity: u32,

    /// Amount charged for the whole line, special pricing included.
    pub total_price: Money,

    pub payment_method: PaymentMethod,

    /// When the sale was registered.
    #[ts(as = "String")]
    pub date: DateTime<Utc>,

    #[serde(default)]
    pub status: SaleStatus,

    /// Free-text table reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub table_number: Option<String>,
}

impl Sale {
    #[inline]
    pub fn is_paid(&self) -> bool {
        self.status == SaleStatus::Paid
    }

    /// Marks a pending sale as paid.
    pub fn confirm_payment(&mut self) -> CoreResult<()> {
        if self.is_paid() {
            return Err(CoreError::InvalidSaleStatus {
                sale_id: self.id.clone(),
                current_status: self.status.to_string(),
            });
        }

        self.status = SaleStatus::Paid;
        Ok(())
    }
}

// =============================================================================
// Product
// =============================================================================

/// Lead time assumed when a product has none configured.
pub const DEFAULT_LEAD_TIME_DAYS: u32 = 7;

/// A menu item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,

    pub name: String,

    pub category: Category,

    /// Units on hand. `None` means the product is not stock-tracked
    /// (cocktails and other drinks made to order).
    #[serde(default)]
    pub quantity: Option<i64>,

    /// Baseline unit price.
    pub price: Money,

    /// Reorder threshold.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub min_stock: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub supplier: Option<String>,

    /// Days between placing a reorder and receiving it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub lead_time: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub image_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub description: Option<String>,
}

impl Product {
    /// Whether the bar keeps a stock count for this product.
    #[inline]
    pub fn is_stock_tracked(&self) -> bool {
        self.quantity.is_some()
    }

    /// Configured lead time, or `default_days` when absent.
    #[inline]
    pub fn lead_time_or(&self, default_days: u32) -> u32 {
        self.lead_time.unwrap_or(default_days)
    }

    /// Checks if `quantity` units can be sold from current stock.
    ///
    /// Untracked products can always be sold.
    pub fn can_sell(&self, quantity: u32) -> bool {
        match self.quantity {
            Some(stock) => stock >= quantity as i64,
            None => true,
        }
    }

    /// Like [`Product::can_sell`] but reports the shortfall.
    pub fn ensure_stock(&self, quantity: u32) -> CoreResult<()> {
        match self.quantity {
            Some(stock) if stock < quantity as i64 => Err(CoreError::InsufficientStock {
                product_id: self.id.clone(),
                available: stock,
                requested: quantity as i64,
            }),
            _ => Ok(()),
        }
    }

    /// Stock is at or below the configured minimum.
    ///
    /// Products without a stock count or without a minimum never qualify.
    pub fn is_low_stock(&self) -> bool {
        match (self.quantity, self.min_stock) {
            (Some(stock), Some(min)) => stock <= min,
            _ => false,
        }
    }
}

// =============================================================================
// Demand Prediction
// =============================================================================

/// Near-term demand estimate for one product. Recomputed on demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DemandPrediction {
    pub product_id: String,

    /// Expected units per day (weighted moving average, ≥ 0).
    pub predicted_demand: f64,

    /// In `[0, 1]`. A value of 1 with zero demand means "certainly zero", not
    /// "certain to sell".
    pub confidence: f64,

    /// Units to order to cover the lead time plus safety stock.
    #[ts(type = "number")]
    pub suggested_order: u64,
}

// =============================================================================
// Top Product
// =============================================================================

/// A product's sales rolled up over a set of sales.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TopProduct {
    pub product_id: String,

    #[ts(type = "number")]
    pub quantity: u64,

    pub total_sales: Money,
}

// =============================================================================
// Cash Reconciliation
// =============================================================================

/// End-of-day count of the cash drawer against recorded sales.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CashReconciliation {
    pub id: String,

    /// Cash the recorded sales say should be in the drawer.
    pub expected_cash: Money,

    /// Cash actually counted.
    pub actual_cash: Money,

    /// `actual_cash - expected_cash`; negative is a shortage.
    pub difference: Money,

    #[serde(rename = "nequiTotal")]
    pub mobile_wallet_total: Money,

    pub card_total: Money,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub notes: Option<String>,

    #[ts(as = "String")]
    pub timestamp: DateTime<Utc>,
}

// =============================================================================
// Sales Report
// =============================================================================

/// A closed day, before the store assigns it an id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ReportDraft {
    #[ts(as = "String")]
    pub date: DateTime<Utc>,

    pub sales: Vec<Sale>,

    pub total_amount: Money,

    pub top_products: Vec<TopProduct>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub reconciliation: Option<CashReconciliation>,
}

/// An archived day of sales. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SalesReport {
    pub id: String,

    #[ts(as = "String")]
    pub date: DateTime<Utc>,

    pub sales: Vec<Sale>,

    pub total_amount: Money,

    pub top_products: Vec<TopProduct>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub reconciliation: Option<CashReconciliation>,
}

// =============================================================================
// Inventory Movement
// =============================================================================

/// Direction of a stock movement outside of sales.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum MovementType {
    /// Stock lent out (to a sister venue, an event...). Decreases stock.
    #[serde(rename = "prestamo")]
    Loan,
    /// Stock received. Increases stock.
    #[serde(rename = "recepcion")]
    Receipt,
}

/// Whether a loan has come back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum MovementStatus {
    #[default]
    Pending,
    Returned,
}

/// A loan or a receipt of stock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct InventoryMovement {
    pub id: String,

    pub product_id: String,

    pub quantity: u32,

    #[serde(rename = "type")]
    pub kind: MovementType,

    #[ts(as = "String")]
    pub date: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub notes: Option<String>,

    /// Expected return date of a loan.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(as = "Option<String>")]
    pub return_date: Option<DateTime<Utc>>,

    #[serde(default)]
    pub status: MovementStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub received_from: Option<String>,
}

// =============================================================================
// Unit Tests
// =============================================================================
