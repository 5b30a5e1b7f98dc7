//! # Commands
//!
//! One function per CLI subcommand. Each builds a serializable view from the
//! snapshots and the core, and a matching `render_*` turns it into text.
//!
//! ## Command Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Command Flow                                   │
//! │                                                                         │
//! │  main.rs                  commands.rs                 climax-core       │
//! │  ───────                  ───────────                 ───────────       │
//! │                                                                         │
//! │  snapshots + now ───────► predict()   ───────────────► Forecaster       │
//! │                           summary()   ───────────────► aggregate::*     │
//! │                           close()     ───────────────► close_day,       │
//! │                                                        reconcile_cash   │
//! │                           low_stock() ───────────────► inventory        │
//! │                               │                                         │
//! │  stdout ◄── to_json() / render_*() ◄──┘                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The current time is passed in; only `main` reads the clock.

use std::fmt::Write as _;

use chrono::{DateTime, TimeZone, Utc};
use climax_core::aggregate::{paid_only, sales_by_method};
use climax_core::inventory;
use climax_core::report::CashVariance;
use climax_core::{
    close_day, filter_today, reconcile_cash, top_products, total_of, totals_by_payment_method,
    Category, DemandPrediction, Forecaster, Money, PaymentMethod, PaymentTotals, Product, Sale,
    SalesReport, TopProduct,
};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::config::InsightsConfig;
use crate::error::{InsightsError, InsightsResult};

/// Label for sales whose product no longer exists in the catalog.
pub const DELETED_PRODUCT: &str = "Producto eliminado";

/// Resolves a product id to its display name.
pub fn product_name<'a>(products: &'a [Product], product_id: &str) -> &'a str {
    products
        .iter()
        .find(|p| p.id == product_id)
        .map(|p| p.name.as_str())
        .unwrap_or(DELETED_PRODUCT)
}

/// Pretty JSON for `--json` output.
pub fn to_json<T: Serialize>(value: &T) -> InsightsResult<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

// =============================================================================
// predict
// =============================================================================

/// A prediction with the product details a buyer needs next to it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionRow {
    pub name: String,
    pub category: Category,
    pub stock: Option<i64>,
    pub lead_time: u32,
    #[serde(flatten)]
    pub prediction: DemandPrediction,
}

/// Predictions for one product, or for every stock-tracked product.
pub fn predict<Tz: TimeZone>(
    config: &InsightsConfig,
    products: &[Product],
    sales: &[Sale],
    now: &DateTime<Tz>,
    product_id: Option<&str>,
) -> InsightsResult<Vec<PredictionRow>> {
    let forecaster = Forecaster::new(config.forecast);
    let lead_default = config.forecast.default_lead_time_days;

    let row = |product: &Product, prediction: DemandPrediction| PredictionRow {
        name: product.name.clone(),
        category: product.category,
        stock: product.quantity,
        lead_time: product.lead_time_or(lead_default),
        prediction,
    };

    match product_id {
        Some(id) => {
            let product = products
                .iter()
                .find(|p| p.id == id)
                .ok_or_else(|| InsightsError::UnknownProduct(id.to_string()))?;
            Ok(vec![row(product, forecaster.predict(product, sales, now))])
        }
        None => Ok(forecaster
            .predict_all(products, sales, now)
            .into_iter()
            .map(|(product, prediction)| row(product, prediction))
            .collect()),
    }
}

pub fn render_predictions(rows: &[PredictionRow]) -> String {
    if rows.is_empty() {
        return "No stock-tracked products.\n".to_string();
    }

    let mut out = String::new();
    for row in rows {
        let stock = row
            .stock
            .map_or_else(|| "N/A".to_string(), |q| q.to_string());
        let _ = writeln!(
            out,
            "- {} [{}] • stock {} • {:.2}/day • confidence {:.0}% • order {} (lead time {} days)",
            row.name,
            row.category,
            stock,
            row.prediction.predicted_demand,
            row.prediction.confidence * 100.0,
            row.prediction.suggested_order,
            row.lead_time
        );
    }
    out
}

// =============================================================================
// summary
// =============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedProduct {
    pub name: String,
    #[serde(flatten)]
    pub top: TopProduct,
}

/// Sales registered with one payment method.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodDetail {
    pub method: PaymentMethod,
    pub total: Money,
    pub sales: Vec<Sale>,
}

/// What the reports screen shows before closing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySummary {
    pub sales_count: usize,
    pub total_sales: Money,
    pub by_method: PaymentTotals,
    /// Ranking over today's sales only.
    pub top_products: Vec<RankedProduct>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method_detail: Option<MethodDetail>,
}

/// Totals over all paid sales not yet archived, ranking over today's.
pub fn summary<Tz: TimeZone>(
    config: &InsightsConfig,
    products: &[Product],
    sales: &[Sale],
    now: &DateTime<Tz>,
    method: Option<PaymentMethod>,
) -> DailySummary {
    let paid = paid_only(sales);
    let todays = filter_today(&paid, now);

    let top_products = top_products(&todays, config.report.top_limit)
        .into_iter()
        .map(|top| RankedProduct {
            name: product_name(products, &top.product_id).to_string(),
            top,
        })
        .collect();

    let method_detail = method.map(|method| {
        let sales = sales_by_method(&paid, method);
        MethodDetail {
            method,
            total: total_of(&sales),
            sales,
        }
    });

    DailySummary {
        sales_count: paid.len(),
        total_sales: total_of(&paid),
        by_method: totals_by_payment_method(&paid),
        top_products,
        method_detail,
    }
}

pub fn render_summary(summary: &DailySummary, products: &[Product]) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "Total sales: {} ({} sales)",
        summary.total_sales, summary.sales_count
    );
    for (method, amount) in summary.by_method.iter() {
        let _ = writeln!(out, "  {:<9} {}", method.as_str(), amount);
    }

    let _ = writeln!(out, "Top products today:");
    if summary.top_products.is_empty() {
        let _ = writeln!(out, "  (no sales today)");
    }
    for (rank, ranked) in summary.top_products.iter().enumerate() {
        let _ = writeln!(
            out,
            "  {}. {} • {} units • {}",
            rank + 1,
            ranked.name,
            ranked.top.quantity,
            ranked.top.total_sales
        );
    }

    if let Some(detail) = &summary.method_detail {
        let _ = writeln!(out, "Sales paid with {} ({}):", detail.method, detail.total);
        for sale in &detail.sales {
            let _ = writeln!(
                out,
                "  {} • {} x{} • {}",
                sale.date.format("%Y-%m-%d %H:%M"),
                product_name(products, &sale.product_id),
                sale.quantity,
                sale.total_price
            );
        }
    }

    out
}

// =============================================================================
// close
// =============================================================================

/// Closes the day over the paid sales and, when a drawer count is given,
/// attaches the cash reconciliation.
///
/// Refuses to produce a report when there are no paid sales.
pub fn close<Tz: TimeZone>(
    sales: &[Sale],
    now: &DateTime<Tz>,
    actual_cash: Option<Money>,
    notes: Option<&str>,
) -> InsightsResult<SalesReport> {
    let paid = paid_only(sales);
    let mut draft = close_day(&paid, now);

    if draft.is_empty() {
        return Err(InsightsError::EmptyDay);
    }

    if let Some(actual_cash) = actual_cash {
        let reconciliation = reconcile_cash(
            Uuid::new_v4().to_string(),
            &totals_by_payment_method(&paid),
            actual_cash,
            notes,
            now.with_timezone(&Utc),
        );
        draft = draft.with_reconciliation(reconciliation);
    }

    let report = draft.finalize(Uuid::new_v4().to_string());
    info!(
        report_id = %report.id,
        sales = report.sales.len(),
        total_amount = report.total_amount.units(),
        "Day closed"
    );

    Ok(report)
}

pub fn render_report(report: &SalesReport, products: &[Product]) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Report {}", report.id);
    let _ = writeln!(out, "Closed at: {}", report.date.to_rfc3339());
    let _ = writeln!(
        out,
        "Total: {} ({} sales)",
        report.total_amount,
        report.sales.len()
    );

    for (rank, top) in report.top_products.iter().enumerate() {
        let _ = writeln!(
            out,
            "  {}. {} • {} units • {}",
            rank + 1,
            product_name(products, &top.product_id),
            top.quantity,
            top.total_sales
        );
    }

    if let Some(rec) = &report.reconciliation {
        let _ = writeln!(
            out,
            "Cash: expected {} • counted {}",
            rec.expected_cash, rec.actual_cash
        );
        let verdict = match rec.variance() {
            CashVariance::Balanced => "balanced".to_string(),
            CashVariance::Surplus(amount) => format!("surplus of {}", amount),
            CashVariance::Shortage(amount) => format!("shortage of {}", amount),
        };
        let _ = writeln!(out, "Drawer: {}", verdict);
        let _ = writeln!(
            out,
            "Nequi: {} • Datafono: {}",
            rec.mobile_wallet_total, rec.card_total
        );
        if let Some(notes) = &rec.notes {
            let _ = writeln!(out, "Notes: {}", notes);
        }
    }

    out
}

// =============================================================================
// low-stock
// =============================================================================

pub fn low_stock(products: &[Product]) -> Vec<&Product> {
    inventory::low_stock(products)
}

pub fn render_low_stock(products: &[&Product]) -> String {
    if products.is_empty() {
        return "All products are above their minimum stock.\n".to_string();
    }

    let mut out = String::new();
    for product in products {
        let _ = writeln!(
            out,
            "- {} [{}] • {} left (minimum {})",
            product.name,
            product.category,
            product.quantity.unwrap_or_default(),
            product.min_stock.unwrap_or_default()
        );
    }
    out
}

// =============================================================================
// Unit Tests
// =============================================================================
