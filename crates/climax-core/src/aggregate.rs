//! # Sales Aggregation
//!
//! Roll-ups consumed by the reporting screens and the day closing.
//!
//! ## Operations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Sales Aggregator                                │
//! │                                                                         │
//! │  [Sale] ──┬──► total_of()                 ──► Money                    │
//! │           ├──► totals_by_payment_method() ──► PaymentTotals (3 keys)   │
//! │           ├──► top_products(limit)        ──► [TopProduct] ranked      │
//! │           ├──► filter_today(now)          ──► [Sale] same local day    │
//! │           └──► close_day(now)             ──► ReportDraft              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `productId` is an opaque key here. Resolving it to a product name is the
//! renderer's job, and an id whose product was deleted is aggregated like any
//! other.

use std::collections::HashMap;

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use ts_rs::TS;

use crate::calendar::same_local_day;
use crate::money::Money;
use crate::types::{PaymentMethod, ReportDraft, Sale, TopProduct};

/// Entries kept by [`top_products`] when the caller has no preference.
pub const DEFAULT_TOP_LIMIT: usize = 5;

// =============================================================================
// Payment Totals
// =============================================================================

/// Amount collected per payment method.
///
/// All three methods are always present (zero when unused), so screens can
/// index them without checking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PaymentTotals {
    #[serde(rename = "efectivo")]
    pub cash: Money,

    #[serde(rename = "nequi")]
    pub mobile_wallet: Money,

    #[serde(rename = "datafono")]
    pub card: Money,
}

impl PaymentTotals {
    pub fn get(&self, method: PaymentMethod) -> Money {
        match method {
            PaymentMethod::Cash => self.cash,
            PaymentMethod::MobileWallet => self.mobile_wallet,
            PaymentMethod::Card => self.card,
        }
    }

    fn slot_mut(&mut self, method: PaymentMethod) -> &mut Money {
        match method {
            PaymentMethod::Cash => &mut self.cash,
            PaymentMethod::MobileWallet => &mut self.mobile_wallet,
            PaymentMethod::Card => &mut self.card,
        }
    }

    /// `(method, amount)` pairs in report order.
    pub fn iter(&self) -> impl Iterator<Item = (PaymentMethod, Money)> + '_ {
        PaymentMethod::ALL
            .into_iter()
            .map(move |method| (method, self.get(method)))
    }

    /// Sum over all methods.
    pub fn total(&self) -> Money {
        self.cash + self.mobile_wallet + self.card
    }
}

// =============================================================================
// Aggregations
// =============================================================================

/// Sum of `totalPrice`. Callers usually pass paid sales only.
pub fn total_of(sales: &[Sale]) -> Money {
    sales.iter().map(|sale| sale.total_price).sum()
}

/// Sum of `totalPrice` grouped by payment method.
pub fn totals_by_payment_method(sales: &[Sale]) -> PaymentTotals {
    sales.iter().fold(PaymentTotals::default(), |mut totals, sale| {
        *totals.slot_mut(sale.payment_method) += sale.total_price;
        totals
    })
}

/// Best-selling products by amount.
///
/// Groups by `productId` summing quantity and `totalPrice`, ranks descending by
/// amount and keeps at most `limit` entries. Ties keep first-seen order.
pub fn top_products(sales: &[Sale], limit: usize) -> Vec<TopProduct> {
    let mut ranked: Vec<TopProduct> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for sale in sales {
        let slot = *index.entry(sale.product_id.as_str()).or_insert_with(|| {
            ranked.push(TopProduct {
                product_id: sale.product_id.clone(),
                quantity: 0,
                total_sales: Money::zero(),
            });
            ranked.len() - 1
        });

        let entry = &mut ranked[slot];
        entry.quantity += u64::from(sale.quantity);
        entry.total_sales += sale.total_price;
    }

    // `sort_by` is stable: equal amounts keep first-seen order.
    ranked.sort_by(|a, b| b.total_sales.cmp(&a.total_sales));
    ranked.truncate(limit);
    ranked
}

/// Sales registered on the same local calendar day as `now`.
pub fn filter_today<Tz: TimeZone>(sales: &[Sale], now: &DateTime<Tz>) -> Vec<Sale> {
    sales
        .iter()
        .filter(|sale| same_local_day(&sale.date, now))
        .cloned()
        .collect()
}

/// Paid sales only.
pub fn paid_only(sales: &[Sale]) -> Vec<Sale> {
    sales.iter().filter(|sale| sale.is_paid()).cloned().collect()
}

/// Sales settled with `method`, as listed in the per-method detail view.
pub fn sales_by_method(sales: &[Sale], method: PaymentMethod) -> Vec<Sale> {
    sales
        .iter()
        .filter(|sale| sale.payment_method == method)
        .cloned()
        .collect()
}

/// Closes the day over `paid_sales`.
///
/// The draft archives every sale given, totals all of them, and ranks only the
/// ones from `now`'s local day. An empty input produces an empty draft;
/// refusing to archive it is up to the caller (see [`ReportDraft::is_empty`]).
pub fn close_day<Tz: TimeZone>(paid_sales: &[Sale], now: &DateTime<Tz>) -> ReportDraft {
    let todays = filter_today(paid_sales, now);
    let draft = ReportDraft {
        date: now.with_timezone(&Utc),
        sales: paid_sales.to_vec(),
        total_amount: total_of(paid_sales),
        top_products: top_products(&todays, DEFAULT_TOP_LIMIT),
        reconciliation: None,
    };

    debug!(
        sales = draft.sales.len(),
        todays_sales = todays.len(),
        total_amount = draft.total_amount.units(),
        "Closed sales day"
    );

    draft
}

// =============================================================================
// Unit Tests
// =============================================================================
