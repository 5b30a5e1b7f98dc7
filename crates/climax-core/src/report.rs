//! # Day Closing
//!
//! Turns the aggregator's output into an archived [`SalesReport`] and counts
//! the cash drawer.
//!
//! ## Closing Workflow
//! ```text
//! paid sales ──► close_day(now) ──► ReportDraft
//!                                        │
//! counted cash ──► reconcile_cash() ─────┤ with_reconciliation()
//!                                        ▼
//!                                  is_empty()? ── yes ──► caller refuses
//!                                        │ no
//!                                        ▼
//!                                  finalize(id) ──► SalesReport
//! ```

use chrono::{DateTime, Utc};

use crate::aggregate::PaymentTotals;
use crate::money::Money;
use crate::types::{CashReconciliation, ReportDraft, SalesReport};

// =============================================================================
// Cash Reconciliation
// =============================================================================

/// Outcome of counting the drawer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CashVariance {
    Balanced,
    /// More cash than expected (sobrante).
    Surplus(Money),
    /// Less cash than expected (faltante).
    Shortage(Money),
}

/// Compares counted cash against the cash the day's sales recorded.
///
/// Blank notes are dropped.
pub fn reconcile_cash(
    id: impl Into<String>,
    totals: &PaymentTotals,
    actual_cash: Money,
    notes: Option<&str>,
    timestamp: DateTime<Utc>,
) -> CashReconciliation {
    let expected_cash = totals.cash;

    CashReconciliation {
        id: id.into(),
        expected_cash,
        actual_cash,
        difference: actual_cash - expected_cash,
        mobile_wallet_total: totals.mobile_wallet,
        card_total: totals.card,
        notes: notes
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string),
        timestamp,
    }
}

impl CashReconciliation {
    pub fn variance(&self) -> CashVariance {
        if self.difference.is_zero() {
            CashVariance::Balanced
        } else if self.difference.is_positive() {
            CashVariance::Surplus(self.difference)
        } else {
            CashVariance::Shortage(self.difference.abs())
        }
    }
}

// =============================================================================
// Report Draft
// =============================================================================

impl ReportDraft {
    /// A draft with no sales. Archiving it is refused by the register.
    pub fn is_empty(&self) -> bool {
        self.sales.is_empty()
    }

    pub fn with_reconciliation(mut self, reconciliation: CashReconciliation) -> Self {
        self.reconciliation = Some(reconciliation);
        self
    }

    /// Assigns the id under which the report is archived.
    pub fn finalize(self, id: impl Into<String>) -> SalesReport {
        SalesReport {
            id: id.into(),
            date: self.date,
            sales: self.sales,
            total_amount: self.total_amount,
            top_products: self.top_products,
            reconciliation: self.reconciliation,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{close_day, totals_by_payment_method};
    use crate::types::{PaymentMethod, Sale, SaleStatus};
    use chrono::TimeZone;

    fn closing_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 11, 4, 30, 0).unwrap()
    }

    fn totals() -> PaymentTotals {
        PaymentTotals {
            cash: Money::from_units(120_000),
            mobile_wallet: Money::from_units(45_000),
            card: Money::from_units(80_000),
        }
    }

    #[test]
    fn test_reconcile_balanced() {
        let rec = reconcile_cash("r-1", &totals(), Money::from_units(120_000), None, closing_time());

        assert_eq!(rec.expected_cash.units(), 120_000);
        assert!(rec.difference.is_zero());
        assert_eq!(rec.mobile_wallet_total.units(), 45_000);
        assert_eq!(rec.card_total.units(), 80_000);
        assert_eq!(rec.variance(), CashVariance::Balanced);
    }

    #[test]
    fn test_reconcile_shortage_and_surplus() {
        let short = reconcile_cash("r-2", &totals(), Money::from_units(110_000), None, closing_time());
        assert_eq!(short.difference.units(), -10_000);
        assert_eq!(short.variance(), CashVariance::Shortage(Money::from_units(10_000)));

        let over = reconcile_cash("r-3", &totals(), Money::from_units(125_000), None, closing_time());
        assert_eq!(over.variance(), CashVariance::Surplus(Money::from_units(5_000)));
    }

    #[test]
    fn test_reconcile_drops_blank_notes() {
        let blank = reconcile_cash("r-4", &totals(), Money::zero(), Some("   "), closing_time());
        assert!(blank.notes.is_none());

        let noted = reconcile_cash(
            "r-5",
            &totals(),
            Money::zero(),
            Some(" billete roto "),
            closing_time(),
        );
        assert_eq!(noted.notes.as_deref(), Some("billete roto"));
    }

    #[test]
    fn test_finalize_keeps_draft_content() {
        let sale = Sale {
            id: "s-1".to_string(),
            product_id: "aguila".to_string(),
            quantity: 2,
            total_price: Money::from_units(10_000),
            payment_method: PaymentMethod::Cash,
            date: Utc.with_ymd_and_hms(2024, 5, 11, 2, 0, 0).unwrap(),
            status: SaleStatus::Paid,
            table_number: Some("3".to_string()),
        };
        let sales = vec![sale];

        let draft = close_day(&sales, &closing_time());
        let rec = reconcile_cash(
            "r-6",
            &totals_by_payment_method(&sales),
            Money::from_units(10_000),
            None,
            closing_time(),
        );

        let report = draft.clone().with_reconciliation(rec.clone()).finalize("rep-1");
        assert_eq!(report.id, "rep-1");
        assert_eq!(report.sales, draft.sales);
        assert_eq!(report.total_amount, draft.total_amount);
        assert_eq!(report.top_products, draft.top_products);
        assert_eq!(report.reconciliation, Some(rec));

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["totalAmount"], 10_000);
        assert_eq!(value["topProducts"][0]["totalSales"], 10_000);
        assert_eq!(value["reconciliation"]["expectedCash"], 10_000);
    }
}
