//! # Demand Forecasting
//!
//! Estimates near-term daily demand for a product from its sales history and
//! sizes a reorder.
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      predict_demand(product, sales, now)                │
//! │                                                                         │
//! │  sales ──► daily_demand() ──► [d1 .. d30]  (paid only, oldest first)   │
//! │                                   │                                     │
//! │              ┌────────────────────┼────────────────────┐                │
//! │              ▼                    ▼                    ▼                │
//! │   weighted_moving_average   population_std_dev    lead time             │
//! │      Σ d·i / Σ i              √(Σ(d-wma)² / N)    (product or 7)        │
//! │              │                    │                    │                │
//! │              └─────────┬──────────┘                    │                │
//! │                        ▼                               ▼                │
//! │     confidence = clamp(1 - σ / max(wma, 1))   order = ⌈wma·L⌉ + ⌈σ·z⌉   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Reading the Numbers
//! - `z = 1.645` is a 90% one-sided service level under a normal demand
//!   assumption.
//! - A product that never sold gets `predicted_demand = 0` and
//!   `confidence = 1`: there is no variability, so the model is sure demand is
//!   zero.
//! - Products selling less than one unit a day are divided by 1 rather than by
//!   their average, so any variance at all drags their confidence down sharply.
//!   Screens already rely on this range.
//!
//! Nothing here fails. Any input, however degenerate, yields a structurally
//! valid prediction.

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calendar::day_window;
use crate::types::{DemandPrediction, Product, Sale, DEFAULT_LEAD_TIME_DAYS};

// =============================================================================
// Constants
// =============================================================================

/// Days of history looked at, today included.
pub const DEFAULT_WINDOW_DAYS: usize = 30;

/// Standard deviations of safety stock for a 90% service level.
pub const SERVICE_LEVEL_90_Z: f64 = 1.645;

// =============================================================================
// Settings
// =============================================================================

/// Tunables for the forecaster. Defaults reproduce the register's behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastSettings {
    /// Length of the trailing history window in days.
    pub window_days: usize,

    /// Lead time for products that do not configure one.
    pub default_lead_time_days: u32,

    /// Safety stock multiplier applied to the daily standard deviation.
    pub service_level_z: f64,
}

impl Default for ForecastSettings {
    fn default() -> Self {
        ForecastSettings {
            window_days: DEFAULT_WINDOW_DAYS,
            default_lead_time_days: DEFAULT_LEAD_TIME_DAYS,
            service_level_z: SERVICE_LEVEL_90_Z,
        }
    }
}

// =============================================================================
// Forecaster
// =============================================================================

/// Demand predictor bound to a set of [`ForecastSettings`].
///
/// Holds no state besides its settings; every call is a pure function of its
/// arguments.
#[derive(Debug, Clone, Copy, Default)]
pub struct Forecaster {
    settings: ForecastSettings,
}

impl Forecaster {
    pub fn new(settings: ForecastSettings) -> Self {
        Forecaster { settings }
    }

    /// Predicts daily demand for `product` and the quantity to reorder.
    pub fn predict<Tz: TimeZone>(
        &self,
        product: &Product,
        sales: &[Sale],
        now: &DateTime<Tz>,
    ) -> DemandPrediction {
        let series = daily_demand(sales, &product.id, now, self.settings.window_days);

        let average = weighted_moving_average(&series);
        let std_dev = population_std_dev(&series, average);
        let lead_time = product.lead_time_or(self.settings.default_lead_time_days);

        DemandPrediction {
            product_id: product.id.clone(),
            predicted_demand: average,
            confidence: confidence(average, std_dev),
            suggested_order: suggested_order(
                average,
                std_dev,
                lead_time,
                self.settings.service_level_z,
            ),
        }
    }

    /// Predictions for every stock-tracked product, in catalog order.
    ///
    /// Made-to-order products (`quantity: null`) are never reordered as such
    /// and are left out.
    pub fn predict_all<'a, Tz: TimeZone>(
        &self,
        products: &'a [Product],
        sales: &[Sale],
        now: &DateTime<Tz>,
    ) -> Vec<(&'a Product, DemandPrediction)> {
        products
            .iter()
            .filter(|product| product.is_stock_tracked())
            .map(|product| {
                let prediction = self.predict(product, sales, now);
                debug!(
                    product_id = %product.id,
                    predicted_demand = prediction.predicted_demand,
                    confidence = prediction.confidence,
                    suggested_order = prediction.suggested_order,
                    "Predicted demand"
                );
                (product, prediction)
            })
            .collect()
    }
}

/// Predicts demand with the default settings (30 days, 7 day lead time,
/// 90% service level).
pub fn predict_demand<Tz: TimeZone>(
    product: &Product,
    sales: &[Sale],
    now: &DateTime<Tz>,
) -> DemandPrediction {
    Forecaster::default().predict(product, sales, now)
}

// =============================================================================
// Building Blocks
// =============================================================================

/// Units of `product_id` sold per local day over the trailing `days` days,
/// oldest first, today last.
///
/// Only paid sales count. Pending sales and other products never leak into a
/// bucket; a day without sales contributes 0.
pub fn daily_demand<Tz: TimeZone>(
    sales: &[Sale],
    product_id: &str,
    now: &DateTime<Tz>,
    days: usize,
) -> Vec<u64> {
    let window = day_window(now, days);
    let mut demand = vec![0u64; window.len()];

    let relevant = sales
        .iter()
        .filter(|sale| sale.product_id == product_id && sale.is_paid());

    for sale in relevant {
        // Buckets are contiguous and sorted, so a binary search finds the day.
        let slot = window.partition_point(|bucket| bucket.end <= sale.date);
        if let Some(bucket) = window.get(slot) {
            if bucket.contains(&sale.date) {
                demand[slot] += u64::from(sale.quantity);
            }
        }
    }

    demand
}

/// Linearly weighted average: the oldest value weighs 1, the newest weighs `n`.
///
/// Returns 0 for an empty series.
pub fn weighted_moving_average(series: &[u64]) -> f64 {
    let (weighted_sum, weight_sum) = series
        .iter()
        .enumerate()
        .fold((0.0, 0.0), |(acc, weights), (index, &value)| {
            let weight = (index + 1) as f64;
            (acc + value as f64 * weight, weights + weight)
        });

    if weight_sum == 0.0 {
        return 0.0;
    }

    weighted_sum / weight_sum
}

/// Population standard deviation (divides by N) of `series` around `center`.
pub fn population_std_dev(series: &[u64], center: f64) -> f64 {
    if series.is_empty() {
        return 0.0;
    }

    let variance = series
        .iter()
        .map(|&value| {
            let diff = value as f64 - center;
            diff * diff
        })
        .sum::<f64>()
        / series.len() as f64;

    variance.sqrt()
}

/// `1 - σ / max(average, 1)`, clamped to `[0, 1]`.
pub fn confidence(average: f64, std_dev: f64) -> f64 {
    (1.0 - std_dev / average.max(1.0)).clamp(0.0, 1.0)
}

/// Extra units held against demand variability.
pub fn safety_stock(std_dev: f64, service_level_z: f64) -> u64 {
    (std_dev * service_level_z).ceil().max(0.0) as u64
}

/// Units to reorder: demand over the lead time plus safety stock.
pub fn suggested_order(
    average: f64,
    std_dev: f64,
    lead_time_days: u32,
    service_level_z: f64,
) -> u64 {
    let lead_time_demand = (average * f64::from(lead_time_days)).ceil().max(0.0) as u64;
    lead_time_demand + safety_stock(std_dev, service_level_z)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use crate::types::{Category, PaymentMethod, SaleStatus};
    use chrono::{Duration, FixedOffset, Utc};

    const EPS: f64 = 1e-9;

    fn tz() -> FixedOffset {
        FixedOffset::west_opt(5 * 3600).unwrap()
    }

    fn now() -> DateTime<FixedOffset> {
        tz().with_ymd_and_hms(2024, 5, 30, 18, 0, 0).unwrap()
    }

    fn product(lead_time: Option<u32>) -> Product {
        Product {
            id: "aguila".to_string(),
            name: "Águila".to_string(),
            category: Category::Beers,
            quantity: Some(48),
            price: Money::from_units(5_000),
            min_stock: Some(24),
            supplier: Some("Bavaria".to_string()),
            lead_time,
            image_url: None,
            description: None,
        }
    }

    /// A sale at local noon, `days_ago` days before `now()`.
    fn sale(product_id: &str, days_ago: i64, quantity: u32, status: SaleStatus) -> Sale {
        let noon = tz().with_ymd_and_hms(2024, 5, 30, 12, 0, 0).unwrap() - Duration::days(days_ago);
        Sale {
            id: format!("{}-{}-{}", product_id, days_ago, quantity),
            product_id: product_id.to_string(),
            quantity,
            total_price: Money::from_units(5_000) * quantity,
            payment_method: PaymentMethod::Cash,
            date: noon.with_timezone(&Utc),
            status,
            table_number: None,
        }
    }

    /// Paid sales producing the given daily series (oldest first).
    fn history(series: &[u32]) -> Vec<Sale> {
        let last = series.len() as i64 - 1;
        series
            .iter()
            .enumerate()
            .filter(|(_, &qty)| qty > 0)
            .map(|(index, &qty)| sale("aguila", last - index as i64, qty, SaleStatus::Paid))
            .collect()
    }

    #[test]
    fn test_empty_history_predicts_zero_with_full_confidence() {
        let prediction = predict_demand(&product(None), &[], &now());

        assert_eq!(prediction.product_id, "aguila");
        assert_eq!(prediction.predicted_demand, 0.0);
        assert_eq!(prediction.confidence, 1.0);
        assert_eq!(prediction.suggested_order, 0);
    }

    #[test]
    fn test_constant_demand_is_fully_confident() {
        let sales = history(&[4; 30]);
        let prediction = predict_demand(&product(Some(3)), &sales, &now());

        assert!((prediction.predicted_demand - 4.0).abs() < EPS);
        assert!((prediction.confidence - 1.0).abs() < EPS);
        assert_eq!(prediction.suggested_order, 12);
    }

    #[test]
    fn test_step_change_scenario() {
        let mut series = vec![0u32; 14];
        series.extend(std::iter::repeat(10).take(16));
        let sales = history(&series);

        let prediction = predict_demand(&product(Some(7)), &sales, &now());

        // Days 15..=30 carry the demand: Σ 10·i / Σ i = 3600 / 465.
        let expected_average = 3600.0 / 465.0;
        assert!((prediction.predicted_demand - expected_average).abs() < EPS);

        let demand: Vec<u64> = series.iter().map(|&q| q as u64).collect();
        let std_dev = population_std_dev(&demand, expected_average);
        assert!(std_dev > 0.0);

        assert!(prediction.confidence > 0.0 && prediction.confidence < 1.0);
        let expected_order =
            (expected_average * 7.0).ceil() as u64 + (std_dev * SERVICE_LEVEL_90_Z).ceil() as u64;
        assert_eq!(prediction.suggested_order, expected_order);
    }

    #[test]
    fn test_pending_and_foreign_sales_are_ignored() {
        let sales = vec![
            sale("aguila", 0, 5, SaleStatus::Pending),
            sale("poker", 0, 9, SaleStatus::Paid),
            sale("aguila", 1, 2, SaleStatus::Paid),
        ];

        let series = daily_demand(&sales, "aguila", &now(), 30);
        assert_eq!(series.len(), 30);
        assert_eq!(series[29], 0);
        assert_eq!(series[28], 2);
        assert_eq!(series.iter().sum::<u64>(), 2);
    }

    #[test]
    fn test_sales_outside_window_are_ignored() {
        let sales = vec![
            sale("aguila", 30, 7, SaleStatus::Paid),
            sale("aguila", -1, 7, SaleStatus::Paid),
        ];

        let series = daily_demand(&sales, "aguila", &now(), 30);
        assert!(series.iter().all(|&units| units == 0));
    }

    #[test]
    fn test_same_day_sales_accumulate() {
        let sales = vec![
            sale("aguila", 0, 2, SaleStatus::Paid),
            sale("aguila", 0, 3, SaleStatus::Paid),
        ];

        let series = daily_demand(&sales, "aguila", &now(), 30);
        assert_eq!(series[29], 5);
    }

    #[test]
    fn test_low_volume_confidence_uses_unit_floor() {
        // Average well below 1: the divisor is 1, not the average.
        let series: [u64; 4] = [0, 0, 0, 1];
        let average = weighted_moving_average(&series);
        let std_dev = population_std_dev(&series, average);

        assert!(average < 1.0);
        assert!((confidence(average, std_dev) - (1.0 - std_dev)).abs() < EPS);
    }

    #[test]
    fn test_confidence_is_clamped() {
        assert_eq!(confidence(2.0, 10.0), 0.0);
        assert_eq!(confidence(0.0, 0.0), 1.0);
    }

    #[test]
    fn test_weighted_average_favours_recent_days() {
        assert!((weighted_moving_average(&[0, 0, 6]) - 3.0).abs() < EPS);
        assert!((weighted_moving_average(&[6, 0, 0]) - 1.0).abs() < EPS);
        assert_eq!(weighted_moving_average(&[]), 0.0);
    }

    #[test]
    fn test_default_lead_time_applies() {
        let sales = history(&[1; 30]);
        let prediction = predict_demand(&product(None), &sales, &now());
        assert_eq!(prediction.suggested_order, 7);
    }

    #[test]
    fn test_custom_settings() {
        let forecaster = Forecaster::new(ForecastSettings {
            window_days: 7,
            default_lead_time_days: 2,
            service_level_z: 2.0,
        });

        let sales = history(&[3; 7]);
        let prediction = forecaster.predict(&product(None), &sales, &now());
        assert!((prediction.predicted_demand - 3.0).abs() < EPS);
        assert_eq!(prediction.suggested_order, 6);
    }

    #[test]
    fn test_irregular_week_rounds_both_terms_up() {
        let forecaster = Forecaster::new(ForecastSettings {
            window_days: 7,
            ..ForecastSettings::default()
        });

        // Weighted sum 91 over weights 28.
        let sales = history(&[3, 0, 5, 1, 0, 8, 3]);
        let prediction = forecaster.predict(&product(Some(5)), &sales, &now());
        assert!((prediction.predicted_demand - 3.25).abs() < EPS);

        // Squared deviations from 3.25 sum to 51.9375; σ ≈ 2.7239.
        let std_dev = (51.9375f64 / 7.0).sqrt();
        assert!((prediction.confidence - (1.0 - std_dev / 3.25)).abs() < EPS);

        // ceil(16.25) + ceil(4.4808); truncating either term gives 21.
        assert_eq!(prediction.suggested_order, 17 + 5);
    }

    #[test]
    fn test_prediction_is_idempotent() {
        let sales = history(&[1, 0, 4, 2, 0, 7, 3]);
        let first = predict_demand(&product(Some(5)), &sales, &now());
        let second = predict_demand(&product(Some(5)), &sales, &now());
        assert_eq!(first, second);
    }

    #[test]
    fn test_predict_all_skips_untracked_products() {
        let mut mojito = product(None);
        mojito.id = "mojito".to_string();
        mojito.category = Category::Cocktails;
        mojito.quantity = None;

        let products = vec![product(Some(7)), mojito];
        let sales = history(&[2; 30]);

        let predictions = Forecaster::default().predict_all(&products, &sales, &now());
        assert_eq!(predictions.len(), 1);
        assert_eq!(predictions[0].0.id, "aguila");
        assert!((predictions[0].1.predicted_demand - 2.0).abs() < EPS);
    }
}
