//! # Snapshot Loading
//!
//! Reads the JSON exports of the sales and product stores.
//!
//! A snapshot is a JSON array of records. Each record is decoded and validated
//! on its own: one bad row (a hand-edited price, a sale left over from a
//! deleted product with a blank id) is logged and skipped instead of failing
//! the whole report.

use std::path::Path;

use climax_core::validation::{validate_product, validate_sale, ValidationResult};
use climax_core::{Product, Sale};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{info, warn};

use crate::error::{InsightsError, InsightsResult};

/// Loads the sales snapshot at `path`.
pub fn load_sales(path: &Path) -> InsightsResult<Vec<Sale>> {
    load_records(path, validate_sale)
}

/// Loads the product snapshot at `path`.
pub fn load_products(path: &Path) -> InsightsResult<Vec<Product>> {
    load_records(path, validate_product)
}

/// Reads `path` and keeps every record that decodes as `T` and passes `check`.
///
/// Fails only when the file cannot be read or is not a JSON array.
pub fn load_records<T, F>(path: &Path, check: F) -> InsightsResult<Vec<T>>
where
    T: DeserializeOwned,
    F: Fn(&T) -> ValidationResult<()>,
{
    let contents = std::fs::read_to_string(path).map_err(|e| InsightsError::SnapshotRead {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let rows: Vec<Value> =
        serde_json::from_str(&contents).map_err(|e| InsightsError::SnapshotParse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    let total = rows.len();
    let mut records = Vec::with_capacity(total);

    for (index, row) in rows.into_iter().enumerate() {
        let record: T = match serde_json::from_value(row) {
            Ok(record) => record,
            Err(e) => {
                warn!(?path, index, error = %e, "Skipping malformed record");
                continue;
            }
        };

        if let Err(e) = check(&record) {
            warn!(?path, index, error = %e, "Skipping invalid record");
            continue;
        }

        records.push(record);
    }

    info!(?path, loaded = records.len(), skipped = total - records.len(), "Snapshot loaded");
    Ok(records)
}
