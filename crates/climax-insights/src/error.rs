//! # Insights Error Types
//!
//! Failures of the host adapter. The core itself never fails on sales data;
//! everything here is about the world around it (files, config, user input).
//!
//! ## Error Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Insights Error Categories                           │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │   Snapshots     │  │     Commands            │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  ConfigLoad     │  │  SnapshotRead   │  │  EmptyDay               │ │
//! │  │  InvalidConfig  │  │  SnapshotParse  │  │  UnknownProduct         │ │
//! │  │                 │  │                 │  │  Output                 │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for adapter operations.
pub type InsightsResult<T> = Result<T, InsightsError>;

#[derive(Debug, Error)]
pub enum InsightsError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Config file could not be read or parsed.
    #[error("Failed to load config: {0}")]
    ConfigLoad(String),

    /// Config values out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // =========================================================================
    // Snapshot Errors
    // =========================================================================
    /// Snapshot file could not be read.
    #[error("Failed to read snapshot {path}: {reason}")]
    SnapshotRead { path: PathBuf, reason: String },

    /// Snapshot file is not a JSON array.
    #[error("Snapshot {path} is not a JSON array of records: {reason}")]
    SnapshotParse { path: PathBuf, reason: String },

    // =========================================================================
    // Command Errors
    // =========================================================================
    /// Closing a day without paid sales.
    #[error("No paid sales to close")]
    EmptyDay,

    /// `--product` names a product absent from the snapshot.
    #[error("Product not found: {0}")]
    UnknownProduct(String),

    /// Rendering the output failed.
    #[error("Failed to render output: {0}")]
    Output(String),
}

impl From<std::io::Error> for InsightsError {
    fn from(err: std::io::Error) -> Self {
        InsightsError::ConfigLoad(err.to_string())
    }
}

impl From<toml::de::Error> for InsightsError {
    fn from(err: toml::de::Error) -> Self {
        InsightsError::ConfigLoad(err.to_string())
    }
}

impl From<serde_json::Error> for InsightsError {
    fn from(err: serde_json::Error) -> Self {
        InsightsError::Output(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = InsightsError::UnknownProduct("ron-viejo".to_string());
        assert_eq!(err.to_string(), "Product not found: ron-viejo");

        let err = InsightsError::SnapshotRead {
            path: PathBuf::from("sales.json"),
            reason: "missing".to_string(),
        };
        assert!(err.to_string().contains("sales.json"));
    }

    #[test]
    fn test_toml_error_maps_to_config_load() {
        let err: InsightsError = toml::from_str::<toml::Value>("= broken").unwrap_err().into();
        assert!(matches!(err, InsightsError::ConfigLoad(_)));
    }
}
