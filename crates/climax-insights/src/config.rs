//! # Insights Configuration
//!
//! Tunables for the forecaster and the report screens, plus where the
//! snapshot files live.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Command line flags (--sales, --products)                           │
//! │                                                                         │
//! │  2. Environment Variables                                              │
//! │     CLIMAX_WINDOW_DAYS=30                                              │
//! │     CLIMAX_SALES_PATH=/srv/climax/sales.json                           │
//! │                                                                         │
//! │  3. TOML Config File                                                   │
//! │     ~/.config/climax/insights.toml (Linux)                             │
//! │     ~/Library/Application Support/co.climax.bar/insights.toml (macOS)  │
//! │                                                                         │
//! │  4. Default Values (lowest priority)                                   │
//! │     30 day window, 7 day lead time, 90% service level, top 5           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # insights.toml
//! [forecast]
//! window_days = 30
//! default_lead_time_days = 7
//! service_level_z = 1.645
//!
//! [report]
//! top_limit = 5
//!
//! [data]
//! sales_path = "/srv/climax/sales.json"
//! products_path = "/srv/climax/products.json"
//! ```

use std::path::PathBuf;

use climax_core::forecast::ForecastSettings;
use climax_core::{DEFAULT_TOP_LIMIT, MAX_LEAD_TIME_DAYS};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{InsightsError, InsightsResult};

/// Longest history the forecaster may be asked to look at.
pub const MAX_WINDOW_DAYS: usize = 366;

// =============================================================================
// Report Settings
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSettings {
    /// Entries shown in the "top products" ranking of the summary.
    #[serde(default = "default_top_limit")]
    pub top_limit: usize,
}

fn default_top_limit() -> usize {
    DEFAULT_TOP_LIMIT
}

impl Default for ReportSettings {
    fn default() -> Self {
        ReportSettings {
            top_limit: default_top_limit(),
        }
    }
}

// =============================================================================
// Data Settings
// =============================================================================

/// Location of the JSON snapshots exported by the sales and product stores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataSettings {
    #[serde(default = "default_sales_path")]
    pub sales_path: PathBuf,

    #[serde(default = "default_products_path")]
    pub products_path: PathBuf,
}

fn default_sales_path() -> PathBuf {
    PathBuf::from("sales.json")
}

fn default_products_path() -> PathBuf {
    PathBuf::from("products.json")
}

impl Default for DataSettings {
    fn default() -> Self {
        DataSettings {
            sales_path: default_sales_path(),
            products_path: default_products_path(),
        }
    }
}

// =============================================================================
// Main Configuration
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InsightsConfig {
    #[serde(default)]
    pub forecast: ForecastSettings,

    #[serde(default)]
    pub report: ReportSettings,

    #[serde(default)]
    pub data: DataSettings,
}

impl InsightsConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (insights.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> InsightsResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading insights config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load insights config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Validates the configuration.
    pub fn validate(&self) -> InsightsResult<()> {
        let forecast = &self.forecast;

        if forecast.window_days == 0 || forecast.window_days > MAX_WINDOW_DAYS {
            return Err(InsightsError::InvalidConfig(format!(
                "forecast.window_days must be between 1 and {}, got {}",
                MAX_WINDOW_DAYS, forecast.window_days
            )));
        }

        if forecast.default_lead_time_days == 0
            || forecast.default_lead_time_days > MAX_LEAD_TIME_DAYS
        {
            return Err(InsightsError::InvalidConfig(format!(
                "forecast.default_lead_time_days must be between 1 and {}, got {}",
                MAX_LEAD_TIME_DAYS, forecast.default_lead_time_days
            )));
        }

        if !forecast.service_level_z.is_finite() || forecast.service_level_z < 0.0 {
            return Err(InsightsError::InvalidConfig(format!(
                "forecast.service_level_z must be a non-negative number, got {}",
                forecast.service_level_z
            )));
        }

        if self.report.top_limit == 0 {
            return Err(InsightsError::InvalidConfig(
                "report.top_limit must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies `CLIMAX_*` overrides read through `lookup`.
    ///
    /// Unparseable numbers are ignored with a warning.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(days) = lookup("CLIMAX_WINDOW_DAYS") {
            match days.parse::<usize>() {
                Ok(d) => {
                    debug!(window_days = d, "Overriding forecast window from environment");
                    self.forecast.window_days = d;
                }
                Err(_) => warn!(value = %days, "Ignoring invalid CLIMAX_WINDOW_DAYS"),
            }
        }

        if let Some(days) = lookup("CLIMAX_LEAD_TIME_DAYS") {
            match days.parse::<u32>() {
                Ok(d) => self.forecast.default_lead_time_days = d,
                Err(_) => warn!(value = %days, "Ignoring invalid CLIMAX_LEAD_TIME_DAYS"),
            }
        }

        if let Some(z) = lookup("CLIMAX_SERVICE_LEVEL_Z") {
            match z.parse::<f64>() {
                Ok(v) => self.forecast.service_level_z = v,
                Err(_) => warn!(value = %z, "Ignoring invalid CLIMAX_SERVICE_LEVEL_Z"),
            }
        }

        if let Some(limit) = lookup("CLIMAX_TOP_LIMIT") {
            match limit.parse::<usize>() {
                Ok(l) => self.report.top_limit = l,
                Err(_) => warn!(value = %limit, "Ignoring invalid CLIMAX_TOP_LIMIT"),
            }
        }

        if let Some(path) = lookup("CLIMAX_SALES_PATH") {
            debug!(path = %path, "Overriding sales snapshot path from environment");
            self.data.sales_path = PathBuf::from(path);
        }

        if let Some(path) = lookup("CLIMAX_PRODUCTS_PATH") {
            debug!(path = %path, "Overriding products snapshot path from environment");
            self.data.products_path = PathBuf::from(path);
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("co", "climax", "bar")
            .map(|dirs| dirs.config_dir().join("insights.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = InsightsConfig::default();
        assert_eq!(config.forecast.window_days, 30);
        assert_eq!(config.forecast.default_lead_time_days, 7);
        assert!((config.forecast.service_level_z - 1.645).abs() < 1e-12);
        assert_eq!(config.report.top_limit, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[forecast]\nwindow_days = 14\n\n[data]\nsales_path = \"/tmp/ventas.json\"").unwrap();

        let config = InsightsConfig::load(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(config.forecast.window_days, 14);
        assert_eq!(config.forecast.default_lead_time_days, 7);
        assert_eq!(config.data.sales_path, PathBuf::from("/tmp/ventas.json"));
        assert_eq!(config.data.products_path, PathBuf::from("products.json"));
        assert_eq!(config.report.top_limit, 5);
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[report]\ntop_limit = 0").unwrap();

        let result = InsightsConfig::load(Some(file.path().to_path_buf()));
        assert!(matches!(result, Err(InsightsError::InvalidConfig(_))));
    }

    #[test]
    fn test_load_or_default_on_broken_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[forecast\nwindow_days = ").unwrap();

        let config = InsightsConfig::load_or_default(Some(file.path().to_path_buf()));
        assert_eq!(config, InsightsConfig::default());
    }

    #[test]
    fn test_env_overrides_win_over_file_values() {
        let mut config = InsightsConfig::default();
        config.forecast.window_days = 14;

        config.apply_overrides(env(&[
            ("CLIMAX_WINDOW_DAYS", "21"),
            ("CLIMAX_TOP_LIMIT", "10"),
            ("CLIMAX_PRODUCTS_PATH", "/srv/climax/productos.json"),
        ]));

        assert_eq!(config.forecast.window_days, 21);
        assert_eq!(config.report.top_limit, 10);
        assert_eq!(
            config.data.products_path,
            PathBuf::from("/srv/climax/productos.json")
        );
    }

    #[test]
    fn test_invalid_env_values_are_ignored() {
        let mut config = InsightsConfig::default();
        config.apply_overrides(env(&[
            ("CLIMAX_WINDOW_DAYS", "treinta"),
            ("CLIMAX_SERVICE_LEVEL_Z", "alto"),
        ]));

        assert_eq!(config.forecast.window_days, 30);
        assert!((config.forecast.service_level_z - 1.645).abs() < 1e-12);
    }

    #[test]
    fn test_config_validation() {
        let mut config = InsightsConfig::default();

        config.forecast.window_days = 0;
        assert!(config.validate().is_err());

        config.forecast.window_days = 30;
        config.forecast.service_level_z = -1.0;
        assert!(config.validate().is_err());

        config.forecast.service_level_z = f64::NAN;
        assert!(config.validate().is_err());

        config.forecast.service_level_z = 2.33;
        config.forecast.default_lead_time_days = 0;
        assert!(config.validate().is_err());

        config.forecast.default_lead_time_days = 3;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_toml_serialization() {
        let config = InsightsConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[forecast]"));
        assert!(toml_str.contains("[report]"));
        assert!(toml_str.contains("[data]"));
    }
}
