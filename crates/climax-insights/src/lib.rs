//! # climax-insights: Host Adapter for climax-core
//!
//! Loads configuration and the JSON snapshots exported by the bar's sales and
//! product stores, runs the core computations, and renders the result.
//!
//! ## Responsibilities
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        climax-insights                                  │
//! │                                                                         │
//! │   config.rs    TOML + CLIMAX_* env + defaults                          │
//! │   snapshot.rs  sales.json / products.json, bad rows skipped            │
//! │   commands.rs  predict • summary • close • low-stock                   │
//! │   error.rs     InsightsError → stderr + non-zero exit                  │
//! │                                                                         │
//! │   Owns the clock and the logger; climax-core owns neither.             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod commands;
pub mod config;
pub mod error;
pub mod snapshot;

pub use config::InsightsConfig;
pub use error::{InsightsError, InsightsResult};
