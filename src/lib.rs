//! tweetlens - batched tweet dashboards from a local store
//!
//! This library turns a store of tweets into dashboard data: fixed-size
//! batches over a timestamp-descending collection, normalized display
//! records with sentiment labels, KPI and chart-series aggregation, and a
//! sortable, paginated feed view-model.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface definitions
//! - [`error`] - Custom error types with rich context
//! - [`model`] - Tweet, batch, and sentiment data models
//! - [`storage`] - `SQLite` storage layer
//! - [`batches`] - Batch window indexing and labeling
//! - [`fetcher`] - Window fetching and display-shape mapping
//! - [`sentiment`] - Lexicon-based sentiment classification
//! - [`insights`] - KPI and chart-series aggregation
//! - [`feed`] - Sortable, paginated feed view-model
//! - [`ask`] - Chat-completion client for data questions
//! - [`server`] - JSON HTTP API

pub mod ask;
pub mod batches;
pub mod cli;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod feed;
pub mod fetcher;
pub mod importer;
pub mod insights;
pub mod logging;
pub mod model;
pub mod sentiment;
pub mod server;
pub mod storage;

pub use cli::*;
pub use error::{LensError, Result};
pub use model::*;
pub use storage::Storage;

use chrono::{DateTime, Datelike, Utc};

/// Default database filename
pub const DEFAULT_DB_NAME: &str = "tweetlens.db";

/// Records per batch window over the store.
pub const BATCH_SIZE: usize = 100;

/// Tweets shown per page in the feed view.
pub const FEED_PAGE_SIZE: usize = 5;

/// Get the default data directory for tweetlens
#[must_use]
pub fn default_data_dir() -> std::path::PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join("tweetlens")
}

/// Get the default database path
#[must_use]
pub fn default_db_path() -> std::path::PathBuf {
    default_data_dir().join(DEFAULT_DB_NAME)
}

/// Format an integer with thousands separators.
#[must_use]
pub fn format_number(value: i64) -> String {
    let abs = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(abs.len() + abs.len() / 3);

    for (idx, ch) in abs.chars().rev().enumerate() {
        if idx > 0 && idx % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }

    let mut formatted: String = out.chars().rev().collect();
    if value < 0 {
        formatted.insert(0, '-');
    }
    formatted
}

/// Format a datetime as a human-friendly relative string.
///
/// Uses smart thresholds for readability:
/// - < 1 minute: "just now"
/// - < 1 hour: "Nm ago"
/// - < 24 hours: "Nh ago"
/// - < 7 days: "Nd ago"
/// - Same calendar year: "Mon D"
/// - Different year: "Mon D, YYYY"
#[must_use]
pub fn format_relative_time(dt: DateTime<Utc>) -> String {
    format_relative_time_with_base(dt, Utc::now())
}

/// Format a datetime relative to a fixed base time (useful for tests).
#[must_use]
pub fn format_relative_time_with_base(dt: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let duration = now.signed_duration_since(dt);

    // Handle future dates (shouldn't happen, but be safe)
    if duration.num_seconds() < 0 {
        return dt.format("%b %d, %Y").to_string();
    }

    let seconds = duration.num_seconds();
    let minutes = duration.num_minutes();
    let hours = duration.num_hours();
    let days = duration.num_days();

    if seconds < 60 {
        "just now".to_string()
    } else if minutes < 60 {
        format!("{minutes}m ago")
    } else if hours < 24 {
        format!("{hours}h ago")
    } else if days < 7 {
        format!("{days}d ago")
    } else if dt.year() == now.year() {
        dt.format("%b %d").to_string()
    } else {
        dt.format("%b %d, %Y").to_string()
    }
}
