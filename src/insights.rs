//! KPI and chart-series aggregation over mapped tweets.
//!
//! Everything here recomputes from the current collection on each call.
//! Nothing is cached: the collection is small (a handful of 100-tweet
//! batches) and recomputation keeps the numbers trivially consistent
//! with whatever selection the caller holds.

use crate::model::{MappedTweet, Sentiment};
use itertools::Itertools;
use serde::Serialize;
use std::collections::BTreeSet;

/// Chart names the dashboard can render.
pub const AVAILABLE_SERIES: &[&str] = &[
    "Engagement Metrics",
    "Sentiment Analysis",
    "Tweets Over Time",
];

/// Charts shown before the user has toggled anything.
pub const DEFAULT_SERIES: &[&str] = &["Engagement Metrics", "Sentiment Analysis"];

/// Headline numbers for the current selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Kpis {
    pub total_tweets: usize,
    pub avg_likes: f64,
    pub avg_retweets: f64,
    pub avg_replies: f64,
    /// Share of each sentiment label, percent, one decimal place.
    pub positive_pct: f64,
    pub neutral_pct: f64,
    pub negative_pct: f64,
    /// Sum of likes, retweets, and replies across the selection.
    pub total_engagements: i64,
}

/// One named line or bar group within a chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dataset {
    pub label: String,
    pub data: Vec<i64>,
}

/// A renderable chart: category labels plus one or more datasets.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub title: String,
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

fn pct(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let raw = count as f64 / total as f64 * 100.0;
    (raw * 10.0).round() / 10.0
}

fn avg(sum: i64, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    sum as f64 / total as f64
}

/// Compute the KPI snapshot for a collection of mapped tweets.
///
/// An empty collection yields all-zero KPIs, never NaN.
#[must_use]
pub fn compute_kpis(tweets: &[MappedTweet]) -> Kpis {
    let total = tweets.len();
    let likes: i64 = tweets.iter().map(|t| t.likes).sum();
    let retweets: i64 = tweets.iter().map(|t| t.retweets).sum();
    let replies: i64 = tweets.iter().map(|t| t.replies).sum();

    let positive = tweets
        .iter()
        .filter(|t| t.sentiment == Sentiment::Positive)
        .count();
    let negative = tweets
        .iter()
        .filter(|t| t.sentiment == Sentiment::Negative)
        .count();
    let neutral = total - positive - negative;

    Kpis {
        total_tweets: total,
        avg_likes: avg(likes, total),
        avg_retweets: avg(retweets, total),
        avg_replies: avg(replies, total),
        positive_pct: pct(positive, total),
        neutral_pct: pct(neutral, total),
        negative_pct: pct(negative, total),
        total_engagements: likes + retweets + replies,
    }
}

/// Per-tweet engagement bars in the collection's current order.
#[must_use]
pub fn engagement_series(tweets: &[MappedTweet]) -> ChartSeries {
    ChartSeries {
        title: "Engagement Metrics".to_string(),
        labels: (1..=tweets.len()).map(|i| format!("Tweet {i}")).collect(),
        datasets: vec![
            Dataset {
                label: "Likes".to_string(),
                data: tweets.iter().map(|t| t.likes).collect(),
            },
            Dataset {
                label: "Retweets".to_string(),
                data: tweets.iter().map(|t| t.retweets).collect(),
            },
            Dataset {
                label: "Replies".to_string(),
                data: tweets.iter().map(|t| t.replies).collect(),
            },
        ],
    }
}

/// Cumulative tweet count over time, ascending by timestamp.
///
/// Sorts a copy of the timestamps; the caller's collection order is
/// untouched.
#[must_use]
pub fn tweets_over_time_series(tweets: &[MappedTweet]) -> ChartSeries {
    let mut stamps: Vec<_> = tweets.iter().map(|t| t.datetime).collect();
    stamps.sort_unstable();

    ChartSeries {
        title: "Tweets Over Time".to_string(),
        labels: stamps
            .iter()
            .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
            .collect(),
        datasets: vec![Dataset {
            label: "Tweets".to_string(),
            data: (1..=stamps.len() as i64).collect(),
        }],
    }
}

/// Sentiment label counts as a three-bar chart.
#[must_use]
pub fn sentiment_series(tweets: &[MappedTweet]) -> ChartSeries {
    let count = |s: Sentiment| tweets.iter().filter(|t| t.sentiment == s).count() as i64;

    ChartSeries {
        title: "Sentiment Analysis".to_string(),
        labels: vec![
            "Positive".to_string(),
            "Neutral".to_string(),
            "Negative".to_string(),
        ],
        datasets: vec![Dataset {
            label: "Tweets".to_string(),
            data: vec![
                count(Sentiment::Positive),
                count(Sentiment::Neutral),
                count(Sentiment::Negative),
            ],
        }],
    }
}

/// Build every chart the caller has selected, in selection order.
#[must_use]
pub fn selected_charts(tweets: &[MappedTweet], selected: &[String]) -> Vec<ChartSeries> {
    selected
        .iter()
        .filter_map(|name| match name.as_str() {
            "Engagement Metrics" => Some(engagement_series(tweets)),
            "Sentiment Analysis" => Some(sentiment_series(tweets)),
            "Tweets Over Time" => Some(tweets_over_time_series(tweets)),
            _ => None,
        })
        .collect()
}

/// Chart and batch selection state for the insights view.
#[derive(Debug, Clone)]
pub struct InsightsState {
    /// Chart names currently shown, in toggle order.
    pub selected_series: Vec<String>,
    /// Selected batch numbers, always ascending.
    pub selected_batches: BTreeSet<u32>,
}

impl Default for InsightsState {
    fn default() -> Self {
        Self {
            selected_series: DEFAULT_SERIES.iter().map(ToString::to_string).collect(),
            selected_batches: BTreeSet::from([1]),
        }
    }
}

impl InsightsState {
    /// Toggle a chart on or off. Unknown names are ignored.
    pub fn toggle_series(&mut self, name: &str) {
        if !AVAILABLE_SERIES.contains(&name) {
            return;
        }
        if let Some(pos) = self.selected_series.iter().position(|s| s == name) {
            self.selected_series.remove(pos);
        } else {
            self.selected_series.push(name.to_string());
        }
    }

    /// Toggle a batch in the selection. An emptied selection is legal
    /// here; the fetch side falls back to batch 1 when the query string
    /// names no batches.
    pub fn toggle_batch(&mut self, number: u32) {
        if !self.selected_batches.remove(&number) {
            self.selected_batches.insert(number);
        }
    }

    /// The selection as a slice-ready vector, ascending.
    #[must_use]
    pub fn batch_numbers(&self) -> Vec<u32> {
        self.selected_batches.iter().copied().collect()
    }

    /// The selection rendered as a `batches=` query string.
    #[must_use]
    pub fn batches_query(&self) -> String {
        format!("batches={}", self.selected_batches.iter().join(","))
    }
}
