//! Data models for tweet dashboard data.
//!
//! `RawTweet` is the shape the store hands back; `MappedTweet` is the
//! display-ready shape after defaulting and sentiment enrichment.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Placeholder avatar used when a record carries no profile image.
pub const DEFAULT_PROFILE_PICTURE: &str = "/default-profile.png";

/// A raw tweet as stored, every field optional except what the fetcher
/// assigns. `batch_number` is tagged by the fetcher, not persisted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawTweet {
    pub profile_image: Option<String>,
    pub name: Option<String>,
    pub username: Option<String>,
    pub tweet_content: Option<String>,
    pub likes: Option<i64>,
    pub replies: Option<i64>,
    pub retweets: Option<i64>,
    pub views: Option<i64>,
    pub datetime: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch_number: Option<u32>,
}

/// A normalized, display-ready tweet.
///
/// Created fresh on every fetch and immutable afterwards; the feed
/// view-model replaces whole collections rather than mutating records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MappedTweet {
    pub batch_number: u32,
    pub profile_picture: String,
    pub name: String,
    pub username: String,
    pub text: String,
    pub likes: i64,
    pub replies: i64,
    pub retweets: i64,
    pub views: i64,
    pub datetime: DateTime<Utc>,
    pub display_time: String,
    pub sentiment: Sentiment,
}

/// Three-way sentiment label derived from lexicon scoring.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Positive => write!(f, "Positive"),
            Self::Neutral => write!(f, "Neutral"),
            Self::Negative => write!(f, "Negative"),
        }
    }
}

/// A fixed-size window over the store, ordered by timestamp descending.
///
/// `batch_number` is 1-based. The label is derived from the window's
/// boundary timestamps, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Batch {
    pub batch_number: u32,
    pub label: String,
}

/// Sort keys for the tweet feed. All orders are descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
pub enum SortKey {
    #[default]
    Latest,
    Replies,
    Retweets,
    Likes,
    Views,
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Latest => write!(f, "Latest"),
            Self::Replies => write!(f, "Replies"),
            Self::Retweets => write!(f, "Retweets"),
            Self::Likes => write!(f, "Likes"),
            Self::Views => write!(f, "Views"),
        }
    }
}
