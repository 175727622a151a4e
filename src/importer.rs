//! Tweet file importer.
//!
//! Reads a JSON array or JSONL file of tweet objects into [`RawTweet`]
//! records. Parsing is lenient on purpose: every display field is
//! optional in the store, so a record missing fields still imports and
//! picks up defaults at fetch time. Only records that are not JSON
//! objects at all are rejected.

use crate::error::{LensError, Result};
use crate::model::RawTweet;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::path::Path;
use tracing::{info, warn};

/// Parse a tweets file into raw records.
///
/// Accepts either a single JSON array or one JSON object per line.
/// Non-object entries are skipped with a warning.
///
/// # Errors
///
/// Returns [`LensError::ParseError`] when the file is neither a JSON
/// array nor line-delimited JSON objects.
pub fn parse_file(path: impl AsRef<Path>) -> Result<Vec<RawTweet>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;
    let file = path.display().to_string();

    let tweets = if content.trim_start().starts_with('[') {
        parse_json_array(&content, &file)?
    } else {
        parse_jsonl(&content, &file)?
    };

    info!("Parsed {} tweets from {}", tweets.len(), file);
    Ok(tweets)
}

fn parse_json_array(content: &str, file: &str) -> Result<Vec<RawTweet>> {
    let data: Value = serde_json::from_str(content)
        .map_err(|e| LensError::parse_error(file, e.to_string()))?;

    let items = data
        .as_array()
        .ok_or_else(|| LensError::parse_error(file, "expected a JSON array of tweet objects"))?;

    Ok(items
        .iter()
        .filter_map(|item| parse_record(item, file))
        .collect())
}

fn parse_jsonl(content: &str, file: &str) -> Result<Vec<RawTweet>> {
    let mut tweets = Vec::new();
    for (idx, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let item: Value = serde_json::from_str(line)
            .map_err(|e| LensError::parse_error(file, format!("line {}: {e}", idx + 1)))?;
        if let Some(tweet) = parse_record(&item, file) {
            tweets.push(tweet);
        }
    }
    Ok(tweets)
}

fn parse_record(item: &Value, file: &str) -> Option<RawTweet> {
    if !item.is_object() {
        warn!("Skipping non-object entry in {}", file);
        return None;
    }

    Some(RawTweet {
        profile_image: string_field(item, &["profileImage", "profile_image"]),
        name: string_field(item, &["name"]),
        username: string_field(item, &["username", "screen_name"]),
        tweet_content: string_field(item, &["tweetContent", "tweet_content", "text"]),
        likes: count_field(item, &["likes", "favorite_count"]),
        replies: count_field(item, &["replies", "reply_count"]),
        retweets: count_field(item, &["retweets", "retweet_count"]),
        views: count_field(item, &["views", "view_count"]),
        datetime: string_field(item, &["datetimeAttribute", "datetime", "created_at"])
            .as_deref()
            .and_then(parse_timestamp),
        batch_number: None,
    })
}

fn string_field(item: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|key| item[*key].as_str())
        .map(String::from)
}

// Counters appear both as numbers and as numeric strings in the wild.
fn count_field(item: &Value, keys: &[&str]) -> Option<i64> {
    keys.iter().find_map(|key| {
        let value = &item[*key];
        value
            .as_i64()
            .or_else(|| value.as_str().and_then(|s| s.parse().ok()))
    })
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|| {
            // X export format: "Fri Jan 09 15:12:21 +0000 2026"
            DateTime::parse_from_str(raw, "%a %b %d %H:%M:%S %z %Y")
                .ok()
                .map(|dt| dt.with_timezone(&Utc))
        })
}
