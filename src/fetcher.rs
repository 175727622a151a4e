//! Window fetching and display-shape mapping.
//!
//! Pulls the selected batch windows from the store, tags each record with
//! the batch number it was requested under, and normalizes the optional
//! store fields into the display shape the feed and insights consume.

use crate::error::Result;
use crate::model::{MappedTweet, RawTweet, DEFAULT_PROFILE_PICTURE};
use crate::sentiment::SentimentModel;
use crate::{format_relative_time, BATCH_SIZE};
use chrono::Utc;
use std::collections::BTreeSet;
use tracing::{debug, error};

/// Fetch the selected batches and map them into display records.
///
/// Batches are fetched in the order given. A failed window fetch aborts
/// the whole call with `Err`; callers that want the render-empty behavior
/// should go through [`fetch_and_map`].
pub fn fetch_batches<F, M>(
    batch_numbers: &[u32],
    batch_size: usize,
    mut fetch_window: F,
    model: &M,
) -> Result<Vec<MappedTweet>>
where
    F: FnMut(usize, usize) -> Result<Vec<RawTweet>>,
    M: SentimentModel,
{
    let mut mapped = Vec::new();
    for &number in batch_numbers {
        let offset = (number.max(1) as usize - 1) * batch_size;
        let window = fetch_window(offset, batch_size)?;
        debug!(batch = number, tweets = window.len(), "Fetched batch window");
        mapped.extend(window.into_iter().map(|raw| map_tweet(raw, number, model)));
    }
    Ok(mapped)
}

/// Fetch-and-map with the dashboard's failure policy: any store error is
/// logged and the result is an empty collection, so the view renders
/// empty instead of crashing.
pub fn fetch_and_map<F, M>(
    batch_numbers: &[u32],
    batch_size: usize,
    fetch_window: F,
    model: &M,
) -> Vec<MappedTweet>
where
    F: FnMut(usize, usize) -> Result<Vec<RawTweet>>,
    M: SentimentModel,
{
    match fetch_batches(batch_numbers, batch_size, fetch_window, model) {
        Ok(mapped) => mapped,
        Err(e) => {
            error!(error = %e, "Error fetching tweets");
            Vec::new()
        }
    }
}

/// Normalize one raw record into the display shape.
///
/// Missing fields get stable defaults: placeholder avatar, "Unknown" /
/// "unknown" identity, zeroed counters, and the current time for an
/// absent timestamp.
pub fn map_tweet<M: SentimentModel>(raw: RawTweet, batch_number: u32, model: &M) -> MappedTweet {
    let text = raw.tweet_content.unwrap_or_default();
    let sentiment = model.classify(&text);
    let datetime = raw.datetime.unwrap_or_else(Utc::now);

    MappedTweet {
        batch_number,
        profile_picture: raw
            .profile_image
            .unwrap_or_else(|| DEFAULT_PROFILE_PICTURE.to_string()),
        name: raw.name.unwrap_or_else(|| "Unknown".to_string()),
        username: raw.username.unwrap_or_else(|| "unknown".to_string()),
        likes: raw.likes.unwrap_or(0),
        replies: raw.replies.unwrap_or(0),
        retweets: raw.retweets.unwrap_or(0),
        views: raw.views.unwrap_or(0),
        display_time: format_relative_time(datetime),
        datetime,
        sentiment,
        text,
    }
}

/// Parse a `batches=` style selection string into batch numbers.
///
/// Input order is preserved because it decides the fetch concatenation
/// order. Parsing is permissive: tokens that are not positive integers
/// are dropped, duplicates keep their first position, and an empty or
/// absent selection falls back to batch 1.
#[must_use]
pub fn parse_batches_param(raw: Option<&str>) -> Vec<u32> {
    let mut seen = BTreeSet::new();
    let selected: Vec<u32> = raw
        .unwrap_or("")
        .split(',')
        .filter_map(|token| token.trim().parse::<u32>().ok())
        .filter(|&n| n > 0 && seen.insert(n))
        .collect();

    if selected.is_empty() {
        vec![1]
    } else {
        selected
    }
}

/// Convenience wrapper using the library-wide batch size.
pub fn fetch_default<F, M>(batch_numbers: &[u32], fetch_window: F, model: &M) -> Vec<MappedTweet>
where
    F: FnMut(usize, usize) -> Result<Vec<RawTweet>>,
    M: SentimentModel,
{
    fetch_and_map(batch_numbers, BATCH_SIZE, fetch_window, model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LensError;
    use crate::model::Sentiment;
    use crate::sentiment::Lexicon;
    use chrono::TimeZone;

    fn raw(text: &str) -> RawTweet {
        RawTweet {
            tweet_content: Some(text.to_string()),
            ..RawTweet::default()
        }
    }

    #[test]
    fn map_applies_defaults_for_missing_fields() {
        let mapped = map_tweet(RawTweet::default(), 3, &Lexicon);
        assert_eq!(mapped.batch_number, 3);
        assert_eq!(mapped.profile_picture, DEFAULT_PROFILE_PICTURE);
        assert_eq!(mapped.name, "Unknown");
        assert_eq!(mapped.username, "unknown");
        assert_eq!(mapped.text, "");
        assert_eq!(mapped.likes, 0);
        assert_eq!(mapped.replies, 0);
        assert_eq!(mapped.retweets, 0);
        assert_eq!(mapped.views, 0);
        assert_eq!(mapped.sentiment, Sentiment::Neutral);
        // Absent timestamp defaults to roughly now.
        assert!(Utc::now().signed_duration_since(mapped.datetime).num_seconds() < 5);
    }

    #[test]
    fn map_preserves_present_fields() {
        let dt = chrono::Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).single();
        let mapped = map_tweet(
            RawTweet {
                profile_image: Some("/me.png".to_string()),
                name: Some("Ada".to_string()),
                username: Some("ada".to_string()),
                tweet_content: Some("what a great launch".to_string()),
                likes: Some(12),
                replies: Some(3),
                retweets: Some(4),
                views: Some(900),
                datetime: dt,
                batch_number: None,
            },
            1,
            &Lexicon,
        );
        assert_eq!(mapped.name, "Ada");
        assert_eq!(mapped.likes, 12);
        assert_eq!(mapped.datetime, dt.unwrap());
        assert_eq!(mapped.sentiment, Sentiment::Positive);
    }

    #[test]
    fn batches_are_fetched_in_request_order_and_tagged() {
        let mapped = fetch_and_map(
            &[2, 1],
            5,
            |offset, _| {
                Ok(vec![raw(&format!("tweet at offset {offset}"))])
            },
            &Lexicon,
        );
        assert_eq!(mapped.len(), 2);
        assert_eq!(mapped[0].batch_number, 2);
        assert_eq!(mapped[0].text, "tweet at offset 5");
        assert_eq!(mapped[1].batch_number, 1);
        assert_eq!(mapped[1].text, "tweet at offset 0");
    }

    #[test]
    fn store_failure_yields_empty_collection() {
        let mapped = fetch_and_map(
            &[1, 2],
            100,
            |_, _| -> Result<Vec<RawTweet>> {
                Err(LensError::invalid_argument("store offline"))
            },
            &Lexicon,
        );
        assert!(mapped.is_empty());
    }

    #[test]
    fn parse_batches_param_is_permissive() {
        assert_eq!(parse_batches_param(Some("1,2,3")), vec![1, 2, 3]);
        assert_eq!(parse_batches_param(Some("2,2,abc,-1,0")), vec![2]);
        assert_eq!(parse_batches_param(Some("")), vec![1]);
        assert_eq!(parse_batches_param(Some("nope")), vec![1]);
        assert_eq!(parse_batches_param(None), vec![1]);
    }

    #[test]
    fn parse_batches_param_preserves_query_order() {
        assert_eq!(parse_batches_param(Some("2,1")), vec![2, 1]);
        assert_eq!(parse_batches_param(Some("3, 1 ,2")), vec![3, 1, 2]);
        // Duplicates keep their first position.
        assert_eq!(parse_batches_param(Some("2,1,2")), vec![2, 1]);
    }
}
