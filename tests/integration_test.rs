//! Integration tests for tweetlens.
//!
//! These tests exercise the library end to end against an in-memory
//! store: import-shaped records in, batch indexing, fetching/mapping,
//! aggregation, and the feed view-model on top.

use chrono::{Duration, TimeZone, Utc};
use tweetlens::batches::batches_for;
use tweetlens::feed::{PageItem, TweetFeed};
use tweetlens::fetcher::{fetch_and_map, parse_batches_param};
use tweetlens::insights::{compute_kpis, InsightsState};
use tweetlens::model::{RawTweet, Sentiment, SortKey};
use tweetlens::sentiment::Lexicon;
use tweetlens::storage::Storage;

fn seed_tweets(count: i64) -> Vec<RawTweet> {
    let base = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();
    (0..count)
        .map(|i| RawTweet {
            name: Some(format!("user{i}")),
            username: Some(format!("user{i}")),
            tweet_content: Some(if i % 3 == 0 {
                format!("great news number {i}")
            } else if i % 3 == 1 {
                format!("terrible outage number {i}")
            } else {
                format!("release notes number {i}")
            }),
            likes: Some(i),
            replies: Some(i * 2),
            retweets: Some(i % 5),
            views: Some(i * 10),
            datetime: Some(base + Duration::minutes(i)),
            ..RawTweet::default()
        })
        .collect()
}

fn seeded_store(count: i64) -> Storage {
    let mut storage = Storage::open_memory().unwrap();
    storage.store_tweets(&seed_tweets(count)).unwrap();
    storage
}

#[test]
fn batches_cover_the_whole_store() {
    let storage = seeded_store(250);

    let batches = batches_for(&storage, 100).unwrap();
    assert_eq!(batches.len(), 3);
    let numbers: Vec<u32> = batches.iter().map(|b| b.batch_number).collect();
    assert_eq!(numbers, vec![1, 2, 3]);

    // Newest record leads batch 1's label.
    assert!(batches[0].label.starts_with("Batch 1: 2025-03-01 04:09"));
    // Oldest record trails the last label.
    assert!(batches[2].label.ends_with("2025-03-01 00:00"));
}

#[test]
fn fetch_maps_store_windows_into_display_records() {
    let storage = seeded_store(250);

    let tweets = fetch_and_map(
        &[2],
        100,
        |offset, limit| storage.window(offset, limit),
        &Lexicon,
    );

    assert_eq!(tweets.len(), 100);
    assert!(tweets.iter().all(|t| t.batch_number == 2));
    // Batch 2 holds minutes 149 down to 50.
    assert_eq!(tweets[0].name, "user149");
    assert_eq!(tweets[99].name, "user50");
    assert!(tweets
        .iter()
        .filter(|t| t.text.starts_with("great"))
        .all(|t| t.sentiment == Sentiment::Positive));
}

#[test]
fn multi_batch_fetch_preserves_request_order() {
    let storage = seeded_store(250);

    let tweets = fetch_and_map(
        &[3, 1],
        100,
        |offset, limit| storage.window(offset, limit),
        &Lexicon,
    );

    assert_eq!(tweets.len(), 150);
    assert_eq!(tweets[0].batch_number, 3);
    assert_eq!(tweets[50].batch_number, 1);
}

#[test]
fn kpis_come_out_consistent_for_a_window() {
    let storage = seeded_store(7);

    let tweets = fetch_and_map(
        &[1],
        100,
        |offset, limit| storage.window(offset, limit),
        &Lexicon,
    );
    let kpis = compute_kpis(&tweets);

    assert_eq!(kpis.total_tweets, 7);
    // likes 0..=6 average 3.0, replies double that.
    assert_eq!(kpis.avg_likes, 3.0);
    assert_eq!(kpis.avg_replies, 6.0);
    let pct_sum = kpis.positive_pct + kpis.neutral_pct + kpis.negative_pct;
    assert!((pct_sum - 100.0).abs() < 0.2);
    assert!(kpis.positive_pct > 0.0);
    assert!(kpis.negative_pct > 0.0);
}

#[test]
fn empty_store_renders_empty_everywhere() {
    let storage = Storage::open_memory().unwrap();

    let batches = batches_for(&storage, 100).unwrap();
    assert!(batches.is_empty());

    let tweets = fetch_and_map(
        &[1],
        100,
        |offset, limit| storage.window(offset, limit),
        &Lexicon,
    );
    assert!(tweets.is_empty());

    let kpis = compute_kpis(&tweets);
    assert_eq!(kpis.total_tweets, 0);
    assert_eq!(kpis.avg_likes, 0.0);
    assert_eq!(kpis.positive_pct, 0.0);

    let feed = TweetFeed::new(tweets);
    assert_eq!(feed.total_pages(), 0);
    assert!(feed.pager().is_none());
}

#[test]
fn feed_over_fetched_window_sorts_and_pages() {
    let storage = seeded_store(23);

    let tweets = fetch_and_map(
        &[1],
        100,
        |offset, limit| storage.window(offset, limit),
        &Lexicon,
    );
    let mut feed = TweetFeed::new(tweets);

    assert_eq!(feed.total_pages(), 5);
    assert_eq!(feed.page_slice().len(), 5);

    feed.sort_by(SortKey::Likes);
    assert_eq!(feed.page_slice()[0].likes, 22);

    feed.last_page();
    assert_eq!(feed.page_slice().len(), 3);
    let pager = feed.pager().unwrap();
    assert!(pager.at_last);
    assert!(pager.items.contains(&PageItem::Page(5)));
}

#[test]
fn every_sort_key_orders_descending() {
    let storage = seeded_store(23);
    let tweets = fetch_and_map(
        &[1],
        100,
        |offset, limit| storage.window(offset, limit),
        &Lexicon,
    );

    for key in [
        SortKey::Latest,
        SortKey::Replies,
        SortKey::Retweets,
        SortKey::Likes,
        SortKey::Views,
    ] {
        let mut feed = TweetFeed::new(tweets.clone());
        feed.sort_by(key);
        let ordered = feed.tweets();
        for pair in ordered.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            let descending = match key {
                SortKey::Latest => a.datetime >= b.datetime,
                SortKey::Replies => a.replies >= b.replies,
                SortKey::Retweets => a.retweets >= b.retweets,
                SortKey::Likes => a.likes >= b.likes,
                SortKey::Views => a.views >= b.views,
            };
            assert!(descending, "sort by {key} not descending");
        }
    }
}

#[test]
fn batch_selection_round_trips_through_the_query_string() {
    let mut state = InsightsState::default();
    state.toggle_batch(3);
    state.toggle_batch(2);

    let query = state.batches_query();
    assert_eq!(query, "batches=1,2,3");

    let parsed = parse_batches_param(query.strip_prefix("batches="));
    assert_eq!(parsed, state.batch_numbers());
}

#[test]
fn reimport_after_clear_resets_batch_numbering() {
    let mut storage = seeded_store(150);
    assert_eq!(batches_for(&storage, 100).unwrap().len(), 2);

    storage.clear().unwrap();
    storage.store_tweets(&seed_tweets(50)).unwrap();

    let batches = batches_for(&storage, 100).unwrap();
    assert_eq!(batches.len(), 1);
    assert_eq!(batches[0].batch_number, 1);
}
