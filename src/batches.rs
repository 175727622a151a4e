//! Batch window indexing.
//!
//! A batch is a fixed-size window over the store ordered by timestamp
//! descending, identified by a 1-based index. Labels carry the window's
//! boundary timestamps at minute precision.
//!
//! Batch numbering is best effort: the count query and the per-window
//! queries are separate statements, so a concurrent writer can shift
//! windows between them. An empty window despite a positive count is the
//! observable symptom and is skipped with a warning.

use crate::error::Result;
use crate::model::{Batch, RawTweet};
use crate::storage::Storage;
use chrono::{DateTime, Utc};
use tracing::warn;

/// Compute the available batches over `total_count` records.
///
/// Returns `ceil(total_count / batch_size)` descriptors when every window
/// is non-empty and fetchable, fewer otherwise: a failed window fetch is
/// logged and skipped rather than aborting the whole listing, and empty
/// windows are dropped. Batch numbers are a contiguous ascending run
/// starting at 1, minus any skipped entries.
pub fn compute_batches<F>(total_count: usize, batch_size: usize, mut fetch_window: F) -> Vec<Batch>
where
    F: FnMut(usize, usize) -> Result<Vec<RawTweet>>,
{
    if batch_size == 0 {
        return Vec::new();
    }

    let total_batches = total_count.div_ceil(batch_size);
    let mut batches = Vec::with_capacity(total_batches);

    for number in 1..=total_batches {
        let offset = (number - 1) * batch_size;

        let window = match fetch_window(offset, batch_size) {
            Ok(window) => window,
            Err(e) => {
                warn!(batch = number, error = %e, "Skipping batch: window fetch failed");
                continue;
            }
        };

        // Guards against the count/window race: records deleted after the
        // count query leave a trailing empty window.
        if window.is_empty() {
            warn!(batch = number, "Skipping batch: window empty despite count");
            continue;
        }

        let first = window.first().and_then(|t| t.datetime);
        let last = window.last().and_then(|t| t.datetime);
        batches.push(Batch {
            batch_number: u32::try_from(number).unwrap_or(u32::MAX),
            label: format!(
                "Batch {number}: {} - {}",
                format_boundary(first),
                format_boundary(last)
            ),
        });
    }

    batches
}

/// Compute batches directly from a store.
///
/// # Errors
///
/// Returns an error only if the initial count query fails; individual
/// window failures degrade to a partial listing.
pub fn batches_for(storage: &Storage, batch_size: usize) -> Result<Vec<Batch>> {
    let total = storage.count_tweets()?;
    Ok(compute_batches(total, batch_size, |offset, limit| {
        storage.window(offset, limit)
    }))
}

fn format_boundary(dt: Option<DateTime<Utc>>) -> String {
    dt.map_or_else(
        || "unknown".to_string(),
        |dt| dt.format("%Y-%m-%d %H:%M").to_string(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LensError;
    use chrono::TimeZone;

    fn window_of(hours: std::ops::Range<u32>) -> Vec<RawTweet> {
        hours
            .map(|h| RawTweet {
                datetime: Utc.with_ymd_and_hms(2025, 3, 1, h % 24, 0, 0).single(),
                ..RawTweet::default()
            })
            .collect()
    }

    #[test]
    fn batch_count_is_ceiling_of_total_over_size() {
        let batches = compute_batches(250, 100, |offset, _| {
            let len = (250 - offset).min(100) as u32;
            Ok(window_of(0..len))
        });
        assert_eq!(batches.len(), 3);
        let numbers: Vec<u32> = batches.iter().map(|b| b.batch_number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
    }

    #[test]
    fn exact_multiple_has_no_partial_batch() {
        let batches = compute_batches(200, 100, |_, _| Ok(window_of(0..5)));
        assert_eq!(batches.len(), 2);
    }

    #[test]
    fn zero_total_yields_no_batches() {
        let batches = compute_batches(0, 100, |_, _| Ok(window_of(0..5)));
        assert!(batches.is_empty());
    }

    #[test]
    fn zero_batch_size_yields_no_batches() {
        let batches = compute_batches(100, 0, |_, _| Ok(window_of(0..5)));
        assert!(batches.is_empty());
    }

    #[test]
    fn empty_window_is_skipped() {
        // Count said 150, but the second window vanished under us.
        let batches = compute_batches(150, 100, |offset, _| {
            if offset == 0 {
                Ok(window_of(0..10))
            } else {
                Ok(Vec::new())
            }
        });
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].batch_number, 1);
    }

    #[test]
    fn failed_window_is_skipped_not_fatal() {
        let batches = compute_batches(300, 100, |offset, _| {
            if offset == 100 {
                Err(LensError::invalid_argument("window unavailable"))
            } else {
                Ok(window_of(0..10))
            }
        });
        let numbers: Vec<u32> = batches.iter().map(|b| b.batch_number).collect();
        assert_eq!(numbers, vec![1, 3]);
    }

    #[test]
    fn label_carries_boundary_timestamps_at_minute_precision() {
        let first = Utc.with_ymd_and_hms(2025, 3, 1, 18, 45, 59).single();
        let last = Utc.with_ymd_and_hms(2025, 2, 27, 6, 5, 1).single();
        let batches = compute_batches(2, 100, |_, _| {
            Ok(vec![
                RawTweet {
                    datetime: first,
                    ..RawTweet::default()
                },
                RawTweet {
                    datetime: last,
                    ..RawTweet::default()
                },
            ])
        });
        assert_eq!(
            batches[0].label,
            "Batch 1: 2025-03-01 18:45 - 2025-02-27 06:05"
        );
    }

    #[test]
    fn missing_boundary_timestamp_falls_back() {
        let batches = compute_batches(1, 100, |_, _| Ok(vec![RawTweet::default()]));
        assert_eq!(batches[0].label, "Batch 1: unknown - unknown");
    }

    #[test]
    fn batches_for_reads_the_store() {
        let mut storage = Storage::open_memory().unwrap();
        let tweets: Vec<RawTweet> = (0..7)
            .map(|h| RawTweet {
                datetime: Utc.with_ymd_and_hms(2025, 3, 1, h, 0, 0).single(),
                ..RawTweet::default()
            })
            .collect();
        storage.store_tweets(&tweets).unwrap();

        let batches = batches_for(&storage, 5).unwrap();
        assert_eq!(batches.len(), 2);
        assert_eq!(batches[0].batch_number, 1);
        assert_eq!(batches[1].batch_number, 2);
    }
}
