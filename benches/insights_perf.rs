//! Performance benchmarks for the hot aggregation paths.
//!
//! Run with: `cargo bench --bench insights_perf`

use chrono::{Duration, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use tweetlens::feed::TweetFeed;
use tweetlens::fetcher::map_tweet;
use tweetlens::insights::{compute_kpis, engagement_series, tweets_over_time_series};
use tweetlens::model::{MappedTweet, RawTweet, SortKey};
use tweetlens::sentiment::{Lexicon, SentimentModel};

fn sample_tweets(count: usize) -> Vec<MappedTweet> {
    let base = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();
    (0..count)
        .map(|i| {
            let raw = RawTweet {
                name: Some(format!("user{i}")),
                username: Some(format!("user{i}")),
                tweet_content: Some(format!(
                    "this is a great tweet about terrible outages number {i}"
                )),
                likes: Some((i % 500) as i64),
                replies: Some((i % 37) as i64),
                retweets: Some((i % 91) as i64),
                views: Some((i * 13 % 10_000) as i64),
                datetime: Some(base + Duration::seconds(i as i64 * 37 % 86_400)),
                batch_number: None,
            };
            map_tweet(raw, (i / 100 + 1) as u32, &Lexicon)
        })
        .collect()
}

fn bench_sentiment(c: &mut Criterion) {
    let lexicon = Lexicon;
    let text = "What an amazing launch, though the rollout was a terrible mess \
                and support was useless. Still, great work and a fantastic win overall.";

    c.bench_function("sentiment/classify", |b| {
        b.iter(|| lexicon.classify(black_box(text)));
    });
}

fn bench_kpis(c: &mut Criterion) {
    let mut group = c.benchmark_group("insights/kpis");
    for size in [100_usize, 1_000, 10_000] {
        let tweets = sample_tweets(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &tweets, |b, tweets| {
            b.iter(|| compute_kpis(black_box(tweets)));
        });
    }
    group.finish();
}

fn bench_chart_series(c: &mut Criterion) {
    let tweets = sample_tweets(1_000);

    c.bench_function("insights/engagement_series", |b| {
        b.iter(|| engagement_series(black_box(&tweets)));
    });
    c.bench_function("insights/tweets_over_time", |b| {
        b.iter(|| tweets_over_time_series(black_box(&tweets)));
    });
}

fn bench_feed_sort(c: &mut Criterion) {
    let tweets = sample_tweets(10_000);

    c.bench_function("feed/sort_by_likes", |b| {
        b.iter_batched(
            || TweetFeed::new(tweets.clone()),
            |mut feed| {
                feed.sort_by(SortKey::Likes);
                black_box(feed.page_slice().len())
            },
            criterion::BatchSize::LargeInput,
        );
    });
}

criterion_group!(
    benches,
    bench_sentiment,
    bench_kpis,
    bench_chart_series,
    bench_feed_sort
);
criterion_main!(benches);
