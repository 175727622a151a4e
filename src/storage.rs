//! `SQLite` storage for tweet data.
//!
//! Stands in for the document store the dashboard reads from. The query
//! surface is deliberately narrow: count, and find-sort-skip-limit with a
//! descending sort on the timestamp column.

use crate::error::{LensError, Result};
use crate::model::RawTweet;
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection};
use std::path::Path;
use tracing::info;

const SCHEMA_VERSION: i32 = 1;

fn parse_rfc3339_opt(value: Option<String>) -> Option<DateTime<Utc>> {
    value
        .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

/// `SQLite` storage manager
pub struct Storage {
    conn: Connection,
}

impl Storage {
    /// Open or create the database at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn open(db_path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(db_path.as_ref())?;

        // Set pragmas for performance
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA cache_size = -64000;
            PRAGMA temp_store = MEMORY;
            ",
        )?;

        let storage = Self { conn };
        storage.migrate()?;
        Ok(storage)
    }

    /// Open an existing database, failing if nothing has been imported yet.
    ///
    /// # Errors
    ///
    /// Returns [`LensError::StoreNotFound`] if the file does not exist.
    pub fn open_existing(db_path: impl AsRef<Path>) -> Result<Self> {
        if !db_path.as_ref().exists() {
            return Err(LensError::store_not_found(db_path.as_ref()));
        }
        Self::open(db_path)
    }

    /// Open an in-memory database (for testing).
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be initialized.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA temp_store = MEMORY;")?;
        let storage = Self { conn };
        storage.migrate()?;
        Ok(storage)
    }

    /// Get a reference to the underlying database connection.
    #[must_use]
    pub const fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Run database migrations
    fn migrate(&self) -> Result<()> {
        let current_version = self.get_schema_version();

        if current_version > SCHEMA_VERSION {
            return Err(LensError::SchemaMismatch {
                expected: SCHEMA_VERSION,
                found: current_version,
            });
        }

        if current_version < SCHEMA_VERSION {
            info!(
                "Migrating store from version {} to {}",
                current_version, SCHEMA_VERSION
            );
            self.create_schema()?;
            self.set_schema_version(SCHEMA_VERSION)?;
        }

        Ok(())
    }

    fn get_schema_version(&self) -> i32 {
        let result: std::result::Result<i32, _> = self.conn.query_row(
            "SELECT value FROM meta WHERE key = 'schema_version'",
            [],
            |row| {
                let value: String = row.get(0)?;
                Ok(value.parse().unwrap_or(0))
            },
        );

        // Treat missing schema table as version 0.
        result.unwrap_or_default()
    }

    fn set_schema_version(&self, version: i32) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO meta (key, value) VALUES ('schema_version', ?)",
            params![version.to_string()],
        )?;
        Ok(())
    }

    fn create_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            r"
            -- Metadata table
            CREATE TABLE IF NOT EXISTS meta (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );

            -- Tweets, all display fields optional
            CREATE TABLE IF NOT EXISTS tweets (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                profile_image TEXT,
                name TEXT,
                username TEXT,
                tweet_content TEXT,
                likes INTEGER,
                replies INTEGER,
                retweets INTEGER,
                views INTEGER,
                datetime_attr TEXT
            );
            CREATE INDEX IF NOT EXISTS idx_tweets_datetime ON tweets(datetime_attr DESC);
            ",
        )?;
        Ok(())
    }

    /// Store a slice of raw tweets in one transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails; nothing is committed in that
    /// case.
    pub fn store_tweets(&mut self, tweets: &[RawTweet]) -> Result<usize> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO tweets
                 (profile_image, name, username, tweet_content,
                  likes, replies, retweets, views, datetime_attr)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            )?;
            for tweet in tweets {
                stmt.execute(params![
                    tweet.profile_image,
                    tweet.name,
                    tweet.username,
                    tweet.tweet_content,
                    tweet.likes,
                    tweet.replies,
                    tweet.retweets,
                    tweet.views,
                    tweet
                        .datetime
                        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Secs, true)),
                ])?;
            }
        }
        tx.commit()?;
        info!("Stored {} tweets", tweets.len());
        Ok(tweets.len())
    }

    /// Total number of tweets in the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the count query fails.
    pub fn count_tweets(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM tweets", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or(0))
    }

    /// Fetch one window of tweets ordered by timestamp descending.
    ///
    /// This is the find-sort-skip-limit surface batch indexing and the
    /// fetcher are built on. `SQLite` sorts NULL timestamps last under
    /// DESC, so undated records trail the window sequence.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn window(&self, offset: usize, limit: usize) -> Result<Vec<RawTweet>> {
        let mut stmt = self.conn.prepare(
            "SELECT profile_image, name, username, tweet_content,
                    likes, replies, retweets, views, datetime_attr
             FROM tweets
             ORDER BY datetime_attr DESC
             LIMIT ?1 OFFSET ?2",
        )?;

        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let offset = i64::try_from(offset).unwrap_or(i64::MAX);
        let rows = stmt.query_map(params![limit, offset], |row| {
            Ok(RawTweet {
                profile_image: row.get(0)?,
                name: row.get(1)?,
                username: row.get(2)?,
                tweet_content: row.get(3)?,
                likes: row.get(4)?,
                replies: row.get(5)?,
                retweets: row.get(6)?,
                views: row.get(7)?,
                datetime: parse_rfc3339_opt(row.get(8)?),
                batch_number: None,
            })
        })?;

        let mut tweets = Vec::new();
        for row in rows {
            tweets.push(row?);
        }
        Ok(tweets)
    }

    /// Delete all tweets (for forced re-import).
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn clear(&self) -> Result<usize> {
        let deleted = self.conn.execute("DELETE FROM tweets", [])?;
        info!("Cleared {} tweets from the store", deleted);
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn tweet_at(hour: u32, text: &str) -> RawTweet {
        RawTweet {
            tweet_content: Some(text.to_string()),
            datetime: Utc.with_ymd_and_hms(2025, 3, 1, hour, 30, 0).single(),
            likes: Some(1),
            ..RawTweet::default()
        }
    }

    #[test]
    fn store_and_count_round_trip() {
        let mut storage = Storage::open_memory().unwrap();
        assert_eq!(storage.count_tweets().unwrap(), 0);

        let tweets = vec![tweet_at(9, "a"), tweet_at(10, "b"), tweet_at(11, "c")];
        storage.store_tweets(&tweets).unwrap();
        assert_eq!(storage.count_tweets().unwrap(), 3);
    }

    #[test]
    fn window_is_sorted_descending() {
        let mut storage = Storage::open_memory().unwrap();
        let tweets = vec![tweet_at(9, "old"), tweet_at(11, "new"), tweet_at(10, "mid")];
        storage.store_tweets(&tweets).unwrap();

        let window = storage.window(0, 10).unwrap();
        assert_eq!(window.len(), 3);
        assert_eq!(window[0].tweet_content.as_deref(), Some("new"));
        assert_eq!(window[1].tweet_content.as_deref(), Some("mid"));
        assert_eq!(window[2].tweet_content.as_deref(), Some("old"));
    }

    #[test]
    fn window_respects_offset_and_limit() {
        let mut storage = Storage::open_memory().unwrap();
        let tweets: Vec<RawTweet> = (0..7).map(|h| tweet_at(h, &format!("t{h}"))).collect();
        storage.store_tweets(&tweets).unwrap();

        let first = storage.window(0, 5).unwrap();
        let rest = storage.window(5, 5).unwrap();
        assert_eq!(first.len(), 5);
        assert_eq!(rest.len(), 2);

        let past_end = storage.window(7, 5).unwrap();
        assert!(past_end.is_empty());
    }

    #[test]
    fn undated_tweets_sort_last() {
        let mut storage = Storage::open_memory().unwrap();
        let undated = RawTweet {
            tweet_content: Some("undated".to_string()),
            ..RawTweet::default()
        };
        storage.store_tweets(&[undated, tweet_at(12, "dated")]).unwrap();

        let window = storage.window(0, 10).unwrap();
        assert_eq!(window[0].tweet_content.as_deref(), Some("dated"));
        assert_eq!(window[1].tweet_content.as_deref(), Some("undated"));
        assert!(window[1].datetime.is_none());
    }

    #[test]
    fn clear_empties_the_store() {
        let mut storage = Storage::open_memory().unwrap();
        storage.store_tweets(&[tweet_at(9, "a")]).unwrap();
        assert_eq!(storage.clear().unwrap(), 1);
        assert_eq!(storage.count_tweets().unwrap(), 0);
    }
}
