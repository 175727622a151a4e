//! Sortable, paginated feed view-model.
//!
//! Holds the mapped collection plus sort and page state. Sorting replaces
//! the collection wholesale and snaps back to page 1; pagination slices
//! the sorted collection without copying it.

use crate::model::{MappedTweet, SortKey};
use crate::FEED_PAGE_SIZE;

/// An entry in the rendered page-number strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageItem {
    /// A clickable page button.
    Page(usize),
    /// A gap marker standing in for pages outside the window.
    Ellipsis,
}

/// Navigation controls and their enabled state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pager {
    pub items: Vec<PageItem>,
    pub current_page: usize,
    pub total_pages: usize,
    pub at_first: bool,
    pub at_last: bool,
}

/// The feed's client-side state: collection, sort key, current page.
#[derive(Debug, Clone)]
pub struct TweetFeed {
    tweets: Vec<MappedTweet>,
    sort_key: SortKey,
    current_page: usize,
    page_size: usize,
}

impl Default for TweetFeed {
    fn default() -> Self {
        Self {
            tweets: Vec::new(),
            sort_key: SortKey::default(),
            current_page: 1,
            page_size: FEED_PAGE_SIZE,
        }
    }
}

impl TweetFeed {
    /// Build a feed over a freshly fetched collection, sorted by the
    /// default key and positioned on page 1, at the default page size.
    #[must_use]
    pub fn new(tweets: Vec<MappedTweet>) -> Self {
        Self::with_page_size(tweets, FEED_PAGE_SIZE)
    }

    /// Build a feed with a configured page size. A zero size is clamped
    /// to one record per page.
    #[must_use]
    pub fn with_page_size(tweets: Vec<MappedTweet>, page_size: usize) -> Self {
        let mut feed = Self {
            tweets,
            sort_key: SortKey::default(),
            current_page: 1,
            page_size: page_size.max(1),
        };
        feed.apply_sort();
        feed
    }

    /// Replace the collection, keeping the sort key but resetting to
    /// page 1.
    pub fn replace(&mut self, tweets: Vec<MappedTweet>) {
        self.tweets = tweets;
        self.current_page = 1;
        self.apply_sort();
    }

    /// Re-sort the whole collection by the given key and reset to page 1.
    pub fn sort_by(&mut self, key: SortKey) {
        self.sort_key = key;
        self.current_page = 1;
        self.apply_sort();
    }

    // Stable sort, so equal-key records keep their relative order across
    // repeated sorts.
    fn apply_sort(&mut self) {
        match self.sort_key {
            SortKey::Latest => self.tweets.sort_by(|a, b| b.datetime.cmp(&a.datetime)),
            SortKey::Replies => self.tweets.sort_by(|a, b| b.replies.cmp(&a.replies)),
            SortKey::Retweets => self.tweets.sort_by(|a, b| b.retweets.cmp(&a.retweets)),
            SortKey::Likes => self.tweets.sort_by(|a, b| b.likes.cmp(&a.likes)),
            SortKey::Views => self.tweets.sort_by(|a, b| b.views.cmp(&a.views)),
        }
    }

    #[must_use]
    pub const fn sort_key(&self) -> SortKey {
        self.sort_key
    }

    #[must_use]
    pub const fn current_page(&self) -> usize {
        self.current_page
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tweets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tweets.is_empty()
    }

    /// The full sorted collection.
    #[must_use]
    pub fn tweets(&self) -> &[MappedTweet] {
        &self.tweets
    }

    /// Number of pages at the feed's page size. Zero when the collection
    /// is empty, in which case the pager is not rendered.
    #[must_use]
    pub fn total_pages(&self) -> usize {
        self.tweets.len().div_ceil(self.page_size)
    }

    /// The records visible on the current page.
    #[must_use]
    pub fn page_slice(&self) -> &[MappedTweet] {
        let start = (self.current_page - 1) * self.page_size;
        let end = (start + self.page_size).min(self.tweets.len());
        if start >= self.tweets.len() {
            &[]
        } else {
            &self.tweets[start..end]
        }
    }

    /// Jump to a page, clamped to the valid range.
    pub fn go_to(&mut self, page: usize) {
        let total = self.total_pages().max(1);
        self.current_page = page.clamp(1, total);
    }

    pub fn next_page(&mut self) {
        self.go_to(self.current_page + 1);
    }

    pub fn prev_page(&mut self) {
        self.go_to(self.current_page.saturating_sub(1));
    }

    pub fn first_page(&mut self) {
        self.go_to(1);
    }

    pub fn last_page(&mut self) {
        self.go_to(self.total_pages().max(1));
    }

    /// Build the sliding pager strip: at most five page buttons centered
    /// near the current page, with ellipsis markers when the window does
    /// not reach the first or last page. Returns `None` for an empty
    /// collection.
    #[must_use]
    pub fn pager(&self) -> Option<Pager> {
        let total = self.total_pages();
        if total == 0 {
            return None;
        }

        let current = self.current_page.min(total);
        let start = current.saturating_sub(2).max(1);
        let end = (start + 4).min(total);
        let start = end.saturating_sub(4).max(1);

        let mut items = Vec::new();
        if start > 1 {
            items.push(PageItem::Ellipsis);
        }
        for page in start..=end {
            items.push(PageItem::Page(page));
        }
        if end < total {
            items.push(PageItem::Ellipsis);
        }

        Some(Pager {
            items,
            current_page: current,
            total_pages: total,
            at_first: current == 1,
            at_last: current == total,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Sentiment;
    use chrono::{TimeZone, Utc};

    fn tweet(id: i64) -> MappedTweet {
        MappedTweet {
            batch_number: 1,
            profile_picture: "/default-profile.png".to_string(),
            name: format!("user{id}"),
            username: format!("user{id}"),
            text: format!("tweet {id}"),
            likes: id,
            replies: 100 - id,
            retweets: id * 2,
            views: id * 10,
            datetime: Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap()
                + chrono::Duration::minutes(id),
            display_time: String::new(),
            sentiment: Sentiment::Neutral,
        }
    }

    fn feed_of(n: i64) -> TweetFeed {
        TweetFeed::new((1..=n).map(tweet).collect())
    }

    #[test]
    fn default_sort_is_latest_descending() {
        let feed = feed_of(3);
        let texts: Vec<&str> = feed.tweets().iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["tweet 3", "tweet 2", "tweet 1"]);
    }

    #[test]
    fn sorting_replaces_order_and_resets_page() {
        let mut feed = feed_of(12);
        feed.go_to(3);
        assert_eq!(feed.current_page(), 3);

        feed.sort_by(SortKey::Replies);
        assert_eq!(feed.current_page(), 1);
        // replies = 100 - id, so id 1 leads.
        assert_eq!(feed.tweets()[0].text, "tweet 1");

        feed.sort_by(SortKey::Likes);
        assert_eq!(feed.tweets()[0].text, "tweet 12");

        feed.sort_by(SortKey::Views);
        assert_eq!(feed.tweets()[0].text, "tweet 12");

        feed.sort_by(SortKey::Retweets);
        assert_eq!(feed.tweets()[0].text, "tweet 12");
    }

    #[test]
    fn page_slice_is_five_records() {
        let feed = feed_of(7);
        assert_eq!(feed.total_pages(), 2);
        assert_eq!(feed.page_slice().len(), 5);

        let mut feed = feed;
        feed.next_page();
        assert_eq!(feed.page_slice().len(), 2);
    }

    #[test]
    fn configured_page_size_drives_pagination() {
        let mut feed = TweetFeed::with_page_size((1..=7).map(tweet).collect(), 2);
        assert_eq!(feed.total_pages(), 4);
        assert_eq!(feed.page_slice().len(), 2);

        feed.last_page();
        assert_eq!(feed.page_slice().len(), 1);

        let clamped = TweetFeed::with_page_size((1..=3).map(tweet).collect(), 0);
        assert_eq!(clamped.total_pages(), 3);
    }

    #[test]
    fn empty_feed_has_no_pager() {
        let feed = TweetFeed::new(Vec::new());
        assert_eq!(feed.total_pages(), 0);
        assert!(feed.pager().is_none());
        assert!(feed.page_slice().is_empty());
    }

    #[test]
    fn navigation_clamps_at_boundaries() {
        let mut feed = feed_of(7);
        feed.prev_page();
        assert_eq!(feed.current_page(), 1);
        feed.last_page();
        assert_eq!(feed.current_page(), 2);
        feed.next_page();
        assert_eq!(feed.current_page(), 2);
        feed.go_to(99);
        assert_eq!(feed.current_page(), 2);
        feed.first_page();
        assert_eq!(feed.current_page(), 1);
    }

    #[test]
    fn pager_shows_all_pages_when_five_or_fewer() {
        let feed = feed_of(25); // 5 pages
        let pager = feed.pager().unwrap();
        assert_eq!(
            pager.items,
            vec![
                PageItem::Page(1),
                PageItem::Page(2),
                PageItem::Page(3),
                PageItem::Page(4),
                PageItem::Page(5),
            ]
        );
        assert!(pager.at_first);
        assert!(!pager.at_last);
    }

    #[test]
    fn pager_window_slides_with_trailing_ellipsis() {
        let feed = feed_of(50); // 10 pages, current 1
        let pager = feed.pager().unwrap();
        assert_eq!(pager.items.first(), Some(&PageItem::Page(1)));
        assert_eq!(pager.items.last(), Some(&PageItem::Ellipsis));
        assert_eq!(pager.items.len(), 6);
    }

    #[test]
    fn pager_window_centers_on_middle_pages() {
        let mut feed = feed_of(50); // 10 pages
        feed.go_to(6);
        let pager = feed.pager().unwrap();
        assert_eq!(
            pager.items,
            vec![
                PageItem::Ellipsis,
                PageItem::Page(4),
                PageItem::Page(5),
                PageItem::Page(6),
                PageItem::Page(7),
                PageItem::Page(8),
                PageItem::Ellipsis,
            ]
        );
        assert!(!pager.at_first);
        assert!(!pager.at_last);
    }

    #[test]
    fn pager_window_clamps_at_the_end() {
        let mut feed = feed_of(50); // 10 pages
        feed.last_page();
        let pager = feed.pager().unwrap();
        assert_eq!(
            pager.items,
            vec![
                PageItem::Ellipsis,
                PageItem::Page(6),
                PageItem::Page(7),
                PageItem::Page(8),
                PageItem::Page(9),
                PageItem::Page(10),
            ]
        );
        assert!(pager.at_last);
    }

    #[test]
    fn equal_keys_keep_relative_order() {
        let mut tweets: Vec<MappedTweet> = (1..=4).map(tweet).collect();
        for t in &mut tweets {
            t.likes = 7;
        }
        let mut feed = TweetFeed::new(tweets);
        feed.sort_by(SortKey::Likes);
        // Stable sort keeps the Latest-descending order from construction.
        let texts: Vec<&str> = feed.tweets().iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["tweet 4", "tweet 3", "tweet 2", "tweet 1"]);
    }
}
