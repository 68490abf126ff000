//! Domain entities shared across the store implementations.

use crate::{FeedId, FeedStatus, ReelId, ReelMetadata, SourceType, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A canonical video record, potentially shared across multiple feeds.
///
/// Identity is immutable; content is mutable under the fill-if-empty merge
/// policy (adapters backfill missing fields, never overwrite set ones).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reel {
    /// Internal id
    pub id: ReelId,
    /// Which kind of source produced this reel
    pub source_type: SourceType,
    /// Playable URL; absent while the generative pipeline is still rendering
    pub video_url: Option<String>,
    /// Provider-specific dedup key
    pub source_reference: Option<String>,
    /// Clip title
    pub title: Option<String>,
    /// Clip description
    pub description: Option<String>,
    /// Thumbnail URL
    pub thumbnail_url: Option<String>,
    /// Duration in seconds
    pub duration_seconds: Option<i32>,
    /// Provider metadata
    pub metadata: Option<ReelMetadata>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last content change
    pub updated_at: DateTime<Utc>,
}

/// A prompt-driven feed owned by a single user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feed {
    /// Feed id
    pub id: FeedId,
    /// Owner; feeds are never transferred
    pub user_id: UserId,
    /// The topic prompt the feed was created from
    pub prompt: String,
    /// Display topic
    pub topic: String,
    /// Optional description
    pub description: Option<String>,
    /// Optional tags
    pub tags: Option<Vec<String>>,
    /// Lifecycle status
    pub status: FeedStatus,
    /// Last reel the owner viewed
    pub last_seen_reel_id: Option<ReelId>,
    /// Index of the last-viewed placement in position order
    pub last_seen_index: Option<i64>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last status or progress change
    pub updated_at: DateTime<Utc>,
}

/// A registered viewer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// User id
    pub id: UserId,
    /// Identity-provider subject, unique per user
    pub external_id: String,
    /// Email address
    pub email: String,
    /// Display name
    pub name: String,
    /// Avatar URL
    pub avatar_url: Option<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last login
    pub last_login_at: Option<DateTime<Utc>>,
}

/// Gamified per-user view counters. Mutated only by the view-recording
/// operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserStats {
    /// Owner
    pub user_id: UserId,
    /// Consecutive views within the same feed
    pub current_streak: i64,
    /// Best `current_streak` ever reached
    pub best_streak: i64,
    /// Consecutive views within the same UTC calendar day
    pub daily_streak: i64,
    /// Total first-view count
    pub total_count: i64,
    /// Feed of the most recent counted view
    pub last_feed_id: Option<FeedId>,
    /// UTC day key of the most recent counted view
    pub last_day_key: Option<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last counted view
    pub updated_at: DateTime<Utc>,
}

impl UserStats {
    /// Zeroed stats row for a user who has not viewed anything yet.
    pub fn empty(user_id: UserId, now: DateTime<Utc>) -> Self {
        Self {
            user_id,
            current_streak: 0,
            best_streak: 0,
            daily_streak: 0,
            total_count: 0,
            last_feed_id: None,
            last_day_key: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply one counted view.
    ///
    /// The current streak is feed-scoped: it resets when the viewed feed
    /// differs from the previous view's. The daily streak resets when the
    /// UTC day key changes. Both store implementations route through this
    /// so the counters cannot drift apart.
    pub fn advance(&mut self, feed_id: FeedId, day: &str, at: DateTime<Utc>) {
        if self.last_feed_id.is_some_and(|last| last != feed_id) {
            self.current_streak = 0;
        }
        if self.last_day_key.as_deref() != Some(day) {
            self.daily_streak = 0;
        }

        self.current_streak += 1;
        self.daily_streak += 1;
        self.total_count += 1;
        self.best_streak = self.best_streak.max(self.current_streak);
        self.last_feed_id = Some(feed_id);
        self.last_day_key = Some(day.to_string());
        self.updated_at = at;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn streaks_reset_on_feed_change_but_total_keeps_counting() {
        let now = Utc.with_ymd_and_hms(2026, 5, 1, 12, 0, 0).unwrap();
        let feed_a = FeedId::new();
        let feed_b = FeedId::new();
        let mut stats = UserStats::empty(UserId::new(), now);

        stats.advance(feed_a, "2026-05-01", now);
        stats.advance(feed_a, "2026-05-01", now);
        assert_eq!(stats.current_streak, 2);
        assert_eq!(stats.best_streak, 2);

        stats.advance(feed_b, "2026-05-01", now);
        assert_eq!(stats.current_streak, 1);
        assert_eq!(stats.best_streak, 2);
        assert_eq!(stats.daily_streak, 3);
        assert_eq!(stats.total_count, 3);
    }

    #[test]
    fn daily_streak_resets_on_day_change() {
        let now = Utc.with_ymd_and_hms(2026, 5, 1, 23, 0, 0).unwrap();
        let feed = FeedId::new();
        let mut stats = UserStats::empty(UserId::new(), now);

        stats.advance(feed, "2026-05-01", now);
        stats.advance(feed, "2026-05-02", now);
        assert_eq!(stats.daily_streak, 1);
        assert_eq!(stats.current_streak, 2);
    }
}
