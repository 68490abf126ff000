//! Store traits implemented by the PostgreSQL store and the in-memory test
//! store.
//!
//! The traits are split by concern so a component depends only on the
//! operations it drives; [`FeedStore`] bundles them for composition roots.
//! Concurrency contract: implementations serialize conditional inserts per
//! dedup key (reels) and per (feed, reel) pair (placements), and make
//! `record_view` an atomic per-user read-modify-write.

use crate::{
    CommentView, EngagementSummary, LeaderboardEntry, NewFeed, NewUser, PlacedReel,
    ProgressUpdate, ReelPatch, ViewOutcome,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reelstack_core::{
    CandidateDescriptor, CommentId, Feed, FeedId, FeedStatus, LeaderboardMode, PlacementStatus,
    Reel, ReelId, User, UserId, UserStats,
};
use reelstack_error::ReelstackResult;

/// Canonical reel records with dedup-keyed upsert.
#[async_trait]
pub trait ReelStore: Send + Sync {
    /// Insert or fill-merge a candidate.
    ///
    /// Looks up an existing reel by `video_url` first, then by
    /// `source_reference`. Found: previously-empty fields are filled from
    /// the candidate (never overwriting set ones) and the existing id is
    /// returned. Not found: a new reel is inserted. Concurrent upserts for
    /// the same dedup key must produce exactly one row.
    async fn upsert_reel(&self, candidate: &CandidateDescriptor) -> ReelstackResult<ReelId>;

    /// Fetch a reel by id.
    async fn get_reel(&self, id: ReelId) -> ReelstackResult<Option<Reel>>;

    /// Explicit post-hoc edit; set fields overwrite, unlike the upsert
    /// fill-merge. Fails with `NotFoundError` when the reel is absent.
    async fn patch_reel(&self, id: ReelId, patch: ReelPatch) -> ReelstackResult<()>;
}

/// Per-feed placement records. The assembler is the sole writer.
#[async_trait]
pub trait PlacementStore: Send + Sync {
    /// Insert a placement unless one already exists for (feed, reel).
    ///
    /// Returns `true` when a new placement was created, `false` for a
    /// duplicate contribution (which is left untouched — same position,
    /// same status).
    async fn insert_placement(
        &self,
        feed_id: FeedId,
        reel_id: ReelId,
        position: f64,
        status: PlacementStatus,
    ) -> ReelstackResult<bool>;

    /// Whether the reel is placed in the feed.
    async fn is_placed(&self, feed_id: FeedId, reel_id: ReelId) -> ReelstackResult<bool>;

    /// All positions in the feed, ascending.
    async fn positions(&self, feed_id: FeedId) -> ReelstackResult<Vec<f64>>;

    /// Reels joined with their placements, ascending by position.
    async fn list_placements(
        &self,
        feed_id: FeedId,
        status: Option<PlacementStatus>,
        limit: Option<i64>,
    ) -> ReelstackResult<Vec<PlacedReel>>;
}

/// Feed lifecycle and progress.
#[async_trait]
pub trait FeedRepository: Send + Sync {
    /// Create a feed in `pending` status. Fails with `NotFoundError` when
    /// the owner does not exist.
    async fn create_feed(&self, new_feed: NewFeed) -> ReelstackResult<FeedId>;

    /// Fetch a feed by id.
    async fn get_feed(&self, id: FeedId) -> ReelstackResult<Option<Feed>>;

    /// Feeds owned by the user, optionally filtered by status, most
    /// recently updated first.
    async fn list_feeds_by_user(
        &self,
        user_id: UserId,
        status: Option<FeedStatus>,
    ) -> ReelstackResult<Vec<Feed>>;

    /// Set the lifecycle status and bump `updated_at`.
    async fn set_feed_status(&self, id: FeedId, status: FeedStatus) -> ReelstackResult<()>;

    /// Last-write-wins progress update. Membership validation happens in
    /// the progress tracker, not here.
    async fn update_progress(&self, id: FeedId, update: ProgressUpdate) -> ReelstackResult<()>;

    /// Delete the feed and, transactionally, its placements and any reels
    /// left with no remaining placements and no views referencing them.
    async fn delete_feed(&self, id: FeedId) -> ReelstackResult<()>;
}

/// Viewer accounts.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Upsert by identity-provider subject: existing users get their
    /// profile fields refreshed and `last_login_at` bumped.
    async fn upsert_user(&self, new_user: NewUser) -> ReelstackResult<UserId>;

    /// Fetch a user by id.
    async fn get_user(&self, id: UserId) -> ReelstackResult<Option<User>>;
}

/// Likes and comments. Keyed on reel identity, not placement, so
/// engagement survives a reel leaving one feed while present in another.
#[async_trait]
pub trait EngagementStore: Send + Sync {
    /// Toggle the user's like; returns the resulting liked state.
    async fn toggle_like(&self, reel_id: ReelId, user_id: UserId) -> ReelstackResult<bool>;

    /// Append a comment. The body arrives validated (trimmed, non-empty,
    /// length-capped) from the engagement service.
    async fn add_comment(
        &self,
        reel_id: ReelId,
        user_id: UserId,
        body: &str,
    ) -> ReelstackResult<CommentId>;

    /// Like/comment counts plus the latest `comment_limit` comments.
    async fn reel_engagement(
        &self,
        reel_id: ReelId,
        user_id: Option<UserId>,
        comment_limit: i64,
    ) -> ReelstackResult<EngagementSummary>;

    /// Latest comments for a reel, newest first.
    async fn list_comments(
        &self,
        reel_id: ReelId,
        limit: i64,
    ) -> ReelstackResult<Vec<CommentView>>;
}

/// Streak and view accounting.
#[async_trait]
pub trait StatsStore: Send + Sync {
    /// Record a first view and update streaks atomically.
    ///
    /// Fails with `NotInFeedError` when the reel is not placed in the feed.
    /// A repeat (user, reel) view returns `counted = false` with stats
    /// unchanged. The per-user read-modify-write must serialize against
    /// concurrent calls for the same user.
    async fn record_view(
        &self,
        user_id: UserId,
        feed_id: FeedId,
        reel_id: ReelId,
        at: DateTime<Utc>,
    ) -> ReelstackResult<ViewOutcome>;

    /// The user's stats row, if any views have been counted.
    async fn stats_for_user(&self, user_id: UserId) -> ReelstackResult<Option<UserStats>>;

    /// Ranked leaderboard rows, descending by the mode's metric.
    /// `today_key` zeroes stale daily streaks.
    async fn leaderboard(
        &self,
        mode: LeaderboardMode,
        limit: i64,
        today_key: &str,
    ) -> ReelstackResult<Vec<LeaderboardEntry>>;
}

/// Prompt search over already-stored reels, the seam behind the internal
/// catalog adapter.
#[async_trait]
pub trait CatalogSearch: Send + Sync {
    /// Reels whose title or description matches the prompt terms.
    async fn search_catalog(&self, terms: &str, limit: usize) -> ReelstackResult<Vec<Reel>>;
}

/// The full store surface required by a composition root.
pub trait FeedStore:
    ReelStore + PlacementStore + FeedRepository + UserStore + EngagementStore + StatsStore
{
}

impl<T> FeedStore for T where
    T: ReelStore + PlacementStore + FeedRepository + UserStore + EngagementStore + StatsStore
{
}
