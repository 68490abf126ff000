//! Engagement and stats service: validation in front of the store.

use chrono::Utc;
use reelstack_core::{CommentId, FeedId, LeaderboardMode, ReelId, UserId, day_key};
use reelstack_error::{ReelstackResult, ValidationError};
use reelstack_interface::{
    EngagementStore, EngagementSummary, LeaderboardEntry, StatsStore, ViewOutcome,
};
use std::sync::Arc;
use tracing::instrument;

/// Maximum comment body length after trimming.
pub const MAX_COMMENT_LENGTH: usize = 240;
/// Comments returned by an engagement lookup when no limit is given.
pub const DEFAULT_COMMENT_LIMIT: i64 = 6;
/// Leaderboard page size when no limit is given.
pub const DEFAULT_LEADERBOARD_LIMIT: i64 = 20;
/// Hard cap on the leaderboard page size.
pub const MAX_LEADERBOARD_LIMIT: i64 = 50;

/// Likes, comments, views, and the leaderboard.
pub struct Engagement<S> {
    store: Arc<S>,
}

impl<S> Engagement<S>
where
    S: EngagementStore + StatsStore,
{
    /// Create a service over the given store.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Toggle the user's like; returns the resulting liked state.
    pub async fn toggle_like(&self, reel_id: ReelId, user_id: UserId) -> ReelstackResult<bool> {
        self.store.toggle_like(reel_id, user_id).await
    }

    /// Append a comment after trimming and validating the body.
    #[instrument(skip(self, body), fields(reel = %reel_id))]
    pub async fn add_comment(
        &self,
        reel_id: ReelId,
        user_id: UserId,
        body: &str,
    ) -> ReelstackResult<CommentId> {
        let body = body.trim();
        if body.is_empty() {
            Err(ValidationError::new("Comment cannot be empty"))?;
        }
        if body.chars().count() > MAX_COMMENT_LENGTH {
            Err(ValidationError::new("Comment too long"))?;
        }

        self.store.add_comment(reel_id, user_id, body).await
    }

    /// Like/comment counts plus the latest comments.
    pub async fn reel_engagement(
        &self,
        reel_id: ReelId,
        user_id: Option<UserId>,
        limit: Option<i64>,
    ) -> ReelstackResult<EngagementSummary> {
        let limit = limit.unwrap_or(DEFAULT_COMMENT_LIMIT).max(0);
        self.store.reel_engagement(reel_id, user_id, limit).await
    }

    /// Record a first view and update the user's streaks.
    pub async fn record_view(
        &self,
        user_id: UserId,
        feed_id: FeedId,
        reel_id: ReelId,
    ) -> ReelstackResult<ViewOutcome> {
        self.store.record_view(user_id, feed_id, reel_id, Utc::now()).await
    }

    /// Ranked leaderboard for the requested mode, capped at
    /// [`MAX_LEADERBOARD_LIMIT`].
    pub async fn leaderboard(
        &self,
        mode: LeaderboardMode,
        limit: Option<i64>,
    ) -> ReelstackResult<Vec<LeaderboardEntry>> {
        let limit = limit
            .unwrap_or(DEFAULT_LEADERBOARD_LIMIT)
            .min(MAX_LEADERBOARD_LIMIT)
            .max(0);
        let today = day_key(Utc::now());
        self.store.leaderboard(mode, limit, &today).await
    }
}
