//! Async store adapter over the blocking repositories.
//!
//! Wraps an r2d2 pool and runs each operation on the blocking thread pool,
//! implementing the `reelstack_interface` store traits for use from async
//! components.

use crate::{
    connection, engagement_repository, feed_repository, reel_repository, stats_repository,
    user_repository,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};
use reelstack_core::{
    CandidateDescriptor, CommentId, Feed, FeedId, FeedStatus, LeaderboardMode, PlacementStatus,
    Reel, ReelId, User, UserId, UserStats,
};
use reelstack_error::{DatabaseError, DatabaseErrorKind, ReelstackResult};
use reelstack_interface::{
    CatalogSearch, CommentView, EngagementStore, EngagementSummary, FeedRepository,
    LeaderboardEntry, NewFeed, NewUser, PlacedReel, PlacementStore, ProgressUpdate, ReelPatch,
    ReelStore, StatsStore, UserStore, ViewOutcome,
};

/// PostgreSQL-backed feed store.
#[derive(Clone)]
pub struct DatabaseFeedStore {
    pool: Pool<ConnectionManager<PgConnection>>,
}

impl DatabaseFeedStore {
    /// Create a store over an existing connection pool.
    pub fn new(pool: Pool<ConnectionManager<PgConnection>>) -> Self {
        Self { pool }
    }

    /// Build a pool for the given database URL and wrap it.
    pub fn connect(database_url: &str) -> ReelstackResult<Self> {
        let pool = connection::build_pool(database_url)?;
        Ok(Self::new(pool))
    }

    /// The underlying pool.
    pub fn pool(&self) -> &Pool<ConnectionManager<PgConnection>> {
        &self.pool
    }

    async fn run<T, F>(&self, f: F) -> ReelstackResult<T>
    where
        F: FnOnce(&mut PgConnection) -> ReelstackResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = pool
                .get()
                .map_err(|e| DatabaseError::new(DatabaseErrorKind::Pool(e.to_string())))?;
            f(&mut conn)
        })
        .await
        .map_err(|e| DatabaseError::new(DatabaseErrorKind::Query(e.to_string())))?
    }
}

#[async_trait]
impl ReelStore for DatabaseFeedStore {
    async fn upsert_reel(&self, candidate: &CandidateDescriptor) -> ReelstackResult<ReelId> {
        let candidate = candidate.clone();
        self.run(move |conn| reel_repository::upsert_reel(conn, &candidate))
            .await
    }

    async fn get_reel(&self, id: ReelId) -> ReelstackResult<Option<Reel>> {
        self.run(move |conn| reel_repository::get_reel(conn, id)).await
    }

    async fn patch_reel(&self, id: ReelId, patch: ReelPatch) -> ReelstackResult<()> {
        self.run(move |conn| reel_repository::patch_reel(conn, id, &patch))
            .await
    }
}

#[async_trait]
impl PlacementStore for DatabaseFeedStore {
    async fn insert_placement(
        &self,
        feed_id: FeedId,
        reel_id: ReelId,
        position: f64,
        status: PlacementStatus,
    ) -> ReelstackResult<bool> {
        self.run(move |conn| {
            feed_repository::insert_placement(conn, feed_id, reel_id, position, status)
        })
        .await
    }

    async fn is_placed(&self, feed_id: FeedId, reel_id: ReelId) -> ReelstackResult<bool> {
        self.run(move |conn| feed_repository::is_placed(conn, feed_id, reel_id))
            .await
    }

    async fn positions(&self, feed_id: FeedId) -> ReelstackResult<Vec<f64>> {
        self.run(move |conn| feed_repository::positions(conn, feed_id))
            .await
    }

    async fn list_placements(
        &self,
        feed_id: FeedId,
        status: Option<PlacementStatus>,
        limit: Option<i64>,
    ) -> ReelstackResult<Vec<PlacedReel>> {
        self.run(move |conn| feed_repository::list_placements(conn, feed_id, status, limit))
            .await
    }
}

#[async_trait]
impl FeedRepository for DatabaseFeedStore {
    async fn create_feed(&self, new_feed: NewFeed) -> ReelstackResult<FeedId> {
        self.run(move |conn| feed_repository::create_feed(conn, &new_feed))
            .await
    }

    async fn get_feed(&self, id: FeedId) -> ReelstackResult<Option<Feed>> {
        self.run(move |conn| feed_repository::get_feed(conn, id)).await
    }

    async fn list_feeds_by_user(
        &self,
        user_id: UserId,
        status: Option<FeedStatus>,
    ) -> ReelstackResult<Vec<Feed>> {
        self.run(move |conn| feed_repository::list_feeds_by_user(conn, user_id, status))
            .await
    }

    async fn set_feed_status(&self, id: FeedId, status: FeedStatus) -> ReelstackResult<()> {
        self.run(move |conn| feed_repository::set_feed_status(conn, id, status))
            .await
    }

    async fn update_progress(&self, id: FeedId, update: ProgressUpdate) -> ReelstackResult<()> {
        self.run(move |conn| feed_repository::update_progress(conn, id, &update))
            .await
    }

    async fn delete_feed(&self, id: FeedId) -> ReelstackResult<()> {
        self.run(move |conn| feed_repository::delete_feed(conn, id)).await
    }
}

#[async_trait]
impl UserStore for DatabaseFeedStore {
    async fn upsert_user(&self, new_user: NewUser) -> ReelstackResult<UserId> {
        self.run(move |conn| user_repository::upsert_user(conn, &new_user))
            .await
    }

    async fn get_user(&self, id: UserId) -> ReelstackResult<Option<User>> {
        self.run(move |conn| user_repository::get_user(conn, id)).await
    }
}

#[async_trait]
impl EngagementStore for DatabaseFeedStore {
    async fn toggle_like(&self, reel_id: ReelId, user_id: UserId) -> ReelstackResult<bool> {
        self.run(move |conn| engagement_repository::toggle_like(conn, reel_id, user_id))
            .await
    }

    async fn add_comment(
        &self,
        reel_id: ReelId,
        user_id: UserId,
        body: &str,
    ) -> ReelstackResult<CommentId> {
        let body = body.to_string();
        self.run(move |conn| engagement_repository::add_comment(conn, reel_id, user_id, &body))
            .await
    }

    async fn reel_engagement(
        &self,
        reel_id: ReelId,
        user_id: Option<UserId>,
        comment_limit: i64,
    ) -> ReelstackResult<EngagementSummary> {
        self.run(move |conn| {
            engagement_repository::reel_engagement(conn, reel_id, user_id, comment_limit)
        })
        .await
    }

    async fn list_comments(
        &self,
        reel_id: ReelId,
        limit: i64,
    ) -> ReelstackResult<Vec<CommentView>> {
        self.run(move |conn| engagement_repository::list_comments(conn, reel_id, limit))
            .await
    }
}

#[async_trait]
impl StatsStore for DatabaseFeedStore {
    async fn record_view(
        &self,
        user_id: UserId,
        feed_id: FeedId,
        reel_id: ReelId,
        at: DateTime<Utc>,
    ) -> ReelstackResult<ViewOutcome> {
        self.run(move |conn| stats_repository::record_view(conn, user_id, feed_id, reel_id, at))
            .await
    }

    async fn stats_for_user(&self, user_id: UserId) -> ReelstackResult<Option<UserStats>> {
        self.run(move |conn| stats_repository::stats_for_user(conn, user_id))
            .await
    }

    async fn leaderboard(
        &self,
        mode: LeaderboardMode,
        limit: i64,
        today_key: &str,
    ) -> ReelstackResult<Vec<LeaderboardEntry>> {
        let today_key = today_key.to_string();
        self.run(move |conn| stats_repository::leaderboard(conn, mode, limit, &today_key))
            .await
    }
}

#[async_trait]
impl CatalogSearch for DatabaseFeedStore {
    async fn search_catalog(&self, terms: &str, limit: usize) -> ReelstackResult<Vec<Reel>> {
        let terms = terms.to_string();
        self.run(move |conn| reel_repository::search_catalog(conn, &terms, limit as i64))
            .await
    }
}
