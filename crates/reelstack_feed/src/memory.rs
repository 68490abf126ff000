//! In-memory store implementation.
//!
//! One mutex over the whole state, so every store operation is atomic —
//! the same guarantees the PostgreSQL store gets from transactions and row
//! locks. Used by the tests in this crate; also handy for demos without a
//! database.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use reelstack_core::{
    CandidateDescriptor, CommentId, Feed, FeedId, FeedStatus, LeaderboardMode, PlacementStatus,
    Reel, ReelId, User, UserId, UserStats, day_key,
};
use reelstack_error::{NotFoundError, NotInFeedError, ReelstackResult};
use reelstack_interface::{
    CatalogSearch, CommentView, EngagementStore, EngagementSummary, FeedRepository,
    LeaderboardEntry, NewFeed, NewUser, PlacedReel, PlacementStore, ProgressUpdate, ReelPatch,
    ReelStore, StatsStore, UserStore, ViewOutcome,
};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone)]
struct PlacementRecord {
    feed_id: FeedId,
    reel_id: ReelId,
    position: f64,
    status: PlacementStatus,
}

#[derive(Debug, Clone)]
struct CommentRecord {
    id: CommentId,
    reel_id: ReelId,
    user_id: UserId,
    body: String,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
struct ViewRecord {
    feed_id: FeedId,
    #[allow(dead_code)]
    day_key: String,
    #[allow(dead_code)]
    viewed_at: DateTime<Utc>,
}

#[derive(Default)]
struct MemoryState {
    users: HashMap<UserId, User>,
    feeds: HashMap<FeedId, Feed>,
    // Insertion order preserved; catalog search and comment listing rely
    // on it for newest-first iteration.
    reels: Vec<Reel>,
    placements: Vec<PlacementRecord>,
    views: HashMap<(UserId, ReelId), ViewRecord>,
    likes: HashSet<(ReelId, UserId)>,
    comments: Vec<CommentRecord>,
    stats: HashMap<UserId, UserStats>,
}

impl MemoryState {
    fn reel_index(&self, id: ReelId) -> Option<usize> {
        self.reels.iter().position(|reel| reel.id == id)
    }

    fn find_reel_for(&self, candidate: &CandidateDescriptor) -> Option<usize> {
        if let Some(url) = candidate.video_url.as_deref() {
            let by_url = self
                .reels
                .iter()
                .position(|reel| reel.video_url.as_deref() == Some(url));
            if by_url.is_some() {
                return by_url;
            }
        }
        if let Some(reference) = candidate.source_reference.as_deref() {
            return self
                .reels
                .iter()
                .position(|reel| reel.source_reference.as_deref() == Some(reference));
        }
        None
    }

    fn placement(&self, feed_id: FeedId, reel_id: ReelId) -> Option<&PlacementRecord> {
        self.placements
            .iter()
            .find(|p| p.feed_id == feed_id && p.reel_id == reel_id)
    }
}

/// In-memory feed store.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user directly, bypassing the upsert. Test convenience.
    pub fn seed_user(&self, name: &str) -> UserId {
        let now = Utc::now();
        let user = User {
            id: UserId::new(),
            external_id: format!("seed-{name}"),
            email: format!("{name}@example.com"),
            name: name.to_string(),
            avatar_url: None,
            created_at: now,
            last_login_at: Some(now),
        };
        let id = user.id;
        self.state.lock().users.insert(id, user);
        id
    }
}

#[async_trait]
impl ReelStore for MemoryStore {
    async fn upsert_reel(&self, candidate: &CandidateDescriptor) -> ReelstackResult<ReelId> {
        let mut state = self.state.lock();
        let now = Utc::now();

        if let Some(index) = state.find_reel_for(candidate) {
            let reel = &mut state.reels[index];
            let mut changed = false;
            if reel.thumbnail_url.is_none() && candidate.thumbnail_url.is_some() {
                reel.thumbnail_url = candidate.thumbnail_url.clone();
                changed = true;
            }
            if reel.title.is_none() && candidate.title.is_some() {
                reel.title = candidate.title.clone();
                changed = true;
            }
            if reel.description.is_none() && candidate.description.is_some() {
                reel.description = candidate.description.clone();
                changed = true;
            }
            if reel.duration_seconds.is_none() && candidate.duration_seconds.is_some() {
                reel.duration_seconds = candidate.duration_seconds;
                changed = true;
            }
            if reel.metadata.is_none() && candidate.metadata.is_some() {
                reel.metadata = candidate.metadata.clone();
                changed = true;
            }
            if changed {
                reel.updated_at = now;
            }
            return Ok(reel.id);
        }

        let reel = Reel {
            id: ReelId::new(),
            source_type: candidate.source_type,
            video_url: candidate.video_url.clone(),
            source_reference: candidate.source_reference.clone(),
            title: candidate.title.clone(),
            description: candidate.description.clone(),
            thumbnail_url: candidate.thumbnail_url.clone(),
            duration_seconds: candidate.duration_seconds,
            metadata: candidate.metadata.clone(),
            created_at: now,
            updated_at: now,
        };
        let id = reel.id;
        state.reels.push(reel);
        Ok(id)
    }

    async fn get_reel(&self, id: ReelId) -> ReelstackResult<Option<Reel>> {
        let state = self.state.lock();
        Ok(state.reels.iter().find(|reel| reel.id == id).cloned())
    }

    async fn patch_reel(&self, id: ReelId, patch: ReelPatch) -> ReelstackResult<()> {
        let mut state = self.state.lock();
        let index = state
            .reel_index(id)
            .ok_or_else(|| NotFoundError::new("reel", id.to_string()))?;

        if patch.is_empty() {
            return Ok(());
        }

        let reel = &mut state.reels[index];
        if let Some(video_url) = patch.video_url {
            reel.video_url = Some(video_url);
        }
        if let Some(thumbnail_url) = patch.thumbnail_url {
            reel.thumbnail_url = Some(thumbnail_url);
        }
        if let Some(title) = patch.title {
            reel.title = Some(title);
        }
        if let Some(description) = patch.description {
            reel.description = Some(description);
        }
        if let Some(duration_seconds) = patch.duration_seconds {
            reel.duration_seconds = Some(duration_seconds);
        }
        if let Some(metadata) = patch.metadata {
            reel.metadata = Some(metadata);
        }
        reel.updated_at = Utc::now();
        Ok(())
    }
}

#[async_trait]
impl PlacementStore for MemoryStore {
    async fn insert_placement(
        &self,
        feed_id: FeedId,
        reel_id: ReelId,
        position: f64,
        status: PlacementStatus,
    ) -> ReelstackResult<bool> {
        let mut state = self.state.lock();
        if state.placement(feed_id, reel_id).is_some() {
            return Ok(false);
        }
        state.placements.push(PlacementRecord {
            feed_id,
            reel_id,
            position,
            status,
        });
        Ok(true)
    }

    async fn is_placed(&self, feed_id: FeedId, reel_id: ReelId) -> ReelstackResult<bool> {
        let state = self.state.lock();
        Ok(state.placement(feed_id, reel_id).is_some())
    }

    async fn positions(&self, feed_id: FeedId) -> ReelstackResult<Vec<f64>> {
        let state = self.state.lock();
        let mut positions: Vec<f64> = state
            .placements
            .iter()
            .filter(|p| p.feed_id == feed_id)
            .map(|p| p.position)
            .collect();
        positions.sort_by(f64::total_cmp);
        Ok(positions)
    }

    async fn list_placements(
        &self,
        feed_id: FeedId,
        status: Option<PlacementStatus>,
        limit: Option<i64>,
    ) -> ReelstackResult<Vec<PlacedReel>> {
        let state = self.state.lock();
        let mut records: Vec<&PlacementRecord> = state
            .placements
            .iter()
            .filter(|p| p.feed_id == feed_id)
            .filter(|p| status.is_none_or(|s| p.status == s))
            .collect();
        records.sort_by(|a, b| a.position.total_cmp(&b.position));
        if let Some(limit) = limit {
            records.truncate(usize::try_from(limit).unwrap_or(0));
        }

        Ok(records
            .into_iter()
            .filter_map(|record| {
                let reel = state.reels.iter().find(|r| r.id == record.reel_id)?;
                Some(PlacedReel {
                    reel: reel.clone(),
                    feed_id: record.feed_id,
                    position: record.position,
                    status: record.status,
                })
            })
            .collect())
    }
}

#[async_trait]
impl FeedRepository for MemoryStore {
    async fn create_feed(&self, new_feed: NewFeed) -> ReelstackResult<FeedId> {
        let mut state = self.state.lock();
        if !state.users.contains_key(&new_feed.user_id) {
            Err(NotFoundError::new("user", new_feed.user_id.to_string()))?;
        }

        let now = Utc::now();
        let feed = Feed {
            id: FeedId::new(),
            user_id: new_feed.user_id,
            prompt: new_feed.prompt,
            topic: new_feed.topic,
            description: new_feed.description,
            tags: new_feed.tags,
            status: FeedStatus::Pending,
            last_seen_reel_id: None,
            last_seen_index: None,
            created_at: now,
            updated_at: now,
        };
        let id = feed.id;
        state.feeds.insert(id, feed);
        Ok(id)
    }

    async fn get_feed(&self, id: FeedId) -> ReelstackResult<Option<Feed>> {
        Ok(self.state.lock().feeds.get(&id).cloned())
    }

    async fn list_feeds_by_user(
        &self,
        user_id: UserId,
        status: Option<FeedStatus>,
    ) -> ReelstackResult<Vec<Feed>> {
        let state = self.state.lock();
        let mut feeds: Vec<Feed> = state
            .feeds
            .values()
            .filter(|feed| feed.user_id == user_id)
            .filter(|feed| status.is_none_or(|s| feed.status == s))
            .cloned()
            .collect();
        feeds.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(feeds)
    }

    async fn set_feed_status(&self, id: FeedId, status: FeedStatus) -> ReelstackResult<()> {
        let mut state = self.state.lock();
        let feed = state
            .feeds
            .get_mut(&id)
            .ok_or_else(|| NotFoundError::new("feed", id.to_string()))?;
        feed.status = status;
        feed.updated_at = Utc::now();
        Ok(())
    }

    async fn update_progress(&self, id: FeedId, update: ProgressUpdate) -> ReelstackResult<()> {
        let mut state = self.state.lock();
        let feed = state
            .feeds
            .get_mut(&id)
            .ok_or_else(|| NotFoundError::new("feed", id.to_string()))?;
        feed.last_seen_index = update.last_seen_index;
        feed.last_seen_reel_id = update.last_seen_reel_id;
        feed.updated_at = Utc::now();
        Ok(())
    }

    async fn delete_feed(&self, id: FeedId) -> ReelstackResult<()> {
        let mut state = self.state.lock();
        if state.feeds.remove(&id).is_none() {
            Err(NotFoundError::new("feed", id.to_string()))?;
        }

        let placed: Vec<ReelId> = state
            .placements
            .iter()
            .filter(|p| p.feed_id == id)
            .map(|p| p.reel_id)
            .collect();
        state.placements.retain(|p| p.feed_id != id);

        for reel_id in placed {
            let still_placed = state.placements.iter().any(|p| p.reel_id == reel_id);
            let viewed = state.views.keys().any(|(_, viewed)| *viewed == reel_id);
            if still_placed || viewed {
                continue;
            }
            state.reels.retain(|reel| reel.id != reel_id);
            state.likes.retain(|(liked, _)| *liked != reel_id);
            state.comments.retain(|comment| comment.reel_id != reel_id);
        }
        Ok(())
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn upsert_user(&self, new_user: NewUser) -> ReelstackResult<UserId> {
        let mut state = self.state.lock();
        let now = Utc::now();

        if let Some(user) = state
            .users
            .values_mut()
            .find(|user| user.external_id == new_user.external_id)
        {
            user.email = new_user.email;
            user.name = new_user.name;
            user.avatar_url = new_user.avatar_url;
            user.last_login_at = Some(now);
            return Ok(user.id);
        }

        let user = User {
            id: UserId::new(),
            external_id: new_user.external_id,
            email: new_user.email,
            name: new_user.name,
            avatar_url: new_user.avatar_url,
            created_at: now,
            last_login_at: Some(now),
        };
        let id = user.id;
        state.users.insert(id, user);
        Ok(id)
    }

    async fn get_user(&self, id: UserId) -> ReelstackResult<Option<User>> {
        Ok(self.state.lock().users.get(&id).cloned())
    }
}

#[async_trait]
impl EngagementStore for MemoryStore {
    async fn toggle_like(&self, reel_id: ReelId, user_id: UserId) -> ReelstackResult<bool> {
        let mut state = self.state.lock();
        if state.reel_index(reel_id).is_none() {
            Err(NotFoundError::new("reel", reel_id.to_string()))?;
        }

        let key = (reel_id, user_id);
        if state.likes.remove(&key) {
            return Ok(false);
        }
        state.likes.insert(key);
        Ok(true)
    }

    async fn add_comment(
        &self,
        reel_id: ReelId,
        user_id: UserId,
        body: &str,
    ) -> ReelstackResult<CommentId> {
        let mut state = self.state.lock();
        if state.reel_index(reel_id).is_none() {
            Err(NotFoundError::new("reel", reel_id.to_string()))?;
        }

        let comment = CommentRecord {
            id: CommentId::new(),
            reel_id,
            user_id,
            body: body.to_string(),
            created_at: Utc::now(),
        };
        let id = comment.id;
        state.comments.push(comment);
        Ok(id)
    }

    async fn reel_engagement(
        &self,
        reel_id: ReelId,
        user_id: Option<UserId>,
        comment_limit: i64,
    ) -> ReelstackResult<EngagementSummary> {
        let comments = self.list_comments(reel_id, comment_limit).await?;
        let state = self.state.lock();

        let like_count = state.likes.iter().filter(|(r, _)| *r == reel_id).count() as i64;
        let comment_count = state
            .comments
            .iter()
            .filter(|c| c.reel_id == reel_id)
            .count() as i64;
        let liked_by_user =
            user_id.is_some_and(|user| state.likes.contains(&(reel_id, user)));

        Ok(EngagementSummary {
            like_count,
            comment_count,
            liked_by_user,
            comments,
        })
    }

    async fn list_comments(
        &self,
        reel_id: ReelId,
        limit: i64,
    ) -> ReelstackResult<Vec<CommentView>> {
        let state = self.state.lock();
        // Comments append chronologically, so reverse iteration is newest
        // first.
        Ok(state
            .comments
            .iter()
            .rev()
            .filter(|comment| comment.reel_id == reel_id)
            .take(usize::try_from(limit).unwrap_or(0))
            .filter_map(|comment| {
                let author = state.users.get(&comment.user_id)?;
                Some(CommentView {
                    id: comment.id,
                    body: comment.body.clone(),
                    user_id: comment.user_id,
                    user_name: author.name.clone(),
                    user_avatar_url: author.avatar_url.clone(),
                    created_at: comment.created_at,
                })
            })
            .collect())
    }
}

#[async_trait]
impl StatsStore for MemoryStore {
    async fn record_view(
        &self,
        user_id: UserId,
        feed_id: FeedId,
        reel_id: ReelId,
        at: DateTime<Utc>,
    ) -> ReelstackResult<ViewOutcome> {
        let mut state = self.state.lock();
        if state.placement(feed_id, reel_id).is_none() {
            Err(NotInFeedError::new(feed_id.to_string(), reel_id.to_string()))?;
        }

        if state.views.contains_key(&(user_id, reel_id)) {
            let stats = state
                .stats
                .get(&user_id)
                .cloned()
                .unwrap_or_else(|| UserStats::empty(user_id, at));
            return Ok(ViewOutcome {
                counted: false,
                stats,
            });
        }

        let day = day_key(at);
        let stats = state
            .stats
            .entry(user_id)
            .or_insert_with(|| UserStats::empty(user_id, at));
        stats.advance(feed_id, &day, at);
        let stats = stats.clone();

        state.views.insert(
            (user_id, reel_id),
            ViewRecord {
                feed_id,
                day_key: day,
                viewed_at: at,
            },
        );

        Ok(ViewOutcome {
            counted: true,
            stats,
        })
    }

    async fn stats_for_user(&self, user_id: UserId) -> ReelstackResult<Option<UserStats>> {
        Ok(self.state.lock().stats.get(&user_id).cloned())
    }

    async fn leaderboard(
        &self,
        mode: LeaderboardMode,
        limit: i64,
        today_key: &str,
    ) -> ReelstackResult<Vec<LeaderboardEntry>> {
        let state = self.state.lock();
        let mut ranked: Vec<&UserStats> = state.stats.values().collect();
        match mode {
            LeaderboardMode::Daily => {
                ranked.sort_by(|a, b| b.daily_streak.cmp(&a.daily_streak));
            }
            LeaderboardMode::Total => ranked.sort_by(|a, b| b.total_count.cmp(&a.total_count)),
        }
        ranked.truncate(usize::try_from(limit).unwrap_or(0));

        let mut entries: Vec<LeaderboardEntry> = ranked
            .into_iter()
            .filter_map(|stats| {
                let user = state.users.get(&stats.user_id)?;
                let daily_streak = if stats.last_day_key.as_deref() == Some(today_key) {
                    stats.daily_streak
                } else {
                    0
                };
                Some(LeaderboardEntry {
                    user_id: stats.user_id,
                    name: user.name.clone(),
                    avatar_url: user.avatar_url.clone(),
                    daily_streak,
                    total_count: stats.total_count,
                    best_streak: stats.best_streak,
                })
            })
            .collect();

        match mode {
            LeaderboardMode::Daily => entries.sort_by(|a, b| b.daily_streak.cmp(&a.daily_streak)),
            LeaderboardMode::Total => entries.sort_by(|a, b| b.total_count.cmp(&a.total_count)),
        }
        Ok(entries)
    }
}

#[async_trait]
impl CatalogSearch for MemoryStore {
    async fn search_catalog(&self, terms: &str, limit: usize) -> ReelstackResult<Vec<Reel>> {
        let terms = terms.trim().to_lowercase();
        if terms.is_empty() {
            return Ok(Vec::new());
        }

        let state = self.state.lock();
        Ok(state
            .reels
            .iter()
            .rev()
            .filter(|reel| {
                let title_match = reel
                    .title
                    .as_deref()
                    .is_some_and(|t| t.to_lowercase().contains(&terms));
                let description_match = reel
                    .description
                    .as_deref()
                    .is_some_and(|d| d.to_lowercase().contains(&terms));
                title_match || description_match
            })
            .take(limit)
            .cloned()
            .collect())
    }
}
