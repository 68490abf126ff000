//! Database row models and their domain conversions.

use crate::schema::{
    feed_placements, feeds, reel_comments, reel_likes, reel_views, reels, user_stats, users,
};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use reelstack_core::{CandidateDescriptor, Feed, PlacementStatus, Reel, User, UserStats};
use reelstack_error::{DatabaseError, DatabaseErrorKind, ReelstackResult};
use std::str::FromStr;
use uuid::Uuid;

fn parse_enum<T: FromStr>(value: &str, what: &str) -> Result<T, DatabaseError> {
    T::from_str(value).map_err(|_| {
        DatabaseError::new(DatabaseErrorKind::Serialization(format!(
            "unrecognized {what}: {value}"
        )))
    })
}

/// A stored reel.
#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = reels)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ReelRow {
    pub id: Uuid,
    pub source_type: String,
    pub video_url: Option<String>,
    pub source_reference: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub thumbnail_url: Option<String>,
    pub duration_seconds: Option<i32>,
    pub metadata: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ReelRow {
    /// Convert into the domain entity.
    pub fn into_domain(self) -> ReelstackResult<Reel> {
        let metadata = match self.metadata {
            Some(value) => Some(serde_json::from_value(value).map_err(DatabaseError::from)?),
            None => None,
        };
        Ok(Reel {
            id: self.id.into(),
            source_type: parse_enum(&self.source_type, "source type")?,
            video_url: self.video_url,
            source_reference: self.source_reference,
            title: self.title,
            description: self.description,
            thumbnail_url: self.thumbnail_url,
            duration_seconds: self.duration_seconds,
            metadata,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// New reel for insertion.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = reels)]
pub struct NewReelRow {
    pub id: Uuid,
    pub source_type: String,
    pub video_url: Option<String>,
    pub source_reference: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub thumbnail_url: Option<String>,
    pub duration_seconds: Option<i32>,
    pub metadata: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl NewReelRow {
    /// Build a fresh row from an adapter candidate.
    pub fn from_candidate(
        candidate: &CandidateDescriptor,
        now: DateTime<Utc>,
    ) -> ReelstackResult<Self> {
        let metadata = match &candidate.metadata {
            Some(meta) => Some(serde_json::to_value(meta).map_err(DatabaseError::from)?),
            None => None,
        };
        Ok(Self {
            id: Uuid::new_v4(),
            source_type: candidate.source_type.to_string(),
            video_url: candidate.video_url.clone(),
            source_reference: candidate.source_reference.clone(),
            title: candidate.title.clone(),
            description: candidate.description.clone(),
            thumbnail_url: candidate.thumbnail_url.clone(),
            duration_seconds: candidate.duration_seconds,
            metadata,
            created_at: now,
            updated_at: now,
        })
    }
}

/// Partial reel update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = reels)]
pub struct ReelChangeset {
    pub video_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub duration_seconds: Option<i32>,
    pub metadata: Option<serde_json::Value>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl ReelChangeset {
    /// True when nothing would change.
    pub fn is_empty(&self) -> bool {
        self.video_url.is_none()
            && self.thumbnail_url.is_none()
            && self.title.is_none()
            && self.description.is_none()
            && self.duration_seconds.is_none()
            && self.metadata.is_none()
    }
}

/// A stored feed.
#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = feeds)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct FeedRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub prompt: String,
    pub topic: String,
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
    pub status: String,
    pub last_seen_reel_id: Option<Uuid>,
    pub last_seen_index: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FeedRow {
    /// Convert into the domain entity.
    pub fn into_domain(self) -> ReelstackResult<Feed> {
        Ok(Feed {
            id: self.id.into(),
            user_id: self.user_id.into(),
            prompt: self.prompt,
            topic: self.topic,
            description: self.description,
            tags: self.tags,
            status: parse_enum(&self.status, "feed status")?,
            last_seen_reel_id: self.last_seen_reel_id.map(Into::into),
            last_seen_index: self.last_seen_index,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// New feed for insertion.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = feeds)]
pub struct NewFeedRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub prompt: String,
    pub topic: String,
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A stored placement.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = feed_placements)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PlacementRow {
    pub feed_id: Uuid,
    pub reel_id: Uuid,
    pub position: f64,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PlacementRow {
    /// Parse the placement status column.
    pub fn placement_status(&self) -> ReelstackResult<PlacementStatus> {
        Ok(parse_enum(&self.status, "placement status")?)
    }
}

/// New placement for insertion.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = feed_placements)]
pub struct NewPlacementRow {
    pub feed_id: Uuid,
    pub reel_id: Uuid,
    pub position: f64,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A stored user.
#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRow {
    pub id: Uuid,
    pub external_id: String,
    pub email: String,
    pub name: String,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

impl UserRow {
    /// Convert into the domain entity.
    pub fn into_domain(self) -> User {
        User {
            id: self.id.into(),
            external_id: self.external_id,
            email: self.email,
            name: self.name,
            avatar_url: self.avatar_url,
            created_at: self.created_at,
            last_login_at: self.last_login_at,
        }
    }
}

/// New user for insertion.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub struct NewUserRow {
    pub id: Uuid,
    pub external_id: String,
    pub email: String,
    pub name: String,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

/// A stored stats row.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = user_stats)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserStatsRow {
    pub user_id: Uuid,
    pub current_streak: i64,
    pub best_streak: i64,
    pub daily_streak: i64,
    pub total_count: i64,
    pub last_feed_id: Option<Uuid>,
    pub last_day_key: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserStatsRow {
    /// Convert into the domain entity.
    pub fn into_domain(self) -> UserStats {
        UserStats {
            user_id: self.user_id.into(),
            current_streak: self.current_streak,
            best_streak: self.best_streak,
            daily_streak: self.daily_streak,
            total_count: self.total_count,
            last_feed_id: self.last_feed_id.map(Into::into),
            last_day_key: self.last_day_key,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// New stats row, zeroed.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = user_stats)]
pub struct NewUserStatsRow {
    pub user_id: Uuid,
    pub current_streak: i64,
    pub best_streak: i64,
    pub daily_streak: i64,
    pub total_count: i64,
    pub last_feed_id: Option<Uuid>,
    pub last_day_key: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl NewUserStatsRow {
    /// Zeroed stats for a user with no counted views.
    pub fn empty(user_id: Uuid, now: DateTime<Utc>) -> Self {
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
}

/// New first-view fact row.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = reel_views)]
pub struct NewReelViewRow {
    pub user_id: Uuid,
    pub reel_id: Uuid,
    pub feed_id: Uuid,
    pub day_key: String,
    pub viewed_at: DateTime<Utc>,
}

/// New like row.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = reel_likes)]
pub struct NewLikeRow {
    pub reel_id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// A stored comment.
#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = reel_comments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CommentRow {
    pub id: Uuid,
    pub reel_id: Uuid,
    pub user_id: Uuid,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

/// New comment for insertion.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = reel_comments)]
pub struct NewCommentRow {
    pub id: Uuid,
    pub reel_id: Uuid,
    pub user_id: Uuid,
    pub body: String,
    pub created_at: DateTime<Utc>,
}
