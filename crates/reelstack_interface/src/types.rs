//! Operation payloads and read-model views shared by the store traits.

use chrono::{DateTime, Utc};
use reelstack_core::{
    CommentId, FeedId, PlacementStatus, Reel, ReelId, ReelMetadata, UserId, UserStats,
};
use serde::{Deserialize, Serialize};

/// Payload for creating a feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewFeed {
    /// Owner
    pub user_id: UserId,
    /// The topic prompt
    pub prompt: String,
    /// Display topic
    pub topic: String,
    /// Optional description
    pub description: Option<String>,
    /// Optional tags
    pub tags: Option<Vec<String>>,
}

/// Payload for upserting a user by identity-provider subject.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    /// Identity-provider subject
    pub external_id: String,
    /// Email address
    pub email: String,
    /// Display name
    pub name: String,
    /// Avatar URL
    pub avatar_url: Option<String>,
}

/// Explicit last-write-wins patch for a reel.
///
/// Used by the generative pipeline to backfill the video URL once a clip
/// finishes rendering. Unlike the upsert fill-merge, set fields here
/// overwrite.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReelPatch {
    /// New playable URL
    pub video_url: Option<String>,
    /// New thumbnail URL
    pub thumbnail_url: Option<String>,
    /// New title
    pub title: Option<String>,
    /// New description
    pub description: Option<String>,
    /// New duration
    pub duration_seconds: Option<i32>,
    /// New metadata
    pub metadata: Option<ReelMetadata>,
}

impl ReelPatch {
    /// True when no field is set.
    pub fn is_empty(&self) -> bool {
        self.video_url.is_none()
            && self.thumbnail_url.is_none()
            && self.title.is_none()
            && self.description.is_none()
            && self.duration_seconds.is_none()
            && self.metadata.is_none()
    }
}

/// Last-write-wins viewing progress update.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ProgressUpdate {
    /// Index of the last-viewed placement in position order
    pub last_seen_index: Option<i64>,
    /// Last-viewed reel
    pub last_seen_reel_id: Option<ReelId>,
}

/// A reel joined with its placement record for one feed, the unit the
/// client scrolls through.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedReel {
    /// The canonical reel
    pub reel: Reel,
    /// The feed this view belongs to
    pub feed_id: FeedId,
    /// Ordering key within the feed; write-once
    pub position: f64,
    /// Placement status
    pub status: PlacementStatus,
}

/// One comment with its author resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentView {
    /// Comment id
    pub id: CommentId,
    /// Comment body
    pub body: String,
    /// Author
    pub user_id: UserId,
    /// Author display name
    pub user_name: String,
    /// Author avatar
    pub user_avatar_url: Option<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

/// Aggregated engagement for one reel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngagementSummary {
    /// Total likes
    pub like_count: i64,
    /// Total comments
    pub comment_count: i64,
    /// Whether the requesting user has liked the reel
    pub liked_by_user: bool,
    /// Latest comments, newest first
    pub comments: Vec<CommentView>,
}

/// Result of recording a view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewOutcome {
    /// False when the (user, reel) pair was already counted
    pub counted: bool,
    /// The user's stats after the operation
    pub stats: UserStats,
}

/// One leaderboard row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    /// Ranked user
    pub user_id: UserId,
    /// Display name
    pub name: String,
    /// Avatar URL
    pub avatar_url: Option<String>,
    /// Daily streak, zeroed when the user's last view day is not today
    pub daily_streak: i64,
    /// Total first-view count
    pub total_count: i64,
    /// Best feed streak ever reached
    pub best_streak: i64,
}
