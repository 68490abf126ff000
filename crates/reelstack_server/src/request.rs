//! Request payloads and query parameters.

use reelstack_core::{FeedId, FeedStatus, LeaderboardMode, PlacementStatus, ReelId, UserId};
use serde::Deserialize;

/// `POST /users` body.
#[derive(Debug, Deserialize)]
pub struct UpsertUserRequest {
    /// Identity-provider subject
    pub external_id: String,
    /// Email address
    pub email: String,
    /// Display name
    pub name: String,
    /// Avatar URL
    pub avatar_url: Option<String>,
}

/// `POST /feeds` body.
#[derive(Debug, Deserialize)]
pub struct CreateFeedRequest {
    /// Owner
    pub user_id: UserId,
    /// Topic prompt
    pub prompt: String,
    /// Display topic; defaults to the prompt
    pub topic: Option<String>,
    /// Optional description
    pub description: Option<String>,
    /// Optional tags
    pub tags: Option<Vec<String>>,
}

/// `GET /users/{user_id}/feeds` query.
#[derive(Debug, Deserialize)]
pub struct ListFeedsQuery {
    /// Optional status filter
    pub status: Option<FeedStatus>,
}

/// `PUT /feeds/{feed_id}/status` body.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    /// Target status
    pub status: FeedStatus,
}

/// `PUT /feeds/{feed_id}/progress` body.
#[derive(Debug, Deserialize)]
pub struct ProgressRequest {
    /// Index of the last-viewed placement
    pub last_seen_index: Option<i64>,
    /// Last-viewed reel
    pub last_seen_reel_id: Option<ReelId>,
}

/// `GET /feeds/{feed_id}/reels` query.
#[derive(Debug, Deserialize)]
pub struct ListReelsQuery {
    /// Optional placement status filter
    pub status: Option<PlacementStatus>,
    /// Optional row cap
    pub limit: Option<i64>,
}

/// `POST /feeds/{feed_id}/fetch` body.
#[derive(Debug, Default, Deserialize)]
pub struct FetchRequest {
    /// Prompt override; defaults to the feed's own prompt
    pub prompt: Option<String>,
    /// Candidate cap per provider
    pub limit: Option<usize>,
}

/// `POST /reels/{reel_id}/like` body.
#[derive(Debug, Deserialize)]
pub struct ToggleLikeRequest {
    /// The liking user
    pub user_id: UserId,
}

/// `POST /reels/{reel_id}/comments` body.
#[derive(Debug, Deserialize)]
pub struct AddCommentRequest {
    /// Comment author
    pub user_id: UserId,
    /// Comment body
    pub body: String,
}

/// `GET /reels/{reel_id}/engagement` query.
#[derive(Debug, Deserialize)]
pub struct EngagementQuery {
    /// Requesting user, for the liked-by-user flag
    pub user_id: Option<UserId>,
    /// Comment page size
    pub limit: Option<i64>,
}

/// `POST /views` body.
#[derive(Debug, Deserialize)]
pub struct RecordViewRequest {
    /// Viewer
    pub user_id: UserId,
    /// Feed the reel was viewed in
    pub feed_id: FeedId,
    /// Viewed reel
    pub reel_id: ReelId,
}

/// `GET /leaderboard` query.
#[derive(Debug, Deserialize)]
pub struct LeaderboardQuery {
    /// Ranking mode
    pub mode: LeaderboardMode,
    /// Page size, capped server-side
    pub limit: Option<i64>,
}
