//! Router and handlers.

use crate::error::ApiError;
use crate::request::{
    AddCommentRequest, CreateFeedRequest, EngagementQuery, FetchRequest, LeaderboardQuery,
    ListFeedsQuery, ListReelsQuery, ProgressRequest, RecordViewRequest, ToggleLikeRequest,
    UpdateStatusRequest, UpsertUserRequest,
};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use axum::routing::{get, post, put};
use axum::Router;
use reelstack_core::{FeedId, ReelId, UserId};
use reelstack_error::NotFoundError;
use reelstack_feed::{Engagement, FeedAssembler, ProgressTracker};
use reelstack_interface::{FeedStore, NewFeed, NewUser, ProgressUpdate};
use serde_json::json;
use std::sync::Arc;

/// Shared handler state: the store plus the services over it.
pub struct ApiState<S> {
    store: Arc<S>,
    assembler: Arc<FeedAssembler<S>>,
    progress: Arc<ProgressTracker<S>>,
    engagement: Arc<Engagement<S>>,
}

impl<S> Clone for ApiState<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            assembler: self.assembler.clone(),
            progress: self.progress.clone(),
            engagement: self.engagement.clone(),
        }
    }
}

impl<S> ApiState<S>
where
    S: FeedStore,
{
    /// Create handler state over a store and a configured assembler.
    pub fn new(store: Arc<S>, assembler: Arc<FeedAssembler<S>>) -> Self {
        Self {
            progress: Arc::new(ProgressTracker::new(store.clone())),
            engagement: Arc::new(Engagement::new(store.clone())),
            store,
            assembler,
        }
    }
}

/// Build the API router.
pub fn create_router<S>(state: ApiState<S>) -> Router
where
    S: FeedStore + 'static,
{
    Router::new()
        .route("/health", get(health))
        .route("/users", post(upsert_user))
        .route("/users/:user_id/feeds", get(list_feeds))
        .route("/feeds", post(create_feed))
        .route("/feeds/:feed_id", get(get_feed).delete(delete_feed))
        .route("/feeds/:feed_id/status", put(update_status))
        .route("/feeds/:feed_id/progress", put(update_progress))
        .route("/feeds/:feed_id/reels", get(list_reels))
        .route("/feeds/:feed_id/fetch", post(run_fetch_cycle))
        .route("/reels/:reel_id/like", post(toggle_like))
        .route("/reels/:reel_id/comments", post(add_comment))
        .route("/reels/:reel_id/engagement", get(reel_engagement))
        .route("/views", post(record_view))
        .route("/leaderboard", get(leaderboard))
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"status": "ok"})))
}

async fn upsert_user<S: FeedStore>(
    State(state): State<ApiState<S>>,
    Json(req): Json<UpsertUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user_id = state
        .store
        .upsert_user(NewUser {
            external_id: req.external_id,
            email: req.email,
            name: req.name,
            avatar_url: req.avatar_url,
        })
        .await?;
    Ok(Json(json!({ "user_id": user_id })))
}

async fn create_feed<S: FeedStore>(
    State(state): State<ApiState<S>>,
    Json(req): Json<CreateFeedRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let topic = req.topic.unwrap_or_else(|| req.prompt.clone());
    let feed_id = state
        .store
        .create_feed(NewFeed {
            user_id: req.user_id,
            prompt: req.prompt,
            topic,
            description: req.description,
            tags: req.tags,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(json!({ "feed_id": feed_id }))))
}

async fn list_feeds<S: FeedStore>(
    State(state): State<ApiState<S>>,
    Path(user_id): Path<UserId>,
    Query(query): Query<ListFeedsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let feeds = state.store.list_feeds_by_user(user_id, query.status).await?;
    Ok(Json(feeds))
}

async fn get_feed<S: FeedStore>(
    State(state): State<ApiState<S>>,
    Path(feed_id): Path<FeedId>,
) -> Result<impl IntoResponse, ApiError> {
    let feed = state
        .store
        .get_feed(feed_id)
        .await?
        .ok_or_else(|| NotFoundError::new("feed", feed_id.to_string()))
        .map_err(reelstack_error::ReelstackError::from)?;
    Ok(Json(feed))
}

async fn delete_feed<S: FeedStore>(
    State(state): State<ApiState<S>>,
    Path(feed_id): Path<FeedId>,
) -> Result<impl IntoResponse, ApiError> {
    state.store.delete_feed(feed_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn update_status<S: FeedStore>(
    State(state): State<ApiState<S>>,
    Path(feed_id): Path<FeedId>,
    Json(req): Json<UpdateStatusRequest>,
) -> Result<impl IntoResponse, ApiError> {
    state.store.set_feed_status(feed_id, req.status).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn update_progress<S: FeedStore>(
    State(state): State<ApiState<S>>,
    Path(feed_id): Path<FeedId>,
    Json(req): Json<ProgressRequest>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .progress
        .record_progress(
            feed_id,
            ProgressUpdate {
                last_seen_index: req.last_seen_index,
                last_seen_reel_id: req.last_seen_reel_id,
            },
        )
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_reels<S: FeedStore>(
    State(state): State<ApiState<S>>,
    Path(feed_id): Path<FeedId>,
    Query(query): Query<ListReelsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let placed = state
        .store
        .list_placements(feed_id, query.status, query.limit)
        .await?;
    Ok(Json(placed))
}

async fn run_fetch_cycle<S: FeedStore>(
    State(state): State<ApiState<S>>,
    Path(feed_id): Path<FeedId>,
    body: Option<Json<FetchRequest>>,
) -> Result<impl IntoResponse, ApiError> {
    let req = body.map(|Json(req)| req).unwrap_or_default();
    let feed = state
        .store
        .get_feed(feed_id)
        .await?
        .ok_or_else(|| NotFoundError::new("feed", feed_id.to_string()))
        .map_err(reelstack_error::ReelstackError::from)?;
    let prompt = req.prompt.unwrap_or(feed.prompt);
    let limit = req.limit.unwrap_or(8);

    let outcome = state
        .assembler
        .run_fetch_cycle(feed_id, &prompt, limit)
        .await?;
    Ok(Json(json!({
        "inserted": outcome.inserted,
        "already_running": outcome.already_running,
    })))
}

async fn toggle_like<S: FeedStore>(
    State(state): State<ApiState<S>>,
    Path(reel_id): Path<ReelId>,
    Json(req): Json<ToggleLikeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let liked = state.engagement.toggle_like(reel_id, req.user_id).await?;
    Ok(Json(json!({ "liked": liked })))
}

async fn add_comment<S: FeedStore>(
    State(state): State<ApiState<S>>,
    Path(reel_id): Path<ReelId>,
    Json(req): Json<AddCommentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let comment_id = state
        .engagement
        .add_comment(reel_id, req.user_id, &req.body)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "comment_id": comment_id })),
    ))
}

async fn reel_engagement<S: FeedStore>(
    State(state): State<ApiState<S>>,
    Path(reel_id): Path<ReelId>,
    Query(query): Query<EngagementQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let summary = state
        .engagement
        .reel_engagement(reel_id, query.user_id, query.limit)
        .await?;
    Ok(Json(summary))
}

async fn record_view<S: FeedStore>(
    State(state): State<ApiState<S>>,
    Json(req): Json<RecordViewRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let outcome = state
        .engagement
        .record_view(req.user_id, req.feed_id, req.reel_id)
        .await?;
    Ok(Json(outcome))
}

async fn leaderboard<S: FeedStore>(
    State(state): State<ApiState<S>>,
    Query(query): Query<LeaderboardQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let entries = state
        .engagement
        .leaderboard(query.mode, query.limit)
        .await?;
    Ok(Json(entries))
}
