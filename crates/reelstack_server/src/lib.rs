//! HTTP API for the reelstack feed backend.
//!
//! Exposes the operation surface consumed by the scrolling client: feed
//! CRUD and progress, fetch-cycle triggering, the ordered reel view,
//! engagement, views, and the leaderboard. The rendering client itself is
//! out of scope; this crate stops at JSON over HTTP.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod api;
mod error;
mod request;
mod server;

pub use api::{ApiState, create_router};
pub use error::ApiError;
pub use request::{
    AddCommentRequest, CreateFeedRequest, EngagementQuery, FetchRequest, LeaderboardQuery,
    ListFeedsQuery, ListReelsQuery, ProgressRequest, RecordViewRequest, ToggleLikeRequest,
    UpdateStatusRequest, UpsertUserRequest,
};
pub use server::serve;
