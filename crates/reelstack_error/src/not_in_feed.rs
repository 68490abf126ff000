//! Cross-reference integrity error types.

/// A reel was referenced in the context of a feed it is not placed in.
///
/// This is a client bug signal: the referenced reel exists but has no
/// placement record for the feed. Not retried.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Reel {} does not belong to feed {}", reel_id, feed_id)]
pub struct NotInFeedError {
    /// The feed that was expected to contain the reel
    pub feed_id: String,
    /// The reel that is not placed in the feed
    pub reel_id: String,
}

impl NotInFeedError {
    /// Create a new NotInFeedError.
    pub fn new(feed_id: impl Into<String>, reel_id: impl Into<String>) -> Self {
        Self {
            feed_id: feed_id.into(),
            reel_id: reel_id.into(),
        }
    }
}
