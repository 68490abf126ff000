//! Missing entity error types.

/// Entity lookup failure.
///
/// Raised when a feed, reel, or user referenced by id does not exist. Not
/// retried; surfaced to the caller.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("{} not found: {}", entity, id)]
pub struct NotFoundError {
    /// Entity kind, e.g. "feed", "reel", "user"
    pub entity: &'static str,
    /// The id that failed to resolve
    pub id: String,
}

impl NotFoundError {
    /// Create a new NotFoundError for the given entity kind and id.
    pub fn new(entity: &'static str, id: impl Into<String>) -> Self {
        Self {
            entity,
            id: id.into(),
        }
    }
}
