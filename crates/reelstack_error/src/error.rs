//! Top-level error wrapper types.

#[cfg(feature = "database")]
use crate::DatabaseError;
use crate::{
    ConfigError, HttpError, JsonError, NotFoundError, NotInFeedError, ProviderError,
    ValidationError,
};

/// This is the foundation error enum for the reelstack workspace.
///
/// # Examples
///
/// ```
/// use reelstack_error::{ReelstackError, ValidationError};
///
/// let err: ReelstackError = ValidationError::new("Comment cannot be empty").into();
/// assert!(format!("{}", err).contains("empty"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum ReelstackErrorKind {
    /// HTTP error
    #[from(HttpError)]
    Http(HttpError),
    /// JSON serialization/deserialization error
    #[from(JsonError)]
    Json(JsonError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Rejected caller input
    #[from(ValidationError)]
    Validation(ValidationError),
    /// Referenced entity does not exist
    #[from(NotFoundError)]
    NotFound(NotFoundError),
    /// Reel referenced outside the feed it is placed in
    #[from(NotInFeedError)]
    NotInFeed(NotInFeedError),
    /// External video provider failure
    #[from(ProviderError)]
    Provider(ProviderError),
    /// Database error
    #[cfg(feature = "database")]
    #[from(DatabaseError)]
    Database(DatabaseError),
}

/// Reelstack error with kind discrimination.
///
/// # Examples
///
/// ```
/// use reelstack_error::{ReelstackResult, NotFoundError};
///
/// fn might_fail() -> ReelstackResult<()> {
///     Err(NotFoundError::new("feed", "f-123"))?
/// }
///
/// match might_fail() {
///     Ok(_) => println!("Success"),
///     Err(e) => println!("Error: {}", e),
/// }
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Reelstack Error: {}", _0)]
pub struct ReelstackError(Box<ReelstackErrorKind>);

impl ReelstackError {
    /// Create a new error from a kind.
    pub fn new(kind: ReelstackErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &ReelstackErrorKind {
        &self.0
    }
}

// Generic From implementation for any type that converts to ReelstackErrorKind
impl<T> From<T> for ReelstackError
where
    T: Into<ReelstackErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

// Lets `?` propagate raw diesel errors out of transaction closures that
// return ReelstackResult.
#[cfg(feature = "database")]
impl From<diesel::result::Error> for ReelstackErrorKind {
    fn from(err: diesel::result::Error) -> Self {
        ReelstackErrorKind::Database(DatabaseError::from(err))
    }
}

/// Result type for reelstack operations.
pub type ReelstackResult<T> = std::result::Result<T, ReelstackError>;
