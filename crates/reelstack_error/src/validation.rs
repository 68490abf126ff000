//! Input validation error types.

/// Validation error for rejected caller input.
///
/// Surfaced verbatim to the caller: an empty or over-length comment body, a
/// missing required reference, a malformed id.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Validation Error: {}", message)]
pub struct ValidationError {
    /// Why the input was rejected
    pub message: String,
}

impl ValidationError {
    /// Create a new ValidationError.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
