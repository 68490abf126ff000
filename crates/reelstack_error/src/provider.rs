//! External video provider error types.

/// Provider error conditions.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum ProviderErrorKind {
    /// The provider endpoint could not be reached
    #[display("Provider unreachable: {}", _0)]
    Unreachable(String),
    /// The provider returned a non-success status
    #[display("Provider returned status {}: {}", code, detail)]
    Status {
        /// HTTP status code
        code: u16,
        /// Response body text
        detail: String,
    },
    /// The provider response body could not be decoded
    #[display("Provider response decode failed: {}", _0)]
    Decode(String),
    /// The provider did not respond within the adapter's timeout budget
    #[display("Provider timed out after {}s", _0)]
    Timeout(u64),
}

/// Provider error with source location tracking.
///
/// Caught per-adapter inside the assembler: one broken provider is logged
/// and skipped rather than aborting the fetch cycle.
///
/// # Examples
///
/// ```
/// use reelstack_error::{ProviderError, ProviderErrorKind};
///
/// let err = ProviderError::new(ProviderErrorKind::Status {
///     code: 503,
///     detail: "search backend down".to_string(),
/// });
/// assert!(format!("{}", err).contains("503"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Provider Error: {} at line {} in {}", kind, line, file)]
pub struct ProviderError {
    /// The kind of error that occurred
    pub kind: ProviderErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl ProviderError {
    /// Create a new ProviderError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ProviderErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
