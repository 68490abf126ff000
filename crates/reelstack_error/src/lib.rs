//! Error types for the reelstack feed backend.
//!
//! This crate provides the foundation error types used throughout the
//! reelstack workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern for clean error
//! handling:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use reelstack_error::{ReelstackResult, ProviderError, ProviderErrorKind};
//!
//! fn fetch_clips() -> ReelstackResult<Vec<String>> {
//!     Err(ProviderError::new(ProviderErrorKind::Unreachable(
//!         "connection refused".to_string(),
//!     )))?
//! }
//!
//! match fetch_clips() {
//!     Ok(clips) => println!("Got {} clips", clips.len()),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
#[cfg(feature = "database")]
mod database;
mod error;
mod http;
mod json;
mod not_found;
mod not_in_feed;
mod provider;
mod validation;

pub use config::ConfigError;
#[cfg(feature = "database")]
pub use database::{DatabaseError, DatabaseErrorKind};
pub use error::{ReelstackError, ReelstackErrorKind, ReelstackResult};
pub use http::HttpError;
pub use json::JsonError;
pub use not_found::NotFoundError;
pub use not_in_feed::NotInFeedError;
pub use provider::{ProviderError, ProviderErrorKind};
pub use validation::ValidationError;
