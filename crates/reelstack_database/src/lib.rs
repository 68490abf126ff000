//! PostgreSQL integration for reelstack.
//!
//! This crate provides the Diesel schema, row models, and repository
//! implementations behind the `reelstack_interface` store traits.
//!
//! # Concurrency
//!
//! Cross-request races resolve at this layer:
//! - reel dedup and placement uniqueness are conditional inserts under
//!   unique indexes (`ON CONFLICT DO NOTHING`), with a re-read on conflict
//! - the per-user streak read-modify-write takes `SELECT ... FOR UPDATE`
//!   on the stats row before touching counters
//!
//! # Example
//!
//! ```rust,ignore
//! use reelstack_database::{establish_connection, run_migrations, DatabaseFeedStore};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut conn = establish_connection()?;
//! run_migrations(&mut conn)?;
//! let store = DatabaseFeedStore::connect(&std::env::var("DATABASE_URL")?)?;
//! # Ok(())
//! # }
//! ```

mod connection;
mod engagement_repository;
mod feed_repository;
mod models;
mod reel_repository;
mod stats_repository;
mod store;
mod user_repository;

// Public module for external access
pub mod schema;

// Re-export connection utilities
pub use connection::{MIGRATIONS, build_pool, establish_connection, run_migrations};

// Re-export the async store adapter
pub use store::DatabaseFeedStore;

// Re-export row models for callers that need them
pub use models::{FeedRow, PlacementRow, ReelRow, UserRow, UserStatsRow};

use reelstack_error::DatabaseError;

/// Result type for database operations.
pub type DatabaseResult<T> = Result<T, DatabaseError>;
