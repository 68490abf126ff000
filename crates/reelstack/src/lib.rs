//! reelstack — prompt-driven short-video feed backend.
//!
//! A user submits a topic prompt; the assembler pulls candidate clips from
//! the configured providers (internal catalog, generative pipeline,
//! external search and scrape APIs), merges them into a deduplicated,
//! stably-ordered feed, and tracks viewing progress, engagement, and
//! streaks.
//!
//! # Architecture
//!
//! The workspace is organized as focused crates:
//!
//! - `reelstack_core` — ids, status enums, candidates, entities
//! - `reelstack_interface` — the `SourceAdapter` and store trait seams
//! - `reelstack_error` — error taxonomy
//! - `reelstack_database` — Diesel/PostgreSQL store
//! - `reelstack_sources` — provider adapters
//! - `reelstack_feed` — assembler, position allocator, progress, engagement
//! - `reelstack_server` — axum HTTP surface
//!
//! This crate re-exports everything for convenience and ships the CLI
//! binary.

// Re-export the workspace surface
pub use reelstack_core::*;
pub use reelstack_database::{DatabaseFeedStore, establish_connection, run_migrations};
pub use reelstack_error::*;
pub use reelstack_feed::{
    CycleOutcome, Engagement, FeedAssembler, MemoryStore, PositionAllocator, ProgressTracker,
};
pub use reelstack_interface::*;
pub use reelstack_server::{ApiState, create_router, serve};
pub use reelstack_sources::{
    CatalogAdapter, GeneratedAdapter, ScrapeAdapter, SearchAdapter, SourcesConfig,
};
