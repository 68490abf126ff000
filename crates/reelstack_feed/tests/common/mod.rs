//! Shared helpers for the feed crate's integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use reelstack_core::{CandidateDescriptor, FeedId, SourceType, UserId};
use reelstack_error::{ProviderError, ProviderErrorKind, ReelstackResult};
use reelstack_feed::MemoryStore;
use reelstack_interface::{FeedRepository, NewFeed, PlacementHint, SourceAdapter};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

/// Build an external candidate with a distinct URL.
pub fn external_candidate(url: &str, reference: Option<&str>, title: &str) -> CandidateDescriptor {
    let mut candidate = CandidateDescriptor::new(SourceType::External)
        .with_video_url(url)
        .with_title(title);
    if let Some(reference) = reference {
        candidate = candidate.with_source_reference(reference);
    }
    candidate
}

/// Seed a user and a pending feed.
pub async fn seed_feed(store: &Arc<MemoryStore>) -> (UserId, FeedId) {
    let user_id = store.seed_user("viewer");
    let feed_id = store
        .create_feed(NewFeed {
            user_id,
            prompt: "rust lifetimes".to_string(),
            topic: "rust lifetimes".to_string(),
            description: None,
            tags: None,
        })
        .await
        .unwrap();
    (user_id, feed_id)
}

/// Adapter that pops one scripted batch per fetch, empty once exhausted.
pub struct ScriptedAdapter {
    batches: Mutex<VecDeque<Vec<CandidateDescriptor>>>,
    placement: PlacementHint,
    delay: Option<Duration>,
}

impl ScriptedAdapter {
    pub fn new(batches: Vec<Vec<CandidateDescriptor>>) -> Self {
        Self {
            batches: Mutex::new(batches.into()),
            placement: PlacementHint::Append,
            delay: None,
        }
    }

    pub fn with_placement(mut self, placement: PlacementHint) -> Self {
        self.placement = placement;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[async_trait]
impl SourceAdapter for ScriptedAdapter {
    async fn fetch(&self, _prompt: &str, _limit: usize) -> ReelstackResult<Vec<CandidateDescriptor>> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        Ok(self.batches.lock().pop_front().unwrap_or_default())
    }

    fn source_name(&self) -> &'static str {
        "scripted"
    }

    fn source_type(&self) -> SourceType {
        SourceType::External
    }

    fn placement(&self) -> PlacementHint {
        self.placement
    }
}

/// Adapter whose endpoint is always unreachable.
pub struct FailingAdapter;

#[async_trait]
impl SourceAdapter for FailingAdapter {
    async fn fetch(&self, _prompt: &str, _limit: usize) -> ReelstackResult<Vec<CandidateDescriptor>> {
        Err(ProviderError::new(ProviderErrorKind::Unreachable(
            "connection refused".to_string(),
        ))
        .into())
    }

    fn source_name(&self) -> &'static str {
        "failing"
    }

    fn source_type(&self) -> SourceType {
        SourceType::External
    }
}
