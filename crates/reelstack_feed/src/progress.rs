//! Viewing-progress tracking and the hydration decision.

use reelstack_core::FeedId;
use reelstack_error::{NotFoundError, NotInFeedError, ReelstackResult};
use reelstack_interface::{FeedRepository, PlacementStore, ProgressUpdate};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Records consumption progress and decides when the assembler should run
/// again.
pub struct ProgressTracker<S> {
    store: Arc<S>,
}

impl<S> ProgressTracker<S>
where
    S: FeedRepository + PlacementStore,
{
    /// Create a tracker over the given store.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Last-write-wins update of the feed's last-seen index and reel.
    ///
    /// When a reel id is given it must actually be placed in the feed;
    /// otherwise the update is rejected with `NotInFeedError`.
    #[instrument(skip(self), fields(feed = %feed_id))]
    pub async fn record_progress(
        &self,
        feed_id: FeedId,
        update: ProgressUpdate,
    ) -> ReelstackResult<()> {
        if self.store.get_feed(feed_id).await?.is_none() {
            Err(NotFoundError::new("feed", feed_id.to_string()))?;
        }

        if let Some(reel_id) = update.last_seen_reel_id {
            if !self.store.is_placed(feed_id, reel_id).await? {
                Err(NotInFeedError::new(feed_id.to_string(), reel_id.to_string()))?;
            }
        }

        self.store.update_progress(feed_id, update).await
    }

    /// Loaded-but-unviewed placements ahead of the last-seen index.
    pub async fn remaining_ahead(&self, feed_id: FeedId) -> ReelstackResult<usize> {
        let feed = self
            .store
            .get_feed(feed_id)
            .await?
            .ok_or_else(|| NotFoundError::new("feed", feed_id.to_string()))?;

        let total = self.store.positions(feed_id).await?.len();
        let viewed = feed
            .last_seen_index
            .map_or(0, |index| usize::try_from(index + 1).unwrap_or(0));
        Ok(total.saturating_sub(viewed))
    }

    /// True once the viewer has consumed everything loaded; the client is
    /// expected to trigger another fetch cycle at that point.
    pub async fn needs_hydration(&self, feed_id: FeedId) -> ReelstackResult<bool> {
        let remaining = self.remaining_ahead(feed_id).await?;
        debug!(feed = %feed_id, remaining, "hydration check");
        Ok(remaining == 0)
    }
}
