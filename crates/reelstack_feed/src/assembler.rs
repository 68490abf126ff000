//! The feed assembler: one fetch cycle from providers to placements.

use crate::position::PositionAllocator;
use chrono::Utc;
use parking_lot::Mutex;
use reelstack_core::{CandidateDescriptor, Feed, FeedId, FeedStatus, PlacementStatus};
use reelstack_error::{ConfigError, NotFoundError, ReelstackResult};
use reelstack_interface::{FeedStore, PlacementHint, SourceAdapter};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::time::timeout;
use tracing::{debug, info, instrument, warn};

/// Result of one fetch cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleOutcome {
    /// Newly-created placements this cycle
    pub inserted: usize,
    /// True when the cycle was skipped because one was already in flight
    /// for the feed
    pub already_running: bool,
}

/// Orchestrates fetch cycles for feeds.
///
/// Adapters run in registration (priority) order, each under its own
/// timeout budget. A failing or slow provider is logged and skipped; its
/// contribution is empty for the cycle. Candidates merge through
/// `upsert_reel` + placement-insert-if-absent, so re-running a cycle is
/// idempotent. A per-feed in-flight flag prevents two overlapping cycles
/// for the same feed.
pub struct FeedAssembler<S> {
    store: Arc<S>,
    adapters: Vec<Arc<dyn SourceAdapter>>,
    in_flight: Mutex<HashSet<FeedId>>,
}

impl<S> FeedAssembler<S>
where
    S: FeedStore,
{
    /// Create an assembler with no adapters registered.
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            adapters: Vec::new(),
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    /// Register an adapter. Order of registration is priority order.
    pub fn with_adapter(mut self, adapter: Arc<dyn SourceAdapter>) -> Self {
        self.adapters.push(adapter);
        self
    }

    /// The underlying store.
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Drive one fetch cycle for the feed.
    ///
    /// Marks the feed `curating`, pulls from every configured adapter with
    /// partial-failure tolerance, merges the candidates, then flips the
    /// feed to `ready` when anything landed or back to `pending` otherwise.
    /// A second concurrent call for the same feed is a no-op reporting
    /// `already_running`.
    #[instrument(skip(self, prompt), fields(feed = %feed_id))]
    pub async fn run_fetch_cycle(
        &self,
        feed_id: FeedId,
        prompt: &str,
        limit: usize,
    ) -> ReelstackResult<CycleOutcome> {
        if self.adapters.is_empty() {
            return Err(ConfigError::new("no source adapters configured").into());
        }

        let _guard = match InFlightGuard::acquire(&self.in_flight, feed_id) {
            Some(guard) => guard,
            None => {
                debug!("fetch cycle already in flight, skipping");
                return Ok(CycleOutcome {
                    inserted: 0,
                    already_running: true,
                });
            }
        };

        let feed = self
            .store
            .get_feed(feed_id)
            .await?
            .ok_or_else(|| NotFoundError::new("feed", feed_id.to_string()))?;
        self.store
            .set_feed_status(feed_id, FeedStatus::Curating)
            .await?;

        match self.run_adapters(&feed, prompt, limit).await {
            Ok(inserted) => {
                let status = if inserted > 0 {
                    FeedStatus::Ready
                } else {
                    FeedStatus::Pending
                };
                self.store.set_feed_status(feed_id, status).await?;
                info!(inserted, status = %status, "fetch cycle complete");
                Ok(CycleOutcome {
                    inserted,
                    already_running: false,
                })
            }
            Err(err) => {
                // Leave the feed retryable rather than stuck in curating.
                if let Err(status_err) = self
                    .store
                    .set_feed_status(feed_id, FeedStatus::Pending)
                    .await
                {
                    warn!(error = %status_err, "failed to reset feed status after cycle error");
                }
                Err(err)
            }
        }
    }

    async fn run_adapters(
        &self,
        feed: &Feed,
        prompt: &str,
        limit: usize,
    ) -> ReelstackResult<usize> {
        let mut inserted = 0;
        for adapter in &self.adapters {
            let source = adapter.source_name();
            let candidates = match timeout(adapter.timeout(), adapter.fetch(prompt, limit)).await {
                Ok(Ok(candidates)) => candidates,
                Ok(Err(err)) => {
                    warn!(source, error = %err, "provider failed, continuing with next");
                    continue;
                }
                Err(_) => {
                    warn!(
                        source,
                        budget_secs = adapter.timeout().as_secs(),
                        "provider timed out, treating contribution as empty"
                    );
                    continue;
                }
            };

            if candidates.is_empty() {
                debug!(source, "no candidates");
                continue;
            }

            let merged = self
                .merge_batch(feed, adapter.placement(), candidates)
                .await?;
            debug!(source, merged, "merged provider batch");
            inserted += merged;
        }
        Ok(inserted)
    }

    /// Merge one adapter's batch into the store.
    ///
    /// Positions are allocated for the whole batch up front, by candidate
    /// index; duplicate contributions leave gaps rather than shifting
    /// later batch members.
    async fn merge_batch(
        &self,
        feed: &Feed,
        hint: PlacementHint,
        candidates: Vec<CandidateDescriptor>,
    ) -> ReelstackResult<usize> {
        let positions = self
            .allocate_positions(feed, hint, candidates.len())
            .await?;

        let mut inserted = 0;
        for (candidate, position) in candidates.into_iter().zip(positions) {
            if candidate.is_anonymous() {
                debug!("dropping candidate with no dedup key");
                continue;
            }

            let reel_id = self.store.upsert_reel(&candidate).await?;
            let status = if candidate.video_url.is_some() {
                PlacementStatus::Ready
            } else {
                PlacementStatus::Pending
            };
            let is_new = self
                .store
                .insert_placement(feed.id, reel_id, position, status)
                .await?;
            if is_new {
                inserted += 1;
            } else {
                debug!(reel = %reel_id, "duplicate contribution, skipped");
            }
        }
        Ok(inserted)
    }

    async fn allocate_positions(
        &self,
        feed: &Feed,
        hint: PlacementHint,
        count: usize,
    ) -> ReelstackResult<Vec<f64>> {
        let positions = self.store.positions(feed.id).await?;
        let append = |positions: &[f64]| {
            PositionAllocator::append(
                positions.last().copied(),
                Utc::now().timestamp_millis(),
                count,
            )
        };

        match hint {
            PlacementHint::Append => Ok(append(&positions)),
            PlacementHint::AfterLastSeen => {
                let Some(index) = feed.last_seen_index else {
                    return Ok(append(&positions));
                };
                let index = usize::try_from(index).unwrap_or(0);
                match positions.get(index) {
                    Some(&at) => {
                        let next = positions.get(index + 1).copied();
                        Ok(PositionAllocator::interleave(at, next, count))
                    }
                    None => Ok(append(&positions)),
                }
            }
        }
    }
}

/// Removes the feed from the in-flight set when the cycle ends, however it
/// ends.
struct InFlightGuard<'a> {
    flights: &'a Mutex<HashSet<FeedId>>,
    feed_id: FeedId,
}

impl<'a> InFlightGuard<'a> {
    fn acquire(flights: &'a Mutex<HashSet<FeedId>>, feed_id: FeedId) -> Option<Self> {
        let mut set = flights.lock();
        if !set.insert(feed_id) {
            return None;
        }
        Some(Self { flights, feed_id })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flights.lock().remove(&self.feed_id);
    }
}
