//! Internal catalog adapter.

use crate::config::CatalogConfig;
use async_trait::async_trait;
use reelstack_core::{CandidateDescriptor, Reel, SourceType};
use reelstack_error::ReelstackResult;
use reelstack_interface::{CatalogSearch, SourceAdapter};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Adapter over reels already present in the store.
///
/// Resolves the prompt against stored titles and descriptions through the
/// `CatalogSearch` seam. Candidates carry the stored reel's dedup keys, so
/// merging them is a pure placement operation — no new reel rows.
pub struct CatalogAdapter<S> {
    store: Arc<S>,
    limit: usize,
}

impl<S> CatalogAdapter<S> {
    /// Create an adapter over the given catalog seam.
    pub fn new(store: Arc<S>, config: &CatalogConfig) -> Self {
        Self {
            store,
            limit: config.limit,
        }
    }
}

fn candidate_from_reel(reel: Reel) -> CandidateDescriptor {
    CandidateDescriptor {
        source_type: SourceType::Internal,
        video_url: reel.video_url,
        source_reference: reel.source_reference,
        title: reel.title,
        description: reel.description,
        thumbnail_url: reel.thumbnail_url,
        duration_seconds: reel.duration_seconds,
        metadata: reel.metadata,
    }
}

#[async_trait]
impl<S> SourceAdapter for CatalogAdapter<S>
where
    S: CatalogSearch + Send + Sync,
{
    #[instrument(skip(self), fields(source = self.source_name()))]
    async fn fetch(&self, prompt: &str, limit: usize) -> ReelstackResult<Vec<CandidateDescriptor>> {
        let limit = limit.min(self.limit);
        let reels = self.store.search_catalog(prompt, limit).await?;
        debug!(count = reels.len(), "catalog matches");
        Ok(reels
            .into_iter()
            .filter(|reel| reel.video_url.is_some())
            .map(candidate_from_reel)
            .collect())
    }

    fn source_name(&self) -> &'static str {
        "catalog"
    }

    fn source_type(&self) -> SourceType {
        SourceType::Internal
    }
}
