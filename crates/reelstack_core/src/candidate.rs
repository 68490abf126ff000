//! Candidate descriptors produced by source adapters.

use crate::{ReelMetadata, SourceType};
use serde::{Deserialize, Serialize};

/// A normalized video candidate returned by a source adapter.
///
/// Candidates are merged into the reel store by the assembler: `video_url`
/// and `source_reference` are the dedup keys, everything else fill-merges
/// into an existing reel. A candidate without a video URL is only placeable
/// as `pending` (the generative pipeline backfills the URL later).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateDescriptor {
    /// Which kind of source produced this candidate
    pub source_type: SourceType,
    /// Primary playable (embeddable) URL
    pub video_url: Option<String>,
    /// Provider-specific dedup key, e.g. the external video id
    pub source_reference: Option<String>,
    /// Clip title
    pub title: Option<String>,
    /// Clip description
    pub description: Option<String>,
    /// Thumbnail URL
    pub thumbnail_url: Option<String>,
    /// Duration in seconds, when the provider reports one
    pub duration_seconds: Option<i32>,
    /// Provider metadata
    pub metadata: Option<ReelMetadata>,
}

impl CandidateDescriptor {
    /// Create a bare candidate for the given source type.
    pub fn new(source_type: SourceType) -> Self {
        Self {
            source_type,
            video_url: None,
            source_reference: None,
            title: None,
            description: None,
            thumbnail_url: None,
            duration_seconds: None,
            metadata: None,
        }
    }

    /// Set the playable URL.
    pub fn with_video_url(mut self, url: impl Into<String>) -> Self {
        self.video_url = Some(url.into());
        self
    }

    /// Set the provider dedup reference.
    pub fn with_source_reference(mut self, reference: impl Into<String>) -> Self {
        self.source_reference = Some(reference.into());
        self
    }

    /// Set the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the provider metadata.
    pub fn with_metadata(mut self, metadata: ReelMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// True when the candidate carries neither dedup key.
    ///
    /// Such a candidate cannot be merged and is dropped by the assembler.
    pub fn is_anonymous(&self) -> bool {
        self.video_url.is_none() && self.source_reference.is_none()
    }
}
