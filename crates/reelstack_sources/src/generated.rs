//! Generative video pipeline adapter.

use crate::config::GeneratedConfig;
use crate::dto::{GeneratedClip, GeneratedResponse};
use async_trait::async_trait;
use reelstack_core::{CandidateDescriptor, ReelMetadata, SourceType};
use reelstack_error::{ProviderError, ProviderErrorKind, ReelstackResult};
use reelstack_interface::SourceAdapter;
use reqwest::Client;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, instrument};

/// Client for the generative video pipeline.
///
/// Unlike the search adapters, clips may come back without a playable URL
/// while still rendering; those are kept and placed as `pending`, with the
/// URL backfilled through `patch_reel` once the pipeline finishes. The
/// `clip_id` is the dedup reference that ties the backfill to the row.
#[derive(Debug, Clone)]
pub struct GeneratedAdapter {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl GeneratedAdapter {
    /// Create an adapter from configuration.
    pub fn new(config: &GeneratedConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }
}

fn candidate_from_clip(clip: GeneratedClip, prompt: &str) -> CandidateDescriptor {
    let metadata = ReelMetadata {
        provider: Some("pipeline".to_string()),
        ..ReelMetadata::default()
    };
    CandidateDescriptor {
        source_type: SourceType::Generated,
        video_url: clip.video_url,
        source_reference: Some(clip.clip_id),
        title: clip.title,
        description: Some(prompt.to_string()),
        thumbnail_url: clip.thumbnail_url,
        duration_seconds: clip.duration_seconds,
        metadata: Some(metadata),
    }
}

#[async_trait]
impl SourceAdapter for GeneratedAdapter {
    #[instrument(skip(self), fields(source = self.source_name()))]
    async fn fetch(&self, prompt: &str, limit: usize) -> ReelstackResult<Vec<CandidateDescriptor>> {
        let url = format!("{}/generate", self.base_url);
        debug!(url = %url, limit, "requesting generated clips");

        let response = self
            .client
            .post(&url)
            .json(&json!({ "prompt": prompt, "count": limit }))
            .send()
            .await
            .map_err(|e| ProviderError::new(ProviderErrorKind::Unreachable(e.to_string())))?;

        if !response.status().is_success() {
            let code = response.status().as_u16();
            let detail = response.text().await.unwrap_or_default();
            return Err(ProviderError::new(ProviderErrorKind::Status { code, detail }).into());
        }

        let payload: GeneratedResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::new(ProviderErrorKind::Decode(e.to_string())))?;

        Ok(payload
            .clips
            .into_iter()
            .map(|clip| candidate_from_clip(clip, prompt))
            .collect())
    }

    fn source_name(&self) -> &'static str {
        "generated"
    }

    fn source_type(&self) -> SourceType {
        SourceType::Generated
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rendering_clip_keeps_reference_without_url() {
        let clip = GeneratedClip {
            clip_id: "veo-42".to_string(),
            title: Some("Rendering".to_string()),
            ..GeneratedClip::default()
        };
        let candidate = candidate_from_clip(clip, "space documentaries");
        assert!(candidate.video_url.is_none());
        assert_eq!(candidate.source_reference.as_deref(), Some("veo-42"));
        assert!(!candidate.is_anonymous());
    }
}
