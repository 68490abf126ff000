//! External video search adapter.

use crate::config::SearchConfig;
use crate::dto::{VideoDescriptor, VideoListResponse};
use async_trait::async_trait;
use reelstack_core::{CandidateDescriptor, ReelMetadata, SourceType};
use reelstack_error::{ConfigError, ProviderError, ProviderErrorKind, ReelstackResult};
use reelstack_interface::SourceAdapter;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, instrument};

/// Client for the external video search API.
///
/// Wire contract: `GET {base}/search?query=<prompt>&max_results=<n>` →
/// `{ "videos": [...] }`. Non-2xx responses surface the body text as the
/// provider error detail.
#[derive(Debug, Clone)]
pub struct SearchAdapter {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl SearchAdapter {
    /// Create an adapter from configuration.
    pub fn new(config: &SearchConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    /// Create an adapter from the `VIDEO_API_URL` environment variable.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` when the variable is not set.
    pub fn from_env() -> ReelstackResult<Self> {
        let base_url = std::env::var("VIDEO_API_URL")
            .map_err(|_| ConfigError::new("VIDEO_API_URL not set"))?;
        Ok(Self::new(&SearchConfig {
            base_url,
            timeout_secs: 10,
        }))
    }
}

/// Normalize a search descriptor into a candidate.
///
/// The playable URL prefers `embed_url`, then `watch_url`, then
/// `video_url`; a descriptor with none of them is unusable and dropped.
pub(crate) fn candidate_from_search(
    video: VideoDescriptor,
    prompt: &str,
) -> Option<CandidateDescriptor> {
    let video_url = video
        .embed_url
        .clone()
        .or_else(|| video.watch_url.clone())
        .or_else(|| video.video_url.clone())?;

    let metadata = ReelMetadata {
        watch_url: video.watch_url,
        provider: video.source,
        ..ReelMetadata::default()
    };

    Some(CandidateDescriptor {
        source_type: SourceType::External,
        video_url: Some(video_url),
        source_reference: video.video_id,
        title: Some(video.title.unwrap_or_else(|| "Untitled clip".to_string())),
        description: Some(prompt.to_string()),
        thumbnail_url: video.thumbnail_url,
        duration_seconds: None,
        metadata: Some(metadata),
    })
}

#[async_trait]
impl SourceAdapter for SearchAdapter {
    #[instrument(skip(self), fields(source = self.source_name()))]
    async fn fetch(&self, prompt: &str, limit: usize) -> ReelstackResult<Vec<CandidateDescriptor>> {
        let url = format!("{}/search", self.base_url);
        debug!(url = %url, limit, "querying video search API");

        let response = self
            .client
            .get(&url)
            .query(&[("query", prompt), ("max_results", &limit.to_string())])
            .send()
            .await
            .map_err(|e| ProviderError::new(ProviderErrorKind::Unreachable(e.to_string())))?;

        if !response.status().is_success() {
            let code = response.status().as_u16();
            let detail = response.text().await.unwrap_or_default();
            return Err(ProviderError::new(ProviderErrorKind::Status { code, detail }).into());
        }

        let payload: VideoListResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::new(ProviderErrorKind::Decode(e.to_string())))?;

        let candidates: Vec<CandidateDescriptor> = payload
            .videos
            .into_iter()
            .filter_map(|video| candidate_from_search(video, prompt))
            .collect();
        debug!(count = candidates.len(), "normalized search candidates");
        Ok(candidates)
    }

    fn source_name(&self) -> &'static str {
        "search"
    }

    fn source_type(&self) -> SourceType {
        SourceType::External
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefers_embed_url_over_watch_url() {
        let video = VideoDescriptor {
            video_id: Some("abc".to_string()),
            watch_url: Some("https://www.youtube.com/shorts/abc".to_string()),
            embed_url: Some("https://www.youtube.com/embed/abc".to_string()),
            ..VideoDescriptor::default()
        };
        let candidate = candidate_from_search(video, "rust tutorials").unwrap();
        assert_eq!(
            candidate.video_url.as_deref(),
            Some("https://www.youtube.com/embed/abc")
        );
        assert_eq!(
            candidate.metadata.unwrap().watch_url.as_deref(),
            Some("https://www.youtube.com/shorts/abc")
        );
    }

    #[test]
    fn drops_descriptor_without_any_url() {
        let video = VideoDescriptor {
            video_id: Some("abc".to_string()),
            title: Some("No URL".to_string()),
            ..VideoDescriptor::default()
        };
        assert!(candidate_from_search(video, "anything").is_none());
    }

    #[test]
    fn untitled_clips_get_a_default_title() {
        let video = VideoDescriptor {
            embed_url: Some("https://www.youtube.com/embed/abc".to_string()),
            ..VideoDescriptor::default()
        };
        let candidate = candidate_from_search(video, "anything").unwrap();
        assert_eq!(candidate.title.as_deref(), Some("Untitled clip"));
    }
}
