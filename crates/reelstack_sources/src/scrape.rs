//! External scrape adapter for short-form social providers.

use crate::config::ScrapeConfig;
use crate::dto::{VideoDescriptor, VideoListResponse};
use async_trait::async_trait;
use reelstack_core::{CandidateDescriptor, ReelMetadata, SourceType};
use reelstack_error::{ProviderError, ProviderErrorKind, ReelstackResult};
use reelstack_interface::{PlacementHint, SourceAdapter};
use regex::Regex;
use reqwest::Client;
use std::sync::OnceLock;
use std::time::Duration;
use tracing::{debug, instrument, warn};

fn instagram_shortcode_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"/(reel|p)/([^/]+)/?").expect("valid regex"))
}

fn tiktok_video_id_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"/video/(\d+)").expect("valid regex"))
}

/// Client for the external scrape API.
///
/// Same wire contract as the search API with an additional `sources`
/// parameter naming the providers to scrape. Scraped permalinks often lack
/// an embeddable URL, so this adapter derives one per provider; a candidate
/// it cannot derive a playable URL for is dropped.
///
/// Contributions are placed just after the viewer's read position so fresh
/// social clips surface while the session is still active.
#[derive(Debug, Clone)]
pub struct ScrapeAdapter {
    client: Client,
    base_url: String,
    sources: Vec<String>,
    timeout: Duration,
}

impl ScrapeAdapter {
    /// Create an adapter from configuration.
    pub fn new(config: &ScrapeConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            sources: config.sources.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }
}

/// Derive an embeddable URL for a scraped clip.
///
/// TikTok: numeric video id from the permalink (falling back to the
/// provider id) into the v2 embed path. Instagram: shortcode from the
/// permalink into the reel embed path. Unknown providers pass the permalink
/// through untouched.
pub(crate) fn derive_embed_url(
    source: Option<&str>,
    video_id: Option<&str>,
    watch_url: Option<&str>,
) -> Option<String> {
    match source {
        Some("tiktok") => {
            let id = watch_url
                .and_then(|url| {
                    tiktok_video_id_re()
                        .captures(url)
                        .and_then(|caps| caps.get(1))
                        .map(|m| m.as_str().to_string())
                })
                .or_else(|| video_id.map(str::to_string))?;
            Some(format!("https://www.tiktok.com/embed/v2/{id}"))
        }
        Some("instagram") => {
            let shortcode = watch_url.and_then(|url| {
                instagram_shortcode_re()
                    .captures(url)
                    .and_then(|caps| caps.get(2))
                    .map(|m| m.as_str().to_string())
            })?;
            Some(format!("https://www.instagram.com/reel/{shortcode}/embed"))
        }
        _ => watch_url.map(str::to_string),
    }
}

/// Normalize a scraped descriptor into a candidate.
pub(crate) fn candidate_from_scrape(
    video: VideoDescriptor,
    prompt: &str,
) -> Option<CandidateDescriptor> {
    let video_url = video.embed_url.clone().or_else(|| {
        derive_embed_url(
            video.source.as_deref(),
            video.video_id.as_deref(),
            video.watch_url.as_deref(),
        )
    })?;

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
impl SourceAdapter for ScrapeAdapter {
    #[instrument(skip(self), fields(source = self.source_name()))]
    async fn fetch(&self, prompt: &str, limit: usize) -> ReelstackResult<Vec<CandidateDescriptor>> {
        let url = format!("{}/search", self.base_url);
        let sources = self.sources.join(",");
        debug!(url = %url, sources = %sources, limit, "querying scrape API");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("query", prompt),
                ("max_results", &limit.to_string()),
                ("sources", &sources),
            ])
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

        let total = payload.videos.len();
        let candidates: Vec<CandidateDescriptor> = payload
            .videos
            .into_iter()
            .filter_map(|video| candidate_from_scrape(video, prompt))
            .collect();
        if candidates.len() < total {
            warn!(
                dropped = total - candidates.len(),
                "scraped clips without a usable URL"
            );
        }
        Ok(candidates)
    }

    fn source_name(&self) -> &'static str {
        "scrape"
    }

    fn source_type(&self) -> SourceType {
        SourceType::External
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    fn placement(&self) -> PlacementHint {
        PlacementHint::AfterLastSeen
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiktok_embed_from_permalink() {
        let embed = derive_embed_url(
            Some("tiktok"),
            None,
            Some("https://www.tiktok.com/@someone/video/7234567890123456789"),
        );
        assert_eq!(
            embed.as_deref(),
            Some("https://www.tiktok.com/embed/v2/7234567890123456789")
        );
    }

    #[test]
    fn tiktok_embed_falls_back_to_video_id() {
        let embed = derive_embed_url(Some("tiktok"), Some("42"), None);
        assert_eq!(embed.as_deref(), Some("https://www.tiktok.com/embed/v2/42"));
    }

    #[test]
    fn instagram_embed_from_permalink_shortcode() {
        let embed = derive_embed_url(
            Some("instagram"),
            Some("1790"),
            Some("https://www.instagram.com/reel/Cxyz123/"),
        );
        assert_eq!(
            embed.as_deref(),
            Some("https://www.instagram.com/reel/Cxyz123/embed")
        );
    }

    #[test]
    fn instagram_without_permalink_is_dropped() {
        assert!(derive_embed_url(Some("instagram"), Some("1790"), None).is_none());

        let video = VideoDescriptor {
            video_id: Some("1790".to_string()),
            source: Some("instagram".to_string()),
            ..VideoDescriptor::default()
        };
        assert!(candidate_from_scrape(video, "cooking").is_none());
    }
}
