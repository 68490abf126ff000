//! Wire types for the provider HTTP contract.

use serde::{Deserialize, Serialize};

/// `GET {base}/search` response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoListResponse {
    /// Candidate videos; absent is treated as empty
    #[serde(default)]
    pub videos: Vec<VideoDescriptor>,
}

/// One candidate video as returned by the search/scrape providers.
///
/// Every field is optional; normalization decides what is usable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VideoDescriptor {
    /// Provider video id
    pub video_id: Option<String>,
    /// Clip title
    pub title: Option<String>,
    /// Canonical watch URL or permalink
    pub watch_url: Option<String>,
    /// Embeddable URL
    pub embed_url: Option<String>,
    /// Direct video URL
    pub video_url: Option<String>,
    /// Thumbnail URL
    pub thumbnail_url: Option<String>,
    /// Provider name, e.g. "tiktok"
    pub source: Option<String>,
}

/// `POST {base}/generate` response body from the generative pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedResponse {
    /// Generated or still-rendering clips
    #[serde(default)]
    pub clips: Vec<GeneratedClip>,
}

/// One clip from the generative pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneratedClip {
    /// Pipeline clip id, used as the dedup reference
    pub clip_id: String,
    /// Clip title
    pub title: Option<String>,
    /// Playable URL; absent while the clip is still rendering
    pub video_url: Option<String>,
    /// Thumbnail URL
    pub thumbnail_url: Option<String>,
    /// Duration in seconds
    pub duration_seconds: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_videos_key_is_empty() {
        let payload: VideoListResponse = serde_json::from_str("{}").unwrap();
        assert!(payload.videos.is_empty());
    }

    #[test]
    fn sparse_descriptor_parses() {
        let json = r#"{"videos":[{"video_id":"abc123","watch_url":"https://www.youtube.com/shorts/abc123"}]}"#;
        let payload: VideoListResponse = serde_json::from_str(json).unwrap();
        assert_eq!(payload.videos.len(), 1);
        assert_eq!(payload.videos[0].video_id.as_deref(), Some("abc123"));
        assert!(payload.videos[0].embed_url.is_none());
    }
}
