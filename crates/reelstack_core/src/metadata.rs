//! Typed provider metadata attached to a reel.

use serde::{Deserialize, Serialize};

/// Provider-specific metadata for a reel.
///
/// Known fields are typed; anything else a provider attaches is kept in
/// `extra`. Stored as JSON alongside the reel row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ReelMetadata {
    /// Canonical watch URL (as opposed to the embeddable URL)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub watch_url: Option<String>,
    /// Provider name, e.g. "youtube", "tiktok", "instagram"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    /// Clip author or channel name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Play count as reported by the provider
    #[serde(skip_serializing_if = "Option::is_none")]
    pub play_count: Option<i64>,
    /// Provider-specific extension fields
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ReelMetadata {
    /// Metadata carrying only a watch URL.
    pub fn with_watch_url(watch_url: impl Into<String>) -> Self {
        Self {
            watch_url: Some(watch_url.into()),
            ..Self::default()
        }
    }

    /// True when no field is set.
    pub fn is_empty(&self) -> bool {
        self.watch_url.is_none()
            && self.provider.is_none()
            && self.author.is_none()
            && self.play_count.is_none()
            && self.extra.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_metadata_serializes_to_empty_object() {
        let meta = ReelMetadata::default();
        assert!(meta.is_empty());
        assert_eq!(serde_json::to_string(&meta).unwrap(), "{}");
    }

    #[test]
    fn extension_fields_survive_round_trip() {
        let json = r#"{"watch_url":"https://example.com/w/1","provider":"tiktok","region":"us"}"#;
        let meta: ReelMetadata = serde_json::from_str(json).unwrap();
        assert_eq!(meta.provider.as_deref(), Some("tiktok"));
        assert_eq!(meta.extra.get("region").and_then(|v| v.as_str()), Some("us"));

        let back = serde_json::to_value(&meta).unwrap();
        assert_eq!(back.get("region").and_then(|v| v.as_str()), Some("us"));
    }
}
