//! Adapter configuration.

use reelstack_error::{ConfigError, ReelstackResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

fn default_search_timeout() -> u64 {
    10
}

fn default_generated_timeout() -> u64 {
    30
}

fn default_catalog_limit() -> usize {
    8
}

fn default_scrape_sources() -> Vec<String> {
    vec!["tiktok".to_string(), "instagram".to_string()]
}

/// Configuration for all source adapters.
///
/// Each section is optional; an absent section means that adapter is not
/// configured and does not participate in fetch cycles.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourcesConfig {
    /// Internal catalog search
    pub catalog: Option<CatalogConfig>,
    /// Generative video pipeline
    pub generated: Option<GeneratedConfig>,
    /// External video search API
    pub search: Option<SearchConfig>,
    /// External scrape API
    pub scrape: Option<ScrapeConfig>,
}

impl SourcesConfig {
    /// Load adapter configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> ReelstackResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {e}")))?;

        toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {e}")).into())
    }

    /// Build configuration from environment variables.
    ///
    /// `VIDEO_API_URL` enables the search adapter, `SCRAPE_API_URL` the
    /// scrape adapter (with `SCRAPE_SOURCES` as an optional comma-separated
    /// provider list), `PIPELINE_API_URL` the generative pipeline. The
    /// catalog adapter is always on.
    pub fn from_env() -> Self {
        let search = std::env::var("VIDEO_API_URL").ok().map(|base_url| SearchConfig {
            base_url,
            timeout_secs: default_search_timeout(),
        });
        let scrape = std::env::var("SCRAPE_API_URL").ok().map(|base_url| ScrapeConfig {
            base_url,
            sources: std::env::var("SCRAPE_SOURCES")
                .map(|raw| {
                    raw.split(',')
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_else(|_| default_scrape_sources()),
            timeout_secs: default_search_timeout(),
        });
        let generated = std::env::var("PIPELINE_API_URL")
            .ok()
            .map(|base_url| GeneratedConfig {
                base_url,
                timeout_secs: default_generated_timeout(),
            });

        Self {
            catalog: Some(CatalogConfig::default()),
            generated,
            search,
            scrape,
        }
    }
}

/// Internal catalog adapter configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Maximum candidates per fetch
    #[serde(default = "default_catalog_limit")]
    pub limit: usize,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            limit: default_catalog_limit(),
        }
    }
}

/// Generative pipeline adapter configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedConfig {
    /// Pipeline endpoint base URL
    pub base_url: String,
    /// Per-fetch timeout budget in seconds
    #[serde(default = "default_generated_timeout")]
    pub timeout_secs: u64,
}

/// External search adapter configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Search endpoint base URL
    pub base_url: String,
    /// Per-fetch timeout budget in seconds
    #[serde(default = "default_search_timeout")]
    pub timeout_secs: u64,
}

/// External scrape adapter configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeConfig {
    /// Scrape endpoint base URL
    pub base_url: String,
    /// Providers to pass through in the `sources` query parameter
    #[serde(default = "default_scrape_sources")]
    pub sources: Vec<String>,
    /// Per-fetch timeout budget in seconds
    #[serde(default = "default_search_timeout")]
    pub timeout_secs: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_partial_config() {
        let toml = r#"
            [search]
            base_url = "http://localhost:8000"

            [scrape]
            base_url = "http://localhost:8001"
            sources = ["tiktok"]
        "#;
        let config: SourcesConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.search.unwrap().timeout_secs, 10);
        assert_eq!(config.scrape.unwrap().sources, vec!["tiktok"]);
        assert!(config.generated.is_none());
        assert!(config.catalog.is_none());
    }
}
