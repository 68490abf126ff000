//! The source adapter trait implemented once per video provider.

use async_trait::async_trait;
use reelstack_core::{CandidateDescriptor, SourceType};
use reelstack_error::ReelstackResult;
use std::time::Duration;

/// Where the assembler should place an adapter's contributions within the
/// feed order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlacementHint {
    /// Append past the end of the current order
    #[default]
    Append,
    /// Interleave just after the viewer's last-seen position
    AfterLastSeen,
}

/// A pluggable fetcher for one external provider.
///
/// Adapters are pure with respect to the feed: they turn a prompt into a
/// list of normalized candidates and know nothing about placement or dedup.
/// Zero candidates is a valid, successful response; a candidate missing a
/// usable video URL is dropped inside the adapter, not surfaced as an error.
///
/// Failure contract: unreachable endpoint or non-2xx response is a
/// `ProviderError`; missing required configuration is a `ConfigError`. The
/// assembler catches both per adapter and continues with the next provider.
#[async_trait]
pub trait SourceAdapter: Send + Sync {
    /// Fetch up to `limit` candidates for the prompt.
    async fn fetch(&self, prompt: &str, limit: usize) -> ReelstackResult<Vec<CandidateDescriptor>>;

    /// Short provider name used in logs, e.g. "search", "scrape".
    fn source_name(&self) -> &'static str;

    /// The source type stamped onto this adapter's candidates.
    fn source_type(&self) -> SourceType;

    /// Per-adapter timeout budget. A fetch still running past this budget is
    /// treated as an empty contribution for the cycle.
    fn timeout(&self) -> Duration {
        Duration::from_secs(10)
    }

    /// Placement policy for this adapter's contributions.
    fn placement(&self) -> PlacementHint {
        PlacementHint::Append
    }
}
