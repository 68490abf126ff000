//! Status enums for feeds, placements, and reel sources.

use serde::{Deserialize, Serialize};

/// Where a reel came from.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SourceType {
    /// Already present in the internal catalog
    Internal,
    /// Produced by the generative video pipeline
    Generated,
    /// Pulled from an external search or scrape provider
    External,
}

/// Feed lifecycle status.
///
/// Cycles pending → curating → ready; a fetch cycle that yields nothing
/// returns the feed to pending without discarding previously-fetched
/// content.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum FeedStatus {
    /// Created, or last fetch cycle yielded nothing
    Pending,
    /// A fetch cycle is in flight
    Curating,
    /// At least one reel has landed
    Ready,
    /// Removed from the active rotation
    Archived,
}

/// Per-feed placement status of a reel.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PlacementStatus {
    /// Placed but the video URL has not landed yet
    Pending,
    /// Playable
    Ready,
    /// The source failed to produce a playable clip
    Failed,
}

/// Leaderboard ranking mode.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LeaderboardMode {
    /// Rank by daily streak (zeroed when the last view day is not today)
    Daily,
    /// Rank by total view count
    Total,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn status_strings_round_trip() {
        assert_eq!(FeedStatus::Curating.to_string(), "curating");
        assert_eq!(FeedStatus::from_str("ready").unwrap(), FeedStatus::Ready);
        assert_eq!(PlacementStatus::Pending.as_ref(), "pending");
        assert_eq!(SourceType::from_str("external").unwrap(), SourceType::External);
    }
}
