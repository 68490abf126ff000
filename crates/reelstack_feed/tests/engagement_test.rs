//! Dedup, fill-merge, engagement, and cascade-delete tests.

mod common;

use common::{external_candidate, seed_feed};
use reelstack_core::{CandidateDescriptor, PlacementStatus, SourceType};
use reelstack_error::ReelstackErrorKind;
use reelstack_feed::{Engagement, MAX_COMMENT_LENGTH, MemoryStore};
use reelstack_interface::{FeedRepository, PlacementStore, ReelPatch, ReelStore, StatsStore};
use std::sync::Arc;

#[tokio::test]
async fn upserts_with_the_same_url_produce_one_reel() {
    let store = Arc::new(MemoryStore::new());

    let first = store
        .upsert_reel(&external_candidate(
            "https://example.com/embed/a",
            Some("a"),
            "Original title",
        ))
        .await
        .unwrap();
    let second = store
        .upsert_reel(&external_candidate(
            "https://example.com/embed/a",
            Some("a"),
            "Different title",
        ))
        .await
        .unwrap();

    assert_eq!(first, second);
    let reel = store.get_reel(first).await.unwrap().unwrap();
    // Fill-merge never overwrites a set field.
    assert_eq!(reel.title.as_deref(), Some("Original title"));
}

#[tokio::test]
async fn upsert_falls_back_to_source_reference_and_backfills_empty_fields() {
    let store = Arc::new(MemoryStore::new());

    // First contribution has only a reference (a still-rendering clip).
    let bare = CandidateDescriptor::new(SourceType::Generated).with_source_reference("veo-9");
    let first = store.upsert_reel(&bare).await.unwrap();

    // A later contribution for the same reference brings a title and
    // thumbnail.
    let richer = CandidateDescriptor::new(SourceType::Generated)
        .with_source_reference("veo-9")
        .with_title("Now titled");
    let second = store.upsert_reel(&richer).await.unwrap();

    assert_eq!(first, second);
    let reel = store.get_reel(first).await.unwrap().unwrap();
    assert_eq!(reel.title.as_deref(), Some("Now titled"));
}

#[tokio::test]
async fn patch_overwrites_where_upsert_would_not() {
    let store = Arc::new(MemoryStore::new());
    let reel_id = store
        .upsert_reel(&CandidateDescriptor::new(SourceType::Generated).with_source_reference("veo-1"))
        .await
        .unwrap();

    store
        .patch_reel(
            reel_id,
            ReelPatch {
                video_url: Some("https://cdn.example.com/clips/veo-1.mp4".to_string()),
                ..ReelPatch::default()
            },
        )
        .await
        .unwrap();

    let reel = store.get_reel(reel_id).await.unwrap().unwrap();
    assert_eq!(
        reel.video_url.as_deref(),
        Some("https://cdn.example.com/clips/veo-1.mp4")
    );
}

#[tokio::test]
async fn comments_are_trimmed_validated_and_listed_newest_first() {
    let store = Arc::new(MemoryStore::new());
    let (user_id, _) = seed_feed(&store).await;
    let reel_id = store
        .upsert_reel(&external_candidate("https://example.com/embed/a", None, "Clip"))
        .await
        .unwrap();

    let engagement = Engagement::new(store.clone());

    let err = engagement
        .add_comment(reel_id, user_id, "   ")
        .await
        .unwrap_err();
    assert!(matches!(err.kind(), ReelstackErrorKind::Validation(_)));

    let oversized = "x".repeat(MAX_COMMENT_LENGTH + 1);
    let err = engagement
        .add_comment(reel_id, user_id, &oversized)
        .await
        .unwrap_err();
    assert!(matches!(err.kind(), ReelstackErrorKind::Validation(_)));

    engagement
        .add_comment(reel_id, user_id, "  first thought  ")
        .await
        .unwrap();
    engagement
        .add_comment(reel_id, user_id, "second thought")
        .await
        .unwrap();

    let summary = engagement
        .reel_engagement(reel_id, Some(user_id), None)
        .await
        .unwrap();
    assert_eq!(summary.comment_count, 2);
    assert_eq!(summary.comments[0].body, "second thought");
    assert_eq!(summary.comments[1].body, "first thought");
    assert_eq!(summary.comments[1].user_name, "viewer");
}

#[tokio::test]
async fn like_toggles_on_and_off() {
    let store = Arc::new(MemoryStore::new());
    let (user_id, _) = seed_feed(&store).await;
    let reel_id = store
        .upsert_reel(&external_candidate("https://example.com/embed/a", None, "Clip"))
        .await
        .unwrap();

    let engagement = Engagement::new(store.clone());

    assert!(engagement.toggle_like(reel_id, user_id).await.unwrap());
    let summary = engagement
        .reel_engagement(reel_id, Some(user_id), None)
        .await
        .unwrap();
    assert_eq!(summary.like_count, 1);
    assert!(summary.liked_by_user);

    assert!(!engagement.toggle_like(reel_id, user_id).await.unwrap());
    let summary = engagement
        .reel_engagement(reel_id, Some(user_id), None)
        .await
        .unwrap();
    assert_eq!(summary.like_count, 0);
    assert!(!summary.liked_by_user);
}

#[tokio::test]
async fn deleting_a_feed_keeps_shared_and_viewed_reels() {
    let store = Arc::new(MemoryStore::new());
    let (user_id, feed_a) = seed_feed(&store).await;
    let feed_b = store
        .create_feed(reelstack_interface::NewFeed {
            user_id,
            prompt: "other".to_string(),
            topic: "other".to_string(),
            description: None,
            tags: None,
        })
        .await
        .unwrap();

    let shared = store
        .upsert_reel(&external_candidate("https://example.com/embed/shared", None, "Shared"))
        .await
        .unwrap();
    let viewed = store
        .upsert_reel(&external_candidate("https://example.com/embed/viewed", None, "Viewed"))
        .await
        .unwrap();
    let orphan = store
        .upsert_reel(&external_candidate("https://example.com/embed/orphan", None, "Orphan"))
        .await
        .unwrap();

    for (reel, position) in [(shared, 10.0), (viewed, 20.0), (orphan, 30.0)] {
        store
            .insert_placement(feed_a, reel, position, PlacementStatus::Ready)
            .await
            .unwrap();
    }
    store
        .insert_placement(feed_b, shared, 10.0, PlacementStatus::Ready)
        .await
        .unwrap();
    store
        .record_view(user_id, feed_a, viewed, chrono::Utc::now())
        .await
        .unwrap();

    store.delete_feed(feed_a).await.unwrap();

    assert!(store.get_feed(feed_a).await.unwrap().is_none());
    // Shared with feed B: kept. Viewed: kept for streak history. Orphan:
    // gone.
    assert!(store.get_reel(shared).await.unwrap().is_some());
    assert!(store.get_reel(viewed).await.unwrap().is_some());
    assert!(store.get_reel(orphan).await.unwrap().is_none());

    let remaining = store.list_placements(feed_b, None, None).await.unwrap();
    assert_eq!(remaining.len(), 1);
}
