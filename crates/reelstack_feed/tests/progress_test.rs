//! Progress tracking and hydration-decision tests.

mod common;

use common::{external_candidate, seed_feed};
use reelstack_core::PlacementStatus;
use reelstack_error::ReelstackErrorKind;
use reelstack_feed::{MemoryStore, ProgressTracker};
use reelstack_interface::{FeedRepository, NewFeed, PlacementStore, ProgressUpdate, ReelStore};
use std::sync::Arc;

async fn place(store: &Arc<MemoryStore>, feed_id: reelstack_core::FeedId, url: &str, position: f64) -> reelstack_core::ReelId {
    let reel_id = store
        .upsert_reel(&external_candidate(url, None, "Clip"))
        .await
        .unwrap();
    store
        .insert_placement(feed_id, reel_id, position, PlacementStatus::Ready)
        .await
        .unwrap();
    reel_id
}

#[tokio::test]
async fn progress_updates_last_seen_fields() {
    let store = Arc::new(MemoryStore::new());
    let (_, feed_id) = seed_feed(&store).await;
    let reel_id = place(&store, feed_id, "https://example.com/embed/a", 10.0).await;

    let tracker = ProgressTracker::new(store.clone());
    tracker
        .record_progress(
            feed_id,
            ProgressUpdate {
                last_seen_index: Some(0),
                last_seen_reel_id: Some(reel_id),
            },
        )
        .await
        .unwrap();

    let feed = store.get_feed(feed_id).await.unwrap().unwrap();
    assert_eq!(feed.last_seen_index, Some(0));
    assert_eq!(feed.last_seen_reel_id, Some(reel_id));
}

#[tokio::test]
async fn progress_with_foreign_reel_is_rejected() {
    let store = Arc::new(MemoryStore::new());
    let (user_id, feed_id) = seed_feed(&store).await;

    let other_feed = store
        .create_feed(NewFeed {
            user_id,
            prompt: "other".to_string(),
            topic: "other".to_string(),
            description: None,
            tags: None,
        })
        .await
        .unwrap();
    let foreign_reel = place(&store, other_feed, "https://example.com/embed/x", 10.0).await;

    let tracker = ProgressTracker::new(store.clone());
    let err = tracker
        .record_progress(
            feed_id,
            ProgressUpdate {
                last_seen_index: Some(0),
                last_seen_reel_id: Some(foreign_reel),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err.kind(), ReelstackErrorKind::NotInFeed(_)));

    // The feed's progress is untouched.
    let feed = store.get_feed(feed_id).await.unwrap().unwrap();
    assert_eq!(feed.last_seen_index, None);
}

#[tokio::test]
async fn hydration_is_due_only_when_nothing_remains_ahead() {
    let store = Arc::new(MemoryStore::new());
    let (_, feed_id) = seed_feed(&store).await;
    let first = place(&store, feed_id, "https://example.com/embed/a", 10.0).await;
    let second = place(&store, feed_id, "https://example.com/embed/b", 20.0).await;

    let tracker = ProgressTracker::new(store.clone());

    // Nothing viewed yet: two items remain.
    assert_eq!(tracker.remaining_ahead(feed_id).await.unwrap(), 2);
    assert!(!tracker.needs_hydration(feed_id).await.unwrap());

    tracker
        .record_progress(
            feed_id,
            ProgressUpdate {
                last_seen_index: Some(0),
                last_seen_reel_id: Some(first),
            },
        )
        .await
        .unwrap();
    assert_eq!(tracker.remaining_ahead(feed_id).await.unwrap(), 1);
    assert!(!tracker.needs_hydration(feed_id).await.unwrap());

    tracker
        .record_progress(
            feed_id,
            ProgressUpdate {
                last_seen_index: Some(1),
                last_seen_reel_id: Some(second),
            },
        )
        .await
        .unwrap();
    assert_eq!(tracker.remaining_ahead(feed_id).await.unwrap(), 0);
    assert!(tracker.needs_hydration(feed_id).await.unwrap());
}

#[tokio::test]
async fn empty_feed_needs_hydration() {
    let store = Arc::new(MemoryStore::new());
    let (_, feed_id) = seed_feed(&store).await;

    let tracker = ProgressTracker::new(store.clone());
    assert!(tracker.needs_hydration(feed_id).await.unwrap());
}
