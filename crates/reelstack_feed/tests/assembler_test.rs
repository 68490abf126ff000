//! Fetch-cycle tests against the in-memory store.

mod common;

use common::{FailingAdapter, ScriptedAdapter, external_candidate, seed_feed};
use reelstack_core::{CandidateDescriptor, FeedStatus, PlacementStatus, SourceType};
use reelstack_error::ReelstackErrorKind;
use reelstack_feed::{FeedAssembler, MemoryStore};
use reelstack_interface::{
    FeedRepository, PlacementHint, PlacementStore, ProgressUpdate, ReelStore,
};
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn empty_feed_fills_from_provider() {
    let store = Arc::new(MemoryStore::new());
    let (_, feed_id) = seed_feed(&store).await;

    let adapter = ScriptedAdapter::new(vec![vec![
        external_candidate("https://example.com/embed/a", Some("a"), "Clip A"),
        external_candidate("https://example.com/embed/b", Some("b"), "Clip B"),
    ]]);
    let assembler = FeedAssembler::new(store.clone()).with_adapter(Arc::new(adapter));

    let outcome = assembler
        .run_fetch_cycle(feed_id, "rust lifetimes", 8)
        .await
        .unwrap();
    assert_eq!(outcome.inserted, 2);
    assert!(!outcome.already_running);

    let feed = store.get_feed(feed_id).await.unwrap().unwrap();
    assert_eq!(feed.status, FeedStatus::Ready);

    let placed = store.list_placements(feed_id, None, None).await.unwrap();
    assert_eq!(placed.len(), 2);
    assert!(placed[0].position < placed[1].position);
    // Position order is insertion order.
    assert_eq!(placed[0].reel.title.as_deref(), Some("Clip A"));
    assert_eq!(placed[1].reel.title.as_deref(), Some("Clip B"));
}

#[tokio::test]
async fn rerun_only_contributes_new_candidates() {
    let store = Arc::new(MemoryStore::new());
    let (_, feed_id) = seed_feed(&store).await;

    let adapter = ScriptedAdapter::new(vec![
        vec![
            external_candidate("https://example.com/embed/a", Some("a"), "Clip A"),
            external_candidate("https://example.com/embed/b", Some("b"), "Clip B"),
        ],
        vec![
            external_candidate("https://example.com/embed/a", Some("a"), "Clip A again"),
            external_candidate("https://example.com/embed/c", Some("c"), "Clip C"),
        ],
    ]);
    let assembler = FeedAssembler::new(store.clone()).with_adapter(Arc::new(adapter));

    assembler
        .run_fetch_cycle(feed_id, "rust lifetimes", 8)
        .await
        .unwrap();
    let placed_before = store.list_placements(feed_id, None, None).await.unwrap();
    let position_a = placed_before[0].position;

    let outcome = assembler
        .run_fetch_cycle(feed_id, "rust lifetimes", 8)
        .await
        .unwrap();
    assert_eq!(outcome.inserted, 1);

    let placed = store.list_placements(feed_id, None, None).await.unwrap();
    assert_eq!(placed.len(), 3);
    // The rediscovered reel keeps its original position and title.
    assert_eq!(placed[0].position, position_a);
    assert_eq!(placed[0].reel.title.as_deref(), Some("Clip A"));
}

#[tokio::test]
async fn unreachable_provider_leaves_feed_pending_and_is_retryable() {
    let store = Arc::new(MemoryStore::new());
    let (_, feed_id) = seed_feed(&store).await;

    let assembler = FeedAssembler::new(store.clone()).with_adapter(Arc::new(FailingAdapter));

    for _ in 0..2 {
        let outcome = assembler
            .run_fetch_cycle(feed_id, "rust lifetimes", 8)
            .await
            .unwrap();
        assert_eq!(outcome.inserted, 0);

        let feed = store.get_feed(feed_id).await.unwrap().unwrap();
        assert_eq!(feed.status, FeedStatus::Pending);
    }

    let placed = store.list_placements(feed_id, None, None).await.unwrap();
    assert!(placed.is_empty());
}

#[tokio::test]
async fn one_broken_provider_does_not_block_the_rest() {
    let store = Arc::new(MemoryStore::new());
    let (_, feed_id) = seed_feed(&store).await;

    let healthy = ScriptedAdapter::new(vec![vec![external_candidate(
        "https://example.com/embed/a",
        Some("a"),
        "Clip A",
    )]]);
    let assembler = FeedAssembler::new(store.clone())
        .with_adapter(Arc::new(FailingAdapter))
        .with_adapter(Arc::new(healthy));

    let outcome = assembler
        .run_fetch_cycle(feed_id, "rust lifetimes", 8)
        .await
        .unwrap();
    assert_eq!(outcome.inserted, 1);

    let feed = store.get_feed(feed_id).await.unwrap().unwrap();
    assert_eq!(feed.status, FeedStatus::Ready);
}

#[tokio::test]
async fn no_adapters_is_a_configuration_error() {
    let store = Arc::new(MemoryStore::new());
    let (_, feed_id) = seed_feed(&store).await;

    let assembler = FeedAssembler::new(store.clone());
    let err = assembler
        .run_fetch_cycle(feed_id, "rust lifetimes", 8)
        .await
        .unwrap_err();
    assert!(matches!(err.kind(), ReelstackErrorKind::Config(_)));
}

#[tokio::test]
async fn concurrent_cycles_for_one_feed_do_not_overlap() {
    let store = Arc::new(MemoryStore::new());
    let (_, feed_id) = seed_feed(&store).await;

    let adapter = ScriptedAdapter::new(vec![
        vec![
            external_candidate("https://example.com/embed/a", Some("a"), "Clip A"),
            external_candidate("https://example.com/embed/b", Some("b"), "Clip B"),
        ],
        vec![
            external_candidate("https://example.com/embed/c", Some("c"), "Clip C"),
            external_candidate("https://example.com/embed/d", Some("d"), "Clip D"),
        ],
    ])
    .with_delay(Duration::from_millis(100));
    let assembler = FeedAssembler::new(store.clone()).with_adapter(Arc::new(adapter));

    let (first, second) = tokio::join!(
        assembler.run_fetch_cycle(feed_id, "rust lifetimes", 8),
        assembler.run_fetch_cycle(feed_id, "rust lifetimes", 8),
    );
    let first = first.unwrap();
    let second = second.unwrap();

    // Exactly one cycle ran; the other reported itself skipped.
    assert_eq!(
        [first.already_running, second.already_running]
            .iter()
            .filter(|&&skipped| skipped)
            .count(),
        1
    );
    assert_eq!(first.inserted + second.inserted, 2);

    let placed = store.list_placements(feed_id, None, None).await.unwrap();
    assert_eq!(placed.len(), 2);
}

#[tokio::test]
async fn pending_generated_clip_is_placed_without_a_url() {
    let store = Arc::new(MemoryStore::new());
    let (_, feed_id) = seed_feed(&store).await;

    let rendering = CandidateDescriptor::new(SourceType::Generated)
        .with_source_reference("veo-1")
        .with_title("Rendering clip");
    let adapter = ScriptedAdapter::new(vec![vec![rendering]]);
    let assembler = FeedAssembler::new(store.clone()).with_adapter(Arc::new(adapter));

    let outcome = assembler
        .run_fetch_cycle(feed_id, "rust lifetimes", 8)
        .await
        .unwrap();
    assert_eq!(outcome.inserted, 1);

    let placed = store.list_placements(feed_id, None, None).await.unwrap();
    assert_eq!(placed[0].status, PlacementStatus::Pending);
    assert!(placed[0].reel.video_url.is_none());
}

#[tokio::test]
async fn candidate_with_no_dedup_key_is_dropped() {
    let store = Arc::new(MemoryStore::new());
    let (_, feed_id) = seed_feed(&store).await;

    let anonymous = CandidateDescriptor::new(SourceType::External).with_title("No keys");
    let adapter = ScriptedAdapter::new(vec![vec![anonymous]]);
    let assembler = FeedAssembler::new(store.clone()).with_adapter(Arc::new(adapter));

    let outcome = assembler
        .run_fetch_cycle(feed_id, "rust lifetimes", 8)
        .await
        .unwrap();
    assert_eq!(outcome.inserted, 0);

    let feed = store.get_feed(feed_id).await.unwrap().unwrap();
    assert_eq!(feed.status, FeedStatus::Pending);
}

#[tokio::test]
async fn viewer_aware_batch_interleaves_after_read_position() {
    let store = Arc::new(MemoryStore::new());
    let (_, feed_id) = seed_feed(&store).await;

    // Existing placements at positions 10 and 20, viewer parked at index 0.
    let first = store
        .upsert_reel(&external_candidate(
            "https://example.com/embed/a",
            Some("a"),
            "Clip A",
        ))
        .await
        .unwrap();
    let second = store
        .upsert_reel(&external_candidate(
            "https://example.com/embed/b",
            Some("b"),
            "Clip B",
        ))
        .await
        .unwrap();
    store
        .insert_placement(feed_id, first, 10.0, PlacementStatus::Ready)
        .await
        .unwrap();
    store
        .insert_placement(feed_id, second, 20.0, PlacementStatus::Ready)
        .await
        .unwrap();
    store
        .update_progress(
            feed_id,
            ProgressUpdate {
                last_seen_index: Some(0),
                last_seen_reel_id: Some(first),
            },
        )
        .await
        .unwrap();

    let adapter = ScriptedAdapter::new(vec![vec![
        external_candidate("https://example.com/embed/c", Some("c"), "Clip C"),
        external_candidate("https://example.com/embed/d", Some("d"), "Clip D"),
    ]])
    .with_placement(PlacementHint::AfterLastSeen);
    let assembler = FeedAssembler::new(store.clone()).with_adapter(Arc::new(adapter));

    let outcome = assembler
        .run_fetch_cycle(feed_id, "rust lifetimes", 8)
        .await
        .unwrap();
    assert_eq!(outcome.inserted, 2);

    let placed = store.list_placements(feed_id, None, None).await.unwrap();
    assert_eq!(placed.len(), 4);
    // Existing anchors kept their positions; the batch landed between them
    // in order.
    assert_eq!(placed[0].position, 10.0);
    assert_eq!(placed[3].position, 20.0);
    assert_eq!(placed[1].reel.title.as_deref(), Some("Clip C"));
    assert_eq!(placed[2].reel.title.as_deref(), Some("Clip D"));
    assert!(placed[1].position > 10.0 && placed[2].position < 20.0);
    assert!(placed[1].position < placed[2].position);
}
