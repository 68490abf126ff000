//! Streak and leaderboard tests.

mod common;

use chrono::{TimeZone, Utc};
use common::{external_candidate, seed_feed};
use reelstack_core::{FeedId, LeaderboardMode, PlacementStatus, ReelId};
use reelstack_error::ReelstackErrorKind;
use reelstack_feed::{Engagement, MemoryStore};
use reelstack_interface::{FeedRepository, NewFeed, PlacementStore, ReelStore, StatsStore};
use std::sync::Arc;

async fn place(store: &Arc<MemoryStore>, feed_id: FeedId, url: &str, position: f64) -> ReelId {
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
async fn first_view_counts_and_repeat_views_do_not() {
    let store = Arc::new(MemoryStore::new());
    let (user_id, feed_id) = seed_feed(&store).await;
    let reel_id = place(&store, feed_id, "https://example.com/embed/a", 10.0).await;

    let engagement = Engagement::new(store.clone());

    let first = engagement.record_view(user_id, feed_id, reel_id).await.unwrap();
    assert!(first.counted);
    assert_eq!(first.stats.total_count, 1);
    assert_eq!(first.stats.current_streak, 1);

    let repeat = engagement.record_view(user_id, feed_id, reel_id).await.unwrap();
    assert!(!repeat.counted);
    assert_eq!(repeat.stats.total_count, 1);
    assert_eq!(repeat.stats.current_streak, 1);
}

#[tokio::test]
async fn viewing_a_reel_outside_the_feed_is_rejected() {
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

    let engagement = Engagement::new(store.clone());
    let err = engagement
        .record_view(user_id, feed_id, foreign_reel)
        .await
        .unwrap_err();
    assert!(matches!(err.kind(), ReelstackErrorKind::NotInFeed(_)));
}

#[tokio::test]
async fn concurrent_views_lose_no_updates() {
    let store = Arc::new(MemoryStore::new());
    let (user_id, feed_id) = seed_feed(&store).await;
    let first = place(&store, feed_id, "https://example.com/embed/a", 10.0).await;
    let second = place(&store, feed_id, "https://example.com/embed/b", 20.0).await;

    let engagement = Engagement::new(store.clone());
    let (a, b) = tokio::join!(
        engagement.record_view(user_id, feed_id, first),
        engagement.record_view(user_id, feed_id, second),
    );
    assert!(a.unwrap().counted);
    assert!(b.unwrap().counted);

    let stats = store.stats_for_user(user_id).await.unwrap().unwrap();
    assert_eq!(stats.total_count, 2);
    assert_eq!(stats.current_streak, 2);
    assert_eq!(stats.best_streak, 2);
}

#[tokio::test]
async fn switching_feeds_resets_the_current_streak() {
    let store = Arc::new(MemoryStore::new());
    let (user_id, feed_a) = seed_feed(&store).await;
    let feed_b = store
        .create_feed(NewFeed {
            user_id,
            prompt: "other".to_string(),
            topic: "other".to_string(),
            description: None,
            tags: None,
        })
        .await
        .unwrap();

    let a1 = place(&store, feed_a, "https://example.com/embed/a1", 10.0).await;
    let a2 = place(&store, feed_a, "https://example.com/embed/a2", 20.0).await;
    let b1 = place(&store, feed_b, "https://example.com/embed/b1", 10.0).await;

    let engagement = Engagement::new(store.clone());
    engagement.record_view(user_id, feed_a, a1).await.unwrap();
    engagement.record_view(user_id, feed_a, a2).await.unwrap();
    let switched = engagement.record_view(user_id, feed_b, b1).await.unwrap();

    assert_eq!(switched.stats.current_streak, 1);
    assert_eq!(switched.stats.best_streak, 2);
    assert_eq!(switched.stats.total_count, 3);
}

#[tokio::test]
async fn daily_streak_resets_when_the_utc_day_changes() {
    let store = Arc::new(MemoryStore::new());
    let (user_id, feed_id) = seed_feed(&store).await;
    let first = place(&store, feed_id, "https://example.com/embed/a", 10.0).await;
    let second = place(&store, feed_id, "https://example.com/embed/b", 20.0).await;

    let day_one = Utc.with_ymd_and_hms(2026, 5, 1, 23, 50, 0).unwrap();
    let day_two = Utc.with_ymd_and_hms(2026, 5, 2, 0, 10, 0).unwrap();

    store
        .record_view(user_id, feed_id, first, day_one)
        .await
        .unwrap();
    let rolled = store
        .record_view(user_id, feed_id, second, day_two)
        .await
        .unwrap();

    assert_eq!(rolled.stats.daily_streak, 1);
    assert_eq!(rolled.stats.current_streak, 2);
    assert_eq!(rolled.stats.last_day_key.as_deref(), Some("2026-05-02"));
}

#[tokio::test]
async fn leaderboard_ranks_by_mode_and_zeroes_stale_daily_streaks() {
    let store = Arc::new(MemoryStore::new());
    let prolific = store.seed_user("prolific");
    let yesterday_hero = store.seed_user("yesterday");

    let feed_a = store
        .create_feed(NewFeed {
            user_id: prolific,
            prompt: "a".to_string(),
            topic: "a".to_string(),
            description: None,
            tags: None,
        })
        .await
        .unwrap();
    let feed_b = store
        .create_feed(NewFeed {
            user_id: yesterday_hero,
            prompt: "b".to_string(),
            topic: "b".to_string(),
            description: None,
            tags: None,
        })
        .await
        .unwrap();

    let yesterday = Utc.with_ymd_and_hms(2026, 5, 1, 12, 0, 0).unwrap();
    let today = Utc.with_ymd_and_hms(2026, 5, 2, 12, 0, 0).unwrap();

    // yesterday_hero ran a long streak, but a day ago.
    for i in 0..5 {
        let reel = place(
            &store,
            feed_b,
            &format!("https://example.com/embed/b{i}"),
            10.0 + i as f64,
        )
        .await;
        store
            .record_view(yesterday_hero, feed_b, reel, yesterday)
            .await
            .unwrap();
    }
    // prolific viewed twice today.
    for i in 0..2 {
        let reel = place(
            &store,
            feed_a,
            &format!("https://example.com/embed/a{i}"),
            10.0 + i as f64,
        )
        .await;
        store
            .record_view(prolific, feed_a, reel, today)
            .await
            .unwrap();
    }

    let daily = store
        .leaderboard(LeaderboardMode::Daily, 10, "2026-05-02")
        .await
        .unwrap();
    assert_eq!(daily[0].user_id, prolific);
    assert_eq!(daily[0].daily_streak, 2);
    let stale = daily.iter().find(|e| e.user_id == yesterday_hero).unwrap();
    assert_eq!(stale.daily_streak, 0);

    let total = store
        .leaderboard(LeaderboardMode::Total, 10, "2026-05-02")
        .await
        .unwrap();
    assert_eq!(total[0].user_id, yesterday_hero);
    assert_eq!(total[0].total_count, 5);
}
