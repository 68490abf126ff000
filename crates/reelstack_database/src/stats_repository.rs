//! View recording, streak accounting, and the leaderboard.

use crate::models::{NewReelViewRow, NewUserStatsRow, UserRow, UserStatsRow};
use crate::schema::{feed_placements, reel_views, user_stats, users};
use chrono::{DateTime, Utc};
use diesel::dsl::exists;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use reelstack_core::{day_key, FeedId, LeaderboardMode, ReelId, UserId, UserStats};
use reelstack_error::{NotInFeedError, ReelstackResult};
use reelstack_interface::{LeaderboardEntry, ViewOutcome};
use tracing::debug;

/// Record a first view and update streaks atomically.
///
/// The user's stats row is locked (`SELECT ... FOR UPDATE`) before the
/// first-view check, so concurrent calls for the same user serialize: no
/// lost streak updates, and a racing duplicate view observes the earlier
/// insert and returns `counted = false`.
pub fn record_view(
    conn: &mut PgConnection,
    user_id: UserId,
    feed_id: FeedId,
    reel_id: ReelId,
    at: DateTime<Utc>,
) -> ReelstackResult<ViewOutcome> {
    conn.transaction(|conn| {
        let placed: bool = diesel::select(exists(
            feed_placements::table.find((feed_id.as_uuid(), reel_id.as_uuid())),
        ))
        .get_result(conn)?;
        if !placed {
            Err(NotInFeedError::new(feed_id.to_string(), reel_id.to_string()))?;
        }

        // Take the per-user lock first; the duplicate check below is only
        // reliable once same-user writers are serialized.
        diesel::insert_into(user_stats::table)
            .values(&NewUserStatsRow::empty(user_id.as_uuid(), at))
            .on_conflict(user_stats::user_id)
            .do_nothing()
            .execute(conn)?;
        let row: UserStatsRow = user_stats::table
            .find(user_id.as_uuid())
            .for_update()
            .first(conn)?;

        let already_viewed: bool = diesel::select(exists(
            reel_views::table.find((user_id.as_uuid(), reel_id.as_uuid())),
        ))
        .get_result(conn)?;
        if already_viewed {
            debug!(user = %user_id, reel = %reel_id, "repeat view, not counted");
            return Ok(ViewOutcome {
                counted: false,
                stats: row.into_domain(),
            });
        }

        let day = day_key(at);
        let mut stats = row.into_domain();
        stats.advance(feed_id, &day, at);

        diesel::update(user_stats::table.find(user_id.as_uuid()))
            .set((
                user_stats::current_streak.eq(stats.current_streak),
                user_stats::best_streak.eq(stats.best_streak),
                user_stats::daily_streak.eq(stats.daily_streak),
                user_stats::total_count.eq(stats.total_count),
                user_stats::last_feed_id.eq(Some(feed_id.as_uuid())),
                user_stats::last_day_key.eq(Some(day.clone())),
                user_stats::updated_at.eq(at),
            ))
            .execute(conn)?;

        diesel::insert_into(reel_views::table)
            .values(&NewReelViewRow {
                user_id: user_id.as_uuid(),
                reel_id: reel_id.as_uuid(),
                feed_id: feed_id.as_uuid(),
                day_key: day,
                viewed_at: at,
            })
            .execute(conn)?;

        Ok(ViewOutcome {
            counted: true,
            stats,
        })
    })
}

/// The user's stats row, if any views have been counted.
pub fn stats_for_user(
    conn: &mut PgConnection,
    user_id: UserId,
) -> ReelstackResult<Option<UserStats>> {
    let row = user_stats::table
        .find(user_id.as_uuid())
        .first::<UserStatsRow>(conn)
        .optional()?;
    Ok(row.map(UserStatsRow::into_domain))
}

/// Ranked leaderboard rows.
///
/// Daily mode zeroes streaks whose `last_day_key` is not today, then
/// re-sorts, so a user who led yesterday does not hold the board with a
/// stale streak.
pub fn leaderboard(
    conn: &mut PgConnection,
    mode: LeaderboardMode,
    limit: i64,
    today_key: &str,
) -> ReelstackResult<Vec<LeaderboardEntry>> {
    let query = user_stats::table.inner_join(users::table).into_boxed();
    let query = match mode {
        LeaderboardMode::Daily => query.order(user_stats::daily_streak.desc()),
        LeaderboardMode::Total => query.order(user_stats::total_count.desc()),
    };
    let rows = query.limit(limit).load::<(UserStatsRow, UserRow)>(conn)?;

    let mut entries: Vec<LeaderboardEntry> = rows
        .into_iter()
        .map(|(stats, user)| {
            let daily_streak = if stats.last_day_key.as_deref() == Some(today_key) {
                stats.daily_streak
            } else {
                0
            };
            LeaderboardEntry {
                user_id: stats.user_id.into(),
                name: user.name,
                avatar_url: user.avatar_url,
                daily_streak,
                total_count: stats.total_count,
                best_streak: stats.best_streak,
            }
        })
        .collect();

    match mode {
        LeaderboardMode::Daily => entries.sort_by(|a, b| b.daily_streak.cmp(&a.daily_streak)),
        LeaderboardMode::Total => entries.sort_by(|a, b| b.total_count.cmp(&a.total_count)),
    }
    Ok(entries)
}
