//! Feed lifecycle, progress, placements, and the cascade delete.

use crate::models::{FeedRow, NewFeedRow, NewPlacementRow, PlacementRow, ReelRow};
use crate::schema::{feed_placements, feeds, reel_comments, reel_likes, reel_views, reels, users};
use chrono::Utc;
use diesel::dsl::exists;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use reelstack_core::{Feed, FeedId, FeedStatus, PlacementStatus, ReelId, UserId};
use reelstack_error::{NotFoundError, ReelstackResult};
use reelstack_interface::{NewFeed, PlacedReel, ProgressUpdate};
use std::collections::HashSet;
use tracing::debug;
use uuid::Uuid;

/// Create a feed in `pending` status.
pub fn create_feed(conn: &mut PgConnection, new_feed: &NewFeed) -> ReelstackResult<FeedId> {
    conn.transaction(|conn| {
        let owner_exists: bool = diesel::select(exists(
            users::table.find(new_feed.user_id.as_uuid()),
        ))
        .get_result(conn)?;
        if !owner_exists {
            Err(NotFoundError::new("user", new_feed.user_id.to_string()))?;
        }

        let now = Utc::now();
        let row = NewFeedRow {
            id: Uuid::new_v4(),
            user_id: new_feed.user_id.as_uuid(),
            prompt: new_feed.prompt.clone(),
            topic: new_feed.topic.clone(),
            description: new_feed.description.clone(),
            tags: new_feed.tags.clone(),
            status: FeedStatus::Pending.to_string(),
            created_at: now,
            updated_at: now,
        };
        diesel::insert_into(feeds::table).values(&row).execute(conn)?;
        Ok(FeedId::from(row.id))
    })
}

/// Fetch a feed by id.
pub fn get_feed(conn: &mut PgConnection, id: FeedId) -> ReelstackResult<Option<Feed>> {
    let row = feeds::table
        .find(id.as_uuid())
        .first::<FeedRow>(conn)
        .optional()?;
    row.map(FeedRow::into_domain).transpose()
}

/// Feeds owned by the user, most recently updated first.
pub fn list_feeds_by_user(
    conn: &mut PgConnection,
    user_id: UserId,
    status: Option<FeedStatus>,
) -> ReelstackResult<Vec<Feed>> {
    let mut query = feeds::table
        .filter(feeds::user_id.eq(user_id.as_uuid()))
        .into_boxed();
    if let Some(status) = status {
        query = query.filter(feeds::status.eq(status.to_string()));
    }

    let rows = query.order(feeds::updated_at.desc()).load::<FeedRow>(conn)?;
    rows.into_iter().map(FeedRow::into_domain).collect()
}

/// Set the lifecycle status and bump `updated_at`.
pub fn set_feed_status(
    conn: &mut PgConnection,
    id: FeedId,
    status: FeedStatus,
) -> ReelstackResult<()> {
    let updated = diesel::update(feeds::table.find(id.as_uuid()))
        .set((
            feeds::status.eq(status.to_string()),
            feeds::updated_at.eq(Utc::now()),
        ))
        .execute(conn)?;
    if updated == 0 {
        Err(NotFoundError::new("feed", id.to_string()))?;
    }
    Ok(())
}

/// Last-write-wins progress update.
pub fn update_progress(
    conn: &mut PgConnection,
    id: FeedId,
    update: &ProgressUpdate,
) -> ReelstackResult<()> {
    let updated = diesel::update(feeds::table.find(id.as_uuid()))
        .set((
            feeds::last_seen_index.eq(update.last_seen_index),
            feeds::last_seen_reel_id.eq(update.last_seen_reel_id.map(|r| r.as_uuid())),
            feeds::updated_at.eq(Utc::now()),
        ))
        .execute(conn)?;
    if updated == 0 {
        Err(NotFoundError::new("feed", id.to_string()))?;
    }
    Ok(())
}

/// Delete the feed, its placements, and any reels left with no remaining
/// placements and no views referencing them.
pub fn delete_feed(conn: &mut PgConnection, id: FeedId) -> ReelstackResult<()> {
    conn.transaction(|conn| {
        let feed_exists: bool =
            diesel::select(exists(feeds::table.find(id.as_uuid()))).get_result(conn)?;
        if !feed_exists {
            Err(NotFoundError::new("feed", id.to_string()))?;
        }

        let placed: Vec<Uuid> = feed_placements::table
            .filter(feed_placements::feed_id.eq(id.as_uuid()))
            .select(feed_placements::reel_id)
            .load(conn)?;

        diesel::delete(feed_placements::table.filter(feed_placements::feed_id.eq(id.as_uuid())))
            .execute(conn)?;
        diesel::delete(feeds::table.find(id.as_uuid())).execute(conn)?;

        if placed.is_empty() {
            return Ok(());
        }

        let still_placed: HashSet<Uuid> = feed_placements::table
            .filter(feed_placements::reel_id.eq_any(&placed))
            .select(feed_placements::reel_id)
            .load::<Uuid>(conn)?
            .into_iter()
            .collect();
        let viewed: HashSet<Uuid> = reel_views::table
            .filter(reel_views::reel_id.eq_any(&placed))
            .select(reel_views::reel_id)
            .load::<Uuid>(conn)?
            .into_iter()
            .collect();

        let orphans: Vec<Uuid> = placed
            .into_iter()
            .filter(|reel| !still_placed.contains(reel) && !viewed.contains(reel))
            .collect();
        if orphans.is_empty() {
            return Ok(());
        }

        debug!(feed = %id, orphans = orphans.len(), "removing orphaned reels");
        diesel::delete(reel_likes::table.filter(reel_likes::reel_id.eq_any(&orphans)))
            .execute(conn)?;
        diesel::delete(reel_comments::table.filter(reel_comments::reel_id.eq_any(&orphans)))
            .execute(conn)?;
        diesel::delete(reels::table.filter(reels::id.eq_any(&orphans))).execute(conn)?;
        Ok(())
    })
}

/// Insert a placement unless one already exists for (feed, reel). Returns
/// true when a new placement was created.
pub fn insert_placement(
    conn: &mut PgConnection,
    feed_id: FeedId,
    reel_id: ReelId,
    position: f64,
    status: PlacementStatus,
) -> ReelstackResult<bool> {
    let now = Utc::now();
    let row = NewPlacementRow {
        feed_id: feed_id.as_uuid(),
        reel_id: reel_id.as_uuid(),
        position,
        status: status.to_string(),
        created_at: now,
        updated_at: now,
    };
    let inserted = diesel::insert_into(feed_placements::table)
        .values(&row)
        .on_conflict_do_nothing()
        .execute(conn)?;
    Ok(inserted > 0)
}

/// Whether the reel is placed in the feed.
pub fn is_placed(conn: &mut PgConnection, feed_id: FeedId, reel_id: ReelId) -> ReelstackResult<bool> {
    let placed: bool = diesel::select(exists(
        feed_placements::table.find((feed_id.as_uuid(), reel_id.as_uuid())),
    ))
    .get_result(conn)?;
    Ok(placed)
}

/// All positions in the feed, ascending.
pub fn positions(conn: &mut PgConnection, feed_id: FeedId) -> ReelstackResult<Vec<f64>> {
    let positions = feed_placements::table
        .filter(feed_placements::feed_id.eq(feed_id.as_uuid()))
        .select(feed_placements::position)
        .order(feed_placements::position.asc())
        .load::<f64>(conn)?;
    Ok(positions)
}

/// Reels joined with their placements, ascending by position.
pub fn list_placements(
    conn: &mut PgConnection,
    feed_id: FeedId,
    status: Option<PlacementStatus>,
    limit: Option<i64>,
) -> ReelstackResult<Vec<PlacedReel>> {
    let mut query = feed_placements::table
        .inner_join(reels::table)
        .filter(feed_placements::feed_id.eq(feed_id.as_uuid()))
        .into_boxed();
    if let Some(status) = status {
        query = query.filter(feed_placements::status.eq(status.to_string()));
    }
    if let Some(limit) = limit {
        query = query.limit(limit);
    }

    let rows = query
        .order(feed_placements::position.asc())
        .load::<(PlacementRow, ReelRow)>(conn)?;

    rows.into_iter()
        .map(|(placement, reel)| {
            Ok(PlacedReel {
                status: placement.placement_status()?,
                feed_id: placement.feed_id.into(),
                position: placement.position,
                reel: reel.into_domain()?,
            })
        })
        .collect()
}
