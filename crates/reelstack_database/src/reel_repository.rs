//! Reel persistence: dedup-keyed upsert, lookup, explicit patch, and the
//! catalog search backing the internal source adapter.

use crate::models::{NewReelRow, ReelChangeset, ReelRow};
use crate::schema::reels;
use chrono::{DateTime, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use reelstack_core::{CandidateDescriptor, Reel, ReelId};
use reelstack_error::{DatabaseError, DatabaseErrorKind, NotFoundError, ReelstackResult};
use reelstack_interface::ReelPatch;
use tracing::debug;

/// Insert or fill-merge a candidate, returning the canonical reel id.
///
/// Runs in a transaction. Lookup order is `video_url` first, then
/// `source_reference`. When the conditional insert loses a race against a
/// concurrent upsert for the same dedup key, the winner's row is re-read
/// and fill-merged instead, so exactly one row exists per key.
pub fn upsert_reel(
    conn: &mut PgConnection,
    candidate: &CandidateDescriptor,
) -> ReelstackResult<ReelId> {
    let now = Utc::now();
    conn.transaction(|conn| {
        if let Some(row) = find_existing(conn, candidate)? {
            return fill_merge(conn, &row, candidate, now);
        }

        let new_row = NewReelRow::from_candidate(candidate, now)?;
        let id = new_row.id;
        let inserted = diesel::insert_into(reels::table)
            .values(&new_row)
            .on_conflict_do_nothing()
            .execute(conn)?;

        if inserted == 0 {
            // Lost the conditional-insert race; the winner's row is visible
            // to this statement now.
            debug!(?id, "upsert lost insert race, merging into existing reel");
            let row = find_existing(conn, candidate)?.ok_or_else(|| {
                DatabaseError::new(DatabaseErrorKind::Query(
                    "reel insert conflicted but no row matches either dedup key".to_string(),
                ))
            })?;
            return fill_merge(conn, &row, candidate, now);
        }

        Ok(ReelId::from(id))
    })
}

fn find_existing(
    conn: &mut PgConnection,
    candidate: &CandidateDescriptor,
) -> ReelstackResult<Option<ReelRow>> {
    if let Some(url) = candidate.video_url.as_deref() {
        let row = reels::table
            .filter(reels::video_url.eq(url))
            .first::<ReelRow>(conn)
            .optional()?;
        if row.is_some() {
            return Ok(row);
        }
    }
    if let Some(reference) = candidate.source_reference.as_deref() {
        let row = reels::table
            .filter(reels::source_reference.eq(reference))
            .first::<ReelRow>(conn)
            .optional()?;
        if row.is_some() {
            return Ok(row);
        }
    }
    Ok(None)
}

/// Fill previously-empty fields from the candidate, never overwriting ones
/// already set, and bump `updated_at` only when something changed.
fn fill_merge(
    conn: &mut PgConnection,
    row: &ReelRow,
    candidate: &CandidateDescriptor,
    now: DateTime<Utc>,
) -> ReelstackResult<ReelId> {
    let mut changes = ReelChangeset::default();
    if row.thumbnail_url.is_none() {
        changes.thumbnail_url = candidate.thumbnail_url.clone();
    }
    if row.title.is_none() {
        changes.title = candidate.title.clone();
    }
    if row.description.is_none() {
        changes.description = candidate.description.clone();
    }
    if row.duration_seconds.is_none() {
        changes.duration_seconds = candidate.duration_seconds;
    }
    if row.metadata.is_none() {
        if let Some(meta) = &candidate.metadata {
            changes.metadata = Some(serde_json::to_value(meta).map_err(DatabaseError::from)?);
        }
    }

    if !changes.is_empty() {
        changes.updated_at = Some(now);
        diesel::update(reels::table.find(row.id))
            .set(&changes)
            .execute(conn)?;
    }

    Ok(ReelId::from(row.id))
}

/// Fetch a reel by id.
pub fn get_reel(conn: &mut PgConnection, id: ReelId) -> ReelstackResult<Option<Reel>> {
    let row = reels::table
        .find(id.as_uuid())
        .first::<ReelRow>(conn)
        .optional()?;
    row.map(ReelRow::into_domain).transpose()
}

/// Explicit post-hoc edit: set fields overwrite, unlike the upsert
/// fill-merge.
pub fn patch_reel(conn: &mut PgConnection, id: ReelId, patch: &ReelPatch) -> ReelstackResult<()> {
    if patch.is_empty() {
        return Ok(());
    }

    let metadata = match &patch.metadata {
        Some(meta) => Some(serde_json::to_value(meta).map_err(DatabaseError::from)?),
        None => None,
    };
    let changes = ReelChangeset {
        video_url: patch.video_url.clone(),
        thumbnail_url: patch.thumbnail_url.clone(),
        title: patch.title.clone(),
        description: patch.description.clone(),
        duration_seconds: patch.duration_seconds,
        metadata,
        updated_at: Some(Utc::now()),
    };

    let updated = diesel::update(reels::table.find(id.as_uuid()))
        .set(&changes)
        .execute(conn)?;
    if updated == 0 {
        Err(NotFoundError::new("reel", id.to_string()))?;
    }
    Ok(())
}

/// Reels whose title or description matches the prompt, newest first.
pub fn search_catalog(
    conn: &mut PgConnection,
    terms: &str,
    limit: i64,
) -> ReelstackResult<Vec<Reel>> {
    let terms = terms.trim();
    if terms.is_empty() {
        return Ok(Vec::new());
    }

    let pattern = format!("%{terms}%");
    let rows = reels::table
        .filter(
            reels::title
                .ilike(&pattern)
                .or(reels::description.ilike(&pattern)),
        )
        .order(reels::created_at.desc())
        .limit(limit)
        .load::<ReelRow>(conn)?;

    rows.into_iter().map(ReelRow::into_domain).collect()
}
