//! Likes and comments, keyed on reel identity.

use crate::models::{CommentRow, NewCommentRow, NewLikeRow, UserRow};
use crate::schema::{reel_comments, reel_likes, reels, users};
use chrono::Utc;
use diesel::dsl::exists;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use reelstack_core::{CommentId, ReelId, UserId};
use reelstack_error::{NotFoundError, ReelstackResult};
use reelstack_interface::{CommentView, EngagementSummary};
use uuid::Uuid;

fn ensure_reel_exists(conn: &mut PgConnection, reel_id: ReelId) -> ReelstackResult<()> {
    let found: bool =
        diesel::select(exists(reels::table.find(reel_id.as_uuid()))).get_result(conn)?;
    if !found {
        Err(NotFoundError::new("reel", reel_id.to_string()))?;
    }
    Ok(())
}

/// Toggle the user's like; returns the resulting liked state.
pub fn toggle_like(
    conn: &mut PgConnection,
    reel_id: ReelId,
    user_id: UserId,
) -> ReelstackResult<bool> {
    conn.transaction(|conn| {
        ensure_reel_exists(conn, reel_id)?;

        let liked: bool = diesel::select(exists(
            reel_likes::table.find((reel_id.as_uuid(), user_id.as_uuid())),
        ))
        .get_result(conn)?;

        if liked {
            diesel::delete(reel_likes::table.find((reel_id.as_uuid(), user_id.as_uuid())))
                .execute(conn)?;
            return Ok(false);
        }

        let row = NewLikeRow {
            reel_id: reel_id.as_uuid(),
            user_id: user_id.as_uuid(),
            created_at: Utc::now(),
        };
        diesel::insert_into(reel_likes::table)
            .values(&row)
            .on_conflict_do_nothing()
            .execute(conn)?;
        Ok(true)
    })
}

/// Append a comment. Body validation happens in the engagement service.
pub fn add_comment(
    conn: &mut PgConnection,
    reel_id: ReelId,
    user_id: UserId,
    body: &str,
) -> ReelstackResult<CommentId> {
    ensure_reel_exists(conn, reel_id)?;

    let row = NewCommentRow {
        id: Uuid::new_v4(),
        reel_id: reel_id.as_uuid(),
        user_id: user_id.as_uuid(),
        body: body.to_string(),
        created_at: Utc::now(),
    };
    diesel::insert_into(reel_comments::table)
        .values(&row)
        .execute(conn)?;
    Ok(CommentId::from(row.id))
}

/// Latest comments for a reel, newest first, with authors resolved.
pub fn list_comments(
    conn: &mut PgConnection,
    reel_id: ReelId,
    limit: i64,
) -> ReelstackResult<Vec<CommentView>> {
    let rows = reel_comments::table
        .inner_join(users::table)
        .filter(reel_comments::reel_id.eq(reel_id.as_uuid()))
        .order(reel_comments::created_at.desc())
        .limit(limit.max(0))
        .load::<(CommentRow, UserRow)>(conn)?;

    Ok(rows
        .into_iter()
        .map(|(comment, user)| CommentView {
            id: comment.id.into(),
            body: comment.body,
            user_id: comment.user_id.into(),
            user_name: user.name,
            user_avatar_url: user.avatar_url,
            created_at: comment.created_at,
        })
        .collect())
}

/// Like/comment counts plus the latest comments.
pub fn reel_engagement(
    conn: &mut PgConnection,
    reel_id: ReelId,
    user_id: Option<UserId>,
    comment_limit: i64,
) -> ReelstackResult<EngagementSummary> {
    let like_count: i64 = reel_likes::table
        .filter(reel_likes::reel_id.eq(reel_id.as_uuid()))
        .count()
        .get_result(conn)?;
    let comment_count: i64 = reel_comments::table
        .filter(reel_comments::reel_id.eq(reel_id.as_uuid()))
        .count()
        .get_result(conn)?;

    let liked_by_user = match user_id {
        Some(user_id) => diesel::select(exists(
            reel_likes::table.find((reel_id.as_uuid(), user_id.as_uuid())),
        ))
        .get_result(conn)?,
        None => false,
    };

    let comments = list_comments(conn, reel_id, comment_limit)?;

    Ok(EngagementSummary {
        like_count,
        comment_count,
        liked_by_user,
        comments,
    })
}
