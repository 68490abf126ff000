//! Viewer accounts.

use crate::models::{NewUserRow, UserRow};
use crate::schema::users;
use chrono::Utc;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use reelstack_core::{User, UserId};
use reelstack_error::ReelstackResult;
use reelstack_interface::NewUser;
use uuid::Uuid;

/// Upsert by identity-provider subject.
///
/// Existing users get their profile fields refreshed and `last_login_at`
/// bumped; otherwise a new row is inserted.
pub fn upsert_user(conn: &mut PgConnection, new_user: &NewUser) -> ReelstackResult<UserId> {
    let now = Utc::now();
    conn.transaction(|conn| {
        let existing = users::table
            .filter(users::external_id.eq(&new_user.external_id))
            .first::<UserRow>(conn)
            .optional()?;

        if let Some(row) = existing {
            diesel::update(users::table.find(row.id))
                .set((
                    users::email.eq(&new_user.email),
                    users::name.eq(&new_user.name),
                    users::avatar_url.eq(&new_user.avatar_url),
                    users::last_login_at.eq(Some(now)),
                ))
                .execute(conn)?;
            return Ok(UserId::from(row.id));
        }

        let row = NewUserRow {
            id: Uuid::new_v4(),
            external_id: new_user.external_id.clone(),
            email: new_user.email.clone(),
            name: new_user.name.clone(),
            avatar_url: new_user.avatar_url.clone(),
            created_at: now,
            last_login_at: Some(now),
        };
        diesel::insert_into(users::table).values(&row).execute(conn)?;
        Ok(UserId::from(row.id))
    })
}

/// Fetch a user by id.
pub fn get_user(conn: &mut PgConnection, id: UserId) -> ReelstackResult<Option<User>> {
    let row = users::table
        .find(id.as_uuid())
        .first::<UserRow>(conn)
        .optional()?;
    Ok(row.map(UserRow::into_domain))
}
