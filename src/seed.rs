use diesel::pg::PgConnection;
use diesel::prelude::*;

use crate::infrastructure::models::NewUserRow;
use crate::schema::users;

pub const DEFAULT_USERS: &[(i32, &str)] = &[(1, "Alice"), (2, "Bob")];

/// Inserts the given users, skipping ids that already exist. Returns the
/// number of rows actually written.
pub fn seed_users(conn: &mut PgConnection, seed: &[(i32, &str)]) -> QueryResult<usize> {
    let rows: Vec<NewUserRow<'_>> = seed
        .iter()
        .map(|&(id, name)| NewUserRow { id, name })
        .collect();

    diesel::insert_into(users::table)
        .values(&rows)
        .on_conflict_do_nothing()
        .execute(conn)
}
