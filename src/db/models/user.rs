use chrono::{DateTime, Utc};
use diesel::{Insertable, Queryable, Selectable};

use crate::db::schema::users;

/// Account row to insert at signup. `confirmed` starts false and only the
/// email-confirmation flow flips it.
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = users)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    /// bcrypt hash, never the plaintext.
    pub password: String,
    pub avatar: Option<String>,
    pub confirmed: bool,
}

#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct User {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub password: String,
    pub avatar: Option<String>,
    /// Most recently issued refresh token; older ones are rejected.
    pub refresh_token: Option<String>,
    pub confirmed: bool,
    pub created_at: DateTime<Utc>,
}
