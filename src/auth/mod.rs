pub mod cache;
pub mod extractors;
pub mod password;
pub mod service;
pub mod token;

use serde::{Deserialize, Serialize};

use crate::db::models::user::User;

/// Identity resolved for a request. This is the field list that is safe to
/// cache and to hand to handlers; the password hash and refresh token stay
/// in the store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub confirmed: bool,
    pub avatar: Option<String>,
}

impl From<&User> for CurrentUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            confirmed: user.confirmed,
            avatar: user.avatar.clone(),
        }
    }
}
