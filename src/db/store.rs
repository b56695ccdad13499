//! Store seams consumed by the auth core and the contact handlers.
//!
//! Production implementations live in `repositories/`; tests substitute
//! in-memory fakes so nothing here requires a running database.

use async_trait::async_trait;

use crate::db::error::RepositoryError;
use crate::db::models::contact::{Contact, ContactChanges, NewContact};
use crate::db::models::user::{NewUser, User};

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError>;

    /// Insert a new account. The storage layer enforces email uniqueness;
    /// a duplicate surfaces as `RepositoryError::UniqueViolation`.
    async fn create(&self, new_user: NewUser) -> Result<User, RepositoryError>;

    /// Overwrite (or clear) the stored refresh token.
    async fn update_refresh_token(
        &self,
        user_id: i32,
        token: Option<String>,
    ) -> Result<(), RepositoryError>;

    /// Flip `confirmed` to true. Idempotent.
    async fn confirm_email(&self, email: &str) -> Result<(), RepositoryError>;

    async fn update_password(
        &self,
        user_id: i32,
        password_hash: &str,
    ) -> Result<(), RepositoryError>;
}

/// Equality filters for the contact listing; absent fields do not constrain.
#[derive(Debug, Clone, Default)]
pub struct ContactFilters {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

#[async_trait]
pub trait ContactStore: Send + Sync {
    async fn list(
        &self,
        user_id: i32,
        filters: &ContactFilters,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Contact>, RepositoryError>;

    /// Contacts whose next birthday occurrence falls within `days` from today.
    async fn upcoming_birthdays(
        &self,
        user_id: i32,
        days: i64,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Contact>, RepositoryError>;

    async fn get(&self, user_id: i32, contact_id: i32) -> Result<Option<Contact>, RepositoryError>;

    async fn create(&self, new_contact: NewContact) -> Result<Contact, RepositoryError>;

    /// Returns `None` when the contact does not exist or belongs to someone else.
    async fn update(
        &self,
        user_id: i32,
        contact_id: i32,
        changes: ContactChanges,
    ) -> Result<Option<Contact>, RepositoryError>;

    async fn delete(
        &self,
        user_id: i32,
        contact_id: i32,
    ) -> Result<Option<Contact>, RepositoryError>;
}
