//! In-memory collaborators for hermetic tests. Nothing here ships in a
//! release build.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI32, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;

use crate::auth::CurrentUser;
use crate::auth::cache::{CacheError, SessionCache};
use crate::db::error::RepositoryError;
use crate::db::models::contact::{Contact, ContactChanges, NewContact};
use crate::db::models::user::{NewUser, User};
use crate::db::store::{ContactFilters, ContactStore, UserStore};
use crate::services::avatar::AvatarLookup;
use crate::services::birthdays;
use crate::services::email::{EmailError, EmailTemplate, Mailer};

#[derive(Default)]
pub struct MemoryUserStore {
    users: Mutex<HashMap<String, User>>,
    next_id: AtomicI32,
    /// Number of `find_by_email` calls, for cache-interaction assertions.
    pub find_calls: AtomicUsize,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self {
            next_id: AtomicI32::new(1),
            ..Self::default()
        }
    }

    pub fn get(&self, email: &str) -> Option<User> {
        self.users.lock().get(email).cloned()
    }

    pub fn len(&self) -> usize {
        self.users.lock().len()
    }

    /// Directly mark an account confirmed, standing in for the mailed link.
    pub fn confirm(&self, email: &str) {
        if let Some(user) = self.users.lock().get_mut(email) {
            user.confirmed = true;
        }
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        self.find_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.users.lock().get(email).cloned())
    }

    async fn create(&self, new_user: NewUser) -> Result<User, RepositoryError> {
        let mut users = self.users.lock();
        if users.contains_key(&new_user.email) {
            return Err(RepositoryError::UniqueViolation(format!(
                "duplicate key value violates unique constraint: {}",
                new_user.email
            )));
        }

        let user = User {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            username: new_user.username,
            email: new_user.email.clone(),
            password: new_user.password,
            avatar: new_user.avatar,
            refresh_token: None,
            confirmed: new_user.confirmed,
            created_at: Utc::now(),
        };
        users.insert(new_user.email, user.clone());
        Ok(user)
    }

    async fn update_refresh_token(
        &self,
        user_id: i32,
        token: Option<String>,
    ) -> Result<(), RepositoryError> {
        let mut users = self.users.lock();
        if let Some(user) = users.values_mut().find(|u| u.id == user_id) {
            user.refresh_token = token;
        }
        Ok(())
    }

    async fn confirm_email(&self, email: &str) -> Result<(), RepositoryError> {
        self.confirm(email);
        Ok(())
    }

    async fn update_password(
        &self,
        user_id: i32,
        password_hash: &str,
    ) -> Result<(), RepositoryError> {
        let mut users = self.users.lock();
        if let Some(user) = users.values_mut().find(|u| u.id == user_id) {
            user.password = password_hash.to_string();
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryContactStore {
    contacts: Mutex<Vec<Contact>>,
    next_id: AtomicI32,
}

impl MemoryContactStore {
    pub fn new() -> Self {
        Self {
            next_id: AtomicI32::new(1),
            ..Self::default()
        }
    }
}

#[async_trait]
impl ContactStore for MemoryContactStore {
    async fn list(
        &self,
        user_id: i32,
        filters: &ContactFilters,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Contact>, RepositoryError> {
        let contacts = self.contacts.lock();
        let matching: Vec<Contact> = contacts
            .iter()
            .filter(|c| c.user_id == user_id)
            .filter(|c| {
                filters
                    .first_name
                    .as_ref()
                    .is_none_or(|v| &c.first_name == v)
                    && filters.last_name.as_ref().is_none_or(|v| &c.last_name == v)
                    && filters.email.as_ref().is_none_or(|v| &c.email == v)
            })
            .skip(usize::try_from(offset).unwrap_or(0))
            .take(usize::try_from(limit).unwrap_or(0))
            .cloned()
            .collect();
        Ok(matching)
    }

    async fn upcoming_birthdays(
        &self,
        user_id: i32,
        days: i64,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Contact>, RepositoryError> {
        let today = Utc::now().date_naive();
        let contacts = self.contacts.lock();
        let upcoming: Vec<Contact> = contacts
            .iter()
            .filter(|c| c.user_id == user_id)
            .filter(|c| {
                c.birthday
                    .is_some_and(|birthday| birthdays::upcoming_within(birthday, today, days))
            })
            .skip(usize::try_from(offset).unwrap_or(0))
            .take(usize::try_from(limit).unwrap_or(0))
            .cloned()
            .collect();
        Ok(upcoming)
    }

    async fn get(&self, user_id: i32, contact_id: i32) -> Result<Option<Contact>, RepositoryError> {
        Ok(self
            .contacts
            .lock()
            .iter()
            .find(|c| c.id == contact_id && c.user_id == user_id)
            .cloned())
    }

    async fn create(&self, new_contact: NewContact) -> Result<Contact, RepositoryError> {
        let contact = Contact {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            first_name: new_contact.first_name,
            last_name: new_contact.last_name,
            email: new_contact.email,
            phone_number: new_contact.phone_number,
            birthday: new_contact.birthday,
            add_info: new_contact.add_info,
            created_at: Utc::now(),
            user_id: new_contact.user_id,
        };
        self.contacts.lock().push(contact.clone());
        Ok(contact)
    }

    async fn update(
        &self,
        user_id: i32,
        contact_id: i32,
        changes: ContactChanges,
    ) -> Result<Option<Contact>, RepositoryError> {
        let mut contacts = self.contacts.lock();
        let Some(contact) = contacts
            .iter_mut()
            .find(|c| c.id == contact_id && c.user_id == user_id)
        else {
            return Ok(None);
        };

        contact.first_name = changes.first_name;
        contact.last_name = changes.last_name;
        contact.email = changes.email;
        contact.phone_number = changes.phone_number;
        contact.birthday = changes.birthday;
        contact.add_info = changes.add_info;
        Ok(Some(contact.clone()))
    }

    async fn delete(
        &self,
        user_id: i32,
        contact_id: i32,
    ) -> Result<Option<Contact>, RepositoryError> {
        let mut contacts = self.contacts.lock();
        let position = contacts
            .iter()
            .position(|c| c.id == contact_id && c.user_id == user_id);
        Ok(position.map(|index| contacts.remove(index)))
    }
}

/// Records every outbound message instead of talking to SMTP.
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<(String, EmailTemplate, String)>>,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<(String, EmailTemplate, String)> {
        self.sent.lock().clone()
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().len()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send_templated(
        &self,
        to: &str,
        _username: &str,
        _host: &str,
        template: EmailTemplate,
        token: &str,
    ) -> Result<(), EmailError> {
        self.sent
            .lock()
            .push((to.to_string(), template, token.to_string()));
        Ok(())
    }
}

/// Always fails, standing in for an unreachable SMTP relay.
pub struct FailingMailer;

#[async_trait]
impl Mailer for FailingMailer {
    async fn send_templated(
        &self,
        _to: &str,
        _username: &str,
        _host: &str,
        _template: EmailTemplate,
        _token: &str,
    ) -> Result<(), EmailError> {
        Err(EmailError::Transport("connection refused".to_string()))
    }
}

/// Answers every avatar lookup with a fixed value.
pub struct StaticAvatar(pub Option<String>);

#[async_trait]
impl AvatarLookup for StaticAvatar {
    async fn lookup(&self, _email: &str) -> Option<String> {
        self.0.clone()
    }
}

/// A cache whose backing service is down; reads and writes both error.
pub struct BrokenCache;

#[async_trait]
impl SessionCache for BrokenCache {
    async fn get(&self, _email: &str) -> Result<Option<CurrentUser>, CacheError> {
        Err(CacheError::Unavailable("connection refused".to_string()))
    }

    async fn put(
        &self,
        _email: &str,
        _user: &CurrentUser,
        _ttl: std::time::Duration,
    ) -> Result<(), CacheError> {
        Err(CacheError::Unavailable("connection refused".to_string()))
    }
}
