use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;

use crate::db::connection::get_connection;
use crate::db::error::RepositoryError;
use crate::db::models::contact::{Contact, ContactChanges, NewContact};
use crate::db::schema::contacts;
use crate::db::store::{ContactFilters, ContactStore};
use crate::services::birthdays;

pub struct ContactRepository;

impl ContactRepository {
    fn conn() -> Result<crate::db::DbConnection, RepositoryError> {
        get_connection().map_err(|e| RepositoryError::Pool(e.to_string()))
    }
}

#[async_trait]
impl ContactStore for ContactRepository {
    async fn list(
        &self,
        user_id: i32,
        filters: &ContactFilters,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Contact>, RepositoryError> {
        let mut conn = Self::conn()?;

        let mut query = contacts::table
            .filter(contacts::user_id.eq(user_id))
            .into_boxed();

        if let Some(first_name) = &filters.first_name {
            query = query.filter(contacts::first_name.eq(first_name.clone()));
        }
        if let Some(last_name) = &filters.last_name {
            query = query.filter(contacts::last_name.eq(last_name.clone()));
        }
        if let Some(email) = &filters.email {
            query = query.filter(contacts::email.eq(email.clone()));
        }

        query
            .offset(offset)
            .limit(limit)
            .load::<Contact>(&mut conn)
            .map_err(Into::into)
    }

    async fn upcoming_birthdays(
        &self,
        user_id: i32,
        days: i64,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Contact>, RepositoryError> {
        let mut conn = Self::conn()?;

        // The window wraps across year boundaries, so the filtering happens
        // here rather than in SQL.
        let rows = contacts::table
            .filter(contacts::user_id.eq(user_id))
            .load::<Contact>(&mut conn)?;

        let today = Utc::now().date_naive();
        let upcoming: Vec<Contact> = rows
            .into_iter()
            .filter(|contact| {
                contact
                    .birthday
                    .is_some_and(|birthday| birthdays::upcoming_within(birthday, today, days))
            })
            .skip(usize::try_from(offset).unwrap_or(0))
            .take(usize::try_from(limit).unwrap_or(0))
            .collect();

        Ok(upcoming)
    }

    async fn get(&self, user_id: i32, contact_id: i32) -> Result<Option<Contact>, RepositoryError> {
        let mut conn = Self::conn()?;

        contacts::table
            .filter(contacts::id.eq(contact_id))
            .filter(contacts::user_id.eq(user_id))
            .first::<Contact>(&mut conn)
            .optional()
            .map_err(Into::into)
    }

    async fn create(&self, new_contact: NewContact) -> Result<Contact, RepositoryError> {
        let mut conn = Self::conn()?;

        diesel::insert_into(contacts::table)
            .values(&new_contact)
            .get_result::<Contact>(&mut conn)
            .map_err(Into::into)
    }

    async fn update(
        &self,
        user_id: i32,
        contact_id: i32,
        changes: ContactChanges,
    ) -> Result<Option<Contact>, RepositoryError> {
        let mut conn = Self::conn()?;

        diesel::update(
            contacts::table
                .filter(contacts::id.eq(contact_id))
                .filter(contacts::user_id.eq(user_id)),
        )
        .set(&changes)
        .get_result::<Contact>(&mut conn)
        .optional()
        .map_err(Into::into)
    }

    async fn delete(
        &self,
        user_id: i32,
        contact_id: i32,
    ) -> Result<Option<Contact>, RepositoryError> {
        let mut conn = Self::conn()?;

        diesel::delete(
            contacts::table
                .filter(contacts::id.eq(contact_id))
                .filter(contacts::user_id.eq(user_id)),
        )
        .get_result::<Contact>(&mut conn)
        .optional()
        .map_err(Into::into)
    }
}
