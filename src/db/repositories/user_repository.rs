use async_trait::async_trait;
use diesel::prelude::*;

use crate::db::connection::get_connection;
use crate::db::error::RepositoryError;
use crate::db::models::user::{NewUser, User};
use crate::db::schema::users;
use crate::db::store::UserStore;

pub struct UserRepository;

impl UserRepository {
    fn conn() -> Result<crate::db::DbConnection, RepositoryError> {
        get_connection().map_err(|e| RepositoryError::Pool(e.to_string()))
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        let mut conn = Self::conn()?;

        users::table
            .filter(users::email.eq(email))
            .first::<User>(&mut conn)
            .optional()
            .map_err(Into::into)
    }

    async fn create(&self, new_user: NewUser) -> Result<User, RepositoryError> {
        let mut conn = Self::conn()?;

        diesel::insert_into(users::table)
            .values(&new_user)
            .get_result::<User>(&mut conn)
            .map_err(Into::into)
    }

    async fn update_refresh_token(
        &self,
        user_id: i32,
        token: Option<String>,
    ) -> Result<(), RepositoryError> {
        let mut conn = Self::conn()?;

        diesel::update(users::table.filter(users::id.eq(user_id)))
            .set(users::refresh_token.eq(token))
            .execute(&mut conn)?;

        Ok(())
    }

    async fn confirm_email(&self, email: &str) -> Result<(), RepositoryError> {
        let mut conn = Self::conn()?;

        diesel::update(users::table.filter(users::email.eq(email)))
            .set(users::confirmed.eq(true))
            .execute(&mut conn)?;

        Ok(())
    }

    async fn update_password(
        &self,
        user_id: i32,
        password_hash: &str,
    ) -> Result<(), RepositoryError> {
        let mut conn = Self::conn()?;

        diesel::update(users::table.filter(users::id.eq(user_id)))
            .set(users::password.eq(password_hash))
            .execute(&mut conn)?;

        Ok(())
    }
}
