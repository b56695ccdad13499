use chrono::NaiveDate;
use serde::Deserialize;

use crate::error::AppError;

fn is_valid_email(email: &str) -> bool {
    email.contains('@') && email.contains('.') && email.len() > 5
}

#[derive(Deserialize, Debug, Clone)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String, // plain text
}

impl SignupRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if !(3..=50).contains(&self.username.chars().count()) {
            return Err(AppError::validation(
                "Username must be between 3 and 50 characters",
            ));
        }
        if !is_valid_email(&self.email) {
            return Err(AppError::validation("Invalid email format"));
        }
        // bcrypt ignores everything past 72 bytes.
        if self.password.len() < 6 || self.password.len() > 72 {
            return Err(AppError::validation(
                "Password must be between 6 and 72 characters",
            ));
        }
        Ok(())
    }
}

/// OAuth2-style login form; `username` carries the email.
#[derive(Deserialize, Debug, Clone)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct RequestEmail {
    pub email: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct SetPasswordRequest {
    pub token: String,
    pub password: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ContactPayload {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub birthday: Option<NaiveDate>,
    pub add_info: Option<String>,
}

impl ContactPayload {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.first_name.is_empty() || self.first_name.chars().count() > 150 {
            return Err(AppError::validation(
                "First name must be between 1 and 150 characters",
            ));
        }
        if self.last_name.is_empty() || self.last_name.chars().count() > 150 {
            return Err(AppError::validation(
                "Last name must be between 1 and 150 characters",
            ));
        }
        if !is_valid_email(&self.email) {
            return Err(AppError::validation("Invalid email format"));
        }
        if self.phone_number.is_empty() || self.phone_number.chars().count() > 30 {
            return Err(AppError::validation(
                "Phone number must be between 1 and 30 characters",
            ));
        }
        Ok(())
    }
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct ContactListQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct BirthdayQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub days: Option<i64>,
}

/// Page bounds shared by the list endpoints: limit 10..=500, offset >= 0.
pub fn page_bounds(limit: Option<i64>, offset: Option<i64>) -> (i64, i64) {
    (limit.unwrap_or(10).clamp(10, 500), offset.unwrap_or(0).max(0))
}
