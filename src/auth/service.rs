//! Authentication core: signup, login, token refresh, email confirmation,
//! password management, and per-request identity resolution.
//!
//! Every collaborator (store, cache, mailer, avatar lookup) is injected, so
//! the whole flow runs hermetically under test.

use std::sync::Arc;

use crate::auth::CurrentUser;
use crate::auth::cache::{SessionCache, USER_CACHE_TTL};
use crate::auth::password::PasswordHasher;
use crate::auth::token::{JwtManager, SCOPE_ACCESS, SCOPE_REFRESH};
use crate::db::error::RepositoryError;
use crate::db::models::user::{NewUser, User};
use crate::db::store::UserStore;
use crate::error::AppError;
use crate::services::avatar::AvatarLookup;
use crate::services::email::{EmailTemplate, Mailer};

/// Signup input, already validated at the edge.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Freshly issued access + refresh pair.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmOutcome {
    Confirmed,
    AlreadyConfirmed,
}

pub struct AuthService {
    users: Arc<dyn UserStore>,
    cache: Arc<dyn SessionCache>,
    hasher: PasswordHasher,
    tokens: JwtManager,
    mailer: Arc<dyn Mailer>,
    avatars: Arc<dyn AvatarLookup>,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserStore>,
        cache: Arc<dyn SessionCache>,
        hasher: PasswordHasher,
        tokens: JwtManager,
        mailer: Arc<dyn Mailer>,
        avatars: Arc<dyn AvatarLookup>,
    ) -> Self {
        Self {
            users,
            cache,
            hasher,
            tokens,
            mailer,
            avatars,
        }
    }

    /// Register a new account. The confirmation email goes out on a spawned
    /// task; neither avatar lookup nor mail delivery can fail the signup.
    pub async fn signup(&self, account: NewAccount, host: &str) -> Result<User, AppError> {
        if self.users.find_by_email(&account.email).await?.is_some() {
            return Err(AppError::conflict("Account already exists"));
        }

        let avatar = self.avatars.lookup(&account.email).await;
        let password_hash = self.hasher.hash(&account.password)?;

        let user = self
            .users
            .create(NewUser {
                username: account.username,
                email: account.email,
                password: password_hash,
                avatar,
                confirmed: false,
            })
            .await
            .map_err(|err| match err {
                RepositoryError::UniqueViolation(_) => {
                    AppError::conflict("Account already exists")
                }
                other => other.into(),
            })?;

        self.dispatch_email(
            user.email.clone(),
            user.username.clone(),
            host.to_string(),
            EmailTemplate::ConfirmEmail,
        );

        Ok(user)
    }

    /// Exchange credentials for a bearer token pair. The reason strings here
    /// are intentionally specific, unlike token failures.
    pub async fn login(&self, email: &str, password: &str) -> Result<TokenPair, AppError> {
        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or_else(|| AppError::unauthorized("Invalid email"))?;

        if !user.confirmed {
            return Err(AppError::unauthorized("Email not confirmed"));
        }
        if !self.hasher.verify(password, &user.password) {
            return Err(AppError::unauthorized("Invalid password"));
        }

        self.issue_pair(&user).await
    }

    /// Exchange a refresh token for a fresh pair. Only the most recently
    /// issued refresh token is accepted; presenting an older one clears the
    /// stored token so the session has to log in again.
    pub async fn refresh_exchange(&self, presented: &str) -> Result<TokenPair, AppError> {
        let claims = self.tokens.verify(presented)?;
        if !claims.has_scope(SCOPE_REFRESH) {
            return Err(AppError::unauthorized("Invalid scope for token"));
        }

        let user = self
            .users
            .find_by_email(&claims.sub)
            .await?
            .ok_or_else(|| AppError::unauthorized("Invalid refresh token"))?;

        if user.refresh_token.as_deref() != Some(presented) {
            self.users.update_refresh_token(user.id, None).await?;
            return Err(AppError::unauthorized("Invalid refresh token"));
        }

        self.issue_pair(&user).await
    }

    async fn issue_pair(&self, user: &User) -> Result<TokenPair, AppError> {
        let access_token = self.tokens.create_access_token(&user.email, None)?;
        let refresh_token = self.tokens.create_refresh_token(&user.email, None)?;

        self.users
            .update_refresh_token(user.id, Some(refresh_token.clone()))
            .await?;

        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }

    /// Flip `confirmed` for the subject of a valid email token. Idempotent;
    /// a token for an unknown address surfaces as `NotFound` for the caller
    /// layer to translate.
    pub async fn confirm_email(&self, token: &str) -> Result<ConfirmOutcome, AppError> {
        let claims = self.tokens.verify(token)?;

        let user = self
            .users
            .find_by_email(&claims.sub)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        if user.confirmed {
            return Ok(ConfirmOutcome::AlreadyConfirmed);
        }

        self.users.confirm_email(&user.email).await?;
        Ok(ConfirmOutcome::Confirmed)
    }

    /// Re-send the confirmation email. Silently a no-op for unknown
    /// addresses so the endpoint does not leak which emails exist.
    pub async fn resend_confirmation(&self, email: &str, host: &str) -> Result<ConfirmOutcome, AppError> {
        match self.users.find_by_email(email).await? {
            Some(user) if user.confirmed => Ok(ConfirmOutcome::AlreadyConfirmed),
            Some(user) => {
                self.dispatch_email(
                    user.email,
                    user.username,
                    host.to_string(),
                    EmailTemplate::ConfirmEmail,
                );
                Ok(ConfirmOutcome::Confirmed)
            }
            None => {
                tracing::debug!("confirmation requested for unknown address");
                Ok(ConfirmOutcome::Confirmed)
            }
        }
    }

    /// Email a password-reset token. Same non-enumeration stance as
    /// [`Self::resend_confirmation`].
    pub async fn request_password_reset(&self, email: &str, host: &str) -> Result<(), AppError> {
        if let Some(user) = self.users.find_by_email(email).await? {
            self.dispatch_email(
                user.email,
                user.username,
                host.to_string(),
                EmailTemplate::ResetPassword,
            );
        } else {
            tracing::debug!("password reset requested for unknown address");
        }
        Ok(())
    }

    /// Set a new password from a mailed reset token. Outstanding access
    /// tokens stay valid until they expire on their own.
    pub async fn reset_password(&self, token: &str, new_password: &str) -> Result<(), AppError> {
        let claims = self.tokens.verify(token)?;

        let user = self
            .users
            .find_by_email(&claims.sub)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        let password_hash = self.hasher.hash(new_password)?;
        self.users.update_password(user.id, &password_hash).await?;
        Ok(())
    }

    /// Authenticated password change; requires the old password.
    pub async fn change_password(
        &self,
        current: &CurrentUser,
        old_password: &str,
        new_password: &str,
    ) -> Result<(), AppError> {
        let user = self
            .users
            .find_by_email(&current.email)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        if !self.hasher.verify(old_password, &user.password) {
            return Err(AppError::unauthorized("Invalid password"));
        }

        let password_hash = self.hasher.hash(new_password)?;
        self.users.update_password(user.id, &password_hash).await?;
        Ok(())
    }

    /// Drop the stored refresh token; outstanding access tokens expire on
    /// their own schedule.
    pub async fn logout(&self, current: &CurrentUser) -> Result<(), AppError> {
        self.users.update_refresh_token(current.id, None).await?;
        Ok(())
    }

    /// Resolve the identity behind a bearer access token: verify signature,
    /// expiry and scope, then look the subject up in the session cache and
    /// fall back to the store on a miss. Cache failures count as misses.
    pub async fn resolve_identity(&self, bearer: &str) -> Result<CurrentUser, AppError> {
        let claims = self.tokens.verify(bearer)?;
        if !claims.has_scope(SCOPE_ACCESS) || claims.sub.is_empty() {
            return Err(AppError::InvalidToken);
        }

        match self.cache.get(&claims.sub).await {
            Ok(Some(user)) => {
                tracing::debug!("user from cache");
                return Ok(user);
            }
            Ok(None) => {}
            Err(err) => tracing::warn!("session cache read failed: {err}"),
        }

        let user = self
            .users
            .find_by_email(&claims.sub)
            .await?
            .ok_or(AppError::InvalidToken)?;
        tracing::debug!("user from store");

        let current = CurrentUser::from(&user);
        if let Err(err) = self.cache.put(&claims.sub, &current, USER_CACHE_TTL).await {
            tracing::warn!("session cache write failed: {err}");
        }

        Ok(current)
    }

    /// Subject of a bearer token without full identity resolution; the rate
    /// limiter keys on this.
    pub fn email_from_bearer(&self, bearer: &str) -> Result<String, AppError> {
        let claims = self.tokens.verify(bearer)?;
        Ok(claims.sub)
    }

    fn dispatch_email(
        &self,
        email: String,
        username: String,
        host: String,
        template: EmailTemplate,
    ) {
        let mailer = Arc::clone(&self.mailer);
        let tokens = self.tokens.clone();

        tokio::spawn(async move {
            let token = match tokens.create_email_token(&email) {
                Ok(token) => token,
                Err(err) => {
                    tracing::warn!("failed to create email token for {email}: {err}");
                    return;
                }
            };
            if let Err(err) = mailer
                .send_templated(&email, &username, &host, template, &token)
                .await
            {
                tracing::warn!("failed to send {template:?} email to {email}: {err}");
            }
        });
    }
}
