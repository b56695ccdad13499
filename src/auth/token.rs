use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

/// Scope claim carried by access tokens.
pub const SCOPE_ACCESS: &str = "access_token";
/// Scope claim carried by refresh tokens.
pub const SCOPE_REFRESH: &str = "refresh_token";

/// Default lifetime of an access token.
pub const ACCESS_TOKEN_TTL_MINUTES: i64 = 15;
/// Default lifetime of a refresh token.
pub const REFRESH_TOKEN_TTL_DAYS: i64 = 7;
/// Lifetime of an email confirmation / password reset token.
pub const EMAIL_TOKEN_TTL_DAYS: i64 = 7;

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("Token generation failed: {0}")]
    GenerationFailed(jsonwebtoken::errors::Error),
    #[error("Token verification failed: {0}")]
    VerificationFailed(jsonwebtoken::errors::Error),
}

/// Signed token payload. `scope` distinguishes access from refresh tokens;
/// email tokens carry no scope at all.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

impl Claims {
    pub fn has_scope(&self, scope: &str) -> bool {
        self.scope.as_deref() == Some(scope)
    }
}

#[derive(Clone)]
pub struct JwtManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
}

impl JwtManager {
    /// `algorithm` must come from [`crate::config::parse_algorithm`]; anything
    /// outside HS256/HS512 is rejected there, at startup.
    pub fn new(secret: &str, algorithm: Algorithm) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_ref()),
            decoding_key: DecodingKey::from_secret(secret.as_ref()),
            algorithm,
        }
    }

    /// Sign `sub` + optional `scope`, stamping issued-at and expiry.
    pub fn issue(&self, sub: &str, scope: Option<&str>, ttl: Duration) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = Claims {
            sub: sub.to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            scope: scope.map(str::to_string),
        };

        encode(&Header::new(self.algorithm), &claims, &self.encoding_key)
            .map_err(TokenError::GenerationFailed)
    }

    /// Checks signature and expiry. Scope is NOT checked here; callers must
    /// inspect `Claims::scope` themselves.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(self.algorithm);
        validation.leeway = 0;

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(TokenError::VerificationFailed)
    }

    pub fn create_access_token(
        &self,
        email: &str,
        ttl: Option<Duration>,
    ) -> Result<String, TokenError> {
        let ttl = ttl.unwrap_or_else(|| Duration::minutes(ACCESS_TOKEN_TTL_MINUTES));
        self.issue(email, Some(SCOPE_ACCESS), ttl)
    }

    pub fn create_refresh_token(
        &self,
        email: &str,
        ttl: Option<Duration>,
    ) -> Result<String, TokenError> {
        let ttl = ttl.unwrap_or_else(|| Duration::days(REFRESH_TOKEN_TTL_DAYS));
        self.issue(email, Some(SCOPE_REFRESH), ttl)
    }

    /// Unscoped token mailed out for email confirmation and password reset.
    pub fn create_email_token(&self, email: &str) -> Result<String, TokenError> {
        self.issue(email, None, Duration::days(EMAIL_TOKEN_TTL_DAYS))
    }
}
