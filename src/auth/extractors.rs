use axum::extract::FromRequestParts;
use axum::http::{HeaderMap, header, request::Parts};

use crate::app::AppState;
use crate::auth::CurrentUser;
use crate::error::AppError;

/// Token part of an `Authorization: Bearer <token>` header, if present.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Extractor for protected routes: runs the full identity resolution
/// (verify token, check scope, cache-or-store lookup) and hands the handler
/// the resolved user. Any failure is the generic credentials rejection.
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers).ok_or(AppError::InvalidToken)?;
        state.auth.resolve_identity(token).await
    }
}
