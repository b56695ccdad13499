use axum::extract::{Form, Json, Path, State};
use axum::http::{HeaderMap, StatusCode};

use crate::app::AppState;
use crate::auth::extractors::bearer_token;
use crate::auth::service::{ConfirmOutcome, NewAccount};
use crate::auth::CurrentUser;
use crate::dto::requests::{LoginForm, RequestEmail, SetPasswordRequest, SignupRequest};
use crate::dto::responses::{MessageResponse, TokenResponse, UserResponse};
use crate::error::AppError;

/// POST /api/auth/signup
pub async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<SignupRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    payload.validate()?;

    // No identity exists yet, so the limiter keys on the requested address.
    if !state.limiter.check(&payload.email) {
        return Err(AppError::RateLimited);
    }

    let user = state
        .auth
        .signup(
            NewAccount {
                username: payload.username,
                email: payload.email,
                password: payload.password,
            },
            &state.config.public_url,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(&user))))
}

/// POST /api/auth/login — form-encoded, `username` holds the email.
pub async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<Json<TokenResponse>, AppError> {
    let pair = state.auth.login(&form.username, &form.password).await?;
    Ok(Json(TokenResponse::from(pair)))
}

/// GET /api/auth/refresh_token — presents the refresh token as a bearer.
pub async fn refresh_token(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<TokenResponse>, AppError> {
    let token = bearer_token(&headers).ok_or(AppError::InvalidToken)?;
    let pair = state.auth.refresh_exchange(token).await?;
    Ok(Json(TokenResponse::from(pair)))
}

/// GET /api/auth/confirmed_email/{token}
pub async fn confirmed_email(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    match state.auth.confirm_email(&token).await {
        Ok(ConfirmOutcome::Confirmed) => Ok(Json(MessageResponse::new("Email confirmed"))),
        Ok(ConfirmOutcome::AlreadyConfirmed) => {
            Ok(Json(MessageResponse::new("Your email is already confirmed")))
        }
        // Valid token, unknown account: distinct from a token failure.
        Err(AppError::NotFound(_)) => Err(AppError::validation("Verification error")),
        Err(err) => Err(err),
    }
}

/// POST /api/auth/request_email — re-send the confirmation link.
pub async fn request_email(
    State(state): State<AppState>,
    Json(payload): Json<RequestEmail>,
) -> Result<Json<MessageResponse>, AppError> {
    match state
        .auth
        .resend_confirmation(&payload.email, &state.config.public_url)
        .await?
    {
        ConfirmOutcome::AlreadyConfirmed => {
            Ok(Json(MessageResponse::new("Your email is already confirmed")))
        }
        ConfirmOutcome::Confirmed => Ok(Json(MessageResponse::new(
            "Check your email for confirmation.",
        ))),
    }
}

/// POST /api/auth/reset_password — mail a reset token.
pub async fn reset_password(
    State(state): State<AppState>,
    Json(payload): Json<RequestEmail>,
) -> Result<Json<MessageResponse>, AppError> {
    state
        .auth
        .request_password_reset(&payload.email, &state.config.public_url)
        .await?;
    Ok(Json(MessageResponse::new(
        "Check your email for a password reset link.",
    )))
}

/// POST /api/auth/set_password — finish the reset with the mailed token.
pub async fn set_password(
    State(state): State<AppState>,
    Json(payload): Json<SetPasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    if payload.password.len() < 6 || payload.password.len() > 72 {
        return Err(AppError::validation(
            "Password must be between 6 and 72 characters",
        ));
    }

    match state
        .auth
        .reset_password(&payload.token, &payload.password)
        .await
    {
        Ok(()) => Ok(Json(MessageResponse::new("Password updated"))),
        Err(AppError::NotFound(_)) => Err(AppError::validation("Reset error")),
        Err(err) => Err(err),
    }
}

/// POST /api/auth/logout
pub async fn logout(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> Result<Json<MessageResponse>, AppError> {
    state.auth.logout(&current_user).await?;
    Ok(Json(MessageResponse::new("Logged out successfully")))
}
