use axum::extract::{Json, State};

use crate::app::AppState;
use crate::auth::CurrentUser;
use crate::dto::requests::ChangePasswordRequest;
use crate::dto::responses::{MessageResponse, UserResponse};
use crate::error::AppError;

/// GET /api/users/me
pub async fn me(current_user: CurrentUser) -> Json<UserResponse> {
    Json(UserResponse::from(&current_user))
}

/// POST /api/users/change_password
///
/// Outstanding access tokens keep working until they expire; only the
/// stored hash changes.
pub async fn change_password(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(payload): Json<ChangePasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    if payload.new_password.len() < 6 || payload.new_password.len() > 72 {
        return Err(AppError::validation(
            "Password must be between 6 and 72 characters",
        ));
    }

    state
        .auth
        .change_password(&current_user, &payload.old_password, &payload.new_password)
        .await?;

    Ok(Json(MessageResponse::new("Password changed successfully")))
}
