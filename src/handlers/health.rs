use axum::Json;
use diesel::RunQueryDsl;
use diesel::sql_query;

use crate::db::connection::get_connection;
use crate::dto::responses::MessageResponse;
use crate::error::AppError;

/// GET /
pub async fn index() -> Json<MessageResponse> {
    Json(MessageResponse::new("Contacts Application"))
}

/// GET /api/healthchecker — proves the database answers a trivial query.
pub async fn healthchecker() -> Result<Json<MessageResponse>, AppError> {
    let mut conn = get_connection().map_err(|e| AppError::Database(e.to_string()))?;

    sql_query("SELECT 1")
        .execute(&mut conn)
        .map_err(|e| AppError::Database(e.to_string()))?;

    Ok(Json(MessageResponse::new("Welcome to Contacts App!")))
}
