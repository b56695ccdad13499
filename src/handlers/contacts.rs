use axum::extract::{Json, Path, Query, State};
use axum::http::StatusCode;

use crate::app::AppState;
use crate::auth::CurrentUser;
use crate::db::models::contact::{ContactChanges, NewContact};
use crate::db::store::ContactFilters;
use crate::dto::requests::{BirthdayQuery, ContactListQuery, ContactPayload, page_bounds};
use crate::dto::responses::ContactResponse;
use crate::error::AppError;

/// GET /api/contacts
pub async fn list_contacts(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(query): Query<ContactListQuery>,
) -> Result<Json<Vec<ContactResponse>>, AppError> {
    let (limit, offset) = page_bounds(query.limit, query.offset);
    let filters = ContactFilters {
        first_name: query.first_name,
        last_name: query.last_name,
        email: query.email,
    };

    let contacts = state
        .contacts
        .list(current_user.id, &filters, limit, offset)
        .await?;

    Ok(Json(contacts.into_iter().map(Into::into).collect()))
}

/// GET /api/contacts/birthday
pub async fn birthday_contacts(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(query): Query<BirthdayQuery>,
) -> Result<Json<Vec<ContactResponse>>, AppError> {
    let (limit, offset) = page_bounds(query.limit, query.offset);
    let days = query.days.unwrap_or(7).max(1);

    let contacts = state
        .contacts
        .upcoming_birthdays(current_user.id, days, limit, offset)
        .await?;

    Ok(Json(contacts.into_iter().map(Into::into).collect()))
}

/// GET /api/contacts/{id}
pub async fn get_contact(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(contact_id): Path<i32>,
) -> Result<Json<ContactResponse>, AppError> {
    let contact = state
        .contacts
        .get(current_user.id, contact_id)
        .await?
        .ok_or_else(|| AppError::not_found("Contact not found"))?;

    Ok(Json(contact.into()))
}

/// POST /api/contacts
pub async fn create_contact(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(payload): Json<ContactPayload>,
) -> Result<(StatusCode, Json<ContactResponse>), AppError> {
    payload.validate()?;

    let contact = state
        .contacts
        .create(NewContact {
            first_name: payload.first_name,
            last_name: payload.last_name,
            email: payload.email,
            phone_number: payload.phone_number,
            birthday: payload.birthday,
            add_info: payload.add_info,
            user_id: current_user.id,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(contact.into())))
}

/// PUT /api/contacts/{id}
pub async fn update_contact(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(contact_id): Path<i32>,
    Json(payload): Json<ContactPayload>,
) -> Result<Json<ContactResponse>, AppError> {
    payload.validate()?;

    let contact = state
        .contacts
        .update(
            current_user.id,
            contact_id,
            ContactChanges {
                first_name: payload.first_name,
                last_name: payload.last_name,
                email: payload.email,
                phone_number: payload.phone_number,
                birthday: payload.birthday,
                add_info: payload.add_info,
            },
        )
        .await?
        .ok_or_else(|| AppError::not_found("Contact not found"))?;

    Ok(Json(contact.into()))
}

/// DELETE /api/contacts/{id}
pub async fn delete_contact(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(contact_id): Path<i32>,
) -> Result<StatusCode, AppError> {
    let _deleted = state.contacts.delete(current_user.id, contact_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
