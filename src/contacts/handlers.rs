use axum::{
    extract::State,
    http::StatusCode,
    Json,
};

use crate::auth::AuthenticatedUser;
use crate::contacts::models::{
    Contact, ContactQuery, CreateContactRequest, UpdateContactStatusRequest,
};
use crate::error::ApiError;
use crate::models::MessageResponse;
use crate::validation::{ApiPath, ApiQuery, ValidatedJson};
use crate::AppState;

/// Submit a contact message; no token required
#[utoipa::path(
    post,
    path = "/contact",
    request_body = CreateContactRequest,
    responses(
        (status = 201, description = "Message stored", body = MessageResponse),
        (status = 400, description = "Invalid request")
    ),
    tag = "contacts"
)]
pub async fn submit_contact(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateContactRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let contact = state.contacts.create(&request).await?;
    tracing::info!("Contact message received - id={}", contact.id);

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Contact message sent successfully")),
    ))
}

#[utoipa::path(
    get,
    path = "/api/contacts",
    params(ContactQuery),
    responses((status = 200, description = "Contact messages, newest first", body = [Contact])),
    security(("bearer" = [])),
    tag = "contacts"
)]
pub async fn list_contacts(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    ApiQuery(query): ApiQuery<ContactQuery>,
) -> Result<Json<Vec<Contact>>, ApiError> {
    let contacts = state.contacts.list(query.status).await?;
    Ok(Json(contacts))
}

/// Move a message between new, read and replied
#[utoipa::path(
    put,
    path = "/api/contacts/{id}",
    params(("id" = i32, Path, description = "Contact ID")),
    request_body = UpdateContactStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = Contact),
        (status = 404, description = "Contact not found")
    ),
    security(("bearer" = [])),
    tag = "contacts"
)]
pub async fn update_contact_status(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ApiPath(id): ApiPath<i32>,
    ValidatedJson(request): ValidatedJson<UpdateContactStatusRequest>,
) -> Result<Json<Contact>, ApiError> {
    let contact = state
        .contacts
        .update_status(id, request.status)
        .await?
        .ok_or(ApiError::not_found("Contact"))?;

    tracing::info!(
        "Contact id={} marked {:?} by user_id={}",
        id,
        contact.status,
        user.user_id
    );
    Ok(Json(contact))
}
