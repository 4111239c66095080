//! Contacts owned by the authenticated user.

use axum::{
    Json, Router,
    extract::State,
    response::IntoResponse,
    routing::get,
};
use serde::Deserialize;
use serde_json::json;

use super::error::{ApiError, ResultExt};
use super::response::Envelope;
use crate::auth::CurrentUser;
use crate::db::Database;

#[derive(Clone)]
pub struct ContactsState {
    pub db: Database,
}

pub fn router(state: ContactsState) -> Router {
    Router::new()
        .route("/contacts", get(list_contacts).post(create_contact))
        .with_state(state)
}

#[derive(Deserialize)]
struct CreateContactRequest {
    #[serde(default)]
    name: String,
    #[serde(default)]
    phone: String,
}

async fn create_contact(
    State(state): State<ContactsState>,
    CurrentUser(user_id): CurrentUser,
    Json(payload): Json<CreateContactRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if payload.name.is_empty() {
        return Err(ApiError::bad_request("Contact name should be on the payload"));
    }

    if payload.phone.is_empty() {
        return Err(ApiError::bad_request("Phone number should be on the payload"));
    }

    let contacts = state.db.contacts();
    let id = contacts
        .create(user_id, &payload.name, &payload.phone)
        .await
        .db_err("Failed to create contact")?;

    let contact = contacts
        .get_by_id(id)
        .await
        .db_err("Failed to load created contact")?
        .ok_or_else(|| ApiError::internal("Contact vanished after creation"))?;

    Ok(Envelope::ok("success").with("contact", json!(contact)))
}

async fn list_contacts(
    State(state): State<ContactsState>,
    CurrentUser(user_id): CurrentUser,
) -> Result<impl IntoResponse, ApiError> {
    let contacts = state
        .db
        .contacts()
        .list_by_user(user_id)
        .await
        .db_err("Could not get user's contacts")?;

    Ok(Envelope::ok("success").with("data", json!(contacts)))
}
