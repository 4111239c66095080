//! Current-user lookup and sign-up confirmation.

use axum::{
    Router,
    extract::{Path, State},
    response::IntoResponse,
    routing::get,
};
use serde_json::{Value, json};
use tracing::info;

use super::error::{ApiError, ResultExt};
use super::response::Envelope;
use crate::auth::CurrentUser;
use crate::db::{Database, User, UserState};

#[derive(Clone)]
pub struct UsersState {
    pub db: Database,
}

pub fn router(state: UsersState) -> Router {
    Router::new()
        .route("/users/current", get(current_user))
        .route("/users/confirm/{nonce}", get(confirm_user))
        .with_state(state)
}

/// Wire shape of a user. The password hash is never serialized; roles and
/// settings are static placeholders carried for client compatibility.
pub fn user_json(user: &User) -> Value {
    json!({
        "id": user.id,
        "email": user.email,
        "roles": ["ADMIN", "USER"],
        "settings": { "id": 0, "themeName": "default" },
        "createdAt": user.created_at,
    })
}

async fn current_user(
    State(state): State<UsersState>,
    CurrentUser(user_id): CurrentUser,
) -> Result<impl IntoResponse, ApiError> {
    let user = state
        .db
        .users()
        .get_by_id(user_id)
        .await
        .db_err("Failed to query user")?
        .ok_or_else(|| ApiError::not_found("User does not exist"))?;

    Ok(Envelope::ok("success").with("user", user_json(&user)))
}

async fn confirm_user(
    State(state): State<UsersState>,
    Path(nonce): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let users = state.db.users();

    let user_id = users
        .lookup_confirmation(&nonce)
        .await
        .db_err("Failed to look up confirmation")?
        .ok_or_else(|| ApiError::not_found("User confirmation not found"))?;

    users
        .set_state(user_id, UserState::Confirmed)
        .await
        .db_err("Failed to confirm user")?;
    users
        .delete_confirmation(&nonce)
        .await
        .db_err("Failed to consume confirmation")?;

    info!(user_id, "User confirmed");

    Ok(Envelope::ok("User confirmed"))
}
