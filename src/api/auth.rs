//! Login, refresh and sign-up endpoints.

use argon2::password_hash::{SaltString, rand_core::OsRng};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use axum::{Json, Router, extract::State, response::IntoResponse, routing::post};
use rand::distr::{Alphanumeric, SampleString};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::info;

use super::error::{ApiError, ResultExt};
use super::response::Envelope;
use super::users::user_json;
use crate::db::Database;
use crate::tokens::TokenService;

/// Length of the sign-up confirmation nonce.
const CONFIRMATION_NONCE_LEN: usize = 32;

#[derive(Clone)]
pub struct AuthApiState {
    pub db: Database,
    pub tokens: Arc<TokenService>,
}

pub fn router(state: AuthApiState) -> Router {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
        .route("/auth/sign-up", post(sign_up))
        .with_state(state)
}

#[derive(Deserialize)]
struct LoginRequest {
    email: String,
    password: String,
}

async fn login(
    State(state): State<AuthApiState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state
        .db
        .users()
        .get_by_email(&payload.email)
        .await
        .db_err("Failed to query user")?
        .ok_or_else(|| ApiError::forbidden("Invalid login credentials. Please try again"))?;

    if user.state != crate::db::UserState::Confirmed {
        return Err(ApiError::forbidden("Account has not been confirmed"));
    }

    if !verify_password(&payload.password, &user.password_hash) {
        return Err(ApiError::forbidden("Invalid login credentials. Please try again"));
    }

    let pair = state
        .tokens
        .issue_pair(user.id)
        .map_err(|e| ApiError::internal(format!("Token creation failed: {}", e)))?;

    info!(user_id = user.id, "User logged in");

    Ok(Envelope::ok("Logged In").with("token", json!(pair)))
}

#[derive(Deserialize)]
struct RefreshRequest {
    #[serde(rename = "grantType")]
    grant_type: String,
    #[serde(rename = "refreshToken")]
    refresh_token: String,
}

async fn refresh(
    State(state): State<AuthApiState>,
    Json(payload): Json<RefreshRequest>,
) -> Result<impl IntoResponse, ApiError> {
    // Checked before the token service is even consulted
    if payload.grant_type != "refresh_token" {
        return Err(ApiError::bad_request("grant type not refresh_token"));
    }

    let pair = state
        .tokens
        .refresh_pair(&payload.refresh_token)
        .map_err(|_| ApiError::forbidden("Token rejected"))?;

    Ok(Envelope::ok("Tokens refreshed").with("token", json!(pair)))
}

#[derive(Deserialize)]
struct SignUpRequest {
    email: String,
    password: String,
}

async fn sign_up(
    State(state): State<AuthApiState>,
    Json(payload): Json<SignUpRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if !payload.email.contains('@') {
        return Err(ApiError::bad_request("Email address is required"));
    }

    if payload.password.len() < 6 {
        return Err(ApiError::bad_request("Password of at least 6 characters is required"));
    }

    let users = state.db.users();

    if users
        .get_by_email(&payload.email)
        .await
        .db_err("Failed to check email availability")?
        .is_some()
    {
        return Err(ApiError::conflict("Email address already in use"));
    }

    let password_hash = hash_password(&payload.password)?;
    let user_id = users
        .create(&payload.email, &password_hash)
        .await
        .db_err("Failed to create user")?;

    let nonce = Alphanumeric.sample_string(&mut rand::rng(), CONFIRMATION_NONCE_LEN);
    users
        .create_confirmation(&nonce, user_id)
        .await
        .db_err("Failed to store confirmation")?;

    // Stands in for the confirmation mail delivery
    info!(user_id, nonce = %nonce, "Sign-up confirmation created");

    let user = users
        .get_by_id(user_id)
        .await
        .db_err("Failed to load created user")?
        .ok_or_else(|| ApiError::internal("User vanished after creation"))?;

    let pair = state
        .tokens
        .issue_pair(user_id)
        .map_err(|e| ApiError::internal(format!("Token creation failed: {}", e)))?;

    Ok(Envelope::ok("User has been created")
        .with("user", user_json(&user))
        .with("token", json!(pair)))
}

fn hash_password(password: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to hash password");
            ApiError::internal("Failed to process credentials")
        })
}

fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}
