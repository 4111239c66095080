//! Token issuance and refresh through the HTTP endpoints.

mod common;

use axum::http::StatusCode;
use cardledger::jwt::unix_now;
use common::setup;
use serde_json::json;

#[tokio::test]
async fn test_login_returns_token_pair() {
    let ctx = setup().await;
    let nonce = ctx.sign_up("alice@example.com", "hunter2!").await;
    ctx.get(&format!("/users/confirm/{}", nonce), None).await;

    let response = ctx
        .post(
            "/auth/login",
            None,
            json!({ "email": "alice@example.com", "password": "hunter2!" }),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["message"], json!("Logged In"));

    let token = &response.body["token"];
    assert!(token["accessToken"].as_str().unwrap().contains('.'));
    assert!(token["refreshToken"].as_str().unwrap().contains('.'));
    assert!(token["expiresIn"].as_u64().unwrap() > unix_now().unwrap());
}

#[tokio::test]
async fn test_login_wrong_password() {
    let ctx = setup().await;
    let nonce = ctx.sign_up("alice@example.com", "hunter2!").await;
    ctx.get(&format!("/users/confirm/{}", nonce), None).await;

    let response = ctx
        .post(
            "/auth/login",
            None,
            json!({ "email": "alice@example.com", "password": "wrong-password" }),
        )
        .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.body["status"], json!(false));
}

#[tokio::test]
async fn test_login_unknown_email() {
    let ctx = setup().await;

    let response = ctx
        .post(
            "/auth/login",
            None,
            json!({ "email": "nobody@example.com", "password": "whatever1" }),
        )
        .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_login_unconfirmed_user_rejected() {
    let ctx = setup().await;
    // Signed up but never confirmed
    ctx.sign_up("alice@example.com", "hunter2!").await;

    let response = ctx
        .post(
            "/auth/login",
            None,
            json!({ "email": "alice@example.com", "password": "hunter2!" }),
        )
        .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.body["message"], json!("Account has not been confirmed"));
}

#[tokio::test]
async fn test_refresh_yields_working_pair() {
    let ctx = setup().await;
    let (_, refresh) = ctx.register_and_login("alice@example.com", "hunter2!").await;

    let response = ctx
        .post(
            "/auth/refresh",
            None,
            json!({ "grantType": "refresh_token", "refreshToken": refresh }),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["message"], json!("Tokens refreshed"));
    assert!(response.body["token"]["expiresIn"].as_u64().unwrap() > unix_now().unwrap());

    // The fresh access token independently authenticates the same subject
    let access = response.body["token"]["accessToken"].as_str().unwrap();
    let me = ctx.get("/users/current", Some(access)).await;
    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.body["user"]["email"], json!("alice@example.com"));
}

#[tokio::test]
async fn test_refresh_wrong_grant_type() {
    let ctx = setup().await;
    let (_, refresh) = ctx.register_and_login("alice@example.com", "hunter2!").await;

    let response = ctx
        .post(
            "/auth/refresh",
            None,
            json!({ "grantType": "password", "refreshToken": refresh }),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["message"], json!("grant type not refresh_token"));
}

#[tokio::test]
async fn test_refresh_with_garbage_token() {
    let ctx = setup().await;

    let response = ctx
        .post(
            "/auth/refresh",
            None,
            json!({ "grantType": "refresh_token", "refreshToken": "junk.token.value" }),
        )
        .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.body["message"], json!("Token rejected"));
}
