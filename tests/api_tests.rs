//! CRUD endpoints through the full stack: sign-up/confirm flow, contacts,
//! card transactions.

mod common;

use axum::http::StatusCode;
use common::setup;
use serde_json::json;

#[tokio::test]
async fn test_sign_up_validation() {
    let ctx = setup().await;

    let response = ctx
        .post(
            "/auth/sign-up",
            None,
            json!({ "email": "not-an-email", "password": "hunter2!" }),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = ctx
        .post(
            "/auth/sign-up",
            None,
            json!({ "email": "alice@example.com", "password": "short" }),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_sign_up_duplicate_email() {
    let ctx = setup().await;
    ctx.sign_up("alice@example.com", "hunter2!").await;

    let response = ctx
        .post(
            "/auth/sign-up",
            None,
            json!({ "email": "alice@example.com", "password": "hunter2!" }),
        )
        .await;

    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.body["message"], json!("Email address already in use"));
}

#[tokio::test]
async fn test_sign_up_returns_user_without_password() {
    let ctx = setup().await;

    let response = ctx
        .post(
            "/auth/sign-up",
            None,
            json!({ "email": "alice@example.com", "password": "hunter2!" }),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["message"], json!("User has been created"));
    assert_eq!(response.body["user"]["email"], json!("alice@example.com"));
    assert!(response.body["user"].get("password").is_none());
    assert!(response.body["user"].get("password_hash").is_none());
    assert!(response.body["token"]["accessToken"].is_string());
}

#[tokio::test]
async fn test_confirm_unknown_nonce() {
    let ctx = setup().await;

    let response = ctx.get("/users/confirm/no-such-nonce", None).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["message"], json!("User confirmation not found"));
}

#[tokio::test]
async fn test_confirm_nonce_is_single_use() {
    let ctx = setup().await;
    let nonce = ctx.sign_up("alice@example.com", "hunter2!").await;

    let response = ctx.get(&format!("/users/confirm/{}", nonce), None).await;
    assert_eq!(response.status, StatusCode::OK);

    let response = ctx.get(&format!("/users/confirm/{}", nonce), None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_and_list_contacts() {
    let ctx = setup().await;
    let (access, _) = ctx.register_and_login("alice@example.com", "hunter2!").await;

    let response = ctx
        .post(
            "/contacts",
            Some(&access),
            json!({ "name": "Carol", "phone": "555-0100" }),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["contact"]["name"], json!("Carol"));

    let response = ctx.get("/contacts", Some(&access)).await;
    assert_eq!(response.status, StatusCode::OK);
    let data = response.body["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["phone"], json!("555-0100"));
}

#[tokio::test]
async fn test_contact_validation() {
    let ctx = setup().await;
    let (access, _) = ctx.register_and_login("alice@example.com", "hunter2!").await;

    let response = ctx
        .post("/contacts", Some(&access), json!({ "phone": "555-0100" }))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.body["message"],
        json!("Contact name should be on the payload")
    );

    let response = ctx
        .post("/contacts", Some(&access), json!({ "name": "Carol" }))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.body["message"],
        json!("Phone number should be on the payload")
    );
}

#[tokio::test]
async fn test_contacts_are_per_user() {
    let ctx = setup().await;
    let (alice, _) = ctx.register_and_login("alice@example.com", "hunter2!").await;
    let (bob, _) = ctx.register_and_login("bob@example.com", "hunter2!").await;

    ctx.post(
        "/contacts",
        Some(&alice),
        json!({ "name": "Carol", "phone": "555-0100" }),
    )
    .await;

    let response = ctx.get("/contacts", Some(&bob)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_create_and_list_card_transactions() {
    let ctx = setup().await;
    let (access, _) = ctx.register_and_login("alice@example.com", "hunter2!").await;

    let response = ctx
        .post(
            "/card-transactions",
            Some(&access),
            json!({
                "dateTime": "2020-03-01T10:15:00Z",
                "amount": { "value": 1999, "scale": 2 },
                "currencyCode": "ZAR",
                "reference": "simulation",
                "merchantName": "Sportsmans Warehouse",
                "merchantCity": "Sandton",
                "merchantCountryCode": "ZA"
            }),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let tx = &response.body["cardTransaction"];
    assert_eq!(tx["amount"]["value"], json!(1999));
    assert_eq!(tx["amount"]["scale"], json!(2));
    assert_eq!(tx["currencyCode"], json!("ZAR"));
    assert_eq!(tx["merchantName"], json!("Sportsmans Warehouse"));

    let response = ctx.get("/card-transactions", Some(&access)).await;
    assert_eq!(response.status, StatusCode::OK);
    let list = response.body["cardTransactions"].as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["reference"], json!("simulation"));
}

#[tokio::test]
async fn test_card_transaction_validation() {
    let ctx = setup().await;
    let (access, _) = ctx.register_and_login("alice@example.com", "hunter2!").await;

    let response = ctx
        .post(
            "/card-transactions",
            Some(&access),
            json!({
                "dateTime": "2020-03-01T10:15:00Z",
                "amount": { "value": 1999, "scale": 2 },
                "currencyCode": ""
            }),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}
