//! Liveness and index endpoints.

use axum::{Router, response::IntoResponse, routing::get};

use super::response::Envelope;

pub fn router() -> Router {
    Router::new()
        .route("/", get(index))
        .route("/status", get(status))
}

async fn status() -> impl IntoResponse {
    Envelope::ok("Service is up")
}

async fn index() -> impl IntoResponse {
    Envelope::ok("cardledger")
}
