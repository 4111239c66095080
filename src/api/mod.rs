mod auth;
mod card_transactions;
mod contacts;
mod error;
pub mod response;
mod status;
mod users;

use axum::Router;
use axum::http::Method;
use std::sync::Arc;

use crate::db::Database;
use crate::routes::RouteEntry;
use crate::tokens::TokenService;

pub use users::UsersState;

/// The declarative route table the classifier is built from.
///
/// Must stay in sync with the routers assembled in [`create_api_router`]:
/// every route registered there appears here with its auth requirement.
pub fn route_table() -> Vec<RouteEntry> {
    vec![
        RouteEntry::new("/", &[Method::GET], true),
        RouteEntry::new("/status", &[Method::GET], true),
        RouteEntry::new("/auth/login", &[Method::POST], true),
        RouteEntry::new("/auth/refresh", &[Method::POST], true),
        RouteEntry::new("/auth/sign-up", &[Method::POST], true),
        RouteEntry::new("/users/confirm/{nonce}", &[Method::GET], true),
        RouteEntry::new("/users/current", &[Method::GET], false),
        RouteEntry::new("/contacts", &[Method::GET, Method::POST], false),
        RouteEntry::new("/card-transactions", &[Method::GET, Method::POST], false),
    ]
}

/// Create the API router.
pub fn create_api_router(db: Database, tokens: Arc<TokenService>) -> Router {
    let auth_state = auth::AuthApiState {
        db: db.clone(),
        tokens,
    };

    let users_state = users::UsersState { db: db.clone() };

    let contacts_state = contacts::ContactsState { db: db.clone() };

    let card_transactions_state = card_transactions::CardTransactionsState { db };

    Router::new()
        .merge(status::router())
        .merge(auth::router(auth_state))
        .merge(users::router(users_state))
        .merge(contacts::router(contacts_state))
        .merge(card_transactions::router(card_transactions_state))
}
