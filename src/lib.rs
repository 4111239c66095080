pub mod api;
pub mod auth;
pub mod cli;
pub mod db;
pub mod jwt;
pub mod routes;
pub mod tokens;

use axum::{Router, middleware};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

use auth::{AuthState, jwt_authentication};
use db::Database;
use jwt::JwtConfig;
use routes::RouteRegistry;
use tokens::TokenService;

pub struct ServerConfig {
    /// Database connection (cloneable, uses connection pool internally)
    pub db: Database,
    /// Shared secret for signing tokens
    pub token_secret: Vec<u8>,
}

/// Create the application router with the given configuration.
///
/// Panics if the route table is malformed; that is a startup failure and the
/// process must not serve traffic past it.
pub fn create_app(config: &ServerConfig) -> Router {
    let jwt = JwtConfig::new(&config.token_secret);
    let tokens = Arc::new(TokenService::new(jwt));

    let registry =
        Arc::new(RouteRegistry::build(api::route_table()).expect("Route table is malformed"));

    let auth_state = AuthState {
        registry,
        tokens: tokens.clone(),
    };

    api::create_api_router(config.db.clone(), tokens).layer(middleware::from_fn_with_state(
        auth_state,
        jwt_authentication,
    ))
}

/// Run the server on the given listener. This function blocks until the server exits.
pub async fn run_server(config: ServerConfig, listener: TcpListener) -> Result<(), std::io::Error> {
    let app = create_app(&config);
    axum::serve(listener, app).await
}

/// Start the server on the given port in a background task. Use port 0 to let the OS choose a random port.
/// Returns the actual address the server is listening on.
/// Note: For production use, prefer `run_server` directly in main.
pub async fn start_server(
    config: ServerConfig,
    port: u16,
) -> (tokio::task::JoinHandle<()>, SocketAddr) {
    let addr = format!("127.0.0.1:{}", port);
    let listener = TcpListener::bind(&addr).await.expect("Failed to bind");
    let local_addr = listener.local_addr().expect("Failed to get local address");

    let handle = tokio::spawn(async move {
        run_server(config, listener).await.ok();
    });

    (handle, local_addr)
}
