#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Method, Request, StatusCode, header};
use cardledger::db::Database;
use cardledger::{ServerConfig, create_app};
use serde_json::{Value, json};
use tower::ServiceExt;

/// Secret used by every test app. Long enough to pass startup validation.
pub const TEST_SECRET: &[u8] = b"integration-test-secret-0123456789abcdef";

pub struct TestApp {
    pub app: Router,
    pub db: Database,
}

pub async fn setup() -> TestApp {
    let db = Database::open(":memory:").await.expect("Failed to open database");
    let config = ServerConfig {
        db: db.clone(),
        token_secret: TEST_SECRET.to_vec(),
    };
    TestApp {
        app: create_app(&config),
        db,
    }
}

/// Response pieces the assertions care about.
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestApp {
    /// Send a request through the router and collect the response.
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        bearer: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(token) = bearer {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = match body {
            Some(value) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(value.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("Failed to build request");

        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("Request failed");

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body");
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, path: &str, bearer: Option<&str>) -> TestResponse {
        self.send(Method::GET, path, bearer, None).await
    }

    pub async fn post(&self, path: &str, bearer: Option<&str>, body: Value) -> TestResponse {
        self.send(Method::POST, path, bearer, Some(body)).await
    }

    /// Sign up a user and return their confirmation nonce.
    pub async fn sign_up(&self, email: &str, password: &str) -> String {
        let response = self
            .post(
                "/auth/sign-up",
                None,
                json!({ "email": email, "password": password }),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "sign-up failed: {}", response.body);

        let user_id = response.body["user"]["id"]
            .as_i64()
            .expect("sign-up response has no user id");

        let (nonce,): (String,) =
            sqlx::query_as("SELECT nonce FROM signup_confirmations WHERE user_id = ?")
                .bind(user_id)
                .fetch_one(self.db.pool())
                .await
                .expect("No confirmation nonce stored");
        nonce
    }

    /// Sign up, confirm and log in; returns (access_token, refresh_token).
    pub async fn register_and_login(&self, email: &str, password: &str) -> (String, String) {
        let nonce = self.sign_up(email, password).await;

        let response = self.get(&format!("/users/confirm/{}", nonce), None).await;
        assert_eq!(response.status, StatusCode::OK);

        let response = self
            .post(
                "/auth/login",
                None,
                json!({ "email": email, "password": password }),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "login failed: {}", response.body);

        let access = response.body["token"]["accessToken"]
            .as_str()
            .expect("login response has no access token")
            .to_string();
        let refresh = response.body["token"]["refreshToken"]
            .as_str()
            .expect("login response has no refresh token")
            .to_string();
        (access, refresh)
    }
}

/// Assert the baseline security headers the middleware applies to every
/// response.
pub fn assert_security_headers(headers: &HeaderMap) {
    assert_eq!(headers.get("access-control-allow-origin").unwrap(), "*");
    assert_eq!(headers.get("x-frame-options").unwrap(), "SAMEORIGIN");
    assert_eq!(headers.get("x-xss-protection").unwrap(), "1; mode=block");
    assert_eq!(headers.get("x-content-type-options").unwrap(), "nosniff");
}
