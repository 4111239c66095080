//! JWT authentication middleware.
//!
//! Every response, including rejections and preflight passthroughs, carries
//! the baseline security headers. Protected routes require a
//! `Authorization: Bearer <token>` header; on success the verified subject
//! id is attached to the request as a typed [`CurrentUser`] extension.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderValue, Method, StatusCode, header, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use crate::api::response::Envelope;
use crate::routes::{Access, RouteRegistry};
use crate::tokens::TokenService;

/// Verified subject id for the in-flight request. Inserted by the middleware
/// on the protected path, retrievable by handlers as an extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentUser(pub i64);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .copied()
            .ok_or_else(|| reject(StatusCode::FORBIDDEN, "Missing auth token"))
    }
}

/// Shared state for the authentication layer.
#[derive(Clone)]
pub struct AuthState {
    pub registry: Arc<RouteRegistry>,
    pub tokens: Arc<TokenService>,
}

/// The authentication gate, layered over the whole router.
///
/// Terminal states per request: forwarded to the inner handler, or rejected
/// with a 403 envelope. Security headers are applied in both cases.
pub async fn jwt_authentication(
    State(state): State<AuthState>,
    mut req: Request,
    next: Next,
) -> Response {
    let echo_cors_headers = req
        .headers()
        .contains_key(header::ACCESS_CONTROL_REQUEST_HEADERS);

    let mut response = match gate(&state, &mut req) {
        Ok(()) => next.run(req).await,
        Err(rejection) => rejection,
    };

    apply_security_headers(response.headers_mut(), echo_cors_headers);
    response
}

/// Decide whether the request may proceed. `Ok(())` means forward; `Err` is
/// the finished rejection response.
fn gate(state: &AuthState, req: &mut Request) -> Result<(), Response> {
    // CORS preflight passes through without auth checks
    if req.method() == Method::OPTIONS {
        return Ok(());
    }

    if state.registry.classify(req.uri().path()) == Access::Public {
        return Ok(());
    }

    let token = bearer_token(req)?;

    let user_id = state.tokens.verify_access(&token).map_err(|e| {
        tracing::debug!(error = %e, "Token verification failed");
        reject(StatusCode::FORBIDDEN, &format!("Token rejected, {}", e))
    })?;

    tracing::debug!(user_id, "Authenticated request");
    req.extensions_mut().insert(CurrentUser(user_id));
    Ok(())
}

/// Extract the token from an `Authorization: Bearer <token>` header.
fn bearer_token(req: &Request) -> Result<String, Response> {
    let header_value = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| reject(StatusCode::FORBIDDEN, "Missing auth token"))?;

    // The scheme must be exactly two space-separated segments
    let mut parts = header_value.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(scheme), Some(token), None) if scheme == "Bearer" && !token.is_empty() => {
            Ok(token.to_string())
        }
        _ => Err(reject(
            StatusCode::FORBIDDEN,
            "Invalid/Malformed auth token",
        )),
    }
}

fn reject(status: StatusCode, message: &str) -> Response {
    (status, Envelope::fail(message)).into_response()
}

/// Baseline security headers, set unconditionally on every response.
fn apply_security_headers(headers: &mut axum::http::HeaderMap, echo_cors_headers: bool) {
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        header::X_FRAME_OPTIONS,
        HeaderValue::from_static("SAMEORIGIN"),
    );
    headers.insert(
        header::X_XSS_PROTECTION,
        HeaderValue::from_static("1; mode=block"),
    );
    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    if echo_cors_headers {
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("Content-Type, Authorization"),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn request(method: Method, auth: Option<&str>) -> Request {
        let mut builder = Request::builder().method(method).uri("/users/current");
        if let Some(value) = auth {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[test]
    fn test_bearer_token_well_formed() {
        let req = request(Method::GET, Some("Bearer abc.def.ghi"));
        assert_eq!(bearer_token(&req).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn test_bearer_token_missing_header() {
        let req = request(Method::GET, None);
        let rejection = bearer_token(&req).unwrap_err();
        assert_eq!(rejection.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_bearer_token_single_segment() {
        let req = request(Method::GET, Some("garbagewithonetoken"));
        let rejection = bearer_token(&req).unwrap_err();
        assert_eq!(rejection.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_bearer_token_three_segments() {
        let req = request(Method::GET, Some("Bearer abc def"));
        assert!(bearer_token(&req).is_err());
    }

    #[test]
    fn test_bearer_token_wrong_scheme() {
        let req = request(Method::GET, Some("Basic abc"));
        assert!(bearer_token(&req).is_err());
    }
}
