//! Session middleware.
//!
//! Authentication lives outside this service: an upstream credential proxy
//! verifies the user and injects identity headers. This middleware only turns
//! those headers into one explicit `SessionContext` per request; requests
//! without identity get an anonymous read-only session.

use axum::extract::Request;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;
use ptd_common::session::{Role, SessionContext};

/// Verified user display name, injected upstream.
pub const HEADER_USER: &str = "x-ptd-user";
/// Verified role (`coordinator` or `viewer`), injected upstream.
pub const HEADER_ROLE: &str = "x-ptd-role";

/// Attach a [`SessionContext`] to every request.
pub async fn session_middleware(mut request: Request, next: Next) -> Response {
    let session = session_from_headers(request.headers());
    request.extensions_mut().insert(session);
    next.run(request).await
}

fn session_from_headers(headers: &HeaderMap) -> SessionContext {
    let usuario = headers
        .get(HEADER_USER)
        .and_then(|v| v.to_str().ok())
        .filter(|s| !s.is_empty());

    let Some(usuario) = usuario else {
        return SessionContext::anonymous();
    };

    // An unknown role string downgrades to viewer rather than erroring.
    let role = headers
        .get(HEADER_ROLE)
        .and_then(|v| v.to_str().ok())
        .and_then(Role::from_wire)
        .unwrap_or(Role::Viewer);

    SessionContext::new(usuario, role)
}
