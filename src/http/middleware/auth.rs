//! Host authentication gate.
//! Only requests signed by the host reach the handlers.

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::config::schema::AuthConfig;
use crate::http::request::request_id;
use crate::http::server::AppState;

/// Paths reachable without host headers regardless of configuration.
const ALWAYS_EXEMPT: &[&str] = &["heartbeat"];

pub fn is_exempt(config: &AuthConfig, path: &str) -> bool {
    let path = path.trim_start_matches('/');
    ALWAYS_EXEMPT.contains(&path)
        || config
            .exempt_paths
            .iter()
            .any(|p| p.trim_start_matches('/') == path)
}

/// Verify host headers and attach the resulting `HostSession`.
pub async fn host_auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    if !state.config.auth.enabled || is_exempt(&state.config.auth, request.uri().path()) {
        return next.run(request).await;
    }

    match state.credentials.verify(request.headers()) {
        Ok(session) => {
            tracing::trace!(user = %session.user_id, "Host session verified");
            request.extensions_mut().insert(session);
            next.run(request).await
        }
        Err(reason) => {
            tracing::warn!(
                request_id = %request_id(request.headers()),
                path = %request.uri().path(),
                reason = %reason,
                "Rejected unauthenticated request"
            );
            StatusCode::UNAUTHORIZED.into_response()
        }
    }
}
