//! Handler errors and their HTTP mapping.
//!
//! No handler recovers locally; each failure maps to a bare status with the
//! framework's plain-text body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::host::HostError;
use crate::proxy::{ProxyError, StaticError};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Host(#[from] HostError),
    #[error(transparent)]
    Proxy(#[from] ProxyError),
    #[error(transparent)]
    Static(#[from] StaticError),
    #[error("invalid query: {0}")]
    InvalidQuery(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Host(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Proxy(ProxyError::BodyTooLarge { .. } | ProxyError::RequestBody(_)) => {
                StatusCode::PAYLOAD_TOO_LARGE
            }
            AppError::Proxy(_) => StatusCode::BAD_GATEWAY,
            AppError::Static(StaticError::NotFound) => StatusCode::NOT_FOUND,
            AppError::Static(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::InvalidQuery(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            AppError::Static(StaticError::NotFound) => return status.into_response(),
            AppError::Proxy(ProxyError::Upstream(_) | ProxyError::UpstreamBody(_)) => {
                tracing::error!(error = %self, "Upstream error");
                return (status, "Upstream request failed").into_response();
            }
            _ if status.is_server_error() => tracing::error!(error = %self, "Request failed"),
            _ => tracing::debug!(error = %self, "Request rejected"),
        }
        let reason = status.canonical_reason().unwrap_or("Error");
        (status, reason).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_has_empty_body_status() {
        let response = AppError::Static(StaticError::NotFound).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn host_failure_is_server_error() {
        let err = AppError::Host(HostError::Status {
            status: 503,
            body: String::new(),
        });
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn oversized_body_is_413() {
        let err = AppError::Proxy(ProxyError::BodyTooLarge { limit: 1 });
        assert_eq!(err.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
