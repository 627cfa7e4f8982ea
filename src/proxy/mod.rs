//! Request proxying.
//!
//! # Data Flow
//! ```text
//! /api/{path}  → backend.rs  → http://<backend>/api/{path}?{query}
//!                               (headers minus Host/Cookie/hop-by-hop,
//!                                cookies re-emitted, body buffered)
//!              ← status + headers (minus Transfer-Encoding) + body
//!
//! /{path}      → frontend.rs → app_root/ex_app/...      (asset prefix)
//!                              client_root/index.html    (empty path)
//!                              client_root/{path}        (everything else)
//!              ← file stream + content-type + CSP, or 404
//! ```

pub mod backend;
pub mod frontend;

pub use backend::BackendProxy;
pub use frontend::FrontendResolver;

/// Failures while forwarding to the backend.
#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    #[error("request body exceeds {limit} bytes")]
    BodyTooLarge { limit: usize },
    #[error("failed to read request body: {0}")]
    RequestBody(axum::Error),
    #[error("invalid upstream URI: {0}")]
    Uri(#[from] axum::http::uri::InvalidUri),
    #[error("upstream request failed: {0}")]
    Upstream(#[from] hyper_util::client::legacy::Error),
    #[error("failed to read upstream body: {0}")]
    UpstreamBody(axum::Error),
}

/// Failures while serving a static file.
#[derive(Debug, thiserror::Error)]
pub enum StaticError {
    #[error("file not found")]
    NotFound,
    #[error("failed to read file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to build response: {0}")]
    Response(#[from] axum::http::Error),
}
