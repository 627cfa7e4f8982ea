//! ExApp lifecycle routes.
//!
//! Each route only claims the method the host uses; any other method on the
//! same path falls through to the frontend, like every unclaimed path.

pub mod handlers;

use axum::{
    routing::{get, post, put},
    Router,
};

use self::handlers::{enabled, heartbeat, init};
use crate::http::server::AppState;
use crate::proxy::frontend::serve_frontend;

pub fn lifecycle_routes() -> Router<AppState> {
    Router::new()
        .route("/heartbeat", get(heartbeat).fallback(serve_frontend))
        .route("/init", post(init).fallback(serve_frontend))
        .route("/enabled", put(enabled).fallback(serve_frontend))
}
