//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, layers)
//!     → request.rs (x-request-id)
//!     → middleware/auth.rs (host-signed headers → HostSession)
//!     → middleware/locale.rs (per-request translator)
//!     → exapp / proxy::backend / proxy::frontend
//!     → error.rs (failures → status codes)
//! ```

pub mod error;
pub mod middleware;
pub mod request;
pub mod server;

pub use error::AppError;
pub use request::{MakeRequestUuidV4, X_REQUEST_ID};
pub use server::{build_router, AppState, HttpServer};
