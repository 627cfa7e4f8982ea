//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events (structured fields: request_id, path, method, ...)
//!     → logging.rs subscriber (pretty or JSON on stdout)
//!
//! Per request:
//!     → tower_http TraceLayer span
//!     → x-request-id set by http::request and forwarded to the backend
//! ```

pub mod logging;

pub use logging::init_logging;
