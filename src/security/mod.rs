//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → http::middleware::auth (host-signed headers, see host::credentials)
//!     → headers.rs (sanitize headers forwarded to the backend)
//!     → paths.rs (normalize paths before static lookups)
//! ```
//!
//! # Design Decisions
//! - Reject on any auth mismatch; no partial trust
//! - Path traversal is refused as "not found", never resolved

pub mod headers;
pub mod paths;
