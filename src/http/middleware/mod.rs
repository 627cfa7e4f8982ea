//! Request middleware applied in front of every route.

pub mod auth;
pub mod locale;

pub use auth::host_auth_middleware;
pub use locale::{locale_middleware, RequestTranslator};
