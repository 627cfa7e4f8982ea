//! ExApp shim library.
//!
//! Lets a Nextcloud AppAPI host run an external application: answers the
//! host's lifecycle calls, registers the app's UI, proxies `/api/*` to a
//! local backend and serves the embedded frontend for everything else.

// Core subsystems
pub mod config;
pub mod exapp;
pub mod http;
pub mod proxy;

// Host integration
pub mod host;
pub mod i18n;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;
pub mod security;

pub use config::AppConfig;
pub use host::HostSdk;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
