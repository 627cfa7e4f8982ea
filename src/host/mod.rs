//! Host (Nextcloud AppAPI) integration.
//!
//! # Data Flow
//! ```text
//! lifecycle handlers
//!     → HostSdk trait (UI registration, init status)
//!     → client.rs (NextcloudClient, signed OCS calls over reqwest)
//!     → host instance
//!
//! POST /init
//!     → models.rs (download artifacts, report progress via HostSdk)
//! ```

pub mod client;
pub mod credentials;
pub mod models;

use async_trait::async_trait;

pub use client::NextcloudClient;
pub use credentials::{AppCredentials, HostSession};
pub use models::ModelFetcher;

/// Error raised by calls into the host or by the init task.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error("host request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("host returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("invalid host URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("invalid credential header: {0}")]
    Header(#[from] axum::http::header::InvalidHeaderValue),
    #[error("model storage error: {0}")]
    Io(#[from] std::io::Error),
    #[error("cannot derive a file name for model {0}")]
    ModelName(String),
}

/// Calls the ExApp makes back into its host.
#[async_trait]
pub trait HostSdk: Send + Sync {
    /// Attach a script to a UI slot (e.g. `top_menu`).
    async fn set_script(&self, ui_type: &str, name: &str, path: &str) -> Result<(), HostError>;

    async fn delete_script(&self, ui_type: &str, name: &str, path: &str) -> Result<(), HostError>;

    /// Add an entry to the host's top navigation menu.
    async fn register_top_menu(
        &self,
        name: &str,
        display_name: &str,
        icon: &str,
    ) -> Result<(), HostError>;

    async fn unregister_top_menu(&self, name: &str) -> Result<(), HostError>;

    /// Report init progress (0..=100). A non-empty `error` marks init as failed.
    async fn set_init_status(&self, progress: u8, error: &str) -> Result<(), HostError>;
}
