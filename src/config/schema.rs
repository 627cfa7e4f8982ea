//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the shim.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the ExApp shim.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Application identity as registered with the host.
    pub app: AppIdentityConfig,

    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Local backend that serves `/api/*`.
    pub backend: BackendConfig,

    /// Static frontend file tree.
    pub frontend: FrontendConfig,

    /// Host (Nextcloud AppAPI) connection settings.
    pub host: HostConfig,

    /// Inbound request authentication.
    pub auth: AuthConfig,

    /// Translation catalogs.
    pub localization: LocalizationConfig,

    /// Persistent storage for downloaded artifacts.
    pub storage: StorageConfig,

    /// Model artifacts fetched on `/init`.
    pub models: Vec<ModelConfig>,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Request size limits.
    pub limits: LimitsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Identity of the ExApp.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AppIdentityConfig {
    /// Application id; keys the host registration and the locale catalog.
    pub id: String,

    /// Human readable name shown in the host's top menu.
    pub display_name: String,

    /// Application version, checked against `EX-APP-VERSION`.
    pub version: String,

    /// Shared secret issued by the host at deploy time.
    pub secret: String,
}

impl Default for AppIdentityConfig {
    fn default() -> Self {
        Self {
            id: "visionatrix".to_string(),
            display_name: "Visionatrix".to_string(),
            version: "1.0.0".to_string(),
            secret: String::new(),
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "127.0.0.1:9030").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:9030".to_string(),
        }
    }
}

/// Backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Loopback address of the backend (e.g., "127.0.0.1:8288").
    pub address: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1:8288".to_string(),
        }
    }
}

/// Static frontend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FrontendConfig {
    /// Installation directory of the ExApp itself.
    pub app_root: String,

    /// Paths starting with this prefix resolve under `app_root`.
    pub asset_prefix: String,

    /// Directory holding the embedded client build.
    pub client_root: String,

    /// Entry point served for the empty path.
    pub index_file: String,
}

impl Default for FrontendConfig {
    fn default() -> Self {
        Self {
            app_root: "../..".to_string(),
            asset_prefix: "ex_app".to_string(),
            client_root: "../../Visionatrix/visionatrix/client".to_string(),
            index_file: "index.html".to_string(),
        }
    }
}

/// Host connection configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HostConfig {
    /// Base URL of the Nextcloud instance.
    pub nextcloud_url: String,

    /// AppAPI version advertised in outbound calls.
    pub aa_version: String,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            nextcloud_url: "http://localhost:8080".to_string(),
            aa_version: "2.0.0".to_string(),
        }
    }
}

/// Inbound authentication configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Enforce host-signed headers.
    pub enabled: bool,

    /// Paths (without leading slash) that skip the check. `heartbeat` is always exempt.
    pub exempt_paths: Vec<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            exempt_paths: Vec::new(),
        }
    }
}

/// Localization configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LocalizationConfig {
    /// Directory containing `<lang>/<app id>.ftl` catalogs.
    pub locale_dir: String,

    /// Language of the default translator.
    pub default_language: String,

    /// Pick a translator per request from `Accept-Language`.
    pub per_request: bool,
}

impl Default for LocalizationConfig {
    fn default() -> Self {
        Self {
            locale_dir: "locale".to_string(),
            default_language: "en".to_string(),
            per_request: false,
        }
    }
}

/// Persistent storage configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory where fetched models are written.
    pub persistent_dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            persistent_dir: "data".to_string(),
        }
    }
}

/// A model artifact to download during init.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ModelConfig {
    /// Download URL.
    pub url: String,

    /// Target file name; defaults to the last URL segment.
    #[serde(default)]
    pub file_name: Option<String>,
}

/// Timeout configuration for various operations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,

    /// Outbound connect timeout in seconds.
    pub connect_secs: u64,

    /// How long shutdown waits for background tasks, in seconds.
    pub shutdown_grace_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request_secs: 300,
            connect_secs: 5,
            shutdown_grace_secs: 10,
        }
    }
}

/// Request size limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum proxied request body in bytes.
    pub max_body_size: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_body_size: 64 * 1024 * 1024,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit JSON log lines instead of the pretty format.
    pub json: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json: false,
        }
    }
}
