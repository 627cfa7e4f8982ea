//! Nextcloud AppAPI client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method};
use serde_json::{json, Value};

use crate::config::AppConfig;
use crate::host::credentials::AppCredentials;
use crate::host::{HostError, HostSdk};

const APP_API_PREFIX: &str = "ocs/v1.php/apps/app_api";

/// `HostSdk` implementation talking to the host's OCS endpoints.
pub struct NextcloudClient {
    client: Client,
    base_url: String,
    credentials: AppCredentials,
}

impl NextcloudClient {
    pub fn new(config: &AppConfig) -> Result<Self, HostError> {
        // Validate early; requests are built from the string form.
        url::Url::parse(&config.host.nextcloud_url)?;

        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.host.nextcloud_url.trim_end_matches('/').to_string(),
            credentials: AppCredentials::from_config(config),
        })
    }

    /// Full URL of an AppAPI endpoint.
    pub fn endpoint(&self, suffix: &str) -> Result<url::Url, HostError> {
        let raw = format!("{}/{}/{}", self.base_url, APP_API_PREFIX, suffix);
        Ok(url::Url::parse(&raw)?)
    }

    async fn ocs(&self, method: Method, suffix: &str, body: Value) -> Result<(), HostError> {
        let url = self.endpoint(suffix)?;
        tracing::debug!(method = %method, url = %url, "Calling host");

        let response = self
            .client
            .request(method, url)
            .headers(self.credentials.signed_headers("")?)
            .header("OCS-APIRequest", "true")
            .query(&[("format", "json")])
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(HostError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl HostSdk for NextcloudClient {
    async fn set_script(&self, ui_type: &str, name: &str, path: &str) -> Result<(), HostError> {
        self.ocs(
            Method::POST,
            "api/v1/ui/script",
            json!({ "type": ui_type, "name": name, "path": path, "afterAppId": "" }),
        )
        .await
    }

    async fn delete_script(&self, ui_type: &str, name: &str, path: &str) -> Result<(), HostError> {
        self.ocs(
            Method::DELETE,
            "api/v1/ui/script",
            json!({ "type": ui_type, "name": name, "path": path }),
        )
        .await
    }

    async fn register_top_menu(
        &self,
        name: &str,
        display_name: &str,
        icon: &str,
    ) -> Result<(), HostError> {
        self.ocs(
            Method::POST,
            "api/v1/ui/top-menu",
            json!({ "name": name, "displayName": display_name, "icon": icon, "adminRequired": 0 }),
        )
        .await
    }

    async fn unregister_top_menu(&self, name: &str) -> Result<(), HostError> {
        self.ocs(Method::DELETE, "api/v1/ui/top-menu", json!({ "name": name }))
            .await
    }

    async fn set_init_status(&self, progress: u8, error: &str) -> Result<(), HostError> {
        self.ocs(
            Method::PUT,
            "ex-app/status",
            json!({ "progress": progress, "error": error }),
        )
        .await
    }
}
