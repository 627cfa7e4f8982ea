//! Model artifact fetching for `/init`.
//!
//! Each configured model is streamed to the persistent storage directory
//! unless a file of the same name already exists. Progress is reported to
//! the host after every model; completion reports 100. A failure is reported
//! to the host with its message and returned to the caller (the background
//! task set logs it).

use std::path::{Path, PathBuf};

use futures_util::StreamExt;
use tokio::io::AsyncWriteExt;

use crate::config::{AppConfig, ModelConfig};
use crate::host::{HostError, HostSdk};

pub struct ModelFetcher {
    client: reqwest::Client,
    models: Vec<ModelConfig>,
    storage_dir: PathBuf,
}

impl ModelFetcher {
    pub fn new(client: reqwest::Client, models: Vec<ModelConfig>, storage_dir: PathBuf) -> Self {
        Self {
            client,
            models,
            storage_dir,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            reqwest::Client::new(),
            config.models.clone(),
            PathBuf::from(&config.storage.persistent_dir),
        )
    }

    /// Download every model and report the outcome to the host.
    pub async fn run(&self, host: &dyn HostSdk) -> Result<(), HostError> {
        let total = self.models.len();
        tracing::info!(models = total, dir = %self.storage_dir.display(), "Fetching models");

        let mut progress = 0u8;
        for (done, model) in self.models.iter().enumerate() {
            if let Err(e) = self.download(model).await {
                tracing::error!(url = %model.url, error = %e, "Model download failed");
                host.set_init_status(progress, &e.to_string()).await?;
                return Err(e);
            }
            progress = (((done + 1) * 100 / total).min(99)) as u8;
            host.set_init_status(progress, "").await?;
        }

        host.set_init_status(100, "").await?;
        tracing::info!("Init finished");
        Ok(())
    }

    async fn download(&self, model: &ModelConfig) -> Result<PathBuf, HostError> {
        let target = self.storage_dir.join(model_file_name(model)?);
        if tokio::fs::try_exists(&target).await? {
            tracing::debug!(path = %target.display(), "Model already present");
            return Ok(target);
        }

        tokio::fs::create_dir_all(&self.storage_dir).await?;
        let response = self.client.get(&model.url).send().await?.error_for_status()?;

        let partial = partial_path(&target);
        if let Err(e) = write_body(response, &partial).await {
            if let Err(cleanup) = tokio::fs::remove_file(&partial).await {
                tracing::warn!(path = %partial.display(), error = %cleanup, "Partial download left behind");
            }
            return Err(e);
        }

        tokio::fs::rename(&partial, &target).await?;
        tracing::info!(path = %target.display(), "Model downloaded");
        Ok(target)
    }
}

async fn write_body(response: reqwest::Response, path: &Path) -> Result<(), HostError> {
    let mut file = tokio::fs::File::create(path).await?;
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        file.write_all(&chunk?).await?;
    }
    file.flush().await?;
    Ok(())
}

fn partial_path(target: &Path) -> PathBuf {
    let mut name = target.as_os_str().to_owned();
    name.push(".part");
    PathBuf::from(name)
}

/// Explicit `file_name`, else the last non-empty URL path segment.
pub fn model_file_name(model: &ModelConfig) -> Result<String, HostError> {
    if let Some(name) = &model.file_name {
        return Ok(name.clone());
    }
    let url = url::Url::parse(&model.url)?;
    url.path_segments()
        .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
        .filter(|s| *s != "..")
        .map(str::to_string)
        .ok_or_else(|| HostError::ModelName(model.url.clone()))
}
