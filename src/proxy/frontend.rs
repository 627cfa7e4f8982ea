//! Static frontend serving.
//!
//! Paths are resolved against two roots: the ExApp's own installation
//! directory for the reserved asset prefix, and the embedded client build
//! for everything else. Every served file carries `FRONTEND_CSP`.

use std::path::PathBuf;

use axum::{
    body::Body,
    extract::State,
    http::{header, Method, StatusCode, Uri},
    response::Response,
};
use tokio_util::io::ReaderStream;

use crate::config::FrontendConfig;
use crate::http::error::AppError;
use crate::http::server::AppState;
use crate::proxy::StaticError;
use crate::security::headers::FRONTEND_CSP;
use crate::security::paths::normalize_request_path;

#[derive(Debug, Clone)]
pub struct FrontendResolver {
    app_root: PathBuf,
    asset_prefix: String,
    client_root: PathBuf,
    index_file: String,
}

impl FrontendResolver {
    pub fn from_config(config: &FrontendConfig) -> Self {
        Self {
            app_root: PathBuf::from(&config.app_root),
            asset_prefix: config.asset_prefix.clone(),
            client_root: PathBuf::from(&config.client_root),
            index_file: config.index_file.clone(),
        }
    }

    /// Map a raw request path to a filesystem path.
    ///
    /// Paths that try to leave the roots resolve to `NotFound`.
    pub fn resolve(&self, request_path: &str) -> Result<PathBuf, StaticError> {
        let relative = normalize_request_path(request_path).map_err(|e| {
            tracing::debug!(path = %request_path, reason = %e, "Refusing static path");
            StaticError::NotFound
        })?;

        if relative.as_os_str().is_empty() {
            return Ok(self.client_root.join(&self.index_file));
        }

        let is_asset = relative
            .to_str()
            .is_some_and(|p| p.starts_with(&self.asset_prefix));
        if is_asset {
            Ok(self.app_root.join(relative))
        } else {
            Ok(self.client_root.join(relative))
        }
    }
}

/// Handler for every path not claimed by the lifecycle or API routes.
pub async fn serve_frontend(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
) -> Result<Response, AppError> {
    tracing::debug!(method = %method, path = %uri.path(), "Frontend request");

    let path = state.frontend.resolve(uri.path())?;
    let response = open_file(&path).await?;

    tracing::debug!(file = %path.display(), "Serving frontend file");
    Ok(response)
}

async fn open_file(path: &std::path::Path) -> Result<Response, StaticError> {
    let metadata = match tokio::fs::metadata(path).await {
        Ok(m) if m.is_file() => m,
        Ok(_) => return Err(StaticError::NotFound),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Err(StaticError::NotFound),
        Err(e) => return Err(StaticError::Io(e)),
    };

    let file = tokio::fs::File::open(path).await?;
    let mime = mime_guess::from_path(path).first_or_octet_stream();

    Ok(Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, mime.as_ref())
        .header(header::CONTENT_LENGTH, metadata.len())
        .header(header::CONTENT_SECURITY_POLICY, FRONTEND_CSP)
        .body(Body::from_stream(ReaderStream::new(file)))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn resolver() -> FrontendResolver {
        FrontendResolver::from_config(&FrontendConfig {
            app_root: "/srv/app".into(),
            asset_prefix: "ex_app".into(),
            client_root: "/srv/client".into(),
            index_file: "index.html".into(),
        })
    }

    #[test]
    fn empty_path_is_index() {
        assert_eq!(resolver().resolve("/").unwrap(), Path::new("/srv/client/index.html"));
    }

    #[test]
    fn asset_prefix_resolves_under_app_root() {
        assert_eq!(
            resolver().resolve("/ex_app/img/app.svg").unwrap(),
            Path::new("/srv/app/ex_app/img/app.svg")
        );
    }

    #[test]
    fn other_paths_resolve_under_client_root() {
        assert_eq!(
            resolver().resolve("/assets/main.js").unwrap(),
            Path::new("/srv/client/assets/main.js")
        );
    }

    #[test]
    fn traversal_is_not_found() {
        assert!(matches!(
            resolver().resolve("/../../etc/passwd"),
            Err(StaticError::NotFound)
        ));
    }

    #[tokio::test]
    async fn directories_are_not_served() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            open_file(dir.path()).await,
            Err(StaticError::NotFound)
        ));
    }

    #[tokio::test]
    async fn files_get_type_and_policy() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("style.css");
        std::fs::write(&file, "body{}").unwrap();

        let response = open_file(&file).await.unwrap();
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/css");
        assert_eq!(response.headers()[header::CONTENT_LENGTH], "6");
        assert_eq!(response.headers()[header::CONTENT_SECURITY_POLICY], FRONTEND_CSP);
    }
}
