//! Shared utilities for integration tests.
#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{HeaderMap, Method, Request, StatusCode, Uri},
    routing::any,
    Json, Router,
};
use serde_json::{json, Value};
use tokio::io::AsyncWriteExt;
use tokio::net::TcpListener;

use exapp_shim::config::AppConfig;
use exapp_shim::host::{AppCredentials, HostError, HostSdk};
use exapp_shim::{HttpServer, Shutdown};

/// A host call observed by `RecordingHost`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    SetScript { ui_type: String, name: String, path: String },
    DeleteScript { ui_type: String, name: String, path: String },
    RegisterTopMenu { name: String, display_name: String, icon: String },
    UnregisterTopMenu { name: String },
    InitStatus { progress: u8, error: String },
}

/// Test double for the host SDK that records calls in order.
#[derive(Default)]
pub struct RecordingHost {
    calls: Mutex<Vec<HostCall>>,
    fail: AtomicBool,
}

impl RecordingHost {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// A host whose every call fails.
    pub fn failing() -> Arc<Self> {
        let host = Self::default();
        host.fail.store(true, Ordering::SeqCst);
        Arc::new(host)
    }

    pub fn calls(&self) -> Vec<HostCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: HostCall) -> Result<(), HostError> {
        self.calls.lock().unwrap().push(call);
        if self.fail.load(Ordering::SeqCst) {
            return Err(HostError::Status {
                status: 500,
                body: "injected failure".into(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl HostSdk for RecordingHost {
    async fn set_script(&self, ui_type: &str, name: &str, path: &str) -> Result<(), HostError> {
        self.record(HostCall::SetScript {
            ui_type: ui_type.into(),
            name: name.into(),
            path: path.into(),
        })
    }

    async fn delete_script(&self, ui_type: &str, name: &str, path: &str) -> Result<(), HostError> {
        self.record(HostCall::DeleteScript {
            ui_type: ui_type.into(),
            name: name.into(),
            path: path.into(),
        })
    }

    async fn register_top_menu(
        &self,
        name: &str,
        display_name: &str,
        icon: &str,
    ) -> Result<(), HostError> {
        self.record(HostCall::RegisterTopMenu {
            name: name.into(),
            display_name: display_name.into(),
            icon: icon.into(),
        })
    }

    async fn unregister_top_menu(&self, name: &str) -> Result<(), HostError> {
        self.record(HostCall::UnregisterTopMenu { name: name.into() })
    }

    async fn set_init_status(&self, progress: u8, error: &str) -> Result<(), HostError> {
        self.record(HostCall::InitStatus {
            progress,
            error: error.into(),
        })
    }
}

/// Config pointing at test directories, with a known secret.
pub fn test_config(backend: SocketAddr, app_root: &Path, client_root: &Path) -> AppConfig {
    let mut config = AppConfig::default();
    config.app.secret = "test-secret".into();
    config.backend.address = backend.to_string();
    config.frontend.app_root = app_root.to_string_lossy().into_owned();
    config.frontend.client_root = client_root.to_string_lossy().into_owned();
    config.localization.locale_dir = app_root.join("locale").to_string_lossy().into_owned();
    config.storage.persistent_dir = app_root.join("data").to_string_lossy().into_owned();
    config
}

/// Host headers signed for `config`.
pub fn signed_headers(config: &AppConfig) -> HeaderMap {
    AppCredentials::from_config(config)
        .signed_headers("admin")
        .unwrap()
}

/// Request builder carrying the host headers.
pub fn signed_request(config: &AppConfig, method: Method, uri: &str) -> axum::http::request::Builder {
    let mut builder = Request::builder().method(method).uri(uri);
    for (name, value) in signed_headers(config).iter() {
        builder = builder.header(name, value);
    }
    builder
}

pub async fn body_bytes(body: Body) -> Bytes {
    axum::body::to_bytes(body, usize::MAX).await.unwrap()
}

/// Run the shim on an ephemeral port. Returns its address.
pub async fn start_shim(config: AppConfig, host: Arc<dyn HostSdk>) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let server = HttpServer::with_host(config, host);
    let server_shutdown = shutdown.clone();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });
    (addr, shutdown)
}

/// A request as seen by the echo backend.
#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub method: Method,
    pub uri: Uri,
    pub headers: HeaderMap,
    pub body: Bytes,
}

pub type Seen = Arc<Mutex<Vec<SeenRequest>>>;

/// Backend that records each request and answers with a JSON echo.
/// The `x-echo-status` request header picks the response status.
pub async fn start_echo_backend() -> (SocketAddr, Seen) {
    let seen: Seen = Arc::default();
    let app = Router::new()
        .route("/{*path}", any(echo))
        .with_state(seen.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (addr, seen)
}

async fn echo(State(seen): State<Seen>, request: Request<Body>) -> (StatusCode, Json<Value>) {
    let (parts, body) = request.into_parts();
    let body = body_bytes(body).await;

    let status = parts
        .headers
        .get("x-echo-status")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u16>().ok())
        .and_then(|v| StatusCode::from_u16(v).ok())
        .unwrap_or(StatusCode::OK);

    let echo = json!({
        "method": parts.method.as_str(),
        "path": parts.uri.path(),
        "query": parts.uri.query(),
        "body": String::from_utf8_lossy(&body),
    });

    seen.lock().unwrap().push(SeenRequest {
        method: parts.method,
        uri: parts.uri,
        headers: parts.headers,
        body,
    });

    (status, Json(echo))
}

/// Backend that writes a fixed raw HTTP response to every connection.
pub async fn start_raw_backend(response: &'static str) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    tokio::spawn(async move {
                        let mut buf = [0u8; 4096];
                        let _ = tokio::io::AsyncReadExt::read(&mut socket, &mut buf).await;
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });
    addr
}

/// Serves `bytes` at every path; `None` answers 404.
pub async fn start_file_server(bytes: Option<&'static [u8]>) -> SocketAddr {
    let app = Router::new().route(
        "/{*path}",
        any(move || async move {
            match bytes {
                Some(b) => (StatusCode::OK, b.to_vec()),
                None => (StatusCode::NOT_FOUND, Vec::new()),
            }
        }),
    );
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}

/// An address nothing listens on.
pub async fn closed_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}
