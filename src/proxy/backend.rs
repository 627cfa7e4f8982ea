//! Reverse proxy to the local backend for `/api/*`.
//!
//! # Design Decisions
//! - The upstream path and query are the inbound ones, unchanged
//! - Cookie pairs are split out of the client's `Cookie` headers and
//!   re-emitted byte for byte, in order, as one `Cookie` header; the client's
//!   `Host` header never reaches the backend
//! - GET bodies are dropped; other bodies are buffered up to a limit
//! - Responses are buffered so the shim frames them itself and can drop
//!   `Transfer-Encoding`
//! - No retries: a backend failure is the caller's 502

use std::time::Duration;

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, HeaderValue, Method, Request, Uri},
    response::Response,
};
use axum_extra::extract::cookie::Cookie;
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};

use crate::config::AppConfig;
use crate::http::error::AppError;
use crate::http::request::request_id;
use crate::http::server::AppState;
use crate::proxy::ProxyError;
use crate::security::headers::{forward_request_headers, strip_response_headers};

/// Forwards requests to the backend over a pooled HTTP/1.1 client.
#[derive(Clone)]
pub struct BackendProxy {
    client: Client<HttpConnector, Body>,
    authority: String,
    max_body_size: usize,
}

impl BackendProxy {
    pub fn new(config: &AppConfig) -> Self {
        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(Duration::from_secs(config.timeouts.connect_secs)));
        let client = Client::builder(TokioExecutor::new()).build(connector);

        Self {
            client,
            authority: config.backend.address.clone(),
            max_body_size: config.limits.max_body_size,
        }
    }

    /// Backend URI for an inbound URI: same path and query, backend authority.
    pub fn upstream_uri(&self, inbound: &Uri) -> Result<Uri, ProxyError> {
        let path_and_query = inbound
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or("/");
        Ok(format!("http://{}{}", self.authority, path_and_query).parse::<Uri>()?)
    }

    /// Forward `request` and relay the backend's answer.
    pub async fn forward(&self, request: Request<Body>) -> Result<Response, ProxyError> {
        let (parts, body) = request.into_parts();

        let body = if parts.method == Method::GET {
            Body::empty()
        } else {
            if declared_length(&parts.headers).is_some_and(|len| len > self.max_body_size) {
                return Err(ProxyError::BodyTooLarge {
                    limit: self.max_body_size,
                });
            }
            let bytes = axum::body::to_bytes(body, self.max_body_size)
                .await
                .map_err(ProxyError::RequestBody)?;
            Body::from(bytes)
        };

        let mut headers = forward_request_headers(&parts.headers);
        if let Some(cookies) = cookie_header(&parts.headers) {
            headers.insert(header::COOKIE, cookies);
        }

        let mut upstream = Request::new(body);
        *upstream.method_mut() = parts.method;
        *upstream.uri_mut() = self.upstream_uri(&parts.uri)?;
        *upstream.headers_mut() = headers;

        let response = self.client.request(upstream).await?;

        let (mut parts, body) = response.into_parts();
        let bytes = axum::body::to_bytes(Body::new(body), usize::MAX)
            .await
            .map_err(ProxyError::UpstreamBody)?;
        strip_response_headers(&mut parts.headers);

        Ok(Response::from_parts(parts, Body::from(bytes)))
    }
}

fn declared_length(headers: &HeaderMap) -> Option<usize> {
    headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
}

/// The client's cookies as a single `Cookie` header, or `None` if it sent none.
///
/// Values are not percent-decoded: the backend sees exactly what the client
/// sent. Malformed pairs are dropped.
pub fn cookie_header(headers: &HeaderMap) -> Option<HeaderValue> {
    let pairs: Vec<String> = headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(Result::ok)
        .map(|cookie| {
            let (name, value) = cookie.name_value();
            format!("{}={}", name, value)
        })
        .collect();
    if pairs.is_empty() {
        return None;
    }
    HeaderValue::from_str(&pairs.join("; ")).ok()
}

/// Handler for `/api/*`.
pub async fn proxy_backend(
    State(state): State<AppState>,
    request: Request<Body>,
) -> Result<Response, AppError> {
    let request_id = request_id(request.headers()).to_string();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        path = %path,
        "Proxying backend request"
    );

    let response = state.backend.forward(request).await?;

    tracing::debug!(
        request_id = %request_id,
        status = %response.status(),
        "Backend responded"
    );
    Ok(response)
}
