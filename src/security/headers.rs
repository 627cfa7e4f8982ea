//! Header manipulation for proxied traffic.
//!
//! # Responsibilities
//! - Drop `Host` and `Cookie` from requests forwarded to the backend
//! - Strip hop-by-hop headers (the proxy re-frames bodies itself)
//! - Strip the same hop-by-hop set from relayed backend responses
//! - Provide the content-security-policy applied to frontend files

use axum::http::{header, HeaderMap, HeaderName};

/// Policy attached to every static frontend response. The embedded client
/// relies on inline scripts, `eval`, and `data:`/`blob:` URIs.
pub const FRONTEND_CSP: &str = "default-src * 'unsafe-inline' 'unsafe-eval' data: blob:;";

/// Hop-by-hop headers that only describe the client↔shim connection.
const HOP_BY_HOP: [HeaderName; 7] = [
    header::CONNECTION,
    HeaderName::from_static("keep-alive"),
    HeaderName::from_static("proxy-connection"),
    header::TE,
    header::TRAILER,
    header::TRANSFER_ENCODING,
    header::UPGRADE,
];

/// Copy inbound headers for the backend request.
///
/// `Host` is rewritten by the client for the backend authority and `Cookie`
/// travels through the proxy's own cookie header. `Content-Length` is
/// recomputed from the buffered body.
pub fn forward_request_headers(headers: &HeaderMap) -> HeaderMap {
    let mut forwarded = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers.iter() {
        if *name == header::HOST || *name == header::COOKIE || *name == header::CONTENT_LENGTH {
            continue;
        }
        if HOP_BY_HOP.contains(name) {
            continue;
        }
        forwarded.append(name.clone(), value.clone());
    }
    forwarded
}

/// Remove hop-by-hop and framing headers from a backend response before
/// relaying it.
pub fn strip_response_headers(headers: &mut HeaderMap) {
    for name in &HOP_BY_HOP {
        headers.remove(name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn drops_host_cookie_and_hop_by_hop() {
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, HeaderValue::from_static("cloud.example"));
        headers.insert(header::COOKIE, HeaderValue::from_static("a=1"));
        headers.insert(header::CONNECTION, HeaderValue::from_static("keep-alive"));
        headers.insert(header::TRANSFER_ENCODING, HeaderValue::from_static("chunked"));
        headers.insert("x-custom", HeaderValue::from_static("kept"));
        headers.append(header::ACCEPT, HeaderValue::from_static("text/html"));
        headers.append(header::ACCEPT, HeaderValue::from_static("application/json"));

        let forwarded = forward_request_headers(&headers);

        assert!(forwarded.get(header::HOST).is_none());
        assert!(forwarded.get(header::COOKIE).is_none());
        assert!(forwarded.get(header::CONNECTION).is_none());
        assert!(forwarded.get(header::TRANSFER_ENCODING).is_none());
        assert_eq!(forwarded.get("x-custom").unwrap(), "kept");
        assert_eq!(forwarded.get_all(header::ACCEPT).iter().count(), 2);
    }

    #[test]
    fn strips_hop_by_hop_from_responses() {
        let mut headers = HeaderMap::new();
        headers.insert(header::TRANSFER_ENCODING, HeaderValue::from_static("chunked"));
        headers.insert(header::CONNECTION, HeaderValue::from_static("keep-alive"));
        headers.insert("keep-alive", HeaderValue::from_static("timeout=5"));
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(header::SET_COOKIE, HeaderValue::from_static("sid=1"));

        strip_response_headers(&mut headers);

        assert!(headers.get(header::TRANSFER_ENCODING).is_none());
        assert!(headers.get(header::CONNECTION).is_none());
        assert!(headers.get("keep-alive").is_none());
        assert_eq!(headers.get(header::CONTENT_TYPE).unwrap(), "application/json");
        assert_eq!(headers.get(header::SET_COOKIE).unwrap(), "sid=1");
    }
}
