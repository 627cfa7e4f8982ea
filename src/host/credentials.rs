//! AppAPI request signing.
//!
//! The host and the ExApp authenticate each other with the same header set:
//!
//! | Header                  | Value                                |
//! |-------------------------|--------------------------------------|
//! | `AUTHORIZATION-APP-API` | base64 of `<user id>:<app secret>`   |
//! | `EX-APP-ID`             | application id                       |
//! | `EX-APP-VERSION`        | application version                  |
//! | `AA-VERSION`            | AppAPI version                       |

use axum::http::header::InvalidHeaderValue;
use axum::http::{HeaderMap, HeaderValue};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::config::AppConfig;

pub const AUTHORIZATION_APP_API: &str = "authorization-app-api";
pub const EX_APP_ID: &str = "ex-app-id";
pub const EX_APP_VERSION: &str = "ex-app-version";
pub const AA_VERSION: &str = "aa-version";

/// Host session attached to authenticated requests.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HostSession {
    /// Nextcloud user the host acts for; empty for system calls.
    pub user_id: String,
    pub aa_version: String,
}

/// Reasons an inbound request fails verification.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthFailure {
    #[error("missing header {0}")]
    MissingHeader(&'static str),
    #[error("malformed authorization-app-api header")]
    MalformedAuthorization,
    #[error("app secret mismatch")]
    SecretMismatch,
    #[error("app id mismatch: {0}")]
    AppIdMismatch(String),
    #[error("app version mismatch: {0}")]
    VersionMismatch(String),
}

/// Identity and secret used to sign and verify AppAPI calls.
#[derive(Clone, Debug)]
pub struct AppCredentials {
    pub app_id: String,
    pub app_version: String,
    pub secret: String,
    pub aa_version: String,
}

impl AppCredentials {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            app_id: config.app.id.clone(),
            app_version: config.app.version.clone(),
            secret: config.app.secret.clone(),
            aa_version: config.host.aa_version.clone(),
        }
    }

    /// Headers that sign a call made on behalf of `user_id`.
    pub fn signed_headers(&self, user_id: &str) -> Result<HeaderMap, InvalidHeaderValue> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION_APP_API,
            HeaderValue::from_str(&encode_authorization(user_id, &self.secret))?,
        );
        headers.insert(EX_APP_ID, HeaderValue::from_str(&self.app_id)?);
        headers.insert(EX_APP_VERSION, HeaderValue::from_str(&self.app_version)?);
        headers.insert(AA_VERSION, HeaderValue::from_str(&self.aa_version)?);
        Ok(headers)
    }

    /// Check the headers of an inbound host call.
    pub fn verify(&self, headers: &HeaderMap) -> Result<HostSession, AuthFailure> {
        let aa_version = header_str(headers, AA_VERSION)?;
        let app_id = header_str(headers, EX_APP_ID)?;
        if app_id != self.app_id {
            return Err(AuthFailure::AppIdMismatch(app_id.to_string()));
        }
        let app_version = header_str(headers, EX_APP_VERSION)?;
        if app_version != self.app_version {
            return Err(AuthFailure::VersionMismatch(app_version.to_string()));
        }

        let authorization = header_str(headers, AUTHORIZATION_APP_API)?;
        let (user_id, secret) =
            decode_authorization(authorization).ok_or(AuthFailure::MalformedAuthorization)?;
        if secret != self.secret {
            return Err(AuthFailure::SecretMismatch);
        }

        Ok(HostSession {
            user_id,
            aa_version: aa_version.to_string(),
        })
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &'static str) -> Result<&'a str, AuthFailure> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthFailure::MissingHeader(name))
}

pub fn encode_authorization(user_id: &str, secret: &str) -> String {
    STANDARD.encode(format!("{}:{}", user_id, secret))
}

/// Split a base64 `user:secret` pair. The user id may be empty.
pub fn decode_authorization(value: &str) -> Option<(String, String)> {
    let raw = STANDARD.decode(value.trim()).ok()?;
    let text = String::from_utf8(raw).ok()?;
    let (user, secret) = text.split_once(':')?;
    Some((user.to_string(), secret.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials() -> AppCredentials {
        AppCredentials {
            app_id: "visionatrix".into(),
            app_version: "1.0.0".into(),
            secret: "s3cret".into(),
            aa_version: "2.0.0".into(),
        }
    }

    #[test]
    fn signed_headers_verify() {
        let creds = credentials();
        let headers = creds.signed_headers("admin").unwrap();
        let session = creds.verify(&headers).unwrap();
        assert_eq!(session.user_id, "admin");
        assert_eq!(session.aa_version, "2.0.0");
    }

    #[test]
    fn empty_user_is_allowed() {
        assert_eq!(
            decode_authorization(&encode_authorization("", "x:y")),
            Some((String::new(), "x:y".to_string()))
        );
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let creds = credentials();
        let mut other = credentials();
        other.secret = "nope".into();
        let headers = other.signed_headers("admin").unwrap();
        assert_eq!(creds.verify(&headers), Err(AuthFailure::SecretMismatch));
    }

    #[test]
    fn missing_headers_are_reported() {
        let creds = credentials();
        let mut headers = creds.signed_headers("admin").unwrap();
        headers.remove(EX_APP_VERSION);
        assert_eq!(
            creds.verify(&headers),
            Err(AuthFailure::MissingHeader(EX_APP_VERSION))
        );
    }

    #[test]
    fn garbage_authorization_is_malformed() {
        let creds = credentials();
        let mut headers = creds.signed_headers("admin").unwrap();
        headers.insert(AUTHORIZATION_APP_API, HeaderValue::from_static("%%%"));
        assert_eq!(creds.verify(&headers), Err(AuthFailure::MalformedAuthorization));
    }
}
