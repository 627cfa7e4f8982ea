//! Per-request localization.
//!
//! When enabled, the translator picked from `Accept-Language` is stored in
//! the request's own extensions, so concurrent requests never see each
//! other's language. Handlers read it through `RequestTranslator`, which
//! falls back to the process default.

use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::{FromRequestParts, State},
    http::{header, request::Parts, Request},
    middleware::Next,
    response::Response,
};

use crate::http::server::AppState;
use crate::i18n::Translator;

pub async fn locale_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    if state.config.localization.per_request {
        let header = request
            .headers()
            .get(header::ACCEPT_LANGUAGE)
            .and_then(|v| v.to_str().ok());
        let translator = state.localizer.for_accept_language(header);
        tracing::trace!(language = %translator.language(), "Request language");
        request.extensions_mut().insert(translator);
    }
    next.run(request).await
}

/// Translator bound to the current request.
pub struct RequestTranslator(pub Arc<Translator>);

impl FromRequestParts<AppState> for RequestTranslator {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let translator = parts
            .extensions
            .get::<Arc<Translator>>()
            .cloned()
            .unwrap_or_else(|| state.localizer.default_translator());
        Ok(Self(translator))
    }
}
