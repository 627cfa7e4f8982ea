//! Lifecycle endpoints the host calls.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::config::schema::AppIdentityConfig;
use crate::host::{HostError, HostSdk};
use crate::http::error::AppError;
use crate::http::middleware::RequestTranslator;
use crate::http::server::AppState;
use crate::i18n::{Translator, APP_DISPLAY_NAME};

/// UI slot the app's script is attached to.
const TOP_MENU: &str = "top_menu";
const MENU_ICON: &str = "ex_app/img/app.svg";

pub async fn heartbeat() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Start model fetching in the background and answer right away.
pub async fn init(State(state): State<AppState>) -> Json<Value> {
    let host = state.host.clone();
    let fetcher = state.models.clone();
    state.tasks.spawn("fetch_models", async move {
        fetcher.run(host.as_ref()).await
    });
    Json(json!({}))
}

#[derive(Debug, Deserialize)]
pub struct EnabledParams {
    pub enabled: String,
}

pub async fn enabled(
    State(state): State<AppState>,
    RequestTranslator(translator): RequestTranslator,
    Query(params): Query<EnabledParams>,
) -> Result<Json<Value>, AppError> {
    let enabled = parse_flag(&params.enabled)
        .ok_or_else(|| AppError::InvalidQuery(format!("enabled={}", params.enabled)))?;

    let error = set_enabled(enabled, state.host.as_ref(), &state.config.app, &translator).await?;
    Ok(Json(json!({ "error": error })))
}

/// Register or remove the app's UI entry. Returns the error text reported
/// back to the host; empty on success.
pub async fn set_enabled(
    enabled: bool,
    host: &dyn HostSdk,
    app: &AppIdentityConfig,
    translator: &Translator,
) -> Result<String, HostError> {
    tracing::info!(enabled, app = %app.id, "Enabled state changed");

    let script = format!("ex_app/js/{}-main", app.id);
    if enabled {
        host.set_script(TOP_MENU, &app.id, &script).await?;
        let display_name = translator.tr_or(APP_DISPLAY_NAME, &app.display_name);
        host.register_top_menu(&app.id, &display_name, MENU_ICON)
            .await?;
    } else {
        host.delete_script(TOP_MENU, &app.id, &script).await?;
        host.unregister_top_menu(&app.id).await?;
    }
    Ok(String::new())
}

/// Boolean query values as the host may send them.
pub fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
