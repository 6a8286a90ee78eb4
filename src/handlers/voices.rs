//! Voice catalog endpoints, one per provider.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::HeaderMap;
use serde::Deserialize;
use serde_json::{Value, json};

use super::VOICES_PER_MINUTE;
use crate::core::speech::VoiceInfo;
use crate::core::speech::azure::{DEFAULT_AZURE_REGION, SUBSCRIPTION_KEY_HEADER};
use crate::errors::app_error::{AppError, AppResult};
use crate::state::AppState;

/// Catalog of the streaming provider, split into Chinese voices and
/// everything else. Chinese voices sort by short name, the rest by locale.
pub async fn edge_voices(State(state): State<Arc<AppState>>) -> AppResult<Json<Value>> {
    if !state.limiter.allow("/api/edge/voices", VOICES_PER_MINUTE) {
        return Err(AppError::RateLimited);
    }

    let voices = state
        .edge
        .list_voices()
        .await
        .map_err(|e| AppError::Upstream {
            status: 500,
            message: format!("Failed to fetch voice list: {e}"),
        })?;

    let (mut chinese, mut other): (Vec<VoiceInfo>, Vec<VoiceInfo>) = voices
        .into_iter()
        .partition(|voice| voice.locale.starts_with("zh-"));
    chinese.sort_by(|a, b| a.short_name.cmp(&b.short_name));
    other.sort_by(|a, b| a.locale.cmp(&b.locale));

    Ok(Json(json!({
        "chinese_voices": chinese,
        "other_voices": other,
    })))
}

#[derive(Debug, Deserialize)]
pub struct AzureVoicesQuery {
    region: Option<String>,
}

/// Catalog of the cloud provider for one region, passed through as the
/// provider returns it, sorted by locale then short name.
pub async fn azure_voices(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AzureVoicesQuery>,
    headers: HeaderMap,
) -> AppResult<Json<Vec<VoiceInfo>>> {
    if !state.limiter.allow("/api/azure/voices", VOICES_PER_MINUTE) {
        return Err(AppError::RateLimited);
    }

    let api_key = require_subscription_key(&headers)?;
    let region = query
        .region
        .filter(|r| !r.is_empty())
        .unwrap_or_else(|| DEFAULT_AZURE_REGION.to_string());

    let mut voices = state
        .azure
        .list_voices(&region, &api_key)
        .await
        .map_err(|e| AppError::Upstream {
            status: e.upstream_status(),
            message: format!("Failed to fetch cloud voice list: {e}"),
        })?;
    voices.sort_by(|a, b| {
        a.locale
            .cmp(&b.locale)
            .then_with(|| a.short_name.cmp(&b.short_name))
    });

    Ok(Json(voices))
}

/// Pull the subscription key from the request headers.
pub(crate) fn require_subscription_key(headers: &HeaderMap) -> AppResult<String> {
    headers
        .get(SUBSCRIPTION_KEY_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|key| !key.is_empty())
        .map(str::to_string)
        .ok_or_else(|| {
            AppError::Validation(format!(
                "Missing API key header ({SUBSCRIPTION_KEY_HEADER})"
            ))
        })
}
