//! Preset CRUD endpoints, namespaced per provider.
//!
//! GET doubles as list and fetch: a non-blank `name` query parameter selects
//! a single preset, otherwise the full listing for the provider is returned.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;

use crate::core::presets::{PresetParams, ProviderKind};
use crate::errors::app_error::{AppError, AppResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PresetQuery {
    pub name: Option<String>,
}

/// Body for POST /api/{provider}/presets. `style` only applies to the cloud
/// provider and is dropped for streaming presets.
#[derive(Debug, Deserialize)]
pub struct SavePresetRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub voice: String,
    #[serde(default)]
    pub rate: i64,
    #[serde(default)]
    pub volume: i64,
    #[serde(default)]
    pub pitch: i64,
    #[serde(default)]
    pub style: Option<String>,
}

pub async fn get_edge_presets(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PresetQuery>,
) -> AppResult<Json<Value>> {
    fetch_or_list(&state, ProviderKind::Edge, query.name).await
}

pub async fn save_edge_preset(
    State(state): State<Arc<AppState>>,
    body: Result<Json<SavePresetRequest>, JsonRejection>,
) -> AppResult<Json<Value>> {
    save_preset(&state, ProviderKind::Edge, body).await
}

pub async fn delete_edge_preset(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PresetQuery>,
) -> AppResult<Json<Value>> {
    delete_preset(&state, ProviderKind::Edge, query.name).await
}

pub async fn get_azure_presets(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PresetQuery>,
) -> AppResult<Json<Value>> {
    fetch_or_list(&state, ProviderKind::Azure, query.name).await
}

pub async fn save_azure_preset(
    State(state): State<Arc<AppState>>,
    body: Result<Json<SavePresetRequest>, JsonRejection>,
) -> AppResult<Json<Value>> {
    save_preset(&state, ProviderKind::Azure, body).await
}

pub async fn delete_azure_preset(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PresetQuery>,
) -> AppResult<Json<Value>> {
    delete_preset(&state, ProviderKind::Azure, query.name).await
}

async fn fetch_or_list(
    state: &AppState,
    kind: ProviderKind,
    name: Option<String>,
) -> AppResult<Json<Value>> {
    let name = name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty());

    match name {
        Some(name) => {
            let params = state.presets.get(kind, &name).await?;
            info!("Loaded {} preset '{}'", kind.as_str(), name);
            Ok(Json(preset_document(kind, &name, params)))
        }
        None => {
            let presets = state.presets.list(kind).await?;
            info!("Found {} {} presets", presets.len(), kind.as_str());
            Ok(Json(json!(presets)))
        }
    }
}

/// Full detail view of one preset. Streaming presets have no style field;
/// cloud presets report "general" when a stored document predates styles.
fn preset_document(kind: ProviderKind, name: &str, params: PresetParams) -> Value {
    match kind {
        ProviderKind::Edge => json!({
            "name": name,
            "voice": params.voice,
            "rate": params.rate,
            "volume": params.volume,
            "pitch": params.pitch,
        }),
        ProviderKind::Azure => json!({
            "name": name,
            "voice": params.voice,
            "style": params.style.unwrap_or_else(|| "general".to_string()),
            "rate": params.rate,
            "pitch": params.pitch,
            "volume": params.volume,
        }),
    }
}

async fn save_preset(
    state: &AppState,
    kind: ProviderKind,
    body: Result<Json<SavePresetRequest>, JsonRejection>,
) -> AppResult<Json<Value>> {
    let Json(request) =
        body.map_err(|e| AppError::Validation(format!("Invalid request body: {e}")))?;

    let name = request.name.trim().to_string();
    let params = PresetParams {
        voice: request.voice,
        rate: request.rate,
        volume: request.volume,
        pitch: request.pitch,
        style: match kind {
            ProviderKind::Edge => None,
            ProviderKind::Azure => {
                Some(request.style.unwrap_or_else(|| "general".to_string()))
            }
        },
    };

    state.presets.save(kind, &name, &params).await?;
    Ok(Json(json!({"success": true, "name": name})))
}

async fn delete_preset(
    state: &AppState,
    kind: ProviderKind,
    name: Option<String>,
) -> AppResult<Json<Value>> {
    let name = name.unwrap_or_default();
    state.presets.delete(kind, name.trim()).await?;
    Ok(Json(json!({"success": true})))
}
