use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::handlers::{api, audio, presets, synthesize, voices};
use crate::state::AppState;
use std::sync::Arc;

pub fn create_api_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/health", get(api::health_check))
        .route("/api/edge/voices", get(voices::edge_voices))
        .route("/api/edge/synthesize", post(synthesize::edge_synthesize))
        .route(
            "/api/edge/presets",
            get(presets::get_edge_presets)
                .post(presets::save_edge_preset)
                .delete(presets::delete_edge_preset),
        )
        .route("/api/azure/voices", get(voices::azure_voices))
        .route("/api/azure/synthesize", post(synthesize::azure_synthesize))
        .route(
            "/api/azure/presets",
            get(presets::get_azure_presets)
                .post(presets::save_azure_preset)
                .delete(presets::delete_azure_preset),
        )
        .route("/api/audio/{filename}", get(audio::get_audio))
        .layer(TraceLayer::new_for_http())
}
