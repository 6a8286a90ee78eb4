use std::sync::Arc;

use crate::config::ServerConfig;
use crate::core::artifacts::store::ArtifactStore;
use crate::core::artifacts::{PitchShifter, VarispeedShifter};
use crate::core::presets::{FilesystemPresetStore, PresetBackend};
use crate::core::rate_limit::RateLimiter;
use crate::core::speech::azure::{AzureConfig, AzureSpeech};
use crate::core::speech::edge::{EdgeConfig, EdgeSpeech};

/// Application state that can be shared across handlers
pub struct AppState {
    pub config: ServerConfig,
    /// Per-endpoint request budgets
    pub limiter: RateLimiter,
    /// On-disk store for synthesized audio
    pub artifacts: Arc<ArtifactStore>,
    /// Preset persistence backend
    pub presets: Arc<dyn PresetBackend>,
    /// Streaming speech provider
    pub edge: EdgeSpeech,
    /// Cloud speech provider
    pub azure: AzureSpeech,
    /// Pitch transform applied after streaming synthesis
    pub pitch: Arc<dyn PitchShifter>,
}

impl AppState {
    pub async fn new(config: ServerConfig) -> Result<Arc<Self>, Box<dyn std::error::Error>> {
        let artifacts = Arc::new(ArtifactStore::new(config.audio_dir.clone()).await?);
        let presets: Arc<dyn PresetBackend> =
            Arc::new(FilesystemPresetStore::new(config.presets_dir.clone()).await?);

        // One HTTP client shared by both providers
        let client = reqwest::Client::new();
        let edge = EdgeSpeech::new(client.clone(), EdgeConfig::new(config.edge_endpoint.clone()));
        let azure = AzureSpeech::new(client, AzureConfig::new(config.azure_endpoint.clone()));

        Ok(Arc::new(Self {
            config,
            limiter: RateLimiter::new(),
            artifacts,
            presets,
            edge,
            azure,
            pitch: Arc::new(VarispeedShifter),
        }))
    }
}
