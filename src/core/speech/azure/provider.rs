//! HTTP adapter for the cloud speech service.

use bytes::Bytes;
use tracing::debug;

use super::config::{AZURE_OUTPUT_FORMAT, AzureConfig, SUBSCRIPTION_KEY_HEADER, build_ssml};
use crate::core::speech::base::{
    OUTPUT_FORMAT_HEADER, ProviderError, ProviderResult, SYNTHESIS_TIMEOUT, USER_AGENT,
    VOICES_TIMEOUT, VoiceInfo,
};

/// Parameters for one cloud synthesis request. Rate, pitch, and volume are
/// percent offsets; credentials travel separately since they arrive with
/// each request.
#[derive(Debug, Clone)]
pub struct AzureSynthesisParams {
    pub text: String,
    pub voice: String,
    pub style: String,
    pub rate: i64,
    pub pitch: i64,
    pub volume: i64,
}

/// Client for the cloud speech service. Cheap to clone; the underlying
/// HTTP client is shared.
#[derive(Debug, Clone)]
pub struct AzureSpeech {
    client: reqwest::Client,
    config: AzureConfig,
}

impl AzureSpeech {
    pub fn new(client: reqwest::Client, config: AzureConfig) -> Self {
        Self { client, config }
    }

    /// Fetch the voice catalog for a region.
    pub async fn list_voices(&self, region: &str, api_key: &str) -> ProviderResult<Vec<VoiceInfo>> {
        let url = self.config.voices_url(region);
        debug!("Fetching cloud voice catalog from {}", url);

        let response = self
            .client
            .get(&url)
            .header(SUBSCRIPTION_KEY_HEADER, api_key)
            .header("User-Agent", USER_AGENT)
            .timeout(VOICES_TIMEOUT)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ProviderError::from_response(response).await);
        }

        response
            .json::<Vec<VoiceInfo>>()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))
    }

    /// Synthesize text, returning MP3 bytes.
    pub async fn synthesize(
        &self,
        params: &AzureSynthesisParams,
        region: &str,
        api_key: &str,
    ) -> ProviderResult<Bytes> {
        let url = self.config.synthesis_url(region);
        let ssml = build_ssml(
            &params.text,
            &params.voice,
            &params.style,
            params.rate,
            params.pitch,
            params.volume,
        );
        debug!(
            "Cloud synthesis request: region={} voice={} style={}",
            region, params.voice, params.style
        );

        let response = self
            .client
            .post(&url)
            .header(SUBSCRIPTION_KEY_HEADER, api_key)
            .header("Content-Type", "application/ssml+xml")
            .header(OUTPUT_FORMAT_HEADER, AZURE_OUTPUT_FORMAT)
            .header("User-Agent", USER_AGENT)
            .timeout(SYNTHESIS_TIMEOUT)
            .body(ssml)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ProviderError::from_response(response).await);
        }

        Ok(response.bytes().await?)
    }
}
