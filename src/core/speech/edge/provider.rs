//! HTTP adapter for the streaming speech service.

use bytes::Bytes;
use tracing::debug;

use super::config::{EdgeAudioEncoding, EdgeConfig, build_ssml};
use crate::core::speech::base::{
    OUTPUT_FORMAT_HEADER, ProviderError, ProviderResult, SYNTHESIS_TIMEOUT, USER_AGENT,
    VOICES_TIMEOUT, VoiceInfo,
};

/// Parameters for one streaming synthesis request. Rate and volume are
/// pre-formatted signed percent strings; pitch never reaches the provider.
#[derive(Debug, Clone)]
pub struct EdgeSynthesisParams {
    pub text: String,
    pub voice: String,
    pub rate: String,
    pub volume: String,
    pub encoding: EdgeAudioEncoding,
}

/// Client for the streaming speech service. Cheap to clone; the underlying
/// HTTP client is shared.
#[derive(Debug, Clone)]
pub struct EdgeSpeech {
    client: reqwest::Client,
    config: EdgeConfig,
}

impl EdgeSpeech {
    pub fn new(client: reqwest::Client, config: EdgeConfig) -> Self {
        Self { client, config }
    }

    /// Fetch the full voice catalog.
    pub async fn list_voices(&self) -> ProviderResult<Vec<VoiceInfo>> {
        let url = self.config.voices_url();
        debug!("Fetching streaming voice catalog from {}", url);

        let response = self
            .client
            .get(&url)
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

    /// Synthesize text, returning the raw audio bytes in the requested
    /// encoding.
    pub async fn synthesize(&self, params: &EdgeSynthesisParams) -> ProviderResult<Bytes> {
        let url = self.config.synthesis_url();
        let ssml = build_ssml(&params.text, &params.voice, &params.rate, &params.volume);
        debug!(
            "Streaming synthesis request: voice={} rate={} volume={} encoding={}",
            params.voice,
            params.rate,
            params.volume,
            params.encoding.as_str()
        );

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/ssml+xml")
            .header(OUTPUT_FORMAT_HEADER, params.encoding.as_str())
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
