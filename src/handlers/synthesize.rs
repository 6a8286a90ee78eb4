//! Text-to-speech endpoints, one per provider.
//!
//! Both handlers follow the same shape: admit through the rate limiter,
//! validate, then run the synthesis pipeline on a worker task guarded by the
//! configured deadline. The pipeline ends with a relative URL the client
//! fetches the audio from; artifacts live until the sweeper reclaims them.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::HeaderMap;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;
use uuid::Uuid;

use super::{MAX_TEXT_LENGTH, SYNTHESIZE_PER_MINUTE};
use crate::core::artifacts::AudioFormat;
use crate::core::artifacts::pitch::semitones_for;
use crate::core::speech::azure::{AzureSynthesisParams, DEFAULT_AZURE_REGION, DEFAULT_AZURE_VOICE};
use crate::core::speech::base::signed_percent;
use crate::core::speech::edge::{DEFAULT_EDGE_VOICE, EdgeAudioEncoding, EdgeSynthesisParams};
use crate::errors::app_error::{AppError, AppResult};
use crate::handlers::voices::require_subscription_key;
use crate::state::AppState;

fn default_edge_voice() -> String {
    DEFAULT_EDGE_VOICE.to_string()
}

fn default_azure_voice() -> String {
    DEFAULT_AZURE_VOICE.to_string()
}

fn default_format() -> String {
    "mp3".to_string()
}

fn default_style() -> String {
    "general".to_string()
}

fn default_region() -> String {
    DEFAULT_AZURE_REGION.to_string()
}

/// Request body for streaming synthesis.
#[derive(Debug, Deserialize)]
pub struct EdgeSynthesizeRequest {
    #[serde(default)]
    pub text: String,
    #[serde(default = "default_edge_voice")]
    pub voice: String,
    #[serde(default = "default_format")]
    pub format: String,
    #[serde(default)]
    pub rate: i64,
    #[serde(default)]
    pub volume: i64,
    #[serde(default)]
    pub pitch: i64,
}

/// Request body for cloud synthesis. The subscription key travels in the
/// `Ocp-Apim-Subscription-Key` header, not the body.
#[derive(Debug, Deserialize)]
pub struct AzureSynthesizeRequest {
    #[serde(default)]
    pub text: String,
    #[serde(default = "default_azure_voice")]
    pub voice: String,
    #[serde(default = "default_style")]
    pub style: String,
    #[serde(default = "default_region")]
    pub region: String,
    #[serde(default)]
    pub rate: i64,
    #[serde(default)]
    pub pitch: i64,
    #[serde(default)]
    pub volume: i64,
}

/// Handler for POST /api/edge/synthesize.
pub async fn edge_synthesize(
    State(state): State<Arc<AppState>>,
    body: Result<Json<EdgeSynthesizeRequest>, JsonRejection>,
) -> AppResult<Json<Value>> {
    if !state
        .limiter
        .allow("/api/edge/synthesize", SYNTHESIZE_PER_MINUTE)
    {
        return Err(AppError::RateLimited);
    }

    let Json(request) =
        body.map_err(|e| AppError::Validation(format!("Invalid request body: {e}")))?;

    let text = validate_text(&request.text)?;
    let format = AudioFormat::parse(&request.format).ok_or_else(|| {
        AppError::Validation("Invalid audio format, expected mp3 or wav".to_string())
    })?;
    validate_range("rate", request.rate, -100, 200)?;
    validate_range("volume", request.volume, -100, 100)?;
    validate_range("pitch", request.pitch, -50, 50)?;

    info!(
        "Streaming synthesis request - voice: {}, format: {}, text length: {}",
        request.voice,
        format,
        text.chars().count()
    );

    let deadline = Duration::from_secs(state.config.synthesis_timeout_secs);
    let job = tokio::spawn(run_edge_pipeline(
        state.clone(),
        text,
        request.voice,
        request.rate,
        request.volume,
        request.pitch,
        format,
    ));
    let (filename, actual_format) = with_deadline(deadline, job).await?;

    Ok(Json(json!({
        "audioUrl": format!("/api/audio/{filename}"),
        "format": actual_format.extension(),
    })))
}

/// Handler for POST /api/azure/synthesize.
pub async fn azure_synthesize(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Result<Json<AzureSynthesizeRequest>, JsonRejection>,
) -> AppResult<Json<Value>> {
    if !state
        .limiter
        .allow("/api/azure/synthesize", SYNTHESIZE_PER_MINUTE)
    {
        return Err(AppError::RateLimited);
    }

    let Json(request) =
        body.map_err(|e| AppError::Validation(format!("Invalid request body: {e}")))?;
    let api_key = require_subscription_key(&headers)?;

    let text = validate_text(&request.text)?;
    validate_range("rate", request.rate, -100, 200)?;
    validate_range("pitch", request.pitch, -100, 100)?;
    validate_range("volume", request.volume, -100, 100)?;

    info!(
        "Cloud synthesis request - region: {}, voice: {}, text length: {}",
        request.region,
        request.voice,
        text.chars().count()
    );

    let params = AzureSynthesisParams {
        text,
        voice: request.voice,
        style: request.style,
        rate: request.rate,
        pitch: request.pitch,
        volume: request.volume,
    };

    let deadline = Duration::from_secs(state.config.synthesis_timeout_secs);
    let job = tokio::spawn(run_azure_pipeline(
        state.clone(),
        params,
        request.region,
        api_key,
    ));
    let (filename, format) = with_deadline(deadline, job).await?;

    Ok(Json(json!({
        "audioUrl": format!("/api/audio/{filename}"),
        "format": format.extension(),
    })))
}

/// Trim and bounds-check request text.
fn validate_text(text: &str) -> AppResult<String> {
    let text = text.trim();
    if text.is_empty() {
        return Err(AppError::Validation("Text cannot be empty".to_string()));
    }
    if text.chars().count() > MAX_TEXT_LENGTH {
        return Err(AppError::PayloadTooLarge(format!(
            "Text too long, the maximum is {MAX_TEXT_LENGTH} characters"
        )));
    }
    Ok(text.to_string())
}

fn validate_range(field: &str, value: i64, min: i64, max: i64) -> AppResult<()> {
    if value < min || value > max {
        return Err(AppError::Validation(format!(
            "Parameter '{field}' out of range, expected {min} to {max}"
        )));
    }
    Ok(())
}

/// Wait for a pipeline task, converting deadline overruns and panics into
/// API errors. A timed-out worker is not interrupted; whatever it writes
/// afterwards is reclaimed by the artifact sweeper.
async fn with_deadline<T>(
    deadline: Duration,
    job: tokio::task::JoinHandle<AppResult<T>>,
) -> AppResult<T> {
    match tokio::time::timeout(deadline, job).await {
        Ok(Ok(result)) => result,
        Ok(Err(join_err)) => Err(AppError::Internal(format!(
            "synthesis task failed: {join_err}"
        ))),
        Err(_) => Err(AppError::Timeout(
            "Speech synthesis or fetch timed out".to_string(),
        )),
    }
}

fn artifact_filename(path: &Path) -> AppResult<String> {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string)
        .ok_or_else(|| {
            AppError::Internal(format!("artifact path has no filename: {}", path.display()))
        })
}

/// Streaming pipeline: synthesize, stage the intermediate, then either move
/// it into place or replace it with the pitch-shifted waveform. The
/// intermediate is removed on every exit path.
async fn run_edge_pipeline(
    state: Arc<AppState>,
    text: String,
    voice: String,
    rate: i64,
    volume: i64,
    pitch: i64,
    format: AudioFormat,
) -> AppResult<(String, AudioFormat)> {
    let needs_pitch_shift = pitch != 0;
    // PCM comes back whenever the waveform is post-processed or the caller
    // asked for WAV; plain MP3 requests pass the provider bytes through.
    let encoding = if needs_pitch_shift || format == AudioFormat::Wav {
        EdgeAudioEncoding::Riff24Khz16BitMonoPcm
    } else {
        EdgeAudioEncoding::Audio24Khz48KbitrateMonoMp3
    };
    let staged_format = match encoding {
        EdgeAudioEncoding::Audio24Khz48KbitrateMonoMp3 => AudioFormat::Mp3,
        EdgeAudioEncoding::Riff24Khz16BitMonoPcm => AudioFormat::Wav,
    };

    let params = EdgeSynthesisParams {
        text,
        voice,
        rate: signed_percent(rate),
        volume: signed_percent(volume),
        encoding,
    };
    let audio = state
        .edge
        .synthesize(&params)
        .await
        .map_err(|e| AppError::Upstream {
            status: 500,
            message: format!("Speech synthesis failed: {e}"),
        })?;

    let id = Uuid::new_v4().to_string();
    let staged = state.artifacts.reserve(&format!("temp_{id}"), staged_format);

    let outcome = async {
        state.artifacts.write(&staged, &audio).await?;
        if needs_pitch_shift {
            let shifted = state.pitch.shift_wav(&audio, semitones_for(pitch))?;
            let dest = state.artifacts.reserve(&id, AudioFormat::Wav);
            state.artifacts.write(&dest, &shifted).await?;
            Ok((artifact_filename(&dest)?, AudioFormat::Wav))
        } else {
            let dest = state.artifacts.reserve(&id, staged_format);
            state.artifacts.finalize(&staged, &dest).await?;
            Ok((artifact_filename(&dest)?, staged_format))
        }
    }
    .await;
    state.artifacts.discard(&staged).await;
    outcome
}

/// Cloud pipeline: synthesize and store. The provider returns final MP3, so
/// there is no staging step.
async fn run_azure_pipeline(
    state: Arc<AppState>,
    params: AzureSynthesisParams,
    region: String,
    api_key: String,
) -> AppResult<(String, AudioFormat)> {
    let audio = state
        .azure
        .synthesize(&params, &region, &api_key)
        .await
        .map_err(|e| AppError::Upstream {
            status: e.upstream_status(),
            message: format!("Cloud synthesis request failed: {e}"),
        })?;

    let id = Uuid::new_v4().to_string();
    let dest = state
        .artifacts
        .reserve(&format!("azure_{id}"), AudioFormat::Mp3);
    state.artifacts.write(&dest, &audio).await?;
    Ok((artifact_filename(&dest)?, AudioFormat::Mp3))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_text_trims() {
        assert_eq!(validate_text("  hello  ").unwrap(), "hello");
    }

    #[test]
    fn test_validate_text_rejects_blank() {
        for text in ["", "   ", "\n\t"] {
            assert!(matches!(
                validate_text(text).unwrap_err(),
                AppError::Validation(_)
            ));
        }
    }

    #[test]
    fn test_validate_text_length_is_counted_in_chars() {
        let ascii = "a".repeat(MAX_TEXT_LENGTH);
        assert!(validate_text(&ascii).is_ok());

        // Multi-byte characters count once each.
        let cjk = "语".repeat(MAX_TEXT_LENGTH);
        assert!(validate_text(&cjk).is_ok());

        let over = "a".repeat(MAX_TEXT_LENGTH + 1);
        assert!(matches!(
            validate_text(&over).unwrap_err(),
            AppError::PayloadTooLarge(_)
        ));
    }

    #[test]
    fn test_validate_range_bounds_inclusive() {
        assert!(validate_range("rate", -100, -100, 200).is_ok());
        assert!(validate_range("rate", 200, -100, 200).is_ok());
        assert!(validate_range("rate", 201, -100, 200).is_err());
        assert!(validate_range("rate", -101, -100, 200).is_err());
    }

    #[test]
    fn test_request_defaults() {
        let request: EdgeSynthesizeRequest = serde_json::from_str(r#"{"text": "hi"}"#).unwrap();
        assert_eq!(request.voice, DEFAULT_EDGE_VOICE);
        assert_eq!(request.format, "mp3");
        assert_eq!(request.rate, 0);
        assert_eq!(request.volume, 0);
        assert_eq!(request.pitch, 0);

        let request: AzureSynthesizeRequest = serde_json::from_str(r#"{"text": "hi"}"#).unwrap();
        assert_eq!(request.voice, DEFAULT_AZURE_VOICE);
        assert_eq!(request.style, "general");
        assert_eq!(request.region, DEFAULT_AZURE_REGION);
    }
}
