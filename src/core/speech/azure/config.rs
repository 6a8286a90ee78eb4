//! Configuration and SSML generation for the cloud speech service.
//!
//! The cloud service uses regional endpoints in the format
//! `https://{region}.tts.speech.microsoft.com/...`; the region and the
//! subscription key both arrive with each request rather than living in
//! server configuration.

use crate::core::speech::base::{escape_xml, language_code};

/// HTTP header carrying the subscription key.
pub const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";

/// Host suffix of the regional endpoints.
pub const AZURE_HOST_SUFFIX: &str = "tts.speech.microsoft.com";

/// Output format requested for every cloud synthesis.
pub const AZURE_OUTPUT_FORMAT: &str = "audio-24khz-48kbitrate-mono-mp3";

/// Region used when a request does not name one.
pub const DEFAULT_AZURE_REGION: &str = "eastus";

/// Voice used when a request does not name one.
pub const DEFAULT_AZURE_VOICE: &str = "zh-CN-XiaoxiaoNeural";

// =============================================================================
// Endpoint Configuration
// =============================================================================

/// Configuration for the cloud speech service.
#[derive(Debug, Clone, Default)]
pub struct AzureConfig {
    /// Fixed base URL that bypasses regional endpoint construction.
    /// Mainly for tests and proxies; `None` in normal operation.
    pub endpoint_override: Option<String>,
}

impl AzureConfig {
    pub fn new(endpoint_override: Option<String>) -> Self {
        Self { endpoint_override }
    }

    fn base_url(&self, region: &str) -> String {
        match &self.endpoint_override {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("https://{region}.{AZURE_HOST_SUFFIX}"),
        }
    }

    /// URL of the regional voice catalog.
    pub fn voices_url(&self, region: &str) -> String {
        format!("{}/cognitiveservices/voices/list", self.base_url(region))
    }

    /// URL of the regional synthesis endpoint.
    pub fn synthesis_url(&self, region: &str) -> String {
        format!("{}/cognitiveservices/v1", self.base_url(region))
    }
}

// =============================================================================
// SSML Generation
// =============================================================================

/// Builds an SSML document for cloud synthesis.
///
/// Rate, pitch, and volume are percent offsets on a prosody element
/// wrapping the text; positive values carry no sign. A speaking style
/// other than `general` wraps the text itself in an `mstts:express-as`
/// element inside the prosody; the default style adds no wrapper because
/// not every voice accepts one.
pub fn build_ssml(
    text: &str,
    voice_name: &str,
    style: &str,
    rate: i64,
    pitch: i64,
    volume: i64,
) -> String {
    let language = language_code(voice_name);
    let escaped_text = escape_xml(text);

    let inner_content = if !style.is_empty() && !style.eq_ignore_ascii_case("general") {
        format!(
            "<mstts:express-as style='{}'>{escaped_text}</mstts:express-as>",
            escape_xml(style)
        )
    } else {
        escaped_text
    };

    format!(
        r#"<speak version='1.0' xmlns='http://www.w3.org/2001/10/synthesis' xmlns:mstts='http://www.w3.org/2001/mstts' xml:lang='{language}'>
    <voice name='{voice_name}'>
        <prosody rate='{rate}%' pitch='{pitch}%' volume='{volume}%'>{inner_content}</prosody>
    </voice>
</speak>"#,
    )
}
