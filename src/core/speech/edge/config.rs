//! Configuration and SSML generation for the streaming speech service.

use crate::core::speech::base::{escape_xml, language_code};

/// Voice used when a request does not name one.
pub const DEFAULT_EDGE_VOICE: &str = "zh-CN-XiaoxiaoNeural";

// =============================================================================
// Audio Encoding
// =============================================================================

/// Output formats requested from the streaming service.
///
/// These map to `X-Microsoft-OutputFormat` header values. MP3 is the default;
/// the RIFF PCM format is requested whenever the pipeline needs to
/// post-process the waveform (pitch adjustment) or the caller asked for a
/// WAV artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EdgeAudioEncoding {
    /// 24kHz, 48kbps MP3 mono
    #[default]
    Audio24Khz48KbitrateMonoMp3,
    /// 24kHz, 16-bit PCM mono in a RIFF container
    Riff24Khz16BitMonoPcm,
}

impl EdgeAudioEncoding {
    /// Returns the API format string for the `X-Microsoft-OutputFormat` header.
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Audio24Khz48KbitrateMonoMp3 => "audio-24khz-48kbitrate-mono-mp3",
            Self::Riff24Khz16BitMonoPcm => "riff-24khz-16bit-mono-pcm",
        }
    }
}

// =============================================================================
// Endpoint Configuration
// =============================================================================

/// Configuration for the streaming speech service.
#[derive(Debug, Clone)]
pub struct EdgeConfig {
    /// Base URL of the service; configurable so tests and proxies can
    /// point the adapter elsewhere.
    pub endpoint: String,
}

impl EdgeConfig {
    pub fn new(endpoint: String) -> Self {
        Self { endpoint }
    }

    /// URL of the voice catalog.
    pub fn voices_url(&self) -> String {
        format!("{}/voices/list", self.endpoint.trim_end_matches('/'))
    }

    /// URL of the synthesis endpoint.
    pub fn synthesis_url(&self) -> String {
        format!("{}/v1", self.endpoint.trim_end_matches('/'))
    }
}

// =============================================================================
// SSML Generation
// =============================================================================

/// Builds the SSML document for a streaming synthesis request.
///
/// Rate and volume must already be formatted as signed percent strings.
/// Pitch is pinned to `+0Hz` here: pitch adjustments happen after synthesis,
/// on the returned waveform.
pub fn build_ssml(text: &str, voice_name: &str, rate: &str, volume: &str) -> String {
    let language = language_code(voice_name);
    let escaped_text = escape_xml(text);

    format!(
        r#"<speak version='1.0' xmlns='http://www.w3.org/2001/10/synthesis' xml:lang='{language}'>
    <voice name='{voice_name}'>
        <prosody pitch='+0Hz' rate='{rate}' volume='{volume}'>
            {escaped_text}
        </prosody>
    </voice>
</speak>"#,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encoding_strings() {
        assert_eq!(
            EdgeAudioEncoding::Audio24Khz48KbitrateMonoMp3.as_str(),
            "audio-24khz-48kbitrate-mono-mp3"
        );
        assert_eq!(
            EdgeAudioEncoding::Riff24Khz16BitMonoPcm.as_str(),
            "riff-24khz-16bit-mono-pcm"
        );
        assert_eq!(
            EdgeAudioEncoding::default(),
            EdgeAudioEncoding::Audio24Khz48KbitrateMonoMp3
        );
    }

    #[test]
    fn test_url_building() {
        let config = EdgeConfig::new("https://speech.example.com/readaloud".to_string());
        assert_eq!(
            config.voices_url(),
            "https://speech.example.com/readaloud/voices/list"
        );
        assert_eq!(
            config.synthesis_url(),
            "https://speech.example.com/readaloud/v1"
        );

        // Trailing slashes collapse instead of doubling.
        let config = EdgeConfig::new("http://localhost:9999/".to_string());
        assert_eq!(config.voices_url(), "http://localhost:9999/voices/list");
    }

    #[test]
    fn test_ssml_structure() {
        let ssml = build_ssml("你好", "zh-CN-XiaoxiaoNeural", "+10%", "-5%");
        assert!(ssml.contains("xml:lang='zh-CN'"));
        assert!(ssml.contains("<voice name='zh-CN-XiaoxiaoNeural'>"));
        assert!(ssml.contains("rate='+10%'"));
        assert!(ssml.contains("volume='-5%'"));
        assert!(ssml.contains("pitch='+0Hz'"));
        assert!(ssml.contains("你好"));
    }

    #[test]
    fn test_ssml_escapes_text() {
        let ssml = build_ssml("a < b & c", "en-US-JennyNeural", "+0%", "+0%");
        assert!(ssml.contains("a &lt; b &amp; c"));
        assert!(!ssml.contains("a < b"));
    }

    #[test]
    fn test_ssml_defaults_language_for_odd_voice_names() {
        let ssml = build_ssml("hi", "customvoice", "+0%", "+0%");
        assert!(ssml.contains("xml:lang='en-US'"));
    }
}
