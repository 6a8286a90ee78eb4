//! Shared types and helpers for speech provider adapters.

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// HTTP header selecting the synthesis output format.
pub const OUTPUT_FORMAT_HEADER: &str = "X-Microsoft-OutputFormat";

/// User-Agent sent with provider requests.
pub const USER_AGENT: &str = "voxrelay";

/// Timeout for voice catalog requests.
pub const VOICES_TIMEOUT: Duration = Duration::from_secs(15);

/// Timeout for a single upstream synthesis request.
pub const SYNTHESIS_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors raised by provider adapters.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// The request never produced a response (connect failure, timeout).
    #[error("request failed: {0}")]
    Network(String),

    /// The provider answered with a non-success status.
    #[error("upstream returned {status}: {detail}")]
    Upstream { status: u16, detail: String },

    /// The provider answered 2xx but the body was not what we expected.
    #[error("invalid response body: {0}")]
    InvalidResponse(String),
}

/// Result type for provider operations.
pub type ProviderResult<T> = std::result::Result<T, ProviderError>;

impl ProviderError {
    /// Status code to relay to the client; transport-level failures map
    /// to 500.
    pub fn upstream_status(&self) -> u16 {
        match self {
            ProviderError::Upstream { status, .. } => *status,
            _ => 500,
        }
    }

    /// Build an error from a non-success provider response, pulling the
    /// human-readable message out of the body when one is present.
    pub async fn from_response(response: reqwest::Response) -> Self {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        let detail = upstream_detail(&body)
            .unwrap_or_else(|| body.chars().take(200).collect::<String>());
        ProviderError::Upstream { status, detail }
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        ProviderError::Network(err.to_string())
    }
}

/// Extract the `error.message` field from a provider error body, if the
/// body is JSON of that shape.
fn upstream_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("error")?
        .get("message")?
        .as_str()
        .map(str::to_string)
}

/// One entry of a provider voice catalog.
///
/// Only the fields the server inspects are typed; everything else the
/// provider sends (display name, gender, style list, ...) is carried in
/// `extra` and serialized back to clients untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct VoiceInfo {
    pub short_name: String,
    pub locale: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Format a signed percentage the way provider SSML expects: always with
/// an explicit sign, `+0%` included.
///
/// # Example
/// ```rust
/// use voxrelay::core::speech::base::signed_percent;
///
/// assert_eq!(signed_percent(0), "+0%");
/// assert_eq!(signed_percent(25), "+25%");
/// assert_eq!(signed_percent(-40), "-40%");
/// ```
pub fn signed_percent(value: i64) -> String {
    format!("{value:+}%")
}

/// Escapes special XML characters in text for use in SSML.
///
/// Replaces the following characters:
/// - `&` → `&amp;`
/// - `<` → `&lt;`
/// - `>` → `&gt;`
/// - `"` → `&quot;`
/// - `'` → `&apos;`
pub fn escape_xml(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&apos;"),
            _ => result.push(c),
        }
    }
    result
}

// A locale prefix is exactly `xx-XX-` at the start of the voice name; the
// trailing dash separates it from the voice segment proper.
static LOCALE_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([a-z]{2}-[A-Z]{2})-")
        .unwrap_or_else(|e| panic!("invalid locale pattern: {e}"))
});

/// Derive the BCP-47 language code from a voice name like
/// `zh-CN-XiaoxiaoNeural`. Falls back to `en-US` when the name does not
/// start with a lowercase-language, uppercase-region prefix.
pub fn language_code(voice_name: &str) -> String {
    const DEFAULT_LANGUAGE: &str = "en-US";

    LOCALE_PREFIX
        .captures(voice_name)
        .map(|caps| caps[1].to_string())
        .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signed_percent() {
        assert_eq!(signed_percent(0), "+0%");
        assert_eq!(signed_percent(150), "+150%");
        assert_eq!(signed_percent(-100), "-100%");
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("plain text"), "plain text");
        assert_eq!(escape_xml("a & b"), "a &amp; b");
        assert_eq!(
            escape_xml("<voice name=\"x\">'hi'</voice>"),
            "&lt;voice name=&quot;x&quot;&gt;&apos;hi&apos;&lt;/voice&gt;"
        );
    }

    #[test]
    fn test_language_code_extraction() {
        assert_eq!(language_code("zh-CN-XiaoxiaoNeural"), "zh-CN");
        assert_eq!(language_code("en-US-JennyNeural"), "en-US");
        assert_eq!(language_code("de-DE-KatjaNeural"), "de-DE");
    }

    #[test]
    fn test_language_code_fallback() {
        assert_eq!(language_code(""), "en-US");
        assert_eq!(language_code("justaname"), "en-US");
        assert_eq!(language_code("zh-hans-something"), "en-US");
        // A bare locale with no voice segment behind it does not count,
        // and neither do over-long or uppercase language parts.
        assert_eq!(language_code("zh-CN"), "en-US");
        assert_eq!(language_code("ZH-CN-Foo"), "en-US");
        assert_eq!(language_code("zhh-CN-Foo"), "en-US");
    }

    #[test]
    fn test_upstream_detail_extraction() {
        let body = r#"{"error": {"message": "quota exceeded", "code": 429}}"#;
        assert_eq!(upstream_detail(body).as_deref(), Some("quota exceeded"));

        assert_eq!(upstream_detail("plain text error"), None);
        assert_eq!(upstream_detail(r#"{"error": "flat"}"#), None);
        assert_eq!(upstream_detail(""), None);
    }

    #[test]
    fn test_voice_info_passthrough_round_trip() {
        let raw = r#"{
            "Name": "Microsoft Server Speech Text to Speech Voice (zh-CN, XiaoxiaoNeural)",
            "ShortName": "zh-CN-XiaoxiaoNeural",
            "Gender": "Female",
            "Locale": "zh-CN"
        }"#;
        let voice: VoiceInfo = serde_json::from_str(raw).unwrap();
        assert_eq!(voice.short_name, "zh-CN-XiaoxiaoNeural");
        assert_eq!(voice.locale, "zh-CN");
        assert_eq!(
            voice.extra.get("Gender").and_then(|v| v.as_str()),
            Some("Female")
        );

        let back = serde_json::to_value(&voice).unwrap();
        assert_eq!(back.get("ShortName").and_then(|v| v.as_str()), Some("zh-CN-XiaoxiaoNeural"));
        assert_eq!(back.get("Gender").and_then(|v| v.as_str()), Some("Female"));
        assert!(back.get("Name").is_some());
    }

    #[test]
    fn test_provider_error_status() {
        let err = ProviderError::Upstream {
            status: 401,
            detail: "denied".into(),
        };
        assert_eq!(err.upstream_status(), 401);
        assert_eq!(ProviderError::Network("down".into()).upstream_status(), 500);
    }
}
