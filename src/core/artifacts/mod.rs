//! Audio artifact handling: on-disk storage, lifecycle sweeping, and
//! post-synthesis pitch processing.

pub mod pitch;
pub mod store;

pub use pitch::{PitchError, PitchShifter, VarispeedShifter, semitones_for};
pub use store::{ArtifactError, ArtifactStore, run_sweeper};

/// Audio container formats the server produces and serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    Mp3,
    Wav,
}

impl AudioFormat {
    /// Parse a client-supplied format token. Only the exact lowercase
    /// tokens are accepted.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "mp3" => Some(AudioFormat::Mp3),
            "wav" => Some(AudioFormat::Wav),
            _ => None,
        }
    }

    /// File extension without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "mp3",
            AudioFormat::Wav => "wav",
        }
    }

    /// MIME type used when serving artifacts of this format.
    pub fn mime(&self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "audio/mpeg",
            AudioFormat::Wav => "audio/wav",
        }
    }
}

impl std::fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_known_tokens() {
        assert_eq!(AudioFormat::parse("mp3"), Some(AudioFormat::Mp3));
        assert_eq!(AudioFormat::parse("wav"), Some(AudioFormat::Wav));
    }

    #[test]
    fn test_parse_rejects_everything_else() {
        assert_eq!(AudioFormat::parse("ogg"), None);
        assert_eq!(AudioFormat::parse("MP3"), None);
        assert_eq!(AudioFormat::parse(" mp3"), None);
        assert_eq!(AudioFormat::parse(""), None);
    }

    #[test]
    fn test_mime_types() {
        assert_eq!(AudioFormat::Mp3.mime(), "audio/mpeg");
        assert_eq!(AudioFormat::Wav.mime(), "audio/wav");
    }

    #[test]
    fn test_display_matches_extension() {
        assert_eq!(AudioFormat::Mp3.to_string(), "mp3");
        assert_eq!(AudioFormat::Wav.to_string(), "wav");
    }
}
