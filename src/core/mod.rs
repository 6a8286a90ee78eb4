pub mod artifacts;
pub mod presets;
pub mod rate_limit;
pub mod sanitize;
pub mod speech;

// Re-export commonly used types for convenience
pub use artifacts::{ArtifactStore, AudioFormat, PitchShifter, VarispeedShifter};
pub use presets::{FilesystemPresetStore, PresetBackend, PresetParams, ProviderKind};
pub use rate_limit::RateLimiter;
pub use speech::{AzureSpeech, EdgeSpeech, VoiceInfo};
