//! Streaming speech service adapter (no credentials required).

pub mod config;
pub mod provider;

pub use config::{DEFAULT_EDGE_VOICE, EdgeAudioEncoding, EdgeConfig};
pub use provider::{EdgeSpeech, EdgeSynthesisParams};
