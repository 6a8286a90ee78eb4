//! Speech provider adapters.
//!
//! Two providers back the synthesis API: a streaming service that needs no
//! credentials (`edge`) and a subscription cloud service authenticated per
//! request (`azure`). Both speak SSML over REST and return raw audio bytes;
//! everything provider-specific stays inside the respective submodule.

pub mod azure;
pub mod base;
pub mod edge;

pub use azure::{AzureConfig, AzureSpeech, AzureSynthesisParams};
pub use base::{ProviderError, ProviderResult, VoiceInfo};
pub use edge::{EdgeAudioEncoding, EdgeConfig, EdgeSpeech, EdgeSynthesisParams};
