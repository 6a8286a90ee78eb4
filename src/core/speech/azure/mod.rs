//! Cloud speech service adapter (per-request subscription key).

pub mod config;
pub mod provider;

pub use config::{
    AZURE_OUTPUT_FORMAT, AzureConfig, DEFAULT_AZURE_REGION, DEFAULT_AZURE_VOICE,
    SUBSCRIPTION_KEY_HEADER,
};
pub use provider::{AzureSpeech, AzureSynthesisParams};
