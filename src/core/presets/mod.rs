//! Voice preset persistence.
//!
//! Presets capture a reusable set of synthesis parameters per provider.
//! Storage hides behind [`PresetBackend`] so handlers never touch the
//! filesystem layout directly; the shipped backend keeps one JSON document
//! per preset.

pub mod store;

pub use store::FilesystemPresetStore;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Provider namespace a preset belongs to. Both namespaces share one
/// directory; the filename prefix keeps them apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Edge,
    Azure,
}

impl ProviderKind {
    pub fn preset_prefix(&self) -> &'static str {
        match self {
            ProviderKind::Edge => "edge_",
            ProviderKind::Azure => "azure_",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Edge => "edge",
            ProviderKind::Azure => "azure",
        }
    }
}

/// Errors that can occur during preset operations.
#[derive(Error, Debug)]
pub enum PresetError {
    /// The preset name is empty after trimming.
    #[error("preset name is empty")]
    EmptyName,

    /// No preset stored under the requested name.
    #[error("preset not found")]
    NotFound,

    /// I/O error occurred during filesystem operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Stored preset parameters.
///
/// Missing fields deserialize to their zero values so documents written by
/// older versions (or edited by hand) still load. `style` only exists for
/// cloud presets and is omitted from streaming preset documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresetParams {
    #[serde(default)]
    pub voice: String,
    #[serde(default)]
    pub rate: i64,
    #[serde(default)]
    pub volume: i64,
    #[serde(default)]
    pub pitch: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
}

/// Listing entry: the stored (sanitized) preset name plus headline fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PresetSummary {
    pub name: String,
    pub voice: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
}

/// Trait defining the interface for preset storage backends.
#[async_trait]
pub trait PresetBackend: Send + Sync {
    /// Persist a preset under its sanitized name. Names that sanitize to
    /// the same stem overwrite each other (last writer wins).
    async fn save(
        &self,
        kind: ProviderKind,
        name: &str,
        params: &PresetParams,
    ) -> Result<(), PresetError>;

    /// Fetch a preset by name.
    async fn get(&self, kind: ProviderKind, name: &str) -> Result<PresetParams, PresetError>;

    /// List all presets in a namespace, sorted by name.
    async fn list(&self, kind: ProviderKind) -> Result<Vec<PresetSummary>, PresetError>;

    /// Delete a preset by name.
    async fn delete(&self, kind: ProviderKind, name: &str) -> Result<(), PresetError>;
}
