//! Filesystem-backed preset storage.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};

use super::{PresetBackend, PresetError, PresetParams, PresetSummary, ProviderKind};
use crate::core::sanitize;

/// Stores each preset as `{prefix}{sanitized_name}.json` under one
/// directory.
pub struct FilesystemPresetStore {
    root: PathBuf,
}

impl FilesystemPresetStore {
    /// Creates the store, ensuring the preset directory exists.
    pub async fn new(root: PathBuf) -> Result<Self, PresetError> {
        fs::create_dir_all(&root).await?;
        info!("Preset store ready at {}", root.display());
        Ok(Self { root })
    }

    fn path_for(&self, kind: ProviderKind, name: &str) -> PathBuf {
        self.root
            .join(sanitize::preset_filename(kind.preset_prefix(), name))
    }

    fn trimmed(name: &str) -> Result<&str, PresetError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(PresetError::EmptyName);
        }
        Ok(trimmed)
    }
}

#[async_trait]
impl PresetBackend for FilesystemPresetStore {
    async fn save(
        &self,
        kind: ProviderKind,
        name: &str,
        params: &PresetParams,
    ) -> Result<(), PresetError> {
        let name = Self::trimmed(name)?;
        let path = self.path_for(kind, name);
        let json = serde_json::to_vec_pretty(params)?;

        // Atomic write using temp file
        let temp_path = path.with_extension("tmp");
        let mut file = fs::File::create(&temp_path).await?;
        file.write_all(&json).await?;
        file.sync_all().await?;
        drop(file);
        fs::rename(&temp_path, &path).await?;

        info!("Saved {} preset '{}' to {}", kind.as_str(), name, path.display());
        Ok(())
    }

    async fn get(&self, kind: ProviderKind, name: &str) -> Result<PresetParams, PresetError> {
        let name = Self::trimmed(name)?;
        let path = self.path_for(kind, name);
        let data = match fs::read(&path).await {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(PresetError::NotFound);
            }
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_slice(&data)?)
    }

    async fn list(&self, kind: ProviderKind) -> Result<Vec<PresetSummary>, PresetError> {
        let prefix = kind.preset_prefix();
        let mut entries = fs::read_dir(&self.root).await?;
        let mut presets = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            let filename = entry.file_name();
            let Some(filename) = filename.to_str() else {
                continue;
            };
            let Some(stem) = filename
                .strip_prefix(prefix)
                .and_then(|rest| rest.strip_suffix(".json"))
            else {
                continue;
            };

            let params: PresetParams = match fs::read(entry.path()).await {
                Ok(data) => match serde_json::from_slice(&data) {
                    Ok(params) => params,
                    Err(e) => {
                        warn!("Skipping unreadable preset {}: {}", filename, e);
                        continue;
                    }
                },
                Err(e) => {
                    warn!("Skipping unreadable preset {}: {}", filename, e);
                    continue;
                }
            };

            let style = match kind {
                ProviderKind::Edge => None,
                ProviderKind::Azure => {
                    Some(params.style.unwrap_or_else(|| "general".to_string()))
                }
            };
            presets.push(PresetSummary {
                name: stem.to_string(),
                voice: params.voice,
                style,
            });
        }

        presets.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(presets)
    }

    async fn delete(&self, kind: ProviderKind, name: &str) -> Result<(), PresetError> {
        let name = Self::trimmed(name)?;
        let path = self.path_for(kind, name);
        match fs::remove_file(&path).await {
            Ok(()) => {
                info!("Deleted {} preset '{}'", kind.as_str(), name);
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(PresetError::NotFound),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn test_store() -> (FilesystemPresetStore, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = FilesystemPresetStore::new(dir.path().to_path_buf())
            .await
            .unwrap();
        (store, dir)
    }

    fn edge_params(voice: &str) -> PresetParams {
        PresetParams {
            voice: voice.to_string(),
            rate: 10,
            volume: -5,
            pitch: 3,
            style: None,
        }
    }

    fn azure_params(voice: &str, style: &str) -> PresetParams {
        PresetParams {
            voice: voice.to_string(),
            rate: 0,
            volume: 0,
            pitch: 0,
            style: Some(style.to_string()),
        }
    }

    #[tokio::test]
    async fn test_save_and_get_round_trip() {
        let (store, _dir) = test_store().await;
        let params = edge_params("zh-CN-XiaoxiaoNeural");
        store
            .save(ProviderKind::Edge, "morning", &params)
            .await
            .unwrap();

        let loaded = store.get(ProviderKind::Edge, "morning").await.unwrap();
        assert_eq!(loaded, params);
    }

    #[tokio::test]
    async fn test_get_missing_preset() {
        let (store, _dir) = test_store().await;
        let err = store.get(ProviderKind::Edge, "ghost").await.unwrap_err();
        assert!(matches!(err, PresetError::NotFound));
    }

    #[tokio::test]
    async fn test_empty_name_rejected() {
        let (store, _dir) = test_store().await;
        let params = edge_params("v");
        for name in ["", "   ", "\t\n"] {
            let err = store
                .save(ProviderKind::Edge, name, &params)
                .await
                .unwrap_err();
            assert!(matches!(err, PresetError::EmptyName));
            let err = store.delete(ProviderKind::Edge, name).await.unwrap_err();
            assert!(matches!(err, PresetError::EmptyName));
        }
    }

    #[tokio::test]
    async fn test_namespaces_do_not_collide() {
        let (store, _dir) = test_store().await;
        store
            .save(ProviderKind::Edge, "shared", &edge_params("edge-voice"))
            .await
            .unwrap();
        store
            .save(
                ProviderKind::Azure,
                "shared",
                &azure_params("azure-voice", "cheerful"),
            )
            .await
            .unwrap();

        let edge = store.get(ProviderKind::Edge, "shared").await.unwrap();
        let azure = store.get(ProviderKind::Azure, "shared").await.unwrap();
        assert_eq!(edge.voice, "edge-voice");
        assert_eq!(azure.voice, "azure-voice");

        let edge_list = store.list(ProviderKind::Edge).await.unwrap();
        assert_eq!(edge_list.len(), 1);
        assert!(edge_list[0].style.is_none());

        let azure_list = store.list(ProviderKind::Azure).await.unwrap();
        assert_eq!(azure_list.len(), 1);
        assert_eq!(azure_list[0].style.as_deref(), Some("cheerful"));
    }

    #[tokio::test]
    async fn test_colliding_names_last_writer_wins() {
        let (store, _dir) = test_store().await;
        // Both names sanitize to the same stem.
        store
            .save(ProviderKind::Edge, "a/b", &edge_params("first"))
            .await
            .unwrap();
        store
            .save(ProviderKind::Edge, "a:b", &edge_params("second"))
            .await
            .unwrap();

        let list = store.list(ProviderKind::Edge).await.unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].voice, "second");
    }

    #[tokio::test]
    async fn test_list_sorted_and_skips_broken_files() {
        let (store, dir) = test_store().await;
        store
            .save(ProviderKind::Edge, "bravo", &edge_params("v2"))
            .await
            .unwrap();
        store
            .save(ProviderKind::Edge, "alpha", &edge_params("v1"))
            .await
            .unwrap();
        fs::write(dir.path().join("edge_broken.json"), b"{not json")
            .await
            .unwrap();
        fs::write(dir.path().join("unrelated.txt"), b"ignored")
            .await
            .unwrap();

        let list = store.list(ProviderKind::Edge).await.unwrap();
        let names: Vec<&str> = list.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "bravo"]);
    }

    #[tokio::test]
    async fn test_delete_preset() {
        let (store, _dir) = test_store().await;
        store
            .save(ProviderKind::Azure, "temp", &azure_params("v", "general"))
            .await
            .unwrap();
        store.delete(ProviderKind::Azure, "temp").await.unwrap();

        let err = store.get(ProviderKind::Azure, "temp").await.unwrap_err();
        assert!(matches!(err, PresetError::NotFound));

        let err = store.delete(ProviderKind::Azure, "temp").await.unwrap_err();
        assert!(matches!(err, PresetError::NotFound));
    }

    #[tokio::test]
    async fn test_unicode_preset_names() {
        let (store, _dir) = test_store().await;
        store
            .save(ProviderKind::Edge, "早安问候", &edge_params("zh"))
            .await
            .unwrap();
        let loaded = store.get(ProviderKind::Edge, "早安问候").await.unwrap();
        assert_eq!(loaded.voice, "zh");

        let list = store.list(ProviderKind::Edge).await.unwrap();
        assert_eq!(list[0].name, "早安问候");
    }

    #[tokio::test]
    async fn test_azure_style_defaults_in_listing() {
        let (store, dir) = test_store().await;
        // A hand-written document without a style field.
        fs::write(
            dir.path().join("azure_legacy.json"),
            br#"{"voice": "en-US-JennyNeural", "rate": 0, "volume": 0, "pitch": 0}"#,
        )
        .await
        .unwrap();

        let list = store.list(ProviderKind::Azure).await.unwrap();
        assert_eq!(list[0].style.as_deref(), Some("general"));
    }
}
