//! On-disk audio artifact store.
//!
//! Synthesized audio is written under a single flat directory and served
//! back by filename. Artifacts are transient: a background sweeper removes
//! anything older than the configured age, so callers must treat a served
//! URL as short-lived.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use bytes::Bytes;
use thiserror::Error;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, error, info, warn};

use super::AudioFormat;
use crate::core::sanitize;

/// Errors that can occur during artifact operations.
#[derive(Error, Debug)]
pub enum ArtifactError {
    /// The requested artifact does not exist (or was already swept).
    #[error("audio file not found")]
    NotFound,

    /// The artifact exists but its extension is not servable.
    #[error("unsupported audio format")]
    UnsupportedExtension,

    /// I/O error occurred during filesystem operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Filesystem store for synthesized audio.
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    /// Creates the store, ensuring the storage directory exists.
    pub async fn new(root: PathBuf) -> Result<Self, ArtifactError> {
        fs::create_dir_all(&root).await?;
        info!("Audio artifact store ready at {}", root.display());
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Reserve the path for an artifact id. Ids are generated internally
    /// (UUIDs, optionally prefixed), never taken from request input.
    pub fn reserve(&self, id: &str, format: AudioFormat) -> PathBuf {
        self.root.join(format!("{id}.{}", format.extension()))
    }

    /// Write artifact bytes atomically: temp file in the same directory,
    /// then rename into place.
    pub async fn write(&self, path: &Path, data: &[u8]) -> Result<(), ArtifactError> {
        let temp_path = path.with_extension("tmp");
        let mut file = fs::File::create(&temp_path).await?;
        file.write_all(data).await?;
        file.sync_all().await?;
        drop(file);

        fs::rename(&temp_path, path).await?;
        debug!("Wrote artifact {} ({} bytes)", path.display(), data.len());
        Ok(())
    }

    /// Move a finished intermediate artifact into its final place. The
    /// intermediate is removed even when the move fails.
    pub async fn finalize(&self, temp: &Path, dest: &Path) -> Result<(), ArtifactError> {
        if let Err(e) = fs::rename(temp, dest).await {
            self.discard(temp).await;
            return Err(e.into());
        }
        Ok(())
    }

    /// Remove an intermediate artifact. Files already gone are ignored;
    /// other failures are logged, not surfaced.
    pub async fn discard(&self, path: &Path) {
        match fs::remove_file(path).await {
            Ok(()) => debug!("Removed intermediate artifact {}", path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!("Failed to remove intermediate {}: {}", path.display(), e),
        }
    }

    /// Load an artifact for serving, returning its bytes and MIME type.
    ///
    /// The filename is sanitized and must resolve inside the store root.
    /// Existence is checked before the extension, so a traversal attempt or
    /// a swept file reports "not found" rather than "unsupported".
    pub async fn serve(&self, filename: &str) -> Result<(Bytes, &'static str), ArtifactError> {
        let path =
            sanitize::audio_path(&self.root, filename).ok_or(ArtifactError::NotFound)?;

        let metadata = match fs::metadata(&path).await {
            Ok(m) => m,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ArtifactError::NotFound);
            }
            Err(e) => return Err(e.into()),
        };
        if !metadata.is_file() {
            return Err(ArtifactError::NotFound);
        }

        let format = path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(AudioFormat::parse)
            .ok_or(ArtifactError::UnsupportedExtension)?;

        match fs::read(&path).await {
            Ok(data) => Ok((Bytes::from(data), format.mime())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(ArtifactError::NotFound),
            Err(e) => Err(e.into()),
        }
    }

    /// Delete artifacts older than `max_age`, returning how many were
    /// removed. Never fails: per-file errors are logged and the pass
    /// continues with the remaining entries.
    pub async fn sweep(&self, max_age: Duration) -> usize {
        self.sweep_at(SystemTime::now(), max_age).await
    }

    async fn sweep_at(&self, now: SystemTime, max_age: Duration) -> usize {
        info!("Starting cleanup pass over {}", self.root.display());
        let mut entries = match fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) => {
                error!("Cleanup could not read {}: {}", self.root.display(), e);
                return 0;
            }
        };

        let mut removed = 0;
        loop {
            let entry = match entries.next_entry().await {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                Err(e) => {
                    error!("Cleanup aborted while listing entries: {}", e);
                    break;
                }
            };

            let path = entry.path();
            let metadata = match entry.metadata().await {
                Ok(m) => m,
                Err(e) => {
                    warn!("Cleanup skipping {}: {}", path.display(), e);
                    continue;
                }
            };
            if !metadata.is_file() {
                continue;
            }

            let modified = match metadata.modified() {
                Ok(t) => t,
                Err(e) => {
                    warn!("Cleanup skipping {}: {}", path.display(), e);
                    continue;
                }
            };
            // Files with a timestamp in the future count as age zero.
            let age = now.duration_since(modified).unwrap_or_default();
            if age <= max_age {
                continue;
            }

            match fs::remove_file(&path).await {
                Ok(()) => {
                    info!("Removed aged artifact {}", path.display());
                    removed += 1;
                }
                Err(e) => warn!("Cleanup failed to remove {}: {}", path.display(), e),
            }
        }

        info!("Cleanup pass finished, removed {} artifacts", removed);
        removed
    }
}

/// Periodic sweep loop, spawned once at startup. Runs a pass immediately,
/// then one per interval.
pub async fn run_sweeper(store: Arc<ArtifactStore>, interval: Duration, max_age: Duration) {
    info!(
        "Artifact sweeper running every {}s, max age {}s",
        interval.as_secs(),
        max_age.as_secs()
    );
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    loop {
        ticker.tick().await;
        store.sweep(max_age).await;
    }
}
