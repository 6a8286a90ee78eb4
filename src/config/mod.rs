//! Configuration module for the voxrelay server
//!
//! All configuration comes from environment variables (optionally via a
//! `.env` file), with defaults suitable for local development so the server
//! starts with no configuration at all.
//!
//! # Example
//! ```rust,no_run
//! use voxrelay::config::ServerConfig;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ServerConfig::from_env()?;
//! println!("Server listening on {}", config.address());
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;

mod env;

/// Server configuration
///
/// Contains all configuration needed to run the voxrelay server, including:
/// - Server settings (host, port)
/// - Audio artifact storage and cleanup policy
/// - Preset storage location
/// - Speech provider endpoints and the synthesis deadline
#[derive(Debug, Clone)]
pub struct ServerConfig {
    // Server settings
    pub host: String,
    pub port: u16,

    // Audio artifact storage
    pub audio_dir: PathBuf,
    pub max_file_age_secs: u64,
    pub cleanup_interval_secs: u64,

    // Preset storage
    pub presets_dir: PathBuf,

    // Speech providers
    pub edge_endpoint: String,
    pub azure_endpoint: Option<String>, // if None, derive from the per-request region
    pub synthesis_timeout_secs: u64,
}

impl ServerConfig {
    /// Get the server address as a string in "host:port" format
    ///
    /// # Example
    /// ```rust
    /// use voxrelay::config::ServerConfig;
    /// use std::path::PathBuf;
    ///
    /// let config = ServerConfig {
    ///     host: "127.0.0.1".to_string(),
    ///     port: 5000,
    ///     audio_dir: PathBuf::from("/tmp/tts_audio"),
    ///     max_file_age_secs: 3600,
    ///     cleanup_interval_secs: 3600,
    ///     presets_dir: PathBuf::from("presets"),
    ///     edge_endpoint: "https://speech.example.com/readaloud".to_string(),
    ///     azure_endpoint: None,
    ///     synthesis_timeout_secs: 60,
    /// };
    /// assert_eq!(config.address(), "127.0.0.1:5000");
    /// ```
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> ServerConfig {
        ServerConfig {
            host: "0.0.0.0".to_string(),
            port: 8080,
            audio_dir: PathBuf::from("/tmp/audio"),
            max_file_age_secs: 7200,
            cleanup_interval_secs: 1800,
            presets_dir: PathBuf::from("presets"),
            edge_endpoint: "https://speech.example.com/readaloud".to_string(),
            azure_endpoint: Some("https://azure.example.com".to_string()),
            synthesis_timeout_secs: 30,
        }
    }

    #[test]
    fn test_address_format() {
        let config = test_config();
        assert_eq!(config.address(), "0.0.0.0:8080");
    }

    #[test]
    fn test_config_clone() {
        let config = test_config();
        let cloned = config.clone();
        assert_eq!(cloned.port, config.port);
        assert_eq!(cloned.audio_dir, config.audio_dir);
        assert_eq!(cloned.azure_endpoint, config.azure_endpoint);
    }
}
