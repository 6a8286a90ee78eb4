use std::env;
use std::path::PathBuf;

use super::ServerConfig;

/// Default base URL of the streaming speech service.
pub const DEFAULT_EDGE_ENDPOINT: &str =
    "https://speech.platform.bing.com/consumer/speech/synthesize/readaloud";

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// Reads configuration from environment variables, with sensible defaults.
    /// Also loads from .env file if present using dotenvy.
    ///
    /// # Returns
    /// * `Result<Self, Box<dyn std::error::Error>>` - The loaded configuration or an error
    ///
    /// # Errors
    /// Returns an error if a numeric variable (port, timeouts, cleanup
    /// settings) is present but malformed.
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        // Load .env file if it exists
        let _ = dotenvy::dotenv();

        // Server configuration
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "5000".to_string())
            .parse::<u16>()
            .map_err(|e| format!("Invalid port number: {e}"))?;

        // Audio artifact storage and cleanup policy
        let audio_dir = env::var("AUDIO_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| env::temp_dir().join("tts_audio"));
        let max_file_age_secs = env::var("MAX_FILE_AGE_SECS")
            .unwrap_or_else(|_| "3600".to_string())
            .parse::<u64>()
            .map_err(|e| format!("Invalid MAX_FILE_AGE_SECS: {e}"))?;
        let cleanup_interval_secs = env::var("CLEANUP_INTERVAL_SECS")
            .unwrap_or_else(|_| "3600".to_string())
            .parse::<u64>()
            .map_err(|e| format!("Invalid CLEANUP_INTERVAL_SECS: {e}"))?;

        // Preset storage
        let presets_dir = env::var("PRESETS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("presets"));

        // Speech providers
        let edge_endpoint =
            env::var("EDGE_TTS_ENDPOINT").unwrap_or_else(|_| DEFAULT_EDGE_ENDPOINT.to_string());
        let azure_endpoint = env::var("AZURE_TTS_ENDPOINT").ok();
        let synthesis_timeout_secs = env::var("SYNTHESIS_TIMEOUT_SECS")
            .unwrap_or_else(|_| "60".to_string())
            .parse::<u64>()
            .map_err(|e| format!("Invalid SYNTHESIS_TIMEOUT_SECS: {e}"))?;

        Ok(ServerConfig {
            host,
            port,
            audio_dir,
            max_file_age_secs,
            cleanup_interval_secs,
            presets_dir,
            edge_endpoint,
            azure_endpoint,
            synthesis_timeout_secs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    // Helper to clean up environment variables after tests
    fn cleanup_env_vars() {
        unsafe {
            env::remove_var("HOST");
            env::remove_var("PORT");
            env::remove_var("AUDIO_DIR");
            env::remove_var("MAX_FILE_AGE_SECS");
            env::remove_var("CLEANUP_INTERVAL_SECS");
            env::remove_var("PRESETS_DIR");
            env::remove_var("EDGE_TTS_ENDPOINT");
            env::remove_var("AZURE_TTS_ENDPOINT");
            env::remove_var("SYNTHESIS_TIMEOUT_SECS");
        }
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        cleanup_env_vars();

        let config = ServerConfig::from_env().expect("Should load config");
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 5000);
        assert_eq!(config.audio_dir, env::temp_dir().join("tts_audio"));
        assert_eq!(config.max_file_age_secs, 3600);
        assert_eq!(config.cleanup_interval_secs, 3600);
        assert_eq!(config.presets_dir, PathBuf::from("presets"));
        assert_eq!(config.edge_endpoint, DEFAULT_EDGE_ENDPOINT);
        assert!(config.azure_endpoint.is_none());
        assert_eq!(config.synthesis_timeout_secs, 60);

        cleanup_env_vars();
    }

    #[test]
    #[serial]
    fn test_from_env_overrides() {
        cleanup_env_vars();

        unsafe {
            env::set_var("HOST", "0.0.0.0");
            env::set_var("PORT", "9000");
            env::set_var("AUDIO_DIR", "/var/lib/voxrelay/audio");
            env::set_var("MAX_FILE_AGE_SECS", "120");
            env::set_var("CLEANUP_INTERVAL_SECS", "30");
            env::set_var("PRESETS_DIR", "/etc/voxrelay/presets");
            env::set_var("EDGE_TTS_ENDPOINT", "http://localhost:9999/readaloud");
            env::set_var("AZURE_TTS_ENDPOINT", "http://localhost:9998");
            env::set_var("SYNTHESIS_TIMEOUT_SECS", "5");
        }

        let config = ServerConfig::from_env().expect("Should load config");
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 9000);
        assert_eq!(config.audio_dir, PathBuf::from("/var/lib/voxrelay/audio"));
        assert_eq!(config.max_file_age_secs, 120);
        assert_eq!(config.cleanup_interval_secs, 30);
        assert_eq!(config.presets_dir, PathBuf::from("/etc/voxrelay/presets"));
        assert_eq!(config.edge_endpoint, "http://localhost:9999/readaloud");
        assert_eq!(
            config.azure_endpoint.as_deref(),
            Some("http://localhost:9998")
        );
        assert_eq!(config.synthesis_timeout_secs, 5);

        cleanup_env_vars();
    }

    #[test]
    #[serial]
    fn test_from_env_invalid_port() {
        cleanup_env_vars();

        unsafe {
            env::set_var("PORT", "not-a-port");
        }

        let result = ServerConfig::from_env();
        assert!(result.is_err());
        let message = result.unwrap_err().to_string();
        assert!(message.contains("Invalid port number"));

        cleanup_env_vars();
    }

    #[test]
    #[serial]
    fn test_from_env_invalid_timeout() {
        cleanup_env_vars();

        unsafe {
            env::set_var("SYNTHESIS_TIMEOUT_SECS", "sixty");
        }

        let result = ServerConfig::from_env();
        assert!(result.is_err());
        let message = result.unwrap_err().to_string();
        assert!(message.contains("Invalid SYNTHESIS_TIMEOUT_SECS"));

        cleanup_env_vars();
    }
}
