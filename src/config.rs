use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

/// Connection settings for the prediction service.
///
/// All fields have defaults so a partial (or absent) config file works. The
/// `CREDSETU_API_URL` environment variable overrides the base URL, matching
/// how deployments point the client at a non-local service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the prediction service.
    pub base_url: String,
    /// Per-request timeout in milliseconds.
    pub request_timeout_ms: u64,
    /// Interval between availability probes, in seconds.
    pub status_poll_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            request_timeout_ms: 5000,
            status_poll_secs: 30,
        }
    }
}

impl ApiConfig {
    /// Load settings from an optional TOML file, then apply the environment
    /// override for the base URL.
    pub fn load(path: Option<&Path>) -> Result<Self, String> {
        let mut config = match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path)
                    .map_err(|e| format!("Failed to read config {}: {}", path.display(), e))?;
                toml::from_str(&raw)
                    .map_err(|e| format!("Failed to parse config {}: {}", path.display(), e))?
            }
            None => Self::default(),
        };

        if let Ok(url) = std::env::var("CREDSETU_API_URL") {
            if !url.is_empty() {
                info!("Using API URL from environment: {}", url);
                config.base_url = url;
            }
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = ApiConfig::default();
        assert_eq!(config.base_url, "http://localhost:8000");
        assert_eq!(config.request_timeout_ms, 5000);
        assert_eq!(config.status_poll_secs, 30);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "base_url = \"http://10.0.0.5:8000\"").unwrap();

        let config = ApiConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.base_url, "http://10.0.0.5:8000");
        assert_eq!(config.request_timeout_ms, 5000);
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "request_timeout_ms = \"soon\"").unwrap();

        let result = ApiConfig::load(Some(file.path()));
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let result = ApiConfig::load(Some(Path::new("/nonexistent/credsetu.toml")));
        assert!(result.is_err());
    }
}
