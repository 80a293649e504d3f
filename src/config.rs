//! Optional YAML configuration for the dashboard.
//!
//! Every key is optional; anything left out falls back to the NewsAPI
//! defaults below. A typical file:
//!
//! ```yaml
//! endpoint: https://newsapi.org/v2/everything
//! cache_ttl_secs: 3600
//! timeout_secs: 30
//! secrets_file: ./secrets.yaml
//! ```

use crate::cache::DEFAULT_TTL_SECS;
use crate::error::ConfigError;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

pub const DEFAULT_ENDPOINT: &str = "https://newsapi.org/v2/everything";
pub const DEFAULT_PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/300x200?text=No+Image";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// NewsAPI `everything` endpoint.
    pub endpoint: String,
    /// Value of the `language` query parameter.
    pub language: String,
    /// Value of the `sortBy` query parameter.
    pub sort_by: String,
    /// How long an identical request is served from memory.
    pub cache_ttl_secs: u32,
    /// Whole-request timeout for the HTTP client.
    pub timeout_secs: u64,
    /// Image shown on cards without a usable `urlToImage`.
    pub placeholder_image: String,
    pub user_agent: String,
    /// YAML secret store holding `NEWS_API_KEY`.
    pub secrets_file: Option<PathBuf>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            language: "en".to_string(),
            sort_by: "publishedAt".to_string(),
            cache_ttl_secs: DEFAULT_TTL_SECS as u32,
            timeout_secs: 30,
            placeholder_image: DEFAULT_PLACEHOLDER_IMAGE.to_string(),
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string(),
            secrets_file: None,
        }
    }
}

impl DashboardConfig {
    pub fn from_yaml_str(yaml: &str, path: &Path) -> Result<Self, ConfigError> {
        // An empty document deserializes as unit, not as an empty mapping.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load configuration from `path`, or defaults when no path is given.
    #[instrument(level = "info", skip_all, fields(path = ?path))]
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let yaml = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml_str(&yaml, path)?;
        info!(endpoint = %config.endpoint, "Loaded configuration");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DashboardConfig::default();
        assert_eq!(config.endpoint, "https://newsapi.org/v2/everything");
        assert_eq!(config.language, "en");
        assert_eq!(config.sort_by, "publishedAt");
        assert_eq!(config.cache_ttl_secs, 3600);
        assert!(config.secrets_file.is_none());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = "cache_ttl_secs: 60\nsecrets_file: ./secrets.yaml\n";
        let config = DashboardConfig::from_yaml_str(yaml, Path::new("dashboard.yaml")).unwrap();
        assert_eq!(config.cache_ttl_secs, 60);
        assert_eq!(config.secrets_file, Some(PathBuf::from("./secrets.yaml")));
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_empty_yaml_is_default() {
        let config = DashboardConfig::from_yaml_str("  \n", Path::new("dashboard.yaml")).unwrap();
        assert_eq!(config, DashboardConfig::default());
    }

    #[test]
    fn test_malformed_yaml_is_error() {
        let err = DashboardConfig::from_yaml_str("cache_ttl_secs: [1, 2", Path::new("bad.yaml"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("bad.yaml"));
    }

    #[test]
    fn test_load_without_path_is_default() {
        assert_eq!(DashboardConfig::load(None).unwrap(), DashboardConfig::default());
    }

    #[test]
    fn test_load_missing_file_is_error() {
        let err = DashboardConfig::load(Some(Path::new("/nonexistent/dashboard.yaml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
