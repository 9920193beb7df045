//! Configuration file loader.

use std::path::{Path, PathBuf};

use super::OplogConfig;

/// Configuration loader that searches multiple locations.
#[derive(Debug)]
pub struct ConfigLoader {
    /// Search paths in order of priority.
    search_paths: Vec<PathBuf>,
}

impl ConfigLoader {
    /// Create a new config loader with default search paths.
    #[must_use]
    pub fn new() -> Self {
        let mut search_paths = Vec::new();

        // 1. Current directory: .oplog.toml
        search_paths.push(PathBuf::from(".oplog.toml"));

        // 2. User config directory: ~/.config/oplog/config.toml
        if let Some(config_dir) = dirs::config_dir() {
            search_paths.push(config_dir.join("oplog").join("config.toml"));
        }

        Self { search_paths }
    }

    /// Create a config loader with a specific config file path.
    #[must_use]
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            search_paths: vec![path],
        }
    }

    /// Load configuration from the first available file, or return defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be read or parsed.
    pub fn load(&self) -> Result<OplogConfig, ConfigError> {
        if let Some(path) = self.find_config_file() {
            tracing::debug!(path = %path.display(), "Loading config file");
            return Self::load_from_path(&path);
        }

        tracing::debug!("No config file found, using defaults");
        Ok(OplogConfig::default())
    }

    /// Load configuration from a specific path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_path(path: &Path) -> Result<OplogConfig, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Get the search paths for debugging.
    #[must_use]
    pub fn search_paths(&self) -> &[PathBuf] {
        &self.search_paths
    }

    /// Find the first config file that exists.
    #[must_use]
    pub fn find_config_file(&self) -> Option<PathBuf> {
        self.search_paths.iter().find(|p| p.exists()).cloned()
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors that can occur during configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::handlers::RejectPolicy;

    #[test]
    fn test_config_loader_default_paths() {
        let loader = ConfigLoader::new();
        assert!(!loader.search_paths().is_empty());
        assert!(loader.search_paths()[0].ends_with(".oplog.toml"));
    }

    #[test]
    fn test_config_loader_returns_defaults_when_no_file() {
        let loader = ConfigLoader::with_path(PathBuf::from("/nonexistent/path.toml"));
        assert_eq!(loader.load().unwrap(), OplogConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[math]\non_rejected = \"decline\"\n\n[service_map]\nsvc = \"order\"").unwrap();

        let config = ConfigLoader::with_path(file.path().to_path_buf())
            .load()
            .unwrap();
        assert_eq!(config.math.on_rejected, RejectPolicy::Decline);
        assert_eq!(config.service_map["svc"], "order");
    }

    #[test]
    fn test_first_existing_path_wins() {
        let dir = tempfile::tempdir().unwrap();
        let second = dir.path().join("second.toml");
        std::fs::write(&second, "[date]\nutc_offset_seconds = 3600\n").unwrap();

        let loader = ConfigLoader {
            search_paths: vec![dir.path().join("missing.toml"), second.clone()],
        };
        assert_eq!(loader.find_config_file(), Some(second));
        assert_eq!(loader.load().unwrap().date.utc_offset_seconds, Some(3600));
    }

    #[test]
    fn test_parse_error_names_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[handlers\ncustom = 3").unwrap();

        let err = ConfigLoader::with_path(file.path().to_path_buf())
            .load()
            .unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
        assert!(err.to_string().starts_with("Failed to parse config file"));
    }
}
