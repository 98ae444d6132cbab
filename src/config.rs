// Configuration module for fasta-suggest
// This module handles loading and parsing configuration from ~/.config/fasta-suggest/config.toml

mod types;

pub use types::{CacheConfig, Config, RemoteConfig, SuggestConfig};

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result of loading configuration
pub struct ConfigResult {
    pub config: Config,
    pub warning: Option<String>,
}

/// Why a config file present on disk was not used
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Read(#[from] io::Error),

    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Loads configuration from `path`, or ~/.config/fasta-suggest/config.toml
/// when no path is given.
///
/// A missing file yields the defaults silently. A file that cannot be read
/// or parsed yields the defaults plus a warning for the user.
pub fn load_config(path: Option<&Path>) -> ConfigResult {
    let config_path = path.map(Path::to_path_buf).unwrap_or_else(get_config_path);

    if !config_path.exists() {
        log::debug!("No config at {:?}, using defaults", config_path);
        return ConfigResult {
            config: Config::default(),
            warning: None,
        };
    }

    match read_config(&config_path) {
        Ok(config) => {
            log::debug!("Loaded config from {:?}", config_path);
            ConfigResult {
                config,
                warning: None,
            }
        }
        Err(e) => {
            log::warn!("Ignoring config {:?}: {}", config_path, e);
            ConfigResult {
                config: Config::default(),
                warning: Some(e.to_string()),
            }
        }
    }
}

fn read_config(path: &Path) -> Result<Config, ConfigError> {
    let contents = fs::read_to_string(path)?;
    Ok(toml::from_str(&contents)?)
}

/// Returns the path to the configuration file
///
/// Always uses ~/.config/fasta-suggest/config.toml on all platforms for consistency.
fn get_config_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("fasta-suggest")
        .join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_missing_file_returns_defaults_without_warning() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_config(Some(&dir.path().join("absent.toml")));
        assert!(result.warning.is_none());
        assert_eq!(result.config.suggest.debounce_ms, 300);
    }

    #[test]
    fn test_valid_file_is_loaded() {
        let file = write_config("[suggest]\nmin_query_len = 5\n[cache]\ncapacity = 8\n");
        let result = load_config(Some(file.path()));
        assert!(result.warning.is_none());
        assert_eq!(result.config.suggest.min_query_len, 5);
        assert_eq!(result.config.cache.capacity, 8);
    }

    #[test]
    fn test_malformed_file_falls_back_with_warning() {
        let file = write_config("[suggest\ndebounce_ms = 10");
        let result = load_config(Some(file.path()));
        let warning = result.warning.expect("expected a warning");
        assert!(warning.starts_with("Invalid config:"));
        assert_eq!(result.config.suggest.debounce_ms, 300);
    }

    #[test]
    fn test_unreadable_path_falls_back_with_warning() {
        // A directory exists but cannot be read as a file
        let dir = tempfile::tempdir().unwrap();
        let result = load_config(Some(dir.path()));
        let warning = result.warning.expect("expected a warning");
        assert!(warning.starts_with("Failed to read config:"));
    }

    #[test]
    fn test_read_config_reports_parse_errors() {
        let file = write_config("[cache]\ncapacity = \"many\"\n");
        let err = read_config(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_read_config_reports_io_errors() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_config(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Read(_)));
    }

    #[test]
    fn test_default_path_is_stable() {
        let path = get_config_path();
        assert_eq!(path, get_config_path());
        let path_str = path.to_string_lossy();
        assert!(
            path_str.ends_with("fasta-suggest/config.toml")
                || path_str.ends_with("fasta-suggest\\config.toml"),
            "unexpected config path: {}",
            path_str
        );
    }
}
