//! Suite configuration

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://petstore.swagger.io/v2";

/// Suite configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// API root including the version segment, e.g. `https://petstore.swagger.io/v2`
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Static headers sent with every request (API keys etc.)
    #[serde(default)]
    pub headers: HashMap<String, String>,

    /// Whole-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Connect timeout in seconds
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Response time limit in seconds (optional, disabled by default)
    #[serde(default)]
    pub response_time_limit: Option<f64>,

    /// Log level: error, warn, info, debug, trace
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

const fn default_timeout_secs() -> u64 {
    10
}

const fn default_connect_timeout_secs() -> u64 {
    5
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            headers: HashMap::new(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            response_time_limit: None,
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Load config from file
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read or parsed
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e.to_string()))?;

        if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
        }
    }

    /// Load from default location (.petcheck.toml)
    ///
    /// # Errors
    ///
    /// Returns error if a candidate file exists but cannot be loaded
    pub fn load_default() -> Result<Self, ConfigError> {
        Self::load_default_in(Path::new("."))
    }

    /// Like [`Config::load_default`], searching `dir` instead of the working directory.
    ///
    /// # Errors
    ///
    /// Returns error if a candidate file exists but cannot be loaded
    pub fn load_default_in(dir: &Path) -> Result<Self, ConfigError> {
        let candidates = [".petcheck.toml", ".petcheck.json", "petcheck.toml"];

        for name in candidates {
            let path = dir.join(name);
            if path.exists() {
                return Self::load(&path);
            }
        }

        // No config file, return default
        Ok(Self::default())
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Response time limit as a duration; non-positive or non-finite values disable it.
    #[must_use]
    pub fn response_time_limit(&self) -> Option<Duration> {
        self.response_time_limit
            .filter(|secs| secs.is_finite() && *secs > 0.0)
            .map(Duration::from_secs_f64)
    }

    /// Create example config file
    #[must_use]
    pub fn example() -> &'static str {
        r#"# petcheck configuration

# API root (including the /v2 segment)
base_url = "https://petstore.swagger.io/v2"

# Timeouts in seconds (always applied)
timeout_secs = 10
connect_timeout_secs = 5

# Fail any checked call slower than this many seconds (disabled by default)
# response_time_limit = 1.0

# Log level: error, warn, info, debug, trace
log_level = "info"

# Static headers sent with every request
[headers]
# api_key = "special-key"
"#
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Cannot read {0}: {1}")]
    Io(PathBuf, String),
    #[error("Parse error: {0}")]
    Parse(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.base_url, "https://petstore.swagger.io/v2");
        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert_eq!(config.connect_timeout(), Duration::from_secs(5));
        assert_eq!(config.response_time_limit(), None);
    }

    #[test]
    fn parse_toml() {
        let toml = r#"
base_url = "http://localhost:8080/v2"
timeout_secs = 3
response_time_limit = 1.5

[headers]
api_key = "special-key"
"#;
        let config: Config = toml::from_str(toml).unwrap();

        assert_eq!(config.base_url, "http://localhost:8080/v2");
        assert_eq!(config.timeout_secs, 3);
        assert_eq!(config.connect_timeout_secs, 5);
        assert_eq!(
            config.headers.get("api_key"),
            Some(&"special-key".to_string())
        );
        assert_eq!(
            config.response_time_limit(),
            Some(Duration::from_millis(1500))
        );
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn example_parses_to_defaults() {
        let config: Config = toml::from_str(Config::example()).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn non_positive_limit_disables_check() {
        let config = Config {
            response_time_limit: Some(0.0),
            ..Config::default()
        };
        assert_eq!(config.response_time_limit(), None);
    }

    #[test]
    fn load_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("suite.json");
        std::fs::write(&path, r#"{"base_url": "http://127.0.0.1:9000/v2"}"#).unwrap();
        let config = Config::load(&path).unwrap();
        assert_eq!(config.base_url, "http://127.0.0.1:9000/v2");
        assert_eq!(config.timeout_secs, 10);
    }

    #[test]
    fn load_default_prefers_dot_toml() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(".petcheck.toml"), "timeout_secs = 7\n").unwrap();
        std::fs::write(dir.path().join("petcheck.toml"), "timeout_secs = 9\n").unwrap();
        let config = Config::load_default_in(dir.path()).unwrap();
        assert_eq!(config.timeout_secs, 7);
    }

    #[test]
    fn load_default_without_files() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_default_in(dir.path()).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn parse_error_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "timeout_secs = \"ten\"\n").unwrap();
        assert!(matches!(Config::load(&path), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = Config::load(Path::new("/nonexistent/petcheck.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(..)));
    }
}
