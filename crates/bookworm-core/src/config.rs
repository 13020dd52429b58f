//! Client configuration
//!
//! Layers, lowest first: built-in defaults, the JSON config file, then
//! `BOOKWORM_*` environment variables. The CLI applies its flags on top.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const DEFAULT_API_URL: &str = "https://api.bookworm-library.com";
pub const DEFAULT_API_VERSION: &str = "v1-Beta";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const ENV_API_URL: &str = "BOOKWORM_API_URL";
pub const ENV_API_VERSION: &str = "BOOKWORM_API_VERSION";
pub const ENV_TIMEOUT_SECS: &str = "BOOKWORM_TIMEOUT_SECS";
pub const ENV_SESSION_PATH: &str = "BOOKWORM_SESSION_PATH";
pub const ENV_CONFIG_PATH: &str = "BOOKWORM_CONFIG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub api_url: String,
    pub api_version: String,
    pub timeout_secs: u64,
    /// Session file; `None` means the platform data directory
    pub session_path: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            session_path: None,
        }
    }
}

/// Where a configuration value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    Default,
    File,
    Env,
    Flag,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::Default => write!(f, "default"),
            ConfigSource::File => write!(f, "file"),
            ConfigSource::Env => write!(f, "env"),
            ConfigSource::Flag => write!(f, "flag"),
        }
    }
}

/// Effective configuration plus the origin of each field
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: ClientConfig,
    pub api_url_source: ConfigSource,
    pub api_version_source: ConfigSource,
    pub timeout_source: ConfigSource,
    pub session_path_source: ConfigSource,
}

impl ClientConfig {
    /// Versioned base URL, e.g. `https://host/api/v1-Beta`
    pub fn base_url(&self) -> String {
        format!(
            "{}/api/{}",
            self.api_url.trim_end_matches('/'),
            self.api_version.trim_matches('/')
        )
    }

    /// Session file location, falling back to the platform data directory
    pub fn resolved_session_path(&self) -> Result<PathBuf> {
        match &self.session_path {
            Some(path) => Ok(path.clone()),
            None => default_session_path(),
        }
    }

    /// Load defaults ← config file ← environment.
    pub fn load() -> Result<LoadedConfig> {
        let path = config_file_path()?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<LoadedConfig> {
        let defaults = ClientConfig::default();
        let config = if path.exists() {
            log::debug!("[config] Reading {}", path.display());
            let content = std::fs::read_to_string(path)?;
            serde_json::from_str::<ClientConfig>(&content).map_err(|e| {
                Error::config(format!("Invalid config file {}: {}", path.display(), e))
            })?
        } else {
            defaults.clone()
        };

        let from_file = |differs: bool| {
            if differs {
                ConfigSource::File
            } else {
                ConfigSource::Default
            }
        };

        let mut loaded = LoadedConfig {
            api_url_source: from_file(config.api_url != defaults.api_url),
            api_version_source: from_file(config.api_version != defaults.api_version),
            timeout_source: from_file(config.timeout_secs != defaults.timeout_secs),
            session_path_source: from_file(config.session_path.is_some()),
            config,
        };
        loaded.apply_env()?;
        Ok(loaded)
    }
}

impl LoadedConfig {
    fn apply_env(&mut self) -> Result<()> {
        if let Some(url) = env_value(ENV_API_URL) {
            self.config.api_url = url;
            self.api_url_source = ConfigSource::Env;
        }
        if let Some(version) = env_value(ENV_API_VERSION) {
            self.config.api_version = version;
            self.api_version_source = ConfigSource::Env;
        }
        if let Some(timeout) = env_value(ENV_TIMEOUT_SECS) {
            self.config.timeout_secs = timeout.parse().map_err(|_| {
                Error::config(format!("{} must be a number of seconds, got '{}'", ENV_TIMEOUT_SECS, timeout))
            })?;
            self.timeout_source = ConfigSource::Env;
        }
        if let Some(path) = env_value(ENV_SESSION_PATH) {
            self.config.session_path = Some(expand_path(&path));
            self.session_path_source = ConfigSource::Env;
        }
        Ok(())
    }

    /// Override the API URL from a command-line flag.
    pub fn with_api_url(mut self, api_url: Option<String>) -> Self {
        if let Some(url) = api_url.filter(|u| !u.trim().is_empty()) {
            self.config.api_url = url;
            self.api_url_source = ConfigSource::Flag;
        }
        self
    }
}

fn env_value(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Expand `~` and `$VARS` in a user-supplied path.
pub fn expand_path(raw: &str) -> PathBuf {
    match shellexpand::full(raw) {
        Ok(expanded) => PathBuf::from(expanded.as_ref()),
        Err(_) => PathBuf::from(shellexpand::tilde(raw).as_ref()),
    }
}

fn project_dirs() -> Result<directories::ProjectDirs> {
    directories::ProjectDirs::from("com", "bookworm", "Bookworm")
        .ok_or_else(|| Error::config("Could not determine project directories"))
}

/// Config file location (`BOOKWORM_CONFIG` overrides)
pub fn config_file_path() -> Result<PathBuf> {
    if let Some(path) = env_value(ENV_CONFIG_PATH) {
        return Ok(expand_path(&path));
    }
    Ok(project_dirs()?.config_dir().join("config.json"))
}

/// Default session file location
pub fn default_session_path() -> Result<PathBuf> {
    Ok(project_dirs()?.data_dir().join("session.json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tempfile::TempDir;

    // Mutex to ensure env var tests don't run in parallel
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn clear_env() {
        for key in [ENV_API_URL, ENV_API_VERSION, ENV_TIMEOUT_SECS, ENV_SESSION_PATH, ENV_CONFIG_PATH] {
            std::env::remove_var(key);
        }
    }

    #[test]
    fn test_base_url() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url(), "https://api.bookworm-library.com/api/v1-Beta");

        let config = ClientConfig {
            api_url: "http://localhost:5000/".to_string(),
            api_version: "/v2/".to_string(),
            ..ClientConfig::default()
        };
        assert_eq!(config.base_url(), "http://localhost:5000/api/v2");
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let _lock = ENV_MUTEX.lock().unwrap();
        clear_env();
        let dir = TempDir::new().unwrap();

        let loaded = ClientConfig::load_from(&dir.path().join("absent.json")).unwrap();
        assert_eq!(loaded.config, ClientConfig::default());
        assert_eq!(loaded.api_url_source, ConfigSource::Default);
        assert_eq!(loaded.session_path_source, ConfigSource::Default);
    }

    #[test]
    fn test_file_then_env_layering() {
        let _lock = ENV_MUTEX.lock().unwrap();
        clear_env();
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"api_url": "http://file.test", "timeout_secs": 5}"#).unwrap();

        std::env::set_var(ENV_TIMEOUT_SECS, "12");
        let loaded = ClientConfig::load_from(&path).unwrap();
        clear_env();

        assert_eq!(loaded.config.api_url, "http://file.test");
        assert_eq!(loaded.api_url_source, ConfigSource::File);
        assert_eq!(loaded.config.api_version, DEFAULT_API_VERSION);
        assert_eq!(loaded.api_version_source, ConfigSource::Default);
        assert_eq!(loaded.config.timeout_secs, 12);
        assert_eq!(loaded.timeout_source, ConfigSource::Env);
    }

    #[test]
    fn test_bad_timeout_env_is_config_error() {
        let _lock = ENV_MUTEX.lock().unwrap();
        clear_env();
        let dir = TempDir::new().unwrap();

        std::env::set_var(ENV_TIMEOUT_SECS, "soon");
        let result = ClientConfig::load_from(&dir.path().join("absent.json"));
        clear_env();

        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let _lock = ENV_MUTEX.lock().unwrap();
        clear_env();
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "[1, 2").unwrap();

        assert!(matches!(ClientConfig::load_from(&path), Err(Error::Config(_))));
    }

    #[test]
    fn test_flag_overrides_everything() {
        let _lock = ENV_MUTEX.lock().unwrap();
        clear_env();
        let dir = TempDir::new().unwrap();

        std::env::set_var(ENV_API_URL, "http://env.test");
        let loaded = ClientConfig::load_from(&dir.path().join("absent.json"))
            .unwrap()
            .with_api_url(Some("http://flag.test".to_string()));
        clear_env();

        assert_eq!(loaded.config.api_url, "http://flag.test");
        assert_eq!(loaded.api_url_source, ConfigSource::Flag);
    }

    #[test]
    fn test_expand_path_tilde() {
        let expanded = expand_path("~/bookworm/session.json");
        assert!(!expanded.to_string_lossy().starts_with('~'));
        assert!(expanded.ends_with("bookworm/session.json"));
    }

    #[test]
    fn test_resolved_session_path_prefers_explicit() {
        let config = ClientConfig {
            session_path: Some(PathBuf::from("/tmp/s.json")),
            ..ClientConfig::default()
        };
        assert_eq!(config.resolved_session_path().unwrap(), PathBuf::from("/tmp/s.json"));
    }
}
