//! Application configuration
//!
//! Configuration is loaded from:
//! 1. Default values
//! 2. Config file (~/.config/vault/config.toml)
//! 3. Environment variables (VAULT_* prefix)
//!
//! Environment variables take precedence over config file values.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::api::{ApiSchema, DocumentsRoute, FieldNames};

/// Environment variable prefix
const ENV_PREFIX: &str = "VAULT";

/// Server address used when nothing is configured
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Notes server address (origin, optionally with a path prefix)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Route used to list documents
    #[serde(default)]
    pub documents_route: DocumentsRoute,

    /// Field names written when adding documents
    #[serde(default)]
    pub field_names: FieldNames,

    /// Fixed collection set; when set, collections are not fetched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collections: Option<Vec<String>>,

    /// TUI log file (only written when VAULT_LOG is set)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            documents_route: DocumentsRoute::default(),
            field_names: FieldNames::default(),
            collections: None,
            log_file: None,
        }
    }
}

impl Config {
    /// Load configuration from default location and environment
    ///
    /// Order of precedence (highest to lowest):
    /// 1. Environment variables (VAULT_BASE_URL, VAULT_DOCUMENTS_ROUTE, VAULT_FIELD_NAMES)
    /// 2. Config file (~/.config/vault/config.toml or VAULT_CONFIG)
    /// 3. Default values
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::config_file_path())
    }

    /// Load configuration, preferring a path given on the command line
    pub fn load_with_cli_override(path: Option<&PathBuf>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from_path(path),
            None => Self::load(),
        }
    }

    /// Load configuration from a specific path
    ///
    /// Environment variables are still applied as overrides.
    /// If the file doesn't exist, defaults are used.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let mut config = Self::load_file(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load only what the file says, without environment overrides
    ///
    /// Use this before editing and saving, so overrides from the current
    /// environment are not written back. A missing file yields defaults.
    pub fn load_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    /// Load configuration from a TOML string (useful for testing)
    pub fn load_from_str(toml_content: &str) -> Result<Self> {
        let mut config: Config =
            toml::from_str(toml_content).context("Failed to parse config TOML")?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        // VAULT_BASE_URL
        if let Ok(val) = std::env::var(format!("{}_BASE_URL", ENV_PREFIX)) {
            self.base_url = if val.trim().is_empty() {
                default_base_url()
            } else {
                val
            };
        }

        // VAULT_DOCUMENTS_ROUTE
        if let Ok(val) = std::env::var(format!("{}_DOCUMENTS_ROUTE", ENV_PREFIX)) {
            match val.parse() {
                Ok(route) => self.documents_route = route,
                Err(e) => warn!("Ignoring {}_DOCUMENTS_ROUTE: {}", ENV_PREFIX, e),
            }
        }

        // VAULT_FIELD_NAMES
        if let Ok(val) = std::env::var(format!("{}_FIELD_NAMES", ENV_PREFIX)) {
            match val.parse() {
                Ok(fields) => self.field_names = fields,
                Err(e) => warn!("Ignoring {}_FIELD_NAMES: {}", ENV_PREFIX, e),
            }
        }
    }

    /// Save configuration to the default file
    pub fn save(&self) -> Result<()> {
        self.save_to_path(&Self::config_file_path())
    }

    /// Save configuration to a specific file
    pub fn save_to_path(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(config_path, content)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;
        Ok(())
    }

    /// Get the config file path
    ///
    /// Can be overridden with VAULT_CONFIG environment variable
    pub fn config_file_path() -> PathBuf {
        if let Ok(path) = std::env::var(format!("{}_CONFIG", ENV_PREFIX)) {
            return PathBuf::from(path);
        }

        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("vault")
            .join("config.toml")
    }

    /// Wire variant for the HTTP client
    pub fn schema(&self) -> ApiSchema {
        ApiSchema {
            route: self.documents_route,
            fields: self.field_names,
        }
    }

    /// Get the path of the TUI log file
    pub fn log_path(&self) -> PathBuf {
        self.log_file.clone().unwrap_or_else(|| {
            dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("vault")
                .join("debug.log")
        })
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;
    use tempfile::TempDir;

    // Mutex to serialize tests that touch environment variables
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    /// Guard that locks env access and saves/restores env vars
    struct EnvGuard<'a> {
        _lock: std::sync::MutexGuard<'a, ()>,
        saved: Vec<(String, Option<String>)>,
    }

    impl<'a> EnvGuard<'a> {
        fn new(vars: &[&str]) -> Self {
            let lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
            let saved = vars
                .iter()
                .map(|&name| (name.to_string(), env::var(name).ok()))
                .collect();
            for name in vars {
                env::remove_var(name);
            }
            Self { _lock: lock, saved }
        }
    }

    impl Drop for EnvGuard<'_> {
        fn drop(&mut self) {
            for (name, value) in &self.saved {
                match value {
                    Some(v) => env::set_var(name, v),
                    None => env::remove_var(name),
                }
            }
        }
    }

    const ENV_VARS: &[&str] = &[
        "VAULT_BASE_URL",
        "VAULT_DOCUMENTS_ROUTE",
        "VAULT_FIELD_NAMES",
    ];

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.documents_route, DocumentsRoute::Documents);
        assert_eq!(config.field_names, FieldNames::TitleContent);
        assert!(config.collections.is_none());
    }

    #[test]
    fn test_load_file_ignores_env() {
        let _guard = EnvGuard::new(ENV_VARS);
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "base_url = \"http://file:1\"\n").unwrap();

        env::set_var("VAULT_BASE_URL", "http://env:2");

        assert_eq!(Config::load_file(&path).unwrap().base_url, "http://file:1");
        assert_eq!(Config::load_from_path(&path).unwrap().base_url, "http://env:2");
    }

    #[test]
    fn test_log_path() {
        let config = Config::default();
        assert!(config.log_path().ends_with("debug.log"));

        let config = Config {
            log_file: Some(PathBuf::from("/tmp/vault.log")),
            ..Config::default()
        };
        assert_eq!(config.log_path(), PathBuf::from("/tmp/vault.log"));
    }

    #[test]
    fn test_env_override_base_url() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();

        env::set_var("VAULT_BASE_URL", "https://rust-vault.example.com");
        config.apply_env_overrides();
        assert_eq!(config.base_url, "https://rust-vault.example.com");

        // Empty string restores the default
        env::set_var("VAULT_BASE_URL", "");
        config.apply_env_overrides();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_env_override_schema() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();

        env::set_var("VAULT_DOCUMENTS_ROUTE", "get");
        env::set_var("VAULT_FIELD_NAMES", "name_value");
        config.apply_env_overrides();
        assert_eq!(config.documents_route, DocumentsRoute::Get);
        assert_eq!(config.field_names, FieldNames::NameValue);

        // Invalid values are ignored
        env::set_var("VAULT_DOCUMENTS_ROUTE", "bogus");
        config.apply_env_overrides();
        assert_eq!(config.documents_route, DocumentsRoute::Get);
    }

    #[test]
    fn test_serialization() {
        let _guard = EnvGuard::new(ENV_VARS);

        let config = Config {
            base_url: "https://notes.example.com/api".to_string(),
            documents_route: DocumentsRoute::Get,
            field_names: FieldNames::NameValue,
            collections: Some(vec!["notes".to_string(), "tasks".to_string()]),
            log_file: None,
        };

        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("base_url"));
        assert!(toml_str.contains("documents_route = \"get\""));
        assert!(toml_str.contains("field_names = \"name_value\""));
        assert!(!toml_str.contains("log_file"));

        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.base_url, config.base_url);
        assert_eq!(parsed.documents_route, config.documents_route);
        assert_eq!(parsed.collections, config.collections);
    }

    #[test]
    fn test_load_from_str() {
        let _guard = EnvGuard::new(ENV_VARS);

        let toml = r#"
            base_url = "http://10.0.0.5:8080"
            collections = ["notes", "tasks"]
        "#;

        let config = Config::load_from_str(toml).unwrap();
        assert_eq!(config.base_url, "http://10.0.0.5:8080");
        assert_eq!(
            config.collections,
            Some(vec!["notes".to_string(), "tasks".to_string()])
        );
        assert_eq!(config.schema(), ApiSchema::default());
    }

    #[test]
    fn test_load_from_path_missing_file() {
        let _guard = EnvGuard::new(ENV_VARS);

        let path = PathBuf::from("/nonexistent/config.toml");
        let config = Config::load_from_path(&path).unwrap();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_save_and_reload() {
        let _guard = EnvGuard::new(ENV_VARS);

        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");

        let config = Config {
            base_url: "http://notes.local".to_string(),
            field_names: FieldNames::NameValue,
            ..Config::default()
        };
        config.save_to_path(&path).unwrap();

        let loaded = Config::load_with_cli_override(Some(&path)).unwrap();
        assert_eq!(loaded.base_url, "http://notes.local");
        assert_eq!(loaded.field_names, FieldNames::NameValue);
    }

    #[test]
    fn test_load_invalid_file() {
        let _guard = EnvGuard::new(ENV_VARS);

        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "documents_route = \"sideways\"").unwrap();

        assert!(Config::load_from_path(&path).is_err());
    }
}
