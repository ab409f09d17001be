//! Config command handlers

use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};

use vault_core::config::DEFAULT_BASE_URL;
use vault_core::{Config, DocumentsRoute, FieldNames, HttpNotesApi};

use super::with_hint;
use crate::output::{Output, OutputFormat};

/// Show current configuration
pub fn show(config_path: Option<&PathBuf>, output: &Output) -> Result<()> {
    let config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "base_url": config.base_url,
                    "documents_route": config.documents_route.to_string(),
                    "field_names": config.field_names.to_string(),
                    "collections": config.collections,
                    "log_file": config.log_file
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", config.base_url);
        }
        OutputFormat::Human => {
            let effective_path = config_path
                .cloned()
                .unwrap_or_else(Config::config_file_path);
            println!("Configuration:");
            println!("  base_url:        {}", config.base_url);
            println!("  documents_route: {}", config.documents_route);
            println!("  field_names:     {}", config.field_names);
            println!(
                "  collections:     {}",
                config
                    .collections
                    .as_ref()
                    .map(|c| c.join(", "))
                    .unwrap_or_else(|| "(from server)".to_string())
            );
            println!(
                "  log_file:        {}",
                config
                    .log_file
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "(not set)".to_string())
            );
            println!();
            println!("Config file: {}", effective_path.display());
        }
    }

    Ok(())
}

/// Set a configuration value
pub fn set(
    key: String,
    value: String,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    let save_path = config_path
        .cloned()
        .unwrap_or_else(Config::config_file_path);
    // Edit the file as written; VAULT_* overrides must not leak into it
    let mut config = Config::load_file(&save_path).context("Failed to load configuration")?;

    apply_setting(&mut config, &key, &value)?;

    config
        .save_to_path(&save_path)
        .context("Failed to save configuration")?;

    output.success(&format!("Set {} = {}", key, value));

    Ok(())
}

fn apply_setting(config: &mut Config, key: &str, value: &str) -> Result<()> {
    let unset = value.is_empty() || value == "none";

    match key {
        "base_url" => {
            config.base_url = if unset {
                DEFAULT_BASE_URL.to_string()
            } else {
                HttpNotesApi::new(value, config.schema()).map_err(with_hint)?;
                value.to_string()
            };
        }
        "documents_route" => {
            config.documents_route = value
                .parse::<DocumentsRoute>()
                .map_err(|e| anyhow!("Invalid value for documents_route: {}", e))?;
        }
        "field_names" => {
            config.field_names = value
                .parse::<FieldNames>()
                .map_err(|e| anyhow!("Invalid value for field_names: {}", e))?;
        }
        "collections" => {
            config.collections = if unset {
                None
            } else {
                Some(
                    value
                        .split(',')
                        .map(str::trim)
                        .filter(|name| !name.is_empty())
                        .map(String::from)
                        .collect(),
                )
            };
        }
        "log_file" => {
            config.log_file = if unset { None } else { Some(value.into()) };
        }
        _ => {
            bail!(
                "Unknown configuration key: '{}'\n\
                 Valid keys: base_url, documents_route, field_names, collections, log_file",
                key
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tempfile::TempDir;

    #[test]
    fn test_apply_setting_values() {
        let mut config = Config::default();

        apply_setting(&mut config, "base_url", "http://notes.local:9000/api").unwrap();
        apply_setting(&mut config, "documents_route", "get").unwrap();
        apply_setting(&mut config, "field_names", "name_value").unwrap();
        apply_setting(&mut config, "collections", "notes, tasks,").unwrap();

        assert_eq!(config.base_url, "http://notes.local:9000/api");
        assert_eq!(config.documents_route, DocumentsRoute::Get);
        assert_eq!(config.field_names, FieldNames::NameValue);
        assert_eq!(
            config.collections,
            Some(vec!["notes".to_string(), "tasks".to_string()])
        );

        apply_setting(&mut config, "collections", "none").unwrap();
        apply_setting(&mut config, "base_url", "").unwrap();
        assert!(config.collections.is_none());
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_apply_setting_rejects_bad_values() {
        let mut config = Config::default();

        assert!(apply_setting(&mut config, "base_url", "not a url").is_err());
        assert!(apply_setting(&mut config, "base_url", "ftp://host").is_err());
        assert!(apply_setting(&mut config, "documents_route", "list").is_err());
        assert!(apply_setting(&mut config, "field_names", "a_b").is_err());
        assert!(apply_setting(&mut config, "sync_url", "x").is_err());

        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    // Serializes tests that call set() while the environment may change
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    #[test]
    fn test_set_writes_config_file() {
        let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        let output = Output::new(OutputFormat::Quiet);

        set(
            "field_names".to_string(),
            "name_value".to_string(),
            Some(&path),
            &output,
        )
        .unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("field_names = \"name_value\""));
    }

    #[test]
    fn test_set_does_not_persist_env_overrides() {
        let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "base_url = \"http://file.local:1\"\n").unwrap();
        let output = Output::new(OutputFormat::Quiet);

        let saved = std::env::var("VAULT_BASE_URL").ok();
        std::env::set_var("VAULT_BASE_URL", "http://env.local:2");
        let result = set(
            "documents_route".to_string(),
            "get".to_string(),
            Some(&path),
            &output,
        );
        match saved {
            Some(v) => std::env::set_var("VAULT_BASE_URL", v),
            None => std::env::remove_var("VAULT_BASE_URL"),
        }
        result.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("http://file.local:1"));
        assert!(!content.contains("env.local"));
        assert!(content.contains("documents_route = \"get\""));
    }
}
