//! Configuration file management for saarathi.
//!
//! Provides a TOML-based config file at `~/.config/saarathi/config.toml` and a
//! resolution chain: CLI flag > env var > config file > default.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use saarathi_core::GenerationConfig;

pub const ENV_API_KEY: &str = "SAARATHI_API_KEY";
pub const ENV_MODEL: &str = "SAARATHI_MODEL";
pub const ENV_TEMPERATURE: &str = "SAARATHI_TEMPERATURE";
pub const ENV_ENDPOINT: &str = "SAARATHI_ENDPOINT";

// -----------------------------------------------------------------------
// Config file types
// -----------------------------------------------------------------------

#[derive(Debug, Serialize, Deserialize)]
pub struct ConfigFile {
    pub gemini: GeminiSection,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GeminiSection {
    pub api_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
}

// -----------------------------------------------------------------------
// Paths
// -----------------------------------------------------------------------

/// Return the saarathi config directory.
///
/// Always uses XDG layout: `$XDG_CONFIG_HOME/saarathi` or `~/.config/saarathi`.
pub fn config_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg).join("saarathi");
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("saarathi")
}

pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

// -----------------------------------------------------------------------
// Read / write
// -----------------------------------------------------------------------

/// Load the config file at `path`. A missing file is `Ok(None)`. A file that
/// exists and cannot be read or parsed is still an error.
pub fn load_optional_config(path: &Path) -> Result<Option<ConfigFile>> {
    match std::fs::metadata(path) {
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        _ => load_config_from(path).map(Some),
    }
}

/// Load and parse the config file at `path`. Returns an error if it does not exist.
pub fn load_config_from(path: &Path) -> Result<ConfigFile> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file at {}", path.display()))?;
    let config: ConfigFile = toml::from_str(&contents).context("failed to parse config file")?;
    Ok(config)
}

/// Serialize and write the config file, creating parent dirs as needed.
pub fn save_config(config: &ConfigFile) -> Result<()> {
    save_config_to(&config_path(), config)
}

/// Write `config` to `path`. Sets file permissions to 0600 on Unix.
pub fn save_config_to(path: &Path, config: &ConfigFile) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create config directory {}", dir.display()))?;
    }

    let contents = toml::to_string_pretty(config).context("failed to serialize config")?;
    std::fs::write(path, &contents)
        .with_context(|| format!("failed to write config file at {}", path.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(path, perms)
            .with_context(|| format!("failed to set permissions on {}", path.display()))?;
    }

    Ok(())
}

// -----------------------------------------------------------------------
// Resolved config
// -----------------------------------------------------------------------

/// Values given on the command line.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub api_key: Option<String>,
    pub model: Option<String>,
}

/// Resolve the generation config using the chain:
/// CLI flag > env var > config file > default.
///
/// - API key: `--api-key` > `SAARATHI_API_KEY` > `gemini.api_key` > empty
///   (rejected by validation)
/// - Model: `--model` > `SAARATHI_MODEL` > `gemini.model` > default
/// - Temperature: `SAARATHI_TEMPERATURE` > `gemini.temperature` > default
/// - Endpoint: `SAARATHI_ENDPOINT` > `gemini.endpoint` > default
pub fn resolve(overrides: &Overrides) -> Result<GenerationConfig> {
    let file = load_optional_config(&config_path())?;
    resolve_from(overrides, file)
}

pub fn resolve_from(overrides: &Overrides, file: Option<ConfigFile>) -> Result<GenerationConfig> {
    let section = file.map(|f| f.gemini);

    let api_key = if let Some(key) = &overrides.api_key {
        key.clone()
    } else if let Ok(key) = std::env::var(ENV_API_KEY) {
        key
    } else if let Some(ref s) = section {
        s.api_key.clone()
    } else {
        String::new()
    };
    let mut config = GenerationConfig::new(api_key);

    if let Some(model) = &overrides.model {
        config.model = model.clone();
    } else if let Ok(model) = std::env::var(ENV_MODEL) {
        config.model = model;
    } else if let Some(model) = section.as_ref().and_then(|s| s.model.clone()) {
        config.model = model;
    }

    if let Ok(raw) = std::env::var(ENV_TEMPERATURE) {
        config.temperature = raw
            .trim()
            .parse()
            .with_context(|| format!("{ENV_TEMPERATURE} is not a number: {raw:?}"))?;
    } else if let Some(t) = section.as_ref().and_then(|s| s.temperature) {
        config.temperature = t;
    }

    if let Ok(endpoint) = std::env::var(ENV_ENDPOINT) {
        config.endpoint = endpoint;
    } else if let Some(endpoint) = section.as_ref().and_then(|s| s.endpoint.clone()) {
        config.endpoint = endpoint;
    }

    Ok(config)
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use saarathi_core::ConfigError;

    fn lock_env() -> std::sync::MutexGuard<'static, ()> {
        crate::test_util::lock_env()
    }

    fn clear_env() {
        for var in [ENV_API_KEY, ENV_MODEL, ENV_TEMPERATURE, ENV_ENDPOINT] {
            unsafe { std::env::remove_var(var) };
        }
    }

    fn file(api_key: &str) -> ConfigFile {
        ConfigFile {
            gemini: GeminiSection {
                api_key: api_key.to_string(),
                model: Some("file-model".to_string()),
                temperature: Some(0.2),
                endpoint: Some("http://localhost:9999".to_string()),
            },
        }
    }

    #[test]
    fn save_and_load_config_roundtrip() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("saarathi").join("config.toml");

        save_config_to(&path, &file("file-key")).unwrap();
        let loaded = load_config_from(&path).unwrap();

        assert_eq!(loaded.gemini.api_key, "file-key");
        assert_eq!(loaded.gemini.model.as_deref(), Some("file-model"));
        assert_eq!(loaded.gemini.temperature, Some(0.2));
    }

    #[test]
    fn optional_fields_may_be_omitted() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "[gemini]\napi_key = \"k\"\n").unwrap();

        let loaded = load_config_from(&path).unwrap();
        assert_eq!(loaded.gemini.api_key, "k");
        assert!(loaded.gemini.model.is_none());
        assert!(loaded.gemini.endpoint.is_none());
    }

    #[cfg(unix)]
    #[test]
    fn save_config_sets_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        save_config_to(&path, &file("k")).unwrap();

        let meta = std::fs::metadata(&path).unwrap();
        assert_eq!(meta.permissions().mode() & 0o777, 0o600);
    }

    #[test]
    fn cli_flags_override_everything() {
        let _lock = lock_env();
        clear_env();
        unsafe { std::env::set_var(ENV_API_KEY, "env-key") };
        unsafe { std::env::set_var(ENV_MODEL, "env-model") };

        let overrides = Overrides {
            api_key: Some("cli-key".to_string()),
            model: Some("cli-model".to_string()),
        };
        let config = resolve_from(&overrides, Some(file("file-key"))).unwrap();
        clear_env();

        assert_eq!(config.api_key, "cli-key");
        assert_eq!(config.model, "cli-model");
    }

    #[test]
    fn env_overrides_config_file() {
        let _lock = lock_env();
        clear_env();
        unsafe { std::env::set_var(ENV_API_KEY, "env-key") };
        unsafe { std::env::set_var(ENV_TEMPERATURE, "0.9") };
        unsafe { std::env::set_var(ENV_ENDPOINT, "http://env.test") };

        let config = resolve_from(&Overrides::default(), Some(file("file-key"))).unwrap();
        clear_env();

        assert_eq!(config.api_key, "env-key");
        assert_eq!(config.model, "file-model");
        assert_eq!(config.temperature, 0.9);
        assert_eq!(config.endpoint, "http://env.test");
    }

    #[test]
    fn config_file_overrides_defaults() {
        let _lock = lock_env();
        clear_env();

        let config = resolve_from(&Overrides::default(), Some(file("file-key"))).unwrap();

        assert_eq!(config.api_key, "file-key");
        assert_eq!(config.model, "file-model");
        assert_eq!(config.temperature, 0.2);
        assert_eq!(config.endpoint, "http://localhost:9999");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn defaults_apply_when_nothing_set() {
        let _lock = lock_env();
        clear_env();

        let config = resolve_from(&Overrides::default(), None).unwrap();

        assert_eq!(config.model, GenerationConfig::DEFAULT_MODEL);
        assert_eq!(config.temperature, GenerationConfig::DEFAULT_TEMPERATURE);
        assert_eq!(config.endpoint, GenerationConfig::DEFAULT_ENDPOINT);
        assert_eq!(config.validate(), Err(ConfigError::MissingApiKey));
    }

    #[test]
    fn bad_temperature_env_is_an_error() {
        let _lock = lock_env();
        clear_env();
        unsafe { std::env::set_var(ENV_TEMPERATURE, "warm") };

        let result = resolve_from(&Overrides::default(), None);
        clear_env();

        let msg = result.unwrap_err().to_string();
        assert!(msg.contains(ENV_TEMPERATURE), "unexpected error: {msg}");
    }

    /// Point `XDG_CONFIG_HOME` at `dir` for the duration of `f`.
    fn with_config_home<T>(dir: &Path, f: impl FnOnce() -> T) -> T {
        let orig = std::env::var("XDG_CONFIG_HOME").ok();
        unsafe { std::env::set_var("XDG_CONFIG_HOME", dir) };
        let result = f();
        match orig {
            Some(x) => unsafe { std::env::set_var("XDG_CONFIG_HOME", x) },
            None => unsafe { std::env::remove_var("XDG_CONFIG_HOME") },
        }
        result
    }

    #[test]
    fn malformed_config_file_is_an_error() {
        let _lock = lock_env();
        clear_env();
        let tmp = tempfile::TempDir::new().unwrap();
        let dir = tmp.path().join("saarathi");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join("config.toml"),
            "[gemini]\napi_key = \"k\"\ntemperature = \"hot\"\n",
        )
        .unwrap();

        let result = with_config_home(tmp.path(), || resolve(&Overrides::default()));

        let err = result.expect_err("malformed config file should not resolve");
        let msg = format!("{err:#}");
        assert!(msg.contains("failed to parse config file"), "unexpected error: {msg}");
    }

    #[test]
    fn missing_config_file_falls_back_to_defaults() {
        let _lock = lock_env();
        clear_env();
        let tmp = tempfile::TempDir::new().unwrap();

        let config = with_config_home(tmp.path(), || resolve(&Overrides::default())).unwrap();

        assert_eq!(config.model, GenerationConfig::DEFAULT_MODEL);
        assert!(config.api_key.is_empty());
    }

    #[test]
    fn config_file_is_read_by_resolve() {
        let _lock = lock_env();
        clear_env();
        let tmp = tempfile::TempDir::new().unwrap();
        save_config_to(&tmp.path().join("saarathi").join("config.toml"), &file("file-key"))
            .unwrap();

        let config = with_config_home(tmp.path(), || resolve(&Overrides::default())).unwrap();

        assert_eq!(config.api_key, "file-key");
        assert_eq!(config.temperature, 0.2);
    }

    #[test]
    fn config_path_ends_with_expected_filename() {
        let path = config_path();
        assert!(
            path.ends_with("saarathi/config.toml"),
            "unexpected config path: {}",
            path.display()
        );
    }
}
