//! TOML-based configuration persistence for the clicker.
//!
//! Reads and writes `AppConfig` to the platform-appropriate config file:
//! - Windows:  `%APPDATA%\MultiClicker\config.toml`
//! - Linux:    `~/.config/multiclicker/config.toml`
//! - macOS:    `~/Library/Application Support/MultiClicker/config.toml`
//!
//! # What is TOML? (for beginners)
//!
//! TOML (Tom's Obvious Minimal Language) is a configuration file format designed
//! to be easy to read and write.  Example:
//!
//! ```toml
//! log_level = "debug"
//! autoload_document = "C:\\Users\\me\\clicks.toml"
//!
//! [default_settings]
//! repeat_type = "Continuous"
//! delay_ms = 500
//! ```
//!
//! # Serde default values
//!
//! Fields annotated with `#[serde(default = "some_fn")]` use the return value
//! of `some_fn()` when the field is absent from the TOML file.  This allows
//! the app to work correctly on first run (before a config file exists) and
//! when upgrading from an older config file that is missing newer fields.

use std::path::{Path, PathBuf};

use clicker_core::Settings;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config could not be serialized to TOML.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

// ── Config schema ─────────────────────────────────────────────────────────────

/// Top-level application configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    /// `tracing` log level: `"error"`, `"warn"`, `"info"`, `"debug"`, `"trace"`.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Click document loaded at startup, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub autoload_document: Option<PathBuf>,
    /// Settings used until a document is loaded.
    #[serde(default)]
    pub default_settings: Settings,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            autoload_document: None,
            default_settings: Settings::default(),
        }
    }
}

// ── Config repository ─────────────────────────────────────────────────────────

/// Determines the platform-appropriate directory for the config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] when the platform config base
/// directory cannot be determined from the environment.
fn config_dir() -> Result<PathBuf, ConfigError> {
    platform_config_dir().ok_or(ConfigError::NoPlatformConfigDir)
}

/// Resolves the full path to the config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] if the base directory cannot be
/// determined.
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    Ok(config_dir()?.join("config.toml"))
}

/// Loads `AppConfig` from `path`, returning `AppConfig::default()` if the file
/// does not exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// and [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config_from(path: &Path) -> Result<AppConfig, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => {
            let cfg: AppConfig = toml::from_str(&content)?;
            Ok(cfg)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(AppConfig::default()),
        Err(e) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Persists `config` to `path`, creating the directory if needed.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system failures or
/// [`ConfigError::Serialize`] if serialization fails.
pub fn save_config_to(path: &Path, config: &AppConfig) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}

/// Resolves the platform config directory, including the app subdirectory.
fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        // %APPDATA% e.g. C:\Users\<user>\AppData\Roaming
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("MultiClicker"))
    }

    #[cfg(target_os = "linux")]
    {
        // XDG_CONFIG_HOME or ~/.config
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("multiclicker"))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join("Library")
                .join("Application Support")
                .join("MultiClicker")
        })
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clicker_core::RepeatType;

    #[test]
    fn test_app_config_default_log_level_is_info() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.log_level, "info");
        assert!(cfg.autoload_document.is_none());
        assert_eq!(cfg.default_settings, Settings::default());
    }

    #[test]
    fn test_deserialize_empty_toml_uses_defaults() {
        let cfg: AppConfig = toml::from_str("").expect("deserialize empty");
        assert_eq!(cfg, AppConfig::default());
    }

    #[test]
    fn test_deserialize_partial_settings_overrides_defaults() {
        // Arrange
        let toml_str = r#"
log_level = "debug"

[default_settings]
repeat_type = "Continuous"
"#;

        // Act
        let cfg: AppConfig = toml::from_str(toml_str).expect("deserialize partial");

        // Assert
        assert_eq!(cfg.log_level, "debug");
        assert_eq!(cfg.default_settings.repeat_type, RepeatType::Continuous);
        // Unspecified fields keep their defaults
        assert_eq!(cfg.default_settings.delay_ms, 1000);
    }

    #[test]
    fn test_app_config_round_trips_through_file() {
        // Arrange
        let dir = std::env::temp_dir().join(format!("clicker_cfg_{}", std::process::id()));
        let path = dir.join("nested").join("config.toml");
        let cfg = AppConfig {
            log_level: "trace".to_string(),
            autoload_document: Some(PathBuf::from("clicks.toml")),
            default_settings: Settings {
                delay_ms: 42,
                ..Settings::default()
            },
        };

        // Act
        save_config_to(&path, &cfg).expect("save");
        let loaded = load_config_from(&path).expect("load");

        // Assert
        assert_eq!(loaded, cfg);

        // Cleanup
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_load_config_returns_default_when_file_absent() {
        let path = PathBuf::from("/nonexistent/path/that/cannot/exist/config.toml");

        let cfg = load_config_from(&path).expect("missing file is not an error");

        assert_eq!(cfg, AppConfig::default());
    }

    #[test]
    fn test_load_invalid_toml_returns_parse_error() {
        let dir = std::env::temp_dir().join(format!("clicker_cfg_bad_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, "[[[ not valid toml").unwrap();

        let result = load_config_from(&path);

        assert!(matches!(result, Err(ConfigError::Parse(_))));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_config_file_path_ends_with_config_toml() {
        if let Ok(path) = config_file_path() {
            assert!(
                path.ends_with("config.toml"),
                "config file must be named config.toml, got {path:?}"
            );
        }
        // NoPlatformConfigDir in a stripped CI env is also acceptable.
    }

    #[test]
    fn test_config_file_lives_in_config_dir() {
        if let (Ok(dir), Ok(path)) = (config_dir(), config_file_path()) {
            assert_eq!(path.parent(), Some(dir.as_path()));
        }
    }
}
