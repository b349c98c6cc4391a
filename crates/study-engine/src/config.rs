//! Configuration types for Study Buddy.
//!
//! Settings are read from `study.json` in camelCase. Every key is optional;
//! missing keys take their defaults and unknown keys are ignored.

use std::net::IpAddr;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, StudyError};

/// The default config file name.
const CONFIG_FILE_NAME: &str = "study.json";

/// Default path of the practice counter file.
fn default_progress_file() -> String {
    ".study/progress.json".to_string()
}

/// Default address the HTTP API binds to.
fn default_host() -> String {
    "127.0.0.1".to_string()
}

/// Default port for the HTTP API.
const fn default_port() -> u16 {
    3000
}

/// Main configuration for Study Buddy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Path to the daily practice counter file.
    #[serde(default = "default_progress_file")]
    pub progress_file: String,

    /// Address the HTTP API binds to.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port the HTTP API listens on.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Theme a new session starts with.
    #[serde(default)]
    pub theme: Theme,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            progress_file: default_progress_file(),
            host: default_host(),
            port: default_port(),
            theme: Theme::default(),
        }
    }
}

impl Config {
    /// Loads configuration from the current working directory.
    ///
    /// Looks for `study.json` in the current directory. If not found,
    /// returns the default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but contains invalid JSON.
    pub fn load() -> Result<Self> {
        let current_dir = std::env::current_dir().map_err(|e| {
            StudyError::config_parse(
                "<current directory>",
                format!("cannot determine current directory: {e}"),
            )
        })?;
        Self::load_from_dir(&current_dir)
    }

    /// Loads configuration from `study.json` in a specific directory.
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        Self::load_from_file(&dir.join(CONFIG_FILE_NAME))
    }

    /// Loads configuration from a specific file path.
    ///
    /// If the file does not exist, returns the default configuration.
    ///
    /// # Errors
    ///
    /// Returns `StudyError::ConfigParseError` if the file contains invalid
    /// JSON or an unknown theme, and `StudyError::ConfigValidationError` if
    /// the values fail [`Config::validate`].
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let config = Self::default();
                config.validate()?;
                return Ok(config);
            }
            Err(e) => {
                return Err(StudyError::config_parse(
                    path,
                    format!("failed to read file: {e}"),
                ));
            }
        };

        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| StudyError::config_parse(path, e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration values.
    ///
    /// - `progressFile` must not be empty
    /// - `host` must be an IP address
    /// - `port` must be greater than 0
    pub fn validate(&self) -> Result<()> {
        if self.progress_file.trim().is_empty() {
            return Err(StudyError::config_validation(
                "progressFile must not be empty",
                "Provide a path for the practice counter in your study.json (e.g. '.study/progress.json')",
            ));
        }

        if self.host.parse::<IpAddr>().is_err() {
            return Err(StudyError::config_validation(
                format!("host '{}' is not an IP address", self.host),
                "Set host to an address such as '127.0.0.1' or '0.0.0.0' in your study.json",
            ));
        }

        if self.port == 0 {
            return Err(StudyError::config_validation(
                "port must be greater than 0",
                "Set port to a free TCP port (e.g. 3000) in your study.json",
            ));
        }

        Ok(())
    }
}

/// Visual theme of a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Theme {
    /// Light background (default).
    #[default]
    Light,
    /// Dark background.
    Dark,
}

impl Theme {
    /// Returns the other theme.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// Parses a string into a `Theme`, case-insensitively.
    fn from_str_case_insensitive(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }

    const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Theme {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_str_case_insensitive(&s).ok_or_else(|| {
            serde::de::Error::custom(format!(
                "invalid theme '{s}': expected one of 'light', 'dark'"
            ))
        })
    }
}

impl Serialize for Theme {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn test_config_default_values() {
        let config = Config::default();

        assert_eq!(config.progress_file, ".study/progress.json");
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 3000);
        assert_eq!(config.theme, Theme::Light);
    }

    #[test]
    fn test_config_deserialization_with_defaults() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config.progress_file, ".study/progress.json");
        assert_eq!(config.port, 3000);
    }

    #[test]
    fn test_config_deserialization_with_overrides() {
        let json = r#"{
            "progressFile": "/var/lib/study/count.json",
            "host": "0.0.0.0",
            "port": 8080,
            "theme": "dark"
        }"#;
        let config: Config = serde_json::from_str(json).unwrap();

        assert_eq!(config.progress_file, "/var/lib/study/count.json");
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.theme, Theme::Dark);
    }

    #[test]
    fn test_theme_case_insensitive() {
        for (raw, expected) in [
            ("light", Theme::Light),
            ("LIGHT", Theme::Light),
            ("Dark", Theme::Dark),
            ("dArK", Theme::Dark),
        ] {
            let json = format!(r#"{{"theme": "{raw}"}}"#);
            let config: Config = serde_json::from_str(&json).unwrap();
            assert_eq!(config.theme, expected);
        }
    }

    #[test]
    fn test_invalid_theme_error() {
        let result: std::result::Result<Config, _> = serde_json::from_str(r#"{"theme": "sepia"}"#);
        let err = result.unwrap_err().to_string();
        assert!(err.contains("invalid theme"));
        assert!(err.contains("sepia"));
    }

    #[test]
    fn test_theme_toggle_and_serialization() {
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
        assert_eq!(serde_json::to_string(&Theme::Dark).unwrap(), "\"dark\"");
        assert_eq!(Theme::Light.to_string(), "light");
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let json = r#"{"port": 4000, "unknownField": true}"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.port, 4000);
    }

    #[test]
    fn test_config_validation() {
        assert!(Config::default().validate().is_ok());

        let config = Config {
            progress_file: "  ".to_string(),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(
            matches!(&err, StudyError::ConfigValidationError { message, .. } if message.contains("progressFile")),
            "Expected ConfigValidationError about progressFile, got: {err:?}"
        );

        let config = Config {
            host: "localhost:80".to_string(),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(
            matches!(&err, StudyError::ConfigValidationError { message, .. } if message.contains("host")),
            "Expected ConfigValidationError about host, got: {err:?}"
        );

        let config = Config {
            port: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_file_nonexistent_returns_default() {
        let config = Config::load_from_file(&PathBuf::from("/nonexistent/path/study.json")).unwrap();
        assert_eq!(config.port, 3000);
    }

    #[test]
    fn test_load_from_file_invalid_json() {
        let config_path = std::env::temp_dir().join("test_study_invalid.json");
        std::fs::write(&config_path, "{ not valid json }").unwrap();

        let err = Config::load_from_file(&config_path).unwrap_err();
        assert!(
            matches!(&err, StudyError::ConfigParseError { path, message } if *path == config_path && !message.is_empty()),
            "Expected ConfigParseError with correct path, got: {err:?}"
        );

        std::fs::remove_file(&config_path).ok();
    }

    #[test]
    fn test_load_from_dir_validates_after_parsing() {
        let temp_dir = std::env::temp_dir().join("test_study_dir");
        std::fs::create_dir_all(&temp_dir).unwrap();
        std::fs::write(temp_dir.join("study.json"), r#"{"port": 0}"#).unwrap();

        let err = Config::load_from_dir(&temp_dir).unwrap_err();
        assert!(
            matches!(&err, StudyError::ConfigValidationError { .. }),
            "Expected ConfigValidationError, got: {err:?}"
        );

        std::fs::remove_dir_all(&temp_dir).ok();
    }
}
