//! Runtime configuration.
//!
//! # Environment Variables
//!
//! - `STICKER_DIARY_FILE`: path of the diary data file
//!   (defaults to `<data dir>/sticker-diary/chic_daily_logs_2026.json`)
//! - `STICKER_DIARY_LOG_FILE`: log file (defaults to `sticker-diary.log` next to the data file)
//! - `STICKER_DIARY_LOG_FORMAT`: `text` (default) or `json`
//! - `STICKER_DIARY_LOG`: tracing filter directives, read by [`crate::logging`]
//! - `GEMINI_API_KEY`: enables generated editorials
//! - `STICKER_DIARY_MODEL`: Gemini model name
//! - `STICKER_DIARY_API_BASE`: Gemini API base URL
//! - `STICKER_DIARY_TIMEOUT_SECS`: upper bound on one editorial request

use crate::errors::ConfigError;
use crate::storage::NAMESPACE_KEY;
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Clone)]
pub struct Config {
    pub data_file: PathBuf,
    pub log_file: PathBuf,
    pub log_format: LogFormat,
    pub api_key: Option<String>,
    pub model: String,
    pub api_base: String,
    pub generation_timeout: Duration,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("data_file", &self.data_file)
            .field("log_file", &self.log_file)
            .field("log_format", &self.log_format)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("model", &self.model)
            .field("api_base", &self.api_base)
            .field("generation_timeout", &self.generation_timeout)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let data_file = match var("STICKER_DIARY_FILE") {
            Some(path) => PathBuf::from(path),
            None => dirs::data_dir()
                .ok_or(ConfigError::NoDataDir)?
                .join("sticker-diary")
                .join(format!("{NAMESPACE_KEY}.json")),
        };

        let log_file = match var("STICKER_DIARY_LOG_FILE") {
            Some(path) => PathBuf::from(path),
            None => data_file.with_file_name("sticker-diary.log"),
        };

        let log_format = match var("STICKER_DIARY_LOG_FORMAT").as_deref() {
            None | Some("text") => LogFormat::Text,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(ConfigError::InvalidValue {
                    name: "STICKER_DIARY_LOG_FORMAT",
                    expected: "\"text\" or \"json\"",
                    value: other.to_string(),
                })
            }
        };

        let generation_timeout = match var("STICKER_DIARY_TIMEOUT_SECS") {
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(ConfigError::InvalidValue {
                        name: "STICKER_DIARY_TIMEOUT_SECS",
                        expected: "a positive number of seconds",
                        value: raw,
                    })
                }
            },
        };

        Ok(Config {
            data_file,
            log_file,
            log_format,
            api_key: var("GEMINI_API_KEY"),
            model: var("STICKER_DIARY_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            api_base: var("STICKER_DIARY_API_BASE")
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            generation_timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| map.get(name).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let c = config(&[("STICKER_DIARY_FILE", "/tmp/diary/logs.json")]).unwrap();
        assert_eq!(c.data_file, PathBuf::from("/tmp/diary/logs.json"));
        assert_eq!(c.log_file, PathBuf::from("/tmp/diary/sticker-diary.log"));
        assert_eq!(c.log_format, LogFormat::Text);
        assert_eq!(c.api_key, None);
        assert_eq!(c.model, DEFAULT_MODEL);
        assert_eq!(c.api_base, DEFAULT_API_BASE);
        assert_eq!(c.generation_timeout, Duration::from_secs(20));
    }

    #[test]
    fn overrides_are_read() {
        let c = config(&[
            ("STICKER_DIARY_FILE", "/data/d.json"),
            ("STICKER_DIARY_LOG_FILE", "/logs/d.log"),
            ("STICKER_DIARY_LOG_FORMAT", "json"),
            ("GEMINI_API_KEY", "k"),
            ("STICKER_DIARY_MODEL", "gemini-pro"),
            ("STICKER_DIARY_TIMEOUT_SECS", "5"),
        ])
        .unwrap();
        assert_eq!(c.log_file, PathBuf::from("/logs/d.log"));
        assert_eq!(c.log_format, LogFormat::Json);
        assert_eq!(c.api_key.as_deref(), Some("k"));
        assert_eq!(c.model, "gemini-pro");
        assert_eq!(c.generation_timeout, Duration::from_secs(5));
    }

    #[test]
    fn blank_api_key_means_offline() {
        let c = config(&[("STICKER_DIARY_FILE", "d.json"), ("GEMINI_API_KEY", "  ")]).unwrap();
        assert!(c.api_key.is_none());
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(config(&[("STICKER_DIARY_FILE", "d"), ("STICKER_DIARY_TIMEOUT_SECS", "0")]).is_err());
        assert!(config(&[("STICKER_DIARY_FILE", "d"), ("STICKER_DIARY_TIMEOUT_SECS", "soon")]).is_err());
        assert!(config(&[("STICKER_DIARY_FILE", "d"), ("STICKER_DIARY_LOG_FORMAT", "xml")]).is_err());
    }

    #[test]
    fn debug_output_hides_the_key() {
        let c = config(&[("STICKER_DIARY_FILE", "d"), ("GEMINI_API_KEY", "super-secret")]).unwrap();
        let printed = format!("{c:?}");
        assert!(!printed.contains("super-secret"));
        assert!(printed.contains("REDACTED"));
    }
}
