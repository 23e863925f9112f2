//! Runtime configuration.
//!
//! Values start from built-in defaults, then environment variables
//! (`WORDPOP_*`) override them. Command-line flags are applied by the host on
//! top of the returned value.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_DICTIONARY_URL: &str = "http://localhost:8080";
pub const DEFAULT_CHAT_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
pub const DEFAULT_CHAT_MODEL: &str = "llama3-70b-8192";
/// The popup translates into German.
pub const DEFAULT_POPUP_TARGET_LANGUAGE: &str = "de";
pub const DEFAULT_DB_FILE_NAME: &str = "wordpop.sqlite3";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

pub const ENV_DICTIONARY_URL: &str = "WORDPOP_DICTIONARY_URL";
pub const ENV_CHAT_URL: &str = "WORDPOP_CHAT_URL";
pub const ENV_CHAT_API_KEY: &str = "WORDPOP_CHAT_API_KEY";
pub const ENV_CHAT_MODEL: &str = "WORDPOP_CHAT_MODEL";
pub const ENV_TARGET_LANGUAGE: &str = "WORDPOP_TARGET_LANGUAGE";
pub const ENV_DB_PATH: &str = "WORDPOP_DB_PATH";
pub const ENV_LOG_DIR: &str = "WORDPOP_LOG_DIR";
pub const ENV_LOG_LEVEL: &str = "WORDPOP_LOG_LEVEL";
pub const ENV_HTTP_TIMEOUT_SECS: &str = "WORDPOP_HTTP_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub dictionary_url: String,
    pub chat_url: String,
    pub chat_api_key: String,
    pub chat_model: String,
    pub target_language: String,
    pub db_path: PathBuf,
    pub log_dir: PathBuf,
    pub log_level: String,
    pub http_timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            dictionary_url: DEFAULT_DICTIONARY_URL.to_string(),
            chat_url: DEFAULT_CHAT_URL.to_string(),
            chat_api_key: String::new(),
            chat_model: DEFAULT_CHAT_MODEL.to_string(),
            target_language: DEFAULT_POPUP_TARGET_LANGUAGE.to_string(),
            db_path: PathBuf::from(DEFAULT_DB_FILE_NAME),
            log_dir: std::env::temp_dir().join("wordpop").join("logs"),
            log_level: crate::logging::default_log_level().to_string(),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        }
    }
}

impl AppConfig {
    /// Defaults overridden by process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each `WORDPOP_*` key.
    ///
    /// Blank values are ignored.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let mut config = Self::default();
        if let Some(value) = read(ENV_DICTIONARY_URL) {
            config.dictionary_url = value;
        }
        if let Some(value) = read(ENV_CHAT_URL) {
            config.chat_url = value;
        }
        if let Some(value) = read(ENV_CHAT_API_KEY) {
            config.chat_api_key = value;
        }
        if let Some(value) = read(ENV_CHAT_MODEL) {
            config.chat_model = value;
        }
        if let Some(value) = read(ENV_TARGET_LANGUAGE) {
            config.target_language = value;
        }
        if let Some(value) = read(ENV_DB_PATH) {
            config.db_path = PathBuf::from(value);
        }
        if let Some(value) = read(ENV_LOG_DIR) {
            config.log_dir = PathBuf::from(value);
        }
        if let Some(value) = read(ENV_LOG_LEVEL) {
            config.log_level = value;
        }
        if let Some(value) = read(ENV_HTTP_TIMEOUT_SECS) {
            let secs: u64 = value.parse().map_err(|_| ConfigError::InvalidValue {
                key: ENV_HTTP_TIMEOUT_SECS,
                value: value.clone(),
            })?;
            config.http_timeout = Duration::from_secs(secs);
        }

        config.validate()?;
        Ok(config)
    }

    /// Checks values that would only fail later at request time.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (key, url) in [
            (ENV_DICTIONARY_URL, &self.dictionary_url),
            (ENV_CHAT_URL, &self.chat_url),
        ] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::InvalidValue {
                    key,
                    value: url.clone(),
                });
            }
        }
        if self.http_timeout.is_zero() {
            return Err(ConfigError::InvalidValue {
                key: ENV_HTTP_TIMEOUT_SECS,
                value: "0".to_string(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidValue { key: &'static str, value: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue { key, value } => write!(f, "invalid value for {key}: `{value}`"),
        }
    }
}

impl Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::{AppConfig, ConfigError, DEFAULT_DICTIONARY_URL, ENV_HTTP_TIMEOUT_SECS};
    use std::collections::HashMap;
    use std::time::Duration;

    fn from_pairs(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn empty_environment_keeps_defaults() {
        let config = from_pairs(&[]).expect("defaults are valid");
        assert_eq!(config.dictionary_url, DEFAULT_DICTIONARY_URL);
        assert_eq!(config.target_language, "de");
        assert!(config.chat_api_key.is_empty());
    }

    #[test]
    fn environment_overrides_defaults() {
        let config = from_pairs(&[
            ("WORDPOP_DICTIONARY_URL", "http://127.0.0.1:9000"),
            ("WORDPOP_CHAT_API_KEY", " secret "),
            ("WORDPOP_HTTP_TIMEOUT_SECS", "5"),
            ("WORDPOP_CHAT_MODEL", "   "),
        ])
        .expect("valid overrides");
        assert_eq!(config.dictionary_url, "http://127.0.0.1:9000");
        assert_eq!(config.chat_api_key, "secret");
        assert_eq!(config.http_timeout, Duration::from_secs(5));
        assert_eq!(config.chat_model, "llama3-70b-8192");
    }

    #[test]
    fn rejects_bad_timeout_and_scheme() {
        let err = from_pairs(&[("WORDPOP_HTTP_TIMEOUT_SECS", "soon")]).expect_err("bad timeout");
        assert_eq!(
            err,
            ConfigError::InvalidValue {
                key: ENV_HTTP_TIMEOUT_SECS,
                value: "soon".to_string()
            }
        );
        assert!(from_pairs(&[("WORDPOP_CHAT_URL", "ftp://x")]).is_err());
        assert!(from_pairs(&[("WORDPOP_HTTP_TIMEOUT_SECS", "0")]).is_err());
    }
}
