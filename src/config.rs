//! Configuration parsing and validation for gemini-relay.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::net::SocketAddr;
use std::path::Path;

/// Environment variable consulted when the config file carries no API key.
pub const CONVENTION_API_KEY_VAR: &str = "GEMINI_API_KEY";

/// Default upstream endpoint for the Generative Language API.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Candidate model identifiers, in the order they are tried at startup.
pub const DEFAULT_CANDIDATE_MODELS: [&str; 4] = [
    "gemini-2.5-flash",
    "gemini-pro",
    "gemini-2.0-flash",
    "models/gemini-pro",
];

/// Root configuration structure.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub server: ServerConfig,
    pub gemini: GeminiConfig,
    pub logging: LoggingConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Address to listen on (e.g., "127.0.0.1:5001")
    #[serde(default = "default_listen")]
    pub listen: String,
}

fn default_listen() -> String {
    "127.0.0.1:5001".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}

impl ServerConfig {
    /// Parsed listen address. Only loopback addresses are accepted since
    /// callers are not authenticated.
    pub fn listen_addr(&self) -> Result<SocketAddr, ConfigError> {
        let addr: SocketAddr = self.listen.parse().map_err(|e| {
            ConfigError::Validation(format!("Invalid listen address '{}': {}", self.listen, e))
        })?;

        if !addr.ip().is_loopback() {
            return Err(ConfigError::Validation(format!(
                "Listen address '{}' is not a loopback address",
                self.listen
            )));
        }

        Ok(addr)
    }
}

/// API key wrapper that redacts in Debug/Display/Serialize and zeroizes on drop.
///
/// Only accessible via `.expose_secret()`, so every use is grep-auditable.
#[derive(Clone)]
pub struct ApiKey(SecretString);

impl ApiKey {
    /// Access the raw key value.
    pub fn expose_secret(&self) -> &str {
        self.0.expose_secret()
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[REDACTED]")
    }
}

impl std::fmt::Display for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[REDACTED]")
    }
}

impl Serialize for ApiKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str("[REDACTED]")
    }
}

impl<'de> Deserialize<'de> for ApiKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(|s| ApiKey(SecretString::from(s)))
    }
}

impl From<String> for ApiKey {
    fn from(s: String) -> Self {
        ApiKey(SecretString::from(s))
    }
}

impl From<&str> for ApiKey {
    fn from(s: &str) -> Self {
        ApiKey(SecretString::from(s))
    }
}

/// How the Gemini API key was resolved.
#[derive(Debug, Clone, PartialEq)]
pub enum KeySource {
    /// Key was a literal string in config (no ${} references)
    Literal,
    /// Key contained ${VAR} references expanded from environment
    EnvExpanded,
    /// Key was picked up from the convention env var (holds var name)
    Convention(String),
    /// No key available
    None,
}

impl std::fmt::Display for KeySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeySource::Literal => write!(f, "config-literal"),
            KeySource::EnvExpanded => write!(f, "env-expanded"),
            KeySource::Convention(var) => write!(f, "convention ({})", var),
            KeySource::None => write!(f, "none"),
        }
    }
}

/// Upstream Gemini configuration.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// API key sent as `x-goog-api-key`
    pub api_key: Option<ApiKey>,
    /// Base URL of the Generative Language API
    pub base_url: String,
    /// Candidate model identifiers, highest priority first
    pub models: Vec<String>,
    /// Whole-request timeout for upstream calls; `None` waits indefinitely
    pub request_timeout_secs: Option<u64>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_models() -> Vec<String> {
    DEFAULT_CANDIDATE_MODELS
        .iter()
        .map(|m| m.to_string())
        .collect()
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            models: default_models(),
            request_timeout_secs: None,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level used when `RUST_LOG` is not set
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Configuration validation error: {0}")]
    Validation(String),

    #[error("Environment variable '{var}' not set for '{field}': {message}")]
    EnvVar {
        var: String,
        field: String,
        message: String,
    },
}

/// Raw `[gemini]` section deserialized directly from TOML.
/// api_key is `Option<String>` so it may contain `${VAR}` references not yet expanded.
#[derive(Deserialize)]
pub struct RawGeminiConfig {
    api_key: Option<String>,
    #[serde(default = "default_base_url")]
    base_url: String,
    #[serde(default = "default_models")]
    models: Vec<String>,
    request_timeout_secs: Option<u64>,
}

impl Default for RawGeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            models: default_models(),
            request_timeout_secs: None,
        }
    }
}

/// Raw configuration deserialized directly from TOML.
#[derive(Deserialize, Default)]
pub struct RawConfig {
    #[serde(default)]
    server: ServerConfig,
    #[serde(default)]
    gemini: RawGeminiConfig,
    #[serde(default)]
    logging: LoggingConfig,
}

/// Expand all `${VAR}` references in a string using a custom lookup function.
///
/// Supports multiple `${VAR}` in one string. Fails on the first missing
/// variable, unclosed `${`, or empty variable name.
fn expand_env_vars_with<F>(input: &str, field: &str, lookup: F) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if !input.contains("${") {
        return Ok(input.to_string());
    }

    let mut result = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find("${") {
        result.push_str(&rest[..start]);
        let after = &rest[start + 2..];

        let end = after.find('}').ok_or_else(|| ConfigError::EnvVar {
            var: "<unclosed>".to_string(),
            field: field.to_string(),
            message: "Unclosed '${' in config value".to_string(),
        })?;

        let var_name = &after[..end];
        if var_name.is_empty() {
            return Err(ConfigError::EnvVar {
                var: "".to_string(),
                field: field.to_string(),
                message: "Empty variable name in '${}' reference".to_string(),
            });
        }

        let value = lookup(var_name).ok_or_else(|| ConfigError::EnvVar {
            var: var_name.to_string(),
            field: field.to_string(),
            message: format!("Environment variable '{}' is not set", var_name),
        })?;

        result.push_str(&value);
        rest = &after[end + 1..];
    }

    result.push_str(rest);
    Ok(result)
}

fn env_lookup(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

impl Config {
    /// Convert raw (deserialized) config to final config, resolving the API key
    /// from the process environment.
    pub fn from_raw(raw: RawConfig) -> Result<(Self, KeySource), ConfigError> {
        Self::from_raw_with(raw, env_lookup)
    }

    /// Convert raw config using a custom environment lookup.
    ///
    /// - `api_key` containing `${VAR}`: expanded, source = `EnvExpanded`
    /// - literal `api_key`: wrapped directly, source = `Literal`
    /// - absent `api_key`: `GEMINI_API_KEY` is tried, source = `Convention` or `None`
    pub fn from_raw_with<F>(raw: RawConfig, lookup: F) -> Result<(Self, KeySource), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let RawGeminiConfig {
            api_key,
            base_url,
            models,
            request_timeout_secs,
        } = raw.gemini;

        let (api_key, source) = match api_key {
            Some(raw_key) if raw_key.contains("${") => {
                let expanded = expand_env_vars_with(&raw_key, "gemini.api_key", &lookup)?;
                (Some(ApiKey::from(expanded)), KeySource::EnvExpanded)
            }
            Some(raw_key) => (Some(ApiKey::from(raw_key)), KeySource::Literal),
            None => match lookup(CONVENTION_API_KEY_VAR) {
                Some(value) => (
                    Some(ApiKey::from(value)),
                    KeySource::Convention(CONVENTION_API_KEY_VAR.to_string()),
                ),
                None => (None, KeySource::None),
            },
        };

        let config = Config {
            server: raw.server,
            gemini: GeminiConfig {
                api_key,
                base_url,
                models,
                request_timeout_secs,
            },
            logging: raw.logging,
        };
        config.validate()?;

        Ok((config, source))
    }

    /// Parse configuration from a TOML string with environment variable expansion.
    pub fn parse_str(content: &str) -> Result<(Self, KeySource), ConfigError> {
        let raw: RawConfig = toml::from_str(content)?;
        Self::from_raw(raw)
    }

    /// Load configuration from a TOML file with environment variable expansion.
    pub fn from_file_with_env(path: impl AsRef<Path>) -> Result<(Self, KeySource), ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io {
            path: path.as_ref().display().to_string(),
            source: e,
        })?;

        Self::parse_str(&content)
    }

    /// Load from `path` when given, otherwise use defaults plus the environment.
    pub fn load(path: Option<&Path>) -> Result<(Self, KeySource), ConfigError> {
        match path {
            Some(path) => Self::from_file_with_env(path),
            None => Self::from_raw(RawConfig::default()),
        }
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        self.server.listen_addr()?;

        if self.gemini.base_url.trim().is_empty() {
            return Err(ConfigError::Validation(
                "gemini.base_url must not be empty".to_string(),
            ));
        }

        if self.gemini.models.iter().any(|m| m.trim().is_empty()) {
            return Err(ConfigError::Validation(
                "gemini.models must not contain empty identifiers".to_string(),
            ));
        }

        Ok(())
    }
}
