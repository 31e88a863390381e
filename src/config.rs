// src/config.rs
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

pub const API_KEY_VAR: &str = "OPENAI_API_KEY";
pub const MODEL_VAR: &str = "OPENAI_MODEL";
pub const SYSTEM_PROMPT_VAR: &str = "PALSS_SYSTEM_PROMPT";

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_SYSTEM_PROMPT: &str =
    "あなたはSNS運用のヒアリングを行うアシスタントです。簡潔に丁寧に回答してください。";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
}

/// Settings consulted on every chat request.
#[derive(Clone, PartialEq, Eq)]
pub struct ChatConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub system_prompt: String,
}

// Never print the key itself.
impl fmt::Debug for ChatConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatConfig")
            .field("api_key_present", &self.api_key.is_some())
            .field("api_key_len", &self.api_key.as_ref().map_or(0, String::len))
            .field("model", &self.model)
            .field("system_prompt", &self.system_prompt)
            .finish()
    }
}

impl ChatConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the config from an arbitrary variable lookup.
    ///
    /// An empty key counts as missing and an empty model falls back to the
    /// default. An empty system prompt is kept as is.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(API_KEY_VAR).filter(|k| !k.is_empty());
        let model = lookup(MODEL_VAR)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let system_prompt = lookup(SYSTEM_PROMPT_VAR)
            .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string());

        Self {
            api_key,
            model,
            system_prompt,
        }
    }
}

/// Where the handler gets its [`ChatConfig`] from.
#[derive(Debug, Clone, Default)]
pub enum ConfigSource {
    /// Re-read the process environment on every request.
    #[default]
    Environment,
    Fixed(ChatConfig),
}

impl ConfigSource {
    pub fn load(&self) -> ChatConfig {
        match self {
            ConfigSource::Environment => ChatConfig::from_env(),
            ConfigSource::Fixed(config) => config.clone(),
        }
    }
}

/// Process-level settings, read once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub openai_base_url: String,
    /// `None` leaves the HTTP client's own default in place.
    pub request_timeout: Option<Duration>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            openai_base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            request_timeout: None,
        }
    }
}

impl ServerSettings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();

        if let Some(host) = lookup("PALSS_HOST").filter(|h| !h.trim().is_empty()) {
            settings.host = host.trim().to_string();
        }

        if let Some(port) = lookup("PALSS_PORT").filter(|p| !p.trim().is_empty()) {
            settings.port = port.trim().parse().map_err(|_| ConfigError::Invalid {
                var: "PALSS_PORT",
                value: port.clone(),
            })?;
        }

        if let Some(url) = lookup("OPENAI_BASE_URL").filter(|u| !u.trim().is_empty()) {
            settings.openai_base_url = url.trim().trim_end_matches('/').to_string();
        }

        if let Some(secs) = lookup("OPENAI_TIMEOUT_SECS").filter(|s| !s.trim().is_empty()) {
            let parsed: u64 = secs
                .trim()
                .parse()
                .ok()
                .filter(|s| *s > 0)
                .ok_or_else(|| ConfigError::Invalid {
                    var: "OPENAI_TIMEOUT_SECS",
                    value: secs.clone(),
                })?;
            settings.request_timeout = Some(Duration::from_secs(parsed));
        }

        Ok(settings)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Outcome of looking for a dotenv file at startup.
#[derive(Debug, Clone)]
pub struct EnvFile {
    pub path: PathBuf,
    pub exists: bool,
    pub loaded: bool,
}

/// `PALSS_ENV_FILE`, or `./.env` when unset.
pub fn dotenv_path() -> PathBuf {
    match std::env::var_os("PALSS_ENV_FILE") {
        Some(path) if !path.is_empty() => PathBuf::from(path),
        _ => PathBuf::from(".env"),
    }
}

/// Loads the dotenv file at `path`, letting its values override the
/// inherited environment.
pub fn load_dotenv(path: impl Into<PathBuf>) -> EnvFile {
    let path = path.into();
    let exists = path.exists();
    let loaded = exists && dotenvy::from_path_override(&path).is_ok();

    EnvFile {
        path,
        exists,
        loaded,
    }
}

pub fn current_dir_display() -> String {
    std::env::current_dir()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|_| "<unknown>".to_string())
}

pub fn log_startup_diagnostics(env_file: &EnvFile) {
    let config = ChatConfig::from_env();

    tracing::info!("dotenv path: {}", env_file.path.display());
    tracing::info!("dotenv exists: {}", env_file.exists);
    if env_file.exists && !env_file.loaded {
        tracing::warn!("dotenv file could not be parsed: {}", env_file.path.display());
    }
    tracing::info!("cwd: {}", current_dir_display());
    tracing::info!("{} present: {}", API_KEY_VAR, config.api_key.is_some());
    tracing::info!(
        "{} length: {}",
        API_KEY_VAR,
        config.api_key.as_ref().map_or(0, String::len)
    );
}
