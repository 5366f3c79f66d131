//! Application configuration.

use serde::Deserialize;
use std::path::Path;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Authentication configuration.
    pub auth: AuthConfig,
    /// SMTP mailer configuration (optional, mail disabled when absent).
    #[serde(default)]
    pub smtp: Option<SmtpConfig>,
    /// AI text-generation configuration (optional, AI disabled when absent).
    #[serde(default)]
    pub ai: Option<AiConfig>,
    /// Geocoding configuration (optional, disabled when absent).
    #[serde(default)]
    pub geocoding: Option<GeocodingConfig>,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to bind to.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Public URL of this instance.
    pub url: String,
    /// Frontend URL used in outbound email links.
    #[serde(default)]
    pub frontend_url: Option<String>,
}

/// Database connection configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// Authentication configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Secret used to sign JWTs.
    pub jwt_secret: String,
    /// Token lifetime in seconds.
    #[serde(default = "default_jwt_expiry_secs")]
    pub jwt_expiry_secs: i64,
}

/// SMTP mailer configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SmtpConfig {
    /// SMTP relay host.
    pub host: String,
    /// SMTP port.
    #[serde(default = "default_smtp_port")]
    pub port: u16,
    /// SMTP username.
    #[serde(default)]
    pub username: Option<String>,
    /// SMTP password.
    #[serde(default)]
    pub password: Option<String>,
    /// From address for outbound mail.
    pub from_address: String,
    /// Display name for outbound mail.
    #[serde(default = "default_from_name")]
    pub from_name: String,
}

/// AI provider selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AiProviderKind {
    /// OpenAI-compatible chat completions API.
    OpenAi,
    /// Anthropic messages API.
    Anthropic,
}

/// AI text-generation configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    /// Active provider.
    pub provider: AiProviderKind,
    /// Provider API key.
    pub api_key: String,
    /// Model identifier (e.g. "gpt-4o-mini", "claude-3-haiku-20240307").
    pub model: String,
    /// Base URL override (for OpenAI-compatible proxies).
    #[serde(default)]
    pub base_url: Option<String>,
    /// Timeout for smart-reply enrichment in milliseconds.
    #[serde(default = "default_smart_reply_timeout_ms")]
    pub smart_reply_timeout_ms: u64,
}

/// Geocoding configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct GeocodingConfig {
    /// Geocoding endpoint URL.
    pub endpoint: String,
    /// API key, when the endpoint requires one.
    #[serde(default)]
    pub api_key: Option<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    3000
}

const fn default_max_connections() -> u32 {
    100
}

const fn default_min_connections() -> u32 {
    5
}

const fn default_jwt_expiry_secs() -> i64 {
    // Matches the 7-day sessions the frontend expects
    7 * 24 * 60 * 60
}

const fn default_smtp_port() -> u16 {
    587
}

fn default_from_name() -> String {
    "StayHub".to_string()
}

const fn default_smart_reply_timeout_ms() -> u64 {
    5000
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Configuration is loaded in the following order:
    /// 1. `config/default.toml`
    /// 2. `config/{environment}.toml` (based on `STAYHUB_ENV`)
    /// 3. Environment variables with `STAYHUB_` prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        let env = std::env::var("STAYHUB_ENV").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("STAYHUB")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Load configuration from a specific file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(
                config::Environment::with_prefix("STAYHUB")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
