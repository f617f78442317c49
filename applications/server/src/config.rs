/// Server configuration
use crate::error::{Result, ServerError};
use jsonwebtoken::Algorithm;
use serde::{Deserialize, Serialize};
use starter_storage::PoolSettings;
use std::path::{Path, PathBuf};

const DEFAULT_CORS_ORIGIN: &str = "http://localhost:5173";

/// Process-wide settings, loaded once at startup and shared read-only
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    // Application
    #[serde(default = "default_app_name")]
    pub app_name: String,

    #[serde(default = "default_app_version")]
    pub app_version: String,

    #[serde(default)]
    pub debug: bool,

    #[serde(default)]
    pub environment: Environment,

    // HTTP
    #[serde(default = "default_server_host")]
    pub server_host: String,

    #[serde(default = "default_server_port")]
    pub server_port: u16,

    #[serde(default = "default_api_v1_prefix")]
    pub api_v1_prefix: String,

    /// Comma-separated list, see [`Settings::cors_origins`]
    #[serde(default = "default_backend_cors_origins")]
    pub backend_cors_origins: String,

    // Database
    pub database_url: String,

    #[serde(default = "default_db_pool_size")]
    pub db_pool_size: u32,

    #[serde(default = "default_db_max_overflow")]
    pub db_max_overflow: u32,

    #[serde(default)]
    pub db_echo: bool,

    // Cache
    #[serde(default = "default_redis_url")]
    pub redis_url: String,

    // Logging
    #[serde(default)]
    pub log_level: LogLevel,

    #[serde(default)]
    pub log_format: LogFormat,

    #[serde(default = "default_log_file_path")]
    pub log_file_path: PathBuf,

    // Security
    pub secret_key: String,

    #[serde(default = "default_algorithm")]
    pub algorithm: Algorithm,

    #[serde(default = "default_access_token_expire_minutes")]
    pub access_token_expire_minutes: i64,

    #[serde(default = "default_refresh_token_expire_days")]
    pub refresh_token_expire_days: i64,

    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,

    // Pagination
    #[serde(default = "default_pagination_max_size")]
    pub pagination_max_size: u32,

    #[serde(default = "default_pagination_default_size")]
    pub pagination_default_size: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Dev,
    Staging,
    Prod,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Dev => "dev",
            Environment::Staging => "staging",
            Environment::Prod => "prod",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    Warning,
    Error,
}

impl LogLevel {
    /// Directive understood by `tracing_subscriber::EnvFilter`
    pub fn as_directive(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warning => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Json,
    Text,
}

impl Settings {
    /// Load configuration from file and environment
    ///
    /// `config.toml` in the working directory is read when present, or
    /// `path` when given. Environment variables (`DATABASE_URL`,
    /// `SECRET_KEY`, ...) override file values.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();

        match path {
            Some(path) => {
                builder = builder.add_source(config::File::from(path));
            }
            None => {
                let default_path = PathBuf::from("config.toml");
                if default_path.exists() {
                    builder = builder.add_source(config::File::from(default_path));
                }
            }
        }

        builder = builder.add_source(config::Environment::default().try_parsing(true));

        let config = builder
            .build()
            .map_err(|e| ServerError::Config(e.to_string()))?;

        Self::from_config(config)
    }

    /// Deserialize and validate an already-built configuration
    pub fn from_config(config: config::Config) -> Result<Self> {
        let settings: Self = config
            .try_deserialize()
            .map_err(|e| ServerError::Config(e.to_string()))?;

        settings.validate()?;
        Ok(settings)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.database_url.trim().is_empty() {
            return Err(ServerError::Config(
                "Database URL is required (set DATABASE_URL)".to_string(),
            ));
        }

        if self.secret_key.is_empty() {
            return Err(ServerError::Config(
                "Secret key is required (set SECRET_KEY)".to_string(),
            ));
        }

        if !matches!(
            self.algorithm,
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512
        ) {
            return Err(ServerError::Config(format!(
                "Unsupported token algorithm {:?}: only HS256, HS384 and HS512 sign with a secret key",
                self.algorithm
            )));
        }

        if !self.api_v1_prefix.starts_with('/') {
            return Err(ServerError::Config(format!(
                "API prefix must start with '/': {}",
                self.api_v1_prefix
            )));
        }

        if !(MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&self.bcrypt_cost) {
            return Err(ServerError::Config(format!(
                "Bcrypt cost {} outside {}..={}",
                self.bcrypt_cost,
                MIN_BCRYPT_COST,
                MAX_BCRYPT_COST
            )));
        }

        if self.pagination_max_size == 0 {
            return Err(ServerError::Config(
                "Pagination max size must be positive".to_string(),
            ));
        }

        if self.pagination_default_size > self.pagination_max_size {
            return Err(ServerError::Config(format!(
                "Pagination default size {} exceeds max size {}",
                self.pagination_default_size, self.pagination_max_size
            )));
        }

        Ok(())
    }

    /// Allowed CORS origins parsed from the comma-separated setting
    pub fn cors_origins(&self) -> Vec<String> {
        let origins: Vec<String> = self
            .backend_cors_origins
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(String::from)
            .collect();

        if origins.is_empty() {
            vec![DEFAULT_CORS_ORIGIN.to_string()]
        } else {
            origins
        }
    }

    pub fn pool_settings(&self) -> PoolSettings {
        PoolSettings {
            pool_size: self.db_pool_size,
            max_overflow: self.db_max_overflow,
            echo: self.db_echo,
        }
    }

    pub fn access_token_ttl(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.access_token_expire_minutes)
    }

    pub fn refresh_token_ttl(&self) -> chrono::Duration {
        chrono::Duration::days(self.refresh_token_expire_days)
    }

    /// Clamp a requested page size to the configured bounds
    pub fn page_limit(&self, requested: Option<u32>) -> u32 {
        requested
            .unwrap_or(self.pagination_default_size)
            .min(self.pagination_max_size)
    }
}

// Default values
fn default_app_name() -> String {
    "Starter Kit".to_string()
}

fn default_app_version() -> String {
    "1.0.0".to_string()
}

fn default_server_host() -> String {
    "0.0.0.0".to_string()
}

fn default_server_port() -> u16 {
    8000
}

fn default_api_v1_prefix() -> String {
    "/api/v1".to_string()
}

fn default_backend_cors_origins() -> String {
    DEFAULT_CORS_ORIGIN.to_string()
}

fn default_db_pool_size() -> u32 {
    20
}

fn default_db_max_overflow() -> u32 {
    10
}

fn default_redis_url() -> String {
    "redis://localhost:6379/0".to_string()
}

fn default_log_file_path() -> PathBuf {
    PathBuf::from("logs/app.log")
}

fn default_algorithm() -> Algorithm {
    Algorithm::HS256
}

fn default_access_token_expire_minutes() -> i64 {
    30
}

fn default_refresh_token_expire_days() -> i64 {
    7
}

/// Work factors accepted by `bcrypt::hash`
const MIN_BCRYPT_COST: u32 = 4;
const MAX_BCRYPT_COST: u32 = 31;

fn default_bcrypt_cost() -> u32 {
    bcrypt::DEFAULT_COST
}

fn default_pagination_max_size() -> u32 {
    100
}

fn default_pagination_default_size() -> u32 {
    20
}
