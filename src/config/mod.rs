use serde::Deserialize;
use std::env;
use std::str::FromStr;

/// Top-level configuration, one section per concern.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub backend: BackendConfig,
    pub session: SessionConfig,
    pub features: FeatureFlags,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub rust_log: String,
}

impl AppConfig {
    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }
}

// REST backend the portal data comes from
#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    pub url: String,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    pub cookie_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeatureFlags {
    pub enable_analytics: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

fn var_or(name: &'static str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::Missing(name))
}

fn parsed<T: FromStr>(name: &'static str, default: &str) -> Result<T, ConfigError> {
    let value = var_or(name, default);
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Invalid { name, value })
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let backend_url = required("BACKEND_URL")?;
        if !(backend_url.starts_with("http://") || backend_url.starts_with("https://")) {
            return Err(ConfigError::Invalid {
                name: "BACKEND_URL",
                value: backend_url,
            });
        }

        Ok(Config {
            app: AppConfig {
                host: var_or("HOST", "0.0.0.0"),
                port: parsed("PORT", "8000")?,
                environment: var_or("ENVIRONMENT", "development"),
                rust_log: var_or("RUST_LOG", "africa_events=debug,tower_http=debug"),
            },
            backend: BackendConfig {
                url: backend_url.trim_end_matches('/').to_string(),
                timeout_seconds: parsed("BACKEND_TIMEOUT_SECONDS", "30")?,
            },
            session: SessionConfig {
                cookie_name: var_or("SESSION_COOKIE_NAME", "token"),
            },
            features: FeatureFlags {
                enable_analytics: parsed("ENABLE_ANALYTICS", "true")?,
            },
        })
    }

    /// Configuration pointing at a given backend, with every other value at its default.
    pub fn for_backend(url: &str) -> Self {
        Config {
            app: AppConfig {
                host: "127.0.0.1".to_string(),
                port: 8000,
                environment: "development".to_string(),
                rust_log: "africa_events=debug".to_string(),
            },
            backend: BackendConfig {
                url: url.trim_end_matches('/').to_string(),
                timeout_seconds: 30,
            },
            session: SessionConfig {
                cookie_name: "token".to_string(),
            },
            features: FeatureFlags {
                enable_analytics: true,
            },
        }
    }
}
