//! Application configuration
//!
//! Built-in defaults, then an optional JSON file named by
//! `TRENDING_OI_CONFIG`, then environment overrides.

use crate::error::{AppError, Result};
use crate::trending_oi::OiInterval;
use serde::{Deserialize, Serialize};
use std::path::Path;
use url::Url;

pub const CONFIG_PATH_ENV: &str = "TRENDING_OI_CONFIG";

/// REST API listener
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5100,
        }
    }
}

/// OpenAlgo server providing contract chains and history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    pub host: String,
    pub api_key: String,
    pub timeout_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            host: "http://127.0.0.1:5000".to_string(),
            api_key: String::new(),
            timeout_secs: 30,
        }
    }
}

impl UpstreamConfig {
    /// Parsed host, always with a trailing slash so endpoint paths join under it
    pub fn base_url(&self) -> Result<Url> {
        let mut host = self.host.trim().to_string();
        if !host.ends_with('/') {
            host.push('/');
        }
        Url::parse(&host).map_err(|e| AppError::Config(format!("Invalid upstream host '{}': {}", self.host, e)))
    }
}

/// Defaults applied when a request leaves a parameter out
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    pub strikes_each_side: usize,
    pub interval: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            strikes_each_side: 10,
            interval: "3m".to_string(),
        }
    }
}

impl DefaultsConfig {
    pub fn interval(&self) -> Result<OiInterval> {
        self.interval
            .parse()
            .map_err(|_| AppError::Config(format!("Unsupported default interval: {}", self.interval)))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub upstream: UpstreamConfig,
    pub defaults: DefaultsConfig,
}

impl AppConfig {
    /// Load from file (if configured) and the process environment
    pub fn load() -> Result<Self> {
        let mut config = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) => Self::from_file(Path::new(&path))?,
            Err(_) => Self::default(),
        };
        config.apply_overrides(|name| std::env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&contents)?;
        tracing::info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Apply environment-style overrides from `lookup`
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("OPENALGO_HOST") {
            self.upstream.host = host;
        }
        if let Some(api_key) = lookup("OPENALGO_API_KEY") {
            self.upstream.api_key = api_key;
        }
        if let Some(host) = lookup("TRENDING_OI_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("TRENDING_OI_PORT") {
            self.server.port = port
                .parse()
                .map_err(|_| AppError::Config(format!("Invalid TRENDING_OI_PORT: {}", port)))?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        self.upstream.base_url()?;

        if self.upstream.api_key.trim().is_empty() {
            return Err(AppError::Config("OpenAlgo API key is not set".to_string()));
        }
        if self.upstream.timeout_secs == 0 {
            return Err(AppError::Config("Upstream timeout must be positive".to_string()));
        }
        self.defaults.interval()?;

        Ok(())
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
