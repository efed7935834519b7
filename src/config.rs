//! Configuration loading
//!
//! Settings come from a TOML file (explicit path, `$TRACKRECORD_CONFIG`, or
//! `<config_home>/trackrecord/config.toml`) with environment overrides on
//! top. Upstream credentials are read from the environment only.

use anyhow::Context;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::error::{Result, TrackRecordError};

pub const CONFIG_ENV: &str = "TRACKRECORD_CONFIG";
pub const PROXY_URL_ENV: &str = "TRACKRECORD_PROXY_URL";
pub const UPSTREAM_URL_ENV: &str = "TRACKRECORD_UPSTREAM_URL";
pub const UPSTREAM_USER_ENV: &str = "TRACKRECORD_UPSTREAM_USER";
pub const UPSTREAM_PASSWORD_ENV: &str = "TRACKRECORD_UPSTREAM_PASSWORD";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub proxy: ProxyConfig,
    pub upstream: UpstreamConfig,
    /// Per-request timeout
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            proxy: ProxyConfig::default(),
            upstream: UpstreamConfig::default(),
            timeout_secs: 30,
        }
    }
}

/// Internal proxy serving `algo-main` and `algo-table`
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProxyConfig {
    pub base_url: String,
    pub chart_path: String,
    pub table_path: String,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            chart_path: "api/data/charts/algo-main".to_string(),
            table_path: "api/data/charts/algo-table".to_string(),
        }
    }
}

/// Upstream analytics service addressed with positional path segments
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    pub base_url: Option<String>,
    pub metric: String,
    pub instrument: String,
    pub chart_endpoint: String,
    pub table_endpoint: String,
    #[serde(skip)]
    pub credentials: Option<Credentials>,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            metric: "am".to_string(),
            instrument: "spy".to_string(),
            chart_endpoint: "returnChart".to_string(),
            table_endpoint: "dataTable".to_string(),
            credentials: None,
        }
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

impl Config {
    /// Load configuration from `path`, `$TRACKRECORD_CONFIG` or the default
    /// location, then apply process environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let lookup = |key: &str| std::env::var(key).ok().filter(|v| !v.is_empty());

        let explicit = path
            .map(Path::to_path_buf)
            .or_else(|| lookup(CONFIG_ENV).map(PathBuf::from));

        let config = match explicit {
            Some(p) => Self::from_file(&p)?,
            None => match default_path().filter(|p| p.exists()) {
                Some(p) => Self::from_file(&p)?,
                None => {
                    debug!("No config file found, using defaults");
                    Self::default()
                }
            },
        };

        Ok(config.with_overrides(lookup))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(TrackRecordError::from)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = Self::from_toml(&text)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| TrackRecordError::Config(e.to_string()).into())
    }

    /// Apply environment overrides through `lookup`
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(PROXY_URL_ENV) {
            self.proxy.base_url = url;
        }
        if let Some(url) = lookup(UPSTREAM_URL_ENV) {
            self.upstream.base_url = Some(url);
        }
        if let (Some(username), Some(password)) =
            (lookup(UPSTREAM_USER_ENV), lookup(UPSTREAM_PASSWORD_ENV))
        {
            self.upstream.credentials = Some(Credentials { username, password });
        }
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

/// `<config_home>/trackrecord/config.toml`
pub fn default_path() -> Option<PathBuf> {
    dir_spec::config_home().map(|dir| dir.join("trackrecord").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.proxy.base_url, "http://localhost:3000");
        assert_eq!(config.proxy.chart_path, "api/data/charts/algo-main");
        assert_eq!(config.upstream.metric, "am");
        assert_eq!(config.upstream.instrument, "spy");
        assert!(config.upstream.base_url.is_none());
        assert_eq!(config.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml(
            r#"
            timeout_secs = 5

            [upstream]
            base_url = "https://analytics.example.com:8883"
            instrument = "qqq"
            "#,
        )
        .unwrap();
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(
            config.upstream.base_url.as_deref(),
            Some("https://analytics.example.com:8883")
        );
        assert_eq!(config.upstream.instrument, "qqq");
        assert_eq!(config.upstream.metric, "am");
        assert_eq!(config.proxy.table_path, "api/data/charts/algo-table");
    }

    #[test]
    fn test_credentials_are_not_read_from_file() {
        let config = Config::from_toml(
            r#"
            [upstream]
            credentials = "user:secret"
            "#,
        );
        // unknown/skipped keys are ignored, nothing is picked up
        assert!(config.unwrap().upstream.credentials.is_none());
    }

    #[test]
    fn test_invalid_toml_is_a_config_error() {
        let err = Config::from_toml("timeout_secs = \"soon\"").unwrap_err();
        assert!(err.to_string().starts_with("config error"));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            (PROXY_URL_ENV, "http://127.0.0.1:8080"),
            (UPSTREAM_USER_ENV, "reader"),
            (UPSTREAM_PASSWORD_ENV, "hunter2"),
        ]);
        let config =
            Config::default().with_overrides(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(config.proxy.base_url, "http://127.0.0.1:8080");
        let creds = config.upstream.credentials.unwrap();
        assert_eq!(creds.username, "reader");
        assert!(!format!("{:?}", creds).contains("hunter2"));
    }

    #[test]
    fn test_user_without_password_is_ignored() {
        let config = Config::default().with_overrides(|k| {
            (k == UPSTREAM_USER_ENV).then(|| "reader".to_string())
        });
        assert!(config.upstream.credentials.is_none());
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[proxy]\nbase_url = \"http://proxy.local\"\n").unwrap();
        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.proxy.base_url, "http://proxy.local");

        let missing = Config::from_file(&dir.path().join("nope.toml"));
        assert!(missing.is_err());
    }
}
