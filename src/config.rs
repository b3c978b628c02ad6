use crate::error::ConfigError;
use reqwest::Url;
use serde_derive::Deserialize;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_PORTAL_URL: &str = "https://pp.kepco.co.kr/";

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.77 Safari/537.36";

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Deserialize, Debug)]
pub struct AppConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl AppConfig {
    pub fn log_level(&self) -> tracing::Level {
        tracing::Level::from_str(self.log_level.as_str()).unwrap_or(tracing::Level::INFO)
    }
}

pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    envy::from_env::<AppConfig>().map_err(ConfigError::env_parse)
}

fn default_url() -> String {
    DEFAULT_PORTAL_URL.to_string()
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

#[derive(Deserialize, Debug, Clone)]
pub struct PortalConfig {
    #[serde(default = "default_url")]
    pub url: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    // unset means requests never time out
    #[serde(default)]
    pub timeout_sec: Option<u64>,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            user_agent: default_user_agent(),
            timeout_sec: None,
        }
    }
}

impl PortalConfig {
    /// Base URL of the portal, always ending in `/` so endpoint paths join
    /// below it instead of replacing its last segment.
    pub fn base_url(&self) -> Result<Url, ConfigError> {
        let mut raw = self.url.trim().to_string();
        if !raw.ends_with('/') {
            raw.push('/');
        }
        Url::parse(&raw).map_err(|e| ConfigError::invalid("url", e))
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_sec.map(Duration::from_secs)
    }
}

pub fn load_portal_config() -> Result<PortalConfig, ConfigError> {
    let config = envy::prefixed("KEPCO_")
        .from_env::<PortalConfig>()
        .map_err(ConfigError::env_parse)?;
    config.base_url()?;
    Ok(config)
}
