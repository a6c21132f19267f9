//! Client settings: defaults, then `items.toml`, then environment, then explicit overrides.

use std::{fs, time::Duration};

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use url::Url;

pub const CONFIG_FILE: &str = "items.toml";
pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub api_url: String,
    pub health_interval: Duration,
    pub request_timeout: Duration,
    pub health_timeout: Duration,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            health_interval: Duration::from_secs(30),
            request_timeout: Duration::from_secs(10),
            health_timeout: Duration::from_secs(5),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    api_url: Option<String>,
    health_interval_secs: Option<u64>,
    request_timeout_secs: Option<u64>,
    health_timeout_secs: Option<u64>,
}

impl ClientSettings {
    /// Resolves settings from the working directory and process environment.
    /// `api_url_override` (e.g. a command line flag) wins over every other source.
    pub fn load(api_url_override: Option<String>) -> Result<Self> {
        let mut settings = Self::default();

        match fs::read_to_string(CONFIG_FILE) {
            Ok(raw) => settings
                .apply_file_config(&raw)
                .with_context(|| format!("invalid {CONFIG_FILE}"))?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => {
                return Err(err).with_context(|| format!("failed to read {CONFIG_FILE}"));
            }
        }

        settings.apply_env(|key| std::env::var(key).ok())?;

        if let Some(url) = api_url_override {
            settings.api_url = url;
        }

        settings.validate()?;
        Ok(settings)
    }

    fn apply_file_config(&mut self, raw: &str) -> Result<()> {
        let file_cfg: FileConfig = toml::from_str(raw)?;

        if let Some(v) = file_cfg.api_url {
            self.api_url = v;
        }
        if let Some(v) = file_cfg.health_interval_secs {
            self.health_interval = Duration::from_secs(v);
        }
        if let Some(v) = file_cfg.request_timeout_secs {
            self.request_timeout = Duration::from_secs(v);
        }
        if let Some(v) = file_cfg.health_timeout_secs {
            self.health_timeout = Duration::from_secs(v);
        }
        Ok(())
    }

    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        for key in ["ITEMS_API_URL", "APP__API_URL"] {
            if let Some(v) = lookup(key) {
                self.api_url = v;
            }
        }

        let seconds = |key: &str| -> Result<Option<Duration>> {
            lookup(key)
                .map(|raw| {
                    raw.trim()
                        .parse::<u64>()
                        .map(Duration::from_secs)
                        .with_context(|| format!("{key} must be a whole number of seconds"))
                })
                .transpose()
        };

        if let Some(v) = seconds("APP__HEALTH_INTERVAL_SECS")? {
            self.health_interval = v;
        }
        if let Some(v) = seconds("APP__REQUEST_TIMEOUT_SECS")? {
            self.request_timeout = v;
        }
        if let Some(v) = seconds("APP__HEALTH_TIMEOUT_SECS")? {
            self.health_timeout = v;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.api_url)
            .with_context(|| format!("api url '{}' is not a valid URL", self.api_url))?;
        if !matches!(url.scheme(), "http" | "https") {
            bail!("api url '{}' must use http or https", self.api_url);
        }
        if self.health_interval.is_zero() {
            bail!("health interval must be greater than zero");
        }
        if self.request_timeout.is_zero() || self.health_timeout.is_zero() {
            bail!("timeouts must be greater than zero");
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
