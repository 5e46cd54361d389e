use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use crate::common::error::ConfigError;
use crate::config::env::{self, EnvKey};

pub const DEFAULT_SERVICE_URL: &str = "http://localhost:8000";
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 3000;
pub const DEFAULT_DEBOUNCE_MS: u64 = 1000;

#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Origin of the rendering service. Always ends with `/` so endpoint
    /// paths can be joined relative to it.
    pub service_url: Url,
    pub poll_interval: Duration,
    pub debounce: Duration,
    pub request_timeout: Option<Duration>,
    pub download_dir: PathBuf,
}

impl AppConfig {
    pub fn new() -> Result<Self, ConfigError> {
        let service_url = parse_service_url(&env::get_or(EnvKey::ServiceUrl, DEFAULT_SERVICE_URL))?;

        let poll_ms = env::get_parsed(EnvKey::PollIntervalMs, DEFAULT_POLL_INTERVAL_MS);
        let debounce_ms = env::get_parsed(EnvKey::DebounceMs, DEFAULT_DEBOUNCE_MS);
        if poll_ms == 0 {
            return Err(ConfigError::ZeroInterval(EnvKey::PollIntervalMs.as_str()));
        }

        let request_timeout = env::get_opt(EnvKey::RequestTimeoutSecs)
            .and_then(|secs| secs.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);

        Ok(Self {
            service_url,
            poll_interval: Duration::from_millis(poll_ms),
            debounce: Duration::from_millis(debounce_ms),
            request_timeout,
            download_dir: PathBuf::from(env::get_or(EnvKey::DownloadDir, ".")),
        })
    }

    /// Default cadence and debounce against an explicit service origin.
    pub fn with_service_url(service_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            service_url: parse_service_url(service_url)?,
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            request_timeout: None,
            download_dir: PathBuf::from("."),
        })
    }
}

pub fn parse_service_url(raw: &str) -> Result<Url, ConfigError> {
    let mut url = Url::parse(raw.trim()).map_err(|source| ConfigError::InvalidServiceUrl {
        value: raw.to_string(),
        source,
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::UnsupportedScheme(url.scheme().to_string()));
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }

    Ok(url)
}
