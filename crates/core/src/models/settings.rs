use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::errors::CoreError;

/// Whether purchases are tracked for one fixed market or per market.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketMode {
    /// One market (`default_market`); purchases carry no market tag and
    /// no break-even line is drawn.
    #[default]
    Single,
    /// Purchases are scoped to the active market; break-even is shown.
    Multi,
}

impl std::str::FromStr for MarketMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "single" => Ok(MarketMode::Single),
            "multi" => Ok(MarketMode::Multi),
            other => Err(CoreError::Config(format!(
                "Unknown market mode '{other}': expected 'single' or 'multi'"
            ))),
        }
    }
}

/// Dashboard configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Base URL of the purchases backend, without trailing slash.
    pub api_base_url: String,

    /// Seconds between two ticker polls.
    pub ticker_interval_secs: u64,

    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,

    pub market_mode: MarketMode,

    /// Market shown on start-up (and the only one in single mode).
    pub default_market: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:5000".to_string(),
            ticker_interval_secs: 5,
            request_timeout_secs: 30,
            market_mode: MarketMode::Single,
            default_market: "BTC-USD".to_string(),
        }
    }
}

impl Settings {
    /// Defaults overlaid with `DASHBOARD_*` environment variables.
    pub fn from_env() -> Result<Self, CoreError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Settings::from_env`] with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CoreError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();

        if let Some(url) = lookup("DASHBOARD_API_URL") {
            settings.api_base_url = url;
        }
        if let Some(secs) = lookup("DASHBOARD_TICKER_INTERVAL_SECS") {
            settings.ticker_interval_secs = parse_secs("DASHBOARD_TICKER_INTERVAL_SECS", &secs)?;
        }
        if let Some(secs) = lookup("DASHBOARD_REQUEST_TIMEOUT_SECS") {
            settings.request_timeout_secs = parse_secs("DASHBOARD_REQUEST_TIMEOUT_SECS", &secs)?;
        }
        if let Some(mode) = lookup("DASHBOARD_MARKET_MODE") {
            settings.market_mode = mode.parse()?;
        }
        if let Some(market) = lookup("DASHBOARD_DEFAULT_MARKET") {
            settings.default_market = market;
        }

        settings.validate()?;
        Ok(settings)
    }

    /// Parse settings from JSON; missing keys take their defaults.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let settings: Settings = serde_json::from_str(json)
            .map_err(|e| CoreError::Config(format!("Invalid settings JSON: {e}")))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        let url = self.api_base_url.trim();
        if url.is_empty() {
            return Err(CoreError::Config("api_base_url must not be empty".into()));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(CoreError::Config(format!(
                "api_base_url '{url}' must start with http:// or https://"
            )));
        }
        if self.ticker_interval_secs == 0 {
            return Err(CoreError::Config("ticker_interval_secs must be at least 1".into()));
        }
        if self.request_timeout_secs == 0 {
            return Err(CoreError::Config("request_timeout_secs must be at least 1".into()));
        }
        if self.default_market.trim().is_empty() {
            return Err(CoreError::Config("default_market must not be empty".into()));
        }
        Ok(())
    }

    #[must_use]
    pub fn ticker_interval(&self) -> Duration {
        Duration::from_secs(self.ticker_interval_secs)
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn parse_secs(key: &str, value: &str) -> Result<u64, CoreError> {
    value
        .trim()
        .parse::<u64>()
        .map_err(|_| CoreError::Config(format!("{key} must be a whole number of seconds, got '{value}'")))
}
