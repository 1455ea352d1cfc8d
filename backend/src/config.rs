use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::indicators::engine::{DEFAULT_LONG_WINDOW, DEFAULT_SHORT_WINDOW};
use crate::render::Language;

/// Whether a request without a ticker runs the analysis with defaults or
/// waits for the user to submit one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TriggerPolicy {
    #[default]
    Manual,
    Automatic,
}

impl FromStr for TriggerPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "manual" => Ok(TriggerPolicy::Manual),
            "automatic" | "auto" => Ok(TriggerPolicy::Automatic),
            other => Err(format!("unknown trigger policy: {}", other)),
        }
    }
}

#[derive(Debug, Error)]
#[error("invalid value for {var}: {reason}")]
pub struct ConfigError {
    pub var: &'static str,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub yahoo_base_url: String,
    pub http_timeout: Duration,
    pub short_window: usize,
    pub long_window: usize,
    pub language: Language,
    pub trigger: TriggerPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            yahoo_base_url: "https://query1.finance.yahoo.com".to_string(),
            http_timeout: Duration::from_secs(10),
            short_window: DEFAULT_SHORT_WINDOW,
            long_window: DEFAULT_LONG_WINDOW,
            language: Language::default(),
            trigger: TriggerPolicy::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(v) = lookup("STOCKS_BIND_ADDR") {
            config.bind_addr = parse("STOCKS_BIND_ADDR", &v)?;
        }
        if let Some(v) = lookup("STOCKS_YAHOO_BASE_URL") {
            config.yahoo_base_url = v;
        }
        if let Some(v) = lookup("STOCKS_HTTP_TIMEOUT_SECS") {
            config.http_timeout = Duration::from_secs(parse("STOCKS_HTTP_TIMEOUT_SECS", &v)?);
        }
        if let Some(v) = lookup("STOCKS_SHORT_WINDOW") {
            config.short_window = parse("STOCKS_SHORT_WINDOW", &v)?;
        }
        if let Some(v) = lookup("STOCKS_LONG_WINDOW") {
            config.long_window = parse("STOCKS_LONG_WINDOW", &v)?;
        }
        if let Some(v) = lookup("STOCKS_LANG") {
            config.language = parse("STOCKS_LANG", &v)?;
        }
        if let Some(v) = lookup("STOCKS_TRIGGER") {
            config.trigger = parse("STOCKS_TRIGGER", &v)?;
        }

        Ok(config)
    }
}

fn parse<T>(var: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| ConfigError {
        var,
        reason: e.to_string(),
    })
}
