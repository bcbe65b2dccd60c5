use std::{env, fmt::Display, str::FromStr, time::Duration};

use chrono_tz::Tz;
use thiserror::Error;
use tracing::{info, warn};

/// Endpoint compiled into the binary; overridable at start-up.
pub const DEFAULT_API_URL: &str = match option_env!("ORDER_API_URL") {
    Some(url) => url,
    None => "",
};

pub const DEFAULT_API_TOKEN: &str = match option_env!("ORDER_API_TOKEN") {
    Some(token) => token,
    None => PLACEHOLDER_TOKEN,
};

/// Only swallows a scanner firing twice for one trigger pull; real repeat scans count.
pub const DEFAULT_SCAN_DEBOUNCE_MS: u64 = 80;

const PLACEHOLDER_TOKEN: &str = "YOUR_SECRET_TOKEN";
const EXPECTED_HOST: &str = "script.google.com";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("API URL is not configured. Set ORDER_API_URL.")]
    UrlMissing,

    #[error("API token is not configured. Set ORDER_API_TOKEN.")]
    TokenMissing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidationMode {
    /// Numeric fields are optional and checked only when filled in.
    #[default]
    Lenient,
    /// Every order field is required and quantity must be at least one.
    Strict,
}

impl FromStr for ValidationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lenient" => Ok(Self::Lenient),
            "strict" => Ok(Self::Strict),
            other => Err(format!("unknown validation mode {other:?}")),
        }
    }
}

/// What the form does once an order has been saved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AfterSuccess {
    /// Keep the confirmation visible and offer "Add Another Order".
    #[default]
    Reentry,
    /// Reset the whole form after `Config::reload_delay`.
    Reload,
}

impl FromStr for AfterSuccess {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reentry" => Ok(Self::Reentry),
            "reload" => Ok(Self::Reload),
            other => Err(format!("unknown after-success mode {other:?}")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub api_token: String,
    pub timezone: Tz,
    pub validation: ValidationMode,
    pub after_success: AfterSuccess,
    pub reload_delay: Duration,
    pub scan_debounce: Duration,
    pub http_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_token: DEFAULT_API_TOKEN.to_string(),
            timezone: Tz::UTC,
            validation: ValidationMode::default(),
            after_success: AfterSuccess::default(),
            reload_delay: Duration::from_millis(2000),
            scan_debounce: Duration::from_millis(DEFAULT_SCAN_DEBOUNCE_MS),
            http_timeout: Duration::from_secs(20),
        }
    }
}

impl Config {
    pub fn load() -> Self {
        let defaults = Self::default();
        Self {
            api_url: var("ORDER_API_URL").unwrap_or(defaults.api_url),
            api_token: var("ORDER_API_TOKEN").unwrap_or(defaults.api_token),
            timezone: try_load("ORDER_TIMEZONE", defaults.timezone),
            validation: try_load("ORDER_VALIDATION", defaults.validation),
            after_success: try_load("ORDER_AFTER_SUCCESS", defaults.after_success),
            reload_delay: Duration::from_millis(try_load("ORDER_RELOAD_DELAY_MS", 2000)),
            scan_debounce: Duration::from_millis(try_load(
                "ORDER_SCAN_DEBOUNCE_MS",
                DEFAULT_SCAN_DEBOUNCE_MS,
            )),
            http_timeout: Duration::from_secs(try_load("ORDER_HTTP_TIMEOUT_SECS", 20)),
        }
    }

    /// Refuses placeholder credentials before any request is made.
    pub fn ensure_configured(&self) -> Result<(), ConfigError> {
        if is_placeholder_url(&self.api_url) {
            return Err(ConfigError::UrlMissing);
        }
        if is_placeholder_token(&self.api_token) {
            return Err(ConfigError::TokenMissing);
        }
        Ok(())
    }
}

pub fn is_placeholder_url(url: &str) -> bool {
    let url = url.trim();
    url.is_empty() || url.contains("YOUR_") || !url.contains(EXPECTED_HOST)
}

pub fn is_placeholder_token(token: &str) -> bool {
    let token = token.trim();
    token.is_empty() || token == PLACEHOLDER_TOKEN
}

fn var(key: &str) -> Option<String> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => Some(value.trim().to_string()),
        _ => {
            info!("{key} not set, using compiled default");
            None
        }
    }
}

fn try_load<T>(key: &str, default: T) -> T
where
    T: FromStr + std::fmt::Debug,
    T::Err: Display,
{
    let Some(raw) = var(key) else {
        return default;
    };
    raw.parse().unwrap_or_else(|e| {
        warn!("Invalid {key} value {raw:?}: {e}; using default {default:?}");
        default
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configured() -> Config {
        Config {
            api_url: "https://script.google.com/macros/s/abc/exec".into(),
            api_token: "flowers".into(),
            ..Config::default()
        }
    }

    #[test]
    fn configured_endpoint_passes() {
        assert_eq!(configured().ensure_configured(), Ok(()));
    }

    #[test]
    fn placeholder_url_is_refused_first() {
        let config = Config {
            api_url: String::new(),
            api_token: String::new(),
            ..configured()
        };
        assert_eq!(config.ensure_configured(), Err(ConfigError::UrlMissing));

        assert!(is_placeholder_url(
            "https://script.google.com/macros/s/YOUR_DEPLOYMENT_ID/exec"
        ));
        assert!(is_placeholder_url("https://example.com/orders"));
    }

    #[test]
    fn placeholder_token_is_refused() {
        let config = Config {
            api_token: "YOUR_SECRET_TOKEN".into(),
            ..configured()
        };
        assert_eq!(config.ensure_configured(), Err(ConfigError::TokenMissing));
        assert!(is_placeholder_token("   "));
    }

    #[test]
    fn modes_parse_case_insensitively() {
        assert_eq!("Strict".parse::<ValidationMode>(), Ok(ValidationMode::Strict));
        assert_eq!(" reload ".parse::<AfterSuccess>(), Ok(AfterSuccess::Reload));
        assert!("sometimes".parse::<AfterSuccess>().is_err());
    }
}
