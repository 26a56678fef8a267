//! Run configuration, loaded from environment variables.
//!
//! | Variable | Default |
//! |----------|---------|
//! | `FERROFOLIO_ACCOUNT_ID` | required before conversion |
//! | `FERROFOLIO_LOOKUP_URL` | `http://localhost:3333` |
//! | `FERROFOLIO_LOOKUP_SECRET` | empty |
//! | `FERROFOLIO_LOOKUP_RATE_PER_MINUTE` | unlimited |
//! | `FERROFOLIO_DEGIRO_FORCE_V3` | `false` |
//! | `FERROFOLIO_TAGS` | none, comma separated |

use crate::detect::FormatRedirects;
use crate::error::ConfigError;
use crate::retry::RetryConfig;

pub const ENV_ACCOUNT_ID: &str = "FERROFOLIO_ACCOUNT_ID";
pub const ENV_LOOKUP_URL: &str = "FERROFOLIO_LOOKUP_URL";
pub const ENV_LOOKUP_SECRET: &str = "FERROFOLIO_LOOKUP_SECRET";
pub const ENV_LOOKUP_RATE: &str = "FERROFOLIO_LOOKUP_RATE_PER_MINUTE";
pub const ENV_DEGIRO_FORCE_V3: &str = "FERROFOLIO_DEGIRO_FORCE_V3";
pub const ENV_TAGS: &str = "FERROFOLIO_TAGS";

pub const DEFAULT_LOOKUP_URL: &str = "http://localhost:3333";

/// Lookup service connection settings.
#[derive(Clone)]
pub struct LookupSettings {
    pub base_url: String,
    pub access_token: String,
    /// Client-side request budget; `None` disables throttling.
    pub rate_per_minute: Option<u32>,
    pub retry: RetryConfig,
    pub timeout_ms: u64,
}

impl Default for LookupSettings {
    fn default() -> Self {
        Self {
            base_url: String::from(DEFAULT_LOOKUP_URL),
            access_token: String::new(),
            rate_per_minute: None,
            retry: RetryConfig::default(),
            timeout_ms: 10_000,
        }
    }
}

impl std::fmt::Debug for LookupSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LookupSettings")
            .field("base_url", &self.base_url)
            .field("access_token", &"[REDACTED]")
            .field("rate_per_minute", &self.rate_per_minute)
            .field("retry", &self.retry)
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

/// Complete run configuration.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub account_id: Option<String>,
    pub lookup: LookupSettings,
    pub redirects: FormatRedirects,
    pub tags: Vec<String>,
}

impl Settings {
    /// Reads settings from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for unparseable numbers or flags.
    /// A missing account id is only reported by [`Settings::require_account_id`].
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Settings::from_env`] with an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };

        let rate_per_minute = var(ENV_LOOKUP_RATE)
            .map(|value| {
                value
                    .parse::<u32>()
                    .ok()
                    .filter(|rate| *rate > 0)
                    .ok_or(ConfigError::InvalidValue {
                        key: ENV_LOOKUP_RATE,
                        value,
                    })
            })
            .transpose()?;

        let degiro_force_v3 = var(ENV_DEGIRO_FORCE_V3)
            .map(|value| parse_flag(ENV_DEGIRO_FORCE_V3, value))
            .transpose()?
            .unwrap_or(false);

        Ok(Self {
            account_id: var(ENV_ACCOUNT_ID),
            lookup: LookupSettings {
                base_url: var(ENV_LOOKUP_URL).unwrap_or_else(|| String::from(DEFAULT_LOOKUP_URL)),
                access_token: var(ENV_LOOKUP_SECRET).unwrap_or_default(),
                rate_per_minute,
                ..LookupSettings::default()
            },
            redirects: FormatRedirects { degiro_force_v3 },
            tags: var(ENV_TAGS).map(|value| split_tags(&value)).unwrap_or_default(),
        })
    }

    pub fn with_account_id(mut self, account_id: impl Into<String>) -> Self {
        self.account_id = Some(account_id.into());
        self
    }

    /// The account id every activity is booked on.
    ///
    /// # Errors
    ///
    /// [`ConfigError::MissingAccountId`] when unset or blank.
    pub fn require_account_id(&self) -> Result<&str, ConfigError> {
        self.account_id
            .as_deref()
            .map(str::trim)
            .filter(|account_id| !account_id.is_empty())
            .ok_or(ConfigError::MissingAccountId)
    }
}

/// Splits a comma separated tag list, dropping blanks and duplicates.
pub fn split_tags(value: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for tag in value.split(',').map(str::trim).filter(|tag| !tag.is_empty()) {
        if !tags.iter().any(|existing| existing == tag) {
            tags.push(tag.to_owned());
        }
    }
    tags
}

fn parse_flag(key: &'static str, value: String) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue { key, value }),
    }
}
