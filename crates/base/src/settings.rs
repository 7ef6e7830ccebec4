use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use crate::requests::entities::{NumberOfRetries, SecondsToSleep};

pub const API_BASE_URL_ENV: &str = "API_BASE_URL";
pub const REQUEST_TIMEOUT_SECS_ENV: &str = "REQUEST_TIMEOUT_SECS";
pub const NUMBER_OF_REQUEST_RETRIES_ENV: &str = "NUMBER_OF_REQUEST_RETRIES";
pub const SECONDS_TO_SLEEP_BEFORE_REQUEST_RETRY_ENV: &str =
    "SECONDS_TO_SLEEP_BEFORE_REQUEST_RETRY";
pub const TARGET_LOGGER_ENV: &str = "TARGET_LOGGER";
pub const TELEGRAM_USER_ID_ENV: &str = "TELEGRAM_USER_ID";

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_NUMBER_OF_REQUEST_RETRIES: NumberOfRetries = 2;
pub const DEFAULT_SECONDS_TO_SLEEP_BEFORE_REQUEST_RETRY: SecondsToSleep = 1;
pub const DEFAULT_TARGET_LOGGER: &str = "calculator";

pub type ApiUrl = String;
pub type LoggerTarget = String;
pub type TelegramUserId = i64;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct RetrySettings {
    pub number_of_request_retries: NumberOfRetries,
    pub seconds_to_sleep_before_request_retry: SecondsToSleep,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            number_of_request_retries: DEFAULT_NUMBER_OF_REQUEST_RETRIES,
            seconds_to_sleep_before_request_retry: DEFAULT_SECONDS_TO_SLEEP_BEFORE_REQUEST_RETRY,
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ApiSettings {
    pub base_url: ApiUrl,
    pub request_timeout: Duration,
    pub retry: RetrySettings,
    pub target_logger: LoggerTarget,
    pub telegram_user_id: TelegramUserId,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: String::from(DEFAULT_API_BASE_URL),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            retry: Default::default(),
            target_logger: String::from(DEFAULT_TARGET_LOGGER),
            telegram_user_id: 0,
        }
    }
}

fn parse_or_default<T, F>(lookup: &F, name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(value) => value
            .trim()
            .parse::<T>()
            .with_context(|| format!("invalid value {:?} of {}", value, name)),
        None => Ok(default),
    }
}

impl ApiSettings {
    /// Reads the settings from the process environment, loading `.env` first if it exists.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|name| dotenv::var(name).ok())
    }

    /// Reads the settings from an env file without touching the process environment.
    pub fn from_env_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut vars = HashMap::new();

        for item in dotenv::from_path_iter(path.as_ref())
            .context("an error occurred on opening the env file")?
        {
            let (name, value) = item.context("an error on parsing an env file line")?;
            vars.insert(name, value);
        }

        Self::from_lookup(|name| vars.get(name).cloned())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let base_url = lookup(API_BASE_URL_ENV)
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or(defaults.base_url);

        let timeout_secs = parse_or_default(
            &lookup,
            REQUEST_TIMEOUT_SECS_ENV,
            DEFAULT_REQUEST_TIMEOUT_SECS,
        )?;

        let retry = RetrySettings {
            number_of_request_retries: parse_or_default(
                &lookup,
                NUMBER_OF_REQUEST_RETRIES_ENV,
                defaults.retry.number_of_request_retries,
            )?,
            seconds_to_sleep_before_request_retry: parse_or_default(
                &lookup,
                SECONDS_TO_SLEEP_BEFORE_REQUEST_RETRY_ENV,
                defaults.retry.seconds_to_sleep_before_request_retry,
            )?,
        };

        Ok(Self {
            base_url,
            request_timeout: Duration::from_secs(timeout_secs),
            retry,
            target_logger: lookup(TARGET_LOGGER_ENV).unwrap_or(defaults.target_logger),
            telegram_user_id: parse_or_default(&lookup, TELEGRAM_USER_ID_ENV, 0)?,
        })
    }
}
