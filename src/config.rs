use std::{env, path::PathBuf, str::FromStr, time::Duration};

use dotenv::dotenv;
use log::{error, warn};

use crate::errors::MyError;

pub const DEFAULT_DATA_FILE: &str = "basa.json";
pub const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";

#[derive(Debug, Clone)]
pub struct Config {
    pub token: String,
    pub data_file: PathBuf,
    pub admin_ids: Vec<i64>,
    pub bind_addr: String,
    pub port: u16,
    /// both set: webhook mode, otherwise long polling
    pub webhook_url: Option<String>,
    pub webhook_secret: Option<String>,
    pub reminder_interval: Duration,
    pub dialogue_ttl: Duration,
    pub telegram_api_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self, MyError> {
        dotenv().ok();
        let token = match env::var("TOKEN") {
            Ok(token) if !token.trim().is_empty() => token,
            _ => {
                error!("Failed to get env with name 'TOKEN'");
                return Err(MyError::ConfigError);
            }
        };
        let webhook_url = optional("WEBHOOK_URL");
        let webhook_secret = optional("WEBHOOK_SECRET");
        if webhook_url.is_some() != webhook_secret.is_some() {
            warn!("WEBHOOK_URL and WEBHOOK_SECRET must be set together, falling back to polling");
        }
        Ok(Self {
            token,
            data_file: optional("DATA_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_FILE)),
            admin_ids: parse_ids(&optional("ADMIN_IDS").unwrap_or_default())?,
            bind_addr: optional("BIND_ADDR").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: parsed("PORT", 8080)?,
            webhook_url,
            webhook_secret,
            reminder_interval: duration("REMINDER_INTERVAL_HOURS", parsed("REMINDER_INTERVAL_HOURS", 72)?, 60 * 60)?,
            dialogue_ttl: duration("DIALOGUE_TTL_MINUTES", parsed("DIALOGUE_TTL_MINUTES", 30)?, 60)?,
            telegram_api_url: optional("TELEGRAM_API_URL")
                .unwrap_or_else(|| DEFAULT_TELEGRAM_API_URL.to_string()),
        })
    }

    pub fn webhook(&self) -> Option<(&str, &str)> {
        match (&self.webhook_url, &self.webhook_secret) {
            (Some(url), Some(secret)) => Some((url.as_str(), secret.as_str())),
            _ => None,
        }
    }
}

fn optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parsed<T: FromStr>(key: &str, default: T) -> Result<T, MyError> {
    match optional(key) {
        Some(raw) => raw.trim().parse::<T>().map_err(|_| {
            error!("env '{}' has invalid value {:?}", key, raw);
            MyError::ConfigError
        }),
        None => Ok(default),
    }
}

/// `value` units of `unit_secs` each; zero and overflowing values are rejected.
fn duration(key: &str, value: u64, unit_secs: u64) -> Result<Duration, MyError> {
    match value.checked_mul(unit_secs) {
        Some(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => {
            error!("env '{}' must be a positive number that fits in seconds, got {}", key, value);
            Err(MyError::ConfigError)
        }
    }
}

pub fn parse_ids(raw: &str) -> Result<Vec<i64>, MyError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<i64>().map_err(|_| {
                error!("ADMIN_IDS entry {:?} is not a telegram id", s);
                MyError::ConfigError
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_ids_are_comma_separated() {
        assert_eq!(parse_ids("").unwrap(), Vec::<i64>::new());
        assert_eq!(parse_ids(" 1, 22 ,333,").unwrap(), vec![1, 22, 333]);
        assert_eq!(parse_ids("1,abc"), Err(MyError::ConfigError));
    }

    #[test]
    fn durations_must_be_positive_and_fit() {
        assert_eq!(duration("H", 72, 3600).unwrap(), Duration::from_secs(72 * 3600));
        assert_eq!(duration("H", 0, 3600), Err(MyError::ConfigError));
        assert_eq!(duration("H", u64::MAX / 60, 3600), Err(MyError::ConfigError));
        assert_eq!(duration("M", u64::MAX, 60), Err(MyError::ConfigError));
    }
}
