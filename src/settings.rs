//! Process settings read from the environment (and `.env`, via dotenv)

use std::path::PathBuf;
use std::time::Duration;

use tracing::warn;
use tracing_appender::rolling::Rotation;

use crate::logging::parse_rotation;
use crate::notifier::{DEFAULT_API_DOMAIN, api_base_from_domain};

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_CONFIG_PATH: &str = "config.toml";
const DEFAULT_TELEGRAM_TIMEOUT_SECS: u64 = 10;
const DEFAULT_LOG_MAX_FILES: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    pub config_path: PathBuf,
    /// Base URL for the Telegram Bot API, e.g. `https://api.telegram.org`.
    pub telegram_api_base: String,
    pub telegram_timeout: Duration,
    pub log_dir: Option<PathBuf>,
    /// Rotated log files kept in `log_dir`.
    pub log_max_files: usize,
    pub log_rotation: Rotation,
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds settings from any key lookup; unset or empty values take defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = parse_or_default(get("PORT"), "PORT", DEFAULT_PORT);
        let timeout_secs = parse_or_default(
            get("TELEGRAM_TIMEOUT_SECS"),
            "TELEGRAM_TIMEOUT_SECS",
            DEFAULT_TELEGRAM_TIMEOUT_SECS,
        );

        let log_rotation = match get("LOG_ROTATION") {
            None => Rotation::DAILY,
            Some(raw) => parse_rotation(&raw).unwrap_or_else(|| {
                warn!("Invalid LOG_ROTATION value {:?}; using daily", raw);
                Rotation::DAILY
            }),
        };

        Self {
            host: get("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            config_path: get("RELAY_CONFIG")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH)),
            telegram_api_base: api_base_from_domain(
                get("TELEGRAM_API_DOMAIN").as_deref().unwrap_or(DEFAULT_API_DOMAIN),
            ),
            telegram_timeout: Duration::from_secs(timeout_secs),
            log_dir: get("LOG_DIR").map(PathBuf::from),
            log_max_files: parse_or_default(
                get("LOG_MAX_FILES"),
                "LOG_MAX_FILES",
                DEFAULT_LOG_MAX_FILES,
            ),
            log_rotation,
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or_default<T>(value: Option<String>, key: &str, default: T) -> T
where
    T: std::str::FromStr + std::fmt::Display + Copy,
{
    match value {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("Invalid {} value {:?}; using default {}", key, raw, default);
            default
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings_with(pairs: &[(&str, &str)]) -> Settings {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let settings = settings_with(&[]);
        assert_eq!(settings.bind_address(), "0.0.0.0:3000");
        assert_eq!(settings.config_path, PathBuf::from("config.toml"));
        assert_eq!(settings.telegram_api_base, "https://api.telegram.org");
        assert_eq!(settings.telegram_timeout, Duration::from_secs(10));
        assert_eq!(settings.log_dir, None);
        assert_eq!(settings.log_max_files, 5);
        assert_eq!(settings.log_rotation, Rotation::DAILY);
    }

    #[test]
    fn overrides_are_applied() {
        let settings = settings_with(&[
            ("HOST", "127.0.0.1"),
            ("PORT", "8080"),
            ("RELAY_CONFIG", "/etc/relay.toml"),
            ("TELEGRAM_API_DOMAIN", "tg.example.com"),
            ("TELEGRAM_TIMEOUT_SECS", "3"),
            ("LOG_DIR", "/var/log/relay"),
            ("LOG_MAX_FILES", "14"),
            ("LOG_ROTATION", "hourly"),
        ]);
        assert_eq!(settings.bind_address(), "127.0.0.1:8080");
        assert_eq!(settings.config_path, PathBuf::from("/etc/relay.toml"));
        assert_eq!(settings.telegram_api_base, "https://tg.example.com");
        assert_eq!(settings.telegram_timeout, Duration::from_secs(3));
        assert_eq!(settings.log_dir, Some(PathBuf::from("/var/log/relay")));
        assert_eq!(settings.log_max_files, 14);
        assert_eq!(settings.log_rotation, Rotation::HOURLY);
    }

    #[test]
    fn invalid_numbers_fall_back_to_defaults() {
        let settings = settings_with(&[
            ("PORT", "eighty"),
            ("TELEGRAM_TIMEOUT_SECS", "-1"),
            ("LOG_MAX_FILES", "many"),
            ("LOG_ROTATION", "weekly"),
        ]);
        assert_eq!(settings.port, 3000);
        assert_eq!(settings.log_max_files, 5);
        assert_eq!(settings.log_rotation, Rotation::DAILY);
        assert_eq!(settings.telegram_timeout, Duration::from_secs(10));
    }

    #[test]
    fn empty_values_count_as_unset() {
        let settings = settings_with(&[("HOST", ""), ("LOG_DIR", "  ")]);
        assert_eq!(settings.host, "0.0.0.0");
        assert_eq!(settings.log_dir, None);
    }
}
