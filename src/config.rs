//! # Configuration Module
//!
//! Process settings read from the environment (a `.env` file is loaded by
//! `main` first).

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::persistence::DEFAULT_DUMP_PATH;

pub const TOKEN_VAR: &str = "TELEGRAM_BOT_TOKEN";
pub const DUMP_PATH_VAR: &str = "SHOPPING_DUMP_PATH";
pub const SHUTDOWN_TIMEOUT_VAR: &str = "SHOPPING_SHUTDOWN_TIMEOUT_SECS";
pub const LOG_FORMAT_VAR: &str = "LOG_FORMAT";

pub const DEFAULT_SHUTDOWN_TIMEOUT_SECS: u64 = 10;

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Settings of one bot process
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// Telegram bot token
    pub token: String,
    /// Location of the snapshot file
    pub dump_path: PathBuf,
    /// Upper bound for the snapshot written on shutdown
    pub shutdown_timeout: Duration,
    pub log_format: LogFormat,
}

impl BotConfig {
    /// Load the configuration from process environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load the configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let token = lookup(TOKEN_VAR)
            .filter(|token| !token.trim().is_empty())
            .with_context(|| format!("{TOKEN_VAR} must be set"))?;

        let dump_path = lookup(DUMP_PATH_VAR)
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DUMP_PATH));

        let shutdown_timeout_secs = match lookup(SHUTDOWN_TIMEOUT_VAR) {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .with_context(|| format!("{SHUTDOWN_TIMEOUT_VAR} must be a number of seconds, got {raw:?}"))?,
            None => DEFAULT_SHUTDOWN_TIMEOUT_SECS,
        };

        let log_format = match lookup(LOG_FORMAT_VAR).as_deref().map(str::trim) {
            Some(format) if format.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Text,
        };

        Ok(Self {
            token,
            dump_path,
            shutdown_timeout: Duration::from_secs(shutdown_timeout_secs),
            log_format,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = BotConfig::from_lookup(lookup_from(&[(TOKEN_VAR, "123:abc")])).unwrap();
        assert_eq!(config.token, "123:abc");
        assert_eq!(config.dump_path, PathBuf::from("dumps/items.json"));
        assert_eq!(config.shutdown_timeout, Duration::from_secs(10));
        assert_eq!(config.log_format, LogFormat::Text);
    }

    #[test]
    fn test_missing_token_is_fatal() {
        let err = BotConfig::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(err.to_string().contains(TOKEN_VAR));

        assert!(BotConfig::from_lookup(lookup_from(&[(TOKEN_VAR, "  ")])).is_err());
    }

    #[test]
    fn test_overrides() {
        let config = BotConfig::from_lookup(lookup_from(&[
            (TOKEN_VAR, "t"),
            (DUMP_PATH_VAR, "/var/lib/shopping/items.json"),
            (SHUTDOWN_TIMEOUT_VAR, "3"),
            (LOG_FORMAT_VAR, "JSON"),
        ]))
        .unwrap();
        assert_eq!(config.dump_path, PathBuf::from("/var/lib/shopping/items.json"));
        assert_eq!(config.shutdown_timeout, Duration::from_secs(3));
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_invalid_timeout() {
        let result = BotConfig::from_lookup(lookup_from(&[(TOKEN_VAR, "t"), (SHUTDOWN_TIMEOUT_VAR, "soon")]));
        assert!(result.is_err());
    }
}
