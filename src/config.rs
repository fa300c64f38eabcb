//! Configuration module
//!
//! Loads configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::notification::{NotificationConfig, DEFAULT_CURRENCY_SYMBOL};

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => Err(ConfigError::InvalidValue("LOG_FORMAT")),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Database connection URL
    pub database_url: String,

    /// Maximum database connections in pool
    pub database_max_connections: u32,

    /// Server host
    pub host: String,

    /// Server port
    pub port: u16,

    /// Environment (development, production)
    pub environment: String,

    pub log_format: LogFormat,

    /// Symbol prefixed to amounts in notifications
    pub currency_symbol: String,

    /// Notification queue size
    pub notification_queue_capacity: usize,

    /// Upper bound on one notification delivery attempt
    pub notification_timeout: Duration,

    /// Delivery attempts per notification
    pub notification_max_attempts: u32,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any key/value source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url =
            lookup("DATABASE_URL").ok_or(ConfigError::MissingEnv("DATABASE_URL"))?;

        let database_max_connections = parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 10)?;

        let host = lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string());

        let port = parse_or(&lookup, "PORT", 3000)?;

        let environment = lookup("ENVIRONMENT").unwrap_or_else(|| "development".to_string());

        let log_format = parse_or(&lookup, "LOG_FORMAT", LogFormat::Pretty)?;

        let currency_symbol =
            lookup("CURRENCY_SYMBOL").unwrap_or_else(|| DEFAULT_CURRENCY_SYMBOL.to_string());

        let notification_queue_capacity: usize =
            parse_or(&lookup, "NOTIFICATION_QUEUE_CAPACITY", 1024)?;
        if notification_queue_capacity == 0 {
            return Err(ConfigError::InvalidValue("NOTIFICATION_QUEUE_CAPACITY"));
        }

        let notification_timeout_ms: u64 = parse_or(&lookup, "NOTIFICATION_TIMEOUT_MS", 5000)?;

        let notification_max_attempts: u32 = parse_or(&lookup, "NOTIFICATION_MAX_ATTEMPTS", 3)?;
        if notification_max_attempts == 0 {
            return Err(ConfigError::InvalidValue("NOTIFICATION_MAX_ATTEMPTS"));
        }

        Ok(Self {
            database_url,
            database_max_connections,
            host,
            port,
            environment,
            log_format,
            currency_symbol,
            notification_queue_capacity,
            notification_timeout: Duration::from_millis(notification_timeout_ms),
            notification_max_attempts,
        })
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Settings for the notification queue and worker
    pub fn notification(&self) -> NotificationConfig {
        NotificationConfig {
            queue_capacity: self.notification_queue_capacity,
            delivery_timeout: self.notification_timeout,
            max_attempts: self.notification_max_attempts,
            ..NotificationConfig::default()
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidValue(key)),
        None => Ok(default),
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnv(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[("DATABASE_URL", "postgres://localhost/bank")]))
            .unwrap();

        assert_eq!(config.database_max_connections, 10);
        assert_eq!(config.port, 3000);
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert_eq!(config.currency_symbol, "€");
        assert!(!config.is_production());

        let notification = config.notification();
        assert_eq!(notification.queue_capacity, 1024);
        assert_eq!(notification.delivery_timeout, Duration::from_secs(5));
        assert_eq!(notification.max_attempts, 3);
    }

    #[test]
    fn test_missing_database_url() {
        let err = Config::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnv("DATABASE_URL")));
    }

    #[test]
    fn test_invalid_values() {
        let err = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/bank"),
            ("PORT", "eighty"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue("PORT")));

        let err = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/bank"),
            ("NOTIFICATION_MAX_ATTEMPTS", "0"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue("NOTIFICATION_MAX_ATTEMPTS")));
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/bank"),
            ("LOG_FORMAT", "JSON"),
            ("CURRENCY_SYMBOL", "$"),
            ("NOTIFICATION_TIMEOUT_MS", "250"),
            ("ENVIRONMENT", "production"),
        ]))
        .unwrap();

        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.currency_symbol, "$");
        assert_eq!(config.notification_timeout, Duration::from_millis(250));
        assert!(config.is_production());
    }
}
