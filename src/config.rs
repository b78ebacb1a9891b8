//! Configuration module
//!
//! Loads configuration from environment variables.

use std::env;

use crate::domain::DailyRate;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Fine charged per overdue day
    pub daily_fine_rate: DailyRate,

    /// Loan length used when the caller does not pick one
    pub default_loan_days: u32,

    /// Environment (development, production)
    pub environment: String,

    /// Deliver notifications from a background task instead of inline
    pub async_notifications: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            daily_fine_rate: DailyRate::default(),
            default_loan_days: 7,
            environment: "development".to_string(),
            async_notifications: false,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let daily_fine_rate: DailyRate = lookup("LIBRARY_DAILY_FINE_RATE")
            .unwrap_or_else(|| "1.00".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue("LIBRARY_DAILY_FINE_RATE"))?;

        let default_loan_days: u32 = lookup("LIBRARY_DEFAULT_LOAN_DAYS")
            .unwrap_or_else(|| "7".to_string())
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue("LIBRARY_DEFAULT_LOAN_DAYS"))?;
        if default_loan_days == 0 {
            return Err(ConfigError::InvalidValue("LIBRARY_DEFAULT_LOAN_DAYS"));
        }

        let environment =
            lookup("ENVIRONMENT").unwrap_or_else(|| "development".to_string());

        let async_notifications = match lookup("LIBRARY_ASYNC_NOTIFICATIONS") {
            None => false,
            Some(v) => match v.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" | "" => false,
                _ => return Err(ConfigError::InvalidValue("LIBRARY_ASYNC_NOTIFICATIONS")),
            },
        };

        Ok(Self {
            daily_fine_rate,
            default_loan_days,
            environment,
            async_notifications,
        })
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();

        assert_eq!(config.daily_fine_rate.value(), dec!(1));
        assert_eq!(config.default_loan_days, 7);
        assert!(!config.is_production());
        assert!(!config.async_notifications);
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("LIBRARY_DAILY_FINE_RATE", "0.25"),
            ("LIBRARY_DEFAULT_LOAN_DAYS", "21"),
            ("ENVIRONMENT", "production"),
            ("LIBRARY_ASYNC_NOTIFICATIONS", "true"),
        ])
        .unwrap();

        assert_eq!(config.daily_fine_rate.value(), dec!(0.25));
        assert_eq!(config.default_loan_days, 21);
        assert!(config.is_production());
        assert!(config.async_notifications);
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            config_from(&[("LIBRARY_DAILY_FINE_RATE", "-1")]),
            Err(ConfigError::InvalidValue("LIBRARY_DAILY_FINE_RATE"))
        ));
        assert!(matches!(
            config_from(&[("LIBRARY_DEFAULT_LOAN_DAYS", "0")]),
            Err(ConfigError::InvalidValue("LIBRARY_DEFAULT_LOAN_DAYS"))
        ));
        assert!(matches!(
            config_from(&[("LIBRARY_ASYNC_NOTIFICATIONS", "maybe")]),
            Err(ConfigError::InvalidValue("LIBRARY_ASYNC_NOTIFICATIONS"))
        ));
    }
}
