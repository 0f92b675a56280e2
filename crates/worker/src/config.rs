//! Worker configuration loaded from environment variables.

use std::str::FromStr;

use cron::Schedule;
use metal_detector_notifications::DEFAULT_CONCURRENCY;

/// Every Sunday at 04:00.
pub const DEFAULT_FREQUENCY_CRON: &str = "0 0 4 * * SUN";

/// Every day at 07:00.
pub const DEFAULT_RELEASE_DATE_CRON: &str = "0 0 7 * * *";

/// Every day at 07:00.
pub const DEFAULT_ANNOUNCEMENT_DATE_CRON: &str = "0 0 7 * * *";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{var} is not a valid cron expression: {message}")]
    InvalidCron { var: &'static str, message: String },

    #[error("{var} must be a positive integer, got '{value}'")]
    InvalidNumber { var: &'static str, value: String },
}

/// Settings for the worker process.
///
/// Cron expressions use the six-field, seconds-first syntax and fire in the
/// local time zone of the process.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    pub database_url: String,
    pub frequency_schedule: Schedule,
    pub release_date_schedule: Schedule,
    pub announcement_date_schedule: Schedule,
    /// Users processed concurrently within one run.
    pub concurrency: usize,
}

impl WorkerConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable                        | Required | Default         |
    /// |---------------------------------|----------|-----------------|
    /// | `DATABASE_URL`                  | yes      |                 |
    /// | `NOTIFY_FREQUENCY_CRON`         | no       | `0 0 4 * * SUN` |
    /// | `NOTIFY_RELEASE_DATE_CRON`      | no       | `0 0 7 * * *`   |
    /// | `NOTIFY_ANNOUNCEMENT_DATE_CRON` | no       | `0 0 7 * * *`   |
    /// | `NOTIFY_CONCURRENCY`            | no       | `4`             |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration through `lookup` instead of the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url = lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let schedule = |var: &'static str, default: &str| {
            let expression = lookup(var).unwrap_or_else(|| default.to_string());
            Schedule::from_str(&expression).map_err(|e| ConfigError::InvalidCron {
                var,
                message: e.to_string(),
            })
        };

        let concurrency = match lookup("NOTIFY_CONCURRENCY") {
            None => DEFAULT_CONCURRENCY,
            Some(value) => match value.parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(ConfigError::InvalidNumber {
                        var: "NOTIFY_CONCURRENCY",
                        value,
                    })
                }
            },
        };

        Ok(Self {
            database_url,
            frequency_schedule: schedule("NOTIFY_FREQUENCY_CRON", DEFAULT_FREQUENCY_CRON)?,
            release_date_schedule: schedule("NOTIFY_RELEASE_DATE_CRON", DEFAULT_RELEASE_DATE_CRON)?,
            announcement_date_schedule: schedule(
                "NOTIFY_ANNOUNCEMENT_DATE_CRON",
                DEFAULT_ANNOUNCEMENT_DATE_CRON,
            )?,
            concurrency,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use assert_matches::assert_matches;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<WorkerConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        WorkerConfig::from_lookup(|var| vars.get(var).cloned())
    }

    #[test]
    fn defaults_apply_when_only_database_is_set() {
        let config = load(&[("DATABASE_URL", "postgres://localhost/metal")]).unwrap();

        assert_eq!(config.database_url, "postgres://localhost/metal");
        assert_eq!(config.concurrency, DEFAULT_CONCURRENCY);
        assert_eq!(
            config.frequency_schedule.to_string(),
            Schedule::from_str(DEFAULT_FREQUENCY_CRON).unwrap().to_string()
        );
    }

    #[test]
    fn missing_database_url_is_an_error() {
        assert_matches!(load(&[]), Err(ConfigError::Missing("DATABASE_URL")));
    }

    #[test]
    fn invalid_cron_names_the_variable() {
        let err = load(&[
            ("DATABASE_URL", "postgres://localhost/metal"),
            ("NOTIFY_RELEASE_DATE_CRON", "every morning"),
        ])
        .unwrap_err();

        assert_matches!(
            err,
            ConfigError::InvalidCron {
                var: "NOTIFY_RELEASE_DATE_CRON",
                ..
            }
        );
    }

    #[test]
    fn zero_concurrency_is_rejected() {
        let err = load(&[
            ("DATABASE_URL", "postgres://localhost/metal"),
            ("NOTIFY_CONCURRENCY", "0"),
        ])
        .unwrap_err();

        assert_eq!(
            err.to_string(),
            "NOTIFY_CONCURRENCY must be a positive integer, got '0'"
        );
    }

    #[test]
    fn custom_concurrency_is_used() {
        let config = load(&[
            ("DATABASE_URL", "postgres://localhost/metal"),
            ("NOTIFY_CONCURRENCY", "16"),
        ])
        .unwrap();

        assert_eq!(config.concurrency, 16);
    }
}
