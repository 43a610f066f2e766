use chrono_tz::Tz;
use duesoon_utils::create_api_key;
use std::{fmt::Display, str::FromStr, time::Duration};
use tracing::{info, warn};

/// Credentials for the HTTP email provider. When they are missing emails
/// are only logged.
#[derive(Debug, Clone)]
pub struct EmailApiConfig {
    /// Endpoint accepting a json message to deliver
    pub api_url: String,
    /// Bearer token sent to the provider
    pub api_token: String,
}

#[derive(Debug, Clone)]
pub struct ReminderConfig {
    /// Timezone the daily reminder hour and due times in emails are expressed in
    pub timezone: Tz,
    /// Local hour of day at which the routine reminder pass runs
    pub daily_hour: u32,
    /// Upper bound for a single user or task lookup
    pub lookup_timeout: Duration,
    /// Upper bound for handing a single email to the provider
    pub dispatch_timeout: Duration,
    /// How many subscriptions are processed at the same time within a pass
    pub max_concurrency: usize,
    /// Whether the routine and urgent jobs are started with the application
    pub jobs_enabled: bool,
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            timezone: chrono_tz::Asia::Ho_Chi_Minh,
            daily_hour: 8,
            lookup_timeout: Duration::from_secs(10),
            dispatch_timeout: Duration::from_secs(30),
            max_concurrency: 8,
            jobs_enabled: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Secret required in the `x-api-key` header of operator routes
    pub admin_api_key: String,
    /// Port for the application to run on
    pub port: usize,
    /// Base url of the web app, used for links in emails
    pub frontend_url: String,
    /// Sender address of outgoing emails
    pub email_from: String,
    pub email_api: Option<EmailApiConfig>,
    /// Greeting used when neither the subscription nor the user has a name
    pub fallback_display_name: String,
    pub reminders: ReminderConfig,
}

fn parse_env<T>(key: &str, default: T) -> T
where
    T: FromStr + Display,
{
    match std::env::var(key) {
        Ok(value) => match value.parse::<T>() {
            Ok(parsed) => parsed,
            Err(_) => {
                warn!(
                    "The given {}: {} is not valid, falling back to the default: {}.",
                    key, value, default
                );
                default
            }
        },
        Err(_) => default,
    }
}

impl Config {
    pub fn new() -> Self {
        let admin_api_key = match std::env::var("ADMIN_API_KEY") {
            Ok(key) => key,
            Err(_) => {
                info!("Did not find ADMIN_API_KEY environment variable. Going to create one.");
                let key = create_api_key();
                info!("Api key for operator routes was generated and set to: {}", key);
                key
            }
        };

        let email_api = match (std::env::var("EMAIL_API_URL"), std::env::var("EMAIL_API_TOKEN")) {
            (Ok(api_url), Ok(api_token)) => Some(EmailApiConfig { api_url, api_token }),
            _ => {
                warn!("EMAIL_API_URL or EMAIL_API_TOKEN is missing. Emails will only be logged.");
                None
            }
        };

        let defaults = ReminderConfig::default();
        let timezone = match std::env::var("REMINDER_TIMEZONE") {
            Ok(tz) => tz.parse::<Tz>().unwrap_or_else(|_| {
                warn!(
                    "The given REMINDER_TIMEZONE: {} is not valid, falling back to: {}.",
                    tz, defaults.timezone
                );
                defaults.timezone
            }),
            Err(_) => defaults.timezone,
        };
        let mut daily_hour = parse_env("DAILY_REMINDER_HOUR", defaults.daily_hour);
        if daily_hour > 23 {
            warn!(
                "DAILY_REMINDER_HOUR must be below 24, falling back to: {}.",
                defaults.daily_hour
            );
            daily_hour = defaults.daily_hour;
        }
        let reminders = ReminderConfig {
            timezone,
            daily_hour,
            lookup_timeout: Duration::from_secs(parse_env(
                "REMINDER_LOOKUP_TIMEOUT_SECS",
                defaults.lookup_timeout.as_secs(),
            )),
            dispatch_timeout: Duration::from_secs(parse_env(
                "REMINDER_DISPATCH_TIMEOUT_SECS",
                defaults.dispatch_timeout.as_secs(),
            )),
            max_concurrency: parse_env("REMINDER_MAX_CONCURRENCY", defaults.max_concurrency)
                .max(1),
            jobs_enabled: std::env::var("DISABLE_REMINDER_JOBS").is_err(),
        };

        Self {
            admin_api_key,
            port: parse_env("PORT", 5000),
            frontend_url: std::env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:3000".into())
                .trim_end_matches('/')
                .to_string(),
            email_from: std::env::var("EMAIL_FROM")
                .unwrap_or_else(|_| "Duesoon <no-reply@duesoon.app>".into()),
            email_api,
            fallback_display_name: "there".into(),
            reminders,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn falls_back_on_invalid_values() {
        std::env::set_var("PORT", "not-a-port");
        std::env::set_var("REMINDER_TIMEZONE", "Mars/Olympus");
        std::env::set_var("DAILY_REMINDER_HOUR", "25");
        let config = Config::new();
        std::env::remove_var("PORT");
        std::env::remove_var("REMINDER_TIMEZONE");
        std::env::remove_var("DAILY_REMINDER_HOUR");

        assert_eq!(config.port, 5000);
        assert_eq!(config.reminders.timezone, chrono_tz::Asia::Ho_Chi_Minh);
        assert_eq!(config.reminders.daily_hour, 8);
    }

    #[test]
    #[serial]
    fn reads_reminder_settings() {
        std::env::set_var("REMINDER_TIMEZONE", "Europe/Oslo");
        std::env::set_var("DAILY_REMINDER_HOUR", "7");
        std::env::set_var("REMINDER_MAX_CONCURRENCY", "0");
        std::env::set_var("ADMIN_API_KEY", "operator-key");
        let config = Config::new();
        std::env::remove_var("REMINDER_TIMEZONE");
        std::env::remove_var("DAILY_REMINDER_HOUR");
        std::env::remove_var("REMINDER_MAX_CONCURRENCY");
        std::env::remove_var("ADMIN_API_KEY");

        assert_eq!(config.reminders.timezone, chrono_tz::Europe::Oslo);
        assert_eq!(config.reminders.daily_hour, 7);
        assert_eq!(config.reminders.max_concurrency, 1);
        assert_eq!(config.admin_api_key, "operator-key");
    }
}
