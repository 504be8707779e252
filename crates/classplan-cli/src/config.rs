use chrono_tz::Tz;
use classplan_core::config::ScheduleConfig;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub const CONFIG_FILE: &str = "classplan.toml";

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Config {
    pub database_path: String,
    /// Default `tracing` filter; `CLASSPLAN_LOG` takes precedence
    pub log_level: String,
    /// Whose personal calendar commands act on when `--user` is omitted
    pub user_id: i64,
    pub schedule: ScheduleConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: "classplan.db".to_string(),
            log_level: "warn".to_string(),
            user_id: 1,
            schedule: ScheduleConfig {
                timezone: detect_system_timezone(),
                ..Default::default()
            },
        }
    }
}

impl Config {
    /// Defaults, then `classplan.toml`, then `CLASSPLAN_*` variables
    /// (`__` separates nested keys, e.g. `CLASSPLAN_SCHEDULE__TIMEZONE`).
    pub fn new() -> Result<Self, figment::Error> {
        Self::figment().extract()
    }

    fn figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(CONFIG_FILE))
            .merge(Env::prefixed("CLASSPLAN_").ignore(&["log"]).split("__"))
    }
}

/// Validates that a timezone string is a valid IANA timezone name
pub fn validate_timezone(timezone: &str) -> Result<Tz, String> {
    Tz::from_str(timezone).map_err(|_| {
        format!(
            "Invalid timezone: '{}'. Use IANA timezone names like 'Asia/Ho_Chi_Minh'",
            timezone
        )
    })
}

/// Detects the system timezone, falling back to UTC if detection fails
pub fn detect_system_timezone() -> String {
    if let Ok(tz) = std::env::var("TZ") {
        if validate_timezone(&tz).is_ok() {
            return tz;
        }
    }

    #[cfg(target_os = "linux")]
    {
        if let Ok(tz) = std::fs::read_to_string("/etc/timezone") {
            let tz = tz.trim();
            if validate_timezone(tz).is_ok() {
                return tz.to_string();
            }
        }
    }

    if let Ok(local_tz) = iana_time_zone::get_timezone() {
        if validate_timezone(&local_tz).is_ok() {
            return local_tz;
        }
    }

    "UTC".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_file_and_env_layering() {
        Jail::expect_with(|jail| {
            jail.create_file(
                CONFIG_FILE,
                r#"
                database_path = "data/timetable.db"

                [schedule]
                upcoming_limit = 3
                "#,
            )?;
            jail.set_env("CLASSPLAN_SCHEDULE__TIMEZONE", "Asia/Ho_Chi_Minh");
            jail.set_env("CLASSPLAN_USER_ID", "42");

            let config = Config::new()?;
            assert_eq!(config.database_path, "data/timetable.db");
            assert_eq!(config.user_id, 42);
            assert_eq!(config.schedule.upcoming_limit, 3);
            assert_eq!(config.schedule.timezone, "Asia/Ho_Chi_Minh");
            assert_eq!(config.log_level, "warn");
            Ok(())
        });
    }

    #[test]
    fn test_defaults_without_file() {
        Jail::expect_with(|_jail| {
            let config = Config::new()?;
            assert_eq!(config.database_path, "classplan.db");
            assert_eq!(config.schedule.upcoming_limit, 5);
            assert!(validate_timezone(&config.schedule.timezone).is_ok());
            Ok(())
        });
    }
}
