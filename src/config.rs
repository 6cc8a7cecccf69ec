use std::{env, fmt::Display, str::FromStr};

use tracing::{info, warn};

use crate::analytics::period::PeriodAnchor;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://./finance_dashboard.db?mode=rwc";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub db_max_connections: u32,
    pub host: String,
    pub port: u16,
    /// `None` allows any origin.
    pub cors_origin: Option<String>,
    pub budget_utc_offset_minutes: i32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            db_max_connections: 5,
            host: "127.0.0.1".to_string(),
            port: 5000,
            cors_origin: None,
            budget_utc_offset_minutes: 0,
        }
    }
}

impl Config {
    pub fn load() -> Self {
        let defaults = Self::default();
        Self {
            database_url: try_load("DATABASE_URL", defaults.database_url),
            db_max_connections: try_load("DB_MAX_CONNECTIONS", defaults.db_max_connections),
            host: try_load("HOST", defaults.host),
            port: try_load("PORT", defaults.port),
            cors_origin: env::var("CORS_ORIGIN").ok().filter(|o| !o.trim().is_empty()),
            budget_utc_offset_minutes: try_load(
                "BUDGET_UTC_OFFSET_MINUTES",
                defaults.budget_utc_offset_minutes,
            ),
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Falls back to UTC when the configured offset is out of range.
    pub fn period_anchor(&self) -> PeriodAnchor {
        PeriodAnchor::from_offset_minutes(self.budget_utc_offset_minutes).unwrap_or_else(|| {
            warn!(
                "BUDGET_UTC_OFFSET_MINUTES={} is not a valid offset, using UTC",
                self.budget_utc_offset_minutes
            );
            PeriodAnchor::utc()
        })
    }
}

fn try_load<T>(key: &str, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    match env::var(key) {
        Err(_) => {
            info!("{key} not set, using default: {default}");
            default
        }
        Ok(raw) => raw.trim().parse().unwrap_or_else(|e| {
            warn!("Invalid {key} value: {e}, using default: {default}");
            default
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_offset_falls_back_to_utc() {
        let config = Config {
            budget_utc_offset_minutes: 24 * 60,
            ..Config::default()
        };
        assert_eq!(config.period_anchor(), PeriodAnchor::utc());

        let ist = Config {
            budget_utc_offset_minutes: 330,
            ..Config::default()
        };
        assert_eq!(ist.period_anchor().offset().local_minus_utc(), 330 * 60);
    }

    #[test]
    fn bind_address_joins_host_and_port() {
        assert_eq!(Config::default().bind_address(), "127.0.0.1:5000");
    }
}
