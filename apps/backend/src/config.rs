//! Service configuration read from the environment.

use chrono::{Duration, FixedOffset, Offset, Utc};
use thiserror::Error;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_SESSION_TTL_MINUTES: i64 = 240;
const MAX_OFFSET_MINUTES: i32 = 1439;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has invalid value {value:?}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub db_max_connections: u32,
    /// Local time zone used for statistics, in minutes east of UTC.
    pub utc_offset_minutes: i32,
    /// Idle quiz sessions older than this are dropped.
    pub session_ttl_minutes: i64,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable source. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let database_url = var("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;
        let host = var("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = parse_or("PORT", var("PORT"), DEFAULT_PORT)?;
        let db_max_connections =
            parse_or("DB_MAX_CONNECTIONS", var("DB_MAX_CONNECTIONS"), DEFAULT_MAX_CONNECTIONS)?;
        if db_max_connections == 0 {
            return Err(ConfigError::Invalid {
                name: "DB_MAX_CONNECTIONS",
                value: "0".to_string(),
            });
        }

        let offset_raw = var("ANALYTICS_UTC_OFFSET_MINUTES");
        let utc_offset_minutes: i32 = parse_or("ANALYTICS_UTC_OFFSET_MINUTES", offset_raw.clone(), 0)?;
        if utc_offset_minutes.abs() > MAX_OFFSET_MINUTES {
            return Err(ConfigError::Invalid {
                name: "ANALYTICS_UTC_OFFSET_MINUTES",
                value: offset_raw.unwrap_or_default(),
            });
        }

        let ttl_raw = var("QUIZ_SESSION_TTL_MINUTES");
        let session_ttl_minutes =
            parse_or("QUIZ_SESSION_TTL_MINUTES", ttl_raw.clone(), DEFAULT_SESSION_TTL_MINUTES)?;
        if session_ttl_minutes <= 0 {
            return Err(ConfigError::Invalid {
                name: "QUIZ_SESSION_TTL_MINUTES",
                value: ttl_raw.unwrap_or_default(),
            });
        }

        Ok(Self {
            database_url,
            host,
            port,
            db_max_connections,
            utc_offset_minutes,
            session_ttl_minutes,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn analytics_offset(&self) -> FixedOffset {
        // Range checked in from_lookup.
        FixedOffset::east_opt(self.utc_offset_minutes * 60)
            .unwrap_or_else(|| Utc.fix())
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::minutes(self.session_ttl_minutes)
    }
}

fn parse_or<T: std::str::FromStr>(
    name: &'static str,
    raw: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid { name, value }),
    }
}
