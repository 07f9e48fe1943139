use std::{fmt::Display, net::SocketAddr, str::FromStr};

use anyhow::{anyhow, Context};

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub session_idle: time::Duration,
    pub secure_cookies: bool,
    pub db_max_connections: u32,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            database_url: "sqlite://grievance-portal.db?mode=rwc".to_owned(),
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            session_idle: time::Duration::minutes(60),
            secure_cookies: false,
            db_max_connections: 16,
        }
    }
}

impl Config {
    /// Reads the process environment, loading `.env` first when present.
    pub fn from_env() -> anyhow::Result<Config> {
        Self::from_lookup(|key| dotenv::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Config> {
        let defaults = Config::default();

        let session_idle_minutes = parse(&lookup, "SESSION_IDLE_MINUTES", defaults.session_idle.whole_minutes())?;
        if session_idle_minutes <= 0 {
            return Err(anyhow!("SESSION_IDLE_MINUTES must be positive"));
        }

        Ok(Config {
            database_url: lookup("DATABASE_URL").unwrap_or(defaults.database_url),
            bind_addr: parse(&lookup, "BIND_ADDR", defaults.bind_addr)?,
            session_idle: time::Duration::minutes(session_idle_minutes),
            secure_cookies: parse(&lookup, "SECURE_COOKIES", defaults.secure_cookies)?,
            db_max_connections: parse(&lookup, "DB_MAX_CONNECTIONS", defaults.db_max_connections)?,
        })
    }
}

fn parse<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|err| anyhow!("{err}"))
            .with_context(|| format!("invalid {key}: {raw:?}")),
        None => Ok(default),
    }
}
