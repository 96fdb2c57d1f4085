use std::{net::SocketAddr, ops::RangeInclusive, str::FromStr};

use serde::Deserialize;
use tracing::warn;

pub const DEFAULT_SESSION_TTL_MINUTES: i64 = 60 * 24 * 7;

/// Accepted session lifetimes: one minute up to one year.
pub const SESSION_TTL_RANGE: RangeInclusive<i64> = 1..=525_600;

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    pub ttl_minutes: i64,
    pub cookie_secure: bool,
}

impl SessionConfig {
    /// Session lifetime, clamped to `SESSION_TTL_RANGE`.
    pub fn ttl(&self) -> time::Duration {
        let minutes = self
            .ttl_minutes
            .clamp(*SESSION_TTL_RANGE.start(), *SESSION_TTL_RANGE.end());
        time::Duration::minutes(minutes)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub host: String,
    pub port: u16,
    pub session: SessionConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let session = SessionConfig {
            ttl_minutes: session_ttl_minutes(std::env::var("SESSION_TTL_MINUTES").ok().as_deref()),
            cookie_secure: env_or("SESSION_COOKIE_SECURE", false),
        };
        Ok(Self {
            database_url,
            max_connections: env_or("DATABASE_MAX_CONNECTIONS", 10),
            host: std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env_or("APP_PORT", 8080),
            session,
        })
    }

    pub fn bind_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(format!("{}:{}", self.host, self.port).parse()?)
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

/// Parse a session TTL, falling back to the default when absent, garbled or
/// outside `SESSION_TTL_RANGE`.
fn session_ttl_minutes(raw: Option<&str>) -> i64 {
    let Some(raw) = raw else {
        return DEFAULT_SESSION_TTL_MINUTES;
    };
    match raw.trim().parse::<i64>() {
        Ok(v) if SESSION_TTL_RANGE.contains(&v) => v,
        _ => {
            warn!(value = %raw, "SESSION_TTL_MINUTES out of range, using default");
            DEFAULT_SESSION_TTL_MINUTES
        }
    }
}
