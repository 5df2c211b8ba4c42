use std::net::IpAddr;

use chrono::FixedOffset;
use ipnet::IpNet;

#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL store when set, in-process store otherwise.
    pub database_url: Option<String>,
    pub admin_token: String,
    pub host: IpAddr,
    pub port: u16,
    pub max_body_size: usize,
    pub trusted_proxies: Vec<IpNet>,
    pub rate_limit: u32,
    pub rate_limit_window_secs: u64,
    pub zone: DisplayZone,
    pub cors_origins: Vec<String>,
    pub log_level: String,
}

/// Time zone used for calendar-day semantics and export dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayZone {
    Local,
    Fixed(FixedOffset),
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let database_url = std::env::var("DATABASE_URL")
            .ok()
            .filter(|url| !url.trim().is_empty());
        let admin_token = env_required("CONTACTDESK_ADMIN_TOKEN")?;
        if admin_token.len() < 16 {
            return Err("CONTACTDESK_ADMIN_TOKEN must be at least 16 characters".to_string());
        }

        let host: IpAddr = env_or("CONTACTDESK_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid CONTACTDESK_HOST: {e}"))?;

        let port: u16 = env_or("CONTACTDESK_PORT", "3000")
            .parse()
            .map_err(|e| format!("Invalid CONTACTDESK_PORT: {e}"))?;

        let max_body_size: usize = env_or("CONTACTDESK_MAX_BODY_SIZE", "65536")
            .parse()
            .map_err(|e| format!("Invalid CONTACTDESK_MAX_BODY_SIZE: {e}"))?;

        let trusted_proxies: Vec<IpNet> = env_or("CONTACTDESK_TRUSTED_PROXIES", "")
            .split(',')
            .filter(|s| !s.trim().is_empty())
            .map(|s| {
                s.trim()
                    .parse()
                    .map_err(|e| format!("Invalid CONTACTDESK_TRUSTED_PROXIES entry '{s}': {e}"))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let rate_limit: u32 = env_or("CONTACTDESK_RATE_LIMIT", "10")
            .parse()
            .map_err(|e| format!("Invalid CONTACTDESK_RATE_LIMIT: {e}"))?;

        let rate_limit_window_secs: u64 = env_or("CONTACTDESK_RATE_LIMIT_WINDOW_SECS", "60")
            .parse()
            .map_err(|e| format!("Invalid CONTACTDESK_RATE_LIMIT_WINDOW_SECS: {e}"))?;

        let zone = match std::env::var("CONTACTDESK_UTC_OFFSET").ok() {
            Some(offset) if !offset.trim().is_empty() => DisplayZone::Fixed(
                parse_utc_offset(offset.trim())
                    .ok_or_else(|| format!("Invalid CONTACTDESK_UTC_OFFSET: {offset}"))?,
            ),
            _ => DisplayZone::Local,
        };

        let cors_origins = env_or("CONTACTDESK_CORS_ORIGINS", "*")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let log_level = env_or("CONTACTDESK_LOG_LEVEL", "info");

        Ok(Config {
            database_url,
            admin_token,
            host,
            port,
            max_body_size,
            trusted_proxies,
            rate_limit,
            rate_limit_window_secs,
            zone,
            cors_origins,
            log_level,
        })
    }
}

/// Parse `Z`, `+HH:MM` or `-HH:MM`.
pub fn parse_utc_offset(s: &str) -> Option<FixedOffset> {
    if s == "Z" || s == "z" {
        return FixedOffset::east_opt(0);
    }

    let (sign, rest) = match s.as_bytes().first()? {
        b'+' => (1, &s[1..]),
        b'-' => (-1, &s[1..]),
        _ => return None,
    };
    let (hours, minutes) = rest.split_once(':')?;
    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = minutes.parse().ok()?;
    if !(0..24).contains(&hours) || !(0..60).contains(&minutes) {
        return None;
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

fn env_required(key: &str) -> Result<String, String> {
    std::env::var(key).map_err(|_| format!("Missing required environment variable: {key}"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
