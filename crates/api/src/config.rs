//! Process configuration loaded from environment variables.
//!
//! A `.env` file is honoured in development; real environment variables win.

use std::net::SocketAddr;

use souq_auth::{AuthError, AuthResult, TokenSettings};
use souq_observability::LogFormat;

pub const BIND_ADDR: &str = "SOUQ_BIND_ADDR";
pub const ACCESS_TOKEN_TTL: &str = "SOUQ_ACCESS_TOKEN_TTL";
pub const REFRESH_TOKEN_TTL: &str = "SOUQ_REFRESH_TOKEN_TTL";
pub const TOKEN_KEY: &str = "SOUQ_TOKEN_KEY";
pub const LOG_FORMAT: &str = "SOUQ_LOG_FORMAT";

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug)]
pub struct ApiConfig {
    pub bind_addr: SocketAddr,
    pub log_format: LogFormat,
    pub tokens: TokenSettings,
}

impl ApiConfig {
    /// Load `.env` (if present), then read the process environment.
    pub fn from_env() -> AuthResult<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> AuthResult<Self> {
        let bind_addr = lookup(BIND_ADDR)
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .map_err(|e| AuthError::configuration(format!("{BIND_ADDR}: {e}")))?;

        let log_format = match lookup(LOG_FORMAT) {
            Some(raw) => raw
                .parse()
                .map_err(|e| AuthError::configuration(format!("{LOG_FORMAT}: {e}")))?,
            None => LogFormat::default(),
        };

        let tokens = TokenSettings::parse(
            &required(&lookup, ACCESS_TOKEN_TTL)?,
            &required(&lookup, REFRESH_TOKEN_TTL)?,
            &required(&lookup, TOKEN_KEY)?,
        )?;

        Ok(Self {
            bind_addr,
            log_format,
            tokens,
        })
    }
}

fn required(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> AuthResult<String> {
    lookup(name)
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| AuthError::configuration(format!("{name} is not set")))
}
