//! Startup configuration for the token subsystem.
//!
//! Everything is passed in explicitly; nothing here reads the environment.

use std::time::Duration;

use chrono::TimeDelta;

use crate::error::{AuthError, AuthResult};
use crate::key::KeyMaterial;

/// Validated token lifetimes plus the process key.
#[derive(Debug)]
pub struct TokenSettings {
    access_ttl: TimeDelta,
    refresh_ttl: TimeDelta,
    key: KeyMaterial,
}

impl TokenSettings {
    /// Validate already-parsed values.
    ///
    /// Both lifetimes must be positive, and a refresh token may not expire before
    /// the access token it renews.
    pub fn new(access_ttl: Duration, refresh_ttl: Duration, key: KeyMaterial) -> AuthResult<Self> {
        let access = to_time_delta("access token duration", access_ttl)?;
        let refresh = to_time_delta("refresh token duration", refresh_ttl)?;

        if access / 2 <= TimeDelta::zero() {
            return Err(AuthError::configuration(format!(
                "access token duration ({access_ttl:?}) is too short to derive an impersonation lifetime"
            )));
        }

        if refresh < access {
            return Err(AuthError::configuration(format!(
                "refresh token duration ({refresh_ttl:?}) is shorter than access token duration ({access_ttl:?})"
            )));
        }

        Ok(Self {
            access_ttl: access,
            refresh_ttl: refresh,
            key,
        })
    }

    /// Parse the raw configuration strings (`"15m"`, `"720h"`, 64 hex chars).
    pub fn parse(access_ttl: &str, refresh_ttl: &str, key_hex: &str) -> AuthResult<Self> {
        let access = parse_duration(access_ttl)
            .map_err(|e| AuthError::configuration(format!("access token duration: {e}")))?;
        let refresh = parse_duration(refresh_ttl)
            .map_err(|e| AuthError::configuration(format!("refresh token duration: {e}")))?;
        let key = KeyMaterial::from_hex(key_hex)?;
        Self::new(access, refresh, key)
    }

    pub fn access_ttl(&self) -> TimeDelta {
        self.access_ttl
    }

    pub fn refresh_ttl(&self) -> TimeDelta {
        self.refresh_ttl
    }

    /// Split into the lifetimes and the key (the key usually moves into an `Arc`).
    pub fn into_parts(self) -> (TimeDelta, TimeDelta, KeyMaterial) {
        (self.access_ttl, self.refresh_ttl, self.key)
    }
}

fn to_time_delta(what: &str, d: Duration) -> AuthResult<TimeDelta> {
    if d.is_zero() {
        return Err(AuthError::configuration(format!("{what} must be positive")));
    }
    TimeDelta::from_std(d).map_err(|_| AuthError::configuration(format!("{what} is out of range")))
}

// ─────────────────────────────────────────────────────────────────────────────
// Duration strings
// ─────────────────────────────────────────────────────────────────────────────

const NANOS_PER_MICRO: u128 = 1_000;
const NANOS_PER_MILLI: u128 = 1_000_000;
const NANOS_PER_SEC: u128 = 1_000_000_000;

/// Parse a duration string such as `"300ms"`, `"15m"`, `"1h30m"` or `"1.5h"`.
///
/// Accepted units: `ns`, `us`/`µs`, `ms`, `s`, `m`, `h`. A bare `"0"` is zero.
/// Negative durations are rejected.
pub fn parse_duration(input: &str) -> Result<Duration, String> {
    let s = input.trim();
    if s.is_empty() {
        return Err("empty duration".to_string());
    }
    if s == "0" {
        return Ok(Duration::ZERO);
    }

    let mut rest = s.strip_prefix('+').unwrap_or(s);
    if rest.starts_with('-') {
        return Err(format!("negative duration '{s}'"));
    }
    if rest.is_empty() {
        return Err(format!("invalid duration '{s}'"));
    }

    let mut total: u128 = 0;
    while !rest.is_empty() {
        let int_len = rest.bytes().take_while(u8::is_ascii_digit).count();
        let (int_part, after) = rest.split_at(int_len);

        let (frac_part, after) = match after.strip_prefix('.') {
            Some(tail) => {
                let frac_len = tail.bytes().take_while(u8::is_ascii_digit).count();
                tail.split_at(frac_len)
            }
            None => ("", after),
        };

        if int_part.is_empty() && frac_part.is_empty() {
            return Err(format!("invalid duration '{s}'"));
        }

        let unit_len = after
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(after.len());
        let (unit, next) = after.split_at(unit_len);
        let unit_nanos = unit_to_nanos(unit).ok_or_else(|| {
            if unit.is_empty() {
                format!("missing unit in duration '{s}'")
            } else {
                format!("unknown unit '{unit}' in duration '{s}'")
            }
        })?;

        let overflow = || format!("duration '{s}' is too large");
        let whole: u128 = if int_part.is_empty() {
            0
        } else {
            int_part.parse().map_err(|_| overflow())?
        };
        let mut value = whole.checked_mul(unit_nanos).ok_or_else(overflow)?;

        if !frac_part.is_empty() {
            // Digits past nanosecond precision for hours cannot matter.
            let digits = frac_part.len().min(18);
            let frac: u128 = frac_part[..digits].parse().map_err(|_| overflow())?;
            value = value
                .checked_add(frac * unit_nanos / 10u128.pow(digits as u32))
                .ok_or_else(overflow)?;
        }

        total = total.checked_add(value).ok_or_else(overflow)?;
        rest = next;
    }

    let nanos = u64::try_from(total).map_err(|_| format!("duration '{s}' is too large"))?;
    Ok(Duration::from_nanos(nanos))
}

fn unit_to_nanos(unit: &str) -> Option<u128> {
    match unit {
        "ns" => Some(1),
        "us" | "µs" | "μs" => Some(NANOS_PER_MICRO),
        "ms" => Some(NANOS_PER_MILLI),
        "s" => Some(NANOS_PER_SEC),
        "m" => Some(60 * NANOS_PER_SEC),
        "h" => Some(3_600 * NANOS_PER_SEC),
        _ => None,
    }
}
