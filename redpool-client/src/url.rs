//! Pool configuration from `redis://` URLs.
//!
//! Accepted shape: `redis://host[:port]/[db]?key=val&...` with default
//! port 6379. Only database 0 can be selected. Recognized query keys
//! tune timeouts, buffer sizing, and pool lifetimes; unknown keys are
//! ignored and malformed values leave the defaults in place.

use std::time::Duration;

use crate::error::{Error, Result};
use crate::pool::PoolOptions;

/// Parses a `redis://` URL into pool options.
pub fn parse_url(rawurl: &str) -> Result<PoolOptions> {
    let mut options = PoolOptions::default();
    if rawurl.is_empty() {
        return Ok(options);
    }
    let rest = rawurl
        .strip_prefix("redis://")
        .ok_or_else(|| Error::InvalidUrl(format!("scheme must be redis: {rawurl}")))?;

    let (location, query) = match rest.split_once('?') {
        Some((location, query)) => (location, Some(query)),
        None => (rest, None),
    };
    let (authority, path) = match location.split_once('/') {
        Some((authority, path)) => (authority, path),
        None => (location, ""),
    };
    match path.trim_matches('/') {
        "" | "0" => {}
        db => return Err(Error::InvalidUrl(format!("only database 0 is supported, got {db:?}"))),
    }

    options.address = parse_address(authority);
    if let Some(query) = query {
        apply_query(&mut options, query);
    }
    Ok(options)
}

fn parse_address(authority: &str) -> String {
    let (host, port) = match authority.rsplit_once(':') {
        Some((host, port)) if !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit()) => {
            (host, port)
        }
        _ => (authority, "6379"),
    };
    let host = if host.is_empty() { "127.0.0.1" } else { host };
    format!("{host}:{port}")
}

fn apply_query(options: &mut PoolOptions, query: &str) {
    for pair in query.split('&') {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        match key {
            "read-timeout" => {
                if let Some(d) = parse_duration(value) {
                    options.conn.read_timeout = Some(d);
                }
            }
            "write-timeout" => {
                if let Some(d) = parse_duration(value) {
                    options.conn.write_timeout = Some(d);
                }
            }
            "read-buffer-size" => {
                if let Ok(size) = value.parse::<usize>() {
                    if size > 0 {
                        options.conn.read_buffer_size = size;
                    }
                }
            }
            "max-conn-age" => {
                if let Some(d) = parse_duration(value) {
                    options.max_connection_age = d;
                }
            }
            "max-idle-time" => {
                if let Some(d) = parse_duration(value) {
                    options.max_idle_time = d;
                }
            }
            "check-idle-interval" => {
                if let Some(d) = parse_duration(value) {
                    options.check_idle_interval = d;
                }
            }
            _ => {}
        }
    }
}

/// Parses concatenated `<int><unit>` duration segments, e.g. `5s`,
/// `100ms`, `1m30s`. Units: `ns`, `us`, `ms`, `s`, `m`, `h`.
fn parse_duration(s: &str) -> Option<Duration> {
    if s.is_empty() {
        return None;
    }
    let bytes = s.as_bytes();
    let mut total = Duration::ZERO;
    let mut at = 0;
    while at < bytes.len() {
        let digits_start = at;
        while at < bytes.len() && bytes[at].is_ascii_digit() {
            at += 1;
        }
        if at == digits_start {
            return None;
        }
        let value: u64 = s[digits_start..at].parse().ok()?;
        let unit_start = at;
        while at < bytes.len() && !bytes[at].is_ascii_digit() {
            at += 1;
        }
        total += match &s[unit_start..at] {
            "ns" => Duration::from_nanos(value),
            "us" => Duration::from_micros(value),
            "ms" => Duration::from_millis(value),
            "s" => Duration::from_secs(value),
            "m" => Duration::from_secs(value.checked_mul(60)?),
            "h" => Duration::from_secs(value.checked_mul(3600)?),
            _ => return None,
        };
    }
    if total > Duration::ZERO {
        Some(total)
    } else {
        None
    }
}
