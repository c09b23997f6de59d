//! Configuration loader for the `glucose-monitor` service.
//!
//! All runtime settings are read here from environment variables (with an
//! optional `.env` file loaded by the caller), so no other module calls
//! `env::var`. Alert thresholds are not part of this: they are fixed.

use std::env;
use std::time::Duration;

use anyhow::{anyhow, Result};

/// Parse an optional integer variable with a default value.
macro_rules! parse_env_u32 {
    ($lookup:expr, $var_name:expr, $default:expr) => {
        $lookup($var_name)
            .map(|v| v.parse::<u32>())
            .transpose()
            .map_err(|e| anyhow!("Invalid {}: {}", $var_name, e))?
            .unwrap_or($default)
    };
}

/// Parse a required string variable.
macro_rules! require_env {
    ($lookup:expr, $var_name:expr) => {
        $lookup($var_name)
            .ok_or_else(|| anyhow!("{} must be set in .env or environment", $var_name))?
    };
}

/// Strongly typed application configuration, immutable after loading.
#[derive(Debug, Clone)]
pub struct Config {
    // ---
    /// URL returning a JSON array of entries, newest first.
    pub data_source_url: String,

    /// Caption shown above the reading.
    pub monitor_name: String,

    /// Seconds between polls, and the retry delay after a failed poll.
    pub poll_interval_secs: u32,

    /// Request timeout for the data source.
    pub fetch_timeout_secs: u32,

    /// Port for the `/health` and `/display` routes.
    pub listen_port: u16,
}

/// Load configuration from environment variables with defaults.
///
/// Required:
/// - `DATA_SOURCE_URL` – entries endpoint, e.g. `https://ns.example/api/v1/entries.json?count=1`
///
/// Optional:
/// - `MONITOR_NAME` – caption (default: `Glucose`)
/// - `POLL_INTERVAL_SECS` – seconds between polls (default: 180)
/// - `FETCH_TIMEOUT_SECS` – request timeout (default: 30)
/// - `LISTEN_PORT` – HTTP port (default: 8080)
pub fn load_from_env() -> Result<Config> {
    from_lookup(|name| env::var(name).ok())
}

/// Build a [`Config`] from any variable source; `load_from_env` passes the
/// process environment.
pub fn from_lookup<F>(lookup: F) -> Result<Config>
where
    F: Fn(&str) -> Option<String>,
{
    // ---
    let data_source_url = require_env!(lookup, "DATA_SOURCE_URL");
    let monitor_name = lookup("MONITOR_NAME").unwrap_or_else(|| "Glucose".to_string());
    let poll_interval_secs = parse_env_u32!(lookup, "POLL_INTERVAL_SECS", 180);
    let fetch_timeout_secs = parse_env_u32!(lookup, "FETCH_TIMEOUT_SECS", 30);
    let listen_port = parse_env_u32!(lookup, "LISTEN_PORT", 8080);

    if poll_interval_secs == 0 {
        return Err(anyhow!("POLL_INTERVAL_SECS must be greater than zero"));
    }
    let listen_port =
        u16::try_from(listen_port).map_err(|_| anyhow!("Invalid LISTEN_PORT: {}", listen_port))?;

    Ok(Config {
        data_source_url,
        monitor_name,
        poll_interval_secs,
        fetch_timeout_secs,
        listen_port,
    })
}

impl Config {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(u64::from(self.poll_interval_secs))
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(u64::from(self.fetch_timeout_secs))
    }

    /// Log the loaded configuration, with credentials in the data source
    /// URL masked.
    pub fn log_config(&self) {
        // ---
        tracing::info!("Configuration loaded:");
        tracing::info!("  DATA_SOURCE_URL    : {}", mask_url(&self.data_source_url));
        tracing::info!("  MONITOR_NAME       : {}", self.monitor_name);
        tracing::info!("  POLL_INTERVAL_SECS : {}", self.poll_interval_secs);
        tracing::info!("  FETCH_TIMEOUT_SECS : {}", self.fetch_timeout_secs);
        tracing::info!("  LISTEN_PORT        : {}", self.listen_port);
    }
}

/// Replace a userinfo password and any `token`/`secret` query value with `****`.
fn mask_url(url: &str) -> String {
    // ---
    let (base, query) = match url.split_once('?') {
        Some((base, query)) => (base, Some(query)),
        None => (url, None),
    };

    // Userinfo can only appear in the authority, before the first '/'.
    let scheme_end = base.find("://").map_or(0, |p| p + 3);
    let authority_end = base[scheme_end..]
        .find('/')
        .map_or(base.len(), |p| scheme_end + p);
    let authority = &base[scheme_end..authority_end];

    let mut masked = match authority.rfind('@') {
        Some(at_pos) => match authority[..at_pos].find(':') {
            Some(colon) => format!(
                "{}:****{}",
                &base[..scheme_end + colon],
                &base[scheme_end + at_pos..]
            ),
            None => base.to_string(),
        },
        None => base.to_string(),
    };

    if let Some(query) = query {
        let params: Vec<String> = query
            .split('&')
            .map(|pair| match pair.split_once('=') {
                Some((key, _)) if key == "token" || key == "secret" => format!("{}=****", key),
                _ => pair.to_string(),
            })
            .collect();
        masked.push('?');
        masked.push_str(&params.join("&"));
    }

    masked
}
