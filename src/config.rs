// config.rs - Bot Configuration
// Reads secrets and tunables from the process environment, falling back to a
// botconfig.txt file (KEY=VALUE lines) searched in the usual locations.
//
// Used by: main.rs (startup)

use std::collections::HashMap;
use std::env;
use std::fs;

use log::{debug, info};

use crate::error::ConfigError;

const CONFIG_PATHS: [&str; 4] = [
    "botconfig.txt",
    "../botconfig.txt",
    "../../botconfig.txt",
    "src/botconfig.txt",
];

pub const DEFAULT_PREFIX: &str = "^";
pub const DEFAULT_API_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";
pub const DEFAULT_SESSION_TTL_SECS: u64 = 3600;
// chrono::Duration::seconds panics above i64::MAX / 1000
pub const MAX_SESSION_TTL_SECS: u64 = i64::MAX as u64 / 1000;
pub const DEFAULT_SESSION_CAPACITY: usize = 10_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotConfig {
    pub discord_token: String,
    pub youtube_api_key: String,
    pub prefix: String,
    pub api_base_url: String,
    pub session_ttl_secs: u64,
    pub session_capacity: usize,
}

impl BotConfig {
    /// Load configuration. Environment variables take precedence over
    /// values found in botconfig.txt; the file itself is optional.
    pub fn load() -> Result<Self, ConfigError> {
        let file_values = match read_config_file() {
            Some((path, content)) => {
                info!("Configuration file found at {}", path);
                parse_config(&content)
            }
            None => {
                debug!("No botconfig.txt found, using process environment only");
                HashMap::new()
            }
        };

        Self::from_lookup(|key| env::var(key).ok().or_else(|| file_values.get(key).cloned()))
    }

    /// Build a configuration from any key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let discord_token = required(get("DISCORD_TOKEN"), "DISCORD_TOKEN", "YOUR_BOT_TOKEN_HERE")?;
        let youtube_api_key = required(get("YT_API_KEY"), "YT_API_KEY", "YOUR_API_KEY_HERE")?;

        let prefix = get("PREFIX").unwrap_or_else(|| DEFAULT_PREFIX.to_string());
        let api_base_url = get("YT_API_BASE_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());

        let session_ttl_secs = match get("SESSION_TTL_SECS") {
            Some(value) => match parse_positive(&value, "SESSION_TTL_SECS")? {
                secs if secs <= MAX_SESSION_TTL_SECS => secs,
                _ => return Err(ConfigError::Invalid { key: "SESSION_TTL_SECS", value }),
            },
            None => DEFAULT_SESSION_TTL_SECS,
        };
        let session_capacity = match get("SESSION_CAPACITY") {
            Some(value) => parse_positive(&value, "SESSION_CAPACITY")? as usize,
            None => DEFAULT_SESSION_CAPACITY,
        };

        Ok(Self {
            discord_token,
            youtube_api_key,
            prefix,
            api_base_url,
            session_ttl_secs,
            session_capacity,
        })
    }

    pub fn session_ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.session_ttl_secs.min(MAX_SESSION_TTL_SECS) as i64)
    }
}

fn read_config_file() -> Option<(&'static str, String)> {
    CONFIG_PATHS
        .iter()
        .find_map(|path| fs::read_to_string(path).ok().map(|content| (*path, content)))
}

/// Parse KEY=VALUE lines. Blank lines and `#` comments are skipped and a
/// leading byte order mark is ignored.
pub fn parse_config(content: &str) -> HashMap<String, String> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut config = HashMap::new();

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some((key, value)) = line.split_once('=') {
            config.insert(key.trim().to_string(), value.trim().to_string());
        }
    }

    config
}

fn required(value: Option<String>, key: &'static str, placeholder: &str) -> Result<String, ConfigError> {
    match value {
        None => Err(ConfigError::Missing(key)),
        Some(v) if v == placeholder => Err(ConfigError::Placeholder(key)),
        Some(v) => Ok(v),
    }
}

fn parse_positive(value: &str, key: &'static str) -> Result<u64, ConfigError> {
    match value.parse::<u64>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ConfigError::Invalid { key, value: value.to_string() }),
    }
}
