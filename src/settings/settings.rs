use anyhow::{Result, anyhow};
use config::{Config, File};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub api: Api,
    #[serde(default)]
    pub cache: Cache,
    pub storage: Storage,
    pub log: Log,
}

#[derive(Debug, Deserialize)]
pub struct Api {
    pub base_url: String,
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

#[derive(Debug, Deserialize)]
pub struct Cache {
    #[serde(default = "default_stale_time_ms")]
    pub stale_time_ms: u64,
    #[serde(default = "default_ttl_ms")]
    pub ttl_ms: u64,
    #[serde(default = "default_retry")]
    pub retry: u32,
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
    #[serde(default = "default_sweep_interval_ms")]
    pub sweep_interval_ms: u64,
}

impl Default for Cache {
    fn default() -> Self {
        Cache {
            stale_time_ms: default_stale_time_ms(),
            ttl_ms: default_ttl_ms(),
            retry: default_retry(),
            retry_delay_ms: default_retry_delay_ms(),
            sweep_interval_ms: default_sweep_interval_ms(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Storage {
    pub dir: String,
}

#[derive(Debug, Deserialize)]
pub struct Log {
    pub filter: String,
}

fn default_request_timeout_ms() -> u64 {
    10_000
}

fn default_stale_time_ms() -> u64 {
    5 * 60 * 1000
}

fn default_ttl_ms() -> u64 {
    10 * 60 * 1000
}

fn default_retry() -> u32 {
    1
}

fn default_retry_delay_ms() -> u64 {
    1000
}

fn default_sweep_interval_ms() -> u64 {
    60 * 1000
}

#[cfg(debug_assertions)]
const SETTINGS_PATH: &str = "settings/dev.toml";
#[cfg(not(debug_assertions))]
const SETTINGS_PATH: &str = "settings/release.toml";

pub fn parse_settings(path: Option<&str>) -> Result<Settings> {
    let path = path.unwrap_or(SETTINGS_PATH);

    let settings: Settings = Config::builder()
        .add_source(File::with_name(path))
        .build()
        .map_err(|e| anyhow!(e))?
        .try_deserialize()
        .map_err(|e| anyhow!(e))?;

    Ok(settings)
}
