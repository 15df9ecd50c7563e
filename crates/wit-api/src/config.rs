//! Configuration for the combat log api

use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::info;

pub const DEFAULT_CONFIG_PATH: &str = "config/wit.toml";

// one game session log is a few hundred KB, 8 MB is plenty
pub const DEFAULT_MAX_LOG_BYTES: usize = 8 * 1024 * 1024;

// Main config structure
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    // address the http server binds to
    pub bind_addr: String,

    // NATS server and the subject uploads are published on
    pub nats_url: String,
    pub ingest_subject: String,

    pub clickhouse: ClickHouseConfig,

    // largest combat log accepted, in bytes
    pub max_log_bytes: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClickHouseConfig {
    pub url: String,
    pub database: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:3000".to_string(),
            nats_url: "localhost:4222".to_string(),
            ingest_subject: "combat.ingest".to_string(),
            clickhouse: ClickHouseConfig::default(),
            max_log_bytes: DEFAULT_MAX_LOG_BYTES,
        }
    }
}

impl Default for ClickHouseConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:8123".to_string(),
            database: "wit".to_string(),
        }
    }
}

// Load configuration from a TOML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<ServerConfig, Box<dyn std::error::Error>> {
    let content = fs::read_to_string(path)?;
    let config: ServerConfig = toml::from_str(&content)?;
    Ok(config)
}

/// Load the file when it exists, otherwise fall back to built-in defaults
pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<ServerConfig, Box<dyn std::error::Error>> {
    let path = path.as_ref();
    if !path.exists() {
        info!(path = %path.display(), "Config file not found, using defaults");
        return Ok(ServerConfig::default());
    }
    load_config(path)
}
