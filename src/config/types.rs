// Configuration types module
// Defines the reference host configuration structures

use serde::Deserialize;
use std::collections::BTreeMap;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub performance: PerformanceConfig,
    pub static_files: StaticFilesConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive: bool,
    /// Whole-connection timeout in seconds
    pub timeout_secs: u64,
}

/// What to serve and how
#[derive(Debug, Deserialize, Clone)]
pub struct StaticFilesConfig {
    /// Directory holding the built application
    pub root: String,
    /// Entry document path relative to `root`
    pub entry: String,
    /// Extra headers for file and entry responses
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    /// Render the entry document per request
    pub dynamic: bool,
    /// Values exposed to the entry template when `dynamic` is set
    #[serde(default)]
    pub values: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub access_log: bool,
}
