//! Configuration for the airscope daemon and CLI.
//!
//! Defaults ← TOML file ← `AIRSCOPE_`-prefixed environment variables,
//! merged with figment. Every knob has a sane default so a bare
//! `airscope serve` works on a stock Linux laptop. Nested keys use a
//! double underscore in the environment: `AIRSCOPE_BROKER__HOST`,
//! `AIRSCOPE_SCAN__CACHE_SECS`, …

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── Config sections ─────────────────────────────────────────────────

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub http: HttpConfig,

    #[serde(default)]
    pub broker: BrokerConfig,

    #[serde(default)]
    pub scan: ScanConfig,

    #[serde(default)]
    pub capture: CaptureConfig,

    #[serde(default)]
    pub audit: AuditConfig,
}

/// HTTP front door binding.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HttpConfig {
    #[serde(default = "default_http_host")]
    pub host: String,

    #[serde(default = "default_http_port")]
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: default_http_host(),
            port: default_http_port(),
        }
    }
}

/// Message-bus connection.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BrokerConfig {
    #[serde(default = "default_broker_host")]
    pub host: String,

    #[serde(default = "default_broker_port")]
    pub port: u16,

    #[serde(default = "default_client_id")]
    pub client_id: String,

    #[serde(default = "default_keepalive_secs")]
    pub keepalive_secs: u64,

    /// Connect attempts before giving up. Must be at least 1.
    #[serde(default = "default_connect_retries")]
    pub connect_retries: u32,

    /// Fixed delay between connect attempts.
    #[serde(default = "default_retry_delay_secs")]
    pub retry_delay_secs: u64,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            host: default_broker_host(),
            port: default_broker_port(),
            client_id: default_client_id(),
            keepalive_secs: default_keepalive_secs(),
            connect_retries: default_connect_retries(),
            retry_delay_secs: default_retry_delay_secs(),
        }
    }
}

impl BrokerConfig {
    pub fn keepalive(&self) -> Duration {
        Duration::from_secs(self.keepalive_secs)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.retry_delay_secs)
    }
}

/// Network-scan tuning.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScanConfig {
    /// Interface handed to the fallback backend.
    #[serde(default = "default_interface")]
    pub interface: String,

    /// Validity window of a successful scan.
    #[serde(default = "default_cache_secs")]
    pub cache_secs: u64,

    /// Bound on each backend invocation. Must be non-zero.
    #[serde(default = "default_backend_timeout_secs")]
    pub backend_timeout_secs: u64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            interface: default_interface(),
            cache_secs: default_cache_secs(),
            backend_timeout_secs: default_backend_timeout_secs(),
        }
    }
}

impl ScanConfig {
    pub fn cache_duration(&self) -> Duration {
        Duration::from_secs(self.cache_secs)
    }

    pub fn backend_timeout(&self) -> Duration {
        Duration::from_secs(self.backend_timeout_secs)
    }
}

/// Frame-capture tuning.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CaptureConfig {
    /// Walk the adapter back to managed mode on shutdown.
    #[serde(default = "default_true")]
    pub restore_managed: bool,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            restore_managed: true,
        }
    }
}

/// External audit-tool launch.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuditConfig {
    #[serde(default = "default_audit_tool")]
    pub tool: String,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            tool: default_audit_tool(),
        }
    }
}

// ── Defaults ────────────────────────────────────────────────────────

fn default_http_host() -> String {
    "127.0.0.1".into()
}
fn default_http_port() -> u16 {
    8000
}
fn default_broker_host() -> String {
    "localhost".into()
}
fn default_broker_port() -> u16 {
    1883
}
fn default_client_id() -> String {
    "airscope".into()
}
fn default_keepalive_secs() -> u64 {
    60
}
fn default_connect_retries() -> u32 {
    5
}
fn default_retry_delay_secs() -> u64 {
    5
}
fn default_interface() -> String {
    "wlan0".into()
}
fn default_cache_secs() -> u64 {
    5
}
fn default_backend_timeout_secs() -> u64 {
    10
}
fn default_true() -> bool {
    true
}
fn default_audit_tool() -> String {
    "wifite".into()
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "airscope", "airscope").map_or_else(
        || {
            let mut path = dirs_fallback();
            path.push("config.toml");
            path
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut path = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    path.push(".config");
    path.push("airscope");
    path
}

// ── Config loading ──────────────────────────────────────────────────

/// Load configuration: defaults ← `path` (or the XDG file) ← environment.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let file = path.map_or_else(config_path, Path::to_path_buf);

    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(&file))
        .merge(Env::prefixed("AIRSCOPE_").split("__"));

    let config: Config = figment.extract()?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.broker.connect_retries == 0 {
        return Err(ConfigError::Validation {
            field: "broker.connect_retries".into(),
            reason: "must be at least 1".into(),
        });
    }
    if config.scan.backend_timeout_secs == 0 {
        return Err(ConfigError::Validation {
            field: "scan.backend_timeout_secs".into(),
            reason: "must be non-zero".into(),
        });
    }
    Ok(())
}

// ── Tests ────────────────────────────────────────────────────────────
