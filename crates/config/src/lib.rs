//! Configuration loading, validation, and management for skybroker.
//!
//! Loads configuration from `~/.skybroker/config.toml` with environment
//! variable overrides. Validates all settings at startup.
//!
//! The spending limits here are local safety guardrails enforced by this
//! process, independent of any budget the imagery vendor enforces on the
//! account itself.

use serde::{Deserialize, Serialize};
use skybroker_guardrail::SpendLimits;
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.skybroker/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrokerConfig {
    /// Maximum cost of a single order in USD.
    #[serde(default = "default_per_order_limit")]
    pub per_order_limit: f64,

    /// Maximum spend per UTC day in USD.
    #[serde(default = "default_daily_limit")]
    pub daily_limit: f64,

    /// Maximum all-time spend in USD.
    #[serde(default = "default_total_limit")]
    pub total_limit: f64,

    /// Master switch. Off by default; ordering costs real money.
    #[serde(default)]
    pub enable_ordering: bool,

    /// Provider minimum billable area; smaller AOIs are charged as this.
    #[serde(default = "default_min_billable_area")]
    pub min_billable_area_km2: f64,

    /// Provider minimum orderable area; smaller AOIs are auto-expanded.
    #[serde(default = "default_min_order_area")]
    pub min_order_area_km2: f64,

    /// AOIs above this are rejected outright.
    #[serde(default = "default_max_order_area")]
    pub max_order_area_km2: f64,

    /// Pending-order confirmation window in minutes.
    #[serde(default = "default_order_ttl")]
    pub order_ttl_minutes: u32,

    /// Where the ledger and pending-order files live.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

fn default_per_order_limit() -> f64 {
    20.0
}
fn default_daily_limit() -> f64 {
    40.0
}
fn default_total_limit() -> f64 {
    40.0
}
fn default_min_billable_area() -> f64 {
    25.0
}
fn default_min_order_area() -> f64 {
    5.0
}
fn default_max_order_area() -> f64 {
    10_000.0
}
fn default_order_ttl() -> u32 {
    5
}
fn default_data_dir() -> PathBuf {
    dirs_home().join(".skybroker")
}

impl BrokerConfig {
    /// Load configuration from the default path (~/.skybroker/config.toml),
    /// then apply `SKYBROKER_*` environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = default_data_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Apply `SKYBROKER_*` environment overrides on top of whatever the
    /// file (or defaults) provided. Environment wins.
    pub fn apply_env_overrides(&mut self) {
        if let Some(v) = env_f64("SKYBROKER_PER_ORDER_LIMIT") {
            self.per_order_limit = v;
        }
        if let Some(v) = env_f64("SKYBROKER_DAILY_LIMIT") {
            self.daily_limit = v;
        }
        if let Some(v) = env_f64("SKYBROKER_TOTAL_LIMIT") {
            self.total_limit = v;
        }
        if let Ok(v) = std::env::var("SKYBROKER_ENABLE_ORDERING") {
            self.enable_ordering = v.eq_ignore_ascii_case("true");
        }
        if let Some(v) = std::env::var("SKYBROKER_ORDER_TTL_MINUTES")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            self.order_ttl_minutes = v;
        }
        if let Ok(v) = std::env::var("SKYBROKER_DATA_DIR") {
            self.data_dir = PathBuf::from(v);
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.per_order_limit < 0.0 || self.daily_limit < 0.0 || self.total_limit < 0.0 {
            return Err(ConfigError::ValidationError(
                "spending limits must be non-negative".into(),
            ));
        }
        if self.min_billable_area_km2 <= 0.0 {
            return Err(ConfigError::ValidationError(
                "min_billable_area_km2 must be positive".into(),
            ));
        }
        if self.min_order_area_km2 > self.max_order_area_km2 {
            return Err(ConfigError::ValidationError(
                "min_order_area_km2 must not exceed max_order_area_km2".into(),
            ));
        }
        if self.order_ttl_minutes == 0 {
            return Err(ConfigError::ValidationError(
                "order_ttl_minutes must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// The three hard limits as the guardrail evaluator wants them.
    pub fn limits(&self) -> SpendLimits {
        SpendLimits {
            per_order: self.per_order_limit,
            daily: self.daily_limit,
            total: self.total_limit,
        }
    }

    /// Cost ledger file path.
    pub fn ledger_path(&self) -> PathBuf {
        self.data_dir.join("ledger.jsonl")
    }

    /// Pending-order store file path.
    pub fn pending_orders_path(&self) -> PathBuf {
        self.data_dir.join("pending_orders.json")
    }

    /// Generate a default config TOML string (for onboarding).
    pub fn default_toml() -> String {
        toml::to_string_pretty(&Self::default()).unwrap_or_default()
    }
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            per_order_limit: default_per_order_limit(),
            daily_limit: default_daily_limit(),
            total_limit: default_total_limit(),
            enable_ordering: false,
            min_billable_area_km2: default_min_billable_area(),
            min_order_area_km2: default_min_order_area(),
            max_order_area_km2: default_max_order_area(),
            order_ttl_minutes: default_order_ttl(),
            data_dir: default_data_dir(),
        }
    }
}

fn env_f64(name: &str) -> Option<f64> {
    std::env::var(name).ok().and_then(|v| v.parse().ok())
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
