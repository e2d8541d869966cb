//! Genesis configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::Path;

use surety_types::{AccountId, ProtocolParams};
use surety_utils::LogFormat;

use crate::AppError;

/// Everything needed to create a fresh engine.
///
/// Can be loaded from a TOML file via [`AppConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Identity allowed to toggle the operating flag.
    #[serde(default = "default_owner")]
    pub owner: AccountId,

    /// Seed airline registered at genesis (unfunded).
    #[serde(default = "default_genesis_airline")]
    pub genesis_airline: AccountId,

    #[serde(default = "default_genesis_airline_name")]
    pub genesis_airline_name: String,

    /// Passphrase keying the index draws. Keep it out of reach of oracles.
    #[serde(default = "default_vrf_seed")]
    pub vrf_seed: String,

    /// Log format: "human" or "json".
    #[serde(default)]
    pub log_format: LogFormat,

    /// Log filter (e.g. "info", "debug,surety_oracle=trace").
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Genesis constants; any field left out keeps its default.
    #[serde(default)]
    pub params: ProtocolParams,
}

// ── Defaults ───────────────────────────────────────────────────────────

fn default_owner() -> AccountId {
    AccountId::new("surety-owner")
}

fn default_genesis_airline() -> AccountId {
    AccountId::new("airline-genesis")
}

fn default_genesis_airline_name() -> String {
    "Genesis Air".to_string()
}

fn default_vrf_seed() -> String {
    "surety-genesis".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, AppError> {
        let config: Self = toml::from_str(s).map_err(|e| AppError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, AppError> {
        toml::to_string_pretty(self).map_err(|e| AppError::Config(e.to_string()))
    }

    /// Reject configurations the engine cannot start from.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.owner.as_str().trim().is_empty() {
            return Err(AppError::Config("owner must not be empty".into()));
        }
        if self.genesis_airline.as_str().trim().is_empty() {
            return Err(AppError::Config("genesis_airline must not be empty".into()));
        }
        if self.genesis_airline_name.trim().is_empty() {
            return Err(AppError::Config("genesis_airline_name must not be empty".into()));
        }
        self.params.validate().map_err(AppError::Config)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            owner: default_owner(),
            genesis_airline: default_genesis_airline(),
            genesis_airline_name: default_genesis_airline_name(),
            vrf_seed: default_vrf_seed(),
            log_format: LogFormat::default(),
            log_level: default_log_level(),
            params: ProtocolParams::default(),
        }
    }
}
