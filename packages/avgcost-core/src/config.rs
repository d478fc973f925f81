//! Calculator configuration.
//!
//! Settings come from an optional `config.toml` in the data directory:
//!
//! ```toml
//! default_fixed_fee = 1.0
//! default_fee_pct = 0.25   # percent
//! ledger_file = "scenarios.json"
//! form_file = "form.json"
//! ```
//!
//! The data directory defaults to `~/.avgcost` and can be moved with the
//! `AVGCOST_HOME` environment variable. `AVGCOST_CONFIG` points at a config
//! file elsewhere.

use crate::types::FeeModel;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable overriding the data directory.
pub const HOME_ENV: &str = "AVGCOST_HOME";
/// Environment variable overriding the config file path.
pub const CONFIG_ENV: &str = "AVGCOST_CONFIG";

const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Fixed fee applied when none is given, in dollars
    pub default_fixed_fee: f64,
    /// Proportional fee applied when none is given, in percent (0..100)
    pub default_fee_pct: f64,
    /// Scenario ledger file, relative to the data directory
    pub ledger_file: PathBuf,
    /// Saved form file, relative to the data directory
    pub form_file: PathBuf,
    /// Directory holding config and state files
    #[serde(skip)]
    pub data_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_fixed_fee: 0.0,
            default_fee_pct: 0.0,
            ledger_file: PathBuf::from("scenarios.json"),
            form_file: PathBuf::from("form.json"),
            data_dir: Self::default_data_dir(),
        }
    }
}

impl Config {
    /// Get the default data directory.
    ///
    /// Default path: `~/.avgcost`
    /// Can be overridden with the `AVGCOST_HOME` environment variable.
    pub fn default_data_dir() -> PathBuf {
        if let Ok(path) = env::var(HOME_ENV) {
            return PathBuf::from(path);
        }

        directories::BaseDirs::new()
            .map(|dirs| dirs.home_dir().join(".avgcost"))
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Load configuration from `AVGCOST_CONFIG` or the default data directory.
    pub fn load() -> Result<Self> {
        let data_dir = Self::default_data_dir();
        let path = env::var(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| data_dir.join(CONFIG_FILE));
        Self::load_from_path(&path, data_dir)
    }

    /// Load configuration from a specific file. A missing file yields defaults.
    pub fn load_from_path(path: &Path, data_dir: PathBuf) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self {
                data_dir,
                ..Self::default()
            });
        }

        let content = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        Ok(Self { data_dir, ..config })
    }

    /// Parse and validate configuration text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(content).map_err(|e| Error::Config(e.message().to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if !self.default_fixed_fee.is_finite() || self.default_fixed_fee < 0.0 {
            return Err(Error::Config(
                "default_fixed_fee must be a non-negative number".to_string(),
            ));
        }
        if !self.default_fee_pct.is_finite() || self.default_fee_pct < 0.0 {
            return Err(Error::Config(
                "default_fee_pct must be a non-negative number".to_string(),
            ));
        }
        Ok(())
    }

    /// Fee model used when the caller gives no fees.
    pub fn default_fees(&self) -> FeeModel {
        FeeModel::new(self.default_fixed_fee, self.default_fee_pct / 100.0)
    }

    pub fn ledger_path(&self) -> PathBuf {
        self.data_dir.join(&self.ledger_file)
    }

    pub fn form_path(&self) -> PathBuf {
        self.data_dir.join(&self.form_file)
    }
}
