//! Best-effort local persistence of the ledger and the calculator form.

use crate::config::Config;
use crate::form::FormState;
use crate::ledger::ScenarioLedger;
use crate::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Stores the scenario ledger and the last form as JSON files.
///
/// Loading never fails: a missing or unreadable file yields the default
/// state.
#[derive(Debug, Clone)]
pub struct StateStore {
    ledger_path: PathBuf,
    form_path: PathBuf,
}

impl StateStore {
    pub fn new(ledger_path: PathBuf, form_path: PathBuf) -> Self {
        Self {
            ledger_path,
            form_path,
        }
    }

    /// Store at the paths named by the configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.ledger_path(), config.form_path())
    }

    /// Store using the default file names inside `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join("scenarios.json"), dir.join("form.json"))
    }

    pub fn ledger_path(&self) -> &Path {
        &self.ledger_path
    }

    pub fn form_path(&self) -> &Path {
        &self.form_path
    }

    /// Load the ledger, dropping any record `append` would have refused.
    pub fn load_ledger(&self) -> ScenarioLedger {
        let mut ledger: ScenarioLedger = load_or_default(&self.ledger_path);
        let dropped = ledger.retain_valid();
        if dropped > 0 {
            tracing::warn!(
                path = %self.ledger_path.display(),
                dropped,
                "dropping invalid scenarios from ledger file"
            );
        }
        ledger
    }

    pub fn save_ledger(&self, ledger: &ScenarioLedger) -> Result<()> {
        save(&self.ledger_path, ledger)
    }

    pub fn load_form(&self) -> FormState {
        load_or_default(&self.form_path)
    }

    pub fn save_form(&self, form: &FormState) -> Result<()> {
        save(&self.form_path, form)
    }
}

fn load_or_default<T: DeserializeOwned + Default>(path: &Path) -> T {
    match load(path) {
        Ok(Some(value)) => value,
        Ok(None) => T::default(),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable state file");
            T::default()
        }
    }
}

fn load<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path)?;
    Ok(Some(serde_json::from_str(&content)?))
}

fn save<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let content = serde_json::to_string_pretty(value)?;
    fs::write(path, content)?;
    tracing::debug!(path = %path.display(), "state saved");
    Ok(())
}
