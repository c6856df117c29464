//! Configuration management
//!
//! Settings live in settings.json inside the teller directory:
//! ```json
//! {
//!   "app": { "dbFilename": "teller.duckdb", "auditEnabled": true }
//! }
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

pub const DEFAULT_DB_FILENAME: &str = "teller.duckdb";

const SETTINGS_FILENAME: &str = "settings.json";

/// Raw settings.json structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    app: AppSettings,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppSettings {
    #[serde(default)]
    db_filename: Option<String>,
    #[serde(default)]
    audit_enabled: Option<bool>,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

fn settings_path(teller_dir: &Path) -> PathBuf {
    teller_dir.join(SETTINGS_FILENAME)
}

/// Tolerant read: a missing or unparseable file yields defaults
fn read_settings(path: &Path) -> Result<SettingsFile> {
    if !path.exists() {
        return Ok(SettingsFile::default());
    }
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content).unwrap_or_default())
}

/// Teller configuration (simplified view of settings)
#[derive(Debug, Clone)]
pub struct Config {
    pub db_filename: String,
    pub audit_enabled: bool,
    // Keep the raw settings for preservation when saving
    _raw_settings: SettingsFile,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_filename: DEFAULT_DB_FILENAME.to_string(),
            audit_enabled: true,
            _raw_settings: SettingsFile::default(),
        }
    }
}

impl Config {
    /// Load config from the teller directory
    ///
    /// Environment overrides, mainly for CI and testing:
    /// TELLER_DB_FILENAME replaces the database filename,
    /// TELLER_AUDIT turns the audit trail on or off.
    pub fn load(teller_dir: &Path) -> Result<Self> {
        let raw = read_settings(&settings_path(teller_dir))?;

        let db_filename = match std::env::var("TELLER_DB_FILENAME").ok() {
            Some(name) if !name.is_empty() => name,
            _ => raw
                .app
                .db_filename
                .clone()
                .unwrap_or_else(|| DEFAULT_DB_FILENAME.to_string()),
        };

        let audit_enabled = match std::env::var("TELLER_AUDIT").ok().as_deref() {
            Some("true" | "1" | "yes" | "TRUE" | "YES") => true,
            Some("false" | "0" | "no" | "FALSE" | "NO") => false,
            _ => raw.app.audit_enabled.unwrap_or(true),
        };

        Ok(Self {
            db_filename,
            audit_enabled,
            _raw_settings: raw,
        })
    }

    /// Save config to the teller directory.
    /// Starts from what is on disk so fields the tool does not manage
    /// survive the rewrite.
    pub fn save(&self, teller_dir: &Path) -> Result<()> {
        let path = settings_path(teller_dir);
        let mut settings = read_settings(&path)?;

        settings.app.db_filename = Some(self.db_filename.clone());
        settings.app.audit_enabled = Some(self.audit_enabled);

        std::fs::write(&path, serde_json::to_string_pretty(&settings)?)?;
        Ok(())
    }
}
