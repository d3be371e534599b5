//! Persisted user preferences: formatting locale, display currency and the
//! list lengths the reports use.

use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use chrono::Utc;

use crate::{
    core::{
        services::{query_service::DEFAULT_RECENT_LIMIT, summary_service::DEFAULT_TOP_VENDORS},
        utils::{ensure_dir, write_atomic, PathResolver},
    },
    currency::{is_iso_code, LocaleConfig, DEFAULT_CURRENCY},
    errors::LedgerError,
};

const BACKUP_EXTENSION: &str = "json";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default = "default_locale")]
    pub locale: String,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default = "default_top_vendor_limit")]
    pub top_vendor_limit: usize,
    #[serde(default = "default_recent_limit")]
    pub recent_limit: usize,
    /// Ledger snapshot the shell opens on start.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_file: Option<PathBuf>,
}

fn default_locale() -> String {
    "en-US".into()
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.into()
}

fn default_top_vendor_limit() -> usize {
    DEFAULT_TOP_VENDORS
}

fn default_recent_limit() -> usize {
    DEFAULT_RECENT_LIMIT
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: default_locale(),
            currency: default_currency(),
            top_vendor_limit: default_top_vendor_limit(),
            recent_limit: default_recent_limit(),
            data_file: None,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), LedgerError> {
        if !is_iso_code(&self.currency) {
            return Err(LedgerError::Config(format!(
                "currency `{}` is not a three-letter ISO code",
                self.currency
            )));
        }
        if self.top_vendor_limit == 0 || self.recent_limit == 0 {
            return Err(LedgerError::Config(
                "list limits must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Number formatting for the configured locale tag.
    pub fn locale_config(&self) -> LocaleConfig {
        let mut locale = LocaleConfig {
            language_tag: self.locale.clone(),
            ..LocaleConfig::default()
        };
        let language = self.locale.split(['-', '_']).next().unwrap_or_default();
        if matches!(language, "de" | "es" | "fr" | "it" | "pt" | "nl") {
            locale.decimal_separator = ',';
            locale.grouping_separator = '.';
        }
        locale
    }
}

pub struct ConfigManager {
    path: PathBuf,
    backups_dir: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self, LedgerError> {
        Self::with_base_dir(PathResolver::base_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, LedgerError> {
        ensure_dir(&base)?;
        ensure_dir(&PathResolver::config_dir_in(&base))?;
        Ok(Self {
            path: PathResolver::config_file_in(&base),
            backups_dir: PathResolver::config_backup_dir_in(&base),
        })
    }

    /// Loads the saved config, or defaults when none exists yet.
    pub fn load(&self) -> Result<Config, LedgerError> {
        if !self.path.exists() {
            return Ok(Config::default());
        }
        let data = fs::read_to_string(&self.path)?;
        let config: Config = serde_json::from_str(&data)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, config: &Config) -> Result<(), LedgerError> {
        config.validate()?;
        let json = serde_json::to_string_pretty(config)?;
        write_atomic(&self.path, &json)
    }

    /// Writes a timestamped copy and returns its file name.
    pub fn backup(&self, config: &Config, note: Option<&str>) -> Result<String, LedgerError> {
        ensure_dir(&self.backups_dir)?;
        let mut name = format!("config_{}", Utc::now().format(BACKUP_TIMESTAMP_FORMAT));
        if let Some(label) = sanitize_note(note) {
            name.push('_');
            name.push_str(&label);
        }
        name.push_str(&format!(".{BACKUP_EXTENSION}"));
        let json = serde_json::to_string_pretty(config)?;
        write_atomic(&self.backups_dir.join(&name), &json)?;
        Ok(name)
    }

    pub fn restore(&self, backup_name: &str) -> Result<Config, LedgerError> {
        let path = self.backups_dir.join(backup_name);
        if !path.exists() {
            return Err(LedgerError::not_found("Configuration backup", backup_name));
        }
        let data = fs::read_to_string(&path)?;
        let config: Config = serde_json::from_str(&data)?;
        self.save(&config)?;
        Ok(config)
    }

    /// Backup names, newest first.
    pub fn list_backups(&self) -> Result<Vec<String>, LedgerError> {
        if !self.backups_dir.exists() {
            return Ok(Vec::new());
        }
        let mut entries = Vec::new();
        for entry in fs::read_dir(&self.backups_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(BACKUP_EXTENSION) {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|name| name.to_str()) {
                entries.push(name.to_string());
            }
        }
        entries.sort_by(|a, b| b.cmp(a));
        Ok(entries)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Lowercase alphanumerics joined by single dashes.
fn sanitize_note(note: Option<&str>) -> Option<String> {
    let raw = note?.trim();
    let mut sanitized = String::new();
    let mut last_dash = false;
    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() {
            sanitized.push(ch.to_ascii_lowercase());
            last_dash = false;
        } else if (ch.is_whitespace() || matches!(ch, '-' | '.' | '_'))
            && !sanitized.is_empty()
            && !last_dash
        {
            sanitized.push('-');
            last_dash = true;
        }
    }
    let trimmed = sanitized.trim_matches('-');
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
