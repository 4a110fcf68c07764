//! User preferences persisted next to the ledgers.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::analytics::{insight::InsightThresholds, tax::TaxPolicy};
use crate::core::{
    errors::{FinanceError, Result},
    utils::{ensure_dir, sanitize_note, write_atomic, PathResolver},
};
use crate::currency::CurrencyCode;

const BACKUP_EXTENSION: &str = "json";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S%3f";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    pub locale: String,
    pub currency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_opened_ledger: Option<String>,
    #[serde(default)]
    pub tax: TaxPolicy,
    #[serde(default)]
    pub insights: InsightThresholds,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: "en-US".into(),
            currency: "USD".into(),
            theme: None,
            last_opened_ledger: None,
            tax: TaxPolicy::default(),
            insights: InsightThresholds::default(),
        }
    }
}

impl Config {
    pub fn currency_code(&self) -> CurrencyCode {
        CurrencyCode::new(&self.currency)
    }

    /// Rejects rates that would make the estimates meaningless.
    pub fn validate(&self) -> Result<()> {
        let unit = rust_decimal::Decimal::ONE;
        if self.tax.self_employment_rate.is_sign_negative()
            || self.tax.self_employment_rate > unit
            || self.tax.income_tax_rate.is_sign_negative()
            || self.tax.income_tax_rate > unit
        {
            return Err(FinanceError::ConfigError(
                "tax rates must be fractions between 0 and 1".into(),
            ));
        }
        if self.tax.invoice_tax_percent.is_sign_negative() {
            return Err(FinanceError::ConfigError(
                "invoice tax percent cannot be negative".into(),
            ));
        }
        if self.currency.trim().is_empty() {
            return Err(FinanceError::ConfigError("currency code is empty".into()));
        }
        Ok(())
    }
}

pub struct ConfigManager {
    path: PathBuf,
    backups_dir: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self> {
        Self::from_base(PathResolver::base_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self> {
        Self::from_base(base)
    }

    fn from_base(base: PathBuf) -> Result<Self> {
        ensure_dir(&base)?;
        ensure_dir(&PathResolver::config_dir_in(&base))?;
        let backups_dir = PathResolver::config_backup_dir_in(&base);
        ensure_dir(&backups_dir)?;
        Ok(Self {
            path: PathResolver::config_file_in(&base),
            backups_dir,
        })
    }

    /// Missing file means defaults; a malformed one is a config error.
    pub fn load(&self) -> Result<Config> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "no config file, using defaults");
            return Ok(Config::default());
        }
        let data = fs::read_to_string(&self.path)?;
        let config: Config = serde_json::from_str(&data).map_err(|err| {
            FinanceError::ConfigError(format!("{}: {}", self.path.display(), err))
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, config: &Config) -> Result<()> {
        config.validate()?;
        if let Some(parent) = self.path.parent() {
            ensure_dir(parent)?;
        }
        let json = serde_json::to_string_pretty(config)?;
        write_atomic(&self.path, &json)?;
        tracing::info!(path = %self.path.display(), "saved config");
        Ok(())
    }

    pub fn backup(&self, config: &Config, note: Option<&str>) -> Result<String> {
        ensure_dir(&self.backups_dir)?;
        let timestamp = Utc::now().format(BACKUP_TIMESTAMP_FORMAT).to_string();
        let mut stem = format!("config_{}", timestamp);
        if let Some(label) = sanitize_note(note) {
            stem.push('_');
            stem.push_str(&label);
        }
        let mut name = format!("{}.{}", stem, BACKUP_EXTENSION);
        let mut attempt = 1;
        while self.backups_dir.join(&name).exists() {
            name = format!("{}-{}.{}", stem, attempt, BACKUP_EXTENSION);
            attempt += 1;
        }
        let json = serde_json::to_string_pretty(config)?;
        write_atomic(&self.backups_dir.join(&name), &json)?;
        Ok(name)
    }

    pub fn restore(&self, backup_name: &str) -> Result<Config> {
        let path = self.backups_dir.join(backup_name);
        if !path.exists() {
            return Err(FinanceError::ConfigError(format!(
                "configuration backup `{}` not found",
                backup_name
            )));
        }
        let data = fs::read_to_string(&path)?;
        let config: Config = serde_json::from_str(&data)?;
        self.save(&config)?;
        Ok(config)
    }

    /// Newest first.
    pub fn list_backups(&self) -> Result<Vec<String>> {
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
        // The fixed-width timestamp prefix sorts chronologically.
        entries.sort_by(|a, b| b.cmp(a));
        Ok(entries)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use tempfile::TempDir;

    fn manager() -> (ConfigManager, TempDir) {
        let temp = TempDir::new().expect("temp dir");
        let manager = ConfigManager::with_base_dir(temp.path().to_path_buf()).expect("manager");
        (manager, temp)
    }

    #[test]
    fn missing_file_yields_defaults() {
        let (manager, _guard) = manager();
        assert_eq!(manager.load().unwrap(), Config::default());
    }

    #[test]
    fn save_then_load_keeps_tax_policy() {
        let (manager, _guard) = manager();
        let mut config = Config::default();
        config.currency = "eur".into();
        config.tax.income_tax_rate = Decimal::new(30, 2);
        manager.save(&config).unwrap();

        let loaded = manager.load().unwrap();
        assert_eq!(loaded.tax.income_tax_rate, Decimal::new(30, 2));
        assert_eq!(loaded.currency_code().as_str(), "EUR");
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let (manager, _guard) = manager();
        fs::write(manager.path(), r#"{"locale":"en-GB","currency":"GBP"}"#).unwrap();
        let loaded = manager.load().unwrap();
        assert_eq!(loaded.locale, "en-GB");
        assert_eq!(loaded.tax, TaxPolicy::default());
        assert_eq!(loaded.insights, InsightThresholds::default());
    }

    #[test]
    fn rejects_out_of_range_rates() {
        let (manager, _guard) = manager();
        let mut config = Config::default();
        config.tax.self_employment_rate = Decimal::new(15, 0);
        let err = manager.save(&config).unwrap_err();
        assert!(matches!(err, FinanceError::ConfigError(_)));
    }

    #[test]
    fn backup_and_restore() {
        let (manager, _guard) = manager();
        let mut config = Config::default();
        config.theme = Some("dark".into());
        let name = manager.backup(&config, Some("Before tweak")).unwrap();
        assert!(name.starts_with("config_"));
        assert!(name.ends_with("_before-tweak.json"));

        manager.save(&Config::default()).unwrap();
        let restored = manager.restore(&name).unwrap();
        assert_eq!(restored.theme.as_deref(), Some("dark"));
        assert_eq!(manager.load().unwrap().theme.as_deref(), Some("dark"));
        assert_eq!(manager.list_backups().unwrap(), vec![name]);
    }
}
