use chrono::{DateTime, NaiveDateTime, Utc};
use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
};

use crate::{
    core::{
        errors::FinanceError,
        utils::{ensure_dir, sanitize_note, write_atomic, PathResolver},
    },
    domain::ledger::{Ledger, CURRENT_SCHEMA_VERSION},
};

use super::{canonical_name, Result, StorageBackend};

const LEDGER_EXTENSION: &str = "json";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S%3f";
const DEFAULT_RETENTION: usize = 5;

/// One pretty-printed JSON document per ledger, with rotating backups.
#[derive(Debug, Clone)]
pub struct JsonStorage {
    root: PathBuf,
    ledgers_dir: PathBuf,
    backups_dir: PathBuf,
    retention: usize,
}

impl JsonStorage {
    pub fn new(root: Option<PathBuf>, retention: Option<usize>) -> Result<Self> {
        let app_root = PathResolver::resolve_base(root);
        ensure_dir(&app_root)?;
        let ledgers_dir = PathResolver::ledger_dir_in(&app_root);
        let backups_dir = PathResolver::backup_dir_in(&app_root);
        ensure_dir(&ledgers_dir)?;
        ensure_dir(&backups_dir)?;
        Ok(Self {
            root: app_root,
            ledgers_dir,
            backups_dir,
            retention: retention.unwrap_or(DEFAULT_RETENTION).max(1),
        })
    }

    pub fn new_default() -> Result<Self> {
        Self::new(None, None)
    }

    pub fn base_dir(&self) -> &Path {
        &self.root
    }

    pub fn ledger_path(&self, name: &str) -> PathBuf {
        self.ledgers_dir
            .join(format!("{}.{}", canonical_name(name), LEDGER_EXTENSION))
    }

    fn backup_dir(&self, name: &str) -> PathBuf {
        self.backups_dir.join(canonical_name(name))
    }

    pub fn backup_path(&self, name: &str, backup_name: &str) -> PathBuf {
        self.backup_dir(name).join(backup_name)
    }

    /// Picks an unused file name in the backup directory.
    fn next_backup_path(&self, name: &str, note: Option<&str>) -> Result<(String, PathBuf)> {
        let dir = self.backup_dir(name);
        ensure_dir(&dir)?;
        let mut stem = Utc::now().format(BACKUP_TIMESTAMP_FORMAT).to_string();
        if let Some(label) = sanitize_note(note) {
            stem.push('_');
            stem.push_str(&label);
        }
        let mut file_name = format!("{}.{}", stem, LEDGER_EXTENSION);
        let mut attempt = 1;
        while dir.join(&file_name).exists() {
            file_name = format!("{}-{}.{}", stem, attempt, LEDGER_EXTENSION);
            attempt += 1;
        }
        let path = dir.join(&file_name);
        Ok((file_name, path))
    }

    fn backup_existing_file(&self, name: &str, path: &Path) -> Result<()> {
        if !path.exists() {
            return Ok(());
        }
        let (_, backup_path) = self.next_backup_path(name, None)?;
        fs::copy(path, &backup_path)?;
        self.prune_backups(name)
    }

    fn prune_backups(&self, name: &str) -> Result<()> {
        let backups = self.list_backups(name)?;
        for stale in backups.iter().skip(self.retention) {
            let path = self.backup_path(name, stale);
            if let Err(err) = fs::remove_file(&path) {
                tracing::warn!(path = %path.display(), %err, "failed to prune backup");
            }
        }
        Ok(())
    }
}

impl StorageBackend for JsonStorage {
    fn save(&self, ledger: &Ledger, name: &str) -> Result<()> {
        let path = self.ledger_path(name);
        self.backup_existing_file(name, &path)?;
        save_ledger_to_path(ledger, &path)?;
        tracing::info!(ledger = name, path = %path.display(), "saved ledger");
        Ok(())
    }

    fn load(&self, name: &str) -> Result<Ledger> {
        let path = self.ledger_path(name);
        if !path.exists() {
            return Err(FinanceError::StorageError(format!(
                "ledger `{}` not found",
                name
            )));
        }
        load_ledger_from_path(&path)
    }

    fn exists(&self, name: &str) -> Result<bool> {
        Ok(self.ledger_path(name).exists())
    }

    fn list_backups(&self, name: &str) -> Result<Vec<String>> {
        let dir = self.backup_dir(name);
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let mut entries = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(LEDGER_EXTENSION) {
                continue;
            }
            if let Some(file_name) = path.file_name().and_then(|stem| stem.to_str()) {
                entries.push(file_name.to_string());
            }
        }
        entries.sort_by(|a, b| {
            parse_backup_timestamp(b)
                .cmp(&parse_backup_timestamp(a))
                .then_with(|| b.cmp(a))
        });
        Ok(entries)
    }

    fn backup(&self, ledger: &Ledger, name: &str, note: Option<&str>) -> Result<String> {
        let (file_name, path) = self.next_backup_path(name, note)?;
        let json = serde_json::to_string_pretty(ledger)?;
        write_atomic(&path, &json)?;
        self.prune_backups(name)?;
        tracing::info!(ledger = name, backup = %file_name, "created backup");
        Ok(file_name)
    }

    fn restore(&self, name: &str, backup_name: &str) -> Result<Ledger> {
        let backup_path = self.backup_path(name, backup_name);
        if !backup_path.exists() {
            return Err(FinanceError::StorageError(format!(
                "backup `{}` not found",
                backup_name
            )));
        }
        let ledger = load_ledger_from_path(&backup_path)?;
        let target = self.ledger_path(name);
        fs::copy(&backup_path, &target)?;
        tracing::info!(ledger = name, backup = backup_name, "restored backup");
        Ok(ledger)
    }
}

pub fn save_ledger_to_path(ledger: &Ledger, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(ledger)?;
    write_atomic(path, &json)
}

pub fn load_ledger_from_path(path: &Path) -> Result<Ledger> {
    let data = fs::read_to_string(path)?;
    let ledger: Ledger = serde_json::from_str(&data)?;
    if ledger.schema_version > CURRENT_SCHEMA_VERSION {
        return Err(FinanceError::StorageError(format!(
            "`{}` was written by a newer schema version ({})",
            path.display(),
            ledger.schema_version
        )));
    }
    Ok(ledger)
}

/// Detects dangling references and stored totals that disagree with their
/// line items. None of these stop a load; `LedgerManager` reports them.
pub fn ledger_warnings(ledger: &Ledger) -> Vec<String> {
    let category_ids: HashSet<_> = ledger.categories.iter().map(|c| c.id).collect();
    let mut warnings = Vec::new();

    for expense in &ledger.expenses {
        if let Some(category) = expense.category_id {
            if !category_ids.contains(&category) {
                warnings.push(format!(
                    "expense {} references missing category {}",
                    expense.id, category
                ));
            }
        }
    }
    for invoice in &ledger.invoices {
        if !invoice.totals_consistent() {
            warnings.push(format!(
                "invoice {} totals do not match its line items",
                invoice.invoice_number
            ));
        }
    }
    warnings
}

fn parse_backup_timestamp(name: &str) -> Option<DateTime<Utc>> {
    let mut parts = name.split('_');
    let date_part = parts.next()?;
    let time_part = parts.next()?;
    let time_part = time_part
        .strip_suffix(&format!(".{}", LEDGER_EXTENSION))
        .unwrap_or(time_part);
    let time_digits: String = time_part.chars().take_while(|c| c.is_ascii_digit()).collect();
    if date_part.len() != 8 || time_digits.len() != 9 {
        return None;
    }
    let raw = format!("{}{}", date_part, &time_digits[..6]);
    NaiveDateTime::parse_from_str(&raw, "%Y%m%d%H%M%S")
        .ok()
        .map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::expense::Expense;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use tempfile::TempDir;
    use uuid::Uuid;

    fn storage_with_temp_dir() -> (JsonStorage, TempDir) {
        let temp = TempDir::new().expect("temp dir");
        let storage =
            JsonStorage::new(Some(temp.path().to_path_buf()), Some(3)).expect("json storage");
        (storage, temp)
    }

    fn sample_ledger() -> Ledger {
        Ledger::new("Sample", Uuid::new_v4())
    }

    #[test]
    fn save_and_load_roundtrip() {
        let (storage, _guard) = storage_with_temp_dir();
        let ledger = sample_ledger();
        storage.save(&ledger, "Studio Books").expect("save ledger");
        assert!(storage.exists("studio books").expect("exists"));
        let loaded = storage.load("Studio Books").expect("load ledger");
        assert_eq!(loaded.name, "Sample");
        assert_eq!(loaded.id, ledger.id);
    }

    #[test]
    fn backups_are_pruned_to_retention() {
        let (storage, _guard) = storage_with_temp_dir();
        let ledger = sample_ledger();
        for idx in 0..6 {
            storage
                .backup(&ledger, "family", Some(&format!("snapshot {}", idx)))
                .expect("create backup");
        }
        let backups = storage.list_backups("family").expect("list backups");
        assert_eq!(backups.len(), 3);
        assert!(backups.iter().all(|name| name.ends_with(".json")));
    }

    #[test]
    fn restore_replaces_current_ledger() {
        let (storage, _guard) = storage_with_temp_dir();
        let mut ledger = sample_ledger();
        storage.save(&ledger, "main").expect("save");
        let backup = storage.backup(&ledger, "main", Some("clean")).expect("backup");

        ledger.add_expense(Expense::new(
            ledger.user_id,
            Decimal::new(10, 0),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        ));
        storage.save(&ledger, "main").expect("save dirty");
        assert_eq!(storage.load("main").unwrap().expenses.len(), 1);

        let restored = storage.restore("main", &backup).expect("restore");
        assert!(restored.expenses.is_empty());
        assert!(storage.load("main").unwrap().expenses.is_empty());
    }

    #[test]
    fn missing_ledger_is_a_storage_error() {
        let (storage, _guard) = storage_with_temp_dir();
        let err = storage.load("ghost").expect_err("missing ledger");
        assert!(matches!(err, FinanceError::StorageError(_)));
    }

    #[test]
    fn warns_about_dangling_categories() {
        let mut ledger = sample_ledger();
        ledger.add_expense(
            Expense::new(
                ledger.user_id,
                Decimal::ONE,
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            )
            .with_category(Uuid::new_v4()),
        );
        let warnings = ledger_warnings(&ledger);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("missing category"));
    }

    #[test]
    fn parses_backup_timestamps() {
        let parsed = parse_backup_timestamp("20240615_093000123_before-close.json");
        assert_eq!(
            parsed.map(|ts| ts.format("%Y-%m-%d %H:%M:%S").to_string()),
            Some("2024-06-15 09:30:00".to_string())
        );
        assert!(parse_backup_timestamp("notes.json").is_none());
    }
}
