use std::{collections::HashMap, sync::Mutex};

use crate::{
    core::errors::{FinanceError, Result},
    domain::ledger::Ledger,
};

use super::{canonical_name, StorageBackend};

#[derive(Debug, Default)]
struct Entries {
    ledgers: HashMap<String, String>,
    backups: HashMap<String, Vec<(String, String)>>,
}

/// Keeps serialized ledgers in process memory. Used by tests and by callers
/// that never want to touch the filesystem.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<Entries>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_entries<T>(&self, f: impl FnOnce(&mut Entries) -> Result<T>) -> Result<T> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|_| FinanceError::StorageError("memory storage lock poisoned".into()))?;
        f(&mut guard)
    }
}

impl StorageBackend for MemoryStorage {
    fn save(&self, ledger: &Ledger, name: &str) -> Result<()> {
        let json = serde_json::to_string(ledger)?;
        self.with_entries(|entries| {
            entries.ledgers.insert(canonical_name(name), json);
            Ok(())
        })
    }

    fn load(&self, name: &str) -> Result<Ledger> {
        let json = self.with_entries(|entries| {
            entries
                .ledgers
                .get(&canonical_name(name))
                .cloned()
                .ok_or_else(|| FinanceError::StorageError(format!("ledger `{}` not found", name)))
        })?;
        Ok(serde_json::from_str(&json)?)
    }

    fn exists(&self, name: &str) -> Result<bool> {
        self.with_entries(|entries| Ok(entries.ledgers.contains_key(&canonical_name(name))))
    }

    fn list_backups(&self, name: &str) -> Result<Vec<String>> {
        self.with_entries(|entries| {
            Ok(entries
                .backups
                .get(&canonical_name(name))
                .map(|list| list.iter().rev().map(|(label, _)| label.clone()).collect())
                .unwrap_or_default())
        })
    }

    fn backup(&self, ledger: &Ledger, name: &str, note: Option<&str>) -> Result<String> {
        let json = serde_json::to_string(ledger)?;
        self.with_entries(|entries| {
            let list = entries.backups.entry(canonical_name(name)).or_default();
            let mut label = format!("backup-{:03}", list.len() + 1);
            if let Some(note) = crate::core::utils::sanitize_note(note) {
                label.push('_');
                label.push_str(&note);
            }
            list.push((label.clone(), json));
            Ok(label)
        })
    }

    fn restore(&self, name: &str, backup_name: &str) -> Result<Ledger> {
        let key = canonical_name(name);
        let json = self.with_entries(|entries| {
            let json = entries
                .backups
                .get(&key)
                .and_then(|list| list.iter().find(|(label, _)| label == backup_name))
                .map(|(_, json)| json.clone())
                .ok_or_else(|| {
                    FinanceError::StorageError(format!("backup `{}` not found", backup_name))
                })?;
            entries.ledgers.insert(key.clone(), json.clone());
            Ok(json)
        })?;
        Ok(serde_json::from_str(&json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn stores_and_restores_snapshots() {
        let storage = MemoryStorage::new();
        let mut ledger = Ledger::new("Memo", Uuid::new_v4());
        storage.save(&ledger, "Memo").unwrap();
        let first = storage.backup(&ledger, "memo", Some("before rename")).unwrap();
        assert_eq!(first, "backup-001_before-rename");

        ledger.name = "Renamed".into();
        storage.save(&ledger, "memo").unwrap();
        storage.backup(&ledger, "memo", None).unwrap();
        assert_eq!(
            storage.list_backups("memo").unwrap(),
            vec!["backup-002".to_string(), first.clone()]
        );

        let restored = storage.restore("memo", &first).unwrap();
        assert_eq!(restored.name, "Memo");
        assert_eq!(storage.load("MEMO").unwrap().name, "Memo");
    }

    #[test]
    fn unknown_names_fail() {
        let storage = MemoryStorage::new();
        assert!(!storage.exists("nothing").unwrap());
        assert!(storage.load("nothing").is_err());
        assert!(storage.restore("nothing", "backup-001").is_err());
    }
}
