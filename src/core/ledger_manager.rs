use chrono::NaiveDate;
use std::path::Path;

use crate::core::errors::{FinanceError, Result};
use crate::domain::ledger::Ledger;
use crate::seed;
use crate::storage::{json_backend::ledger_warnings, StorageBackend};

/// Facade that coordinates the open ledger, persistence, and backups.
pub struct LedgerManager {
    current: Option<Ledger>,
    current_name: Option<String>,
    storage: Box<dyn StorageBackend>,
}

impl LedgerManager {
    pub fn new(storage: Box<dyn StorageBackend>) -> Self {
        Self {
            current: None,
            current_name: None,
            storage,
        }
    }

    pub fn storage(&self) -> &dyn StorageBackend {
        self.storage.as_ref()
    }

    pub fn current(&self) -> Option<&Ledger> {
        self.current.as_ref()
    }

    pub fn current_mut(&mut self) -> Option<&mut Ledger> {
        self.current.as_mut()
    }

    pub fn current_name(&self) -> Option<&str> {
        self.current_name.as_deref()
    }

    /// The open ledger, or `LedgerNotLoaded`.
    pub fn ledger(&self) -> Result<&Ledger> {
        self.current.as_ref().ok_or(FinanceError::LedgerNotLoaded)
    }

    pub fn ledger_mut(&mut self) -> Result<&mut Ledger> {
        self.current.as_mut().ok_or(FinanceError::LedgerNotLoaded)
    }

    /// Loads `name` and returns any integrity warnings found in it.
    pub fn load(&mut self, name: &str) -> Result<Vec<String>> {
        let ledger = self.storage.load(name)?;
        Ok(self.set_current(ledger, Some(name)))
    }

    pub fn load_from_path(&mut self, path: &Path) -> Result<Vec<String>> {
        let ledger = self.storage.load_from_path(path)?;
        Ok(self.set_current(ledger, None))
    }

    /// Opens `name` when it exists, otherwise seeds a demo ledger dated
    /// around `reference` and persists it under that name.
    pub fn open_or_seed(&mut self, name: &str, reference: NaiveDate) -> Result<Vec<String>> {
        if self.storage.exists(name)? {
            return self.load(name);
        }
        let ledger = seed::demo_ledger(name, reference);
        self.storage.save(&ledger, name)?;
        tracing::info!(ledger = name, "created demo ledger");
        Ok(self.set_current(ledger, Some(name)))
    }

    /// Replaces the open ledger without touching storage.
    pub fn replace(&mut self, ledger: Ledger, name: Option<&str>) -> Vec<String> {
        self.set_current(ledger, name)
    }

    fn set_current(&mut self, ledger: Ledger, name: Option<&str>) -> Vec<String> {
        let warnings = ledger_warnings(&ledger);
        for warning in &warnings {
            tracing::warn!(ledger = %ledger.name, "{}", warning);
        }
        self.current = Some(ledger);
        self.current_name = name.map(str::to_string);
        warnings
    }

    pub fn save(&mut self) -> Result<()> {
        let name = self
            .current_name
            .clone()
            .ok_or_else(|| FinanceError::StorageError("current ledger is unnamed".into()))?;
        self.save_as(&name)
    }

    pub fn save_as(&mut self, name: &str) -> Result<()> {
        let ledger = self
            .current
            .as_mut()
            .ok_or(FinanceError::LedgerNotLoaded)?;
        ledger.touch();
        self.storage.save(ledger, name)?;
        self.current_name = Some(name.to_string());
        Ok(())
    }

    pub fn save_to_path(&mut self, path: &Path) -> Result<()> {
        let ledger = self.ledger()?;
        self.storage.save_to_path(ledger, path)
    }

    pub fn backup(&self, note: Option<&str>) -> Result<String> {
        let ledger = self.ledger()?;
        let name = self
            .current_name
            .as_deref()
            .ok_or_else(|| FinanceError::StorageError("current ledger is unnamed".into()))?;
        self.storage.backup(ledger, name, note)
    }

    pub fn list_backups(&self, name: &str) -> Result<Vec<String>> {
        self.storage.list_backups(name)
    }

    /// Restores `backup_name` over `name` and makes it the open ledger.
    pub fn restore(&mut self, name: &str, backup_name: &str) -> Result<Vec<String>> {
        let ledger = self.storage.restore(name, backup_name)?;
        Ok(self.set_current(ledger, Some(name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::expense::Expense;
    use crate::storage::{JsonStorage, MemoryStorage};
    use rust_decimal::Decimal;
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };
    use tempfile::TempDir;
    use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
    use uuid::Uuid;

    fn reference() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    #[test]
    fn operations_require_a_loaded_ledger() {
        let mut manager = LedgerManager::new(Box::new(MemoryStorage::new()));
        assert!(matches!(manager.save(), Err(FinanceError::StorageError(_))));
        assert!(matches!(manager.ledger(), Err(FinanceError::LedgerNotLoaded)));
        assert!(manager.backup(None).is_err());
    }

    #[test]
    fn open_or_seed_creates_then_reopens() {
        let mut manager = LedgerManager::new(Box::new(MemoryStorage::new()));
        let warnings = manager.open_or_seed("demo", reference()).unwrap();
        assert!(warnings.is_empty());
        let seeded_id = manager.ledger().unwrap().id;
        assert!(manager.storage().exists("demo").unwrap());

        manager.open_or_seed("demo", reference()).unwrap();
        assert_eq!(manager.ledger().unwrap().id, seeded_id);
        assert_eq!(manager.current_name(), Some("demo"));
    }

    #[test]
    fn dangling_categories_are_reported_not_fatal() {
        let mut manager = LedgerManager::new(Box::new(MemoryStorage::new()));
        let mut ledger = Ledger::new("Loose", Uuid::new_v4());
        ledger.add_expense(
            Expense::new(ledger.user_id, Decimal::ONE, reference()).with_category(Uuid::new_v4()),
        );
        manager.storage().save(&ledger, "loose").unwrap();

        let warnings = manager.load("loose").unwrap();
        assert_eq!(warnings.len(), 1);
        assert_eq!(manager.ledger().unwrap().expenses.len(), 1);
    }

    #[derive(Clone, Default)]
    struct WarnCounter(Arc<AtomicUsize>);

    impl<S: tracing::Subscriber> Layer<S> for WarnCounter {
        fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
            if *event.metadata().level() == tracing::Level::WARN {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    #[test]
    fn integrity_warnings_are_logged_once_per_load() {
        let temp = TempDir::new().expect("temp dir");
        let storage = JsonStorage::new(Some(temp.path().to_path_buf()), None).expect("storage");
        let mut manager = LedgerManager::new(Box::new(storage));
        let mut ledger = Ledger::new("Loose", Uuid::new_v4());
        ledger.add_expense(
            Expense::new(ledger.user_id, Decimal::ONE, reference()).with_category(Uuid::new_v4()),
        );
        manager.storage().save(&ledger, "loose").unwrap();

        let counter = WarnCounter::default();
        let subscriber = tracing_subscriber::registry().with(counter.clone());
        let warnings = tracing::subscriber::with_default(subscriber, || manager.load("loose"))
            .expect("load ledger");
        assert_eq!(warnings.len(), 1);
        assert_eq!(counter.0.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn restore_swaps_the_open_ledger() {
        let mut manager = LedgerManager::new(Box::new(MemoryStorage::new()));
        manager.replace(Ledger::new("Books", Uuid::new_v4()), Some("books"));
        manager.save().unwrap();
        let snapshot = manager.backup(Some("empty")).unwrap();

        let user = manager.ledger().unwrap().user_id;
        manager
            .ledger_mut()
            .unwrap()
            .add_expense(Expense::new(user, Decimal::TEN, reference()));
        manager.save().unwrap();

        manager.restore("books", &snapshot).unwrap();
        assert!(manager.ledger().unwrap().expenses.is_empty());
        assert_eq!(manager.list_backups("books").unwrap(), vec![snapshot]);
    }
}
