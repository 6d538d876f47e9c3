//! Transaction store
//!
//! Keeps the transaction list (newest first) and the application settings,
//! writing both through to an injected [`Storage`] on every change.
//!
//! Two storage backends are provided:
//! - [`JsonFileStorage`]: `transactions.json` and `settings.json` in a data
//!   directory, replaced atomically on save
//! - [`MemoryStorage`]: in-process, for tests

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Local};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::models::{AppSettings, Language, NewTransaction, Transaction, TransactionUpdate};

const TRANSACTIONS_FILE: &str = "transactions.json";
const SETTINGS_FILE: &str = "settings.json";

/// Persistence for the two application blobs
pub trait Storage: Send + Sync {
    /// Stored transactions; empty when nothing was saved yet
    fn load_transactions(&self) -> Result<Vec<Transaction>>;

    fn save_transactions(&self, transactions: &[Transaction]) -> Result<()>;

    /// Stored settings; defaults when nothing was saved yet
    fn load_settings(&self) -> Result<AppSettings>;

    fn save_settings(&self, settings: &AppSettings) -> Result<()>;
}

/// JSON blobs in a directory
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    dir: PathBuf,
}

impl JsonFileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Storage in the platform data directory (~/.local/share/fincasal)
    pub fn default_location() -> Result<Self> {
        default_data_dir()
            .map(Self::new)
            .ok_or_else(|| Error::Config("Could not determine a data directory".into()))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Read a blob, treating a missing or unreadable one as absent
    fn read_blob<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>> {
        let path = self.dir.join(name);
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&path)?;
        match serde_json::from_str(&content) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Ignoring corrupt data file");
                Ok(None)
            }
        }
    }

    /// Replace a blob atomically
    fn write_blob<T: Serialize + ?Sized>(&self, name: &str, value: &T) -> Result<()> {
        fs::create_dir_all(&self.dir)?;

        let mut file = NamedTempFile::new_in(&self.dir)?;
        serde_json::to_writer_pretty(&mut file, value)?;
        file.flush()?;

        let path = self.dir.join(name);
        file.persist(&path).map_err(|e| Error::Io(e.error))?;
        debug!(path = %path.display(), "Saved data file");
        Ok(())
    }
}

impl Storage for JsonFileStorage {
    fn load_transactions(&self) -> Result<Vec<Transaction>> {
        Ok(self.read_blob(TRANSACTIONS_FILE)?.unwrap_or_default())
    }

    fn save_transactions(&self, transactions: &[Transaction]) -> Result<()> {
        self.write_blob(TRANSACTIONS_FILE, transactions)
    }

    fn load_settings(&self) -> Result<AppSettings> {
        Ok(self.read_blob(SETTINGS_FILE)?.unwrap_or_default())
    }

    fn save_settings(&self, settings: &AppSettings) -> Result<()> {
        self.write_blob(SETTINGS_FILE, settings)
    }
}

/// Default data directory
pub fn default_data_dir() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("fincasal"))
}

/// In-memory storage for tests
#[derive(Debug, Default)]
pub struct MemoryStorage {
    transactions: Mutex<Vec<Transaction>>,
    settings: Mutex<AppSettings>,
    saves: Mutex<usize>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_transactions(transactions: Vec<Transaction>) -> Self {
        Self {
            transactions: Mutex::new(transactions),
            ..Self::default()
        }
    }

    /// Transactions as last saved
    pub fn saved_transactions(&self) -> Vec<Transaction> {
        lock(&self.transactions).clone()
    }

    pub fn saved_settings(&self) -> AppSettings {
        lock(&self.settings).clone()
    }

    /// Number of save calls of either blob
    pub fn save_count(&self) -> usize {
        *lock(&self.saves)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

impl Storage for MemoryStorage {
    fn load_transactions(&self) -> Result<Vec<Transaction>> {
        Ok(lock(&self.transactions).clone())
    }

    fn save_transactions(&self, transactions: &[Transaction]) -> Result<()> {
        *lock(&self.transactions) = transactions.to_vec();
        *lock(&self.saves) += 1;
        Ok(())
    }

    fn load_settings(&self) -> Result<AppSettings> {
        Ok(lock(&self.settings).clone())
    }

    fn save_settings(&self, settings: &AppSettings) -> Result<()> {
        *lock(&self.settings) = settings.clone();
        *lock(&self.saves) += 1;
        Ok(())
    }
}

/// Owner of the transaction list and settings
///
/// Mutations are saved before they become visible, so a failed save
/// leaves the in-memory state untouched.
#[derive(Debug)]
pub struct TransactionStore<S: Storage> {
    storage: S,
    transactions: Vec<Transaction>,
    settings: AppSettings,
}

impl<S: Storage> TransactionStore<S> {
    /// Load both blobs from storage
    pub fn load(storage: S) -> Result<Self> {
        let transactions = storage.load_transactions()?;
        let settings = storage.load_settings()?;
        debug!(count = transactions.len(), "Loaded transactions");
        Ok(Self {
            storage,
            transactions,
            settings,
        })
    }

    /// Current transactions, newest first
    pub fn snapshot(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn get(&self, id: &str) -> Option<&Transaction> {
        self.transactions.iter().find(|tx| tx.id == id)
    }

    pub fn settings(&self) -> &AppSettings {
        &self.settings
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Record a new transaction dated today in the given language's format
    pub fn add(&mut self, new: NewTransaction, language: Language) -> Result<&Transaction> {
        self.add_at(new, language, Local::now())
    }

    fn add_at(
        &mut self,
        new: NewTransaction,
        language: Language,
        now: DateTime<Local>,
    ) -> Result<&Transaction> {
        let tx = Transaction {
            id: self.next_id(now.timestamp_millis()),
            category: new.category,
            description: new.description,
            amount: new.amount,
            transaction_type: new.transaction_type,
            date: language.format_date(now.date_naive()),
        };

        let mut next = Vec::with_capacity(self.transactions.len() + 1);
        next.push(tx);
        next.extend(self.transactions.iter().cloned());
        self.commit(next)?;

        debug!(id = %self.transactions[0].id, "Added transaction");
        Ok(&self.transactions[0])
    }

    /// Edit a transaction in place; its id and date are kept
    pub fn update(&mut self, id: &str, update: TransactionUpdate) -> Result<&Transaction> {
        let index = self.position(id)?;
        if update.is_empty() {
            return Ok(&self.transactions[index]);
        }

        let mut next = self.transactions.clone();
        update.apply(&mut next[index])?;
        self.commit(next)?;

        debug!(id = %id, "Updated transaction");
        Ok(&self.transactions[index])
    }

    pub fn delete(&mut self, id: &str) -> Result<Transaction> {
        let index = self.position(id)?;

        let mut next = self.transactions.clone();
        let removed = next.remove(index);
        self.commit(next)?;

        debug!(id = %id, "Deleted transaction");
        Ok(removed)
    }

    pub fn update_settings(&mut self, settings: AppSettings) -> Result<()> {
        self.storage.save_settings(&settings)?;
        self.settings = settings;
        Ok(())
    }

    fn commit(&mut self, next: Vec<Transaction>) -> Result<()> {
        self.storage.save_transactions(&next)?;
        self.transactions = next;
        Ok(())
    }

    fn position(&self, id: &str) -> Result<usize> {
        self.transactions
            .iter()
            .position(|tx| tx.id == id)
            .ok_or_else(|| Error::NotFound(format!("Transaction {}", id)))
    }

    /// `tx-<millis>`, bumped until unused
    fn next_id(&self, mut millis: i64) -> String {
        loop {
            let id = format!("tx-{}", millis);
            if self.get(&id).is_none() {
                return id;
            }
            millis += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, FontSize, Theme, TransactionType};
    use chrono::TimeZone;
    use rust_decimal_macros::dec;
    use tempfile::TempDir;

    fn groceries() -> NewTransaction {
        NewTransaction::parse("Mercado", "80,50", Some(Category::Food), TransactionType::Expense)
            .unwrap()
    }

    fn salary() -> NewTransaction {
        NewTransaction::parse("Salário", "3000", Some(Category::Income), TransactionType::Income)
            .unwrap()
    }

    fn fixed_now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 3, 7, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_add_prepends_and_writes_through() {
        let mut store = TransactionStore::load(MemoryStorage::new()).unwrap();

        store.add(salary(), Language::Pt).unwrap();
        let id = store.add(groceries(), Language::Pt).unwrap().id.clone();

        assert_eq!(store.snapshot().len(), 2);
        assert_eq!(store.snapshot()[0].id, id);
        assert_eq!(store.snapshot()[0].amount, dec!(80.50));
        assert_eq!(store.storage().saved_transactions(), store.snapshot());
        assert_eq!(store.storage().save_count(), 2);
    }

    #[test]
    fn test_ids_are_unique_within_the_same_millisecond() {
        let mut store = TransactionStore::load(MemoryStorage::new()).unwrap();
        let now = fixed_now();

        let first = store.add_at(groceries(), Language::Pt, now).unwrap().id.clone();
        let second = store.add_at(groceries(), Language::Pt, now).unwrap().id.clone();

        assert_eq!(first, format!("tx-{}", now.timestamp_millis()));
        assert_eq!(second, format!("tx-{}", now.timestamp_millis() + 1));
    }

    #[test]
    fn test_date_follows_language() {
        let mut store = TransactionStore::load(MemoryStorage::new()).unwrap();
        let now = fixed_now();

        assert_eq!(store.add_at(groceries(), Language::Pt, now).unwrap().date, "07/03/2025");
        assert_eq!(store.add_at(groceries(), Language::En, now).unwrap().date, "3/7/2025");
        assert_eq!(store.add_at(groceries(), Language::Es, now).unwrap().date, "7/3/2025");
    }

    #[test]
    fn test_update_preserves_id_and_date() {
        let mut store = TransactionStore::load(MemoryStorage::new()).unwrap();
        let original = store.add_at(groceries(), Language::Pt, fixed_now()).unwrap().clone();

        let updated = store
            .update(
                &original.id,
                TransactionUpdate {
                    amount: Some(dec!(95)),
                    category: Some(Category::Leisure),
                    ..Default::default()
                },
            )
            .unwrap()
            .clone();

        assert_eq!(updated.id, original.id);
        assert_eq!(updated.date, original.date);
        assert_eq!(updated.description, "Mercado");
        assert_eq!(updated.amount, dec!(95));
        assert_eq!(updated.category, Category::Leisure);
        assert_eq!(store.storage().saved_transactions()[0], updated);
    }

    #[test]
    fn test_invalid_update_changes_nothing() {
        let mut store = TransactionStore::load(MemoryStorage::new()).unwrap();
        let original = store.add(groceries(), Language::Pt).unwrap().clone();
        let saves = store.storage().save_count();

        let err = store
            .update(
                &original.id,
                TransactionUpdate {
                    amount: Some(dec!(-1)),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, Error::InvalidData(_)));
        assert_eq!(store.get(&original.id), Some(&original));
        assert_eq!(store.storage().save_count(), saves);
    }

    #[test]
    fn test_delete_and_not_found() {
        let mut store = TransactionStore::load(MemoryStorage::new()).unwrap();
        let id = store.add(groceries(), Language::Pt).unwrap().id.clone();

        let removed = store.delete(&id).unwrap();
        assert_eq!(removed.id, id);
        assert!(store.snapshot().is_empty());
        assert!(store.storage().saved_transactions().is_empty());

        assert!(matches!(store.delete(&id), Err(Error::NotFound(_))));
        assert!(matches!(
            store.update("tx-0", TransactionUpdate::default()),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_update_settings_writes_through() {
        let mut store = TransactionStore::load(MemoryStorage::new()).unwrap();
        let settings = AppSettings {
            language: Language::Es,
            theme: Theme::Forest,
            font_size: FontSize::Large,
            ..Default::default()
        };

        store.update_settings(settings.clone()).unwrap();
        assert_eq!(store.settings(), &settings);
        assert_eq!(store.storage().saved_settings(), settings);
    }

    #[test]
    fn test_json_storage_roundtrip() {
        let dir = TempDir::new().unwrap();
        let storage = JsonFileStorage::new(dir.path().join("data"));

        let mut store = TransactionStore::load(storage.clone()).unwrap();
        assert!(store.snapshot().is_empty());
        assert_eq!(store.settings(), &AppSettings::default());

        store.add(salary(), Language::Pt).unwrap();
        store.add(groceries(), Language::Pt).unwrap();
        store
            .update_settings(AppSettings {
                light_mode: true,
                ..Default::default()
            })
            .unwrap();

        let reloaded = TransactionStore::load(storage).unwrap();
        assert_eq!(reloaded.snapshot(), store.snapshot());
        assert!(reloaded.settings().light_mode);
    }

    #[test]
    fn test_json_storage_reads_legacy_blob() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(TRANSACTIONS_FILE),
            r#"[{"id":"tx-1","category":"FOOD","description":"Feira","amount":45.9,"type":"Saída","date":"01/02/2025"}]"#,
        )
        .unwrap();

        let store = TransactionStore::load(JsonFileStorage::new(dir.path())).unwrap();
        let tx = store.get("tx-1").unwrap();
        assert_eq!(tx.transaction_type, TransactionType::Expense);
        assert_eq!(tx.amount, dec!(45.9));
    }

    #[test]
    fn test_json_storage_corrupt_blob_is_treated_as_missing() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(TRANSACTIONS_FILE), "{not json").unwrap();
        fs::write(dir.path().join(SETTINGS_FILE), "[]").unwrap();

        let store = TransactionStore::load(JsonFileStorage::new(dir.path())).unwrap();
        assert!(store.snapshot().is_empty());
        assert_eq!(store.settings(), &AppSettings::default());
    }
}
