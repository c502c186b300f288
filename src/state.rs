use std::sync::{Arc, Mutex, MutexGuard};

use crate::calendar::CalendarModel;
use crate::clock::{Clock, FixedClock, SystemClock};
use crate::config::{AppConfig, StorageBackend};
use crate::error::{AppError, AppResult};
use crate::groceries::{GroceryList, GroceryStore};
use crate::meals::{MealCollection, MealStore, MigrationOutcome};
use crate::storage::{FileStore, KeyValueStore, MemoryStore};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub clock: Arc<dyn Clock>,
    pub meals: Arc<Mutex<MealCollection>>,
    pub calendar: Arc<CalendarModel>,
    pub groceries: Arc<Mutex<GroceryList>>,
}

impl AppState {
    pub fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        let kv: Arc<dyn KeyValueStore> = match config.storage_backend {
            StorageBackend::File => Arc::new(FileStore::new(config.data_dir.clone())),
            StorageBackend::Memory => Arc::new(MemoryStore::new()),
        };
        Ok(Self::from_parts(config, kv, Arc::new(SystemClock)))
    }

    pub fn from_parts(
        config: Arc<AppConfig>,
        kv: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let store = MealStore::new(kv.clone());
        let calendar = Arc::new(CalendarModel::new(&store));
        let meals = MealCollection::load(store, clock.clone());
        let groceries = GroceryList::load(GroceryStore::new(kv), clock.clone());
        Self {
            config,
            clock,
            meals: Arc::new(Mutex::new(meals)),
            calendar,
            groceries: Arc::new(Mutex::new(groceries)),
        }
    }

    /// One-time startup step; reloads the collection if anything moved.
    pub fn migrate_legacy(&self) -> anyhow::Result<MigrationOutcome> {
        let mut meals = self
            .meals
            .lock()
            .map_err(|_| anyhow::anyhow!("meals lock poisoned"))?;
        let outcome = meals.store().migrate_legacy()?;
        if matches!(outcome, MigrationOutcome::Migrated { .. }) {
            meals.reload();
        }
        Ok(outcome)
    }

    pub fn fake() -> Self {
        let config = Arc::new(AppConfig {
            host: "127.0.0.1".into(),
            port: 0,
            data_dir: "./data".into(),
            storage_backend: StorageBackend::Memory,
        });
        let clock = Arc::new(FixedClock(time::macros::datetime!(2026-10-18 09:00 UTC)));
        Self::from_parts(config, Arc::new(MemoryStore::new()), clock)
    }
}

pub(crate) fn lock<T>(m: &Mutex<T>) -> AppResult<MutexGuard<'_, T>> {
    m.lock()
        .map_err(|_| AppError::Storage(anyhow::anyhow!("state lock poisoned")))
}
