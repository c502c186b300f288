use std::sync::{Arc, Mutex};

use anyhow::Context;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::meals::repo_types::{LegacyMeal, Meal};
use crate::storage::KeyValueStore;

pub const MEALS_KEY: &str = "meal-planner.meals";
pub const LEGACY_MEALS_KEY: &str = "meals";

pub type Listener = Arc<dyn Fn() + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationOutcome {
    Migrated { count: usize },
    AlreadyCurrent,
    NoLegacyData,
}

/// Read access to one meals document, without any subscribers attached.
#[derive(Clone)]
pub struct MealDocument {
    kv: Arc<dyn KeyValueStore>,
    key: String,
}

impl MealDocument {
    pub fn new(kv: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            kv,
            key: key.into(),
        }
    }

    /// Absent or unreadable documents load as an empty list. Records that
    /// do not decode are skipped so the rest of the document survives the
    /// next write.
    pub fn load(&self) -> Vec<Meal> {
        let raw = match self.kv.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!(error = %e, key = %self.key, "failed to read meals document");
                return Vec::new();
            }
        };
        parse_records(&raw, &self.key).unwrap_or_default()
    }

    fn is_empty(&self) -> bool {
        match self.kv.get(&self.key) {
            Ok(Some(raw)) => serde_json::from_str::<Vec<serde_json::Value>>(&raw)
                .map(|v| v.is_empty())
                .unwrap_or(false),
            Ok(None) => true,
            Err(_) => false,
        }
    }

    fn write(&self, meals: &[Meal]) -> anyhow::Result<()> {
        let body = serde_json::to_string(meals).context("serialize meals")?;
        self.kv
            .set(&self.key, &body)
            .with_context(|| format!("write meals document {}", self.key))
    }
}

#[derive(Default)]
struct Listeners {
    next_id: u64,
    entries: Vec<(SubscriptionId, Listener)>,
}

/// The meals document plus its update subscribers.
///
/// Every successful `save` notifies each subscriber once, synchronously and
/// in subscription order, after the write has landed.
#[derive(Clone)]
pub struct MealStore {
    document: MealDocument,
    kv: Arc<dyn KeyValueStore>,
    legacy_key: String,
    listeners: Arc<Mutex<Listeners>>,
}

impl MealStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self::with_keys(kv, MEALS_KEY, LEGACY_MEALS_KEY)
    }

    pub fn with_keys(kv: Arc<dyn KeyValueStore>, key: &str, legacy_key: &str) -> Self {
        Self {
            document: MealDocument::new(kv.clone(), key),
            kv,
            legacy_key: legacy_key.to_string(),
            listeners: Arc::new(Mutex::new(Listeners::default())),
        }
    }

    pub fn document(&self) -> MealDocument {
        self.document.clone()
    }

    pub fn load(&self) -> Vec<Meal> {
        self.document.load()
    }

    pub fn save(&self, meals: &[Meal]) -> anyhow::Result<()> {
        self.document.write(meals)?;
        debug!(count = meals.len(), "meals saved");
        self.notify();
        Ok(())
    }

    pub fn subscribe(&self, listener: Listener) -> SubscriptionId {
        let mut guard = self.listeners.lock().unwrap_or_else(|p| p.into_inner());
        guard.next_id += 1;
        let id = SubscriptionId(guard.next_id);
        guard.entries.push((id, listener));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut guard = self.listeners.lock().unwrap_or_else(|p| p.into_inner());
        let before = guard.entries.len();
        guard.entries.retain(|(sid, _)| *sid != id);
        guard.entries.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.listeners
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .entries
            .len()
    }

    fn notify(&self) {
        // Snapshot first so listeners can (un)subscribe while being called.
        let snapshot: Vec<Listener> = self
            .listeners
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .entries
            .iter()
            .map(|(_, l)| l.clone())
            .collect();
        for listener in snapshot {
            listener();
        }
    }

    /// Copies the legacy document into the canonical key when the canonical
    /// document is absent or empty. The legacy key is left untouched.
    pub fn migrate_legacy(&self) -> anyhow::Result<MigrationOutcome> {
        if !self.document.is_empty() {
            return Ok(MigrationOutcome::AlreadyCurrent);
        }

        let raw = match self.kv.get(&self.legacy_key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Ok(MigrationOutcome::NoLegacyData),
            Err(e) => {
                warn!(error = %e, key = %self.legacy_key, "failed to read legacy meals document");
                return Ok(MigrationOutcome::NoLegacyData);
            }
        };
        let Some(legacy) = parse_records::<LegacyMeal>(&raw, &self.legacy_key) else {
            return Ok(MigrationOutcome::NoLegacyData);
        };
        if legacy.is_empty() {
            return Ok(MigrationOutcome::NoLegacyData);
        }

        let meals: Vec<Meal> = legacy.into_iter().map(Meal::from).collect();
        let count = meals.len();
        self.save(&meals).context("write migrated meals")?;
        info!(count, from = %self.legacy_key, "migrated legacy meals");
        Ok(MigrationOutcome::Migrated { count })
    }
}

/// Decodes a JSON array one record at a time. `None` when the document is
/// not an array at all.
fn parse_records<T: DeserializeOwned>(raw: &str, key: &str) -> Option<Vec<T>> {
    let values = match serde_json::from_str::<Vec<Value>>(raw) {
        Ok(values) => values,
        Err(e) => {
            warn!(error = %e, key, "meals document is not a JSON array, ignoring it");
            return None;
        }
    };
    let records = values
        .into_iter()
        .filter_map(|value| {
            let id = value
                .get("id")
                .and_then(Value::as_str)
                .unwrap_or("<missing>")
                .to_owned();
            match serde_json::from_value(value) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!(error = %e, key, id = %id, "skipping unreadable meal record");
                    None
                }
            }
        })
        .collect();
    Some(records)
}
