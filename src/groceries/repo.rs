use std::sync::Arc;

use anyhow::Context;
use tracing::warn;

use crate::groceries::repo_types::GroceryItem;
use crate::storage::KeyValueStore;

pub const GROCERIES_KEY: &str = "meal-planner.groceries";

/// The groceries document, independent of the meals document.
#[derive(Clone)]
pub struct GroceryStore {
    kv: Arc<dyn KeyValueStore>,
    key: String,
}

impl GroceryStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self {
            kv,
            key: GROCERIES_KEY.to_string(),
        }
    }

    pub fn load(&self) -> Vec<GroceryItem> {
        let raw = match self.kv.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!(error = %e, key = %self.key, "failed to read groceries document");
                return Vec::new();
            }
        };
        serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!(error = %e, key = %self.key, "groceries document is not valid JSON, using empty list");
            Vec::new()
        })
    }

    pub fn save(&self, items: &[GroceryItem]) -> anyhow::Result<()> {
        let body = serde_json::to_string(items).context("serialize groceries")?;
        self.kv
            .set(&self.key, &body)
            .with_context(|| format!("write groceries document {}", self.key))
    }
}
