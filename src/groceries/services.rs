use std::{collections::HashSet, sync::Arc};

use tracing::{error, info};

use crate::clock::Clock;
use crate::error::{AppError, AppResult};
use crate::groceries::repo::GroceryStore;
use crate::groceries::repo_types::GroceryItem;
use crate::ids::new_id;
use crate::meals::repo_types::Meal;

pub struct GroceryList {
    store: GroceryStore,
    clock: Arc<dyn Clock>,
    items: Vec<GroceryItem>,
}

impl GroceryList {
    pub fn load(store: GroceryStore, clock: Arc<dyn Clock>) -> Self {
        let items = store.load();
        Self {
            store,
            clock,
            items,
        }
    }

    pub fn items(&self) -> &[GroceryItem] {
        &self.items
    }

    /// Prepends one unchecked item per ingredient, labelled with the meal's
    /// current title. Returns the new batch.
    pub fn add_meal(&mut self, meal: &Meal) -> AppResult<Vec<GroceryItem>> {
        if meal.ingredients.is_empty() {
            return Ok(Vec::new());
        }
        let mut taken: HashSet<String> = self.items.iter().map(|i| i.id.clone()).collect();
        let batch: Vec<GroceryItem> = meal
            .ingredients
            .iter()
            .map(|name| GroceryItem {
                id: self.fresh_id(&mut taken),
                name: name.clone(),
                checked: false,
                recipe: meal.title.clone(),
            })
            .collect();

        let mut next = batch.clone();
        next.extend(self.items.iter().cloned());
        self.commit(next)?;
        info!(count = batch.len(), recipe = %meal.title, "ingredients added to grocery list");
        Ok(batch)
    }

    pub fn toggle(&mut self, id: &str) -> AppResult<GroceryItem> {
        let pos = self.position(id)?;
        let mut next = self.items.clone();
        next[pos].checked = !next[pos].checked;
        let item = next[pos].clone();
        self.commit(next)?;
        Ok(item)
    }

    pub fn remove(&mut self, id: &str) -> AppResult<GroceryItem> {
        let pos = self.position(id)?;
        let mut next = self.items.clone();
        let removed = next.remove(pos);
        self.commit(next)?;
        Ok(removed)
    }

    /// Removes every item whose id is listed; unknown ids are ignored.
    pub fn remove_many(&mut self, ids: &[String]) -> AppResult<usize> {
        let doomed: HashSet<&str> = ids.iter().map(String::as_str).collect();
        let next: Vec<GroceryItem> = self
            .items
            .iter()
            .filter(|i| !doomed.contains(i.id.as_str()))
            .cloned()
            .collect();
        let removed = self.items.len() - next.len();
        if removed > 0 {
            self.commit(next)?;
        }
        Ok(removed)
    }

    pub fn clear(&mut self) -> AppResult<usize> {
        let removed = self.items.len();
        self.commit(Vec::new())?;
        info!(removed, "grocery list cleared");
        Ok(removed)
    }

    fn fresh_id(&self, taken: &mut HashSet<String>) -> String {
        loop {
            let id = new_id(self.clock.as_ref());
            if taken.insert(id.clone()) {
                return id;
            }
        }
    }

    fn position(&self, id: &str) -> AppResult<usize> {
        self.items
            .iter()
            .position(|i| i.id == id)
            .ok_or_else(|| AppError::GroceryItemNotFound(id.to_string()))
    }

    fn commit(&mut self, next: Vec<GroceryItem>) -> AppResult<()> {
        if let Err(e) = self.store.save(&next) {
            error!(error = %e, "failed to persist grocery list, keeping previous state");
            return Err(AppError::Storage(e));
        }
        self.items = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::days::Day;
    use crate::groceries::repo::GROCERIES_KEY;
    use crate::meals::repo_types::MealType;
    use crate::storage::{KeyValueStore, MemoryStore};
    use time::macros::datetime;

    fn meal(title: &str, ingredients: &[&str]) -> Meal {
        Meal {
            id: "1792314000000-abcdefghi".into(),
            title: title.into(),
            image: None,
            day: Day::Tue,
            meal_type: MealType::Dinner,
            ingredients: ingredients.iter().map(|s| s.to_string()).collect(),
            is_picked: false,
            picked_by_user_id: None,
            picked_at: None,
            upvotes: 0,
            downvotes: 0,
            submitted_by: "sam".into(),
            date_added: datetime!(2026-10-18 09:00 UTC),
        }
    }

    fn list() -> GroceryList {
        let store = GroceryStore::new(Arc::new(MemoryStore::new()));
        let clock = Arc::new(FixedClock(datetime!(2026-10-18 09:00 UTC)));
        GroceryList::load(store, clock)
    }

    #[test]
    fn expands_ingredients_into_unchecked_items() {
        let mut groceries = list();
        let added = groceries
            .add_meal(&meal("Tacos", &["tortillas", "beef"]))
            .unwrap();
        assert_eq!(added.len(), 2);
        assert_eq!(added[0].name, "tortillas");
        assert_eq!(added[1].name, "beef");
        assert!(added.iter().all(|i| !i.checked && i.recipe == "Tacos"));
        assert_ne!(added[0].id, added[1].id);
        assert_eq!(groceries.store.load(), added);
    }

    #[test]
    fn new_batch_goes_first() {
        let mut groceries = list();
        groceries.add_meal(&meal("Tacos", &["beef"])).unwrap();
        groceries
            .add_meal(&meal("Salad", &["lettuce", "tomato"]))
            .unwrap();
        let names: Vec<_> = groceries.items().iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["lettuce", "tomato", "beef"]);
    }

    #[test]
    fn recipe_label_is_not_live() {
        let mut groceries = list();
        let mut m = meal("Tacos", &["beef"]);
        groceries.add_meal(&m).unwrap();
        m.title = "Fish tacos".into();
        assert_eq!(groceries.items()[0].recipe, "Tacos");
    }

    #[test]
    fn meal_without_ingredients_adds_nothing() {
        let mut groceries = list();
        assert!(groceries.add_meal(&meal("Toast", &[])).unwrap().is_empty());
        assert!(groceries.items().is_empty());
    }

    #[test]
    fn toggle_remove_and_clear_persist() {
        let mut groceries = list();
        let added = groceries
            .add_meal(&meal("Tacos", &["tortillas", "beef", "salsa"]))
            .unwrap();

        let toggled = groceries.toggle(&added[1].id).unwrap();
        assert!(toggled.checked);
        assert!(groceries.store.load()[1].checked);
        assert!(!groceries.toggle(&added[1].id).unwrap().checked);

        groceries.remove(&added[0].id).unwrap();
        assert_eq!(groceries.store.load().len(), 2);
        assert!(matches!(
            groceries.remove(&added[0].id),
            Err(AppError::GroceryItemNotFound(_))
        ));

        let removed = groceries
            .remove_many(&[added[1].id.clone(), "unknown".into()])
            .unwrap();
        assert_eq!(removed, 1);
        assert_eq!(groceries.store.load().len(), 1);

        assert_eq!(groceries.clear().unwrap(), 1);
        assert!(groceries.store.load().is_empty());
    }

    #[test]
    fn failed_write_keeps_in_memory_list() {
        struct ReadOnly(MemoryStore);
        impl KeyValueStore for ReadOnly {
            fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
                self.0.get(key)
            }
            fn set(&self, _key: &str, _value: &str) -> anyhow::Result<()> {
                anyhow::bail!("storage full")
            }
            fn remove(&self, key: &str) -> anyhow::Result<()> {
                self.0.remove(key)
            }
        }

        let inner = MemoryStore::new();
        let seeded = vec![GroceryItem {
            id: "1".into(),
            name: "beef".into(),
            checked: false,
            recipe: "Tacos".into(),
        }];
        inner
            .set(GROCERIES_KEY, &serde_json::to_string(&seeded).unwrap())
            .unwrap();
        let store = GroceryStore::new(Arc::new(ReadOnly(inner)));
        let clock = Arc::new(FixedClock(datetime!(2026-10-18 09:00 UTC)));
        let mut groceries = GroceryList::load(store, clock);
        assert_eq!(groceries.items(), seeded.as_slice());

        assert!(matches!(
            groceries.add_meal(&meal("Salad", &["lettuce"])),
            Err(AppError::Storage(_))
        ));
        assert!(matches!(groceries.toggle("1"), Err(AppError::Storage(_))));
        assert!(matches!(groceries.remove("1"), Err(AppError::Storage(_))));
        assert!(matches!(
            groceries.remove_many(&["1".into()]),
            Err(AppError::Storage(_))
        ));
        assert!(matches!(groceries.clear(), Err(AppError::Storage(_))));
        assert_eq!(groceries.items(), seeded.as_slice());
    }
}
