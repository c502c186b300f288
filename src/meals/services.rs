use std::{cmp::Ordering, sync::Arc};

use serde::Deserialize;
use tracing::{error, info};
use uuid::Uuid;

use crate::clock::Clock;
use crate::days::Day;
use crate::error::{AppError, AppResult};
use crate::ids::new_id;
use crate::meals::repo::MealStore;
use crate::meals::repo_types::{Meal, MealType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteDirection {
    Up,
    Down,
}

#[derive(Debug, Clone)]
pub struct NewMeal {
    pub title: String,
    pub image: Option<String>,
    pub day: Day,
    pub meal_type: MealType,
    pub ingredients: Vec<String>,
    pub submitted_by: String,
}

/// Editable fields; `None` leaves the field as it is.
#[derive(Debug, Clone, Default)]
pub struct MealUpdate {
    pub title: Option<String>,
    pub image: Option<Option<String>>,
    pub day: Option<Day>,
    pub meal_type: Option<MealType>,
    pub ingredients: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default)]
pub struct MealFilter {
    pub day: Option<Day>,
    pub meal_type: Option<MealType>,
    pub picked: Option<bool>,
    pub search: Option<String>,
}

impl MealFilter {
    pub fn matches(&self, meal: &Meal) -> bool {
        if self.day.is_some_and(|d| d != meal.day) {
            return false;
        }
        if self.meal_type.is_some_and(|t| t != meal.meal_type) {
            return false;
        }
        if self.picked.is_some_and(|p| p != meal.is_picked) {
            return false;
        }
        match self.search.as_deref().map(str::trim) {
            Some(q) if !q.is_empty() => meal.title.to_lowercase().contains(&q.to_lowercase()),
            _ => true,
        }
    }
}

/// In-memory meal list for the session, persisted through [`MealStore`]
/// after every mutation.
pub struct MealCollection {
    store: MealStore,
    clock: Arc<dyn Clock>,
    meals: Vec<Meal>,
}

impl MealCollection {
    pub fn load(store: MealStore, clock: Arc<dyn Clock>) -> Self {
        let meals = store.load();
        info!(count = meals.len(), "meal collection loaded");
        Self {
            store,
            clock,
            meals,
        }
    }

    pub fn reload(&mut self) {
        self.meals = self.store.load();
    }

    pub fn store(&self) -> &MealStore {
        &self.store
    }

    pub fn all(&self) -> &[Meal] {
        &self.meals
    }

    pub fn get(&self, id: &str) -> Option<&Meal> {
        self.meals.iter().find(|m| m.id == id)
    }

    pub fn create(&mut self, input: NewMeal) -> AppResult<Meal> {
        let title = clean_title(&input.title)?;
        let meal = Meal {
            id: new_id(self.clock.as_ref()),
            title,
            image: clean_image(input.image),
            day: input.day,
            meal_type: input.meal_type,
            ingredients: clean_ingredients(input.ingredients),
            is_picked: false,
            picked_by_user_id: None,
            picked_at: None,
            upvotes: 0,
            downvotes: 0,
            submitted_by: input.submitted_by.trim().to_string(),
            date_added: self.clock.now(),
        };
        let mut next = self.meals.clone();
        next.push(meal.clone());
        self.commit(next)?;
        info!(meal_id = %meal.id, title = %meal.title, "meal created");
        Ok(meal)
    }

    pub fn edit(&mut self, id: &str, update: MealUpdate) -> AppResult<Meal> {
        let title = update.title.as_deref().map(clean_title).transpose()?;
        self.mutate(id, |meal| {
            if let Some(title) = title {
                meal.title = title;
            }
            if let Some(image) = update.image {
                meal.image = clean_image(image);
            }
            if let Some(day) = update.day {
                meal.day = day;
            }
            if let Some(meal_type) = update.meal_type {
                meal.meal_type = meal_type;
            }
            if let Some(ingredients) = update.ingredients {
                meal.ingredients = clean_ingredients(ingredients);
            }
        })
    }

    pub fn delete(&mut self, id: &str) -> AppResult<Meal> {
        let pos = self.position(id)?;
        let mut next = self.meals.clone();
        let removed = next.remove(pos);
        self.commit(next)?;
        info!(meal_id = %id, "meal deleted");
        Ok(removed)
    }

    /// Repeated votes from the same person all count.
    pub fn vote(&mut self, id: &str, direction: VoteDirection) -> AppResult<Meal> {
        self.mutate(id, |meal| match direction {
            VoteDirection::Up => meal.upvotes = meal.upvotes.saturating_add(1),
            VoteDirection::Down => meal.downvotes = meal.downvotes.saturating_add(1),
        })
    }

    /// Flips the picked flag of one meal. Other meals in the same slot are
    /// left alone.
    pub fn toggle_pick(&mut self, id: &str, user_id: Uuid) -> AppResult<Meal> {
        let now = self.clock.now();
        let meal = self.mutate(id, |meal| {
            if meal.is_picked {
                meal.is_picked = false;
                meal.picked_by_user_id = None;
                meal.picked_at = None;
            } else {
                meal.is_picked = true;
                meal.picked_by_user_id = Some(user_id);
                meal.picked_at = Some(now);
            }
        })?;
        info!(meal_id = %id, picked = meal.is_picked, %user_id, "meal pick toggled");
        Ok(meal)
    }

    /// Ascending by id, which tracks insertion order.
    pub fn sort_by_date(&self) -> Vec<Meal> {
        let mut out = self.meals.clone();
        out.sort_by(|a, b| a.id.cmp(&b.id));
        out
    }

    /// Descending by net votes; ties keep their current relative order.
    pub fn sort_by_votes(&self) -> Vec<Meal> {
        let mut out = self.meals.clone();
        out.sort_by_key(|m| std::cmp::Reverse(m.net_votes()));
        out
    }

    pub fn filter(&self, filter: &MealFilter) -> Vec<Meal> {
        self.meals
            .iter()
            .filter(|m| filter.matches(m))
            .cloned()
            .collect()
    }

    fn position(&self, id: &str) -> AppResult<usize> {
        self.meals
            .iter()
            .position(|m| m.id == id)
            .ok_or_else(|| AppError::MealNotFound(id.to_string()))
    }

    fn mutate(&mut self, id: &str, f: impl FnOnce(&mut Meal)) -> AppResult<Meal> {
        let pos = self.position(id)?;
        let mut next = self.meals.clone();
        f(&mut next[pos]);
        let updated = next[pos].clone();
        self.commit(next)?;
        Ok(updated)
    }

    fn commit(&mut self, next: Vec<Meal>) -> AppResult<()> {
        if let Err(e) = self.store.save(&next) {
            error!(error = %e, "failed to persist meals, keeping previous state");
            return Err(AppError::Storage(e));
        }
        self.meals = next;
        Ok(())
    }
}

fn clean_title(raw: &str) -> AppResult<String> {
    let title = raw.trim();
    if title.is_empty() {
        return Err(AppError::Validation("Meal title is required".into()));
    }
    Ok(title.to_string())
}

fn clean_image(raw: Option<String>) -> Option<String> {
    raw.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

fn clean_ingredients(raw: Vec<String>) -> Vec<String> {
    raw.into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// The one meal shown when several are picked for the same slot: most
/// upvotes, then the smallest id.
pub fn slot_winner<'a, I>(candidates: I) -> Option<&'a Meal>
where
    I: IntoIterator<Item = &'a Meal>,
{
    candidates.into_iter().min_by(|a, b| match b.upvotes.cmp(&a.upvotes) {
        Ordering::Equal => a.id.cmp(&b.id),
        other => other,
    })
}

const PLACEHOLDER_COLORS: [&str; 8] = [
    "#F87171", "#FB923C", "#FBBF24", "#34D399", "#22D3EE", "#60A5FA", "#A78BFA", "#F472B6",
];

/// Stable background color for meals without an image.
pub fn placeholder_color(title: &str) -> &'static str {
    let mut hash: i32 = 0;
    for unit in title.encode_utf16() {
        hash = i32::from(unit)
            .wrapping_add(hash.wrapping_shl(5))
            .wrapping_sub(hash);
    }
    let idx = (hash.unsigned_abs() as usize) % PLACEHOLDER_COLORS.len();
    PLACEHOLDER_COLORS[idx]
}
