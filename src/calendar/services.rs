use std::sync::{Arc, RwLock};

use time::{Date, Duration};
use tracing::debug;

use crate::days::day_to_string;
use crate::meals::repo::{MealStore, SubscriptionId};
use crate::meals::repo_types::{Meal, MealType};
use crate::meals::services::slot_winner;

/// Seven consecutive days starting at `week_start`.
pub fn get_week_days(week_start: Date) -> [Date; 7] {
    let mut days = [week_start; 7];
    for (i, day) in days.iter_mut().enumerate() {
        *day = week_start.saturating_add(Duration::days(i as i64));
    }
    days
}

/// Picked meals for one meal type on one date.
#[derive(Debug, Clone)]
pub struct SlotPlan {
    pub meal_type: MealType,
    /// The one meal to show when several are picked.
    pub featured: Option<Meal>,
    pub meals: Vec<Meal>,
}

impl SlotPlan {
    fn new(meal_type: MealType, meals: Vec<Meal>) -> Self {
        Self {
            meal_type,
            featured: slot_winner(&meals).cloned(),
            meals,
        }
    }
}

/// One date with a slot per meal type, in `MealType::ALL` order.
#[derive(Debug, Clone)]
pub struct DayPlan {
    pub date: Date,
    pub slots: Vec<SlotPlan>,
}

impl DayPlan {
    fn new(date: Date, meals: Vec<Meal>) -> Self {
        let slots = MealType::ALL
            .into_iter()
            .map(|meal_type| {
                let in_slot = meals
                    .iter()
                    .filter(|m| m.meal_type == meal_type)
                    .cloned()
                    .collect();
                SlotPlan::new(meal_type, in_slot)
            })
            .collect();
        Self { date, slots }
    }

    pub fn slot(&self, meal_type: MealType) -> Option<&SlotPlan> {
        self.slots.iter().find(|s| s.meal_type == meal_type)
    }

    pub fn meal_count(&self) -> usize {
        self.slots.iter().map(|s| s.meals.len()).sum()
    }
}

/// Picked meals as the calendar sees them.
///
/// Keeps its own copy of the picked subset and refreshes it every time the
/// meal store reports a write. Unsubscribes when dropped.
pub struct CalendarModel {
    store: MealStore,
    picked: Arc<RwLock<Vec<Meal>>>,
    subscription: SubscriptionId,
}

impl CalendarModel {
    pub fn new(store: &MealStore) -> Self {
        let document = store.document();
        let picked = Arc::new(RwLock::new(picked_only(document.load())));

        let target = picked.clone();
        let subscription = store.subscribe(Arc::new(move || {
            let fresh = picked_only(document.load());
            debug!(picked = fresh.len(), "calendar refreshed");
            *target.write().unwrap_or_else(|p| p.into_inner()) = fresh;
        }));

        Self {
            store: store.clone(),
            picked,
            subscription,
        }
    }

    pub fn get_meals_for_day(&self, date: Date) -> Vec<Meal> {
        let day = day_to_string(date);
        self.picked
            .read()
            .unwrap_or_else(|p| p.into_inner())
            .iter()
            .filter(|m| m.is_picked && m.day == day)
            .cloned()
            .collect()
    }

    pub fn get_meals_by_type(&self, date: Date, meal_type: MealType) -> Vec<Meal> {
        self.get_meals_for_day(date)
            .into_iter()
            .filter(|m| m.meal_type == meal_type)
            .collect()
    }

    /// The single meal to show for a slot when several are picked.
    pub fn featured_meal(&self, date: Date, meal_type: MealType) -> Option<Meal> {
        SlotPlan::new(meal_type, self.get_meals_by_type(date, meal_type)).featured
    }

    pub fn day_plan(&self, date: Date) -> DayPlan {
        DayPlan::new(date, self.get_meals_for_day(date))
    }

    pub fn week_plan(&self, week_start: Date) -> Vec<DayPlan> {
        get_week_days(week_start)
            .into_iter()
            .map(|date| self.day_plan(date))
            .collect()
    }
}

impl Drop for CalendarModel {
    fn drop(&mut self) {
        self.store.unsubscribe(self.subscription);
    }
}

fn picked_only(meals: Vec<Meal>) -> Vec<Meal> {
    meals.into_iter().filter(|m| m.is_picked).collect()
}
