use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::days::Day;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snacks,
}

impl MealType {
    pub const ALL: [MealType; 4] = [
        MealType::Breakfast,
        MealType::Lunch,
        MealType::Dinner,
        MealType::Snacks,
    ];
}

/// Meal record as stored in the meals document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meal {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub day: Day,
    pub meal_type: MealType,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub is_picked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picked_by_user_id: Option<Uuid>,
    #[serde(
        default,
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub picked_at: Option<OffsetDateTime>,
    #[serde(default)]
    pub upvotes: u32,
    #[serde(default)]
    pub downvotes: u32,
    #[serde(default)]
    pub submitted_by: String,
    #[serde(with = "time::serde::rfc3339")]
    pub date_added: OffsetDateTime,
}

impl Meal {
    pub fn net_votes(&self) -> i64 {
        i64::from(self.upvotes) - i64::from(self.downvotes)
    }
}

/// Older document shape kept under the legacy key: `isLocked` instead of
/// `isPicked`, and fields that may be missing or null.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyMeal {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub image: Option<String>,
    pub day: Day,
    pub meal_type: MealType,
    #[serde(default)]
    pub ingredients: Option<Vec<String>>,
    #[serde(default)]
    pub is_locked: Option<bool>,
    #[serde(default)]
    pub is_picked: Option<bool>,
    #[serde(default)]
    pub picked_by_user_id: Option<Uuid>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub picked_at: Option<OffsetDateTime>,
    #[serde(default)]
    pub upvotes: u32,
    #[serde(default)]
    pub downvotes: u32,
    #[serde(default)]
    pub submitted_by: Option<String>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub date_added: Option<OffsetDateTime>,
}

impl From<LegacyMeal> for Meal {
    fn from(l: LegacyMeal) -> Self {
        Self {
            id: l.id,
            title: l.title,
            image: l.image,
            day: l.day,
            meal_type: l.meal_type,
            ingredients: l.ingredients.unwrap_or_default(),
            is_picked: l.is_locked.or(l.is_picked).unwrap_or(false),
            picked_by_user_id: l.picked_by_user_id,
            picked_at: l.picked_at,
            upvotes: l.upvotes,
            downvotes: l.downvotes,
            submitted_by: l.submitted_by.unwrap_or_default(),
            date_added: l.date_added.unwrap_or(OffsetDateTime::UNIX_EPOCH),
        }
    }
}
