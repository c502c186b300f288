use serde::{Deserialize, Serialize};

use crate::days::Day;
use crate::meals::repo_types::{Meal, MealType};
use crate::meals::services::{placeholder_color, MealFilter, MealUpdate, NewMeal, VoteDirection};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Date,
    Votes,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub sort: Option<SortOrder>,
    pub day: Option<Day>,
    pub meal_type: Option<MealType>,
    pub picked: Option<bool>,
    pub q: Option<String>,
}

impl ListQuery {
    pub fn filter(&self) -> MealFilter {
        MealFilter {
            day: self.day,
            meal_type: self.meal_type,
            picked: self.picked,
            search: self.q.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMealRequest {
    pub title: String,
    #[serde(default)]
    pub image: Option<String>,
    pub day: Day,
    pub meal_type: MealType,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub submitted_by: Option<String>,
}

impl CreateMealRequest {
    pub fn into_new_meal(self, fallback_submitter: String) -> NewMeal {
        NewMeal {
            title: self.title,
            image: self.image,
            day: self.day,
            meal_type: self.meal_type,
            ingredients: self.ingredients,
            submitted_by: self
                .submitted_by
                .filter(|s| !s.trim().is_empty())
                .unwrap_or(fallback_submitter),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PutMealRequest {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub image: Option<Option<String>>,
    pub day: Option<Day>,
    pub meal_type: Option<MealType>,
    pub ingredients: Option<Vec<String>>,
}

impl From<PutMealRequest> for MealUpdate {
    fn from(r: PutMealRequest) -> Self {
        Self {
            title: r.title,
            image: r.image,
            day: r.day,
            meal_type: r.meal_type,
            ingredients: r.ingredients,
        }
    }
}

/// Distinguishes an absent `image` (keep) from `"image": null` (clear).
fn double_option<'de, D>(de: D) -> Result<Option<Option<String>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<String>::deserialize(de).map(Some)
}

#[derive(Debug, Deserialize)]
pub struct VoteRequest {
    pub direction: VoteDirection,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MealResponse {
    #[serde(flatten)]
    pub meal: Meal,
    pub net_votes: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder_color: Option<&'static str>,
}

impl From<Meal> for MealResponse {
    fn from(meal: Meal) -> Self {
        let placeholder_color = meal
            .image
            .is_none()
            .then(|| placeholder_color(&meal.title));
        Self {
            net_votes: meal.net_votes(),
            placeholder_color,
            meal,
        }
    }
}
