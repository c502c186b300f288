use serde::{Deserialize, Serialize};

use crate::meals::repo_types::MealType;

use super::navigator::CalendarView;
use super::services::{DayPlan, SlotPlan};
use crate::days::{day_to_string, format_date, Day};
use crate::meals::dto::MealResponse;

#[derive(Debug, Default, Deserialize)]
pub struct DateQuery {
    pub date: Option<String>,
    pub meal_type: Option<MealType>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotResponse {
    pub meal_type: MealType,
    pub featured: Option<MealResponse>,
    pub meals: Vec<MealResponse>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayResponse {
    pub date: String,
    pub day: Day,
    pub slots: Vec<SlotResponse>,
}

impl From<SlotPlan> for SlotResponse {
    fn from(slot: SlotPlan) -> Self {
        Self {
            meal_type: slot.meal_type,
            featured: slot.featured.map(Into::into),
            meals: slot.meals.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<DayPlan> for DayResponse {
    fn from(plan: DayPlan) -> Self {
        Self {
            date: format_date(plan.date),
            day: day_to_string(plan.date),
            slots: plan.slots.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekResponse {
    pub view: CalendarView,
    pub week_start: String,
    pub days: Vec<DayResponse>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthResponse {
    pub view: CalendarView,
    pub date: String,
    pub weeks: Vec<Vec<DayResponse>>,
}
