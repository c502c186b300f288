mod dto;
pub mod handlers;
pub mod navigator;
pub mod services;

use crate::state::AppState;
use axum::Router;

pub use navigator::{month_grid, CalendarNavigator, CalendarView};
pub use services::{get_week_days, CalendarModel, DayPlan, SlotPlan};

pub fn router() -> Router<AppState> {
    handlers::routes()
}
