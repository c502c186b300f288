pub(crate) mod dto;
pub mod handlers;
pub mod repo;
pub mod repo_types;
pub mod services;

use crate::state::AppState;
use axum::Router;

pub use repo::{MealDocument, MealStore, MigrationOutcome, SubscriptionId, LEGACY_MEALS_KEY, MEALS_KEY};
pub use repo_types::{Meal, MealType};
pub use services::{MealCollection, MealFilter, MealUpdate, NewMeal, VoteDirection};

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(handlers::read_routes())
        .merge(handlers::write_routes())
}
