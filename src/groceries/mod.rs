mod dto;
pub mod handlers;
pub mod repo;
pub mod repo_types;
pub mod services;

use crate::state::AppState;
use axum::Router;

pub use repo::{GroceryStore, GROCERIES_KEY};
pub use repo_types::GroceryItem;
pub use services::GroceryList;

pub fn router() -> Router<AppState> {
    handlers::routes()
}
