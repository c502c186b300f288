use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use tracing::instrument;

use crate::{
    error::{AppError, AppResult},
    groceries::repo_types::GroceryItem,
    state::{lock, AppState},
};

use super::dto::{DeleteItemsRequest, RemovedResponse};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/groceries", get(list_items).delete(clear_items))
        .route("/groceries/delete", post(delete_items))
        .route("/groceries/from-meal/:meal_id", post(add_from_meal))
        .route("/groceries/:id/toggle", post(toggle_item))
        .route("/groceries/:id", delete(delete_item))
}

#[instrument(skip(state))]
pub async fn list_items(State(state): State<AppState>) -> AppResult<Json<Vec<GroceryItem>>> {
    Ok(Json(lock(&state.groceries)?.items().to_vec()))
}

#[instrument(skip(state))]
pub async fn add_from_meal(
    State(state): State<AppState>,
    Path(meal_id): Path<String>,
) -> AppResult<(StatusCode, Json<Vec<GroceryItem>>)> {
    // Copy the meal out before touching the grocery list.
    let meal = lock(&state.meals)?
        .get(&meal_id)
        .cloned()
        .ok_or_else(|| AppError::MealNotFound(meal_id.clone()))?;
    let added = lock(&state.groceries)?.add_meal(&meal)?;
    Ok((StatusCode::CREATED, Json(added)))
}

#[instrument(skip(state))]
pub async fn toggle_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<GroceryItem>> {
    Ok(Json(lock(&state.groceries)?.toggle(&id)?))
}

#[instrument(skip(state))]
pub async fn delete_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    lock(&state.groceries)?.remove(&id)?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
pub async fn delete_items(
    State(state): State<AppState>,
    Json(body): Json<DeleteItemsRequest>,
) -> AppResult<Json<RemovedResponse>> {
    let removed = lock(&state.groceries)?.remove_many(&body.ids)?;
    Ok(Json(RemovedResponse { removed }))
}

#[instrument(skip(state))]
pub async fn clear_items(State(state): State<AppState>) -> AppResult<Json<RemovedResponse>> {
    let removed = lock(&state.groceries)?.clear()?;
    Ok(Json(RemovedResponse { removed }))
}
