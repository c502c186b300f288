use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use tracing::instrument;

use crate::{
    auth::ActingUser,
    error::{AppError, AppResult},
    state::{lock, AppState},
};

use super::dto::{
    CreateMealRequest, ListQuery, MealResponse, PutMealRequest, SortOrder, VoteRequest,
};

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/meals", get(list_meals))
        .route("/meals/:id", get(get_meal))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/meals", post(create_meal))
        .route("/meals/:id", put(put_meal).delete(delete_meal))
        .route("/meals/:id/vote", post(vote_meal))
        .route("/meals/:id/pick", post(toggle_pick))
}

#[instrument(skip(state))]
pub async fn list_meals(
    State(state): State<AppState>,
    Query(q): Query<ListQuery>,
) -> AppResult<Json<Vec<MealResponse>>> {
    let meals = lock(&state.meals)?;
    let ordered = match q.sort {
        Some(SortOrder::Date) => meals.sort_by_date(),
        Some(SortOrder::Votes) => meals.sort_by_votes(),
        None => meals.all().to_vec(),
    };
    let filter = q.filter();
    let items = ordered
        .into_iter()
        .filter(|m| filter.matches(m))
        .map(MealResponse::from)
        .collect();
    Ok(Json(items))
}

#[instrument(skip(state))]
pub async fn get_meal(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<MealResponse>> {
    let meals = lock(&state.meals)?;
    let meal = meals
        .get(&id)
        .cloned()
        .ok_or_else(|| AppError::MealNotFound(id.clone()))?;
    Ok(Json(meal.into()))
}

#[instrument(skip(state, body))]
pub async fn create_meal(
    State(state): State<AppState>,
    user: Option<ActingUser>,
    Json(body): Json<CreateMealRequest>,
) -> AppResult<(StatusCode, Json<MealResponse>)> {
    let submitter = user.map(|ActingUser(id)| id.to_string()).unwrap_or_default();
    let meal = lock(&state.meals)?.create(body.into_new_meal(submitter))?;
    Ok((StatusCode::CREATED, Json(meal.into())))
}

#[instrument(skip(state, body))]
pub async fn put_meal(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<PutMealRequest>,
) -> AppResult<Json<MealResponse>> {
    let meal = lock(&state.meals)?.edit(&id, body.into())?;
    Ok(Json(meal.into()))
}

#[instrument(skip(state))]
pub async fn delete_meal(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    lock(&state.meals)?.delete(&id)?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
pub async fn vote_meal(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<VoteRequest>,
) -> AppResult<Json<MealResponse>> {
    let meal = lock(&state.meals)?.vote(&id, body.direction)?;
    Ok(Json(meal.into()))
}

#[instrument(skip(state))]
pub async fn toggle_pick(
    State(state): State<AppState>,
    ActingUser(user_id): ActingUser,
    Path(id): Path<String>,
) -> AppResult<Json<MealResponse>> {
    let meal = lock(&state.meals)?.toggle_pick(&id, user_id)?;
    Ok(Json(meal.into()))
}
