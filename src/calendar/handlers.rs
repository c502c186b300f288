use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use tracing::instrument;

use crate::{days::format_date, days::parse_date, error::AppResult, state::AppState};

use super::dto::{DateQuery, DayResponse, MonthResponse, WeekResponse};
use super::navigator::{month_grid, CalendarNavigator, CalendarView};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/calendar/week", get(get_week))
        .route("/calendar/day", get(get_day))
        .route("/calendar/month", get(get_month))
}

fn navigator(state: &AppState, q: &DateQuery, view: CalendarView) -> AppResult<CalendarNavigator> {
    let mut nav = CalendarNavigator::new(state.clock.today());
    if let Some(raw) = q.date.as_deref() {
        nav.set_date(parse_date(raw)?);
    }
    nav.set_view(view);
    Ok(nav)
}

#[instrument(skip(state))]
pub async fn get_week(
    State(state): State<AppState>,
    Query(q): Query<DateQuery>,
) -> AppResult<Json<WeekResponse>> {
    let nav = navigator(&state, &q, CalendarView::Weekly)?;
    let days = state
        .calendar
        .week_plan(nav.current_week_start())
        .into_iter()
        .map(DayResponse::from)
        .collect();
    Ok(Json(WeekResponse {
        view: nav.current_view(),
        week_start: format_date(nav.current_week_start()),
        days,
    }))
}

#[instrument(skip(state))]
pub async fn get_day(
    State(state): State<AppState>,
    Query(q): Query<DateQuery>,
) -> AppResult<Json<DayResponse>> {
    let nav = navigator(&state, &q, CalendarView::Daily)?;
    let mut plan = state.calendar.day_plan(nav.current_date());
    if let Some(meal_type) = q.meal_type {
        plan.slots.retain(|s| s.meal_type == meal_type);
    }
    Ok(Json(plan.into()))
}

#[instrument(skip(state))]
pub async fn get_month(
    State(state): State<AppState>,
    Query(q): Query<DateQuery>,
) -> AppResult<Json<MonthResponse>> {
    let nav = navigator(&state, &q, CalendarView::Monthly)?;
    let weeks = month_grid(nav.current_date())
        .into_iter()
        .map(|week| {
            week.into_iter()
                .map(|date| DayResponse::from(state.calendar.day_plan(date)))
                .collect()
        })
        .collect();
    Ok(Json(MonthResponse {
        view: nav.current_view(),
        date: format_date(nav.current_date()),
        weeks,
    }))
}
