use axum::extract::{Path, Query, State};
use axum::routing::{get, post, put};
use axum::{Json, Router, http::StatusCode};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::client::GeneratedModule;
use crate::error::AppError;
use crate::models::{ScheduledTask, TaskStatus};
use crate::schedule::{ModuleProgress, MonthCalendar};
use crate::state::AppState;
use crate::time::parse_calendar_date;
use crate::view::{LoadState, WeekGrid};

#[derive(Deserialize)]
struct WeekQueryParams {
    date: Option<String>,
}

#[derive(Deserialize)]
struct SelectWeekRequest {
    date: String,
}

#[derive(Deserialize)]
struct CalendarQueryParams {
    month: Option<String>,
}

#[derive(Deserialize, Default)]
struct GenerateRequest {
    start_date: Option<String>,
}

#[derive(Debug, Serialize)]
struct OpenTaskResponse {
    task_id: i64,
    status: TaskStatus,
    resource_url: String,
    completed_now: bool,
}

#[derive(Debug, Serialize)]
struct RefreshResponse {
    tasks: usize,
}

#[derive(Debug, Serialize)]
struct SaveTasksResponse {
    tasks_added: usize,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/week", get(week))
        .route("/week/select", post(select_week))
        .route("/week/next", post(next_week))
        .route("/week/previous", post(previous_week))
        .route("/modules", get(modules))
        .route("/modules/{module}/select", post(select_module))
        .route("/calendar", get(calendar))
        .route("/tasks", put(save_tasks))
        .route("/tasks/{id}/open", post(open_task))
        .route("/refresh", post(refresh))
        .route("/generate", post(generate))
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> StatusCode {
    match state.view.load_state() {
        LoadState::Failed(message) => {
            warn!("health check failed: {}", message);
            StatusCode::SERVICE_UNAVAILABLE
        }
        _ => StatusCode::OK,
    }
}

/// Without `date` this is the selected week; with it, the week holding
/// that date. The selection is never changed here.
async fn week(
    State(state): State<AppState>,
    Query(params): Query<WeekQueryParams>,
) -> Result<Json<WeekGrid>, AppError> {
    match params.date {
        Some(raw) => Ok(Json(state.view.week_grid_for(parse_query_date(&raw)?)?)),
        None => Ok(Json(state.view.week_grid())),
    }
}

async fn select_week(
    State(state): State<AppState>,
    Json(req): Json<SelectWeekRequest>,
) -> Result<Json<WeekGrid>, AppError> {
    state.view.select_date(parse_query_date(&req.date)?)?;
    Ok(Json(state.view.week_grid()))
}

async fn next_week(State(state): State<AppState>) -> Result<Json<WeekGrid>, AppError> {
    state.view.next_week()?;
    Ok(Json(state.view.week_grid()))
}

async fn previous_week(State(state): State<AppState>) -> Result<Json<WeekGrid>, AppError> {
    state.view.previous_week()?;
    Ok(Json(state.view.week_grid()))
}

async fn modules(State(state): State<AppState>) -> Json<Vec<ModuleProgress>> {
    Json(state.view.module_summary())
}

async fn select_module(
    State(state): State<AppState>,
    Path(module): Path<i32>,
) -> Result<Json<WeekGrid>, AppError> {
    state.view.select_module(module)?;
    Ok(Json(state.view.week_grid()))
}

async fn calendar(
    State(state): State<AppState>,
    Query(params): Query<CalendarQueryParams>,
) -> Result<Json<MonthCalendar>, AppError> {
    let month = params.month.as_deref().map(parse_query_date).transpose()?;
    Ok(Json(state.view.calendar(month)?))
}

async fn open_task(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<OpenTaskResponse>, AppError> {
    let outcome = state.view.open_task(id)?;
    Ok(Json(OpenTaskResponse {
        task_id: outcome.task_id,
        status: outcome.status,
        resource_url: outcome.resource_url,
        completed_now: outcome.completed_now,
    }))
}

async fn refresh(State(state): State<AppState>) -> Result<Json<RefreshResponse>, AppError> {
    let tasks = state.view.refresh().await?;
    Ok(Json(RefreshResponse { tasks }))
}

async fn save_tasks(
    State(state): State<AppState>,
    Json(tasks): Json<Vec<ScheduledTask>>,
) -> Result<Json<SaveTasksResponse>, AppError> {
    let tasks_added = state.view.save_tasks(tasks).await?;
    Ok(Json(SaveTasksResponse { tasks_added }))
}

async fn generate(
    State(state): State<AppState>,
    body: Option<Json<GenerateRequest>>,
) -> Result<Json<Vec<GeneratedModule>>, AppError> {
    let Json(req) = body.unwrap_or_default();
    let start_date = req.start_date.as_deref().map(parse_query_date).transpose()?;
    let modules = state.view.generate(start_date).await?;
    Ok(Json(modules))
}

fn parse_query_date(raw: &str) -> Result<NaiveDate, AppError> {
    parse_calendar_date(raw).map_err(|e| AppError::BadRequest(e.to_string()))
}
