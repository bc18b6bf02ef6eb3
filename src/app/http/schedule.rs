// ==========================================
// 维护计划路由
// ==========================================

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use chrono::{Datelike, NaiveDate};
use serde::Deserialize;

use super::common::run_blocking;
use crate::api::error::ApiResult;
use crate::app::state::AppState;
use crate::domain::schedule::{
    GenerateScheduleRequest, MaintenanceSchedule, NewManualTask, TaskUpdate,
};
use crate::engine::ledger_grid::LedgerGrid;
use crate::engine::schedule_generator::GenerateResult;

#[derive(Debug, Deserialize)]
pub struct YearQuery {
    pub year: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct LedgerQuery {
    pub year: Option<i32>,
    pub week: Option<u32>,
    pub locale: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleBody {
    #[serde(default)]
    pub completed_date: Option<NaiveDate>,
}

fn year_or_current(year: Option<i32>) -> i32 {
    year.unwrap_or_else(|| chrono::Local::now().date_naive().year())
}

/// GET /maintenance-schedule/:id?year=
pub async fn get_schedule(
    State(state): State<Arc<AppState>>,
    Path(asset_id): Path<String>,
    Query(query): Query<YearQuery>,
) -> ApiResult<Json<Vec<MaintenanceSchedule>>> {
    let api = state.schedule_api.clone();
    let year = year_or_current(query.year);
    let rows = run_blocking(move || api.get_schedule(&asset_id, year)).await?;
    Ok(Json(rows))
}

/// POST /maintenance-schedule/generate
pub async fn generate(
    State(state): State<Arc<AppState>>,
    Json(request): Json<GenerateScheduleRequest>,
) -> ApiResult<Json<GenerateResult>> {
    let api = state.schedule_api.clone();
    let result = run_blocking(move || api.generate_schedule(&request)).await?;
    Ok(Json(result))
}

/// POST /maintenance-schedule/manual
pub async fn create_manual(
    State(state): State<Arc<AppState>>,
    Json(task): Json<NewManualTask>,
) -> ApiResult<(StatusCode, Json<MaintenanceSchedule>)> {
    let api = state.schedule_api.clone();
    let row = run_blocking(move || api.create_manual_task(&task)).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// PATCH /maintenance-schedule/:id
pub async fn update_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(update): Json<TaskUpdate>,
) -> ApiResult<Json<MaintenanceSchedule>> {
    let api = state.schedule_api.clone();
    let row = run_blocking(move || api.update_task(&id, &update)).await?;
    Ok(Json(row))
}

/// POST /maintenance-schedule/:id/toggle（请求体可省略）
pub async fn toggle_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Option<Json<ToggleBody>>,
) -> ApiResult<Json<MaintenanceSchedule>> {
    let api = state.schedule_api.clone();
    let completed_date = body.and_then(|Json(b)| b.completed_date);
    let row = run_blocking(move || api.toggle_task(&id, completed_date)).await?;
    Ok(Json(row))
}

/// DELETE /maintenance-schedule/:id
pub async fn delete_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let api = state.schedule_api.clone();
    run_blocking(move || api.delete_task(&id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /maintenance-schedule/:id/ledger?year=&week=&locale=
pub async fn ledger(
    State(state): State<Arc<AppState>>,
    Path(asset_id): Path<String>,
    Query(query): Query<LedgerQuery>,
) -> ApiResult<Json<LedgerGrid>> {
    let api = state.ledger_api.clone();
    let year = year_or_current(query.year);
    let grid = run_blocking(move || {
        api.build_grid(&asset_id, year, query.week, query.locale.as_deref())
    })
    .await?;
    Ok(Json(grid))
}

/// GET /maintenance-schedule/:id/ledger.svg?year=&locale=
pub async fn ledger_svg(
    State(state): State<Arc<AppState>>,
    Path(asset_id): Path<String>,
    Query(query): Query<LedgerQuery>,
) -> ApiResult<impl IntoResponse> {
    let api = state.ledger_api.clone();
    let year = year_or_current(query.year);
    let svg = run_blocking(move || api.render_svg(&asset_id, year, query.locale.as_deref())).await?;
    Ok(([(header::CONTENT_TYPE, "image/svg+xml")], svg))
}
