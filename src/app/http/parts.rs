// ==========================================
// 部件路由
// ==========================================

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::{Map, Value};

use super::common::run_blocking;
use crate::api::error::{ApiError, ApiResult};
use crate::api::{BulkAddResult, RemovePartResult};
use crate::app::state::AppState;
use crate::domain::asset_part::{AssetPart, NewAssetPart};
use crate::domain::types::PartDeletePolicy;

#[derive(Debug, Deserialize)]
pub struct BulkBody {
    #[serde(default)]
    pub parts: Vec<NewAssetPart>,
}

#[derive(Debug, Deserialize)]
pub struct RemoveQuery {
    /// orphan | cascade
    pub schedules: Option<String>,
}

/// GET /assets/:asset_id/parts
pub async fn list_parts(
    State(state): State<Arc<AppState>>,
    Path(asset_id): Path<String>,
) -> ApiResult<Json<Vec<AssetPart>>> {
    let api = state.part_api.clone();
    let parts = run_blocking(move || api.list_parts(&asset_id)).await?;
    Ok(Json(parts))
}

/// POST /assets/parts（请求体携带 assetId）
pub async fn add_part(
    State(state): State<Arc<AppState>>,
    Json(input): Json<NewAssetPart>,
) -> ApiResult<(StatusCode, Json<AssetPart>)> {
    let api = state.part_api.clone();
    let part = run_blocking(move || api.add_part(&input)).await?;
    Ok((StatusCode::CREATED, Json(part)))
}

/// POST /assets/:asset_id/parts
pub async fn add_part_for_asset(
    State(state): State<Arc<AppState>>,
    Path(asset_id): Path<String>,
    Json(mut input): Json<NewAssetPart>,
) -> ApiResult<(StatusCode, Json<AssetPart>)> {
    input.asset_id = asset_id;
    let api = state.part_api.clone();
    let part = run_blocking(move || api.add_part(&input)).await?;
    Ok((StatusCode::CREATED, Json(part)))
}

/// POST /assets/:asset_id/parts/bulk `{parts: [...]}`
pub async fn bulk_add(
    State(state): State<Arc<AppState>>,
    Path(asset_id): Path<String>,
    Json(body): Json<BulkBody>,
) -> ApiResult<Json<BulkAddResult>> {
    let api = state.part_api.clone();
    let result = run_blocking(move || api.bulk_add_parts(&asset_id, &body.parts)).await?;
    Ok(Json(result))
}

/// POST /assets/:asset_id/parts/import（请求体为 CSV 文本）
pub async fn import_csv(
    State(state): State<Arc<AppState>>,
    Path(asset_id): Path<String>,
    body: String,
) -> ApiResult<Json<BulkAddResult>> {
    let api = state.part_api.clone();
    let result = run_blocking(move || api.import_parts_csv(&asset_id, &body)).await?;
    Ok(Json(result))
}

/// PATCH /assets/parts/:part_id `{field: value}`
pub async fn patch_part(
    State(state): State<Arc<AppState>>,
    Path(part_id): Path<String>,
    Json(patch): Json<Map<String, Value>>,
) -> ApiResult<Json<AssetPart>> {
    let api = state.part_api.clone();
    let part = run_blocking(move || api.patch_part(&part_id, &patch)).await?;
    Ok(Json(part))
}

/// DELETE /assets/parts/:part_id?schedules=orphan|cascade
pub async fn remove_part(
    State(state): State<Arc<AppState>>,
    Path(part_id): Path<String>,
    Query(query): Query<RemoveQuery>,
) -> ApiResult<Json<RemovePartResult>> {
    let policy = match query.schedules.as_deref() {
        None | Some("") => None,
        Some(raw) => Some(PartDeletePolicy::parse(raw).ok_or_else(|| {
            ApiError::InvalidInput(format!("删除策略无效（orphan/cascade）: {}", raw))
        })?),
    };
    let api = state.part_api.clone();
    let result = run_blocking(move || api.remove_part(&part_id, policy)).await?;
    Ok(Json(result))
}
