// ==========================================
// 设备路由 / 健康检查
// ==========================================

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};

use super::common::run_blocking;
use crate::api::error::ApiResult;
use crate::app::state::AppState;
use crate::domain::asset_part::{Asset, NewAsset};

/// GET /assets
pub async fn list_assets(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Asset>>> {
    let api = state.asset_api.clone();
    Ok(Json(run_blocking(move || api.list_assets()).await?))
}

/// POST /assets
pub async fn create_asset(
    State(state): State<Arc<AppState>>,
    Json(input): Json<NewAsset>,
) -> ApiResult<(StatusCode, Json<Asset>)> {
    let api = state.asset_api.clone();
    let asset = run_blocking(move || api.create_asset(&input)).await?;
    Ok((StatusCode::CREATED, Json(asset)))
}

/// GET /assets/:asset_id
pub async fn get_asset(
    State(state): State<Arc<AppState>>,
    Path(asset_id): Path<String>,
) -> ApiResult<Json<Asset>> {
    let api = state.asset_api.clone();
    Ok(Json(run_blocking(move || api.get_asset(&asset_id)).await?))
}

/// GET /health
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "up",
        "service": crate::APP_NAME,
        "version": crate::VERSION,
    }))
}
