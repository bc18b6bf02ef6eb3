// ==========================================
// WCM 设备台账 - HTTP 接口（axum）
// ==========================================
// 维护计划: /maintenance-schedule/...
// 设备与部件: /assets/...
// 同一位置的路径参数统一命名（matchit 要求）
// ==========================================

pub mod assets;
pub mod common;
pub mod parts;
pub mod schedule;

use std::sync::Arc;

use axum::routing::{get, patch, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::app::state::AppState;

pub use common::ErrorResponse;

/// 构建路由
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(assets::health))
        // 维护计划
        .route("/maintenance-schedule/generate", post(schedule::generate))
        .route("/maintenance-schedule/manual", post(schedule::create_manual))
        .route(
            "/maintenance-schedule/:id",
            get(schedule::get_schedule)
                .patch(schedule::update_task)
                .delete(schedule::delete_task),
        )
        .route("/maintenance-schedule/:id/toggle", post(schedule::toggle_task))
        .route("/maintenance-schedule/:id/ledger", get(schedule::ledger))
        .route("/maintenance-schedule/:id/ledger.svg", get(schedule::ledger_svg))
        // 设备
        .route("/assets", get(assets::list_assets).post(assets::create_asset))
        .route("/assets/parts", post(parts::add_part))
        .route(
            "/assets/parts/:part_id",
            patch(parts::patch_part).delete(parts::remove_part),
        )
        .route("/assets/:asset_id", get(assets::get_asset))
        .route(
            "/assets/:asset_id/parts",
            get(parts::list_parts).post(parts::add_part_for_asset),
        )
        .route("/assets/:asset_id/parts/bulk", post(parts::bulk_add))
        .route("/assets/:asset_id/parts/import", post(parts::import_csv))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
