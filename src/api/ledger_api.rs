// ==========================================
// WCM 设备台账 - 台账视图 API
// ==========================================
// 职责: 部件 + 当年任务 → 网格视图模型 / SVG
// ==========================================

use std::sync::Arc;

use crate::api::error::{ApiError, ApiResult};
use crate::config::ConfigManager;
use crate::engine::ledger_grid::{LedgerGrid, LedgerGridRenderer};
use crate::engine::ledger_index::LedgerIndex;
use crate::engine::ledger_svg::render_svg;
use crate::repository::asset_part_repo::AssetPartRepository;
use crate::repository::asset_repo::AssetRepository;
use crate::repository::schedule_repo::MaintenanceScheduleRepository;

pub struct LedgerApi {
    asset_repo: Arc<AssetRepository>,
    part_repo: Arc<AssetPartRepository>,
    schedule_repo: Arc<MaintenanceScheduleRepository>,
    config: Arc<ConfigManager>,
}

impl LedgerApi {
    pub fn new(
        asset_repo: Arc<AssetRepository>,
        part_repo: Arc<AssetPartRepository>,
        schedule_repo: Arc<MaintenanceScheduleRepository>,
        config: Arc<ConfigManager>,
    ) -> Self {
        Self {
            asset_repo,
            part_repo,
            schedule_repo,
            config,
        }
    }

    /// 构建台账网格
    ///
    /// # 参数
    /// - selected_week: 选中的周（生成周详情面板）
    /// - locale: None 时取配置 `ledger/default_locale`
    pub fn build_grid(
        &self,
        asset_id: &str,
        year: i32,
        selected_week: Option<u32>,
        locale: Option<&str>,
    ) -> ApiResult<LedgerGrid> {
        if self.asset_repo.find_by_id(asset_id)?.is_none() {
            return Err(ApiError::NotFound(format!("设备(id={})不存在", asset_id)));
        }

        let locale = match locale {
            Some(l) => l.to_string(),
            None => self
                .config
                .get_default_locale()
                .map_err(|e| ApiError::ConfigError(e.to_string()))?,
        };

        let parts = self.part_repo.find_by_asset(asset_id)?;
        let index = LedgerIndex::build(self.schedule_repo.find_by_asset_year(asset_id, year)?);

        let grid = LedgerGridRenderer::new(&locale).render(asset_id, year, &parts, &index, selected_week);
        if grid.orphan_row_count > 0 {
            tracing::debug!(
                asset_id = %asset_id,
                year = year,
                orphans = grid.orphan_row_count,
                "台账存在孤儿任务"
            );
        }
        Ok(grid)
    }

    /// 导出 SVG
    pub fn render_svg(&self, asset_id: &str, year: i32, locale: Option<&str>) -> ApiResult<String> {
        let grid = self.build_grid(asset_id, year, None, locale)?;
        Ok(render_svg(&grid))
    }
}
