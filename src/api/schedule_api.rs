// ==========================================
// WCM 设备台账 - 维护任务 API
// ==========================================
// 职责: 任务查询 / 按频率生成 / 人工新增 / 状态更新与切换 / 删除
// 生成: 单事务 INSERT OR IGNORE，失败整体回滚，可直接重试
// ==========================================

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{info, warn};
use uuid::Uuid;

use crate::api::error::{ApiError, ApiResult};
use crate::config::ConfigManager;
use crate::domain::schedule::{
    is_valid_week, GenerateScheduleRequest, MaintenanceSchedule, NewManualTask, TaskUpdate,
};
use crate::domain::types::{ScheduleSource, ScheduleStatus};
use crate::engine::ledger_grid::ToggleAction;
use crate::engine::schedule_generator::{GenerateResult, ScheduleGenerator};
use crate::engine::status_rule::StatusRule;
use crate::repository::asset_part_repo::AssetPartRepository;
use crate::repository::db_utils::now_timestamp;
use crate::repository::schedule_repo::MaintenanceScheduleRepository;

/// 可接受的年份范围
const MIN_YEAR: i32 = 2000;
const MAX_YEAR: i32 = 2100;

// ==========================================
// MaintenanceScheduleApi - 维护任务 API
// ==========================================
pub struct MaintenanceScheduleApi {
    schedule_repo: Arc<MaintenanceScheduleRepository>,
    part_repo: Arc<AssetPartRepository>,
    config: Arc<ConfigManager>,
}

impl MaintenanceScheduleApi {
    pub fn new(
        schedule_repo: Arc<MaintenanceScheduleRepository>,
        part_repo: Arc<AssetPartRepository>,
        config: Arc<ConfigManager>,
    ) -> Self {
        Self {
            schedule_repo,
            part_repo,
            config,
        }
    }

    /// 查询设备某年的全部任务
    pub fn get_schedule(&self, asset_id: &str, year: i32) -> ApiResult<Vec<MaintenanceSchedule>> {
        if asset_id.trim().is_empty() {
            return Err(ApiError::InvalidInput("设备ID不能为空".to_string()));
        }
        validate_year(year)?;

        Ok(self.schedule_repo.find_by_asset_year(asset_id, year)?)
    }

    /// 孤儿任务数（部件已删除，任务仍保留）
    pub fn count_orphans(&self, asset_id: &str, year: i32) -> ApiResult<usize> {
        validate_year(year)?;
        Ok(self.schedule_repo.count_orphans(asset_id, year)?)
    }

    pub fn get_task(&self, id: &str) -> ApiResult<MaintenanceSchedule> {
        self.schedule_repo
            .find_by_id(id)?
            .ok_or_else(|| ApiError::NotFound(format!("维护任务(id={})不存在", id)))
    }

    /// 按频率生成任务（状态规则取自配置）
    pub fn generate_schedule(&self, request: &GenerateScheduleRequest) -> ApiResult<GenerateResult> {
        let rule = self
            .config
            .get_status_rule()
            .map_err(|e| ApiError::ConfigError(e.to_string()))?;
        self.generate_schedule_with_rule(request, rule, today())
    }

    /// 按频率生成任务（显式指定状态规则与当前日期）
    ///
    /// # 返回
    /// - tasks_created: 新写入的行数
    /// - tasks_skipped_existing: 因 ID 已存在被忽略的行数
    pub fn generate_schedule_with_rule(
        &self,
        request: &GenerateScheduleRequest,
        rule: StatusRule,
        today: NaiveDate,
    ) -> ApiResult<GenerateResult> {
        if request.asset_id.trim().is_empty() {
            return Err(ApiError::InvalidInput("设备ID不能为空".to_string()));
        }
        validate_year(request.year)?;
        if let Some(pos) = request
            .parts
            .iter()
            .position(|p| p.asset_part_id.trim().is_empty())
        {
            return Err(ApiError::InvalidInput(format!(
                "第{}个部件缺少assetPartId",
                pos + 1
            )));
        }

        let generator = ScheduleGenerator::new(rule);
        let rows = generator.expand_rows(request, today, now_timestamp());
        let rows_total = rows.len();

        let tasks_created = self.schedule_repo.insert_or_ignore_batch(&rows).map_err(|e| {
            warn!(asset_id = %request.asset_id, year = request.year, error = %e, "任务生成写入失败，已回滚");
            ApiError::from(e)
        })?;

        let result = GenerateResult {
            tasks_created,
            tasks_skipped_existing: rows_total - tasks_created,
            rows_total,
        };
        info!(
            asset_id = %request.asset_id,
            year = request.year,
            rule = %rule,
            created = result.tasks_created,
            skipped = result.tasks_skipped_existing,
            "维护任务生成完成"
        );
        Ok(result)
    }

    /// 人工新增单条任务
    ///
    /// 部件必须存在且属于该设备；未给出的部件编号/名称取自部件
    pub fn create_manual_task(&self, task: &NewManualTask) -> ApiResult<MaintenanceSchedule> {
        if task.asset_id.trim().is_empty() {
            return Err(ApiError::InvalidInput("设备ID不能为空".to_string()));
        }
        if task.asset_part_id.trim().is_empty() {
            return Err(ApiError::InvalidInput("部件ID不能为空".to_string()));
        }
        if !is_valid_week(task.week_number) {
            return Err(ApiError::InvalidInput(format!(
                "周号必须在1-52之间: {}",
                task.week_number
            )));
        }
        validate_year(task.year)?;

        let part = self
            .part_repo
            .find_by_id(&task.asset_part_id)?
            .ok_or_else(|| ApiError::NotFound(format!("部件(id={})不存在", task.asset_part_id)))?;
        if part.asset_id != task.asset_id {
            return Err(ApiError::InvalidInput(format!(
                "部件(id={})不属于设备(id={})",
                part.id, task.asset_id
            )));
        }

        let status = task.status.unwrap_or(ScheduleStatus::Planned);
        let now = now_timestamp();
        let row = MaintenanceSchedule {
            id: format!("manual-{}", Uuid::new_v4()),
            asset_part_id: task.asset_part_id.clone(),
            asset_id: task.asset_id.clone(),
            year: task.year,
            week_number: task.week_number,
            maintenance_type: task.maintenance_type,
            status,
            part_number: task.part_number.clone().or(Some(part.part_number)),
            part_name: task.part_name.clone().or(Some(part.part_name)),
            completed_date: (status == ScheduleStatus::Completed).then(today),
            notes: task.notes.clone(),
            source: ScheduleSource::Manual,
            created_at: now,
            updated_at: now,
        };

        self.schedule_repo.insert(&row)?;
        info!(id = %row.id, asset_id = %row.asset_id, week = row.week_number, "人工新增维护任务");
        Ok(row)
    }

    /// 管理端更新（可设置任意状态）
    ///
    /// # 规则
    /// - 显式给出的 completedDate / notes 原样写入（null 为清空）
    /// - 未给出 completedDate 时: 转为 completed 则记为今天，离开 completed 则清空
    pub fn update_task(&self, id: &str, update: &TaskUpdate) -> ApiResult<MaintenanceSchedule> {
        if update.is_empty() {
            return Err(ApiError::InvalidInput("更新内容不能为空".to_string()));
        }
        let existing = self.get_task(id)?;

        let status = update.status.unwrap_or(existing.status);
        let completed_date = match update.completed_date {
            Some(explicit) => explicit,
            None => match (existing.status, status) {
                (from, ScheduleStatus::Completed) if from != ScheduleStatus::Completed => {
                    Some(today())
                }
                (ScheduleStatus::Completed, to) if to != ScheduleStatus::Completed => None,
                _ => existing.completed_date,
            },
        };
        let notes = match &update.notes {
            Some(explicit) => explicit.clone(),
            None => existing.notes.clone(),
        };

        self.schedule_repo
            .update_task(id, status, completed_date, notes.as_deref())?;
        info!(id = %id, from = %existing.status, to = %status, "维护任务已更新");
        self.get_task(id)
    }

    /// 切换控件: planned ↔ completed
    ///
    /// # 参数
    /// - completed_date: 标记完成时的日期（缺省为今天）
    pub fn toggle_task(
        &self,
        id: &str,
        completed_date: Option<NaiveDate>,
    ) -> ApiResult<MaintenanceSchedule> {
        let existing = self.get_task(id)?;

        let action = ToggleAction::for_status(existing.status);
        let (status, date) = match action {
            ToggleAction::MarkComplete => (
                ScheduleStatus::Completed,
                Some(completed_date.unwrap_or_else(today)),
            ),
            ToggleAction::Undo => (ScheduleStatus::Planned, None),
            ToggleAction::None => {
                return Err(ApiError::InvalidStateTransition {
                    from: existing.status.to_string(),
                    to: "planned/completed".to_string(),
                })
            }
        };

        self.schedule_repo
            .update_task(id, status, date, existing.notes.as_deref())?;
        self.get_task(id)
    }

    /// 删除单条任务
    pub fn delete_task(&self, id: &str) -> ApiResult<()> {
        let affected = self.schedule_repo.delete(id)?;
        if affected == 0 {
            return Err(ApiError::NotFound(format!("维护任务(id={})不存在", id)));
        }
        info!(id = %id, "维护任务已删除");
        Ok(())
    }
}

fn validate_year(year: i32) -> ApiResult<()> {
    if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        return Err(ApiError::InvalidInput(format!(
            "年份超出范围({}-{}): {}",
            MIN_YEAR, MAX_YEAR, year
        )));
    }
    Ok(())
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}
