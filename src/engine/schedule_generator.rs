// ==========================================
// WCM 设备台账 - 维护任务生成引擎
// ==========================================
// 职责: (部件, 维护类型) × 频率 → 一年内的任务行
// 输入: 设备 ID + 年份 + 部件列表
// 输出: 带确定性 ID 的 MaintenanceSchedule 列表
// 红线: 引擎不做持久化，写库由调用方在单事务内完成
// ==========================================

use crate::domain::schedule::{GeneratePart, GenerateScheduleRequest, MaintenanceSchedule};
use crate::domain::types::{MaintenanceType, ScheduleSource, ScheduleStatus};
use crate::engine::frequency::expand_in_year;
use crate::engine::status_rule::StatusRule;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// 生成结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResult {
    /// 本次新增行数
    pub tasks_created: usize,
    /// 已存在而被忽略的行数
    pub tasks_skipped_existing: usize,
    /// 按频率展开得到的总行数
    pub rows_total: usize,
}

// ==========================================
// ScheduleGenerator - 任务生成引擎
// ==========================================
pub struct ScheduleGenerator {
    rule: StatusRule,
}

impl ScheduleGenerator {
    pub fn new(rule: StatusRule) -> Self {
        Self { rule }
    }

    pub fn rule(&self) -> StatusRule {
        self.rule
    }

    /// 展开全部任务行
    ///
    /// # 参数
    /// - `request`: 生成请求（部件频率为空时该部件不产生任务）
    /// - `today`: 当前日期（CALENDAR 规则判定逾期）
    /// - `now`: 写入的 created_at / updated_at
    ///
    /// # 规则
    /// - PM 槽位使用 frequencyPM，AM 槽位使用 frequencyAM
    /// - 每个展开出的周号生成一行，ID = sched-{partId}-{year}-w{week}-{type}
    /// - 初始为 completed 的行以该周周一作为完成日期
    #[instrument(skip(self, request), fields(
        asset_id = %request.asset_id,
        year = request.year,
        parts = request.parts.len(),
        rule = %self.rule
    ))]
    pub fn expand_rows(
        &self,
        request: &GenerateScheduleRequest,
        today: NaiveDate,
        now: NaiveDateTime,
    ) -> Vec<MaintenanceSchedule> {
        let mut rows = Vec::new();

        for part in &request.parts {
            for (maintenance_type, code) in slots(part) {
                let weeks = expand_in_year(code, request.year);
                debug!(
                    asset_part_id = %part.asset_part_id,
                    maintenance_type = %maintenance_type,
                    code = code,
                    weeks = weeks.len(),
                    "频率展开"
                );

                for week in weeks {
                    let status = self.rule.initial_status(request.year, week, today);
                    let completed_date = match status {
                        ScheduleStatus::Completed => NaiveDate::from_isoywd_opt(
                            request.year,
                            week,
                            chrono::Weekday::Mon,
                        ),
                        _ => None,
                    };

                    rows.push(MaintenanceSchedule {
                        id: MaintenanceSchedule::deterministic_id(
                            &part.asset_part_id,
                            request.year,
                            week,
                            maintenance_type,
                        ),
                        asset_part_id: part.asset_part_id.clone(),
                        asset_id: request.asset_id.clone(),
                        year: request.year,
                        week_number: week,
                        maintenance_type,
                        status,
                        part_number: part.part_number.clone(),
                        part_name: part.part_name.clone(),
                        completed_date,
                        notes: None,
                        source: ScheduleSource::Auto,
                        created_at: now,
                        updated_at: now,
                    });
                }
            }
        }

        rows
    }
}

/// 部件的 (维护类型, 频率代码) 槽位，跳过空代码
fn slots(part: &GeneratePart) -> Vec<(MaintenanceType, &str)> {
    [
        (MaintenanceType::Pm, part.frequency_pm.as_deref()),
        (MaintenanceType::Am, part.frequency_am.as_deref()),
    ]
    .into_iter()
    .filter_map(|(t, code)| code.filter(|c| !c.is_empty()).map(|c| (t, c)))
    .collect()
}
