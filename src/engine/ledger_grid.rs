// ==========================================
// WCM 设备台账 - 台账网格渲染引擎
// ==========================================
// 职责: 部件 × 52 周 → 网格视图模型
// 单元格: 四个三角象限，各自独立判定，可同时着色
//   上 (蓝): 该周有 PM 已完成
//   右 (红): 该周有任意任务逾期（故障信号）
//   下 (黄): 该周有 PM 计划中
//   左 (灰): 该周存在 AM 任务（不看状态）
// 孤儿任务（部件已删除）不进入网格，只计数
// ==========================================

use crate::domain::asset_part::AssetPart;
use crate::domain::schedule::{MaintenanceSchedule, WEEKS_PER_YEAR};
use crate::domain::types::{ComponentClass, MaintenanceType, ScheduleStatus};
use crate::engine::ledger_index::LedgerIndex;
use crate::i18n::{t_in, t_in_with_args};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashSet;
use tracing::instrument;

// ===== 配色 =====
pub const COLOR_PM_EXECUTED: &str = "#2563EB";
pub const COLOR_BREAKDOWN: &str = "#DC2626";
pub const COLOR_PM_PLANNED: &str = "#FACC15";
pub const COLOR_UNPLANNED: &str = "#9CA3AF";
pub const COLOR_NEUTRAL: &str = "#F3F4F6";

pub const BADGE_RED: &str = "#DC2626";
pub const BADGE_YELLOW: &str = "#EAB308";
pub const BADGE_GREEN: &str = "#16A34A";
pub const BADGE_GRAY: &str = "#6B7280";

// ==========================================
// 单元格象限
// ==========================================

/// 象限位置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Quadrant {
    Top,
    Right,
    Bottom,
    Left,
}

impl Quadrant {
    pub const ALL: [Quadrant; 4] = [Quadrant::Top, Quadrant::Right, Quadrant::Bottom, Quadrant::Left];

    pub fn active_color(&self) -> &'static str {
        match self {
            Quadrant::Top => COLOR_PM_EXECUTED,
            Quadrant::Right => COLOR_BREAKDOWN,
            Quadrant::Bottom => COLOR_PM_PLANNED,
            Quadrant::Left => COLOR_UNPLANNED,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Quadrant::Top => "top",
            Quadrant::Right => "right",
            Quadrant::Bottom => "bottom",
            Quadrant::Left => "left",
        }
    }
}

/// 单元格四象限标志
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CellFlags {
    pub pm_executed: bool,
    pub breakdown: bool,
    pub pm_planned: bool,
    pub unplanned: bool,
}

impl CellFlags {
    /// 由单元格内的任务行计算
    pub fn from_rows<'a, I>(rows: I) -> Self
    where
        I: IntoIterator<Item = &'a MaintenanceSchedule>,
    {
        let mut flags = CellFlags::default();
        for row in rows {
            let is_pm = row.maintenance_type == MaintenanceType::Pm;
            if is_pm && row.status == ScheduleStatus::Completed {
                flags.pm_executed = true;
            }
            if row.status == ScheduleStatus::Overdue {
                flags.breakdown = true;
            }
            if is_pm && row.status == ScheduleStatus::Planned {
                flags.pm_planned = true;
            }
            if row.maintenance_type == MaintenanceType::Am {
                flags.unplanned = true;
            }
        }
        flags
    }

    pub fn is_active(&self, quadrant: Quadrant) -> bool {
        match quadrant {
            Quadrant::Top => self.pm_executed,
            Quadrant::Right => self.breakdown,
            Quadrant::Bottom => self.pm_planned,
            Quadrant::Left => self.unplanned,
        }
    }

    pub fn fill(&self, quadrant: Quadrant) -> &'static str {
        if self.is_active(quadrant) {
            quadrant.active_color()
        } else {
            COLOR_NEUTRAL
        }
    }

    pub fn fills(&self) -> QuadrantFills {
        QuadrantFills {
            top: self.fill(Quadrant::Top),
            right: self.fill(Quadrant::Right),
            bottom: self.fill(Quadrant::Bottom),
            left: self.fill(Quadrant::Left),
        }
    }
}

/// 四象限填充色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuadrantFills {
    pub top: &'static str,
    pub right: &'static str,
    pub bottom: &'static str,
    pub left: &'static str,
}

// ==========================================
// ABC 分级徽标
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationBadge {
    pub label: String,
    pub color: &'static str,
}

impl ClassificationBadge {
    /// A/Critical → A 红; B/Important → B 黄; C/Standard → C 绿;
    /// 其他取首字母大写配灰色; 缺失显示 "-"
    pub fn from_classification(raw: Option<&str>) -> Self {
        let raw = raw.map(str::trim).filter(|s| !s.is_empty());
        let Some(raw) = raw else {
            return Self {
                label: "-".to_string(),
                color: BADGE_GRAY,
            };
        };

        match ComponentClass::parse(raw) {
            ComponentClass::A => Self { label: "A".to_string(), color: BADGE_RED },
            ComponentClass::B => Self { label: "B".to_string(), color: BADGE_YELLOW },
            ComponentClass::C => Self { label: "C".to_string(), color: BADGE_GREEN },
            ComponentClass::Other(text) => Self {
                label: text
                    .chars()
                    .next()
                    .map(|c| c.to_uppercase().collect())
                    .unwrap_or_else(|| "-".to_string()),
                color: BADGE_GRAY,
            },
        }
    }
}

// ==========================================
// 周详情（列选择）
// ==========================================

/// 行上的切换动作
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ToggleAction {
    MarkComplete,
    Undo,
    None,
}

impl ToggleAction {
    /// planned → 标记完成; completed → 撤销; 其余状态不可切换
    pub fn for_status(status: ScheduleStatus) -> Self {
        match status {
            ScheduleStatus::Planned => ToggleAction::MarkComplete,
            ScheduleStatus::Completed => ToggleAction::Undo,
            _ => ToggleAction::None,
        }
    }

    pub fn target_status(&self) -> Option<ScheduleStatus> {
        match self {
            ToggleAction::MarkComplete => Some(ScheduleStatus::Completed),
            ToggleAction::Undo => Some(ScheduleStatus::Planned),
            ToggleAction::None => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekDetailEntry {
    pub task_id: String,
    pub asset_part_id: String,
    pub part_number: String,
    pub part_name: String,
    pub maintenance_type: MaintenanceType,
    pub status: ScheduleStatus,
    pub completed_date: Option<NaiveDate>,
    pub action: ToggleAction,
    pub action_label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekDetail {
    pub week_number: u32,
    pub title: String,
    pub entries: Vec<WeekDetailEntry>,
}

/// 列选择状态: 再次选择同一周即取消
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColumnSelection {
    selected: Option<u32>,
}

impl ColumnSelection {
    pub fn selected(&self) -> Option<u32> {
        self.selected
    }

    pub fn toggle(&mut self, week_number: u32) -> Option<u32> {
        self.selected = if self.selected == Some(week_number) {
            None
        } else {
            Some(week_number)
        };
        self.selected
    }

    pub fn clear(&mut self) {
        self.selected = None;
    }
}

// ==========================================
// 网格视图模型
// ==========================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerCell {
    pub week_number: u32,
    pub flags: CellFlags,
    pub fills: QuadrantFills,
    pub tooltip: String,
    pub task_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerRow {
    pub no: usize,
    pub asset_part_id: String,
    pub part_number: String,
    pub part_name: String,
    pub sap_number: Option<String>,
    pub storeroom_location: Option<String>,
    pub vendor: Option<String>,
    pub component_classification: Option<String>,
    #[serde(rename = "frequencyPM")]
    pub frequency_pm: Option<String>,
    #[serde(rename = "frequencyAM")]
    pub frequency_am: Option<String>,
    pub badge: ClassificationBadge,
    pub cells: Vec<LedgerCell>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LegendItem {
    pub key: String,
    pub label: String,
    pub color: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Legend {
    pub title: String,
    pub maintenance_types: Vec<LegendItem>,
    pub quadrants: Vec<LegendItem>,
    pub classes: Vec<LegendItem>,
}

impl Legend {
    pub fn localized(locale: &str) -> Self {
        let maintenance_types = MaintenanceType::ALL
            .iter()
            .map(|t| LegendItem {
                key: t.as_str().to_string(),
                label: t_in(locale, &format!("ledger.legend.types.{}", t.as_str())),
                color: None,
            })
            .collect();

        let quadrants = Quadrant::ALL
            .iter()
            .map(|q| LegendItem {
                key: q.as_str().to_string(),
                label: t_in(locale, &format!("ledger.legend.quadrants.{}", q.as_str())),
                color: Some(q.active_color()),
            })
            .collect();

        let classes = [("A", BADGE_RED), ("B", BADGE_YELLOW), ("C", BADGE_GREEN)]
            .iter()
            .map(|(key, color)| LegendItem {
                key: key.to_string(),
                label: t_in(locale, &format!("ledger.legend.classes.{}", key)),
                color: Some(*color),
            })
            .collect();

        Self {
            title: t_in(locale, "ledger.legend.title"),
            maintenance_types,
            quadrants,
            classes,
        }
    }
}

/// 台账网格
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerGrid {
    pub asset_id: String,
    pub year: i32,
    pub title: String,
    pub weeks: Vec<u32>,
    pub rows: Vec<LedgerRow>,
    pub selected_week: Option<u32>,
    pub week_detail: Option<WeekDetail>,
    pub orphan_row_count: usize,
    pub legend: Legend,
}

impl LedgerGrid {
    pub fn row(&self, asset_part_id: &str) -> Option<&LedgerRow> {
        self.rows.iter().find(|r| r.asset_part_id == asset_part_id)
    }

    pub fn cell(&self, asset_part_id: &str, week_number: u32) -> Option<&LedgerCell> {
        self.row(asset_part_id)?
            .cells
            .iter()
            .find(|c| c.week_number == week_number)
    }
}

// ==========================================
// LedgerGridRenderer - 网格渲染引擎
// ==========================================
pub struct LedgerGridRenderer {
    locale: &'static str,
}

impl LedgerGridRenderer {
    pub fn new(locale: &str) -> Self {
        Self {
            locale: crate::i18n::normalize_locale(locale),
        }
    }

    pub fn locale(&self) -> &'static str {
        self.locale
    }

    /// 渲染网格
    ///
    /// # 参数
    /// - `parts`: 台账行（顺序即显示顺序）
    /// - `index`: 任务索引（可包含其他年份与孤儿任务）
    /// - `selected_week`: 选中的列，生成周详情
    #[instrument(skip(self, parts, index), fields(parts = parts.len(), tasks = index.len()))]
    pub fn render(
        &self,
        asset_id: &str,
        year: i32,
        parts: &[AssetPart],
        index: &LedgerIndex,
        selected_week: Option<u32>,
    ) -> LedgerGrid {
        let known: HashSet<&str> = parts.iter().map(|p| p.id.as_str()).collect();
        let orphan_row_count = index
            .rows()
            .filter(|r| r.year == year && !known.contains(r.asset_part_id.as_str()))
            .count();

        let rows = parts
            .iter()
            .enumerate()
            .map(|(i, part)| self.render_row(i + 1, part, year, index))
            .collect();

        let selected_week = selected_week.filter(|w| (1..=WEEKS_PER_YEAR).contains(w));
        let week_detail = selected_week.map(|week| self.week_detail(week, year, parts, index));

        LedgerGrid {
            asset_id: asset_id.to_string(),
            year,
            title: t_in_with_args(self.locale, "ledger.title", &[("year", &year.to_string())]),
            weeks: (1..=WEEKS_PER_YEAR).collect(),
            rows,
            selected_week,
            week_detail,
            orphan_row_count,
            legend: Legend::localized(self.locale),
        }
    }

    fn render_row(&self, no: usize, part: &AssetPart, year: i32, index: &LedgerIndex) -> LedgerRow {
        let cells = (1..=WEEKS_PER_YEAR)
            .map(|week| {
                let rows = index.rows_for_cell(&part.id, year, week);
                let flags = CellFlags::from_rows(rows.iter().copied());
                LedgerCell {
                    week_number: week,
                    flags,
                    fills: flags.fills(),
                    tooltip: self.tooltip(week, &rows),
                    task_ids: rows.iter().map(|r| r.id.clone()).collect(),
                }
            })
            .collect();

        LedgerRow {
            no,
            asset_part_id: part.id.clone(),
            part_number: part.part_number.clone(),
            part_name: part.part_name.clone(),
            sap_number: part.sap_number.clone(),
            storeroom_location: part.storeroom_location.clone(),
            vendor: part.vendor.clone(),
            component_classification: part.component_classification.clone(),
            frequency_pm: part.frequency_pm.clone(),
            frequency_am: part.frequency_am.clone(),
            badge: ClassificationBadge::from_classification(
                part.component_classification.as_deref(),
            ),
            cells,
        }
    }

    /// "Week 14" 或 "Week 14: PM (planned), AM (completed)"
    pub fn tooltip(&self, week_number: u32, rows: &[&MaintenanceSchedule]) -> String {
        let head = t_in_with_args(self.locale, "ledger.week", &[("week", &week_number.to_string())]);
        if rows.is_empty() {
            return head;
        }
        let detail = rows
            .iter()
            .map(|r| format!("{} ({})", r.maintenance_type, r.status))
            .collect::<Vec<_>>()
            .join(", ");
        format!("{}: {}", head, detail)
    }

    /// 某周的详情面板（排除孤儿任务）
    pub fn week_detail(
        &self,
        week_number: u32,
        year: i32,
        parts: &[AssetPart],
        index: &LedgerIndex,
    ) -> WeekDetail {
        let mut entries = Vec::new();
        for part in parts {
            for row in index.rows_for_cell(&part.id, year, week_number) {
                let action = ToggleAction::for_status(row.status);
                let action_label = match action {
                    ToggleAction::MarkComplete => Some(t_in(self.locale, "ledger.actions.mark_complete")),
                    ToggleAction::Undo => Some(t_in(self.locale, "ledger.actions.undo")),
                    ToggleAction::None => None,
                };
                entries.push(WeekDetailEntry {
                    task_id: row.id.clone(),
                    asset_part_id: part.id.clone(),
                    part_number: part.part_number.clone(),
                    part_name: part.part_name.clone(),
                    maintenance_type: row.maintenance_type,
                    status: row.status,
                    completed_date: row.completed_date,
                    action,
                    action_label,
                });
            }
        }

        WeekDetail {
            week_number,
            title: t_in_with_args(self.locale, "ledger.week", &[("week", &week_number.to_string())]),
            entries,
        }
    }
}
