// ==========================================
// WCM 设备台账 - 生成时状态规则
// ==========================================
// SEED_WEEK: 演示种子规则（周号 ≤2 已完成, 3-4 逾期, 其余计划）
// CALENDAR:  与当前日期比较（该周已结束 → 逾期, 否则计划）
// ==========================================

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::types::ScheduleStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusRule {
    SeedWeek,
    Calendar,
}

impl StatusRule {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusRule::SeedWeek => "SEED_WEEK",
            StatusRule::Calendar => "CALENDAR",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "SEED_WEEK" => Some(StatusRule::SeedWeek),
            "CALENDAR" => Some(StatusRule::Calendar),
            _ => None,
        }
    }

    /// 计算生成时的初始状态
    ///
    /// # 参数
    /// - year / week_number: 任务时间键
    /// - today: 当前日期（CALENDAR 规则使用）
    pub fn initial_status(&self, year: i32, week_number: u32, today: NaiveDate) -> ScheduleStatus {
        match self {
            StatusRule::SeedWeek => {
                if week_number < 3 {
                    ScheduleStatus::Completed
                } else if week_number < 5 {
                    ScheduleStatus::Overdue
                } else {
                    ScheduleStatus::Planned
                }
            }
            StatusRule::Calendar => match week_end(year, week_number) {
                Some(sunday) if sunday < today => ScheduleStatus::Overdue,
                _ => ScheduleStatus::Planned,
            },
        }
    }
}

impl fmt::Display for StatusRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// ISO 周的周日
fn week_end(year: i32, week_number: u32) -> Option<NaiveDate> {
    NaiveDate::from_isoywd_opt(year, week_number, Weekday::Sun)
}

/// 当前日期所在的 (ISO 年, ISO 周)
pub fn current_iso_week(today: NaiveDate) -> (i32, u32) {
    let iso = today.iso_week();
    (iso.year(), iso.week())
}
