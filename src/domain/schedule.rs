// ==========================================
// WCM 设备台账 - 维护任务（MaintenanceSchedule）领域模型
// ==========================================
// 一条具体到 (年, 周) 的维护义务
// 时间键: (year, week_number), week_number ∈ [1, 52]
// ==========================================

use crate::domain::asset_part::AssetPart;
use crate::domain::types::{MaintenanceType, ScheduleSource, ScheduleStatus};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// 一年的周数（台账固定 52 列）
pub const WEEKS_PER_YEAR: u32 = 52;

// ==========================================
// MaintenanceSchedule - 维护任务
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceSchedule {
    pub id: String,
    pub asset_part_id: String,
    pub asset_id: String,
    pub year: i32,
    pub week_number: u32,
    pub maintenance_type: MaintenanceType,
    pub status: ScheduleStatus,

    // 生成时拷贝，部件改名不回写
    pub part_number: Option<String>,
    pub part_name: Option<String>,

    pub completed_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub source: ScheduleSource,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl MaintenanceSchedule {
    /// 生成任务的确定性 ID: `sched-{partId}-{year}-w{week}-{type}`
    ///
    /// 重复生成时依靠该 ID 做 INSERT OR IGNORE，保证幂等
    pub fn deterministic_id(
        asset_part_id: &str,
        year: i32,
        week_number: u32,
        maintenance_type: MaintenanceType,
    ) -> String {
        format!(
            "sched-{}-{}-w{}-{}",
            asset_part_id,
            year,
            week_number,
            maintenance_type.as_str()
        )
    }
}

/// 周号是否合法
pub fn is_valid_week(week_number: u32) -> bool {
    (1..=WEEKS_PER_YEAR).contains(&week_number)
}

// ==========================================
// 生成请求
// ==========================================

/// 参与生成的部件（与 POST /maintenance-schedule/generate 的 parts[] 对齐）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratePart {
    pub asset_part_id: String,
    #[serde(default)]
    pub part_number: Option<String>,
    #[serde(default)]
    pub part_name: Option<String>,
    #[serde(default, rename = "frequencyPM")]
    pub frequency_pm: Option<String>,
    #[serde(default, rename = "frequencyAM")]
    pub frequency_am: Option<String>,
    #[serde(default)]
    pub maintenance_time_minutes: Option<i64>,
}

impl From<&AssetPart> for GeneratePart {
    fn from(part: &AssetPart) -> Self {
        Self {
            asset_part_id: part.id.clone(),
            part_number: Some(part.part_number.clone()),
            part_name: Some(part.part_name.clone()),
            frequency_pm: part.frequency_pm.clone(),
            frequency_am: part.frequency_am.clone(),
            maintenance_time_minutes: part.maintenance_time_minutes,
        }
    }
}

impl GenerateScheduleRequest {
    /// 以设备当前部件表构造生成请求
    pub fn for_parts(asset_id: &str, year: i32, parts: &[AssetPart]) -> Self {
        Self {
            asset_id: asset_id.to_string(),
            year,
            parts: parts.iter().map(GeneratePart::from).collect(),
        }
    }
}

/// 生成请求
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateScheduleRequest {
    pub asset_id: String,
    pub year: i32,
    #[serde(default)]
    pub parts: Vec<GeneratePart>,
}

// ==========================================
// 人工新增 / 状态更新
// ==========================================

/// 人工新增任务（POST /maintenance-schedule/manual）
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewManualTask {
    pub asset_id: String,
    pub asset_part_id: String,
    pub week_number: u32,
    pub year: i32,
    pub maintenance_type: MaintenanceType,
    #[serde(default)]
    pub status: Option<ScheduleStatus>,
    #[serde(default)]
    pub part_number: Option<String>,
    #[serde(default)]
    pub part_name: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// 任务更新（PATCH /maintenance-schedule/{id}）
///
/// `completed_date`: 缺省 = 不修改; `Some(None)` = 清空
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskUpdate {
    #[serde(default)]
    pub status: Option<ScheduleStatus>,
    #[serde(default, with = "double_option")]
    pub completed_date: Option<Option<NaiveDate>>,
    #[serde(default, with = "double_option")]
    pub notes: Option<Option<String>>,
}

impl TaskUpdate {
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.completed_date.is_none() && self.notes.is_none()
    }
}

// 区分 "字段缺省" 与 "显式 null"
mod double_option {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<T, S>(value: &Option<Option<T>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: Serialize,
        S: Serializer,
    {
        match value {
            Some(inner) => inner.serialize(serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
    where
        T: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Some)
    }
}
