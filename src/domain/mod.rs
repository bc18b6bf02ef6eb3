// ==========================================
// WCM 设备台账 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod asset_part;
pub mod schedule;
pub mod types;

// 重导出核心类型
pub use asset_part::{Asset, AssetPart, FieldKind, NewAsset, NewAssetPart, PartField};
pub use schedule::{
    is_valid_week, GeneratePart, GenerateScheduleRequest, MaintenanceSchedule, NewManualTask,
    TaskUpdate, WEEKS_PER_YEAR,
};
pub use types::{
    ComponentClass, MaintenanceType, PartDeletePolicy, ScheduleSource, ScheduleStatus,
};
