// ==========================================
// WCM 设备台账 - 领域类型定义
// ==========================================
// 维护类型 / 任务状态 / 任务来源 / ABC 分级 / 部件删除策略
// 序列化格式与数据库、前端 JSON 保持一致
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 维护类型 (Maintenance Type)
// ==========================================
// PM=预防维护, AM=自主维护, QM=质量维护, GM=通用维护
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MaintenanceType {
    Pm,
    Am,
    Qm,
    Gm,
}

impl MaintenanceType {
    pub const ALL: [MaintenanceType; 4] = [
        MaintenanceType::Pm,
        MaintenanceType::Am,
        MaintenanceType::Qm,
        MaintenanceType::Gm,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MaintenanceType::Pm => "PM",
            MaintenanceType::Am => "AM",
            MaintenanceType::Qm => "QM",
            MaintenanceType::Gm => "GM",
        }
    }

    /// 从字符串解析（大小写不敏感），未知值返回 None
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "PM" => Some(MaintenanceType::Pm),
            "AM" => Some(MaintenanceType::Am),
            "QM" => Some(MaintenanceType::Qm),
            "GM" => Some(MaintenanceType::Gm),
            _ => None,
        }
    }
}

impl fmt::Display for MaintenanceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 任务状态 (Schedule Status)
// ==========================================
// 切换控件只开放 planned <-> completed
// skipped / overdue 只由生成逻辑或管理端写入
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScheduleStatus {
    Planned,
    Completed,
    Skipped,
    Overdue,
}

impl ScheduleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScheduleStatus::Planned => "planned",
            ScheduleStatus::Completed => "completed",
            ScheduleStatus::Skipped => "skipped",
            ScheduleStatus::Overdue => "overdue",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "planned" => Some(ScheduleStatus::Planned),
            "completed" => Some(ScheduleStatus::Completed),
            "skipped" => Some(ScheduleStatus::Skipped),
            "overdue" => Some(ScheduleStatus::Overdue),
            _ => None,
        }
    }

    /// 从数据库字符串解析，未知值回落为 planned
    pub fn from_db_str(s: &str) -> Self {
        Self::parse(s).unwrap_or(ScheduleStatus::Planned)
    }
}

impl fmt::Display for ScheduleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 任务来源 (Schedule Source)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScheduleSource {
    Auto,   // 频率生成
    Manual, // 人工新增
}

impl ScheduleSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScheduleSource::Auto => "AUTO",
            ScheduleSource::Manual => "MANUAL",
        }
    }

    pub fn from_db_str(s: &str) -> Self {
        match s.to_uppercase().as_str() {
            "MANUAL" => ScheduleSource::Manual,
            _ => ScheduleSource::Auto,
        }
    }
}

impl fmt::Display for ScheduleSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// ABC 分级 (Component Classification)
// ==========================================
// A=关键, B=重要, C=标准; 其余保留原文
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComponentClass {
    A,
    B,
    C,
    Other(String),
}

impl ComponentClass {
    /// 解析分级文本
    ///
    /// 接受 "A"/"B"/"C" 以及 "Critical"/"Important"/"Standard"（大小写不敏感）
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.to_uppercase().as_str() {
            "A" | "CRITICAL" => ComponentClass::A,
            "B" | "IMPORTANT" => ComponentClass::B,
            "C" | "STANDARD" => ComponentClass::C,
            _ => ComponentClass::Other(trimmed.to_string()),
        }
    }
}

// ==========================================
// 部件删除策略 (Part Delete Policy)
// ==========================================
// ORPHAN: 保留维护记录（历史可追溯）
// CASCADE: 同时删除该部件的全部维护记录
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PartDeletePolicy {
    Orphan,
    Cascade,
}

impl PartDeletePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            PartDeletePolicy::Orphan => "ORPHAN",
            PartDeletePolicy::Cascade => "CASCADE",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "ORPHAN" => Some(PartDeletePolicy::Orphan),
            "CASCADE" => Some(PartDeletePolicy::Cascade),
            _ => None,
        }
    }
}

impl fmt::Display for PartDeletePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_maintenance_type_wire_format() {
        assert_eq!(serde_json::to_string(&MaintenanceType::Pm).unwrap(), "\"PM\"");
        assert_eq!(
            serde_json::from_str::<MaintenanceType>("\"GM\"").unwrap(),
            MaintenanceType::Gm
        );
        assert_eq!(MaintenanceType::parse("am"), Some(MaintenanceType::Am));
        assert_eq!(MaintenanceType::parse("FI"), None);
    }

    #[test]
    fn test_schedule_status_wire_format() {
        assert_eq!(
            serde_json::to_string(&ScheduleStatus::Overdue).unwrap(),
            "\"overdue\""
        );
        assert_eq!(ScheduleStatus::from_db_str("COMPLETED"), ScheduleStatus::Completed);
        assert_eq!(ScheduleStatus::from_db_str("???"), ScheduleStatus::Planned);
    }

    #[test]
    fn test_component_class_parse() {
        assert_eq!(ComponentClass::parse("a"), ComponentClass::A);
        assert_eq!(ComponentClass::parse("Important"), ComponentClass::B);
        assert_eq!(ComponentClass::parse(" Standard "), ComponentClass::C);
        assert_eq!(
            ComponentClass::parse("Dangerous"),
            ComponentClass::Other("Dangerous".to_string())
        );
    }
}
