// ==========================================
// WCM 设备台账 - 部件（AssetPart）领域模型
// ==========================================
// 一个设备下的可维护部件/子总成
// 字段分组: 标识 / 目录 / ABC 分级 / PM / AM / QM / FI / 物流
// ==========================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ==========================================
// Asset - 设备（台账表头所需的最小信息）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub id: String,
    pub asset_number: String,
    pub name: String,
    pub location: Option<String>,
    pub created_at: NaiveDateTime,
}

/// 新建设备请求
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAsset {
    pub id: Option<String>,
    pub asset_number: String,
    pub name: String,
    pub location: Option<String>,
}

// ==========================================
// AssetPart - 部件
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetPart {
    // ===== 标识 =====
    pub id: String,
    pub asset_id: String,
    pub part_number: String,
    pub part_name: String,

    // ===== 目录信息 =====
    pub sap_number: Option<String>,
    pub description: Option<String>,
    pub manufacturer: Option<String>,
    pub model_number: Option<String>,
    pub unit_of_measure: String,
    pub quantity: f64,
    pub is_primary: bool,
    pub notes: Option<String>,

    // ===== ABC 分级 =====
    pub component_classification: Option<String>,

    // ===== PM 预防维护 =====
    pub pm_type: Option<String>,              // TBM / CBM / BDM
    pub smp_number: Option<i64>,              // 标准维护程序编号
    #[serde(rename = "frequencyPM")]
    pub frequency_pm: Option<String>,         // 频率代码
    pub maintenance_time_minutes: Option<i64>,
    pub machine_stop_required: Option<String>, // STOP / Running

    // ===== AM 自主维护 =====
    pub inspection_standard: Option<String>,  // C / I / L / T
    #[serde(rename = "frequencyAM")]
    pub frequency_am: Option<String>,

    // ===== QM 质量维护 =====
    pub qa_matrix_no: Option<i64>,
    pub qm_matrix_no: Option<i64>,

    // ===== FI 改善 =====
    pub kaizen_type: Option<String>,          // Cost / Reliability / Availability
    pub kaizen_no: Option<String>,

    // ===== 物流 =====
    pub storeroom_location: Option<String>,
    pub vendor: Option<String>,

    // ===== 审计 =====
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl AssetPart {
    /// 是否配置了任一维护频率
    pub fn has_frequency(&self) -> bool {
        non_empty(&self.frequency_pm) || non_empty(&self.frequency_am)
    }
}

fn non_empty(value: &Option<String>) -> bool {
    value.as_deref().map(|s| !s.is_empty()).unwrap_or(false)
}

// ==========================================
// NewAssetPart - 新建部件请求
// ==========================================
// 必填: partNumber / partName / componentClassification（在 API 层校验）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAssetPart {
    #[serde(default)]
    pub asset_id: String,
    pub part_number: Option<String>,
    pub part_name: Option<String>,
    pub sap_number: Option<String>,
    pub description: Option<String>,
    pub manufacturer: Option<String>,
    pub model_number: Option<String>,
    pub unit_of_measure: Option<String>,
    pub quantity: Option<f64>,
    pub is_primary: Option<bool>,
    pub notes: Option<String>,
    pub component_classification: Option<String>,
    pub pm_type: Option<String>,
    pub smp_number: Option<i64>,
    #[serde(rename = "frequencyPM")]
    pub frequency_pm: Option<String>,
    pub maintenance_time_minutes: Option<i64>,
    pub machine_stop_required: Option<String>,
    pub inspection_standard: Option<String>,
    #[serde(rename = "frequencyAM")]
    pub frequency_am: Option<String>,
    pub qa_matrix_no: Option<i64>,
    pub qm_matrix_no: Option<i64>,
    pub kaizen_type: Option<String>,
    pub kaizen_no: Option<String>,
    pub storeroom_location: Option<String>,
    pub vendor: Option<String>,
}

// ==========================================
// PartField - 可单字段修改的部件属性
// ==========================================
// PATCH /assets/parts/{id} 与单元格编辑共用
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartField {
    PartNumber,
    PartName,
    SapNumber,
    Description,
    Manufacturer,
    ModelNumber,
    UnitOfMeasure,
    Quantity,
    IsPrimary,
    Notes,
    ComponentClassification,
    PmType,
    SmpNumber,
    FrequencyPm,
    MaintenanceTimeMinutes,
    MachineStopRequired,
    InspectionStandard,
    FrequencyAm,
    QaMatrixNo,
    QmMatrixNo,
    KaizenType,
    KaizenNo,
    StoreroomLocation,
    Vendor,
}

/// 字段值类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Integer,
    Real,
    Flag,
}

impl PartField {
    pub const ALL: [PartField; 24] = [
        PartField::PartNumber,
        PartField::PartName,
        PartField::SapNumber,
        PartField::Description,
        PartField::Manufacturer,
        PartField::ModelNumber,
        PartField::UnitOfMeasure,
        PartField::Quantity,
        PartField::IsPrimary,
        PartField::Notes,
        PartField::ComponentClassification,
        PartField::PmType,
        PartField::SmpNumber,
        PartField::FrequencyPm,
        PartField::MaintenanceTimeMinutes,
        PartField::MachineStopRequired,
        PartField::InspectionStandard,
        PartField::FrequencyAm,
        PartField::QaMatrixNo,
        PartField::QmMatrixNo,
        PartField::KaizenType,
        PartField::KaizenNo,
        PartField::StoreroomLocation,
        PartField::Vendor,
    ];

    /// JSON 字段名
    pub fn wire_name(&self) -> &'static str {
        match self {
            PartField::PartNumber => "partNumber",
            PartField::PartName => "partName",
            PartField::SapNumber => "sapNumber",
            PartField::Description => "description",
            PartField::Manufacturer => "manufacturer",
            PartField::ModelNumber => "modelNumber",
            PartField::UnitOfMeasure => "unitOfMeasure",
            PartField::Quantity => "quantity",
            PartField::IsPrimary => "isPrimary",
            PartField::Notes => "notes",
            PartField::ComponentClassification => "componentClassification",
            PartField::PmType => "pmType",
            PartField::SmpNumber => "smpNumber",
            PartField::FrequencyPm => "frequencyPM",
            PartField::MaintenanceTimeMinutes => "maintenanceTimeMinutes",
            PartField::MachineStopRequired => "machineStopRequired",
            PartField::InspectionStandard => "inspectionStandard",
            PartField::FrequencyAm => "frequencyAM",
            PartField::QaMatrixNo => "qaMatrixNo",
            PartField::QmMatrixNo => "qmMatrixNo",
            PartField::KaizenType => "kaizenType",
            PartField::KaizenNo => "kaizenNo",
            PartField::StoreroomLocation => "storeroomLocation",
            PartField::Vendor => "vendor",
        }
    }

    /// 数据库列名
    pub fn column(&self) -> &'static str {
        match self {
            PartField::PartNumber => "part_number",
            PartField::PartName => "part_name",
            PartField::SapNumber => "sap_number",
            PartField::Description => "description",
            PartField::Manufacturer => "manufacturer",
            PartField::ModelNumber => "model_number",
            PartField::UnitOfMeasure => "unit_of_measure",
            PartField::Quantity => "quantity",
            PartField::IsPrimary => "is_primary",
            PartField::Notes => "notes",
            PartField::ComponentClassification => "component_classification",
            PartField::PmType => "pm_type",
            PartField::SmpNumber => "smp_number",
            PartField::FrequencyPm => "frequency_pm",
            PartField::MaintenanceTimeMinutes => "maintenance_time_minutes",
            PartField::MachineStopRequired => "machine_stop_required",
            PartField::InspectionStandard => "inspection_standard",
            PartField::FrequencyAm => "frequency_am",
            PartField::QaMatrixNo => "qa_matrix_no",
            PartField::QmMatrixNo => "qm_matrix_no",
            PartField::KaizenType => "kaizen_type",
            PartField::KaizenNo => "kaizen_no",
            PartField::StoreroomLocation => "storeroom_location",
            PartField::Vendor => "vendor",
        }
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            PartField::SmpNumber
            | PartField::MaintenanceTimeMinutes
            | PartField::QaMatrixNo
            | PartField::QmMatrixNo => FieldKind::Integer,
            PartField::Quantity => FieldKind::Real,
            PartField::IsPrimary => FieldKind::Flag,
            _ => FieldKind::Text,
        }
    }

    /// 该列是否 NOT NULL
    pub fn is_required(&self) -> bool {
        matches!(
            self,
            PartField::PartNumber
                | PartField::PartName
                | PartField::UnitOfMeasure
                | PartField::Quantity
                | PartField::IsPrimary
        )
    }

    /// 按 JSON 字段名查找（大小写敏感）
    pub fn from_wire(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|f| f.wire_name() == name)
    }

    /// 当前值的显示文本（单元格编辑器初始值）
    pub fn display_value(&self, part: &AssetPart) -> String {
        fn text(v: &Option<String>) -> String {
            v.clone().unwrap_or_default()
        }
        fn int(v: &Option<i64>) -> String {
            v.map(|n| n.to_string()).unwrap_or_default()
        }
        match self {
            PartField::PartNumber => part.part_number.clone(),
            PartField::PartName => part.part_name.clone(),
            PartField::SapNumber => text(&part.sap_number),
            PartField::Description => text(&part.description),
            PartField::Manufacturer => text(&part.manufacturer),
            PartField::ModelNumber => text(&part.model_number),
            PartField::UnitOfMeasure => part.unit_of_measure.clone(),
            PartField::Quantity => part.quantity.to_string(),
            PartField::IsPrimary => part.is_primary.to_string(),
            PartField::Notes => text(&part.notes),
            PartField::ComponentClassification => text(&part.component_classification),
            PartField::PmType => text(&part.pm_type),
            PartField::SmpNumber => int(&part.smp_number),
            PartField::FrequencyPm => text(&part.frequency_pm),
            PartField::MaintenanceTimeMinutes => int(&part.maintenance_time_minutes),
            PartField::MachineStopRequired => text(&part.machine_stop_required),
            PartField::InspectionStandard => text(&part.inspection_standard),
            PartField::FrequencyAm => text(&part.frequency_am),
            PartField::QaMatrixNo => int(&part.qa_matrix_no),
            PartField::QmMatrixNo => int(&part.qm_matrix_no),
            PartField::KaizenType => text(&part.kaizen_type),
            PartField::KaizenNo => text(&part.kaizen_no),
            PartField::StoreroomLocation => text(&part.storeroom_location),
            PartField::Vendor => text(&part.vendor),
        }
    }
}

impl std::fmt::Display for PartField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.wire_name())
    }
}
