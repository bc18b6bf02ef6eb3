// ==========================================
// WCM 设备台账 - 部件字段映射器
// ==========================================
// 职责: 导入表格的原始行 → NewAssetPart
// 列名: 接受 camelCase（partNumber）与模板表头 PascalCase（PartNumber）
// ==========================================

use crate::domain::asset_part::{FieldKind, NewAssetPart, PartField};
use crate::engine::cell_editor::{parse_float_prefix, parse_int_prefix};
use crate::importer::file_parser::RawRecord;

/// 模板表头（PascalCase）别名
fn template_header(field: PartField) -> &'static str {
    match field {
        PartField::PartNumber => "PartNumber",
        PartField::PartName => "PartName",
        PartField::SapNumber => "SAPNumber",
        PartField::Description => "Description",
        PartField::Manufacturer => "Manufacturer",
        PartField::ModelNumber => "ModelNumber",
        PartField::UnitOfMeasure => "UnitOfMeasure",
        PartField::Quantity => "Quantity",
        PartField::IsPrimary => "IsPrimary",
        PartField::Notes => "Notes",
        PartField::ComponentClassification => "ComponentClassification",
        PartField::PmType => "PMType",
        PartField::SmpNumber => "SMPNumber",
        PartField::FrequencyPm => "FrequencyPM",
        PartField::MaintenanceTimeMinutes => "MaintenanceTimeMinutes",
        PartField::MachineStopRequired => "MachineStopRequired",
        PartField::InspectionStandard => "InspectionStandard",
        PartField::FrequencyAm => "FrequencyAM",
        PartField::QaMatrixNo => "QAMatrixNo",
        PartField::QmMatrixNo => "QMMatrixNo",
        PartField::KaizenType => "KaizenType",
        PartField::KaizenNo => "KaizenNo",
        PartField::StoreroomLocation => "StoreroomLocation",
        PartField::Vendor => "Vendor",
    }
}

pub struct PartFieldMapper;

impl PartFieldMapper {
    /// 映射一行
    ///
    /// 缺少部件编号 / 名称的行照常返回，由批量新增逐行报告失败
    pub fn map_record(&self, row: &RawRecord) -> NewAssetPart {
        let text = |field| self.get_string(row, field);
        let int = |field| self.get_i64(row, field);

        NewAssetPart {
            asset_id: String::new(),
            part_number: text(PartField::PartNumber),
            part_name: text(PartField::PartName),
            sap_number: text(PartField::SapNumber),
            description: text(PartField::Description),
            manufacturer: text(PartField::Manufacturer),
            model_number: text(PartField::ModelNumber),
            unit_of_measure: Some(text(PartField::UnitOfMeasure).unwrap_or_else(|| "EA".to_string())),
            quantity: Some(self.get_quantity(row)),
            is_primary: self.get_flag(row, PartField::IsPrimary),
            notes: text(PartField::Notes),
            component_classification: text(PartField::ComponentClassification),
            pm_type: text(PartField::PmType),
            smp_number: int(PartField::SmpNumber),
            frequency_pm: text(PartField::FrequencyPm),
            maintenance_time_minutes: int(PartField::MaintenanceTimeMinutes),
            machine_stop_required: text(PartField::MachineStopRequired),
            inspection_standard: text(PartField::InspectionStandard),
            frequency_am: text(PartField::FrequencyAm),
            qa_matrix_no: int(PartField::QaMatrixNo),
            qm_matrix_no: int(PartField::QmMatrixNo),
            kaizen_type: text(PartField::KaizenType),
            kaizen_no: text(PartField::KaizenNo),
            storeroom_location: text(PartField::StoreroomLocation),
            vendor: text(PartField::Vendor),
        }
    }

    pub fn map_records(&self, rows: &[RawRecord]) -> Vec<NewAssetPart> {
        rows.iter().map(|row| self.map_record(row)).collect()
    }

    /// 先取 camelCase 列，为空再取模板表头
    fn get_string(&self, row: &RawRecord, field: PartField) -> Option<String> {
        [field.wire_name(), template_header(field)]
            .into_iter()
            .filter_map(|key| row.get(key))
            .map(|v| v.trim())
            .find(|v| !v.is_empty())
            .map(str::to_string)
    }

    fn get_i64(&self, row: &RawRecord, field: PartField) -> Option<i64> {
        debug_assert_eq!(field.kind(), FieldKind::Integer);
        self.get_string(row, field).and_then(|v| parse_int_prefix(&v))
    }

    // 空或无法解析 → 1
    fn get_quantity(&self, row: &RawRecord) -> f64 {
        self.get_string(row, PartField::Quantity)
            .and_then(|v| parse_float_prefix(&v))
            .unwrap_or(1.0)
    }

    fn get_flag(&self, row: &RawRecord, field: PartField) -> Option<bool> {
        self.get_string(row, field).map(|v| {
            matches!(
                v.to_ascii_lowercase().as_str(),
                "1" | "true" | "yes" | "y" | "是"
            )
        })
    }
}
