// ==========================================
// WCM 设备台账 - 部件 API
// ==========================================
// 职责: 部件查询 / 新增 / 批量导入 / 单字段修改 / 删除
// 删除: 维护任务按策略处理（ORPHAN 保留 / CASCADE 一并删除）
// ==========================================

use std::sync::Arc;

use rusqlite::types::Value as SqlValue;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{info, warn};
use uuid::Uuid;

use crate::api::error::{ApiError, ApiResult};
use crate::config::ConfigManager;
use crate::domain::asset_part::{AssetPart, FieldKind, NewAssetPart, PartField};
use crate::domain::types::PartDeletePolicy;
use crate::engine::cell_editor::{parse_float_prefix, parse_int_prefix};
use crate::engine::frequency::FrequencyCode;
use crate::importer;
use crate::repository::asset_part_repo::AssetPartRepository;
use crate::repository::asset_repo::AssetRepository;
use crate::repository::db_utils::now_timestamp;
use crate::repository::schedule_repo::MaintenanceScheduleRepository;

/// 批量新增中单行的失败原因
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkAddError {
    pub part: String,
    pub error: String,
}

/// 批量新增结果
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkAddResult {
    pub success: usize,
    pub failed: usize,
    pub errors: Vec<BulkAddError>,
}

/// 删除部件结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemovePartResult {
    pub asset_part_id: String,
    pub policy: PartDeletePolicy,
    pub schedules_deleted: usize,
    pub schedules_orphaned: usize,
}

// ==========================================
// AssetPartApi - 部件 API
// ==========================================
pub struct AssetPartApi {
    asset_repo: Arc<AssetRepository>,
    part_repo: Arc<AssetPartRepository>,
    schedule_repo: Arc<MaintenanceScheduleRepository>,
    config: Arc<ConfigManager>,
}

impl AssetPartApi {
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

    /// 设备下的部件列表（台账行）
    pub fn list_parts(&self, asset_id: &str) -> ApiResult<Vec<AssetPart>> {
        if asset_id.trim().is_empty() {
            return Err(ApiError::InvalidInput("设备ID不能为空".to_string()));
        }
        Ok(self.part_repo.find_by_asset(asset_id)?)
    }

    pub fn get_part(&self, id: &str) -> ApiResult<AssetPart> {
        self.part_repo
            .find_by_id(id)?
            .ok_or_else(|| ApiError::NotFound(format!("部件(id={})不存在", id)))
    }

    /// 新增部件
    ///
    /// 必填: assetId / partNumber / partName / componentClassification
    pub fn add_part(&self, input: &NewAssetPart) -> ApiResult<AssetPart> {
        let asset_id = required(Some(&input.asset_id), "设备ID")?;
        let part_number = required(input.part_number.as_ref(), "部件编号")?;
        let part_name = required(input.part_name.as_ref(), "部件名称")?;
        required(input.component_classification.as_ref(), "ABC分级")?;

        self.ensure_asset(&asset_id)?;
        if self
            .part_repo
            .find_by_asset_and_part_number(&asset_id, &part_number)?
            .is_some()
        {
            return Err(ApiError::Conflict(format!(
                "该设备下已存在部件编号: {}",
                part_number
            )));
        }

        let part = build_part(Uuid::new_v4().to_string(), &asset_id, &part_number, &part_name, input);
        warn_unknown_frequencies(&part);
        self.part_repo.insert(&part)?;
        info!(id = %part.id, asset_id = %asset_id, part_number = %part_number, "部件已新增");
        Ok(part)
    }

    /// 批量新增: 新编号插入，已存在编号整行更新
    ///
    /// 批量导入只要求 partNumber / partName
    pub fn bulk_add_parts(&self, asset_id: &str, inputs: &[NewAssetPart]) -> ApiResult<BulkAddResult> {
        let asset_id = required(Some(&asset_id.to_string()), "设备ID")?;
        self.ensure_asset(&asset_id)?;

        let mut result = BulkAddResult::default();
        for input in inputs {
            let label = input
                .part_number
                .clone()
                .or_else(|| input.part_name.clone())
                .unwrap_or_else(|| "-".to_string());

            match self.upsert_part(&asset_id, input) {
                Ok(_) => result.success += 1,
                Err(e) => {
                    result.failed += 1;
                    result.errors.push(BulkAddError {
                        part: label,
                        error: e.to_string(),
                    });
                }
            }
        }

        info!(
            asset_id = %asset_id,
            success = result.success,
            failed = result.failed,
            "部件批量导入完成"
        );
        Ok(result)
    }

    /// 从 CSV 文本批量导入
    pub fn import_parts_csv(&self, asset_id: &str, csv_text: &str) -> ApiResult<BulkAddResult> {
        let parts =
            importer::parse_parts_csv(csv_text).map_err(|e| ApiError::ImportError(e.to_string()))?;
        self.bulk_add_parts(asset_id, &parts)
    }

    fn upsert_part(&self, asset_id: &str, input: &NewAssetPart) -> ApiResult<AssetPart> {
        let part_number = required(input.part_number.as_ref(), "部件编号")?;
        let part_name = required(input.part_name.as_ref(), "部件名称")?;

        match self
            .part_repo
            .find_by_asset_and_part_number(asset_id, &part_number)?
        {
            Some(existing) => {
                let mut part = build_part(existing.id.clone(), asset_id, &part_number, &part_name, input);
                part.created_at = existing.created_at;
                self.part_repo.update(&part)?;
                Ok(part)
            }
            None => {
                let part = build_part(Uuid::new_v4().to_string(), asset_id, &part_number, &part_name, input);
                self.part_repo.insert(&part)?;
                Ok(part)
            }
        }
    }

    /// 单字段（或少量字段）修改: `{field: value}`
    ///
    /// # 规则
    /// - 字段名为 JSON 名（frequencyPM / smpNumber ...），未知字段拒绝
    /// - 整数字段接受数字或数字字符串，空串 / null → null
    /// - 必填列（partNumber / partName ...）不可置空
    pub fn patch_part(&self, id: &str, patch: &Map<String, Value>) -> ApiResult<AssetPart> {
        if patch.is_empty() {
            return Err(ApiError::InvalidInput("更新内容不能为空".to_string()));
        }
        let existing = self.get_part(id)?;

        let mut changes = Vec::with_capacity(patch.len());
        for (name, value) in patch {
            let field = PartField::from_wire(name)
                .ok_or_else(|| ApiError::InvalidInput(format!("未知字段: {}", name)))?;
            let sql_value = json_to_sql(field, value)?;

            if field.is_required() && sql_value == SqlValue::Null {
                return Err(ApiError::InvalidInput(format!("{}不能为空", field)));
            }
            if field == PartField::PartNumber {
                if let SqlValue::Text(ref number) = sql_value {
                    if let Some(other) = self
                        .part_repo
                        .find_by_asset_and_part_number(&existing.asset_id, number)?
                    {
                        if other.id != existing.id {
                            return Err(ApiError::Conflict(format!(
                                "该设备下已存在部件编号: {}",
                                number
                            )));
                        }
                    }
                }
            }
            changes.push((field, sql_value));
        }

        let affected = self.part_repo.update_fields(id, &changes)?;
        if affected == 0 {
            return Err(ApiError::NotFound(format!("部件(id={})不存在", id)));
        }

        let fields: Vec<&str> = changes.iter().map(|(f, _)| f.wire_name()).collect();
        info!(id = %id, fields = ?fields, "部件字段已更新");
        self.get_part(id)
    }

    /// 删除部件
    ///
    /// # 参数
    /// - policy: None 时取配置 `ledger/part_delete_policy`
    pub fn remove_part(
        &self,
        id: &str,
        policy: Option<PartDeletePolicy>,
    ) -> ApiResult<RemovePartResult> {
        let policy = match policy {
            Some(p) => p,
            None => self
                .config
                .get_part_delete_policy()
                .map_err(|e| ApiError::ConfigError(e.to_string()))?,
        };
        self.get_part(id)?;

        let (schedules_deleted, schedules_orphaned) = match policy {
            PartDeletePolicy::Cascade => (self.schedule_repo.delete_by_part(id)?, 0),
            PartDeletePolicy::Orphan => (0, self.schedule_repo.count_by_part(id)?),
        };
        self.part_repo.delete(id)?;

        info!(
            id = %id,
            policy = %policy,
            deleted = schedules_deleted,
            orphaned = schedules_orphaned,
            "部件已删除"
        );
        Ok(RemovePartResult {
            asset_part_id: id.to_string(),
            policy,
            schedules_deleted,
            schedules_orphaned,
        })
    }

    fn ensure_asset(&self, asset_id: &str) -> ApiResult<()> {
        match self.asset_repo.find_by_id(asset_id)? {
            Some(_) => Ok(()),
            None => Err(ApiError::NotFound(format!("设备(id={})不存在", asset_id))),
        }
    }
}

/// 必填文本（去空格后非空）
fn required(value: Option<&String>, label: &str) -> ApiResult<String> {
    match value.map(|v| v.trim()).filter(|v| !v.is_empty()) {
        Some(v) => Ok(v.to_string()),
        None => Err(ApiError::InvalidInput(format!("{}不能为空", label))),
    }
}

/// 空白文本 → None
fn optional_text(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn build_part(
    id: String,
    asset_id: &str,
    part_number: &str,
    part_name: &str,
    input: &NewAssetPart,
) -> AssetPart {
    let now = now_timestamp();
    AssetPart {
        id,
        asset_id: asset_id.to_string(),
        part_number: part_number.to_string(),
        part_name: part_name.to_string(),
        sap_number: optional_text(&input.sap_number),
        description: optional_text(&input.description),
        manufacturer: optional_text(&input.manufacturer),
        model_number: optional_text(&input.model_number),
        unit_of_measure: optional_text(&input.unit_of_measure).unwrap_or_else(|| "EA".to_string()),
        quantity: input.quantity.unwrap_or(1.0),
        is_primary: input.is_primary.unwrap_or(false),
        notes: optional_text(&input.notes),
        component_classification: optional_text(&input.component_classification),
        pm_type: optional_text(&input.pm_type),
        smp_number: input.smp_number,
        frequency_pm: optional_text(&input.frequency_pm),
        maintenance_time_minutes: input.maintenance_time_minutes,
        machine_stop_required: optional_text(&input.machine_stop_required),
        inspection_standard: optional_text(&input.inspection_standard),
        frequency_am: optional_text(&input.frequency_am),
        qa_matrix_no: input.qa_matrix_no,
        qm_matrix_no: input.qm_matrix_no,
        kaizen_type: optional_text(&input.kaizen_type),
        kaizen_no: optional_text(&input.kaizen_no),
        storeroom_location: optional_text(&input.storeroom_location),
        vendor: optional_text(&input.vendor),
        created_at: now,
        updated_at: now,
    }
}

/// 未识别的频率代码照常保存（生成时不产生任务），只记录告警
fn warn_unknown_frequencies(part: &AssetPart) {
    for (slot, code) in [("PM", &part.frequency_pm), ("AM", &part.frequency_am)] {
        if let Some(code) = code {
            if FrequencyCode::parse(code).is_none() {
                warn!(part_number = %part.part_number, slot = slot, code = %code, "未识别的频率代码");
            }
        }
    }
}

/// JSON 值 → 数据库值（按字段类型）
fn json_to_sql(field: PartField, value: &Value) -> ApiResult<SqlValue> {
    let invalid = || ApiError::InvalidInput(format!("字段{}的值无效: {}", field, value));

    let sql = match (field.kind(), value) {
        (_, Value::Null) => SqlValue::Null,
        (FieldKind::Integer, Value::Number(n)) => match n.as_i64() {
            Some(i) => SqlValue::Integer(i),
            None => SqlValue::Integer(n.as_f64().ok_or_else(invalid)?.trunc() as i64),
        },
        (FieldKind::Integer, Value::String(s)) => {
            if s.trim().is_empty() {
                SqlValue::Null
            } else {
                SqlValue::Integer(parse_int_prefix(s).ok_or_else(invalid)?)
            }
        }
        (FieldKind::Real, Value::Number(n)) => SqlValue::Real(n.as_f64().ok_or_else(invalid)?),
        (FieldKind::Real, Value::String(s)) => {
            if s.trim().is_empty() {
                SqlValue::Null
            } else {
                SqlValue::Real(parse_float_prefix(s).ok_or_else(invalid)?)
            }
        }
        (FieldKind::Flag, Value::Bool(b)) => SqlValue::Integer(i64::from(*b)),
        (FieldKind::Text, Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                SqlValue::Null
            } else {
                SqlValue::Text(trimmed.to_string())
            }
        }
        (FieldKind::Text, Value::Number(n)) => SqlValue::Text(n.to_string()),
        _ => return Err(invalid()),
    };
    Ok(sql)
}
