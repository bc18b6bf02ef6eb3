// ==========================================
// WCM 设备台账 - 部件仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 约束: 单字段更新只接受 PartField 白名单列
// ==========================================

use crate::domain::asset_part::{AssetPart, PartField};
use crate::repository::db_utils::{format_timestamp, now_timestamp, parse_timestamp};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex};

const PART_COLUMNS: &str = r#"
    id, asset_id, part_number, part_name,
    sap_number, description, manufacturer, model_number,
    unit_of_measure, quantity, is_primary, notes,
    component_classification,
    pm_type, smp_number, frequency_pm, maintenance_time_minutes, machine_stop_required,
    inspection_standard, frequency_am,
    qa_matrix_no, qm_matrix_no,
    kaizen_type, kaizen_no,
    storeroom_location, vendor,
    created_at, updated_at
"#;

// ==========================================
// AssetPartRepository - 部件仓储
// ==========================================
pub struct AssetPartRepository {
    conn: Arc<Mutex<Connection>>,
}

impl AssetPartRepository {
    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    pub fn insert(&self, part: &AssetPart) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let sql = format!(
            "INSERT INTO asset_part ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, \
             ?15, ?16, ?17, ?18, ?19, ?20, ?21, ?22, ?23, ?24, ?25, ?26, ?27, ?28)",
            PART_COLUMNS
        );
        conn.execute(
            &sql,
            params![
                part.id,
                part.asset_id,
                part.part_number,
                part.part_name,
                part.sap_number,
                part.description,
                part.manufacturer,
                part.model_number,
                part.unit_of_measure,
                part.quantity,
                part.is_primary,
                part.notes,
                part.component_classification,
                part.pm_type,
                part.smp_number,
                part.frequency_pm,
                part.maintenance_time_minutes,
                part.machine_stop_required,
                part.inspection_standard,
                part.frequency_am,
                part.qa_matrix_no,
                part.qm_matrix_no,
                part.kaizen_type,
                part.kaizen_no,
                part.storeroom_location,
                part.vendor,
                format_timestamp(&part.created_at),
                format_timestamp(&part.updated_at),
            ],
        )?;
        Ok(())
    }

    /// 整行覆盖（批量导入时更新已有部件）
    ///
    /// id / asset_id / created_at 不变
    pub fn update(&self, part: &AssetPart) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            r#"
            UPDATE asset_part SET
                part_number = ?2, part_name = ?3,
                sap_number = ?4, description = ?5, manufacturer = ?6, model_number = ?7,
                unit_of_measure = ?8, quantity = ?9, is_primary = ?10, notes = ?11,
                component_classification = ?12,
                pm_type = ?13, smp_number = ?14, frequency_pm = ?15,
                maintenance_time_minutes = ?16, machine_stop_required = ?17,
                inspection_standard = ?18, frequency_am = ?19,
                qa_matrix_no = ?20, qm_matrix_no = ?21,
                kaizen_type = ?22, kaizen_no = ?23,
                storeroom_location = ?24, vendor = ?25,
                updated_at = ?26
            WHERE id = ?1
            "#,
            params![
                part.id,
                part.part_number,
                part.part_name,
                part.sap_number,
                part.description,
                part.manufacturer,
                part.model_number,
                part.unit_of_measure,
                part.quantity,
                part.is_primary,
                part.notes,
                part.component_classification,
                part.pm_type,
                part.smp_number,
                part.frequency_pm,
                part.maintenance_time_minutes,
                part.machine_stop_required,
                part.inspection_standard,
                part.frequency_am,
                part.qa_matrix_no,
                part.qm_matrix_no,
                part.kaizen_type,
                part.kaizen_no,
                part.storeroom_location,
                part.vendor,
                format_timestamp(&part.updated_at),
            ],
        )?;
        Ok(affected)
    }

    pub fn find_by_id(&self, id: &str) -> RepositoryResult<Option<AssetPart>> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT {} FROM asset_part WHERE id = ?1", PART_COLUMNS);
        let part = conn
            .query_row(&sql, params![id], map_part_row)
            .optional()?;
        Ok(part)
    }

    /// 设备下的全部部件（台账行顺序）
    pub fn find_by_asset(&self, asset_id: &str) -> RepositoryResult<Vec<AssetPart>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM asset_part WHERE asset_id = ?1 ORDER BY created_at ASC, part_number ASC",
            PART_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let parts = stmt
            .query_map(params![asset_id], map_part_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(parts)
    }

    pub fn find_by_asset_and_part_number(
        &self,
        asset_id: &str,
        part_number: &str,
    ) -> RepositoryResult<Option<AssetPart>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM asset_part WHERE asset_id = ?1 AND part_number = ?2",
            PART_COLUMNS
        );
        let part = conn
            .query_row(&sql, params![asset_id, part_number], map_part_row)
            .optional()?;
        Ok(part)
    }

    /// 按字段更新（动态 SET 列表），同时刷新 updated_at
    ///
    /// # 返回
    /// - 受影响行数（0 表示部件不存在）
    pub fn update_fields(&self, id: &str, changes: &[(PartField, Value)]) -> RepositoryResult<usize> {
        if changes.is_empty() {
            return Ok(0);
        }

        let assignments = changes
            .iter()
            .enumerate()
            .map(|(i, (field, _))| format!("{} = ?{}", field.column(), i + 1))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "UPDATE asset_part SET {}, updated_at = ?{} WHERE id = ?{}",
            assignments,
            changes.len() + 1,
            changes.len() + 2
        );

        let mut values: Vec<Value> = changes.iter().map(|(_, v)| v.clone()).collect();
        values.push(Value::Text(format_timestamp(&now_timestamp())));
        values.push(Value::Text(id.to_string()));

        let conn = self.get_conn()?;
        let affected = conn.execute(&sql, params_from_iter(values))?;
        Ok(affected)
    }

    /// 删除部件（不触碰维护任务）
    pub fn delete(&self, id: &str) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let affected = conn.execute("DELETE FROM asset_part WHERE id = ?1", params![id])?;
        Ok(affected)
    }
}

fn map_part_row(row: &Row<'_>) -> rusqlite::Result<AssetPart> {
    Ok(AssetPart {
        id: row.get(0)?,
        asset_id: row.get(1)?,
        part_number: row.get(2)?,
        part_name: row.get(3)?,
        sap_number: row.get(4)?,
        description: row.get(5)?,
        manufacturer: row.get(6)?,
        model_number: row.get(7)?,
        unit_of_measure: row.get(8)?,
        quantity: row.get(9)?,
        is_primary: row.get(10)?,
        notes: row.get(11)?,
        component_classification: row.get(12)?,
        pm_type: row.get(13)?,
        smp_number: row.get(14)?,
        frequency_pm: row.get(15)?,
        maintenance_time_minutes: row.get(16)?,
        machine_stop_required: row.get(17)?,
        inspection_standard: row.get(18)?,
        frequency_am: row.get(19)?,
        qa_matrix_no: row.get(20)?,
        qm_matrix_no: row.get(21)?,
        kaizen_type: row.get(22)?,
        kaizen_no: row.get(23)?,
        storeroom_location: row.get(24)?,
        vendor: row.get(25)?,
        created_at: parse_timestamp(&row.get::<_, String>(26)?),
        updated_at: parse_timestamp(&row.get::<_, String>(27)?),
    })
}
