// ==========================================
// WCM 设备台账 - 维护任务仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 幂等: 批量写入使用 INSERT OR IGNORE（主键为确定性 ID）
// 事务: 批量写入在单个事务内完成，失败整体回滚
// ==========================================

use crate::domain::schedule::MaintenanceSchedule;
use crate::domain::types::{MaintenanceType, ScheduleSource, ScheduleStatus};
use crate::repository::db_utils::{
    format_date, format_timestamp, now_timestamp, parse_date, parse_timestamp,
};
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex};

const SCHEDULE_COLUMNS: &str = r#"
    id, asset_part_id, asset_id, year, week_number, maintenance_type, status,
    part_number, part_name, completed_date, notes, source, created_at, updated_at
"#;

const INSERT_OR_IGNORE_SQL: &str = r#"
    INSERT OR IGNORE INTO maintenance_schedule (
        id, asset_part_id, asset_id, year, week_number, maintenance_type, status,
        part_number, part_name, completed_date, notes, source, created_at, updated_at
    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
"#;

// ==========================================
// MaintenanceScheduleRepository - 维护任务仓储
// ==========================================
pub struct MaintenanceScheduleRepository {
    conn: Arc<Mutex<Connection>>,
}

impl MaintenanceScheduleRepository {
    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 设备某年的全部任务（按周、类型排序）
    pub fn find_by_asset_year(
        &self,
        asset_id: &str,
        year: i32,
    ) -> RepositoryResult<Vec<MaintenanceSchedule>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM maintenance_schedule \
             WHERE asset_id = ?1 AND year = ?2 \
             ORDER BY week_number ASC, maintenance_type ASC, asset_part_id ASC",
            SCHEDULE_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params![asset_id, year], map_schedule_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    pub fn find_by_id(&self, id: &str) -> RepositoryResult<Option<MaintenanceSchedule>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM maintenance_schedule WHERE id = ?1",
            SCHEDULE_COLUMNS
        );
        let row = conn
            .query_row(&sql, params![id], map_schedule_row)
            .optional()?;
        Ok(row)
    }

    /// 批量写入（INSERT OR IGNORE，单事务）
    ///
    /// # 返回
    /// - 实际新增的行数（已存在的 ID 不计入）
    pub fn insert_or_ignore_batch(&self, rows: &[MaintenanceSchedule]) -> RepositoryResult<usize> {
        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        let mut inserted = 0;
        {
            let mut stmt = tx.prepare(INSERT_OR_IGNORE_SQL)?;
            for row in rows {
                inserted += stmt.execute(params![
                    row.id,
                    row.asset_part_id,
                    row.asset_id,
                    row.year,
                    row.week_number,
                    row.maintenance_type.as_str(),
                    row.status.as_str(),
                    row.part_number,
                    row.part_name,
                    row.completed_date.as_ref().map(format_date),
                    row.notes,
                    row.source.as_str(),
                    format_timestamp(&row.created_at),
                    format_timestamp(&row.updated_at),
                ])?;
            }
        }

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        Ok(inserted)
    }

    /// 单条写入（ID 冲突时报唯一约束错误）
    pub fn insert(&self, row: &MaintenanceSchedule) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let sql = format!(
            "INSERT INTO maintenance_schedule ({}) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
            SCHEDULE_COLUMNS
        );
        conn.execute(
            &sql,
            params![
                row.id,
                row.asset_part_id,
                row.asset_id,
                row.year,
                row.week_number,
                row.maintenance_type.as_str(),
                row.status.as_str(),
                row.part_number,
                row.part_name,
                row.completed_date.as_ref().map(format_date),
                row.notes,
                row.source.as_str(),
                format_timestamp(&row.created_at),
                format_timestamp(&row.updated_at),
            ],
        )?;
        Ok(())
    }

    /// 覆盖状态 / 完成日期 / 备注
    pub fn update_task(
        &self,
        id: &str,
        status: ScheduleStatus,
        completed_date: Option<NaiveDate>,
        notes: Option<&str>,
    ) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            r#"
            UPDATE maintenance_schedule
            SET status = ?2, completed_date = ?3, notes = ?4, updated_at = ?5
            WHERE id = ?1
            "#,
            params![
                id,
                status.as_str(),
                completed_date.as_ref().map(format_date),
                notes,
                format_timestamp(&now_timestamp()),
            ],
        )?;
        Ok(affected)
    }

    pub fn delete(&self, id: &str) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let affected = conn.execute("DELETE FROM maintenance_schedule WHERE id = ?1", params![id])?;
        Ok(affected)
    }

    /// 删除某部件的全部任务（级联删除策略）
    pub fn delete_by_part(&self, asset_part_id: &str) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "DELETE FROM maintenance_schedule WHERE asset_part_id = ?1",
            params![asset_part_id],
        )?;
        Ok(affected)
    }

    pub fn count_by_part(&self, asset_part_id: &str) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM maintenance_schedule WHERE asset_part_id = ?1",
            params![asset_part_id],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    /// 孤儿任务数（部件已删除但任务仍在）
    pub fn count_orphans(&self, asset_id: &str, year: i32) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let count: i64 = conn.query_row(
            r#"
            SELECT COUNT(*)
            FROM maintenance_schedule s
            LEFT JOIN asset_part p ON p.id = s.asset_part_id
            WHERE s.asset_id = ?1 AND s.year = ?2 AND p.id IS NULL
            "#,
            params![asset_id, year],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }
}

fn map_schedule_row(row: &Row<'_>) -> rusqlite::Result<MaintenanceSchedule> {
    let type_raw: String = row.get(5)?;
    let maintenance_type = MaintenanceType::parse(&type_raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            5,
            rusqlite::types::Type::Text,
            format!("未知维护类型: {}", type_raw).into(),
        )
    })?;

    Ok(MaintenanceSchedule {
        id: row.get(0)?,
        asset_part_id: row.get(1)?,
        asset_id: row.get(2)?,
        year: row.get(3)?,
        week_number: row.get(4)?,
        maintenance_type,
        status: ScheduleStatus::from_db_str(&row.get::<_, String>(6)?),
        part_number: row.get(7)?,
        part_name: row.get(8)?,
        completed_date: row
            .get::<_, Option<String>>(9)?
            .and_then(|s| parse_date(&s)),
        notes: row.get(10)?,
        source: ScheduleSource::from_db_str(&row.get::<_, String>(11)?),
        created_at: parse_timestamp(&row.get::<_, String>(12)?),
        updated_at: parse_timestamp(&row.get::<_, String>(13)?),
    })
}
