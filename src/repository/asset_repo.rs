// ==========================================
// WCM 设备台账 - 设备仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================

use crate::domain::asset_part::Asset;
use crate::repository::db_utils::{format_timestamp, parse_timestamp};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex};

// ==========================================
// AssetRepository - 设备仓储
// ==========================================
pub struct AssetRepository {
    conn: Arc<Mutex<Connection>>,
}

impl AssetRepository {
    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    pub fn insert(&self, asset: &Asset) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO asset (id, asset_number, name, location, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                asset.id,
                asset.asset_number,
                asset.name,
                asset.location,
                format_timestamp(&asset.created_at),
            ],
        )?;
        Ok(())
    }

    pub fn find_by_id(&self, id: &str) -> RepositoryResult<Option<Asset>> {
        let conn = self.get_conn()?;
        let asset = conn
            .query_row(
                r#"
                SELECT id, asset_number, name, location, created_at
                FROM asset
                WHERE id = ?1
                "#,
                params![id],
                map_asset_row,
            )
            .optional()?;
        Ok(asset)
    }

    /// 全部设备（按设备编号排序）
    pub fn list(&self) -> RepositoryResult<Vec<Asset>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, asset_number, name, location, created_at
            FROM asset
            ORDER BY asset_number ASC
            "#,
        )?;
        let assets = stmt
            .query_map([], map_asset_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(assets)
    }
}

fn map_asset_row(row: &Row<'_>) -> rusqlite::Result<Asset> {
    Ok(Asset {
        id: row.get(0)?,
        asset_number: row.get(1)?,
        name: row.get(2)?,
        location: row.get(3)?,
        created_at: parse_timestamp(&row.get::<_, String>(4)?),
    })
}
