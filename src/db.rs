// ==========================================
// WCM 设备台账 - SQLite 连接初始化与建表
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为
// - 统一 busy_timeout，减少并发写入时的偶发 busy 错误
// - 提供幂等建表（CREATE TABLE IF NOT EXISTS）
// ==========================================

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 当前代码所期望的 schema_version
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

/// 建表语句
///
/// maintenance_schedule 不对 asset_part 建外键: 删除部件后允许保留孤儿任务
pub const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY,
    applied_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS config_kv (
    scope_id TEXT NOT NULL,
    key TEXT NOT NULL,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL DEFAULT (datetime('now')),
    PRIMARY KEY (scope_id, key)
);

CREATE TABLE IF NOT EXISTS asset (
    id TEXT PRIMARY KEY,
    asset_number TEXT NOT NULL UNIQUE,
    name TEXT NOT NULL,
    location TEXT,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS asset_part (
    id TEXT PRIMARY KEY,
    asset_id TEXT NOT NULL REFERENCES asset(id),
    part_number TEXT NOT NULL,
    part_name TEXT NOT NULL,
    sap_number TEXT,
    description TEXT,
    manufacturer TEXT,
    model_number TEXT,
    unit_of_measure TEXT NOT NULL DEFAULT 'EA',
    quantity REAL NOT NULL DEFAULT 1,
    is_primary INTEGER NOT NULL DEFAULT 0,
    notes TEXT,
    component_classification TEXT,
    pm_type TEXT,
    smp_number INTEGER,
    frequency_pm TEXT,
    maintenance_time_minutes INTEGER,
    machine_stop_required TEXT,
    inspection_standard TEXT,
    frequency_am TEXT,
    qa_matrix_no INTEGER,
    qm_matrix_no INTEGER,
    kaizen_type TEXT,
    kaizen_no TEXT,
    storeroom_location TEXT,
    vendor TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    UNIQUE (asset_id, part_number)
);

CREATE INDEX IF NOT EXISTS idx_asset_part_asset ON asset_part(asset_id);

CREATE TABLE IF NOT EXISTS maintenance_schedule (
    id TEXT PRIMARY KEY,
    asset_part_id TEXT NOT NULL,
    asset_id TEXT NOT NULL,
    year INTEGER NOT NULL,
    week_number INTEGER NOT NULL CHECK (week_number BETWEEN 1 AND 52),
    maintenance_type TEXT NOT NULL CHECK (maintenance_type IN ('PM', 'AM', 'QM', 'GM')),
    status TEXT NOT NULL DEFAULT 'planned'
        CHECK (status IN ('planned', 'completed', 'skipped', 'overdue')),
    part_number TEXT,
    part_name TEXT,
    completed_date TEXT,
    notes TEXT,
    source TEXT NOT NULL DEFAULT 'AUTO',
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_schedule_asset_year ON maintenance_schedule(asset_id, year);
CREATE INDEX IF NOT EXISTS idx_schedule_part ON maintenance_schedule(asset_part_id);
CREATE INDEX IF NOT EXISTS idx_schedule_status ON maintenance_schedule(status);
"#;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：
/// - foreign_keys 需要“每个连接”单独开启
/// - busy_timeout 需要“每个连接”单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 建表（幂等）并登记 schema_version
pub fn ensure_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_SQL)?;
    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        [CURRENT_SCHEMA_VERSION],
    )?;
    Ok(())
}

/// 读取 schema_version（若表不存在则返回 None）
pub fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<i64>> {
    let has_table: bool = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version' LIMIT 1",
            [],
            |_row| Ok(true),
        )
        .optional()?
        .unwrap_or(false);

    if !has_table {
        return Ok(None);
    }

    let v: Option<i64> =
        conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
    Ok(v)
}
