// ==========================================
// WCM 设备台账 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::types::PartDeletePolicy;
use crate::engine::status_rule::StatusRule;
use rusqlite::{params, Connection};
use serde_json::json;
use std::collections::BTreeMap;
use std::error::Error;
use std::sync::{Arc, Mutex};

// ==========================================
// 配置键
// ==========================================
pub mod config_keys {
    /// 删除部件时维护任务的处理方式: ORPHAN / CASCADE
    pub const PART_DELETE_POLICY: &str = "ledger/part_delete_policy";
    /// 生成时状态规则: CALENDAR / SEED_WEEK
    pub const STATUS_RULE: &str = "ledger/status_rule";
    /// 台账默认语言: en / zh-CN
    pub const DEFAULT_LOCALE: &str = "ledger/default_locale";

    pub const ALL: [&str; 3] = [PART_DELETE_POLICY, STATUS_RULE, DEFAULT_LOCALE];
}

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> Result<Self, Box<dyn Error>> {
        let conn = open_sqlite_connection(db_path)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：为保证连接行为一致，会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, Box<dyn Error>> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    fn get_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// 读取 global scope 的配置值
    pub fn get_global_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        self.get_config_value(key)
    }

    /// 写入 global scope 的配置值（UPSERT）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value, updated_at)
             VALUES ('global', ?1, ?2, datetime('now'))
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;
        Ok(())
    }

    fn get_config_or_default(&self, key: &str, default: &str) -> Result<String, Box<dyn Error>> {
        Ok(self.get_config_value(key)?.unwrap_or_else(|| default.to_string()))
    }

    // ===== 台账配置 =====

    /// 部件删除策略（默认 ORPHAN）
    pub fn get_part_delete_policy(&self) -> Result<PartDeletePolicy, Box<dyn Error>> {
        let value = self.get_config_or_default(config_keys::PART_DELETE_POLICY, "ORPHAN")?;
        Ok(PartDeletePolicy::parse(&value).unwrap_or_else(|| {
            tracing::warn!(
                config_key = config_keys::PART_DELETE_POLICY,
                raw_value = %value,
                "部件删除策略配置无效，使用 ORPHAN"
            );
            PartDeletePolicy::Orphan
        }))
    }

    /// 生成时状态规则（默认 CALENDAR）
    pub fn get_status_rule(&self) -> Result<StatusRule, Box<dyn Error>> {
        let value = self.get_config_or_default(config_keys::STATUS_RULE, "CALENDAR")?;
        Ok(StatusRule::parse(&value).unwrap_or_else(|| {
            tracing::warn!(
                config_key = config_keys::STATUS_RULE,
                raw_value = %value,
                "状态规则配置无效，使用 CALENDAR"
            );
            StatusRule::Calendar
        }))
    }

    /// 台账默认语言（默认 en）
    pub fn get_default_locale(&self) -> Result<String, Box<dyn Error>> {
        let value = self.get_config_or_default(config_keys::DEFAULT_LOCALE, "en")?;
        Ok(crate::i18n::normalize_locale(&value).to_string())
    }

    /// 获取所有配置的快照（JSON格式）
    ///
    /// 未写入的台账配置以默认值出现
    pub fn get_config_snapshot(&self) -> Result<String, Box<dyn Error>> {
        let mut config_map: BTreeMap<String, String> = BTreeMap::new();
        config_map.insert(
            config_keys::PART_DELETE_POLICY.to_string(),
            self.get_part_delete_policy()?.to_string(),
        );
        config_map.insert(
            config_keys::STATUS_RULE.to_string(),
            self.get_status_rule()?.to_string(),
        );
        config_map.insert(
            config_keys::DEFAULT_LOCALE.to_string(),
            self.get_default_locale()?,
        );

        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;
        for row in rows {
            let (key, value) = row?;
            config_map.entry(key).or_insert(value);
        }

        Ok(serde_json::to_string(&json!(config_map))?)
    }
}
