// ==========================================
// WCM 设备台账 - 应用状态
// ==========================================
// 职责: 打开数据库、建表，组装 Repository 与 API 实例
// HTTP 路由与本地会话共享同一个 AppState
// ==========================================

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::api::{AssetApi, AssetPartApi, LedgerApi, MaintenanceScheduleApi};
use crate::config::config_manager::ConfigManager;
use crate::db::{ensure_schema, open_sqlite_connection};
use crate::repository::{
    asset_part_repo::AssetPartRepository, asset_repo::AssetRepository,
    schedule_repo::MaintenanceScheduleRepository,
};

/// 应用状态
///
/// 所有 API 共享一个 SQLite 连接
pub struct AppState {
    /// 数据库路径（内存库为 `:memory:`）
    pub db_path: String,

    pub asset_api: Arc<AssetApi>,
    pub part_api: Arc<AssetPartApi>,
    pub schedule_api: Arc<MaintenanceScheduleApi>,
    pub ledger_api: Arc<LedgerApi>,

    /// 配置管理器（状态规则 / 删除策略 / 默认语言）
    pub config: Arc<ConfigManager>,
}

impl AppState {
    /// 打开（必要时创建）数据库并初始化全部 API
    ///
    /// # 返回
    /// - Err(String): 打开数据库或建表失败
    pub fn new(db_path: &str) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        let conn = open_sqlite_connection(db_path).map_err(|e| format!("无法打开数据库: {}", e))?;
        let mut state = Self::from_connection(conn)?;
        state.db_path = db_path.to_string();
        Ok(state)
    }

    /// 基于已有连接初始化（测试使用内存库）
    pub fn from_connection(conn: Connection) -> Result<Self, String> {
        ensure_schema(&conn).map_err(|e| format!("数据库建表失败: {}", e))?;
        let conn = Arc::new(Mutex::new(conn));

        // ==========================================
        // 初始化Repository层
        // ==========================================
        let asset_repo = Arc::new(AssetRepository::from_connection(conn.clone()));
        let part_repo = Arc::new(AssetPartRepository::from_connection(conn.clone()));
        let schedule_repo = Arc::new(MaintenanceScheduleRepository::from_connection(conn.clone()));

        let config = Arc::new(
            ConfigManager::from_connection(conn.clone())
                .map_err(|e| format!("无法创建ConfigManager: {}", e))?,
        );

        // ==========================================
        // 初始化API层
        // ==========================================
        let asset_api = Arc::new(AssetApi::new(asset_repo.clone()));
        let part_api = Arc::new(AssetPartApi::new(
            asset_repo.clone(),
            part_repo.clone(),
            schedule_repo.clone(),
            config.clone(),
        ));
        let schedule_api = Arc::new(MaintenanceScheduleApi::new(
            schedule_repo.clone(),
            part_repo.clone(),
            config.clone(),
        ));
        let ledger_api = Arc::new(LedgerApi::new(asset_repo, part_repo, schedule_repo, config.clone()));

        tracing::info!("AppState初始化成功");

        Ok(Self {
            db_path: ":memory:".to_string(),
            asset_api,
            part_api,
            schedule_api,
            ledger_api,
            config,
        })
    }
}

/// 默认数据库路径
///
/// 优先读取环境变量 `WCM_LEDGER_DB_PATH`，否则落在用户数据目录下
pub fn get_default_db_path() -> String {
    use std::path::PathBuf;

    if let Ok(path) = std::env::var("WCM_LEDGER_DB_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./wcm_ledger.db");

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("wcm-ledger");
        // 目录创建失败时回退到当前目录
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("wcm_ledger.db");
        }
    }

    path.to_string_lossy().to_string()
}
