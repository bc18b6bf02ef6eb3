// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 临时数据库、测试环境（AppState）与常用数据准备
// ==========================================
#![allow(dead_code)]

use std::error::Error;
use std::sync::Arc;

use tempfile::NamedTempFile;
use wcm_ledger::app::AppState;
use wcm_ledger::domain::{Asset, AssetPart, NewAsset, NewAssetPart};

/// 创建临时测试数据库并初始化 schema
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - String: 数据库文件路径
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file
        .path()
        .to_str()
        .ok_or("临时文件路径不是 UTF-8")?
        .to_string();

    let conn = wcm_ledger::db::open_sqlite_connection(&db_path)?;
    wcm_ledger::db::ensure_schema(&conn)?;

    Ok((temp_file, db_path))
}

/// 测试环境: 临时库 + 全部 API
pub struct TestEnv {
    _temp_file: NamedTempFile,
    pub db_path: String,
    pub state: Arc<AppState>,
}

impl TestEnv {
    pub fn new() -> Result<Self, Box<dyn Error>> {
        wcm_ledger::logging::init_test();
        let (temp_file, db_path) = create_test_db()?;
        let state = AppState::new(&db_path)?;
        Ok(Self {
            _temp_file: temp_file,
            db_path,
            state: Arc::new(state),
        })
    }

    pub fn create_asset(&self, id: &str) -> Asset {
        self.state
            .asset_api
            .create_asset(&NewAsset {
                id: Some(id.to_string()),
                asset_number: format!("NO-{}", id),
                name: format!("Asset {}", id),
                location: Some("Line 1".to_string()),
            })
            .expect("创建设备失败")
    }

    /// 接受 `NewAssetPart` 或任何可转换的构建器（如 `PartBuilder`）
    pub fn add_part(&self, part: impl Into<NewAssetPart>) -> AssetPart {
        self.state
            .part_api
            .add_part(&part.into())
            .expect("新增部件失败")
    }
}
