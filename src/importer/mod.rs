// ==========================================
// WCM 设备台账 - 导入层
// ==========================================
// 职责: 部件表格（CSV / Excel）→ NewAssetPart 列表
// 写库由 AssetPartApi::bulk_add_parts 完成
// ==========================================

pub mod error;
pub mod field_mapper;
pub mod file_parser;

pub use error::{ImportError, ImportResult};
pub use field_mapper::PartFieldMapper;
pub use file_parser::{CsvParser, ExcelParser, FileParser, RawRecord, UniversalFileParser};

use crate::domain::asset_part::NewAssetPart;
use std::path::Path;

/// 解析 CSV 正文
pub fn parse_parts_csv(text: &str) -> ImportResult<Vec<NewAssetPart>> {
    let records = CsvParser.parse_str(text)?;
    Ok(PartFieldMapper.map_records(&records))
}

/// 按扩展名解析部件文件（.csv / .xlsx）
pub fn load_parts_file<P: AsRef<Path>>(path: P) -> ImportResult<Vec<NewAssetPart>> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }
    let records = UniversalFileParser.parse(path)?;
    tracing::debug!(file = %path.display(), rows = records.len(), "部件文件解析完成");
    Ok(PartFieldMapper.map_records(&records))
}
