// ==========================================
// 部件表格导入（CSV / Excel）
// ==========================================
// 用法: import_asset_parts <db_path> <asset_id> <file>
// 已存在的部件编号更新，其余新增
// ==========================================

use anyhow::{bail, Context};

use wcm_ledger::app::AppState;
use wcm_ledger::importer;
use wcm_ledger::logging;

fn main() -> anyhow::Result<()> {
    logging::init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() != 4 {
        bail!("用法: {} <db_path> <asset_id> <file.csv|file.xlsx>", args[0]);
    }
    let (db_path, asset_id, file) = (&args[1], &args[2], &args[3]);

    let parts = importer::load_parts_file(file).with_context(|| format!("解析失败: {}", file))?;
    tracing::info!(file = %file, rows = parts.len(), "部件文件已读取");

    let state = AppState::new(db_path).map_err(anyhow::Error::msg)?;
    let result = state.part_api.bulk_add_parts(asset_id, &parts)?;

    println!("success: {}", result.success);
    println!("failed:  {}", result.failed);
    for err in &result.errors {
        println!("  {}: {}", err.part, err.error);
    }
    Ok(())
}
