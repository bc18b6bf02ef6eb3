// ==========================================
// 演示数据: 重建数据库并写入两台设备、部件与当年计划
// ==========================================
// 用法: seed_demo_ledger [db_path] [year]
// 状态按 SEED_WEEK 规则（第 1-2 周已完成，第 3-4 周逾期，其余计划中）
// ==========================================

use std::fs;
use std::path::Path;

use anyhow::Context;
use chrono::{Datelike, Local};

use wcm_ledger::app::{get_default_db_path, AppState};
use wcm_ledger::domain::{GenerateScheduleRequest, NewAsset, NewAssetPart};
use wcm_ledger::engine::StatusRule;
use wcm_ledger::logging;

struct DemoPart {
    part_number: &'static str,
    part_name: &'static str,
    sap_number: &'static str,
    classification: &'static str,
    smp_number: i64,
    frequency_pm: &'static str,
    frequency_am: &'static str,
    minutes: i64,
    storeroom: &'static str,
    vendor: &'static str,
}

const CNC_PARTS: &[DemoPart] = &[
    DemoPart { part_number: "SPD-8000-A", part_name: "Main Spindle Assembly", sap_number: "SAP-100234", classification: "Critical", smp_number: 101, frequency_pm: "3M", frequency_am: "1W", minutes: 240, storeroom: "A-01-03", vendor: "Fanuc" },
    DemoPart { part_number: "CPP-2500-B", part_name: "Coolant Pump", sap_number: "SAP-100567", classification: "Important", smp_number: 102, frequency_pm: "6M", frequency_am: "2W", minutes: 90, storeroom: "A-02-11", vendor: "Grundfos" },
    DemoPart { part_number: "BSC-4040-X", part_name: "X-Axis Ball Screw", sap_number: "SAP-101234", classification: "Critical", smp_number: 103, frequency_pm: "12M", frequency_am: "1M", minutes: 180, storeroom: "A-03-02", vendor: "THK" },
    DemoPart { part_number: "SVM-750-Y", part_name: "Y-Axis Servo Motor", sap_number: "SAP-102456", classification: "Critical", smp_number: 104, frequency_pm: "6M", frequency_am: "1M", minutes: 120, storeroom: "A-03-07", vendor: "Siemens" },
    DemoPart { part_number: "ATC-24-PRO", part_name: "Automatic Tool Changer", sap_number: "SAP-103789", classification: "Important", smp_number: 105, frequency_pm: "3M", frequency_am: "1W", minutes: 60, storeroom: "A-04-01", vendor: "Haas" },
];

const PRESS_PARTS: &[DemoPart] = &[
    DemoPart { part_number: "HYC-500T-MAIN", part_name: "Main Hydraulic Cylinder", sap_number: "SAP-200123", classification: "Critical", smp_number: 201, frequency_pm: "3M", frequency_am: "1W", minutes: 180, storeroom: "B-01-01", vendor: "Bosch Rexroth" },
    DemoPart { part_number: "PRV-500-SAFE", part_name: "Pressure Relief Valve", sap_number: "SAP-200456", classification: "Critical", smp_number: 202, frequency_pm: "6M", frequency_am: "1M", minutes: 90, storeroom: "B-01-04", vendor: "Parker" },
    DemoPart { part_number: "FLT-HYD-10", part_name: "Hydraulic Oil Filter", sap_number: "SAP-200789", classification: "Standard", smp_number: 203, frequency_pm: "1M", frequency_am: "", minutes: 30, storeroom: "B-02-09", vendor: "Hydac" },
    DemoPart { part_number: "GRD-LT-02", part_name: "Light Curtain", sap_number: "SAP-201010", classification: "Important", smp_number: 204, frequency_pm: "24M", frequency_am: "1W", minutes: 45, storeroom: "B-03-02", vendor: "Sick" },
];

fn main() -> anyhow::Result<()> {
    logging::init();

    let db_path = std::env::args().nth(1).unwrap_or_else(get_default_db_path);
    let year = std::env::args()
        .nth(2)
        .and_then(|s| s.parse::<i32>().ok())
        .unwrap_or_else(|| Local::now().year());

    backup_and_reset_db(&db_path)?;
    let state = AppState::new(&db_path).map_err(anyhow::Error::msg)?;

    seed_asset(&state, "asset-cnc-mill-001", "CNC-001", "CNC Milling Machine", "Line 1", CNC_PARTS, year)?;
    seed_asset(&state, "asset-press-003", "PRS-003", "Hydraulic Press 500T", "Line 3", PRESS_PARTS, year)?;

    eprintln!("Seeded {} ({})", db_path, year);
    Ok(())
}

fn backup_and_reset_db(db_path: &str) -> anyhow::Result<()> {
    let path = Path::new(db_path);
    if !path.exists() {
        return Ok(());
    }

    let ts = Local::now().format("%Y%m%d_%H%M%S").to_string();
    let backup_path = format!("{}.bak.{}", db_path, ts);
    fs::copy(path, &backup_path).with_context(|| format!("备份失败: {}", backup_path))?;
    fs::remove_file(path)?;

    eprintln!("Backed up {} -> {}", db_path, backup_path);
    Ok(())
}

fn seed_asset(
    state: &AppState,
    id: &str,
    asset_number: &str,
    name: &str,
    location: &str,
    parts: &[DemoPart],
    year: i32,
) -> anyhow::Result<()> {
    state.asset_api.create_asset(&NewAsset {
        id: Some(id.to_string()),
        asset_number: asset_number.to_string(),
        name: name.to_string(),
        location: Some(location.to_string()),
    })?;

    let inputs: Vec<NewAssetPart> = parts
        .iter()
        .map(|p| NewAssetPart {
            asset_id: id.to_string(),
            part_number: Some(p.part_number.to_string()),
            part_name: Some(p.part_name.to_string()),
            sap_number: Some(p.sap_number.to_string()),
            component_classification: Some(p.classification.to_string()),
            pm_type: Some("TBM".to_string()),
            smp_number: Some(p.smp_number),
            frequency_pm: Some(p.frequency_pm.to_string()),
            frequency_am: Some(p.frequency_am.to_string()),
            maintenance_time_minutes: Some(p.minutes),
            storeroom_location: Some(p.storeroom.to_string()),
            vendor: Some(p.vendor.to_string()),
            ..Default::default()
        })
        .collect();
    let added = state.part_api.bulk_add_parts(id, &inputs)?;
    anyhow::ensure!(added.failed == 0, "部件写入失败: {:?}", added.errors);

    let saved = state.part_api.list_parts(id)?;
    let request = GenerateScheduleRequest::for_parts(id, year, &saved);
    let result = state.schedule_api.generate_schedule_with_rule(
        &request,
        StatusRule::SeedWeek,
        Local::now().date_naive(),
    )?;

    eprintln!(
        "  {} {}: {} parts, {} tasks",
        asset_number, name, added.success, result.tasks_created
    );
    Ok(())
}
