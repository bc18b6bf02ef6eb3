// ==========================================
// 台账网格 集成测试
// ==========================================
// 测试范围:
// 1. 四象限着色（上蓝 / 右红 / 下黄 / 左灰）
// 2. ABC 徽标
// 3. 周详情与切换动作
// 4. 本地化与 SVG 导出
// ==========================================

mod helpers;
mod test_helpers;

use chrono::NaiveDate;
use helpers::part_builder::PartBuilder;
use test_helpers::TestEnv;
use wcm_ledger::api::ApiError;
use wcm_ledger::domain::{GenerateScheduleRequest, ScheduleStatus};
use wcm_ledger::engine::ledger_grid::{
    ToggleAction, BADGE_GRAY, BADGE_GREEN, BADGE_RED, COLOR_BREAKDOWN, COLOR_NEUTRAL,
    COLOR_PM_EXECUTED, COLOR_PM_PLANNED, COLOR_UNPLANNED,
};
use wcm_ledger::engine::StatusRule;

/// P-1: Critical, PM 3M + AM 1W; P-2: Standard, 无频率; P-3: 自定义分级
fn seeded_env() -> TestEnv {
    let env = TestEnv::new().unwrap();
    env.create_asset("A1");
    env.add_part(PartBuilder::new("A1", "P-1").class("Critical").pm("3M").am("1W"));
    env.add_part(PartBuilder::new("A1", "P-2").class("Standard"));
    env.add_part(PartBuilder::new("A1", "P-3").class("spare"));

    let parts = env.state.part_api.list_parts("A1").unwrap();
    let request = GenerateScheduleRequest::for_parts("A1", 2026, &parts);
    env.state
        .schedule_api
        .generate_schedule_with_rule(
            &request,
            StatusRule::SeedWeek,
            NaiveDate::from_ymd_opt(2026, 1, 20).unwrap(),
        )
        .unwrap();
    env
}

fn part_id(env: &TestEnv, part_number: &str) -> String {
    env.state
        .part_api
        .list_parts("A1")
        .unwrap()
        .into_iter()
        .find(|p| p.part_number == part_number)
        .unwrap()
        .id
}

#[test]
fn test_grid_基本结构() {
    let env = seeded_env();
    let grid = env.state.ledger_api.build_grid("A1", 2026, None, Some("en")).unwrap();

    assert_eq!(grid.title, "WCM Machine Ledger 2026");
    assert_eq!(grid.weeks.len(), 52);
    assert_eq!(grid.rows.len(), 3);
    assert_eq!(grid.orphan_row_count, 0);
    assert!(grid.week_detail.is_none());

    let numbers: Vec<_> = grid.rows.iter().map(|r| r.no).collect();
    assert_eq!(numbers, vec![1, 2, 3]);
    assert!(grid.rows.iter().all(|r| r.cells.len() == 52));
}

#[test]
fn test_grid_四象限着色() {
    let env = seeded_env();
    let p1 = part_id(&env, "P-1");
    let grid = env.state.ledger_api.build_grid("A1", 2026, None, Some("en")).unwrap();

    // 第 1 周: PM 已完成 + AM 已完成
    let week1 = grid.cell(&p1, 1).unwrap();
    assert_eq!(week1.fills.top, COLOR_PM_EXECUTED);
    assert_eq!(week1.fills.right, COLOR_NEUTRAL);
    assert_eq!(week1.fills.bottom, COLOR_NEUTRAL);
    assert_eq!(week1.fills.left, COLOR_UNPLANNED);
    assert_eq!(week1.task_ids.len(), 2);

    // 第 3 周: 仅 AM，且逾期
    let week3 = grid.cell(&p1, 3).unwrap();
    assert_eq!(week3.fills.top, COLOR_NEUTRAL);
    assert_eq!(week3.fills.right, COLOR_BREAKDOWN);
    assert_eq!(week3.fills.bottom, COLOR_NEUTRAL);
    assert_eq!(week3.fills.left, COLOR_UNPLANNED);

    // 第 14 周: PM 计划中 + AM 计划中
    let week14 = grid.cell(&p1, 14).unwrap();
    assert_eq!(week14.fills.top, COLOR_NEUTRAL);
    assert_eq!(week14.fills.right, COLOR_NEUTRAL);
    assert_eq!(week14.fills.bottom, COLOR_PM_PLANNED);
    assert_eq!(week14.fills.left, COLOR_UNPLANNED);

    // 无频率的部件全部为中性色
    let p2 = part_id(&env, "P-2");
    let row = grid.row(&p2).unwrap();
    assert!(row.cells.iter().all(|c| c.fills.top == COLOR_NEUTRAL
        && c.fills.right == COLOR_NEUTRAL
        && c.fills.bottom == COLOR_NEUTRAL
        && c.fills.left == COLOR_NEUTRAL
        && c.task_ids.is_empty()));
}

#[test]
fn test_grid_分级徽标() {
    let env = seeded_env();
    let grid = env.state.ledger_api.build_grid("A1", 2026, None, Some("en")).unwrap();

    let badge = |number: &str| {
        grid.rows
            .iter()
            .find(|r| r.part_number == number)
            .unwrap()
            .badge
            .clone()
    };
    assert_eq!((badge("P-1").label.as_str(), badge("P-1").color), ("A", BADGE_RED));
    assert_eq!((badge("P-2").label.as_str(), badge("P-2").color), ("C", BADGE_GREEN));
    assert_eq!((badge("P-3").label.as_str(), badge("P-3").color), ("S", BADGE_GRAY));
}

#[test]
fn test_grid_单元格提示() {
    let env = seeded_env();
    let p1 = part_id(&env, "P-1");
    let p2 = part_id(&env, "P-2");
    let grid = env.state.ledger_api.build_grid("A1", 2026, None, Some("en")).unwrap();

    let tooltip = &grid.cell(&p1, 1).unwrap().tooltip;
    assert!(tooltip.starts_with("Week 1: "));
    assert!(tooltip.contains("PM (completed)"));
    assert!(tooltip.contains("AM (completed)"));

    assert_eq!(grid.cell(&p2, 5).unwrap().tooltip, "Week 5");
}

#[test]
fn test_grid_周详情与动作() {
    let env = seeded_env();
    let p1 = part_id(&env, "P-1");
    let grid = env
        .state
        .ledger_api
        .build_grid("A1", 2026, Some(3), Some("en"))
        .unwrap();

    assert_eq!(grid.selected_week, Some(3));
    let detail = grid.week_detail.unwrap();
    assert_eq!(detail.title, "Week 3");
    assert_eq!(detail.entries.len(), 1);
    let entry = &detail.entries[0];
    assert_eq!(entry.asset_part_id, p1);
    assert_eq!(entry.status, ScheduleStatus::Overdue);
    assert_eq!(entry.action, ToggleAction::None);
    assert_eq!(entry.action_label, None);

    let grid = env
        .state
        .ledger_api
        .build_grid("A1", 2026, Some(14), Some("en"))
        .unwrap();
    let detail = grid.week_detail.unwrap();
    assert_eq!(detail.entries.len(), 2);
    assert!(detail
        .entries
        .iter()
        .all(|e| e.action == ToggleAction::MarkComplete
            && e.action_label.as_deref() == Some("Mark complete")));

    let grid = env
        .state
        .ledger_api
        .build_grid("A1", 2026, Some(1), Some("en"))
        .unwrap();
    let detail = grid.week_detail.unwrap();
    assert!(detail
        .entries
        .iter()
        .all(|e| e.action == ToggleAction::Undo && e.completed_date.is_some()));
}

#[test]
fn test_grid_越界周号不生成详情() {
    let env = seeded_env();
    let grid = env
        .state
        .ledger_api
        .build_grid("A1", 2026, Some(53), Some("en"))
        .unwrap();
    assert_eq!(grid.selected_week, None);
    assert!(grid.week_detail.is_none());
}

#[test]
fn test_grid_中文图例() {
    let env = seeded_env();
    let grid = env
        .state
        .ledger_api
        .build_grid("A1", 2026, Some(1), Some("zh-CN"))
        .unwrap();

    assert_eq!(grid.title, "WCM 设备台账 2026");
    assert_eq!(grid.legend.title, "图例");
    assert_eq!(grid.week_detail.unwrap().title, "第 1 周");
    let top = grid.legend.quadrants.iter().find(|q| q.key == "top").unwrap();
    assert_eq!(top.label, "PM 已执行");
    assert_eq!(top.color, Some(COLOR_PM_EXECUTED));
}

#[test]
fn test_grid_缺省语言取配置() {
    let env = seeded_env();
    env.state
        .config
        .set_global_config_value("ledger/default_locale", "zh-CN")
        .unwrap();
    let grid = env.state.ledger_api.build_grid("A1", 2026, None, None).unwrap();
    assert_eq!(grid.legend.title, "图例");
}

#[test]
fn test_grid_设备不存在() {
    let env = TestEnv::new().unwrap();
    let err = env
        .state
        .ledger_api
        .build_grid("NOPE", 2026, None, None)
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
}

#[test]
fn test_svg_导出() {
    let env = seeded_env();
    let svg = env.state.ledger_api.render_svg("A1", 2026, Some("en")).unwrap();

    assert!(svg.starts_with("<svg"));
    assert!(svg.trim_end().ends_with("</svg>"));
    assert!(svg.contains("WCM Machine Ledger 2026"));
    assert!(svg.contains(COLOR_PM_EXECUTED));
    assert!(svg.contains(COLOR_BREAKDOWN));
    // 3 行 × 52 周 × 4 象限
    assert_eq!(svg.matches("<polygon").count(), 3 * 52 * 4);
}
