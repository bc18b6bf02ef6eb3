// ==========================================
// 维护计划生成 集成测试
// ==========================================
// 测试范围:
// 1. 频率 → 周号展开后的落库结果
// 2. 重复生成幂等（确定性 ID + INSERT OR IGNORE）
// 3. 状态规则: SEED_WEEK / CALENDAR
// 4. 输入校验
// ==========================================

mod helpers;
mod test_helpers;

use chrono::NaiveDate;
use helpers::part_builder::PartBuilder;
use test_helpers::TestEnv;
use wcm_ledger::api::ApiError;
use wcm_ledger::domain::{
    GeneratePart, GenerateScheduleRequest, MaintenanceType, ScheduleSource, ScheduleStatus,
};
use wcm_ledger::engine::StatusRule;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 1, 20).unwrap()
}

fn request_for(env: &TestEnv, asset_id: &str, year: i32) -> GenerateScheduleRequest {
    let parts = env.state.part_api.list_parts(asset_id).unwrap();
    GenerateScheduleRequest::for_parts(asset_id, year, &parts)
}

#[test]
fn test_generate_6m_两条pm任务() {
    let env = TestEnv::new().unwrap();
    env.create_asset("A1");
    let part = env.add_part(PartBuilder::new("A1", "SEAL-001").pm("6M"));

    let request = request_for(&env, "A1", 2026);
    let result = env
        .state
        .schedule_api
        .generate_schedule_with_rule(&request, StatusRule::SeedWeek, today())
        .unwrap();

    assert_eq!(result.tasks_created, 2);
    assert_eq!(result.tasks_skipped_existing, 0);

    let rows = env.state.schedule_api.get_schedule("A1", 2026).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].week_number, 1);
    assert_eq!(rows[0].status, ScheduleStatus::Completed);
    assert!(rows[0].completed_date.is_some());
    assert_eq!(rows[1].week_number, 27);
    assert_eq!(rows[1].status, ScheduleStatus::Planned);
    assert_eq!(rows[1].completed_date, None);

    for row in &rows {
        assert_eq!(row.asset_part_id, part.id);
        assert_eq!(row.maintenance_type, MaintenanceType::Pm);
        assert_eq!(row.source, ScheduleSource::Auto);
        assert_eq!(row.part_number.as_deref(), Some("SEAL-001"));
    }
}

#[test]
fn test_generate_重复生成不新增() {
    let env = TestEnv::new().unwrap();
    env.create_asset("A1");
    env.add_part(PartBuilder::new("A1", "P-1").pm("3M").am("2W"));

    let request = request_for(&env, "A1", 2026);
    let api = &env.state.schedule_api;
    let first = api
        .generate_schedule_with_rule(&request, StatusRule::SeedWeek, today())
        .unwrap();
    assert_eq!(first.tasks_created, 4 + 26);

    let second = api
        .generate_schedule_with_rule(&request, StatusRule::SeedWeek, today())
        .unwrap();
    assert_eq!(second.tasks_created, 0);
    assert_eq!(second.tasks_skipped_existing, first.rows_total);
    assert_eq!(api.get_schedule("A1", 2026).unwrap().len(), 30);
}

#[test]
fn test_generate_保留人工修改的状态() {
    let env = TestEnv::new().unwrap();
    env.create_asset("A1");
    env.add_part(PartBuilder::new("A1", "P-1").pm("6M"));

    let request = request_for(&env, "A1", 2026);
    let api = &env.state.schedule_api;
    api.generate_schedule_with_rule(&request, StatusRule::SeedWeek, today())
        .unwrap();

    let week27 = api
        .get_schedule("A1", 2026)
        .unwrap()
        .into_iter()
        .find(|r| r.week_number == 27)
        .unwrap();
    api.toggle_task(&week27.id, None).unwrap();

    api.generate_schedule_with_rule(&request, StatusRule::SeedWeek, today())
        .unwrap();
    let after = api.get_task(&week27.id).unwrap();
    assert_eq!(after.status, ScheduleStatus::Completed);
}

#[test]
fn test_generate_24m_仅偶数年() {
    let env = TestEnv::new().unwrap();
    env.create_asset("A1");
    env.add_part(PartBuilder::new("A1", "P-1").pm("24M"));

    let api = &env.state.schedule_api;
    let even = api
        .generate_schedule_with_rule(&request_for(&env, "A1", 2026), StatusRule::SeedWeek, today())
        .unwrap();
    assert_eq!(even.tasks_created, 1);
    assert_eq!(api.get_schedule("A1", 2026).unwrap()[0].week_number, 1);

    let odd = api
        .generate_schedule_with_rule(&request_for(&env, "A1", 2027), StatusRule::SeedWeek, today())
        .unwrap();
    assert_eq!(odd.rows_total, 0);
    assert!(api.get_schedule("A1", 2027).unwrap().is_empty());
}

#[test]
fn test_generate_未知频率不产生任务() {
    let env = TestEnv::new().unwrap();
    env.create_asset("A1");
    env.add_part(PartBuilder::new("A1", "P-1").pm("5X").am("1w"));

    let result = env
        .state
        .schedule_api
        .generate_schedule_with_rule(&request_for(&env, "A1", 2026), StatusRule::SeedWeek, today())
        .unwrap();
    assert_eq!(result.rows_total, 0);
}

#[test]
fn test_generate_am每周52条_seed规则状态() {
    let env = TestEnv::new().unwrap();
    env.create_asset("A1");
    env.add_part(PartBuilder::new("A1", "P-1").am("1W"));

    let api = &env.state.schedule_api;
    api.generate_schedule_with_rule(&request_for(&env, "A1", 2026), StatusRule::SeedWeek, today())
        .unwrap();

    let rows = api.get_schedule("A1", 2026).unwrap();
    assert_eq!(rows.len(), 52);
    assert!(rows.iter().all(|r| r.maintenance_type == MaintenanceType::Am));

    let status_of = |week: u32| rows.iter().find(|r| r.week_number == week).unwrap().status;
    assert_eq!(status_of(1), ScheduleStatus::Completed);
    assert_eq!(status_of(2), ScheduleStatus::Completed);
    assert_eq!(status_of(3), ScheduleStatus::Overdue);
    assert_eq!(status_of(4), ScheduleStatus::Overdue);
    assert_eq!(status_of(5), ScheduleStatus::Planned);
}

#[test]
fn test_generate_calendar规则按当前日期判定逾期() {
    let env = TestEnv::new().unwrap();
    env.create_asset("A1");
    env.add_part(PartBuilder::new("A1", "P-1").pm("3M"));

    // 2026-06-15 位于 ISO 第 25 周: 第 1/14 周已结束，第 27/40 周未到
    let today = NaiveDate::from_ymd_opt(2026, 6, 15).unwrap();
    let api = &env.state.schedule_api;
    api.generate_schedule_with_rule(&request_for(&env, "A1", 2026), StatusRule::Calendar, today)
        .unwrap();

    let statuses: Vec<_> = api
        .get_schedule("A1", 2026)
        .unwrap()
        .iter()
        .map(|r| (r.week_number, r.status))
        .collect();
    assert_eq!(
        statuses,
        vec![
            (1, ScheduleStatus::Overdue),
            (14, ScheduleStatus::Overdue),
            (27, ScheduleStatus::Planned),
            (40, ScheduleStatus::Planned),
        ]
    );
}

#[test]
fn test_generate_输入校验() {
    let env = TestEnv::new().unwrap();
    let api = &env.state.schedule_api;

    let bad_year = GenerateScheduleRequest {
        asset_id: "A1".to_string(),
        year: 1999,
        parts: vec![],
    };
    assert!(matches!(
        api.generate_schedule_with_rule(&bad_year, StatusRule::SeedWeek, today()),
        Err(ApiError::InvalidInput(_))
    ));

    let missing_part_id = GenerateScheduleRequest {
        asset_id: "A1".to_string(),
        year: 2026,
        parts: vec![GeneratePart {
            asset_part_id: " ".to_string(),
            part_number: None,
            part_name: None,
            frequency_pm: Some("3M".to_string()),
            frequency_am: None,
            maintenance_time_minutes: None,
        }],
    };
    assert!(matches!(
        api.generate_schedule_with_rule(&missing_part_id, StatusRule::SeedWeek, today()),
        Err(ApiError::InvalidInput(_))
    ));
}

#[test]
fn test_generate_读取配置的状态规则() {
    let env = TestEnv::new().unwrap();
    env.create_asset("A1");
    env.add_part(PartBuilder::new("A1", "P-1").pm("12M"));

    env.state
        .config
        .set_global_config_value("ledger/status_rule", "SEED_WEEK")
        .unwrap();
    env.state
        .schedule_api
        .generate_schedule(&request_for(&env, "A1", 2026))
        .unwrap();

    let rows = env.state.schedule_api.get_schedule("A1", 2026).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].status, ScheduleStatus::Completed);
}
