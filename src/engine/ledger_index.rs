// ==========================================
// WCM 设备台账 - 台账内存索引
// ==========================================
// 职责: (部件, 年, 周, 类型) → 任务行
// 加载一次后就地应用新增 / 状态变更 / 删除，
// 只有显式刷新时才从服务端重建
// ==========================================

use crate::domain::schedule::MaintenanceSchedule;
use crate::domain::types::{MaintenanceType, ScheduleStatus};
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap};

/// 索引键
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellKey {
    pub asset_part_id: String,
    pub year: i32,
    pub week_number: u32,
    pub maintenance_type: MaintenanceType,
}

impl CellKey {
    pub fn of(row: &MaintenanceSchedule) -> Self {
        Self {
            asset_part_id: row.asset_part_id.clone(),
            year: row.year,
            week_number: row.week_number,
            maintenance_type: row.maintenance_type,
        }
    }
}

// ==========================================
// LedgerIndex
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct LedgerIndex {
    cells: BTreeMap<CellKey, Vec<MaintenanceSchedule>>,
    by_id: HashMap<String, CellKey>,
}

impl LedgerIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// 从一次查询结果构建
    pub fn build(rows: Vec<MaintenanceSchedule>) -> Self {
        let mut index = Self::new();
        for row in rows {
            index.upsert(row);
        }
        index
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// 新增或替换（按 ID）
    pub fn upsert(&mut self, row: MaintenanceSchedule) {
        self.remove(&row.id);
        let key = CellKey::of(&row);
        self.by_id.insert(row.id.clone(), key.clone());
        self.cells.entry(key).or_default().push(row);
    }

    pub fn get(&self, id: &str) -> Option<&MaintenanceSchedule> {
        let key = self.by_id.get(id)?;
        self.cells.get(key)?.iter().find(|r| r.id == id)
    }

    /// 就地修改状态
    ///
    /// # 返回
    /// - false: 索引中没有该 ID
    pub fn set_status(
        &mut self,
        id: &str,
        status: ScheduleStatus,
        completed_date: Option<NaiveDate>,
    ) -> bool {
        let Some(key) = self.by_id.get(id) else {
            return false;
        };
        let Some(row) = self
            .cells
            .get_mut(key)
            .and_then(|rows| rows.iter_mut().find(|r| r.id == id))
        else {
            return false;
        };
        row.status = status;
        row.completed_date = completed_date;
        true
    }

    /// 删除一行，返回被删除的行
    pub fn remove(&mut self, id: &str) -> Option<MaintenanceSchedule> {
        let key = self.by_id.remove(id)?;
        let rows = self.cells.get_mut(&key)?;
        let pos = rows.iter().position(|r| r.id == id)?;
        let removed = rows.remove(pos);
        if rows.is_empty() {
            self.cells.remove(&key);
        }
        Some(removed)
    }

    /// 某部件某周的全部任务（跨维护类型）
    pub fn rows_for_cell(
        &self,
        asset_part_id: &str,
        year: i32,
        week_number: u32,
    ) -> Vec<&MaintenanceSchedule> {
        MaintenanceType::ALL
            .iter()
            .filter_map(|t| {
                self.cells.get(&CellKey {
                    asset_part_id: asset_part_id.to_string(),
                    year,
                    week_number,
                    maintenance_type: *t,
                })
            })
            .flatten()
            .collect()
    }

    /// 某周的全部任务（跨部件）
    pub fn rows_for_week(&self, year: i32, week_number: u32) -> Vec<&MaintenanceSchedule> {
        self.cells
            .iter()
            .filter(|(k, _)| k.year == year && k.week_number == week_number)
            .flat_map(|(_, rows)| rows.iter())
            .collect()
    }

    pub fn rows(&self) -> impl Iterator<Item = &MaintenanceSchedule> {
        self.cells.values().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::ScheduleSource;

    fn row(id: &str, part: &str, week: u32, t: MaintenanceType, s: ScheduleStatus) -> MaintenanceSchedule {
        let ts = NaiveDate::from_ymd_opt(2026, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        MaintenanceSchedule {
            id: id.to_string(),
            asset_part_id: part.to_string(),
            asset_id: "asset-1".to_string(),
            year: 2026,
            week_number: week,
            maintenance_type: t,
            status: s,
            part_number: None,
            part_name: None,
            completed_date: None,
            notes: None,
            source: ScheduleSource::Auto,
            created_at: ts,
            updated_at: ts,
        }
    }

    #[test]
    fn test_cell_lookup_spans_types() {
        let index = LedgerIndex::build(vec![
            row("a", "p1", 1, MaintenanceType::Pm, ScheduleStatus::Completed),
            row("b", "p1", 1, MaintenanceType::Am, ScheduleStatus::Overdue),
            row("c", "p1", 2, MaintenanceType::Pm, ScheduleStatus::Planned),
            row("d", "p2", 1, MaintenanceType::Pm, ScheduleStatus::Planned),
        ]);
        assert_eq!(index.len(), 4);
        assert_eq!(index.rows_for_cell("p1", 2026, 1).len(), 2);
        assert_eq!(index.rows_for_week(2026, 1).len(), 3);
        assert!(index.rows_for_cell("p1", 2027, 1).is_empty());
    }

    #[test]
    fn test_mutations_apply_in_place() {
        let mut index = LedgerIndex::build(vec![
            row("a", "p1", 1, MaintenanceType::Pm, ScheduleStatus::Planned),
            row("b", "p1", 1, MaintenanceType::Pm, ScheduleStatus::Planned),
        ]);

        let done = NaiveDate::from_ymd_opt(2026, 1, 2);
        assert!(index.set_status("a", ScheduleStatus::Completed, done));
        assert_eq!(index.get("a").map(|r| r.status), Some(ScheduleStatus::Completed));
        assert_eq!(index.get("a").and_then(|r| r.completed_date), done);
        assert!(!index.set_status("zzz", ScheduleStatus::Completed, None));

        // 删除一行不影响同键的另一行
        assert!(index.remove("a").is_some());
        assert!(index.get("a").is_none());
        let remaining = index.rows_for_cell("p1", 2026, 1);
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, "b");
        assert!(index.get("b").is_some());
        assert!(index.remove("a").is_none());
    }

    #[test]
    fn test_upsert_replaces_by_id() {
        let mut index = LedgerIndex::new();
        index.upsert(row("a", "p1", 1, MaintenanceType::Pm, ScheduleStatus::Planned));
        index.upsert(row("a", "p1", 5, MaintenanceType::Pm, ScheduleStatus::Planned));
        assert_eq!(index.len(), 1);
        assert!(index.rows_for_cell("p1", 2026, 1).is_empty());
        assert_eq!(index.rows_for_cell("p1", 2026, 5).len(), 1);
    }
}
