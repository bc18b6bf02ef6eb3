// ==========================================
// WCM 设备台账 - 台账会话（界面侧状态）
// ==========================================
// 职责: 持有当前设备/年份的部件表与任务索引，驱动网格、列选择与行内编辑
// 任务切换 / 删除 / 人工新增后就地更新索引，不整表重取
// 单元格保存: 先乐观显示，失败时回退到服务端确认值并记录告警
// ==========================================

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::api::error::ApiResult;
use crate::api::{AssetPartApi, MaintenanceScheduleApi};
use crate::domain::asset_part::{AssetPart, PartField};
use crate::domain::schedule::{GenerateScheduleRequest, MaintenanceSchedule, NewManualTask};
use crate::engine::cell_editor::{CellEditor, EditOutcome, EditorKey, FieldPatch};
use crate::engine::ledger_grid::{ColumnSelection, LedgerGrid, LedgerGridRenderer};
use crate::engine::ledger_index::LedgerIndex;
use crate::engine::schedule_generator::GenerateResult;
use crate::i18n::{t_in, t_in_with_args};

// ==========================================
// LedgerBackend - 会话的数据来源
// ==========================================
#[async_trait]
pub trait LedgerBackend: Send + Sync {
    async fn fetch_parts(&self, asset_id: &str) -> ApiResult<Vec<AssetPart>>;

    async fn fetch_schedule(&self, asset_id: &str, year: i32) -> ApiResult<Vec<MaintenanceSchedule>>;

    async fn generate(&self, request: &GenerateScheduleRequest) -> ApiResult<GenerateResult>;

    async fn toggle_task(
        &self,
        id: &str,
        completed_date: Option<NaiveDate>,
    ) -> ApiResult<MaintenanceSchedule>;

    async fn create_manual_task(&self, task: &NewManualTask) -> ApiResult<MaintenanceSchedule>;

    async fn delete_task(&self, id: &str) -> ApiResult<()>;

    async fn patch_part(&self, id: &str, patch: &Map<String, Value>) -> ApiResult<AssetPart>;
}

/// 进程内实现: 直接调用 API 层
pub struct LocalLedgerBackend {
    part_api: Arc<AssetPartApi>,
    schedule_api: Arc<MaintenanceScheduleApi>,
}

impl LocalLedgerBackend {
    pub fn new(part_api: Arc<AssetPartApi>, schedule_api: Arc<MaintenanceScheduleApi>) -> Self {
        Self {
            part_api,
            schedule_api,
        }
    }

    pub fn from_state(state: &crate::app::AppState) -> Self {
        Self::new(state.part_api.clone(), state.schedule_api.clone())
    }
}

#[async_trait]
impl LedgerBackend for LocalLedgerBackend {
    async fn fetch_parts(&self, asset_id: &str) -> ApiResult<Vec<AssetPart>> {
        self.part_api.list_parts(asset_id)
    }

    async fn fetch_schedule(&self, asset_id: &str, year: i32) -> ApiResult<Vec<MaintenanceSchedule>> {
        self.schedule_api.get_schedule(asset_id, year)
    }

    async fn generate(&self, request: &GenerateScheduleRequest) -> ApiResult<GenerateResult> {
        self.schedule_api.generate_schedule(request)
    }

    async fn toggle_task(
        &self,
        id: &str,
        completed_date: Option<NaiveDate>,
    ) -> ApiResult<MaintenanceSchedule> {
        self.schedule_api.toggle_task(id, completed_date)
    }

    async fn create_manual_task(&self, task: &NewManualTask) -> ApiResult<MaintenanceSchedule> {
        self.schedule_api.create_manual_task(task)
    }

    async fn delete_task(&self, id: &str) -> ApiResult<()> {
        self.schedule_api.delete_task(id)
    }

    async fn patch_part(&self, id: &str, patch: &Map<String, Value>) -> ApiResult<AssetPart> {
        self.part_api.patch_part(id, patch)
    }
}

// ==========================================
// LedgerSession - 会话状态
// ==========================================
pub struct LedgerSession {
    backend: Arc<dyn LedgerBackend>,
    asset_id: String,
    year: i32,
    renderer: LedgerGridRenderer,

    parts: Vec<AssetPart>,
    // 最近一次服务端确认的部件值（保存失败时回退）
    confirmed: Vec<AssetPart>,
    index: LedgerIndex,
    selection: ColumnSelection,
    editor: Option<CellEditor>,
    alerts: Vec<String>,
}

impl LedgerSession {
    pub fn new(backend: Arc<dyn LedgerBackend>, asset_id: &str, year: i32, locale: &str) -> Self {
        Self {
            backend,
            asset_id: asset_id.to_string(),
            year,
            renderer: LedgerGridRenderer::new(locale),
            parts: Vec::new(),
            confirmed: Vec::new(),
            index: LedgerIndex::new(),
            selection: ColumnSelection::default(),
            editor: None,
            alerts: Vec::new(),
        }
    }

    pub fn asset_id(&self) -> &str {
        &self.asset_id
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn parts(&self) -> &[AssetPart] {
        &self.parts
    }

    pub fn index(&self) -> &LedgerIndex {
        &self.index
    }

    /// 切换年份并重新加载
    pub async fn set_year(&mut self, year: i32) -> bool {
        self.year = year;
        self.selection.clear();
        self.refresh().await
    }

    /// 从服务端重建部件表与任务索引
    pub async fn refresh(&mut self) -> bool {
        let fetched = async {
            let parts = self.backend.fetch_parts(&self.asset_id).await?;
            let rows = self.backend.fetch_schedule(&self.asset_id, self.year).await?;
            Ok::<_, crate::api::ApiError>((parts, rows))
        }
        .await;

        match fetched {
            Ok((parts, rows)) => {
                debug!(asset_id = %self.asset_id, year = self.year, parts = parts.len(), rows = rows.len(), "台账已加载");
                self.confirmed = parts.clone();
                self.parts = parts;
                self.index = LedgerIndex::build(rows);
                true
            }
            Err(e) => {
                self.push_alert("operations.refresh", &e.to_string());
                false
            }
        }
    }

    /// 当前网格
    pub fn grid(&self) -> LedgerGrid {
        self.renderer.render(
            &self.asset_id,
            self.year,
            &self.parts,
            &self.index,
            self.selection.selected(),
        )
    }

    /// 选择一列；再次选择同一列即取消
    pub fn select_week(&mut self, week_number: u32) -> Option<u32> {
        self.selection.toggle(week_number)
    }

    pub fn selected_week(&self) -> Option<u32> {
        self.selection.selected()
    }

    // ==========================================
    // 任务操作
    // ==========================================

    /// 按当前部件表生成本年计划，完成后重新加载
    pub async fn generate(&mut self) -> Option<GenerateResult> {
        let request = GenerateScheduleRequest::for_parts(&self.asset_id, self.year, &self.parts);
        match self.backend.generate(&request).await {
            Ok(result) => {
                self.refresh().await;
                Some(result)
            }
            Err(e) => {
                self.push_alert("operations.generate", &e.to_string());
                None
            }
        }
    }

    /// 切换任务状态（planned ↔ completed）
    pub async fn toggle(&mut self, task_id: &str) -> bool {
        match self.backend.toggle_task(task_id, None).await {
            Ok(row) => {
                if !self.index.set_status(&row.id, row.status, row.completed_date) {
                    self.index.upsert(row);
                }
                true
            }
            Err(e) => {
                self.push_alert("operations.toggle", &e.to_string());
                false
            }
        }
    }

    pub async fn add_manual_task(&mut self, task: &NewManualTask) -> bool {
        match self.backend.create_manual_task(task).await {
            Ok(row) => {
                if row.asset_id == self.asset_id && row.year == self.year {
                    self.index.upsert(row);
                }
                true
            }
            Err(e) => {
                self.push_alert("operations.add_task", &e.to_string());
                false
            }
        }
    }

    pub async fn delete_task(&mut self, task_id: &str) -> bool {
        match self.backend.delete_task(task_id).await {
            Ok(()) => {
                self.index.remove(task_id);
                true
            }
            Err(e) => {
                self.push_alert("operations.delete_task", &e.to_string());
                false
            }
        }
    }

    // ==========================================
    // 行内编辑
    // ==========================================

    /// 打开编辑器；部件不存在时返回 None
    pub fn begin_edit(&mut self, asset_part_id: &str, field: PartField) -> Option<&CellEditor> {
        let part = self.parts.iter().find(|p| p.id == asset_part_id)?;
        self.editor = Some(CellEditor::open(part, field));
        self.editor.as_ref()
    }

    pub fn editor(&self) -> Option<&CellEditor> {
        self.editor.as_ref()
    }

    pub fn edit_input(&mut self, text: &str) {
        if let Some(editor) = self.editor.as_mut() {
            editor.input(text);
        }
    }

    /// 结束编辑
    ///
    /// Commit 时先把新值显示出来再发请求；失败则回退并记录告警
    pub async fn finish_edit(&mut self, key: EditorKey) -> Option<EditOutcome> {
        let editor = self.editor.take()?;
        let outcome = editor.finish(key);

        if let EditOutcome::Commit(patch) = &outcome {
            self.apply_optimistic(patch);
            match self.backend.patch_part(&patch.asset_part_id, &patch.to_body()).await {
                Ok(saved) => self.store_confirmed(saved),
                Err(e) => {
                    warn!(asset_part_id = %patch.asset_part_id, field = %patch.field, error = %e, "单元格保存失败，回退显示值");
                    self.revert(&patch.asset_part_id);
                    self.push_alert("operations.save_field", &e.to_string());
                }
            }
        }

        Some(outcome)
    }

    /// 单元格当前显示值
    pub fn display_value(&self, asset_part_id: &str, field: PartField) -> Option<String> {
        self.parts
            .iter()
            .find(|p| p.id == asset_part_id)
            .map(|p| field.display_value(p))
    }

    // ==========================================
    // 告警
    // ==========================================

    pub fn alerts(&self) -> &[String] {
        &self.alerts
    }

    pub fn take_alerts(&mut self) -> Vec<String> {
        std::mem::take(&mut self.alerts)
    }

    fn push_alert(&mut self, operation_key: &str, message: &str) {
        let locale = self.renderer.locale();
        let operation = t_in(locale, operation_key);
        self.alerts.push(t_in_with_args(
            locale,
            "common.failed",
            &[("operation", &operation), ("message", message)],
        ));
    }

    fn apply_optimistic(&mut self, patch: &FieldPatch) {
        let Some(slot) = self.parts.iter_mut().find(|p| p.id == patch.asset_part_id) else {
            return;
        };
        if let Some(updated) = with_field(slot, patch) {
            *slot = updated;
        }
    }

    fn store_confirmed(&mut self, saved: AssetPart) {
        for list in [&mut self.parts, &mut self.confirmed] {
            if let Some(slot) = list.iter_mut().find(|p| p.id == saved.id) {
                *slot = saved.clone();
            }
        }
    }

    fn revert(&mut self, asset_part_id: &str) {
        let Some(confirmed) = self.confirmed.iter().find(|p| p.id == asset_part_id) else {
            return;
        };
        if let Some(slot) = self.parts.iter_mut().find(|p| p.id == asset_part_id) {
            *slot = confirmed.clone();
        }
    }
}

/// 把补丁套到部件副本上；必填字段被置空等无法表示的值返回 None
fn with_field(part: &AssetPart, patch: &FieldPatch) -> Option<AssetPart> {
    let mut json = serde_json::to_value(part).ok()?;
    json.as_object_mut()?
        .insert(patch.field.wire_name().to_string(), patch.value.clone());
    serde_json::from_value(json).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::db_utils::now_timestamp;
    use serde_json::json;

    fn part() -> AssetPart {
        let now = now_timestamp();
        AssetPart {
            id: "p1".to_string(),
            asset_id: "a1".to_string(),
            part_number: "SEAL-001".to_string(),
            part_name: "Seal".to_string(),
            sap_number: None,
            description: None,
            manufacturer: None,
            model_number: None,
            unit_of_measure: "EA".to_string(),
            quantity: 1.0,
            is_primary: false,
            notes: None,
            component_classification: Some("A".to_string()),
            pm_type: None,
            smp_number: Some(3),
            frequency_pm: Some("3M".to_string()),
            maintenance_time_minutes: None,
            machine_stop_required: None,
            inspection_standard: None,
            frequency_am: None,
            qa_matrix_no: None,
            qm_matrix_no: None,
            kaizen_type: None,
            kaizen_no: None,
            storeroom_location: None,
            vendor: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_with_field_applies_value() {
        let patch = FieldPatch {
            asset_part_id: "p1".to_string(),
            field: PartField::SmpNumber,
            value: json!(12),
        };
        let updated = with_field(&part(), &patch).unwrap();
        assert_eq!(updated.smp_number, Some(12));

        let patch = FieldPatch {
            asset_part_id: "p1".to_string(),
            field: PartField::FrequencyPm,
            value: Value::Null,
        };
        assert_eq!(with_field(&part(), &patch).unwrap().frequency_pm, None);
    }

    #[test]
    fn test_with_field_rejects_null_required() {
        let patch = FieldPatch {
            asset_part_id: "p1".to_string(),
            field: PartField::PartName,
            value: Value::Null,
        };
        assert!(with_field(&part(), &patch).is_none());
    }
}
