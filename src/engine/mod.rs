// ==========================================
// WCM 设备台账 - 引擎层
// ==========================================
// 职责: 实现业务规则引擎,不拼 SQL
// 频率展开 → 任务生成 → 内存索引 → 网格渲染 / 单元格编辑
// ==========================================

pub mod cell_editor;
pub mod frequency;
pub mod ledger_grid;
pub mod ledger_index;
pub mod ledger_svg;
pub mod schedule_generator;
pub mod status_rule;

// 重导出核心引擎
pub use cell_editor::{coerce_input, parse_int_prefix, CellEditor, EditOutcome, EditorKey, FieldPatch};
pub use frequency::{expand, expand_in_year, FrequencyCode};
pub use ledger_grid::{
    CellFlags, ClassificationBadge, ColumnSelection, LedgerGrid, LedgerGridRenderer, Quadrant,
    ToggleAction, WeekDetail,
};
pub use ledger_index::LedgerIndex;
pub use ledger_svg::render_svg;
pub use schedule_generator::{GenerateResult, ScheduleGenerator};
pub use status_rule::StatusRule;
