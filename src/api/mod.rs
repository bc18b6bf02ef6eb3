// ==========================================
// WCM 设备台账 - API 层
// ==========================================
// 职责: 业务接口（同步），由 HTTP 层与本地会话调用
// 约束: 输入校验在此完成，Repository 只做数据访问
// ==========================================

pub mod asset_api;
pub mod asset_part_api;
pub mod error;
pub mod ledger_api;
pub mod schedule_api;

pub use asset_api::AssetApi;
pub use asset_part_api::{AssetPartApi, BulkAddError, BulkAddResult, RemovePartResult};
pub use error::{ApiError, ApiResult};
pub use ledger_api::LedgerApi;
pub use schedule_api::MaintenanceScheduleApi;
