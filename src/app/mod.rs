// ==========================================
// WCM 设备台账 - 应用层
// ==========================================
// 职责: 组装状态，对外提供 HTTP 接口与本地台账会话
// ==========================================

pub mod http;
pub mod ledger_session;
pub mod state;

// 重导出
pub use ledger_session::{LedgerBackend, LedgerSession, LocalLedgerBackend};
pub use state::{get_default_db_path, AppState};
