// ==========================================
// WCM 设备台账 - 配置层
// ==========================================
// 职责: 台账业务配置（删除策略 / 状态规则 / 默认语言）
// 存储: config_kv 表
// ==========================================

pub mod config_manager;

// 重导出核心配置管理器
pub use config_manager::{config_keys, ConfigManager};
