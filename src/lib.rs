// ==========================================
// WCM 设备台账 - 核心库
// ==========================================
// 部件维护频率 → 52 周维护计划 → 四象限台账网格
// 技术栈: axum + Rust + SQLite
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "en");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 频率展开 / 计划生成 / 网格渲染 / 单元格编辑
pub mod engine;

// 导入层 - 部件表格
pub mod importer;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA/建表）
pub mod db;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 业务接口
pub mod api;

// 应用层 - HTTP 与台账会话
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

pub use domain::{
    Asset, AssetPart, MaintenanceSchedule, MaintenanceType, PartDeletePolicy, ScheduleSource,
    ScheduleStatus,
};

pub use engine::{
    FrequencyCode, LedgerGrid, LedgerGridRenderer, LedgerIndex, ScheduleGenerator, StatusRule,
};

pub use api::{ApiError, AssetApi, AssetPartApi, LedgerApi, MaintenanceScheduleApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "WCM 设备台账";
