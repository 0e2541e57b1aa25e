// ==========================================
// Quản lý kho cám - mix - 核心库
// ==========================================
// 系统定位: 饲料厂两仓（cám / mix）原料库存管理
// 数据: 扁平 JSON 文档（库存、包装、阈值、配方、日报）
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "vi");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 文档读写
pub mod repository;

// 配置层 - 数据目录与阈值配置
pub mod config;

// 引擎层 - 业务规则
pub mod engine;

// API 层 - 业务接口
pub mod api;

// 导出层 - CSV 报表
pub mod exporter;

// 应用层 - 状态组装
pub mod app;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{StatusColor, StockStatus, UsageLevel, Warehouse};
pub use domain::{
    DailyReport, Formula, RemainingDays, RemainingEstimate, ThresholdConfig, ThresholdOverride,
};

// 引擎
pub use engine::{FormulaEngine, ThresholdClassifier, UsageHistoryAnalyzer};

// API
pub use api::{DashboardApi, InventoryApi, OperationOutcome, ProductionApi, ThresholdApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "Quản lý kho cám - mix";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
