// ==========================================
// Quản lý kho cám - mix - 引擎层
// ==========================================
// 职责: 实现业务规则引擎,文件读写委托给仓储层/配置层
// 分层: 消耗分析只打固定分界的粗粒度等级; 可配置的状态分类由阈值引擎负责
// ==========================================

pub mod formula;
pub mod threshold;
pub mod usage_analyzer;

// 重导出核心引擎
pub use formula::FormulaEngine;
pub use threshold::{classify_with, AlertItem, AlertLists, Classification, ThresholdClassifier};
pub use usage_analyzer::{
    AnalysisSummary, UsageAnalysis, UsageHistoryAnalyzer, WarehouseEstimates, DEFAULT_WINDOW_DAYS,
    MAX_WINDOW_DAYS,
};
