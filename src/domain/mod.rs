// ==========================================
// Quản lý kho cám - mix - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型、校验规则
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod estimate;
pub mod formula;
pub mod inventory;
pub mod report;
pub mod threshold;
pub mod types;

// 重导出核心类型
pub use estimate::{RemainingDays, RemainingEstimate, UsageLevelCutoffs};
pub use formula::Formula;
pub use inventory::IngredientSnapshot;
pub use report::{DailyReport, ReportDocument};
pub use threshold::{ThresholdConfig, ThresholdOverride};
pub use types::{StatusColor, StockStatus, UsageLevel, Warehouse};
