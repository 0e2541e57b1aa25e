// ==========================================
// Quản lý kho cám - mix - API 层
// ==========================================
// 职责: 提供业务 API 接口,供展示层 / 命令行入口调用
// 约定: 查询返回 ApiResult<T>; 修改返回 OperationOutcome
// ==========================================

pub mod dashboard_api;
pub mod display;
pub mod error;
pub mod inventory_api;
pub mod production_api;
pub mod threshold_api;

// 重导出核心类型
pub use dashboard_api::{DashboardApi, ItemStatusView, WarehouseAlerts};
pub use error::{ApiError, ApiResult, OperationOutcome};
pub use inventory_api::InventoryApi;
pub use production_api::{ProductionApi, ProductionInput};
pub use threshold_api::ThresholdApi;
