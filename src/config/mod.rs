// ==========================================
// Quản lý kho cám - mix - 配置层
// ==========================================
// 职责: 数据目录布局 + 阈值配置加载/保存
// 覆写: 全局配置 → 原料级覆写（两级）
// ==========================================

pub mod paths;
pub mod threshold_store;

// 重导出
pub use paths::DataPaths;
pub use threshold_store::{OverrideMap, ThresholdStore};
