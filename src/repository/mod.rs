// ==========================================
// Quản lý kho cám - mix - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================
// 职责: 提供数据访问接口,屏蔽 JSON 文件细节
// 约束: 所有文档整体重写,写入原子化
// ==========================================

pub mod error;
pub mod formula_repo;
pub mod inventory_repo;
pub mod json_file;
pub mod report_repo;

// 重导出核心仓储
pub use error::{RepositoryError, RepositoryResult};
pub use formula_repo::FormulaRepository;
pub use inventory_repo::{ConsumeSummary, InventoryStore, Shortage};
pub use report_repo::{JsonReportRepository, ReportRepository};
