// ==========================================
// Quản lý kho cám - mix - 应用层
// ==========================================
// 职责: 组装应用状态,确定默认数据目录
// ==========================================

pub mod state;

// 重导出
pub use state::{get_default_data_dir, AppState, DATA_DIR_ENV};
