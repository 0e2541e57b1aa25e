// ==========================================
// Quản lý kho cám - mix - 导出层
// ==========================================
// 职责: 把分析结果写成外部文件（目前只有 CSV）
// ==========================================

pub mod analysis_csv;

pub use analysis_csv::{export, CSV_HEADER};
