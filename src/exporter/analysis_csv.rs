// ==========================================
// Quản lý kho cám - mix - 分析结果 CSV 导出
// ==========================================
// 输出: 每个原料一行,数值保留原始精度
// 写入: 同目录临时文件 → rename
// ==========================================

use std::fs;
use std::io::Write;
use std::path::Path;

use csv::Writer;
use tempfile::NamedTempFile;

use crate::api::dashboard_api::ItemStatusView;
use crate::domain::estimate::RemainingDays;
use crate::repository::error::{RepositoryError, RepositoryResult};

/// CSV 表头
pub const CSV_HEADER: &[&str] = &[
    "warehouse",
    "ingredient",
    "quantity_kg",
    "daily_usage_kg",
    "days_remaining",
    "usage_level",
    "status",
];

fn to_row(item: &ItemStatusView) -> Vec<String> {
    vec![
        item.warehouse.as_str().to_string(),
        item.ingredient.clone(),
        item.quantity.to_string(),
        item.daily_usage.map(|u| u.to_string()).unwrap_or_default(),
        match item.days_remaining {
            RemainingDays::Finite(days) => days.to_string(),
            RemainingDays::Indefinite => "inf".to_string(),
        },
        item.usage_level.as_str().to_string(),
        item.status.as_str().to_string(),
    ]
}

/// 导出状态视图
///
/// 目标目录不存在时自动创建; 同名文件会被覆盖
pub fn export(items: &[ItemStatusView], path: &Path) -> RepositoryResult<()> {
    let mut writer = Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADER).map_err(csv_error)?;
    for item in items {
        writer.write_record(to_row(item)).map_err(csv_error)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| RepositoryError::InternalError(format!("CSV 缓冲失败: {}", e)))?;

    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(|e| RepositoryError::io(dir, e))?;

    let mut temp = NamedTempFile::new_in(dir).map_err(|e| RepositoryError::io(dir, e))?;
    temp.write_all(&bytes)
        .map_err(|e| RepositoryError::io(path, e))?;
    temp.persist(path)
        .map_err(|e| RepositoryError::io(path, e.error))?;

    tracing::debug!("CSV 已写入 {} ({} 行)", path.display(), items.len());
    Ok(())
}

fn csv_error(err: csv::Error) -> RepositoryError {
    RepositoryError::InternalError(format!("CSV 写入失败: {}", err))
}
