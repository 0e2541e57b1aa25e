// ==========================================
// Quản lý kho cám - mix - 数据目录布局
// ==========================================
// 职责: 所有文档路径的唯一来源
// 约束: 基础目录由调用方注入,不依赖进程工作目录
// ==========================================

use crate::domain::report::report_key;
use crate::domain::types::Warehouse;
use chrono::NaiveDate;
use std::path::{Path, PathBuf};

/// 数据目录布局
///
/// ```text
/// <base>/inventory/{feed,mix}_inventory.json
/// <base>/inventory/{feed,mix}_packaging_info.json
/// <base>/config/threshold_config.json
/// <base>/config/individual_thresholds.json
/// <base>/formulas/{feed,mix}_formula.json
/// <base>/reports/report_YYYYMMDD.json
/// <base>/exports/
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPaths {
    base_dir: PathBuf,
}

impl DataPaths {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    // ===== 库存 =====

    pub fn inventory_file(&self, warehouse: Warehouse) -> PathBuf {
        self.base_dir
            .join("inventory")
            .join(format!("{}_inventory.json", warehouse.as_str()))
    }

    pub fn packaging_file(&self, warehouse: Warehouse) -> PathBuf {
        self.base_dir
            .join("inventory")
            .join(format!("{}_packaging_info.json", warehouse.as_str()))
    }

    // ===== 阈值配置 =====

    pub fn threshold_config_file(&self) -> PathBuf {
        self.base_dir.join("config").join("threshold_config.json")
    }

    pub fn individual_thresholds_file(&self) -> PathBuf {
        self.base_dir.join("config").join("individual_thresholds.json")
    }

    // ===== 配方 =====

    pub fn formula_file(&self, warehouse: Warehouse) -> PathBuf {
        self.base_dir
            .join("formulas")
            .join(format!("{}_formula.json", warehouse.as_str()))
    }

    // ===== 日报 / 导出 =====

    pub fn reports_dir(&self) -> PathBuf {
        self.base_dir.join("reports")
    }

    pub fn report_file(&self, date: NaiveDate) -> PathBuf {
        self.reports_dir()
            .join(format!("report_{}.json", report_key(date)))
    }

    pub fn exports_dir(&self) -> PathBuf {
        self.base_dir.join("exports")
    }
}
