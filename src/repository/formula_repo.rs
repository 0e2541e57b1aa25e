// ==========================================
// Quản lý kho cám - mix - 配方仓储
// ==========================================
// 存储: formulas/{feed,mix}_formula.json ({ 原料名: 百分比 })
// ==========================================

use crate::config::paths::DataPaths;
use crate::domain::formula::Formula;
use crate::domain::inventory::validate_name;
use crate::domain::types::Warehouse;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::json_file::{read_json, write_json_atomic};
use std::collections::BTreeMap;

pub struct FormulaRepository {
    paths: DataPaths,
}

impl FormulaRepository {
    pub fn new(paths: DataPaths) -> Self {
        Self { paths }
    }

    /// 读取配方（文件不存在时返回空配方）
    pub fn load(&self, warehouse: Warehouse) -> RepositoryResult<Formula> {
        let composition: Option<BTreeMap<String, f64>> =
            read_json(&self.paths.formula_file(warehouse))?;
        Ok(Formula::new(warehouse, composition.unwrap_or_default()))
    }

    /// 保存配方（整体重写）
    pub fn save(&self, formula: &Formula) -> RepositoryResult<()> {
        let mut messages = Vec::new();
        for (name, percent) in &formula.composition {
            messages.extend(validate_name(name));
            if !percent.is_finite() || *percent < 0.0 || *percent > 100.0 {
                messages.push(format!("{}: 百分比必须在0~100之间: {}", name, percent));
            }
        }
        if !messages.is_empty() {
            return Err(RepositoryError::validation(messages));
        }

        write_json_atomic(&self.paths.formula_file(formula.warehouse), &formula.composition)?;
        tracing::info!(
            "[{}] 配方已保存: {} 项原料",
            formula.warehouse,
            formula.composition.len()
        );
        Ok(())
    }
}
