// ==========================================
// Quản lý kho cám - mix - 配方换算引擎
// ==========================================
// 职责: 按配方百分比把产量换算为各原料消耗量
// 输入: 配方 { 原料: % } + 产量 (kg)
// 输出: { 原料: kg }
// ==========================================

use crate::domain::formula::Formula;
use std::collections::BTreeMap;

/// 百分比合计允许偏差
pub const PERCENT_TOLERANCE: f64 = 0.01;

// ==========================================
// FormulaEngine - 配方换算引擎
// ==========================================
pub struct FormulaEngine {
    // 无状态引擎
}

impl FormulaEngine {
    pub fn new() -> Self {
        Self {}
    }

    /// 按产量换算原料消耗
    ///
    /// 百分比 <= 0 的原料跳过; 产量 <= 0 时返回空表
    pub fn scale(&self, formula: &Formula, production_kg: f64) -> BTreeMap<String, f64> {
        if !production_kg.is_finite() || production_kg <= 0.0 {
            return BTreeMap::new();
        }

        formula
            .composition
            .iter()
            .filter(|(_, percent)| percent.is_finite() && **percent > 0.0)
            .map(|(ingredient, percent)| (ingredient.clone(), percent / 100.0 * production_kg))
            .collect()
    }

    /// 配方检查（仅提示,不阻断）
    ///
    /// # 返回
    /// 提示消息列表
    pub fn validate(&self, formula: &Formula) -> Vec<String> {
        let mut warnings = Vec::new();

        if formula.is_empty() {
            warnings.push(format!("[{}] 配方为空", formula.warehouse));
            return warnings;
        }

        let total = formula.total_percent();
        if (total - 100.0).abs() > PERCENT_TOLERANCE {
            warnings.push(format!(
                "[{}] 配方百分比合计为 {:.2}%, 不等于 100%",
                formula.warehouse, total
            ));
        }

        warnings
    }
}

impl Default for FormulaEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::Warehouse;

    fn feed_formula(items: &[(&str, f64)]) -> Formula {
        Formula::new(
            Warehouse::Feed,
            items.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
        )
    }

    #[test]
    fn test_scale_proportional() {
        let engine = FormulaEngine::new();
        let formula = feed_formula(&[("Bắp", 60.0), ("Cám gạo", 40.0), ("Muối", 0.0)]);

        let amounts = engine.scale(&formula, 2000.0);
        assert_eq!(amounts.get("Bắp"), Some(&1200.0));
        assert_eq!(amounts.get("Cám gạo"), Some(&800.0));
        assert!(!amounts.contains_key("Muối"));
        assert!(engine.scale(&formula, 0.0).is_empty());
    }

    #[test]
    fn test_validate_total() {
        let engine = FormulaEngine::new();
        assert!(engine.validate(&feed_formula(&[("Bắp", 60.0), ("Cám gạo", 40.0)])).is_empty());
        assert_eq!(engine.validate(&feed_formula(&[("Bắp", 60.0)])).len(), 1);
        assert_eq!(engine.validate(&feed_formula(&[])).len(), 1);
    }
}
