// ==========================================
// Quản lý kho cám - mix - 配方模型
// ==========================================
// 文件: formulas/{feed,mix}_formula.json
// 格式: { 原料名: 百分比 }
// ==========================================

use crate::domain::types::Warehouse;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 配方（百分比构成）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Formula {
    pub warehouse: Warehouse,
    /// 原料 → 百分比 (0~100)
    pub composition: BTreeMap<String, f64>,
}

impl Formula {
    pub fn new(warehouse: Warehouse, composition: BTreeMap<String, f64>) -> Self {
        Self {
            warehouse,
            composition,
        }
    }

    pub fn empty(warehouse: Warehouse) -> Self {
        Self::new(warehouse, BTreeMap::new())
    }

    /// 百分比合计
    pub fn total_percent(&self) -> f64 {
        self.composition.values().filter(|p| **p > 0.0).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.composition.values().all(|p| *p <= 0.0)
    }
}
