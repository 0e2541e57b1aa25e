// ==========================================
// Quản lý kho cám - mix - 库存仓储
// ==========================================
// 职责: 单个仓库（feed / mix）当前库存的唯一持有者
// 存储: inventory/{wh}_inventory.json + inventory/{wh}_packaging_info.json
// 红线: 数量永不为负; 库存键与包装键在增/删/改名时保持同步
// ==========================================
// 写入策略: 先写盘后替换内存; 写盘失败时内存保持原状
// ==========================================

use crate::config::paths::DataPaths;
use crate::domain::inventory::{
    clamp_non_negative, validate_bag_size, validate_name, validate_quantity, IngredientSnapshot,
};
use crate::domain::types::Warehouse;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::json_file::{read_json, write_json_atomic};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// 扣减时库存不足的记录（扣减后已截断为 0）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shortage {
    pub ingredient: String,
    pub requested: f64,
    pub available: f64,
}

/// 扣减结果
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConsumeSummary {
    /// 实际扣减量合计
    pub consumed_total: f64,
    /// 库存不足被截断的原料
    pub shortages: Vec<Shortage>,
    /// 库存中不存在的原料（跳过）
    pub missing: Vec<String>,
}

// ==========================================
// InventoryStore - 库存仓储
// ==========================================
pub struct InventoryStore {
    warehouse: Warehouse,
    inventory_path: PathBuf,
    packaging_path: PathBuf,
    quantities: BTreeMap<String, f64>,
    packaging: BTreeMap<String, u32>,
}

impl InventoryStore {
    /// 从数据目录加载仓库
    ///
    /// # 说明
    /// - 文件不存在视为空仓库
    /// - 文件损坏返回 CorruptData（不以空仓库覆盖人工数据）
    pub fn open(paths: &DataPaths, warehouse: Warehouse) -> RepositoryResult<Self> {
        let inventory_path = paths.inventory_file(warehouse);
        let packaging_path = paths.packaging_file(warehouse);

        let raw_quantities: BTreeMap<String, f64> =
            read_json(&inventory_path)?.unwrap_or_default();
        let raw_packaging: BTreeMap<String, f64> =
            read_json(&packaging_path)?.unwrap_or_default();

        let mut quantities = BTreeMap::new();
        for (name, quantity) in raw_quantities {
            if quantity < 0.0 || !quantity.is_finite() {
                tracing::warn!(
                    "[{}] 原料 {} 库存值异常({}), 已按0处理",
                    warehouse,
                    name,
                    quantity
                );
            }
            quantities.insert(name, clamp_non_negative(quantity));
        }

        let mut packaging = BTreeMap::new();
        for (name, bag) in raw_packaging {
            if bag.is_finite() && bag >= 1.0 && bag <= u32::MAX as f64 {
                packaging.insert(name, bag.round() as u32);
            } else {
                tracing::warn!("[{}] 原料 {} 包装规格异常({}), 已忽略", warehouse, name, bag);
            }
        }

        tracing::info!(
            "[{}] 库存加载完成: {} 种原料, {} 条包装信息",
            warehouse,
            quantities.len(),
            packaging.len()
        );

        Ok(Self {
            warehouse,
            inventory_path,
            packaging_path,
            quantities,
            packaging,
        })
    }

    pub fn warehouse(&self) -> Warehouse {
        self.warehouse
    }

    // ==========================================
    // 查询
    // ==========================================

    /// 当前库存快照（副本）
    pub fn get_all(&self) -> BTreeMap<String, f64> {
        self.quantities.clone()
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.quantities.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.quantities.contains_key(name)
    }

    /// 包装信息快照（副本）
    pub fn packaging(&self) -> BTreeMap<String, u32> {
        self.packaging.clone()
    }

    pub fn bag_size(&self, name: &str) -> Option<u32> {
        self.packaging.get(name).copied()
    }

    /// 按原料名排序的完整快照
    pub fn snapshot(&self) -> Vec<IngredientSnapshot> {
        self.quantities
            .iter()
            .map(|(name, quantity)| IngredientSnapshot {
                warehouse: self.warehouse,
                name: name.clone(),
                quantity: *quantity,
                bag_size: self.packaging.get(name).copied(),
            })
            .collect()
    }

    // ==========================================
    // 修改
    // ==========================================

    /// 设置单个原料库存
    pub fn set_quantity(&mut self, name: &str, amount: f64) -> RepositoryResult<()> {
        let name = name.trim();
        let messages = validate_quantity(amount);
        if !messages.is_empty() {
            return Err(RepositoryError::validation(messages));
        }
        if !self.quantities.contains_key(name) {
            return Err(self.not_found(name));
        }

        let mut quantities = self.quantities.clone();
        quantities.insert(name.to_string(), amount);
        self.commit(Some(quantities), None)?;

        tracing::info!("[{}] 设置库存: {} = {}", self.warehouse, name, amount);
        Ok(())
    }

    /// 新增原料
    ///
    /// # 校验
    /// - 名称非空、长度与字符合法、未重复
    /// - 初始数量 >= 0
    /// - 每袋重量 > 0
    pub fn add_item(
        &mut self,
        name: &str,
        initial_quantity: f64,
        bag_size: i64,
    ) -> RepositoryResult<()> {
        let name = name.trim();
        let mut messages = validate_name(name);
        messages.extend(validate_quantity(initial_quantity));
        messages.extend(validate_bag_size(bag_size));
        if self.quantities.contains_key(name) {
            messages.push(format!("原料已存在: {}", name));
        }
        if !messages.is_empty() {
            return Err(RepositoryError::validation(messages));
        }

        let mut quantities = self.quantities.clone();
        let mut packaging = self.packaging.clone();
        quantities.insert(name.to_string(), initial_quantity);
        packaging.insert(name.to_string(), bag_size as u32);
        self.commit(Some(quantities), Some(packaging))?;

        tracing::info!(
            "[{}] 新增原料: {} (数量={}, 每袋={}kg)",
            self.warehouse,
            name,
            initial_quantity,
            bag_size
        );
        Ok(())
    }

    /// 删除原料（不存在时为幂等空操作）
    ///
    /// # 返回
    /// - Ok(true): 已删除
    /// - Ok(false): 原料不存在
    pub fn remove_item(&mut self, name: &str) -> RepositoryResult<bool> {
        let name = name.trim();
        if !self.quantities.contains_key(name) && !self.packaging.contains_key(name) {
            return Ok(false);
        }

        let mut quantities = self.quantities.clone();
        let mut packaging = self.packaging.clone();
        quantities.remove(name);
        packaging.remove(name);
        self.commit(Some(quantities), Some(packaging))?;

        tracing::info!("[{}] 删除原料: {}", self.warehouse, name);
        Ok(true)
    }

    /// 重命名原料并同时更新数量与包装
    pub fn rename_item(
        &mut self,
        old_name: &str,
        new_name: &str,
        new_quantity: f64,
        new_bag_size: i64,
    ) -> RepositoryResult<()> {
        let old_name = old_name.trim();
        let new_name = new_name.trim();
        if !self.quantities.contains_key(old_name) {
            return Err(self.not_found(old_name));
        }

        let mut messages = validate_name(new_name);
        messages.extend(validate_quantity(new_quantity));
        messages.extend(validate_bag_size(new_bag_size));
        if new_name != old_name && self.quantities.contains_key(new_name) {
            messages.push(format!("原料已存在: {}", new_name));
        }
        if !messages.is_empty() {
            return Err(RepositoryError::validation(messages));
        }

        let mut quantities = self.quantities.clone();
        let mut packaging = self.packaging.clone();
        quantities.remove(old_name);
        packaging.remove(old_name);
        quantities.insert(new_name.to_string(), new_quantity);
        packaging.insert(new_name.to_string(), new_bag_size as u32);
        self.commit(Some(quantities), Some(packaging))?;

        tracing::info!("[{}] 重命名原料: {} -> {}", self.warehouse, old_name, new_name);
        Ok(())
    }

    /// 批量扣减库存（下限截断为 0,全部扣减后统一写盘一次）
    pub fn consume(&mut self, amounts: &BTreeMap<String, f64>) -> RepositoryResult<ConsumeSummary> {
        let messages: Vec<String> = amounts
            .iter()
            .flat_map(|(name, amount)| {
                validate_quantity(*amount)
                    .into_iter()
                    .map(move |m| format!("{}: {}", name, m))
            })
            .collect();
        if !messages.is_empty() {
            return Err(RepositoryError::validation(messages));
        }

        let amounts = &normalize_amounts(amounts);
        let mut summary = ConsumeSummary::default();
        let mut quantities = self.quantities.clone();

        for (name, amount) in amounts {
            let Some(current) = quantities.get_mut(name) else {
                tracing::warn!("[{}] 扣减跳过: 库存中无原料 {}", self.warehouse, name);
                summary.missing.push(name.clone());
                continue;
            };

            if *amount > *current {
                summary.shortages.push(Shortage {
                    ingredient: name.clone(),
                    requested: *amount,
                    available: *current,
                });
                summary.consumed_total += *current;
            } else {
                summary.consumed_total += *amount;
            }
            *current = clamp_non_negative(*current - *amount);
        }

        self.commit(Some(quantities), None)?;

        if !summary.shortages.is_empty() {
            tracing::warn!(
                "[{}] 扣减时库存不足 {} 项,已截断为0",
                self.warehouse,
                summary.shortages.len()
            );
        }
        tracing::info!(
            "[{}] 扣减完成: {} 项, 合计 {:.3} kg",
            self.warehouse,
            amounts.len(),
            summary.consumed_total
        );
        Ok(summary)
    }

    /// 批量入库（原料不存在时按入库量新建,统一写盘一次）
    pub fn replenish(&mut self, amounts: &BTreeMap<String, f64>) -> RepositoryResult<()> {
        let mut messages: Vec<String> = amounts
            .iter()
            .flat_map(|(name, amount)| {
                validate_quantity(*amount)
                    .into_iter()
                    .map(move |m| format!("{}: {}", name, m))
            })
            .collect();
        if !messages.is_empty() {
            return Err(RepositoryError::validation(messages));
        }

        let amounts = &normalize_amounts(amounts);
        let mut quantities = self.quantities.clone();
        for (name, amount) in amounts {
            if !quantities.contains_key(name) {
                messages.extend(validate_name(name));
            }
            // 入库后的合计同样必须是有限值,否则写盘后无法再加载
            let total = quantities.get(name).copied().unwrap_or(0.0) + *amount;
            messages.extend(
                validate_quantity(total)
                    .into_iter()
                    .map(|m| format!("{}: 入库后{}", name, m)),
            );
            quantities.insert(name.clone(), total);
        }
        if !messages.is_empty() {
            return Err(RepositoryError::validation(messages));
        }

        self.commit(Some(quantities), None)?;

        tracing::info!("[{}] 入库完成: {} 项", self.warehouse, amounts.len());
        Ok(())
    }

    /// 整体恢复为先前的库存快照（用于多步操作失败后的补偿）
    pub fn restore(&mut self, snapshot: BTreeMap<String, f64>) -> RepositoryResult<()> {
        self.commit(Some(snapshot), None)?;
        tracing::info!("[{}] 库存已恢复为操作前快照", self.warehouse);
        Ok(())
    }

    // ==========================================
    // 持久化
    // ==========================================

    /// 写盘成功后替换内存状态
    ///
    /// 第二个文件写入失败时,尽力把第一个文件恢复为原内容
    fn commit(
        &mut self,
        quantities: Option<BTreeMap<String, f64>>,
        packaging: Option<BTreeMap<String, u32>>,
    ) -> RepositoryResult<()> {
        if let Some(q) = &quantities {
            write_json_atomic(&self.inventory_path, q).map_err(|e| {
                tracing::error!("[{}] 库存写盘失败: {}", self.warehouse, e);
                e
            })?;
        }

        if let Some(p) = &packaging {
            if let Err(e) = write_json_atomic(&self.packaging_path, p) {
                tracing::error!("[{}] 包装信息写盘失败: {}", self.warehouse, e);
                if quantities.is_some() {
                    if let Err(restore_err) = write_json_atomic(&self.inventory_path, &self.quantities) {
                        tracing::error!(
                            "[{}] 库存文件恢复失败,磁盘与内存可能不一致: {}",
                            self.warehouse,
                            restore_err
                        );
                    }
                }
                return Err(e);
            }
        }

        if let Some(q) = quantities {
            self.quantities = q;
        }
        if let Some(p) = packaging {
            self.packaging = p;
        }
        Ok(())
    }

    fn not_found(&self, name: &str) -> RepositoryError {
        RepositoryError::NotFound {
            entity: format!("{}原料", self.warehouse),
            id: name.to_string(),
        }
    }
}

/// 原料名去首尾空白; 去空白后重名的条目数量相加
fn normalize_amounts(amounts: &BTreeMap<String, f64>) -> BTreeMap<String, f64> {
    let mut normalized = BTreeMap::new();
    for (name, amount) in amounts {
        *normalized.entry(name.trim().to_string()).or_insert(0.0) += *amount;
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn open_store(dir: &TempDir) -> InventoryStore {
        InventoryStore::open(&DataPaths::new(dir.path()), Warehouse::Feed).unwrap()
    }

    #[test]
    fn test_add_and_reload() {
        let dir = TempDir::new().unwrap();
        let mut store = open_store(&dir);
        store.add_item("Bắp", 10.0, 25).unwrap();

        let reloaded = open_store(&dir);
        assert_eq!(reloaded.get("Bắp"), Some(10.0));
        assert_eq!(reloaded.bag_size("Bắp"), Some(25));
    }

    #[test]
    fn test_duplicate_rejected_keeps_first() {
        let dir = TempDir::new().unwrap();
        let mut store = open_store(&dir);
        store.add_item("Bắp", 10.0, 25).unwrap();

        let second = store.add_item("Bắp", 99.0, 50);
        assert!(matches!(second, Err(RepositoryError::ValidationError { .. })));
        assert_eq!(store.get_all().len(), 1);
        assert_eq!(store.get("Bắp"), Some(10.0));
        assert_eq!(store.bag_size("Bắp"), Some(25));
    }

    #[test]
    fn test_add_collects_all_violations() {
        let dir = TempDir::new().unwrap();
        let mut store = open_store(&dir);
        match store.add_item("a|b", -1.0, 0) {
            Err(RepositoryError::ValidationError { messages }) => assert_eq!(messages.len(), 3),
            other => panic!("unexpected: {:?}", other.err()),
        }
        assert!(store.get_all().is_empty());
    }

    #[test]
    fn test_consume_clamps_and_reports() {
        let dir = TempDir::new().unwrap();
        let mut store = open_store(&dir);
        store.add_item("Bắp", 30.0, 50).unwrap();
        store.add_item("Cám gạo", 100.0, 40).unwrap();

        let mut amounts = BTreeMap::new();
        amounts.insert("Bắp".to_string(), 50.0);
        amounts.insert("Cám gạo".to_string(), 40.0);
        amounts.insert("Đậu nành".to_string(), 5.0);
        let summary = store.consume(&amounts).unwrap();

        assert_eq!(store.get("Bắp"), Some(0.0));
        assert_eq!(store.get("Cám gạo"), Some(60.0));
        assert_eq!(summary.shortages.len(), 1);
        assert_eq!(summary.missing, vec!["Đậu nành".to_string()]);
        assert_eq!(summary.consumed_total, 70.0);
        assert!(!store.contains("Đậu nành"));
    }

    #[test]
    fn test_rename_moves_both_maps() {
        let dir = TempDir::new().unwrap();
        let mut store = open_store(&dir);
        store.add_item("Bap", 10.0, 25).unwrap();
        store.add_item("Cám", 5.0, 40).unwrap();

        assert!(store.rename_item("Bap", "Cám", 1.0, 1).is_err());

        store.rename_item("Bap", "Bắp", 12.0, 50).unwrap();
        assert!(!store.contains("Bap"));
        assert_eq!(store.bag_size("Bap"), None);
        assert_eq!(store.get("Bắp"), Some(12.0));
        assert_eq!(store.bag_size("Bắp"), Some(50));

        // 同名改名仅更新数量与包装
        store.rename_item("Bắp", "Bắp", 15.0, 25).unwrap();
        assert_eq!(store.get("Bắp"), Some(15.0));
    }

    #[test]
    fn test_remove_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let mut store = open_store(&dir);
        store.add_item("Bắp", 10.0, 25).unwrap();

        assert!(store.remove_item("Bắp").unwrap());
        assert!(!store.remove_item("Bắp").unwrap());
        assert!(store.packaging().is_empty());
    }

    #[test]
    fn test_set_quantity_rejects_negative() {
        let dir = TempDir::new().unwrap();
        let mut store = open_store(&dir);
        store.add_item("Bắp", 10.0, 25).unwrap();

        assert!(store.set_quantity("Bắp", -3.0).is_err());
        assert!(matches!(
            store.set_quantity("Không có", 3.0),
            Err(RepositoryError::NotFound { .. })
        ));
        store.set_quantity("Bắp", 3.0).unwrap();
        assert_eq!(store.get("Bắp"), Some(3.0));
    }

    #[test]
    fn test_replenish_creates_missing_entry() {
        let dir = TempDir::new().unwrap();
        let mut store = open_store(&dir);
        store.add_item("Bắp", 10.0, 25).unwrap();

        let mut amounts = BTreeMap::new();
        amounts.insert("Bắp".to_string(), 5.0);
        amounts.insert("Premix".to_string(), 2.5);
        store.replenish(&amounts).unwrap();

        assert_eq!(store.get("Bắp"), Some(15.0));
        assert_eq!(store.get("Premix"), Some(2.5));
    }

    #[test]
    fn test_replenish_overflow_rejected() {
        let dir = TempDir::new().unwrap();
        let mut store = open_store(&dir);
        store.add_item("Bắp", f64::MAX, 25).unwrap();

        let mut amounts = BTreeMap::new();
        amounts.insert("Bắp".to_string(), f64::MAX);
        let result = store.replenish(&amounts);

        assert!(matches!(result, Err(RepositoryError::ValidationError { .. })));
        assert_eq!(store.get("Bắp"), Some(f64::MAX));
        // 磁盘上仍是可加载的有限值
        let reloaded = open_store(&dir).get("Bắp").unwrap();
        assert!(reloaded.is_finite() && reloaded > 0.0);
    }

    #[test]
    fn test_names_trimmed_on_every_path() {
        let dir = TempDir::new().unwrap();
        let mut store = open_store(&dir);
        store.add_item(" Bắp ", 10.0, 25).unwrap();
        assert!(store.contains("Bắp"));

        store.set_quantity(" Bắp ", 20.0).unwrap();
        assert_eq!(store.get("Bắp"), Some(20.0));

        let mut amounts = BTreeMap::new();
        amounts.insert("Bắp ".to_string(), 5.0);
        amounts.insert(" Bắp".to_string(), 3.0);
        let summary = store.consume(&amounts).unwrap();
        assert!(summary.missing.is_empty());
        assert_eq!(store.get("Bắp"), Some(12.0));

        store.replenish(&amounts).unwrap();
        assert_eq!(store.get("Bắp"), Some(20.0));
        assert_eq!(store.get_all().len(), 1);

        store.rename_item(" Bắp", "Bắp vàng", 1.0, 50).unwrap();
        assert!(store.remove_item("  Bắp vàng ").unwrap());
        assert!(store.get_all().is_empty());
    }

    #[test]
    fn test_failed_write_keeps_memory() {
        let dir = TempDir::new().unwrap();
        let paths = DataPaths::new(dir.path());
        let mut store = open_store(&dir);
        store.add_item("Bắp", 10.0, 25).unwrap();

        // 目标路径变成目录,rename 必然失败
        std::fs::remove_file(paths.inventory_file(Warehouse::Feed)).unwrap();
        std::fs::create_dir(paths.inventory_file(Warehouse::Feed)).unwrap();

        let result = store.set_quantity("Bắp", 99.0);
        assert!(matches!(result, Err(RepositoryError::Io { .. })));
        assert_eq!(store.get("Bắp"), Some(10.0));
    }

    #[test]
    fn test_packaging_write_failure_restores_inventory_file() {
        let dir = TempDir::new().unwrap();
        let paths = DataPaths::new(dir.path());
        let mut store = open_store(&dir);
        store.add_item("Bắp", 10.0, 25).unwrap();

        std::fs::remove_file(paths.packaging_file(Warehouse::Feed)).unwrap();
        std::fs::create_dir(paths.packaging_file(Warehouse::Feed)).unwrap();

        let result = store.add_item("Cám gạo", 5.0, 40);
        assert!(matches!(result, Err(RepositoryError::Io { .. })));
        assert!(!store.contains("Cám gạo"));
        assert_eq!(store.bag_size("Bắp"), Some(25));

        let on_disk: BTreeMap<String, f64> =
            crate::repository::json_file::read_json(&paths.inventory_file(Warehouse::Feed))
                .unwrap()
                .unwrap();
        assert_eq!(on_disk.len(), 1);
        assert_eq!(on_disk.get("Bắp"), Some(&10.0));
    }

    #[test]
    fn test_restore_snapshot() {
        let dir = TempDir::new().unwrap();
        let mut store = open_store(&dir);
        store.add_item("Bắp", 10.0, 25).unwrap();
        let before = store.get_all();

        let mut amounts = BTreeMap::new();
        amounts.insert("Bắp".to_string(), 4.0);
        store.consume(&amounts).unwrap();
        store.restore(before).unwrap();

        assert_eq!(store.get("Bắp"), Some(10.0));
        assert_eq!(open_store(&dir).get("Bắp"), Some(10.0));
    }
}
