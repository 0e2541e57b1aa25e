// ==========================================
// Quản lý kho cám - mix - 库存管理 API
// ==========================================
// 职责: 两个仓库的库存查询与修改
// 返回: 修改类操作统一返回 OperationOutcome（成功标志 + 消息列表）
// 并发: 每次 读-改-写盘 全程持有对应仓库的锁
// 覆写: 删除/改名时同步原料级阈值覆写; 锁顺序 feed → mix → 阈值配置
// ==========================================

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use crate::api::display::format_quantity;
use crate::api::error::{lock, ApiResult, OperationOutcome};
use crate::domain::types::Warehouse;
use crate::engine::threshold::ThresholdClassifier;
use crate::repository::error::RepositoryResult;
use crate::repository::inventory_repo::{ConsumeSummary, InventoryStore};

// ==========================================
// InventoryApi - 库存管理 API
// ==========================================
pub struct InventoryApi {
    feed: Arc<Mutex<InventoryStore>>,
    mix: Arc<Mutex<InventoryStore>>,
    classifier: Arc<Mutex<ThresholdClassifier>>,
}

impl InventoryApi {
    pub fn new(
        feed: Arc<Mutex<InventoryStore>>,
        mix: Arc<Mutex<InventoryStore>>,
        classifier: Arc<Mutex<ThresholdClassifier>>,
    ) -> Self {
        Self {
            feed,
            mix,
            classifier,
        }
    }

    fn store(&self, warehouse: Warehouse) -> &Arc<Mutex<InventoryStore>> {
        match warehouse {
            Warehouse::Feed => &self.feed,
            Warehouse::Mix => &self.mix,
        }
    }

    /// 在仓库锁内执行操作
    fn with_store<T>(
        &self,
        warehouse: Warehouse,
        op: impl FnOnce(&mut InventoryStore) -> RepositoryResult<T>,
    ) -> ApiResult<T> {
        let mut store = lock(self.store(warehouse), "库存")?;
        Ok(op(&mut *store)?)
    }

    // ==========================================
    // 查询
    // ==========================================

    /// 当前库存快照
    pub fn get_all(&self, warehouse: Warehouse) -> ApiResult<BTreeMap<String, f64>> {
        Ok(lock(self.store(warehouse), "库存")?.get_all())
    }

    // ==========================================
    // 修改
    // ==========================================

    pub fn set_quantity(&self, warehouse: Warehouse, name: &str, amount: f64) -> OperationOutcome {
        self.with_store(warehouse, |store| store.set_quantity(name, amount))
            .into()
    }

    pub fn add_item(
        &self,
        warehouse: Warehouse,
        name: &str,
        initial_quantity: f64,
        bag_size: i64,
    ) -> OperationOutcome {
        self.with_store(warehouse, |store| {
            store.add_item(name, initial_quantity, bag_size)
        })
        .into()
    }

    /// 删除原料
    ///
    /// 另一个仓库也没有该原料时,一并删除其阈值覆写
    pub fn remove_item(&self, warehouse: Warehouse, name: &str) -> OperationOutcome {
        match self.remove(warehouse, name.trim()) {
            Ok(messages) => OperationOutcome::ok_with(messages),
            Err(err) => Err::<(), _>(err).into(),
        }
    }

    fn remove(&self, warehouse: Warehouse, name: &str) -> ApiResult<Vec<String>> {
        let mut feed = lock(&self.feed, "库存")?;
        let mut mix = lock(&self.mix, "库存")?;
        let (store, other) = match warehouse {
            Warehouse::Feed => (&mut *feed, &*mix),
            Warehouse::Mix => (&mut *mix, &*feed),
        };

        if !store.remove_item(name)? {
            return Ok(vec![format!("原料不存在,无需删除: {}", name)]);
        }
        if other.contains(name) {
            return Ok(Vec::new());
        }

        let mut classifier = lock(&self.classifier, "阈值配置")?;
        Ok(match classifier.remove_override(name) {
            Ok(_) => Vec::new(),
            Err(e) => {
                tracing::warn!("原料 {} 已删除,但阈值覆写删除失败: {}", name, e);
                vec![format!("原料 {} 的阈值覆写删除失败: {}", name, e)]
            }
        })
    }

    /// 重命名原料
    ///
    /// 旧名有阈值覆写时转到新名下; 另一个仓库仍使用旧名时保留旧名覆写
    pub fn rename_item(
        &self,
        warehouse: Warehouse,
        old_name: &str,
        new_name: &str,
        new_quantity: f64,
        new_bag_size: i64,
    ) -> OperationOutcome {
        match self.rename(
            warehouse,
            old_name.trim(),
            new_name.trim(),
            new_quantity,
            new_bag_size,
        ) {
            Ok(messages) => OperationOutcome::ok_with(messages),
            Err(err) => Err::<(), _>(err).into(),
        }
    }

    fn rename(
        &self,
        warehouse: Warehouse,
        old_name: &str,
        new_name: &str,
        new_quantity: f64,
        new_bag_size: i64,
    ) -> ApiResult<Vec<String>> {
        let mut feed = lock(&self.feed, "库存")?;
        let mut mix = lock(&self.mix, "库存")?;
        let (store, other) = match warehouse {
            Warehouse::Feed => (&mut *feed, &*mix),
            Warehouse::Mix => (&mut *mix, &*feed),
        };

        store.rename_item(old_name, new_name, new_quantity, new_bag_size)?;
        if old_name == new_name {
            return Ok(Vec::new());
        }

        let mut classifier = lock(&self.classifier, "阈值配置")?;
        let Some(overrides) = classifier.overrides().get(old_name).cloned() else {
            return Ok(Vec::new());
        };
        if classifier.has_override(new_name) {
            return Ok(vec![format!(
                "{} 已有阈值覆写,未用 {} 的覆写替换",
                new_name, old_name
            )]);
        }

        let moved = classifier.set_override(new_name, overrides).and_then(|_| {
            if other.contains(old_name) {
                Ok(false)
            } else {
                classifier.remove_override(old_name)
            }
        });
        Ok(match moved {
            Ok(_) => Vec::new(),
            Err(e) => {
                tracing::warn!("原料已改名 {} -> {},但阈值覆写迁移失败: {}", old_name, new_name, e);
                vec![format!("阈值覆写迁移失败: {}", e)]
            }
        })
    }

    /// 扣减库存
    ///
    /// 库存不足/原料缺失不算失败,以提示消息返回
    pub fn consume(&self, warehouse: Warehouse, amounts: &BTreeMap<String, f64>) -> OperationOutcome {
        match self.with_store(warehouse, |store| store.consume(amounts)) {
            Ok(summary) => OperationOutcome::ok_with(consume_messages(&summary)),
            Err(err) => Err::<(), _>(err).into(),
        }
    }

    pub fn replenish(&self, warehouse: Warehouse, amounts: &BTreeMap<String, f64>) -> OperationOutcome {
        self.with_store(warehouse, |store| store.replenish(amounts))
            .into()
    }
}

/// 扣减结果转为提示消息（库存不足在前,缺失原料在后）
pub(crate) fn consume_messages(summary: &ConsumeSummary) -> Vec<String> {
    let mut messages: Vec<String> = summary
        .shortages
        .iter()
        .map(|s| {
            format!(
                "{} 库存不足: 需要 {} kg, 仅有 {} kg",
                s.ingredient,
                format_quantity(s.requested),
                format_quantity(s.available)
            )
        })
        .collect();
    messages.extend(
        summary
            .missing
            .iter()
            .map(|name| format!("{} 不在库存中,已跳过", name)),
    );
    messages
}
