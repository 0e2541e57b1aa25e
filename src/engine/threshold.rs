// ==========================================
// Quản lý kho cám - mix - 阈值分类引擎
// ==========================================
// 职责: (剩余天数, 库存量) → 状态 + 颜色; 生成排序后的告警列表
// 配置: 全局阈值 + 原料级覆写（每次分类时合并）
// 红线: 任何有效配置必须满足 critical_days < warning_days < sufficient_days,
//       校验失败时保持原配置不变
// ==========================================
// 判定顺序:
// 1. 按天数启用且天数有限 → 天数规则
// 2. 有库存量且（按库存启用 或 无天数数据）→ 库存规则
// 3. 天数有限 → 天数规则
// 4. 其余 → no-data
// ==========================================

use crate::config::threshold_store::{OverrideMap, ThresholdStore};
use crate::domain::estimate::RemainingDays;
use crate::domain::threshold::{ThresholdConfig, ThresholdOverride};
use crate::domain::types::StockStatus;
use crate::repository::error::{RepositoryError, RepositoryResult};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

/// 分类结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub status: StockStatus,
    /// `#RRGGBB`
    pub color: String,
}

/// 告警条目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertItem {
    pub ingredient: String,
    pub status: StockStatus,
    pub color: String,
    /// None 表示无天数数据
    pub days_remaining: Option<RemainingDays>,
    pub stock: Option<f64>,
    /// 是否使用了原料级覆写
    pub has_override: bool,
}

/// 告警列表（各自按紧迫程度升序）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlertLists {
    pub critical: Vec<AlertItem>,
    pub warning: Vec<AlertItem>,
}

impl AlertLists {
    pub fn is_empty(&self) -> bool {
        self.critical.is_empty() && self.warning.is_empty()
    }

    pub fn len(&self) -> usize {
        self.critical.len() + self.warning.len()
    }
}

// ==========================================
// ThresholdClassifier - 阈值分类引擎
// ==========================================
pub struct ThresholdClassifier {
    store: ThresholdStore,
    global: ThresholdConfig,
    overrides: OverrideMap,
}

impl ThresholdClassifier {
    /// 从存储加载（异常时回退默认,不会失败）
    pub fn load(store: ThresholdStore) -> Self {
        let global = store.load_global();
        let overrides = store.load_overrides();
        tracing::info!("阈值配置加载完成: {} 条原料覆写", overrides.len());
        Self {
            store,
            global,
            overrides,
        }
    }

    // ==========================================
    // 配置查询
    // ==========================================

    pub fn global(&self) -> &ThresholdConfig {
        &self.global
    }

    pub fn overrides(&self) -> &OverrideMap {
        &self.overrides
    }

    pub fn has_override(&self, ingredient: &str) -> bool {
        self.overrides.contains_key(ingredient)
    }

    /// 原料的有效阈值（全局 + 覆写）
    pub fn effective_thresholds(&self, ingredient: Option<&str>) -> ThresholdConfig {
        match ingredient.and_then(|name| self.overrides.get(name)) {
            Some(overrides) => self.global.merged_with(overrides),
            None => self.global.clone(),
        }
    }

    // ==========================================
    // 配置修改
    // ==========================================

    /// 更新全局阈值
    ///
    /// 新全局配置本身及其与每条覆写合并后的结果都必须合法
    pub fn update_thresholds(&mut self, new_config: ThresholdConfig) -> RepositoryResult<()> {
        let mut messages = new_config.validate();
        for (ingredient, overrides) in &self.overrides {
            messages.extend(
                new_config
                    .merged_with(overrides)
                    .validate()
                    .into_iter()
                    .map(|m| format!("[{}] {}", ingredient, m)),
            );
        }
        if !messages.is_empty() {
            tracing::warn!("阈值更新被拒绝: {}", messages.join("; "));
            return Err(RepositoryError::validation(messages));
        }

        self.store.save_global(&new_config)?;
        self.global = new_config;
        tracing::info!("全局阈值已更新");
        Ok(())
    }

    /// 设置原料级覆写（替换该原料已有覆写）
    pub fn set_override(
        &mut self,
        ingredient: &str,
        overrides: ThresholdOverride,
    ) -> RepositoryResult<()> {
        let ingredient = ingredient.trim();
        if ingredient.is_empty() {
            return Err(RepositoryError::validation(vec!["原料名不能为空".to_string()]));
        }
        if overrides.is_empty() {
            self.remove_override(ingredient)?;
            return Ok(());
        }

        let messages = self.global.merged_with(&overrides).validate();
        if !messages.is_empty() {
            tracing::warn!("原料 {} 阈值覆写被拒绝: {}", ingredient, messages.join("; "));
            return Err(RepositoryError::validation(messages));
        }

        let mut next = self.overrides.clone();
        next.insert(ingredient.to_string(), overrides);
        self.store.save_overrides(&next)?;
        self.overrides = next;
        tracing::info!("原料 {} 阈值覆写已保存", ingredient);
        Ok(())
    }

    /// 删除原料级覆写
    pub fn remove_override(&mut self, ingredient: &str) -> RepositoryResult<bool> {
        if !self.overrides.contains_key(ingredient) {
            return Ok(false);
        }

        let mut next = self.overrides.clone();
        next.remove(ingredient);
        self.store.save_overrides(&next)?;
        self.overrides = next;
        tracing::info!("原料 {} 阈值覆写已删除", ingredient);
        Ok(true)
    }

    // ==========================================
    // 分类
    // ==========================================

    /// 分类单个原料
    ///
    /// # 参数
    /// - `days_remaining`: None 表示该原料无天数数据
    /// - `stock_amount`: 当前库存（kg）
    /// - `ingredient`: 用于查找覆写
    pub fn classify(
        &self,
        days_remaining: Option<RemainingDays>,
        stock_amount: Option<f64>,
        ingredient: Option<&str>,
    ) -> Classification {
        let config = self.effective_thresholds(ingredient);
        let status = classify_with(&config, days_remaining, stock_amount);
        Classification {
            status,
            color: config.color_for(status),
        }
    }

    /// 生成告警列表
    ///
    /// 覆盖两张表中出现的全部原料; 按天数启用时按剩余天数升序（Indefinite 最后）,
    /// 否则按库存升序; 同值按原料名
    pub fn alert_lists(
        &self,
        days_remaining_map: &BTreeMap<String, RemainingDays>,
        stock_map: &BTreeMap<String, f64>,
    ) -> AlertLists {
        let ingredients: BTreeSet<&String> =
            days_remaining_map.keys().chain(stock_map.keys()).collect();

        let mut lists = AlertLists::default();
        for ingredient in ingredients {
            let days = days_remaining_map.get(ingredient).copied();
            let stock = stock_map.get(ingredient).copied();
            let classification = self.classify(days, stock, Some(ingredient));

            let item = AlertItem {
                ingredient: ingredient.clone(),
                status: classification.status,
                color: classification.color,
                days_remaining: days,
                stock,
                has_override: self.has_override(ingredient),
            };

            match item.status {
                StockStatus::Critical => lists.critical.push(item),
                StockStatus::Warning => lists.warning.push(item),
                _ => {}
            }
        }

        let by_days = self.global.use_days_based;
        let compare = |a: &AlertItem, b: &AlertItem| -> Ordering {
            let primary = if by_days {
                days_sort_key(a.days_remaining).sort_cmp(&days_sort_key(b.days_remaining))
            } else {
                stock_sort_key(a.stock).total_cmp(&stock_sort_key(b.stock))
            };
            primary.then_with(|| a.ingredient.cmp(&b.ingredient))
        };
        lists.critical.sort_by(compare);
        lists.warning.sort_by(compare);

        tracing::debug!(
            "告警列表: critical={}, warning={}",
            lists.critical.len(),
            lists.warning.len()
        );
        lists
    }
}

/// 按给定有效配置判定状态
pub fn classify_with(
    config: &ThresholdConfig,
    days_remaining: Option<RemainingDays>,
    stock_amount: Option<f64>,
) -> StockStatus {
    let finite_days = days_remaining.and_then(|d| d.finite());

    // 1. 按天数
    if config.use_days_based {
        if let Some(days) = finite_days {
            return classify_by_days(config, days);
        }
    }

    // 2. 按库存（显式启用,或完全没有天数数据）
    if let Some(stock) = stock_amount {
        if config.use_stock_based || days_remaining.is_none() {
            return classify_by_stock(config, stock);
        }
    }

    // 3. 天数回退
    if let Some(days) = finite_days {
        return classify_by_days(config, days);
    }

    // 4. 无数据
    StockStatus::NoData
}

fn classify_by_days(config: &ThresholdConfig, days: f64) -> StockStatus {
    if days < config.critical_days {
        StockStatus::Critical
    } else if days < config.warning_days {
        StockStatus::Warning
    } else {
        StockStatus::Sufficient
    }
}

fn classify_by_stock(config: &ThresholdConfig, stock: f64) -> StockStatus {
    if stock <= config.critical_stock {
        StockStatus::Critical
    } else if stock <= config.warning_stock {
        StockStatus::Warning
    } else if stock > config.sufficient_stock {
        StockStatus::Sufficient
    } else {
        StockStatus::Normal
    }
}

fn days_sort_key(days: Option<RemainingDays>) -> RemainingDays {
    days.unwrap_or(RemainingDays::Indefinite)
}

fn stock_sort_key(stock: Option<f64>) -> f64 {
    stock.unwrap_or(f64::INFINITY)
}
