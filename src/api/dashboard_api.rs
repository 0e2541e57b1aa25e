// ==========================================
// Quản lý kho cám - mix - 仪表盘 API
// ==========================================
// 职责: 综合分析 + 原料状态视图 + 告警列表 + CSV 导出
// 数据流: 库存快照 → 消耗分析 → 阈值分类
// 锁顺序: 库存（逐个,取完快照即释放）→ 阈值配置
// ==========================================

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use chrono::{Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::api::display::bag_count;
use crate::api::error::{lock, ApiError, ApiResult};
use crate::config::paths::DataPaths;
use crate::domain::estimate::RemainingDays;
use crate::domain::types::{StockStatus, UsageLevel, Warehouse};
use crate::engine::threshold::{AlertLists, ThresholdClassifier};
use crate::engine::usage_analyzer::{UsageAnalysis, UsageHistoryAnalyzer, MAX_WINDOW_DAYS};
use crate::exporter::analysis_csv;
use crate::i18n;
use crate::repository::inventory_repo::InventoryStore;

/// 导出文件名时间戳格式
const EXPORT_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// 单个原料的状态视图
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemStatusView {
    pub warehouse: Warehouse,
    pub ingredient: String,
    pub quantity: f64,
    pub bag_size: Option<u32>,
    pub bag_count: Option<f64>,
    pub daily_usage: Option<f64>,
    pub days_remaining: RemainingDays,
    /// 消耗分析的粗粒度等级
    pub usage_level: UsageLevel,
    /// 阈值分类结果
    pub status: StockStatus,
    pub color: String,
    /// 本地化状态名
    pub label: String,
    pub has_override: bool,
}

/// 两个仓库的告警列表
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WarehouseAlerts {
    pub feed: AlertLists,
    pub mix: AlertLists,
}

impl WarehouseAlerts {
    pub fn get(&self, warehouse: Warehouse) -> &AlertLists {
        match warehouse {
            Warehouse::Feed => &self.feed,
            Warehouse::Mix => &self.mix,
        }
    }

    pub fn total(&self) -> usize {
        self.feed.len() + self.mix.len()
    }
}

// ==========================================
// DashboardApi - 仪表盘 API
// ==========================================
pub struct DashboardApi {
    feed: Arc<Mutex<InventoryStore>>,
    mix: Arc<Mutex<InventoryStore>>,
    classifier: Arc<Mutex<ThresholdClassifier>>,
    analyzer: UsageHistoryAnalyzer,
    paths: DataPaths,
}

impl DashboardApi {
    pub fn new(
        feed: Arc<Mutex<InventoryStore>>,
        mix: Arc<Mutex<InventoryStore>>,
        classifier: Arc<Mutex<ThresholdClassifier>>,
        analyzer: UsageHistoryAnalyzer,
        paths: DataPaths,
    ) -> Self {
        Self {
            feed,
            mix,
            classifier,
            analyzer,
            paths,
        }
    }

    fn store(&self, warehouse: Warehouse) -> &Arc<Mutex<InventoryStore>> {
        match warehouse {
            Warehouse::Feed => &self.feed,
            Warehouse::Mix => &self.mix,
        }
    }

    // ==========================================
    // 综合分析
    // ==========================================

    /// 以今天为截止日的综合分析
    pub fn comprehensive_analysis(&self, window_days: u32) -> ApiResult<UsageAnalysis> {
        self.comprehensive_analysis_at(window_days, Local::now().date_naive())
    }

    pub fn comprehensive_analysis_at(
        &self,
        window_days: u32,
        today: NaiveDate,
    ) -> ApiResult<UsageAnalysis> {
        if window_days == 0 || window_days > MAX_WINDOW_DAYS {
            return Err(ApiError::InvalidInput(format!(
                "分析窗口必须在 1 到 {} 天之间: {}",
                MAX_WINDOW_DAYS, window_days
            )));
        }

        let feed_inventory = lock(&self.feed, "库存")?.get_all();
        let mix_inventory = lock(&self.mix, "库存")?.get_all();

        Ok(self
            .analyzer
            .comprehensive_analysis(window_days, &feed_inventory, &mix_inventory, today))
    }

    // ==========================================
    // 状态视图
    // ==========================================

    /// 指定仓库全部原料的状态视图（按原料名排序）
    pub fn inventory_status(
        &self,
        warehouse: Warehouse,
        window_days: u32,
    ) -> ApiResult<Vec<ItemStatusView>> {
        self.inventory_status_at(warehouse, window_days, Local::now().date_naive())
    }

    pub fn inventory_status_at(
        &self,
        warehouse: Warehouse,
        window_days: u32,
        today: NaiveDate,
    ) -> ApiResult<Vec<ItemStatusView>> {
        let analysis = self.comprehensive_analysis_at(window_days, today)?;
        self.status_views(&analysis, warehouse)
    }

    fn status_views(
        &self,
        analysis: &UsageAnalysis,
        warehouse: Warehouse,
    ) -> ApiResult<Vec<ItemStatusView>> {
        let items = lock(self.store(warehouse), "库存")?.snapshot();
        let classifier = lock(&self.classifier, "阈值配置")?;
        let estimates = analysis.estimates(warehouse);
        let cutoffs = self.analyzer.cutoffs();

        let mut views: Vec<ItemStatusView> = items
            .into_iter()
            .map(|item| {
                // 快照之后新增的原料没有分析数据
                let (days, daily_usage) = match estimates.get(&item.name) {
                    Some(estimate) => (Some(estimate.days_remaining), estimate.daily_usage),
                    None => (None, None),
                };
                let days_remaining = days.unwrap_or(RemainingDays::Indefinite);
                let classification =
                    classifier.classify(days, Some(item.quantity), Some(&item.name));

                ItemStatusView {
                    warehouse,
                    bag_count: bag_count(item.quantity, item.bag_size),
                    quantity: item.quantity,
                    bag_size: item.bag_size,
                    daily_usage,
                    days_remaining,
                    usage_level: cutoffs.level_for(days_remaining),
                    status: classification.status,
                    color: classification.color,
                    label: i18n::status_label(classification.status),
                    has_override: classifier.has_override(&item.name),
                    ingredient: item.name,
                }
            })
            .collect();

        views.sort_by(|a, b| a.ingredient.cmp(&b.ingredient));
        Ok(views)
    }

    // ==========================================
    // 告警
    // ==========================================

    pub fn alerts(&self, window_days: u32) -> ApiResult<WarehouseAlerts> {
        self.alerts_at(window_days, Local::now().date_naive())
    }

    pub fn alerts_at(&self, window_days: u32, today: NaiveDate) -> ApiResult<WarehouseAlerts> {
        let analysis = self.comprehensive_analysis_at(window_days, today)?;
        let classifier = lock(&self.classifier, "阈值配置")?;

        let lists_for = |warehouse: Warehouse| -> AlertLists {
            let estimates = analysis.estimates(warehouse);
            let days: BTreeMap<String, RemainingDays> = estimates
                .iter()
                .map(|(name, e)| (name.clone(), e.days_remaining))
                .collect();
            let stock: BTreeMap<String, f64> = estimates
                .iter()
                .map(|(name, e)| (name.clone(), e.current_quantity))
                .collect();
            classifier.alert_lists(&days, &stock)
        };

        let alerts = WarehouseAlerts {
            feed: lists_for(Warehouse::Feed),
            mix: lists_for(Warehouse::Mix),
        };

        if alerts.total() > 0 {
            tracing::info!(
                "库存告警: feed={}(critical {}), mix={}(critical {})",
                alerts.feed.len(),
                alerts.feed.critical.len(),
                alerts.mix.len(),
                alerts.mix.critical.len()
            );
        }
        Ok(alerts)
    }

    // ==========================================
    // 导出
    // ==========================================

    /// 导出两个仓库的状态报表,返回 CSV 路径
    pub fn export_report(&self, window_days: u32) -> ApiResult<PathBuf> {
        self.export_report_at(window_days, Local::now().naive_local())
    }

    pub fn export_report_at(&self, window_days: u32, now: NaiveDateTime) -> ApiResult<PathBuf> {
        let analysis = self.comprehensive_analysis_at(window_days, now.date())?;

        let mut views = self.status_views(&analysis, Warehouse::Feed)?;
        views.extend(self.status_views(&analysis, Warehouse::Mix)?);

        let path = self.paths.exports_dir().join(format!(
            "inventory_report_{}.csv",
            now.format(EXPORT_TIMESTAMP_FORMAT)
        ));
        analysis_csv::export(&views, &path)?;

        tracing::info!("报表已导出: {} ({} 行)", path.display(), views.len());
        Ok(path)
    }
}
