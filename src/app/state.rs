// ==========================================
// Quản lý kho cám - mix - 应用状态
// ==========================================
// 职责: 组装仓储/引擎/API,持有共享锁
// 共享: 两个库存仓储与阈值引擎各自一把 Mutex,各 API 共用同一实例
// ==========================================

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::api::{DashboardApi, InventoryApi, ProductionApi, ThresholdApi};
use crate::config::paths::DataPaths;
use crate::config::threshold_store::ThresholdStore;
use crate::domain::types::Warehouse;
use crate::engine::threshold::ThresholdClassifier;
use crate::engine::usage_analyzer::UsageHistoryAnalyzer;
use crate::repository::formula_repo::FormulaRepository;
use crate::repository::inventory_repo::InventoryStore;
use crate::repository::report_repo::{JsonReportRepository, ReportRepository};

/// 数据目录环境变量
pub const DATA_DIR_ENV: &str = "FEED_INVENTORY_DATA_DIR";

/// 应用状态
pub struct AppState {
    pub data_paths: DataPaths,

    pub inventory_api: Arc<InventoryApi>,
    pub threshold_api: Arc<ThresholdApi>,
    pub dashboard_api: Arc<DashboardApi>,
    pub production_api: Arc<ProductionApi>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 参数
    /// - base_dir: 数据目录（不存在的文档按空处理）
    ///
    /// # 返回
    /// - Err(String): 库存文件损坏或无法读取
    pub fn new(base_dir: impl Into<PathBuf>) -> Result<Self, String> {
        let data_paths = DataPaths::new(base_dir);
        tracing::info!("初始化AppState,数据目录: {}", data_paths.base_dir().display());

        // ==========================================
        // 仓储层
        // ==========================================
        let feed_store = Arc::new(Mutex::new(
            InventoryStore::open(&data_paths, Warehouse::Feed)
                .map_err(|e| format!("无法加载 feed 库存: {}", e))?,
        ));
        let mix_store = Arc::new(Mutex::new(
            InventoryStore::open(&data_paths, Warehouse::Mix)
                .map_err(|e| format!("无法加载 mix 库存: {}", e))?,
        ));
        let report_repo: Arc<dyn ReportRepository> =
            Arc::new(JsonReportRepository::new(data_paths.clone()));

        // ==========================================
        // 引擎层
        // ==========================================
        let classifier = Arc::new(Mutex::new(ThresholdClassifier::load(ThresholdStore::new(
            data_paths.clone(),
        ))));
        let analyzer = UsageHistoryAnalyzer::new(report_repo.clone());

        // ==========================================
        // API层
        // ==========================================
        let inventory_api = Arc::new(InventoryApi::new(
            feed_store.clone(),
            mix_store.clone(),
            classifier.clone(),
        ));
        let threshold_api = Arc::new(ThresholdApi::new(classifier.clone()));
        let dashboard_api = Arc::new(DashboardApi::new(
            feed_store.clone(),
            mix_store.clone(),
            classifier,
            analyzer,
            data_paths.clone(),
        ));
        let production_api = Arc::new(ProductionApi::new(
            feed_store,
            mix_store,
            FormulaRepository::new(data_paths.clone()),
            report_repo,
        ));

        tracing::info!("AppState初始化完成");
        Ok(Self {
            data_paths,
            inventory_api,
            threshold_api,
            dashboard_api,
            production_api,
        })
    }
}

/// 默认数据目录
///
/// 1. 环境变量 FEED_INVENTORY_DATA_DIR（非空）
/// 2. 用户数据目录下 feed-inventory（开发构建为 feed-inventory-dev）
/// 3. ./data
pub fn get_default_data_dir() -> PathBuf {
    if let Ok(path) = std::env::var(DATA_DIR_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return PathBuf::from(trimmed);
        }
    }

    match dirs::data_dir() {
        // 开发环境使用独立目录,避免污染生产数据
        #[cfg(debug_assertions)]
        Some(data_dir) => data_dir.join("feed-inventory-dev"),

        #[cfg(not(debug_assertions))]
        Some(data_dir) => data_dir.join("feed-inventory"),

        None => PathBuf::from("./data"),
    }
}
