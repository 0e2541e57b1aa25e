// ==========================================
// Quản lý kho cám - mix - 阈值配置存储
// ==========================================
// 存储: config/threshold_config.json (global scope)
//       config/individual_thresholds.json (ingredient scope)
// 读取策略: 缺失字段取默认值; 全局文档损坏或不合法 → 整体回退内置默认
// ==========================================

use crate::config::paths::DataPaths;
use crate::domain::threshold::{ThresholdConfig, ThresholdOverride};
use crate::repository::error::RepositoryResult;
use crate::repository::json_file::{read_json, write_json_atomic};
use std::collections::BTreeMap;

/// 原料名 → 覆写
pub type OverrideMap = BTreeMap<String, ThresholdOverride>;

pub struct ThresholdStore {
    paths: DataPaths,
}

impl ThresholdStore {
    pub fn new(paths: DataPaths) -> Self {
        Self { paths }
    }

    /// 读取全局配置（不会失败,异常时回退内置默认）
    pub fn load_global(&self) -> ThresholdConfig {
        let path = self.paths.threshold_config_file();
        match read_json::<ThresholdConfig>(&path) {
            Ok(Some(config)) => {
                let messages = config.validate();
                if messages.is_empty() {
                    config
                } else {
                    tracing::warn!(
                        "阈值配置不合法,使用内置默认值: {}",
                        messages.join("; ")
                    );
                    ThresholdConfig::default()
                }
            }
            Ok(None) => {
                tracing::debug!("阈值配置不存在,使用内置默认值: {}", path.display());
                ThresholdConfig::default()
            }
            Err(e) => {
                tracing::warn!("阈值配置读取失败,使用内置默认值: {}", e);
                ThresholdConfig::default()
            }
        }
    }

    /// 读取原料级覆写（异常时回退为空）
    pub fn load_overrides(&self) -> OverrideMap {
        match read_json::<OverrideMap>(&self.paths.individual_thresholds_file()) {
            Ok(Some(map)) => map,
            Ok(None) => OverrideMap::new(),
            Err(e) => {
                tracing::warn!("原料阈值覆写读取失败,忽略全部覆写: {}", e);
                OverrideMap::new()
            }
        }
    }

    pub fn save_global(&self, config: &ThresholdConfig) -> RepositoryResult<()> {
        write_json_atomic(&self.paths.threshold_config_file(), config)
    }

    pub fn save_overrides(&self, overrides: &OverrideMap) -> RepositoryResult<()> {
        write_json_atomic(&self.paths.individual_thresholds_file(), overrides)
    }
}
