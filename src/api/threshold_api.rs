// ==========================================
// Quản lý kho cám - mix - 阈值配置 API
// ==========================================
// 职责: 全局阈值查询/更新,原料级覆写管理
// ==========================================

use std::sync::{Arc, Mutex};

use crate::api::error::{lock, ApiResult, OperationOutcome};
use crate::config::threshold_store::OverrideMap;
use crate::domain::threshold::{ThresholdConfig, ThresholdOverride};
use crate::engine::threshold::ThresholdClassifier;
use crate::repository::error::RepositoryResult;

// ==========================================
// ThresholdApi - 阈值配置 API
// ==========================================
pub struct ThresholdApi {
    classifier: Arc<Mutex<ThresholdClassifier>>,
}

impl ThresholdApi {
    pub fn new(classifier: Arc<Mutex<ThresholdClassifier>>) -> Self {
        Self { classifier }
    }

    /// 当前全局阈值
    pub fn get_thresholds(&self) -> ApiResult<ThresholdConfig> {
        Ok(lock(&self.classifier, "阈值配置")?.global().clone())
    }

    /// 原料有效阈值（全局 + 覆写）
    pub fn effective_thresholds(&self, ingredient: Option<&str>) -> ApiResult<ThresholdConfig> {
        Ok(lock(&self.classifier, "阈值配置")?.effective_thresholds(ingredient))
    }

    pub fn list_overrides(&self) -> ApiResult<OverrideMap> {
        Ok(lock(&self.classifier, "阈值配置")?.overrides().clone())
    }

    /// 更新全局阈值（校验失败时原配置保持不变）
    pub fn update_thresholds(&self, new_config: ThresholdConfig) -> OperationOutcome {
        self.with_classifier(|classifier| classifier.update_thresholds(new_config))
            .into()
    }

    pub fn set_override(&self, ingredient: &str, overrides: ThresholdOverride) -> OperationOutcome {
        self.with_classifier(|classifier| classifier.set_override(ingredient, overrides))
            .into()
    }

    pub fn remove_override(&self, ingredient: &str) -> OperationOutcome {
        match self.with_classifier(|classifier| classifier.remove_override(ingredient)) {
            Ok(true) => OperationOutcome::ok(),
            Ok(false) => OperationOutcome::ok_with(vec![format!("原料 {} 没有覆写", ingredient)]),
            Err(err) => Err::<(), _>(err).into(),
        }
    }

    /// 在配置锁内执行 读-改-写盘
    fn with_classifier<T>(
        &self,
        op: impl FnOnce(&mut ThresholdClassifier) -> RepositoryResult<T>,
    ) -> ApiResult<T> {
        let mut classifier = lock(&self.classifier, "阈值配置")?;
        Ok(op(&mut *classifier)?)
    }
}
