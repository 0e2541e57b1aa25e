// ==========================================
// Quản lý kho cám - mix - 生产记录 API
// ==========================================
// 职责: 登记一天的产量 → 按配方换算 → 扣减两个仓库 → 写当日日报
// 红线: 日报只追加,同一天只能登记一次
// 锁顺序: feed → mix,全程持有,同日重复登记被串行化
// 补偿: 后续写盘失败时,两个仓库恢复为扣减前快照
// ==========================================

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;

use crate::api::error::{lock, ApiError, ApiResult, OperationOutcome};
use crate::api::inventory_api::consume_messages;
use crate::domain::formula::Formula;
use crate::domain::report::{DailyReport, ReportDocument};
use crate::domain::types::Warehouse;
use crate::engine::formula::FormulaEngine;
use crate::repository::formula_repo::FormulaRepository;
use crate::repository::inventory_repo::InventoryStore;
use crate::repository::report_repo::ReportRepository;

/// 一天的产量登记
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProductionInput {
    pub date: NaiveDate,
    pub feed_kg: f64,
    pub mix_kg: f64,
    pub batch_count: f64,
}

impl ProductionInput {
    fn validate(&self) -> Vec<String> {
        let mut messages = Vec::new();
        for (field, value) in [
            ("feed 产量", self.feed_kg),
            ("mix 产量", self.mix_kg),
            ("批次数", self.batch_count),
        ] {
            if !value.is_finite() || value < 0.0 {
                messages.push(format!("{}必须是非负数: {}", field, value));
            }
        }
        messages
    }
}

// ==========================================
// ProductionApi - 生产记录 API
// ==========================================
pub struct ProductionApi {
    feed: Arc<Mutex<InventoryStore>>,
    mix: Arc<Mutex<InventoryStore>>,
    formula_repo: FormulaRepository,
    report_repo: Arc<dyn ReportRepository>,
    formula_engine: FormulaEngine,
}

impl ProductionApi {
    pub fn new(
        feed: Arc<Mutex<InventoryStore>>,
        mix: Arc<Mutex<InventoryStore>>,
        formula_repo: FormulaRepository,
        report_repo: Arc<dyn ReportRepository>,
    ) -> Self {
        Self {
            feed,
            mix,
            formula_repo,
            report_repo,
            formula_engine: FormulaEngine::new(),
        }
    }

    // ==========================================
    // 配方
    // ==========================================

    pub fn get_formula(&self, warehouse: Warehouse) -> ApiResult<Formula> {
        Ok(self.formula_repo.load(warehouse)?)
    }

    /// 保存配方; 百分比合计不为 100% 时仍保存,以提示消息返回
    pub fn save_formula(&self, formula: &Formula) -> OperationOutcome {
        match self.formula_repo.save(formula) {
            Ok(()) => OperationOutcome::ok_with(self.formula_engine.validate(formula)),
            Err(err) => Err::<(), ApiError>(err.into()).into(),
        }
    }

    /// 预览换算结果（不扣减）
    pub fn preview(&self, warehouse: Warehouse, production_kg: f64) -> ApiResult<BTreeMap<String, f64>> {
        let formula = self.formula_repo.load(warehouse)?;
        Ok(self.formula_engine.scale(&formula, production_kg))
    }

    // ==========================================
    // 登记产量
    // ==========================================

    /// 登记一天的产量
    ///
    /// 消息列表包含配方提示和库存不足提示; 这些都不影响成功标志
    pub fn record_production(&self, input: ProductionInput) -> OperationOutcome {
        match self.record(input) {
            Ok(messages) => OperationOutcome::ok_with(messages),
            Err(err) => Err::<(), _>(err).into(),
        }
    }

    fn record(&self, input: ProductionInput) -> ApiResult<Vec<String>> {
        let violations = input.validate();
        if !violations.is_empty() {
            return Err(ApiError::ValidationError(violations));
        }

        let mut feed_store = lock(&self.feed, "库存")?;
        let mut mix_store = lock(&self.mix, "库存")?;

        // 1. 日报唯一性
        if self.report_repo.exists(input.date)? {
            return Err(ApiError::AlreadyExists(format!(
                "{} 的日报已存在",
                input.date
            )));
        }

        // 2. 配方换算
        let mut messages = Vec::new();
        let feed_formula = self.formula_repo.load(Warehouse::Feed)?;
        let mix_formula = self.formula_repo.load(Warehouse::Mix)?;
        if input.feed_kg > 0.0 {
            messages.extend(self.formula_engine.validate(&feed_formula));
        }
        if input.mix_kg > 0.0 {
            messages.extend(self.formula_engine.validate(&mix_formula));
        }
        let feed_usage = self.formula_engine.scale(&feed_formula, input.feed_kg);
        let mix_usage = self.formula_engine.scale(&mix_formula, input.mix_kg);

        // 3. 扣减库存 + 写日报; 任一步失败时恢复快照
        let report = DailyReport::new(
            input.date,
            ReportDocument {
                feed_ingredients: feed_usage,
                mix_ingredients: mix_usage,
                total_feed: Some(input.feed_kg),
                total_mix: Some(input.mix_kg),
                batch_count: Some(input.batch_count),
            },
        );
        let feed_before = feed_store.get_all();
        let mix_before = mix_store.get_all();
        match self.apply(&mut feed_store, &mut mix_store, &report) {
            Ok(consume_notes) => messages.extend(consume_notes),
            Err(err) => {
                rollback(&mut feed_store, feed_before);
                rollback(&mut mix_store, mix_before);
                return Err(err);
            }
        }

        tracing::info!(
            "生产已登记 {}: feed={}kg, mix={}kg, 批次={}",
            input.date,
            input.feed_kg,
            input.mix_kg,
            input.batch_count
        );
        Ok(messages)
    }

    fn apply(
        &self,
        feed_store: &mut InventoryStore,
        mix_store: &mut InventoryStore,
        report: &DailyReport,
    ) -> ApiResult<Vec<String>> {
        let mut messages = Vec::new();
        for (warehouse, store) in [(Warehouse::Feed, feed_store), (Warehouse::Mix, mix_store)] {
            let usage = report.ingredients(warehouse);
            if usage.is_empty() {
                continue;
            }
            let summary = store.consume(usage)?;
            messages.extend(
                consume_messages(&summary)
                    .into_iter()
                    .map(|m| format!("[{}] {}", warehouse, m)),
            );
        }
        self.report_repo.save(report)?;
        Ok(messages)
    }
}

/// 恢复扣减前快照（未变化时跳过; 失败只记录日志）
fn rollback(store: &mut InventoryStore, before: BTreeMap<String, f64>) {
    if store.get_all() == before {
        return;
    }
    let warehouse = store.warehouse();
    match store.restore(before) {
        Ok(()) => tracing::warn!("[{}] 生产登记失败,库存已回滚", warehouse),
        Err(e) => tracing::error!("[{}] 生产登记失败且库存回滚失败: {}", warehouse, e),
    }
}
