// ==========================================
// Quản lý kho cám - mix - 消耗历史分析引擎
// ==========================================
// 职责: 滑动窗口日均消耗 + 剩余天数估算
// 输入: 最近 N 天日报 + 当前库存
// 输出: 每个原料的 RemainingEstimate + 汇总
// ==========================================
// 口径:
// - 缺失日报的日期直接跳过,不视为零消耗
// - 日均 = 正消耗合计 / 有正消耗的日报数
// - 窗口内无正消耗的原料不出现在日均结果中
// - 内部不做任何取整
// ==========================================

use crate::domain::estimate::{RemainingDays, RemainingEstimate, UsageLevelCutoffs};
use crate::domain::report::DailyReport;
use crate::domain::types::{UsageLevel, Warehouse};
use crate::repository::report_repo::ReportRepository;
use chrono::{Duration, Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use uuid::Uuid;

/// 常用窗口（天）
pub const DEFAULT_WINDOW_DAYS: u32 = 7;

/// 窗口上限（天）
pub const MAX_WINDOW_DAYS: u32 = 366;

/// 单仓库分析结果
pub type WarehouseEstimates = BTreeMap<String, RemainingEstimate>;

/// 分析汇总
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub analyzed_at: NaiveDateTime,
    pub window_days: u32,
    /// 实际加载到的日报日期（升序）
    pub report_dates: Vec<NaiveDate>,
    pub feed_counts: BTreeMap<UsageLevel, usize>,
    pub mix_counts: BTreeMap<UsageLevel, usize>,
}

/// 综合分析结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageAnalysis {
    pub analysis_id: String,
    pub feed: WarehouseEstimates,
    pub mix: WarehouseEstimates,
    pub summary: AnalysisSummary,
}

impl UsageAnalysis {
    pub fn estimates(&self, warehouse: Warehouse) -> &WarehouseEstimates {
        match warehouse {
            Warehouse::Feed => &self.feed,
            Warehouse::Mix => &self.mix,
        }
    }
}

// ==========================================
// UsageHistoryAnalyzer - 消耗历史分析引擎
// ==========================================
pub struct UsageHistoryAnalyzer {
    report_repo: Arc<dyn ReportRepository>,
    cutoffs: UsageLevelCutoffs,
}

impl UsageHistoryAnalyzer {
    pub fn new(report_repo: Arc<dyn ReportRepository>) -> Self {
        Self {
            report_repo,
            cutoffs: UsageLevelCutoffs::default(),
        }
    }

    /// 自定义粗粒度等级分界
    pub fn with_cutoffs(mut self, cutoffs: UsageLevelCutoffs) -> Self {
        self.cutoffs = cutoffs;
        self
    }

    pub fn cutoffs(&self) -> UsageLevelCutoffs {
        self.cutoffs
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 加载截至 `today`（含）的最近 `window_days` 天日报
    ///
    /// 缺失日期静默跳过; 单个日报损坏时记录日志并跳过,不中断整体加载
    /// 窗口越过最小可表示日期时在该处截止
    pub fn load_reports(&self, window_days: u32, today: NaiveDate) -> Vec<DailyReport> {
        let mut reports = Vec::new();

        for offset in 0..window_days {
            let Some(date) = today.checked_sub_signed(Duration::days(i64::from(offset))) else {
                tracing::warn!("窗口超出日期范围,截止于第 {} 天", offset);
                break;
            };
            match self.report_repo.find_by_date(date) {
                Ok(Some(report)) => reports.push(report),
                Ok(None) => {
                    tracing::trace!("日报不存在,跳过: {}", date);
                }
                Err(e) => {
                    tracing::warn!("日报读取失败,跳过 {}: {}", date, e);
                }
            }
        }

        // 按日期升序
        reports.reverse();
        tracing::debug!(
            "加载日报: 窗口={}天, 实际={}份, 截止={}",
            window_days,
            reports.len(),
            today
        );
        reports
    }

    /// 计算指定仓库的日均消耗
    pub fn average_daily_usage(
        &self,
        reports: &[DailyReport],
        warehouse: Warehouse,
    ) -> BTreeMap<String, f64> {
        let mut totals: BTreeMap<String, (f64, u32)> = BTreeMap::new();

        for report in reports {
            for (ingredient, amount) in report.ingredients(warehouse) {
                if amount.is_finite() && *amount > 0.0 {
                    let entry = totals.entry(ingredient.clone()).or_insert((0.0, 0));
                    entry.0 += *amount;
                    entry.1 += 1;
                }
            }
        }

        totals
            .into_iter()
            .map(|(ingredient, (sum, count))| (ingredient, sum / f64::from(count)))
            .collect()
    }

    /// 计算剩余天数并打粗粒度等级
    pub fn remaining_days(
        &self,
        current_inventory: &BTreeMap<String, f64>,
        daily_usage: &BTreeMap<String, f64>,
    ) -> WarehouseEstimates {
        current_inventory
            .iter()
            .map(|(ingredient, quantity)| {
                let usage = daily_usage.get(ingredient).copied().filter(|u| *u > 0.0);
                let days_remaining = RemainingDays::from_usage(*quantity, usage);
                let estimate = RemainingEstimate {
                    ingredient: ingredient.clone(),
                    current_quantity: *quantity,
                    daily_usage: usage,
                    days_remaining,
                    level: self.cutoffs.level_for(days_remaining),
                };
                (ingredient.clone(), estimate)
            })
            .collect()
    }

    /// 综合分析（两个仓库）
    ///
    /// # 参数
    /// - `window_days`: 窗口天数
    /// - `feed_inventory` / `mix_inventory`: 当前库存快照
    /// - `today`: 窗口截止日期（含）
    pub fn comprehensive_analysis(
        &self,
        window_days: u32,
        feed_inventory: &BTreeMap<String, f64>,
        mix_inventory: &BTreeMap<String, f64>,
        today: NaiveDate,
    ) -> UsageAnalysis {
        // 1. 加载日报
        let reports = self.load_reports(window_days, today);

        // 2. 日均消耗
        let feed_usage = self.average_daily_usage(&reports, Warehouse::Feed);
        let mix_usage = self.average_daily_usage(&reports, Warehouse::Mix);

        // 3. 剩余天数
        let feed = self.remaining_days(feed_inventory, &feed_usage);
        let mix = self.remaining_days(mix_inventory, &mix_usage);

        // 4. 汇总
        let summary = AnalysisSummary {
            analyzed_at: Local::now().naive_local(),
            window_days,
            report_dates: reports.iter().map(|r| r.date).collect(),
            feed_counts: count_levels(&feed),
            mix_counts: count_levels(&mix),
        };

        tracing::info!(
            "消耗分析完成: 窗口={}天, 日报={}份, feed={}项, mix={}项",
            window_days,
            summary.report_dates.len(),
            feed.len(),
            mix.len()
        );

        UsageAnalysis {
            analysis_id: Uuid::new_v4().to_string(),
            feed,
            mix,
            summary,
        }
    }
}

/// 按等级计数（所有等级都有键,便于展示）
fn count_levels(estimates: &WarehouseEstimates) -> BTreeMap<UsageLevel, usize> {
    let mut counts: BTreeMap<UsageLevel, usize> =
        UsageLevel::ALL.iter().map(|level| (*level, 0)).collect();
    for estimate in estimates.values() {
        *counts.entry(estimate.level).or_insert(0) += 1;
    }
    counts
}
