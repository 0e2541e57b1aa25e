// ==========================================
// Quản lý kho cám - mix - 剩余天数估算
// ==========================================
// 剩余天数 = 当前库存 / 日均消耗
// 无消耗数据时为 Indefinite,不使用数值哨兵
// ==========================================

use crate::domain::types::UsageLevel;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

// ==========================================
// RemainingDays - 剩余天数
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "days", rename_all = "lowercase")]
pub enum RemainingDays {
    /// 有正的日均消耗
    Finite(f64),
    /// 窗口内无任何正消耗记录
    Indefinite,
}

impl RemainingDays {
    /// 由库存与日均消耗计算
    ///
    /// 日均消耗缺失或不为正时返回 Indefinite
    pub fn from_usage(current_quantity: f64, daily_usage: Option<f64>) -> Self {
        match daily_usage {
            Some(usage) if usage > 0.0 => RemainingDays::Finite(current_quantity / usage),
            _ => RemainingDays::Indefinite,
        }
    }

    pub fn finite(&self) -> Option<f64> {
        match self {
            RemainingDays::Finite(days) => Some(*days),
            RemainingDays::Indefinite => None,
        }
    }

    /// 排序比较: Indefinite 大于任何有限值
    pub fn sort_cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (RemainingDays::Finite(a), RemainingDays::Finite(b)) => a.total_cmp(b),
            (RemainingDays::Finite(_), RemainingDays::Indefinite) => Ordering::Less,
            (RemainingDays::Indefinite, RemainingDays::Finite(_)) => Ordering::Greater,
            (RemainingDays::Indefinite, RemainingDays::Indefinite) => Ordering::Equal,
        }
    }
}

impl fmt::Display for RemainingDays {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemainingDays::Finite(days) => write!(f, "{:.1}", days),
            RemainingDays::Indefinite => write!(f, "∞"),
        }
    }
}

// ==========================================
// UsageLevelCutoffs - 粗粒度等级分界
// ==========================================
/// 消耗分析自带的固定分界（天）,可独立于阈值配置调整
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UsageLevelCutoffs {
    pub critical_days: f64,
    pub low_days: f64,
    pub warning_days: f64,
}

impl Default for UsageLevelCutoffs {
    fn default() -> Self {
        Self {
            critical_days: 1.0,
            low_days: 3.0,
            warning_days: 7.0,
        }
    }
}

impl UsageLevelCutoffs {
    /// 按剩余天数打标（边界含等号）
    pub fn level_for(&self, days: RemainingDays) -> UsageLevel {
        match days {
            RemainingDays::Finite(d) if d <= self.critical_days => UsageLevel::Critical,
            RemainingDays::Finite(d) if d <= self.low_days => UsageLevel::Low,
            RemainingDays::Finite(d) if d <= self.warning_days => UsageLevel::Warning,
            _ => UsageLevel::Good,
        }
    }
}

// ==========================================
// RemainingEstimate - 单个原料的估算结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemainingEstimate {
    pub ingredient: String,
    pub current_quantity: f64,
    /// 窗口内日均消耗（无正消耗记录时为 None）
    pub daily_usage: Option<f64>,
    pub days_remaining: RemainingDays,
    pub level: UsageLevel,
}
