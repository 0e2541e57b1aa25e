// ==========================================
// Quản lý kho cám - mix - 领域类型定义
// ==========================================
// 仓库: Feed (cám) / Mix (phụ gia)
// 状态: 阈值分类状态 + 消耗分析粗粒度等级
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 仓库 (Warehouse)
// ==========================================
// 两个仓库相互独立,各自拥有库存与包装文档
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Warehouse {
    Feed, // cám
    Mix,  // mix / phụ gia
}

impl Warehouse {
    /// 全部仓库（固定顺序: feed 在前）
    pub const ALL: [Warehouse; 2] = [Warehouse::Feed, Warehouse::Mix];

    /// 文档文件名前缀
    pub fn as_str(&self) -> &'static str {
        match self {
            Warehouse::Feed => "feed",
            Warehouse::Mix => "mix",
        }
    }
}

impl fmt::Display for Warehouse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 阈值分类状态 (Stock Status)
// ==========================================
// 由 ThresholdClassifier 产出
// 顺序: Critical < Warning < Normal < Sufficient < NoData
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StockStatus {
    Critical,   // 危险
    Warning,    // 警告
    Normal,     // 正常(库存介于 warning 与 sufficient 之间)
    Sufficient, // 充足
    NoData,     // 无数据
}

impl StockStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StockStatus::Critical => "critical",
            StockStatus::Warning => "warning",
            StockStatus::Normal => "normal",
            StockStatus::Sufficient => "sufficient",
            StockStatus::NoData => "no-data",
        }
    }
}

impl fmt::Display for StockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 消耗分析粗粒度等级 (Usage Level)
// ==========================================
// 由 UsageHistoryAnalyzer 按剩余天数直接打标,与阈值分类相互独立
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UsageLevel {
    Critical, // <= 1 天
    Low,      // <= 3 天
    Warning,  // <= 7 天
    Good,     // 其余(含无消耗)
}

impl UsageLevel {
    pub const ALL: [UsageLevel; 4] = [
        UsageLevel::Critical,
        UsageLevel::Low,
        UsageLevel::Warning,
        UsageLevel::Good,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            UsageLevel::Critical => "critical",
            UsageLevel::Low => "low",
            UsageLevel::Warning => "warning",
            UsageLevel::Good => "good",
        }
    }
}

impl fmt::Display for UsageLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 语义颜色槽位 (Status Color)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StatusColor {
    Red,
    Orange,
    Green,
    Gray,
}

impl StatusColor {
    /// 内置调色板
    pub fn default_hex(&self) -> &'static str {
        match self {
            StatusColor::Red => "#F44336",
            StatusColor::Orange => "#FF9800",
            StatusColor::Green => "#4CAF50",
            StatusColor::Gray => "#9E9E9E",
        }
    }
}

impl From<StockStatus> for StatusColor {
    fn from(status: StockStatus) -> Self {
        match status {
            StockStatus::Critical => StatusColor::Red,
            StockStatus::Warning => StatusColor::Orange,
            StockStatus::Normal | StockStatus::Sufficient => StatusColor::Green,
            StockStatus::NoData => StatusColor::Gray,
        }
    }
}

impl fmt::Display for StatusColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusColor::Red => write!(f, "red"),
            StatusColor::Orange => write!(f, "orange"),
            StatusColor::Green => write!(f, "green"),
            StatusColor::Gray => write!(f, "gray"),
        }
    }
}
