// ==========================================
// Quản lý kho cám - mix - 阈值配置模型
// ==========================================
// 存储: config/threshold_config.json (全局)
//       config/individual_thresholds.json (原料级覆写)
// 合并: 全局默认 → 原料覆写中出现的字段逐项替换
// 约束: critical_days < warning_days < sufficient_days
// ==========================================

use crate::domain::types::{StatusColor, StockStatus};
use serde::{Deserialize, Serialize};

/// 全局阈值配置（缺失字段取默认值）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdConfig {
    // ===== 按剩余天数 =====
    pub critical_days: f64,
    pub warning_days: f64,
    pub sufficient_days: f64,

    // ===== 按库存量 (kg) =====
    pub critical_stock: f64,
    pub warning_stock: f64,
    pub sufficient_stock: f64,

    // ===== 分类方式 =====
    pub use_days_based: bool,
    pub use_stock_based: bool,

    // ===== 展示/提醒 =====
    pub show_alerts_on_startup: bool,
    pub show_popup_alerts: bool,
    pub enable_sound_alerts: bool,
    pub auto_report_enabled: bool,
    pub auto_report_interval_hours: u32,

    // ===== 颜色 =====
    pub use_custom_colors: bool,
    pub critical_color: String,
    pub warning_color: String,
    pub sufficient_color: String,
    pub no_data_color: String,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            critical_days: 7.0,
            warning_days: 14.0,
            sufficient_days: 30.0,
            critical_stock: 100.0,
            warning_stock: 500.0,
            sufficient_stock: 1000.0,
            use_days_based: true,
            use_stock_based: false,
            show_alerts_on_startup: true,
            show_popup_alerts: true,
            enable_sound_alerts: false,
            auto_report_enabled: false,
            auto_report_interval_hours: 24,
            use_custom_colors: false,
            critical_color: StatusColor::Red.default_hex().to_string(),
            warning_color: StatusColor::Orange.default_hex().to_string(),
            sufficient_color: StatusColor::Green.default_hex().to_string(),
            no_data_color: StatusColor::Gray.default_hex().to_string(),
        }
    }
}

impl ThresholdConfig {
    /// 校验配置
    ///
    /// # 返回
    /// 违规消息列表（为空表示通过）
    pub fn validate(&self) -> Vec<String> {
        let mut messages = Vec::new();

        let numbers = [
            ("critical_days", self.critical_days),
            ("warning_days", self.warning_days),
            ("sufficient_days", self.sufficient_days),
            ("critical_stock", self.critical_stock),
            ("warning_stock", self.warning_stock),
            ("sufficient_stock", self.sufficient_stock),
        ];
        for (field, value) in numbers {
            if !value.is_finite() || value < 0.0 {
                messages.push(format!("{} 必须为非负数: {}", field, value));
            }
        }

        if !(self.critical_days < self.warning_days) {
            messages.push(format!(
                "critical_days({}) 必须小于 warning_days({})",
                self.critical_days, self.warning_days
            ));
        }
        if !(self.warning_days < self.sufficient_days) {
            messages.push(format!(
                "warning_days({}) 必须小于 sufficient_days({})",
                self.warning_days, self.sufficient_days
            ));
        }
        if !(self.critical_stock <= self.warning_stock && self.warning_stock <= self.sufficient_stock) {
            messages.push(format!(
                "库存阈值顺序错误: critical_stock({}) <= warning_stock({}) <= sufficient_stock({})",
                self.critical_stock, self.warning_stock, self.sufficient_stock
            ));
        }
        if self.auto_report_interval_hours == 0 {
            messages.push("auto_report_interval_hours 必须大于0".to_string());
        }

        messages
    }

    /// 合并原料覆写,返回新的有效配置
    pub fn merged_with(&self, overrides: &ThresholdOverride) -> ThresholdConfig {
        let mut merged = self.clone();

        macro_rules! apply {
            ($($field:ident),* $(,)?) => {
                $(
                    if let Some(value) = &overrides.$field {
                        merged.$field = value.clone();
                    }
                )*
            };
        }

        apply!(
            critical_days,
            warning_days,
            sufficient_days,
            critical_stock,
            warning_stock,
            sufficient_stock,
            use_days_based,
            use_stock_based,
            show_alerts_on_startup,
            show_popup_alerts,
            enable_sound_alerts,
            auto_report_enabled,
            auto_report_interval_hours,
            use_custom_colors,
            critical_color,
            warning_color,
            sufficient_color,
            no_data_color,
        );

        merged
    }

    /// 解析状态颜色
    ///
    /// 启用自定义颜色时使用配置值,格式非法的槽位回退内置颜色
    pub fn color_for(&self, status: StockStatus) -> String {
        let slot = StatusColor::from(status);
        if !self.use_custom_colors {
            return slot.default_hex().to_string();
        }

        let configured = match slot {
            StatusColor::Red => &self.critical_color,
            StatusColor::Orange => &self.warning_color,
            StatusColor::Green => &self.sufficient_color,
            StatusColor::Gray => &self.no_data_color,
        };

        if is_hex_color(configured) {
            configured.clone()
        } else {
            tracing::debug!("颜色配置非法,回退内置颜色: slot={}, value={}", slot, configured);
            slot.default_hex().to_string()
        }
    }
}

/// 原料级覆写（仅出现的字段生效）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ThresholdOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub critical_days: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning_days: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sufficient_days: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub critical_stock: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning_stock: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sufficient_stock: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_days_based: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_stock_based: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_alerts_on_startup: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_popup_alerts: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_sound_alerts: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_report_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_report_interval_hours: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_custom_colors: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub critical_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sufficient_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no_data_color: Option<String>,
}

impl ThresholdOverride {
    pub fn is_empty(&self) -> bool {
        *self == ThresholdOverride::default()
    }
}

/// `#RRGGBB` 格式校验
pub fn is_hex_color(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() == 7 && bytes[0] == b'#' && bytes[1..].iter().all(|b| b.is_ascii_hexdigit())
}
