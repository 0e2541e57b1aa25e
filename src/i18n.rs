// ==========================================
// 国际化 (i18n) 模块
// ==========================================
// 使用 rust-i18n 库
// 支持越南语（默认）、英文、中文
// ==========================================
// 注意: rust_i18n::i18n! 宏已在 lib.rs 中初始化
// ==========================================

use crate::domain::types::{StockStatus, UsageLevel, Warehouse};

/// 获取当前语言
pub fn current_locale() -> String {
    rust_i18n::locale().to_string()
}

/// 设置语言
///
/// # 参数
/// - locale: 语言代码（"vi"、"en" 或 "zh-CN"）
pub fn set_locale(locale: &str) {
    rust_i18n::set_locale(locale);
}

/// 翻译消息（无参数）
pub fn t(key: &str) -> String {
    rust_i18n::t!(key).to_string()
}

/// 翻译消息（带参数）
///
/// # 示例
/// ```no_run
/// use feed_inventory::i18n::t_with_args;
/// let msg = t_with_args("alert.summary", &[("warehouse", "feed"), ("critical", "1"), ("warning", "2")]);
/// ```
pub fn t_with_args(key: &str, args: &[(&str, &str)]) -> String {
    let mut result = rust_i18n::t!(key).to_string();
    for (k, v) in args {
        let placeholder = format!("%{{{}}}", k);
        result = result.replace(&placeholder, v);
    }
    result
}

// ==========================================
// 领域标签
// ==========================================

pub fn status_label(status: StockStatus) -> String {
    t(&format!("status.{}", status.as_str()))
}

pub fn usage_level_label(level: UsageLevel) -> String {
    t(&format!("usage_level.{}", level.as_str()))
}

pub fn warehouse_label(warehouse: Warehouse) -> String {
    t(&format!("warehouse.{}", warehouse.as_str()))
}
