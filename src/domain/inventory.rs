// ==========================================
// Quản lý kho cám - mix - 原料与库存校验
// ==========================================
// 原料名同时用作 JSON 键与文件名片段,需排除路径不安全字符
// ==========================================

use crate::domain::types::Warehouse;
use serde::{Deserialize, Serialize};

/// 原料名最大长度（字符数）
pub const MAX_NAME_LEN: usize = 100;

/// 路径不安全字符
pub const FORBIDDEN_NAME_CHARS: [char; 9] = ['<', '>', ':', '"', '|', '?', '*', '\\', '/'];

/// 原料快照（库存 + 包装）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientSnapshot {
    pub warehouse: Warehouse,
    pub name: String,
    pub quantity: f64,
    /// 每袋重量 (kg),仅用于展示
    pub bag_size: Option<u32>,
}

/// 校验原料名
///
/// # 返回
/// 违规消息列表（为空表示通过）
pub fn validate_name(name: &str) -> Vec<String> {
    let mut messages = Vec::new();
    let trimmed = name.trim();

    if trimmed.is_empty() {
        messages.push("原料名不能为空".to_string());
        return messages;
    }
    if trimmed.chars().count() > MAX_NAME_LEN {
        messages.push(format!("原料名过长（最多{}个字符）: {}", MAX_NAME_LEN, trimmed));
    }

    let bad: Vec<char> = trimmed
        .chars()
        .filter(|c| FORBIDDEN_NAME_CHARS.contains(c))
        .collect();
    if !bad.is_empty() {
        let listed: String = bad.iter().map(|c| c.to_string()).collect::<Vec<_>>().join(" ");
        messages.push(format!("原料名包含非法字符 [{}]: {}", listed, trimmed));
    }

    messages
}

/// 校验数量（kg）: 必须为有限且 >= 0
pub fn validate_quantity(quantity: f64) -> Vec<String> {
    if !quantity.is_finite() {
        vec![format!("数量无效: {}", quantity)]
    } else if quantity < 0.0 {
        vec![format!("数量不能为负数: {}", quantity)]
    } else {
        Vec::new()
    }
}

/// 校验每袋重量: 必须 > 0
pub fn validate_bag_size(bag_size: i64) -> Vec<String> {
    if bag_size <= 0 {
        vec![format!("每袋重量必须大于0: {}", bag_size)]
    } else if bag_size > u32::MAX as i64 {
        vec![format!("每袋重量过大: {}", bag_size)]
    } else {
        Vec::new()
    }
}

/// 数量下限截断为 0
pub fn clamp_non_negative(quantity: f64) -> f64 {
    if quantity.is_finite() && quantity > 0.0 {
        quantity
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name() {
        assert!(validate_name("Bắp").is_empty());
        assert!(validate_name("L-Lysine").is_empty());
        assert_eq!(validate_name("   ").len(), 1);
        assert_eq!(validate_name("a/b").len(), 1);
        assert_eq!(validate_name(&"x".repeat(MAX_NAME_LEN + 1)).len(), 1);
    }

    #[test]
    fn test_validate_numbers() {
        assert!(validate_quantity(0.0).is_empty());
        assert!(!validate_quantity(-0.1).is_empty());
        assert!(!validate_quantity(f64::NAN).is_empty());
        assert!(validate_bag_size(25).is_empty());
        assert!(!validate_bag_size(0).is_empty());
    }

    #[test]
    fn test_clamp_non_negative() {
        assert_eq!(clamp_non_negative(-5.0), 0.0);
        assert_eq!(clamp_non_negative(5.0), 5.0);
        assert_eq!(clamp_non_negative(f64::NAN), 0.0);
    }
}
