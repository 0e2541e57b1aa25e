// ==========================================
// Quản lý kho cám - mix - 展示格式化
// ==========================================
// 口径: 仅在展示时取整（一位小数）,千分位分隔,去掉末尾的 0
// ==========================================

use crate::domain::estimate::RemainingDays;

/// 数量格式化
///
/// # 示例
/// ```
/// use feed_inventory::api::display::format_quantity;
/// assert_eq!(format_quantity(1234.5), "1,234.5");
/// assert_eq!(format_quantity(1000.0), "1,000");
/// assert_eq!(format_quantity(0.04), "0");
/// ```
pub fn format_quantity(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let fixed = format!("{:.1}", value);
    let (sign, digits) = match fixed.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", fixed.as_str()),
    };
    let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits, ""));

    let frac_part = frac_part.trim_end_matches('0');
    let grouped = group_thousands(int_part);

    // -0.0 / -0.04 之类显示为 0
    let sign = if grouped == "0" && frac_part.is_empty() { "" } else { sign };

    if frac_part.is_empty() {
        format!("{}{}", sign, grouped)
    } else {
        format!("{}{}.{}", sign, grouped, frac_part)
    }
}

/// 剩余天数格式化（Indefinite 显示为 ∞）
pub fn format_days(days: RemainingDays) -> String {
    match days {
        RemainingDays::Finite(d) => format_quantity(d),
        RemainingDays::Indefinite => "∞".to_string(),
    }
}

/// 按包装规格折算袋数
pub fn bag_count(quantity: f64, bag_size: Option<u32>) -> Option<f64> {
    match bag_size {
        Some(size) if size > 0 => Some(quantity / f64::from(size)),
        _ => None,
    }
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_quantity() {
        assert_eq!(format_quantity(0.0), "0");
        assert_eq!(format_quantity(12.0), "12");
        assert_eq!(format_quantity(999.96), "1,000");
        assert_eq!(format_quantity(1234567.26), "1,234,567.3");
        assert_eq!(format_quantity(-1500.5), "-1,500.5");
        assert_eq!(format_quantity(-0.01), "0");
    }

    #[test]
    fn test_format_days() {
        assert_eq!(format_days(RemainingDays::Finite(7.0)), "7");
        assert_eq!(format_days(RemainingDays::Finite(2.46)), "2.5");
        assert_eq!(format_days(RemainingDays::Indefinite), "∞");
    }

    #[test]
    fn test_bag_count() {
        assert_eq!(bag_count(100.0, Some(25)), Some(4.0));
        assert_eq!(bag_count(100.0, None), None);
    }
}
