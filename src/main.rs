// ==========================================
// Quản lý kho cám - mix - 命令行入口
// ==========================================
// 用法:
//   feed-inventory [data_dir] [window_days]
//
// 一次性运行: 综合分析 + 打印两个仓库的告警列表,然后退出
// ==========================================

use anyhow::{anyhow, Context};
use feed_inventory::api::display::{format_days, format_quantity};
use feed_inventory::app::{get_default_data_dir, AppState};
use feed_inventory::engine::{AlertItem, DEFAULT_WINDOW_DAYS};
use feed_inventory::i18n;
use feed_inventory::Warehouse;
use std::path::PathBuf;

fn main() -> anyhow::Result<()> {
    feed_inventory::logging::init();

    let mut args = std::env::args().skip(1);
    let data_dir = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(get_default_data_dir);
    let window_days = match args.next() {
        Some(raw) => raw
            .trim()
            .parse::<u32>()
            .with_context(|| format!("无效的窗口天数: {}", raw))?,
        None => DEFAULT_WINDOW_DAYS,
    };

    tracing::info!("==================================================");
    tracing::info!("{} v{}", feed_inventory::APP_NAME, feed_inventory::VERSION);
    tracing::info!("数据目录: {}", data_dir.display());
    tracing::info!("==================================================");

    let state = AppState::new(&data_dir).map_err(|e| anyhow!(e))?;
    let alerts = state.dashboard_api.alerts(window_days)?;

    for warehouse in Warehouse::ALL {
        let lists = alerts.get(warehouse);
        println!(
            "{}",
            i18n::t_with_args(
                "alert.summary",
                &[
                    ("warehouse", i18n::warehouse_label(warehouse).as_str()),
                    ("critical", lists.critical.len().to_string().as_str()),
                    ("warning", lists.warning.len().to_string().as_str()),
                ],
            )
        );
        for item in lists.critical.iter().chain(lists.warning.iter()) {
            println!("  {}", describe(item));
        }
    }

    if alerts.total() == 0 {
        tracing::info!("无库存告警");
    }
    Ok(())
}

fn describe(item: &AlertItem) -> String {
    let days = item
        .days_remaining
        .map(format_days)
        .unwrap_or_else(|| "-".to_string());
    let stock = item
        .stock
        .map(format_quantity)
        .unwrap_or_else(|| "-".to_string());
    format!(
        "[{}] {}: {} kg, {}d",
        i18n::status_label(item.status),
        item.ingredient,
        stock,
        days
    )
}
