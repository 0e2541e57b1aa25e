// ==========================================
// DashboardApi 集成测试
// ==========================================
// 测试目标: 端到端 库存 + 日报 → 分析 → 分类 → 告警 / 导出
// ==========================================


use chrono::NaiveTime;
use feed_inventory::app::AppState;
use feed_inventory::domain::estimate::RemainingDays;
use feed_inventory::domain::threshold::{ThresholdConfig, ThresholdOverride};
use feed_inventory::domain::types::{StockStatus, UsageLevel, Warehouse};
use feed_inventory::exporter::CSV_HEADER;
use test_helpers::{
    create_test_data_dir, test_today, write_daily_feed_reports, write_inventory, write_packaging,
};

// ==========================================
// 状态视图
// ==========================================

#[test]
fn test_steady_usage_is_critical() {
    let (dir, paths) = create_test_data_dir();
    write_inventory(&paths, Warehouse::Feed, &[("Bắp", 100.0)]);
    write_packaging(&paths, Warehouse::Feed, &[("Bắp", 25)]);
    write_daily_feed_reports(&paths, test_today(), 5, &[("Bắp", 20.0)]);

    let state = AppState::new(dir.path()).unwrap();
    let views = state
        .dashboard_api
        .inventory_status_at(Warehouse::Feed, 7, test_today())
        .unwrap();

    assert_eq!(views.len(), 1);
    let view = &views[0];
    assert_eq!(view.daily_usage, Some(20.0));
    assert_eq!(view.days_remaining, RemainingDays::Finite(5.0));
    assert_eq!(view.usage_level, UsageLevel::Warning);
    assert_eq!(view.status, StockStatus::Critical);
    assert_eq!(view.color, "#F44336");
    assert_eq!(view.bag_count, Some(4.0));
    assert!(!view.has_override);
    assert!(!view.label.is_empty());
}

#[test]
fn test_no_reports_depends_on_stock_rule() {
    let (dir, paths) = create_test_data_dir();
    write_inventory(&paths, Warehouse::Feed, &[("Bắp", 100.0)]);

    let state = AppState::new(dir.path()).unwrap();
    let views = state
        .dashboard_api
        .inventory_status_at(Warehouse::Feed, 7, test_today())
        .unwrap();
    assert_eq!(views[0].days_remaining, RemainingDays::Indefinite);
    assert_eq!(views[0].status, StockStatus::NoData);

    // 启用按库存: 100 <= critical_stock(100)
    let outcome = state.threshold_api.update_thresholds(ThresholdConfig {
        use_stock_based: true,
        ..ThresholdConfig::default()
    });
    assert!(outcome.success);
    let views = state
        .dashboard_api
        .inventory_status_at(Warehouse::Feed, 7, test_today())
        .unwrap();
    assert_eq!(views[0].status, StockStatus::Critical);
}

#[test]
fn test_views_sorted_and_override_flagged() {
    let (dir, paths) = create_test_data_dir();
    write_inventory(
        &paths,
        Warehouse::Mix,
        &[("Vitamin", 5.0), ("Khoáng", 5.0), ("Muối", 5.0)],
    );

    let state = AppState::new(dir.path()).unwrap();
    let outcome = state.threshold_api.set_override(
        "Muối",
        ThresholdOverride {
            warning_stock: Some(200.0),
            ..ThresholdOverride::default()
        },
    );
    assert!(outcome.success);

    let views = state
        .dashboard_api
        .inventory_status_at(Warehouse::Mix, 7, test_today())
        .unwrap();
    let names: Vec<&str> = views.iter().map(|v| v.ingredient.as_str()).collect();
    assert_eq!(names, vec!["Khoáng", "Muối", "Vitamin"]);
    assert!(views[1].has_override);
    assert!(!views[0].has_override);
    assert_eq!(views[0].bag_count, None);
}

// ==========================================
// 告警
// ==========================================

#[test]
fn test_alerts_for_both_warehouses() {
    let (dir, paths) = create_test_data_dir();
    write_inventory(
        &paths,
        Warehouse::Feed,
        &[("Bắp", 100.0), ("Cám gạo", 200.0), ("Đậu nành", 1000.0)],
    );
    write_inventory(&paths, Warehouse::Mix, &[("Premix", 10.0)]);
    // Bắp 5 天, Cám gạo 10 天, Đậu nành 50 天
    write_daily_feed_reports(
        &paths,
        test_today(),
        3,
        &[("Bắp", 20.0), ("Cám gạo", 20.0), ("Đậu nành", 20.0)],
    );

    let state = AppState::new(dir.path()).unwrap();
    let alerts = state.dashboard_api.alerts_at(7, test_today()).unwrap();

    assert_eq!(alerts.feed.critical.len(), 1);
    assert_eq!(alerts.feed.critical[0].ingredient, "Bắp");
    assert_eq!(alerts.feed.warning.len(), 1);
    assert_eq!(alerts.feed.warning[0].ingredient, "Cám gạo");
    assert_eq!(
        alerts.feed.warning[0].days_remaining,
        Some(RemainingDays::Finite(10.0))
    );
    // mix 没有日报 → no-data,不告警
    assert!(alerts.mix.is_empty());
    assert_eq!(alerts.total(), 2);
}

// ==========================================
// 导出
// ==========================================

#[test]
fn test_export_report_writes_both_warehouses() {
    let (dir, paths) = create_test_data_dir();
    write_inventory(&paths, Warehouse::Feed, &[("Bắp", 100.0)]);
    write_inventory(&paths, Warehouse::Mix, &[("Premix", 10.0)]);
    write_daily_feed_reports(&paths, test_today(), 5, &[("Bắp", 20.0)]);

    let state = AppState::new(dir.path()).unwrap();
    let now = test_today().and_time(NaiveTime::from_hms_opt(8, 30, 0).unwrap());
    let path = state.dashboard_api.export_report_at(7, now).unwrap();

    assert_eq!(path, paths.exports_dir().join("inventory_report_20240615_083000.csv"));

    let mut reader = csv::Reader::from_path(&path).unwrap();
    let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
    assert_eq!(headers, CSV_HEADER);

    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 2);
    assert_eq!(&rows[0][0], "feed");
    assert_eq!(&rows[0][4], "5");
    assert_eq!(&rows[0][6], "critical");
    assert_eq!(&rows[1][0], "mix");
    assert_eq!(&rows[1][4], "inf");
    assert_eq!(&rows[1][6], "no-data");
}
