// ==========================================
// ThresholdClassifier 集成测试
// ==========================================
// 测试目标: 阈值顺序校验、覆写优先级、分类规则、持久化
// ==========================================


use feed_inventory::api::ThresholdApi;
use feed_inventory::config::paths::DataPaths;
use feed_inventory::config::threshold_store::ThresholdStore;
use feed_inventory::domain::estimate::RemainingDays;
use feed_inventory::domain::threshold::{ThresholdConfig, ThresholdOverride};
use feed_inventory::domain::types::StockStatus;
use feed_inventory::engine::threshold::ThresholdClassifier;
use feed_inventory::repository::error::RepositoryError;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use test_helpers::{amounts, create_test_data_dir, write_raw};

fn classifier(paths: &DataPaths) -> ThresholdClassifier {
    ThresholdClassifier::load(ThresholdStore::new(paths.clone()))
}

// ==========================================
// 阈值顺序校验
// ==========================================

#[test]
fn test_misordered_days_rejected_and_config_unchanged() {
    let (_dir, paths) = create_test_data_dir();
    let mut classifier = classifier(&paths);
    let before = classifier.global().clone();

    let result = classifier.update_thresholds(ThresholdConfig {
        critical_days: 10.0,
        warning_days: 5.0,
        sufficient_days: 20.0,
        ..ThresholdConfig::default()
    });

    assert!(matches!(result, Err(RepositoryError::ValidationError { .. })));
    assert_eq!(classifier.global(), &before);
    // 拒绝时不写盘
    assert!(!paths.threshold_config_file().exists());
}

#[test]
fn test_equal_days_rejected() {
    let (_dir, paths) = create_test_data_dir();
    let mut classifier = classifier(&paths);

    let result = classifier.update_thresholds(ThresholdConfig {
        critical_days: 14.0,
        warning_days: 14.0,
        ..ThresholdConfig::default()
    });
    assert!(result.is_err());
}

#[test]
fn test_valid_update_persists() {
    let (_dir, paths) = create_test_data_dir();
    let mut classifier = classifier(&paths);

    let updated = ThresholdConfig {
        critical_days: 3.0,
        warning_days: 10.0,
        sufficient_days: 20.0,
        use_stock_based: true,
        ..ThresholdConfig::default()
    };
    classifier.update_thresholds(updated.clone()).unwrap();

    let reloaded = self::classifier(&paths);
    assert_eq!(reloaded.global(), &updated);
}

#[test]
fn test_update_conflicting_with_override_rejected() {
    let (_dir, paths) = create_test_data_dir();
    let mut classifier = classifier(&paths);
    classifier
        .set_override(
            "X",
            ThresholdOverride {
                warning_days: Some(8.0),
                ..ThresholdOverride::default()
            },
        )
        .unwrap();

    // 合并后 critical 9 >= warning 8
    let result = classifier.update_thresholds(ThresholdConfig {
        critical_days: 9.0,
        ..ThresholdConfig::default()
    });
    assert!(result.is_err());
    assert_eq!(classifier.global().critical_days, 7.0);
}

// ==========================================
// 覆写优先级
// ==========================================

#[test]
fn test_override_takes_precedence() {
    let (_dir, paths) = create_test_data_dir();
    let mut classifier = classifier(&paths);
    classifier
        .set_override(
            "X",
            ThresholdOverride {
                critical_days: Some(2.0),
                ..ThresholdOverride::default()
            },
        )
        .unwrap();

    assert_eq!(classifier.effective_thresholds(Some("X")).critical_days, 2.0);
    assert_eq!(classifier.effective_thresholds(Some("X")).warning_days, 14.0);
    assert_eq!(classifier.effective_thresholds(Some("Y")).critical_days, 7.0);
    assert_eq!(classifier.effective_thresholds(None).critical_days, 7.0);

    // 5 天: X 为 warning,Y 为 critical
    let days = Some(RemainingDays::Finite(5.0));
    assert_eq!(classifier.classify(days, None, Some("X")).status, StockStatus::Warning);
    assert_eq!(classifier.classify(days, None, Some("Y")).status, StockStatus::Critical);
}

#[test]
fn test_invalid_override_rejected() {
    let (_dir, paths) = create_test_data_dir();
    let mut classifier = classifier(&paths);

    let result = classifier.set_override(
        "X",
        ThresholdOverride {
            critical_days: Some(20.0),
            ..ThresholdOverride::default()
        },
    );
    assert!(result.is_err());
    assert!(!classifier.has_override("X"));
}

#[test]
fn test_overrides_survive_reload() {
    let (_dir, paths) = create_test_data_dir();
    let mut classifier = classifier(&paths);
    classifier
        .set_override(
            "Bắp",
            ThresholdOverride {
                critical_stock: Some(50.0),
                ..ThresholdOverride::default()
            },
        )
        .unwrap();

    let reloaded = self::classifier(&paths);
    assert_eq!(reloaded.effective_thresholds(Some("Bắp")).critical_stock, 50.0);

    let mut reloaded = reloaded;
    assert!(reloaded.remove_override("Bắp").unwrap());
    assert!(self::classifier(&paths).overrides().is_empty());
}

// ==========================================
// 分类规则
// ==========================================

#[test]
fn test_indefinite_days_with_stock_rule() {
    let (_dir, paths) = create_test_data_dir();
    let mut classifier = classifier(&paths);
    classifier
        .update_thresholds(ThresholdConfig {
            use_stock_based: true,
            critical_stock: 0.0,
            warning_stock: 100.0,
            ..ThresholdConfig::default()
        })
        .unwrap();

    let result = classifier.classify(Some(RemainingDays::Indefinite), Some(50.0), None);
    assert_eq!(result.status, StockStatus::Warning);
    assert_eq!(result.color, "#FF9800");
}

#[test]
fn test_indefinite_days_without_stock_rule_is_no_data() {
    let (_dir, paths) = create_test_data_dir();
    let classifier = classifier(&paths);

    let result = classifier.classify(Some(RemainingDays::Indefinite), Some(50.0), None);
    assert_eq!(result.status, StockStatus::NoData);
    assert_eq!(result.color, "#9E9E9E");
}

#[test]
fn test_missing_days_falls_back_to_stock() {
    let (_dir, paths) = create_test_data_dir();
    let classifier = classifier(&paths);

    assert_eq!(
        classifier.classify(None, Some(80.0), None).status,
        StockStatus::Critical
    );
    assert_eq!(
        classifier.classify(None, Some(700.0), None).status,
        StockStatus::Normal
    );
    assert_eq!(
        classifier.classify(None, Some(1500.0), None).status,
        StockStatus::Sufficient
    );
    assert_eq!(classifier.classify(None, None, None).status, StockStatus::NoData);
}

#[test]
fn test_alert_lists_sorted_by_days() {
    let (_dir, paths) = create_test_data_dir();
    let classifier = classifier(&paths);

    let mut days = BTreeMap::new();
    days.insert("C".to_string(), RemainingDays::Finite(6.0));
    days.insert("A".to_string(), RemainingDays::Finite(1.5));
    days.insert("B".to_string(), RemainingDays::Finite(10.0));
    days.insert("D".to_string(), RemainingDays::Finite(20.0));
    days.insert("E".to_string(), RemainingDays::Indefinite);
    let stock = amounts(&[("A", 10.0), ("B", 10.0), ("C", 10.0), ("D", 10.0), ("E", 10.0)]);

    let lists = classifier.alert_lists(&days, &stock);
    let critical: Vec<&str> = lists.critical.iter().map(|i| i.ingredient.as_str()).collect();
    let warning: Vec<&str> = lists.warning.iter().map(|i| i.ingredient.as_str()).collect();
    assert_eq!(critical, vec!["A", "C"]);
    assert_eq!(warning, vec!["B"]);
}

// ==========================================
// 配置文件兼容性
// ==========================================

#[test]
fn test_partial_and_corrupt_config_files() {
    let (_dir, paths) = create_test_data_dir();
    write_raw(&paths.threshold_config_file(), r#"{ "critical_days": 3 }"#);
    write_raw(&paths.individual_thresholds_file(), "not json");

    let classifier = classifier(&paths);
    assert_eq!(classifier.global().critical_days, 3.0);
    assert_eq!(classifier.global().warning_days, 14.0);
    assert!(classifier.overrides().is_empty());

    write_raw(&paths.threshold_config_file(), "{{{");
    assert_eq!(self::classifier(&paths).global(), &ThresholdConfig::default());
}

// ==========================================
// 写盘失败时内存保持原状
// ==========================================

#[test]
fn test_update_persistence_failure_keeps_global() {
    let (_dir, paths) = create_test_data_dir();
    let mut classifier = classifier(&paths);
    let before = classifier.global().clone();
    std::fs::create_dir_all(paths.threshold_config_file()).unwrap();

    let result = classifier.update_thresholds(ThresholdConfig {
        critical_days: 2.0,
        ..ThresholdConfig::default()
    });
    assert!(matches!(result, Err(RepositoryError::Io { .. })));
    assert_eq!(classifier.global(), &before);
}

#[test]
fn test_override_persistence_failure_reported_by_api() {
    let (_dir, paths) = create_test_data_dir();
    std::fs::create_dir_all(paths.individual_thresholds_file()).unwrap();
    let api = ThresholdApi::new(Arc::new(Mutex::new(classifier(&paths))));

    let outcome = api.set_override(
        "Bắp",
        ThresholdOverride {
            critical_days: Some(2.0),
            ..ThresholdOverride::default()
        },
    );
    assert!(!outcome.success);
    assert_eq!(outcome.code.as_deref(), Some("PERSISTENCE_ERROR"));
    assert!(api.list_overrides().unwrap().is_empty());
    assert_eq!(
        api.effective_thresholds(Some("Bắp")).unwrap(),
        api.get_thresholds().unwrap()
    );
}
