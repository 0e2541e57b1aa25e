// ==========================================
// Quản lý kho cám - mix - 日报模型
// ==========================================
// 文件: reports/report_YYYYMMDD.json
// 约束: 日报为只追加的历史事实,写入后不再修改
// ==========================================

use crate::domain::types::Warehouse;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 日报键格式
pub const REPORT_DATE_FORMAT: &str = "%Y%m%d";

/// 日报文件内容（磁盘格式）
///
/// 未知字段忽略,缺失的原料表视为空
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportDocument {
    #[serde(default)]
    pub feed_ingredients: BTreeMap<String, f64>,

    #[serde(default)]
    pub mix_ingredients: BTreeMap<String, f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_feed: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_mix: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_count: Option<f64>,
}

/// 单日生产日报
#[derive(Debug, Clone, PartialEq)]
pub struct DailyReport {
    pub date: NaiveDate,
    pub document: ReportDocument,
}

impl DailyReport {
    pub fn new(date: NaiveDate, document: ReportDocument) -> Self {
        Self { date, document }
    }

    /// 日报键 (YYYYMMDD)
    pub fn key(&self) -> String {
        report_key(self.date)
    }

    /// 指定仓库当日消耗
    pub fn ingredients(&self, warehouse: Warehouse) -> &BTreeMap<String, f64> {
        match warehouse {
            Warehouse::Feed => &self.document.feed_ingredients,
            Warehouse::Mix => &self.document.mix_ingredients,
        }
    }
}

pub fn report_key(date: NaiveDate) -> String {
    date.format(REPORT_DATE_FORMAT).to_string()
}

/// 解析日报键,格式不符返回 None
pub fn parse_report_key(key: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(key, REPORT_DATE_FORMAT).ok()
}
