// ==========================================
// Quản lý kho cám - mix - 日报仓储
// ==========================================
// 职责: 按日期读取/新建生产日报（不包含业务逻辑）
// 红线: 日报只追加,已存在的日报不允许覆盖
// ==========================================

use crate::config::paths::DataPaths;
use crate::domain::report::{parse_report_key, report_key, DailyReport, ReportDocument};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::json_file::{read_json, write_json_new};
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

// ==========================================
// ReportRepository Trait
// ==========================================
// 实现者: JsonReportRepository（reports/report_YYYYMMDD.json）
pub trait ReportRepository: Send + Sync {
    /// 按日期读取日报
    ///
    /// # 返回
    /// - Ok(None): 当日无日报
    /// - Err(CorruptData): 文件存在但无法解析
    fn find_by_date(&self, date: NaiveDate) -> RepositoryResult<Option<DailyReport>>;

    /// 新建日报（已存在时返回 AlreadyExists）
    fn save(&self, report: &DailyReport) -> RepositoryResult<()>;

    /// 已有日报的日期（升序）
    fn list_dates(&self) -> RepositoryResult<Vec<NaiveDate>>;

    fn exists(&self, date: NaiveDate) -> RepositoryResult<bool> {
        Ok(self.find_by_date(date)?.is_some())
    }
}

// ==========================================
// JsonReportRepository
// ==========================================
pub struct JsonReportRepository {
    paths: DataPaths,
}

impl JsonReportRepository {
    pub fn new(paths: DataPaths) -> Self {
        Self { paths }
    }

    fn report_path(&self, date: NaiveDate) -> PathBuf {
        self.paths.report_file(date)
    }
}

impl ReportRepository for JsonReportRepository {
    fn find_by_date(&self, date: NaiveDate) -> RepositoryResult<Option<DailyReport>> {
        let document: Option<ReportDocument> = read_json(&self.report_path(date))?;
        Ok(document.map(|doc| DailyReport::new(date, doc)))
    }

    fn save(&self, report: &DailyReport) -> RepositoryResult<()> {
        let path = self.report_path(report.date);
        write_json_new(&path, &report.document).map_err(|e| match e {
            RepositoryError::AlreadyExists { .. } => RepositoryError::AlreadyExists {
                entity: "日报".to_string(),
                id: report.key(),
            },
            other => other,
        })?;

        tracing::info!("日报已写入: {}", report.key());
        Ok(())
    }

    fn list_dates(&self) -> RepositoryResult<Vec<NaiveDate>> {
        let dir = self.paths.reports_dir();
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(RepositoryError::io(dir, e)),
        };

        let mut dates: Vec<NaiveDate> = entries
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| {
                let name = entry.file_name().to_string_lossy().to_string();
                name.strip_prefix("report_")
                    .and_then(|rest| rest.strip_suffix(".json"))
                    .and_then(parse_report_key)
            })
            .collect();

        dates.sort();
        Ok(dates)
    }

    fn exists(&self, date: NaiveDate) -> RepositoryResult<bool> {
        Ok(self.report_path(date).exists())
    }
}
