//! Progress summaries: per-subject minutes for today, this week and this month.
//!
//! Rendered as text bar charts so they fit in a push message.

use crate::adapters::report::study_logs_to_csv;
use crate::domain::{DomainError, SubjectTotal};
use crate::ports::{MessengerPort, StudyLogRepo};
use crate::shared::clock::{month_start, week_start};
use crate::usecases::batch::{self, BatchStats};
use chrono::NaiveDate;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::fs;
use tracing::info;

const BAR_WIDTH: u64 = 10;

/// Window ending on the report date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressWindow {
    Day,
    Week,
    Month,
}

impl ProgressWindow {
    pub const ALL: [ProgressWindow; 3] = [Self::Day, Self::Week, Self::Month];

    pub fn label(self) -> &'static str {
        match self {
            Self::Day => "今日",
            Self::Week => "今週",
            Self::Month => "今月",
        }
    }

    pub fn start(self, date: NaiveDate) -> NaiveDate {
        match self {
            Self::Day => date,
            Self::Week => week_start(date),
            Self::Month => month_start(date),
        }
    }
}

/// One window's section of the summary.
pub fn render_window(window: ProgressWindow, totals: &[SubjectTotal]) -> String {
    let total: u64 = totals.iter().map(|t| u64::from(t.minutes)).sum();
    let mut out = format!("📈 {}の学習時間（合計: {}分）", window.label(), total);
    if totals.is_empty() {
        out.push_str("\n・記録なし");
        return out;
    }
    let max = totals.iter().map(|t| u64::from(t.minutes)).max().unwrap_or(0).max(1);
    for t in totals {
        // at least one block for any non-zero subject
        let blocks = (u64::from(t.minutes) * BAR_WIDTH).div_ceil(max);
        out.push_str(&format!(
            "\n{} {} {}分",
            t.subject,
            "█".repeat(blocks as usize),
            t.minutes
        ));
    }
    out
}

pub struct ProgressService {
    logs: Arc<dyn StudyLogRepo>,
    messenger: Arc<dyn MessengerPort>,
    exports_dir: PathBuf,
}

impl ProgressService {
    pub fn new(
        logs: Arc<dyn StudyLogRepo>,
        messenger: Arc<dyn MessengerPort>,
        exports_dir: PathBuf,
    ) -> Self {
        Self {
            logs,
            messenger,
            exports_dir,
        }
    }

    /// Full summary text (day, week, month) for one user.
    pub async fn summary_for(&self, user_id: &str, date: NaiveDate) -> Result<String, DomainError> {
        let mut sections = Vec::with_capacity(ProgressWindow::ALL.len());
        for window in ProgressWindow::ALL {
            let totals = self
                .logs
                .subject_totals(user_id, window.start(date), date)
                .await?;
            sections.push(render_window(window, &totals));
        }
        Ok(sections.join("\n\n"))
    }

    /// Push summaries to every user who has logged at least once.
    pub async fn send_reports(&self, date: NaiveDate) -> Result<BatchStats, DomainError> {
        let mut stats = BatchStats::default();
        for user_id in self.logs.log_user_ids().await? {
            let text = match self.summary_for(&user_id, date).await {
                Ok(t) => t,
                Err(e) => {
                    tracing::warn!(user_id = %user_id, error = %e, "progress summary skipped");
                    stats.failed += 1;
                    continue;
                }
            };
            batch::push_counted(self.messenger.as_ref(), &user_id, &text, "progress", &mut stats)
                .await;
        }
        Ok(batch::log_batch("progress", stats))
    }

    /// Write `<exports_dir>/study_log_<user>.csv` for every user. Returns the paths written.
    pub async fn export_csv(&self) -> Result<Vec<PathBuf>, DomainError> {
        fs::create_dir_all(&self.exports_dir)
            .await
            .map_err(|e| DomainError::Report(format!("Failed to create exports dir: {}", e)))?;

        let mut paths = Vec::new();
        for user_id in self.logs.log_user_ids().await? {
            let records = self.logs.logs_for_user(&user_id).await?;
            let csv = study_logs_to_csv(&records)
                .map_err(|e| DomainError::Report(format!("Failed to generate CSV: {}", e)))?;
            let path = self
                .exports_dir
                .join(format!("study_log_{}.csv", sanitize_file_stem(&user_id)));
            fs::write(&path, csv)
                .await
                .map_err(|e| DomainError::Report(format!("Failed to write export: {}", e)))?;
            info!(user_id = %user_id, rows = records.len(), path = %path.display(), "export written");
            paths.push(path);
        }
        Ok(paths)
    }
}

fn sanitize_file_stem(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}
