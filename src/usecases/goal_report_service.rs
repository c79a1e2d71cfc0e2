//! Nightly goal report: today's total vs. today's goal, pushed to every known user.

use crate::domain::{DomainError, GoalFields, GoalMetric};
use crate::ports::{GoalRepo, MessengerPort, StudyLogRepo};
use crate::usecases::batch::{self, BatchStats};
use chrono::NaiveDate;
use std::sync::Arc;

const NO_GOAL_TEXT: &str = "📌 今日の目標が未設定です。明日はぜひ設定してみましょう！";

/// Report text for one user. `goal` is today's goal, `studied` today's total minutes.
pub fn build_goal_report(goal: Option<&GoalFields>, studied: u32) -> String {
    let Some(goal) = goal else {
        return if studied > 0 {
            format!("📊 今日の記録：{studied}分\n{NO_GOAL_TEXT}")
        } else {
            NO_GOAL_TEXT.to_string()
        };
    };

    match goal.metric {
        GoalMetric::Time => {
            let target = goal.value.max(1);
            let rate = u64::from(studied) * 100 / u64::from(target);
            let comment = if studied >= target {
                "🎉 目標達成！素晴らしい一日でした！".to_string()
            } else {
                format!("💡 あと{}分で目標達成です！あと少し！", target - studied)
            };
            format!("📊 今日の記録：{studied}分 ／ 目標：{target}分（達成率 {rate}%）\n{comment}")
        }
        // The log stores minutes only, so a count goal is reported alongside the time total.
        GoalMetric::Count => format!(
            "📊 今日の記録：{studied}分 ／ 目標：{}回\n💡 回数の目標は自分でチェックしてみましょう！",
            goal.value
        ),
    }
}

pub struct GoalReportService {
    logs: Arc<dyn StudyLogRepo>,
    goals: Arc<dyn GoalRepo>,
    messenger: Arc<dyn MessengerPort>,
}

impl GoalReportService {
    pub fn new(
        logs: Arc<dyn StudyLogRepo>,
        goals: Arc<dyn GoalRepo>,
        messenger: Arc<dyn MessengerPort>,
    ) -> Self {
        Self {
            logs,
            goals,
            messenger,
        }
    }

    /// Users with a goal or a log entry.
    pub async fn report_user_ids(&self) -> Result<Vec<String>, DomainError> {
        let goal_users = self.goals.goal_user_ids().await?;
        let log_users = self.logs.log_user_ids().await?;
        Ok(batch::union_user_ids([goal_users, log_users]))
    }

    pub async fn report_for(&self, user_id: &str, date: NaiveDate) -> Result<String, DomainError> {
        let goal = self.goals.goal_on(user_id, date).await?;
        let studied = self.logs.total_minutes_on(user_id, date).await?;
        Ok(build_goal_report(goal.as_ref().map(|g| &g.goal), studied))
    }

    /// Push `date`'s report to every user. Per-user failures are counted, not fatal.
    pub async fn send_reports(&self, date: NaiveDate) -> Result<BatchStats, DomainError> {
        let mut stats = BatchStats::default();
        for user_id in self.report_user_ids().await? {
            let text = match self.report_for(&user_id, date).await {
                Ok(t) => t,
                Err(e) => {
                    tracing::warn!(user_id = %user_id, error = %e, "goal report skipped");
                    stats.failed += 1;
                    continue;
                }
            };
            batch::push_counted(self.messenger.as_ref(), &user_id, &text, "goal_report", &mut stats)
                .await;
        }
        Ok(batch::log_batch("goal_report", stats))
    }
}
