//! Reminder pushes: per-user notification slots plus the hourly greeting broadcast.

use crate::domain::{ClockTime, DomainError, Period};
use crate::ports::{GoalRepo, MessengerPort, NotificationRepo, StudyLogRepo};
use crate::usecases::batch::{self, BatchStats};
use std::sync::Arc;
use tracing::debug;

/// Greeting for a local hour (0..24).
pub fn greeting_for_hour(hour: u32) -> &'static str {
    match hour {
        5..=11 => "おはようございます！今日も一日がんばりましょう！",
        12..=17 => "こんにちは！午後も集中していきましょう！",
        18..=23 => "1日おつかれさまでしたね！ゆっくり休んでくださいね。",
        _ => "夜遅いですね、おやすみなさい！",
    }
}

/// Text pushed when a user's slot for `period` comes due.
pub fn reminder_text(period: Period) -> &'static str {
    match period {
        Period::Morning => "☀️ おはようございます！今日の学習目標を決めましょう！例：「毎日1時間」",
        Period::Noon => "🍱 お昼です！午後も集中して取り組んでいきましょう✍️",
        Period::Evening => "🌇 お疲れさまです！夕方のひと踏ん張り、一緒に頑張りましょう🔥",
        Period::Night => "🌙 今日の学習を記録しましょう！例：「英語30分」",
    }
}

pub struct ReminderService {
    notifications: Arc<dyn NotificationRepo>,
    logs: Arc<dyn StudyLogRepo>,
    goals: Arc<dyn GoalRepo>,
    messenger: Arc<dyn MessengerPort>,
}

impl ReminderService {
    pub fn new(
        notifications: Arc<dyn NotificationRepo>,
        logs: Arc<dyn StudyLogRepo>,
        goals: Arc<dyn GoalRepo>,
        messenger: Arc<dyn MessengerPort>,
    ) -> Self {
        Self {
            notifications,
            logs,
            goals,
            messenger,
        }
    }

    /// Push reminders for every slot equal to `now`. Slots set to OFF never fire.
    pub async fn send_due(&self, now: ClockTime) -> Result<BatchStats, DomainError> {
        let mut stats = BatchStats::default();
        for settings in self.notifications.all_notification_settings().await? {
            for period in settings.due_at(now) {
                debug!(user_id = %settings.user_id, period = period.key(), %now, "reminder due");
                batch::push_counted(
                    self.messenger.as_ref(),
                    &settings.user_id,
                    reminder_text(period),
                    "reminder",
                    &mut stats,
                )
                .await;
            }
        }
        Ok(batch::log_batch("reminder", stats))
    }

    /// Push the greeting for `hour` to every known user.
    pub async fn broadcast_greeting(&self, hour: u32) -> Result<BatchStats, DomainError> {
        let settings_users = self
            .notifications
            .all_notification_settings()
            .await?
            .into_iter()
            .map(|s| s.user_id)
            .collect();
        let users = batch::union_user_ids([
            settings_users,
            self.logs.log_user_ids().await?,
            self.goals.goal_user_ids().await?,
        ]);

        let text = greeting_for_hour(hour);
        let mut stats = BatchStats::default();
        for user_id in &users {
            batch::push_counted(self.messenger.as_ref(), user_id, text, "greeting", &mut stats)
                .await;
        }
        Ok(batch::log_batch("greeting", stats))
    }
}
