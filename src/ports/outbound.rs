//! Outbound ports. Application calls into infrastructure.
//!
//! Implemented by adapters.

use crate::domain::{
    DailyGoalRecord, DomainError, NotificationSettings, NotificationTime, Period,
    StudyLogRecord, SubjectTotal,
};
use chrono::NaiveDate;

/// Append-only study log.
#[async_trait::async_trait]
pub trait StudyLogRepo: Send + Sync {
    async fn append_log(&self, record: &StudyLogRecord) -> Result<(), DomainError>;

    /// Total minutes logged by `user_id` on `date` (local date).
    async fn total_minutes_on(&self, user_id: &str, date: NaiveDate) -> Result<u32, DomainError>;

    /// Per-subject totals for `from..=to`, largest first.
    async fn subject_totals(
        &self,
        user_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<SubjectTotal>, DomainError>;

    /// All rows for a user, oldest first.
    async fn logs_for_user(&self, user_id: &str) -> Result<Vec<StudyLogRecord>, DomainError>;

    /// Distinct user ids that have logged at least once.
    async fn log_user_ids(&self) -> Result<Vec<String>, DomainError>;
}

/// Daily goals keyed by user + start date.
#[async_trait::async_trait]
pub trait GoalRepo: Send + Sync {
    /// Replaces any goal the user already has for `record.start_date` (delete, then insert).
    async fn upsert_goal(&self, record: &DailyGoalRecord) -> Result<(), DomainError>;

    async fn goal_on(
        &self,
        user_id: &str,
        date: NaiveDate,
    ) -> Result<Option<DailyGoalRecord>, DomainError>;

    async fn goal_user_ids(&self) -> Result<Vec<String>, DomainError>;
}

/// Per-user notification times (one slot per period).
#[async_trait::async_trait]
pub trait NotificationRepo: Send + Sync {
    /// Sets one slot. A user seen for the first time gets `OFF` in every other slot.
    async fn set_notification(
        &self,
        user_id: &str,
        period: Period,
        time: NotificationTime,
    ) -> Result<(), DomainError>;

    async fn notification_settings(
        &self,
        user_id: &str,
    ) -> Result<Option<NotificationSettings>, DomainError>;

    async fn all_notification_settings(&self) -> Result<Vec<NotificationSettings>, DomainError>;
}

/// Push channel back to users (LINE in production).
#[async_trait::async_trait]
pub trait MessengerPort: Send + Sync {
    async fn push_text(&self, user_id: &str, text: &str) -> Result<(), DomainError>;
}
