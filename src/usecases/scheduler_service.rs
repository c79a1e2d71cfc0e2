//! Scheduler (daemon) use case: fire due reminders and the daily reports on local wall-clock time.
//!
//! Does not block the runtime; sleeps with tokio::time::sleep between ticks.

use crate::domain::{ClockTime, DomainError};
use crate::shared::clock::{clock_time_of, LocalClock};
use crate::usecases::batch::BatchStats;
use crate::usecases::{GoalReportService, ProgressService, ReminderService};
use chrono::{DateTime, FixedOffset, NaiveDate};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{info, warn};

/// Report times in local HH:MM.
#[derive(Debug, Clone, Copy)]
pub struct Schedule {
    pub goal_report_at: ClockTime,
    pub progress_report_at: ClockTime,
}

/// What a single tick did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickSummary {
    pub reminders: BatchStats,
    pub goal_report: Option<BatchStats>,
    pub progress: Option<BatchStats>,
    /// True when this minute was already handled by an earlier tick.
    pub skipped: bool,
}

pub struct SchedulerService {
    reminders: Arc<ReminderService>,
    goal_reports: Arc<GoalReportService>,
    progress: Arc<ProgressService>,
    clock: LocalClock,
    schedule: Schedule,
    tick: Duration,
    last_minute: Mutex<Option<(NaiveDate, ClockTime)>>,
}

impl SchedulerService {
    pub fn new(
        reminders: Arc<ReminderService>,
        goal_reports: Arc<GoalReportService>,
        progress: Arc<ProgressService>,
        clock: LocalClock,
        schedule: Schedule,
        tick: Duration,
    ) -> Self {
        Self {
            reminders,
            goal_reports,
            progress,
            clock,
            schedule,
            tick,
            last_minute: Mutex::new(None),
        }
    }

    /// Run until the process is stopped. A failed job is logged and the loop keeps going.
    pub async fn run_loop(&self) -> Result<(), DomainError> {
        info!(
            tick_secs = self.tick.as_secs(),
            goal_report_at = %self.schedule.goal_report_at,
            progress_report_at = %self.schedule.progress_report_at,
            "Scheduler started"
        );
        loop {
            let summary = self.run_tick(self.clock.now()).await;
            if !summary.skipped && summary.reminders.sent > 0 {
                info!(sent = summary.reminders.sent, "Reminders pushed this minute");
            }
            tokio::time::sleep(self.tick).await;
        }
    }

    /// Handle the minute containing `now`. Each local minute is handled at most once.
    pub async fn run_tick(&self, now: DateTime<FixedOffset>) -> TickSummary {
        let date = now.date_naive();
        let minute = clock_time_of(&now);
        if !self.claim_minute(date, minute) {
            return TickSummary {
                skipped: true,
                ..Default::default()
            };
        }

        let mut summary = TickSummary::default();
        match self.reminders.send_due(minute).await {
            Ok(stats) => summary.reminders = stats,
            Err(e) => warn!(error = %e, "Reminder job failed"),
        }
        if minute == self.schedule.goal_report_at {
            match self.goal_reports.send_reports(date).await {
                Ok(stats) => summary.goal_report = Some(stats),
                Err(e) => warn!(error = %e, "Goal report job failed"),
            }
        }
        if minute == self.schedule.progress_report_at {
            match self.progress.send_reports(date).await {
                Ok(stats) => summary.progress = Some(stats),
                Err(e) => warn!(error = %e, "Progress job failed"),
            }
        }
        summary
    }

    fn claim_minute(&self, date: NaiveDate, minute: ClockTime) -> bool {
        let Ok(mut last) = self.last_minute.lock() else {
            return false;
        };
        if *last == Some((date, minute)) {
            return false;
        }
        *last = Some((date, minute));
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::messaging::ConsoleMessenger;
    use crate::adapters::persistence::SqliteRepo;
    use crate::domain::{NotificationTime, Period, StudyLogRecord};
    use crate::ports::{NotificationRepo, StudyLogRepo};

    fn at(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    async fn scheduler(dir: &std::path::Path) -> (SchedulerService, Arc<SqliteRepo>, Arc<ConsoleMessenger>) {
        let repo = Arc::new(SqliteRepo::connect(dir).await.unwrap());
        let messenger = Arc::new(ConsoleMessenger::new());
        let reminders = Arc::new(ReminderService::new(
            repo.clone(),
            repo.clone(),
            repo.clone(),
            messenger.clone(),
        ));
        let goals = Arc::new(GoalReportService::new(repo.clone(), repo.clone(), messenger.clone()));
        let progress = Arc::new(ProgressService::new(
            repo.clone(),
            messenger.clone(),
            dir.join("exports"),
        ));
        let svc = SchedulerService::new(
            reminders,
            goals,
            progress,
            LocalClock::new(FixedOffset::east_opt(9 * 3600).unwrap()),
            Schedule {
                goal_report_at: ClockTime::new(22, 0).unwrap(),
                progress_report_at: ClockTime::new(21, 0).unwrap(),
            },
            Duration::from_secs(60),
        );
        (svc, repo, messenger)
    }

    #[tokio::test]
    async fn same_minute_fires_once() {
        let dir = tempfile::tempdir().unwrap();
        let (svc, repo, messenger) = scheduler(dir.path()).await;
        repo.set_notification("U1", Period::Morning, NotificationTime::At(ClockTime::new(7, 0).unwrap()))
            .await
            .unwrap();

        let first = svc.run_tick(at("2024-05-01T07:00:05+09:00")).await;
        let second = svc.run_tick(at("2024-05-01T07:00:40+09:00")).await;
        assert_eq!(first.reminders.sent, 1);
        assert!(second.skipped);
        assert_eq!(messenger.sent().len(), 1);

        // next day, same time
        let next = svc.run_tick(at("2024-05-02T07:00:01+09:00")).await;
        assert_eq!(next.reminders.sent, 1);
    }

    #[tokio::test]
    async fn goal_report_fires_at_configured_time() {
        let dir = tempfile::tempdir().unwrap();
        let (svc, repo, messenger) = scheduler(dir.path()).await;
        repo.append_log(&StudyLogRecord {
            user_id: "U1".into(),
            logged_at: "2024-05-01T20:00:00+09:00".into(),
            local_date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            subject: "英語".into(),
            minutes: 30,
            raw_message: "英語30分".into(),
        })
        .await
        .unwrap();

        let quiet = svc.run_tick(at("2024-05-01T21:59:00+09:00")).await;
        assert!(quiet.goal_report.is_none());

        let summary = svc.run_tick(at("2024-05-01T22:00:00+09:00")).await;
        assert_eq!(summary.goal_report.map(|s| s.sent), Some(1));
        assert!(summary.progress.is_none());
        assert!(messenger.sent()[0].text.contains("今日の記録：30分"));
    }
}
