//! SQLite-backed store via libsql. Implements StudyLogRepo, GoalRepo and NotificationRepo.
//!
//! One database file (data/study_me.db) holds all users. The study log is append-only;
//! goals are replaced per user and date with delete-then-insert; notification settings
//! keep one row per user with `OFF` in unset slots.

use crate::domain::{
    ClockTime, DailyGoalRecord, DomainError, GoalFields, GoalMetric, GoalUnit,
    NotificationSettings, NotificationTime, Period, StudyLogRecord, SubjectTotal,
};
use crate::ports::{GoalRepo, NotificationRepo, StudyLogRepo};
use chrono::NaiveDate;
use libsql::{Database, Row, params};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const DATE_FORMAT: &str = "%Y-%m-%d";

const STUDY_LOG_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS study_log (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id TEXT NOT NULL,
    logged_at TEXT NOT NULL,
    local_date TEXT NOT NULL,
    subject TEXT NOT NULL,
    minutes INTEGER NOT NULL,
    raw_message TEXT NOT NULL DEFAULT ''
)"#;
const STUDY_LOG_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_study_log_user_date ON study_log (user_id, local_date)";

const DAILY_GOALS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS daily_goals (
    user_id TEXT NOT NULL,
    unit TEXT NOT NULL,
    metric TEXT NOT NULL,
    value INTEGER NOT NULL,
    start_date TEXT NOT NULL,
    end_date TEXT NOT NULL,
    created_at TEXT NOT NULL
)"#;
const DAILY_GOALS_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_daily_goals_user_date ON daily_goals (user_id, start_date)";

const NOTIFICATION_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS notification_settings (
    user_id TEXT PRIMARY KEY,
    morning TEXT NOT NULL DEFAULT 'OFF',
    noon TEXT NOT NULL DEFAULT 'OFF',
    evening TEXT NOT NULL DEFAULT 'OFF',
    night TEXT NOT NULL DEFAULT 'OFF'
)"#;

/// SQLite store. Safe to share via Arc; every call opens its own connection.
pub struct SqliteRepo {
    db: Database,
    db_path: PathBuf,
}

impl SqliteRepo {
    /// Connect to (or create) `study_me.db` under `base_dir` and ensure the schema exists.
    ///
    /// Sets WAL mode and synchronous=NORMAL so the scheduler can read while messages are written.
    pub async fn connect(base_dir: impl AsRef<Path>) -> Result<Self, DomainError> {
        let base = base_dir.as_ref();
        std::fs::create_dir_all(base).map_err(|e| DomainError::Store(e.to_string()))?;
        let db_path = base.join("study_me.db");
        let path_str = db_path.to_string_lossy();
        let db = libsql::Builder::new_local(path_str.as_ref())
            .build()
            .await
            .map_err(|e| DomainError::Store(e.to_string()))?;
        let conn = db.connect().map_err(|e| DomainError::Store(e.to_string()))?;

        // PRAGMA returns a row; use query and drain it (execute fails when rows are returned).
        for pragma in ["PRAGMA journal_mode=WAL", "PRAGMA synchronous=NORMAL"] {
            let mut rows = conn
                .query(pragma, ())
                .await
                .map_err(|e| DomainError::Store(format!("{pragma} failed: {e}")))?;
            while rows
                .next()
                .await
                .map_err(|e| DomainError::Store(e.to_string()))?
                .is_some()
            {}
        }

        for ddl in [
            STUDY_LOG_TABLE,
            STUDY_LOG_INDEX,
            DAILY_GOALS_TABLE,
            DAILY_GOALS_INDEX,
            NOTIFICATION_TABLE,
        ] {
            conn.execute(ddl, ())
                .await
                .map_err(|e| DomainError::Store(e.to_string()))?;
        }

        info!(path = %db_path.display(), "SQLite connected with WAL mode");

        Ok(Self { db, db_path })
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    fn conn(&self) -> Result<libsql::Connection, DomainError> {
        self.db
            .connect()
            .map_err(|e| DomainError::Store(e.to_string()))
    }

    async fn user_ids(&self, sql: &str) -> Result<Vec<String>, DomainError> {
        let conn = self.conn()?;
        let mut rows = conn
            .query(sql, ())
            .await
            .map_err(|e| DomainError::Store(e.to_string()))?;
        let mut ids = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| DomainError::Store(e.to_string()))?
        {
            ids.push(row.get::<String>(0).map_err(|e| DomainError::Store(e.to_string()))?);
        }
        Ok(ids)
    }
}

fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn parse_date(s: &str) -> Result<NaiveDate, DomainError> {
    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .map_err(|e| DomainError::Store(format!("bad date {s:?}: {e}")))
}

fn get_text(row: &Row, idx: i32) -> Result<String, DomainError> {
    row.get::<String>(idx)
        .map_err(|e| DomainError::Store(e.to_string()))
}

fn get_u32(row: &Row, idx: i32) -> Result<u32, DomainError> {
    let v = row
        .get::<i64>(idx)
        .map_err(|e| DomainError::Store(e.to_string()))?;
    u32::try_from(v).map_err(|_| DomainError::Store(format!("value out of range: {v}")))
}

fn row_to_log(row: &Row) -> Result<StudyLogRecord, DomainError> {
    Ok(StudyLogRecord {
        user_id: get_text(row, 0)?,
        logged_at: get_text(row, 1)?,
        local_date: parse_date(&get_text(row, 2)?)?,
        subject: get_text(row, 3)?,
        minutes: get_u32(row, 4)?,
        raw_message: row.get::<String>(5).unwrap_or_default(),
    })
}

fn row_to_goal(row: &Row) -> Result<DailyGoalRecord, DomainError> {
    let metric_str = get_text(row, 2)?;
    let metric = GoalMetric::parse(&metric_str)
        .ok_or_else(|| DomainError::Store(format!("unknown goal metric {metric_str:?}")))?;
    Ok(DailyGoalRecord {
        user_id: get_text(row, 0)?,
        goal: GoalFields {
            unit: GoalUnit::Daily,
            metric,
            value: get_u32(row, 3)?,
        },
        start_date: parse_date(&get_text(row, 4)?)?,
        end_date: parse_date(&get_text(row, 5)?)?,
        created_at: parse_date(&get_text(row, 6)?)?,
    })
}

fn row_to_settings(row: &Row) -> Result<NotificationSettings, DomainError> {
    let slot = |idx: i32| -> Result<Option<ClockTime>, DomainError> {
        Ok(ClockTime::parse(&get_text(row, idx)?))
    };
    Ok(NotificationSettings {
        user_id: get_text(row, 0)?,
        morning: slot(1)?,
        noon: slot(2)?,
        evening: slot(3)?,
        night: slot(4)?,
    })
}

#[async_trait::async_trait]
impl StudyLogRepo for SqliteRepo {
    async fn append_log(&self, record: &StudyLogRecord) -> Result<(), DomainError> {
        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO study_log (user_id, logged_at, local_date, subject, minutes, raw_message)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                record.user_id.as_str(),
                record.logged_at.as_str(),
                format_date(record.local_date),
                record.subject.as_str(),
                i64::from(record.minutes),
                record.raw_message.as_str()
            ],
        )
        .await
        .map_err(|e| DomainError::Store(e.to_string()))?;
        debug!(user_id = %record.user_id, minutes = record.minutes, "study log appended");
        Ok(())
    }

    async fn total_minutes_on(&self, user_id: &str, date: NaiveDate) -> Result<u32, DomainError> {
        let conn = self.conn()?;
        let mut rows = conn
            .query(
                "SELECT COALESCE(SUM(minutes), 0) FROM study_log WHERE user_id = ?1 AND local_date = ?2",
                params![user_id, format_date(date)],
            )
            .await
            .map_err(|e| DomainError::Store(e.to_string()))?;
        match rows
            .next()
            .await
            .map_err(|e| DomainError::Store(e.to_string()))?
        {
            Some(row) => get_u32(&row, 0),
            None => Ok(0),
        }
    }

    async fn subject_totals(
        &self,
        user_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<SubjectTotal>, DomainError> {
        let conn = self.conn()?;
        let mut rows = conn
            .query(
                r#"
                SELECT subject, SUM(minutes) AS total
                FROM study_log
                WHERE user_id = ?1 AND local_date >= ?2 AND local_date <= ?3
                GROUP BY subject
                ORDER BY total DESC, subject ASC
                "#,
                params![user_id, format_date(from), format_date(to)],
            )
            .await
            .map_err(|e| DomainError::Store(e.to_string()))?;
        let mut totals = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| DomainError::Store(e.to_string()))?
        {
            totals.push(SubjectTotal {
                subject: get_text(&row, 0)?,
                minutes: get_u32(&row, 1)?,
            });
        }
        Ok(totals)
    }

    async fn logs_for_user(&self, user_id: &str) -> Result<Vec<StudyLogRecord>, DomainError> {
        let conn = self.conn()?;
        let mut rows = conn
            .query(
                r#"
                SELECT user_id, logged_at, local_date, subject, minutes, raw_message
                FROM study_log
                WHERE user_id = ?1
                ORDER BY id ASC
                "#,
                params![user_id],
            )
            .await
            .map_err(|e| DomainError::Store(e.to_string()))?;
        let mut logs = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| DomainError::Store(e.to_string()))?
        {
            logs.push(row_to_log(&row)?);
        }
        Ok(logs)
    }

    async fn log_user_ids(&self) -> Result<Vec<String>, DomainError> {
        self.user_ids("SELECT DISTINCT user_id FROM study_log ORDER BY user_id")
            .await
    }
}

#[async_trait::async_trait]
impl GoalRepo for SqliteRepo {
    async fn upsert_goal(&self, record: &DailyGoalRecord) -> Result<(), DomainError> {
        let conn = self.conn()?;
        let tx = conn
            .transaction()
            .await
            .map_err(|e| DomainError::Store(e.to_string()))?;
        tx.execute(
            "DELETE FROM daily_goals WHERE user_id = ?1 AND start_date = ?2",
            params![record.user_id.as_str(), format_date(record.start_date)],
        )
        .await
        .map_err(|e| DomainError::Store(e.to_string()))?;
        tx.execute(
            r#"
            INSERT INTO daily_goals (user_id, unit, metric, value, start_date, end_date, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                record.user_id.as_str(),
                record.goal.unit.as_str(),
                record.goal.metric.as_str(),
                i64::from(record.goal.value),
                format_date(record.start_date),
                format_date(record.end_date),
                format_date(record.created_at)
            ],
        )
        .await
        .map_err(|e| DomainError::Store(e.to_string()))?;
        tx.commit()
            .await
            .map_err(|e| DomainError::Store(e.to_string()))?;
        Ok(())
    }

    async fn goal_on(
        &self,
        user_id: &str,
        date: NaiveDate,
    ) -> Result<Option<DailyGoalRecord>, DomainError> {
        let conn = self.conn()?;
        let mut rows = conn
            .query(
                r#"
                SELECT user_id, unit, metric, value, start_date, end_date, created_at
                FROM daily_goals
                WHERE user_id = ?1 AND start_date = ?2
                LIMIT 1
                "#,
                params![user_id, format_date(date)],
            )
            .await
            .map_err(|e| DomainError::Store(e.to_string()))?;
        match rows
            .next()
            .await
            .map_err(|e| DomainError::Store(e.to_string()))?
        {
            Some(row) => Ok(Some(row_to_goal(&row)?)),
            None => Ok(None),
        }
    }

    async fn goal_user_ids(&self) -> Result<Vec<String>, DomainError> {
        self.user_ids("SELECT DISTINCT user_id FROM daily_goals ORDER BY user_id")
            .await
    }
}

#[async_trait::async_trait]
impl NotificationRepo for SqliteRepo {
    async fn set_notification(
        &self,
        user_id: &str,
        period: Period,
        time: NotificationTime,
    ) -> Result<(), DomainError> {
        // Column names come from Period::key, never from user input.
        let col = period.key();
        let sql = format!(
            "INSERT INTO notification_settings (user_id, {col}) VALUES (?1, ?2) \
             ON CONFLICT (user_id) DO UPDATE SET {col} = excluded.{col}"
        );
        let conn = self.conn()?;
        conn.execute(&sql, params![user_id, time.to_string()])
            .await
            .map_err(|e| DomainError::Store(e.to_string()))?;
        Ok(())
    }

    async fn notification_settings(
        &self,
        user_id: &str,
    ) -> Result<Option<NotificationSettings>, DomainError> {
        let conn = self.conn()?;
        let mut rows = conn
            .query(
                "SELECT user_id, morning, noon, evening, night FROM notification_settings WHERE user_id = ?1",
                params![user_id],
            )
            .await
            .map_err(|e| DomainError::Store(e.to_string()))?;
        match rows
            .next()
            .await
            .map_err(|e| DomainError::Store(e.to_string()))?
        {
            Some(row) => Ok(Some(row_to_settings(&row)?)),
            None => Ok(None),
        }
    }

    async fn all_notification_settings(&self) -> Result<Vec<NotificationSettings>, DomainError> {
        let conn = self.conn()?;
        let mut rows = conn
            .query(
                "SELECT user_id, morning, noon, evening, night FROM notification_settings ORDER BY user_id",
                (),
            )
            .await
            .map_err(|e| DomainError::Store(e.to_string()))?;
        let mut out = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| DomainError::Store(e.to_string()))?
        {
            out.push(row_to_settings(&row)?);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap()
    }

    fn log(user: &str, day: &str, subject: &str, minutes: u32) -> StudyLogRecord {
        StudyLogRecord {
            user_id: user.into(),
            logged_at: format!("{day}T10:00:00+09:00"),
            local_date: date(day),
            subject: subject.into(),
            minutes,
            raw_message: format!("{subject}{minutes}分"),
        }
    }

    fn goal(user: &str, day: &str, value: u32) -> DailyGoalRecord {
        DailyGoalRecord {
            user_id: user.into(),
            goal: GoalFields {
                unit: GoalUnit::Daily,
                metric: GoalMetric::Time,
                value,
            },
            start_date: date(day),
            end_date: date(day),
            created_at: date(day),
        }
    }

    #[tokio::test]
    async fn study_log_totals() {
        let dir = tempfile::tempdir().unwrap();
        let repo = SqliteRepo::connect(dir.path()).await.unwrap();
        repo.append_log(&log("U1", "2024-05-01", "英語", 30)).await.unwrap();
        repo.append_log(&log("U1", "2024-05-01", "数学", 60)).await.unwrap();
        repo.append_log(&log("U1", "2024-05-02", "英語", 45)).await.unwrap();
        repo.append_log(&log("U2", "2024-05-01", "英語", 10)).await.unwrap();

        assert_eq!(repo.total_minutes_on("U1", date("2024-05-01")).await.unwrap(), 90);
        assert_eq!(repo.total_minutes_on("U3", date("2024-05-01")).await.unwrap(), 0);

        let totals = repo
            .subject_totals("U1", date("2024-05-01"), date("2024-05-02"))
            .await
            .unwrap();
        assert_eq!(totals[0].subject, "英語");
        assert_eq!(totals[0].minutes, 75);
        assert_eq!(totals[1].minutes, 60);

        assert_eq!(repo.logs_for_user("U1").await.unwrap().len(), 3);
        assert_eq!(repo.log_user_ids().await.unwrap(), vec!["U1", "U2"]);
    }

    #[tokio::test]
    async fn goal_upsert_replaces_same_day() {
        let dir = tempfile::tempdir().unwrap();
        let repo = SqliteRepo::connect(dir.path()).await.unwrap();
        repo.upsert_goal(&goal("U1", "2024-05-01", 60)).await.unwrap();
        repo.upsert_goal(&goal("U1", "2024-05-01", 90)).await.unwrap();
        repo.upsert_goal(&goal("U1", "2024-05-02", 30)).await.unwrap();

        let g = repo.goal_on("U1", date("2024-05-01")).await.unwrap().unwrap();
        assert_eq!(g.goal.value, 90);
        assert_eq!(
            repo.goal_on("U1", date("2024-05-02")).await.unwrap().unwrap().goal.value,
            30
        );
        assert!(repo.goal_on("U1", date("2024-05-03")).await.unwrap().is_none());
        assert_eq!(repo.goal_user_ids().await.unwrap(), vec!["U1"]);
    }

    #[tokio::test]
    async fn new_notification_user_gets_off_elsewhere() {
        let dir = tempfile::tempdir().unwrap();
        let repo = SqliteRepo::connect(dir.path()).await.unwrap();
        let seven = ClockTime::new(7, 30).unwrap();
        repo.set_notification("U1", Period::Morning, NotificationTime::At(seven))
            .await
            .unwrap();

        let s = repo.notification_settings("U1").await.unwrap().unwrap();
        assert_eq!(s.morning, Some(seven));
        assert_eq!(s.noon, None);
        assert_eq!(s.night, None);

        let nine = ClockTime::new(21, 0).unwrap();
        repo.set_notification("U1", Period::Night, NotificationTime::At(nine))
            .await
            .unwrap();
        repo.set_notification("U1", Period::Morning, NotificationTime::Off)
            .await
            .unwrap();
        let s = repo.notification_settings("U1").await.unwrap().unwrap();
        assert_eq!(s.morning, None);
        assert_eq!(s.night, Some(nine));
        assert_eq!(repo.all_notification_settings().await.unwrap().len(), 1);
    }
}
