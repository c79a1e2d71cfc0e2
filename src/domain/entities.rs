//! Domain entities. Pure data structures for the core business.
//!
//! No LINE/IO types here; adapters map into these.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A text message received from the messaging platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboundMessage {
    pub user_id: String,
    pub text: String,
    pub received_at: DateTime<Utc>,
}

impl InboundMessage {
    pub fn new(user_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            text: text.into(),
            received_at: Utc::now(),
        }
    }
}

/// Intent chosen by the classifier. Exactly one per message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassifiedIntent {
    NotificationUpdate,
    GoalDeclaration,
    StudyLogEntry,
    Unrecognized,
}

impl fmt::Display for ClassifiedIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::NotificationUpdate => "notification_update",
            Self::GoalDeclaration => "goal_declaration",
            Self::StudyLogEntry => "study_log_entry",
            Self::Unrecognized => "unrecognized",
        };
        f.write_str(s)
    }
}

/// One of the four named segments of the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Morning,
    Noon,
    Evening,
    Night,
}

impl Period {
    pub const ALL: [Period; 4] = [Self::Morning, Self::Noon, Self::Evening, Self::Night];

    /// Column / config key name (`morning`, `noon`, ...).
    pub fn key(self) -> &'static str {
        match self {
            Self::Morning => "morning",
            Self::Noon => "noon",
            Self::Evening => "evening",
            Self::Night => "night",
        }
    }

    /// Maps a recognised keyword (Japanese or English, any case) to its period.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword.to_lowercase().as_str() {
            "朝" | "morning" => Some(Self::Morning),
            "昼" | "noon" => Some(Self::Noon),
            "夕方" | "evening" => Some(Self::Evening),
            "夜" | "night" => Some(Self::Night),
            _ => None,
        }
    }
}

/// 24-hour wall clock time. Always `hour < 24` and `minute < 60`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct ClockTime {
    hour: u32,
    minute: u32,
}

impl ClockTime {
    pub fn new(hour: u32, minute: u32) -> Option<Self> {
        (hour < 24 && minute < 60).then_some(Self { hour, minute })
    }

    pub fn hour(self) -> u32 {
        self.hour
    }

    pub fn minute(self) -> u32 {
        self.minute
    }

    /// Parses `HH:MM` (as stored). Anything else, including `OFF`, is `None`.
    pub fn parse(s: &str) -> Option<Self> {
        let (h, m) = s.trim().split_once(':')?;
        Self::new(h.parse().ok()?, m.parse().ok()?)
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// Notification slot value: a time, or the explicit cancellation sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationTime {
    At(ClockTime),
    Off,
}

impl NotificationTime {
    pub const OFF_SENTINEL: &'static str = "OFF";
}

impl fmt::Display for NotificationTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::At(t) => t.fmt(f),
            Self::Off => f.write_str(Self::OFF_SENTINEL),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationUpdateFields {
    pub period: Period,
    pub clock_time: NotificationTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalUnit {
    Daily,
}

impl GoalUnit {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalMetric {
    /// Value is in minutes.
    Time,
    /// Value is a repetition count (`回`).
    Count,
}

impl GoalMetric {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Time => "time",
            Self::Count => "count",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "time" => Some(Self::Time),
            "count" => Some(Self::Count),
            _ => None,
        }
    }

    /// Suffix used in replies (`分` / `回`).
    pub fn unit_label(self) -> &'static str {
        match self {
            Self::Time => "分",
            Self::Count => "回",
        }
    }
}

/// A daily goal. `value > 0` is checked by the extractor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalFields {
    pub unit: GoalUnit,
    pub metric: GoalMetric,
    pub value: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudyLogFields {
    pub subject: String,
    pub duration_minutes: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseFailureReason {
    /// No duration expression where the intent requires one.
    DurationNotFound,
    /// Duration found, but no vocabulary subject or tag.
    SubjectNotFound,
    /// Period keyword present, clock-time grammar did not match.
    TimeFormatInvalid,
    /// Goal value parsed as zero.
    GoalValueInvalid,
    /// No intent grammar matched.
    Unrecognized,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseFailure {
    pub reason: ParseFailureReason,
    pub original_text: String,
}

impl ParseFailure {
    pub fn new(reason: ParseFailureReason, original_text: impl Into<String>) -> Self {
        Self {
            reason,
            original_text: original_text.into(),
        }
    }
}

/// Result of handling one message's text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParseOutcome {
    Notification(NotificationUpdateFields),
    Goal(GoalFields),
    StudyLog(StudyLogFields),
    Failure(ParseFailure),
}

impl ParseOutcome {
    /// Intent implied by the result. Every failure maps to `Unrecognized`; use
    /// `MessageParser::handle_classified` for the classifier's own verdict.
    pub fn intent(&self) -> ClassifiedIntent {
        match self {
            Self::Notification(_) => ClassifiedIntent::NotificationUpdate,
            Self::Goal(_) => ClassifiedIntent::GoalDeclaration,
            Self::StudyLog(_) => ClassifiedIntent::StudyLogEntry,
            Self::Failure(_) => ClassifiedIntent::Unrecognized,
        }
    }
}

/// Row of the append-only study log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudyLogRecord {
    pub user_id: String,
    /// RFC 3339 timestamp in the configured local offset.
    pub logged_at: String,
    pub local_date: NaiveDate,
    pub subject: String,
    pub minutes: u32,
    pub raw_message: String,
}

/// Row of the daily goal table. One per user per `start_date`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyGoalRecord {
    pub user_id: String,
    pub goal: GoalFields,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub created_at: NaiveDate,
}

/// Per-user notification times. `None` is stored as `OFF`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NotificationSettings {
    pub user_id: String,
    pub morning: Option<ClockTime>,
    pub noon: Option<ClockTime>,
    pub evening: Option<ClockTime>,
    pub night: Option<ClockTime>,
}

impl NotificationSettings {
    pub fn slot(&self, period: Period) -> Option<ClockTime> {
        match period {
            Period::Morning => self.morning,
            Period::Noon => self.noon,
            Period::Evening => self.evening,
            Period::Night => self.night,
        }
    }

    /// Periods whose slot equals `now`.
    pub fn due_at(&self, now: ClockTime) -> Vec<Period> {
        Period::ALL
            .into_iter()
            .filter(|p| self.slot(*p) == Some(now))
            .collect()
    }
}

/// Minutes per subject over a date range, sorted descending by minutes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectTotal {
    pub subject: String,
    pub minutes: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_time_rejects_out_of_range() {
        assert!(ClockTime::new(24, 0).is_none());
        assert!(ClockTime::new(7, 60).is_none());
        assert_eq!(ClockTime::new(7, 5).unwrap().to_string(), "07:05");
    }

    #[test]
    fn clock_time_parse_ignores_off() {
        assert_eq!(ClockTime::parse("21:30"), ClockTime::new(21, 30));
        assert_eq!(ClockTime::parse("OFF"), None);
    }

    #[test]
    fn period_keywords_are_case_insensitive() {
        assert_eq!(Period::from_keyword("Morning"), Some(Period::Morning));
        assert_eq!(Period::from_keyword("夕方"), Some(Period::Evening));
        assert_eq!(Period::from_keyword("午後"), None);
    }

    #[test]
    fn due_at_matches_exact_slot() {
        let s = NotificationSettings {
            user_id: "U1".into(),
            morning: ClockTime::new(7, 0),
            night: ClockTime::new(21, 0),
            ..Default::default()
        };
        assert_eq!(s.due_at(ClockTime::new(7, 0).unwrap()), vec![Period::Morning]);
        assert!(s.due_at(ClockTime::new(7, 1).unwrap()).is_empty());
    }
}
