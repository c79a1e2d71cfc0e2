//! Local time helpers. All dates shown to users and used as store keys are local dates.

use crate::domain::ClockTime;
use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, Timelike, Utc};

/// Converts instants into the configured local offset.
#[derive(Debug, Clone, Copy)]
pub struct LocalClock {
    offset: FixedOffset,
}

impl LocalClock {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    pub fn now(&self) -> DateTime<FixedOffset> {
        self.to_local(Utc::now())
    }

    pub fn to_local(&self, instant: DateTime<Utc>) -> DateTime<FixedOffset> {
        instant.with_timezone(&self.offset)
    }
}

/// Wall-clock `HH:MM` of a local instant (seconds dropped).
pub fn clock_time_of(dt: &DateTime<FixedOffset>) -> ClockTime {
    ClockTime::new(dt.hour(), dt.minute()).unwrap_or_default()
}

/// Monday of the week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

/// First day of the month containing `date`.
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn week_starts_on_monday() {
        // 2024-05-15 is a Wednesday
        assert_eq!(week_start(date("2024-05-15")), date("2024-05-13"));
        assert_eq!(week_start(date("2024-05-13")), date("2024-05-13"));
        assert_eq!(week_start(date("2024-05-19")), date("2024-05-13"));
    }

    #[test]
    fn month_start_is_first_day() {
        assert_eq!(month_start(date("2024-02-29")), date("2024-02-01"));
    }

    #[test]
    fn local_date_crosses_midnight() {
        let jst = LocalClock::new(FixedOffset::east_opt(9 * 3600).unwrap());
        let utc = DateTime::parse_from_rfc3339("2024-05-01T16:30:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let local = jst.to_local(utc);
        assert_eq!(local.date_naive(), date("2024-05-02"));
        assert_eq!(clock_time_of(&local).to_string(), "01:30");
    }
}
