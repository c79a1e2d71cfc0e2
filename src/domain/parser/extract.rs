//! Goal and study-log field extraction.

use super::duration::{Span, find_count, find_duration};
use super::subject::{SubjectVocabulary, extract_subject};
use crate::domain::{GoalFields, GoalMetric, GoalUnit, ParseFailureReason, StudyLogFields};

pub(crate) const DAILY_TOKEN: &str = "毎日";

/// Duration or count expression after `毎日`, whichever comes first.
pub fn find_goal_value(text: &str) -> Option<(GoalMetric, Span)> {
    let (_, rest) = text.split_once(DAILY_TOKEN)?;
    let time = find_duration(rest).map(|s| (GoalMetric::Time, s));
    let count = find_count(rest).map(|s| (GoalMetric::Count, s));
    match (time, count) {
        (Some(t), Some(c)) => Some(if c.1.start < t.1.start { c } else { t }),
        (t, c) => t.or(c),
    }
}

/// True when something number-like follows `毎日` (a digit, 時間 or 分) even if no
/// full duration or count parses.
pub fn has_amount_after_daily(text: &str) -> bool {
    text.split_once(DAILY_TOKEN).is_some_and(|(_, rest)| {
        rest.chars().any(|c| c.is_ascii_digit()) || rest.contains("時間") || rest.contains('分')
    })
}

pub fn extract_goal(text: &str) -> Result<GoalFields, ParseFailureReason> {
    let (metric, span) = find_goal_value(text).ok_or(ParseFailureReason::DurationNotFound)?;
    if span.value == 0 {
        return Err(ParseFailureReason::GoalValueInvalid);
    }
    Ok(GoalFields {
        unit: GoalUnit::Daily,
        metric,
        value: span.value,
    })
}

pub fn extract_study_log(
    text: &str,
    vocabulary: &SubjectVocabulary,
) -> Result<StudyLogFields, ParseFailureReason> {
    let span = find_duration(text).ok_or(ParseFailureReason::DurationNotFound)?;
    if span.value == 0 {
        return Err(ParseFailureReason::DurationNotFound);
    }
    let subject =
        extract_subject(text, vocabulary).ok_or(ParseFailureReason::SubjectNotFound)?;
    Ok(StudyLogFields {
        subject,
        duration_minutes: span.value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn daily_goal_half_hour_idiom() {
        let g = extract_goal("毎日1時間半").unwrap();
        assert_eq!(g.unit, GoalUnit::Daily);
        assert_eq!(g.metric, GoalMetric::Time);
        assert_eq!(g.value, 90);
    }

    #[test]
    fn daily_goal_forms() {
        assert_eq!(extract_goal("毎日2時間").unwrap().value, 120);
        assert_eq!(extract_goal("毎日1時間30分").unwrap().value, 90);
        assert_eq!(extract_goal("毎日 45分 勉強する").unwrap().value, 45);
    }

    #[test]
    fn daily_goal_count() {
        let g = extract_goal("毎日単語テストを3回").unwrap();
        assert_eq!(g.metric, GoalMetric::Count);
        assert_eq!(g.value, 3);
    }

    #[test]
    fn zero_goal_is_invalid() {
        assert_eq!(extract_goal("毎日0分"), Err(ParseFailureReason::GoalValueInvalid));
        assert_eq!(extract_goal("毎日がんばる"), Err(ParseFailureReason::DurationNotFound));
    }

    #[test]
    fn duration_before_daily_token_is_ignored() {
        assert_eq!(extract_goal("30分を毎日"), Err(ParseFailureReason::DurationNotFound));
    }

    #[test]
    fn study_log_requires_subject_and_positive_minutes() {
        let vocab = SubjectVocabulary::default();
        let f = extract_study_log("英語30分", &vocab).unwrap();
        assert_eq!(f.subject, "英語");
        assert_eq!(f.duration_minutes, 30);
        assert_eq!(
            extract_study_log("30分がんばった", &vocab),
            Err(ParseFailureReason::SubjectNotFound)
        );
        assert_eq!(
            extract_study_log("英語0分", &vocab),
            Err(ParseFailureReason::DurationNotFound)
        );
    }
}
