//! User-facing reply texts for each parse outcome.

use crate::domain::{
    GoalFields, NotificationTime, NotificationUpdateFields, ParseFailureReason, ParseOutcome,
    PeriodLabels, StudyLogFields,
};

pub fn notification_reply(fields: &NotificationUpdateFields, labels: &PeriodLabels) -> String {
    let label = labels.label(fields.period);
    match fields.clock_time {
        NotificationTime::At(t) => format!("✅ {label}の通知時間を {t} に変更しました！"),
        NotificationTime::Off => format!("🔕 {label}の通知をオフにしました。"),
    }
}

pub fn goal_reply(goal: &GoalFields) -> String {
    format!(
        "✅ 毎日の目標「{}{}」を設定しました！",
        goal.value,
        goal.metric.unit_label()
    )
}

pub fn study_log_reply(fields: &StudyLogFields) -> String {
    format!(
        "✅ 「{}」を{}分 記録しました！",
        fields.subject, fields.duration_minutes
    )
}

/// Corrective instruction for a parse failure.
pub fn failure_reply(reason: ParseFailureReason) -> String {
    match reason {
        ParseFailureReason::TimeFormatInvalid => {
            "⚠️ 通知時間の形式が正しくありません（例：朝の通知を7時30分にして）".to_string()
        }
        ParseFailureReason::DurationNotFound => {
            "⚠️ 時間が見つかりませんでした。\n例：「英語30分」「数学1時間」「毎日1時間半」"
                .to_string()
        }
        ParseFailureReason::SubjectNotFound => {
            "⚠️ 科目名が見つかりませんでした。\n例：「英語30分」「数学1時間」「#数学 1時間」"
                .to_string()
        }
        ParseFailureReason::GoalValueInvalid => {
            "⚠️ 目標は1分（1回）以上で設定してください。\n例：「毎日1時間半」".to_string()
        }
        ParseFailureReason::Unrecognized => {
            "⚠️ メッセージを理解できませんでした。言い換えてもう一度送ってください。\n例：「英語30分」「毎日1時間」「朝の通知を7時にして」"
                .to_string()
        }
    }
}

/// Reply when the outcome parsed but could not be saved.
pub fn store_failure_reply(error: &str) -> String {
    format!("❌ 記録中にエラーが発生しました: {error}")
}

pub fn outcome_reply(outcome: &ParseOutcome, labels: &PeriodLabels) -> String {
    match outcome {
        ParseOutcome::Notification(f) => notification_reply(f, labels),
        ParseOutcome::Goal(g) => goal_reply(g),
        ParseOutcome::StudyLog(f) => study_log_reply(f),
        ParseOutcome::Failure(f) => failure_reply(f.reason),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ClockTime, GoalMetric, GoalUnit, Period};

    #[test]
    fn notification_texts() {
        let labels = PeriodLabels::default();
        let on = NotificationUpdateFields {
            period: Period::Morning,
            clock_time: NotificationTime::At(ClockTime::new(7, 30).unwrap()),
        };
        assert_eq!(notification_reply(&on, &labels), "✅ 朝の通知時間を 07:30 に変更しました！");
        let off = NotificationUpdateFields {
            period: Period::Evening,
            clock_time: NotificationTime::Off,
        };
        assert!(notification_reply(&off, &labels).contains("夕方の通知をオフ"));
    }

    #[test]
    fn goal_text_uses_metric_unit() {
        let g = GoalFields {
            unit: GoalUnit::Daily,
            metric: GoalMetric::Count,
            value: 3,
        };
        assert_eq!(goal_reply(&g), "✅ 毎日の目標「3回」を設定しました！");
    }

    #[test]
    fn study_log_text() {
        let f = StudyLogFields {
            subject: "英語".into(),
            duration_minutes: 30,
        };
        assert_eq!(study_log_reply(&f), "✅ 「英語」を30分 記録しました！");
    }

    #[test]
    fn failures_are_distinct() {
        let all = [
            ParseFailureReason::DurationNotFound,
            ParseFailureReason::SubjectNotFound,
            ParseFailureReason::TimeFormatInvalid,
            ParseFailureReason::GoalValueInvalid,
            ParseFailureReason::Unrecognized,
        ];
        let texts: std::collections::HashSet<_> = all.iter().map(|r| failure_reply(*r)).collect();
        assert_eq!(texts.len(), all.len());
        assert!(store_failure_reply("disk full").starts_with("❌"));
    }
}
