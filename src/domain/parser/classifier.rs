//! Intent classification as an ordered rule table.
//!
//! Rules are tried top to bottom and the first predicate that holds decides the intent;
//! its extractor is the only grammar run for the message. The grammars overlap, so the
//! order of [`RULES`] is part of the contract.

use super::clock::{
    extract_notification, find_period, has_action_keyword, has_cancel_keyword, has_clock_like,
    looks_like_notification_request,
};
use super::duration::find_duration;
use super::extract::{extract_goal, extract_study_log, find_goal_value, has_amount_after_daily};
use super::subject::{SubjectVocabulary, has_subject};
use crate::domain::{ClassifiedIntent, ParseFailureReason, ParseOutcome};

type Predicate = fn(&str, &SubjectVocabulary) -> bool;
type Extractor = fn(&str, &SubjectVocabulary) -> Result<ParseOutcome, ParseFailureReason>;

pub(crate) struct Rule {
    pub intent: ClassifiedIntent,
    pub predicate: Predicate,
    pub extract: Extractor,
}

pub(crate) static RULES: [Rule; 3] = [
    Rule {
        intent: ClassifiedIntent::NotificationUpdate,
        predicate: is_notification_update,
        extract: notification_fields,
    },
    Rule {
        intent: ClassifiedIntent::GoalDeclaration,
        predicate: is_goal_declaration,
        extract: goal_fields,
    },
    Rule {
        intent: ClassifiedIntent::StudyLogEntry,
        predicate: is_study_log_entry,
        extract: study_log_fields,
    },
];

/// Period keyword, action keyword, and a clock time (or cancel keyword).
pub fn is_notification_update(text: &str, _: &SubjectVocabulary) -> bool {
    find_period(text).is_some()
        && has_action_keyword(text)
        && (has_clock_like(text) || has_cancel_keyword(text))
}

/// `毎日` followed by a duration or count.
pub fn is_goal_declaration(text: &str, _: &SubjectVocabulary) -> bool {
    find_goal_value(text).is_some()
}

/// A duration plus a vocabulary subject or a tag.
pub fn is_study_log_entry(text: &str, vocabulary: &SubjectVocabulary) -> bool {
    find_duration(text).is_some() && has_subject(text, vocabulary)
}

fn notification_fields(text: &str, _: &SubjectVocabulary) -> Result<ParseOutcome, ParseFailureReason> {
    extract_notification(text).map(ParseOutcome::Notification)
}

fn goal_fields(text: &str, _: &SubjectVocabulary) -> Result<ParseOutcome, ParseFailureReason> {
    extract_goal(text).map(ParseOutcome::Goal)
}

fn study_log_fields(
    text: &str,
    vocabulary: &SubjectVocabulary,
) -> Result<ParseOutcome, ParseFailureReason> {
    extract_study_log(text, vocabulary).map(ParseOutcome::StudyLog)
}

pub(crate) fn matching_rule(text: &str, vocabulary: &SubjectVocabulary) -> Option<&'static Rule> {
    RULES.iter().find(|r| (r.predicate)(text, vocabulary))
}

/// Classifies digit-normalised text. Total: falls back to `Unrecognized`.
pub fn classify(text: &str, vocabulary: &SubjectVocabulary) -> ClassifiedIntent {
    matching_rule(text, vocabulary).map_or(ClassifiedIntent::Unrecognized, |r| r.intent)
}

/// Closest failure kind for text no rule accepted, so the reply can say what is missing.
pub fn diagnose(text: &str, vocabulary: &SubjectVocabulary) -> ParseFailureReason {
    if has_action_keyword(text) && looks_like_notification_request(text) {
        ParseFailureReason::TimeFormatInvalid
    } else if has_amount_after_daily(text) {
        ParseFailureReason::DurationNotFound
    } else if find_duration(text).is_some() {
        ParseFailureReason::SubjectNotFound
    } else if has_subject(text, vocabulary) {
        ParseFailureReason::DurationNotFound
    } else {
        ParseFailureReason::Unrecognized
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn intent(text: &str) -> ClassifiedIntent {
        classify(text, &SubjectVocabulary::default())
    }

    #[test]
    fn each_intent() {
        assert_eq!(intent("朝の通知を7時30分にして"), ClassifiedIntent::NotificationUpdate);
        assert_eq!(intent("毎日1時間半"), ClassifiedIntent::GoalDeclaration);
        assert_eq!(intent("英語30分"), ClassifiedIntent::StudyLogEntry);
        assert_eq!(intent("#数学 #復習 1時間"), ClassifiedIntent::StudyLogEntry);
        assert_eq!(intent("こんにちは"), ClassifiedIntent::Unrecognized);
    }

    #[test]
    fn notification_needs_all_three_conditions() {
        // no action keyword
        assert_eq!(intent("朝7時"), ClassifiedIntent::Unrecognized);
        // no time
        assert_eq!(intent("朝の通知を変更"), ClassifiedIntent::Unrecognized);
        // no period
        assert_eq!(intent("通知を7時にして"), ClassifiedIntent::Unrecognized);
        // cancel stands in for the time
        assert_eq!(intent("夜の通知をやめて"), ClassifiedIntent::NotificationUpdate);
    }

    #[test]
    fn notification_outranks_goal_and_log() {
        assert_eq!(intent("毎日朝7時に通知して"), ClassifiedIntent::NotificationUpdate);
        assert_eq!(intent("夜の英語30分を通知して 9時"), ClassifiedIntent::NotificationUpdate);
    }

    #[test]
    fn durations_do_not_look_like_clock_times() {
        assert_eq!(intent("夜に数学を1時間勉強して"), ClassifiedIntent::StudyLogEntry);
        assert_eq!(intent("毎日夜に2時間勉強して"), ClassifiedIntent::GoalDeclaration);
    }

    #[test]
    fn goal_outranks_log() {
        assert_eq!(intent("毎日英語を30分"), ClassifiedIntent::GoalDeclaration);
    }

    #[test]
    fn diagnose_names_the_missing_piece() {
        let vocab = SubjectVocabulary::default();
        assert_eq!(diagnose("朝の通知を変更", &vocab), ParseFailureReason::TimeFormatInvalid);
        assert_eq!(diagnose("毎日3時がんばる", &vocab), ParseFailureReason::DurationNotFound);
        assert_eq!(diagnose("30分がんばった", &vocab), ParseFailureReason::SubjectNotFound);
        assert_eq!(diagnose("英語やった", &vocab), ParseFailureReason::DurationNotFound);
        assert_eq!(diagnose("こんにちは", &vocab), ParseFailureReason::Unrecognized);
    }

    #[test]
    fn everyday_chatter_is_unrecognized() {
        let vocab = SubjectVocabulary::default();
        for text in ["今夜もよろしくお願いします", "朝ごはんを用意して", "毎日楽しい", "毎日がんばる"] {
            assert_eq!(intent(text), ClassifiedIntent::Unrecognized);
            assert_eq!(diagnose(text, &vocab), ParseFailureReason::Unrecognized, "{text}");
        }
    }
}
