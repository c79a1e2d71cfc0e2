//! Notification-time grammar: period keyword, then a clock time or a cancel keyword.

use super::normalize::to_clock_time;
use crate::domain::{NotificationTime, NotificationUpdateFields, ParseFailureReason, Period};
use regex::Regex;
use std::sync::LazyLock;

static PERIOD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)夕方|朝|昼|夜|morning|noon|evening|night").expect("period regex")
});

/// `<N>時半`, or `<N>` with an optional `:`/`：`/`時`/space separator and minutes.
static CLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([0-9]{1,2})\s*時半|([0-9]{1,2})(\s*[:：時]\s*|\s+)?([0-9]{1,2})?\s*分?")
        .expect("clock regex")
});

/// Digit runs with the unit that follows them, used to tell clock times from durations.
static NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([0-9]+)(時間|時半|時|[:：][0-9]{2}|分)?").expect("number regex")
});

static CANCEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)やめて|止めて|停止|オフ|off|なし").expect("cancel regex"));

pub(crate) const ACTION_KEYWORDS: &[&str] = &[
    "通知", "リマインド", "知らせ", "設定", "変更", "して", "お願い", "送って",
];

/// First period keyword in text order, with its byte end offset.
pub fn find_period(text: &str) -> Option<(Period, usize)> {
    let m = PERIOD_RE.find(text)?;
    Period::from_keyword(m.as_str()).map(|p| (p, m.end()))
}

/// Words that only make sense as a request about notifications.
const NOTIFY_KEYWORDS: &[&str] = &["通知", "リマインド"];

/// True when the text reads as a botched notification request: a digit after the
/// period keyword, or an explicit 通知/リマインド.
pub fn looks_like_notification_request(text: &str) -> bool {
    let Some((_, after)) = find_period(text) else {
        return false;
    };
    text[after..].chars().any(|c| c.is_ascii_digit())
        || NOTIFY_KEYWORDS.iter().any(|k| text.contains(k))
}

pub fn has_action_keyword(text: &str) -> bool {
    ACTION_KEYWORDS.iter().any(|k| text.contains(k))
}

pub fn has_cancel_keyword(text: &str) -> bool {
    CANCEL_RE.is_match(text)
}

/// True when a 1–2 digit number appears that is not a duration (`N時間`, `N分`).
pub fn has_clock_like(text: &str) -> bool {
    NUMBER_RE.captures_iter(text).any(|caps| {
        let digits = caps.get(1).map_or(0, |m| m.as_str().len());
        let unit = caps.get(2).map(|m| m.as_str());
        (1..=2).contains(&digits) && !matches!(unit, Some("時間") | Some("分"))
    })
}

/// True when the digit run at `start` is a duration (`N時間`, `N分`) or the tail of a run
/// already looked at.
fn is_duration_run(text: &str, start: usize) -> bool {
    if text[..start].chars().next_back().is_some_and(|c| c.is_ascii_digit()) {
        return true;
    }
    let digits = text[start..].bytes().take_while(u8::is_ascii_digit).count();
    let after = text[start + digits..].trim_start();
    after.starts_with("時間") || after.starts_with('分')
}

/// Extracts the period and the requested time (or OFF).
///
/// The time must follow the period keyword. A cancel keyword alongside a numeric time
/// is ambiguous and fails rather than guessing.
pub fn extract_notification(text: &str) -> Result<NotificationUpdateFields, ParseFailureReason> {
    let (period, after) = find_period(text).ok_or(ParseFailureReason::TimeFormatInvalid)?;
    let rest = &text[after..];
    let cancel = has_cancel_keyword(rest);

    let candidate = CLOCK_RE.captures_iter(rest).find(|caps| {
        caps.get(0)
            .is_some_and(|m| !is_duration_run(rest, m.start()))
    });
    let Some(caps) = candidate else {
        return if cancel {
            Ok(NotificationUpdateFields {
                period,
                clock_time: NotificationTime::Off,
            })
        } else {
            Err(ParseFailureReason::TimeFormatInvalid)
        };
    };
    if cancel {
        return Err(ParseFailureReason::TimeFormatInvalid);
    }
    let trailing_digit = caps
        .get(0)
        .and_then(|m| rest[m.end()..].chars().next())
        .is_some_and(|c| c.is_ascii_digit());
    if trailing_digit {
        return Err(ParseFailureReason::TimeFormatInvalid);
    }

    // `730` style runs: minutes glued to the hour with no separator.
    if caps.get(3).is_none() && caps.get(4).is_some() {
        return Err(ParseFailureReason::TimeFormatInvalid);
    }

    let num = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<u32>().ok());
    let (hour, minute) = match (num(1), num(2)) {
        (Some(h), _) => (h, 30),
        (None, Some(h)) => (h, num(4).unwrap_or(0)),
        (None, None) => return Err(ParseFailureReason::TimeFormatInvalid),
    };

    let time = to_clock_time(hour, minute, period).ok_or(ParseFailureReason::TimeFormatInvalid)?;
    Ok(NotificationUpdateFields {
        period,
        clock_time: NotificationTime::At(time),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ClockTime;

    fn time_of(text: &str) -> Result<String, ParseFailureReason> {
        extract_notification(text).map(|f| f.clock_time.to_string())
    }

    #[test]
    fn hour_minute_with_kanji_separator() {
        let f = extract_notification("朝の通知を7時30分にして").unwrap();
        assert_eq!(f.period, Period::Morning);
        assert_eq!(f.clock_time, NotificationTime::At(ClockTime::new(7, 30).unwrap()));
    }

    #[test]
    fn separators_and_defaults() {
        assert_eq!(time_of("夜の通知を9:15にして"), Ok("21:15".into()));
        assert_eq!(time_of("夜の通知を9：15にして"), Ok("21:15".into()));
        assert_eq!(time_of("昼の通知を1 05にして"), Ok("13:05".into()));
        assert_eq!(time_of("夕方の通知を6時にして"), Ok("18:00".into()));
        assert_eq!(time_of("夕方の通知を6にして"), Ok("18:00".into()));
    }

    #[test]
    fn half_hour_idiom() {
        assert_eq!(time_of("夜の通知を8時半にして"), Ok("20:30".into()));
        assert_eq!(time_of("朝の通知を12時半にして"), Ok("00:30".into()));
    }

    #[test]
    fn english_period_keyword() {
        let f = extract_notification("Night通知を10時にして").unwrap();
        assert_eq!(f.period, Period::Night);
        assert_eq!(f.clock_time.to_string(), "22:00");
    }

    #[test]
    fn durations_before_the_time_are_skipped() {
        assert_eq!(time_of("夜の英語30分を通知して 9時"), Ok("21:00".into()));
        assert_eq!(time_of("朝の1時間半の勉強を7時に通知して"), Ok("07:00".into()));
        assert_eq!(time_of("夜の100分の復習を9:30に通知して"), Ok("21:30".into()));
        assert_eq!(
            time_of("夜の英語30分を通知して"),
            Err(ParseFailureReason::TimeFormatInvalid)
        );
    }

    #[test]
    fn cancel_without_time_is_off() {
        let f = extract_notification("朝の通知をやめて").unwrap();
        assert_eq!(f.clock_time, NotificationTime::Off);
        assert_eq!(f.clock_time.to_string(), "OFF");
    }

    #[test]
    fn cancel_with_time_is_ambiguous() {
        assert_eq!(
            time_of("朝7時の通知をやめて"),
            Err(ParseFailureReason::TimeFormatInvalid)
        );
    }

    #[test]
    fn invalid_times_fail() {
        assert_eq!(time_of("夜の通知を25時にして").unwrap_err(), ParseFailureReason::TimeFormatInvalid);
        assert_eq!(time_of("朝の通知を7時75分にして").unwrap_err(), ParseFailureReason::TimeFormatInvalid);
        assert_eq!(time_of("朝の通知を123にして").unwrap_err(), ParseFailureReason::TimeFormatInvalid);
        assert_eq!(time_of("朝の通知を変更して").unwrap_err(), ParseFailureReason::TimeFormatInvalid);
        assert_eq!(time_of("7時にして").unwrap_err(), ParseFailureReason::TimeFormatInvalid);
    }

    #[test]
    fn notification_request_needs_digit_or_notify_word() {
        assert!(looks_like_notification_request("朝の通知を変更"));
        assert!(looks_like_notification_request("夜は25時にして"));
        assert!(!looks_like_notification_request("今夜もよろしくお願いします"));
        assert!(!looks_like_notification_request("朝ごはんを用意して"));
        // digits before the period keyword do not count
        assert!(!looks_like_notification_request("3人で朝ごはんを用意して"));
    }

    #[test]
    fn clock_like_excludes_durations() {
        assert!(has_clock_like("7時30分"));
        assert!(has_clock_like("7:30"));
        assert!(has_clock_like("8時半"));
        assert!(!has_clock_like("1時間"));
        assert!(!has_clock_like("30分"));
        assert!(!has_clock_like("123"));
    }
}
