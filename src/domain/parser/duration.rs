//! Duration grammar shared by goal and study-log extraction.
//!
//! Expects digit-normalised text (see [`super::normalize::normalize_digits`]).

use regex::Regex;
use std::sync::LazyLock;

/// Alternatives are ordered most specific first; the regex engine prefers earlier
/// alternatives at the same start, so `1時間30分` is never cut short at `1時間`.
static DURATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"([0-9]+)\s*時間\s*([0-9]+)\s*分|([0-9]+)\s*時間半|([0-9]+)\s*時間|([0-9]+)\s*分|半",
    )
    .expect("duration regex")
});

static COUNT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9]+)\s*回").expect("count regex"));

/// A matched expression and where it sits in the text (byte offsets).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub value: u32,
    pub start: usize,
    pub end: usize,
}

/// Leftmost duration expression in `text`, in minutes.
///
/// A bare `半` counts only when it does not follow a digit or `時` (that is the clock idiom).
/// Numbers too large for `u32` minutes are skipped.
pub fn find_duration(text: &str) -> Option<Span> {
    for caps in DURATION_RE.captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        let num = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<u32>().ok());
        let has = |i: usize| caps.get(i).is_some();

        let minutes = if has(1) {
            num(1)
                .and_then(|h| h.checked_mul(60))
                .zip(num(2))
                .and_then(|(h, m)| h.checked_add(m))
        } else if has(3) {
            num(3)
                .and_then(|h| h.checked_mul(60))
                .and_then(|h| h.checked_add(30))
        } else if has(4) {
            num(4).and_then(|h| h.checked_mul(60))
        } else if has(5) {
            num(5)
        } else {
            let prev = text[..whole.start()].chars().next_back();
            if prev.is_some_and(|c| c.is_ascii_digit() || c == '時') {
                continue;
            }
            Some(30)
        };

        if let Some(value) = minutes {
            return Some(Span {
                value,
                start: whole.start(),
                end: whole.end(),
            });
        }
    }
    None
}

/// Leftmost `<N>回` count expression.
pub fn find_count(text: &str) -> Option<Span> {
    COUNT_RE.captures_iter(text).find_map(|caps| {
        let whole = caps.get(0)?;
        let value = caps.get(1)?.as_str().parse().ok()?;
        Some(Span {
            value,
            start: whole.start(),
            end: whole.end(),
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minutes(text: &str) -> Option<u32> {
        find_duration(text).map(|s| s.value)
    }

    #[test]
    fn hour_and_minute_form_wins_over_hour_only() {
        assert_eq!(minutes("1時間30分"), Some(90));
        assert_eq!(minutes("2時間 15分"), Some(135));
    }

    #[test]
    fn each_form() {
        assert_eq!(minutes("1時間半"), Some(90));
        assert_eq!(minutes("3時間"), Some(180));
        assert_eq!(minutes("45分"), Some(45));
        assert_eq!(minutes("半"), Some(30));
        assert_eq!(minutes("数学を半やった"), Some(30));
    }

    #[test]
    fn bare_half_after_digit_or_clock_is_not_a_duration() {
        assert_eq!(minutes("1半"), None);
        assert_eq!(minutes("7時半"), None);
    }

    #[test]
    fn leftmost_expression_wins() {
        let span = find_duration("英語30分と数学1時間").unwrap();
        assert_eq!(span.value, 30);
        assert_eq!(span.start, "英語".len());
    }

    #[test]
    fn overflowing_numbers_are_skipped() {
        assert_eq!(minutes("99999999999時間"), None);
        assert_eq!(minutes("99999999999分 と 20分"), Some(20));
    }

    #[test]
    fn no_duration() {
        assert_eq!(minutes("こんにちは"), None);
        assert_eq!(minutes("7時"), None);
    }

    #[test]
    fn count_expression() {
        assert_eq!(find_count("毎日10回").map(|s| s.value), Some(10));
        assert_eq!(find_count("10分"), None);
    }
}
