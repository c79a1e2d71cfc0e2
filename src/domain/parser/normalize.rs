//! Canonicalisation of raw captures: digit folding and 12h→24h conversion.

use crate::domain::{ClockTime, Period};

/// Full-width digits (U+FF10–U+FF19) become ASCII digits; everything else is untouched.
pub fn normalize_digits(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '０'..='９' => char::from_digit(c as u32 - '０' as u32, 10).unwrap_or(c),
            _ => c,
        })
        .collect()
}

/// Applies the four-period day convention to an hour.
///
/// Morning only rolls 12 over to 0; Noon, Evening and Night shift hours below 12 up by 12.
/// Hours already past noon pass through, so the conversion is idempotent.
pub fn shift_hour(hour: u32, period: Period) -> u32 {
    match period {
        Period::Morning if hour == 12 => 0,
        Period::Noon | Period::Evening | Period::Night if hour < 12 => hour + 12,
        _ => hour,
    }
}

/// Formats `hour:minute` spoken in `period` as zero-padded 24-hour `HH:MM`.
pub fn to_24h(hour: u32, minute: u32, period: Period) -> String {
    format!("{:02}:{:02}", shift_hour(hour, period), minute)
}

/// Like [`to_24h`] but rejects results that are not a wall-clock time.
pub fn to_clock_time(hour: u32, minute: u32, period: Period) -> Option<ClockTime> {
    ClockTime::new(shift_hour(hour, period), minute)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_width_digits_fold_to_ascii() {
        assert_eq!(normalize_digits("英語３０分"), "英語30分");
        assert_eq!(normalize_digits("１時間半"), normalize_digits("1時間半"));
        assert_eq!(normalize_digits("ａｂｃ"), "ａｂｃ");
    }

    #[test]
    fn morning_rolls_twelve_to_midnight() {
        assert_eq!(to_24h(12, 0, Period::Morning), "00:00");
        for h in 1..12 {
            assert_eq!(shift_hour(h, Period::Morning), h);
        }
    }

    #[test]
    fn later_periods_shift_only_below_noon() {
        for p in [Period::Noon, Period::Evening, Period::Night] {
            for h in 0..12 {
                assert_eq!(shift_hour(h, p), h + 12);
            }
            for h in 12..24 {
                assert_eq!(shift_hour(h, p), h);
            }
        }
        assert_eq!(to_24h(7, 5, Period::Evening), "19:05");
    }

    #[test]
    fn conversion_is_idempotent() {
        for p in Period::ALL {
            for h in 0..24 {
                for m in [0, 30, 59] {
                    let once = shift_hour(h, p);
                    assert_eq!(shift_hour(once, p), once, "{p:?} {h}:{m}");
                    assert_eq!(to_24h(once, m, p), to_24h(h, m, p));
                }
            }
        }
    }

    #[test]
    fn to_clock_time_rejects_overflow() {
        assert!(to_clock_time(24, 0, Period::Night).is_none());
        assert!(to_clock_time(7, 75, Period::Morning).is_none());
        assert_eq!(to_clock_time(9, 0, Period::Night), ClockTime::new(21, 0));
    }
}
