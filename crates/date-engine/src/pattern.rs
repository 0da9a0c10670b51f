//! Formatting and parsing instants with date patterns such as
//! `"yyyy-MM-dd HH:mm:ss"`.
//!
//! Patterns use the Unicode date-field letters and are translated to chrono
//! format items. Formatting and parsing happen on the wall clock of the
//! given [`Calendar`].
//!
//! | Pattern | Field |
//! |---|---|
//! | `y`, `yyyy` / `yy` | year / two-digit year |
//! | `M` `MM` `MMM` `MMMM` | month: number, padded, abbreviation, name |
//! | `d` `dd` | day of month |
//! | `E`..`EEE` / `EEEE` | weekday abbreviation / name |
//! | `H` `HH` | hour 0-23 |
//! | `h` `hh` | hour 1-12 |
//! | `m` `mm`, `s` `ss` | minute, second |
//! | `SSS` `SSSSSS` `SSSSSSSSS` | fractional second |
//! | `a` | AM/PM |
//! | `Z` / `xxx`, `XXX` | offset `+0200` / `+02:00` |
//! | `'text'` | literal text; `''` is a quote |

use std::fmt::Write;

use chrono::format::{Parsed, StrftimeItems};
use chrono::{FixedOffset, Utc};

use crate::calendar::{Calendar, Instant};
use crate::error::{DateError, Result};

/// A pattern translated to a chrono format string.
struct Translated {
    format: String,
    has_offset: bool,
    has_time: bool,
}

/// Translate a date pattern into a chrono strftime string.
///
/// # Errors
///
/// Returns [`DateError::InvalidPattern`] for unsupported field letters or an
/// unterminated quote.
///
/// # Examples
///
/// ```
/// use date_engine::translate_pattern;
///
/// assert_eq!(translate_pattern("yyyy-MM-dd HH:mm:ss").unwrap(), "%Y-%m-%d %H:%M:%S");
/// assert_eq!(translate_pattern("d MMM 'at' h a").unwrap(), "%-d %b at %-I %p");
/// ```
pub fn translate_pattern(pattern: &str) -> Result<String> {
    translate(pattern).map(|t| t.format)
}

fn translate(pattern: &str) -> Result<Translated> {
    let mut format = String::with_capacity(pattern.len() * 2);
    let mut has_offset = false;
    let mut has_time = false;
    let mut chars = pattern.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '\'' {
            if chars.peek() == Some(&'\'') {
                chars.next();
                format.push('\'');
                continue;
            }
            let mut closed = false;
            while let Some(c) = chars.next() {
                if c == '\'' {
                    if chars.peek() == Some(&'\'') {
                        chars.next();
                        format.push('\'');
                        continue;
                    }
                    closed = true;
                    break;
                }
                push_literal(&mut format, c);
            }
            if !closed {
                return Err(DateError::InvalidPattern(format!(
                    "unterminated quote in '{pattern}'"
                )));
            }
            continue;
        }

        if !ch.is_ascii_alphabetic() {
            push_literal(&mut format, ch);
            continue;
        }

        let mut width = 1;
        while chars.peek() == Some(&ch) {
            chars.next();
            width += 1;
        }

        let spec = field_specifier(ch, width).ok_or_else(|| {
            DateError::InvalidPattern(format!(
                "unsupported field '{}' in '{}'",
                ch.to_string().repeat(width),
                pattern
            ))
        })?;
        has_offset |= matches!(ch, 'Z' | 'x' | 'X');
        has_time |= matches!(ch, 'H' | 'h' | 'm' | 's' | 'S' | 'a');
        format.push_str(spec);
    }

    Ok(Translated {
        format,
        has_offset,
        has_time,
    })
}

fn push_literal(format: &mut String, c: char) {
    if c == '%' {
        format.push_str("%%");
    } else {
        format.push(c);
    }
}

fn field_specifier(letter: char, width: usize) -> Option<&'static str> {
    let spec = match (letter, width) {
        ('y', 2) => "%y",
        ('y', _) => "%Y",
        ('M', 1) => "%-m",
        ('M', 2) => "%m",
        ('M', 3) => "%b",
        ('M', 4) => "%B",
        ('d', 1) => "%-d",
        ('d', 2) => "%d",
        ('E', 1..=3) => "%a",
        ('E', 4) => "%A",
        ('H', 1) => "%-H",
        ('H', 2) => "%H",
        ('h', 1) => "%-I",
        ('h', 2) => "%I",
        ('m', 1) => "%-M",
        ('m', 2) => "%M",
        ('s', 1) => "%-S",
        ('s', 2) => "%S",
        ('S', 3) => "%3f",
        ('S', 6) => "%6f",
        ('S', 9) => "%9f",
        ('a', 1) => "%p",
        ('Z', 1..=3) => "%z",
        ('x' | 'X', 3) => "%:z",
        _ => return None,
    };
    Some(spec)
}

/// Format `instant` on the wall clock of `calendar`.
///
/// # Errors
///
/// Returns [`DateError::InvalidPattern`] if the pattern cannot be translated
/// or rendered, and [`DateError::InvalidDatetime`] if `instant` has no
/// wall-clock reading in `calendar`.
pub fn format_instant<C: Calendar + ?Sized>(
    calendar: &C,
    instant: Instant,
    pattern: &str,
) -> Result<String> {
    let translated = translate(pattern)?;

    let local = calendar.to_local(instant).ok_or_else(|| {
        DateError::InvalidDatetime(format!("{instant} has no wall-clock time in range"))
    })?;
    let offset = i32::try_from((local - instant.naive_utc()).num_seconds())
        .ok()
        .and_then(FixedOffset::east_opt)
        .ok_or_else(|| {
            DateError::InvalidDatetime(format!("no fixed UTC offset for {instant}"))
        })?;
    let zoned = instant.with_timezone(&offset);

    let mut out = String::new();
    write!(out, "{}", zoned.format(&translated.format)).map_err(|_| {
        DateError::InvalidPattern(format!("cannot render '{pattern}'"))
    })?;
    Ok(out)
}

/// Parse `text` as a wall-clock time of `calendar` using `pattern`.
///
/// Patterns without time fields yield midnight; minutes and seconds a
/// pattern leaves out read as zero. Patterns with an offset
/// field (`Z`, `xxx`) are parsed as absolute instants and ignore the
/// calendar's zone.
///
/// # Errors
///
/// Returns [`DateError::InvalidPattern`] for an untranslatable pattern and
/// [`DateError::InvalidDatetime`] if `text` does not match it.
pub fn parse_instant<C: Calendar + ?Sized>(
    calendar: &C,
    text: &str,
    pattern: &str,
) -> Result<Instant> {
    let translated = translate(pattern)?;
    let invalid = |e: chrono::ParseError| {
        DateError::InvalidDatetime(format!("'{}' does not match '{}': {}", text, pattern, e))
    };

    let mut parsed = Parsed::new();
    chrono::format::parse(&mut parsed, text, StrftimeItems::new(&translated.format))
        .map_err(invalid)?;

    // A setter leaves a field that was already parsed untouched.
    if !translated.has_time {
        let _ = parsed.set_hour(0);
    }
    let _ = parsed.set_minute(0);
    let _ = parsed.set_second(0);

    if translated.has_offset {
        return parsed
            .to_datetime()
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(invalid);
    }

    let local = parsed.to_naive_datetime_with_offset(0).map_err(invalid)?;

    let instant = calendar.from_local(local);
    if instant.is_none() {
        tracing::debug!(%local, "wall-clock time not representable");
    }
    instant.ok_or_else(|| {
        DateError::InvalidDatetime(format!("'{text}' is outside the calendar's range"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::ZonedCalendar;
    use chrono::TimeZone;

    const FIXTURE: &str = "2020-08-10 15:00:00";
    const FIXTURE_PATTERN: &str = "yyyy-MM-dd HH:mm:ss";

    fn fixture() -> Instant {
        Utc.with_ymd_and_hms(2020, 8, 10, 15, 0, 0).unwrap()
    }

    #[test]
    fn test_translate_fixture_pattern() {
        assert_eq!(
            translate_pattern(FIXTURE_PATTERN).unwrap(),
            "%Y-%m-%d %H:%M:%S"
        );
    }

    #[test]
    fn test_translate_names_and_literals() {
        assert_eq!(
            translate_pattern("EEEE, MMMM d, yyyy").unwrap(),
            "%A, %B %-d, %Y"
        );
        assert_eq!(translate_pattern("hh 'o''clock' a").unwrap(), "%I o'clock %p");
        assert_eq!(translate_pattern("''yy''").unwrap(), "'%y'");
        assert_eq!(translate_pattern("100%").unwrap(), "100%%");
    }

    #[test]
    fn test_translate_rejects_unknown_fields() {
        assert!(matches!(
            translate_pattern("yyyy-QQ"),
            Err(DateError::InvalidPattern(_))
        ));
        assert!(matches!(
            translate_pattern("SS"),
            Err(DateError::InvalidPattern(_))
        ));
    }

    #[test]
    fn test_translate_rejects_unterminated_quote() {
        assert!(matches!(
            translate_pattern("yyyy 'at"),
            Err(DateError::InvalidPattern(_))
        ));
    }

    #[test]
    fn test_format_fixture() {
        let calendar = ZonedCalendar::utc();
        assert_eq!(
            format_instant(&calendar, fixture(), FIXTURE_PATTERN).unwrap(),
            FIXTURE
        );
    }

    #[test]
    fn test_format_month_name() {
        let calendar = ZonedCalendar::utc();
        assert_eq!(
            format_instant(&calendar, fixture(), "MMMM dd, yyyy").unwrap(),
            "August 10, 2020"
        );
    }

    #[test]
    fn test_format_in_zone() {
        let calendar = ZonedCalendar::from_name("Europe/Berlin").unwrap();
        assert_eq!(
            format_instant(&calendar, fixture(), "yyyy-MM-dd HH:mm xxx").unwrap(),
            "2020-08-10 17:00 +02:00"
        );
    }

    #[test]
    fn test_format_out_of_range_is_invalid_datetime() {
        let calendar = ZonedCalendar::from_name("Asia/Tokyo").unwrap();
        assert!(matches!(
            format_instant(&calendar, chrono::DateTime::<Utc>::MAX_UTC, FIXTURE_PATTERN),
            Err(DateError::InvalidDatetime(_))
        ));
    }

    #[test]
    fn test_parse_fixture() {
        let calendar = ZonedCalendar::utc();
        assert_eq!(
            parse_instant(&calendar, FIXTURE, FIXTURE_PATTERN).unwrap(),
            fixture()
        );
    }

    #[test]
    fn test_parse_date_only_is_midnight() {
        let calendar = ZonedCalendar::utc();
        assert_eq!(
            parse_instant(&calendar, "2020-08-10", "yyyy-MM-dd").unwrap(),
            Utc.with_ymd_and_hms(2020, 8, 10, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_parse_keeps_partial_time() {
        let calendar = ZonedCalendar::utc();
        assert_eq!(
            parse_instant(&calendar, "2020-08-10 15", "yyyy-MM-dd HH").unwrap(),
            fixture()
        );
        assert_eq!(
            parse_instant(&calendar, "2020-08-10 15:30", "yyyy-MM-dd HH:mm").unwrap(),
            Utc.with_ymd_and_hms(2020, 8, 10, 15, 30, 0).unwrap()
        );
        assert_eq!(
            parse_instant(&calendar, "2020-08-10 03 PM", "yyyy-MM-dd hh a").unwrap(),
            fixture()
        );
    }

    #[test]
    fn test_parse_twelve_hour_without_meridiem_is_rejected() {
        let calendar = ZonedCalendar::utc();
        assert!(matches!(
            parse_instant(&calendar, "2020-08-10 03", "yyyy-MM-dd hh"),
            Err(DateError::InvalidDatetime(_))
        ));
    }

    #[test]
    fn test_parse_in_zone() {
        let calendar = ZonedCalendar::from_name("Europe/Berlin").unwrap();
        assert_eq!(
            parse_instant(&calendar, "2020-08-10 17:00:00", FIXTURE_PATTERN).unwrap(),
            fixture()
        );
    }

    #[test]
    fn test_parse_with_offset_ignores_zone() {
        let calendar = ZonedCalendar::from_name("Asia/Tokyo").unwrap();
        assert_eq!(
            parse_instant(&calendar, "2020-08-10 15:00:00 +0000", "yyyy-MM-dd HH:mm:ss Z")
                .unwrap(),
            fixture()
        );
    }

    #[test]
    fn test_parse_mismatch_is_invalid_datetime() {
        let calendar = ZonedCalendar::utc();
        assert!(matches!(
            parse_instant(&calendar, "10/08/2020", FIXTURE_PATTERN),
            Err(DateError::InvalidDatetime(_))
        ));
        assert!(matches!(
            parse_instant(&calendar, "2020-02-30 00:00:00", FIXTURE_PATTERN),
            Err(DateError::InvalidDatetime(_))
        ));
    }
}
