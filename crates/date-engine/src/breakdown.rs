//! Decomposition of a calendar delta into years, months, weeks, days, and
//! time of day.

use std::fmt;

use serde::Serialize;

use crate::calendar::CalendarDelta;

/// Unsigned breakdown of the calendar distance between two instants.
///
/// `days` is always the remainder after whole weeks (`0..=6`). The
/// breakdown carries no direction; use [`crate::compare_instants`] for that.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct DurationBreakdown {
    pub years: u64,
    pub months: u64,
    pub weeks: u64,
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl DurationBreakdown {
    /// `true` when every component is zero.
    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}

/// Split the day field of `delta` into weeks and days and drop the sign of
/// every field.
pub fn decompose(delta: &CalendarDelta) -> DurationBreakdown {
    DurationBreakdown {
        years: delta.years.unsigned_abs(),
        months: delta.months.unsigned_abs(),
        weeks: (delta.days / 7).unsigned_abs(),
        days: (delta.days % 7).unsigned_abs(),
        hours: delta.hours.unsigned_abs(),
        minutes: delta.minutes.unsigned_abs(),
        seconds: delta.seconds.unsigned_abs(),
    }
}

/// Human-readable form, e.g. `"11 months, 4 weeks, 1 day, 2 hours"`.
impl fmt::Display for DurationBreakdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields = [
            (self.years, "year"),
            (self.months, "month"),
            (self.weeks, "week"),
            (self.days, "day"),
            (self.hours, "hour"),
            (self.minutes, "minute"),
            (self.seconds, "second"),
        ];

        let parts: Vec<String> = fields
            .iter()
            .filter(|(n, _)| *n > 0)
            .map(|(n, unit)| format!("{} {}{}", n, unit, if *n == 1 { "" } else { "s" }))
            .collect();

        if parts.is_empty() {
            return f.write_str("0 seconds");
        }
        f.write_str(&parts.join(", "))
    }
}
