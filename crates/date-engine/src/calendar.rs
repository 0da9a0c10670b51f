//! Calendar-aware field arithmetic.
//!
//! A [`Calendar`] maps instants to wall-clock time and back. On top of that
//! mapping it provides the two calendar operations everything else builds
//! on: adding whole calendar units ([`Calendar::add_units`]) and the
//! field-wise difference between two instants ([`Calendar::field_delta`]).
//!
//! Both operate on wall-clock time, so "one day later" keeps the clock time
//! across a DST switch and "one month later" clamps to the last day of a
//! shorter month.

use std::fmt;
use std::str::FromStr;

use chrono::{
    DateTime, Datelike, Days, Months, NaiveDateTime, Offset, TimeZone, Utc,
};
use chrono_tz::Tz;
use serde::Serialize;

use crate::error::{DateError, Result};

/// A point in time. Nanosecond resolution, totally ordered.
pub type Instant = DateTime<Utc>;

// ── CalendarUnit ────────────────────────────────────────────────────────────

/// The calendar field advanced by [`Calendar::add_units`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CalendarUnit {
    Year,
    Month,
    Week,
    Day,
}

impl fmt::Display for CalendarUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CalendarUnit::Year => "year",
            CalendarUnit::Month => "month",
            CalendarUnit::Week => "week",
            CalendarUnit::Day => "day",
        };
        f.write_str(name)
    }
}

impl FromStr for CalendarUnit {
    type Err = DateError;

    /// Accepts singular, plural, and short forms, case-insensitive.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "y" | "yr" | "yrs" | "year" | "years" => Ok(CalendarUnit::Year),
            "mo" | "mon" | "month" | "months" => Ok(CalendarUnit::Month),
            "w" | "wk" | "wks" | "week" | "weeks" => Ok(CalendarUnit::Week),
            "d" | "day" | "days" => Ok(CalendarUnit::Day),
            _ => Err(DateError::InvalidUnit(format!("'{}'", s.trim()))),
        }
    }
}

// ── CalendarDelta ───────────────────────────────────────────────────────────

/// Signed, calendar-normalized field differences between two instants.
///
/// Every non-zero field carries the same sign. Months stay within
/// `-11..=11`, hours within `-23..=23`, minutes and seconds within
/// `-59..=59`. Days are whatever remains after whole months, so they are
/// always shorter than a month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CalendarDelta {
    pub years: i64,
    pub months: i64,
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl CalendarDelta {
    /// The same delta pointing the other way.
    pub fn negate(&self) -> Self {
        Self {
            years: -self.years,
            months: -self.months,
            days: -self.days,
            hours: -self.hours,
            minutes: -self.minutes,
            seconds: -self.seconds,
        }
    }

    /// `true` when every field is zero.
    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}

// ── Calendar ────────────────────────────────────────────────────────────────

/// A calendar system bound to a wall clock.
///
/// Implementors supply the mapping between instants and wall-clock time;
/// the unit arithmetic and field subtraction are provided with Gregorian
/// rules and may be overridden by alternate calendars or test doubles.
pub trait Calendar {
    /// The wall-clock time `instant` shows in this calendar.
    ///
    /// `None` when the wall-clock reading falls outside the representable
    /// range, which happens at the range ends for zones with a non-zero
    /// offset.
    fn to_local(&self, instant: Instant) -> Option<NaiveDateTime>;

    /// The instant a wall-clock time denotes.
    ///
    /// Ambiguous wall times (clocks turned back) resolve to the earlier
    /// instant. Wall times skipped by a forward transition move forward by
    /// the length of the gap. Returns `None` only when the result cannot be
    /// represented.
    fn from_local(&self, local: NaiveDateTime) -> Option<Instant>;

    /// Add `amount` of `unit` to `instant` (negative amounts subtract).
    ///
    /// # Errors
    ///
    /// Returns [`DateError::CalendarOverflow`] if the result lies outside the
    /// representable range.
    fn add_units(&self, instant: Instant, unit: CalendarUnit, amount: i64) -> Result<Instant> {
        let overflow = || DateError::CalendarOverflow { unit, amount };
        let local = self.to_local(instant).ok_or_else(overflow)?;

        let shifted = match unit {
            CalendarUnit::Year => amount
                .checked_mul(12)
                .and_then(|months| shift_months(local, months)),
            CalendarUnit::Month => shift_months(local, amount),
            CalendarUnit::Week => amount
                .checked_mul(7)
                .and_then(|days| shift_days(local, days)),
            CalendarUnit::Day => shift_days(local, amount),
        }
        .ok_or_else(overflow)?;

        self.from_local(shifted).ok_or_else(overflow)
    }

    /// Field-wise difference needed to go from `start` to `end`.
    ///
    /// Fields are filled largest first: whole months (split into years and
    /// months), then whole days, then the time of day. Swapping the
    /// arguments negates every field.
    ///
    /// When clocks are turned back between `start` and `end` so that the
    /// later instant shows the earlier wall time, the delta is the elapsed
    /// time instead. Instants whose wall time cannot be represented are read
    /// on the UTC clock.
    fn field_delta(&self, start: Instant, end: Instant) -> CalendarDelta {
        if start > end {
            return self.field_delta(end, start).negate();
        }
        let (local_start, local_end) = match (self.to_local(start), self.to_local(end)) {
            (Some(local_start), Some(local_end)) => (local_start, local_end),
            _ => (start.naive_utc(), end.naive_utc()),
        };
        if local_start > local_end {
            return time_of_day_delta((end - start).num_seconds());
        }
        wall_clock_delta(local_start, local_end)
    }
}

impl<C: Calendar + ?Sized> Calendar for &C {
    fn to_local(&self, instant: Instant) -> Option<NaiveDateTime> {
        (**self).to_local(instant)
    }

    fn from_local(&self, local: NaiveDateTime) -> Option<Instant> {
        (**self).from_local(local)
    }

    fn add_units(&self, instant: Instant, unit: CalendarUnit, amount: i64) -> Result<Instant> {
        (**self).add_units(instant, unit, amount)
    }

    fn field_delta(&self, start: Instant, end: Instant) -> CalendarDelta {
        (**self).field_delta(start, end)
    }
}

// ── ZonedCalendar ───────────────────────────────────────────────────────────

/// The proleptic Gregorian calendar read on the wall clock of a
/// [`chrono::TimeZone`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZonedCalendar<Z: TimeZone> {
    tz: Z,
}

impl<Z: TimeZone> ZonedCalendar<Z> {
    pub fn new(tz: Z) -> Self {
        Self { tz }
    }

    pub fn timezone(&self) -> &Z {
        &self.tz
    }
}

impl ZonedCalendar<Utc> {
    pub fn utc() -> Self {
        Self::new(Utc)
    }
}

impl Default for ZonedCalendar<Utc> {
    fn default() -> Self {
        Self::utc()
    }
}

impl ZonedCalendar<Tz> {
    /// A calendar on the wall clock of an IANA timezone (e.g. `"Europe/Berlin"`).
    ///
    /// # Errors
    ///
    /// Returns [`DateError::InvalidTimezone`] if the name is not a known IANA
    /// timezone.
    pub fn from_name(name: &str) -> Result<Self> {
        name.parse::<Tz>()
            .map(Self::new)
            .map_err(|_| DateError::InvalidTimezone(format!("'{}'", name)))
    }
}

impl<Z: TimeZone> Calendar for ZonedCalendar<Z> {
    fn to_local(&self, instant: Instant) -> Option<NaiveDateTime> {
        let utc = instant.naive_utc();
        let offset = self.tz.offset_from_utc_datetime(&utc).fix();
        utc.checked_add_signed(chrono::Duration::seconds(i64::from(
            offset.local_minus_utc(),
        )))
    }

    fn from_local(&self, local: NaiveDateTime) -> Option<Instant> {
        if let Some(dt) = self.tz.from_local_datetime(&local).earliest() {
            return Some(dt.with_timezone(&Utc));
        }

        // Skipped wall time: read it with the offset in force before the gap.
        let before_gap = local.checked_sub_signed(chrono::Duration::days(1))?;
        let offset = self.tz.offset_from_utc_datetime(&before_gap).fix();
        let utc = local.checked_sub_signed(chrono::Duration::seconds(i64::from(
            offset.local_minus_utc(),
        )))?;
        Some(Utc.from_utc_datetime(&utc))
    }
}

// ── Wall-clock arithmetic ───────────────────────────────────────────────────

/// Add a signed number of months, clamping the day to the target month.
fn shift_months(local: NaiveDateTime, months: i64) -> Option<NaiveDateTime> {
    let step = Months::new(u32::try_from(months.unsigned_abs()).ok()?);
    if months >= 0 {
        local.checked_add_months(step)
    } else {
        local.checked_sub_months(step)
    }
}

/// Add a signed number of days, keeping the time of day.
fn shift_days(local: NaiveDateTime, days: i64) -> Option<NaiveDateTime> {
    let step = Days::new(days.unsigned_abs());
    if days >= 0 {
        local.checked_add_days(step)
    } else {
        local.checked_sub_days(step)
    }
}

/// Field delta between two wall-clock times with `start <= end`.
fn wall_clock_delta(start: NaiveDateTime, end: NaiveDateTime) -> CalendarDelta {
    // The calendar-month distance overshoots by at most one month.
    let mut months = (i64::from(end.year()) - i64::from(start.year())) * 12
        + (i64::from(end.month()) - i64::from(start.month()));
    let month_cursor = loop {
        match shift_months(start, months) {
            Some(cursor) if cursor <= end => break cursor,
            _ if months > 0 => months -= 1,
            _ => break start,
        }
    };

    let mut days = (end.date() - month_cursor.date()).num_days();
    let day_cursor = loop {
        match shift_days(month_cursor, days) {
            Some(cursor) if cursor <= end => break cursor,
            _ if days > 0 => days -= 1,
            _ => break month_cursor,
        }
    };

    CalendarDelta {
        years: months / 12,
        months: months % 12,
        days,
        ..time_of_day_delta((end - day_cursor).num_seconds())
    }
}

/// Split less than a day's worth of seconds into hours, minutes, and seconds.
fn time_of_day_delta(seconds: i64) -> CalendarDelta {
    CalendarDelta {
        hours: seconds / 3600,
        minutes: seconds % 3600 / 60,
        seconds: seconds % 60,
        ..CalendarDelta::default()
    }
}
