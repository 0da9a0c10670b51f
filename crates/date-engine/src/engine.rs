//! The caller-facing date engine.
//!
//! [`DateEngine`] owns a [`Calendar`] and exposes the shifting, breakdown,
//! comparison, and pattern helpers against it. The calendar is injected at
//! construction, so tests and callers choose the zone (or a custom calendar)
//! explicitly instead of reading a process-wide default.
//!
//! # Examples
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use date_engine::{DateEngine, InstantOrdering};
//!
//! let engine = DateEngine::utc();
//! let start = engine.parse("2020-08-10 15:00:00", "yyyy-MM-dd HH:mm:ss").unwrap();
//!
//! let later = engine.add_months(start, 3).unwrap();
//! assert_eq!(later, Utc.with_ymd_and_hms(2020, 11, 10, 15, 0, 0).unwrap());
//!
//! let end = Utc.with_ymd_and_hms(2021, 8, 8, 17, 0, 0).unwrap();
//! let breakdown = engine.breakdown_between(start, end);
//! assert_eq!((breakdown.months, breakdown.weeks, breakdown.days), (11, 4, 1));
//! assert_eq!(engine.compare(start, end), InstantOrdering::Future);
//! ```

use chrono::Utc;

use crate::breakdown::{decompose, DurationBreakdown};
use crate::calendar::{Calendar, CalendarDelta, CalendarUnit, Instant, ZonedCalendar};
use crate::error::Result;
use crate::ordering::{compare_instants, InstantOrdering};
use crate::pattern::{format_instant, parse_instant};

#[derive(Debug, Clone)]
pub struct DateEngine<C = ZonedCalendar<Utc>> {
    calendar: C,
}

impl DateEngine<ZonedCalendar<Utc>> {
    /// An engine on the UTC wall clock.
    pub fn utc() -> Self {
        Self::new(ZonedCalendar::utc())
    }
}

impl Default for DateEngine<ZonedCalendar<Utc>> {
    fn default() -> Self {
        Self::utc()
    }
}

impl<C: Calendar> DateEngine<C> {
    pub fn new(calendar: C) -> Self {
        Self { calendar }
    }

    pub fn calendar(&self) -> &C {
        &self.calendar
    }

    // ── Shifting ────────────────────────────────────────────────────────

    /// Add `amount` of `unit` to `instant`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::DateError::CalendarOverflow`] if the result cannot be
    /// represented.
    pub fn add_units(&self, instant: Instant, unit: CalendarUnit, amount: i64) -> Result<Instant> {
        self.calendar.add_units(instant, unit, amount)
    }

    /// `instant` plus `amount` months, clamped to the end of shorter months.
    /// `None` if the result is out of range.
    pub fn add_months(&self, instant: Instant, amount: i64) -> Option<Instant> {
        self.shift(instant, CalendarUnit::Month, amount)
    }

    /// `instant` plus `amount` days at the same wall-clock time.
    /// `None` if the result is out of range.
    pub fn add_days(&self, instant: Instant, amount: i64) -> Option<Instant> {
        self.shift(instant, CalendarUnit::Day, amount)
    }

    /// `instant` plus `amount` weeks of seven days. `None` if the result is
    /// out of range.
    pub fn add_weeks(&self, instant: Instant, amount: i64) -> Option<Instant> {
        self.shift(instant, CalendarUnit::Week, amount)
    }

    /// `instant` plus `amount` years; Feb 29 clamps to Feb 28 in common
    /// years. `None` if the result is out of range.
    pub fn add_years(&self, instant: Instant, amount: i64) -> Option<Instant> {
        self.shift(instant, CalendarUnit::Year, amount)
    }

    /// The same wall-clock date one year earlier, or `None` out of range.
    pub fn previous_year(&self, instant: Instant) -> Option<Instant> {
        self.add_years(instant, -1)
    }

    /// The same wall-clock date one year later, or `None` out of range.
    pub fn next_year(&self, instant: Instant) -> Option<Instant> {
        self.add_years(instant, 1)
    }

    fn shift(&self, instant: Instant, unit: CalendarUnit, amount: i64) -> Option<Instant> {
        match self.calendar.add_units(instant, unit, amount) {
            Ok(shifted) => Some(shifted),
            Err(err) => {
                tracing::debug!(%instant, %unit, amount, error = %err, "calendar shift out of range");
                None
            }
        }
    }

    // ── Distance and ordering ───────────────────────────────────────────

    pub fn field_delta(&self, start: Instant, end: Instant) -> CalendarDelta {
        self.calendar.field_delta(start, end)
    }

    /// Calendar distance between `start` and `end` as an unsigned breakdown.
    pub fn breakdown_between(&self, start: Instant, end: Instant) -> DurationBreakdown {
        let delta = self.calendar.field_delta(start, end);
        tracing::trace!(?delta, "calendar delta");
        decompose(&delta)
    }

    pub fn compare(&self, reference: Instant, other: Instant) -> InstantOrdering {
        compare_instants(reference, other)
    }

    // ── Patterns ────────────────────────────────────────────────────────

    /// Render `instant` on this engine's wall clock.
    ///
    /// # Errors
    ///
    /// See [`format_instant`].
    pub fn format(&self, instant: Instant, pattern: &str) -> Result<String> {
        format_instant(&self.calendar, instant, pattern)
    }

    /// Read `text` as a wall-clock time of this engine's calendar.
    ///
    /// # Errors
    ///
    /// See [`parse_instant`].
    pub fn parse(&self, text: &str, pattern: &str) -> Result<Instant> {
        parse_instant(&self.calendar, text, pattern)
    }
}
