//! # date-engine
//!
//! Calendar-aware date arithmetic.
//!
//! Shifts instants by whole months, days, weeks, or years using calendar
//! rules (month-end clamping, wall-clock preservation across DST), breaks
//! the distance between two instants down into years, months, weeks, days,
//! and time of day, and classifies one instant against another. Every
//! operation is a pure function of its inputs and an explicitly supplied
//! [`Calendar`].
//!
//! ## Modules
//!
//! - [`calendar`]: the [`Calendar`] capability with unit addition and field-wise subtraction
//! - [`breakdown`]: calendar delta → years/months/weeks/days/hours/minutes/seconds
//! - [`ordering`]: future / past / same classification
//! - [`pattern`]: `"yyyy-MM-dd HH:mm:ss"` style formatting and parsing
//! - [`engine`]: [`DateEngine`], the facade tying the above to one calendar
//! - [`error`]: Error types

pub mod breakdown;
pub mod calendar;
pub mod engine;
pub mod error;
pub mod ordering;
pub mod pattern;

pub use breakdown::{decompose, DurationBreakdown};
pub use calendar::{Calendar, CalendarDelta, CalendarUnit, Instant, ZonedCalendar};
pub use engine::DateEngine;
pub use error::DateError;
pub use ordering::{compare_instants, InstantOrdering};
pub use pattern::{format_instant, parse_instant, translate_pattern};
