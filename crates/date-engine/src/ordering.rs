//! Three-way classification of one instant against another.

use std::cmp::Ordering;
use std::fmt;

use serde::Serialize;

use crate::calendar::Instant;

/// Where `other` lies relative to a reference instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InstantOrdering {
    /// The other instant is later than the reference.
    Future,
    /// The other instant is earlier than the reference.
    Past,
    /// Both instants are identical to the nanosecond.
    Same,
}

impl From<Ordering> for InstantOrdering {
    /// Maps `reference.cmp(&other)`: ascending is `Future`.
    fn from(ordering: Ordering) -> Self {
        match ordering {
            Ordering::Less => InstantOrdering::Future,
            Ordering::Greater => InstantOrdering::Past,
            Ordering::Equal => InstantOrdering::Same,
        }
    }
}

impl fmt::Display for InstantOrdering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            InstantOrdering::Future => "future",
            InstantOrdering::Past => "past",
            InstantOrdering::Same => "same",
        })
    }
}

/// Classify `other` relative to `reference`.
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use date_engine::{compare_instants, InstantOrdering};
///
/// let reference = Utc.with_ymd_and_hms(2020, 8, 10, 15, 0, 0).unwrap();
/// let later = Utc.with_ymd_and_hms(2021, 8, 8, 17, 0, 0).unwrap();
/// assert_eq!(compare_instants(reference, later), InstantOrdering::Future);
/// assert_eq!(compare_instants(later, reference), InstantOrdering::Past);
/// ```
pub fn compare_instants(reference: Instant, other: Instant) -> InstantOrdering {
    reference.cmp(&other).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn fixture() -> Instant {
        Utc.with_ymd_and_hms(2020, 8, 10, 15, 0, 0).unwrap()
    }

    #[test]
    fn test_later_other_is_future() {
        let other = Utc.with_ymd_and_hms(2021, 8, 8, 17, 0, 0).unwrap();
        assert_eq!(compare_instants(fixture(), other), InstantOrdering::Future);
    }

    #[test]
    fn test_earlier_other_is_past() {
        let other = Utc.with_ymd_and_hms(2019, 8, 8, 17, 0, 0).unwrap();
        assert_eq!(compare_instants(fixture(), other), InstantOrdering::Past);
    }

    #[test]
    fn test_equal_is_same() {
        let other = Utc.with_ymd_and_hms(2020, 8, 10, 15, 0, 0).unwrap();
        assert_eq!(compare_instants(fixture(), other), InstantOrdering::Same);
    }

    #[test]
    fn test_one_nanosecond_is_not_same() {
        let other = fixture() + Duration::nanoseconds(1);
        assert_eq!(compare_instants(fixture(), other), InstantOrdering::Future);
        assert_eq!(compare_instants(other, fixture()), InstantOrdering::Past);
    }

    #[test]
    fn test_display_and_serialize() {
        assert_eq!(InstantOrdering::Future.to_string(), "future");
        assert_eq!(
            serde_json::to_string(&InstantOrdering::Past).unwrap(),
            "\"past\""
        );
    }
}
